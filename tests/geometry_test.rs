mod common;

use approx::assert_relative_eq;

use rangerate::illumination::{eclipsed, solar_position};
use rangerate::observation::{look_angles, sub_point};
use rangerate::propagation::{propagate, Propagator, Sgp4Propagator, StateVector};
use rangerate::time::{continuous_time, elapsed_minutes, CalendarTimestamp};

use common::{assert_look_close, edmonton, sample_set};

#[test]
fn test_range_rate_matches_finite_difference() {
    let set = sample_set(25445);
    let propagator = Sgp4Propagator::adopt(&set).unwrap();
    let observer = edmonton();

    let jd = continuous_time(&CalendarTimestamp::new(2024, 10, 16, 14, 30, 0));
    let half_step = 0.5 / 86_400.0;

    let range_at = |jd: f64| {
        let tsince = elapsed_minutes(jd, propagator.epoch_jd());
        let state = propagate(&propagator, tsince, propagator.regime()).unwrap();
        look_angles(&state, &observer, jd)
    };

    let centre = range_at(jd);
    let numerical = range_at(jd + half_step).range - range_at(jd - half_step).range;
    assert_relative_eq!(centre.range_rate, numerical, epsilon = 1e-3);
}

#[test]
fn test_look_angles_are_deterministic() {
    let set = sample_set(25544);
    let propagator = Sgp4Propagator::adopt(&set).unwrap();
    let observer = edmonton();

    let jd = continuous_time(&CalendarTimestamp::new(2020, 7, 13, 3, 0, 0));
    let tsince = elapsed_minutes(jd, propagator.epoch_jd());
    let state = propagate(&propagator, tsince, propagator.regime()).unwrap();

    let first = look_angles(&state, &observer, jd);
    let second = look_angles(&state, &observer, jd);
    assert_look_close(&first, &second, 0.0);
}

#[test]
fn test_iss_sub_point() {
    let set = sample_set(25544);
    let propagator = Sgp4Propagator::adopt(&set).unwrap();

    for hour in [0, 6, 12, 18] {
        let jd = continuous_time(&CalendarTimestamp::new(2020, 7, 13, hour, 0, 0));
        let tsince = elapsed_minutes(jd, propagator.epoch_jd());
        let state = propagate(&propagator, tsince, propagator.regime()).unwrap();
        let geo = sub_point(&state, jd);

        assert!((350.0..460.0).contains(&geo.altitude), "altitude {}", geo.altitude);
        assert!(geo.latitude_deg().abs() <= 52.0, "latitude {}", geo.latitude_deg());
        assert!((0.0..360.0).contains(&geo.longitude_deg()));
    }
}

#[test]
fn test_sun_at_local_noon_solstice() {
    let observer = edmonton();
    // solar noon at 113.456°W on the June solstice is close to 19:35 UTC
    let jd = continuous_time(&CalendarTimestamp::new(2024, 6, 20, 19, 35, 0));
    let sun = StateVector::at_rest(solar_position(jd));
    let look = look_angles(&sun, &observer, jd);

    assert_relative_eq!(look.elevation_deg(), 90.0 - 53.7694 + 23.44, epsilon = 0.5);
    assert_relative_eq!(look.azimuth_deg(), 180.0, epsilon = 2.0);
}

#[test]
fn test_sun_below_horizon_at_local_midnight() {
    let observer = edmonton();
    let jd = continuous_time(&CalendarTimestamp::new(2024, 12, 21, 7, 35, 0));
    let sun = StateVector::at_rest(solar_position(jd));
    let look = look_angles(&sun, &observer, jd);

    assert_relative_eq!(look.elevation_deg(), -(90.0 - 53.7694 + 23.44), epsilon = 0.5);
}

#[test]
fn test_orbit_crosses_the_shadow() {
    let set = sample_set(25445);
    let propagator = Sgp4Propagator::adopt(&set).unwrap();

    // one orbit of about 101 minutes, sampled every minute
    let start = continuous_time(&CalendarTimestamp::new(2024, 10, 16, 0, 0, 0));
    let states: Vec<bool> = (0..102)
        .map(|minute| {
            let jd = start + minute as f64 / 1440.0;
            let tsince = elapsed_minutes(jd, propagator.epoch_jd());
            let state = propagate(&propagator, tsince, propagator.regime()).unwrap();
            eclipsed(&state.position, &solar_position(jd)).eclipsed
        })
        .collect();

    assert!(states.iter().any(|e| *e));
    assert!(states.iter().any(|e| !*e));
}
