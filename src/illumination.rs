//! # Illumination
//!
//! Low-precision analytic position of the Sun and the Earth-shadow test of a target.
//!
//! The solar ephemeris is the classical Newcomb-type development referred to 1900 January 0.5,
//! good to roughly 0.01° over the 20th and 21st centuries.
//!
//! The shadow test compares the apparent semi-diameters of the Earth and the Sun seen from the
//! target with their angular separation:
//!
//! ```text
//! sd_earth = asin(R_earth / |r|)
//! sd_sun   = asin(R_sun / |r_sun − r|)
//! δ        = angle(r_sun, −r)
//! depth    = sd_earth − sd_sun − δ
//! eclipsed ⇔ sd_earth ≥ sd_sun ∧ depth ≥ 0
//! ```

use std::fmt;

use nalgebra::Vector3;

use crate::constants::{Kilometer, Radian, AU, DPI, EARTH_MAJOR_AXIS, JD, JD1900, SOLAR_RADIUS};

/// Shadow state of a target at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseState {
    pub eclipsed: bool,
    /// Signed depth in the Earth's shadow (rad); positive inside the umbra cone.
    pub depth: Radian,
}

impl EclipseState {
    /// Status string printed in reports.
    pub fn status(&self) -> &'static str {
        if self.eclipsed {
            "Eclipsed"
        } else {
            "In Sunlight"
        }
    }
}

impl fmt::Display for EclipseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// Difference between ephemeris time and universal time, in seconds.
///
/// Empirical fit valid over the 20th century and extrapolated beyond.
fn delta_et(year: f64) -> f64 {
    26.465 + 0.747622 * (year - 1950.0) + 1.886913 * (DPI * (year - 1975.0) / 33.0).sin()
}

/// Geocentric position of the Sun in km, in the equatorial frame of date.
///
/// Arguments
/// -----------------
/// * `jd`: Julian date (UTC)
///
/// Return
/// ----------
/// * The Sun's position vector, magnitude about one astronomical unit.
pub fn solar_position(jd: JD) -> Vector3<Kilometer> {
    let mjd = jd - JD1900;
    let year = 1900.0 + mjd / 365.25;
    let t = (mjd + delta_et(year) / 86400.0) / 36525.0;

    let mean_anomaly = (358.47583 + (35999.04975 * t).rem_euclid(360.0)
        - (0.000150 + 0.0000033 * t) * t * t)
        .rem_euclid(360.0)
        .to_radians();
    let mean_longitude = (279.69668 + (36000.76892 * t).rem_euclid(360.0) + 0.0003025 * t * t)
        .rem_euclid(360.0)
        .to_radians();
    let eccentricity = 0.01675104 - (0.0000418 + 0.000000126 * t) * t;
    let centre = ((1.919460 - (0.004789 + 0.000014 * t) * t) * mean_anomaly.sin()
        + (0.020094 - 0.000100 * t) * (2.0 * mean_anomaly).sin()
        + 0.000293 * (3.0 * mean_anomaly).sin())
    .to_radians();
    let node = (259.18 - 1934.142 * t).rem_euclid(360.0).to_radians();

    // apparent longitude, corrected for aberration and nutation
    let longitude = (mean_longitude + centre - (0.00569 - 0.00479 * node.sin()).to_radians())
        .rem_euclid(DPI);
    let true_anomaly = (mean_anomaly + centre).rem_euclid(DPI);
    let distance =
        1.0000002 * (1.0 - eccentricity * eccentricity) / (1.0 + eccentricity * true_anomaly.cos());
    let obliquity = (23.452294 - (0.0130125 + (0.00000164 - 0.000000503 * t) * t) * t
        + 0.00256 * node.cos())
    .to_radians();

    let r = distance * AU;
    Vector3::new(
        r * longitude.cos(),
        r * longitude.sin() * obliquity.cos(),
        r * longitude.sin() * obliquity.sin(),
    )
}

/// Earth-shadow test of a target.
///
/// Arguments
/// -----------------
/// * `target`: geocentric position of the target (km)
/// * `sun`: geocentric position of the Sun (km), see [`solar_position`]
///
/// Return
/// ----------
/// * The [`EclipseState`] of the target. Same inputs always give the same state.
pub fn eclipsed(target: &Vector3<Kilometer>, sun: &Vector3<Kilometer>) -> EclipseState {
    let sd_earth = (EARTH_MAJOR_AXIS / target.norm()).clamp(-1.0, 1.0).asin();
    let target_to_sun = sun - target;
    let sd_sun = (SOLAR_RADIUS / target_to_sun.norm()).clamp(-1.0, 1.0).asin();

    let earth = -target;
    let delta = sun.angle(&earth);
    let depth = sd_earth - sd_sun - delta;

    EclipseState {
        eclipsed: sd_earth >= sd_sun && depth >= 0.0,
        depth,
    }
}
