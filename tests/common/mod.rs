#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::Vector3;

use rangerate::constants::JD;
use rangerate::elements::source::{ElementSource, TleFileSource};
use rangerate::elements::OrbitalElementSet;
use rangerate::observation::LookAngles;
use rangerate::observers::ObserverLocation;
use rangerate::propagation::{NativeUnits, Propagator, RawState, Regime};
use rangerate::tracker_errors::TrackerError;

pub const SAMPLE_TLE: &str = "tests/data/sample.tle";

pub fn sample_source() -> TleFileSource {
    TleFileSource::new(SAMPLE_TLE)
}

pub fn sample_set(catalog: u32) -> OrbitalElementSet {
    sample_source().fetch(catalog).unwrap()
}

/// Ground station at 53.7694°N, 113.4560°W, 701 m.
pub fn edmonton() -> ObserverLocation {
    ObserverLocation::from_degrees(53.7694, -113.4560, 701.0, Some("Edmonton".into())).unwrap()
}

pub fn assert_look_close(actual: &LookAngles, expected: &LookAngles, epsilon: f64) {
    assert_relative_eq!(actual.azimuth, expected.azimuth, epsilon = epsilon);
    assert_relative_eq!(actual.elevation, expected.elevation, epsilon = epsilon);
    assert_relative_eq!(actual.range, expected.range, epsilon = epsilon);
    assert_relative_eq!(actual.range_rate, expected.range_rate, epsilon = epsilon);
}

/// Propagator answering the same inertial state, in Earth radii, whatever the time.
pub struct FixedState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub regime: Regime,
}

impl Propagator for FixedState {
    fn regime(&self) -> Regime {
        self.regime
    }

    fn epoch_jd(&self) -> JD {
        2460599.5
    }

    fn native_units(&self) -> NativeUnits {
        NativeUnits::EARTH_RADII
    }

    fn near_earth(&self, _tsince: f64) -> Result<RawState, TrackerError> {
        Ok(RawState {
            position: self.position,
            velocity: self.velocity,
        })
    }

    fn deep_space(&self, tsince: f64) -> Result<RawState, TrackerError> {
        self.near_earth(tsince)
    }
}

/// Propagator failing after a given number of minutes since epoch.
pub struct FailingAfter {
    pub inner: FixedState,
    pub limit_minutes: f64,
}

impl Propagator for FailingAfter {
    fn regime(&self) -> Regime {
        self.inner.regime
    }

    fn epoch_jd(&self) -> JD {
        self.inner.epoch_jd()
    }

    fn native_units(&self) -> NativeUnits {
        self.inner.native_units()
    }

    fn near_earth(&self, tsince: f64) -> Result<RawState, TrackerError> {
        if tsince > self.limit_minutes {
            return Err(TrackerError::PropagationError(format!(
                "decayed at {tsince} min"
            )));
        }
        self.inner.near_earth(tsince)
    }

    fn deep_space(&self, tsince: f64) -> Result<RawState, TrackerError> {
        self.near_earth(tsince)
    }
}
