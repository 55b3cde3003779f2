//! # Observation transform
//!
//! Converts an inertial [`StateVector`] into what a ground observer sees
//! ([`LookAngles`]) and into the geodetic point directly below the target
//! ([`GeodeticPosition`]).
//!
//! ## Look angles
//!
//! The relative vector `ρ = r_target − r_observer` is rotated into the topocentric
//! south-east-zenith frame ([`inertial_to_sez`]) and then
//!
//! ```text
//! azimuth   = atan2(E, −S)            clockwise from north, [0, 2π)
//! elevation = asin(Z / |ρ|)           [−π/2, π/2]
//! range     = |ρ|
//! rate      = (ρ · ρ̇) / |ρ|           ρ̇ = v_target − v_observer
//! ```
//!
//! ## Sub-point
//!
//! Geodetic latitude on the WGS-72 ellipsoid is recovered by fixed-point iteration on
//!
//! ```text
//! φ ← atan2(z + a·C·e²·sinφ, √(x² + y²)),    C = 1 / √(1 − e² sin²φ)
//! ```
//!
//! until two successive values differ by less than `1e-10` rad.

use nalgebra::Vector3;

use crate::constants::{
    Degree, Kilometer, Radian, DPI, EARTH_FLATTENING, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, JD,
};
use crate::observers::ObserverLocation;
use crate::propagation::StateVector;
use crate::ref_system::inertial_to_sez;
use crate::time::theta_g_jd;

/// Convergence tolerance of the geodetic latitude iteration, in radians.
const LATITUDE_TOLERANCE: f64 = 1e-10;

/// Upper bound on the geodetic latitude iterations.
const MAX_LATITUDE_ITERATIONS: usize = 50;

/// Observer-relative geometry of a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    /// Azimuth, clockwise from north, in `[0, 2π)`
    pub azimuth: Radian,
    /// Elevation above the local horizon, in `[−π/2, π/2]`
    pub elevation: Radian,
    /// Distance observer → target in km
    pub range: Kilometer,
    /// Rate of change of the range in km/s, positive when receding
    pub range_rate: f64,
}

impl LookAngles {
    pub fn azimuth_deg(&self) -> Degree {
        self.azimuth.to_degrees()
    }

    pub fn elevation_deg(&self) -> Degree {
        self.elevation.to_degrees()
    }
}

/// Point of the ellipsoid below a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    /// Geodetic latitude, north positive
    pub latitude: Radian,
    /// East longitude in `[0, 2π)`
    pub longitude: Radian,
    /// Height above the ellipsoid in km
    pub altitude: Kilometer,
}

impl GeodeticPosition {
    pub fn latitude_deg(&self) -> Degree {
        self.latitude.to_degrees()
    }

    pub fn longitude_deg(&self) -> Degree {
        self.longitude.to_degrees()
    }
}

/// Compute the look angles of a target from a ground observer.
///
/// Arguments
/// -----------------
/// * `target`: inertial state of the target (km, km/s). Use [`StateVector::at_rest`] for the Sun.
/// * `observer`: the ground site
/// * `jd`: Julian date of the evaluation
///
/// Return
/// ----------
/// * The [`LookAngles`] of the target.
pub fn look_angles(target: &StateVector, observer: &ObserverLocation, jd: JD) -> LookAngles {
    let site = observer.eci_state(jd);

    let rho = target.position - site.state.position;
    let rho_dot = target.velocity - site.state.velocity;
    let range = rho.norm();

    let sez = inertial_to_sez(observer.latitude.into_inner(), site.local_sidereal_time) * rho;

    let azimuth = sez.y.atan2(-sez.x).rem_euclid(DPI);
    let elevation = (sez.z / range).clamp(-1.0, 1.0).asin();

    LookAngles {
        azimuth,
        elevation,
        range,
        range_rate: rho.dot(&rho_dot) / range,
    }
}

/// Geodetic latitude, longitude and altitude of the point below a target.
///
/// Arguments
/// -----------------
/// * `target`: inertial state of the target, only the position is used
/// * `jd`: Julian date of the evaluation
///
/// Return
/// ----------
/// * The [`GeodeticPosition`] of the sub-point, on the WGS-72 ellipsoid.
pub fn sub_point(target: &StateVector, jd: JD) -> GeodeticPosition {
    geodetic_from_inertial(&target.position, jd)
}

fn geodetic_from_inertial(position: &Vector3<Kilometer>, jd: JD) -> GeodeticPosition {
    let (x, y, z) = (position.x, position.y, position.z);
    let longitude = (y.atan2(x) - theta_g_jd(jd)).rem_euclid(DPI);
    let r = x.hypot(y);

    // on the polar axis the latitude is ±90° and the altitude is measured along Z
    if r < 1e-9 {
        let latitude = std::f64::consts::FRAC_PI_2.copysign(z);
        return GeodeticPosition {
            latitude,
            longitude,
            altitude: z.abs() - EARTH_MINOR_AXIS,
        };
    }

    let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);
    let mut latitude = z.atan2(r);
    let mut c = 1.0;

    for _ in 0..MAX_LATITUDE_ITERATIONS {
        let phi = latitude;
        c = 1.0 / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        latitude = (z + EARTH_MAJOR_AXIS * c * e2 * phi.sin()).atan2(r);
        if (latitude - phi).abs() < LATITUDE_TOLERANCE {
            break;
        }
    }

    GeodeticPosition {
        latitude,
        longitude,
        altitude: r / latitude.cos() - EARTH_MAJOR_AXIS * c,
    }
}
