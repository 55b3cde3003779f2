//! # Ground observer
//!
//! This module defines [`ObserverLocation`](crate::observers::ObserverLocation), the fixed
//! geodetic site of the ground station, and the geometry needed to place it in the
//! Earth-centered inertial frame at a given instant.
//!
//! ## Frames & conventions
//!
//! - **Geodetic input**: latitude north-positive, longitude east-positive normalized to
//!   `[0, 2π)`, altitude above the WGS-72 ellipsoid in kilometers.
//! - **Inertial output**: the true-equator, mean-equinox frame of the propagator, the Earth
//!   being rotated by the Greenwich mean sidereal time ([`theta_g_jd`](crate::time::theta_g_jd)).
//!
//! ```text
//! geodetic (φ, λ, h) --(oblate ellipsoid)--> (ρ·cosφ', ρ·sinφ') --(θ = GMST + λ)--> inertial r, v = ω × r
//! ```
//!
//! ## Units
//!
//! - Parallax coordinates (ρ·cosφ', ρ·sinφ'): **Earth radii**.
//! - Positions: **km**. Velocities: **km/s**, ω = 2π·1.00273790934 / 86400 rad/s.
//!
//! ## Design & invariants
//!
//! - [`ObserverLocation`](crate::observers::ObserverLocation) stores **precomputed parallax
//!   coordinates**, so that each tick only pays for the rotation to the current sidereal time.
//! - `NotNan<f64>` forbids NaN in the site geometry; construction fails with
//!   [`TrackerError`](crate::tracker_errors::TrackerError) otherwise.

use nalgebra::Vector3;
use ordered_float::NotNan;

use crate::constants::{
    Degree, Kilometer, Meter, Radian, DPI, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS,
    EARTH_ROTATION_RATE, JD, SECONDS_PER_DAY,
};
use crate::propagation::StateVector;
use crate::time::theta_g_jd;
use crate::tracker_errors::TrackerError;

/// Inertial state of the observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverState {
    /// Observer position and velocity (km, km/s)
    pub state: StateVector,
    /// Local mean sidereal time θ = GMST + λ, in `[0, 2π)`
    pub local_sidereal_time: Radian,
}

/// Geodetic location of a ground observer, immutable for a run.
///
/// Units
/// -----
/// * `latitude`: radians, north positive.
/// * `longitude`: radians, east positive, in `[0, 2π)`.
/// * `altitude`: kilometers above the ellipsoid.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ObserverLocation {
    /// Geodetic latitude in **radians**.
    pub latitude: NotNan<f64>,

    /// Geodetic longitude in **radians** east of Greenwich, in `[0, 2π)`.
    pub longitude: NotNan<f64>,

    /// Height above the reference ellipsoid in **kilometers**.
    pub altitude: NotNan<f64>,

    /// Optional human-readable site name.
    pub name: Option<String>,

    /// ρ·cosφ' (geocentric latitude φ'), in **Earth radii**.
    rho_cos_phi: NotNan<f64>,

    /// ρ·sinφ' (geocentric latitude φ'), in **Earth radii**.
    rho_sin_phi: NotNan<f64>,
}

impl ObserverLocation {
    /// Create an observer from geodetic coordinates in radians and kilometers.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: geodetic latitude in **radians**, within `[−π/2, π/2]`.
    /// * `longitude`: geodetic longitude in **radians**, east positive; any value is accepted
    ///   and wrapped into `[0, 2π)`.
    /// * `altitude`: height above the ellipsoid in **kilometers**.
    /// * `name`: optional site name.
    ///
    /// Errors
    /// ----------
    /// * [`TrackerError::NanError`] if an input is NaN.
    /// * [`TrackerError::InvalidObserver`] if the latitude is outside `[−π/2, π/2]`.
    pub fn new(
        latitude: Radian,
        longitude: Radian,
        altitude: Kilometer,
        name: Option<String>,
    ) -> Result<ObserverLocation, TrackerError> {
        let latitude = NotNan::new(latitude)?;
        let longitude = NotNan::new(longitude)?;
        let altitude = NotNan::new(altitude)?;

        if latitude.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(TrackerError::InvalidObserver(format!(
                "latitude {} rad outside [-π/2, π/2]",
                latitude
            )));
        }

        let (rho_cos_phi, rho_sin_phi) =
            lat_alt_to_parallax(latitude.into_inner(), altitude.into_inner());

        Ok(ObserverLocation {
            latitude,
            longitude: NotNan::new(longitude.rem_euclid(DPI))?,
            altitude,
            name,
            rho_cos_phi: NotNan::new(rho_cos_phi)?,
            rho_sin_phi: NotNan::new(rho_sin_phi)?,
        })
    }

    /// Create an observer from the command-line conventions: degrees, west-negative longitude
    /// and altitude in meters.
    ///
    /// The longitude goes through [`normalize_longitude`] before the radian conversion.
    pub fn from_degrees(
        latitude: Degree,
        longitude: Degree,
        altitude: Meter,
        name: Option<String>,
    ) -> Result<ObserverLocation, TrackerError> {
        ObserverLocation::new(
            latitude.to_radians(),
            normalize_longitude(longitude).to_radians(),
            altitude / 1000.0,
            name,
        )
    }

    pub fn latitude_deg(&self) -> Degree {
        self.latitude.to_degrees()
    }

    pub fn longitude_deg(&self) -> Degree {
        self.longitude.to_degrees()
    }

    /// Normalized parallax coordinates (ρ·cosφ', ρ·sinφ') in Earth radii.
    pub fn parallax(&self) -> (f64, f64) {
        (self.rho_cos_phi.into_inner(), self.rho_sin_phi.into_inner())
    }

    /// Observer position and velocity in the inertial frame at `jd`.
    ///
    /// The site is rotated by the local mean sidereal time `θ = GMST(jd) + λ`; its velocity is
    /// the Earth-rotation term `ω × r`.
    ///
    /// Arguments
    /// ---------
    /// * `jd`: Julian date (UTC, used as UT1)
    ///
    /// Returns
    /// --------
    /// * The [`ObserverState`], position in km, velocity in km/s, plus θ.
    pub fn eci_state(&self, jd: JD) -> ObserverState {
        let theta = (theta_g_jd(jd) + self.longitude.into_inner()).rem_euclid(DPI);

        let equatorial = EARTH_MAJOR_AXIS * self.rho_cos_phi.into_inner();
        let position = Vector3::new(
            equatorial * theta.cos(),
            equatorial * theta.sin(),
            EARTH_MAJOR_AXIS * self.rho_sin_phi.into_inner(),
        );

        let omega = Vector3::new(0.0, 0.0, DPI * EARTH_ROTATION_RATE / SECONDS_PER_DAY);
        let velocity = omega.cross(&position);

        ObserverState {
            state: StateVector::new(position, velocity),
            local_sidereal_time: theta,
        }
    }
}

/// Bring a west-negative longitude into `[0°, 360°)` east-positive.
///
/// Only negative values are shifted: `if longitude < 0 { longitude += 360 }`.
pub fn normalize_longitude(longitude: Degree) -> Degree {
    if longitude < 0.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates
/// on the Earth.
///
/// This transformation accounts for the Earth's oblateness. The resulting values
/// are dimensionless and are expressed in units of the Earth's equatorial
/// radius (`EARTH_MAJOR_AXIS`).
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **radians**.
/// * `height` - Observer's altitude above the reference ellipsoid in **kilometers**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)`:
/// * `rho_cos_phi`: normalized distance of the observer projected on
///   the Earth's equatorial plane.
/// * `rho_sin_phi`: normalized distance of the observer projected on
///   the Earth's rotation (polar) axis.
///
/// Details
/// -------
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
///
/// where `a` and `b` are the Earth's semi-major and semi-minor axes,
/// and `h` is the height above the ellipsoid.
pub fn lat_alt_to_parallax(lat: f64, height: f64) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use crate::constants::EARTH_FLATTENING;
    use approx::assert_relative_eq;

    #[test]
    fn test_observer_constructor() {
        let observer = ObserverLocation::new(0.0, 0.0, 0.0, None).unwrap();
        assert_eq!(observer.longitude, 0.0);
        assert_eq!(observer.parallax(), (1.0, 0.0));

        let observer = ObserverLocation::new(0.5, -0.5, 1.0, Some("site".into())).unwrap();
        assert_relative_eq!(observer.longitude.into_inner(), DPI - 0.5, epsilon = 1e-15);
        assert_eq!(observer.name.as_deref(), Some("site"));
    }

    #[test]
    fn test_observer_rejects_bad_input() {
        let err = ObserverLocation::new(f64::NAN, 0.0, 0.0, None).unwrap_err();
        assert!(matches!(err, TrackerError::NanError(_)));

        let err = ObserverLocation::from_degrees(91.0, 0.0, 0.0, None).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidObserver(_)));
    }

    #[test]
    fn test_normalize_longitude() {
        assert_relative_eq!(normalize_longitude(-113.4560), 246.5440, epsilon = 1e-10);
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(113.456), 113.456);
    }

    #[test]
    fn test_from_degrees() {
        let edmonton = ObserverLocation::from_degrees(53.7694, -113.4560, 701.0, None).unwrap();
        assert_relative_eq!(edmonton.longitude_deg(), 246.5440, epsilon = 1e-10);
        assert_relative_eq!(edmonton.latitude_deg(), 53.7694, epsilon = 1e-10);
        assert_relative_eq!(edmonton.altitude.into_inner(), 0.701, epsilon = 1e-12);
    }

    #[test]
    fn test_parallax_matches_closed_form() {
        // ρ·cosφ' = (a·C + h)·cosφ / a with C = 1 / sqrt(1 + f(f − 2) sin²φ)
        let lat: f64 = 53.7694_f64.to_radians();
        let h = 0.701;
        let (pxy, pz) = lat_alt_to_parallax(lat, h);

        let f = EARTH_FLATTENING;
        let c = 1.0 / (1.0 + f * (f - 2.0) * lat.sin().powi(2)).sqrt();
        let s = (1.0 - f).powi(2) * c;
        assert_relative_eq!(
            pxy * EARTH_MAJOR_AXIS,
            (EARTH_MAJOR_AXIS * c + h) * lat.cos(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            pz * EARTH_MAJOR_AXIS,
            (EARTH_MAJOR_AXIS * s + h) * lat.sin(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_eci_state_on_equator() {
        let observer = ObserverLocation::new(0.0, 0.0, 0.0, None).unwrap();
        let jd = 2451545.0;
        let obs = observer.eci_state(jd);

        assert_relative_eq!(obs.local_sidereal_time, theta_g_jd(jd), epsilon = 1e-12);
        assert_relative_eq!(obs.state.position.norm(), EARTH_MAJOR_AXIS, epsilon = 1e-9);
        assert_relative_eq!(obs.state.position.z, 0.0);
        // equatorial rotation speed ≈ 0.465 km/s
        assert_relative_eq!(obs.state.speed, 0.4651, epsilon = 1e-3);
        assert_relative_eq!(obs.state.position.dot(&obs.state.velocity), 0.0, epsilon = 1e-9);
    }
}
