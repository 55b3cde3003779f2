//! Elementary rotations and the inertial-to-topocentric frame change.
//!
//! The topocentric frame is the South-East-Zenith (SEZ) frame of a ground site: `S` points to
//! the local south along the meridian, `E` to the local east and `Z` along the geodetic
//! vertical.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::Radian;

/// Construct a rotation matrix around one of the principal coordinate axes.
///
/// This function builds a 3×3 rotation matrix representing a rotation
/// of a 3D vector by an angle `alpha` around the chosen axis.
/// The rotation follows the **direct (positive/trigonometric)** sense.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians** (positive = direct/trigonometric sense).
/// * `k` - Index of the axis of rotation:
///   * `0` → X-axis
///   * `1` → Y-axis
///   * `2` → Z-axis
///
/// # Returns
///
/// A 3×3 rotation matrix `R` such that the rotated vector is `x' = R · x`.
/// The rotation is **applied to the vector** in a fixed frame; a change of basis by
/// an angle `α` is therefore `rotmt(-α, k)`.
///
/// # Panics
///
/// Panics if `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation from the inertial frame to the topocentric SEZ frame of a site.
///
/// Arguments
/// ---------
/// * `latitude`: geodetic latitude φ of the site (rad)
/// * `local_sidereal_time`: θ = GMST + λ (rad)
///
/// Returns
/// -------
/// * `R` such that `R · ρ` gives the (south, east, zenith) components of an inertial vector ρ:
///
/// ```text
/// S =  sinφ cosθ ρx + sinφ sinθ ρy − cosφ ρz
/// E = −sinθ ρx      + cosθ ρy
/// Z =  cosφ cosθ ρx + cosφ sinθ ρy + sinφ ρz
/// ```
pub fn inertial_to_sez(latitude: Radian, local_sidereal_time: Radian) -> Matrix3<f64> {
    // bring the site meridian onto X, then tilt the pole onto the local vertical
    rotmt(-(std::f64::consts::FRAC_PI_2 - latitude), 1) * rotmt(-local_sidereal_time, 2)
}
