//! # Propagation adapter
//!
//! The numerical propagator is an external collaborator hidden behind the [`Propagator`] trait:
//! it exposes one procedure per orbital [`Regime`] (SGP4 for near-Earth orbits, SDP4 for
//! deep-space ones) and declares the units its raw output is expressed in.
//!
//! [`propagate`] is the adapter proper: it dispatches on the regime cached by the caller,
//! rescales the raw output to kilometers and kilometers per second, and derives the speed.
//!
//! ## Regime selection
//!
//! [`classify_regime`] recovers the Brouwer ("un-Kozai'd") mean motion from the TLE mean motion
//! with the J2 correction, then compares the corresponding period with 225 minutes. The
//! geopotential is [`sgp4::WGS84`], the one [`sgp4::Constants::from_elements`] selects its own
//! branch with, so the printed label always names the algorithm that actually runs:
//!
//! ```text
//! a1   = (ke / n0)^(2/3)
//! k2   = J2 / 2
//! δ1   = 3/2 · k2 · (3 cos² i − 1) / (1 − e²)^(3/2) / a1²
//! a0   = a1 · (1 − δ1 · (1/3 + δ1 · (1 + 134/81 · δ1)))
//! δ0   = 3/2 · k2 · (3 cos² i − 1) / (1 − e²)^(3/2) / a0²
//! n0'' = n0 / (1 + δ0)
//! deep space  ⇔  2π / n0'' ≥ 225 min
//! ```
//!
//! The classification is done once, when an element set is adopted by
//! [`Sgp4Propagator::adopt`], and never per tick.

use std::fmt;

use nalgebra::Vector3;

use crate::constants::{Kilometer, DEEP_SPACE_PERIOD, DPI, EARTH_MAJOR_AXIS, JD, MINUTES_PER_DAY};
use crate::elements::OrbitalElementSet;
use crate::tracker_errors::TrackerError;

/// Orbital regime of an element set, selecting the propagation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Period below 225 minutes, propagated with SGP4
    NearEarth,
    /// Period of 225 minutes or more, propagated with SDP4
    DeepSpace,
}

impl Regime {
    /// Short name of the ephemeris model, as printed in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Regime::NearEarth => "SGP4",
            Regime::DeepSpace => "SDP4",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::NearEarth => write!(f, "near-Earth"),
            Regime::DeepSpace => write!(f, "deep-space"),
        }
    }
}

/// Classify an element set as near-Earth or deep-space.
///
/// Return
/// ----------
/// * The regime, or [`TrackerError::PropagationError`] if the derived mean motion is not a
///   strictly positive finite number.
pub fn classify_regime(elements: &OrbitalElementSet) -> Result<Regime, TrackerError> {
    // Kozai mean motion in rad/min
    let xno = elements.mean_motion() * DPI / MINUTES_PER_DAY;
    let eo = elements.eccentricity();
    let cos_i = elements.inclination().to_radians().cos();

    let k2 = 0.5 * sgp4::WGS84.j2;
    let temp = 1.5 * k2 * (3.0 * cos_i * cos_i - 1.0) / (1.0 - eo * eo).powf(1.5);
    let a1 = (sgp4::WGS84.ke / xno).powf(2.0 / 3.0);
    let del1 = temp / (a1 * a1);
    let ao = a1 * (1.0 - del1 * (1.0 / 3.0 + del1 * (1.0 + 134.0 / 81.0 * del1)));
    let delo = temp / (ao * ao);
    let xnodp = xno / (1.0 + delo);

    if !xnodp.is_finite() || xnodp <= 0.0 {
        return Err(TrackerError::PropagationError(format!(
            "derived mean motion {xnodp} rad/min of catalog {} is not positive",
            elements.catalog_number
        )));
    }

    if DPI / xnodp >= DEEP_SPACE_PERIOD {
        Ok(Regime::DeepSpace)
    } else {
        Ok(Regime::NearEarth)
    }
}

/// Scale factors from a propagator's native output units to km and km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeUnits {
    pub position_to_km: f64,
    pub velocity_to_km_s: f64,
}

impl NativeUnits {
    /// Output already in km and km/s.
    pub const KILOMETERS: NativeUnits = NativeUnits {
        position_to_km: 1.0,
        velocity_to_km_s: 1.0,
    };

    /// Output in Earth radii and Earth radii per minute, the canonical SGP4 units.
    pub const EARTH_RADII: NativeUnits = NativeUnits {
        position_to_km: EARTH_MAJOR_AXIS,
        velocity_to_km_s: EARTH_MAJOR_AXIS / 60.0,
    };
}

/// Position and velocity as returned by a propagator, in its native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Inertial state of a target at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    /// Position in km
    pub position: Vector3<Kilometer>,
    /// Velocity in km/s
    pub velocity: Vector3<f64>,
    /// |velocity| in km/s
    pub speed: f64,
}

impl StateVector {
    pub fn new(position: Vector3<Kilometer>, velocity: Vector3<f64>) -> Self {
        StateVector {
            position,
            velocity,
            speed: velocity.norm(),
        }
    }

    /// A state with zero velocity, used for targets whose motion is irrelevant (the Sun).
    pub fn at_rest(position: Vector3<Kilometer>) -> Self {
        StateVector::new(position, Vector3::zeros())
    }
}

/// External propagator: one procedure per regime, on an element set adopted beforehand.
pub trait Propagator {
    /// Regime fixed when the element set was adopted.
    fn regime(&self) -> Regime;

    /// Julian date of the adopted element-set epoch.
    fn epoch_jd(&self) -> JD;

    /// Units of the raw states returned by [`Propagator::near_earth`] and
    /// [`Propagator::deep_space`].
    fn native_units(&self) -> NativeUnits;

    /// Near-Earth procedure (SGP4). `tsince` is in minutes since the epoch.
    fn near_earth(&self, tsince: f64) -> Result<RawState, TrackerError>;

    /// Deep-space procedure (SDP4). `tsince` is in minutes since the epoch.
    fn deep_space(&self, tsince: f64) -> Result<RawState, TrackerError>;
}

/// Propagate to `tsince` minutes after the epoch with the procedure selected by `regime`.
///
/// Arguments
/// -----------------
/// * `propagator`: the external propagator, element set already adopted
/// * `tsince`: signed minutes since the element-set epoch
/// * `regime`: the regime cached at adoption time
///
/// Return
/// ----------
/// * The inertial [`StateVector`] in km and km/s, or a [`TrackerError::PropagationError`] if
///   the propagator rejects the request or returns non-finite values.
pub fn propagate<P: Propagator + ?Sized>(
    propagator: &P,
    tsince: f64,
    regime: Regime,
) -> Result<StateVector, TrackerError> {
    let raw = match regime {
        Regime::NearEarth => propagator.near_earth(tsince)?,
        Regime::DeepSpace => propagator.deep_space(tsince)?,
    };

    let units = propagator.native_units();
    let position = raw.position * units.position_to_km;
    let velocity = raw.velocity * units.velocity_to_km_s;

    if !position.iter().chain(velocity.iter()).all(|x| x.is_finite()) {
        return Err(TrackerError::PropagationError(format!(
            "non-finite state at {tsince} min since epoch"
        )));
    }

    Ok(StateVector::new(position, velocity))
}

/// [`Propagator`] backed by the `sgp4` crate.
///
/// The crate initialises its model once per element set and keeps the SGP4 or SDP4 branch it
/// selected; the regime computed by [`classify_regime`] must agree with it, and each procedure
/// refuses to run on an element set of the other regime.
pub struct Sgp4Propagator {
    model: sgp4::Constants,
    regime: Regime,
    epoch_jd: JD,
    catalog_number: u32,
}

impl fmt::Debug for Sgp4Propagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sgp4Propagator")
            .field("regime", &self.regime)
            .field("epoch_jd", &self.epoch_jd)
            .field("catalog_number", &self.catalog_number)
            .finish_non_exhaustive()
    }
}

impl Sgp4Propagator {
    /// Adopt an element set: classify its regime and initialise the propagation model.
    ///
    /// Must be called again whenever a different element set is used.
    pub fn adopt(elements: &OrbitalElementSet) -> Result<Self, TrackerError> {
        let regime = classify_regime(elements)?;
        let model = sgp4::Constants::from_elements(elements.elements())
            .map_err(|e| TrackerError::PropagationError(format!("{e:?}")))?;

        log::info!(
            "adopted element set {} ({}): {regime} ephemeris {}",
            elements.catalog_number,
            elements.name,
            regime.label()
        );

        Ok(Sgp4Propagator {
            model,
            regime,
            epoch_jd: elements.epoch_jd(),
            catalog_number: elements.catalog_number,
        })
    }

    fn run(&self, expected: Regime, tsince: f64) -> Result<RawState, TrackerError> {
        if self.regime != expected {
            return Err(TrackerError::PropagationError(format!(
                "{} requested for catalog {}, which is a {} element set",
                expected.label(),
                self.catalog_number,
                self.regime
            )));
        }

        let prediction = self
            .model
            .propagate(sgp4::MinutesSinceEpoch(tsince))
            .map_err(|e| {
                TrackerError::PropagationError(format!(
                    "catalog {} at {tsince} min: {e:?}",
                    self.catalog_number
                ))
            })?;

        Ok(RawState {
            position: Vector3::from(prediction.position),
            velocity: Vector3::from(prediction.velocity),
        })
    }
}

impl Propagator for Sgp4Propagator {
    fn regime(&self) -> Regime {
        self.regime
    }

    fn epoch_jd(&self) -> JD {
        self.epoch_jd
    }

    fn native_units(&self) -> NativeUnits {
        NativeUnits::KILOMETERS
    }

    fn near_earth(&self, tsince: f64) -> Result<RawState, TrackerError> {
        self.run(Regime::NearEarth, tsince)
    }

    fn deep_space(&self, tsince: f64) -> Result<RawState, TrackerError> {
        self.run(Regime::DeepSpace, tsince)
    }
}
