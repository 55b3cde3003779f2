//! # Constants and type definitions for rangerate
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used by the observation pipeline.
//!
//! ## Overview
//!
//! - WGS-72 geophysical constants, the ones the SGP4/SDP4 theory is fitted against
//! - Unit conversions (degrees ↔ radians, days ↔ minutes, Julian ↔ modified Julian dates)
//! - Solar constants used by the analytic solar ephemeris and the shadow model
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a mean solar day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a mean solar day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Julian date of 1900-01-00 12:00 (epoch of the Newcomb solar theory)
pub const JD1900: f64 = 2415020.0;

/// Earth equatorial radius in kilometers (WGS-72)
pub const EARTH_MAJOR_AXIS: f64 = 6378.135;

/// Earth flattening (WGS-72)
pub const EARTH_FLATTENING: f64 = 1.0 / 298.26;

/// Earth polar radius in kilometers (WGS-72)
pub const EARTH_MINOR_AXIS: f64 = EARTH_MAJOR_AXIS * (1.0 - EARTH_FLATTENING);

/// Sidereal rotation rate of the Earth, in revolutions per solar day
pub const EARTH_ROTATION_RATE: f64 = 1.00273790934;

/// Orbital period separating near-Earth from deep-space element sets, in minutes
pub const DEEP_SPACE_PERIOD: f64 = 225.0;

/// Astronomical Unit in kilometers
pub const AU: f64 = 1.49597870691e8;

/// Solar radius in kilometers
pub const SOLAR_RADIUS: f64 = 6.96e5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// NORAD catalog number of an orbiting object
pub type CatalogNumber = u32;
