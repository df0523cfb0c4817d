//! # Constants and type definitions for conic-orbit
//!
//! This module centralizes the **canonical-unit constants**, **angle conversions**,
//! and the **default tuning values** used by the propagation engine.
//!
//! ## Overview
//!
//! - Canonical gravitational parameter (mu = 1 in every unit system of this crate)
//! - Unit conversions (degrees ↔ radians)
//! - Eccentricity domains for ellipses and hyperbolas
//! - Defaults for the trajectory table and the universal-variable solver
//! - Core type aliases used across the crate
//!
//! All orbital quantities are expressed in the canonical units of one central body:
//! one canonical distance unit (CDU) and one canonical time unit (CTU) chosen so that
//! the gravitational parameter equals one.

use std::ops::RangeInclusive;

// -------------------------------------------------------------------------------------------------
// Canonical units and angle conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Gravitational parameter in canonical units (CDU³/CTU²)
pub const MU_CANONICAL: f64 = 1.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Conic domains
// -------------------------------------------------------------------------------------------------

/// Eccentricities accepted for elliptic orbits.
pub const ELLIPSE_ECCENTRICITY: RangeInclusive<f64> = 0.0..=0.98;

/// Eccentricities accepted for hyperbolic trajectories.
///
/// The band between the two domains is rejected: the universal-variable iteration
/// needs too many steps close to the parabola.
pub const HYPERBOLA_ECCENTRICITY: RangeInclusive<f64> = 1.02..=5.0;

// -------------------------------------------------------------------------------------------------
// Engine defaults
// -------------------------------------------------------------------------------------------------

/// Number of entries of a trajectory table (2° steps from -180° to +180°).
pub const DEFAULT_TABLE_SIZE: usize = 181;

/// Iteration cap of the universal-variable Newton–Raphson loop.
pub const DEFAULT_MAX_NEWTON_ITERATIONS: usize = 50;

/// Convergence threshold on the time residual, in CTU.
pub const DEFAULT_NEWTON_TOLERANCE: f64 = 1e-3;

/// Angular margin kept before each hyperbolic asymptote (radians).
pub const DEFAULT_HYPERBOLIC_MARGIN: f64 = std::f64::consts::PI / 10.0;

/// Largest admissible time scale, as a fraction of the period.
pub const DEFAULT_TIME_SCALE_FRACTION: f64 = 0.1;

/// Nominal wall-clock duration of one animation frame (60 fps), in seconds.
pub const NOMINAL_FRAME_SECONDS: f64 = 1.0 / 60.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Time in seconds
pub type Second = f64;
/// Distance in canonical distance units
pub type Cdu = f64;
/// Time in canonical time units
pub type Ctu = f64;
