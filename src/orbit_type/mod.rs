//! # Orbital element set
//!
//! This module holds the **single source of truth** of an animated trajectory:
//!
//! - [`conic_section`](crate::orbit_type::conic_section): Shape of the conic `(a, e)` as a tagged
//!   enum, with every derived scalar (`p`, `rp`, `ra`, `vp`, `h`, `ε`, `n`, period, `δ`).
//! - [`Orientation`]: The three Euler angles `(Ω, i, ω)` placing the perifocal frame in the
//!   inertial frame of the central body.
//! - [`OrbitalElements`]: Shape and orientation together.
//!
//! Angles are stored in radians. Degree constructors and accessors are provided for callers
//! working at the user-facing boundary.
//!
//! ## Typical workflow
//!
//! ```rust, no_run
//! use conic_orbit::orbit_type::{OrbitalElements, Orientation};
//! use conic_orbit::orbit_type::conic_section::ConicSection;
//!
//! let conic = ConicSection::new(3.822, 0.7318).unwrap();
//! let elements = OrbitalElements::new(conic, Orientation::from_degrees(0.0, -28.0, -81.0));
//!
//! println!("{elements}");
//! println!("rp = {}", elements.conic.periapsis_radius());
//! ```
use std::fmt;

use tracing::warn;

use crate::{
    constants::{Degree, Radian, DEGRAD, RADEG},
    orbit_type::conic_section::ConicSection,
};

/// Ellipse and hyperbola shapes and their derived scalars.
pub mod conic_section;

/// Orientation of the perifocal frame with respect to the inertial frame.
///
/// Units
/// -----
/// * `ascending_node_longitude`: radians (Ω).
/// * `inclination`: radians (i).
/// * `periapsis_argument`: radians (ω).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub ascending_node_longitude: Radian,
    pub inclination: Radian,
    pub periapsis_argument: Radian,
}

impl Orientation {
    pub fn new(
        ascending_node_longitude: Radian,
        inclination: Radian,
        periapsis_argument: Radian,
    ) -> Self {
        Orientation {
            ascending_node_longitude,
            inclination,
            periapsis_argument,
        }
    }

    /// Build an orientation from angles given in degrees, in the order `(Ω, i, ω)`.
    pub fn from_degrees(
        ascending_node_longitude: Degree,
        inclination: Degree,
        periapsis_argument: Degree,
    ) -> Self {
        Orientation::new(
            ascending_node_longitude * RADEG,
            inclination * RADEG,
            periapsis_argument * RADEG,
        )
    }

    pub fn ascending_node_longitude_deg(&self) -> Degree {
        self.ascending_node_longitude * DEGRAD
    }

    pub fn inclination_deg(&self) -> Degree {
        self.inclination * DEGRAD
    }

    pub fn periapsis_argument_deg(&self) -> Degree {
        self.periapsis_argument * DEGRAD
    }
}

/// Outcome of the periapsis check against the central body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriapsisStatus {
    Clear,
    /// The periapsis radius is below the radius of the central body.
    IntersectsBody,
}

/// Shape and orientation of a two-body trajectory, in canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub conic: ConicSection,
    pub orientation: Orientation,
}

impl OrbitalElements {
    pub fn new(conic: ConicSection, orientation: Orientation) -> Self {
        OrbitalElements { conic, orientation }
    }

    /// Compare the periapsis radius with the radius of the central body.
    ///
    /// Arguments
    /// -----------------
    /// * `body_radius`: radius of the central body in CDU.
    ///
    /// Return
    /// ----------
    /// * [`PeriapsisStatus::IntersectsBody`] when `rp < body_radius`. A warning is logged but
    ///   nothing else is blocked: the trajectory stays fully usable.
    pub fn periapsis_status(&self, body_radius: f64) -> PeriapsisStatus {
        let rp = self.conic.periapsis_radius();
        if rp < body_radius {
            warn!(
                periapsis_radius = rp,
                body_radius, "periapsis lies below the surface of the central body"
            );
            PeriapsisStatus::IntersectsBody
        } else {
            PeriapsisStatus::Clear
        }
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conic = &self.conic;
        writeln!(f, "Orbital Elements ({})", conic.kind())?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} CDU",
            conic.semi_major_axis()
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            conic.eccentricity()
        )?;
        writeln!(
            f,
            "  p   (semi-latus rectum)     = {:.6} CDU",
            conic.semi_latus_rectum()
        )?;
        if let Some(delta) = conic.turning_angle() {
            writeln!(
                f,
                "  δ   (turning angle)         = {:.6} rad ({:.6}°)",
                delta,
                delta * DEGRAD
            )?;
        }
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.orientation.ascending_node_longitude,
            self.orientation.ascending_node_longitude_deg()
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.orientation.inclination,
            self.orientation.inclination_deg()
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.6}°)",
            self.orientation.periapsis_argument,
            self.orientation.periapsis_argument_deg()
        )
    }
}

#[cfg(test)]
mod orbital_elements_test {
    use super::*;
    use approx::assert_relative_eq;

    fn transfer_orbit() -> OrbitalElements {
        OrbitalElements::new(
            ConicSection::new(3.822, 0.7318).unwrap(),
            Orientation::from_degrees(0.0, -28.0, -81.0),
        )
    }

    #[test]
    fn test_orientation_degrees() {
        let orientation = Orientation::from_degrees(10.0, -28.0, -81.0);
        assert_relative_eq!(orientation.inclination_deg(), -28.0, epsilon = 1e-12);
        assert_relative_eq!(orientation.periapsis_argument_deg(), -81.0, epsilon = 1e-12);
        assert_relative_eq!(
            orientation.ascending_node_longitude,
            10.0_f64.to_radians(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_periapsis_status() {
        let elements = transfer_orbit();
        assert_eq!(elements.periapsis_status(1.0), PeriapsisStatus::Clear);
        assert_eq!(
            elements.periapsis_status(1.1),
            PeriapsisStatus::IntersectsBody
        );
    }

    #[test]
    fn test_display() {
        let text = transfer_orbit().to_string();
        assert!(text.starts_with("Orbital Elements (ellipse)"));
        assert!(text.contains("a   (semi-major axis)       = 3.822000 CDU"));
        assert!(text.contains("(-28.000000°)"));
        assert!(!text.contains("turning angle"));
    }
}
