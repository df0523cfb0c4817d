//! # Conic sections
//!
//! A trajectory around a point mass is one of two conics handled by this crate:
//!
//! - an **ellipse**, `a > 0` and `0 ≤ e ≤ 0.98`,
//! - a **hyperbola**, `a < 0` and `1.02 ≤ e ≤ 5`.
//!
//! The sign of the semi-major axis is the discriminant between the two. It is carried by the
//! variant of [`ConicSection`], so every computation which differs between the conics is
//! written as an exhaustive `match`.
//!
//! Near-parabolic eccentricities, `0.98 < e < 1.02`, are rejected at construction.
//!
//! ## Derived quantities
//!
//! All scalars below are computed on demand from `(a, e)` and never stored separately,
//! with the exception of the hyperbolic turning angle `δ` which is cached in the variant.
//!
//! | Quantity | Expression |
//! |---|---|
//! | semi-latus rectum | `p = a(1 − e²)` |
//! | periapsis radius | `rp = a(1 − e)` |
//! | apoapsis radius (ellipse) | `ra = a(1 + e)` |
//! | periapsis speed | `vp = sqrt(μ/p)(1 + e)` |
//! | angular momentum | `h = rp·vp` |
//! | specific energy | `ε = −μ/(2a)` |
//! | mean motion | `n = sqrt(μ/|a|³)` |
//! | period (ellipse) | `2π/n` |
//! | turning angle (hyperbola) | `δ = 2·asin(1/e)` |
//! | asymptotic true anomaly (hyperbola) | `(π + δ)/2` |
//!
//! Units are canonical: μ = 1, distances in CDU, times in CTU.

use std::f64::consts::PI;

use crate::{
    anomaly::time_since_periapsis,
    conic_errors::ConicError,
    constants::{Ctu, Radian, DPI, ELLIPSE_ECCENTRICITY, HYPERBOLA_ECCENTRICITY, MU_CANONICAL},
};

/// Shape of a Keplerian trajectory.
///
/// Variants
/// -----------------
/// * `Ellipse { a, e }`: closed orbit, `a > 0`.
/// * `Hyperbola { a, e, delta }`: open trajectory, `a < 0`, `delta` is the turning angle
///   `2·asin(1/e)` in radians.
///
/// Build values with [`ConicSection::new`]: a struct literal skips the domain checks and the
/// computation of `delta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConicSection {
    Ellipse { a: f64, e: f64 },
    Hyperbola { a: f64, e: f64, delta: Radian },
}

/// Animated portion of a hyperbola, between the two true anomalies kept at a fixed margin
/// from the asymptotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlybyWindow {
    pub true_anomaly_start: Radian,
    pub true_anomaly_end: Radian,
    /// Time spent inside the window, in CTU.
    pub duration: Ctu,
}

impl ConicSection {
    /// Build a conic from a signed semi-major axis and an eccentricity.
    ///
    /// Arguments
    /// -----------------
    /// * `a`: semi-major axis (CDU), positive for an ellipse, negative for a hyperbola.
    /// * `e`: eccentricity.
    ///
    /// Return
    /// ----------
    /// * The matching [`ConicSection`] variant, or
    ///   - [`ConicError::InvalidSemiMajorAxis`] when `a` is zero or not finite,
    ///   - [`ConicError::ForbiddenEccentricity`] inside the near-parabolic band,
    ///   - [`ConicError::ConicMismatch`] when the sign of `a` contradicts `e`,
    ///   - [`ConicError::EccentricityOutOfDomain`] otherwise.
    pub fn new(a: f64, e: f64) -> Result<Self, ConicError> {
        if !a.is_finite() || a == 0.0 {
            return Err(ConicError::InvalidSemiMajorAxis(a));
        }
        if e > *ELLIPSE_ECCENTRICITY.end() && e < *HYPERBOLA_ECCENTRICITY.start() {
            return Err(ConicError::ForbiddenEccentricity(e));
        }

        if a > 0.0 {
            if ELLIPSE_ECCENTRICITY.contains(&e) {
                Ok(ConicSection::Ellipse { a, e })
            } else if HYPERBOLA_ECCENTRICITY.contains(&e) {
                Err(ConicError::ConicMismatch { a, e })
            } else {
                Err(ConicError::EccentricityOutOfDomain {
                    eccentricity: e,
                    conic: "ellipse",
                })
            }
        } else if HYPERBOLA_ECCENTRICITY.contains(&e) {
            Ok(ConicSection::Hyperbola {
                a,
                e,
                delta: 2.0 * (1.0 / e).asin(),
            })
        } else if ELLIPSE_ECCENTRICITY.contains(&e) {
            Err(ConicError::ConicMismatch { a, e })
        } else {
            Err(ConicError::EccentricityOutOfDomain {
                eccentricity: e,
                conic: "hyperbola",
            })
        }
    }

    /// Switch to the other conic type.
    ///
    /// The magnitude of the semi-major axis is kept, its sign flips, and the eccentricity is
    /// replaced by `new_e` which must belong to the domain of the other conic.
    pub fn toggle(&self, new_e: f64) -> Result<Self, ConicError> {
        ConicSection::new(-self.semi_major_axis(), new_e)
    }

    pub fn semi_major_axis(&self) -> f64 {
        match *self {
            ConicSection::Ellipse { a, .. } | ConicSection::Hyperbola { a, .. } => a,
        }
    }

    pub fn eccentricity(&self) -> f64 {
        match *self {
            ConicSection::Ellipse { e, .. } | ConicSection::Hyperbola { e, .. } => e,
        }
    }

    pub fn is_ellipse(&self) -> bool {
        matches!(self, ConicSection::Ellipse { .. })
    }

    /// Name used in persisted settings and displays.
    pub fn kind(&self) -> &'static str {
        match self {
            ConicSection::Ellipse { .. } => "ellipse",
            ConicSection::Hyperbola { .. } => "hyperbola",
        }
    }

    /// Semi-latus rectum `p = a(1 − e²)`, positive for both conics.
    pub fn semi_latus_rectum(&self) -> f64 {
        let (a, e) = (self.semi_major_axis(), self.eccentricity());
        a * (1.0 - e * e)
    }

    pub fn periapsis_radius(&self) -> f64 {
        self.semi_major_axis() * (1.0 - self.eccentricity())
    }

    /// Apoapsis radius `a(1 + e)`, only defined for an ellipse.
    pub fn apoapsis_radius(&self) -> Option<f64> {
        match *self {
            ConicSection::Ellipse { a, e } => Some(a * (1.0 + e)),
            ConicSection::Hyperbola { .. } => None,
        }
    }

    pub fn periapsis_speed(&self) -> f64 {
        (MU_CANONICAL / self.semi_latus_rectum()).sqrt() * (1.0 + self.eccentricity())
    }

    /// Specific angular momentum `h = rp·vp`.
    pub fn angular_momentum(&self) -> f64 {
        self.periapsis_radius() * self.periapsis_speed()
    }

    /// Specific mechanical energy `ε = −μ/(2a)`, negative for an ellipse.
    pub fn specific_energy(&self) -> f64 {
        -MU_CANONICAL / (2.0 * self.semi_major_axis())
    }

    pub fn mean_motion(&self) -> f64 {
        (MU_CANONICAL / self.semi_major_axis().abs().powi(3)).sqrt()
    }

    /// Orbital period in CTU, only defined for an ellipse.
    pub fn period(&self) -> Option<Ctu> {
        match self {
            ConicSection::Ellipse { .. } => Some(DPI / self.mean_motion()),
            ConicSection::Hyperbola { .. } => None,
        }
    }

    /// Hyperbolic turning angle `δ`.
    pub fn turning_angle(&self) -> Option<Radian> {
        match *self {
            ConicSection::Ellipse { .. } => None,
            ConicSection::Hyperbola { delta, .. } => Some(delta),
        }
    }

    /// True anomaly of the outgoing asymptote, `(π + δ)/2`.
    ///
    /// A hyperbolic trajectory only exists for `|ν|` strictly below this value.
    pub fn asymptote_true_anomaly(&self) -> Option<Radian> {
        self.turning_angle().map(|delta| (PI + delta) / 2.0)
    }

    /// Portion of a hyperbola which is sampled and animated.
    ///
    /// Arguments
    /// -----------------
    /// * `margin`: angular distance kept from each asymptote (radians).
    ///
    /// Return
    /// ----------
    /// * `None` for an ellipse, otherwise the window `[−ν∞ + margin, ν∞ − margin]` and the
    ///   time needed to cross it.
    pub fn flyby_window(&self, margin: Radian) -> Option<FlybyWindow> {
        let limit = self.asymptote_true_anomaly()? - margin;
        let half = time_since_periapsis(self, limit)?;
        Some(FlybyWindow {
            true_anomaly_start: -limit,
            true_anomaly_end: limit,
            duration: 2.0 * half,
        })
    }

    /// Period of an ellipse or flyby duration of a hyperbola, in CTU.
    ///
    /// This is the time span used to gate time scales and to report a duration in both cases.
    pub fn characteristic_duration(&self, margin: Radian) -> Option<Ctu> {
        match self {
            ConicSection::Ellipse { .. } => self.period(),
            ConicSection::Hyperbola { .. } => self.flyby_window(margin).map(|w| w.duration),
        }
    }
}
