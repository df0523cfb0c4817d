//! # Anomaly conversions
//!
//! Closed-form, non-iterative maps between the true anomaly `ν`, the auxiliary anomaly
//! (eccentric `E` for an ellipse, hyperbolic `F` for a hyperbola), the mean anomaly `M` and
//! the time since periapsis `t = M/n`.
//!
//! ## Overview
//!
//! Ellipse:
//!
//! ```text
//! cos E = (e + cos ν) / (1 + e cos ν),   E ∈ [0, π] signed with ν
//! M     = E − e sin E
//! ```
//!
//! Hyperbola, only for `|ν| < (π + δ)/2`:
//!
//! ```text
//! cosh F = (e + cos ν) / (1 + e cos ν),  F signed with ν
//! M      = e sinh F − F
//! ```
//!
//! Beyond the asymptote the trajectory does not exist and every function of this module
//! returns `None`.
//!
//! The module also exposes the exact conic state at a given true anomaly, which is used to
//! cross-check the universal-variable propagation and for one-shot queries.

use nalgebra::Vector3;

use crate::{
    constants::{Radian, MU_CANONICAL},
    orbit_type::conic_section::ConicSection,
};

/// Eccentric or hyperbolic anomaly, depending on the conic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuxiliaryAnomaly {
    Eccentric(Radian),
    Hyperbolic(Radian),
}

impl AuxiliaryAnomaly {
    pub fn value(&self) -> Radian {
        match *self {
            AuxiliaryAnomaly::Eccentric(x) | AuxiliaryAnomaly::Hyperbolic(x) => x,
        }
    }
}

/// Every anomaly describing one point of a conic.
///
/// Fields
/// -----------------
/// * `true_anomaly`: ν (radians).
/// * `auxiliary`: E or F (radians).
/// * `mean_anomaly`: M (radians).
/// * `time_since_periapsis`: t = M/n (CTU), negative before periapsis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalySet {
    pub true_anomaly: Radian,
    pub auxiliary: AuxiliaryAnomaly,
    pub mean_anomaly: Radian,
    pub time_since_periapsis: f64,
}

/// Ratio `(e + cos ν)/(1 + e cos ν)`, the cosine of E or the hyperbolic cosine of F.
fn auxiliary_cosine(e: f64, true_anomaly: Radian) -> f64 {
    let cos_nu = true_anomaly.cos();
    (e + cos_nu) / (1.0 + e * cos_nu)
}

fn signed_like(value: f64, reference: f64) -> f64 {
    if reference < 0.0 {
        -value
    } else {
        value
    }
}

/// Compute the auxiliary, mean anomaly and time since periapsis at a true anomaly.
///
/// Arguments
/// -----------------
/// * `conic`: shape of the trajectory.
/// * `true_anomaly`: ν in radians, in `[−π, π]`.
///
/// Return
/// ----------
/// * `None` if `ν` lies on or beyond a hyperbolic asymptote.
pub fn anomalies(conic: &ConicSection, true_anomaly: Radian) -> Option<AnomalySet> {
    let n = conic.mean_motion();
    let (auxiliary, mean_anomaly) = match *conic {
        ConicSection::Ellipse { e, .. } => {
            let big_e = signed_like(
                auxiliary_cosine(e, true_anomaly).clamp(-1.0, 1.0).acos(),
                true_anomaly,
            );
            (
                AuxiliaryAnomaly::Eccentric(big_e),
                big_e - e * big_e.sin(),
            )
        }
        ConicSection::Hyperbola { e, delta, .. } => {
            if true_anomaly.abs() >= (std::f64::consts::PI + delta) / 2.0 {
                return None;
            }
            let cosh_f = auxiliary_cosine(e, true_anomaly);
            if !cosh_f.is_finite() {
                return None;
            }
            // rounding can bring the ratio a hair below one close to periapsis
            let big_f = signed_like(cosh_f.max(1.0).acosh(), true_anomaly);
            (
                AuxiliaryAnomaly::Hyperbolic(big_f),
                e * big_f.sinh() - big_f,
            )
        }
    };

    Some(AnomalySet {
        true_anomaly,
        auxiliary,
        mean_anomaly,
        time_since_periapsis: mean_anomaly / n,
    })
}

/// Time since periapsis at a true anomaly, in CTU.
///
/// Equivalent to `anomalies(conic, ν).map(|set| set.time_since_periapsis)`.
pub fn time_since_periapsis(conic: &ConicSection, true_anomaly: Radian) -> Option<f64> {
    anomalies(conic, true_anomaly).map(|set| set.time_since_periapsis)
}

/// True anomaly from the eccentric anomaly of an ellipse.
///
/// ```text
/// tan(ν/2) = sqrt((1 + e)/(1 − e)) tan(E/2)
/// ```
pub fn true_from_eccentric(e: f64, eccentric_anomaly: Radian) -> Radian {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
}

/// True anomaly from the hyperbolic anomaly of a hyperbola.
///
/// ```text
/// tan(ν/2) = sqrt((e + 1)/(e − 1)) tanh(F/2)
/// ```
pub fn true_from_hyperbolic(e: f64, hyperbolic_anomaly: Radian) -> Radian {
    let half = hyperbolic_anomaly / 2.0;
    2.0 * ((e + 1.0).sqrt() * half.sinh()).atan2((e - 1.0).sqrt() * half.cosh())
}

/// Exact position and velocity on the conic, in the perifocal frame.
///
/// ```text
/// r = p / (1 + e cos ν) · (cos ν, sin ν, 0)
/// v = sqrt(μ/p) · (−sin ν, e + cos ν, 0)
/// ```
///
/// Return
/// ----------
/// * `None` beyond a hyperbolic asymptote.
pub fn state_at_true_anomaly(
    conic: &ConicSection,
    true_anomaly: Radian,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    if let Some(limit) = conic.asymptote_true_anomaly() {
        if true_anomaly.abs() >= limit {
            return None;
        }
    }
    let e = conic.eccentricity();
    let p = conic.semi_latus_rectum();
    let (sin_nu, cos_nu) = true_anomaly.sin_cos();

    let radius = p / (1.0 + e * cos_nu);
    let speed_factor = (MU_CANONICAL / p).sqrt();

    Some((
        Vector3::new(radius * cos_nu, radius * sin_nu, 0.0),
        Vector3::new(-speed_factor * sin_nu, speed_factor * (e + cos_nu), 0.0),
    ))
}
