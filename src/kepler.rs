//! # Universal-variable Kepler solver
//!
//! Two-body propagation of a state along a conic, written with the **universal variable**
//! `x` so that ellipses and hyperbolas share one iteration.
//!
//! ## Overview
//!
//! Given a time of flight `Δt`, the radius `r0` and the radial product `σ0 = r0·v0` of the
//! starting state, and the signed semi-major axis `a`, the universal Kepler equation
//!
//! ```text
//! √μ Δt = σ0/√μ x² c(z) + (1 − r0/a) x³ s(z) + r0 x,      z = x²/a
//! ```
//!
//! is solved for `x` with Newton–Raphson. The Stumpff-like auxiliaries `c(z)` and `s(z)` are
//! evaluated in trigonometric form for `z > 0` (ellipse), in hyperbolic form for `z < 0`
//! (hyperbola) and by power series close to `z = 0`.
//!
//! The converged `x` yields the **Lagrange coefficients** `f, g, ḟ, ġ`, from which the state at
//! `Δt` is a linear combination of the starting state:
//!
//! ```text
//! r = f r0 + g v0        v = ḟ r0 + ġ v0
//! ```
//!
//! Conservation of angular momentum imposes `f ġ − g ḟ = 1`, which is the main consistency
//! check applied to every propagation.
//!
//! ## Convergence
//!
//! The iteration stops once the time residual drops below the tolerance, or after the
//! iteration cap. A capped run is **not** an error: the last iterate is returned with
//! `converged = false` and the caller decides how loud to be about it.
//!
//! ## See also
//!
//! * Bate, Mueller & White, *Fundamentals of Astrodynamics* (1971), ch. 4.
//! * [`crate::anomaly`] – closed-form time of flight from a true anomaly.
use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::{
    constants::{DEFAULT_MAX_NEWTON_ITERATIONS, DEFAULT_NEWTON_TOLERANCE, DPI, MU_CANONICAL},
    orbit_type::conic_section::ConicSection,
};

/// Below this magnitude of `z` the auxiliaries are evaluated by series.
const SERIES_THRESHOLD: f64 = 1e-2;

/// Stumpff-like auxiliary functions `(c(z), s(z))`.
///
/// ```text
/// z > 0:  c = (1 − cos √z)/z            s = (√z − sin √z)/√z³
/// z < 0:  c = (1 − cosh √−z)/z          s = (sinh √−z − √−z)/√(−z)³
/// z ≈ 0:  c = Σ (−z)^k/(2k+2)!          s = Σ (−z)^k/(2k+3)!
/// ```
pub fn stumpff(z: f64) -> (f64, f64) {
    if z.abs() < SERIES_THRESHOLD {
        const JMAX: usize = 20;
        let contr = 100.0 * f64::EPSILON;

        let mut term_c = 0.5;
        let mut term_s = 1.0 / 6.0;
        let mut c = term_c;
        let mut s = term_s;
        for j in 1..=JMAX {
            let k = j as f64;
            term_c *= -z / ((2.0 * k + 1.0) * (2.0 * k + 2.0));
            term_s *= -z / ((2.0 * k + 2.0) * (2.0 * k + 3.0));
            c += term_c;
            s += term_s;
            if term_c.abs() < contr && term_s.abs() < contr {
                break;
            }
        }
        (c, s)
    } else if z > 0.0 {
        let sz = z.sqrt();
        ((1.0 - sz.cos()) / z, (sz - sz.sin()) / sz.powi(3))
    } else {
        let sz = (-z).sqrt();
        ((1.0 - sz.cosh()) / z, (sz.sinh() - sz) / sz.powi(3))
    }
}

/// Principal value of an angle in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Difference `a − b` brought back to `[−π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Iteration controls of the Newton–Raphson loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub max_iterations: usize,
    /// Threshold on `|Δt − t_n|`, in CTU.
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            max_iterations: DEFAULT_MAX_NEWTON_ITERATIONS,
            tolerance: DEFAULT_NEWTON_TOLERANCE,
        }
    }
}

/// Result of the universal Kepler iteration.
///
/// Fields
/// -----------------
/// * `x`: universal variable.
/// * `z`: `x²/a`.
/// * `c`, `s`: auxiliaries evaluated at `z`.
/// * `time_reached`: time of flight `t_n` actually matched by `x` (CTU).
/// * `iterations`: Newton steps taken.
/// * `converged`: `false` when the cap was hit or the derivative degenerated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniversalSolution {
    pub x: f64,
    pub z: f64,
    pub c: f64,
    pub s: f64,
    pub time_reached: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Starting value of the universal variable.
///
/// Arguments
/// -----------------
/// * `dt`: time of flight (CTU), may be negative.
/// * `r0`: initial radius (CDU).
/// * `sigma0`: `r0·v0` of the initial state.
/// * `a`: signed semi-major axis (CDU).
///
/// Return
/// ----------
/// * Ellipse: `√μ Δt / a`.
/// * Hyperbola: the logarithmic estimate
///   `sign(Δt) √−a ln(−2μΔt / (a (σ0 + sign(Δt) √(−μa) (1 − r0/a))))`, replaced by the linear
///   estimate `√μ Δt / r0` when it is not finite or points the wrong way.
pub fn initial_guess(dt: f64, r0: f64, sigma0: f64, a: f64) -> f64 {
    let sqrt_mu = MU_CANONICAL.sqrt();
    if dt == 0.0 {
        return 0.0;
    }
    if a > 0.0 {
        return sqrt_mu * dt / a;
    }

    let sign = dt.signum();
    let denominator = a * (sigma0 + sign * (-MU_CANONICAL * a).sqrt() * (1.0 - r0 / a));
    let x0 = sign * (-a).sqrt() * (-2.0 * MU_CANONICAL * dt / denominator).ln();

    if x0.is_finite() && x0 * dt > 0.0 {
        x0
    } else {
        sqrt_mu * dt / r0
    }
}

/// Evaluate `(z, c, s, t_n, dt/dx)` at a trial universal variable.
fn kepler_terms(x: f64, r0: f64, sigma0: f64, a: f64) -> (f64, f64, f64, f64, f64) {
    let sqrt_mu = MU_CANONICAL.sqrt();
    let z = x * x / a;
    let (c, s) = stumpff(z);

    let x2 = x * x;
    let tn = (sigma0 * x2 * c / sqrt_mu + (1.0 - r0 / a) * x2 * x * s + r0 * x) / sqrt_mu;
    let dtdx = (x2 * c + sigma0 * x * (1.0 - z * s) / sqrt_mu + r0 * (1.0 - z * c)) / sqrt_mu;

    (z, c, s, tn, dtdx)
}

/// Solve the universal Kepler equation with Newton–Raphson.
///
/// Arguments
/// -----------------
/// * `dt`: time of flight `t − t0` (CTU).
/// * `r0`: initial radius (CDU).
/// * `sigma0`: `r0·v0` of the initial state.
/// * `a`: signed semi-major axis (CDU).
/// * `settings`: iteration cap and tolerance.
///
/// Return
/// ----------
/// * A [`UniversalSolution`] whose auxiliaries and `time_reached` are evaluated at the final
///   iterate. Non-convergence is reported through the `converged` flag, never as an error.
pub fn solve_universal(
    dt: f64,
    r0: f64,
    sigma0: f64,
    a: f64,
    settings: &SolverSettings,
) -> UniversalSolution {
    let mut x = initial_guess(dt, r0, sigma0, a);
    let mut converged = false;
    let mut iterations = 0;

    while iterations < settings.max_iterations {
        iterations += 1;
        let (_, _, _, tn, dtdx) = kepler_terms(x, r0, sigma0, a);
        if !dtdx.is_finite() || dtdx <= 0.0 {
            break;
        }

        let residual = dt - tn;
        x += residual / dtdx;

        if residual.abs() < settings.tolerance {
            converged = true;
            break;
        }
    }

    let (z, c, s, time_reached, _) = kepler_terms(x, r0, sigma0, a);
    UniversalSolution {
        x,
        z,
        c,
        s,
        time_reached,
        iterations,
        converged,
    }
}

/// Lagrange coefficients of a propagation and the radius reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagrangeCoefficients {
    pub f: f64,
    pub g: f64,
    pub f_dot: f64,
    pub g_dot: f64,
    pub r: f64,
}

impl LagrangeCoefficients {
    /// `f ġ − g ḟ`, equal to one for an exact two-body propagation.
    pub fn wronskian(&self) -> f64 {
        self.f * self.g_dot - self.g * self.f_dot
    }
}

/// Output of [`propagate_from_periapsis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerifocalPropagation {
    pub coefficients: LagrangeCoefficients,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub solution: UniversalSolution,
}

/// Propagate from periapsis by a time of flight, in the perifocal frame.
///
/// The reference state is `r0 = (rp, 0, 0)`, `v0 = (0, vp, 0)`, hence `σ0 = 0` and
///
/// ```text
/// f = 1 − x² c / rp          g = t_n − x³ s / √μ
/// r = |f r0 + g v0|
/// ḟ = √μ x (z s − 1) / (rp r)    ġ = 1 − x² c / r
/// ```
///
/// `g` uses the time of flight matched by the final iterate so that `f ġ − g ḟ = 1` holds to
/// round-off even when the Newton loop stops on a loose tolerance.
///
/// Arguments
/// -----------------
/// * `conic`: shape of the trajectory.
/// * `dt`: time since periapsis (CTU).
/// * `settings`: Newton controls.
///
/// Return
/// ----------
/// * Position, velocity, Lagrange coefficients and the raw solver output.
pub fn propagate_from_periapsis(
    conic: &ConicSection,
    dt: f64,
    settings: &SolverSettings,
) -> PerifocalPropagation {
    let sqrt_mu = MU_CANONICAL.sqrt();
    let rp = conic.periapsis_radius();
    let vp = conic.periapsis_speed();
    let r0 = Vector3::new(rp, 0.0, 0.0);
    let v0 = Vector3::new(0.0, vp, 0.0);

    let solution = solve_universal(dt, rp, 0.0, conic.semi_major_axis(), settings);
    let UniversalSolution { x, z, c, s, .. } = solution;

    let f = 1.0 - x * x * c / rp;
    let g = solution.time_reached - x.powi(3) * s / sqrt_mu;
    let position = f * r0 + g * v0;
    let r = position.norm();

    let f_dot = sqrt_mu * x * (z * s - 1.0) / (rp * r);
    let g_dot = 1.0 - x * x * c / r;
    let velocity = f_dot * r0 + g_dot * v0;

    PerifocalPropagation {
        coefficients: LagrangeCoefficients {
            f,
            g,
            f_dot,
            g_dot,
            r,
        },
        position,
        velocity,
        solution,
    }
}
