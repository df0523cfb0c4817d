use std::cmp::Ordering::{Equal, Greater, Less};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use crate::{
    conic_errors::ConicError,
    constants::{
        DEFAULT_HYPERBOLIC_MARGIN, DEFAULT_MAX_NEWTON_ITERATIONS, DEFAULT_NEWTON_TOLERANCE,
        DEFAULT_TABLE_SIZE, DEFAULT_TIME_SCALE_FRACTION, HYPERBOLA_ECCENTRICITY,
    },
    kepler::SolverSettings,
    trajectories::TableSettings,
};

/// Tunable parameters of an [`OrbitSession`](crate::session::OrbitSession).
///
/// Fields
/// -----------------
/// * `table_size`: number of true anomalies sampled over [−180°, 180°] (≥ 3, and fine
///   enough to keep two samples in every flyby window).
/// * `max_newton_iterations`: iteration cap of the universal-variable solver (≥ 1).
/// * `newton_tolerance`: threshold on the time residual, in CTU (> 0).
/// * `hyperbolic_margin`: angular margin kept before each asymptote, radians, in `[0, π/2)`.
/// * `time_scale_fraction`: largest admissible ratio between a time scale and the period
///   (or flyby duration), in `(0, 1]`.
///
/// See also
/// -----------------
/// * [`SessionParams::builder`] – validated construction.
/// * [`TableSettings`] – subset handed to the table builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParams {
    pub table_size: usize,
    pub max_newton_iterations: usize,
    pub newton_tolerance: f64,
    pub hyperbolic_margin: f64,
    pub time_scale_fraction: f64,
}

impl SessionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SessionParamsBuilder`] to override the defaults step by step.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conic_orbit::session::params::SessionParams;
    ///
    /// let params = SessionParams::builder()
    ///     .table_size(361)
    ///     .newton_tolerance(1e-6)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.table_size, 361);
    /// ```
    pub fn builder() -> SessionParamsBuilder {
        SessionParamsBuilder::new()
    }

    /// Newton controls of the universal-variable solver.
    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            max_iterations: self.max_newton_iterations,
            tolerance: self.newton_tolerance,
        }
    }

    /// Settings of a trajectory table build.
    pub fn table_settings(&self) -> TableSettings {
        TableSettings {
            size: self.table_size,
            hyperbolic_margin: self.hyperbolic_margin,
            solver: self.solver_settings(),
        }
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        SessionParams {
            table_size: DEFAULT_TABLE_SIZE,
            max_newton_iterations: DEFAULT_MAX_NEWTON_ITERATIONS,
            newton_tolerance: DEFAULT_NEWTON_TOLERANCE,
            hyperbolic_margin: DEFAULT_HYPERBOLIC_MARGIN,
            time_scale_fraction: DEFAULT_TIME_SCALE_FRACTION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionParamsBuilder {
    params: SessionParams,
}

impl Default for SessionParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: SessionParams::default(),
        }
    }

    pub fn table_size(mut self, v: usize) -> Self {
        self.params.table_size = v;
        self
    }
    pub fn max_newton_iterations(mut self, v: usize) -> Self {
        self.params.max_newton_iterations = v;
        self
    }
    pub fn newton_tolerance(mut self, v: f64) -> Self {
        self.params.newton_tolerance = v;
        self
    }
    pub fn hyperbolic_margin(mut self, v: f64) -> Self {
        self.params.hyperbolic_margin = v;
        self
    }
    pub fn time_scale_fraction(mut self, v: f64) -> Self {
        self.params.time_scale_fraction = v;
        self
    }

    // ---- Numeric helpers for PartialOrd (handle NaN as invalid) ----

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Return true iff a <= b and comparable (i.e., not NaN).
    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Half-width of the flyby window of the most eccentric hyperbola, radians.
    #[inline]
    fn narrowest_window(margin: f64) -> f64 {
        let delta = 2.0 * (1.0 / HYPERBOLA_ECCENTRICITY.end()).asin();
        (PI + delta) / 2.0 - margin
    }

    /// Finalize the builder and produce a [`SessionParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `table_size >= 3` – at least one interior sample between −180° and 180°.
    /// * `max_newton_iterations >= 1`.
    /// * `newton_tolerance > 0`.
    /// * `0 <= hyperbolic_margin < π/2`.
    /// * the angular step `360°/(table_size − 1)` fits inside the flyby window of `e = 5`
    ///   at that margin, so every hyperbola keeps at least two samples.
    /// * `0 < time_scale_fraction <= 1`.
    ///
    /// Return
    /// ----------
    /// * [`ConicError::InvalidSessionParameter`] naming the first rule broken.
    pub fn build(self) -> Result<SessionParams, ConicError> {
        let p = &self.params;

        if p.table_size < 3 {
            return Err(ConicError::InvalidSessionParameter(
                "table_size must be >= 3".into(),
            ));
        }
        if p.max_newton_iterations == 0 {
            return Err(ConicError::InvalidSessionParameter(
                "max_newton_iterations must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.newton_tolerance) {
            return Err(ConicError::InvalidSessionParameter(
                "newton_tolerance must be > 0".into(),
            ));
        }
        if !(Self::ge0(p.hyperbolic_margin) && p.hyperbolic_margin < FRAC_PI_2) {
            return Err(ConicError::InvalidSessionParameter(
                "hyperbolic_margin must lie in [0, π/2)".into(),
            ));
        }
        let step = TAU / (p.table_size - 1) as f64;
        if !Self::le(step, Self::narrowest_window(p.hyperbolic_margin)) {
            return Err(ConicError::InvalidSessionParameter(
                "table_size too small for the flyby window of e = 5".into(),
            ));
        }
        if !(Self::gt0(p.time_scale_fraction) && Self::le(p.time_scale_fraction, 1.0)) {
            return Err(ConicError::InvalidSessionParameter(
                "time_scale_fraction must lie in (0, 1]".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session Parameters")?;
        writeln!(f, "------------------")?;
        writeln!(f, "  table_size            = {}", self.table_size)?;
        writeln!(f, "  max_newton_iterations = {}", self.max_newton_iterations)?;
        writeln!(f, "  newton_tolerance      = {:e}", self.newton_tolerance)?;
        writeln!(f, "  hyperbolic_margin     = {:.6} rad", self.hyperbolic_margin)?;
        writeln!(f, "  time_scale_fraction   = {}", self.time_scale_fraction)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SessionParams::builder().build().unwrap();
        assert_eq!(params, SessionParams::default());
        assert_eq!(params.table_settings(), TableSettings::default());
        assert_eq!(params.solver_settings(), SolverSettings::default());
    }

    #[test]
    fn test_overrides() {
        let params = SessionParams::builder()
            .table_size(361)
            .max_newton_iterations(10)
            .newton_tolerance(1e-9)
            .hyperbolic_margin(0.0)
            .time_scale_fraction(1.0)
            .build()
            .unwrap();
        assert_eq!(params.table_settings().size, 361);
        assert_eq!(params.table_settings().step_deg(), 1.0);
        assert_eq!(params.solver_settings().max_iterations, 10);
    }

    #[test]
    fn test_validation() {
        let invalid = [
            SessionParams::builder().table_size(2),
            SessionParams::builder().table_size(3),
            SessionParams::builder()
                .table_size(11)
                .hyperbolic_margin(1.5),
            SessionParams::builder().max_newton_iterations(0),
            SessionParams::builder().newton_tolerance(0.0),
            SessionParams::builder().newton_tolerance(f64::NAN),
            SessionParams::builder().hyperbolic_margin(-0.1),
            SessionParams::builder().hyperbolic_margin(FRAC_PI_2),
            SessionParams::builder().time_scale_fraction(0.0),
            SessionParams::builder().time_scale_fraction(1.5),
        ];
        for builder in invalid {
            assert!(matches!(
                builder.build(),
                Err(ConicError::InvalidSessionParameter(_))
            ));
        }
    }

    #[test]
    fn test_table_size_follows_margin() {
        // 36° steps: fine at the default margin, too coarse when 1.5 rad is kept
        assert!(SessionParams::builder().table_size(11).build().is_ok());
        assert_eq!(
            SessionParams::builder()
                .table_size(11)
                .hyperbolic_margin(1.5)
                .build(),
            Err(ConicError::InvalidSessionParameter(
                "table_size too small for the flyby window of e = 5".into()
            ))
        );
        assert!(SessionParams::builder()
            .table_size(33)
            .hyperbolic_margin(1.55)
            .build()
            .is_ok());
    }

    #[test]
    fn test_display() {
        let text = SessionParams::default().to_string();
        assert!(text.contains("table_size            = 181"));
        assert!(text.contains("newton_tolerance      = 1e-3"));
    }
}
