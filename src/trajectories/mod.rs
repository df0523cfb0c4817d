//! # Trajectory table
//!
//! A trajectory table is a discretized conic: the Lagrange coefficients of the periapsis state
//! sampled at evenly spaced true anomalies, with the matching time of flight. The animation
//! interpolates between neighbouring entries instead of solving Kepler's problem at every
//! frame.
//!
//! ## Overview
//! -----------------
//! - [`TrajectoryTable::build`] samples ν from −180° to +180° (`N` entries, 2° steps for the
//!   default `N = 181`), computes the time of flight of each ν in closed form
//!   ([`crate::anomaly`]) and propagates the periapsis state with the universal variable
//!   ([`crate::kepler`]).
//! - On a hyperbola, true anomalies closer than the margin `th` to an asymptote are skipped
//!   and counted, so the table only covers the flyby window.
//! - Samples whose Newton iteration hit the cap are kept, their indices are recorded and a
//!   warning is logged.
//! - [`interpolation`](crate::trajectories::interpolation) walks the table at animation
//!   rate; [`trajectory_file`](crate::trajectories::trajectory_file) exports it as CSV.
//!
//! ## Data model
//! -----------------
//! Entries are stored relative to the perifocal periapsis state `r0 = (rp, 0, 0)`,
//! `v0 = (0, vp, 0)`:
//!
//! ```text
//! r(tᵢ) = fᵢ r0 + gᵢ v0        v(tᵢ) = ḟᵢ r0 + ġᵢ v0
//! ```
//!
//! The table is immutable once built; any change of `a`, `e` or conic type requires a new
//! table.
use itertools::Itertools;
use nalgebra::Vector3;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    anomaly::time_since_periapsis,
    conic_errors::ConicError,
    constants::{
        Ctu, Degree, Radian, DEFAULT_HYPERBOLIC_MARGIN, DEFAULT_TABLE_SIZE, DEGRAD, RADEG,
    },
    kepler::{angle_diff, propagate_from_periapsis, SolverSettings},
    orbit_type::conic_section::ConicSection,
};

/// Interpolation of the table at animation rate.
pub mod interpolation;

/// CSV export of a table.
pub mod trajectory_file;

/// One entry of a trajectory table.
///
/// Fields
/// -----------------
/// * `time_of_flight`: time since periapsis (CTU), increasing with the index.
/// * `true_anomaly_deg`: true anomaly recovered from the propagated position, in degrees.
/// * `f`, `g`, `f_dot`, `g_dot`: Lagrange coefficients relative to the periapsis state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub time_of_flight: Ctu,
    pub true_anomaly_deg: Degree,
    pub f: f64,
    pub g: f64,
    pub f_dot: f64,
    pub g_dot: f64,
}

/// Controls of a table build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSettings {
    /// Nominal number of entries over the full [−180°, 180°] sweep.
    pub size: usize,
    /// Angular margin kept from each hyperbolic asymptote (radians).
    pub hyperbolic_margin: Radian,
    pub solver: SolverSettings,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            size: DEFAULT_TABLE_SIZE,
            hyperbolic_margin: DEFAULT_HYPERBOLIC_MARGIN,
            solver: SolverSettings::default(),
        }
    }
}

impl TableSettings {
    /// Angular step between two sampled true anomalies, in degrees.
    pub fn step_deg(&self) -> Degree {
        360.0 / self.size.saturating_sub(1).max(1) as f64
    }
}

/// Discretized conic, ordered by increasing true anomaly and time of flight.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryTable {
    conic: ConicSection,
    periapsis_radius: f64,
    periapsis_speed: f64,
    samples: Vec<TrajectorySample>,
    unconverged: Vec<usize>,
    skipped: usize,
}

impl TrajectoryTable {
    /// Sample a conic.
    ///
    /// Arguments
    /// -----------------
    /// * `conic`: shape of the trajectory.
    /// * `settings`: table size, hyperbolic margin and Newton controls.
    ///
    /// Return
    /// ----------
    /// * The table, or [`ConicError::EmptyTrajectoryTable`] if fewer than two samples fall
    ///   inside the flyby window.
    /// * [`ConicError::InvalidSessionParameter`] if `settings.size < 3`.
    ///
    /// Remarks
    /// -------
    /// * The build is deterministic: two builds of the same conic with the same settings give
    ///   identical tables.
    /// * The first entry of an ellipse is exactly −180°.
    pub fn build(conic: &ConicSection, settings: &TableSettings) -> Result<Self, ConicError> {
        if settings.size < 3 {
            return Err(ConicError::InvalidSessionParameter(
                "table_size must be >= 3".into(),
            ));
        }
        let step = settings.step_deg();
        let limit = conic
            .asymptote_true_anomaly()
            .map(|asymptote| asymptote - settings.hyperbolic_margin);

        let mut samples = Vec::with_capacity(settings.size);
        let mut unconverged = Vec::new();
        let mut skipped = 0;

        for k in 0..settings.size {
            let sampled_deg = -180.0 + k as f64 * step;
            let sampled = sampled_deg * RADEG;

            if limit.is_some_and(|limit| sampled.abs() > limit) {
                skipped += 1;
                continue;
            }
            let Some(time_of_flight) = time_since_periapsis(conic, sampled) else {
                skipped += 1;
                continue;
            };

            let propagation = propagate_from_periapsis(conic, time_of_flight, &settings.solver);
            if !propagation.solution.converged {
                warn!(
                    index = samples.len(),
                    true_anomaly_deg = sampled_deg,
                    iterations = propagation.solution.iterations,
                    "universal-variable iteration did not converge"
                );
                unconverged.push(samples.len());
            }

            let recovered = propagation.position.y.atan2(propagation.position.x);
            let true_anomaly_deg = if k == 0 && conic.is_ellipse() {
                -180.0
            } else {
                (sampled + angle_diff(recovered, sampled)) * DEGRAD
            };

            let coefficients = propagation.coefficients;
            samples.push(TrajectorySample {
                time_of_flight,
                true_anomaly_deg,
                f: coefficients.f,
                g: coefficients.g,
                f_dot: coefficients.f_dot,
                g_dot: coefficients.g_dot,
            });
        }

        if samples.len() < 2 {
            return Err(ConicError::EmptyTrajectoryTable);
        }
        if !samples
            .iter()
            .tuple_windows()
            .all(|(s0, s1)| s1.time_of_flight > s0.time_of_flight)
        {
            warn!("trajectory table times of flight are not strictly increasing");
        }

        debug!(
            conic = conic.kind(),
            samples = samples.len(),
            skipped,
            unconverged = unconverged.len(),
            "trajectory table built"
        );

        Ok(TrajectoryTable {
            conic: *conic,
            periapsis_radius: conic.periapsis_radius(),
            periapsis_speed: conic.periapsis_speed(),
            samples,
            unconverged,
            skipped,
        })
    }

    pub fn conic(&self) -> &ConicSection {
        &self.conic
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySample> {
        self.samples.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.samples.len() - 1
    }

    /// Indices of the entries whose Newton iteration hit the cap.
    pub fn unconverged_indices(&self) -> &[usize] {
        &self.unconverged
    }

    /// Number of sampled true anomalies left out beyond the flyby window.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Time of flight of an entry, in CTU.
    pub fn time(&self, index: usize) -> Ctu {
        self.samples[index].time_of_flight
    }

    /// Time covered from the first to the last entry, in CTU.
    ///
    /// For an ellipse this is one period.
    pub fn time_span(&self) -> Ctu {
        self.time(self.last_index()) - self.time(0)
    }

    /// Perifocal position of an entry.
    pub fn position(&self, index: usize) -> Vector3<f64> {
        let sample = &self.samples[index];
        Vector3::new(
            sample.f * self.periapsis_radius,
            sample.g * self.periapsis_speed,
            0.0,
        )
    }

    /// Perifocal velocity of an entry.
    pub fn velocity(&self, index: usize) -> Vector3<f64> {
        let sample = &self.samples[index];
        Vector3::new(
            sample.f_dot * self.periapsis_radius,
            sample.g_dot * self.periapsis_speed,
            0.0,
        )
    }

    /// Bracketing entries `(i0, i0 + 1)` for a time since periapsis.
    ///
    /// Times before the first entry select the first segment, times after the last entry
    /// select the last segment.
    pub fn bracket(&self, time: Ctu) -> (usize, usize) {
        let after = self
            .samples
            .partition_point(|sample| sample.time_of_flight <= time);
        let i0 = after.saturating_sub(1).min(self.last_index() - 1);
        (i0, i0 + 1)
    }
}
