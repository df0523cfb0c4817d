//! # Animation interpolator
//!
//! Walks a [`TrajectoryTable`] at frame rate. The simulation clock falls between two
//! neighbouring entries `(i0, i1)`; position, velocity and true anomaly are linear in time on
//! that segment. When the clock crosses `t[i1]` the window moves forward:
//!
//! - on an **ellipse**, leaving the last entry wraps to the segment `(0, 1)` and the time in
//!   excess is carried over, so the body keeps orbiting at a constant rate;
//! - on a **hyperbola**, the last entry is a stop: the clock is clamped there and the motion
//!   is reported as [`MotionStatus::Unbounded`].
//!
//! After a scrub or a table rebuild, [`Interpolator::resync`] recomputes the window from the
//! clock alone.
use nalgebra::Vector3;
use tracing::debug;

use crate::{
    constants::{Ctu, Degree, Second},
    orbit_type::conic_section::ConicSection,
    time::{SimulationClock, TimeScale},
    trajectories::TrajectoryTable,
};

/// Whether the body can keep moving along the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    Moving,
    /// End of a hyperbolic flyby window reached.
    Unbounded,
}

/// Interpolated state of the body, in the perifocal frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub true_anomaly_deg: Degree,
    /// Time since periapsis (CTU).
    pub time: Ctu,
    pub status: MotionStatus,
}

/// Segment `(i0, i1)` of the table and the linear model fitted on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationWindow {
    pub i0: usize,
    pub i1: usize,
    t0: Ctu,
    position0: Vector3<f64>,
    velocity0: Vector3<f64>,
    true_anomaly0: Degree,
    position_rate: Vector3<f64>,
    velocity_rate: Vector3<f64>,
    true_anomaly_rate: f64,
}

impl InterpolationWindow {
    /// Fit the segment starting at `i0`.
    fn new(table: &TrajectoryTable, i0: usize) -> Self {
        let i1 = i0 + 1;
        let (s0, s1) = (&table.samples()[i0], &table.samples()[i1]);
        let dt = s1.time_of_flight - s0.time_of_flight;

        let position0 = table.position(i0);
        let velocity0 = table.velocity(i0);

        InterpolationWindow {
            i0,
            i1,
            t0: s0.time_of_flight,
            position0,
            velocity0,
            true_anomaly0: s0.true_anomaly_deg,
            position_rate: (table.position(i1) - position0) / dt,
            velocity_rate: (table.velocity(i1) - velocity0) / dt,
            true_anomaly_rate: (s1.true_anomaly_deg - s0.true_anomaly_deg) / dt,
        }
    }

    fn evaluate(&self, time: Ctu, status: MotionStatus) -> MotionState {
        let elapsed = time - self.t0;
        MotionState {
            position: self.position0 + self.position_rate * elapsed,
            velocity: self.velocity0 + self.velocity_rate * elapsed,
            true_anomaly_deg: self.true_anomaly0 + self.true_anomaly_rate * elapsed,
            time,
            status,
        }
    }
}

/// Stateful walker over a trajectory table.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    window: InterpolationWindow,
}

/// Bring a time back inside the span of the table.
///
/// Ellipse times are wrapped by whole periods, hyperbola times are clamped to the flyby window.
fn fold_time(table: &TrajectoryTable, time: Ctu) -> Ctu {
    let first = table.time(0);
    let last = table.time(table.last_index());

    match table.conic() {
        ConicSection::Ellipse { .. } if !(first..last).contains(&time) => {
            first + (time - first).rem_euclid(table.time_span())
        }
        ConicSection::Ellipse { .. } => time,
        ConicSection::Hyperbola { .. } => time.clamp(first, last),
    }
}

impl Interpolator {
    /// Place a new interpolator on the table at the time held by the clock.
    ///
    /// The clock is folded into the span of the table.
    pub fn new(table: &TrajectoryTable, clock: &mut SimulationClock) -> Self {
        let time = fold_time(table, clock.time());
        clock.set(time);
        Interpolator {
            window: InterpolationWindow::new(table, table.bracket(time).0),
        }
    }

    pub fn window(&self) -> &InterpolationWindow {
        &self.window
    }

    /// Recompute the window from scratch after a scrub or a rebuild.
    pub fn resync(&mut self, table: &TrajectoryTable, clock: &mut SimulationClock) -> MotionState {
        *self = Interpolator::new(table, clock);
        debug!(
            i0 = self.window.i0,
            time = clock.time(),
            "interpolation window resynchronised"
        );
        self.state(table, clock)
    }

    /// Interpolated state at the current clock time, without advancing.
    pub fn state(&self, table: &TrajectoryTable, clock: &SimulationClock) -> MotionState {
        let status = match table.conic() {
            ConicSection::Hyperbola { .. } if clock.time() >= table.time(table.last_index()) => {
                MotionStatus::Unbounded
            }
            _ => MotionStatus::Moving,
        };
        self.window.evaluate(clock.time(), status)
    }

    /// Advance the clock by one frame and interpolate.
    ///
    /// Arguments
    /// -----------------
    /// * `table`: the table the window was fitted on.
    /// * `clock`: simulation clock, advanced and possibly wrapped or clamped.
    /// * `scale`: simulated seconds per wall-clock second.
    /// * `frame_dt_s`: wall-clock duration of the frame.
    ///
    /// Return
    /// ----------
    /// * The interpolated [`MotionState`]. `status` is [`MotionStatus::Unbounded`] once a
    ///   hyperbola reaches its last entry.
    pub fn advance(
        &mut self,
        table: &TrajectoryTable,
        clock: &mut SimulationClock,
        scale: TimeScale,
        frame_dt_s: Second,
    ) -> MotionState {
        clock.advance(scale, frame_dt_s);
        let mut time = clock.time();
        let last = table.last_index();
        let mut status = MotionStatus::Moving;

        while time >= table.time(self.window.i1) {
            if self.window.i1 < last {
                self.window = InterpolationWindow::new(table, self.window.i1);
                continue;
            }
            match table.conic() {
                ConicSection::Ellipse { .. } => {
                    let overshoot = (time - table.time(last)).rem_euclid(table.time_span());
                    time = table.time(0) + overshoot;
                    self.window = InterpolationWindow::new(table, 0);
                }
                ConicSection::Hyperbola { .. } => {
                    time = table.time(last);
                    status = MotionStatus::Unbounded;
                    break;
                }
            }
        }

        clock.set(time);
        self.window.evaluate(time, status)
    }
}

#[cfg(test)]
mod interpolation_test {
    use super::*;
    use crate::{
        anomaly::state_at_true_anomaly, constants::RADEG, trajectories::TableSettings,
    };
    use approx::assert_relative_eq;

    fn table(a: f64, e: f64) -> TrajectoryTable {
        let conic = ConicSection::new(a, e).unwrap();
        TrajectoryTable::build(&conic, &TableSettings::default()).unwrap()
    }

    #[test]
    fn test_entries_are_reproduced() {
        let table = table(3.822, 0.7318);
        let mut clock = SimulationClock::new(1.0);
        for index in [0, 37, 90, 150] {
            clock.set(table.time(index));
            let mut interpolator = Interpolator::new(&table, &mut clock);
            let state = interpolator.resync(&table, &mut clock);
            assert_relative_eq!(state.position, table.position(index), epsilon = 1e-12);
            assert_relative_eq!(state.velocity, table.velocity(index), epsilon = 1e-12);
            assert_relative_eq!(
                state.true_anomaly_deg,
                table.samples()[index].true_anomaly_deg,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_interpolation_follows_the_conic() {
        let table = table(2.0, 0.3);
        let mut clock = SimulationClock::new(1.0);
        let mut interpolator = Interpolator::new(&table, &mut clock);

        for _ in 0..500 {
            let state = interpolator.advance(&table, &mut clock, TimeScale::OneMinute, 0.01);
            let (exact, _) =
                state_at_true_anomaly(table.conic(), state.true_anomaly_deg * RADEG).unwrap();
            assert!((state.position - exact).norm() < 1e-2 * exact.norm());
            assert_eq!(state.status, MotionStatus::Moving);
        }
    }

    #[test]
    fn test_continuity_across_windows() {
        let table = table(3.822, 0.7318);
        let mut clock = SimulationClock::new(1.0);
        clock.set(table.time(120) - 1e-3);
        let mut interpolator = Interpolator::new(&table, &mut clock);

        let mut previous = interpolator.state(&table, &clock);
        let mut crossed = 0;
        for _ in 0..200 {
            let i0 = interpolator.window().i0;
            let state = interpolator.advance(&table, &mut clock, TimeScale::OneSecond, 1e-3);
            if interpolator.window().i0 != i0 {
                crossed += 1;
            }
            assert!((state.position - previous.position).norm() < 5e-3);
            assert!(state.true_anomaly_deg > previous.true_anomaly_deg);
            previous = state;
        }
        assert!(crossed > 0);
    }

    #[test]
    fn test_ellipse_wraps_and_carries_overshoot() {
        let table = table(1.0, 0.5);
        let last = table.last_index();
        let mut clock = SimulationClock::new(1.0);
        clock.set(table.time(last) - 0.01);
        let mut interpolator = Interpolator::new(&table, &mut clock);

        let state = interpolator.advance(&table, &mut clock, TimeScale::OneSecond, 0.03);
        assert_eq!(interpolator.window().i0, 0);
        assert_relative_eq!(state.time, table.time(0) + 0.02, epsilon = 1e-12);
        assert!(state.true_anomaly_deg < -179.0);
        assert_eq!(state.status, MotionStatus::Moving);
    }

    #[test]
    fn test_hyperbola_halts_at_last_entry() {
        let table = table(-1.0, 1.5);
        let last = table.last_index();
        let mut clock = SimulationClock::new(1.0);
        clock.set(table.time(last) - 0.01);
        let mut interpolator = Interpolator::new(&table, &mut clock);

        let state = interpolator.advance(&table, &mut clock, TimeScale::OneSecond, 1.0);
        assert_eq!(state.status, MotionStatus::Unbounded);
        assert_eq!(clock.time(), table.time(last));
        assert_relative_eq!(state.position, table.position(last), epsilon = 1e-12);
        assert_eq!(
            interpolator.state(&table, &clock).status,
            MotionStatus::Unbounded
        );
    }

    #[test]
    fn test_resync_folds_out_of_range_time() {
        let table = table(1.0, 0.5);
        let mut clock = SimulationClock::new(1.0);
        clock.set(table.time(10) + 3.0 * table.time_span());
        let interpolator = Interpolator::new(&table, &mut clock);
        assert_relative_eq!(clock.time(), table.time(10), epsilon = 1e-9);
        assert!(interpolator.window().i0 == 10 || interpolator.window().i0 == 9);

        let hyperbola = self::table(-1.0, 1.5);
        clock.set(-1e6);
        let interpolator = Interpolator::new(&hyperbola, &mut clock);
        assert_eq!(clock.time(), hyperbola.time(0));
        assert_eq!(interpolator.window().i0, 0);
    }
}
