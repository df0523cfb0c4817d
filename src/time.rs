//! # Simulation time
//!
//! Animation time is **time since periapsis**, kept in canonical time units and exposed in
//! seconds through the CTU of the central body.
//!
//! ## Overview
//!
//! - [`TimeScale`]: how many simulated seconds elapse per wall-clock second.
//! - [`SimulationClock`]: the time since periapsis, advanced once per animation frame.
//!
//! A time scale is only offered when it stays small compared with the orbit: at most a
//! fraction (10 % by default) of the period of an ellipse or of the flyby duration of a
//! hyperbola. The one-second scale is always available.
use std::fmt;
use std::str::FromStr;

use hifitime::Duration;

use crate::{
    conic_errors::ConicError,
    constants::{Ctu, Second},
};

/// Simulated seconds per wall-clock second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeScale {
    OneSecond,
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    OneDay,
}

impl TimeScale {
    /// Every scale, slowest first.
    pub const ALL: [TimeScale; 6] = [
        TimeScale::OneSecond,
        TimeScale::OneMinute,
        TimeScale::FiveMinutes,
        TimeScale::FifteenMinutes,
        TimeScale::OneHour,
        TimeScale::OneDay,
    ];

    pub fn seconds_per_second(&self) -> f64 {
        match self {
            TimeScale::OneSecond => 1.0,
            TimeScale::OneMinute => 60.0,
            TimeScale::FiveMinutes => 300.0,
            TimeScale::FifteenMinutes => 900.0,
            TimeScale::OneHour => 3_600.0,
            TimeScale::OneDay => 86_400.0,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TimeScale::OneSecond => "sec-equals-1sec",
            TimeScale::OneMinute => "sec-equals-1minute",
            TimeScale::FiveMinutes => "sec-equals-5minutes",
            TimeScale::FifteenMinutes => "sec-equals-15minutes",
            TimeScale::OneHour => "sec-equals-1hour",
            TimeScale::OneDay => "sec-equals-1day",
        }
    }

    /// Whether this scale may be used for an orbit whose period (or flyby duration) is
    /// `duration_s` seconds.
    ///
    /// Arguments
    /// -----------------
    /// * `duration_s`: period of an ellipse or flyby duration of a hyperbola, in seconds.
    /// * `fraction`: largest admissible ratio `scale / duration`.
    pub fn is_allowed(&self, duration_s: Second, fraction: f64) -> bool {
        *self == TimeScale::OneSecond || self.seconds_per_second() <= fraction * duration_s
    }

    /// Scales usable for a given orbit, slowest first. Never empty.
    pub fn allowed(duration_s: Second, fraction: f64) -> Vec<TimeScale> {
        TimeScale::ALL
            .into_iter()
            .filter(|scale| scale.is_allowed(duration_s, fraction))
            .collect()
    }

    /// Keep this scale if allowed, otherwise fall back to the fastest allowed one.
    pub fn clamp_to(self, duration_s: Second, fraction: f64) -> TimeScale {
        if self.is_allowed(duration_s, fraction) {
            return self;
        }
        TimeScale::ALL
            .into_iter()
            .rev()
            .find(|scale| *scale < self && scale.is_allowed(duration_s, fraction))
            .unwrap_or(TimeScale::OneSecond)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        TimeScale::FifteenMinutes
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for TimeScale {
    type Err = ConicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeScale::ALL
            .into_iter()
            .find(|scale| scale.key() == s.trim())
            .ok_or_else(|| ConicError::UnknownTimeScale(s.to_string()))
    }
}

/// Time since periapsis of the animated body.
///
/// The clock itself knows nothing about wrapping or halting: those depend on the trajectory
/// table and are handled by the interpolator, which rewrites the clock through
/// [`SimulationClock::set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    time: Ctu,
    ctu_s: Second,
}

impl SimulationClock {
    /// New clock at periapsis.
    ///
    /// Arguments
    /// -----------------
    /// * `ctu_s`: canonical time unit of the central body, in seconds.
    pub fn new(ctu_s: Second) -> Self {
        SimulationClock { time: 0.0, ctu_s }
    }

    /// Time since periapsis in CTU.
    pub fn time(&self) -> Ctu {
        self.time
    }

    pub fn seconds(&self) -> Second {
        self.time * self.ctu_s
    }

    /// Time since periapsis as a [`hifitime::Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_seconds(self.seconds())
    }

    pub fn set(&mut self, time: Ctu) {
        self.time = time;
    }

    /// Change the canonical time unit, keeping the canonical time.
    pub fn set_time_unit(&mut self, ctu_s: Second) {
        self.ctu_s = ctu_s;
    }

    /// Advance by one frame.
    ///
    /// Arguments
    /// -----------------
    /// * `scale`: simulated seconds per wall-clock second.
    /// * `frame_dt_s`: wall-clock duration of the frame, in seconds.
    ///
    /// Return
    /// ----------
    /// * The canonical time increment applied.
    pub fn advance(&mut self, scale: TimeScale, frame_dt_s: Second) -> Ctu {
        let increment = scale.seconds_per_second() * frame_dt_s / self.ctu_s;
        self.time += increment;
        increment
    }
}
