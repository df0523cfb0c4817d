//! # Readouts
//!
//! Snapshot of every scalar shown next to an animated trajectory, in canonical units, with a
//! conversion to kilometers and seconds through the [`UnitSystem`] of the central body.
//!
//! ## Overview
//!
//! | Group | Quantities |
//! |---|---|
//! | anomalies | ν, E or F, M, n |
//! | time | time since periapsis (CTU, s, [`hifitime::Duration`]), period or flyby duration |
//! | shape | a, p, e, h, ε |
//! | orientation | Ω, i, ω |
//! | state | \|r\|, \|v\|, circular speed, escape speed, Q = v²/vcs², C3 = v² − vesc² |
//!
//! The period is only reported for an ellipse. For a hyperbola the flyby duration takes its
//! place.
use std::fmt;

use hifitime::Duration;

use crate::{
    anomaly::{anomalies, AuxiliaryAnomaly},
    central_body::UnitSystem,
    constants::{Ctu, Kilometer, Radian, Second, DEGRAD, MU_CANONICAL},
    orbit_type::{OrbitalElements, Orientation},
    trajectories::interpolation::MotionState,
};

/// Readouts in canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readouts {
    pub conic: &'static str,
    pub true_anomaly: Radian,
    /// `None` on or beyond an asymptote.
    pub auxiliary_anomaly: Option<AuxiliaryAnomaly>,
    pub mean_anomaly: Option<Radian>,
    pub mean_motion: f64,
    pub time_since_periapsis: Ctu,
    /// Orbital period, ellipse only.
    pub period: Option<Ctu>,
    /// Time spent in the flyby window, hyperbola only.
    pub flyby_duration: Option<Ctu>,
    pub semi_major_axis: f64,
    pub semi_latus_rectum: f64,
    pub eccentricity: f64,
    pub angular_momentum: f64,
    pub specific_energy: f64,
    pub orientation: Orientation,
    pub radius: f64,
    pub speed: f64,
    pub circular_speed: f64,
    pub escape_speed: f64,
    /// `v² / vcs²`: below 2 on an ellipse, above 2 on a hyperbola.
    pub q_parameter: f64,
    /// Characteristic energy `v² − vesc²`, equal to `2ε`.
    pub c3: f64,
}

/// Dimensional counterpart of [`Readouts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalReadouts {
    pub time_since_periapsis_s: Second,
    pub time_since_periapsis: Duration,
    pub period_s: Option<Second>,
    pub flyby_duration_s: Option<Second>,
    pub semi_major_axis_km: Kilometer,
    pub semi_latus_rectum_km: Kilometer,
    pub angular_momentum_km2_s: f64,
    pub specific_energy_km2_s2: f64,
    pub radius_km: Kilometer,
    pub speed_km_s: f64,
    pub circular_speed_km_s: f64,
    pub escape_speed_km_s: f64,
    pub c3_km2_s2: f64,
}

impl Readouts {
    /// Gather the readouts of a body in motion.
    ///
    /// Arguments
    /// -----------------
    /// * `elements`: shape and orientation of the trajectory.
    /// * `state`: interpolated (or exact) state of the body.
    /// * `hyperbolic_margin`: margin used to compute the flyby duration.
    pub fn new(
        elements: &OrbitalElements,
        state: &MotionState,
        hyperbolic_margin: Radian,
    ) -> Self {
        let conic = &elements.conic;
        let true_anomaly = state.true_anomaly_deg / DEGRAD;
        let set = anomalies(conic, true_anomaly);

        let radius = state.position.norm();
        let speed = state.velocity.norm();
        let circular_speed = (MU_CANONICAL / radius).sqrt();
        let escape_speed = std::f64::consts::SQRT_2 * circular_speed;

        Readouts {
            conic: conic.kind(),
            true_anomaly,
            auxiliary_anomaly: set.map(|set| set.auxiliary),
            mean_anomaly: set.map(|set| set.mean_anomaly),
            mean_motion: conic.mean_motion(),
            time_since_periapsis: state.time,
            period: conic.period(),
            flyby_duration: conic
                .flyby_window(hyperbolic_margin)
                .map(|window| window.duration),
            semi_major_axis: conic.semi_major_axis(),
            semi_latus_rectum: conic.semi_latus_rectum(),
            eccentricity: conic.eccentricity(),
            angular_momentum: conic.angular_momentum(),
            specific_energy: conic.specific_energy(),
            orientation: elements.orientation,
            radius,
            speed,
            circular_speed,
            escape_speed,
            q_parameter: speed * speed / (circular_speed * circular_speed),
            c3: speed * speed - escape_speed * escape_speed,
        }
    }

    /// Convert the dimensional readouts to km and s.
    pub fn to_physical(&self, units: &UnitSystem) -> PhysicalReadouts {
        let time_s = units.to_seconds(self.time_since_periapsis);
        PhysicalReadouts {
            time_since_periapsis_s: time_s,
            time_since_periapsis: Duration::from_seconds(time_s),
            period_s: self.period.map(|period| units.to_seconds(period)),
            flyby_duration_s: self
                .flyby_duration
                .map(|duration| units.to_seconds(duration)),
            semi_major_axis_km: units.to_km(self.semi_major_axis),
            semi_latus_rectum_km: units.to_km(self.semi_latus_rectum),
            angular_momentum_km2_s: units.to_km2_s(self.angular_momentum),
            specific_energy_km2_s2: units.to_km2_s2(self.specific_energy),
            radius_km: units.to_km(self.radius),
            speed_km_s: units.to_km_s(self.speed),
            circular_speed_km_s: units.to_km_s(self.circular_speed),
            escape_speed_km_s: units.to_km_s(self.escape_speed),
            c3_km2_s2: units.to_km2_s2(self.c3),
        }
    }
}

impl fmt::Display for Readouts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Readouts ({})", self.conic)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  ν   (true anomaly)          = {:.4}°",
            self.true_anomaly * DEGRAD
        )?;
        match self.auxiliary_anomaly {
            Some(AuxiliaryAnomaly::Eccentric(value)) => writeln!(
                f,
                "  E   (eccentric anomaly)     = {:.4}°",
                value * DEGRAD
            )?,
            Some(AuxiliaryAnomaly::Hyperbolic(value)) => writeln!(
                f,
                "  F   (hyperbolic anomaly)    = {:.4}°",
                value * DEGRAD
            )?,
            None => writeln!(f, "  E/F                         = undefined")?,
        }
        if let Some(mean_anomaly) = self.mean_anomaly {
            writeln!(
                f,
                "  M   (mean anomaly)          = {:.4}°",
                mean_anomaly * DEGRAD
            )?;
        }
        writeln!(
            f,
            "  n   (mean motion)           = {:.6} rad/CTU",
            self.mean_motion
        )?;
        writeln!(
            f,
            "  t   (since periapsis)       = {:.6} CTU",
            self.time_since_periapsis
        )?;
        if let Some(period) = self.period {
            writeln!(f, "  T   (period)                = {period:.6} CTU")?;
        }
        if let Some(duration) = self.flyby_duration {
            writeln!(f, "  T   (flyby duration)        = {duration:.6} CTU")?;
        }
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} CDU",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  p   (semi-latus rectum)     = {:.6} CDU",
            self.semi_latus_rectum
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.6}", self.eccentricity)?;
        writeln!(
            f,
            "  h   (angular momentum)      = {:.6}",
            self.angular_momentum
        )?;
        writeln!(
            f,
            "  ε   (specific energy)       = {:.6}",
            self.specific_energy
        )?;
        writeln!(
            f,
            "  Ω, i, ω                     = {:.4}°, {:.4}°, {:.4}°",
            self.orientation.ascending_node_longitude_deg(),
            self.orientation.inclination_deg(),
            self.orientation.periapsis_argument_deg()
        )?;
        writeln!(f, "  |r|                         = {:.6} CDU", self.radius)?;
        writeln!(f, "  |v|                         = {:.6} CDU/CTU", self.speed)?;
        writeln!(
            f,
            "  vcs, vesc                   = {:.6}, {:.6} CDU/CTU",
            self.circular_speed, self.escape_speed
        )?;
        writeln!(f, "  Q                           = {:.6}", self.q_parameter)?;
        writeln!(f, "  C3                          = {:.6}", self.c3)
    }
}
