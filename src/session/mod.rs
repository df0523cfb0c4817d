//! # Orbit session
//!
//! [`OrbitSession`] is the single owner of everything an animated trajectory needs: the
//! orbital elements, the central body and its unit system, the tunable parameters, the
//! trajectory table, the simulation clock and the interpolator.
//!
//! ## Overview
//! -----------------
//! Two paths touch the session:
//!
//! - the **edit path** (`set_shape`, `commit`, `toggle_conic`, `set_orientation`,
//!   `set_central_body`, `set_time_scale`, `jump_to_true_anomaly`, `apply_settings`): every
//!   edit halts playback first. Shape edits only mark the table as stale; the rebuild happens
//!   at the next commit point (`commit`, `play`, `jump_to_true_anomaly`), so dragging a value
//!   does not rebuild the table at every intermediate step.
//! - the **animate path** (`play`, `pause`, `tick`): once per frame the caller hands the
//!   wall-clock frame duration to `tick`, which advances the clock and interpolates.
//!
//! ## Typical workflow
//! -----------------
//! ```rust
//! use conic_orbit::central_body::CentralBody;
//! use conic_orbit::session::{default_elements, OrbitSession};
//! use conic_orbit::session::params::SessionParams;
//!
//! let mut session =
//!     OrbitSession::new(CentralBody::Earth, default_elements(), SessionParams::default())
//!         .unwrap();
//! session.play().unwrap();
//! for _ in 0..60 {
//!     session.tick(1.0 / 60.0);
//! }
//! println!("{}", session.readouts());
//! ```
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::{
    anomaly::{state_at_true_anomaly, time_since_periapsis},
    central_body::{CentralBody, UnitSystem},
    conic_errors::ConicError,
    constants::{Ctu, Degree, Radian, Second, DEGRAD, RADEG},
    kepler::angle_diff,
    orbit_type::{conic_section::ConicSection, OrbitalElements, Orientation, PeriapsisStatus},
    readouts::{PhysicalReadouts, Readouts},
    ref_system::{perifocal_to_inertial, perifocal_to_local},
    session::{params::SessionParams, settings::SettingsMap},
    time::{SimulationClock, TimeScale},
    trajectories::{
        interpolation::{Interpolator, MotionState, MotionStatus},
        TrajectoryTable,
    },
};

/// Validated tunable parameters and their builder.
pub mod params;

/// Persisted key/value hand-off.
pub mod settings;

/// Hohmann transfer from a 160 km parking orbit to the geostationary radius, in Earth radii.
pub fn default_elements() -> OrbitalElements {
    OrbitalElements::new(
        ConicSection::Ellipse {
            a: 3.822,
            e: 0.7318,
        },
        Orientation::from_degrees(0.0, -28.0, -81.0),
    )
}

#[derive(Debug, Clone)]
pub struct OrbitSession {
    elements: OrbitalElements,
    body: CentralBody,
    units: UnitSystem,
    params: SessionParams,
    table: TrajectoryTable,
    dirty: bool,
    clock: SimulationClock,
    interpolator: Interpolator,
    motion: MotionState,
    time_scale: TimeScale,
    playing: bool,
    periapsis: PeriapsisStatus,
}

impl OrbitSession {
    /// Start a paused session at periapsis.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: central body, fixes the canonical units.
    /// * `elements`: initial trajectory, in canonical units.
    /// * `params`: table and solver controls.
    ///
    /// Return
    /// ----------
    /// * [`ConicError::EmptyTrajectoryTable`] if the trajectory cannot be sampled.
    pub fn new(
        body: CentralBody,
        elements: OrbitalElements,
        params: SessionParams,
    ) -> Result<Self, ConicError> {
        let units = body.unit_system();
        let table = TrajectoryTable::build(&elements.conic, &params.table_settings())?;
        let mut clock = SimulationClock::new(units.ctu_s);
        let interpolator = Interpolator::new(&table, &mut clock);
        let motion = interpolator.state(&table, &clock);
        let periapsis = elements.periapsis_status(units.canonical_radius());

        let mut session = OrbitSession {
            elements,
            body,
            units,
            params,
            table,
            dirty: false,
            clock,
            interpolator,
            motion,
            time_scale: TimeScale::default(),
            playing: false,
            periapsis,
        };
        session.time_scale = session.clamp_time_scale(TimeScale::default());
        Ok(session)
    }

    // ---------------------------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------------------------

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn central_body(&self) -> CentralBody {
        self.body
    }

    pub fn units(&self) -> &UnitSystem {
        &self.units
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Current table. It may be stale while [`OrbitSession::is_dirty`] is true.
    pub fn table(&self) -> &TrajectoryTable {
        &self.table
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    pub fn periapsis_status(&self) -> PeriapsisStatus {
        self.periapsis
    }

    /// Last interpolated or jumped-to state.
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Time since periapsis, in CTU.
    pub fn time_since_periapsis(&self) -> Ctu {
        self.clock.time()
    }

    pub fn time_since_periapsis_s(&self) -> Second {
        self.clock.seconds()
    }

    /// Period of an ellipse or flyby duration of a hyperbola, in seconds.
    pub fn characteristic_duration_s(&self) -> Second {
        let duration = self
            .elements
            .conic
            .characteristic_duration(self.params.hyperbolic_margin)
            .unwrap_or_else(|| self.table.time_span());
        self.units.to_seconds(duration)
    }

    /// Time scales usable with the current trajectory, slowest first.
    pub fn allowed_time_scales(&self) -> Vec<TimeScale> {
        TimeScale::allowed(
            self.characteristic_duration_s(),
            self.params.time_scale_fraction,
        )
    }

    fn clamp_time_scale(&self, scale: TimeScale) -> TimeScale {
        scale.clamp_to(
            self.characteristic_duration_s(),
            self.params.time_scale_fraction,
        )
    }

    // ---------------------------------------------------------------------------------------------
    // Edit path
    // ---------------------------------------------------------------------------------------------

    fn halt(&mut self) {
        if self.playing {
            self.playing = false;
            info!("playback halted");
        }
    }

    fn check_periapsis(&mut self) {
        self.periapsis = self
            .elements
            .periapsis_status(self.units.canonical_radius());
    }

    /// Change the shape of the trajectory. The table is rebuilt at the next commit point.
    ///
    /// Arguments
    /// -----------------
    /// * `a`: signed semi-major axis (CDU).
    /// * `e`: eccentricity.
    ///
    /// Return
    /// ----------
    /// * A [`ConicError`] if `(a, e)` is not a valid ellipse or hyperbola. The session is left
    ///   untouched apart from being halted.
    pub fn set_shape(&mut self, a: f64, e: f64) -> Result<(), ConicError> {
        self.halt();
        let conic = ConicSection::new(a, e)?;
        if conic != self.elements.conic {
            self.elements.conic = conic;
            self.dirty = true;
            self.check_periapsis();
        }
        Ok(())
    }

    /// Rebuild the table if the shape changed, and put the body back at its true anomaly.
    ///
    /// On a hyperbola, a true anomaly outside the flyby window is brought back to the
    /// nearest edge of the window.
    pub fn commit(&mut self) -> Result<(), ConicError> {
        if !self.dirty {
            return Ok(());
        }
        let true_anomaly = self.motion.true_anomaly_deg * RADEG;
        self.rebuild()?;

        let limit = self
            .elements
            .conic
            .asymptote_true_anomaly()
            .map(|asymptote| asymptote - self.params.hyperbolic_margin);
        let true_anomaly = match limit {
            Some(limit) => true_anomaly.clamp(-limit, limit),
            None => true_anomaly,
        };
        self.place_at(true_anomaly)?;
        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), ConicError> {
        let table = TrajectoryTable::build(&self.elements.conic, &self.params.table_settings())?;
        self.install(table);
        Ok(())
    }

    /// Swap in a table built for the current elements.
    fn install(&mut self, table: TrajectoryTable) {
        self.table = table;
        self.dirty = false;
        self.time_scale = self.clamp_time_scale(self.time_scale);
        debug!(
            a = self.elements.conic.semi_major_axis(),
            e = self.elements.conic.eccentricity(),
            time_scale = %self.time_scale,
            "trajectory rebuilt"
        );
    }

    /// Switch between ellipse and hyperbola.
    ///
    /// The sign of `a` flips, the eccentricity becomes `new_e`, the table is rebuilt at once
    /// and the body is placed at periapsis. On error the session keeps its previous conic and
    /// table.
    pub fn toggle_conic(&mut self, new_e: f64) -> Result<(), ConicError> {
        self.halt();
        let conic = self.elements.conic.toggle(new_e)?;
        let table = TrajectoryTable::build(&conic, &self.params.table_settings())?;
        self.elements.conic = conic;
        self.install(table);
        self.check_periapsis();
        self.place_at(0.0)?;
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.halt();
        self.elements.orientation = orientation;
    }

    /// Change the central body. Canonical elements are kept, so only the physical scale of
    /// the trajectory changes.
    pub fn set_central_body(&mut self, body: CentralBody) {
        self.halt();
        self.body = body;
        self.units = body.unit_system();
        self.clock.set_time_unit(self.units.ctu_s);
        self.check_periapsis();
        self.time_scale = self.clamp_time_scale(self.time_scale);
    }

    /// Select a time scale.
    ///
    /// Return
    /// ----------
    /// * The scale actually applied: the requested one if allowed, the fastest allowed
    ///   otherwise.
    pub fn set_time_scale(&mut self, scale: TimeScale) -> TimeScale {
        self.halt();
        self.time_scale = self.clamp_time_scale(scale);
        self.time_scale
    }

    /// Place the body at a true anomaly given in degrees.
    ///
    /// Pending shape edits are committed first. The clock is set to the exact time of flight
    /// of `ν`; it does not snap to a table entry.
    ///
    /// Return
    /// ----------
    /// * The state at `ν`, or [`ConicError::BeyondAsymptote`] on a hyperbola when `ν` is on or
    ///   beyond an asymptote.
    ///
    /// Remarks
    /// -------
    /// * A hyperbolic `ν` outside the flyby window but before the asymptote is accepted: the
    ///   state is the exact conic state and the motion is reported as
    ///   [`MotionStatus::Unbounded`]. `play` then restarts from periapsis.
    pub fn jump_to_true_anomaly(
        &mut self,
        true_anomaly_deg: Degree,
    ) -> Result<MotionState, ConicError> {
        self.halt();
        self.commit()?;
        let true_anomaly = angle_diff(true_anomaly_deg * RADEG, 0.0);
        self.place_at(true_anomaly)
            .map_err(|_| ConicError::BeyondAsymptote(true_anomaly_deg))?;
        Ok(self.motion)
    }

    fn place_at(&mut self, true_anomaly: Radian) -> Result<(), ConicError> {
        let conic = self.elements.conic;
        let time = time_since_periapsis(&conic, true_anomaly)
            .ok_or(ConicError::BeyondAsymptote(true_anomaly * DEGRAD))?;

        let first = self.table.time(0);
        let last = self.table.time(self.table.last_index());
        if !conic.is_ellipse() && !(first..=last).contains(&time) {
            let (position, velocity) = state_at_true_anomaly(&conic, true_anomaly)
                .ok_or(ConicError::BeyondAsymptote(true_anomaly * DEGRAD))?;
            self.clock.set(time);
            self.motion = MotionState {
                position,
                velocity,
                true_anomaly_deg: true_anomaly * DEGRAD,
                time,
                status: MotionStatus::Unbounded,
            };
            return Ok(());
        }

        self.clock.set(time);
        self.motion = self.interpolator.resync(&self.table, &mut self.clock);
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Animate path
    // ---------------------------------------------------------------------------------------------

    /// Start or resume playback.
    ///
    /// Pending edits are committed first. A hyperbola sitting at or past the end of its flyby
    /// window restarts from periapsis.
    pub fn play(&mut self) -> Result<(), ConicError> {
        self.commit()?;
        if self.motion.status == MotionStatus::Unbounded {
            self.place_at(0.0)?;
        }
        self.playing = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advance the animation by one frame.
    ///
    /// Arguments
    /// -----------------
    /// * `frame_dt_s`: wall-clock duration of the frame, in seconds.
    ///
    /// Return
    /// ----------
    /// * The new state. While paused, the last state is returned unchanged. Reaching the end
    ///   of a hyperbolic flyby window stops playback.
    pub fn tick(&mut self, frame_dt_s: Second) -> MotionState {
        if !self.playing {
            return self.motion;
        }
        self.motion = self.interpolator.advance(
            &self.table,
            &mut self.clock,
            self.time_scale,
            frame_dt_s,
        );
        if self.motion.status == MotionStatus::Unbounded {
            self.playing = false;
            info!(
                true_anomaly_deg = self.motion.true_anomaly_deg,
                "end of the flyby window reached"
            );
        }
        self.motion
    }

    // ---------------------------------------------------------------------------------------------
    // Outputs
    // ---------------------------------------------------------------------------------------------

    pub fn readouts(&self) -> Readouts {
        Readouts::new(&self.elements, &self.motion, self.params.hyperbolic_margin)
    }

    pub fn physical_readouts(&self) -> PhysicalReadouts {
        self.readouts().to_physical(&self.units)
    }

    /// Position and velocity in the inertial frame of the central body.
    pub fn inertial_state(&self) -> (Vector3<f64>, Vector3<f64>) {
        let dcm = perifocal_to_inertial(&self.elements.orientation);
        (dcm * self.motion.position, dcm * self.motion.velocity)
    }

    /// Position and velocity in the body-local frame UVW.
    pub fn local_state(&self) -> (Vector3<f64>, Vector3<f64>) {
        let dcm = perifocal_to_local(self.motion.true_anomaly_deg * RADEG);
        (dcm * self.motion.position, dcm * self.motion.velocity)
    }

    // ---------------------------------------------------------------------------------------------
    // Persisted settings
    // ---------------------------------------------------------------------------------------------

    /// Read the keys known to the session from a settings map and apply them.
    ///
    /// Missing keys keep their current value. The table is rebuilt and the body placed at
    /// periapsis.
    ///
    /// Return
    /// ----------
    /// * [`ConicError::InvalidSetting`] for a value that does not parse, or a shape error;
    ///   the session is unchanged apart from being halted.
    pub fn apply_settings(&mut self, store: &SettingsMap) -> Result<(), ConicError> {
        self.halt();

        let body = store
            .parse::<CentralBody>(settings::CENTRAL_BODY)?
            .unwrap_or(self.body);
        let conic = &self.elements.conic;
        let is_ellipse = match store.get(settings::CONIC_SECTION) {
            None => conic.is_ellipse(),
            Some("ellipse") => true,
            Some("hyperbola") => false,
            Some(other) => {
                return Err(ConicError::InvalidSetting {
                    key: settings::CONIC_SECTION.to_string(),
                    value: other.to_string(),
                })
            }
        };
        let a = store
            .parse::<f64>(settings::SEMIMAJOR_AXIS)?
            .unwrap_or(conic.semi_major_axis())
            .abs();
        let e = store
            .parse::<f64>(settings::ECCENTRICITY)?
            .unwrap_or(conic.eccentricity());
        let conic = ConicSection::new(if is_ellipse { a } else { -a }, e)?;

        let current = self.elements.orientation;
        let orientation = Orientation::from_degrees(
            store
                .parse::<f64>(settings::LONGITUDE_OF_ASCENDING_NODE)?
                .unwrap_or(current.ascending_node_longitude_deg()),
            store
                .parse::<f64>(settings::INCLINATION)?
                .unwrap_or(current.inclination_deg()),
            store
                .parse::<f64>(settings::ARGUMENT_OF_PERIAPSIS)?
                .unwrap_or(current.periapsis_argument_deg()),
        );
        let time_scale = store
            .parse::<TimeScale>(settings::TIME_SCALE)?
            .unwrap_or(self.time_scale);

        let table = TrajectoryTable::build(&conic, &self.params.table_settings())?;

        self.elements = OrbitalElements::new(conic, orientation);
        self.table = table;
        self.dirty = false;
        self.set_central_body(body);
        self.time_scale = self.clamp_time_scale(time_scale);
        self.place_at(0.0)?;
        Ok(())
    }

    /// Write the keys known to the session into a settings map, keeping every other key.
    pub fn export_settings(&self, store: &mut SettingsMap) {
        let conic = &self.elements.conic;
        let orientation = &self.elements.orientation;
        store.insert(settings::CENTRAL_BODY, self.body);
        store.insert(settings::CONIC_SECTION, conic.kind());
        store.insert(settings::SEMIMAJOR_AXIS, conic.semi_major_axis().abs());
        store.insert(settings::ECCENTRICITY, conic.eccentricity());
        store.insert(
            settings::LONGITUDE_OF_ASCENDING_NODE,
            orientation.ascending_node_longitude_deg(),
        );
        store.insert(settings::INCLINATION, orientation.inclination_deg());
        store.insert(
            settings::ARGUMENT_OF_PERIAPSIS,
            orientation.periapsis_argument_deg(),
        );
        store.insert(settings::TIME_SCALE, self.time_scale);
    }
}
