#![allow(dead_code)]

use approx::assert_relative_eq;
use conic_orbit::central_body::CentralBody;
use conic_orbit::orbit_type::conic_section::ConicSection;
use conic_orbit::orbit_type::{OrbitalElements, Orientation};
use conic_orbit::session::default_elements;
use conic_orbit::session::params::SessionParams;
use conic_orbit::session::OrbitSession;
use conic_orbit::trajectories::{TableSettings, TrajectoryTable};

/// Shapes spanning both admissible eccentricity ranges, edges included.
pub const CONICS: [(f64, f64); 9] = [
    (1.0, 0.0),
    (2.0, 0.3),
    (3.822, 0.7318),
    (1.0, 0.9),
    (10.0, 0.98),
    (-1.0, 1.02),
    (-1.0, 1.5),
    (-5.0, 3.0),
    (-60.0, 5.0),
];

pub fn build_table(a: f64, e: f64) -> TrajectoryTable {
    let conic = ConicSection::new(a, e).unwrap();
    TrajectoryTable::build(&conic, &TableSettings::default()).unwrap()
}

pub fn transfer_session() -> OrbitSession {
    OrbitSession::new(
        CentralBody::Earth,
        default_elements(),
        SessionParams::default(),
    )
    .unwrap()
}

pub fn hyperbola_session(a: f64, e: f64) -> OrbitSession {
    let elements = OrbitalElements::new(ConicSection::new(a, e).unwrap(), Orientation::default());
    OrbitSession::new(CentralBody::Earth, elements, SessionParams::default()).unwrap()
}

pub fn assert_elements_close(actual: &OrbitalElements, expected: &OrbitalElements, epsilon: f64) {
    assert_eq!(actual.conic.kind(), expected.conic.kind());
    assert_relative_eq!(
        actual.conic.semi_major_axis(),
        expected.conic.semi_major_axis(),
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.conic.eccentricity(),
        expected.conic.eccentricity(),
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.orientation.ascending_node_longitude,
        expected.orientation.ascending_node_longitude,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.orientation.inclination,
        expected.orientation.inclination,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.orientation.periapsis_argument,
        expected.orientation.periapsis_argument,
        epsilon = epsilon
    );
}
