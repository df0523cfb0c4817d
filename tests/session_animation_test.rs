mod common;

use approx::assert_relative_eq;

use common::{assert_elements_close, hyperbola_session, transfer_session};
use conic_orbit::anomaly::time_since_periapsis;
use conic_orbit::central_body::CentralBody;
use conic_orbit::conic_errors::ConicError;
use conic_orbit::constants::RADEG;
use conic_orbit::orbit_type::conic_section::ConicSection;
use conic_orbit::orbit_type::{OrbitalElements, Orientation, PeriapsisStatus};
use conic_orbit::session::params::SessionParams;
use conic_orbit::session::settings::{self, SettingsMap};
use conic_orbit::session::{default_elements, OrbitSession};
use conic_orbit::time::TimeScale;
use conic_orbit::trajectories::interpolation::MotionStatus;

#[test]
fn test_ellipse_keeps_orbiting() {
    let mut session = transfer_session();
    let first = session.table().time(0);
    let last = session.table().time(session.table().last_index());
    session.play().unwrap();

    // one period is about 42 s of wall-clock time at 15 simulated minutes per second
    let mut wraps = 0;
    let mut previous = session.motion().time;
    for _ in 0..100 {
        let state = session.tick(1.0);
        assert_eq!(state.status, MotionStatus::Moving);
        assert!((first..=last).contains(&state.time));
        if state.time < previous {
            wraps += 1;
        }
        previous = state.time;
    }
    assert!(session.is_playing());
    assert_eq!(wraps, 2);
}

#[test]
fn test_hyperbola_halts_at_end_of_window() {
    let mut session = hyperbola_session(-1.0, 1.5);
    // flyby of about 3564 s: 15 minutes per second exceeds a tenth of it
    assert_eq!(session.time_scale(), TimeScale::FiveMinutes);
    session.play().unwrap();

    for _ in 0..20 {
        session.tick(1.0);
    }
    let last = session.table().last_index();
    assert!(!session.is_playing());
    assert_eq!(session.motion().status, MotionStatus::Unbounded);
    assert_eq!(session.time_since_periapsis(), session.table().time(last));

    let frozen = *session.motion();
    assert_eq!(session.tick(1.0), frozen);

    session.play().unwrap();
    assert!(session.is_playing());
    assert_eq!(session.time_since_periapsis(), 0.0);
    assert_eq!(session.motion().status, MotionStatus::Moving);
}

#[test]
fn test_time_scale_gating() {
    let mut session = transfer_session();
    // period of about 37878 s
    assert_eq!(
        session.allowed_time_scales(),
        vec![
            TimeScale::OneSecond,
            TimeScale::OneMinute,
            TimeScale::FiveMinutes,
            TimeScale::FifteenMinutes,
            TimeScale::OneHour
        ]
    );
    assert_eq!(session.set_time_scale(TimeScale::OneDay), TimeScale::OneHour);
    assert_eq!(session.set_time_scale(TimeScale::OneMinute), TimeScale::OneMinute);

    // the hyperbola flies by in about 26628 s, one hour is no longer allowed
    session.set_time_scale(TimeScale::OneHour);
    session.toggle_conic(1.5).unwrap();
    assert_eq!(session.time_scale(), TimeScale::FifteenMinutes);
    assert!(!TimeScale::OneHour.is_allowed(
        session.characteristic_duration_s(),
        session.params().time_scale_fraction
    ));
}

#[test]
fn test_jump_sets_exact_time() {
    let mut session = transfer_session();
    let state = session.jump_to_true_anomaly(90.0).unwrap();
    let expected = time_since_periapsis(&session.elements().conic, 90.0 * RADEG).unwrap();

    assert_eq!(state.time, expected);
    assert_relative_eq!(state.true_anomaly_deg, 90.0, epsilon = 1e-4);
    assert_relative_eq!(session.readouts().true_anomaly, 90.0 * RADEG, epsilon = 1e-5);

    let state = session.jump_to_true_anomaly(-45.0).unwrap();
    assert!(state.time < 0.0);
    assert_relative_eq!(state.true_anomaly_deg, -45.0, epsilon = 0.1);
}

#[test]
fn test_jump_on_hyperbola() {
    let mut session = hyperbola_session(-1.0, 1.5);
    // asymptote at about 131.8°, flyby window up to about 113.8°
    assert_eq!(
        session.jump_to_true_anomaly(140.0),
        Err(ConicError::BeyondAsymptote(140.0))
    );

    let state = session.jump_to_true_anomaly(120.0).unwrap();
    assert_eq!(state.status, MotionStatus::Unbounded);
    assert_relative_eq!(state.true_anomaly_deg, 120.0, epsilon = 1e-9);
    assert!(state.time > session.table().time(session.table().last_index()));

    session.play().unwrap();
    assert_eq!(session.time_since_periapsis(), 0.0);
}

#[test]
fn test_commit_keeps_true_anomaly() {
    let mut session = transfer_session();
    session.jump_to_true_anomaly(90.0).unwrap();

    session.set_shape(5.0, 0.2).unwrap();
    assert!(session.is_dirty());
    session.play().unwrap();
    assert!(!session.is_dirty());
    assert!(session.is_playing());
    assert_relative_eq!(session.motion().true_anomaly_deg, 90.0, epsilon = 1e-4);
}

#[test]
fn test_toggle_resets_to_periapsis() {
    let mut session = transfer_session();
    session.jump_to_true_anomaly(150.0).unwrap();

    session.toggle_conic(1.5).unwrap();
    assert_eq!(
        session.elements().conic,
        ConicSection::new(-3.822, 1.5).unwrap()
    );
    assert_eq!(session.time_since_periapsis(), 0.0);
    assert_relative_eq!(session.motion().true_anomaly_deg, 0.0, epsilon = 1e-9);

    session.toggle_conic(0.7318).unwrap();
    assert_eq!(session.elements().conic, default_elements().conic);
    assert!(session.toggle_conic(1.01).is_err());
}

#[test]
fn test_periapsis_inside_body_is_flagged() {
    let mut session = transfer_session();
    session.set_shape(1.0, 0.5).unwrap();
    assert_eq!(session.periapsis_status(), PeriapsisStatus::IntersectsBody);

    session.commit().unwrap();
    session.play().unwrap();
    assert!(session.is_playing());

    session.set_shape(3.822, 0.7318).unwrap();
    assert_eq!(session.periapsis_status(), PeriapsisStatus::Clear);
}

#[test]
fn test_central_body_changes_physical_scale() {
    let mut session = transfer_session();
    session.jump_to_true_anomaly(0.0).unwrap();
    let earth = session.physical_readouts();

    session.set_central_body(CentralBody::Mars);
    let mars = session.physical_readouts();
    assert_eq!(session.central_body(), CentralBody::Mars);
    assert_eq!(session.readouts().eccentricity, 0.7318);
    assert_relative_eq!(
        mars.radius_km / earth.radius_km,
        CentralBody::Mars.radius_km() / CentralBody::Earth.radius_km(),
        epsilon = 1e-9
    );
}

#[test]
fn test_settings_round_trip() {
    let mut session = transfer_session();
    session.set_central_body(CentralBody::Moon);
    session.toggle_conic(1.5).unwrap();
    session.set_time_scale(TimeScale::OneMinute);

    let mut store = SettingsMap::new();
    store.insert("theme", "dark");
    session.export_settings(&mut store);
    assert_eq!(store.get(settings::CONIC_SECTION), Some("hyperbola"));
    assert_eq!(store.get(settings::CENTRAL_BODY), Some("moon"));
    assert_eq!(store.len(), settings::SESSION_KEYS.len() + 1);

    let json = serde_json::to_string(&store).unwrap();
    let restored_store: SettingsMap = serde_json::from_str(&json).unwrap();
    assert_eq!(restored_store.get("theme"), Some("dark"));

    let mut restored = transfer_session();
    restored.apply_settings(&restored_store).unwrap();
    assert_elements_close(restored.elements(), session.elements(), 1e-12);
    assert_eq!(restored.central_body(), CentralBody::Moon);
    assert_eq!(restored.time_scale(), TimeScale::OneMinute);
    assert_eq!(restored.table(), session.table());
}

#[test]
fn test_invalid_settings_leave_session_untouched() {
    let mut session = transfer_session();
    let before = *session.elements();

    let store: SettingsMap = [
        (settings::CONIC_SECTION.to_string(), "parabola".to_string()),
        (settings::ECCENTRICITY.to_string(), "1.0".to_string()),
    ]
    .into_iter()
    .collect();
    assert!(matches!(
        session.apply_settings(&store),
        Err(ConicError::InvalidSetting { .. })
    ));

    let store: SettingsMap = [(settings::CENTRAL_BODY.to_string(), "pluto".to_string())]
        .into_iter()
        .collect();
    assert!(session.apply_settings(&store).is_err());

    let store: SettingsMap = [(settings::ECCENTRICITY.to_string(), "0.99".to_string())]
        .into_iter()
        .collect();
    assert_eq!(
        session.apply_settings(&store),
        Err(ConicError::ForbiddenEccentricity(0.99))
    );
    assert_eq!(session.elements(), &before);
}

#[test]
fn test_new_session_rejects_empty_window() {
    let elements = OrbitalElements::new(
        ConicSection::new(-1.0, 5.0).unwrap(),
        Orientation::default(),
    );
    // samples at −180°, 0° and 180°: only periapsis falls inside the flyby window
    let params = SessionParams {
        table_size: 3,
        ..SessionParams::default()
    };
    assert!(SessionParams::builder().table_size(3).build().is_err());
    assert!(matches!(
        OrbitSession::new(CentralBody::Earth, elements, params),
        Err(ConicError::EmptyTrajectoryTable)
    ));
}

#[test]
fn test_failed_toggle_keeps_previous_trajectory() {
    let params = SessionParams {
        table_size: 3,
        ..SessionParams::default()
    };
    let mut session = OrbitSession::new(CentralBody::Earth, default_elements(), params).unwrap();
    let table = session.table().clone();

    assert_eq!(
        session.toggle_conic(1.5),
        Err(ConicError::EmptyTrajectoryTable)
    );
    assert_eq!(session.elements().conic, default_elements().conic);
    assert_eq!(session.table().conic(), &session.elements().conic);
    assert_eq!(session.table(), &table);
    assert!(!session.is_dirty());

    session.play().unwrap();
    let state = session.tick(1.0);
    assert_eq!(state.status, MotionStatus::Moving);
    assert!(session.elements().conic.is_ellipse());
}
