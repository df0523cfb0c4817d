use conic_orbit::central_body::CentralBody;
use conic_orbit::conic_errors::ConicError;
use conic_orbit::constants::NOMINAL_FRAME_SECONDS;
use conic_orbit::session::params::SessionParams;
use conic_orbit::session::settings::SettingsMap;
use conic_orbit::session::{default_elements, OrbitSession};
use conic_orbit::time::TimeScale;
use tracing::Level;

/// Print the readouts in physical units.
fn report(session: &OrbitSession) {
    let readouts = session.readouts();
    let physical = session.physical_readouts();
    let (r_inertial, _) = session.inertial_state();
    println!("{readouts}");
    println!(
        "  t = {} | |r| = {:.1} km | |v| = {:.4} km/s | r_ECI = [{:.4}, {:.4}, {:.4}] CDU",
        physical.time_since_periapsis,
        physical.radius_km,
        physical.speed_km_s,
        r_inertial.x,
        r_inertial.y,
        r_inertial.z
    );
}

fn main() -> Result<(), ConicError> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let params = SessionParams::builder().table_size(361).build()?;
    println!("{params}");

    let mut session = OrbitSession::new(CentralBody::Earth, default_elements(), params)?;
    println!("{}", session.elements());
    println!(
        "allowed time scales: {:?}",
        session
            .allowed_time_scales()
            .iter()
            .map(TimeScale::key)
            .collect::<Vec<_>>()
    );

    // One minute of wall-clock time at 15 simulated minutes per second
    session.play()?;
    for frame in 1..=3600 {
        session.tick(NOMINAL_FRAME_SECONDS);
        if frame % 600 == 0 {
            report(&session);
        }
    }

    // Same shape magnitude, hyperbolic flyby
    session.toggle_conic(1.5)?;
    println!("{}", session.elements());
    session.play()?;
    let mut frames = 0;
    while session.is_playing() {
        session.tick(NOMINAL_FRAME_SECONDS);
        frames += 1;
    }
    println!("flyby window crossed in {frames} frames");
    report(&session);

    let path = std::env::temp_dir().join("conic_orbit_flyby.csv");
    session.table().write_csv_file(&path)?;
    println!("trajectory table written to {}", path.display());

    let mut store = SettingsMap::new();
    session.export_settings(&mut store);
    for (key, value) in store.iter() {
        println!("  {key:<28} = {value}");
    }

    Ok(())
}
