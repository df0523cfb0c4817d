pub mod anomaly;
pub mod central_body;
pub mod conic_errors;
pub mod constants;
pub mod kepler;
pub mod orbit_type;
pub mod readouts;
pub mod ref_system;
pub mod session;
pub mod time;
pub mod trajectories;

pub use conic_errors::ConicError;
pub use orbit_type::{conic_section::ConicSection, OrbitalElements, Orientation};
pub use session::OrbitSession;
pub use trajectories::TrajectoryTable;
