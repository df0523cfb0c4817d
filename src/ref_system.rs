//! # Reference frames
//!
//! Three right-handed frames are used when a trajectory is displayed:
//!
//! - **PQW**, perifocal: P toward periapsis, Q at ν = 90° in the orbital plane, W along the
//!   angular momentum. Every propagation of this crate produces PQW vectors.
//! - **IJK**, inertial: fixed axes of the central body. PQW is placed in IJK by the 3-1-3 Euler
//!   sequence `(Ω, i, ω)`.
//! - **UVW**, body-local: U radial, V along-track in the orbital plane, W along the angular
//!   momentum. It turns with the body as the true anomaly advances.
//!
//! All transforms are stateless rotation matrices.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{constants::Radian, orbit_type::Orientation};

/// Principal axis of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes.
///
/// This function builds a [`nalgebra::Matrix3`] representing an **active rotation**
/// of a 3D vector by an angle `alpha` around the chosen axis.
/// The rotation follows the **direct (positive/trigonometric)** sense.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `axis` - Axis of rotation.
///
/// # Returns
///
/// A 3×3 orthonormal matrix `R` such that the rotated vector is `x' = R · x`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Direction cosine matrix from the perifocal frame to the inertial frame.
///
/// ```text
/// R = Rz(Ω) · Rx(i) · Rz(ω)
/// ```
///
/// The third column of `R` is the unit angular momentum, the first one the unit eccentricity
/// vector, both expressed in IJK.
pub fn perifocal_to_inertial(orientation: &Orientation) -> Matrix3<f64> {
    rotmt(orientation.ascending_node_longitude, Axis::Z)
        * rotmt(orientation.inclination, Axis::X)
        * rotmt(orientation.periapsis_argument, Axis::Z)
}

/// Matrix expressing PQW components in the body-local frame UVW at a true anomaly.
///
/// The position vector at `ν` is mapped onto `(r, 0, 0)`.
pub fn perifocal_to_local(true_anomaly: Radian) -> Matrix3<f64> {
    rotmt(-true_anomaly, Axis::Z)
}
