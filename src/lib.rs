//! Core of a rotation property editor: a 3D rotation kept simultaneously in
//! Euler-angle and quaternion form, with the two views synchronized without
//! feedback loops.
//!
//! Euler angles are tied to an axis spec string like `"sxyz"`, `"rzxz"`, or
//! the `"rpy"` alias: an optional frame prefix (`s` = static/world axes,
//! `r` = rotating/body axes) followed by three axis letters. Angles are
//! radians in the API and degrees at the display/persistence boundary.
//!
//! [`RotationCoordinator`] is the host-facing entry point; [`EulerState`] and
//! [`QuaternionState`] are its dependent views. Change notification is
//! synchronous and single-threaded via registered callbacks.

mod axes;
mod coordinator;
mod euler;
mod format;
mod guard;
mod notify;
mod quaternion;

pub use axes::{AxisSpec, InvalidAxesSpec};
pub use coordinator::{Authority, RotationCoordinator};
pub use euler::{AngleField, EulerState};
pub use quaternion::QuaternionState;

pub use glam::DQuat;
