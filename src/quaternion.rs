//! Quaternion view of the rotation: the value as shown in the editor's
//! per-component fields, ordered x, y, z, w.

use glam::DQuat;

use crate::format::format_component;
use crate::notify::Subscribers;

/// Tolerance for treating two quaternions as the same value.
///
/// Strict coefficient comparison: `q` and `-q` are distinct values even
/// though they encode the same rotation.
pub(crate) const QUAT_TOLERANCE: f64 = 1e-9;

pub(crate) fn quat_approx_eq(a: DQuat, b: DQuat) -> bool {
    a.abs_diff_eq(b, QUAT_TOLERANCE)
}

/// Coefficient comparison at the reduced precision of the display fields
/// (single-precision), so editing a field to a value that only differs in
/// digits the field cannot show is not treated as a change.
pub(crate) fn quat_approx_eq_display(a: DQuat, b: DQuat) -> bool {
    fn close(x: f64, y: f64) -> bool {
        (x as f32 - y as f32).abs() <= 1e-5
    }
    close(a.x, b.x) && close(a.y, b.y) && close(a.z, b.z) && close(a.w, b.w)
}

/// The quaternion as displayed and edited component-wise.
#[derive(Debug)]
pub struct QuaternionState {
    value: DQuat,
    read_only: bool,
    about_to_change: Subscribers<()>,
    changed: Subscribers<()>,
}

impl QuaternionState {
    pub fn new(value: DQuat) -> Self {
        Self {
            value,
            read_only: false,
            about_to_change: Subscribers::default(),
            changed: Subscribers::default(),
        }
    }

    pub fn quaternion(&self) -> DQuat {
        self.value
    }

    /// Store a new value, notifying observers. No-op within tolerance.
    ///
    /// Direct input is not normalized; composition during Euler conversion
    /// is what keeps the canonical rotation at unit norm.
    pub fn set_quaternion(&mut self, q: DQuat) {
        if quat_approx_eq(self.value, q) {
            return;
        }
        self.about_to_change.emit(&());
        self.value = q;
        self.changed.emit(&());
    }

    /// Summary of the components in display order: `"x; y; z; w"`.
    pub fn value_string(&self) -> String {
        format!(
            "{}; {}; {}; {}",
            format_component(self.value.x),
            format_component(self.value.y),
            format_component(self.value.z),
            format_component(self.value.w),
        )
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn on_about_to_change(&mut self, callback: impl FnMut(&()) + 'static) {
        self.about_to_change.subscribe(callback);
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) {
        self.changed.subscribe(callback);
    }
}

impl Default for QuaternionState {
    fn default() -> Self {
        Self::new(DQuat::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn identity_summary() {
        let state = QuaternionState::default();
        assert_eq!(state.value_string(), "0; 0; 0; 1");
    }

    #[test]
    fn rounded_summary() {
        let q = DQuat::from_axis_angle(glam::DVec3::X, 90f64.to_radians());
        let state = QuaternionState::new(q);
        assert_eq!(state.value_string(), "0.70711; 0; 0; 0.70711");
    }

    #[test]
    fn set_same_value_is_silent() {
        let mut state = QuaternionState::default();
        let changes = Rc::new(Cell::new(0));
        {
            let changes = changes.clone();
            state.on_changed(move |_| changes.set(changes.get() + 1));
        }
        state.set_quaternion(DQuat::IDENTITY);
        assert_eq!(changes.get(), 0);
        state.set_quaternion(DQuat::from_xyzw(1.0, 0.0, 0.0, 0.0));
        assert_eq!(changes.get(), 1);
        state.set_quaternion(DQuat::from_xyzw(1.0, 0.0, 0.0, 0.0));
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn display_compare_ignores_sub_precision_noise() {
        let a = DQuat::from_xyzw(0.7071067, 0.0, 0.0, 0.7071068);
        let b = DQuat::from_xyzw(0.70710675, 0.0, 0.0, 0.70710677);
        assert!(quat_approx_eq_display(a, b));
        assert!(!quat_approx_eq(a, b));
        let c = DQuat::from_xyzw(0.7072, 0.0, 0.0, 0.7070);
        assert!(!quat_approx_eq_display(a, c));
    }

    #[test]
    fn negated_quaternion_is_a_distinct_value() {
        let q = DQuat::from_axis_angle(glam::DVec3::Z, 1.0);
        assert!(!quat_approx_eq(q, -q));
    }
}
