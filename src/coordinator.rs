//! The combined rotation editor: one Euler view and one quaternion view of
//! the same rotation, kept synchronized without feedback loops.

use glam::DQuat;

use crate::axes::InvalidAxesSpec;
use crate::euler::EulerState;
use crate::format::{parse_scalar_list, split_axes_token};
use crate::guard::UpdateFlag;
use crate::notify::Subscribers;
use crate::quaternion::{QuaternionState, quat_approx_eq, quat_approx_eq_display};

/// Which view most recently drove an update. Only selects the display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Euler,
    Quaternion,
}

/// Owns the Euler and quaternion views of one rotation and propagates
/// updates between them.
///
/// Invariant: outside an in-progress update both views represent the same
/// rotation within tolerance. Propagation runs under a single scoped update
/// flag so an update pushed into one view cannot bounce back through the
/// other.
#[derive(Debug)]
pub struct RotationCoordinator {
    euler: EulerState,
    quaternion: QuaternionState,
    guard: UpdateFlag,
    authority: Authority,
    value: String,
    read_only: bool,
    about_to_change: Subscribers<()>,
    changed: Subscribers<()>,
}

impl RotationCoordinator {
    pub fn new(q: DQuat) -> Self {
        let euler = EulerState::new(q);
        let quaternion = QuaternionState::new(euler.quaternion());
        let mut coordinator = Self {
            euler,
            quaternion,
            guard: UpdateFlag::default(),
            authority: Authority::Euler,
            value: String::new(),
            read_only: false,
            about_to_change: Subscribers::default(),
            changed: Subscribers::default(),
        };
        coordinator.update_value_string();
        coordinator
    }

    /// The current rotation (the Euler view is the canonical holder).
    pub fn quaternion(&self) -> DQuat {
        self.euler.quaternion()
    }

    pub fn euler(&self) -> &EulerState {
        &self.euler
    }

    pub fn quaternion_state(&self) -> &QuaternionState {
        &self.quaternion
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    /// Combined display text: the Euler summary or `"quat: <components>"`,
    /// selected by the authoritative view.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn on_about_to_change(&mut self, callback: impl FnMut(&()) + 'static) {
        self.about_to_change.subscribe(callback);
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) {
        self.changed.subscribe(callback);
    }

    /// Programmatic set of the full rotation. Both views update; the display
    /// authority is left where it was.
    pub fn set_quaternion(&mut self, q: DQuat) {
        if quat_approx_eq(self.quaternion(), q) {
            return;
        }
        self.propagate(q);
        self.update_value_string();
    }

    /// Set the Euler angles (radians, field order); see
    /// [`EulerState::set_euler_angles`] for the `normalize` semantics.
    pub fn set_euler_angles(&mut self, angles: [f64; 3], normalize: bool) {
        let prev = self.euler.quaternion();
        self.euler.set_euler_angles(angles, normalize);
        self.after_euler_update(prev);
    }

    /// Switch the Euler view to a new axis spec; the rotation is preserved.
    pub fn set_euler_axes(&mut self, spec: &str) -> Result<(), InvalidAxesSpec> {
        let prev = self.euler.quaternion();
        self.euler.set_axes(spec)?;
        self.after_euler_update(prev);
        Ok(())
    }

    /// Edit one Euler angle field (degrees). Rejected while read-only.
    pub fn set_angle(&mut self, index: usize, degrees: f64) -> bool {
        if self.read_only {
            return false;
        }
        let prev = self.euler.quaternion();
        let accepted = self.euler.set_angle(index, degrees);
        if accepted {
            self.after_euler_update(prev);
        }
        accepted
    }

    /// Edit of the quaternion view's fields. Ignored while a propagating
    /// update is in progress, while read-only, or when the new value equals
    /// the current rotation at display precision.
    pub fn set_quaternion_value(&mut self, q: DQuat) {
        if self.read_only {
            return;
        }
        self.quaternion.set_quaternion(q);
        if self.guard.is_raised() {
            return;
        }
        if quat_approx_eq_display(q, self.quaternion()) {
            return;
        }
        self.propagate(q);
        self.authority = Authority::Quaternion;
        self.update_value_string();
    }

    /// Combined free-text edit: a leading `quat` token routes to quaternion
    /// parsing (`x; y; z; w`), anything else to the Euler grammar. A
    /// malformed edit is rejected and leaves the state unchanged.
    pub fn set_value(&mut self, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        let (token, rest) = split_axes_token(text);
        if token == Some("quat") {
            let Some([x, y, z, w]) = parse_scalar_list::<4>(rest) else {
                log::debug!("rejecting rotation edit {text:?}: expected four quaternion components");
                return false;
            };
            self.set_quaternion_value(DQuat::from_xyzw(x, y, z, w));
            return true;
        }
        let prev = self.euler.quaternion();
        let accepted = self.euler.set_value(text);
        if accepted {
            self.after_euler_update(prev);
        }
        accepted
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Propagates to both child views.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        self.euler.set_read_only(read_only);
        self.quaternion.set_read_only(read_only);
    }

    /// Restore from the persisted `{axes, e1, e2, e3}` mapping. Both views
    /// and the display text follow; a rejected mapping changes nothing.
    pub fn load(&mut self, config: &serde_json::Value) {
        let prev = self.euler.quaternion();
        self.euler.load(config);
        self.after_euler_update(prev);
    }

    pub fn save(&self, config: &mut serde_json::Map<String, serde_json::Value>) {
        self.euler.save(config);
    }

    /// Push `q` into both views under the update guard.
    fn propagate(&mut self, q: DQuat) {
        let _token = self.guard.raise();
        self.euler.set_quaternion(q);
        // Mirror the canonical (normalized) value back into the display.
        self.quaternion.set_quaternion(self.euler.quaternion());
    }

    /// Called after any mutation that went through the Euler view.
    fn after_euler_update(&mut self, prev: DQuat) {
        let now = self.euler.quaternion();
        if !quat_approx_eq(prev, now) {
            // The Euler view is master here: mirror into the quaternion view.
            self.quaternion.set_quaternion(now);
            if !self.guard.is_raised() {
                self.authority = Authority::Euler;
            }
        }
        self.update_value_string();
    }

    fn update_value_string(&mut self) {
        let value = match self.authority {
            Authority::Euler => self.euler.value().to_owned(),
            Authority::Quaternion => format!("quat: {}", self.quaternion.value_string()),
        };
        if value != self.value {
            self.about_to_change.emit(&());
            self.value = value;
            self.changed.emit(&());
        }
    }
}

impl Default for RotationCoordinator {
    fn default() -> Self {
        Self::new(DQuat::IDENTITY)
    }
}
