//! Euler-angle view of the rotation: three angle fields tied to an axis
//! spec, kept consistent with a cached quaternion.

use glam::{DMat3, DQuat};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::axes::{AxisSpec, InvalidAxesSpec, axis_unit};
use crate::format::{format_angle, parse_scalar_list, split_axes_token};
use crate::guard::UpdateFlag;
use crate::notify::Subscribers;
use crate::quaternion::quat_approx_eq;

const XYZ_LABELS: [&str; 3] = ["x", "y", "z"];
const RPY_LABELS: [&str; 3] = ["roll", "pitch", "yaw"];

/// One per-axis sub-field: a display label and the angle in degrees.
#[derive(Debug, Clone)]
pub struct AngleField {
    label: String,
    degrees: f64,
    read_only: bool,
}

impl AngleField {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// Persisted layout: axis spec plus the three angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedRotation {
    axes: String,
    e1: f64,
    e2: f64,
    e3: f64,
}

/// Euler angles over an axis spec, with the equivalent quaternion cached.
///
/// Invariant: outside an in-progress update, the cached quaternion equals the
/// composition of the three axis rotations under the current spec.
#[derive(Debug)]
pub struct EulerState {
    /// Raw spec string as given (so `"rpy"` round-trips through save/load).
    spec_string: String,
    spec: AxisSpec,
    fields: [AngleField; 3],
    quaternion: DQuat,
    value: String,
    /// Raised while recomputed angles are pushed into the fields, so field
    /// writes don't re-trigger the recomputation that produced them.
    ignore_child_updates: UpdateFlag,
    read_only: bool,
    about_to_change: Subscribers<()>,
    changed: Subscribers<()>,
    quaternion_changed: Subscribers<DQuat>,
}

impl EulerState {
    /// A state over the default `"rpy"` spec, with angles derived from `q`.
    pub fn new(q: DQuat) -> Self {
        let spec = AxisSpec { axes: [0, 1, 2], fixed: true };
        let fields = std::array::from_fn(|i| AngleField {
            label: RPY_LABELS[spec.axes[i]].to_owned(),
            degrees: 0.0,
            read_only: false,
        });
        let mut state = Self {
            spec_string: "rpy".to_owned(),
            spec,
            fields,
            quaternion: q,
            value: String::new(),
            ignore_child_updates: UpdateFlag::default(),
            read_only: false,
            about_to_change: Subscribers::default(),
            changed: Subscribers::default(),
            quaternion_changed: Subscribers::default(),
        };
        state.update_angles();
        state
    }

    pub fn quaternion(&self) -> DQuat {
        self.quaternion
    }

    pub fn axes_string(&self) -> &str {
        &self.spec_string
    }

    pub fn axis_spec(&self) -> AxisSpec {
        self.spec
    }

    pub fn fields(&self) -> &[AngleField; 3] {
        &self.fields
    }

    /// The three angles in radians, field order.
    pub fn euler_angles(&self) -> [f64; 3] {
        std::array::from_fn(|i| self.fields[i].degrees.to_radians())
    }

    /// Summary string `"<spec>: <a1>; <a2>; <a3>"` with angles in degrees.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn on_about_to_change(&mut self, callback: impl FnMut(&()) + 'static) {
        self.about_to_change.subscribe(callback);
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) {
        self.changed.subscribe(callback);
    }

    /// Fires exactly when the cached quaternion moves beyond tolerance.
    pub fn on_quaternion_changed(&mut self, callback: impl FnMut(&DQuat) + 'static) {
        self.quaternion_changed.subscribe(callback);
    }

    /// Adopt `q` and re-derive the angles. No-op within tolerance.
    ///
    /// The value actually stored is the recomposition of the derived angles,
    /// so a non-unit input ends up normalized and `quaternion_changed` fires
    /// iff the stored value moved.
    pub fn set_quaternion(&mut self, q: DQuat) {
        if quat_approx_eq(self.quaternion, q) {
            return;
        }
        let angles = Self::angles_for(self.spec, q);
        self.set_euler_angles(angles, false);
    }

    /// Set all three angles (radians, field order).
    ///
    /// With `normalize` the composed quaternion becomes the canonical state
    /// and the angles are re-derived from it; without it the given angles are
    /// stored as-is alongside the composed quaternion, so an angle the user
    /// just typed is not replaced by a different but equivalent decomposition.
    pub fn set_euler_angles(&mut self, angles: [f64; 3], normalize: bool) {
        let q = self.compose(angles);
        if normalize {
            self.set_quaternion(q);
            return;
        }

        if !self.ignore_child_updates.is_raised() {
            let _token = self.ignore_child_updates.raise();
            for (field, angle) in self.fields.iter_mut().zip(angles) {
                field.degrees = angle.to_degrees();
            }
        }

        self.about_to_change.emit(&());
        if !quat_approx_eq(self.quaternion, q) {
            self.quaternion = q;
            self.quaternion_changed.emit(&q);
        }
        self.update_value_string();
        self.changed.emit(&());
    }

    /// Edit one angle field (degrees). Rejected while read-only.
    pub fn set_angle(&mut self, index: usize, degrees: f64) -> bool {
        if self.read_only || index >= 3 {
            return false;
        }
        self.fields[index].degrees = degrees;
        if self.ignore_child_updates.is_raised() {
            return true;
        }
        let angles = self.euler_angles();
        let _token = self.ignore_child_updates.raise();
        self.set_euler_angles(angles, false);
        true
    }

    /// Switch to a new axis spec, re-expressing the current rotation under
    /// it. The quaternion is preserved; the angles are recomputed. No-op if
    /// the spec string is unchanged.
    pub fn set_axes(&mut self, spec: &str) -> Result<(), InvalidAxesSpec> {
        if self.spec_string == spec {
            return Ok(());
        }
        let parsed = AxisSpec::parse(spec)?;
        self.apply_axes(spec, parsed);
        Ok(())
    }

    fn apply_axes(&mut self, spec: &str, parsed: AxisSpec) {
        let labels = if spec == "rpy" { RPY_LABELS } else { XYZ_LABELS };
        self.spec_string = spec.to_owned();
        self.spec = parsed;
        for (field, axis) in self.fields.iter_mut().zip(parsed.axes) {
            field.label = labels[axis].to_owned();
        }
        self.update_angles();
    }

    /// Free-text edit: optional axes token, then three `;`-separated degree
    /// values. The whole input is validated before any state changes; a
    /// malformed edit is rejected and leaves the state untouched.
    pub fn set_value(&mut self, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        let (token, rest) = split_axes_token(text);
        let parsed = match token {
            Some(tok) => match AxisSpec::parse(tok) {
                Ok(parsed) => Some((tok, parsed)),
                Err(err) => {
                    log::debug!("rejecting rotation edit {text:?}: {err}");
                    return false;
                }
            },
            None => None,
        };
        let Some(degrees) = parse_scalar_list::<3>(rest) else {
            log::debug!("rejecting rotation edit {text:?}: expected three angle values");
            return false;
        };

        if let Some((tok, parsed)) = parsed {
            if self.spec_string != tok {
                self.apply_axes(tok, parsed);
            }
        }
        self.set_euler_angles(degrees.map(f64::to_radians), false);
        true
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        for field in &mut self.fields {
            field.read_only = read_only;
        }
    }

    /// Restore from a persisted mapping with keys `axes`, `e1`, `e2`, `e3`
    /// (degrees). Applied as one atomic update; missing or malformed keys
    /// leave the current state untouched.
    pub fn load(&mut self, config: &serde_json::Value) {
        let Ok(persisted) = serde_json::from_value::<PersistedRotation>(config.clone()) else {
            return;
        };
        if let Err(err) = self.set_axes(&persisted.axes) {
            log::warn!(
                "ignoring persisted rotation with invalid axes {:?}: {err}",
                persisted.axes
            );
            return;
        }
        let degrees = [persisted.e1, persisted.e2, persisted.e3];
        self.set_euler_angles(degrees.map(f64::to_radians), true);
    }

    /// Write the axis spec and the three angle fields (degrees) into the
    /// mapping, overwriting existing entries.
    pub fn save(&self, config: &mut serde_json::Map<String, serde_json::Value>) {
        config.insert("axes".to_owned(), json!(self.spec_string));
        config.insert("e1".to_owned(), json!(self.fields[0].degrees));
        config.insert("e2".to_owned(), json!(self.fields[1].degrees));
        config.insert("e3".to_owned(), json!(self.fields[2].degrees));
    }

    /// Compose the quaternion for the given angles under the current spec.
    ///
    /// Static frame: angles apply in field order about world axes, so the
    /// factors multiply in reverse. Rotating frame: factors multiply in
    /// field order.
    fn compose(&self, angles: [f64; 3]) -> DQuat {
        let r = |i: usize| DQuat::from_axis_angle(axis_unit(self.spec.axes[i]), angles[i]);
        if self.spec.fixed {
            r(2) * r(1) * r(0)
        } else {
            r(0) * r(1) * r(2)
        }
    }

    /// Re-derive the angle fields from the cached quaternion. Never
    /// re-normalizes: the decomposition feeds `set_euler_angles` with
    /// `normalize = false`.
    fn update_angles(&mut self) {
        let angles = Self::angles_for(self.spec, self.quaternion);
        self.set_euler_angles(angles, false);
    }

    /// Angles (field order) whose composition under `spec` equals `q`.
    fn angles_for(spec: AxisSpec, q: DQuat) -> [f64; 3] {
        // The matrix form assumes unit norm; direct quaternion input may not
        // have it.
        let q = q.normalize();
        let [a0, a1, a2] = spec.axes;
        if spec.fixed {
            // Reversed axis order compensates for the reversed composition;
            // swap first/last to get back to field order.
            let e = decompose(q, a2, a1, a0);
            [e[2], e[1], e[0]]
        } else {
            decompose(q, a0, a1, a2)
        }
    }

    fn update_value_string(&mut self) {
        self.value = format!(
            "{}: {}; {}; {}",
            self.spec_string,
            format_angle(self.fields[0].degrees),
            format_angle(self.fields[1].degrees),
            format_angle(self.fields[2].degrees),
        );
    }
}

impl Default for EulerState {
    fn default() -> Self {
        Self::new(DQuat::IDENTITY)
    }
}

/// Generic Euler decomposition, matching Eigen's
/// `MatrixBase::eulerAngles(a0, a1, a2)`: returns `[t0, t1, t2]` such that
/// the rotation equals `R(a0, t0) · R(a1, t1) · R(a2, t2)`, with `t0` in
/// `[0, π]` and the other angles in `[-π, π]`.
fn decompose(q: DQuat, a0: usize, a1: usize, a2: usize) -> [f64; 3] {
    use std::f64::consts::PI;

    let m = DMat3::from_quat(q);
    let coeff = |row: usize, col: usize| m.col(col)[row];

    let odd = (a0 + 1) % 3 != a1;
    let i = a0;
    let (j, k) = if odd {
        ((a0 + 2) % 3, (a0 + 1) % 3)
    } else {
        ((a0 + 1) % 3, (a0 + 2) % 3)
    };

    let mut res = [0.0f64; 3];
    if a0 == a2 {
        // Proper Euler sequence (first and last axis coincide).
        res[0] = coeff(j, i).atan2(coeff(k, i));
        let s2 = coeff(j, i).hypot(coeff(k, i));
        if (odd && res[0] < 0.0) || (!odd && res[0] > 0.0) {
            res[0] = if res[0] > 0.0 { res[0] - PI } else { res[0] + PI };
            res[1] = -s2.atan2(coeff(i, i));
        } else {
            res[1] = s2.atan2(coeff(i, i));
        }
        let (s1, c1) = res[0].sin_cos();
        res[2] = (c1 * coeff(j, k) - s1 * coeff(k, k))
            .atan2(c1 * coeff(j, j) - s1 * coeff(k, j));
    } else {
        // Tait-Bryan sequence (three distinct axes).
        res[0] = coeff(j, k).atan2(coeff(k, k));
        let c2 = coeff(i, i).hypot(coeff(i, j));
        if (odd && res[0] < 0.0) || (!odd && res[0] > 0.0) {
            res[0] = if res[0] > 0.0 { res[0] - PI } else { res[0] + PI };
            res[1] = (-coeff(i, k)).atan2(-c2);
        } else {
            res[1] = (-coeff(i, k)).atan2(c2);
        }
        let (s1, c1) = res[0].sin_cos();
        res[2] = (s1 * coeff(k, i) - c1 * coeff(j, i))
            .atan2(c1 * coeff(j, j) - s1 * coeff(k, j));
    }
    if !odd {
        for r in &mut res {
            *r = -*r;
        }
    }
    res
}
