//! Axis-spec strings: composition order plus frame convention, e.g. `"sxyz"`.

use glam::DVec3;

/// Rejected axis-spec string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAxesSpec {
    #[error("invalid axes string: expecting 3 axis specs from x,y,z")]
    Malformed,
    #[error("invalid axis char: {0} (only xyz allowed)")]
    BadAxisChar(char),
    #[error("consecutive axes need to be different")]
    RepeatedAxis,
}

/// Validated axis order and frame convention for a Euler-angle triple.
///
/// Immutable once parsed; re-specification replaces the whole value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpec {
    /// Axis index (0 = x, 1 = y, 2 = z) for each of the three rotations.
    pub axes: [usize; 3],
    /// Static/world-frame composition (`s` prefix) vs. rotating/body-frame
    /// composition (`r` prefix or none).
    pub fixed: bool,
}

impl AxisSpec {
    /// Parse a spec like `"sxyz"`, `"rzxz"`, `"xyz"`, or the alias `"rpy"`
    /// (which expands to `"sxyz"`).
    pub fn parse(spec: &str) -> Result<Self, InvalidAxesSpec> {
        let expanded = if spec == "rpy" { "sxyz" } else { spec };

        let (fixed, rest) = if let Some(rest) = expanded.strip_prefix('s') {
            (true, rest)
        } else if let Some(rest) = expanded.strip_prefix('r') {
            (false, rest)
        } else {
            (false, expanded)
        };

        if rest.len() != 3 {
            return Err(InvalidAxesSpec::Malformed);
        }

        let mut axes = [0usize; 3];
        for (i, c) in rest.chars().enumerate() {
            let idx = match c {
                'x' => 0,
                'y' => 1,
                'z' => 2,
                other => return Err(InvalidAxesSpec::BadAxisChar(other)),
            };
            if i > 0 && axes[i - 1] == idx {
                return Err(InvalidAxesSpec::RepeatedAxis);
            }
            axes[i] = idx;
        }

        Ok(Self { axes, fixed })
    }
}

/// Unit basis vector for an axis index.
pub(crate) fn axis_unit(idx: usize) -> DVec3 {
    match idx {
        0 => DVec3::X,
        1 => DVec3::Y,
        _ => DVec3::Z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_frame_prefix() {
        let spec = AxisSpec::parse("sxyz").unwrap();
        assert!(spec.fixed);
        assert_eq!(spec.axes, [0, 1, 2]);
    }

    #[test]
    fn rotating_frame_prefix() {
        let spec = AxisSpec::parse("ryxz").unwrap();
        assert!(!spec.fixed);
        assert_eq!(spec.axes, [1, 0, 2]);
    }

    #[test]
    fn no_prefix_defaults_to_rotating() {
        let spec = AxisSpec::parse("zyx").unwrap();
        assert!(!spec.fixed);
        assert_eq!(spec.axes, [2, 1, 0]);
    }

    #[test]
    fn rpy_alias_is_static_xyz() {
        assert_eq!(AxisSpec::parse("rpy").unwrap(), AxisSpec::parse("sxyz").unwrap());
    }

    #[test]
    fn proper_euler_sequences_allowed() {
        // Repeated first/last axis is fine as long as neighbors differ.
        let spec = AxisSpec::parse("szxz").unwrap();
        assert!(spec.fixed);
        assert_eq!(spec.axes, [2, 0, 2]);
    }

    #[test]
    fn empty_and_short_specs_rejected() {
        assert_eq!(AxisSpec::parse(""), Err(InvalidAxesSpec::Malformed));
        assert_eq!(AxisSpec::parse("xy"), Err(InvalidAxesSpec::Malformed));
        assert_eq!(AxisSpec::parse("s"), Err(InvalidAxesSpec::Malformed));
        assert_eq!(AxisSpec::parse("sxyzx"), Err(InvalidAxesSpec::Malformed));
    }

    #[test]
    fn bad_axis_char_is_named() {
        assert_eq!(AxisSpec::parse("xyq"), Err(InvalidAxesSpec::BadAxisChar('q')));
        // Case-sensitive: uppercase is not an axis letter.
        assert_eq!(AxisSpec::parse("XYZ"), Err(InvalidAxesSpec::BadAxisChar('X')));
    }

    #[test]
    fn consecutive_axes_rejected() {
        assert_eq!(AxisSpec::parse("xxz"), Err(InvalidAxesSpec::RepeatedAxis));
        assert_eq!(AxisSpec::parse("szzx"), Err(InvalidAxesSpec::RepeatedAxis));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            AxisSpec::parse("xyq").unwrap_err().to_string(),
            "invalid axis char: q (only xyz allowed)"
        );
        assert_eq!(
            AxisSpec::parse("xxz").unwrap_err().to_string(),
            "consecutive axes need to be different"
        );
    }
}
