//! Text formatting and parsing shared by the editor's display strings and
//! free-text edits: fixed-precision floats with trailing zeros trimmed, and
//! `;`-separated numeric lists.

/// Format an angle in degrees with one decimal place, stripping a trailing
/// `.0` so whole degrees read as integers (`"90"`, `"30.5"`, `"0"`).
pub fn format_angle(degrees: f64) -> String {
    let s = format!("{degrees:.1}");
    match s.strip_suffix(".0") {
        // "-0" would survive the strip for tiny negative noise.
        Some("-0") => "0".to_owned(),
        Some(stripped) => stripped.to_owned(),
        None => s,
    }
}

/// Format a quaternion component: five decimal places with trailing zeros
/// (and a bare trailing dot) trimmed.
pub fn format_component(value: f64) -> String {
    let s = format!("{value:.5}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_owned() } else { trimmed.to_owned() }
}

/// Parse exactly `N` `;`-separated numbers, whitespace-tolerant.
///
/// A wrong count or any non-numeric entry rejects the whole input.
pub fn parse_scalar_list<const N: usize>(input: &str) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    let mut parts = input.split(';');
    for slot in &mut values {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(values)
}

/// Split a free-text value into an optional leading axes token and the
/// remainder. The token is a run of lowercase letters, optionally followed
/// by `:`; surrounding whitespace is ignored.
pub fn split_axes_token(input: &str) -> (Option<&str>, &str) {
    let s = input.trim_start();
    let token_len = s.chars().take_while(|c| c.is_ascii_lowercase()).count();
    if token_len == 0 {
        return (None, input);
    }
    let (token, mut rest) = s.split_at(token_len);
    rest = rest.trim_start();
    if let Some(stripped) = rest.strip_prefix(':') {
        rest = stripped;
    }
    (Some(token), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_degrees_lose_the_decimal() {
        assert_eq!(format_angle(90.0), "90");
        assert_eq!(format_angle(0.0), "0");
        assert_eq!(format_angle(-45.0), "-45");
    }

    #[test]
    fn fractional_degrees_keep_one_decimal() {
        assert_eq!(format_angle(30.5), "30.5");
        assert_eq!(format_angle(10.04), "10");
        assert_eq!(format_angle(10.06), "10.1");
    }

    #[test]
    fn negative_noise_rounds_to_plain_zero() {
        assert_eq!(format_angle(-1e-9), "0");
    }

    #[test]
    fn components_trim_trailing_zeros() {
        assert_eq!(format_component(0.70711), "0.70711");
        assert_eq!(format_component(0.5), "0.5");
        assert_eq!(format_component(1.0), "1");
        assert_eq!(format_component(0.0), "0");
        assert_eq!(format_component(-0.000001), "0");
    }

    #[test]
    fn scalar_list_happy_path() {
        assert_eq!(parse_scalar_list::<3>("10; 20; 30"), Some([10.0, 20.0, 30.0]));
        assert_eq!(parse_scalar_list::<3>(" 1;2 ;3 "), Some([1.0, 2.0, 3.0]));
        assert_eq!(parse_scalar_list::<4>("0;0;0.707;0.707"), Some([0.0, 0.0, 0.707, 0.707]));
    }

    #[test]
    fn scalar_list_wrong_count() {
        assert_eq!(parse_scalar_list::<3>("1; 2"), None);
        assert_eq!(parse_scalar_list::<3>("1; 2; 3; 4"), None);
        assert_eq!(parse_scalar_list::<3>(""), None);
    }

    #[test]
    fn scalar_list_non_numeric() {
        assert_eq!(parse_scalar_list::<3>("1; two; 3"), None);
        assert_eq!(parse_scalar_list::<3>("1; ; 3"), None);
    }

    #[test]
    fn axes_token_split() {
        assert_eq!(split_axes_token("xyz: 10; 20; 30"), (Some("xyz"), " 10; 20; 30"));
        assert_eq!(split_axes_token("  sxyz 1;2;3"), (Some("sxyz"), "1;2;3"));
        assert_eq!(split_axes_token("10; 20; 30"), (None, "10; 20; 30"));
        assert_eq!(split_axes_token("bad: 1;2;3").0, Some("bad"));
    }
}
