//! `threshold` attribute parsing
//!
//! The attribute is read with the same leading-prefix rules as a
//! scripting-language `parseFloat`: trailing garbage is dropped and input
//! without a numeric prefix becomes NaN. NaN is passed on to the observer
//! unchanged.

/// Effective threshold list for an attribute value
pub fn parse_threshold(attribute: Option<&str>) -> Vec<f64> {
    match attribute {
        Some(value) if !value.is_empty() => vec![parse_float(value)],
        _ => vec![0.0],
    }
}

/// Parse the longest leading decimal literal of `input`
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };

    if rest.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = rest.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let int_digits = digits_from(0);
    let mut end = int_digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if end == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digits_from(j.min(bytes.len()));
        if exp_digits > 0 {
            end = j + exp_digits;
        }
    }

    rest[..end]
        .parse::<f64>()
        .map(|v| sign * v)
        .unwrap_or(f64::NAN)
}
