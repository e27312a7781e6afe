// src/dsv/coerce.rs

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::Value;

/// Values longer than this stay text; f64 can't hold them exactly anyway.
pub const MAX_NUMERIC_LEN: usize = 16;

/// Deliberately loose: `1.2.3` and `-..` both match.
static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9.]+$").expect("numeric pattern should compile"));

/// True when `raw` qualifies for numeric coercion.
pub fn looks_numeric(raw: &str) -> bool {
    !raw.is_empty() && raw.len() <= MAX_NUMERIC_LEN && NUMERIC_RE.is_match(raw)
}

/// Turn a raw field into a `Value`, coercing numeric-looking text.
pub fn coerce(raw: &str) -> Value {
    if looks_numeric(raw) {
        Value::Number(parse_float_prefix(raw))
    } else {
        Value::Text(raw.to_string())
    }
}

/// Parses the longest `-?digits[.digits]` prefix of `s`, the way `parseFloat`
/// does for the characters `looks_numeric` admits. No digit at all → NaN.
pub fn parse_float_prefix(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut digits = 0;

    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("42"));
        assert!(looks_numeric("-3.5"));
        assert!(looks_numeric("1.2.3"));
        assert!(looks_numeric("-.."));
        assert!(looks_numeric("1234567890123456"));
        assert!(!looks_numeric("12345678901234567"));
        assert!(!looks_numeric(""));
        assert!(!looks_numeric("-"));
        assert!(!looks_numeric("+1"));
        assert!(!looks_numeric("1e5"));
        assert!(!looks_numeric(" 1"));
        // unicode digits are not digits here
        assert!(!looks_numeric("١٢"));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), 42.0);
        assert_eq!(parse_float_prefix("-3.5"), -3.5);
        assert_eq!(parse_float_prefix("1.2.3"), 1.2);
        assert_eq!(parse_float_prefix("1..2"), 1.0);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert_eq!(parse_float_prefix("7."), 7.0);
        assert_eq!(parse_float_prefix("007"), 7.0);
        assert!(parse_float_prefix("-..").is_nan());
        assert!(parse_float_prefix(".").is_nan());
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("100"), Value::Number(100.0));
        assert_eq!(coerce("Acme"), Value::Text("Acme".into()));
        assert_eq!(
            coerce("12345678901234567"),
            Value::Text("12345678901234567".into())
        );
        match coerce("-..") {
            Value::Number(n) => assert!(n.is_nan()),
            other => panic!("expected NaN number, got {:?}", other),
        }
    }
}
