//! Text parsing and rendering used by the scalar coercion rules.

use std::borrow::Cow;
use std::num::{ParseFloatError, ParseIntError};

use crate::error::CoerceError;

/// Parse an integer, inferring the base from its prefix.
///
/// Accepts an optional sign followed by `0x`/`0X` (hex), `0o`/`0O` (octal),
/// `0b`/`0B` (binary), a bare leading `0` (octal), or plain decimal digits.
/// Single underscores may separate digits (`1_000`, `0x_ff`).
pub fn parse_int(text: &str) -> Result<i64, ParseIntError> {
    let (sign, unsigned) = match text.as_bytes().first() {
        Some(b'-') => ("-", &text[1..]),
        Some(b'+') => ("", &text[1..]),
        _ => ("", text),
    };

    let unsigned = if unsigned.contains('_') {
        if !underscores_separate_digits(unsigned) {
            return text.parse::<i64>();
        }
        Cow::Owned(unsigned.replace('_', ""))
    } else {
        Cow::Borrowed(unsigned)
    };
    let unsigned = unsigned.as_ref();

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..]),
        _ => (10, unsigned),
    };

    // A second sign after the prefix is malformed; std would accept it.
    if digits.starts_with(['+', '-']) {
        return text.parse::<i64>();
    }
    i64::from_str_radix(&format!("{sign}{digits}"), radix)
}

/// Every `_` sits between two digits, a base prefix counting as a digit.
fn underscores_separate_digits(unsigned: &str) -> bool {
    let bytes = unsigned.as_bytes();
    let (hex, start) = match bytes {
        [b'0', p, ..] if p.eq_ignore_ascii_case(&b'x') => (true, 2),
        [b'0', p, ..] if p.eq_ignore_ascii_case(&b'o') || p.eq_ignore_ascii_case(&b'b') => {
            (false, 2)
        }
        _ => (false, 0),
    };

    let mut after_digit = start > 0;
    let mut after_underscore = false;
    for &b in &bytes[start..] {
        let digit = b.is_ascii_digit() || (hex && b.is_ascii_hexdigit());
        if b == b'_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
            after_underscore = true;
        } else if after_underscore && !digit {
            return false;
        } else {
            after_digit = digit;
            after_underscore = false;
        }
    }
    !after_underscore
}

pub fn parse_float(text: &str) -> Result<f64, ParseFloatError> {
    text.parse::<f64>()
}

/// Lenient boolean parse over the usual truthy/falsy spellings.
pub fn parse_bool(text: &str) -> Result<bool, CoerceError> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
        _ => Err(CoerceError::ParseBool(text.to_string())),
    }
}

/// Shortest decimal rendering that round-trips, without an exponent.
pub fn format_float(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefixes() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int("-42").unwrap(), -42);
        assert_eq!(parse_int("+7").unwrap(), 7);
        assert_eq!(parse_int("0x1F").unwrap(), 31);
        assert_eq!(parse_int("-0X10").unwrap(), -16);
        assert_eq!(parse_int("0o17").unwrap(), 15);
        assert_eq!(parse_int("017").unwrap(), 15);
        assert_eq!(parse_int("0b101").unwrap(), 5);
        assert_eq!(parse_int("0").unwrap(), 0);
        assert_eq!(parse_int("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn malformed_ints() {
        for text in ["", "-", "abc", "0x", "0x-5", "0x+5", "09", "1.5", " 1"] {
            assert!(parse_int(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn underscores_separate_digits_only() {
        assert_eq!(parse_int("1_000").unwrap(), 1000);
        assert_eq!(parse_int("-1_000_000").unwrap(), -1_000_000);
        assert_eq!(parse_int("0x_ff_ff").unwrap(), 0xffff);
        assert_eq!(parse_int("0b1_0").unwrap(), 2);
        assert_eq!(parse_int("0_17").unwrap(), 15);
        for text in ["_1", "1_", "1__0", "0x_", "1_x", "_"] {
            assert!(parse_int(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn bool_spellings() {
        for text in ["1", "t", "T", "true", "TRUE", "True", "yes", "on"] {
            assert!(parse_bool(text).unwrap(), "{text:?}");
        }
        for text in ["0", "f", "F", "false", "FALSE", "no", "off"] {
            assert!(!parse_bool(text).unwrap(), "{text:?}");
        }
        assert!(matches!(parse_bool("maybe"), Err(CoerceError::ParseBool(s)) if s == "maybe"));
    }

    #[test]
    fn float_rendering_is_minimal() {
        assert_eq!(format_float(3.0), "3");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(1e21), "1000000000000000000000");
        assert_eq!(parse_float("2.5e3").unwrap(), 2500.0);
        assert!(parse_float("2,5").is_err());
    }
}
