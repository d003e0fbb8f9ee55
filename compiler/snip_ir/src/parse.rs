//! Text to value parsing with the runtime's standard rules.
//!
//! Shared by the `T.Parse` library routines in the VM and by the engine's
//! argument coercion, so a snippet parsing `"42"` and a caller passing `"42"`
//! as a parameter value agree on the result.
//!
//! - Integers: optional surrounding whitespace, optional sign, decimal digits.
//! - Booleans: `true` / `false` in any case, surrounding whitespace allowed.
//! - Floats: decimal and exponent notation, `NaN`, `Infinity`, `-Infinity`.
//!   Out-of-range magnitudes become infinities rather than failing.
//! - Chars: exactly one character.
//! - Strings and objects: the text itself.

use std::fmt;

use crate::types::SemanticType;
use crate::value::Value;

/// Why a text did not parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    /// Not in the accepted syntax.
    Format,
    /// Well-formed but outside the target type's range.
    Overflow,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::Format => f.write_str("format"),
            ParseFailure::Overflow => f.write_str("overflow"),
        }
    }
}

/// Parse `text` as a value of semantic type `ty`.
pub fn parse_value(text: &str, ty: SemanticType) -> Result<Value, ParseFailure> {
    match ty {
        SemanticType::Boolean => parse_bool(text).map(Value::Bool),
        SemanticType::Byte => {
            let n = parse_integer(text, i128::from(u8::MIN), i128::from(u8::MAX))?;
            u8::try_from(n).map(Value::Byte).map_err(|_| ParseFailure::Overflow)
        }
        SemanticType::Int16 => {
            let n = parse_integer(text, i128::from(i16::MIN), i128::from(i16::MAX))?;
            i16::try_from(n).map(Value::Int16).map_err(|_| ParseFailure::Overflow)
        }
        SemanticType::Int32 => {
            let n = parse_integer(text, i128::from(i32::MIN), i128::from(i32::MAX))?;
            i32::try_from(n).map(Value::Int32).map_err(|_| ParseFailure::Overflow)
        }
        SemanticType::Int64 => {
            let n = parse_integer(text, i128::from(i64::MIN), i128::from(i64::MAX))?;
            i64::try_from(n).map(Value::Int64).map_err(|_| ParseFailure::Overflow)
        }
        SemanticType::Single => parse_float(text)
            .and_then(|s| s.parse::<f32>().map_err(|_| ParseFailure::Format))
            .map(Value::Single),
        SemanticType::Double => parse_float(text)
            .and_then(|s| s.parse::<f64>().map_err(|_| ParseFailure::Format))
            .map(Value::Double),
        SemanticType::Char => parse_char(text).map(Value::Char),
        SemanticType::String | SemanticType::Object => Ok(Value::string(text)),
    }
}

/// `true` or `false`, ignoring case and surrounding whitespace.
pub fn parse_bool(text: &str) -> Result<bool, ParseFailure> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseFailure::Format)
    }
}

/// Exactly one character.
pub fn parse_char(text: &str) -> Result<char, ParseFailure> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ParseFailure::Format),
    }
}

/// A decimal integer within `min..=max`.
pub fn parse_integer(text: &str, min: i128, max: i128) -> Result<i128, ParseFailure> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseFailure::Format);
    }

    // Leading zeros are harmless; anything longer than 20 significant digits
    // is out of range for every integer type.
    let significant = digits.trim_start_matches('0');
    if significant.len() > 20 {
        return Err(ParseFailure::Overflow);
    }
    let magnitude = if significant.is_empty() {
        0
    } else {
        significant
            .parse::<i128>()
            .map_err(|_| ParseFailure::Overflow)?
    };
    let value = if negative { -magnitude } else { magnitude };
    if value < min || value > max {
        return Err(ParseFailure::Overflow);
    }
    Ok(value)
}

/// Validate float syntax and return the normalized text for `str::parse`.
fn parse_float(text: &str) -> Result<String, ParseFailure> {
    let text = text.trim();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => ("-", &text[1..]),
        Some(b'+') => ("", &text[1..]),
        _ => ("", text),
    };

    if rest.eq_ignore_ascii_case("infinity") {
        return Ok(format!("{sign}inf"));
    }
    if rest.eq_ignore_ascii_case("nan") {
        return Ok("NaN".to_string());
    }

    let bytes = rest.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return Err(ParseFailure::Format);
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return Err(ParseFailure::Format);
        }
    }
    if i != bytes.len() {
        return Err(ParseFailure::Format);
    }
    Ok(format!("{sign}{rest}"))
}

#[cfg(test)]
mod tests;
