//! Number text for QSN numeric leaves.
//!
//! Numbers are written the way ECMAScript's `Number.prototype.toString` writes them,
//! using the shortest digits that round-trip (via `ryu`), except that a positive
//! exponent carries no `+` sign: `1.234e25`, not `1.234e+25`.

use crate::{Error, Result};

/// Appends the canonical text of a finite `f64` to `out`.
///
/// # Errors
///
/// Returns [`Error::NonFiniteNumber`] for NaN and the infinities, which QSN cannot
/// represent.
pub fn write_number(value: f64, out: &mut String) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::NonFiniteNumber(value));
    }
    if value == 0.0 {
        // Covers -0.0 as well.
        out.push('0');
        return Ok(());
    }
    if value < 0.0 {
        out.push('-');
    }

    let mut buf = ryu::Buffer::new();
    let (digits, point) = decompose(buf.format_finite(value.abs()));
    let k = digits.len() as i32;

    if k <= point && point <= 21 {
        push_digits(out, &digits);
        for _ in 0..(point - k) {
            out.push('0');
        }
    } else if 0 < point && point <= 21 {
        let split = point as usize;
        push_digits(out, &digits[..split]);
        out.push('.');
        push_digits(out, &digits[split..]);
    } else if -6 < point && point <= 0 {
        out.push_str("0.");
        for _ in 0..(-point) {
            out.push('0');
        }
        push_digits(out, &digits);
    } else {
        push_digits(out, &digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            push_digits(out, &digits[1..]);
        }
        out.push('e');
        out.push_str(&(point - 1).to_string());
    }
    Ok(())
}

/// Returns the canonical text of a finite `f64`.
///
/// ```rust
/// use serde_qsn::number::format_number;
///
/// assert_eq!(format_number(42.0).unwrap(), "42");
/// assert_eq!(format_number(0.5).unwrap(), "0.5");
/// assert_eq!(format_number(1.234e25).unwrap(), "1.234e25");
/// assert_eq!(format_number(1e-7).unwrap(), "1e-7");
/// assert!(format_number(f64::NAN).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::NonFiniteNumber`] for NaN and the infinities.
pub fn format_number(value: f64) -> Result<String> {
    let mut out = String::with_capacity(24);
    write_number(value, &mut out)?;
    Ok(out)
}

/// Splits ryu output into significant digits and a decimal exponent `n` such that
/// the value equals `0.d1d2...dk * 10^n`. Leading and trailing zeros are dropped.
fn decompose(raw: &str) -> (Vec<u8>, i32) {
    let (mantissa, exp) = match raw.find('e') {
        Some(idx) => {
            // ryu always writes a plain signed integer exponent.
            let exp = raw[idx + 1..].parse::<i32>();
            debug_assert!(exp.is_ok(), "malformed exponent in {:?}", raw);
            (&raw[..idx], exp.unwrap_or_default())
        }
        None => (raw, 0),
    };

    let mut digits = Vec::with_capacity(mantissa.len());
    let mut point = None;
    for b in mantissa.bytes() {
        if b == b'.' {
            point = Some(digits.len());
        } else {
            digits.push(b);
        }
    }
    let mut point = point.unwrap_or(digits.len()) as i32;

    let leading = digits.iter().take_while(|&&d| d == b'0').count();
    digits.drain(..leading);
    point -= leading as i32;
    while digits.last() == Some(&b'0') {
        digits.pop();
    }

    (digits, point + exp)
}

#[inline]
fn push_digits(out: &mut String, digits: &[u8]) {
    out.extend(digits.iter().map(|&d| d as char));
}

/// Returns `true` if `token` matches `-?\d+(\.\d+)?(e[+-]?\d+)?`.
#[must_use]
pub fn is_numeric_literal(token: &str) -> bool {
    let b = token.as_bytes();
    let mut i = 0;

    if b.first() == Some(&b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }

    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }

    if i < b.len() && b[i] == b'e' {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == b.len()
}

/// Parses the text of a numeric leaf (without its leading `!`).
///
/// Text matching [`is_numeric_literal`] is parsed directly; anything else gets one
/// more chance through the standard float parser. The result must be finite.
#[must_use]
pub fn parse_number(token: &str) -> Option<f64> {
    let parsed = if is_numeric_literal(token) {
        token.parse::<f64>().ok()
    } else {
        token
            .parse::<f64>()
            .ok()
            .filter(|_| token.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)))
    };
    parsed.filter(|n| n.is_finite())
}
