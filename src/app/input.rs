//! Operator line input and lenient number parsing.
//!
//! Lines are collected into a fixed-capacity buffer.  Numbers are parsed
//! the way the legacy serial firmware did it: skip leading whitespace,
//! take the longest decimal prefix, and fall back to `0.0` when there is
//! no number at all.  The fallback is reported through
//! [`ParsedNumber::coerced`] so the caller can warn or reject.

use heapless::String;
use log::{debug, warn};

use super::ports::{ConsoleError, ConsolePort};

/// Maximum bytes kept per line; the rest of an over-long line is dropped.
pub const LINE_CAPACITY: usize = 32;

pub type LineBuf = String<LINE_CAPACITY>;

/// Block until a non-empty line arrives.
///
/// Leading CR/LF bytes (left over from the command keystroke's line
/// ending) are skipped.  CR inside a line is ignored; LF ends it.
/// Non-ASCII bytes are discarded.
pub fn read_line(console: &mut impl ConsolePort) -> Result<LineBuf, ConsoleError> {
    let mut line = LineBuf::new();
    let mut overflowed = false;

    loop {
        let b = console.read_byte()?;
        match b {
            b'\n' if line.is_empty() => {}
            b'\n' => break,
            b'\r' => {}
            b if b.is_ascii() => {
                if line.push(b as char).is_err() {
                    overflowed = true;
                }
            }
            _ => {}
        }
    }

    if overflowed {
        warn!("Input line longer than {} bytes was truncated", LINE_CAPACITY);
    }
    debug!("Line input: {:?}", line.as_str());
    Ok(line)
}

/// Result of [`parse_number`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedNumber {
    pub value: f32,
    /// `true` when no number was found and `value` is the `0.0` fallback.
    pub coerced: bool,
}

impl ParsedNumber {
    const ZERO: Self = Self {
        value: 0.0,
        coerced: true,
    };
}

/// Parse the leading decimal number of `text`.
///
/// Accepts `[+-]digits[.digits][e[+-]digits]` after optional whitespace;
/// anything after the number is ignored (`"3.5kg"` → 3.5).  No digits, or
/// a value that overflows `f32`, yields `0.0` with `coerced` set.
pub fn parse_number(text: &str) -> ParsedNumber {
    let s = text.trim_start();
    let end = numeric_prefix_len(s.as_bytes());
    if end == 0 {
        return ParsedNumber::ZERO;
    }
    match s[..end].parse::<f32>() {
        Ok(value) if value.is_finite() => ParsedNumber {
            value,
            coerced: false,
        },
        _ => ParsedNumber::ZERO,
    }
}

/// Length of the longest well-formed number at the start of `b`, or 0.
fn numeric_prefix_len(b: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    i = digits_from(i);
    let mut mantissa_digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let frac_end = digits_from(frac_start);
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            i = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}
