//! Text parsing, formatting, and base conversion
//!
//! Two textual digit forms, picked by the base:
//!
//! - bases 2..=36 use the usual `0-9a-z` digit characters: `-1a4.8p`
//! - larger bases write each digit as a decimal value, colon-separated:
//!   `-1:23:45.0:30` (the Babylonian form for base 60)
//!
//! Base conversion is exact digit arithmetic in the source base: the
//! integer part by repeated division by the target base, the fractional
//! part by repeated multiplication. No float intermediate is involved.

use std::fmt;

use crate::arith::{int_divrem, int_mul_digit};
use crate::error::{AbacusError, Result};
use crate::number::{Abacus, MAX_BASE, MIN_BASE};

const DIGIT_CHARS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn digit_from_char(c: char, base: u32) -> Result<u32> {
    let v = match c {
        '0'..='9' => c as u32 - '0' as u32,
        'a'..='z' => c as u32 - 'a' as u32 + 10,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => {
            return Err(AbacusError::Parse(format!(
                "invalid digit character {c:?}"
            )))
        }
    };
    if v >= base {
        return Err(AbacusError::Parse(format!(
            "digit {c:?} out of range for base {base}"
        )));
    }
    Ok(v)
}

fn digit_from_value(text: &str, base: u32) -> Result<u32> {
    let v: u32 = text
        .parse()
        .map_err(|_| AbacusError::Parse(format!("invalid digit value {text:?}")))?;
    if v >= base {
        return Err(AbacusError::Parse(format!(
            "digit {v} out of range for base {base}"
        )));
    }
    Ok(v)
}

/// Parse one side of the radix point into most-significant-first digits.
fn parse_digit_run(text: &str, base: u32) -> Result<Vec<u32>> {
    if base <= 36 {
        text.chars().map(|c| digit_from_char(c, base)).collect()
    } else {
        text.split(':')
            .map(|part| digit_from_value(part, base))
            .collect()
    }
}

impl Abacus {
    /// Parse a sign-optional integer or fractional literal in the given
    /// base, keeping `precision` fractional digits (rounded half-to-even
    /// when the literal carries more).
    pub fn from_string(text: &str, base: u32, precision: u32) -> Result<Self> {
        if !(MIN_BASE..=MAX_BASE).contains(&base) {
            return Err(AbacusError::InvalidBase(base));
        }
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if body.is_empty() {
            return Err(AbacusError::Parse("empty literal".to_string()));
        }

        let mut parts = body.splitn(2, '.');
        let int_text = parts.next().unwrap_or("");
        let frac_text = parts.next();

        let int_digits = if int_text.is_empty() {
            if frac_text.is_none() {
                return Err(AbacusError::Parse("missing digits".to_string()));
            }
            Vec::new()
        } else {
            parse_digit_run(int_text, base)?
        };
        let frac_digits = match frac_text {
            Some(t) if !t.is_empty() => parse_digit_run(t, base)?,
            Some(_) => return Err(AbacusError::Parse("empty fractional part".to_string())),
            None => Vec::new(),
        };

        // ascending digit vector starting at exponent -frac_len
        let frac_len = frac_digits.len();
        let mut digits = Vec::with_capacity(frac_len + int_digits.len());
        digits.extend(frac_digits.iter().rev());
        digits.extend(int_digits.iter().rev());

        let n = Self::from_digits(base, negative, digits, -(frac_len as i32), precision);
        if n.fractional_digits() > precision {
            Ok(n.round_to(precision))
        } else {
            Ok(n)
        }
    }

    /// Render in an arbitrary output base (exact conversion first when the
    /// output base differs).
    pub fn to_string_radix(&self, base_out: u32) -> Result<String> {
        let n = if base_out == self.base() {
            self.clone()
        } else {
            self.convert_base(base_out)?
        };
        Ok(n.format_native())
    }

    fn format_native(&self) -> String {
        let base = self.base();
        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        if self.is_zero() {
            out.push('0');
            return out;
        }

        let push_digit = |out: &mut String, value: u32, first: bool| {
            if base <= 36 {
                out.push(DIGIT_CHARS[value as usize] as char);
            } else {
                if !first {
                    out.push(':');
                }
                out.push_str(&value.to_string());
            }
        };

        let hi = self.max_exponent().max(0);
        for exp in (0..=hi).rev() {
            push_digit(&mut out, self.store().digit_at(exp), exp == hi);
        }
        let lo = self.min_exponent();
        if lo < 0 {
            out.push('.');
            for exp in (lo..0).rev() {
                push_digit(&mut out, self.store().digit_at(exp), exp == -1);
            }
        }
        out
    }

    /// Exact conversion to another base.
    ///
    /// The integer part is peeled off by repeated division by the new base
    /// inside the source base; the fractional part by repeated
    /// multiplication. The fractional expansion keeps enough digits in the
    /// new base to cover the source's stored fractional information.
    pub fn convert_base(&self, new_base: u32) -> Result<Self> {
        if !(MIN_BASE..=MAX_BASE).contains(&new_base) {
            return Err(AbacusError::InvalidBase(new_base));
        }
        if new_base == self.base() {
            return Ok(self.clone());
        }
        let old_base = self.base();

        // new_base expressed as digits of the old base
        let mut divisor = Vec::new();
        let mut v = new_base;
        while v > 0 {
            divisor.push(v % old_base);
            v /= old_base;
        }

        // integer part: repeated division, remainders are the new digits
        let mag = self.magnitude();
        let int_len = (mag.max_exponent().map_or(0, |e| e.max(-1)) + 1) as usize;
        let mut int_digits: Vec<u32> = (0..int_len)
            .map(|i| mag.digit_at(i as i32))
            .collect();
        let mut out_int = Vec::new();
        while int_digits.iter().any(|&d| d != 0) {
            let (q, r) = int_divrem(&int_digits, &divisor, old_base);
            let mut rem_value = 0u64;
            for &d in r.iter().rev() {
                rem_value = rem_value * old_base as u64 + d as u64;
            }
            out_int.push(rem_value as u32);
            int_digits = q;
        }

        // fractional part: repeated multiplication by the new base
        let frac_len = self.fractional_digits() as usize;
        let mut out_frac = Vec::new();
        if frac_len > 0 {
            let target = ((frac_len as f64 * (old_base as f64).ln() / (new_base as f64).ln())
                .ceil() as usize)
                + 1;
            let mut frac: Vec<u32> = (0..frac_len)
                .map(|i| mag.digit_at(-(frac_len as i32) + i as i32))
                .collect();
            for _ in 0..target {
                if frac.iter().all(|&d| d == 0) {
                    break;
                }
                let scaled = int_mul_digit(&frac, new_base, old_base);
                // digits at index >= frac_len form the integer carry-out
                let mut carry_out = 0u64;
                for i in (frac_len..scaled.len()).rev() {
                    carry_out = carry_out * old_base as u64 + scaled[i] as u64;
                }
                out_frac.push(carry_out as u32);
                frac = scaled;
                frac.truncate(frac_len);
                frac.resize(frac_len, 0);
            }
        }

        // assemble ascending from the lowest fractional exponent
        let mut digits = Vec::with_capacity(out_frac.len() + out_int.len());
        digits.extend(out_frac.iter().rev());
        digits.extend(out_int.iter());
        Ok(Self::from_digits(
            new_base,
            self.is_negative(),
            digits,
            -(out_frac.len() as i32),
            self.precision(),
        ))
    }
}

impl fmt::Display for Abacus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_native())
    }
}
