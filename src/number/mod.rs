//! Core number type
//!
//! An [`Abacus`] owns a [`BeadStore`] plus its base, sign, and a fractional
//! precision hint. Values are immutable from the caller's perspective:
//! arithmetic borrows operands and returns freshly allocated results, so
//! dropping a value is the only cleanup and cloning is the only copy.
//!
//! Canonical form is maintained by every constructor and operation:
//! fully-carried digits, no duplicate exponents, trimmed zero digits at
//! both ends of the span, and zero stored as an empty non-negative store.

pub mod format;

use crate::arith::Magnitude;
use crate::bead::{Bead, BeadStore};
use crate::config::KernelConfig;
use crate::error::{AbacusError, Result};

/// Lowest supported base.
pub const MIN_BASE: u32 = 2;

/// Highest supported base.
pub const MAX_BASE: u32 = 256;

/// Arbitrary-base, arbitrary-precision signed number.
#[derive(Debug, Clone)]
pub struct Abacus {
    base: u32,
    negative: bool,
    store: BeadStore,
    precision_hint: u32,
}

fn check_base(base: u32) -> Result<()> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(AbacusError::InvalidBase(base));
    }
    Ok(())
}

impl Abacus {
    /// The value zero in the given base.
    pub fn new(base: u32) -> Result<Self> {
        check_base(base)?;
        Ok(Abacus {
            base,
            negative: false,
            store: BeadStore::zero(),
            precision_hint: 0,
        })
    }

    /// Build from an unsigned integer by repeated division by the base.
    pub fn from_unsigned(mut value: u64, base: u32) -> Result<Self> {
        check_base(base)?;
        let mut digits = Vec::new();
        while value > 0 {
            digits.push((value % base as u64) as u32);
            value /= base as u64;
        }
        Ok(Self::from_digits(base, false, digits, 0, 0))
    }

    /// Build from a signed integer.
    pub fn from_signed(value: i64, base: u32) -> Result<Self> {
        let magnitude = value.unsigned_abs();
        let mut n = Self::from_unsigned(magnitude, base)?;
        n.negative = value < 0 && !n.is_zero();
        Ok(n)
    }

    /// Build from a float, keeping `precision` fractional digits.
    ///
    /// The integer part is emitted by repeated division, the fractional part
    /// by repeated multiplication. The last kept fractional digit is rounded
    /// half-to-even against the first digit that would follow it.
    pub fn from_float(value: f64, base: u32, precision: u32) -> Result<Self> {
        check_base(base)?;
        if !value.is_finite() {
            return Err(AbacusError::Domain("float value is not finite"));
        }
        let negative = value < 0.0;
        let value = value.abs();
        let base_f = base as f64;

        let mut int_part = value.trunc();
        let mut frac_part = value - int_part;

        // integer digits, least significant first
        let mut int_digits = Vec::new();
        if int_part < u64::MAX as f64 {
            let mut v = int_part as u64;
            while v > 0 {
                int_digits.push((v % base as u64) as u32);
                v /= base as u64;
            }
        } else {
            while int_part >= 1.0 {
                let digit = (int_part % base_f).trunc();
                int_digits.push(digit as u32);
                // the quotient is an integer; round() undoes division noise
                int_part = ((int_part - digit) / base_f).round();
            }
        }

        // fractional digits plus one rounding digit
        let mut frac_digits = Vec::with_capacity(precision as usize + 1);
        for _ in 0..=precision {
            frac_part *= base_f;
            let digit = frac_part.trunc();
            frac_digits.push(digit as u32);
            frac_part -= digit;
            if frac_part <= 0.0 && frac_digits.len() > precision as usize {
                break;
            }
        }
        let round_digit = if frac_digits.len() > precision as usize {
            frac_digits.pop().unwrap()
        } else {
            0
        };

        // assemble digits ascending from exponent -precision
        let mut digits = vec![0u32; precision as usize];
        for (i, &d) in frac_digits.iter().enumerate() {
            // frac_digits[0] has exponent -1
            digits[precision as usize - 1 - i] = d;
        }
        digits.extend_from_slice(&int_digits);

        let mut mag = Magnitude {
            digits,
            min_exponent: -(precision as i32),
        };

        let twice = 2 * round_digit;
        let sticky = frac_part > 0.0;
        let kept_digit = mag.digit_at(-(precision as i32));
        let round_up = twice > base || (twice == base && (sticky || kept_digit % 2 == 1));
        if round_up {
            let ulp = Magnitude {
                digits: vec![1],
                min_exponent: -(precision as i32),
            };
            mag = mag.add_magnitude(&ulp, base);
        }

        Ok(Self::from_parts(base, negative, mag, precision))
    }

    /// Assemble from a raw ascending digit vector (internal constructor).
    pub(crate) fn from_digits(
        base: u32,
        negative: bool,
        digits: Vec<u32>,
        min_exponent: i32,
        precision_hint: u32,
    ) -> Self {
        let threshold = KernelConfig::default().sparse_density_threshold;
        let store = BeadStore::canonical(digits, min_exponent, threshold);
        let negative = negative && !store.is_zero();
        Abacus {
            base,
            negative,
            store,
            precision_hint,
        }
    }

    /// Assemble from a magnitude (internal constructor).
    pub(crate) fn from_parts(
        base: u32,
        negative: bool,
        magnitude: Magnitude,
        precision_hint: u32,
    ) -> Self {
        Self::from_digits(
            base,
            negative,
            magnitude.digits,
            magnitude.min_exponent,
            precision_hint,
        )
    }

    /// Sign-free dense digit run for arithmetic kernels.
    pub(crate) fn magnitude(&self) -> Magnitude {
        Magnitude::from_store(&self.store)
    }

    pub(crate) fn check_same_base(&self, other: &Self) -> Result<()> {
        if self.base != other.base {
            return Err(AbacusError::ArgMismatch {
                left: self.base,
                right: other.base,
            });
        }
        Ok(())
    }

    pub(crate) fn joint_precision(&self, other: &Self) -> u32 {
        self.precision_hint.max(other.precision_hint)
    }

    // ------------------------------------------------------------------
    // conversions out
    // ------------------------------------------------------------------

    /// Convert to `u64`, truncating fractional digits toward zero.
    ///
    /// Fails with `Overflow` when the value is negative or its integer part
    /// does not fit.
    pub fn to_unsigned(&self) -> Result<u64> {
        if self.negative {
            return Err(AbacusError::Overflow);
        }
        let mut acc: u64 = 0;
        for b in self.store.nonzero_beads() {
            if b.exponent < 0 {
                continue;
            }
            let weight = (self.base as u64)
                .checked_pow(b.exponent as u32)
                .ok_or(AbacusError::Overflow)?;
            let term = (b.value as u64)
                .checked_mul(weight)
                .ok_or(AbacusError::Overflow)?;
            acc = acc.checked_add(term).ok_or(AbacusError::Overflow)?;
        }
        Ok(acc)
    }

    /// Convert to `i64`, truncating fractional digits toward zero.
    pub fn to_signed(&self) -> Result<i64> {
        let mut acc: u64 = 0;
        for b in self.store.nonzero_beads() {
            if b.exponent < 0 {
                continue;
            }
            let weight = (self.base as u64)
                .checked_pow(b.exponent as u32)
                .ok_or(AbacusError::Overflow)?;
            let term = (b.value as u64)
                .checked_mul(weight)
                .ok_or(AbacusError::Overflow)?;
            acc = acc.checked_add(term).ok_or(AbacusError::Overflow)?;
        }
        if self.negative {
            if acc > i64::MAX as u64 + 1 {
                return Err(AbacusError::Overflow);
            }
            Ok((acc as i128).wrapping_neg() as i64)
        } else {
            if acc > i64::MAX as u64 {
                return Err(AbacusError::Overflow);
            }
            Ok(acc as i64)
        }
    }

    /// Convert to `f64`. Never fails; large values saturate to infinity and
    /// tiny digits round away.
    pub fn to_float(&self) -> f64 {
        let base_f = self.base as f64;
        let mut acc = 0.0f64;
        for b in self.store.nonzero_beads() {
            acc += b.value as f64 * base_f.powi(b.exponent);
        }
        if self.negative {
            -acc
        } else {
            acc
        }
    }

    // ------------------------------------------------------------------
    // introspection
    // ------------------------------------------------------------------

    /// True for the value zero.
    pub fn is_zero(&self) -> bool {
        self.store.is_zero()
    }

    /// True for negative values; zero is never negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The positional radix.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Fractional digit positions preserved across inexact operations.
    pub fn precision(&self) -> u32 {
        self.precision_hint
    }

    /// Fractional digits currently stored.
    pub fn fractional_digits(&self) -> u32 {
        match self.store.min_exponent() {
            Some(e) if e < 0 => (-e) as u32,
            _ => 0,
        }
    }

    /// Lowest stored exponent, 0 for zero.
    pub fn min_exponent(&self) -> i32 {
        self.store.min_exponent().unwrap_or(0)
    }

    /// Highest stored exponent, 0 for zero.
    pub fn max_exponent(&self) -> i32 {
        self.store.max_exponent().unwrap_or(0)
    }

    /// Fraction of the exponent span occupied by zero digits, in [0, 1].
    pub fn sparsity(&self) -> f64 {
        if self.is_zero() {
            0.0
        } else {
            1.0 - self.store.density()
        }
    }

    /// Heap bytes held by the bead store.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.store.memory_bytes()
    }

    /// True when the store uses the sparse layout.
    pub fn is_sparse(&self) -> bool {
        self.store.is_sparse()
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &BeadStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // sparse control
    // ------------------------------------------------------------------

    /// Force the sparse layout.
    pub fn sparsify(&mut self) {
        self.store.sparsify();
    }

    /// Force the dense layout.
    pub fn densify(&mut self) {
        self.store.densify();
    }

    /// Pick the layout by the default density threshold.
    pub fn optimize_representation(&mut self) {
        self.optimize_representation_with(&KernelConfig::default());
    }

    /// Pick the layout by a configured density threshold.
    pub fn optimize_representation_with(&mut self, config: &KernelConfig) {
        self.store.optimize(config.sparse_density_threshold);
    }

    // ------------------------------------------------------------------
    // exponent and precision surgery
    // ------------------------------------------------------------------

    /// Multiply by `base^n` by translating every exponent up. Exact.
    pub fn shift_left(&mut self, n: u32) {
        self.shift(n as i32);
    }

    /// Divide by `base^n` by translating every exponent down. Exact.
    pub fn shift_right(&mut self, n: u32) {
        self.shift(-(n as i32));
    }

    pub(crate) fn shift(&mut self, delta: i32) {
        if delta == 0 || self.is_zero() {
            return;
        }
        match &mut self.store {
            BeadStore::Dense { min_exponent, .. } => *min_exponent += delta,
            BeadStore::Sparse { beads } => {
                for b in beads.iter_mut() {
                    b.exponent += delta;
                }
            }
        }
    }

    /// Shifted copy (internal convenience).
    pub(crate) fn shifted(&self, delta: i32) -> Self {
        let mut out = self.clone();
        out.shift(delta);
        out
    }

    /// Keep at most `precision` fractional digits, truncating toward zero.
    pub fn truncate_to(&self, precision: u32) -> Self {
        let cut = -(precision as i32);
        let digits: Vec<Bead> = self
            .store
            .nonzero_beads()
            .filter(|b| b.exponent >= cut)
            .collect();
        let mut out = Self::new(self.base).expect("base already validated");
        if let Some(lo) = digits.first().map(|b| b.exponent) {
            let hi = digits.last().map(|b| b.exponent).unwrap();
            let mut raw = vec![0u32; (hi - lo + 1) as usize];
            for b in &digits {
                raw[(b.exponent - lo) as usize] = b.value;
            }
            out = Self::from_digits(self.base, self.negative, raw, lo, precision);
        }
        out.precision_hint = precision;
        out
    }

    /// Round half-to-even at `precision` fractional digits.
    pub fn round_to(&self, precision: u32) -> Self {
        let cut = -(precision as i32);
        if self.min_exponent() >= cut {
            let mut out = self.clone();
            out.precision_hint = precision;
            return out;
        }

        let round_digit = self.store.digit_at(cut - 1);
        let sticky = self
            .store
            .nonzero_beads()
            .any(|b| b.exponent < cut - 1);
        let truncated = self.truncate_to(precision);
        let kept_digit = truncated.store.digit_at(cut);

        let twice = 2 * round_digit;
        let round_up = twice > self.base || (twice == self.base && (sticky || kept_digit % 2 == 1));
        if !round_up {
            return truncated;
        }

        let ulp = Magnitude {
            digits: vec![1],
            min_exponent: cut,
        };
        let mag = truncated.magnitude().add_magnitude(&ulp, self.base);
        Self::from_parts(self.base, self.negative, mag, precision)
    }

    /// Pad or truncate the stored fractional range to exactly `precision`
    /// digits. Padding only changes the dense display span; truncation drops
    /// digits without rounding.
    pub fn set_precision(&mut self, precision: u32) {
        if self.fractional_digits() > precision {
            *self = self.truncate_to(precision);
        }
        self.precision_hint = precision;
    }

    // ------------------------------------------------------------------
    // sign
    // ------------------------------------------------------------------

    /// Sign-flipped copy; zero stays non-negative.
    pub fn negate(&self) -> Self {
        let mut out = self.clone();
        out.negative = !out.negative && !out.is_zero();
        out
    }

    /// Magnitude copy.
    pub fn abs(&self) -> Self {
        let mut out = self.clone();
        out.negative = false;
        out
    }
}

/// Value equality: same base, same sign, same digit at every exponent.
/// Layout (dense vs sparse) and precision hints do not participate.
impl PartialEq for Abacus {
    fn eq(&self, other: &Self) -> bool {
        if self.base != other.base || self.negative != other.negative {
            return false;
        }
        let mut a = self.store.nonzero_beads();
        let mut b = other.store.nonzero_beads();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) if x == y => continue,
                _ => return false,
            }
        }
    }
}

impl Eq for Abacus {}
