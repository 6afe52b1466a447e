//! Transcendental functions
//!
//! Every function takes an explicit fractional-digit precision and works a
//! few guard digits above it, rounding once at the end. Range reduction
//! leans on the constants table; the series themselves run in pure abacus
//! arithmetic with truncation of intermediates to the working precision.
//!
//! - `exp`: reduce through `exp(x) = 2^k * exp(r)`, Taylor on the residue
//! - `ln`: digit-shift normalization, halving into [1, 2), atanh series
//! - `pow`: repeated squaring for integral exponents, `exp(y ln x)` otherwise
//! - `sin`/`cos`/`atan2`: CORDIC, in [`cordic`]

pub mod cordic;

use crate::constants;
use crate::error::{AbacusError, Result};
use crate::number::Abacus;

/// Guard digits carried above the requested precision.
const GUARD_DIGITS: u32 = 6;

pub(crate) fn below_eps(x: &Abacus, working: u32) -> bool {
    x.is_zero() || x.max_exponent() < -(working as i32)
}

/// `atanh(u) = u + u^3/3 + u^5/5 + ...` for `|u| < 1`.
pub(crate) fn atanh_series(u: &Abacus, working: u32) -> Result<Abacus> {
    let base = u.base();
    let mut sum = u.clone();
    let mut power = u.clone();
    let u_sq = u.mul(u)?.truncate_to(working);
    let mut n = 1u64;
    loop {
        power = power.mul(&u_sq)?.truncate_to(working);
        n += 2;
        if below_eps(&power, working) {
            break;
        }
        let term = power.div_fractional(&Abacus::from_unsigned(n, base)?, working)?;
        sum = sum.add(&term)?;
    }
    Ok(sum)
}

impl Abacus {
    /// `self^exp` by repeated squaring. Exact; `x^0 = 1`.
    pub fn pow_unsigned(&self, exp: u64) -> Result<Self> {
        let mut result = Self::from_unsigned(1, self.base())?;
        let mut square = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(&square)?;
            }
            e >>= 1;
            if e > 0 {
                square = square.mul(&square)?;
            }
        }
        Ok(result)
    }

    /// `e^self` to `precision` fractional digits.
    pub fn exp(&self, precision: u32) -> Result<Self> {
        let base = self.base();
        let working = precision + GUARD_DIGITS;
        if self.is_zero() {
            return Self::from_unsigned(1, base);
        }

        // exp(x) = 2^k * exp(r), r in (-ln2/2, ln2/2]
        let ln2 = constants::ln2(base, working)?;
        let k = self
            .div_fractional(&ln2, working)?
            .round_to(0)
            .to_signed()?;
        let k_num = Self::from_signed(k, base)?;
        let r = self.sub(&ln2.mul(&k_num)?)?.truncate_to(working);

        // Taylor: sum r^n / n!
        let mut term = Self::from_unsigned(1, base)?;
        let mut sum = Self::from_unsigned(1, base)?;
        let mut n = 1u64;
        loop {
            term = term
                .mul(&r)?
                .truncate_to(working)
                .div_fractional(&Self::from_unsigned(n, base)?, working)?;
            if below_eps(&term, working) {
                break;
            }
            sum = sum.add(&term)?;
            n += 1;
        }

        let two = Self::from_unsigned(2, base)?;
        let scaled = if k >= 0 {
            sum.mul(&two.pow_unsigned(k as u64)?)?
        } else {
            sum.div_fractional(&two.pow_unsigned(k.unsigned_abs())?, working)?
        };
        Ok(scaled.round_to(precision))
    }

    /// `ln(self)` to `precision` fractional digits.
    ///
    /// Fails with `Domain` for zero or negative input.
    pub fn ln(&self, precision: u32) -> Result<Self> {
        if self.is_zero() || self.is_negative() {
            return Err(AbacusError::Domain("logarithm of a non-positive value"));
        }
        let base = self.base();
        let working = precision + GUARD_DIGITS;

        // self = m * base^k with m in [1, base)
        let k = self.max_exponent();
        let mut m = self.shifted(-k).truncate_to(working);

        // halve m into [1, 2)
        let two = Self::from_unsigned(2, base)?;
        let mut halvings = 0u32;
        while m.compare_unchecked(&two) != std::cmp::Ordering::Less {
            m = m.div_fractional(&two, working)?;
            halvings += 1;
        }

        let one = Self::from_unsigned(1, base)?;
        let u = m.sub(&one)?.div_fractional(&m.add(&one)?, working)?;
        let ln_m = atanh_series(&u, working)?.mul_small(2);

        let ln_base = constants::ln_base(base, working)?;
        let ln2 = constants::ln2(base, working)?;
        let result = ln_base
            .mul(&Self::from_signed(k as i64, base)?)?
            .add(&ln2.mul_small(halvings))?
            .add(&ln_m)?;
        Ok(result.round_to(precision))
    }

    /// `self^exponent` to `precision` fractional digits.
    ///
    /// Integral exponents use exact repeated squaring (negative ones through
    /// a fractional reciprocal); fractional exponents require a positive
    /// radicand and go through `exp(y * ln x)`.
    pub fn pow(&self, exponent: &Self, precision: u32) -> Result<Self> {
        self.check_same_base(exponent)?;
        let base = self.base();

        if exponent.min_exponent() >= 0 {
            // integral exponent, sign decides the reciprocal
            let magnitude = exponent.abs().to_unsigned()?;
            let powered = self.pow_unsigned(magnitude)?;
            if exponent.is_negative() {
                if powered.is_zero() {
                    return Err(AbacusError::DivideByZero);
                }
                let one = Self::from_unsigned(1, base)?;
                return one.div_fractional(&powered, precision);
            }
            return Ok(powered);
        }

        if self.is_zero() || self.is_negative() {
            return Err(AbacusError::Domain(
                "fractional power of a non-positive value",
            ));
        }
        let working = precision + GUARD_DIGITS;
        let ln_x = self.ln(working)?;
        exponent
            .mul(&ln_x)?
            .truncate_to(working)
            .exp(precision)
    }
}
