//! Number-theoretic operations
//!
//! Euclidean gcd on absolute values, lcm through `|a*b| / gcd`, a
//! coprimality test, and modular reduce/multiply/exponentiate. Only
//! defined on integers: any operand with stored fractional digits is
//! rejected with `NotInteger`.

use crate::error::{AbacusError, Result};
use crate::number::Abacus;

fn require_integer(n: &Abacus) -> Result<()> {
    if n.min_exponent() < 0 {
        return Err(AbacusError::NotInteger);
    }
    Ok(())
}

impl Abacus {
    /// Greatest common divisor of `|self|` and `|other|`.
    ///
    /// `gcd(0, n) = |n|` by convention; the result is never negative.
    pub fn gcd(&self, other: &Self) -> Result<Self> {
        self.check_same_base(other)?;
        require_integer(self)?;
        require_integer(other)?;

        let mut a = self.abs();
        let mut b = other.abs();
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b)?;
            a = b;
            b = r;
        }
        Ok(a)
    }

    /// Least common multiple; zero when both operands are zero.
    pub fn lcm(&self, other: &Self) -> Result<Self> {
        self.check_same_base(other)?;
        require_integer(self)?;
        require_integer(other)?;

        if self.is_zero() && other.is_zero() {
            return Self::new(self.base());
        }
        let g = self.gcd(other)?;
        let product = self.abs().mul(&other.abs())?;
        product.div(&g)
    }

    /// True when `gcd(self, other) == 1`.
    pub fn coprime(&self, other: &Self) -> Result<bool> {
        let g = self.gcd(other)?;
        Ok(g.to_unsigned() == Ok(1))
    }

    /// `self mod modulus`, always in `[0, modulus)`.
    pub fn mod_reduce(&self, modulus: &Self) -> Result<Self> {
        self.check_same_base(modulus)?;
        require_integer(self)?;
        require_integer(modulus)?;
        if modulus.is_zero() || modulus.is_negative() {
            return Err(AbacusError::Domain("modulus must be positive"));
        }
        let (_, r) = self.div_rem(modulus)?;
        if r.is_negative() {
            r.add(modulus)
        } else {
            Ok(r)
        }
    }

    /// `(self * other) mod modulus`.
    pub fn mod_mul(&self, other: &Self, modulus: &Self) -> Result<Self> {
        self.mul(other)?.mod_reduce(modulus)
    }

    /// `(self ^ exponent) mod modulus` by binary exponentiation, reducing
    /// at every step so intermediates stay below the modulus.
    pub fn mod_exp(&self, exponent: &Self, modulus: &Self) -> Result<Self> {
        self.check_same_base(exponent)?;
        require_integer(exponent)?;
        if exponent.is_negative() {
            return Err(AbacusError::Domain("negative modular exponent"));
        }
        let base_radix = self.base();
        let two = Self::from_unsigned(2, base_radix)?;

        let mut result = Self::from_unsigned(1, base_radix)?.mod_reduce(modulus)?;
        let mut square = self.mod_reduce(modulus)?;
        let mut e = exponent.clone();
        while !e.is_zero() {
            let (half, bit) = e.div_rem(&two)?;
            if !bit.is_zero() {
                result = result.mod_mul(&square, modulus)?;
            }
            e = half;
            if !e.is_zero() {
                square = square.mod_mul(&square, modulus)?;
            }
        }
        Ok(result)
    }
}
