//! Multiplication
//!
//! Three strategies share one contract (exact digit product, XOR sign):
//!
//! - schoolbook: O(n*m) digit products accumulated into a widened buffer,
//!   carries resolved in a single final pass
//! - sparse: pairwise products over non-zero beads only, for operands the
//!   optimizer has kept sparse
//! - NTT: both operands above the configured digit threshold go through the
//!   number-theoretic transform and agree digit-for-digit with schoolbook

use crate::arith::Magnitude;
use crate::config::KernelConfig;
use crate::error::Result;
use crate::ntt;
use crate::number::Abacus;

/// Schoolbook product of two digit runs, fully carried.
pub(crate) fn schoolbook(a: &[u32], b: &[u32], base: u32) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut acc = vec![0u64; a.len() + b.len() + 1];
    for (i, &da) in a.iter().enumerate() {
        if da == 0 {
            continue;
        }
        for (j, &db) in b.iter().enumerate() {
            acc[i + j] += da as u64 * db as u64;
        }
    }
    carry_pass(acc, base)
}

/// Resolve a widened accumulator into base digits.
pub(crate) fn carry_pass(acc: Vec<u64>, base: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(acc.len() + 1);
    let mut carry = 0u64;
    for v in acc {
        let sum = v + carry;
        out.push((sum % base as u64) as u32);
        carry = sum / base as u64;
    }
    while carry != 0 {
        out.push((carry % base as u64) as u32);
        carry /= base as u64;
    }
    while out.last() == Some(&0) {
        out.pop();
    }
    out
}

/// Pairwise product over non-zero beads, accumulated by exponent.
fn sparse_product(a: &Abacus, b: &Abacus, base: u32) -> Magnitude {
    let lo = a.min_exponent() + b.min_exponent();
    let hi = a.max_exponent() + b.max_exponent();
    let mut acc = vec![0u64; (hi - lo + 1) as usize];
    for x in a.store().nonzero_beads() {
        for y in b.store().nonzero_beads() {
            let exp = x.exponent + y.exponent;
            acc[(exp - lo) as usize] += x.value as u64 * y.value as u64;
        }
    }
    Magnitude {
        digits: carry_pass(acc, base),
        min_exponent: lo,
    }
}

impl Abacus {
    /// `self * other` with the default configuration.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.mul_with_config(other, &KernelConfig::default())
    }

    /// `self * other`, dispatching on layout and the NTT digit threshold.
    pub fn mul_with_config(&self, other: &Self, config: &KernelConfig) -> Result<Self> {
        self.check_same_base(other)?;
        let base = self.base();
        let hint = self.joint_precision(other);
        let negative = self.is_negative() != other.is_negative();

        if self.is_zero() || other.is_zero() {
            return Self::new(base);
        }

        if self.is_sparse() && other.is_sparse() {
            let mag = sparse_product(self, other, base);
            return Ok(Self::from_parts(base, negative, mag, hint));
        }

        let ma = self.magnitude();
        let mb = other.magnitude();
        let digits = if ma.digits.len() > config.ntt_digit_threshold
            && mb.digits.len() > config.ntt_digit_threshold
        {
            ntt::multiply_digits(&ma.digits, &mb.digits, base)?
        } else {
            schoolbook(&ma.digits, &mb.digits, base)
        };

        let mag = Magnitude {
            digits,
            min_exponent: ma.min_exponent + mb.min_exponent,
        };
        Ok(Self::from_parts(base, negative, mag, hint))
    }

    /// Multiply by a small unsigned scalar (internal fast path).
    pub(crate) fn mul_small(&self, k: u32) -> Self {
        if k == 0 || self.is_zero() {
            return Self::new(self.base()).expect("base already validated");
        }
        let ma = self.magnitude();
        let digits = crate::arith::int_mul_digit(&ma.digits, k, self.base());
        let mag = Magnitude {
            digits,
            min_exponent: ma.min_exponent,
        };
        Self::from_parts(self.base(), self.is_negative(), mag, self.precision())
    }
}
