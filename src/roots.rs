//! Roots
//!
//! Integer square and nth roots by Newton-Raphson with a digit-length
//! initial guess that starts above the true root, so the iteration
//! descends monotonically and stops the first time it fails to shrink.
//! Every returned root is verified against its bracketing property before
//! it leaves this module.
//!
//! The fractional square root reuses the integer root as a seed and
//! iterates over fractional division, with a convergence test on the
//! change between successive iterates and a configurable backstop cap.

use std::cmp::Ordering;

use crate::config::KernelConfig;
use crate::error::{AbacusError, Result};
use crate::number::Abacus;

impl Abacus {
    /// `floor(sqrt(n))` for non-negative integer `n`.
    ///
    /// Fails with `Domain` on negative input and `NotInteger` when the
    /// operand has fractional digits.
    pub fn sqrt(&self) -> Result<Self> {
        if self.is_negative() {
            return Err(AbacusError::Domain("square root of a negative value"));
        }
        if self.min_exponent() < 0 {
            return Err(AbacusError::NotInteger);
        }
        if self.is_zero() {
            return Self::new(self.base());
        }

        let base = self.base();
        let two = Self::from_unsigned(2, base)?;

        // base^ceil(d/2) >= sqrt(base^d) >= sqrt(n)
        let digit_count = self.max_exponent() + 1;
        let mut guess = Self::from_unsigned(1, base)?;
        guess.shift_left(((digit_count + 1) / 2) as u32);

        let mut x = guess;
        loop {
            let x_next = self.div(&x)?.add(&x)?.div(&two)?;
            if x_next.compare_unchecked(&x) != Ordering::Less {
                break;
            }
            x = x_next;
        }

        self.verify_floor_root(x, 2)
    }

    /// Enforce `x^k <= n < (x+1)^k`, nudging the candidate if the descent
    /// stopped a step off.
    fn verify_floor_root(&self, mut x: Self, k: u32) -> Result<Self> {
        let one = Self::from_unsigned(1, self.base())?;
        while !x.is_zero()
            && x.pow_unsigned(k as u64)?.compare_unchecked(self) == Ordering::Greater
        {
            x = x.sub(&one)?;
        }
        loop {
            let next = x.add(&one)?;
            if next.pow_unsigned(k as u64)?.compare_unchecked(self) == Ordering::Greater {
                break;
            }
            x = next;
        }
        Ok(x)
    }

    /// `floor(n^(1/k))` for `k >= 1` and non-negative integer `n`.
    pub fn root(&self, k: u32) -> Result<Self> {
        if k == 0 {
            return Err(AbacusError::Domain("zeroth root"));
        }
        if self.is_negative() {
            return Err(AbacusError::Domain("root of a negative value"));
        }
        if k == 1 {
            return Ok(self.clone());
        }
        if k == 2 {
            return self.sqrt();
        }
        if self.min_exponent() < 0 {
            return Err(AbacusError::NotInteger);
        }
        if self.is_zero() {
            return Self::new(self.base());
        }

        let base = self.base();
        let k_num = Self::from_unsigned(k as u64, base)?;
        let k_minus_1 = Self::from_unsigned(k as u64 - 1, base)?;

        // base^ceil(d/k) >= n^(1/k)
        let digit_count = self.max_exponent() + 1;
        let mut x = Self::from_unsigned(1, base)?;
        x.shift_left(((digit_count as u32) + k - 1) / k);

        loop {
            // x' = ((k-1)*x + n / x^(k-1)) / k
            let power = x.pow_unsigned(k as u64 - 1)?;
            let x_next = self
                .div(&power)?
                .add(&k_minus_1.mul(&x)?)?
                .div(&k_num)?;
            if x_next.compare_unchecked(&x) != Ordering::Less {
                break;
            }
            x = x_next;
        }

        self.verify_floor_root(x, k)
    }

    /// `sqrt(n)` to `precision` fractional digits.
    ///
    /// An iteration-cap hit is treated as precision-qualified success; use
    /// [`Abacus::sqrt_fractional_checked`] to surface it instead.
    pub fn sqrt_fractional(&self, precision: u32) -> Result<Self> {
        let (value, _) = self.sqrt_newton(precision, &KernelConfig::default())?;
        Ok(value)
    }

    /// `sqrt(n)` to `precision` fractional digits, failing with
    /// `PrecisionUnderflow` when the iteration cap is hit before the
    /// convergence test passes.
    pub fn sqrt_fractional_checked(&self, precision: u32) -> Result<Self> {
        let (value, converged) = self.sqrt_newton(precision, &KernelConfig::default())?;
        if !converged {
            return Err(AbacusError::PrecisionUnderflow);
        }
        Ok(value)
    }

    pub(crate) fn sqrt_newton(
        &self,
        precision: u32,
        config: &KernelConfig,
    ) -> Result<(Self, bool)> {
        if self.is_negative() {
            return Err(AbacusError::Domain("square root of a negative value"));
        }
        if self.is_zero() {
            return Ok((Self::new(self.base())?, true));
        }

        let base = self.base();
        let working = precision + 2;
        let two = Self::from_unsigned(2, base)?;

        // lift sub-unit values by an even shift so the integer seed exists
        let lift = if self.max_exponent() < 0 {
            ((-self.max_exponent()) as u32 + 2) / 2 + 1
        } else {
            0
        };
        let target = self.shifted(2 * lift as i32);

        let mut x = target.truncate_to(0).sqrt()?;
        if x.is_zero() {
            x = Self::from_unsigned(1, base)?;
        }

        let mut eps = Self::from_unsigned(1, base)?;
        eps.shift_right(precision);

        let cap = config.newton_iteration_cap.max(2 * precision);
        let mut converged = false;
        for _ in 0..cap {
            let quotient = target.div_fractional(&x, working)?;
            let x_next = x.add(&quotient)?.div_fractional(&two, working)?;
            let delta = x_next.sub(&x)?;
            x = x_next;
            if delta.compare_abs(&eps)? == Ordering::Less {
                converged = true;
                break;
            }
        }

        let mut result = x;
        result.shift_right(lift);
        Ok((result.round_to(precision), converged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> Abacus {
        Abacus::from_unsigned(v, 10).unwrap()
    }

    #[test]
    fn test_sqrt_exact_squares() {
        for v in [0u64, 1, 4, 9, 100, 10000, 998001] {
            let root = n(v).sqrt().unwrap();
            assert_eq!(root.to_unsigned().unwrap(), (v as f64).sqrt() as u64);
        }
    }

    #[test]
    fn test_sqrt_floor_bracket() {
        for v in [2u64, 3, 8, 99, 101, 999999, 12345678901234] {
            let x = n(v).sqrt().unwrap().to_unsigned().unwrap();
            assert!(x * x <= v && (x + 1) * (x + 1) > v, "sqrt({v}) = {x}");
        }
    }

    #[test]
    fn test_sqrt_rejects_negative() {
        let neg = Abacus::from_signed(-4, 10).unwrap();
        assert!(matches!(neg.sqrt(), Err(AbacusError::Domain(_))));
    }

    #[test]
    fn test_sqrt_large_value() {
        // 10^40: sqrt is 10^20
        let mut big = Abacus::from_unsigned(1, 10).unwrap();
        big.shift_left(40);
        let root = big.sqrt().unwrap();
        let mut expected = Abacus::from_unsigned(1, 10).unwrap();
        expected.shift_left(20);
        assert_eq!(root, expected);
    }

    #[test]
    fn test_root_basics() {
        assert_eq!(n(27).root(3).unwrap().to_unsigned().unwrap(), 3);
        assert_eq!(n(16).root(4).unwrap().to_unsigned().unwrap(), 2);
        assert_eq!(n(81).root(4).unwrap().to_unsigned().unwrap(), 3);
        assert_eq!(n(7).root(1).unwrap().to_unsigned().unwrap(), 7);
        assert_eq!(n(10000).root(2).unwrap().to_unsigned().unwrap(), 100);
    }

    #[test]
    fn test_root_floor_bracket() {
        for (v, k) in [(30u64, 3u32), (100, 3), (255, 4), (1000000, 5)] {
            let x = n(v).root(k).unwrap().to_unsigned().unwrap();
            assert!(x.pow(k) <= v, "root({v},{k}) = {x}");
            assert!((x + 1).pow(k) > v, "root({v},{k}) = {x}");
        }
    }

    #[test]
    fn test_root_zeroth_rejected() {
        assert!(matches!(n(5).root(0), Err(AbacusError::Domain(_))));
    }

    #[test]
    fn test_sqrt_fractional_two() {
        let root = n(2).sqrt_fractional(10).unwrap();
        assert!((root.to_float() - std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_sqrt_fractional_converges_checked() {
        let root = n(5).sqrt_fractional_checked(12).unwrap();
        assert!((root.to_float() - 5.0f64.sqrt()).abs() < 1e-11);
    }

    #[test]
    fn test_sqrt_fractional_subunit() {
        let quarter = Abacus::from_float(0.25, 10, 4).unwrap();
        let root = quarter.sqrt_fractional(8).unwrap();
        assert!((root.to_float() - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_sqrt_fractional_square_close() {
        let root = n(10).sqrt_fractional(12).unwrap();
        let square = root.mul(&root).unwrap();
        assert!((square.to_float() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_sqrt_fractional_base60() {
        let two = Abacus::from_unsigned(2, 60).unwrap();
        let root = two.sqrt_fractional(6).unwrap();
        assert!((root.to_float() - std::f64::consts::SQRT_2).abs() < 1e-8);
    }
}
