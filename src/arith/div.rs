//! Division
//!
//! Integer form: classic long division, most-significant digit first, each
//! quotient digit found by binary search against the running remainder.
//! Fractional operands are first scaled by a common power of the base so
//! the division runs on integers; the remainder is scaled back, preserving
//! `dividend = quotient * divisor + remainder` exactly.
//!
//! Fractional form: the integer division's remainder keeps producing
//! digits past the radix point, one per scale-divide step, until the
//! requested precision is reached or the remainder dies. The last kept
//! digit is rounded half-to-even against the first digit that would have
//! followed it.

use crate::arith::{int_divrem, Magnitude};
use crate::error::{AbacusError, Result};
use crate::number::Abacus;

/// Expand a magnitude into an exponent-indexed integer digit vector.
/// Requires a non-negative minimum exponent.
fn int_vec(mag: &Magnitude) -> Vec<u32> {
    debug_assert!(mag.is_zero() || mag.min_exponent >= 0);
    if mag.is_zero() {
        return Vec::new();
    }
    let mut out = vec![0u32; mag.min_exponent as usize];
    out.extend_from_slice(&mag.digits);
    out
}

impl Abacus {
    /// Integer division with remainder.
    ///
    /// The quotient is truncated toward zero and carries the XOR of the
    /// operand signs; the remainder carries the dividend's sign and
    /// satisfies `|remainder| < |divisor|` and
    /// `self = quotient * other + remainder`.
    pub fn div_rem(&self, other: &Self) -> Result<(Self, Self)> {
        self.check_same_base(other)?;
        if other.is_zero() {
            return Err(AbacusError::DivideByZero);
        }
        let base = self.base();
        let hint = self.joint_precision(other);
        if self.is_zero() {
            return Ok((Self::new(base)?, Self::new(base)?));
        }

        // scale both operands into integers by a common shift
        let shift = self.fractional_digits().max(other.fractional_digits()) as i32;
        let na = int_vec(&self.magnitude().shifted(shift));
        let nb = int_vec(&other.magnitude().shifted(shift));

        let (q, r) = int_divrem(&na, &nb, base);

        let quotient = Self::from_digits(
            base,
            self.is_negative() != other.is_negative(),
            q,
            0,
            hint,
        );
        // the scaled remainder is r * base^shift; shift it back
        let remainder = Self::from_digits(base, self.is_negative(), r, -shift, hint);
        Ok((quotient, remainder))
    }

    /// Integer quotient, truncated toward zero.
    pub fn div(&self, other: &Self) -> Result<Self> {
        Ok(self.div_rem(other)?.0)
    }

    /// Division carried past the radix point to `precision` fractional
    /// digits, rounded half-to-even, terminating early when exact.
    pub fn div_fractional(&self, other: &Self, precision: u32) -> Result<Self> {
        self.check_same_base(other)?;
        if other.is_zero() {
            return Err(AbacusError::DivideByZero);
        }
        let base = self.base();
        if self.is_zero() {
            return Self::new(base);
        }

        let shift = self.fractional_digits().max(other.fractional_digits()) as i32;
        let na = int_vec(&self.magnitude().shifted(shift));
        let nb = int_vec(&other.magnitude().shifted(shift));

        let (int_digits, mut rem) = int_divrem(&na, &nb, base);

        // one digit per scale-divide step, plus one rounding digit
        let mut frac_digits: Vec<u32> = Vec::with_capacity(precision as usize + 1);
        while !rem.is_empty() && frac_digits.len() <= precision as usize {
            rem.insert(0, 0); // rem *= base
            let (qd, next) = int_divrem(&rem, &nb, base);
            debug_assert!(qd.len() <= 1);
            frac_digits.push(qd.first().copied().unwrap_or(0));
            rem = next;
        }

        let round_digit = if frac_digits.len() > precision as usize {
            frac_digits.pop().unwrap()
        } else {
            0
        };

        // assemble ascending digits from exponent -len(frac)
        let frac_len = frac_digits.len();
        let mut digits = Vec::with_capacity(frac_len + int_digits.len());
        digits.extend(frac_digits.iter().rev());
        digits.extend(int_digits.iter());
        let mut mag = Magnitude {
            digits,
            min_exponent: -(frac_len as i32),
        };

        let twice = 2 * round_digit;
        let sticky = !rem.is_empty();
        let kept = mag.digit_at(-(precision as i32));
        if twice > base || (twice == base && (sticky || kept % 2 == 1)) {
            let ulp = Magnitude {
                digits: vec![1],
                min_exponent: -(precision as i32),
            };
            mag = mag.add_magnitude(&ulp, base);
        }

        Ok(Self::from_parts(
            base,
            self.is_negative() != other.is_negative(),
            mag,
            precision,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Abacus {
        Abacus::from_signed(v, 10).unwrap()
    }

    #[test]
    fn test_div_rem_basics() {
        let (q, r) = n(17).div_rem(&n(5)).unwrap();
        assert_eq!(q, n(3));
        assert_eq!(r, n(2));

        let (q, r) = n(144).div_rem(&n(12)).unwrap();
        assert_eq!(q, n(12));
        assert!(r.is_zero());
    }

    #[test]
    fn test_div_rem_signs() {
        // quotient truncates toward zero, remainder follows the dividend
        let (q, r) = n(-17).div_rem(&n(5)).unwrap();
        assert_eq!(q, n(-3));
        assert_eq!(r, n(-2));

        let (q, r) = n(17).div_rem(&n(-5)).unwrap();
        assert_eq!(q, n(-3));
        assert_eq!(r, n(2));

        let (q, r) = n(-17).div_rem(&n(-5)).unwrap();
        assert_eq!(q, n(3));
        assert_eq!(r, n(-2));
    }

    #[test]
    fn test_div_rem_identity() {
        for (a, b) in [(982451653i64, 7919i64), (-40320, 13), (5, 100)] {
            let (x, y) = (n(a), n(b));
            let (q, r) = x.div_rem(&y).unwrap();
            let back = q.mul(&y).unwrap().add(&r).unwrap();
            assert_eq!(back, x, "{a} / {b}");
            assert!(r.compare_abs(&y).unwrap() == std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(
            n(1).div_rem(&n(0)).unwrap_err(),
            AbacusError::DivideByZero
        );
        assert_eq!(
            n(1).div_fractional(&n(0), 5).unwrap_err(),
            AbacusError::DivideByZero
        );
    }

    #[test]
    fn test_div_rem_fractional_operands() {
        // 6.25 / 2.5 = 2 r 1.25
        let a = Abacus::from_float(6.25, 10, 2).unwrap();
        let b = Abacus::from_float(2.5, 10, 1).unwrap();
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(q.to_unsigned().unwrap(), 2);
        assert!((r.to_float() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_div_fractional_exact_termination() {
        // 1 / 8 = 0.125 exactly, fewer digits than requested
        let q = n(1).div_fractional(&n(8), 10).unwrap();
        assert!((q.to_float() - 0.125).abs() < 1e-15);
        assert_eq!(q.min_exponent(), -3);
    }

    #[test]
    fn test_div_fractional_one_seventh() {
        let q = n(1).div_fractional(&n(7), 20).unwrap();
        assert!((q.to_float() - 1.0 / 7.0).abs() < 1e-15);
    }

    #[test]
    fn test_div_fractional_rounding_half_even() {
        // 1/4 at precision 1: digits 0.25 -> round digit 5, remainder dead,
        // kept digit 2 even -> stays 0.2
        let q = n(1).div_fractional(&n(4), 1).unwrap();
        assert!((q.to_float() - 0.2).abs() < 1e-12);

        // 3/4 at precision 1: 0.75 -> kept digit 7 odd -> 0.8
        let q = n(3).div_fractional(&n(4), 1).unwrap();
        assert!((q.to_float() - 0.8).abs() < 1e-12);

        // 2/3 at precision 2: 0.666... -> round digit 6 > 5 -> 0.67
        let q = n(2).div_fractional(&n(3), 2).unwrap();
        assert!((q.to_float() - 0.67).abs() < 1e-12);
    }

    #[test]
    fn test_div_fractional_sign() {
        let q = n(-1).div_fractional(&n(2), 4).unwrap();
        assert!((q.to_float() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_div_fractional_carry_out_of_fraction() {
        // 1999/1000 at precision 2 -> 2.00
        let q = n(1999).div_fractional(&n(1000), 2).unwrap();
        assert!((q.to_float() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_div_fractional_base60() {
        // 1/2 in base 60 is a single fractional digit of 30
        let a = Abacus::from_unsigned(1, 60).unwrap();
        let b = Abacus::from_unsigned(2, 60).unwrap();
        let q = a.div_fractional(&b, 5).unwrap();
        assert_eq!(q.store().digit_at(-1), 30);
        assert_eq!(q.min_exponent(), -1);
    }
}
