//! Three-way comparison
//!
//! Lexicographic by sign, then by magnitude from the highest exponent down.

use std::cmp::Ordering;

use crate::error::Result;
use crate::number::Abacus;

impl Abacus {
    /// Compare two values sharing a base.
    ///
    /// Returns `Less`, `Equal`, or `Greater`; fails with `ArgMismatch` when
    /// the bases differ.
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        self.check_same_base(other)?;
        Ok(self.compare_unchecked(other))
    }

    pub(crate) fn compare_unchecked(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.magnitude().cmp_magnitude(&other.magnitude()),
            (true, true) => other.magnitude().cmp_magnitude(&self.magnitude()),
        }
    }

    /// Magnitude-only comparison, signs ignored.
    pub fn compare_abs(&self, other: &Self) -> Result<Ordering> {
        self.check_same_base(other)?;
        Ok(self.magnitude().cmp_magnitude(&other.magnitude()))
    }
}

/// Ordering across same-base values; `None` when bases differ.
impl PartialOrd for Abacus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.base() != other.base() {
            return None;
        }
        Some(self.compare_unchecked(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbacusError;

    fn n(v: i64) -> Abacus {
        Abacus::from_signed(v, 10).unwrap()
    }

    #[test]
    fn test_compare_signs() {
        assert_eq!(n(3).compare(&n(-3)).unwrap(), Ordering::Greater);
        assert_eq!(n(-3).compare(&n(3)).unwrap(), Ordering::Less);
        assert_eq!(n(-2).compare(&n(-3)).unwrap(), Ordering::Greater);
        assert_eq!(n(0).compare(&n(0)).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_magnitudes() {
        assert_eq!(n(100).compare(&n(99)).unwrap(), Ordering::Greater);
        assert_eq!(n(12345).compare(&n(12345)).unwrap(), Ordering::Equal);

        let a = Abacus::from_float(0.5, 10, 4).unwrap();
        let b = Abacus::from_float(0.25, 10, 4).unwrap();
        assert_eq!(a.compare(&b).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_compare_antisymmetry() {
        for (a, b) in [(5i64, 9i64), (-4, 7), (0, -1), (123456, 123455)] {
            let (x, y) = (n(a), n(b));
            let fwd = x.compare(&y).unwrap();
            let rev = y.compare(&x).unwrap();
            assert_eq!(fwd, rev.reverse());
        }
    }

    #[test]
    fn test_compare_base_mismatch() {
        let a = Abacus::from_unsigned(1, 10).unwrap();
        let b = Abacus::from_unsigned(1, 12).unwrap();
        assert!(matches!(
            a.compare(&b),
            Err(AbacusError::ArgMismatch { left: 10, right: 12 })
        ));
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn test_compare_abs() {
        assert_eq!(n(-100).compare_abs(&n(99)).unwrap(), Ordering::Greater);
    }
}
