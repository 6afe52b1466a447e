//! Bead storage layout
//!
//! A number's digits live in a [`BeadStore`], which is either *dense* (a
//! contiguous digit vector covering every exponent between its bounds, zero
//! digits included) or *sparse* (only the non-zero digits, each tagged with
//! its exponent). Either layout represents the same value and converts
//! losslessly to the other.
//!
//! ## Canonical form
//!
//! ```text
//! value = sum( digit_i * base^exponent_i )
//! ```
//!
//! - no two beads share an exponent
//! - every digit is in [0, base)
//! - the lowest and highest stored exponents carry non-zero digits
//! - the value zero is an empty sparse store
//!
//! Layout selection: a store whose non-zero density over its exponent span
//! falls below the configured threshold is kept sparse, otherwise dense.

use crate::error::{AbacusError, Result};

/// One positional digit together with its weight exponent.
///
/// A bead with `value = 3` and `exponent = -1` contributes `3 * base^-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bead {
    /// Digit value in [0, base)
    pub value: u32,
    /// Positional weight exponent, negative for fractional positions
    pub exponent: i32,
}

/// Digit storage: dense vector or sparse exponent-tagged list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeadStore {
    /// Every digit from `min_exponent` upward, zeros included.
    /// `digits[i]` sits at exponent `min_exponent + i`.
    Dense {
        /// Digits in ascending exponent order
        digits: Vec<u32>,
        /// Exponent of `digits[0]`
        min_exponent: i32,
    },
    /// Non-zero digits only, in ascending exponent order.
    Sparse {
        /// Non-zero beads
        beads: Vec<Bead>,
    },
}

impl BeadStore {
    /// The empty (zero) store.
    pub fn zero() -> Self {
        BeadStore::Sparse { beads: Vec::new() }
    }

    /// Build a canonical store from a raw digit vector.
    ///
    /// Trims zero digits at both ends, then picks the layout: sparse when
    /// non-zero density over the trimmed span is below `sparse_threshold`.
    /// Digits must already be fully carried (each `< base`).
    pub fn canonical(mut digits: Vec<u32>, mut min_exponent: i32, sparse_threshold: f64) -> Self {
        while digits.last() == Some(&0) {
            digits.pop();
        }
        let lead = digits.iter().take_while(|&&d| d == 0).count();
        if lead > 0 {
            digits.drain(..lead);
            min_exponent += lead as i32;
        }
        if digits.is_empty() {
            return BeadStore::zero();
        }

        let nonzero = digits.iter().filter(|&&d| d != 0).count();
        let density = nonzero as f64 / digits.len() as f64;
        if density < sparse_threshold {
            let beads = digits
                .iter()
                .enumerate()
                .filter(|(_, &d)| d != 0)
                .map(|(i, &d)| Bead {
                    value: d,
                    exponent: min_exponent + i as i32,
                })
                .collect();
            BeadStore::Sparse { beads }
        } else {
            BeadStore::Dense {
                digits,
                min_exponent,
            }
        }
    }

    /// True when no non-zero digit is stored.
    pub fn is_zero(&self) -> bool {
        match self {
            BeadStore::Dense { digits, .. } => digits.iter().all(|&d| d == 0),
            BeadStore::Sparse { beads } => beads.is_empty(),
        }
    }

    /// True for the sparse layout.
    pub fn is_sparse(&self) -> bool {
        matches!(self, BeadStore::Sparse { .. })
    }

    /// Lowest exponent carrying a non-zero digit, `None` for zero.
    pub fn min_exponent(&self) -> Option<i32> {
        match self {
            BeadStore::Dense {
                digits,
                min_exponent,
            } => digits
                .iter()
                .position(|&d| d != 0)
                .map(|i| min_exponent + i as i32),
            BeadStore::Sparse { beads } => beads.first().map(|b| b.exponent),
        }
    }

    /// Highest exponent carrying a non-zero digit, `None` for zero.
    pub fn max_exponent(&self) -> Option<i32> {
        match self {
            BeadStore::Dense {
                digits,
                min_exponent,
            } => digits
                .iter()
                .rposition(|&d| d != 0)
                .map(|i| min_exponent + i as i32),
            BeadStore::Sparse { beads } => beads.last().map(|b| b.exponent),
        }
    }

    /// Digit value at an exponent, zero when absent.
    pub fn digit_at(&self, exponent: i32) -> u32 {
        match self {
            BeadStore::Dense {
                digits,
                min_exponent,
            } => {
                let idx = exponent as i64 - *min_exponent as i64;
                if idx < 0 || idx >= digits.len() as i64 {
                    0
                } else {
                    digits[idx as usize]
                }
            }
            BeadStore::Sparse { beads } => beads
                .binary_search_by_key(&exponent, |b| b.exponent)
                .map(|i| beads[i].value)
                .unwrap_or(0),
        }
    }

    /// Set the digit at an exponent, growing the span as needed.
    ///
    /// Dense stores pad intervening positions with zeros; sparse stores
    /// insert, replace, or drop the bead so no zero bead is ever kept.
    pub fn set_digit(&mut self, exponent: i32, value: u32) {
        match self {
            BeadStore::Dense {
                digits,
                min_exponent,
            } => {
                if digits.is_empty() {
                    *min_exponent = exponent;
                }
                if exponent < *min_exponent {
                    let pad = (*min_exponent - exponent) as usize;
                    digits.splice(0..0, std::iter::repeat(0).take(pad));
                    *min_exponent = exponent;
                }
                let idx = (exponent - *min_exponent) as usize;
                if idx >= digits.len() {
                    digits.resize(idx + 1, 0);
                }
                digits[idx] = value;
            }
            BeadStore::Sparse { beads } => {
                match beads.binary_search_by_key(&exponent, |b| b.exponent) {
                    Ok(i) => {
                        if value == 0 {
                            beads.remove(i);
                        } else {
                            beads[i].value = value;
                        }
                    }
                    Err(i) => {
                        if value != 0 {
                            beads.insert(i, Bead { value, exponent });
                        }
                    }
                }
            }
        }
    }

    /// Number of non-zero digits.
    pub fn nonzero_count(&self) -> usize {
        match self {
            BeadStore::Dense { digits, .. } => digits.iter().filter(|&&d| d != 0).count(),
            BeadStore::Sparse { beads } => beads.len(),
        }
    }

    /// Exponent span `max - min + 1`, zero for the zero value.
    pub fn span(&self) -> usize {
        match (self.min_exponent(), self.max_exponent()) {
            (Some(lo), Some(hi)) => (hi - lo + 1) as usize,
            _ => 0,
        }
    }

    /// Fraction of the exponent span occupied by non-zero digits,
    /// 1.0 for the zero value.
    pub fn density(&self) -> f64 {
        let span = self.span();
        if span == 0 {
            1.0
        } else {
            self.nonzero_count() as f64 / span as f64
        }
    }

    /// Iterate non-zero beads in ascending exponent order.
    pub fn nonzero_beads(&self) -> NonzeroBeads<'_> {
        NonzeroBeads { store: self, pos: 0 }
    }

    /// Append a bead above the current top exponent.
    ///
    /// Capacity-aware: allocation failure surfaces as `OutOfMemory` instead
    /// of aborting. The bead's exponent must exceed every stored exponent;
    /// dense stores are padded with zeros across any gap.
    pub fn push_high(&mut self, bead: Bead) -> Result<()> {
        if bead.value == 0 {
            return Ok(());
        }
        match self {
            BeadStore::Dense {
                digits,
                min_exponent,
            } => {
                if digits.is_empty() {
                    *min_exponent = bead.exponent;
                }
                let idx = bead.exponent as i64 - *min_exponent as i64;
                debug_assert!(idx >= digits.len() as i64);
                let needed = (idx as usize + 1).saturating_sub(digits.len());
                digits
                    .try_reserve(needed)
                    .map_err(|_| AbacusError::OutOfMemory)?;
                digits.resize(idx as usize, 0);
                digits.push(bead.value);
            }
            BeadStore::Sparse { beads } => {
                debug_assert!(beads.last().map_or(true, |b| b.exponent < bead.exponent));
                beads.try_reserve(1).map_err(|_| AbacusError::OutOfMemory)?;
                beads.push(bead);
            }
        }
        Ok(())
    }

    /// Convert in place to the dense layout.
    pub fn densify(&mut self) {
        if let BeadStore::Sparse { beads } = self {
            if beads.is_empty() {
                *self = BeadStore::Dense {
                    digits: Vec::new(),
                    min_exponent: 0,
                };
                return;
            }
            let min = beads[0].exponent;
            let max = beads[beads.len() - 1].exponent;
            let mut digits = vec![0u32; (max - min + 1) as usize];
            for b in beads.iter() {
                digits[(b.exponent - min) as usize] = b.value;
            }
            *self = BeadStore::Dense {
                digits,
                min_exponent: min,
            };
        }
    }

    /// Convert in place to the sparse layout.
    pub fn sparsify(&mut self) {
        if let BeadStore::Dense {
            digits,
            min_exponent,
        } = self
        {
            let beads = digits
                .iter()
                .enumerate()
                .filter(|(_, &d)| d != 0)
                .map(|(i, &d)| Bead {
                    value: d,
                    exponent: *min_exponent + i as i32,
                })
                .collect();
            *self = BeadStore::Sparse { beads };
        }
    }

    /// Switch layout according to the density threshold.
    pub fn optimize(&mut self, sparse_threshold: f64) {
        if self.density() < sparse_threshold {
            self.sparsify();
        } else {
            self.densify();
        }
    }

    /// Heap bytes held by the store.
    pub fn memory_bytes(&self) -> usize {
        match self {
            BeadStore::Dense { digits, .. } => digits.capacity() * std::mem::size_of::<u32>(),
            BeadStore::Sparse { beads } => beads.capacity() * std::mem::size_of::<Bead>(),
        }
    }
}

/// Ascending iterator over non-zero beads.
pub struct NonzeroBeads<'a> {
    store: &'a BeadStore,
    pos: usize,
}

impl Iterator for NonzeroBeads<'_> {
    type Item = Bead;

    fn next(&mut self) -> Option<Bead> {
        match self.store {
            BeadStore::Dense {
                digits,
                min_exponent,
            } => {
                while self.pos < digits.len() {
                    let i = self.pos;
                    self.pos += 1;
                    if digits[i] != 0 {
                        return Some(Bead {
                            value: digits[i],
                            exponent: min_exponent + i as i32,
                        });
                    }
                }
                None
            }
            BeadStore::Sparse { beads } => {
                let b = beads.get(self.pos).copied();
                self.pos += 1;
                b
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_store() {
        let store = BeadStore::zero();
        assert!(store.is_zero());
        assert!(store.is_sparse());
        assert_eq!(store.min_exponent(), None);
        assert_eq!(store.span(), 0);
        assert_eq!(store.digit_at(0), 0);
    }

    #[test]
    fn test_canonical_trims_both_ends() {
        // 0 0 3 0 7 0 at exponents -2..=3
        let store = BeadStore::canonical(vec![0, 0, 3, 0, 7, 0], -2, 0.30);
        assert_eq!(store.min_exponent(), Some(0));
        assert_eq!(store.max_exponent(), Some(2));
        assert_eq!(store.digit_at(0), 3);
        assert_eq!(store.digit_at(1), 0);
        assert_eq!(store.digit_at(2), 7);
    }

    #[test]
    fn test_canonical_all_zero_is_zero() {
        let store = BeadStore::canonical(vec![0, 0, 0], 5, 0.30);
        assert!(store.is_zero());
    }

    #[test]
    fn test_canonical_picks_sparse_below_threshold() {
        // one non-zero digit over a span of 10: density 0.1 < 0.3
        let mut digits = vec![0u32; 10];
        digits[0] = 1;
        digits[9] = 2;
        let store = BeadStore::canonical(digits, 0, 0.30);
        assert!(store.is_sparse());
        assert_eq!(store.nonzero_count(), 2);

        // all non-zero: dense
        let store = BeadStore::canonical(vec![1, 2, 3], 0, 0.30);
        assert!(!store.is_sparse());
    }

    #[test]
    fn test_densify_sparsify_roundtrip() {
        let mut store = BeadStore::canonical(vec![1, 0, 0, 0, 0, 0, 0, 0, 2], -4, 0.30);
        assert!(store.is_sparse());
        let sparse = store.clone();

        store.densify();
        assert!(!store.is_sparse());
        assert_eq!(store.digit_at(-4), 1);
        assert_eq!(store.digit_at(4), 2);
        assert_eq!(store.digit_at(0), 0);

        store.sparsify();
        assert_eq!(store, sparse);
    }

    #[test]
    fn test_nonzero_iteration_order() {
        let store = BeadStore::canonical(vec![5, 0, 7, 1], -1, 0.90);
        let beads: Vec<Bead> = store.nonzero_beads().collect();
        assert_eq!(
            beads,
            vec![
                Bead { value: 5, exponent: -1 },
                Bead { value: 7, exponent: 1 },
                Bead { value: 1, exponent: 2 },
            ]
        );
    }

    #[test]
    fn test_set_digit_dense_grows_span() {
        let mut store = BeadStore::Dense {
            digits: vec![5],
            min_exponent: 0,
        };
        store.set_digit(2, 7);
        store.set_digit(-2, 3);
        assert_eq!(store.digit_at(2), 7);
        assert_eq!(store.digit_at(-2), 3);
        assert_eq!(store.digit_at(0), 5);
        assert_eq!(store.digit_at(1), 0);
    }

    #[test]
    fn test_set_digit_sparse_never_keeps_zero() {
        let mut store = BeadStore::zero();
        store.set_digit(4, 9);
        store.set_digit(-1, 2);
        assert_eq!(store.nonzero_count(), 2);
        assert_eq!(store.digit_at(4), 9);

        store.set_digit(4, 0);
        assert_eq!(store.nonzero_count(), 1);
        assert_eq!(store.digit_at(4), 0);

        // writing zero where nothing is stored stays a no-op
        store.set_digit(100, 0);
        assert_eq!(store.nonzero_count(), 1);
    }

    #[test]
    fn test_push_high_pads_dense_gap() {
        let mut store = BeadStore::Dense {
            digits: vec![3],
            min_exponent: 0,
        };
        store.push_high(Bead { value: 9, exponent: 3 }).unwrap();
        assert_eq!(store.digit_at(1), 0);
        assert_eq!(store.digit_at(2), 0);
        assert_eq!(store.digit_at(3), 9);
    }

    #[test]
    fn test_density() {
        let store = BeadStore::canonical(vec![1, 0, 0, 0, 1], 0, 0.10);
        assert!((store.density() - 0.4).abs() < 1e-12);
    }
}
