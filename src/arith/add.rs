//! Addition and subtraction
//!
//! Sign cases reduce both operations to a magnitude add or a magnitude
//! subtract of the smaller from the larger. The digit loops walk the union
//! of the operands' exponent ranges in ascending order, carrying or
//! borrowing into the next position.
//!
//! Same-sign sparse operands take a merge path over non-zero beads only,
//! skipping the dense walk across empty spans.

use std::cmp::Ordering;

use crate::arith::Magnitude;
use crate::bead::Bead;
use crate::error::Result;
use crate::number::Abacus;

/// Merge two sparse bead runs, then resolve carries in one ascending pass.
fn add_sparse(a: &Abacus, b: &Abacus, base: u32) -> Magnitude {
    let mut beads: Vec<Bead> = Vec::new();
    let mut ia = a.store().nonzero_beads().peekable();
    let mut ib = b.store().nonzero_beads().peekable();
    loop {
        let pa = ia.peek().copied();
        let pb = ib.peek().copied();
        let next = match (pa, pb) {
            (Some(x), Some(y)) if x.exponent == y.exponent => {
                ia.next();
                ib.next();
                Bead {
                    value: x.value + y.value,
                    exponent: x.exponent,
                }
            }
            (Some(x), Some(y)) if x.exponent < y.exponent => {
                ia.next();
                x
            }
            (Some(_), Some(y)) => {
                ib.next();
                y
            }
            (Some(x), None) => {
                ia.next();
                x
            }
            (None, Some(y)) => {
                ib.next();
                y
            }
            (None, None) => break,
        };
        beads.push(next);
    }

    // carry resolution: a carry lands on exponent + 1, which may be a gap
    let mut i = 0;
    while i < beads.len() {
        if beads[i].value >= base {
            let carry = beads[i].value / base;
            beads[i].value %= base;
            let exp = beads[i].exponent + 1;
            let merges = beads.get(i + 1).map_or(false, |n| n.exponent == exp);
            if merges {
                beads[i + 1].value += carry;
            } else {
                beads.insert(i + 1, Bead { value: carry, exponent: exp });
            }
        }
        i += 1;
    }

    let lo = match beads.first() {
        Some(b) => b.exponent,
        None => return Magnitude::zero(),
    };
    let hi = beads.last().unwrap().exponent;
    let mut digits = vec![0u32; (hi - lo + 1) as usize];
    for b in &beads {
        digits[(b.exponent - lo) as usize] = b.value;
    }
    Magnitude {
        digits,
        min_exponent: lo,
    }
}

impl Abacus {
    /// `self + other`. Fails with `ArgMismatch` on differing bases.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_base(other)?;
        let base = self.base();
        let hint = self.joint_precision(other);

        if self.is_negative() == other.is_negative() {
            let mag = if self.is_sparse() && other.is_sparse() {
                add_sparse(self, other, base)
            } else {
                self.magnitude().add_magnitude(&other.magnitude(), base)
            };
            return Ok(Self::from_parts(base, self.is_negative(), mag, hint));
        }

        // opposite signs: subtract the smaller magnitude from the larger
        let ma = self.magnitude();
        let mb = other.magnitude();
        match ma.cmp_magnitude(&mb) {
            Ordering::Equal => Self::new(base),
            Ordering::Greater => {
                let mag = ma.sub_magnitude(&mb, base);
                Ok(Self::from_parts(base, self.is_negative(), mag, hint))
            }
            Ordering::Less => {
                let mag = mb.sub_magnitude(&ma, base);
                Ok(Self::from_parts(base, other.is_negative(), mag, hint))
            }
        }
    }

    /// `self - other`. Fails with `ArgMismatch` on differing bases.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.add(&other.negate())
    }
}
