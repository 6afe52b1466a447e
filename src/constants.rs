//! Mathematical constants table
//!
//! Process-wide, lazily initialized, immutable after computation: each
//! constant is produced on first request in a given base, memoized at the
//! highest precision asked for so far, and truncated down for smaller
//! requests. Entries never recompute for a precision the cache already
//! covers.
//!
//! Series used:
//!
//! - pi: Machin, `pi = 16*atan(1/5) - 4*atan(1/239)`
//! - e: `sum 1/n!`
//! - ln 2: `2*atanh(1/3)`
//! - ln base: `k*ln 2 + 2*atanh((m-1)/(m+1))` with `m = base/2^k` in [1, 2)
//! - golden ratio: `(1 + sqrt 5) / 2`

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::number::Abacus;
use crate::transcendental::atanh_series;

/// Compile-time ceiling on constant precision, in fractional digits.
pub const MAX_CONSTANT_PRECISION: u32 = 512;

/// Identifies one entry of the constants table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// The circle constant
    Pi,
    /// Euler's number
    E,
    /// Natural logarithm of 2
    Ln2,
    /// Natural logarithm of the base itself
    LnBase,
    /// The golden ratio
    GoldenRatio,
}

static TABLE: Lazy<Mutex<HashMap<(Constant, u32), Abacus>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Fetch a constant in `base` with `precision` fractional digits.
///
/// Requests above [`MAX_CONSTANT_PRECISION`] are clamped to it.
pub fn constant(kind: Constant, base: u32, precision: u32) -> Result<Abacus> {
    let precision = precision.min(MAX_CONSTANT_PRECISION);

    if let Some(cached) = TABLE
        .lock()
        .expect("constants table poisoned")
        .get(&(kind, base))
    {
        if cached.precision() >= precision {
            return Ok(cached.round_to(precision));
        }
    }

    let value = compute(kind, base, precision)?;
    let mut table = TABLE.lock().expect("constants table poisoned");
    let entry = table.entry((kind, base)).or_insert_with(|| value.clone());
    if entry.precision() < value.precision() {
        *entry = value.clone();
    }
    Ok(value.round_to(precision))
}

/// `pi` in the given base.
pub fn pi(base: u32, precision: u32) -> Result<Abacus> {
    constant(Constant::Pi, base, precision)
}

/// `e` in the given base.
pub fn e(base: u32, precision: u32) -> Result<Abacus> {
    constant(Constant::E, base, precision)
}

/// `ln 2` in the given base.
pub fn ln2(base: u32, precision: u32) -> Result<Abacus> {
    constant(Constant::Ln2, base, precision)
}

/// `ln(base)` expressed in that same base.
pub fn ln_base(base: u32, precision: u32) -> Result<Abacus> {
    constant(Constant::LnBase, base, precision)
}

/// The golden ratio in the given base.
pub fn golden_ratio(base: u32, precision: u32) -> Result<Abacus> {
    constant(Constant::GoldenRatio, base, precision)
}

fn compute(kind: Constant, base: u32, precision: u32) -> Result<Abacus> {
    match kind {
        Constant::Pi => compute_pi(base, precision),
        Constant::E => compute_e(base, precision),
        Constant::Ln2 => compute_ln2(base, precision),
        Constant::LnBase => compute_ln_base(base, precision),
        Constant::GoldenRatio => compute_phi(base, precision),
    }
}

fn below_eps(x: &Abacus, working: u32) -> bool {
    x.is_zero() || x.max_exponent() < -(working as i32)
}

/// `atan(1/x)` for integer `x >= 2` by the alternating reciprocal series.
fn atan_reciprocal(x: u32, base: u32, working: u32) -> Result<Abacus> {
    let one = Abacus::from_unsigned(1, base)?;
    let x_sq = Abacus::from_unsigned(x as u64 * x as u64, base)?;

    // power = 1/x, then divided by x^2 each term
    let mut power = one.div_fractional(&Abacus::from_unsigned(x as u64, base)?, working)?;
    let mut sum = power.clone();
    let mut n = 1u64;
    let mut subtract = true;
    loop {
        power = power.div_fractional(&x_sq, working)?;
        n += 2;
        if below_eps(&power, working) {
            break;
        }
        let term = power.div_fractional(&Abacus::from_unsigned(n, base)?, working)?;
        sum = if subtract {
            sum.sub(&term)?
        } else {
            sum.add(&term)?
        };
        subtract = !subtract;
    }
    Ok(sum)
}

fn compute_pi(base: u32, precision: u32) -> Result<Abacus> {
    let working = precision + 6;
    let a = atan_reciprocal(5, base, working)?.mul_small(16);
    let b = atan_reciprocal(239, base, working)?.mul_small(4);
    Ok(a.sub(&b)?.round_to(precision))
}

fn compute_e(base: u32, precision: u32) -> Result<Abacus> {
    let working = precision + 4;
    let mut term = Abacus::from_unsigned(1, base)?;
    let mut sum = Abacus::from_unsigned(1, base)?;
    let mut n = 1u64;
    while !below_eps(&term, working) {
        term = term.div_fractional(&Abacus::from_unsigned(n, base)?, working)?;
        sum = sum.add(&term)?;
        n += 1;
    }
    Ok(sum.round_to(precision))
}

fn compute_ln2(base: u32, precision: u32) -> Result<Abacus> {
    let working = precision + 4;
    let one = Abacus::from_unsigned(1, base)?;
    let three = Abacus::from_unsigned(3, base)?;
    let u = one.div_fractional(&three, working)?;
    Ok(atanh_series(&u, working)?.mul_small(2).round_to(precision))
}

fn compute_ln_base(base: u32, precision: u32) -> Result<Abacus> {
    if base == 2 {
        return compute_ln2(base, precision);
    }
    let working = precision + 4;
    let k = 31 - base.leading_zeros(); // floor(log2(base))
    let pow2 = Abacus::from_unsigned(1u64 << k, base)?;
    let m = Abacus::from_unsigned(base as u64, base)?.div_fractional(&pow2, working)?;

    let one = Abacus::from_unsigned(1, base)?;
    let u = m
        .sub(&one)?
        .div_fractional(&m.add(&one)?, working)?;
    let ln_m = atanh_series(&u, working)?.mul_small(2);
    let result = compute_ln2(base, working)?.mul_small(k).add(&ln_m)?;
    Ok(result.round_to(precision))
}

fn compute_phi(base: u32, precision: u32) -> Result<Abacus> {
    let working = precision + 2;
    let five = Abacus::from_unsigned(5, base)?;
    let root = five.sqrt_fractional(working)?;
    let one = Abacus::from_unsigned(1, base)?;
    let two = Abacus::from_unsigned(2, base)?;
    root.add(&one)?
        .div_fractional(&two, working)
        .map(|phi| phi.round_to(precision))
}
