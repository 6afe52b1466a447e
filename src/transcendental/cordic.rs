//! CORDIC trigonometry
//!
//! Rotation and vectoring over the abacus's own radix: level `k` rotates
//! by `atan(base^-k)`, implemented as an exact digit shift plus adds. A
//! radix above 2 leaves angle gaps between levels, so each level repeats
//! its rotation greedily until the residue drops under its table angle;
//! the rotation count per level stays below the base.
//!
//! The per-rotation magnitude gain `sqrt(1 + base^-2k)` is data-dependent
//! under repetition, so rotation mode tracks the exact squared-gain
//! product (terminating digit expansions) and removes it with one
//! fractional square root at the end. Vectoring mode reads only the
//! accumulated angle, which the gain never touches.
//!
//! The arctangent table is process-wide and memoized per base, level, and
//! precision, like the constants table.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::constants;
use crate::error::{AbacusError, Result};
use crate::number::Abacus;
use crate::transcendental::below_eps;

/// Guard digits for the CORDIC working precision.
const GUARD_DIGITS: u32 = 4;

static ATAN_TABLE: Lazy<Mutex<HashMap<(u32, u32), Abacus>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// `atan(base^-level)` at `working` fractional digits, memoized.
fn atan_power(base: u32, level: u32, working: u32) -> Result<Abacus> {
    if let Some(cached) = ATAN_TABLE
        .lock()
        .expect("arctangent table poisoned")
        .get(&(base, level))
    {
        if cached.precision() >= working {
            return Ok(cached.round_to(working));
        }
    }

    let mut value = if level == 0 {
        // atan(1) = pi/4
        let four = Abacus::from_unsigned(4, base)?;
        constants::pi(base, working + 2)?.div_fractional(&four, working)?
    } else {
        // atan(t) = t - t^3/3 + t^5/5 - ... with t = base^-level:
        // every power of t is an exact single-digit shift
        let mut power = Abacus::from_unsigned(1, base)?;
        power.shift_right(level);
        let mut sum = power.clone();
        let mut n = 1u64;
        let mut subtract = true;
        loop {
            power.shift_right(2 * level);
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
        sum
    };
    value.set_precision(working);

    let mut table = ATAN_TABLE.lock().expect("arctangent table poisoned");
    let entry = table.entry((base, level)).or_insert_with(|| value.clone());
    if entry.precision() < value.precision() {
        *entry = value.clone();
    }
    Ok(value)
}

/// Reduce an angle into `[-pi, pi]`.
fn reduce_angle(x: &Abacus, working: u32) -> Result<Abacus> {
    let base = x.base();
    // large angles eat leading digits of pi during the subtraction
    let turn_digits = x.max_exponent().max(0) as u32 + 1;
    let pi = constants::pi(base, working + turn_digits)?;
    let two_pi = pi.mul_small(2);

    let turns = x.div_fractional(&two_pi, working)?.round_to(0);
    let mut angle = x.sub(&two_pi.mul(&turns)?)?;
    if angle.compare_unchecked(&pi) == Ordering::Greater {
        angle = angle.sub(&two_pi)?;
    }
    if angle.compare_unchecked(&pi.negate()) == Ordering::Less {
        angle = angle.add(&two_pi)?;
    }
    Ok(angle.truncate_to(working))
}

impl Abacus {
    /// Simultaneous `(sin x, cos x)` to `precision` fractional digits.
    pub fn sin_cos(&self, precision: u32) -> Result<(Self, Self)> {
        let base = self.base();
        let working = precision + GUARD_DIGITS;
        let levels = working;

        let mut residue = reduce_angle(self, working)?;
        let mut x = Self::from_unsigned(1, base)?;
        let mut y = Self::new(base)?;
        let mut gain_sq = Self::from_unsigned(1, base)?;

        // 1 + base^-2k, rebuilt per level
        let one = Self::from_unsigned(1, base)?;

        for level in 0..=levels {
            let theta = atan_power(base, level, working)?;
            let mut step_gain = Self::from_unsigned(1, base)?;
            step_gain.shift_right(2 * level);
            step_gain = step_gain.add(&one)?;

            loop {
                if residue.abs().compare_unchecked(&theta) == Ordering::Less {
                    break;
                }
                let x_shift = x.shifted(-(level as i32));
                let y_shift = y.shifted(-(level as i32));
                if residue.is_negative() {
                    x = x.add(&y_shift)?.truncate_to(working);
                    y = y.sub(&x_shift)?.truncate_to(working);
                    residue = residue.add(&theta)?;
                } else {
                    x = x.sub(&y_shift)?.truncate_to(working);
                    y = y.add(&x_shift)?.truncate_to(working);
                    residue = residue.sub(&theta)?;
                }
                gain_sq = gain_sq.mul(&step_gain)?.truncate_to(working);
            }
        }

        let gain = gain_sq.sqrt_fractional(working)?;
        let cos = x.div_fractional(&gain, working)?.round_to(precision);
        let sin = y.div_fractional(&gain, working)?.round_to(precision);
        Ok((sin, cos))
    }

    /// `sin(self)` to `precision` fractional digits.
    pub fn sin(&self, precision: u32) -> Result<Self> {
        Ok(self.sin_cos(precision)?.0)
    }

    /// `cos(self)` to `precision` fractional digits.
    pub fn cos(&self, precision: u32) -> Result<Self> {
        Ok(self.sin_cos(precision)?.1)
    }

    /// `atan2(self, x)` in `[-pi, pi]` to `precision` fractional digits.
    ///
    /// `self` is the y coordinate. Fails with `Domain` when both arguments
    /// are zero.
    pub fn atan2(&self, x: &Self, precision: u32) -> Result<Self> {
        self.check_same_base(x)?;
        let base = self.base();
        let working = precision + GUARD_DIGITS;

        if self.is_zero() && x.is_zero() {
            return Err(AbacusError::Domain("atan2 of the origin"));
        }

        let pi = constants::pi(base, working)?;
        let two = Self::from_unsigned(2, base)?;

        if x.is_zero() {
            let half_pi = pi.div_fractional(&two, working)?.round_to(precision);
            return Ok(if self.is_negative() {
                half_pi.negate()
            } else {
                half_pi
            });
        }
        if self.is_zero() {
            return Ok(if x.is_negative() {
                pi.round_to(precision)
            } else {
                Self::new(base)?
            });
        }

        // vectoring on |x|, |y|: drive y to zero, accumulate the angle.
        // A common exponent shift leaves the angle untouched and keeps the
        // working precision meaningful for very large or very small inputs.
        let scale = x.max_exponent().max(self.max_exponent());
        let mut vx = x.abs().shifted(-scale);
        let mut vy = self.abs().shifted(-scale);
        let mut angle = Self::new(base)?;
        let levels = working;

        for level in 0..=levels {
            let theta = atan_power(base, level, working)?;
            loop {
                let x_shift = vx.shifted(-(level as i32));
                if vy.abs().compare_unchecked(&x_shift) == Ordering::Less {
                    break;
                }
                let y_shift = vy.shifted(-(level as i32));
                if vy.is_negative() {
                    vx = vx.sub(&y_shift)?.truncate_to(working);
                    vy = vy.add(&x_shift)?.truncate_to(working);
                    angle = angle.sub(&theta)?;
                } else {
                    vx = vx.add(&y_shift)?.truncate_to(working);
                    vy = vy.sub(&x_shift)?.truncate_to(working);
                    angle = angle.add(&theta)?;
                }
            }
        }

        // quadrant from the operand signs
        let quadrant = if x.is_negative() {
            pi.sub(&angle)?
        } else {
            angle
        };
        let signed = if self.is_negative() {
            quadrant.negate()
        } else {
            quadrant
        };
        Ok(signed.round_to(precision))
    }
}
