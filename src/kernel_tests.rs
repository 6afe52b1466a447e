//! Kernel acceptance tests
//!
//! Cross-cutting invariants checked over randomized operands, plus the
//! literal end-to-end scenarios the kernel is specified against. Unit
//! tests for individual operations live next to their implementations;
//! everything here exercises the public surface only.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::KernelConfig;
use crate::constants;
use crate::number::Abacus;

/// Canonical-form check: fully carried digits, no zero beads in sparse
/// layout, trimmed span, non-negative zero.
fn assert_canonical(n: &Abacus) {
    let base = n.base();
    for bead in n.store().nonzero_beads() {
        assert!(bead.value < base, "digit {} >= base {}", bead.value, base);
        assert!(bead.value > 0);
    }
    if n.is_zero() {
        assert!(!n.is_negative(), "zero must carry a positive sign");
    } else {
        assert!(n.store().digit_at(n.min_exponent()) != 0);
        assert!(n.store().digit_at(n.max_exponent()) != 0);
    }
}

fn random_i64(rng: &mut StdRng) -> i64 {
    rng.gen_range(-1_000_000_000_000i64..=1_000_000_000_000)
}

#[test]
fn invariant_canonical_after_operations() {
    let mut rng = StdRng::seed_from_u64(7);
    for base in [2u32, 10, 60, 256] {
        for _ in 0..25 {
            let a = Abacus::from_signed(random_i64(&mut rng), base).unwrap();
            let b = Abacus::from_signed(random_i64(&mut rng) | 1, base).unwrap();
            assert_canonical(&a.add(&b).unwrap());
            assert_canonical(&a.sub(&b).unwrap());
            assert_canonical(&a.mul(&b).unwrap());
            let (q, r) = a.div_rem(&b).unwrap();
            assert_canonical(&q);
            assert_canonical(&r);
        }
    }
}

#[test]
fn invariant_float_roundtrip_within_precision() {
    let mut rng = StdRng::seed_from_u64(11);
    for base in [2u32, 10, 60] {
        for _ in 0..40 {
            let x = rng.gen_range(-1_000.0f64..1_000.0);
            let p = rng.gen_range(4u32..12);
            let n = Abacus::from_float(x, base, p).unwrap();
            let bound = (base as f64).powi(-(p as i32));
            assert!((n.to_float() - x).abs() <= bound, "{x} base {base} p {p}");
        }
    }
}

#[test]
fn invariant_add_commutative() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..50 {
        let a = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        let b = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
    }
}

#[test]
fn invariant_sub_undoes_add_exactly() {
    let mut rng = StdRng::seed_from_u64(17);
    for base in [2u32, 16, 60] {
        for _ in 0..40 {
            let a = Abacus::from_signed(random_i64(&mut rng), base).unwrap();
            let b = Abacus::from_signed(random_i64(&mut rng), base).unwrap();
            let sum = a.add(&b).unwrap();
            assert_eq!(sum.sub(&b).unwrap(), a);
        }
    }
}

#[test]
fn invariant_mul_commutative() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..40 {
        let a = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        let b = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
    }
}

#[test]
fn invariant_div_undoes_mul() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..40 {
        let a = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        let b = Abacus::from_signed(random_i64(&mut rng) | 1, 10).unwrap();
        let product = a.mul(&b).unwrap();
        let (q, r) = product.div_rem(&b).unwrap();
        assert_eq!(q, a);
        assert!(r.is_zero());
    }
}

#[test]
fn invariant_compare_antisymmetric() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..50 {
        let a = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        let b = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        let fwd = a.compare(&b).unwrap() as i32;
        let rev = b.compare(&a).unwrap() as i32;
        assert_eq!(fwd + rev, 0);
    }
}

#[test]
fn invariant_sparsify_densify_identity() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..30 {
        let original = Abacus::from_signed(random_i64(&mut rng), 10).unwrap();
        let mut copy = original.clone();
        copy.sparsify();
        assert_eq!(copy, original);
        copy.densify();
        assert_eq!(copy, original);
        copy.optimize_representation();
        assert_eq!(copy, original);
    }
}

#[test]
fn invariant_gcd_divides_both() {
    let mut rng = StdRng::seed_from_u64(37);
    for _ in 0..25 {
        let a = Abacus::from_unsigned(rng.gen_range(1u64..10_000_000), 10).unwrap();
        let b = Abacus::from_unsigned(rng.gen_range(1u64..10_000_000), 10).unwrap();
        let g = a.gcd(&b).unwrap();
        assert!(a.div_rem(&g).unwrap().1.is_zero());
        assert!(b.div_rem(&g).unwrap().1.is_zero());

        let zero = Abacus::new(10).unwrap();
        assert_eq!(a.gcd(&zero).unwrap(), a);
    }
}

#[test]
fn invariant_sqrt_bracket() {
    let mut rng = StdRng::seed_from_u64(41);
    for _ in 0..25 {
        let v = rng.gen_range(0u64..1_000_000_000_000);
        let n = Abacus::from_unsigned(v, 10).unwrap();
        let x = n.sqrt().unwrap().to_unsigned().unwrap();
        assert!(x * x <= v, "sqrt({v}) = {x}");
        assert!((x + 1) * (x + 1) > v, "sqrt({v}) = {x}");
    }
}

#[test]
fn invariant_sin_sq_plus_cos_sq_unit() {
    for (base, precision) in [(10u32, 8u32), (60, 6)] {
        for v in [0.5f64, 1.2, -2.0, 3.0] {
            let x = Abacus::from_float(v, base, precision + 2).unwrap();
            let (sin, cos) = x.sin_cos(precision).unwrap();
            let unit = sin
                .mul(&sin)
                .unwrap()
                .add(&cos.mul(&cos).unwrap())
                .unwrap();
            let bound = (base as f64).powi(-(precision as i32 - 1));
            assert!(
                (unit.to_float() - 1.0).abs() <= bound,
                "base {base} angle {v}: {}",
                unit.to_float()
            );
        }
    }
}

#[test]
fn invariant_exp_ln_roundtrip() {
    for v in [2u64, 10, 100, 12345] {
        let x = Abacus::from_unsigned(v, 10).unwrap();
        let back = x.ln(16).unwrap().exp(12).unwrap();
        let bound = (v as f64) * 1e-10;
        assert!(
            (back.to_float() - v as f64).abs() <= bound,
            "exp(ln({v})) = {}",
            back.to_float()
        );
    }
}

// ----------------------------------------------------------------------
// literal scenarios
// ----------------------------------------------------------------------

#[test]
fn scenario_unsigned_base60_to_float_exact() {
    let n = Abacus::from_unsigned(12345, 60).unwrap();
    assert_eq!(n.to_float(), 12345.0);
}

#[test]
fn scenario_mixed_add_to_float() {
    let a = Abacus::from_unsigned(3, 10).unwrap();
    let b = Abacus::from_float(3.333, 10, 6).unwrap();
    let sum = a.add(&b).unwrap();
    assert!((sum.to_float() - 6.333).abs() <= 1e-6);
}

#[test]
fn scenario_one_seventh_twenty_digits() {
    let one = Abacus::from_unsigned(1, 10).unwrap();
    let seven = Abacus::from_unsigned(7, 10).unwrap();
    let q = one.div_fractional(&seven, 20).unwrap();
    assert!((q.to_float() - 1.0 / 7.0).abs() < 1e-15);
}

#[test]
fn scenario_gcd_48_18() {
    let a = Abacus::from_unsigned(48, 10).unwrap();
    let b = Abacus::from_unsigned(18, 10).unwrap();
    assert_eq!(a.gcd(&b).unwrap().to_unsigned().unwrap(), 6);
}

#[test]
fn scenario_sqrt_10000() {
    let n = Abacus::from_unsigned(10000, 10).unwrap();
    assert_eq!(n.sqrt().unwrap().to_unsigned().unwrap(), 100);
}

#[test]
fn scenario_sin_cos_zero_base60() {
    let zero = Abacus::new(60).unwrap();
    let (sin, cos) = zero.sin_cos(10).unwrap();
    assert!((cos.to_float() - 1.0).abs() < 1e-3);
    assert!(sin.to_float().abs() < 1e-3);
}

#[test]
fn scenario_atan2_diagonal_base60() {
    let one = Abacus::from_unsigned(1, 60).unwrap();
    let angle = one.atan2(&one, 10).unwrap();
    assert!((angle.to_float() - std::f64::consts::FRAC_PI_4).abs() <= 1e-2);
}

#[test]
fn scenario_thousand_digit_mul_paths_agree() {
    let mut rng = StdRng::seed_from_u64(43);
    let digits_a: String = (0..1000)
        .map(|i| {
            if i == 0 {
                rng.gen_range(1u32..10)
            } else {
                rng.gen_range(0u32..10)
            }
        })
        .map(|d| char::from_digit(d, 10).unwrap())
        .collect();
    let digits_b: String = (0..1000)
        .map(|i| {
            if i == 0 {
                rng.gen_range(1u32..10)
            } else {
                rng.gen_range(0u32..10)
            }
        })
        .map(|d| char::from_digit(d, 10).unwrap())
        .collect();

    let a = Abacus::from_string(&digits_a, 10, 0).unwrap();
    let b = Abacus::from_string(&digits_b, 10, 0).unwrap();

    // default config routes 1000-digit operands through the NTT
    let fast = a.mul(&b).unwrap();

    let schoolbook_only = KernelConfig {
        ntt_digit_threshold: usize::MAX,
        ..KernelConfig::default()
    };
    let slow = a.mul_with_config(&b, &schoolbook_only).unwrap();

    assert_eq!(fast, slow);
    for exp in fast.min_exponent()..=fast.max_exponent() {
        assert_eq!(
            fast.store().digit_at(exp),
            slow.store().digit_at(exp),
            "digit at exponent {exp}"
        );
    }
}

#[test]
fn scenario_constants_truncate_per_call() {
    let wide = constants::pi(10, 30).unwrap();
    let narrow = constants::pi(10, 6).unwrap();
    assert!(narrow.fractional_digits() <= 6);
    assert_eq!(narrow, wide.round_to(6));
}
