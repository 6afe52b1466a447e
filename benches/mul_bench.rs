use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crystalline_abacus::{Abacus, KernelConfig};

fn random_decimal(digits: usize, seed: u64) -> Abacus {
    // xorshift keeps the bench free of extra dependencies
    let mut state = seed | 1;
    let text: String = (0..digits)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let d = if i == 0 { state % 9 + 1 } else { state % 10 };
            char::from_digit(d as u32, 10).unwrap()
        })
        .collect();
    Abacus::from_string(&text, 10, 0).unwrap()
}

fn bench_mul_crossover(c: &mut Criterion) {
    let schoolbook_only = KernelConfig {
        ntt_digit_threshold: usize::MAX,
        ..KernelConfig::default()
    };
    let ntt_always = KernelConfig {
        ntt_digit_threshold: 2,
        ..KernelConfig::default()
    };

    let mut group = c.benchmark_group("mul");
    for digits in [64usize, 256, 1024, 4096] {
        let a = random_decimal(digits, 0x9E3779B97F4A7C15);
        let b = random_decimal(digits, 0xD1B54A32D192ED03);

        group.bench_function(format!("schoolbook/{digits}"), |bench| {
            bench.iter(|| {
                black_box(a.mul_with_config(black_box(&b), &schoolbook_only).unwrap())
            })
        });
        group.bench_function(format!("ntt/{digits}"), |bench| {
            bench.iter(|| black_box(a.mul_with_config(black_box(&b), &ntt_always).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mul_crossover);
criterion_main!(benches);
