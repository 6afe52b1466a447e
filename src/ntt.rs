//! Number-theoretic transform
//!
//! Fast multiplication support for large digit vectors: an iterative
//! Cooley-Tukey transform over Z/pZ for a prime `p = c * 2^k + 1`, with
//! `2^k` covering twice the combined digit length and
//! `p > (base-1)^2 * 2^k` so no convolution coefficient can wrap.
//!
//! Field elements are machine words: every admissible prime fits u64 and
//! products go through u128, so transform butterflies never allocate.
//!
//! ## Context protocol
//!
//! ```text
//! Uninitialized -> PrimeChosen -> RootsPrecomputed -> Ready
//! ```
//!
//! Each step can fail with its own subcode and leaves the context in the
//! previous state: `choose_prime` (PrimeSearchExhausted), `precompute_roots`
//! (NoPrimitiveRoot), `finalize` (NoPrimitiveRoot on a failed order check).
//! [`NttContext::ready`] runs the full protocol in one call.

use serde::Serialize;

use crate::error::{NttError, Result};

/// NTT-friendly primes from well-known toolchains, used as a fallback when
/// the ascending search exhausts its cofactor budget.
const KNOWN_PRIMES: &[u64] = &[
    257,           // 2^8 + 1
    65_537,        // 2^16 + 1
    167_772_161,   // 5 * 2^25 + 1
    469_762_049,   // 7 * 2^26 + 1
    998_244_353,   // 119 * 2^23 + 1
    2_013_265_921, // 15 * 2^27 + 1
    2_281_701_377, // 17 * 2^27 + 1
    3_221_225_473, // 3 * 2^30 + 1
];

/// Cofactor search budget for `p = c * 2^k + 1`.
const COFACTOR_LIMIT: u64 = 1 << 17;

/// Context lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NttState {
    /// Size validated, no prime chosen yet
    Uninitialized,
    /// Working prime fixed
    PrimeChosen,
    /// Primitive root and power tables computed
    RootsPrecomputed,
    /// Order checks passed, transforms available
    Ready,
}

/// Transform context: prime, primitive root, and precomputed root powers.
#[derive(Debug, Clone)]
pub struct NttContext {
    size: usize,
    log2_size: u32,
    max_digit: u64,
    prime: u64,
    cofactor: u64,
    root: u64,
    roots_forward: Vec<u64>,
    roots_inverse: Vec<u64>,
    size_inv: u64,
    state: NttState,
}

/// Serializable diagnostic snapshot of a context.
#[derive(Debug, Clone, Serialize)]
pub struct NttSummary {
    /// Transform length
    pub size: usize,
    /// Chosen prime, zero before `PrimeChosen`
    pub prime: u64,
    /// Primitive root, zero before `RootsPrecomputed`
    pub root: u64,
    /// Lifecycle state
    pub state: NttState,
}

#[inline]
fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    (a as u128 * b as u128 % p as u128) as u64
}

#[inline]
fn add_mod(a: u64, b: u64, p: u64) -> u64 {
    let s = a + b;
    if s >= p {
        s - p
    } else {
        s
    }
}

#[inline]
fn sub_mod(a: u64, b: u64, p: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        p - b + a
    }
}

fn pow_mod(mut base: u64, mut exp: u64, p: u64) -> u64 {
    let mut result = 1u64;
    base %= p;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, p);
        }
        base = mul_mod(base, base, p);
        exp >>= 1;
    }
    result
}

/// Deterministic Miller-Rabin for u64.
fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &[2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }
    'witness: for &a in &[2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Distinct prime factors of `n` by trial division, Miller-Rabin for the
/// leftover. `None` when the leftover resists both.
fn prime_factors(mut n: u64) -> Option<Vec<u64>> {
    let mut factors = Vec::new();
    let mut push = |f: u64, factors: &mut Vec<u64>| {
        if factors.last() != Some(&f) {
            factors.push(f);
        }
    };
    let mut f = 2u64;
    while f * f <= n && f < 1 << 20 {
        while n % f == 0 {
            push(f, &mut factors);
            n /= f;
        }
        f += if f == 2 { 1 } else { 2 };
    }
    if n > 1 {
        if !is_prime(n) {
            return None;
        }
        push(n, &mut factors);
    }
    Some(factors)
}

impl NttContext {
    /// Validate the transform size; the context starts `Uninitialized`.
    ///
    /// `max_digit` bounds the input coefficients (`base - 1` for digit
    /// vectors) and drives the anti-overflow prime bound.
    pub fn with_size(size: usize, max_digit: u64) -> std::result::Result<Self, NttError> {
        if size < 2 || !size.is_power_of_two() {
            return Err(NttError::SizeNotSupported(size));
        }
        Ok(NttContext {
            size,
            log2_size: size.trailing_zeros(),
            max_digit,
            prime: 0,
            cofactor: 0,
            root: 0,
            roots_forward: Vec::new(),
            roots_inverse: Vec::new(),
            size_inv: 0,
            state: NttState::Uninitialized,
        })
    }

    /// One-shot construction through the whole protocol, assuming the
    /// worst-case digit bound of base 256.
    pub fn new(size: usize, prime_hint: Option<u64>) -> std::result::Result<Self, NttError> {
        Self::ready(size, 255, prime_hint)
    }

    /// One-shot construction for digit vectors of a specific base.
    pub fn ready(
        size: usize,
        max_digit: u64,
        prime_hint: Option<u64>,
    ) -> std::result::Result<Self, NttError> {
        let mut ctx = Self::with_size(size, max_digit)?;
        ctx.choose_prime(prime_hint)?;
        ctx.precompute_roots()?;
        ctx.finalize()?;
        Ok(ctx)
    }

    /// Lifecycle state.
    pub fn state(&self) -> NttState {
        self.state
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Chosen prime, zero before `PrimeChosen`.
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Diagnostic snapshot.
    pub fn summary(&self) -> NttSummary {
        NttSummary {
            size: self.size,
            prime: self.prime,
            root: self.root,
            state: self.state,
        }
    }

    /// Coefficients must stay under `p / size` after pointwise products;
    /// the overflow-safe bound for digit convolution.
    fn prime_bound(&self) -> u64 {
        self.max_digit * self.max_digit * self.size as u64
    }

    /// Pick the smallest usable prime `p = c * 2^k + 1` above the overflow
    /// bound. A valid `prime_hint` short-circuits the search.
    ///
    /// `Uninitialized -> PrimeChosen`; failure leaves the state untouched.
    pub fn choose_prime(
        &mut self,
        prime_hint: Option<u64>,
    ) -> std::result::Result<(), NttError> {
        if self.state != NttState::Uninitialized {
            return Ok(());
        }
        let k = self.log2_size;
        let block = 1u64 << k;
        let bound = self.prime_bound();

        // p < 2^63 keeps add_mod free of u64 overflow
        let accepts =
            |p: u64| p > bound && p < 1 << 63 && (p - 1) % block == 0 && is_prime(p);

        if let Some(hint) = prime_hint {
            if accepts(hint) {
                self.prime = hint;
                self.cofactor = (hint - 1) >> k;
                self.state = NttState::PrimeChosen;
                return Ok(());
            }
        }

        let first_c = bound / block + 1;
        for c in first_c..first_c + COFACTOR_LIMIT {
            let p = match c.checked_mul(block).and_then(|v| v.checked_add(1)) {
                Some(p) if p < 1 << 63 => p,
                _ => break,
            };
            if is_prime(p) {
                self.prime = p;
                self.cofactor = c;
                self.state = NttState::PrimeChosen;
                return Ok(());
            }
        }

        for &p in KNOWN_PRIMES {
            if accepts(p) {
                self.prime = p;
                self.cofactor = (p - 1) >> k;
                self.state = NttState::PrimeChosen;
                return Ok(());
            }
        }

        Err(NttError::PrimeSearchExhausted)
    }

    /// Find a primitive `2^k`-th root of unity and fill both power tables.
    ///
    /// `PrimeChosen -> RootsPrecomputed`; failure leaves the state untouched.
    pub fn precompute_roots(&mut self) -> std::result::Result<(), NttError> {
        if self.state != NttState::PrimeChosen {
            return if self.state == NttState::Uninitialized {
                Err(NttError::NotReady)
            } else {
                Ok(())
            };
        }
        let p = self.prime;
        let factors = prime_factors(p - 1).ok_or(NttError::NoPrimitiveRoot)?;

        // group generator: g^((p-1)/q) != 1 for every prime q | p-1
        let mut generator = 0u64;
        for g in 2..200u64 {
            if factors
                .iter()
                .all(|&q| pow_mod(g, (p - 1) / q, p) != 1)
            {
                generator = g;
                break;
            }
        }
        if generator == 0 {
            return Err(NttError::NoPrimitiveRoot);
        }

        // omega = g^cofactor has order exactly 2^k
        let omega = pow_mod(generator, self.cofactor, p);
        let omega_inv = pow_mod(omega, p - 2, p);

        let mut forward = Vec::with_capacity(self.size);
        let mut inverse = Vec::with_capacity(self.size);
        let mut wf = 1u64;
        let mut wi = 1u64;
        for _ in 0..self.size {
            forward.push(wf);
            inverse.push(wi);
            wf = mul_mod(wf, omega, p);
            wi = mul_mod(wi, omega_inv, p);
        }

        self.root = omega;
        self.roots_forward = forward;
        self.roots_inverse = inverse;
        self.state = NttState::RootsPrecomputed;
        Ok(())
    }

    /// Verify the root's order and fix the inverse transform scale.
    ///
    /// `RootsPrecomputed -> Ready`; failure leaves the state untouched.
    pub fn finalize(&mut self) -> std::result::Result<(), NttError> {
        match self.state {
            NttState::RootsPrecomputed => {}
            NttState::Ready => return Ok(()),
            _ => return Err(NttError::NotReady),
        }
        let p = self.prime;
        if pow_mod(self.root, self.size as u64, p) != 1
            || pow_mod(self.root, self.size as u64 / 2, p) == 1
        {
            return Err(NttError::NoPrimitiveRoot);
        }
        self.size_inv = pow_mod(self.size as u64, p - 2, p);
        self.state = NttState::Ready;
        Ok(())
    }

    fn bit_reverse(&self, data: &mut [u64]) {
        let n = data.len();
        let bits = self.log2_size;
        for i in 0..n {
            let j = (i.reverse_bits() >> (usize::BITS - bits)) & (n - 1);
            if i < j {
                data.swap(i, j);
            }
        }
    }

    fn butterfly(&self, data: &mut [u64], roots: &[u64]) {
        let n = self.size;
        let p = self.prime;
        self.bit_reverse(data);
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let step = n / len;
            let mut start = 0;
            while start < n {
                for j in 0..half {
                    let w = roots[j * step];
                    let u = data[start + j];
                    let v = mul_mod(data[start + j + half], w, p);
                    data[start + j] = add_mod(u, v, p);
                    data[start + j + half] = sub_mod(u, v, p);
                }
                start += len;
            }
            len *= 2;
        }
    }

    /// In-place forward transform. Requires `Ready` and a full-length slice.
    pub fn forward(&self, data: &mut [u64]) -> std::result::Result<(), NttError> {
        if self.state != NttState::Ready {
            return Err(NttError::NotReady);
        }
        if data.len() != self.size {
            return Err(NttError::SizeNotSupported(data.len()));
        }
        self.butterfly(data, &self.roots_forward);
        Ok(())
    }

    /// In-place inverse transform, scaled by `size^-1 mod p`.
    pub fn inverse(&self, data: &mut [u64]) -> std::result::Result<(), NttError> {
        if self.state != NttState::Ready {
            return Err(NttError::NotReady);
        }
        if data.len() != self.size {
            return Err(NttError::SizeNotSupported(data.len()));
        }
        self.butterfly(data, &self.roots_inverse);
        for v in data.iter_mut() {
            *v = mul_mod(*v, self.size_inv, self.prime);
        }
        Ok(())
    }
}

/// Multiply two digit vectors through the transform, returning fully
/// carried base digits.
pub(crate) fn multiply_digits(a: &[u32], b: &[u32], base: u32) -> Result<Vec<u32>> {
    let combined = a.len() + b.len();
    let size = (2 * combined).next_power_of_two();
    let ctx = NttContext::ready(size, base as u64 - 1, None).map_err(crate::error::AbacusError::Ntt)?;

    let mut fa = vec![0u64; size];
    let mut fb = vec![0u64; size];
    for (i, &d) in a.iter().enumerate() {
        fa[i] = d as u64;
    }
    for (i, &d) in b.iter().enumerate() {
        fb[i] = d as u64;
    }

    ctx.forward(&mut fa).map_err(crate::error::AbacusError::Ntt)?;
    ctx.forward(&mut fb).map_err(crate::error::AbacusError::Ntt)?;
    for i in 0..size {
        fa[i] = mul_mod(fa[i], fb[i], ctx.prime);
    }
    ctx.inverse(&mut fa).map_err(crate::error::AbacusError::Ntt)?;

    // carry propagation, coefficient by coefficient
    let mut out = Vec::with_capacity(combined + 1);
    let mut carry = 0u128;
    for &coeff in fa.iter().take(combined + 1) {
        let sum = coeff as u128 + carry;
        out.push((sum % base as u128) as u32);
        carry = sum / base as u128;
    }
    while carry != 0 {
        out.push((carry % base as u128) as u32);
        carry /= base as u128;
    }
    while out.last() == Some(&0) {
        out.pop();
    }
    Ok(out)
}
