//! Crystalline Abacus: an arbitrary-base arithmetic kernel
//!
//! Numbers are strings of beads: one digit per positional weight
//! `base^exponent`, any base from 2 to 256, signed, with fractional
//! positions through negative exponents. Storage flips automatically
//! between a dense digit vector and a sparse exponent-tagged list as the
//! zero-density of a value changes.
//!
//! ## Capabilities
//!
//! 1. **Exact integer arithmetic**: add, sub, mul, div with remainder
//! 2. **Fractional division** to any requested digit precision
//! 3. **Roots**: integer sqrt and nth root, fractional sqrt (Newton-Raphson)
//! 4. **Trigonometry**: sin, cos, atan2 by radix-adapted CORDIC
//! 5. **Transcendentals**: exp, ln, pow over a lazy constants table
//! 6. **NTT multiplication** for operands past the digit threshold
//!
//! ## Usage
//!
//! ```
//! use crystalline_abacus::Abacus;
//!
//! let a = Abacus::from_unsigned(48, 10).unwrap();
//! let b = Abacus::from_unsigned(18, 10).unwrap();
//! assert_eq!(a.gcd(&b).unwrap().to_unsigned().unwrap(), 6);
//!
//! let third = a.div_fractional(&b, 12).unwrap();
//! assert!((third.to_float() - 48.0 / 18.0).abs() < 1e-10);
//! ```
//!
//! Every fallible operation returns a [`Result`]; operands are borrowed,
//! results are owned, and `Drop` is the only cleanup.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bead;
pub mod config;
pub mod error;
pub mod number;

// arithmetic families
pub mod arith;
pub mod number_theory;
pub mod roots;
pub mod transcendental;

// shared tables and acceleration
pub mod constants;
pub mod ntt;

// cross-cutting invariants and the literal kernel scenarios
#[cfg(test)]
mod kernel_tests;

// Re-exports for convenience
pub use bead::{Bead, BeadStore};
pub use config::KernelConfig;
pub use constants::{constant, Constant, MAX_CONSTANT_PRECISION};
pub use error::{AbacusError, NttError, Result};
pub use ntt::{NttContext, NttState, NttSummary};
pub use number::{Abacus, MAX_BASE, MIN_BASE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
