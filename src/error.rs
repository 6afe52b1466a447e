//! Error types for the abacus kernel
//!
//! Every fallible operation returns [`Result`]. Errors are never recovered
//! internally: an operation either produces a canonical result or returns an
//! error and leaves its operands untouched.

use thiserror::Error;

/// Kernel error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbacusError {
    /// Mathematically undefined operation for the supplied operands
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// Operands must share a base and do not
    #[error("base mismatch: {left} vs {right}")]
    ArgMismatch {
        /// Base of the left operand
        left: u32,
        /// Base of the right operand
        right: u32,
    },

    /// Divisor magnitude is zero
    #[error("division by zero")]
    DivideByZero,

    /// Conversion-out target cannot represent the value
    #[error("value does not fit the conversion target")]
    Overflow,

    /// Base outside [2, 256]
    #[error("invalid base {0}, must be in [2, 256]")]
    InvalidBase(u32),

    /// Textual input does not parse in the stated base
    #[error("parse error: {0}")]
    Parse(String),

    /// Allocation failed
    #[error("out of memory")]
    OutOfMemory,

    /// An iterative algorithm failed to converge within its cap
    #[error("iteration cap reached before requested precision")]
    PrecisionUnderflow,

    /// Operation is only defined on integers and an operand has
    /// fractional digits
    #[error("operand is not an integer")]
    NotInteger,

    /// Invalid configuration parameter
    #[error("config error: {0}")]
    Config(String),

    /// Number-theoretic transform failure
    #[error("ntt error: {0}")]
    Ntt(#[from] NttError),
}

/// Failure subcodes for the NTT helper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NttError {
    /// No working prime of the form c * 2^k + 1 was found within the
    /// search budget
    #[error("prime search exhausted")]
    PrimeSearchExhausted,

    /// No primitive 2^k-th root of unity was found modulo the chosen prime
    #[error("no primitive root of unity")]
    NoPrimitiveRoot,

    /// Transform length is not a supported power of two
    #[error("transform size {0} not supported")]
    SizeNotSupported(usize),

    /// A transform was requested before the context reached the Ready state
    #[error("context is not ready")]
    NotReady,
}

/// Kernel result alias
pub type Result<T> = std::result::Result<T, AbacusError>;
