//! Error type shared across the core crate.

use thiserror::Error;

/// Catch-all error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A byte outside the ASCII range `'0'..='5'` was found where a vertex digit was expected.
    #[error("byte {0:#04x} is not an ASCII vertex digit in the range '0'..='5'")]
    InvalidVertexByte(u8),
    /// The input stream did not contain enough bytes for the configured lattice dimensions.
    #[error("input too short for a {rows}x{cols} lattice: need {needed} bytes, got {got}")]
    ShortInput {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        cols: usize,
        /// Bytes required (`rows * cols`).
        needed: usize,
        /// Bytes actually available.
        got: usize,
    },
    /// Propagated I/O failure from reading an input stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A data-model invariant (height consistency, ice rule, sticky ordering) was violated.
    ///
    /// This indicates a bug in the flip kernel, never a routine sampling outcome.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
