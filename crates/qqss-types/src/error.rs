// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all QQSS-ISLM failures.
#[derive(Error, Debug)]
pub enum QqssError {
    /// Policy path and shock sequence differ in length.
    #[error("length mismatch: {policies} policy vectors vs {shocks} shocks")]
    LengthMismatch { policies: usize, shocks: usize },

    /// A tension vector did not have the required number of channels.
    #[error("bad vector shape: expected {expected} components, got {got}")]
    BadVectorShape { expected: usize, got: usize },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Trajectory sink failed to accept a record.
    #[error("sink error: {0}")]
    Sink(String),
}

pub type QqssResult<T> = Result<T, QqssError>;
