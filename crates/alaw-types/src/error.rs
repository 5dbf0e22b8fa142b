// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — A-Law Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all A-Law kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlawError {
    /// Rejected configuration (oscillator count, coupling, dt, thresholds).
    #[error("config error: {0}")]
    Config(String),

    /// An execution path was requested that this build cannot provide.
    #[error("backend '{backend}' unavailable: {reason}")]
    CapabilityUnavailable {
        backend: &'static str,
        reason: &'static str,
    },

    /// Invalid input to a kernel operation (lengths, non-finite phases).
    #[error("validation error: {0}")]
    Validation(String),
}

pub type AlawResult<T> = Result<T, AlawError>;
