//! ClassWatch error taxonomy.
//!
//! User-facing rejections (`Validation`, `Duplicate`, `QuotaExceeded`)
//! are reported to the caller, not logged as system errors. `Lookup`
//! is transient and means "no notification this cycle"; `Persist`
//! means a mutation did not durably apply and must never be swallowed
//! as success.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

#[derive(Debug, Error)]
pub enum WatchError {
    /// Malformed user-supplied identifier or term.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The owner already tracks an identical (kind, payload, term).
    #[error("Duplicate request: {0}")]
    Duplicate(String),

    /// The owner is at the per-user request cap.
    #[error("Request limit of {limit} reached")]
    QuotaExceeded { limit: usize },

    /// Durable store could not be read or written.
    #[error("Persistence error: {0}")]
    Persist(String),

    /// Transient provider failure (network, timeout, bad payload).
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Notification delivery failure.
    #[error("Notify error: {0}")]
    Notify(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
