//! Session error types
//!
//! A malformed session fails fast at construction; nothing inside the tick
//! returns errors or retries.

use thiserror::Error;

/// Errors raised when starting a session or touching persistence
#[derive(Debug, Error)]
pub enum SessionError {
    /// Static geometry would produce degenerate math (zero radius, empty grid, ...)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A physics config value is non-finite or out of range
    #[error("invalid config value for {field}: {value}")]
    InvalidConfig { field: &'static str, value: f32 },

    /// Underlying store I/O failed
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Stored data could not be parsed
    #[error("corrupt store data: {0}")]
    CorruptStore(#[from] serde_json::Error),
}
