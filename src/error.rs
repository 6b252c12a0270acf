//! Error types for the mining engine
//!
//! One enum covers the whole task lifecycle: encoding faults at the worker
//! boundary, faults propagated out of an isolated worker, workers that died
//! without reporting, cancellation, and caller-composed timeouts. Failures
//! are never retried here; resubmitting a fresh task is the caller's call.

use thiserror::Error;

/// Main error type for the mining engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Block could not be serialized for hashing or for the worker boundary
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Fault propagated from an isolated worker context
    #[error("Worker error: {0}")]
    Worker(String),

    /// Worker context terminated without reporting a result
    #[error("Worker exited abnormally: {0}")]
    AbnormalExit(String),

    /// Mining task observed its cancellation token
    #[error("Mining task cancelled")]
    Cancelled,

    /// Caller-composed deadline task fired
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Every task in a first-success aggregate failed
    #[error("All {} mining tasks failed", .0.len())]
    AllFailed(Vec<Error>),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for the mining engine
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a worker error
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Create an abnormal exit error
    pub fn abnormal_exit(msg: impl Into<String>) -> Self {
        Self::AbnormalExit(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error came from a caller-composed deadline task
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
