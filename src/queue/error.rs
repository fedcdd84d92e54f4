//! Output Queue Error Types

use thiserror::Error;

/// Result type for output queue operations
pub type Result<T> = std::result::Result<T, QueueError>;

/// Output queue error types
#[derive(Error, Debug)]
pub enum QueueError {
    /// The queue no longer accepts records
    #[error("Output queue is closed")]
    Closed,

    /// The queue was created outside a tokio runtime
    #[error("No tokio runtime available for the replay task")]
    NoRuntime,

    /// The replay task panicked or was cancelled
    #[error("Replay task failed: {0}")]
    ReplayTaskFailed(String),
}

/// Errors a sink reports for a single delivery
#[derive(Error, Debug)]
pub enum SinkError {
    /// Downstream refused the event
    #[error("Event rejected: {0}")]
    Rejected(String),

    /// The record handle was empty
    #[error("Record handle is empty")]
    EmptyRecord,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
