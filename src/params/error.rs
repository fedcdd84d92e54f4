//! Parameter Record Error Types
//!
//! Errors raised by ownership handles and the allocation tracker. Every
//! variant here is a contract violation by the caller, never a transient
//! condition, so nothing in this crate retries on them.

use thiserror::Error;

/// Result type for parameter record operations
pub type Result<T> = std::result::Result<T, ParamsError>;

/// Parameter record error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// A handle was read after its record was transferred away or reset
    #[error("Null access: handle holds no record")]
    EmptyHandle,

    /// The tracker did not return to zero live records
    #[error("Allocation imbalance: {0} live records (expected 0)")]
    AllocationImbalance(i64),
}
