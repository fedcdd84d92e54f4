//! # keyshift
//!
//! Input event parameter records and ordered replay for a keyboard and
//! pointer remapping pipeline.
//!
//! # Architecture
//!
//! ```text
//! keyshift
//!   ├─> Params (immutable event records, Sole ownership, AllocationTracker)
//!   ├─> Interceptor (caught events, RemapPolicy decides)
//!   ├─> EventOutputQueue (ordered replay, wait records pause delivery)
//!   └─> EventSink (downstream delivery)
//! ```
//!
//! # Data Flow
//!
//! **Event Path:** Hardware → Interceptor → RemapPolicy → EventOutputQueue → EventSink
//!
//! Records are heap-allocated once, moved through the pipeline by their
//! [`Sole`](params::Sole) handle, and dropped after replay. The
//! [`AllocationTracker`](params::AllocationTracker) confirms every record
//! created was also released.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Interception point and remap policy boundary
pub mod capture;

/// Configuration
pub mod config;

/// Event parameter records
pub mod params;

/// Ordered output queue
pub mod queue;

/// Replay scripts
pub mod script;

pub use capture::{Disposition, Interceptor, PassThroughPolicy, RemapPolicy};
pub use config::Config;
pub use params::{AllocationTracker, Params, ParamsKind, Sole};
pub use queue::{EventOutputQueue, EventSink, LogSink, QueueConfig, QueueStats};
pub use script::{Script, ScriptEvent};
