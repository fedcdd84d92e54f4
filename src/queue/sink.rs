//! Downstream Delivery
//!
//! The output queue hands every replayed record to an [`EventSink`]. Real
//! sinks post events into the host's input stack; that layer lives outside
//! this crate.

use tracing::info;

use crate::params::Params;
use crate::queue::error::SinkError;

/// Receiver of replayed records
///
/// Called on the replay task, one record at a time, in submission order.
/// Wait records are handled by the queue and never reach the sink.
pub trait EventSink: Send + 'static {
    /// Deliver one record downstream
    fn deliver(&mut self, params: &Params) -> Result<(), SinkError>;
}

impl<F> EventSink for F
where
    F: FnMut(&Params) -> Result<(), SinkError> + Send + 'static,
{
    fn deliver(&mut self, params: &Params) -> Result<(), SinkError> {
        self(params)
    }
}

/// Sink that logs each delivered record at INFO
#[derive(Debug, Default)]
pub struct LogSink {
    delivered: u64,
}

impl LogSink {
    /// Create a new logging sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl EventSink for LogSink {
    fn deliver(&mut self, params: &Params) -> Result<(), SinkError> {
        if params.is_empty() {
            return Err(SinkError::EmptyRecord);
        }
        self.delivered += 1;
        info!("Delivered #{}: {:?}", self.delivered, params.kind());
        Ok(())
    }
}
