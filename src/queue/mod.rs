//! Event Output Queue
//!
//! Takes ownership of records in submission order and replays them downstream
//! on a dedicated task.
//!
//! # Architecture
//!
//! ```text
//! Caller (interception path)            Replay task (tokio)
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━            ━━━━━━━━━━━━━━━━━━━
//!
//! submit(Params) ──unbounded mpsc──>  run_replay_loop()
//!   (never blocks)                       │
//!                                        ├─ Wait      → sleep(ms)
//!                                        ├─ others    → log "sending"
//!                                        │              └─> EventSink::deliver
//!                                        └─ Flush     → ack
//! ```
//!
//! # Guarantees
//!
//! - Records reach the sink strictly in submission order. Nothing is
//!   reordered, coalesced or batched.
//! - A wait record pauses only the replay task. `submit` keeps accepting
//!   records while a wait is in progress.
//! - Non-wait records are replayed back to back with no added delay.
//! - Every record is dropped after its replay, which deregisters it. Records
//!   still queued when the queue is aborted are dropped as well, so none leak.

pub mod error;
pub mod sink;

pub use error::{QueueError, Result, SinkError};
pub use sink::{EventSink, LogSink};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::params::Params;

/// Output queue configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Wait records longer than this are clamped to it (None = no limit)
    #[serde(default)]
    pub max_wait_ms: Option<u32>,
}

/// Output queue statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Records accepted by `submit`
    pub submitted: u64,

    /// Non-wait records handed to the sink
    pub replayed: u64,

    /// Wait records honored
    pub waits: u64,

    /// Total time spent waiting (milliseconds)
    pub waited_ms: u64,

    /// Deliveries the sink reported as failed
    pub delivery_errors: u64,

    /// Records skipped because their handle was empty
    pub empty_records: u64,
}

enum QueueCommand {
    Replay(Params),
    Flush(oneshot::Sender<()>),
}

/// Ordered replay queue
pub struct EventOutputQueue {
    command_tx: Option<mpsc::UnboundedSender<QueueCommand>>,
    task: Option<JoinHandle<()>>,
    stats: Arc<RwLock<QueueStats>>,
}

impl EventOutputQueue {
    /// Create a queue and start its replay task on the current runtime
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NoRuntime`] when called outside a tokio runtime.
    pub fn new(sink: impl EventSink, config: QueueConfig) -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let stats = Arc::new(RwLock::new(QueueStats::default()));

        let task = handle.spawn(run_replay_loop(
            sink,
            command_rx,
            Arc::clone(&stats),
            config,
        ));

        debug!("Output queue started");

        Ok(Self {
            command_tx: Some(command_tx),
            task: Some(task),
            stats,
        })
    }

    /// Hand a record to the queue
    ///
    /// Never blocks. The queue becomes the record's sole owner.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] after shutdown; the record is dropped.
    pub fn submit(&self, params: impl Into<Params>) -> Result<()> {
        let params = params.into();
        let tx = self.command_tx.as_ref().ok_or(QueueError::Closed)?;

        trace!("Submitting {:?}", params.kind());

        // Counted before sending so `replayed` never runs ahead of `submitted`
        self.stats.write().submitted += 1;
        if tx.send(QueueCommand::Replay(params)).is_err() {
            self.stats.write().submitted -= 1;
            return Err(QueueError::Closed);
        }
        Ok(())
    }

    /// Wait until every record submitted so far has been replayed
    pub async fn flush(&self) -> Result<()> {
        let tx = self.command_tx.as_ref().ok_or(QueueError::Closed)?;
        let (done_tx, done_rx) = oneshot::channel();

        tx.send(QueueCommand::Flush(done_tx))
            .map_err(|_| QueueError::Closed)?;

        done_rx
            .await
            .map_err(|_| QueueError::ReplayTaskFailed("replay task exited before flush".to_string()))
    }

    /// Current statistics
    pub fn stats(&self) -> QueueStats {
        *self.stats.read()
    }

    /// Stop accepting records, replay what is queued, and join the task
    pub async fn shutdown(mut self) -> Result<QueueStats> {
        info!("Shutting down output queue");

        drop(self.command_tx.take());

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| QueueError::ReplayTaskFailed(e.to_string()))?;
        }

        let stats = self.stats();
        info!(
            "Output queue shut down: {} replayed, {} waits",
            stats.replayed, stats.waits
        );
        Ok(stats)
    }

    /// Cancel pending replay, including a wait in progress
    ///
    /// Queued records are dropped without being replayed.
    pub async fn abort(mut self) -> QueueStats {
        warn!("Aborting output queue");

        drop(self.command_tx.take());

        if let Some(task) = self.task.take() {
            task.abort();
            // Awaiting guarantees the task and its receiver have been dropped
            let _ = task.await;
        }

        self.stats()
    }
}

impl Drop for EventOutputQueue {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Dropping EventOutputQueue with live replay task");
            task.abort();
        }
    }
}

/// Replay loop owned by the queue's task
async fn run_replay_loop<S: EventSink>(
    mut sink: S,
    mut command_rx: mpsc::UnboundedReceiver<QueueCommand>,
    stats: Arc<RwLock<QueueStats>>,
    config: QueueConfig,
) {
    while let Some(command) = command_rx.recv().await {
        match command {
            QueueCommand::Replay(params) => replay(&mut sink, params, &stats, &config).await,
            QueueCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Replay loop finished");
}

async fn replay<S: EventSink>(
    sink: &mut S,
    params: Params,
    stats: &RwLock<QueueStats>,
    config: &QueueConfig,
) {
    if let Params::Wait(wait) = &params {
        let Some(wait) = wait.get() else {
            warn!("Skipping empty wait record");
            stats.write().empty_records += 1;
            return;
        };

        wait.log_self(false);

        let mut ms = wait.milliseconds();
        if let Some(limit) = config.max_wait_ms {
            if ms > limit {
                warn!("Wait of {}ms exceeds limit, clamping to {}ms", ms, limit);
                ms = limit;
            }
        }

        tokio::time::sleep(Duration::from_millis(u64::from(ms))).await;

        let mut stats = stats.write();
        stats.waits += 1;
        stats.waited_ms += u64::from(ms);
        return;
    }

    if params.log(false).is_err() {
        warn!("Skipping empty {:?} record", params.kind());
        stats.write().empty_records += 1;
        return;
    }

    match sink.deliver(&params) {
        Ok(()) => stats.write().replayed += 1,
        Err(e) => {
            warn!("Delivery of {:?} failed: {}", params.kind(), e);
            let mut stats = stats.write();
            stats.replayed += 1;
            stats.delivery_errors += 1;
        }
    }
}
