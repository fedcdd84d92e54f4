//! Interception Point
//!
//! Every incoming event passes through [`Interceptor::handle`]: it is logged
//! as "caught", a [`RemapPolicy`] decides what to do with it, and whatever
//! must be delivered goes to the output queue in order.
//!
//! The policy is where remapping rules live. This module only defines the
//! boundary; [`PassThroughPolicy`] forwards everything unchanged.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::params::{AllocationTracker, Params};
use crate::queue::{EventOutputQueue, QueueError};

/// What to do with one intercepted event
#[derive(Debug)]
pub enum Disposition {
    /// Deliver the event unchanged
    PassThrough,
    /// Drop the event
    Suppress,
    /// Drop the event and deliver these records instead, in order
    Substitute(Vec<Params>),
}

/// Decides the fate of intercepted events
pub trait RemapPolicy: Send {
    /// Inspect `event` and choose a disposition
    ///
    /// Substitute records must be allocated against `tracker`.
    fn decide(&mut self, event: &Params, tracker: &Arc<AllocationTracker>) -> Disposition;
}

/// Policy that forwards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughPolicy;

impl RemapPolicy for PassThroughPolicy {
    fn decide(&mut self, _event: &Params, _tracker: &Arc<AllocationTracker>) -> Disposition {
        Disposition::PassThrough
    }
}

/// Interception statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterceptorStats {
    /// Events seen
    pub caught: u64,
    /// Events forwarded unchanged
    pub passed: u64,
    /// Events dropped
    pub suppressed: u64,
    /// Events replaced
    pub substituted: u64,
    /// Records submitted in place of replaced events
    pub substitutes_submitted: u64,
}

/// Upstream interception point feeding an output queue
pub struct Interceptor<P: RemapPolicy> {
    policy: P,
    tracker: Arc<AllocationTracker>,
    queue: EventOutputQueue,
    stats: InterceptorStats,
}

impl<P: RemapPolicy> Interceptor<P> {
    /// Create an interceptor
    pub fn new(policy: P, tracker: Arc<AllocationTracker>, queue: EventOutputQueue) -> Self {
        Self {
            policy,
            tracker,
            queue,
            stats: InterceptorStats::default(),
        }
    }

    /// Process one intercepted event
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] when the queue no longer accepts records.
    /// Records not yet submitted are dropped.
    pub fn handle(&mut self, event: Params) -> Result<(), QueueError> {
        if event.log(true).is_err() {
            warn!("Ignoring empty {:?} record", event.kind());
            return Ok(());
        }
        self.stats.caught += 1;

        match self.policy.decide(&event, &self.tracker) {
            Disposition::PassThrough => {
                self.stats.passed += 1;
                self.queue.submit(event)
            }
            Disposition::Suppress => {
                debug!("Suppressed {:?}", event.kind());
                self.stats.suppressed += 1;
                Ok(())
            }
            Disposition::Substitute(records) => {
                debug!(
                    "Substituting {:?} with {} records",
                    event.kind(),
                    records.len()
                );
                drop(event);
                self.stats.substituted += 1;
                for record in records {
                    self.queue.submit(record)?;
                    self.stats.substitutes_submitted += 1;
                }
                Ok(())
            }
        }
    }

    /// Tracker used for substitute records
    pub fn tracker(&self) -> &Arc<AllocationTracker> {
        &self.tracker
    }

    /// Output queue
    pub fn queue(&self) -> &EventOutputQueue {
        &self.queue
    }

    /// Interception statistics
    pub fn stats(&self) -> InterceptorStats {
        self.stats
    }

    /// Give back the output queue, for shutdown
    pub fn into_queue(self) -> EventOutputQueue {
        self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        EventType, Flags, KeyCode, KeyboardEventParams, KeyboardType, WaitParams,
    };
    use crate::queue::{QueueConfig, SinkError};
    use parking_lot::Mutex;

    fn key(tracker: &Arc<AllocationTracker>, event_type: EventType, key: KeyCode) -> Params {
        KeyboardEventParams::alloc_without_chars(
            tracker,
            event_type,
            Flags::NONE,
            key,
            KeyboardType::new(40),
            false,
        )
        .into()
    }

    /// Swaps A for a tap of S, drops Escape
    struct SwapPolicy;

    impl RemapPolicy for SwapPolicy {
        fn decide(&mut self, event: &Params, tracker: &Arc<AllocationTracker>) -> Disposition {
            match event.as_keyboard() {
                Some(k) if k.key() == KeyCode::ESCAPE => Disposition::Suppress,
                Some(k) if k.key() == KeyCode::A && k.ex_iskeydown() => {
                    Disposition::Substitute(vec![
                        key(tracker, EventType::Down, KeyCode::S),
                        WaitParams::alloc(tracker, 1).into(),
                        key(tracker, EventType::Up, KeyCode::S),
                    ])
                }
                Some(k) if k.key() == KeyCode::A => Disposition::Suppress,
                _ => Disposition::PassThrough,
            }
        }
    }

    fn recording_queue() -> (Arc<Mutex<Vec<(EventType, KeyCode)>>>, EventOutputQueue) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink = move |params: &Params| -> Result<(), SinkError> {
            if let Some(k) = params.as_keyboard() {
                sink_seen.lock().push((k.event_type(), k.key()));
            }
            Ok(())
        };
        let queue = EventOutputQueue::new(sink, QueueConfig::default()).unwrap();
        (seen, queue)
    }

    #[tokio::test]
    async fn test_pass_through() {
        let tracker = AllocationTracker::new();
        let (seen, queue) = recording_queue();
        let mut interceptor = Interceptor::new(PassThroughPolicy, Arc::clone(&tracker), queue);

        interceptor
            .handle(key(&tracker, EventType::Down, KeyCode::J))
            .unwrap();
        interceptor.queue().flush().await.unwrap();

        assert_eq!(*seen.lock(), vec![(EventType::Down, KeyCode::J)]);
        assert_eq!(interceptor.stats().passed, 1);
        assert!(tracker.is_balanced());
    }

    #[tokio::test]
    async fn test_substitute_and_suppress() {
        let tracker = AllocationTracker::new();
        let (seen, queue) = recording_queue();
        let mut interceptor = Interceptor::new(SwapPolicy, Arc::clone(&tracker), queue);

        interceptor
            .handle(key(&tracker, EventType::Down, KeyCode::A))
            .unwrap();
        interceptor
            .handle(key(&tracker, EventType::Up, KeyCode::A))
            .unwrap();
        interceptor
            .handle(key(&tracker, EventType::Down, KeyCode::ESCAPE))
            .unwrap();
        interceptor
            .handle(key(&tracker, EventType::Down, KeyCode::K))
            .unwrap();

        let stats = interceptor.stats();
        let queue_stats = interceptor.into_queue().shutdown().await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                (EventType::Down, KeyCode::S),
                (EventType::Up, KeyCode::S),
                (EventType::Down, KeyCode::K),
            ]
        );
        assert_eq!(stats.caught, 4);
        assert_eq!(stats.suppressed, 2);
        assert_eq!(stats.substituted, 1);
        assert_eq!(stats.substitutes_submitted, 3);
        assert_eq!(queue_stats.waits, 1);
        assert!(tracker.is_balanced());
    }

    #[tokio::test]
    async fn test_empty_event_is_ignored() {
        let tracker = AllocationTracker::new();
        let (_, queue) = recording_queue();
        let mut interceptor = Interceptor::new(PassThroughPolicy, Arc::clone(&tracker), queue);

        let mut handle = WaitParams::alloc(&tracker, 3);
        let _moved = handle.take();
        interceptor.handle(Params::Wait(handle)).unwrap();

        assert_eq!(interceptor.stats().caught, 0);
        assert_eq!(interceptor.queue().stats().submitted, 0);
    }
}
