use keyshift::params::{
    AllocationTracker, EventType, Flags, KeyCode, KeyboardEventParams, KeyboardType, Params,
    ParamsKind, WaitParams,
};
use keyshift::queue::{EventOutputQueue, EventSink, QueueConfig, SinkError};
use keyshift::{Interceptor, PassThroughPolicy, Script};
use mockall::{mock, Sequence};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

mock! {
    Sink {}

    impl EventSink for Sink {
        fn deliver(&mut self, params: &Params) -> Result<(), SinkError>;
    }
}

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

/// Sink recording (event type, key, arrival time) of each keyboard record
fn timed_sink() -> (
    Arc<Mutex<Vec<(EventType, KeyCode, Instant)>>>,
    impl EventSink,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let sink = move |params: &Params| -> Result<(), SinkError> {
        if let Some(k) = params.as_keyboard() {
            sink_seen
                .lock()
                .push((k.event_type(), k.key(), Instant::now()));
        }
        Ok(())
    };
    (seen, sink)
}

#[tokio::test]
async fn test_wait_separates_key_down_and_up() {
    let tracker = AllocationTracker::new();
    let (seen, sink) = timed_sink();
    let queue = EventOutputQueue::new(sink, QueueConfig::default()).unwrap();

    queue
        .submit(key(&tracker, EventType::Down, KeyCode::A))
        .unwrap();
    queue.submit(WaitParams::alloc(&tracker, 50)).unwrap();
    queue.submit(key(&tracker, EventType::Up, KeyCode::A)).unwrap();

    let stats = queue.shutdown().await.unwrap();
    let seen = seen.lock();

    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].0, seen[0].1), (EventType::Down, KeyCode::A));
    assert_eq!((seen[1].0, seen[1].1), (EventType::Up, KeyCode::A));
    assert!(seen[1].2.duration_since(seen[0].2) >= Duration::from_millis(50));

    assert_eq!(stats.replayed, 2);
    assert_eq!(stats.waits, 1);
    assert_eq!(stats.waited_ms, 50);
    assert!(tracker.is_balanced());
}

#[tokio::test(start_paused = true)]
async fn test_submit_does_not_block_during_wait() {
    let tracker = AllocationTracker::new();
    let (seen, sink) = timed_sink();
    let queue = EventOutputQueue::new(sink, QueueConfig::default()).unwrap();

    queue.submit(WaitParams::alloc(&tracker, 1_000)).unwrap();
    tokio::task::yield_now().await;

    // The replay task is asleep; submission still returns immediately
    let start = tokio::time::Instant::now();
    for k in [KeyCode::H, KeyCode::J, KeyCode::K, KeyCode::L] {
        queue.submit(key(&tracker, EventType::Down, k)).unwrap();
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(seen.lock().is_empty());

    queue.flush().await.unwrap();
    let keys: Vec<_> = seen.lock().iter().map(|(_, k, _)| *k).collect();
    assert_eq!(keys, vec![KeyCode::H, KeyCode::J, KeyCode::K, KeyCode::L]);
    assert!(tracker.is_balanced());
}

#[tokio::test(start_paused = true)]
async fn test_abort_during_wait_releases_everything() {
    let tracker = AllocationTracker::new();
    let (seen, sink) = timed_sink();
    let queue = EventOutputQueue::new(sink, QueueConfig::default()).unwrap();

    queue
        .submit(key(&tracker, EventType::Down, KeyCode::A))
        .unwrap();
    queue.submit(WaitParams::alloc(&tracker, 5_000)).unwrap();
    queue.submit(key(&tracker, EventType::Up, KeyCode::A)).unwrap();
    assert_eq!(tracker.count(), 3);

    tokio::time::sleep(Duration::from_millis(10)).await;
    let stats = queue.abort().await;

    assert_eq!(seen.lock().len(), 1);
    assert_eq!(stats.submitted, 3);
    assert_eq!(stats.waits, 0);
    assert!(tracker.is_balanced());
}

#[tokio::test]
async fn test_mock_sink_sees_records_in_order() {
    let tracker = AllocationTracker::new();
    let mut sink = MockSink::new();
    let mut seq = Sequence::new();

    sink.expect_deliver()
        .withf(|p| p.as_keyboard().map(|k| k.ex_iskeydown()) == Some(true))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    sink.expect_deliver()
        .withf(|p| p.kind() == ParamsKind::FlagsUpdate)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(SinkError::Rejected("busy".to_string())));
    sink.expect_deliver()
        .withf(|p| p.as_keyboard().map(|k| k.ex_iskeydown()) == Some(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let queue = EventOutputQueue::new(sink, QueueConfig::default()).unwrap();
    queue
        .submit(key(&tracker, EventType::Down, KeyCode::SPACE))
        .unwrap();
    queue.submit(WaitParams::alloc(&tracker, 1)).unwrap();
    queue
        .submit(keyshift::params::FlagsUpdateParams::alloc(&tracker, Flags::NONE))
        .unwrap();
    queue
        .submit(key(&tracker, EventType::Up, KeyCode::SPACE))
        .unwrap();

    let stats = queue.shutdown().await.unwrap();
    assert_eq!(stats.replayed, 3);
    assert_eq!(stats.delivery_errors, 1);
    assert!(tracker.is_balanced());
}

#[tokio::test(start_paused = true)]
async fn test_demo_script_through_interceptor() {
    let tracker = AllocationTracker::new();
    let (seen, sink) = timed_sink();
    let queue = EventOutputQueue::new(sink, QueueConfig::default()).unwrap();
    let mut interceptor = Interceptor::new(PassThroughPolicy, Arc::clone(&tracker), queue);

    let script = Script::demo();
    for record in script.build(&tracker) {
        interceptor.handle(record).unwrap();
    }

    let caught = interceptor.stats();
    let stats = interceptor.into_queue().shutdown().await.unwrap();

    assert_eq!(caught.caught, stats.submitted);
    assert_eq!(stats.waits, 1);
    assert_eq!(stats.replayed + stats.waits, stats.submitted);
    assert_eq!(seen.lock().len(), 2);
    assert!(tracker.check_balanced().is_ok());
}
