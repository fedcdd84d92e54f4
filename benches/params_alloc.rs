//! Record Allocation Benchmarks
//!
//! Measures factory cost, handle transfer and duplication for the event
//! records on the interception path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keyshift::params::{
    AllocationTracker, Buttons, EventType, Flags, KeyCode, KeyboardEventParams, KeyboardType,
    Params, RelativePointerEventParams, Sole, WaitParams,
};

/// Benchmark keyboard factory plus drop
fn bench_keyboard_alloc(c: &mut Criterion) {
    let tracker = AllocationTracker::new();

    c.bench_function("keyboard_alloc_drop", |b| {
        b.iter(|| {
            let record = KeyboardEventParams::alloc_without_chars(
                &tracker,
                black_box(EventType::Down),
                Flags::NONE,
                black_box(KeyCode::A),
                KeyboardType::new(40),
                false,
            );
            black_box(record.ex_iskeydown())
        })
    });
}

/// Benchmark moving a record between handles and into the sum type
fn bench_transfer(c: &mut Criterion) {
    let tracker = AllocationTracker::new();

    c.bench_function("sole_transfer", |b| {
        b.iter(|| {
            let mut source = WaitParams::alloc(&tracker, black_box(10));
            let mut target: Sole<WaitParams> = Sole::empty();
            target.assign_from(&mut source);
            let params: Params = target.into();
            black_box(params.kind())
        })
    });
}

/// Benchmark duplication of records already live
fn bench_duplicate(c: &mut Criterion) {
    let tracker = AllocationTracker::new();
    let record = KeyboardEventParams::alloc_without_chars(
        &tracker,
        EventType::Up,
        Flags::NONE,
        KeyCode::SPACE,
        KeyboardType::new(40),
        false,
    );

    c.bench_function("keyboard_duplicate", |b| {
        b.iter(|| black_box(record.duplicate()))
    });
}

/// Benchmark splitting hardware pointer events by transition count
fn bench_pointer_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_alloc_split");
    let tracker = AllocationTracker::new();

    for pressed in [0u32, 1, 3, 8] {
        let buttons = Buttons::new((1u32 << pressed) - 1);
        group.throughput(Throughput::Elements(u64::from(pressed.max(1))));
        group.bench_with_input(BenchmarkId::from_parameter(pressed), &buttons, |b, &buttons| {
            b.iter(|| {
                black_box(RelativePointerEventParams::alloc_split(
                    &tracker,
                    Buttons::NONE,
                    buttons,
                    1,
                    -1,
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keyboard_alloc,
    bench_transfer,
    bench_duplicate,
    bench_pointer_split
);
criterion_main!(benches);
