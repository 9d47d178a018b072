//! Benchmarks for the scheduler.
//!
//! Benchmarks cover:
//! - A single procedural round at different slot counts
//! - Full event-driven batches through the event loop, as the batch grows

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use octoparallel::core::{
    EchoIntegrator, EventDrivenWorkItem, EventLoop, ParallelForeach, ProceduralWorkItem,
    SharedWorkItem, WorkItem,
};
use tokio::runtime::Runtime;

// ============================================================================
// Helper Functions
// ============================================================================

fn procedural_batch(count: usize) -> Vec<SharedWorkItem> {
    (0..count)
        .map(|i| {
            WorkItem::from(ProceduralWorkItem::create(format!("p{i}"), move || {
                black_box(i);
                Ok(())
            }))
            .into_shared()
        })
        .collect()
}

fn event_batch(count: usize) -> Vec<EventDrivenWorkItem> {
    (0..count)
        .map(|i| EventDrivenWorkItem::create(format!("e{i}"), || Ok(())))
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_procedural_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("procedural_round");
    group.throughput(Throughput::Elements(256));

    for slots in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(slots), &slots, |b, &slots| {
            b.iter_batched(
                || procedural_batch(256),
                |items| {
                    let mut foreach = ParallelForeach::new(slots, items);
                    black_box(foreach.execute().ok());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_event_loop(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("event_loop");

    for count in [8usize, 64, 256] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let event_loop = EventLoop::new(EchoIntegrator).with_max_parallelism(8);
            let event_loop = &event_loop;
            b.to_async(&rt).iter_batched(
                || event_batch(count),
                |items| async move {
                    black_box(event_loop.start(items).await.ok());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_procedural_round, bench_event_loop);
criterion_main!(benches);
