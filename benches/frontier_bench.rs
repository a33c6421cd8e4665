//! Benchmarks for the crawl frontier scheduler.
//!
//! Benchmarks cover:
//! - Raw work queue operations (enqueue/dequeue)
//! - Scheduling throughput across many origins
//! - The full dispatch cycle (schedule, next, finished)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use crawl_frontier::builders::FrontierBuilder;
use crawl_frontier::config::FrontierConfig;
use crawl_frontier::core::{Disposition, Frontier, WorkItem, WorkQueue};

// ============================================================================
// Helpers
// ============================================================================

fn bench_config() -> FrontierConfig {
    FrontierConfig {
        ready_wait_ms: 10,
        ..FrontierConfig::default()
    }
}

fn build_frontier(config: FrontierConfig) -> Frontier {
    FrontierBuilder::new(config).build().expect("valid config")
}

fn build_item(id: u64) -> WorkItem {
    WorkItem::new(id, format!("https://host{}/page/{id}", id % 10))
}

// ============================================================================
// Work Queue Benchmarks
// ============================================================================

fn bench_work_queue_enqueue_dequeue(c: &mut Criterion) {
    let mut group = c.benchmark_group("work_queue_enqueue_dequeue");

    for size in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut wq = WorkQueue::new("host0");
                for id in 0..size {
                    wq.enqueue(build_item(id));
                }
                while let Some(item) = wq.dequeue_head() {
                    black_box(item);
                }
            });
        });
    }
    group.finish();
}

// ============================================================================
// Frontier Benchmarks
// ============================================================================

fn bench_schedule_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_throughput");

    for size in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let frontier = build_frontier(bench_config());
                for id in 0..size {
                    frontier.schedule(build_item(id));
                }
                black_box(frontier.stats());
                frontier.shutdown();
            });
        });
    }
    group.finish();
}

fn bench_dispatch_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_cycle");

    for size in [100u64, 1_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let frontier = build_frontier(FrontierConfig {
                    hold_queues: false,
                    ..bench_config()
                });
                for id in 0..size {
                    frontier.schedule(build_item(id));
                }
                for _ in 0..size {
                    let item = frontier.next().expect("work available");
                    frontier.finished(
                        item,
                        Disposition::Success {
                            politeness_delay_ms: 0,
                        },
                    );
                }
                frontier.shutdown();
            });
        });
    }
    group.finish();
}

fn bench_rotation_with_backlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation_with_backlog");

    group.bench_function("hold_queues_target_10", |b| {
        b.iter(|| {
            let frontier = build_frontier(FrontierConfig {
                hold_queues: true,
                target_ready_backlog: 10,
                ..bench_config()
            });
            // 50 origins, 4 items each; only 10 queues are Ready at a time.
            for seq in 0..4u64 {
                for key in 0..50u64 {
                    let id = key * 100 + seq;
                    frontier.schedule(WorkItem::new(id, format!("https://host{key}/{seq}")));
                }
            }
            for _ in 0..200 {
                let item = frontier.next().expect("work available");
                frontier.finished(
                    item,
                    Disposition::Success {
                        politeness_delay_ms: 0,
                    },
                );
            }
            frontier.shutdown();
        });
    });
    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(queue_benches, bench_work_queue_enqueue_dequeue);

criterion_group!(
    frontier_benches,
    bench_schedule_throughput,
    bench_dispatch_cycle,
    bench_rotation_with_backlog
);

criterion_main!(queue_benches, frontier_benches);
