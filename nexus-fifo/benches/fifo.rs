//! Benchmarks for FIFO queue throughput.
//!
//! Compares both nexus-fifo queues against `std::collections::VecDeque`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nexus_fifo::{ArrayQueue, GrowthPolicy, LinkedQueue, QueueCursor};
use std::collections::VecDeque;

// ============================================================================
// Steady state: one in, one out on a warm queue
// ============================================================================

fn bench_ping_pong(c: &mut Criterion) {
    let mut group = c.benchmark_group("ping_pong");

    group.bench_function("array_queue/u64", |b| {
        let mut q = ArrayQueue::<u64>::with_capacity(1024);
        b.iter(|| {
            q.enqueue(black_box(42));
            black_box(q.dequeue().unwrap())
        });
    });

    group.bench_function("linked_queue/u64", |b| {
        let mut q = LinkedQueue::<u64>::with_capacity(1024);
        b.iter(|| {
            q.enqueue(black_box(42));
            black_box(q.dequeue().unwrap())
        });
    });

    group.bench_function("vec_deque/u64", |b| {
        let mut q = VecDeque::<u64>::with_capacity(1024);
        b.iter(|| {
            q.push_back(black_box(42));
            black_box(q.pop_front().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Fill from empty: measures growth cost
// ============================================================================

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_from_empty");

    for &count in &[64u64, 1024] {
        group.throughput(Throughput::Elements(count));

        group.bench_with_input(BenchmarkId::new("array_doubling", count), &count, |b, &n| {
            b.iter(|| {
                let mut q = ArrayQueue::with_policy(GrowthPolicy::Doubling);
                for i in 0..n {
                    q.enqueue(black_box(i));
                }
                q
            });
        });

        group.bench_with_input(BenchmarkId::new("array_exact_fit", count), &count, |b, &n| {
            b.iter(|| {
                let mut q = ArrayQueue::with_policy(GrowthPolicy::ExactFit);
                for i in 0..n {
                    q.enqueue(black_box(i));
                }
                q
            });
        });

        group.bench_with_input(BenchmarkId::new("linked", count), &count, |b, &n| {
            b.iter(|| {
                let mut q = LinkedQueue::new();
                for i in 0..n {
                    q.enqueue(black_box(i));
                }
                q
            });
        });

        group.bench_with_input(BenchmarkId::new("vec_deque", count), &count, |b, &n| {
            b.iter(|| {
                let mut q = VecDeque::new();
                for i in 0..n {
                    q.push_back(black_box(i));
                }
                q
            });
        });
    }

    group.finish();
}

// ============================================================================
// Traversal: versioned cursor vs borrowing iterator
// ============================================================================

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse_1024");
    group.throughput(Throughput::Elements(1024));

    let array: ArrayQueue<u64> = (0..1024).collect();
    let linked: LinkedQueue<u64> = (0..1024).collect();

    group.bench_function("array/cursor", |b| {
        b.iter(|| {
            let mut cursor = array.cursor();
            let mut sum = 0u64;
            while cursor.advance(&array).unwrap() {
                sum += *cursor.current(&array).unwrap();
            }
            black_box(sum)
        });
    });

    group.bench_function("array/iter", |b| {
        b.iter(|| black_box(array.iter().sum::<u64>()));
    });

    group.bench_function("linked/cursor", |b| {
        b.iter(|| {
            let mut cursor = linked.cursor();
            let mut sum = 0u64;
            while cursor.advance(&linked).unwrap() {
                sum += *cursor.current(&linked).unwrap();
            }
            black_box(sum)
        });
    });

    group.bench_function("linked/iter", |b| {
        b.iter(|| black_box(linked.iter().sum::<u64>()));
    });

    group.finish();
}

criterion_group!(benches, bench_ping_pong, bench_fill, bench_traverse);
criterion_main!(benches);
