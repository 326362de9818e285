use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::collections::HashMap;

use chrono::Utc;
use fieldstock_core::{OperationId, ProductId, VendorId};
use fieldstock_ledger::{MovementEvent, MovementKind, fleet_summary, vendor_balances};

/// Build a mixed event log for one vendor: mostly outbound, some returns.
fn build_events(vendor: VendorId, products: &[ProductId], n: usize) -> Vec<MovementEvent> {
    (0..n)
        .map(|i| {
            let kind = if i % 4 == 3 {
                MovementKind::Return
            } else {
                MovementKind::Outbound
            };
            MovementEvent::new(
                OperationId::new(),
                vendor,
                products[i % products.len()],
                (i % 5 + 1) as u32,
                kind,
                None,
                Utc::now(),
            )
            .unwrap()
        })
        .collect()
}

/// Replay-derived balances: the cost of recomputing from the full log.
fn bench_replay_derivation(c: &mut Criterion) {
    let vendor = VendorId::new();
    let products: Vec<ProductId> = (0..16).map(|_| ProductId::new()).collect();

    let mut group = c.benchmark_group("replay_derivation");
    for size in [100usize, 1_000, 10_000] {
        let events = build_events(vendor, &products, size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("vendor_balances", size), &events, |b, events| {
            b.iter(|| {
                let balances = vendor_balances(vendor, black_box(events), |_| Some(100));
                black_box(balances)
            })
        });

        group.bench_with_input(BenchmarkId::new("fleet_summary", size), &events, |b, events| {
            b.iter(|| {
                let summary = fleet_summary(black_box(events), |_| Some(100));
                black_box(summary)
            })
        });
    }
    group.finish();
}

/// Baseline: a naive mutable counter updated in place (no history, no audit).
fn bench_naive_counter_baseline(c: &mut Criterion) {
    let products: Vec<ProductId> = (0..16).map(|_| ProductId::new()).collect();

    let mut group = c.benchmark_group("naive_counter_baseline");
    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("apply_all", size), &size, |b, &size| {
            b.iter(|| {
                let mut counters: HashMap<ProductId, i64> = HashMap::new();
                for i in 0..size {
                    let delta = if i % 4 == 3 { -1i64 } else { 1i64 } * ((i % 5 + 1) as i64);
                    *counters.entry(products[i % products.len()]).or_insert(0) += delta;
                }
                black_box(counters)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_replay_derivation, bench_naive_counter_baseline);
criterion_main!(benches);
