//! Benchmark for the target registry
//!
//! Insert and remove scan the whole registry, so these track how a large
//! fleet behaves under a single lock.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use prometheus_http_sd::{TargetGroup, TargetRegistry};

fn node_group(i: usize) -> TargetGroup {
    TargetGroup::new([format!("host-{:04}:9100", i)], [("job", "node")])
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_registry");
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_new_group", |b| {
        let registry = TargetRegistry::new();
        let mut counter = 0usize;

        b.iter(|| {
            counter += 1;
            registry.insert([black_box(node_group(counter))]);
        });
    });

    // Pre-register groups
    let registry = TargetRegistry::new();
    registry.insert((0..1000).map(node_group));

    group.bench_function("insert_duplicate_1000", |b| {
        let mut counter = 0usize;
        b.iter(|| {
            counter += 1;
            registry.insert([black_box(node_group(counter % 1000))]);
        });
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_registry");

    let registry = TargetRegistry::new();
    registry.insert((0..1000).map(node_group));

    group.throughput(Throughput::Elements(1000));
    group.bench_function("snapshot_1000", |b| {
        b.iter(|| black_box(registry.snapshot()));
    });

    group.finish();
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_registry");
    group.throughput(Throughput::Elements(1));

    let registry = TargetRegistry::new();
    registry.insert((0..1000).map(node_group));

    group.bench_function("remove_reinsert_1000", |b| {
        let mut counter = 0usize;
        b.iter(|| {
            counter += 1;
            let target = node_group(counter % 1000);
            registry.remove([black_box(&target)]);
            registry.insert([target]);
        });
    });

    group.finish();
}

fn bench_concurrent_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_registry");
    group.throughput(Throughput::Elements(100));

    let rt = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("concurrent_100_inserts", |b| {
        b.iter(|| {
            rt.block_on(async {
                let registry = TargetRegistry::new();
                let mut handles = Vec::new();
                for i in 0..100 {
                    let reg = registry.clone();
                    handles.push(tokio::spawn(async move { reg.insert([node_group(i)]) }));
                }
                for handle in handles {
                    let _ = handle.await;
                }
            });
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_snapshot,
    bench_remove_reinsert,
    bench_concurrent_inserts,
);
criterion_main!(benches);
