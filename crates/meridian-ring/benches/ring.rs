//! Benchmarks for ring lookups and membership changes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use meridian_ring::Ring;

fn build_ring(nodes: usize, replicas: u32) -> Ring {
    let ring = Ring::new(replicas);
    for i in 0..nodes {
        ring.add_node(format!("node-{i}"));
    }
    ring
}

fn bench_get_node(c: &mut Criterion) {
    let keys: Vec<String> = (0..1_000).map(|i| format!("key-{i}")).collect();
    let node_counts: &[usize] = &[3, 16, 128];

    let mut group = c.benchmark_group("get_node");
    group.throughput(Throughput::Elements(keys.len() as u64));
    for &nodes in node_counts {
        let ring = build_ring(nodes, 160);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &ring, |b, ring| {
            b.iter(|| {
                for key in &keys {
                    black_box(ring.get_node(key));
                }
            });
        });
    }
    group.finish();
}

fn bench_membership_change(c: &mut Criterion) {
    let replica_counts: &[u32] = &[16, 160];

    let mut group = c.benchmark_group("add_remove_node");
    for &replicas in replica_counts {
        let ring = build_ring(64, replicas);
        group.bench_with_input(BenchmarkId::from_parameter(replicas), &ring, |b, ring| {
            b.iter(|| {
                ring.add_node("joining");
                ring.remove_node("joining");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get_node, bench_membership_change);
criterion_main!(benches);
