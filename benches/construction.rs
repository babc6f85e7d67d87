//! Criterion benchmarks for the construction pipeline
//!
//! Tracks the cost of each stage separately (renumber, symmetrize, CSR
//! assembly) and the composed from_edgelist path.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use cimiento_graph::{
    renumber, symmetrize, CsrBuilder, EdgeList, GraphHandle, GraphKind, Reduction, VertexId,
};

/// Generate scale-free key columns (Barabási-Albert model approximation)
/// with sparse 64-bit keys.
fn generate_key_columns(num_vertices: usize, edges_per_vertex: usize) -> (Vec<i64>, Vec<i64>) {
    let mut sources = Vec::new();
    let mut targets = Vec::new();
    let mut rng_state = 12345_u64; // Simple LCG for reproducibility

    for vertex in 0..num_vertices {
        for _ in 0..edges_per_vertex {
            rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
            let target = (rng_state % num_vertices as u64) as i64;

            if target != vertex as i64 {
                // Spread keys out to exercise the hash path, not array indexing
                sources.push(vertex as i64 * 1_000_003);
                targets.push(target * 1_000_003);
            }
        }
    }

    (sources, targets)
}

fn renumbered_edges(num_vertices: usize) -> (u32, EdgeList) {
    let (sources, targets) = generate_key_columns(num_vertices, 3);
    let out = renumber(&sources, &targets).unwrap();
    let weights = vec![1.0_f32; out.sources.len()];
    (
        out.map.len() as u32,
        EdgeList::new(out.sources, out.targets, Some(weights)).unwrap(),
    )
}

/// Benchmark: key renumbering
fn bench_renumber(c: &mut Criterion) {
    let mut group = c.benchmark_group("renumber");

    for size in [100, 500, 1000, 5000].iter() {
        let (sources, targets) = generate_key_columns(*size, 3);

        group.bench_with_input(
            BenchmarkId::new("int64_keys", size),
            &(sources, targets),
            |b, (sources, targets)| {
                b.iter(|| {
                    let out = renumber(black_box(sources), black_box(targets)).unwrap();
                    black_box(out);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: edge symmetrization
fn bench_symmetrize(c: &mut Criterion) {
    let mut group = c.benchmark_group("symmetrize");

    for size in [100, 500, 1000, 5000].iter() {
        let (_, edges) = renumbered_edges(*size);

        group.bench_with_input(BenchmarkId::new("sum", size), &edges, |b, edges| {
            b.iter(|| {
                let out = symmetrize(black_box(edges), Reduction::Sum);
                black_box(out);
            });
        });
    }

    group.finish();
}

/// Benchmark: CSR assembly from a renumbered edge list
fn bench_csr_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("csr_build");

    for size in [100, 500, 1000, 5000].iter() {
        let (vertex_count, edges) = renumbered_edges(*size);
        let builder = CsrBuilder::new(vertex_count);

        group.bench_with_input(BenchmarkId::new("weighted", size), &edges, |b, edges| {
            b.iter(|| {
                let csr = builder.build(black_box(edges)).unwrap();
                black_box(csr);
            });
        });
    }

    group.finish();
}

/// Benchmark: composed pipeline (renumber + symmetrize + CSR)
fn bench_from_edgelist(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_edgelist");

    for size in [100, 1000, 5000].iter() {
        let (sources, targets) = generate_key_columns(*size, 3);

        group.bench_with_input(
            BenchmarkId::new("undirected", size),
            &(sources, targets),
            |b, (sources, targets)| {
                b.iter(|| {
                    let graph = GraphHandle::from_edgelist(
                        black_box(sources),
                        black_box(targets),
                        None,
                        GraphKind::Undirected,
                    )
                    .unwrap();
                    black_box(graph);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: neighbor iteration over the finished handle
fn bench_neighbor_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_scan");

    for size in [1000, 5000].iter() {
        let (sources, targets) = generate_key_columns(*size, 3);
        let graph =
            GraphHandle::from_edgelist(&sources, &targets, None, GraphKind::Directed).unwrap();

        group.bench_with_input(BenchmarkId::new("full", size), &graph, |b, graph| {
            b.iter(|| {
                let mut touched = 0_u64;
                for v in 0..graph.vertex_count() as u32 {
                    for (u, _) in graph.neighbors(VertexId(v)).unwrap() {
                        touched += u64::from(u.0);
                    }
                }
                black_box(touched);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_renumber,
    bench_symmetrize,
    bench_csr_build,
    bench_from_edgelist,
    bench_neighbor_scan
);
criterion_main!(benches);
