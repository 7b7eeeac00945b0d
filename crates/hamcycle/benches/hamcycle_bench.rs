//! Criterion benchmarks for Hamiltonian cycle enumeration.
//! Focus sizes: complete graphs K_n for small n, where the cycle count
//! grows factorially, so n is kept modest. Compares pruning on/off.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hamcycle::vertex_order::sort_vertices_degree_desc;
use hamcycle::{GraphStore, SearchCfg, SearchSession};

fn complete_graph(n: u32) -> GraphStore {
    let mut g = GraphStore::new(format!("K{n}"), n).unwrap();
    for x in 1..=n {
        for y in (x + 1)..=n {
            g.create_edge(x, y);
        }
    }
    g
}

fn count_all_cycles(g: GraphStore, pruning: bool) -> u64 {
    let order = sort_vertices_degree_desc(&g);
    let mut session = SearchSession::new(g, &order, SearchCfg { pruning }).unwrap();
    let mut c = 0u64;
    if session.first_cycle() {
        c += 1;
        while session.next_cycle() {
            c += 1;
        }
    }
    c
}

fn bench_complete_graphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_graph_enumeration");
    for &n in &[5u32, 6, 7, 8] {
        group.bench_with_input(BenchmarkId::new("no_pruning", n), &n, |b, &n| {
            b.iter(|| count_all_cycles(complete_graph(n), false))
        });
        group.bench_with_input(BenchmarkId::new("pruning", n), &n, |b, &n| {
            b.iter(|| count_all_cycles(complete_graph(n), true))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_complete_graphs);
criterion_main!(benches);
