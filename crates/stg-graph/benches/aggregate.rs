use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stg_graph::{aggregate_by_attribute, hierarchical_chain, Directedness};

fn aggregate_bench(c: &mut Criterion) {
    let graph = hierarchical_chain(20_000, 4, 6).unwrap();
    c.bench_function("aggregate_chain_20k", |b| {
        b.iter(|| {
            let quotient =
                aggregate_by_attribute(&graph, "cluster-2", Directedness::Directed).unwrap();
            black_box(quotient);
        });
    });
    c.bench_function("aggregate_chain_20k_undirected", |b| {
        b.iter(|| {
            let quotient =
                aggregate_by_attribute(&graph, "cluster-2", Directedness::Undirected).unwrap();
            black_box(quotient);
        });
    });
}

criterion_group!(benches, aggregate_bench);
criterion_main!(benches);
