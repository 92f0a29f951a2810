use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linkrank::{
    page_rank, AdjacencyRecord, ContributionReducer, DampingUpdater, GraphStore, RankConfig,
    RankTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Random graph with an average out-degree of `degree`
fn random_graph(nodes: u64, degree: usize, partitions: usize) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<AdjacencyRecord> = (0..nodes)
        .map(|id| {
            let out = rng.gen_range(0..=2 * degree);
            AdjacencyRecord::new(id, (0..out).map(|_| rng.gen_range(0..nodes)).collect())
        })
        .collect();
    GraphStore::load_partitioned(records, partitions)
}

/// Benchmark one reduce + damping step
fn bench_single_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_iteration");
    let partitions = rayon::current_num_threads();

    for size in [1_000u64, 10_000, 100_000].iter() {
        let graph = random_graph(*size, 8, partitions);
        let table = RankTable::initial(&graph);
        let reducer = ContributionReducer::new();
        let updater = DampingUpdater::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let next = updater.apply(&reducer.reduce(&graph, &table).unwrap());
                criterion::black_box(next.len());
            });
        });
    }
    group.finish();
}

/// Benchmark the effect of partition count on a full run
fn bench_partitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run_partitions");
    group.sample_size(10);

    for partitions in [1usize, 4, 16].iter() {
        let graph = Arc::new(random_graph(20_000, 8, *partitions));
        let config = RankConfig { iterations: 20, partitions: *partitions, ..RankConfig::default() };

        group.bench_with_input(BenchmarkId::from_parameter(partitions), partitions, |b, _| {
            b.iter(|| {
                let table = page_rank(Arc::clone(&graph), config.clone()).unwrap();
                criterion::black_box(table.total_mass());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_iteration, bench_partitions);
criterion_main!(benches);
