//! Load, rank and report

use crate::config::RunConfig;
use crate::error::LinkRankResult;
use crate::loader::{GraphLoader, Labels, LoadedGraph};
use linkrank_algorithms::{GraphStats, GraphStore, IterationDriver, RankConfig, RankTable};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a completed run
#[derive(Debug)]
pub struct RankReport {
    /// Final rank table
    pub table: RankTable,
    /// Node labels from the input
    pub labels: Labels,
    /// Graph construction counters
    pub graph_stats: GraphStats,
    /// Time spent in the iteration loop, excluding load and presentation
    pub elapsed: Duration,
}

/// Rank an already loaded graph
pub fn rank_graph(loaded: LoadedGraph, config: &RankConfig) -> LinkRankResult<RankReport> {
    config.validate()?;
    let graph = Arc::new(GraphStore::load_partitioned(loaded.records, config.partitions));
    let graph_stats = graph.stats().clone();

    let start = Instant::now();
    let table = IterationDriver::new(graph, config.clone())?.run()?;
    let elapsed = start.elapsed();

    info!(elapsed_secs = elapsed.as_secs_f64(), "Ranking complete");
    Ok(RankReport {
        table,
        labels: loaded.labels,
        graph_stats,
        elapsed,
    })
}

/// Load the configured input and rank it
pub fn run(config: &RunConfig) -> LinkRankResult<RankReport> {
    config.validate()?;
    let loaded = GraphLoader::from_path(config.input_path()?)?;
    rank_graph(loaded, &config.engine)
}
