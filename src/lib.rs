//! LinkRank
//!
//! PageRank-style importance scores for link graphs, computed with a fixed
//! number of synchronous, partition-parallel iterations.
//!
//! # Architecture
//!
//! - `linkrank-algorithms`: the rank engine (graph store, rank tables,
//!   contribution reduction, damping, iteration driver)
//! - this crate: the collaborators around it (input loading, configuration,
//!   result presentation, and a pipeline tying them together)
//!
//! ## Example Usage
//!
//! ```rust
//! use linkrank::{rank_graph, GraphLoader, RankConfig};
//!
//! let input = r#"
//! {"id": 1, "neighbors": [2], "url": "a.org"}
//! {"id": 2, "neighbors": []}
//! "#;
//! let loaded = GraphLoader::parse_str(input).unwrap();
//! let config = RankConfig { iterations: 1, ..RankConfig::default() };
//!
//! let report = rank_graph(loaded, &config).unwrap();
//! assert!((report.table.get(2).unwrap() - 1.0).abs() < 1e-12);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod presenter;

pub use config::RunConfig;
pub use error::{LinkRankError, LinkRankResult};
pub use loader::{GraphLoader, InputLayout, Labels, LoadedGraph};
pub use pipeline::{rank_graph, run, RankReport};
pub use presenter::{OutputFormat, RankedNode, ResultPresenter};

// Re-export the engine
pub use linkrank_algorithms::{
    page_rank, AdjacencyRecord, Contribution, ContributionReducer, DampingUpdater, DriverState,
    EngineError, GraphStats, GraphStore, IterationDriver, NodeId, RankConfig, RankTable,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
