//! Partitioned, fixed-iteration PageRank over link graphs
//!
//! Data flow per iteration:
//! [`GraphStore`] + current [`RankTable`] -> [`ContributionReducer`] ->
//! [`DampingUpdater`] -> next [`RankTable`], orchestrated by
//! [`IterationDriver`].

pub mod common;
pub mod contribution;
pub mod damping;
pub mod driver;
pub mod error;
pub mod graph;
pub mod rank;

pub use common::{NodeId, Partition};
pub use contribution::{Contribution, ContributionReducer, ContributionTable};
pub use damping::{DampingUpdater, DEFAULT_DAMPING_FACTOR};
pub use driver::{page_rank, DriverState, IterationDriver, RankConfig, DEFAULT_ITERATIONS};
pub use error::{EngineError, EngineResult};
pub use graph::{AdjacencyRecord, GraphStats, GraphStore};
pub use rank::{RankTable, INITIAL_RANK};
