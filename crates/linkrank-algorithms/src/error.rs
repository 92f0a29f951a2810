//! Error types for the rank engine

use crate::common::NodeId;
use thiserror::Error;

/// Errors raised by the rank engine.
///
/// None of these are recoverable within a run: a failed iteration aborts
/// the whole computation and no partial table is handed out.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A rank lookup targeted an identifier the graph does not know
    #[error("Node {0} not found in rank table")]
    MissingNode(NodeId),

    /// Bulk construction received other than one entry for a node
    #[error("Rank table requires exactly one entry per node: node {node} has {count}")]
    DuplicateOrMissingRankEntry { node: NodeId, count: usize },

    /// Bulk construction received an identifier absent from the graph
    #[error("Rank entry for unknown node {0}")]
    UnknownRankEntry(NodeId),

    /// Configuration outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dedicated worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Driver asked to move past a terminal state
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
