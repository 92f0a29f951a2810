//! Rank tables
//!
//! A [`RankTable`] holds exactly one rank per node of the graph it was
//! derived from. Tables are never mutated once built; every iteration
//! produces a fresh one.

use crate::common::{NodeId, NodeIndex};
use crate::error::{EngineError, EngineResult};
use crate::graph::GraphStore;
use std::borrow::Cow;
use std::sync::Arc;

/// Rank assigned to every node before the first iteration
pub const INITIAL_RANK: f64 = 1.0;

/// Immutable mapping from node identifier to rank.
#[derive(Debug, Clone)]
pub struct RankTable {
    index: Arc<NodeIndex>,
    /// Ranks aligned with the dense node slots of `index`
    ranks: Vec<f64>,
}

impl RankTable {
    /// Version 0: every node starts at [`INITIAL_RANK`]
    pub fn initial(graph: &GraphStore) -> Self {
        Self {
            index: Arc::clone(graph.index()),
            ranks: vec![INITIAL_RANK; graph.node_count()],
        }
    }

    /// Bulk construction from (node, rank) pairs.
    ///
    /// Exactly one pair per node of `graph` is required. Duplicates,
    /// omissions and identifiers the graph does not know are all rejected.
    pub fn from_entries<I>(graph: &GraphStore, entries: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (NodeId, f64)>,
    {
        let index = graph.index();
        let mut ranks = vec![0.0; index.len()];
        let mut seen = vec![0usize; index.len()];

        for (node, rank) in entries {
            let slot = index.slot(node).ok_or(EngineError::UnknownRankEntry(node))?;
            seen[slot] += 1;
            if seen[slot] > 1 {
                return Err(EngineError::DuplicateOrMissingRankEntry { node, count: seen[slot] });
            }
            ranks[slot] = rank;
        }

        if let Some(slot) = seen.iter().position(|&count| count == 0) {
            return Err(EngineError::DuplicateOrMissingRankEntry {
                node: index.node(slot),
                count: 0,
            });
        }

        Ok(Self { index: Arc::clone(index), ranks })
    }

    /// Build from ranks already laid out in slot order
    pub(crate) fn from_dense(index: Arc<NodeIndex>, ranks: Vec<f64>) -> Self {
        debug_assert_eq!(index.len(), ranks.len());
        Self { index, ranks }
    }

    /// Rank of `node`
    pub fn get(&self, node: NodeId) -> EngineResult<f64> {
        self.index
            .slot(node)
            .map(|slot| self.ranks[slot])
            .ok_or(EngineError::MissingNode(node))
    }

    /// (node, rank) pairs in graph order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.index.nodes().iter().copied().zip(self.ranks.iter().copied())
    }

    pub fn to_pairs(&self) -> Vec<(NodeId, f64)> {
        self.iter().collect()
    }

    /// Sum of all ranks
    pub fn total_mass(&self) -> f64 {
        self.ranks.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Whether this table was derived from `graph`
    pub fn belongs_to(&self, graph: &GraphStore) -> bool {
        Arc::ptr_eq(&self.index, graph.index())
    }

    /// This table laid out in `graph`'s slot order.
    ///
    /// Tables from another `GraphStore` instance are re-keyed by node
    /// identifier and must cover exactly the nodes of `graph`.
    pub fn aligned_to(&self, graph: &GraphStore) -> EngineResult<Cow<'_, RankTable>> {
        if self.belongs_to(graph) {
            Ok(Cow::Borrowed(self))
        } else {
            Self::from_entries(graph, self.iter()).map(Cow::Owned)
        }
    }

    pub(crate) fn values(&self) -> &[f64] {
        &self.ranks
    }

    /// New table over the same nodes
    pub(crate) fn with_values(&self, ranks: Vec<f64>) -> Self {
        Self::from_dense(Arc::clone(&self.index), ranks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyRecord;

    fn graph() -> GraphStore {
        GraphStore::load_partitioned(
            vec![
                AdjacencyRecord::new(10, vec![20]),
                AdjacencyRecord::new(20, vec![]),
            ],
            1,
        )
    }

    #[test]
    fn test_initial_table() {
        let graph = graph();
        let table = RankTable::initial(&graph);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(10), Ok(1.0));
        assert_eq!(table.get(20), Ok(1.0));
        assert_eq!(table.total_mass(), 2.0);
        assert!(table.belongs_to(&graph));
    }

    #[test]
    fn test_missing_node() {
        let table = RankTable::initial(&graph());
        assert_eq!(table.get(30), Err(EngineError::MissingNode(30)));
    }

    #[test]
    fn test_from_entries() {
        let graph = graph();
        let table = RankTable::from_entries(&graph, vec![(20, 0.5), (10, 0.25)]).unwrap();

        assert_eq!(table.to_pairs(), vec![(10, 0.25), (20, 0.5)]);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let err = RankTable::from_entries(&graph(), vec![(10, 0.5), (20, 0.5), (10, 0.1)]).unwrap_err();
        assert_eq!(err, EngineError::DuplicateOrMissingRankEntry { node: 10, count: 2 });
    }

    #[test]
    fn test_from_entries_rejects_omissions() {
        let err = RankTable::from_entries(&graph(), vec![(10, 0.5)]).unwrap_err();
        assert_eq!(err, EngineError::DuplicateOrMissingRankEntry { node: 20, count: 0 });
    }

    #[test]
    fn test_aligned_to_rekeys_by_identifier() {
        let graph = graph();
        let reordered = GraphStore::load_partitioned(
            vec![
                AdjacencyRecord::new(20, vec![]),
                AdjacencyRecord::new(10, vec![20]),
            ],
            1,
        );
        let table = RankTable::from_entries(&graph, vec![(10, 0.5), (20, 2.0)]).unwrap();

        assert!(matches!(table.aligned_to(&graph).unwrap(), Cow::Borrowed(_)));
        let aligned = table.aligned_to(&reordered).unwrap();
        assert!(aligned.belongs_to(&reordered));
        assert_eq!(aligned.to_pairs(), vec![(20, 2.0), (10, 0.5)]);
    }

    #[test]
    fn test_aligned_to_rejects_other_node_sets() {
        let smaller = GraphStore::load_partitioned(vec![AdjacencyRecord::new(10, vec![])], 1);
        let table = RankTable::initial(&graph());

        assert_eq!(table.aligned_to(&smaller).unwrap_err(), EngineError::UnknownRankEntry(20));
    }

    #[test]
    fn test_from_entries_rejects_unknown() {
        let err = RankTable::from_entries(&graph(), vec![(10, 0.5), (20, 0.5), (30, 1.0)]).unwrap_err();
        assert_eq!(err, EngineError::UnknownRankEntry(30));
    }
}
