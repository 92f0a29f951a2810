//! Immutable, partitioned link graph
//!
//! Built once from adjacency records and shared read-only by every
//! iteration. Neighbor lists are stored in Compressed Sparse Row (CSR)
//! form so that a partition is a contiguous slice of the edge arrays.

use crate::common::{split_by_volume, NodeId, NodeIndex, Partition};
use std::sync::Arc;
use tracing::{debug, info};

/// One (node, outbound links) record as produced by a graph loader.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjacencyRecord {
    pub id: NodeId,
    pub neighbors: Vec<NodeId>,
}

impl AdjacencyRecord {
    pub fn new(id: NodeId, neighbors: Vec<NodeId>) -> Self {
        Self { id, neighbors }
    }
}

/// Counters collected while building a [`GraphStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Distinct node identifiers retained
    pub nodes: usize,
    /// Neighbor entries, duplicates included
    pub edges: usize,
    /// Records dropped because their identifier was already loaded
    pub collapsed_records: usize,
    /// Nodes recorded with an empty neighbor list
    pub dangling_nodes: usize,
    /// Neighbor entries that name no loaded node
    pub unknown_targets: usize,
    /// Number of partitions
    pub partitions: usize,
}

/// Read-only link graph.
///
/// Records sharing a node identifier are collapsed to the first one seen;
/// neighbor entries inside a record are kept verbatim, so a node linking
/// twice to the same target has out-degree 2.
#[derive(Debug)]
pub struct GraphStore {
    index: Arc<NodeIndex>,

    /// Offsets into `targets`. Size = node_count + 1
    offsets: Vec<usize>,
    /// Contiguous array of neighbor identifiers
    targets: Vec<NodeId>,
    /// Dense slot of each entry in `targets`, `None` for unknown identifiers
    target_slots: Vec<Option<usize>>,

    partitions: Vec<Partition>,
    stats: GraphStats,
}

impl GraphStore {
    /// Build a graph partitioned for the current rayon pool
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AdjacencyRecord>,
    {
        Self::load_partitioned(records, rayon::current_num_threads())
    }

    /// Build a graph split into at most `partitions` contiguous partitions
    pub fn load_partitioned<I>(records: I, partitions: usize) -> Self
    where
        I: IntoIterator<Item = AdjacencyRecord>,
    {
        let mut index = NodeIndex::default();
        let mut offsets = vec![0];
        let mut targets = Vec::new();
        let mut collapsed_records = 0;
        let mut dangling_nodes = 0;

        for record in records {
            let (_, fresh) = index.insert(record.id);
            if !fresh {
                collapsed_records += 1;
                debug!(node = record.id, "Collapsing duplicate adjacency record");
                continue;
            }
            if record.neighbors.is_empty() {
                dangling_nodes += 1;
            }
            targets.extend(record.neighbors);
            offsets.push(targets.len());
        }

        // Targets may name nodes whose own record came later, so resolve last
        let target_slots: Vec<Option<usize>> = targets.iter().map(|&t| index.slot(t)).collect();
        let unknown_targets = target_slots.iter().filter(|s| s.is_none()).count();

        let partitions = split_by_volume(&offsets, partitions);
        let stats = GraphStats {
            nodes: index.len(),
            edges: targets.len(),
            collapsed_records,
            dangling_nodes,
            unknown_targets,
            partitions: partitions.len(),
        };

        info!(
            nodes = stats.nodes,
            edges = stats.edges,
            partitions = stats.partitions,
            "Graph loaded"
        );
        if collapsed_records > 0 || unknown_targets > 0 {
            debug!(collapsed_records, unknown_targets, "Graph load adjustments");
        }

        Self {
            index: Arc::new(index),
            offsets,
            targets,
            target_slots,
            partitions,
            stats,
        }
    }

    /// Outbound neighbors of `id`; empty if the node is unknown or dangling
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        match self.index.slot(id) {
            Some(slot) => self.neighbors_at(slot),
            None => &[],
        }
    }

    /// Out-degree of `id`, duplicates included
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// All node identifiers, in the order their records were first seen
    pub fn all_node_ids(&self) -> &[NodeId] {
        self.index.nodes()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.slot(id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    pub(crate) fn index(&self) -> &Arc<NodeIndex> {
        &self.index
    }

    pub(crate) fn neighbors_at(&self, slot: usize) -> &[NodeId] {
        &self.targets[self.offsets[slot]..self.offsets[slot + 1]]
    }

    pub(crate) fn neighbor_slots_at(&self, slot: usize) -> &[Option<usize>] {
        &self.target_slots[self.offsets[slot]..self.offsets[slot + 1]]
    }

    /// Partition owning a dense slot
    pub(crate) fn partition_of(&self, slot: usize) -> usize {
        self.partitions.partition_point(|p| p.slots.end <= slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(raw: &[(NodeId, &[NodeId])]) -> Vec<AdjacencyRecord> {
        raw.iter().map(|(id, n)| AdjacencyRecord::new(*id, n.to_vec())).collect()
    }

    #[test]
    fn test_neighbors_and_unknown_nodes() {
        let graph = GraphStore::load_partitioned(records(&[(1, &[2, 3]), (2, &[]), (3, &[1])]), 2);

        assert_eq!(graph.neighbors(1), &[2, 3]);
        assert!(graph.neighbors(2).is_empty());
        assert!(graph.neighbors(99).is_empty());
        assert_eq!(graph.all_node_ids(), &[1, 2, 3]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.stats().dangling_nodes, 1);
    }

    #[test]
    fn test_duplicate_records_collapse_but_duplicate_links_stay() {
        // Second record for node 1 is dropped; the repeated link 1->2 is not.
        let graph = GraphStore::load_partitioned(
            records(&[(1, &[2, 2]), (2, &[1]), (1, &[3])]),
            1,
        );

        assert_eq!(graph.neighbors(1), &[2, 2]);
        assert_eq!(graph.out_degree(1), 2);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.stats().collapsed_records, 1);
        // The dropped record's target never becomes a node
        assert!(!graph.contains(3));
    }

    #[test]
    fn test_unknown_targets_counted_toward_degree() {
        let graph = GraphStore::load_partitioned(records(&[(1, &[2, 7])]), 1);

        assert_eq!(graph.out_degree(1), 2);
        assert_eq!(graph.stats().unknown_targets, 2);
        assert_eq!(graph.neighbor_slots_at(0), &[None, None]);
    }

    #[test]
    fn test_forward_references_resolve() {
        let graph = GraphStore::load_partitioned(records(&[(1, &[2]), (2, &[1])]), 1);
        assert_eq!(graph.neighbor_slots_at(0), &[Some(1)]);
        assert_eq!(graph.stats().unknown_targets, 0);
    }

    #[test]
    fn test_partition_of_matches_ranges() {
        let raw: Vec<AdjacencyRecord> = (0..10u64)
            .map(|i| AdjacencyRecord::new(i, vec![(i + 1) % 10]))
            .collect();
        let graph = GraphStore::load_partitioned(raw, 3);

        assert_eq!(graph.partitions().len(), 3);
        for part in graph.partitions() {
            for slot in part.slots.clone() {
                assert_eq!(graph.partition_of(slot), part.id);
            }
        }
    }
}
