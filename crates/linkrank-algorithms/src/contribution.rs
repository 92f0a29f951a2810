//! Contribution generation and per-destination reduction
//!
//! Each source node with a non-empty neighbor list sends
//! `rank / out_degree` to every neighbor entry, once per occurrence.
//! Contributions are summed per destination node.
//!
//! The reduction runs in two phases over the graph's partitions:
//!
//! 1. Map side: every source partition combines its own contributions into
//!    one sparse bucket per destination partition.
//! 2. Reduce side: every destination partition sums the buckets addressed
//!    to it, visiting source partitions in order.
//!
//! Both phases are pure and run on rayon with no shared mutable state. The
//! fixed visiting order makes the result bit-identical across runs for a
//! given partitioning.

use crate::common::{NodeId, Partition};
use crate::error::EngineResult;
use crate::graph::GraphStore;
use crate::rank::RankTable;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// A quantity of rank passed from one node to one neighbor entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub source: NodeId,
    pub destination: NodeId,
    pub value: f64,
}

/// Summed incoming contributions, one entry per graph node.
///
/// Same shape as a [`RankTable`]; nodes without inbound links hold 0.0.
pub type ContributionTable = RankTable;

/// Partition-local running sums keyed by destination slot
type Bucket = FxHashMap<usize, f64>;

/// Joins a graph with a rank table and reduces contributions by destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContributionReducer;

impl ContributionReducer {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate incoming contributions for every node of `graph`.
    ///
    /// `ranks` is re-keyed onto `graph` when it was derived from another
    /// graph instance; it must then cover exactly the same nodes.
    pub fn reduce(&self, graph: &GraphStore, ranks: &RankTable) -> EngineResult<ContributionTable> {
        let ranks = ranks.aligned_to(graph)?;

        let partitions = graph.partitions();

        // Map side: buckets[source][destination]
        let buckets: Vec<Vec<Bucket>> = partitions
            .par_iter()
            .map(|part| Self::combine_partition(graph, ranks.values(), part, partitions.len()))
            .collect();

        // Reduce side: each destination partition owns a disjoint slot range
        let sums: Vec<Vec<f64>> = partitions
            .par_iter()
            .map(|dest| {
                let mut local = vec![0.0; dest.len()];
                for source in &buckets {
                    for (&slot, &value) in &source[dest.id] {
                        local[slot - dest.slots.start] += value;
                    }
                }
                local
            })
            .collect();

        let aggregate: Vec<f64> = sums.into_iter().flatten().collect();
        Ok(RankTable::from_dense(graph.index().clone(), aggregate))
    }

    /// Every contribution emitted for the current ranks, in graph order.
    ///
    /// Contributions addressed to identifiers without an adjacency record
    /// are included here but dropped by [`ContributionReducer::reduce`].
    pub fn emit(&self, graph: &GraphStore, ranks: &RankTable) -> EngineResult<Vec<Contribution>> {
        let ranks = ranks.aligned_to(graph)?;
        let ranks: &RankTable = &ranks;

        let contributions = graph
            .partitions()
            .par_iter()
            .flat_map_iter(|part| {
                part.slots.clone().flat_map(move |slot| {
                    let neighbors = graph.neighbors_at(slot);
                    let source = graph.all_node_ids()[slot];
                    let rank = ranks.values()[slot];
                    neighbors.iter().map(move |&destination| Contribution {
                        source,
                        destination,
                        value: share(rank, neighbors.len()),
                    })
                })
            })
            .collect();
        Ok(contributions)
    }

    fn combine_partition(
        graph: &GraphStore,
        ranks: &[f64],
        part: &Partition,
        partition_count: usize,
    ) -> Vec<Bucket> {
        let mut buckets: Vec<Bucket> = vec![Bucket::default(); partition_count];

        for slot in part.slots.clone() {
            let targets = graph.neighbor_slots_at(slot);
            // Dangling nodes emit nothing
            if targets.is_empty() {
                continue;
            }
            let share = share(ranks[slot], targets.len());
            for target in targets.iter().flatten() {
                let bucket = &mut buckets[graph.partition_of(*target)];
                *bucket.entry(*target).or_insert(0.0) += share;
            }
        }

        buckets
    }
}

fn share(rank: f64, out_degree: usize) -> f64 {
    rank / out_degree as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::graph::AdjacencyRecord;

    fn graph(raw: &[(NodeId, &[NodeId])], partitions: usize) -> GraphStore {
        GraphStore::load_partitioned(
            raw.iter().map(|(id, n)| AdjacencyRecord::new(*id, n.to_vec())),
            partitions,
        )
    }

    #[test]
    fn test_dangling_source_receives_share() {
        let graph = graph(&[(1, &[2]), (2, &[])], 1);
        let ranks = RankTable::initial(&graph);

        let aggregate = ContributionReducer::new().reduce(&graph, &ranks).unwrap();

        assert_eq!(aggregate.get(1), Ok(0.0));
        assert_eq!(aggregate.get(2), Ok(1.0));
    }

    #[test]
    fn test_duplicate_links_split_degree() {
        let graph = graph(&[(1, &[2, 2]), (2, &[])], 1);
        let ranks = RankTable::initial(&graph);
        let reducer = ContributionReducer::new();

        let emitted = reducer.emit(&graph, &ranks).unwrap();
        assert_eq!(emitted.len(), 2);
        assert!(emitted.iter().all(|c| c.destination == 2 && c.value == 0.5));

        let aggregate = reducer.reduce(&graph, &ranks).unwrap();
        assert_eq!(aggregate.get(2), Ok(1.0));
    }

    #[test]
    fn test_dangling_nodes_never_emit() {
        let graph = graph(&[(1, &[2, 3]), (2, &[]), (3, &[]), (4, &[1])], 2);
        let ranks = RankTable::initial(&graph);

        let emitted = ContributionReducer::new().emit(&graph, &ranks).unwrap();

        assert!(emitted.iter().all(|c| c.source != 2 && c.source != 3));
        assert_eq!(emitted.len(), 3);
    }

    #[test]
    fn test_unknown_targets_dropped() {
        // 1 -> [2, 9]; 9 has no record
        let graph = graph(&[(1, &[2, 9]), (2, &[1])], 1);
        let ranks = RankTable::initial(&graph);

        let aggregate = ContributionReducer::new().reduce(&graph, &ranks).unwrap();

        assert_eq!(aggregate.len(), 2);
        assert_eq!(aggregate.get(2), Ok(0.5));
        assert_eq!(aggregate.get(1), Ok(1.0));
        assert!(aggregate.get(9).is_err());
    }

    #[test]
    fn test_table_from_reordered_graph_is_rekeyed() {
        let first = graph(&[(1, &[2]), (2, &[])], 1);
        let reordered = graph(&[(2, &[]), (1, &[2])], 1);
        let ranks = RankTable::from_entries(&first, vec![(1, 0.5), (2, 2.0)]).unwrap();
        let reducer = ContributionReducer::new();

        let aggregate = reducer.reduce(&reordered, &ranks).unwrap();
        assert_eq!(aggregate.get(2), Ok(0.5));
        assert_eq!(aggregate.get(1), Ok(0.0));

        let emitted = reducer.emit(&reordered, &ranks).unwrap();
        assert_eq!(emitted, vec![Contribution { source: 1, destination: 2, value: 0.5 }]);
    }

    #[test]
    fn test_table_from_other_node_set_is_rejected() {
        let first = graph(&[(1, &[2]), (2, &[])], 1);
        let other = graph(&[(1, &[3]), (3, &[])], 1);
        let ranks = RankTable::initial(&first);
        let reducer = ContributionReducer::new();

        assert_eq!(reducer.reduce(&other, &ranks).unwrap_err(), EngineError::UnknownRankEntry(2));
        assert!(reducer.emit(&other, &ranks).is_err());
    }

    #[test]
    fn test_partitioning_does_not_change_sums() {
        let raw: Vec<(NodeId, Vec<NodeId>)> = (0..50u64)
            .map(|i| (i, vec![(i * 7 + 3) % 50, (i * 11 + 1) % 50, (i + 1) % 50]))
            .collect();
        let build = |partitions| {
            GraphStore::load_partitioned(
                raw.iter().map(|(id, n)| AdjacencyRecord::new(*id, n.clone())),
                partitions,
            )
        };

        let single = build(1);
        let baseline = ContributionReducer::new().reduce(&single, &RankTable::initial(&single)).unwrap();

        for partitions in [2, 3, 8, 50] {
            let split = build(partitions);
            let aggregate = ContributionReducer::new().reduce(&split, &RankTable::initial(&split)).unwrap();
            for (node, value) in baseline.iter() {
                let other = aggregate.get(node).unwrap();
                assert!((value - other).abs() < 1e-9, "node {node}: {value} vs {other}");
            }
        }
    }
}
