//! Shared utilities for the rank engine
//!
//! Provides the dense node index shared by the graph store and every rank
//! table, and the contiguous partitions that parallel workers operate on.

use rustc_hash::FxHashMap;
use std::ops::Range;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// Dense, integer-indexed view of the node identifiers known to a graph.
///
/// Slots run `0..len()` in first-seen order. The index is built once and
/// shared read-only (behind an `Arc`) by the graph and all rank tables
/// derived from it.
#[derive(Debug, Default)]
pub struct NodeIndex {
    /// Mapping from dense slot (0..N) back to NodeId
    index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense slot
    node_to_index: FxHashMap<NodeId, usize>,
}

impl NodeIndex {
    /// Register `id` if unseen. Returns the slot and whether it was new.
    pub(crate) fn insert(&mut self, id: NodeId) -> (usize, bool) {
        if let Some(&slot) = self.node_to_index.get(&id) {
            return (slot, false);
        }
        let slot = self.index_to_node.len();
        self.index_to_node.push(id);
        self.node_to_index.insert(id, slot);
        (slot, true)
    }

    /// Dense slot of a node, if known
    pub fn slot(&self, id: NodeId) -> Option<usize> {
        self.node_to_index.get(&id).copied()
    }

    /// NodeId stored at a dense slot
    pub fn node(&self, slot: usize) -> NodeId {
        self.index_to_node[slot]
    }

    /// All identifiers in slot order
    pub fn nodes(&self) -> &[NodeId] {
        &self.index_to_node
    }

    pub fn len(&self) -> usize {
        self.index_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_node.is_empty()
    }
}

/// A contiguous run of dense node slots processed by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Position of this partition in the graph's partition list
    pub id: usize,
    /// Dense slots owned by this partition
    pub slots: Range<usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Split `0..offsets.len()-1` into at most `count` contiguous partitions of
/// roughly equal edge volume.
///
/// `offsets` is a CSR offset array (size = node_count + 1). Every node costs
/// at least one unit so that edge-free stretches still spread across workers.
/// Always returns at least one partition, and never an empty one unless the
/// graph itself is empty.
pub(crate) fn split_by_volume(offsets: &[usize], count: usize) -> Vec<Partition> {
    let node_count = offsets.len().saturating_sub(1);
    if node_count == 0 {
        return vec![Partition { id: 0, slots: 0..0 }];
    }

    let count = count.clamp(1, node_count);
    let total = offsets[node_count] + node_count;
    let target = total.div_ceil(count);

    let mut partitions = Vec::with_capacity(count);
    let mut start = 0;
    let mut volume = 0;

    for slot in 0..node_count {
        volume += offsets[slot + 1] - offsets[slot] + 1;
        let remaining_nodes = node_count - slot - 1;
        let remaining_parts = count - partitions.len() - 1;
        let full = volume >= target && partitions.len() + 1 < count;
        // Leave at least one node for every partition still to be opened
        let forced = remaining_nodes == remaining_parts && remaining_parts > 0;
        if full || forced {
            partitions.push(Partition { id: partitions.len(), slots: start..slot + 1 });
            start = slot + 1;
            volume = 0;
        }
    }
    if start < node_count {
        partitions.push(Partition { id: partitions.len(), slots: start..node_count });
    }

    partitions
}
