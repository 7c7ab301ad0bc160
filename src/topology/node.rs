//! Domain node implementation
//!
//! Every level of the topology, including the synthetic root, uses the same
//! node type; only `depth` tells a region apart from a rack or a node.

use serde::{Deserialize, Serialize};

/// Sequence of 0-based child slots leading from the root to a node
pub type SlotPath = Vec<usize>;

/// A failure domain and the replicas placed beneath it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainNode {
    /// 0 for the root, 1..=level count for real domains
    pub depth: usize,
    /// 1-based position among siblings
    pub index: usize,
    /// Replicas of the range held in this subtree
    pub replica_count: usize,
    /// Whether the whole domain was destroyed by a simulation run
    pub failed: bool,
    pub children: Vec<DomainNode>,
}

impl DomainNode {
    /// Create an empty, healthy node with no children
    pub fn new(depth: usize, index: usize) -> Self {
        Self {
            depth,
            index,
            replica_count: 0,
            failed: false,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels below this node
    pub fn height(&self) -> usize {
        self.children.first().map_or(0, |c| 1 + c.height())
    }

    /// Child at a 0-based slot
    pub fn child(&self, slot: usize) -> Option<&DomainNode> {
        self.children.get(slot)
    }

    /// Follow a slot path down from this node
    pub fn node_at(&self, path: &[usize]) -> Option<&DomainNode> {
        path.iter().try_fold(self, |node, &slot| node.children.get(slot))
    }

    /// Follow a slot path down from this node, mutably
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut DomainNode> {
        path.iter()
            .try_fold(self, |node, &slot| node.children.get_mut(slot))
    }

    /// Number of nodes at an absolute depth within this subtree
    pub fn node_count_at_depth(&self, depth: usize) -> usize {
        if depth == self.depth {
            1
        } else if depth < self.depth {
            0
        } else {
            self.children
                .iter()
                .map(|c| c.node_count_at_depth(depth))
                .sum()
        }
    }

    /// Number of leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(|c| c.leaf_count()).sum()
        }
    }

    /// Pre-order walk over this node and all of its descendants
    pub fn descendants(&self) -> Vec<&DomainNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }
        nodes
    }

    /// Failed domains that have no failed ancestor, in pre-order
    pub fn failed_domains(&self) -> Vec<&DomainNode> {
        if self.failed {
            return vec![self];
        }
        self.children
            .iter()
            .flat_map(|c| c.failed_domains())
            .collect()
    }

    /// Clear failure marks in this subtree
    pub fn clear_failures(&mut self) {
        self.failed = false;
        for child in &mut self.children {
            child.clear_failures();
        }
    }
}
