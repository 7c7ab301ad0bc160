//! Topology construction
//!
//! A topology is an ordered list of levels, outermost first. Each level says
//! how many domains every parent at the level above owns. Building a topology
//! produces a tree rooted at a synthetic sentinel node at depth 0.

pub mod node;

pub use node::{DomainNode, SlotPath};

use crate::{Error, Result, MAX_LEVELS};
use serde::{Deserialize, Serialize};

/// One level of the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Display label, e.g. "Region"
    pub name: String,
    /// Domains per parent at this level
    pub child_count: usize,
}

impl LevelSpec {
    pub fn new(name: impl Into<String>, child_count: usize) -> Self {
        Self {
            name: name.into(),
            child_count,
        }
    }

    /// Level with a generic label, numbered from 1
    pub fn unnamed(level: usize, child_count: usize) -> Self {
        Self::new(format!("Level {}", level), child_count)
    }
}

/// Check the structural bounds of a topology.
///
/// Only the lower bound on child counts is checked here; the per-level upper
/// bounds are applied by the caller when it clamps raw input.
pub fn validate_shape(levels: &[LevelSpec]) -> Result<()> {
    if levels.is_empty() || levels.len() > MAX_LEVELS {
        return Err(Error::InvalidTopologyShape(format!(
            "expected 1 to {} levels, got {}",
            MAX_LEVELS,
            levels.len()
        )));
    }
    if let Some((i, level)) = levels.iter().enumerate().find(|(_, l)| l.child_count == 0) {
        return Err(Error::InvalidTopologyShape(format!(
            "level {} ({}) must have at least one domain per parent",
            i + 1,
            level.name
        )));
    }
    Ok(())
}

/// Build the full domain tree for `levels` and return its sentinel root
pub fn build_topology(levels: &[LevelSpec]) -> Result<DomainNode> {
    validate_shape(levels)?;

    let root = build_subtree(levels, 0, 1);
    tracing::debug!(
        levels = levels.len(),
        leaves = root.leaf_count(),
        "built topology"
    );
    Ok(root)
}

fn build_subtree(levels: &[LevelSpec], depth: usize, index: usize) -> DomainNode {
    let mut node = DomainNode::new(depth, index);
    if let Some(level) = levels.get(depth) {
        node.children = (1..=level.child_count)
            .map(|i| build_subtree(levels, depth + 1, i))
            .collect();
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(counts: &[usize]) -> Vec<LevelSpec> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| LevelSpec::unnamed(i + 1, c))
            .collect()
    }

    #[test]
    fn test_build_depth_and_counts() {
        let root = build_topology(&shape(&[3, 2, 4])).unwrap();

        assert_eq!(root.depth, 0);
        assert_eq!(root.height(), 3);
        assert_eq!(root.node_count_at_depth(1), 3);
        assert_eq!(root.node_count_at_depth(2), 6);
        assert_eq!(root.node_count_at_depth(3), 24);
        assert_eq!(root.leaf_count(), 24);
    }

    #[test]
    fn test_children_are_indexed_from_one() {
        let root = build_topology(&shape(&[3, 2])).unwrap();

        let indexes: Vec<usize> = root.children.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        for region in &root.children {
            assert_eq!(region.depth, 1);
            assert_eq!(region.children.len(), 2);
            for node in &region.children {
                assert_eq!(node.depth, 2);
                assert!(node.is_leaf());
                assert_eq!(node.replica_count, 0);
                assert!(!node.failed);
            }
        }
    }

    #[test]
    fn test_single_level() {
        let root = build_topology(&shape(&[1])).unwrap();
        assert_eq!(root.children.len(), 1);
        assert!(root.children[0].is_leaf());
        assert_eq!(root.height(), 1);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            build_topology(&[]),
            Err(Error::InvalidTopologyShape(_))
        ));
        assert!(matches!(
            build_topology(&shape(&[1, 1, 1, 1, 1, 1])),
            Err(Error::InvalidTopologyShape(_))
        ));
        assert!(matches!(
            build_topology(&shape(&[3, 0, 3])),
            Err(Error::InvalidTopologyShape(_))
        ));
    }

    #[test]
    fn test_upper_bounds_not_enforced() {
        let root = build_topology(&shape(&[12, 150])).unwrap();
        assert_eq!(root.leaf_count(), 1800);
    }
}
