//! Replica placement
//!
//! Spreads the replicas of one range over the topology, top-down. At every
//! node the replicas are split as evenly as possible between its children,
//! with the remainder going to the leftmost children.

use crate::topology::DomainNode;

/// Replicas that may be lost while a majority of `replication_factor` survives
pub fn allowable_dead(replication_factor: usize) -> usize {
    replication_factor / 2
}

/// Assign `replicas` to `node` and spread them over its subtree
pub fn distribute_replicas(node: &mut DomainNode, replicas: usize) {
    node.replica_count = replicas;

    let n = node.children.len();
    if n == 0 {
        return;
    }

    let base = replicas / n;
    let rem = replicas % n;
    for (i, child) in node.children.iter_mut().enumerate() {
        let share = if i < rem { base + 1 } else { base };
        // Shares never increase left to right.
        if share == 0 {
            break;
        }
        distribute_replicas(child, share);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{build_topology, LevelSpec};

    fn tree(counts: &[usize]) -> DomainNode {
        let levels: Vec<LevelSpec> = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| LevelSpec::unnamed(i + 1, c))
            .collect();
        build_topology(&levels).unwrap()
    }

    fn check_conservation(node: &DomainNode) {
        if node.is_leaf() {
            return;
        }
        let sum: usize = node.children.iter().map(|c| c.replica_count).sum();
        assert_eq!(sum, node.replica_count);

        let max = node.children.iter().map(|c| c.replica_count).max().unwrap();
        let min = node.children.iter().map(|c| c.replica_count).min().unwrap();
        assert!(max - min <= 1);

        for child in &node.children {
            check_conservation(child);
        }
    }

    #[test]
    fn test_allowable_dead() {
        assert_eq!(allowable_dead(1), 0);
        assert_eq!(allowable_dead(3), 1);
        assert_eq!(allowable_dead(5), 2);
        assert_eq!(allowable_dead(99), 49);
    }

    #[test]
    fn test_leftmost_bias() {
        let mut root = tree(&[3, 3, 3, 3]);
        distribute_replicas(&mut root, 5);

        let regions: Vec<usize> = root.children.iter().map(|c| c.replica_count).collect();
        assert_eq!(regions, vec![2, 2, 1]);

        let dcs: Vec<usize> = root.children[0].children.iter().map(|c| c.replica_count).collect();
        assert_eq!(dcs, vec![1, 1, 0]);

        let dcs: Vec<usize> = root.children[2].children.iter().map(|c| c.replica_count).collect();
        assert_eq!(dcs, vec![1, 0, 0]);

        check_conservation(&root);
    }

    #[test]
    fn test_more_replicas_than_children() {
        let mut root = tree(&[2, 2]);
        distribute_replicas(&mut root, 7);

        let regions: Vec<usize> = root.children.iter().map(|c| c.replica_count).collect();
        assert_eq!(regions, vec![4, 3]);
        let nodes: Vec<usize> = root.children[1].children.iter().map(|c| c.replica_count).collect();
        assert_eq!(nodes, vec![2, 1]);
        check_conservation(&root);
    }

    #[test]
    fn test_zero_share_subtrees_untouched() {
        let mut root = tree(&[5, 3]);
        distribute_replicas(&mut root, 3);

        for region in &root.children[3..] {
            assert_eq!(region.replica_count, 0);
            assert!(region.children.iter().all(|n| n.replica_count == 0));
        }
        let leaves_with_replicas = root
            .descendants()
            .into_iter()
            .filter(|n| n.is_leaf() && n.replica_count > 0)
            .count();
        assert_eq!(leaves_with_replicas, 3);
    }

    #[test]
    fn test_conservation_across_shapes() {
        let shapes: [&[usize]; 5] = [&[1], &[3, 3], &[4, 1, 2], &[2, 3, 2, 5], &[10, 10, 100]];
        for counts in shapes {
            for replicas in [1, 3, 7, 15, 99] {
                let mut root = tree(counts);
                distribute_replicas(&mut root, replicas);
                assert_eq!(root.replica_count, replicas);
                check_conservation(&root);
            }
        }
    }
}
