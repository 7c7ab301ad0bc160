//! Worst-case domain destruction
//!
//! Searches the topology breadth-first for the largest whole domains that can
//! be destroyed without losing more than `budget` replicas. Within a depth,
//! siblings are interleaved across branches: the first domain of every
//! branch is examined before the second domain of any branch, mirroring the
//! round-robin spread produced by replica placement.
//!
//! The search runs in two passes. Planning walks the tree through shared
//! borrows and records the slot paths of the domains to destroy; applying
//! marks those domains failed.

use crate::topology::{DomainNode, SlotPath};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FailureOutcome {
    /// Replicas lost to the destroyed domains
    pub killed: usize,
    /// Destroyed domains per level, index 0 is depth 1
    pub per_level: Vec<usize>,
}

impl FailureOutcome {
    /// Outcome with nothing destroyed for a topology of `levels` levels
    pub fn none(levels: usize) -> Self {
        Self {
            killed: 0,
            per_level: vec![0; levels],
        }
    }

    /// Total number of whole domains destroyed
    pub fn failed_domains(&self) -> usize {
        self.per_level.iter().sum()
    }
}

/// What the search did with one examined domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceAction {
    /// Destroyed as a whole
    Killed,
    /// Kept, its children are examined at the next depth
    Descended,
    /// Kept, and a leaf so nothing below it is examined
    Passed,
}

impl std::fmt::Display for TraceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceAction::Killed => write!(f, "killed"),
            TraceAction::Descended => write!(f, "descended"),
            TraceAction::Passed => write!(f, "passed"),
        }
    }
}

/// One examined domain, in traversal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub depth: usize,
    pub path: SlotPath,
    pub replica_count: usize,
    pub action: TraceAction,
    /// Budget left after this step
    pub remaining: usize,
}

/// Domains chosen for destruction, not yet applied to a tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailurePlan {
    pub outcome: FailureOutcome,
    pub failed_paths: Vec<SlotPath>,
    pub trace: Vec<TraceStep>,
}

impl FailurePlan {
    /// Mark every planned domain in `root` as failed
    pub fn apply(&self, root: &mut DomainNode) {
        for path in &self.failed_paths {
            if let Some(node) = root.node_at_mut(path) {
                node.failed = true;
            }
        }
    }
}

/// Position in the scan: the `slot`-th child of `parent`
struct Cursor<'a> {
    parent: &'a DomainNode,
    path: SlotPath,
    slot: usize,
}

/// Plan the worst-case destruction of domains at depth `granularity` or deeper.
///
/// A granularity of 0 disables failures.
pub fn plan_failures(root: &DomainNode, granularity: usize, budget: usize) -> FailurePlan {
    let mut plan = FailurePlan {
        outcome: FailureOutcome::none(root.height()),
        ..FailurePlan::default()
    };
    if granularity == 0 || root.is_leaf() {
        return plan;
    }

    let mut remaining = budget;
    let mut current = VecDeque::new();
    let mut next = VecDeque::new();
    // Largest domain passed over at the depth being scanned.
    let mut skipped_level_replica_count = 0;

    current.push_back(Cursor {
        parent: root,
        path: SlotPath::new(),
        slot: 0,
    });

    while remaining > 0 {
        if current.is_empty() {
            if next.is_empty() {
                break;
            }
            std::mem::swap(&mut current, &mut next);
            skipped_level_replica_count = 0;
        }

        let Some(cursor) = current.pop_front() else {
            break;
        };

        // Nothing after an empty parent can hold replicas.
        if cursor.parent.replica_count == 0 {
            break;
        }

        let child = &cursor.parent.children[cursor.slot];
        let mut child_path = cursor.path.clone();
        child_path.push(cursor.slot);

        let action = if child.depth >= granularity
            && child.replica_count <= remaining
            && child.replica_count >= skipped_level_replica_count
        {
            remaining -= child.replica_count;
            plan.outcome.per_level[child.depth - 1] += 1;
            plan.failed_paths.push(child_path.clone());
            debug!(
                depth = child.depth,
                path = ?child_path,
                replicas = child.replica_count,
                remaining,
                "domain destroyed"
            );
            TraceAction::Killed
        } else if !child.is_leaf() {
            next.push_back(Cursor {
                parent: child,
                path: child_path.clone(),
                slot: 0,
            });
            skipped_level_replica_count = skipped_level_replica_count.max(child.replica_count);
            TraceAction::Descended
        } else {
            TraceAction::Passed
        };

        plan.trace.push(TraceStep {
            depth: child.depth,
            path: child_path,
            replica_count: child.replica_count,
            action,
            remaining,
        });

        if cursor.slot + 1 < cursor.parent.children.len() {
            current.push_back(Cursor {
                slot: cursor.slot + 1,
                ..cursor
            });
        }
    }

    plan.outcome.killed = budget - remaining;
    debug!(
        killed = plan.outcome.killed,
        budget,
        domains = plan.failed_paths.len(),
        "failure plan complete"
    );
    plan
}

/// Destroy the worst-case set of domains in `root` and report the losses
pub fn simulate_failure(root: &mut DomainNode, granularity: usize, budget: usize) -> FailureOutcome {
    let plan = plan_failures(root, granularity, budget);
    plan.apply(root);
    plan.outcome
}
