//! Failure Domains
//!
//! Offline model of a cluster laid out as nested failure domains
//! (region, data center, availability zone, node). Places the replicas of a
//! single range across the topology and computes the worst-case set of whole
//! domains that can be destroyed while a quorum of replicas survives.

pub mod error;
pub mod placement;
pub mod report;
pub mod simulation;
pub mod topology;

pub use error::{Error, Result};
pub use placement::{allowable_dead, distribute_replicas};
pub use simulation::failure::{simulate_failure, FailureOutcome};
pub use simulation::{ScenarioReport, Simulator};
pub use topology::{build_topology, DomainNode, LevelSpec};

/// Maximum number of nested levels a topology may have
pub const MAX_LEVELS: usize = 5;
/// Upper bound on domains per parent for every level but the last
pub const MAX_DOMAINS_PER_PARENT: usize = 10;
/// Upper bound on nodes per parent at the leaf level
pub const MAX_NODES_PER_PARENT: usize = 100;
/// Upper bound on the replication factor
pub const MAX_REPLICATION_FACTOR: usize = 99;

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Topology shape, outermost level first
    pub levels: Vec<LevelSpec>,
    /// Number of replicas of the range
    pub replication_factor: usize,
    /// Shallowest depth at which whole domains may be destroyed (0 disables failures)
    pub failure_granularity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelSpec::new("Region", 3),
                LevelSpec::new("Data Center", 3),
                LevelSpec::new("Availability Zone", 3),
                LevelSpec::new("Node", 3),
            ],
            replication_factor: 3,
            failure_granularity: 1,
        }
    }
}

impl Config {
    /// Create a new configuration
    pub fn new(levels: Vec<LevelSpec>, replication_factor: usize, failure_granularity: usize) -> Self {
        Self {
            levels,
            replication_factor,
            failure_granularity,
        }
    }

    /// Clamp child counts and fix the replication factor parity.
    ///
    /// `previous_replication_factor` decides which way an even factor is
    /// nudged: down when the request is lower than the previous value, up
    /// otherwise.
    pub fn normalized(&self, previous_replication_factor: usize) -> Self {
        let last = self.levels.len().saturating_sub(1);
        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(i, level)| LevelSpec {
                name: level.name.clone(),
                child_count: clamp_child_count(level.child_count, i == last),
            })
            .collect();

        Self {
            levels,
            replication_factor: adjust_replication_factor(
                previous_replication_factor,
                self.replication_factor,
            ),
            failure_granularity: self.failure_granularity.min(self.levels.len()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        topology::validate_shape(&self.levels)?;
        if self.replication_factor == 0
            || self.replication_factor > MAX_REPLICATION_FACTOR
            || self.replication_factor % 2 == 0
        {
            return Err(Error::InvalidReplicationFactor(self.replication_factor));
        }
        if self.failure_granularity > self.levels.len() {
            return Err(Error::InvalidGranularity {
                granularity: self.failure_granularity,
                levels: self.levels.len(),
            });
        }
        Ok(())
    }

    /// Number of nested levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total number of leaf nodes in the topology
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(|l| l.child_count).product()
    }

    /// Replicas that may be lost while a majority survives
    pub fn allowable_dead(&self) -> usize {
        allowable_dead(self.replication_factor)
    }

    /// True when there are fewer nodes than replicas to place
    pub fn is_under_replicated(&self) -> bool {
        self.node_count() < self.replication_factor
    }
}

/// Clamp a per-parent domain count to the allowed range for its level
pub fn clamp_child_count(count: usize, is_leaf_level: bool) -> usize {
    let max = if is_leaf_level {
        MAX_NODES_PER_PARENT
    } else {
        MAX_DOMAINS_PER_PARENT
    };
    count.clamp(1, max)
}

/// Force a requested replication factor to be odd and within bounds.
///
/// An even request moves one step away from the previous value, so stepping
/// down from 5 to 4 lands on 3 and stepping up from 3 to 4 lands on 5.
pub fn adjust_replication_factor(previous: usize, requested: usize) -> usize {
    let mut value = requested;
    if value % 2 == 0 {
        if previous > value {
            value = value.saturating_sub(1);
        } else {
            value += 1;
        }
    }
    value.clamp(1, MAX_REPLICATION_FACTOR)
}
