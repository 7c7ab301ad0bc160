//! Simulation pipeline
//!
//! Runs the three phases for one configuration: build the topology, place
//! the replicas of the range, then destroy the worst-case set of domains.
//! Every run owns a freshly built tree.

pub mod failure;

use crate::placement::distribute_replicas;
use crate::topology::{build_topology, DomainNode};
use crate::{Config, Result};
use failure::{plan_failures, FailureOutcome, TraceStep};
use serde::Serialize;
use tracing::{debug, info};

/// Coordinates simulation runs for a configuration
pub struct Simulator {
    config: Config,
}

impl Simulator {
    /// Create a new simulator for the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline at the configured failure granularity
    pub fn run(&self) -> Result<ScenarioReport> {
        self.run_at(self.config.failure_granularity)
    }

    /// Run the full pipeline at every granularity from the outermost level
    /// down to individual nodes
    pub fn sweep(&self) -> Result<Vec<ScenarioReport>> {
        (1..=self.config.level_count())
            .map(|granularity| self.run_at(granularity))
            .collect()
    }

    fn run_at(&self, granularity: usize) -> Result<ScenarioReport> {
        let config = Config {
            failure_granularity: granularity,
            ..self.config.clone()
        };
        config.validate()?;

        let mut tree = build_topology(&config.levels)?;
        distribute_replicas(&mut tree, config.replication_factor);

        let budget = config.allowable_dead();
        let under_replicated = config.is_under_replicated();
        let (outcome, trace) = if under_replicated {
            debug!(
                nodes = config.node_count(),
                replication_factor = config.replication_factor,
                "under-replicated, skipping failure simulation"
            );
            (FailureOutcome::none(config.level_count()), Vec::new())
        } else {
            let plan = plan_failures(&tree, granularity, budget);
            plan.apply(&mut tree);
            (plan.outcome, plan.trace)
        };

        info!(
            granularity,
            killed = outcome.killed,
            budget,
            domains = outcome.failed_domains(),
            "simulation complete"
        );

        Ok(ScenarioReport {
            level_names: config.levels.iter().map(|l| l.name.clone()).collect(),
            replication_factor: config.replication_factor,
            allowable_dead: budget,
            node_count: config.node_count(),
            failure_granularity: granularity,
            under_replicated,
            outcome,
            tree,
            trace,
        })
    }
}

/// Everything a presentation layer needs from one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub level_names: Vec<String>,
    pub replication_factor: usize,
    pub allowable_dead: usize,
    pub node_count: usize,
    pub failure_granularity: usize,
    pub under_replicated: bool,
    pub outcome: FailureOutcome,
    pub tree: DomainNode,
    pub trace: Vec<TraceStep>,
}

impl ScenarioReport {
    /// Replicas left after the destroyed domains are gone
    pub fn surviving_replicas(&self) -> usize {
        self.replication_factor - self.outcome.killed
    }

    /// Replicas needed for a majority
    pub fn quorum_size(&self) -> usize {
        self.replication_factor / 2 + 1
    }

    pub fn quorum_holds(&self) -> bool {
        self.surviving_replicas() >= self.quorum_size()
    }

    /// Total number of whole domains destroyed
    pub fn failed_domain_count(&self) -> usize {
        self.outcome.failed_domains()
    }

    /// Display name of the level at `depth`, 1-based
    pub fn level_name(&self, depth: usize) -> &str {
        depth
            .checked_sub(1)
            .and_then(|i| self.level_names.get(i))
            .map_or("Cluster", String::as_str)
    }
}
