//! Linear threshold influence spread.
//!
//! Each round, an inactive node activates once at least
//! [`ACTIVATION_THRESHOLD`] of its neighbours are active. Decisions in a
//! round all read the active set from the start of that round; activations
//! land together at round end. Active nodes never deactivate.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::qw_graph::SocialGraph;
use crate::qw_interface::{
    InfluenceError, NodeId, NoOpSink, SpreadEvent, SpreadSink, ACTIVATION_THRESHOLD,
};

/// Outcome of a spread simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadResult {
    /// Nodes active after the last round
    pub active: BTreeSet<NodeId>,

    /// Active-set size after each executed round
    pub active_per_round: Vec<usize>,

    /// Rounds actually run (may stop early at a fixpoint)
    pub rounds_executed: usize,

    /// First round in which nothing activated
    pub converged_at: Option<usize>,
}

impl SpreadResult {
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Threshold spread model over a borrowed graph
pub struct LinearThresholdModel<'g> {
    graph: &'g SocialGraph,
    steps: usize,
}

impl<'g> LinearThresholdModel<'g> {
    pub fn new(graph: &'g SocialGraph, steps: usize) -> Self {
        Self { graph, steps }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run from `seeds` without event reporting
    pub fn run(&self, seeds: &[NodeId]) -> Result<SpreadResult, InfluenceError> {
        self.run_with_sink(seeds, &mut NoOpSink)
    }

    pub fn run_with_sink(
        &self,
        seeds: &[NodeId],
        sink: &mut dyn SpreadSink,
    ) -> Result<SpreadResult, InfluenceError> {
        if let Some(bad) = seeds.iter().find(|&&s| !self.graph.contains(s)) {
            return Err(InfluenceError::InvalidArgument(format!(
                "seed node {} not in graph with {} nodes",
                bad,
                self.graph.num_nodes()
            )));
        }

        let mut active: BTreeSet<NodeId> = seeds.iter().copied().collect();
        let mut active_per_round = Vec::with_capacity(self.steps);
        let mut converged_at = None;

        for round in 1..=self.steps {
            let newly_active = self.activation_round(&active, round, sink);
            let count = newly_active.len();
            active.extend(newly_active);
            active_per_round.push(active.len());

            sink.log(
                round,
                SpreadEvent::RoundCompleted {
                    newly_active: count,
                    total_active: active.len(),
                },
            );

            if count == 0 {
                // monotone rule: nothing can change after a quiet round
                converged_at = Some(round);
                debug!("spread reached fixpoint at round {}", round);
                break;
            }
        }

        let rounds_executed = active_per_round.len();
        Ok(SpreadResult {
            active,
            active_per_round,
            rounds_executed,
            converged_at,
        })
    }

    // nodes that cross the threshold given the active set at round start
    fn activation_round(
        &self,
        active: &BTreeSet<NodeId>,
        round: usize,
        sink: &mut dyn SpreadSink,
    ) -> Vec<NodeId> {
        let mut newly_active = Vec::new();
        for node in self.graph.nodes().filter(|n| !active.contains(n)) {
            let degree = self.graph.degree(node);
            let active_neighbors = self
                .graph
                .neighbors(node)
                .filter(|n| active.contains(n))
                .count();

            if active_neighbors as f64 / degree.max(1) as f64 >= ACTIVATION_THRESHOLD {
                sink.log(
                    round,
                    SpreadEvent::NodeActivated {
                        node,
                        active_neighbors,
                        degree,
                    },
                );
                newly_active.push(node);
            }
        }
        newly_active
    }
}

/// Number of active nodes after `steps` rounds seeded by `seeds`
pub fn simulate_influence(
    graph: &SocialGraph,
    seeds: &[NodeId],
    steps: usize,
) -> Result<usize, InfluenceError> {
    let result = LinearThresholdModel::new(graph, steps).run(seeds)?;
    Ok(result.active_count())
}

/// Sink writing spread events to the `log` facade
pub struct LoggingSpreadSink {
    enabled: bool,
}

impl LoggingSpreadSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SpreadSink for LoggingSpreadSink {
    fn log(&mut self, round: usize, event: SpreadEvent) {
        if !self.enabled {
            return;
        }

        match event {
            SpreadEvent::NodeActivated {
                node,
                active_neighbors,
                degree,
            } => {
                debug!(
                    "{} activate: n:{} ({}/{} neighbours active)",
                    round, node, active_neighbors, degree
                );
            }
            SpreadEvent::RoundCompleted {
                newly_active,
                total_active,
            } => {
                info!("{} round: +{} active:{}", round, newly_active, total_active);
            }
        }
    }
}
