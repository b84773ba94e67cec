//! # qw_rust - Quantum Walk Influence Maximization
//!
//! Ranks the nodes of a social network by where a continuous-time quantum
//! walker is likely to be found, then measures how far a linear-threshold
//! influence process spreads from the top-ranked nodes.
//!
//! ## Core Components
//!
//! - **SocialGraph**: undirected graph with Barabási–Albert, path, ring and edge-list builders
//! - **WalkOperator / QuantumWalkSampler**: `exp(-iAt)` evolution and seeded measurement counts
//! - **identify_influential_nodes**: per-node probabilities and top-k selection from counts
//! - **LinearThresholdModel / simulate_influence**: synchronous threshold spread
//! - **ExperimentRunner**: the full pipeline driven by an `ExperimentConfig`
//!
//! ```no_run
//! use qw_rust::{ExperimentConfig, ExperimentRunner};
//!
//! let config = ExperimentConfig {
//!     seed: Some([42u8; 32]),
//!     ..Default::default()
//! };
//! let runner = ExperimentRunner::new(config).unwrap();
//! let result = runner.run().unwrap();
//! result.print_headline();
//! ```
//!
//! Counts can come from anywhere implementing [`CountsProvider`]; use
//! [`qw_walk::FixedCounts`] to feed recorded or hand-written histograms.

pub mod qw_experiment;
pub mod qw_graph;
pub mod qw_influence;
pub mod qw_interface;
pub mod qw_spread;
pub mod qw_walk;

// Re-export commonly used types
pub use qw_experiment::{ExperimentConfig, ExperimentResult, ExperimentRunner, GraphTopology};
pub use qw_graph::SocialGraph;
pub use qw_influence::{
    extract_probabilities, identify_influential_nodes, select_top_k, InfluenceRanking,
    OutcomeLength,
};
pub use qw_interface::{
    CountsProvider, GraphError, InfluenceError, NoOpSink, NodeId, OutcomeCounts, SpreadEvent,
    SpreadSink, ACTIVATION_THRESHOLD, DEFAULT_SPREAD_STEPS,
};
pub use qw_spread::{simulate_influence, LinearThresholdModel, SpreadResult};
pub use qw_walk::{QuantumWalkSampler, WalkOperator};
