//! End-to-end influence experiment: graph, walk sampling, ranking, spread.

use log::info;

use crate::qw_graph::SocialGraph;
use crate::qw_influence::{identify_influential_nodes_with, InfluenceRanking, OutcomeLength};
use crate::qw_interface::{
    CountsProvider, GraphError, InfluenceError, NodeId, NoOpSink, SpreadSink,
    DEFAULT_SPREAD_STEPS,
};
use crate::qw_spread::{LinearThresholdModel, LoggingSpreadSink, SpreadResult};
use crate::qw_walk::QuantumWalkSampler;

// ============================================================================
// Configuration
// ============================================================================

/// How the social network is built
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphTopology {
    /// Scale-free preferential attachment graph
    BarabasiAlbert {
        nodes: usize,
        attachments: usize,
        #[serde(default = "default_graph_seed")]
        seed: u64,
    },

    /// Line 0-1-...-(n-1)
    Path { nodes: usize },

    /// Cycle over all nodes
    Ring { nodes: usize },

    /// Explicit undirected edge list
    Edges {
        nodes: usize,
        edges: Vec<(usize, usize)>,
    },
}

impl GraphTopology {
    pub fn build(&self) -> Result<SocialGraph, GraphError> {
        match self {
            GraphTopology::BarabasiAlbert {
                nodes,
                attachments,
                seed,
            } => SocialGraph::barabasi_albert(*nodes, *attachments, *seed),
            GraphTopology::Path { nodes } => Ok(SocialGraph::path(*nodes)),
            GraphTopology::Ring { nodes } => SocialGraph::ring(*nodes),
            GraphTopology::Edges { nodes, edges } => SocialGraph::from_edges(*nodes, edges),
        }
    }
}

impl Default for GraphTopology {
    fn default() -> Self {
        GraphTopology::BarabasiAlbert {
            nodes: 10,
            attachments: 2,
            seed: default_graph_seed(),
        }
    }
}

fn default_graph_seed() -> u64 {
    42
}

/// Configuration for one influence experiment
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Social network to analyse
    pub graph: GraphTopology,

    /// Evolution time `t` of the walk
    pub walk_time: f64,

    /// Number of measurement samples
    pub shots: u64,

    /// Number of influential nodes to seed the spread with
    pub top_k: usize,

    /// Rounds of threshold spread
    pub spread_steps: usize,

    /// Bitstring length handling during extraction
    pub outcome_length: OutcomeLength,

    /// Log every activation during spread
    pub log_spread: bool,

    /// Sampling seed (None = generate random)
    #[serde(skip)]
    pub seed: Option<[u8; 32]>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            graph: GraphTopology::default(),
            walk_time: 1.0,
            shots: 1024,
            top_k: 3,
            spread_steps: DEFAULT_SPREAD_STEPS,
            outcome_length: OutcomeLength::Lenient,
            log_spread: false,
            seed: None,
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs the pipeline over a graph built once from the configuration
pub struct ExperimentRunner {
    config: ExperimentConfig,
    graph: SocialGraph,
}

impl ExperimentRunner {
    pub fn new(config: ExperimentConfig) -> Result<Self, InfluenceError> {
        let graph = config.graph.build()?;
        info!(
            "graph built: {} nodes, {} edges",
            graph.num_nodes(),
            graph.num_edges()
        );
        Ok(Self { config, graph })
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run with the seeded quantum walk sampler
    pub fn run(&self) -> Result<ExperimentResult, InfluenceError> {
        let mut sampler =
            QuantumWalkSampler::new(self.config.walk_time, self.config.shots, self.config.seed);
        let seed = sampler.seed_used();
        info!("sampling {} shots at t={}", sampler.shots(), sampler.walk_time());

        let mut result = self.run_with_provider(&mut sampler)?;
        result.seed_used = Some(seed);
        Ok(result)
    }

    /// Run with counts from any provider
    pub fn run_with_provider(
        &self,
        provider: &mut dyn CountsProvider,
    ) -> Result<ExperimentResult, InfluenceError> {
        let counts = provider.sample_counts(&self.graph)?;
        info!(
            "{} shots over {} distinct outcomes",
            counts.total(),
            counts.len()
        );

        let ranking = identify_influential_nodes_with(
            &counts,
            self.graph.num_nodes(),
            self.config.top_k,
            self.config.outcome_length,
        )?;

        let mut logging_sink = LoggingSpreadSink::new(true);
        let mut noop_sink = NoOpSink;
        let sink: &mut dyn SpreadSink = if self.config.log_spread {
            &mut logging_sink
        } else {
            &mut noop_sink
        };

        let spread = LinearThresholdModel::new(&self.graph, self.config.spread_steps)
            .run_with_sink(&ranking.nodes(), sink)?;
        info!(
            "spread from {:?}: {} active after {} rounds",
            ranking.nodes(),
            spread.active_count(),
            spread.rounds_executed
        );

        Ok(ExperimentResult {
            seed_used: None,
            num_nodes: self.graph.num_nodes(),
            num_edges: self.graph.num_edges(),
            walk_time: self.config.walk_time,
            shots: counts.total(),
            ranking,
            spread,
        })
    }
}

// ============================================================================
// Results
// ============================================================================

/// Output of one experiment
#[derive(Debug, Clone)]
pub struct ExperimentResult {
    /// Sampling seed, when the walk sampler was used
    pub seed_used: Option<[u8; 32]>,

    pub num_nodes: usize,
    pub num_edges: usize,
    pub walk_time: f64,

    /// Total samples the ranking was derived from
    pub shots: u64,

    pub ranking: InfluenceRanking,
    pub spread: SpreadResult,
}

impl ExperimentResult {
    pub fn influential_nodes(&self) -> Vec<NodeId> {
        self.ranking.nodes()
    }

    pub fn influence_scores(&self) -> Vec<f64> {
        self.ranking.scores()
    }

    /// Nodes active at the end of the spread
    pub fn influence_spread(&self) -> usize {
        self.spread.active_count()
    }

    /// The three headline lines of a run
    pub fn print_headline(&self) {
        let nodes: Vec<usize> = self.influential_nodes().iter().map(|n| n.index()).collect();
        println!("Influential nodes: {:?}", nodes);
        println!("Influence scores: {:?}", self.influence_scores());
        println!(
            "Influence spread: {} nodes activated",
            self.influence_spread()
        );
    }

    /// Print a summary of the experiment results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        Quantum Walk Influence Results                  ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration:");
        if let Some(seed) = self.seed_used {
            println!("  Seed: {:?}", seed);
        }
        println!("  Graph: {} nodes, {} edges", self.num_nodes, self.num_edges);
        println!("  Walk time: {}", self.walk_time);
        println!("  Shots: {}\n", self.shots);

        println!("Walk Probabilities:");
        let max = self
            .ranking
            .probabilities
            .iter()
            .cloned()
            .fold(0.0_f64, f64::max);
        let influential = self.influential_nodes();
        for (i, &p) in self.ranking.probabilities.iter().enumerate() {
            let width = if max > 0.0 {
                (p / max * 40.0).round() as usize
            } else {
                0
            };
            let marker = if influential.contains(&NodeId(i)) {
                '*'
            } else {
                ' '
            };
            println!("  {:>3}{} {:>6.4} {}", i, marker, p, "█".repeat(width));
        }
        println!();

        println!("Spread:");
        println!("  Rounds executed: {}", self.spread.rounds_executed);
        println!("  Active per round: {:?}", self.spread.active_per_round);
        if let Some(round) = self.spread.converged_at {
            println!("  Converged at round {}", round);
        }
        println!();

        self.print_headline();
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qw_interface::OutcomeCounts;
    use crate::qw_walk::{one_hot, FixedCounts};

    #[test]
    fn test_default_run_is_reproducible() {
        let config = ExperimentConfig {
            seed: Some([42u8; 32]),
            ..Default::default()
        };
        let runner = ExperimentRunner::new(config.clone()).unwrap();
        let a = runner.run().unwrap();
        let b = ExperimentRunner::new(config).unwrap().run().unwrap();

        assert_eq!(a.seed_used, Some([42u8; 32]));
        assert_eq!(a.shots, 1024);
        assert_eq!(a.influential_nodes(), b.influential_nodes());
        assert_eq!(a.influence_spread(), b.influence_spread());
        assert_eq!(a.influential_nodes().len(), 3);
        assert!(a.influence_spread() >= 3);

        let total: f64 = a.ranking.probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_injected_counts_drive_seeds() {
        let config = ExperimentConfig {
            graph: GraphTopology::Path { nodes: 4 },
            top_k: 1,
            ..Default::default()
        };
        let runner = ExperimentRunner::new(config).unwrap();

        let counts: OutcomeCounts = vec![(one_hot(0, 4), 9), (one_hot(3, 4), 1)]
            .into_iter()
            .collect();
        let result = runner.run_with_provider(&mut FixedCounts(counts)).unwrap();

        assert_eq!(result.seed_used, None);
        assert_eq!(result.influential_nodes(), vec![NodeId(0)]);
        assert_eq!(result.influence_scores(), vec![0.9]);
        assert_eq!(result.influence_spread(), 4);
    }

    #[test]
    fn test_top_k_above_node_count_aborts() {
        let config = ExperimentConfig {
            graph: GraphTopology::Path { nodes: 3 },
            top_k: 5,
            seed: Some([1u8; 32]),
            ..Default::default()
        };
        let runner = ExperimentRunner::new(config).unwrap();
        assert!(matches!(
            runner.run(),
            Err(InfluenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_counts_abort_with_division_error() {
        let runner = ExperimentRunner::new(ExperimentConfig::default()).unwrap();
        let result = runner.run_with_provider(&mut FixedCounts(OutcomeCounts::new()));
        assert_eq!(result.unwrap_err(), InfluenceError::DivisionError);
    }

    #[test]
    fn test_graph_errors_propagate() {
        let config = ExperimentConfig {
            graph: GraphTopology::Edges {
                nodes: 2,
                edges: vec![(0, 5)],
            },
            ..Default::default()
        };
        assert_eq!(
            ExperimentRunner::new(config).err(),
            Some(InfluenceError::Graph(GraphError::NodeOutOfRange {
                node: 5,
                num_nodes: 2
            }))
        );
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
graph:
  type: edges
  nodes: 3
  edges: [[0, 1], [1, 2]]
walk_time: 0.5
top_k: 2
outcome_length: exact
"#;
        let config: ExperimentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.graph,
            GraphTopology::Edges {
                nodes: 3,
                edges: vec![(0, 1), (1, 2)]
            }
        );
        assert_eq!(config.walk_time, 0.5);
        assert_eq!(config.top_k, 2);
        assert_eq!(config.outcome_length, OutcomeLength::Exact);
        // untouched fields keep defaults
        assert_eq!(config.shots, 1024);
        assert_eq!(config.spread_steps, 3);
    }

    #[test]
    fn test_barabasi_albert_seed_defaults() {
        let yaml = "graph:\n  type: barabasi_albert\n  nodes: 20\n  attachments: 3\n";
        let config: ExperimentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.graph,
            GraphTopology::BarabasiAlbert {
                nodes: 20,
                attachments: 3,
                seed: 42
            }
        );
    }
}
