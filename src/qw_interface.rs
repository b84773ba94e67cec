use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Fraction of active neighbours at which an inactive node activates
pub const ACTIVATION_THRESHOLD: f64 = 0.3;

/// Rounds run by the spread simulation when none are given
pub const DEFAULT_SPREAD_STEPS: usize = 3;

// ============================================================================
// Node identity
// ============================================================================

/// Index of a node in a `SocialGraph` (0..n-1).
///
/// Both the probability extractor and the spread simulation speak in
/// `NodeId`s, so a ranking can be fed straight back in as seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Outcome counts
// ============================================================================

/// Histogram of sampled measurement bitstrings.
///
/// Character `i` of a bitstring refers to node `i`. Keys are kept ordered so
/// iteration (and therefore floating point accumulation) is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    counts: BTreeMap<String, u64>,
}

impl OutcomeCounts {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Add `count` observations of `outcome`
    pub fn record(&mut self, outcome: impl Into<String>, count: u64) {
        *self.counts.entry(outcome.into()).or_insert(0) += count;
    }

    pub fn get(&self, outcome: &str) -> Option<u64> {
        self.counts.get(outcome).copied()
    }

    /// Sum of all counts (the number of shots drawn)
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = OutcomeCounts::new();
        for (outcome, count) in iter {
            counts.record(outcome, count);
        }
        counts
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failures while building a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Edge endpoint is not a node of the graph
    NodeOutOfRange { node: usize, num_nodes: usize },

    /// Edge from a node to itself
    SelfLoop { node: usize },

    /// Generator parameters cannot produce a graph
    InvalidParameters(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NodeOutOfRange { node, num_nodes } => {
                write!(f, "node {} out of range for graph with {} nodes", node, num_nodes)
            }
            GraphError::SelfLoop { node } => write!(f, "self-loop on node {}", node),
            GraphError::InvalidParameters(msg) => write!(f, "invalid graph parameters: {}", msg),
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors that abort an influence run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfluenceError {
    /// Caller-supplied value outside the accepted domain
    InvalidArgument(String),

    /// Outcome counts sum to zero, so probabilities are undefined
    DivisionError,

    /// Graph construction failed
    Graph(GraphError),
}

impl fmt::Display for InfluenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfluenceError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            InfluenceError::DivisionError => {
                write!(f, "total sample count is zero; probabilities are undefined")
            }
            InfluenceError::Graph(err) => write!(f, "graph error: {}", err),
        }
    }
}

impl std::error::Error for InfluenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InfluenceError::Graph(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GraphError> for InfluenceError {
    fn from(err: GraphError) -> Self {
        InfluenceError::Graph(err)
    }
}

// ============================================================================
// Counts provider
// ============================================================================

/// Source of measurement outcome counts for a graph.
///
/// The quantum walk sampler is one implementation; tests inject fixed counts.
pub trait CountsProvider {
    fn sample_counts(
        &mut self,
        graph: &crate::qw_graph::SocialGraph,
    ) -> Result<OutcomeCounts, InfluenceError>;
}

// ============================================================================
// Spread events
// ============================================================================

/// Events emitted while the threshold model runs
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadEvent {
    /// Node crossed the threshold this round
    NodeActivated {
        node: NodeId,
        active_neighbors: usize,
        degree: usize,
    },
    /// Round finished and its activations were applied
    RoundCompleted {
        newly_active: usize,
        total_active: usize,
    },
}

/// Trait for consuming events from the spread simulation
pub trait SpreadSink {
    fn log(&mut self, round: usize, event: SpreadEvent);
}

/// No-op spread sink
pub struct NoOpSink;

impl SpreadSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _round: usize, _event: SpreadEvent) {}
}
