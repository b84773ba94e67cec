//! Undirected social-network graph and generators.

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::qw_interface::{GraphError, NodeId};

/// Undirected graph over nodes `0..n-1`, no self-loops or parallel edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialGraph {
    adjacency: Vec<BTreeSet<usize>>,
    num_edges: usize,
}

impl SocialGraph {
    /// Graph with `num_nodes` nodes and no edges
    pub fn empty(num_nodes: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); num_nodes],
            num_edges: 0,
        }
    }

    /// Build from an explicit edge list. Repeated edges are merged.
    pub fn from_edges(num_nodes: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = Self::empty(num_nodes);
        for &(a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Path 0-1-...-(n-1)
    pub fn path(num_nodes: usize) -> Self {
        let mut graph = Self::empty(num_nodes);
        for i in 1..num_nodes {
            graph.insert_edge(i - 1, i);
        }
        graph
    }

    /// Cycle over `num_nodes` nodes. Needs at least 3 nodes.
    pub fn ring(num_nodes: usize) -> Result<Self, GraphError> {
        if num_nodes < 3 {
            return Err(GraphError::InvalidParameters(format!(
                "ring needs at least 3 nodes, got {}",
                num_nodes
            )));
        }
        let mut graph = Self::path(num_nodes);
        graph.insert_edge(num_nodes - 1, 0);
        Ok(graph)
    }

    /// Scale-free graph by preferential attachment.
    ///
    /// Starts from a star on `attachments + 1` nodes; every later node links to
    /// `attachments` distinct existing nodes picked proportionally to degree.
    pub fn barabasi_albert(
        num_nodes: usize,
        attachments: usize,
        seed: u64,
    ) -> Result<Self, GraphError> {
        if attachments < 1 || attachments >= num_nodes {
            return Err(GraphError::InvalidParameters(format!(
                "barabasi_albert needs 1 <= attachments < nodes, got attachments={} nodes={}",
                attachments, num_nodes
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Self::empty(num_nodes);

        // initial star, hub 0
        for leaf in 1..=attachments {
            graph.insert_edge(0, leaf);
        }

        // every node appears once per incident edge
        let mut repeated: Vec<usize> = Vec::new();
        for node in 0..=attachments {
            repeated.extend(std::iter::repeat(node).take(graph.degree(NodeId(node))));
        }

        for source in (attachments + 1)..num_nodes {
            let mut targets = BTreeSet::new();
            while targets.len() < attachments {
                if let Some(&pick) = repeated.choose(&mut rng) {
                    targets.insert(pick);
                }
            }
            for &target in &targets {
                graph.insert_edge(source, target);
                repeated.push(target);
            }
            repeated.extend(std::iter::repeat(source).take(attachments));
        }

        Ok(graph)
    }

    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<(), GraphError> {
        let num_nodes = self.num_nodes();
        for node in [a, b] {
            if node >= num_nodes {
                return Err(GraphError::NodeOutOfRange { node, num_nodes });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop { node: a });
        }
        self.insert_edge(a, b);
        Ok(())
    }

    // callers guarantee a != b and both in range
    fn insert_edge(&mut self, a: usize, b: usize) {
        if self.adjacency[a].insert(b) {
            self.adjacency[b].insert(a);
            self.num_edges += 1;
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.num_nodes()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.num_nodes()).map(NodeId)
    }

    /// Neighbours of `node` in ascending order
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency[node.index()].iter().map(|&n| NodeId(n))
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node.index()].len()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.contains(a) && self.adjacency[a.index()].contains(&b.index())
    }

    /// Dense symmetric 0/1 adjacency matrix
    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let n = self.num_nodes();
        let mut mat = DMatrix::zeros(n, n);
        for (i, neighbors) in self.adjacency.iter().enumerate() {
            for &j in neighbors {
                mat[(i, j)] = 1.0;
            }
        }
        mat
    }
}
