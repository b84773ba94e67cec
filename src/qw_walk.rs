//! Continuous-time quantum walk over a graph and simulated measurement.
//!
//! The walk evolves a single walker in the `n`-dimensional node space under
//! `U(t) = exp(-iAt)`, where `A` is the adjacency matrix. `A` is real
//! symmetric, so `U(t) = V diag(exp(-i lambda_k t)) V^T` with the
//! eigendecomposition `A = V diag(lambda) V^T`.
//!
//! Measuring the walker's position yields one node per shot, reported as a
//! one-hot bitstring (character `j` is `'1'` when the walker was found on
//! node `j`).

use log::debug;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use num_complex::Complex64;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::qw_graph::SocialGraph;
use crate::qw_interface::{CountsProvider, InfluenceError, OutcomeCounts};

/// Spectral form of the walk Hamiltonian (the adjacency matrix)
#[derive(Debug, Clone)]
pub struct WalkOperator {
    eigenvalues: DVector<f64>,
    eigenvectors: DMatrix<f64>,
}

impl WalkOperator {
    pub fn new(graph: &SocialGraph) -> Self {
        let eigen = SymmetricEigen::new(graph.adjacency_matrix());
        Self {
            eigenvalues: eigen.eigenvalues,
            eigenvectors: eigen.eigenvectors,
        }
    }

    pub fn dimension(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Dense `U(t) = exp(-iAt)`
    pub fn unitary(&self, t: f64) -> DMatrix<Complex64> {
        let phases = DVector::from_iterator(
            self.dimension(),
            self.eigenvalues
                .iter()
                .map(|&lambda| Complex64::from_polar(1.0, -lambda * t)),
        );
        let v = self.eigenvectors.map(|x| Complex64::new(x, 0.0));
        &v * DMatrix::from_diagonal(&phases) * v.transpose()
    }

    /// Uniform superposition over all nodes
    pub fn uniform_state(&self) -> DVector<Complex64> {
        let n = self.dimension();
        let amplitude = Complex64::new(1.0 / (n as f64).sqrt(), 0.0);
        DVector::from_element(n, amplitude)
    }

    /// `U(t) |initial>`
    pub fn evolve(&self, initial: &DVector<Complex64>, t: f64) -> DVector<Complex64> {
        self.unitary(t) * initial
    }

    /// Probability of finding the walker on each node after time `t`,
    /// starting from the uniform superposition.
    pub fn node_probabilities(&self, t: f64) -> Vec<f64> {
        let state = self.evolve(&self.uniform_state(), t);
        state.iter().map(|amp| amp.norm_sqr()).collect()
    }
}

/// Counts provider that samples walker positions after a quantum walk
pub struct QuantumWalkSampler {
    walk_time: f64,
    shots: u64,
    seed: [u8; 32],
    rng: StdRng,
}

impl QuantumWalkSampler {
    /// `seed = None` draws a fresh seed from entropy
    pub fn new(walk_time: f64, shots: u64, seed: Option<[u8; 32]>) -> Self {
        let seed = resolve_seed(seed);
        Self {
            walk_time,
            shots,
            seed,
            rng: StdRng::from_seed(seed),
        }
    }

    pub fn seed_used(&self) -> [u8; 32] {
        self.seed
    }

    pub fn walk_time(&self) -> f64 {
        self.walk_time
    }

    pub fn shots(&self) -> u64 {
        self.shots
    }
}

impl CountsProvider for QuantumWalkSampler {
    fn sample_counts(&mut self, graph: &SocialGraph) -> Result<OutcomeCounts, InfluenceError> {
        let n = graph.num_nodes();
        if n == 0 {
            return Err(InfluenceError::InvalidArgument(
                "cannot run a walk on a graph with no nodes".to_string(),
            ));
        }
        if self.shots == 0 {
            return Err(InfluenceError::InvalidArgument(
                "shots must be at least 1".to_string(),
            ));
        }
        if !self.walk_time.is_finite() {
            return Err(InfluenceError::InvalidArgument(format!(
                "walk time must be finite, got {}",
                self.walk_time
            )));
        }

        let probabilities = WalkOperator::new(graph).node_probabilities(self.walk_time);
        debug!("walk t={} probabilities {:?}", self.walk_time, probabilities);

        let dist = WeightedIndex::new(&probabilities).map_err(|e| {
            InfluenceError::InvalidArgument(format!("walk produced no distribution: {}", e))
        })?;

        let mut hits = vec![0u64; n];
        for _ in 0..self.shots {
            hits[dist.sample(&mut self.rng)] += 1;
        }

        Ok(hits
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(node, &count)| (one_hot(node, n), count))
            .collect())
    }
}

/// Counts provider returning the same counts on every call
#[derive(Debug, Clone)]
pub struct FixedCounts(pub OutcomeCounts);

impl CountsProvider for FixedCounts {
    fn sample_counts(&mut self, _graph: &SocialGraph) -> Result<OutcomeCounts, InfluenceError> {
        Ok(self.0.clone())
    }
}

/// Bitstring of `len` characters with a single `'1'` at `position`
pub fn one_hot(position: usize, len: usize) -> String {
    (0..len)
        .map(|i| if i == position { '1' } else { '0' })
        .collect()
}

/// Get or generate a sampling seed
pub fn resolve_seed(seed: Option<[u8; 32]>) -> [u8; 32] {
    seed.unwrap_or_else(|| {
        let mut temp_rng = StdRng::from_entropy();
        let mut seed = [0u8; 32];
        temp_rng.fill_bytes(&mut seed);
        seed
    })
}
