//! Influence ranking from sampled outcome counts.
//!
//! Node `i`'s probability is the share of shots whose bitstring has `'1'` at
//! position `i`. The most probable nodes become seeds for the spread model.

use log::debug;

use crate::qw_interface::{InfluenceError, NodeId, OutcomeCounts};

/// How outcome bitstrings whose length differs from the node count are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeLength {
    /// Count only the positions that exist in both the bitstring and the graph
    #[default]
    Lenient,

    /// Reject any bitstring that is not exactly `n` characters long
    Exact,
}

/// Per-node probabilities plus the selected influential nodes
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceRanking {
    /// Indexed by node id, length n
    pub probabilities: Vec<f64>,

    /// Top-k nodes ascending by probability
    pub influential: Vec<(NodeId, f64)>,
}

impl InfluenceRanking {
    pub fn nodes(&self) -> Vec<NodeId> {
        self.influential.iter().map(|&(node, _)| node).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.influential.iter().map(|&(_, score)| score).collect()
    }
}

/// Per-node probabilities with lenient bitstring lengths
pub fn extract_probabilities(counts: &OutcomeCounts, n: usize) -> Result<Vec<f64>, InfluenceError> {
    extract_probabilities_with(counts, n, OutcomeLength::Lenient)
}

pub fn extract_probabilities_with(
    counts: &OutcomeCounts,
    n: usize,
    length: OutcomeLength,
) -> Result<Vec<f64>, InfluenceError> {
    if n == 0 {
        return Err(InfluenceError::InvalidArgument(
            "node count must be positive".to_string(),
        ));
    }

    let mut tallies = vec![0u64; n];
    for (outcome, count) in counts.iter() {
        if length == OutcomeLength::Exact && outcome.len() != n {
            return Err(InfluenceError::InvalidArgument(format!(
                "outcome '{}' has length {}, expected {}",
                outcome,
                outcome.len(),
                n
            )));
        }
        for (i, bit) in outcome.chars().enumerate() {
            match bit {
                '1' if i < n => tallies[i] += count,
                '0' | '1' => {}
                other => {
                    return Err(InfluenceError::InvalidArgument(format!(
                        "outcome '{}' contains non-binary character '{}'",
                        outcome, other
                    )))
                }
            }
        }
    }

    let total = counts.total();
    if total == 0 {
        return Err(InfluenceError::DivisionError);
    }

    Ok(tallies
        .into_iter()
        .map(|tally| tally as f64 / total as f64)
        .collect())
}

/// The `top_k` most probable nodes, ascending by probability.
///
/// Indices are stably sorted ascending by probability and the last `top_k`
/// taken, so among equal probabilities the higher indices win.
pub fn select_top_k(
    probabilities: &[f64],
    top_k: usize,
) -> Result<Vec<(NodeId, f64)>, InfluenceError> {
    if top_k > probabilities.len() {
        return Err(InfluenceError::InvalidArgument(format!(
            "top_k ({}) exceeds node count ({})",
            top_k,
            probabilities.len()
        )));
    }

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[a].total_cmp(&probabilities[b]));

    Ok(order[order.len() - top_k..]
        .iter()
        .map(|&i| (NodeId(i), probabilities[i]))
        .collect())
}

/// Extract probabilities and select the `top_k` influential nodes
pub fn identify_influential_nodes(
    counts: &OutcomeCounts,
    n: usize,
    top_k: usize,
) -> Result<InfluenceRanking, InfluenceError> {
    identify_influential_nodes_with(counts, n, top_k, OutcomeLength::Lenient)
}

pub fn identify_influential_nodes_with(
    counts: &OutcomeCounts,
    n: usize,
    top_k: usize,
    length: OutcomeLength,
) -> Result<InfluenceRanking, InfluenceError> {
    // validate before touching counts so a bad top_k is reported first
    if n > 0 && top_k > n {
        return Err(InfluenceError::InvalidArgument(format!(
            "top_k ({}) exceeds node count ({})",
            top_k, n
        )));
    }

    let probabilities = extract_probabilities_with(counts, n, length)?;
    let influential = select_top_k(&probabilities, top_k)?;
    debug!("influential nodes {:?}", influential);

    Ok(InfluenceRanking {
        probabilities,
        influential,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> OutcomeCounts {
        entries.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn test_half_on_first_node() {
        let ranking = identify_influential_nodes(&counts(&[("000", 5), ("100", 5)]), 3, 1).unwrap();

        assert_eq!(ranking.probabilities, vec![0.5, 0.0, 0.0]);
        assert_eq!(ranking.influential, vec![(NodeId(0), 0.5)]);
    }

    #[test]
    fn test_one_hot_counts_sum_to_one() {
        let c = counts(&[("1000", 10), ("0100", 30), ("0010", 25), ("0001", 35)]);
        let probs = extract_probabilities(&c, 4).unwrap();
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_bit_outcomes_accumulate() {
        let c = counts(&[("110", 2), ("011", 2)]);
        let probs = extract_probabilities(&c, 3).unwrap();
        assert_eq!(probs, vec![0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_short_outcome_counts_available_positions() {
        let c = counts(&[("1", 1), ("011", 3)]);
        let probs = extract_probabilities(&c, 3).unwrap();
        assert_eq!(probs, vec![0.25, 0.75, 0.75]);
    }

    #[test]
    fn test_long_outcome_ignores_extra_positions() {
        let c = counts(&[("0111", 4)]);
        let probs = extract_probabilities(&c, 2).unwrap();
        assert_eq!(probs, vec![0.0, 1.0]);
    }

    #[test]
    fn test_exact_length_rejects_short_outcome() {
        let c = counts(&[("10", 1)]);
        assert!(matches!(
            extract_probabilities_with(&c, 3, OutcomeLength::Exact),
            Err(InfluenceError::InvalidArgument(_))
        ));
        assert!(extract_probabilities_with(&c, 2, OutcomeLength::Exact).is_ok());
    }

    #[test]
    fn test_non_binary_character_rejected() {
        let c = counts(&[("1x0", 1)]);
        assert!(matches!(
            extract_probabilities(&c, 3),
            Err(InfluenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_total_is_division_error() {
        assert_eq!(
            extract_probabilities(&OutcomeCounts::new(), 3),
            Err(InfluenceError::DivisionError)
        );
        assert_eq!(
            extract_probabilities(&counts(&[("101", 0)]), 3),
            Err(InfluenceError::DivisionError)
        );
    }

    #[test]
    fn test_zero_nodes_rejected() {
        assert!(matches!(
            extract_probabilities(&counts(&[("1", 1)]), 0),
            Err(InfluenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_top_k_larger_than_n_rejected() {
        assert!(matches!(
            identify_influential_nodes(&counts(&[("100", 1)]), 3, 4),
            Err(InfluenceError::InvalidArgument(_))
        ));
        assert!(select_top_k(&[0.1, 0.2], 3).is_err());
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        assert!(select_top_k(&[0.3, 0.7], 0).unwrap().is_empty());
    }

    #[test]
    fn test_top_k_ascending_and_dominant() {
        let probs = [0.05, 0.30, 0.10, 0.25, 0.30, 0.00];
        let top = select_top_k(&probs, 3).unwrap();

        let scores: Vec<f64> = top.iter().map(|&(_, s)| s).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));

        let min_selected = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        for (i, &p) in probs.iter().enumerate() {
            if !top.iter().any(|&(n, _)| n == NodeId(i)) {
                assert!(p <= min_selected);
            }
        }
    }

    #[test]
    fn test_top_k_ties_keep_index_order() {
        let probs = [0.2, 0.2, 0.2, 0.1];
        let top = select_top_k(&probs, 2).unwrap();
        assert_eq!(top, vec![(NodeId(1), 0.2), (NodeId(2), 0.2)]);
    }

    #[test]
    fn test_ranking_accessors() {
        let ranking =
            identify_influential_nodes(&counts(&[("100", 1), ("010", 3), ("001", 2)]), 3, 2)
                .unwrap();
        assert_eq!(ranking.nodes(), vec![NodeId(2), NodeId(1)]);
        assert_eq!(ranking.scores(), vec![2.0 / 6.0, 3.0 / 6.0]);
    }
}
