//! Eigenvector centrality
//!
//! Power iteration on `A + I` (the identity shift keeps bipartite graphs from
//! oscillating), normalized to unit Euclidean length after each step.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;
use thiserror::Error;

/// Power iteration did not settle within the configured bound
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("eigenvector centrality failed to converge within {iterations} iterations")]
pub struct ConvergenceError {
    pub iterations: usize,
}

/// Eigenvector centrality configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EigenvectorConfig {
    /// Upper bound on power iterations
    pub max_iterations: usize,
    /// Per-node tolerance; the L1 change must drop below `node_count * tolerance`
    pub tolerance: f64,
    /// Use edge weights instead of counting every edge as 1
    pub weighted: bool,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1.0e-6,
            weighted: false,
        }
    }
}

/// Calculate eigenvector centrality for the graph view
///
/// Scores flow along outgoing rows, so on a symmetric view this is the
/// undirected centrality. Results are non-negative with unit L2 norm, hence
/// every score lies in `[0, 1]`.
pub fn eigenvector_centrality(
    view: &GraphView,
    config: EigenvectorConfig,
) -> Result<HashMap<NodeId, f64>, ConvergenceError> {
    let n = view.node_count;

    if n == 0 {
        return Ok(HashMap::new());
    }

    let mut scores = vec![1.0 / n as f64; n];
    let mut next_scores = vec![0.0; n];

    for _ in 0..config.max_iterations {
        // Identity shift
        next_scores.copy_from_slice(&scores);

        for (u, &score) in scores.iter().enumerate() {
            for (v, w) in view.weighted_successors(u) {
                let w = if config.weighted { w } else { 1.0 };
                next_scores[v] += score * w;
            }
        }

        let norm = next_scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for x in next_scores.iter_mut() {
            *x /= norm;
        }

        let total_diff: f64 = next_scores
            .iter()
            .zip(&scores)
            .map(|(next, prev)| (next - prev).abs())
            .sum();

        // Swap buffers
        std::mem::swap(&mut scores, &mut next_scores);

        // Check convergence
        if total_diff < n as f64 * config.tolerance {
            let mut result = HashMap::with_capacity(n);
            for (idx, score) in scores.into_iter().enumerate() {
                result.insert(view.index_to_node[idx], score.max(0.0));
            }
            return Ok(result);
        }
    }

    Err(ConvergenceError {
        iterations: config.max_iterations,
    })
}
