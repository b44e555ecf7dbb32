//! Degree metrics and community summaries derived from the directed graph

use crate::graph::{GraphStore, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

/// In/out degree lists in node order plus the larger of the two maxima
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeStats {
    pub in_degrees: Vec<usize>,
    pub out_degrees: Vec<usize>,
    /// Upper bound for a minimum-degree filter
    pub max_degree: usize,
}

impl DegreeStats {
    pub fn from_store(store: &GraphStore) -> Self {
        let in_degrees: Vec<usize> = store.all_nodes().iter().map(|n| store.in_degree(n.id)).collect();
        let out_degrees: Vec<usize> = store.all_nodes().iter().map(|n| store.out_degree(n.id)).collect();

        let max_in = in_degrees.iter().copied().max().unwrap_or(0);
        let max_out = out_degrees.iter().copied().max().unwrap_or(0);

        DegreeStats {
            in_degrees,
            out_degrees,
            max_degree: max_in.max(max_out),
        }
    }
}

/// Histogram of degree values, as ascending `(degree, node count)` pairs
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DegreeDistribution {
    pub in_degree: Vec<(usize, usize)>,
    pub out_degree: Vec<(usize, usize)>,
}

impl DegreeDistribution {
    pub fn from_stats(stats: &DegreeStats) -> Self {
        DegreeDistribution {
            in_degree: histogram(&stats.in_degrees),
            out_degree: histogram(&stats.out_degrees),
        }
    }
}

fn histogram(values: &[usize]) -> Vec<(usize, usize)> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Member with the largest out-degree for each community
///
/// Ties go to the member that comes first in the community.
pub fn community_hubs(store: &GraphStore, communities: &[Vec<NodeId>]) -> Vec<NodeId> {
    communities
        .iter()
        .filter_map(|members| {
            members
                .iter()
                .copied()
                .fold(None, |best: Option<(NodeId, usize)>, node| {
                    let degree = store.out_degree(node);
                    match best {
                        Some((_, best_degree)) if best_degree >= degree => best,
                        _ => Some((node, degree)),
                    }
                })
                .map(|(node, _)| node)
        })
        .collect()
}

/// Number of communities for colour scaling; never below 1
pub fn community_count(communities: &[Vec<NodeId>]) -> usize {
    communities.len().max(1)
}
