//! Greedy modularity community detection
//!
//! Clauset-Newman-Moore agglomeration: every node starts in its own
//! community and the adjacent pair with the largest modularity gain is merged
//! until no merge gains anything.

use super::common::{GraphView, NodeId};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// Community detection configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommunityConfig {
    /// Resolution parameter (1.0 = standard modularity)
    pub resolution: f64,
    /// Use edge weights instead of counting every edge as 1
    pub weighted: bool,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            weighted: false,
        }
    }
}

/// Result of community detection
#[derive(Debug, Clone)]
pub struct CommunityResult {
    /// Community ID -> member NodeIds, largest community first
    pub communities: Vec<Vec<NodeId>>,
    /// Map of NodeId -> Community ID
    pub node_community: HashMap<NodeId, usize>,
    /// Modularity of the final partition
    pub modularity: f64,
}

impl CommunityResult {
    /// Number of communities
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }
}

fn edge_weight(weight: f64, config: &CommunityConfig) -> f64 {
    if config.weighted {
        weight
    } else {
        1.0
    }
}

/// Weighted degree per node; a self-loop contributes twice.
fn degrees(view: &GraphView, config: &CommunityConfig) -> Vec<f64> {
    (0..view.node_count)
        .map(|u| {
            view.weighted_successors(u)
                .map(|(v, w)| {
                    let w = edge_weight(w, config);
                    if v == u {
                        2.0 * w
                    } else {
                        w
                    }
                })
                .sum()
        })
        .collect()
}

/// Greedy modularity maximization
///
/// The view is read as undirected: pass a symmetric view (see
/// [`GraphView::from_undirected_edges`]). When several merges share the best
/// gain, the pair with the smallest `(u, v)` index wins and `u` is folded
/// into `v`, so the result only depends on the node order of the view.
pub fn greedy_modularity_communities(view: &GraphView, config: CommunityConfig) -> CommunityResult {
    let n = view.node_count;
    let k = degrees(view, &config);
    let two_m: f64 = k.iter().sum();

    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active = vec![true; n];

    if two_m > 0.0 {
        let m = two_m / 2.0;
        let q0 = 1.0 / m;
        let res = config.resolution;
        let mut a: Vec<f64> = k.iter().map(|&deg| deg / two_m).collect();

        // dq[u][v]: modularity gain of merging communities u and v
        let mut dq: Vec<FxHashMap<usize, f64>> = vec![FxHashMap::default(); n];
        for u in 0..n {
            for (v, w) in view.weighted_successors(u) {
                if u != v {
                    *dq[u].entry(v).or_insert(0.0) += edge_weight(w, &config);
                }
            }
        }
        for u in 0..n {
            for (&v, entry) in dq[u].iter_mut() {
                *entry = q0 * *entry - 2.0 * res * a[u] * a[v];
            }
        }

        loop {
            let mut best: Option<(f64, usize, usize)> = None;
            for (u, row) in dq.iter().enumerate() {
                for (&v, &gain) in row {
                    let better = match best {
                        None => true,
                        Some((best_gain, bu, bv)) => {
                            gain > best_gain || (gain == best_gain && (u, v) < (bu, bv))
                        }
                    };
                    if better {
                        best = Some((gain, u, v));
                    }
                }
            }

            let Some((gain, u, v)) = best else { break };
            if gain < 0.0 {
                break;
            }

            // Fold u into v
            let row_u = std::mem::take(&mut dq[u]);
            let row_v = std::mem::take(&mut dq[v]);
            let mut merged: FxHashMap<usize, f64> = FxHashMap::default();

            for (&w, &dq_uw) in &row_u {
                if w == v {
                    continue;
                }
                let value = match row_v.get(&w) {
                    Some(&dq_vw) => dq_uw + dq_vw,
                    None => dq_uw - 2.0 * res * a[v] * a[w],
                };
                merged.insert(w, value);
            }
            for (&w, &dq_vw) in &row_v {
                if w == u || row_u.contains_key(&w) {
                    continue;
                }
                merged.insert(w, dq_vw - 2.0 * res * a[u] * a[w]);
            }

            for (&w, &value) in &merged {
                dq[w].remove(&u);
                dq[w].insert(v, value);
            }
            dq[v] = merged;

            a[v] += a[u];
            a[u] = 0.0;
            let moved = std::mem::take(&mut members[u]);
            members[v].extend(moved);
            active[u] = false;
        }
    }

    let mut groups: Vec<Vec<usize>> = members
        .into_iter()
        .zip(active)
        .filter_map(|(mut group, alive)| {
            alive.then(|| {
                group.sort_unstable();
                group
            })
        })
        .collect();
    // Stable: equal sizes keep representative order
    groups.sort_by(|x, y| y.len().cmp(&x.len()));

    let mut node_community = HashMap::with_capacity(n);
    let mut community_of_index = vec![0usize; n];
    for (cid, group) in groups.iter().enumerate() {
        for &idx in group {
            node_community.insert(view.index_to_node[idx], cid);
            community_of_index[idx] = cid;
        }
    }

    let score = modularity_of_labels(view, &community_of_index, groups.len(), config);
    let communities = groups
        .into_iter()
        .map(|group| group.into_iter().map(|idx| view.index_to_node[idx]).collect())
        .collect();

    CommunityResult {
        communities,
        node_community,
        modularity: score,
    }
}

/// Modularity of an arbitrary partition given as NodeId groups.
///
/// Nodes missing from `communities` are treated as singletons.
pub fn modularity(view: &GraphView, communities: &[Vec<NodeId>], config: CommunityConfig) -> f64 {
    let mut labels: Vec<Option<usize>> = vec![None; view.node_count];
    for (cid, group) in communities.iter().enumerate() {
        for node in group {
            if let Some(&idx) = view.node_to_index.get(node) {
                labels[idx] = Some(cid);
            }
        }
    }

    let mut next = communities.len();
    let labels: Vec<usize> = labels
        .into_iter()
        .map(|label| {
            label.unwrap_or_else(|| {
                next += 1;
                next - 1
            })
        })
        .collect();

    modularity_of_labels(view, &labels, next, config)
}

fn modularity_of_labels(
    view: &GraphView,
    labels: &[usize],
    count: usize,
    config: CommunityConfig,
) -> f64 {
    let k = degrees(view, &config);
    let two_m: f64 = k.iter().sum();
    if two_m == 0.0 {
        return 0.0;
    }
    let m = two_m / 2.0;

    let mut internal = vec![0.0; count];
    let mut total_degree = vec![0.0; count];

    for u in 0..view.node_count {
        let cu = labels[u];
        total_degree[cu] += k[u];
        for (v, w) in view.weighted_successors(u) {
            if labels[v] == cu {
                let w = edge_weight(w, &config);
                // Non-loop edges are seen from both endpoints
                internal[cu] += if u == v { w } else { w / 2.0 };
            }
        }
    }

    internal
        .iter()
        .zip(&total_degree)
        .map(|(&l_c, &d_c)| l_c / m - config.resolution * (d_c / two_m).powi(2))
        .sum()
}
