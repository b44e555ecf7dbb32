//! Force-directed (spring) layout
//!
//! Fruchterman-Reingold: every pair of nodes repels with `k²/d`, every edge
//! attracts with `w·d²/k`, and node moves are capped by a temperature that
//! cools linearly over the run.

use super::common::{GraphView, NodeId};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;

/// Distances below this are clipped so coincident nodes still push apart
const MIN_DISTANCE: f64 = 0.01;

/// Spring layout configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Maximum number of simulation steps
    pub iterations: usize,
    /// RNG seed for the initial positions; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Stop early once the mean node displacement falls below this
    pub threshold: f64,
    /// Largest absolute coordinate after rescaling
    pub scale: f64,
    /// Scale attraction by edge weight
    pub weighted: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: None,
            threshold: 1.0e-4,
            scale: 1.0,
            weighted: true,
        }
    }
}

/// Compute a 2D position for every node of the view
///
/// The view is read as undirected: pass a symmetric view. The same seed on
/// the same view always yields the same layout.
pub fn spring_layout(view: &GraphView, config: LayoutConfig) -> HashMap<NodeId, (f64, f64)> {
    let n = view.node_count;

    match n {
        0 => return HashMap::new(),
        1 => return HashMap::from([(view.index_to_node[0], (0.0, 0.0))]),
        _ => {}
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut pos = Array2::<f64>::zeros((n, 2));
    for value in pos.iter_mut() {
        *value = rng.gen::<f64>();
    }

    // Optimal pairwise distance for a unit area
    let k = (1.0 / n as f64).sqrt();

    let extent = pos
        .axis_iter(Axis(1))
        .map(|column| {
            let (lo, hi) = column
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            hi - lo
        })
        .fold(0.0, f64::max);
    let mut temperature = extent * 0.1;
    let cooling = temperature / config.iterations.saturating_add(1) as f64;

    for _ in 0..config.iterations {
        let displacement: Vec<(f64, f64)> = (0..n)
            .into_par_iter()
            .map(|i| {
                let (xi, yi) = (pos[[i, 0]], pos[[i, 1]]);
                let mut dx = 0.0;
                let mut dy = 0.0;

                // Repulsion from every other node
                for j in 0..n {
                    if j == i {
                        continue;
                    }
                    let (ddx, ddy) = (xi - pos[[j, 0]], yi - pos[[j, 1]]);
                    let dist = (ddx * ddx + ddy * ddy).sqrt().max(MIN_DISTANCE);
                    let force = k * k / (dist * dist);
                    dx += ddx * force;
                    dy += ddy * force;
                }

                // Attraction along edges
                for (j, w) in view.weighted_successors(i) {
                    if j == i {
                        continue;
                    }
                    let w = if config.weighted { w } else { 1.0 };
                    let (ddx, ddy) = (xi - pos[[j, 0]], yi - pos[[j, 1]]);
                    let dist = (ddx * ddx + ddy * ddy).sqrt().max(MIN_DISTANCE);
                    let force = w * dist / k;
                    dx -= ddx * force;
                    dy -= ddy * force;
                }

                (dx, dy)
            })
            .collect();

        let mut moved = 0.0;
        for (i, (dx, dy)) in displacement.into_iter().enumerate() {
            let length = (dx * dx + dy * dy).sqrt();
            let length = if length < MIN_DISTANCE { 0.1 } else { length };
            let (step_x, step_y) = (dx * temperature / length, dy * temperature / length);
            pos[[i, 0]] += step_x;
            pos[[i, 1]] += step_y;
            moved += step_x * step_x + step_y * step_y;
        }

        temperature -= cooling;
        if moved.sqrt() / (n as f64) < config.threshold {
            break;
        }
    }

    rescale(&mut pos, config.scale);

    (0..n)
        .map(|i| (view.index_to_node[i], (pos[[i, 0]], pos[[i, 1]])))
        .collect()
}

/// Center on the origin and scale so the largest absolute coordinate is `scale`.
fn rescale(pos: &mut Array2<f64>, scale: f64) {
    if let Some(mean) = pos.mean_axis(Axis(0)) {
        *pos -= &mean;
    }
    let lim = pos.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if lim > 0.0 {
        let factor = scale / lim;
        pos.mapv_inplace(|v| v * factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cliques() -> GraphView {
        let mut edges = Vec::new();
        for base in [0u64, 5] {
            for i in 0..5 {
                for j in (i + 1)..5 {
                    edges.push((base + i, base + j, 1.0));
                }
            }
        }
        let nodes: Vec<NodeId> = (0..10).collect();
        GraphView::from_undirected_edges(&nodes, &edges)
    }

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let view = two_cliques();
        let config = LayoutConfig {
            seed: Some(42),
            ..LayoutConfig::default()
        };

        let first = spring_layout(&view, config);
        let second = spring_layout(&view, config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_positions_are_finite_and_scaled() {
        let view = two_cliques();
        let layout = spring_layout(
            &view,
            LayoutConfig {
                seed: Some(7),
                ..LayoutConfig::default()
            },
        );

        assert_eq!(layout.len(), 10);
        let mut max_abs: f64 = 0.0;
        for &(x, y) in layout.values() {
            assert!(x.is_finite() && y.is_finite());
            max_abs = max_abs.max(x.abs()).max(y.abs());
        }
        assert!((max_abs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cliques_separate() {
        let view = two_cliques();
        let layout = spring_layout(
            &view,
            LayoutConfig {
                seed: Some(3),
                ..LayoutConfig::default()
            },
        );

        let mut intra = Vec::new();
        let mut inter = Vec::new();
        for i in 0..10u64 {
            for j in (i + 1)..10u64 {
                let d = distance(layout[&i], layout[&j]);
                if (i < 5) == (j < 5) {
                    intra.push(d);
                } else {
                    inter.push(d);
                }
            }
        }
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert!(mean(&intra) < mean(&inter));
    }

    #[test]
    fn test_unbounded_iterations_stop_on_threshold() {
        let config = LayoutConfig {
            iterations: usize::MAX,
            seed: Some(9),
            threshold: f64::INFINITY,
            ..LayoutConfig::default()
        };

        let layout = spring_layout(&two_cliques(), config);
        assert_eq!(layout.len(), 10);
        assert!(layout.values().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn test_single_node_sits_at_origin() {
        let view = GraphView::from_undirected_edges(&[9], &[]);
        let layout = spring_layout(&view, LayoutConfig::default());
        assert_eq!(layout[&9], (0.0, 0.0));
    }

    #[test]
    fn test_empty_graph() {
        let view = GraphView::from_undirected_edges(&[], &[]);
        assert!(spring_layout(&view, LayoutConfig::default()).is_empty());
    }
}
