//! Graph topology analysis algorithms
//!
//! Triangle counting and local clustering coefficients. Both read the view
//! as undirected and ignore self-loops.

use super::common::{GraphView, NodeId};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Distinct non-self neighbors of a node, in either direction.
fn neighbor_set(view: &GraphView, u: usize) -> HashSet<usize> {
    view.successors(u)
        .iter()
        .chain(view.predecessors(u).iter())
        .copied()
        .filter(|&v| v != u)
        .collect()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph.
/// For undirected graphs, each triangle is counted once.
/// For directed, we treat as undirected for counting.
pub fn count_triangles(view: &GraphView) -> usize {
    let neighbors: Vec<HashSet<usize>> = (0..view.node_count)
        .map(|u| neighbor_set(view, u))
        .collect();

    let mut triangle_count = 0;

    // To avoid overcounting, we only consider nodes with indices u < v < w.
    for u in 0..view.node_count {
        for &v in &neighbors[u] {
            if v <= u {
                continue;
            }
            for &w in &neighbors[v] {
                if w <= v {
                    continue;
                }
                if neighbors[u].contains(&w) {
                    triangle_count += 1;
                }
            }
        }
    }

    triangle_count
}

/// Local clustering coefficient per node
///
/// `2T / (d(d-1))` where `d` is the number of distinct neighbors and `T` the
/// number of links among them; 0 when `d < 2`.
pub fn clustering_coefficients(view: &GraphView) -> HashMap<NodeId, f64> {
    let neighbors: Vec<HashSet<usize>> = (0..view.node_count)
        .into_par_iter()
        .map(|u| neighbor_set(view, u))
        .collect();

    let coefficients: Vec<f64> = (0..view.node_count)
        .into_par_iter()
        .map(|u| {
            let nbrs = &neighbors[u];
            let d = nbrs.len();
            if d < 2 {
                return 0.0;
            }

            // Each linked pair is seen from both ends
            let links: usize = nbrs
                .iter()
                .map(|&v| neighbors[v].iter().filter(|&&w| nbrs.contains(&w)).count())
                .sum();
            let triangles = links / 2;

            2.0 * triangles as f64 / (d * (d - 1)) as f64
        })
        .collect();

    coefficients
        .into_iter()
        .enumerate()
        .map(|(idx, c)| (view.index_to_node[idx], c))
        .collect()
}

/// Mean of the local clustering coefficients (0 for an empty graph)
pub fn average_clustering(view: &GraphView) -> f64 {
    if view.node_count == 0 {
        return 0.0;
    }
    let coefficients = clustering_coefficients(view);
    coefficients.values().sum::<f64>() / view.node_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(n: u64) -> GraphView {
        let nodes: Vec<NodeId> = (0..n).collect();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j, 1.0));
            }
        }
        GraphView::from_undirected_edges(&nodes, &edges)
    }

    #[test]
    fn test_triangle_counting() {
        // Complete graph K4: 4 nodes, all connected.
        // Triangles: (0,1,2), (0,1,3), (0,2,3), (1,2,3) -> 4 triangles.
        assert_eq!(count_triangles(&complete(4)), 4);
    }

    #[test]
    fn test_triangle_counting_directed() {
        let view = GraphView::from_directed_edges(&[1, 2, 3], &[(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]);
        assert_eq!(count_triangles(&view), 1);
    }

    #[test]
    fn test_clustering_complete_graph_is_one() {
        let coefficients = clustering_coefficients(&complete(5));
        for c in coefficients.values() {
            assert!((c - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_clustering_mixed() {
        // Triangle 1-2-3 with a pendant 4 on node 3
        let view = GraphView::from_undirected_edges(
            &[1, 2, 3, 4],
            &[(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0), (3, 4, 1.0)],
        );
        let c = clustering_coefficients(&view);

        assert_eq!(c[&1], 1.0);
        assert_eq!(c[&2], 1.0);
        assert!((c[&3] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(c[&4], 0.0);

        let avg = average_clustering(&view);
        assert!((avg - (2.0 + 1.0 / 3.0) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_loops_are_ignored() {
        let view = GraphView::from_undirected_edges(&[1, 2], &[(1, 1, 1.0), (1, 2, 1.0)]);
        let c = clustering_coefficients(&view);
        assert_eq!(c[&1], 0.0);
        assert_eq!(c[&2], 0.0);
    }
}
