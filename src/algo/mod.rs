//! Graph algorithms module
//!
//! Algorithms are implemented in the `mathgraph-algorithms` crate.
//! This module provides the integration/adapter layer: it turns the
//! directed store and its undirected projection into CSR views.

use crate::graph::{GraphStore, UndirectedProjection};
use mathgraph_algorithms::{GraphView, NodeId as AlgoNodeId};

// Re-export algorithms
pub use mathgraph_algorithms::{
    average_clustering, clustering_coefficients, count_triangles, eigenvector_centrality,
    greedy_modularity_communities, modularity, spring_layout, strongly_connected_components,
    weakly_connected_components, CommunityConfig, CommunityResult, ComponentsResult,
    ConvergenceError, EigenvectorConfig, LayoutConfig, SccResult, WccResult,
};

/// Build a directed view of the store for algorithm execution
///
/// Node order follows the store and parallel edges are kept.
pub fn build_directed_view(store: &GraphStore) -> GraphView {
    let nodes: Vec<AlgoNodeId> = store.all_nodes().iter().map(|n| n.id.as_u64()).collect();
    let edges: Vec<(AlgoNodeId, AlgoNodeId, f64)> = store
        .all_edges()
        .iter()
        .map(|e| (e.source.as_u64(), e.target.as_u64(), e.weight))
        .collect();

    GraphView::from_directed_edges(&nodes, &edges)
}

/// Build a symmetric view of the undirected projection
pub fn build_undirected_view(projection: &UndirectedProjection) -> GraphView {
    let nodes: Vec<AlgoNodeId> = projection.nodes().iter().map(|id| id.as_u64()).collect();
    let edges: Vec<(AlgoNodeId, AlgoNodeId, f64)> = projection
        .edges()
        .map(|(u, v, w)| (u.as_u64(), v.as_u64(), w))
        .collect();

    GraphView::from_undirected_edges(&nodes, &edges)
}
