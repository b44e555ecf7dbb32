//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// A view is either directed (outgoing and incoming adjacency differ) or
/// symmetric, in which case every undirected edge is stored in the outgoing
/// row of both endpoints and the incoming structure mirrors the outgoing one.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,

    /// Whether the view keeps edge direction
    pub directed: bool,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Outgoing neighbors paired with their edge weight (1.0 when the view is unweighted)
    pub fn weighted_successors(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let weights = self.weights(idx);
        self.successors(idx)
            .iter()
            .enumerate()
            .map(move |(i, &target)| (target, weights.map_or(1.0, |w| w[i])))
    }

    /// Number of stored edges.
    ///
    /// For a symmetric view every non-loop edge is stored twice, so this is
    /// the undirected edge count only after accounting for that.
    pub fn stored_edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Helper to create GraphView from adjacency lists (legacy/test support)
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: flat_weights,
            directed: true,
        }
    }

    /// Build a directed view from a node list and `(source, target, weight)` edges.
    ///
    /// Edges whose endpoints are not in `nodes` are skipped. Parallel edges are kept.
    pub fn from_directed_edges(nodes: &[NodeId], edges: &[(NodeId, NodeId, f64)]) -> Self {
        let (index_to_node, node_to_index) = index_nodes(nodes);
        let node_count = index_to_node.len();

        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        let mut weights = vec![Vec::new(); node_count];

        for &(source, target, weight) in edges {
            if let (Some(&u), Some(&v)) = (node_to_index.get(&source), node_to_index.get(&target)) {
                outgoing[u].push(v);
                weights[u].push(weight);
                incoming[v].push(u);
            }
        }

        Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            outgoing,
            incoming,
            Some(weights),
        )
    }

    /// Build a symmetric (undirected) view from a node list and undirected edges.
    ///
    /// Each `(u, v, w)` must already be unique per unordered pair. A self-loop is
    /// stored once in its node's row.
    pub fn from_undirected_edges(nodes: &[NodeId], edges: &[(NodeId, NodeId, f64)]) -> Self {
        let (index_to_node, node_to_index) = index_nodes(nodes);
        let node_count = index_to_node.len();

        let mut adjacency = vec![Vec::new(); node_count];
        let mut weights = vec![Vec::new(); node_count];

        for &(a, b, weight) in edges {
            if let (Some(&u), Some(&v)) = (node_to_index.get(&a), node_to_index.get(&b)) {
                adjacency[u].push(v);
                weights[u].push(weight);
                if u != v {
                    adjacency[v].push(u);
                    weights[v].push(weight);
                }
            }
        }

        let mut view = Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            adjacency.clone(),
            adjacency,
            Some(weights),
        );
        view.directed = false;
        view
    }
}

fn index_nodes(nodes: &[NodeId]) -> (Vec<NodeId>, HashMap<NodeId, usize>) {
    let mut index_to_node = Vec::with_capacity(nodes.len());
    let mut node_to_index = HashMap::with_capacity(nodes.len());

    for &node_id in nodes {
        if !node_to_index.contains_key(&node_id) {
            node_to_index.insert(node_id, index_to_node.len());
            index_to_node.push(node_id);
        }
    }

    (index_to_node, node_to_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_view_degrees() {
        let view = GraphView::from_directed_edges(&[10, 20, 30], &[(10, 20, 1.0), (10, 30, 2.0), (20, 30, 0.5)]);

        assert_eq!(view.node_count, 3);
        assert!(view.directed);
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.in_degree(2), 2);
        assert_eq!(view.successors(0), &[1, 2]);
        assert_eq!(view.predecessors(2), &[0, 1]);
        assert_eq!(view.weights(0), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_undirected_view_is_symmetric() {
        let view = GraphView::from_undirected_edges(&[1, 2, 3], &[(1, 2, 1.0), (2, 3, 4.0), (3, 3, 1.0)]);

        assert!(!view.directed);
        assert_eq!(view.successors(1), &[0, 2]);
        assert_eq!(view.successors(2), &[1, 2]);
        assert_eq!(view.stored_edge_count(), 5);

        let row: Vec<(usize, f64)> = view.weighted_successors(1).collect();
        assert_eq!(row, vec![(0, 1.0), (2, 4.0)]);
    }

    #[test]
    fn test_unknown_endpoints_are_skipped() {
        let view = GraphView::from_directed_edges(&[1, 2], &[(1, 2, 1.0), (2, 99, 1.0)]);
        assert_eq!(view.stored_edge_count(), 1);
    }
}
