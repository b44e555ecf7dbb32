//! In-memory graph storage implementation
//!
//! The directed, weighted topic graph. Node order is insertion order, which
//! the loader fixes to ascending id; every table derived from the store keeps
//! that order.

use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeId, Label, NodeId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// In-memory directed graph storage
///
/// - nodes: dense arena in insertion order
/// - node_index: NodeId -> arena position
/// - edges: every link in input order; an edge's id is its position
/// - out_degree / in_degree: per-position edge counts, parallel edges included
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    out_degree: Vec<usize>,
    in_degree: Vec<usize>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for the given number of nodes and edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        GraphStore {
            nodes: Vec::with_capacity(nodes),
            node_index: HashMap::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            out_degree: Vec::with_capacity(nodes),
            in_degree: Vec::with_capacity(nodes),
        }
    }

    /// Add a node with an explicit id
    pub fn create_node(&mut self, id: NodeId, label: impl Into<Label>) -> GraphResult<NodeId> {
        if self.node_index.contains_key(&id) {
            return Err(GraphError::NodeAlreadyExists(id));
        }

        self.node_index.insert(id, self.nodes.len());
        self.nodes.push(Node::new(id, label));
        self.out_degree.push(0);
        self.in_degree.push(0);
        Ok(id)
    }

    /// Create a directed edge between two existing nodes
    pub fn create_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> GraphResult<EdgeId> {
        let source_idx = *self
            .node_index
            .get(&source)
            .ok_or(GraphError::InvalidEdgeSource(source))?;
        let target_idx = *self
            .node_index
            .get(&target)
            .ok_or(GraphError::InvalidEdgeTarget(target))?;

        let edge_id = EdgeId::new(self.edges.len() as u64);
        self.edges.push(Edge::new(edge_id, source, target, weight));
        self.out_degree[source_idx] += 1;
        self.in_degree[target_idx] += 1;

        Ok(edge_id)
    }

    /// Label of a node, if present
    pub fn label_of(&self, id: NodeId) -> Option<&Label> {
        self.node_index.get(&id).map(|&idx| &self.nodes[idx].label)
    }

    /// Number of edges leaving a node (parallel edges each count)
    pub fn out_degree(&self, node_id: NodeId) -> usize {
        self.node_index
            .get(&node_id)
            .map_or(0, |&idx| self.out_degree[idx])
    }

    /// Number of edges entering a node (parallel edges each count)
    pub fn in_degree(&self, node_id: NodeId) -> usize {
        self.node_index
            .get(&node_id)
            .map_or(0, |&idx| self.in_degree[idx])
    }

    /// Total degree: in-degree plus out-degree
    pub fn degree(&self, node_id: NodeId) -> usize {
        self.in_degree(node_id) + self.out_degree(node_id)
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in insertion order
    pub fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order
    pub fn all_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Aggregate counts for logging and summaries
    pub fn statistics(&self) -> GraphStatistics {
        let self_loops = self.edges.iter().filter(|e| e.is_self_loop()).count();
        let isolated = (0..self.nodes.len())
            .filter(|&idx| self.out_degree[idx] == 0 && self.in_degree[idx] == 0)
            .count();

        GraphStatistics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            self_loops,
            isolated_nodes: isolated,
            total_weight: self.edges.iter().map(|e| e.weight).sum(),
        }
    }
}

/// Aggregate counts over the stored graph
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loops: usize,
    pub isolated_nodes: usize,
    pub total_weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        for (id, name) in [(0, "Algebra"), (1, "Geometry"), (2, "Topology")] {
            store.create_node(NodeId::new(id), Label::new(name)).unwrap();
        }
        store.create_edge(NodeId::new(0), NodeId::new(1), 1.0).unwrap();
        store.create_edge(NodeId::new(0), NodeId::new(1), 2.0).unwrap();
        store.create_edge(NodeId::new(1), NodeId::new(2), 0.5).unwrap();
        store
    }

    #[test]
    fn test_create_node_keeps_insertion_order() {
        let store = sample_store();

        assert_eq!(store.node_count(), 3);
        assert_eq!(store.label_of(NodeId::new(1)).unwrap().as_str(), "Geometry");
        assert_eq!(store.label_of(NodeId::new(7)), None);
        assert_eq!(
            store.node_ids(),
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]
        );
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut store = sample_store();
        let result = store.create_node(NodeId::new(1), Label::new("Again"));
        assert_eq!(result, Err(GraphError::NodeAlreadyExists(NodeId::new(1))));
    }

    #[test]
    fn test_create_edge_validates_endpoints() {
        let mut store = sample_store();

        assert_eq!(
            store.create_edge(NodeId::new(9), NodeId::new(1), 1.0),
            Err(GraphError::InvalidEdgeSource(NodeId::new(9)))
        );
        assert_eq!(
            store.create_edge(NodeId::new(1), NodeId::new(9), 1.0),
            Err(GraphError::InvalidEdgeTarget(NodeId::new(9)))
        );
        assert_eq!(store.edge_count(), 3);
    }

    #[test]
    fn test_degrees_count_parallel_edges() {
        let store = sample_store();

        assert_eq!(store.out_degree(NodeId::new(0)), 2);
        assert_eq!(store.in_degree(NodeId::new(1)), 2);
        assert_eq!(store.degree(NodeId::new(1)), 3);
        assert_eq!(store.degree(NodeId::new(2)), 1);
        assert_eq!(store.degree(NodeId::new(42)), 0);
    }

    #[test]
    fn test_edges_keep_input_order() {
        let store = sample_store();

        let edges = store.all_edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[1].id, EdgeId::new(1));
        assert_eq!(edges[1].weight, 2.0);
        assert_eq!(edges[2].source, NodeId::new(1));
    }

    #[test]
    fn test_statistics() {
        let mut store = sample_store();
        store.create_node(NodeId::new(3), Label::new("Logic")).unwrap();
        store.create_edge(NodeId::new(2), NodeId::new(2), 1.0).unwrap();

        let stats = store.statistics();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.self_loops, 1);
        assert_eq!(stats.isolated_nodes, 1);
        assert_eq!(stats.total_weight, 4.5);
    }
}
