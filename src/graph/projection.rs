//! Undirected projection of the directed topic graph
//!
//! Direction is dropped and every unordered node pair keeps a single edge.
//! When several directed edges collapse onto one pair, the weight of the last
//! one in input order wins. Self-loops survive once.

use super::store::GraphStore;
use super::types::NodeId;
use indexmap::IndexMap;

/// Lossy undirected view of a [`GraphStore`]
#[derive(Debug, Clone, Default)]
pub struct UndirectedProjection {
    nodes: Vec<NodeId>,
    edges: IndexMap<(NodeId, NodeId), f64>,
}

impl UndirectedProjection {
    /// Project the directed graph; node order follows the store
    pub fn from_store(store: &GraphStore) -> Self {
        let mut edges = IndexMap::with_capacity(store.edge_count());
        for edge in store.all_edges() {
            let key = if edge.source <= edge.target {
                (edge.source, edge.target)
            } else {
                (edge.target, edge.source)
            };
            // Existing keys keep their position and take the new weight
            edges.insert(key, edge.weight);
        }

        UndirectedProjection {
            nodes: store.node_ids(),
            edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edges as `(u, v, weight)` with `u <= v`, in order of first appearance
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.edges.iter().map(|(&(u, v), &w)| (u, v, w))
    }
}
