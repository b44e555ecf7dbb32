//! Edge implementation for the topic graph
//!
//! Edges are directed and weighted. Multiple edges between the same pair of
//! nodes are kept as separate edges.

use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed, weighted link between two topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Link weight as given by the dataset
    pub weight: f64,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, weight: f64) -> Self {
        Edge {
            id,
            source,
            target,
            weight,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
