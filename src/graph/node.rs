//! Node implementation for the topic graph

use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};

/// A topic in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Article title
    pub label: Label,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<Label>) -> Self {
        Node {
            id,
            label: label.into(),
        }
    }
}
