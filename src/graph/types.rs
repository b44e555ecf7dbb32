//! Identifier and label types
//!
//! All three serialize as their bare value, so tables and figures carry plain
//! numbers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A topic's integer id from the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a link in the dataset's edge list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }
}

/// Wikipedia article title of a topic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_displays_bare_number() {
        assert_eq!(NodeId::new(42).to_string(), "42");
        assert!(NodeId::new(3) < NodeId::new(10));
    }

    #[test]
    fn test_label_from_text() {
        let owned: Label = String::from("Linear algebra").into();
        assert_eq!(owned.as_str(), "Linear algebra");
        assert_eq!(Label::new("Topology").to_string(), "Topology");
    }

    #[test]
    fn test_ids_serialize_as_plain_values() {
        assert_eq!(serde_json::to_string(&NodeId::new(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&EdgeId::new(2)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Label::new("Group")).unwrap(), "\"Group\"");
        assert_eq!(serde_json::from_str::<NodeId>("11").unwrap(), NodeId::new(11));
    }
}
