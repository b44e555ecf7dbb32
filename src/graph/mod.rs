//! Topic graph data model
//!
//! - Directed, weighted edges with parallel edges preserved
//! - Text-labelled nodes keyed by the dataset's integer ids
//! - A derived undirected projection used by the community, centrality,
//!   clustering and layout stages

pub mod edge;
pub mod node;
pub mod projection;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use projection::UndirectedProjection;
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use types::{EdgeId, Label, NodeId};
