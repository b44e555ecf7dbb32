//! mathgraph
//!
//! Exploration tools for the directed knowledge graph of Wikipedia
//! mathematics articles.
//!
//! # Architecture
//!
//! - [`loader`] reads the `node_ids` / `edges` / `weights` JSON document into
//!   a directed, weighted [`GraphStore`]
//! - [`analytics`] runs the one-shot pipeline (components, projection,
//!   communities, centrality, clustering, layout) and freezes the results in
//!   an [`AnalyticsSnapshot`]
//! - [`dashboard`] turns the snapshot into tables, a plot figure and a
//!   selection menu driven by control events
//!
//! The algorithms themselves live in the `mathgraph-algorithms` crate; the
//! [`algo`] module adapts the store to its CSR views.
//!
//! ## Example Usage
//!
//! ```rust
//! use mathgraph::analytics::Pipeline;
//! use mathgraph::dashboard::{Metric, NodeTable};
//! use mathgraph::loader;
//!
//! let json = r#"{
//!     "node_ids": {"Algebra": 0, "Geometry": 1, "Topology": 2},
//!     "edges": [[0, 1], [1, 2], [2, 0]],
//!     "weights": [1, 1, 1]
//! }"#;
//!
//! let graph = loader::load_from_str(json).unwrap().into_graph().unwrap();
//! let snapshot = Pipeline::default().run(graph).unwrap();
//!
//! let table = NodeTable::from_snapshot(&snapshot);
//! let top = table.top_n(Metric::Degree, 2);
//! assert_eq!(top.len(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod graph;
pub mod loader;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, GraphError, GraphResult, GraphStore, Label, Node, NodeId, UndirectedProjection,
};

pub use loader::{load_from_path, load_from_reader, load_from_str, DataFormatError, Dataset};

pub use config::{AppConfig, ConfigError, DashboardConfig, PipelineConfig};

pub use analytics::{AnalyticsSnapshot, Pipeline, PipelineError, PipelineResult};

pub use dashboard::{ControlEvent, ControlState, Dashboard, EmptySelectionError, Metric, NodeTable};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
