//! Dataset loader
//!
//! Reads the knowledge-graph JSON document:
//!
//! ```json
//! {
//!   "node_ids": { "Algebra": 0, "Geometry": 1 },
//!   "edges":    [[0, 1], [1, 0]],
//!   "weights":  [1, 2]
//! }
//! ```
//!
//! `node_ids` maps label -> id, the reverse of what the graph needs, so the
//! loader inverts it. That the file really is keyed this way is an observed
//! property of the published dataset, not a documented contract; any
//! duplicated id is rejected rather than silently resolved.
//!
//! Repeated `[source, target]` pairs are kept as parallel edges, each with its
//! own weight, so every copy counts towards the in- and out-degrees. A simple
//! directed graph would instead keep one edge carrying the last weight. Only
//! the undirected projection collapses them, with the last weight winning.

use crate::graph::{GraphError, GraphStore, Label, NodeId};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while reading or validating a dataset
#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("missing field `{0}` in dataset")]
    MissingField(&'static str),

    #[error("`edges` has {edges} entries but `weights` has {weights}")]
    LengthMismatch { edges: usize, weights: usize },

    #[error("edge {edge} references unknown node {node}")]
    UnknownNode { edge: usize, node: NodeId },

    #[error("node id {id} is mapped from both {first:?} and {second:?}")]
    DuplicateId {
        id: NodeId,
        first: String,
        second: String,
    },

    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DataFormatResult<T> = Result<T, DataFormatError>;

/// Wire shape of the document; every key is optional so absence can be
/// reported by name.
#[derive(Debug, Deserialize)]
struct RawDataset {
    node_ids: Option<IndexMap<String, u64>>,
    edges: Option<Vec<[u64; 2]>>,
    weights: Option<Vec<f64>>,
}

/// A validated dataset, ready to become a [`GraphStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// id -> label, ascending by id
    pub labels: IndexMap<NodeId, Label>,
    /// `(source, target, weight)` in input order
    pub edges: Vec<(NodeId, NodeId, f64)>,
}

impl Dataset {
    fn from_raw(raw: RawDataset) -> DataFormatResult<Self> {
        let node_ids = raw.node_ids.ok_or(DataFormatError::MissingField("node_ids"))?;
        let edges = raw.edges.ok_or(DataFormatError::MissingField("edges"))?;
        let weights = raw.weights.ok_or(DataFormatError::MissingField("weights"))?;

        if edges.len() != weights.len() {
            return Err(DataFormatError::LengthMismatch {
                edges: edges.len(),
                weights: weights.len(),
            });
        }

        // label -> id  becomes  id -> label
        let mut labels: IndexMap<NodeId, Label> = IndexMap::with_capacity(node_ids.len());
        for (label, id) in node_ids {
            let id = NodeId::new(id);
            if let Some(existing) = labels.get(&id) {
                return Err(DataFormatError::DuplicateId {
                    id,
                    first: existing.as_str().to_string(),
                    second: label,
                });
            }
            labels.insert(id, Label::new(label));
        }
        labels.sort_keys();

        let mut weighted_edges = Vec::with_capacity(edges.len());
        for (index, ([source, target], weight)) in edges.into_iter().zip(weights).enumerate() {
            let (source, target) = (NodeId::new(source), NodeId::new(target));
            for node in [source, target] {
                if !labels.contains_key(&node) {
                    return Err(DataFormatError::UnknownNode { edge: index, node });
                }
            }
            weighted_edges.push((source, target, weight));
        }

        Ok(Dataset {
            labels,
            edges: weighted_edges,
        })
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build the directed weighted graph
    pub fn into_graph(self) -> DataFormatResult<GraphStore> {
        let mut store = GraphStore::with_capacity(self.labels.len(), self.edges.len());

        for (id, label) in self.labels {
            store
                .create_node(id, label)
                .map_err(|err| store_error(err, 0))?;
        }

        for (index, (source, target, weight)) in self.edges.into_iter().enumerate() {
            store
                .create_edge(source, target, weight)
                .map_err(|err| store_error(err, index))?;
        }

        debug!(
            "Built graph with {} nodes and {} edges",
            store.node_count(),
            store.edge_count()
        );
        Ok(store)
    }
}

/// Map a store rejection onto the loader's error taxonomy
///
/// Only reachable for a hand-built [`Dataset`]; parsed datasets are
/// validated before any node is created.
fn store_error(err: GraphError, edge: usize) -> DataFormatError {
    match err {
        GraphError::NodeAlreadyExists(id) => DataFormatError::DuplicateId {
            id,
            first: String::new(),
            second: String::new(),
        },
        GraphError::InvalidEdgeSource(node)
        | GraphError::InvalidEdgeTarget(node) => DataFormatError::UnknownNode { edge, node },
    }
}

/// Parse and validate a dataset from a JSON string
pub fn load_from_str(json: &str) -> DataFormatResult<Dataset> {
    let raw: RawDataset = serde_json::from_str(json)?;
    Dataset::from_raw(raw)
}

/// Parse and validate a dataset from any reader
pub fn load_from_reader<R: Read>(reader: R) -> DataFormatResult<Dataset> {
    let raw: RawDataset = serde_json::from_reader(reader)?;
    Dataset::from_raw(raw)
}

/// Parse and validate a dataset file
pub fn load_from_path(path: impl AsRef<Path>) -> DataFormatResult<Dataset> {
    let path = path.as_ref();
    info!("Loading dataset from {:?}", path);

    let file = File::open(path).map_err(|source| DataFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_from_reader(BufReader::new(file))?;

    info!(
        "Loaded {} topics and {} links",
        dataset.node_count(),
        dataset.edge_count()
    );
    Ok(dataset)
}

/// Load a dataset file straight into a graph
pub fn load_graph(path: impl AsRef<Path>) -> DataFormatResult<GraphStore> {
    load_from_path(path)?.into_graph()
}
