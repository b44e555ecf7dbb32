//! One-shot analytics pipeline
//!
//! Runs every stage over a freshly built graph and freezes the results into
//! an [`AnalyticsSnapshot`]:
//!
//! 1. weak and strong components of the directed graph
//! 2. undirected projection
//! 3. greedy modularity communities on the projection
//! 4. degrees, eigenvector centrality and clustering
//! 5. spring layout of the projection
//!
//! Nothing is cached between runs.

pub mod metrics;

use crate::algo::{
    build_directed_view, build_undirected_view, clustering_coefficients, eigenvector_centrality,
    greedy_modularity_communities, spring_layout, strongly_connected_components,
    weakly_connected_components, ComponentsResult, ConvergenceError,
};
use crate::config::{ConfigError, PipelineConfig};
use crate::graph::{GraphStore, NodeId, UndirectedProjection};
use crate::loader::{self, DataFormatError};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

pub use metrics::{community_count, community_hubs, DegreeDistribution, DegreeStats};

/// Any failure that aborts a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("data format error: {0}")]
    DataFormat(#[from] DataFormatError),

    #[error("{0}")]
    Convergence(#[from] ConvergenceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Connected components keyed by application node ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    /// Members in node order; components ordered by their first member
    pub components: Vec<Vec<NodeId>>,
    pub node_component: HashMap<NodeId, usize>,
}

impl Components {
    fn from_result(result: ComponentsResult) -> Self {
        Components {
            components: result
                .components
                .into_iter()
                .map(|members| members.into_iter().map(NodeId::new).collect())
                .collect(),
            node_component: result
                .node_component
                .into_iter()
                .map(|(node, component)| (NodeId::new(node), component))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Largest component; the first one wins a tie
    pub fn largest(&self) -> Option<&[NodeId]> {
        self.components
            .iter()
            .fold(None, |best: Option<&Vec<NodeId>>, c| match best {
                Some(b) if b.len() >= c.len() => Some(b),
                _ => Some(c),
            })
            .map(|c| c.as_slice())
    }

    /// Component sizes in component order
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }
}

/// Community partition of the projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Communities {
    /// Largest community first
    pub communities: Vec<Vec<NodeId>>,
    pub node_community: HashMap<NodeId, usize>,
    pub modularity: f64,
}

impl Communities {
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn community_of(&self, node: NodeId) -> Option<usize> {
        self.node_community.get(&node).copied()
    }
}

/// Immutable result of a pipeline run
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    pub graph: GraphStore,
    pub projection: UndirectedProjection,
    pub weak_components: Components,
    pub strong_components: Components,
    pub communities: Communities,
    pub eigenvector: HashMap<NodeId, f64>,
    pub clustering: HashMap<NodeId, f64>,
    pub layout: HashMap<NodeId, (f64, f64)>,
    pub degree_stats: DegreeStats,
    pub degree_distribution: DegreeDistribution,
    /// Highest out-degree member per community, indexed by community id
    pub hubs: Vec<NodeId>,
    pub community_count: usize,
}

impl AnalyticsSnapshot {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn largest_weak_component(&self) -> Option<&[NodeId]> {
        self.weak_components.largest()
    }

    pub fn largest_strong_component(&self) -> Option<&[NodeId]> {
        self.strong_components.largest()
    }

    pub fn eigenvector_of(&self, node: NodeId) -> f64 {
        self.eigenvector.get(&node).copied().unwrap_or(0.0)
    }

    pub fn clustering_of(&self, node: NodeId) -> f64 {
        self.clustering.get(&node).copied().unwrap_or(0.0)
    }

    pub fn position_of(&self, node: NodeId) -> (f64, f64) {
        self.layout.get(&node).copied().unwrap_or((0.0, 0.0))
    }
}

/// Runs the analytics stages with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load a dataset file and analyze it
    pub fn run_path(&self, path: impl AsRef<Path>) -> PipelineResult<AnalyticsSnapshot> {
        let graph = loader::load_graph(path)?;
        self.run(graph)
    }

    /// Analyze an already built graph
    pub fn run(&self, graph: GraphStore) -> PipelineResult<AnalyticsSnapshot> {
        self.config.validate()?;

        let start = Instant::now();
        info!(
            "Running analytics on {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let directed = build_directed_view(&graph);
        let weak_components = Components::from_result(weakly_connected_components(&directed));
        let strong_components = Components::from_result(strongly_connected_components(&directed));
        debug!(
            "Components: {} weak (largest {}), {} strong (largest {})",
            weak_components.len(),
            weak_components.largest().map_or(0, <[NodeId]>::len),
            strong_components.len(),
            strong_components.largest().map_or(0, <[NodeId]>::len)
        );

        let projection = UndirectedProjection::from_store(&graph);
        let undirected = build_undirected_view(&projection);
        debug!(
            "Projection has {} undirected edges",
            projection.edge_count()
        );

        let detected = greedy_modularity_communities(&undirected, self.config.community);
        let communities = Communities {
            communities: detected
                .communities
                .into_iter()
                .map(|members| members.into_iter().map(NodeId::new).collect())
                .collect(),
            node_community: detected
                .node_community
                .into_iter()
                .map(|(node, c)| (NodeId::new(node), c))
                .collect(),
            modularity: detected.modularity,
        };
        info!(
            "Found {} communities (modularity {:.4})",
            communities.len(),
            communities.modularity
        );

        let eigenvector = rekey(eigenvector_centrality(&undirected, self.config.eigenvector)?);
        let clustering = rekey(clustering_coefficients(&undirected));
        debug!("Computed eigenvector centrality and clustering");

        let layout = rekey(spring_layout(&undirected, self.config.layout));
        debug!("Computed layout with seed {:?}", self.config.layout.seed);

        let degree_stats = DegreeStats::from_store(&graph);
        let degree_distribution = DegreeDistribution::from_stats(&degree_stats);
        let hubs = community_hubs(&graph, &communities.communities);
        let community_count = community_count(&communities.communities);

        info!("Analytics finished in {:?}", start.elapsed());

        Ok(AnalyticsSnapshot {
            graph,
            projection,
            weak_components,
            strong_components,
            communities,
            eigenvector,
            clustering,
            layout,
            degree_stats,
            degree_distribution,
            hubs,
            community_count,
        })
    }
}

fn rekey<V>(map: HashMap<u64, V>) -> HashMap<NodeId, V> {
    map.into_iter().map(|(k, v)| (NodeId::new(k), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{EigenvectorConfig, LayoutConfig};

    fn five_node_graph() -> GraphStore {
        let mut store = GraphStore::new();
        for id in 0..5 {
            store.create_node(NodeId::new(id), format!("Topic {}", id)).unwrap();
        }
        for (s, t) in [(0, 1), (1, 2), (2, 0), (3, 4)] {
            store.create_edge(NodeId::new(s), NodeId::new(t), 1.0).unwrap();
        }
        store
    }

    fn seeded() -> Pipeline {
        Pipeline::new(PipelineConfig {
            layout: LayoutConfig {
                seed: Some(1),
                ..LayoutConfig::default()
            },
            ..PipelineConfig::default()
        })
    }

    fn ids(v: &[u64]) -> Vec<NodeId> {
        v.iter().map(|&i| NodeId::new(i)).collect()
    }

    #[test]
    fn test_components() {
        let snapshot = seeded().run(five_node_graph()).unwrap();

        assert_eq!(snapshot.weak_components.components, vec![ids(&[0, 1, 2]), ids(&[3, 4])]);
        assert_eq!(
            snapshot.strong_components.components,
            vec![ids(&[0, 1, 2]), ids(&[3]), ids(&[4])]
        );
        assert_eq!(snapshot.largest_weak_component(), Some(ids(&[0, 1, 2]).as_slice()));
        assert_eq!(snapshot.largest_strong_component().map(<[NodeId]>::len), Some(3));
    }

    #[test]
    fn test_every_node_has_metrics() {
        let snapshot = seeded().run(five_node_graph()).unwrap();

        for node in snapshot.graph.node_ids() {
            assert!(snapshot.communities.community_of(node).is_some());
            let e = snapshot.eigenvector[&node];
            assert!((0.0..=1.0).contains(&e));
            let c = snapshot.clustering[&node];
            assert!((0.0..=1.0).contains(&c));
            let (x, y) = snapshot.layout[&node];
            assert!(x.is_finite() && y.is_finite());
        }
        assert_eq!(snapshot.hubs.len(), snapshot.communities.len());
        assert_eq!(snapshot.community_count, snapshot.communities.len());
    }

    #[test]
    fn test_communities_split_components() {
        let snapshot = seeded().run(five_node_graph()).unwrap();

        assert_eq!(snapshot.communities.communities, vec![ids(&[0, 1, 2]), ids(&[3, 4])]);
        assert_eq!(snapshot.hubs, ids(&[0, 3]));
    }

    #[test]
    fn test_convergence_failure_surfaces() {
        let pipeline = Pipeline::new(PipelineConfig {
            eigenvector: EigenvectorConfig {
                max_iterations: 1,
                tolerance: 0.0,
                weighted: false,
            },
            ..PipelineConfig::default()
        });

        let err = pipeline.run(five_node_graph()).unwrap_err();
        assert!(matches!(err, PipelineError::Convergence(_)));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let pipeline = Pipeline::new(PipelineConfig {
            eigenvector: EigenvectorConfig {
                max_iterations: 0,
                ..EigenvectorConfig::default()
            },
            ..PipelineConfig::default()
        });
        let err = pipeline.run(five_node_graph()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::Invalid(_))));

        let mut config = PipelineConfig::default();
        config.community.resolution = f64::NAN;
        let err = Pipeline::new(config).run(five_node_graph()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(err.to_string().contains("community.resolution"));
    }

    #[test]
    fn test_empty_graph() {
        let snapshot = seeded().run(GraphStore::new()).unwrap();

        assert_eq!(snapshot.node_count(), 0);
        assert!(snapshot.communities.is_empty());
        assert_eq!(snapshot.community_count, 1);
        assert!(snapshot.layout.is_empty());
        assert_eq!(snapshot.largest_weak_component(), None);
    }
}
