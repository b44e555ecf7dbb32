use mathgraph::algo::LayoutConfig;
use mathgraph::analytics::{Pipeline, PipelineError};
use mathgraph::config::{AppConfig, PipelineConfig};
use mathgraph::graph::NodeId;
use mathgraph::loader::{self, DataFormatError};
use std::collections::HashSet;
use std::io::Write;

/// Two directed triangles joined by one weak link, plus an isolated topic
const DATASET: &str = r#"{
    "node_ids": {
        "Algebra": 0, "Group theory": 1, "Ring theory": 2,
        "Geometry": 3, "Topology": 4, "Manifold": 5,
        "Logic": 6
    },
    "edges": [[0, 1], [1, 2], [2, 0], [3, 4], [4, 5], [5, 3], [2, 3]],
    "weights": [1, 1, 1, 1, 1, 1, 0.5]
}"#;

fn seeded(seed: u64) -> Pipeline {
    Pipeline::new(PipelineConfig {
        layout: LayoutConfig {
            seed: Some(seed),
            ..LayoutConfig::default()
        },
        ..PipelineConfig::default()
    })
}

fn dataset_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn ids(v: &[u64]) -> Vec<NodeId> {
    v.iter().map(|&i| NodeId::new(i)).collect()
}

#[test]
fn test_pipeline_from_file() {
    let file = dataset_file(DATASET);
    let snapshot = seeded(42).run_path(file.path()).unwrap();

    assert_eq!(snapshot.node_count(), 7);
    assert_eq!(snapshot.edge_count(), 7);
    assert_eq!(snapshot.graph.label_of(NodeId::new(4)).unwrap().as_str(), "Topology");
}

#[test]
fn test_weak_components_cover_every_node_once() {
    let snapshot = seeded(1).run(loader::load_from_str(DATASET).unwrap().into_graph().unwrap()).unwrap();

    let weak = &snapshot.weak_components;
    assert_eq!(weak.components, vec![ids(&[0, 1, 2, 3, 4, 5]), ids(&[6])]);
    assert_eq!(weak.sizes().iter().sum::<usize>(), snapshot.node_count());
    assert_eq!(weak.node_component.len(), snapshot.node_count());

    // The bridge 2 -> 3 is one-way, so the triangles stay separate
    let strong = &snapshot.strong_components;
    assert_eq!(strong.components, vec![ids(&[0, 1, 2]), ids(&[3, 4, 5]), ids(&[6])]);
    assert_eq!(snapshot.largest_strong_component(), Some(ids(&[0, 1, 2]).as_slice()));
}

#[test]
fn test_communities_partition_the_projection() {
    let snapshot = seeded(1).run(loader::load_from_str(DATASET).unwrap().into_graph().unwrap()).unwrap();

    let mut seen = HashSet::new();
    for members in &snapshot.communities.communities {
        for node in members {
            assert!(seen.insert(*node), "{} appears twice", node);
        }
    }
    let projected: HashSet<NodeId> = snapshot.projection.nodes().iter().copied().collect();
    assert_eq!(seen, projected);

    assert_eq!(
        snapshot.communities.communities,
        vec![ids(&[0, 1, 2]), ids(&[3, 4, 5]), ids(&[6])]
    );
    assert!(snapshot.communities.modularity > 0.0);
    assert_eq!(snapshot.community_count, 3);
}

#[test]
fn test_metric_ranges() {
    let snapshot = seeded(5).run(loader::load_from_str(DATASET).unwrap().into_graph().unwrap()).unwrap();

    for node in snapshot.graph.node_ids() {
        let e = snapshot.eigenvector_of(node);
        let c = snapshot.clustering_of(node);
        assert!((0.0..=1.0).contains(&e), "eigenvector {} out of range", e);
        assert!((0.0..=1.0).contains(&c), "clustering {} out of range", c);
    }

    // Triangle corners untouched by the bridge are fully clustered
    assert_eq!(snapshot.clustering_of(NodeId::new(0)), 1.0);
    assert_eq!(snapshot.clustering_of(NodeId::new(6)), 0.0);
    // An isolated topic decays towards zero under power iteration
    assert!(snapshot.eigenvector_of(NodeId::new(6)) < 1e-3);

    assert_eq!(snapshot.degree_stats.max_degree, 2);
    assert_eq!(snapshot.degree_distribution.in_degree, vec![(0, 1), (1, 5), (2, 1)]);
}

#[test]
fn test_layout_is_reproducible_with_a_seed() {
    let graph = loader::load_from_str(DATASET).unwrap().into_graph().unwrap();

    let first = seeded(9).run(graph.clone()).unwrap();
    let second = seeded(9).run(graph).unwrap();

    assert_eq!(first.layout, second.layout);
    for &(x, y) in first.layout.values() {
        assert!(x.is_finite() && y.is_finite());
    }
}

#[test]
fn test_pipeline_is_deterministic_apart_from_layout() {
    let graph = loader::load_from_str(DATASET).unwrap().into_graph().unwrap();

    let a = Pipeline::default().run(graph.clone()).unwrap();
    let b = Pipeline::default().run(graph).unwrap();

    assert_eq!(a.communities, b.communities);
    assert_eq!(a.hubs, b.hubs);
    assert_eq!(a.eigenvector, b.eigenvector);
}

#[test]
fn test_data_format_errors_abort_the_run() {
    let file = dataset_file(r#"{"node_ids": {"A": 0}, "edges": [[0, 3]], "weights": [1]}"#);
    let err = seeded(1).run_path(file.path()).unwrap_err();

    match err {
        PipelineError::DataFormat(DataFormatError::UnknownNode { edge, node }) => {
            assert_eq!(edge, 0);
            assert_eq!(node, NodeId::new(3));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_yaml_config_drives_the_pipeline() {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "pipeline:\n  eigenvector:\n    max_iterations: 1\n    tolerance: 0.0").unwrap();

    let config = AppConfig::from_yaml_path(config_file.path()).unwrap();
    let graph = loader::load_from_str(DATASET).unwrap().into_graph().unwrap();

    let err = Pipeline::new(config.pipeline).run(graph).unwrap_err();
    assert!(matches!(err, PipelineError::Convergence(_)));
    assert!(err.to_string().contains("converge"));
}
