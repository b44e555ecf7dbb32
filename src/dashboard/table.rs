//! Flat, read-only node table over an analytics snapshot

use crate::analytics::AnalyticsSnapshot;
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A selection matched no rows
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("community {community} has no members")]
pub struct EmptySelectionError {
    pub community: i64,
}

/// Error parsing a metric or colour name
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct UnknownChoiceError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Numeric node columns that can be ranked and summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Degree,
    InDegree,
    OutDegree,
    Eigenvector,
    Clustering,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Degree,
        Metric::InDegree,
        Metric::OutDegree,
        Metric::Eigenvector,
        Metric::Clustering,
    ];

    /// Column name
    pub fn key(self) -> &'static str {
        match self {
            Metric::Degree => "degree",
            Metric::InDegree => "in_degree",
            Metric::OutDegree => "out_degree",
            Metric::Eigenvector => "eigenvector",
            Metric::Clustering => "clustering",
        }
    }

    /// Menu label
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Degree => "Degree (Total)",
            Metric::InDegree => "In-Degree",
            Metric::OutDegree => "Out-Degree",
            Metric::Eigenvector => "Eigenvector Centrality",
            Metric::Clustering => "Clustering Coefficient",
        }
    }

    /// Whether the column holds counts rather than real numbers
    pub fn is_integral(self) -> bool {
        matches!(self, Metric::Degree | Metric::InDegree | Metric::OutDegree)
    }

    pub fn value(self, row: &NodeRow) -> f64 {
        match self {
            Metric::Degree => row.degree as f64,
            Metric::InDegree => row.in_degree as f64,
            Metric::OutDegree => row.out_degree as f64,
            Metric::Eigenvector => row.eigenvector,
            Metric::Clustering => row.clustering,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = UnknownChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| UnknownChoiceError {
                kind: "metric",
                value: s.to_string(),
                expected: Metric::ALL.map(Metric::key).join(", "),
            })
    }
}

/// Node colouring for the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBy {
    Degree,
    Eigenvector,
    #[default]
    Community,
}

impl ColorBy {
    pub const ALL: [ColorBy; 3] = [ColorBy::Degree, ColorBy::Eigenvector, ColorBy::Community];

    pub fn key(self) -> &'static str {
        match self {
            ColorBy::Degree => "degree",
            ColorBy::Eigenvector => "eigenvector",
            ColorBy::Community => "community",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ColorBy::Degree => "Degree",
            ColorBy::Eigenvector => "Eigenvector Centrality",
            ColorBy::Community => "Community",
        }
    }
}

impl fmt::Display for ColorBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColorBy {
    type Err = UnknownChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorBy::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| UnknownChoiceError {
                kind: "colour",
                value: s.to_string(),
                expected: ColorBy::ALL.map(ColorBy::key).join(", "),
            })
    }
}

/// One node with all of its computed attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub node: NodeId,
    pub label: String,
    pub degree: usize,
    pub in_degree: usize,
    pub out_degree: usize,
    pub eigenvector: f64,
    pub clustering: f64,
    /// -1 when the node belongs to no community
    pub community: i64,
    pub x: f64,
    pub y: f64,
}

/// Summary statistics of one metric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent below two rows
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Rows in node order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NodeTable {
    rows: Vec<NodeRow>,
}

impl NodeTable {
    pub fn new(rows: Vec<NodeRow>) -> Self {
        Self { rows }
    }

    /// One row per graph node, in node order
    pub fn from_snapshot(snapshot: &AnalyticsSnapshot) -> Self {
        let graph = &snapshot.graph;
        let rows = graph
            .all_nodes()
            .iter()
            .map(|node| {
                let (x, y) = snapshot.position_of(node.id);
                NodeRow {
                    node: node.id,
                    label: node.label.as_str().to_string(),
                    degree: graph.degree(node.id),
                    in_degree: graph.in_degree(node.id),
                    out_degree: graph.out_degree(node.id),
                    eigenvector: snapshot.eigenvector_of(node.id),
                    clustering: snapshot.clustering_of(node.id),
                    community: snapshot
                        .communities
                        .community_of(node.id)
                        .map_or(-1, |c| c as i64),
                    x,
                    y,
                }
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[NodeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeRow> {
        self.rows.iter().find(|row| row.node == node)
    }

    /// Rows whose total degree is at least `min_degree`
    pub fn filter_min_degree(&self, min_degree: usize) -> NodeTable {
        NodeTable {
            rows: self
                .rows
                .iter()
                .filter(|row| row.degree >= min_degree)
                .cloned()
                .collect(),
        }
    }

    /// At most `n` rows, highest `metric` first; ties keep node order
    pub fn top_n(&self, metric: Metric, n: usize) -> NodeTable {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| metric.value(b).total_cmp(&metric.value(a)));
        rows.truncate(n);
        NodeTable { rows }
    }

    /// Members of a community in node order
    pub fn community_members(&self, community: i64) -> Result<NodeTable, EmptySelectionError> {
        let rows: Vec<NodeRow> = self
            .rows
            .iter()
            .filter(|row| row.community == community)
            .cloned()
            .collect();

        if rows.is_empty() {
            return Err(EmptySelectionError { community });
        }
        Ok(NodeTable { rows })
    }

    /// Number of rows in a community
    pub fn community_size(&self, community: i64) -> usize {
        self.rows.iter().filter(|row| row.community == community).count()
    }

    /// Mean, sample std, min and max of a metric; `None` for an empty table
    pub fn metric_summary(&self, metric: Metric) -> Option<MetricSummary> {
        if self.rows.is_empty() {
            return None;
        }

        let values: Vec<f64> = self.rows.iter().map(|row| metric.value(row)).collect();
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(MetricSummary {
            metric,
            count,
            mean,
            std,
            min,
            max,
        })
    }

    /// Sorted distinct community ids; `[0]` when no node has one
    pub fn community_choices(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .rows
            .iter()
            .map(|row| row.community)
            .filter(|&c| c >= 0)
            .collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            ids.push(0);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(node: u64, degree: usize, eigenvector: f64, community: i64) -> NodeRow {
        NodeRow {
            node: NodeId::new(node),
            label: format!("Topic {}", node),
            degree,
            in_degree: degree / 2,
            out_degree: degree - degree / 2,
            eigenvector,
            clustering: 0.0,
            community,
            x: 0.0,
            y: 0.0,
        }
    }

    fn table() -> NodeTable {
        NodeTable::new(vec![
            row(0, 3, 0.2, 0),
            row(1, 5, 0.9, 0),
            row(2, 1, 0.2, 1),
            row(3, 5, 0.1, 1),
            row(4, 0, 0.0, -1),
        ])
    }

    fn nodes(table: &NodeTable) -> Vec<u64> {
        table.rows().iter().map(|r| r.node.as_u64()).collect()
    }

    #[test]
    fn test_filter_min_degree() {
        let t = table();
        assert_eq!(t.filter_min_degree(0), t);
        assert_eq!(nodes(&t.filter_min_degree(3)), vec![0, 1, 3]);
        assert!(t.filter_min_degree(6).is_empty());
    }

    #[test]
    fn test_top_n_sorted_with_stable_ties() {
        let t = table();

        assert_eq!(nodes(&t.top_n(Metric::Degree, 10)), vec![1, 3, 0, 2, 4]);
        assert_eq!(nodes(&t.top_n(Metric::Eigenvector, 3)), vec![1, 0, 2]);
        assert!(t.top_n(Metric::Degree, 0).is_empty());
    }

    #[test]
    fn test_community_members() {
        let t = table();

        assert_eq!(nodes(&t.community_members(1).unwrap()), vec![2, 3]);
        assert_eq!(
            t.community_members(7),
            Err(EmptySelectionError { community: 7 })
        );
        assert_eq!(t.community_size(0), 2);
    }

    #[test]
    fn test_metric_summary() {
        let summary = table().metric_summary(Metric::Degree).unwrap();

        assert_eq!(summary.count, 5);
        assert!((summary.mean - 2.8).abs() < 1e-12);
        // deviations: 0.2, 2.2, -1.8, 2.2, -2.8 -> ss = 20.8
        assert!((summary.std.unwrap() - (20.8_f64 / 4.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_metric_summary_small_tables() {
        let single = NodeTable::new(vec![row(0, 2, 0.5, 0)]);
        let summary = single.metric_summary(Metric::Eigenvector).unwrap();
        assert_eq!(summary.std, None);
        assert_eq!(summary.mean, 0.5);

        assert_eq!(NodeTable::default().metric_summary(Metric::Degree), None);
    }

    #[test]
    fn test_community_choices() {
        assert_eq!(table().community_choices(), vec![0, 1]);

        let orphans = NodeTable::new(vec![row(0, 1, 0.0, -1)]);
        assert_eq!(orphans.community_choices(), vec![0]);
        assert_eq!(NodeTable::default().community_choices(), vec![0]);
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("in_degree".parse::<Metric>(), Ok(Metric::InDegree));
        assert_eq!(Metric::Clustering.display_name(), "Clustering Coefficient");
        let err = "pagerank".parse::<Metric>().unwrap_err();
        assert!(err.to_string().contains("eigenvector"));

        assert_eq!("eigenvector".parse::<ColorBy>(), Ok(ColorBy::Eigenvector));
        assert_eq!(ColorBy::default(), ColorBy::Community);
    }
}
