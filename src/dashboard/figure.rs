//! Serializable network plot
//!
//! Mirrors the two-layer scatter figure of the dashboard: an edge layer of
//! line segments separated by `null` gaps and a node layer of coloured
//! markers with hover text.

use super::table::{ColorBy, NodeTable};
use crate::analytics::AnalyticsSnapshot;
use crate::graph::NodeId;
use serde::Serialize;
use std::collections::HashSet;

/// Marker diameter in pixels
pub const MARKER_SIZE: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeTrace {
    pub mode: &'static str,
    /// `[ux, vx, null, ...]`
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: Vec<f64>,
    pub colorbar_title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTrace {
    pub mode: &'static str,
    pub ids: Vec<NodeId>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    pub hovertext: Vec<String>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub edges: EdgeTrace,
    pub nodes: NodeTrace,
    /// Lock the y axis to the x axis at 1:1
    pub fix_aspect: bool,
}

/// Plot options taken from the controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureOptions {
    pub min_degree: usize,
    pub color_by: ColorBy,
    pub show_labels: bool,
    pub fix_aspect: bool,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            min_degree: 0,
            color_by: ColorBy::Community,
            show_labels: false,
            fix_aspect: true,
        }
    }
}

impl Figure {
    /// Build the plot for the nodes whose degree passes the filter
    pub fn build(snapshot: &AnalyticsSnapshot, table: &NodeTable, options: FigureOptions) -> Self {
        let visible = table.filter_min_degree(options.min_degree);
        let rows = visible.rows();

        let color = rows
            .iter()
            .map(|row| match options.color_by {
                ColorBy::Degree => row.degree as f64,
                ColorBy::Eigenvector => row.eigenvector,
                // Nodes without a community share colour 0
                ColorBy::Community => row.community.max(0) as f64,
            })
            .collect();

        let hovertext = rows
            .iter()
            .map(|row| {
                format!(
                    "node = {}<br>degree = {}<br>eigenvector = {:.3}<br>community = {}",
                    row.node, row.degree, row.eigenvector, row.community
                )
            })
            .collect();

        let text = options
            .show_labels
            .then(|| rows.iter().map(|row| row.node.to_string()).collect());

        let nodes = NodeTrace {
            mode: if options.show_labels {
                "markers+text"
            } else {
                "markers"
            },
            ids: rows.iter().map(|row| row.node).collect(),
            x: rows.iter().map(|row| row.x).collect(),
            y: rows.iter().map(|row| row.y).collect(),
            text,
            hovertext,
            marker: Marker {
                size: MARKER_SIZE,
                color,
                colorbar_title: options.color_by.key(),
            },
        };

        let kept: HashSet<NodeId> = rows.iter().map(|row| row.node).collect();
        let mut edges = EdgeTrace {
            mode: "lines",
            ..EdgeTrace::default()
        };
        for edge in snapshot.graph.all_edges() {
            if kept.contains(&edge.source) && kept.contains(&edge.target) {
                let (ux, uy) = snapshot.position_of(edge.source);
                let (vx, vy) = snapshot.position_of(edge.target);
                edges.x.extend([Some(ux), Some(vx), None]);
                edges.y.extend([Some(uy), Some(vy), None]);
            }
        }

        Figure {
            edges,
            nodes,
            fix_aspect: options.fix_aspect,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.ids.len()
    }

    /// Number of drawn edge segments
    pub fn edge_count(&self) -> usize {
        self.edges.x.len() / 3
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
