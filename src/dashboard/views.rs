//! Views driven by control events
//!
//! Each view keeps its latest output and recomputes it from the snapshot when
//! a control it depends on changes. Selections that match nothing render an
//! empty table instead of failing.

use super::events::{ChoiceType, ControlEvent, Subscriber, ViewContext};
use super::figure::{Figure, FigureOptions};
use super::table::{Metric, NodeTable};
use crate::graph::NodeId;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Columns of a community preview
pub const COMMUNITY_COLUMNS: [&str; 4] = ["node", "degree", "eigenvector", "clustering"];

/// A preview cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Node(NodeId),
    Count(usize),
    Real(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Node(id) => write!(f, "{}", id),
            Cell::Count(n) => write!(f, "{}", n),
            Cell::Real(x) => write!(f, "{:.6}", x),
        }
    }
}

/// Small table shown under the summary line
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl PreviewTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn empty_community() -> Self {
        PreviewTable {
            columns: COMMUNITY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

fn metric_cell(metric: Metric, value: f64) -> Cell {
    if metric.is_integral() {
        Cell::Count(value as usize)
    } else {
        Cell::Real(value)
    }
}

/// Top `n` nodes by a metric, as `(node, metric)` rows
pub fn metric_preview(table: &NodeTable, metric: Metric, n: usize) -> PreviewTable {
    PreviewTable {
        columns: vec!["node".to_string(), metric.key().to_string()],
        rows: table
            .top_n(metric, n)
            .rows()
            .iter()
            .map(|row| vec![Cell::Node(row.node), metric_cell(metric, metric.value(row))])
            .collect(),
    }
}

/// First `n` members of a community; empty with the same columns if it has none
pub fn community_preview(table: &NodeTable, community: i64, n: usize) -> PreviewTable {
    match table.community_members(community) {
        Ok(members) => PreviewTable {
            columns: COMMUNITY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: members
                .rows()
                .iter()
                .take(n)
                .map(|row| {
                    vec![
                        Cell::Node(row.node),
                        Cell::Count(row.degree),
                        Cell::Real(row.eigenvector),
                        Cell::Real(row.clustering),
                    ]
                })
                .collect(),
        },
        Err(err) => {
            warn!("{}", err);
            PreviewTable::empty_community()
        }
    }
}

/// One-line description of a metric column
pub fn metric_summary_text(table: &NodeTable, metric: Metric) -> String {
    let fmt3 = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v));

    let summary = table.metric_summary(metric);
    format!(
        "Selected metric: {}. Mean={}, Std={}, Min={}, Max={}",
        metric.key(),
        fmt3(summary.map(|s| s.mean)),
        fmt3(summary.and_then(|s| s.std)),
        fmt3(summary.map(|s| s.min)),
        fmt3(summary.map(|s| s.max)),
    )
}

/// One-line description of a community
pub fn community_summary_text(table: &NodeTable, community: i64) -> String {
    format!(
        "Selected community: {}. Size={} nodes.",
        community,
        table.community_size(community)
    )
}

/// Network plot
#[derive(Debug, Default)]
pub struct PlotView {
    figure: Option<Figure>,
}

impl PlotView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }
}

impl Subscriber for PlotView {
    fn render(&mut self, ctx: &ViewContext<'_>) {
        let options = FigureOptions {
            min_degree: ctx.state.min_degree,
            color_by: ctx.state.color_by,
            show_labels: ctx.state.show_labels,
            fix_aspect: ctx.state.fix_aspect,
        };
        let figure = Figure::build(ctx.snapshot, ctx.table, options);
        if figure.node_count() == 0 {
            warn!("No nodes with degree >= {}", options.min_degree);
        }
        self.figure = Some(figure);
    }

    fn interested(&self, event: &ControlEvent) -> bool {
        event.affects_plot()
    }
}

/// An option of the second selection dropdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub key: String,
    pub label: String,
}

/// The second dropdown: metrics or communities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chooser {
    pub choice_type: ChoiceType,
    pub options: Vec<ChoiceOption>,
    pub selected: String,
}

impl Chooser {
    pub fn metrics(selected: Metric) -> Self {
        Chooser {
            choice_type: ChoiceType::Metric,
            options: Metric::ALL
                .iter()
                .map(|m| ChoiceOption {
                    key: m.key().to_string(),
                    label: m.display_name().to_string(),
                })
                .collect(),
            selected: selected.key().to_string(),
        }
    }

    pub fn communities(table: &NodeTable, selected: i64) -> Self {
        let options: Vec<ChoiceOption> = table
            .community_choices()
            .into_iter()
            .map(|c| ChoiceOption {
                key: c.to_string(),
                label: format!("Community {}", c),
            })
            .collect();
        let selected = selected.to_string();
        let selected = if options.iter().any(|o| o.key == selected) {
            selected
        } else {
            options.first().map(|o| o.key.clone()).unwrap_or(selected)
        };

        Chooser {
            choice_type: ChoiceType::Community,
            options,
            selected,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChooserView {
    chooser: Option<Chooser>,
}

impl ChooserView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chooser(&self) -> Option<&Chooser> {
        self.chooser.as_ref()
    }
}

impl Subscriber for ChooserView {
    fn render(&mut self, ctx: &ViewContext<'_>) {
        self.chooser = Some(match ctx.state.choice_type {
            ChoiceType::Metric => Chooser::metrics(ctx.state.metric),
            ChoiceType::Community => Chooser::communities(ctx.table, ctx.state.community),
        });
    }

    fn interested(&self, event: &ControlEvent) -> bool {
        event.affects_selection()
    }
}

/// Summary line of the selection menu
#[derive(Debug, Default)]
pub struct SummaryView {
    text: String,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Subscriber for SummaryView {
    fn render(&mut self, ctx: &ViewContext<'_>) {
        self.text = match ctx.state.choice_type {
            ChoiceType::Metric => metric_summary_text(ctx.table, ctx.state.metric),
            ChoiceType::Community => community_summary_text(ctx.table, ctx.state.community),
        };
    }

    fn interested(&self, event: &ControlEvent) -> bool {
        event.affects_selection()
    }
}

/// Preview table of the selection menu
#[derive(Debug, Default)]
pub struct PreviewView {
    table: PreviewTable,
}

impl PreviewView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &PreviewTable {
        &self.table
    }
}

impl Subscriber for PreviewView {
    fn render(&mut self, ctx: &ViewContext<'_>) {
        self.table = match ctx.state.choice_type {
            ChoiceType::Metric => metric_preview(ctx.table, ctx.state.metric, ctx.config.top_n),
            ChoiceType::Community => {
                community_preview(ctx.table, ctx.state.community, ctx.config.preview_rows)
            }
        };
    }

    fn interested(&self, event: &ControlEvent) -> bool {
        event.affects_selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::table::NodeRow;

    fn row(node: u64, degree: usize, clustering: f64, community: i64) -> NodeRow {
        NodeRow {
            node: NodeId::new(node),
            label: format!("Topic {}", node),
            degree,
            in_degree: degree,
            out_degree: 0,
            eigenvector: 0.5,
            clustering,
            community,
            x: 0.0,
            y: 0.0,
        }
    }

    fn table() -> NodeTable {
        NodeTable::new((0..12).map(|i| row(i, i as usize, 0.25, (i % 2) as i64)).collect())
    }

    #[test]
    fn test_metric_preview_top_ten() {
        let preview = metric_preview(&table(), Metric::Degree, 10);

        assert_eq!(preview.columns, vec!["node", "degree"]);
        assert_eq!(preview.len(), 10);
        assert_eq!(preview.rows[0], vec![Cell::Node(NodeId::new(11)), Cell::Count(11)]);
        assert_eq!(preview.rows[9][0], Cell::Node(NodeId::new(2)));
    }

    #[test]
    fn test_community_preview() {
        let preview = community_preview(&table(), 1, 10);
        assert_eq!(preview.columns, COMMUNITY_COLUMNS);
        assert_eq!(preview.len(), 6);
        assert_eq!(preview.rows[0][0], Cell::Node(NodeId::new(1)));

        let limited = community_preview(&table(), 0, 2);
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_empty_community_degrades() {
        let preview = community_preview(&table(), 9, 10);
        assert!(preview.is_empty());
        assert_eq!(preview.columns, COMMUNITY_COLUMNS);
    }

    #[test]
    fn test_summary_text() {
        let t = NodeTable::new(vec![row(0, 1, 0.0, 0), row(1, 3, 1.0, 0)]);

        assert_eq!(
            metric_summary_text(&t, Metric::Degree),
            "Selected metric: degree. Mean=2.000, Std=1.414, Min=1.000, Max=3.000"
        );
        assert_eq!(community_summary_text(&t, 0), "Selected community: 0. Size=2 nodes.");
        assert_eq!(community_summary_text(&t, 4), "Selected community: 4. Size=0 nodes.");

        let single = NodeTable::new(vec![row(0, 1, 0.0, 0)]);
        assert!(metric_summary_text(&single, Metric::Clustering).contains("Std=n/a"));
    }

    #[test]
    fn test_chooser_options() {
        let metrics = Chooser::metrics(Metric::Eigenvector);
        let labels: Vec<&str> = metrics.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Degree (Total)",
                "In-Degree",
                "Out-Degree",
                "Eigenvector Centrality",
                "Clustering Coefficient"
            ]
        );
        assert_eq!(metrics.selected, "eigenvector");

        let communities = Chooser::communities(&table(), 5);
        assert_eq!(communities.options[1].label, "Community 1");
        assert_eq!(communities.selected, "0");
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Real(0.5).to_string(), "0.500000");
        assert_eq!(Cell::Count(4).to_string(), "4");
        assert_eq!(serde_json::to_string(&Cell::Node(NodeId::new(3))).unwrap(), "3");
    }
}
