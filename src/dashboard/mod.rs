//! Presentation model
//!
//! Reads an [`AnalyticsSnapshot`](crate::analytics::AnalyticsSnapshot)
//! through a flat [`NodeTable`] and never writes back. Controls publish
//! [`ControlEvent`]s; subscribed views recompute synchronously.

pub mod events;
pub mod figure;
pub mod table;
pub mod views;

pub use events::{ChoiceType, ControlEvent, ControlState, Dashboard, SharedSubscriber, Subscriber, ViewContext};
pub use figure::{EdgeTrace, Figure, FigureOptions, Marker, NodeTrace};
pub use table::{
    ColorBy, EmptySelectionError, Metric, MetricSummary, NodeRow, NodeTable, UnknownChoiceError,
};
pub use views::{
    community_preview, community_summary_text, metric_preview, metric_summary_text, Cell,
    ChoiceOption, Chooser, ChooserView, PlotView, PreviewTable, PreviewView, SummaryView,
};
