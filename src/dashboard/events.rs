//! Control state and change notification
//!
//! Every user control maps to one [`ControlEvent`]. [`Dashboard::publish`]
//! applies the event to the [`ControlState`] and then hands the new state to
//! each subscriber in the order they subscribed, on the caller's thread.

use super::table::{ColorBy, Metric, NodeTable};
use crate::analytics::AnalyticsSnapshot;
use crate::config::DashboardConfig;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// What the selection menu is choosing between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceType {
    #[default]
    Metric,
    Community,
}

/// Current value of every control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlState {
    pub min_degree: usize,
    pub color_by: ColorBy,
    pub show_labels: bool,
    pub fix_aspect: bool,
    pub choice_type: ChoiceType,
    pub metric: Metric,
    pub community: i64,
}

impl ControlState {
    /// Defaults, with the community selection on the first available choice
    pub fn for_table(table: &NodeTable) -> Self {
        Self {
            community: table.community_choices().first().copied().unwrap_or(0),
            ..Self::default()
        }
    }

    /// Apply one change; returns whether anything changed
    pub fn apply(&mut self, event: &ControlEvent) -> bool {
        let before = self.clone();
        match *event {
            ControlEvent::MinDegree(value) => self.min_degree = value,
            ControlEvent::ColorBy(value) => self.color_by = value,
            ControlEvent::ShowLabels(value) => self.show_labels = value,
            ControlEvent::FixAspect(value) => self.fix_aspect = value,
            ControlEvent::ChoiceType(value) => self.choice_type = value,
            ControlEvent::Metric(value) => self.metric = value,
            ControlEvent::Community(value) => self.community = value,
        }
        *self != before
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            min_degree: 0,
            color_by: ColorBy::Community,
            show_labels: false,
            fix_aspect: true,
            choice_type: ChoiceType::Metric,
            metric: Metric::Degree,
            community: 0,
        }
    }
}

/// A single control change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    MinDegree(usize),
    ColorBy(ColorBy),
    ShowLabels(bool),
    FixAspect(bool),
    ChoiceType(ChoiceType),
    Metric(Metric),
    Community(i64),
}

impl ControlEvent {
    /// Whether the event changes the network plot
    pub fn affects_plot(&self) -> bool {
        matches!(
            self,
            ControlEvent::MinDegree(_)
                | ControlEvent::ColorBy(_)
                | ControlEvent::ShowLabels(_)
                | ControlEvent::FixAspect(_)
        )
    }

    /// Whether the event changes the selection menu outputs
    pub fn affects_selection(&self) -> bool {
        !self.affects_plot()
    }
}

/// Everything a view may read while recomputing
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub snapshot: &'a AnalyticsSnapshot,
    pub table: &'a NodeTable,
    pub state: &'a ControlState,
    pub config: &'a DashboardConfig,
}

/// A view that recomputes its output from the snapshot and control state
pub trait Subscriber {
    /// Recompute from scratch
    fn render(&mut self, ctx: &ViewContext<'_>);

    /// Whether this view depends on the control an event changed
    fn interested(&self, _event: &ControlEvent) -> bool {
        true
    }

    /// Called once per published event
    fn notify(&mut self, ctx: &ViewContext<'_>, event: &ControlEvent) {
        if self.interested(event) {
            self.render(ctx);
        }
    }
}

pub type SharedSubscriber = Arc<Mutex<dyn Subscriber>>;

/// Owns the snapshot, the control state and the subscribed views
pub struct Dashboard {
    snapshot: Arc<AnalyticsSnapshot>,
    table: NodeTable,
    config: DashboardConfig,
    state: ControlState,
    subscribers: Vec<SharedSubscriber>,
}

impl Dashboard {
    pub fn new(snapshot: Arc<AnalyticsSnapshot>, config: DashboardConfig) -> Self {
        let table = NodeTable::from_snapshot(&snapshot);
        let state = ControlState::for_table(&table);
        Self {
            snapshot,
            table,
            config,
            state,
            subscribers: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> &AnalyticsSnapshot {
        &self.snapshot
    }

    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Register a view and render it once against the current state
    pub fn subscribe<S: Subscriber + 'static>(&mut self, view: Arc<Mutex<S>>) {
        let ctx = ViewContext {
            snapshot: &self.snapshot,
            table: &self.table,
            state: &self.state,
            config: &self.config,
        };
        match view.lock() {
            Ok(mut guard) => guard.render(&ctx),
            Err(poisoned) => poisoned.into_inner().render(&ctx),
        }
        self.subscribers.push(view);
    }

    /// Apply an event and notify every subscriber in subscription order
    pub fn publish(&mut self, event: ControlEvent) {
        let changed = self.state.apply(&event);
        debug!("Control event {:?} (changed: {})", event, changed);

        let ctx = ViewContext {
            snapshot: &self.snapshot,
            table: &self.table,
            state: &self.state,
            config: &self.config,
        };
        for subscriber in &self.subscribers {
            match subscriber.lock() {
                Ok(mut guard) => guard.notify(&ctx, &event),
                Err(poisoned) => poisoned.into_inner().notify(&ctx, &event),
            }
        }
    }
}
