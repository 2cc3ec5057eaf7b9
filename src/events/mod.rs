//! Event types for graph editing.
//!
//! Events are emitted synchronously, in call order, whenever the graph
//! store mutates or the history moves, so that the rendering surface can
//! re-render from the new snapshot.

mod edit;
mod history;
mod node;

pub use edit::*;
pub use history::*;
pub use node::*;

use crate::graph::NodeId;

/// Generic event wrapper.
#[derive(Debug, Clone)]
pub struct Event<T> {
    inner: T,
}

/// Top-level event type for graph editing events.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// Node-level events (added, updated, moved, removed).
    Node(NodeEvent),
    /// Edge-level events (added, removed).
    Edge(EdgeEvent),
    /// The whole graph was replaced (import, reset, undo, redo).
    Loaded,
    /// History cursor movements and save acknowledgements.
    History(HistoryEvent),
}

/// Event message with node context.
#[derive(Debug, Clone)]
pub struct Message {
    /// Node ID the event is about (empty for graph-wide events).
    pub nid: NodeId,
    /// Store version after the change.
    pub version: u64,
    /// The actual event data.
    pub event: GraphEvent,
}

impl<T> std::ops::Deref for Event<T>
where
    T: std::fmt::Debug + Clone,
{
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Event<T>
where
    T: std::fmt::Debug + Clone,
{
    pub fn new(inner: &T) -> Self {
        Self {
            inner: inner.clone(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl GraphEvent {
    pub fn is_history(&self) -> bool {
        matches!(self, GraphEvent::History(_))
    }

    /// Whether the event changed graph content.
    pub fn is_mutation(&self) -> bool {
        matches!(self, GraphEvent::Node(_) | GraphEvent::Edge(_) | GraphEvent::Loaded)
    }
}
