//! Drag-and-drop node instantiation.
//!
//! `Idle -> DragStarted(kind) -> dropped at a position -> node created`.
//! The rendering surface converts screen coordinates to graph coordinates;
//! the only outside state consulted is a read-only lookup of the currently
//! selected agent, and only when an `agent` node is dropped.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::graph::{NodeDataPatch, NodeKind, Position};

/// Drag payload key a palette item stores its kind under.
pub const DRAG_PAYLOAD_KEY: &str = "application/x-graphedit-node";

static KIND_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid kind pattern"));

/// Parses a drag payload into a node kind. Anything that does not look
/// like a kind name yields `None`.
pub fn parse_kind(payload: Option<&str>) -> Option<NodeKind> {
    let payload = payload?.trim();
    KIND_PATTERN.is_match(payload).then(|| NodeKind::from(payload))
}

/// Screen-to-graph coordinate conversion supplied by the rendering surface.
pub trait CanvasSurface {
    fn screen_to_graph(
        &self,
        screen: Position,
    ) -> Position;
}

impl<F> CanvasSurface for F
where
    F: Fn(Position) -> Position,
{
    fn screen_to_graph(
        &self,
        screen: Position,
    ) -> Position {
        self(screen)
    }
}

/// Agent record an `agent` node can be pre-filled from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Read-only lookup of external entities by id.
pub trait EntityLookup {
    fn agent(
        &self,
        id: &str,
    ) -> Option<AgentProfile>;
}

impl EntityLookup for HashMap<String, AgentProfile> {
    fn agent(
        &self,
        id: &str,
    ) -> Option<AgentProfile> {
        self.get(id).cloned()
    }
}

/// Lookup for hosts without external entities.
pub struct NoEntities;

impl EntityLookup for NoEntities {
    fn agent(
        &self,
        _id: &str,
    ) -> Option<AgentProfile> {
        None
    }
}

/// Drop raised by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    /// value stored under [`DRAG_PAYLOAD_KEY`], if any
    pub payload: Option<String>,
    /// drop location in screen coordinates
    pub screen: Position,
}

impl DropEvent {
    pub fn new(
        payload: impl Into<String>,
        screen: Position,
    ) -> Self {
        Self {
            payload: Some(payload.into()),
            screen,
        }
    }

    /// Builds the event from the drag's transfer data, reading the payload
    /// stored under [`DRAG_PAYLOAD_KEY`].
    pub fn from_transfer(
        transfer: &HashMap<String, String>,
        screen: Position,
    ) -> Self {
        Self {
            payload: transfer.get(DRAG_PAYLOAD_KEY).cloned(),
            screen,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    DragStarted(NodeKind),
}

/// A drop that should become a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNode {
    pub kind: NodeKind,
    pub position: Position,
    pub overrides: NodeDataPatch,
}

#[derive(Debug, Default)]
pub struct DragDrop {
    state: DragState,
}

impl DragDrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Starts dragging the palette item described by `payload`. Returns
    /// whether a drag is now in progress.
    pub fn start(
        &mut self,
        payload: &str,
    ) -> bool {
        match parse_kind(Some(payload)) {
            Some(kind) => {
                trace!("dnd::start({})", kind);
                self.state = DragState::DragStarted(kind);
                true
            }
            None => {
                self.state = DragState::Idle;
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finishes the drag at `position` (graph coordinates). Without a drag in
    /// progress the drop is ignored.
    pub fn drop_at(
        &mut self,
        position: Position,
        selected_agent: Option<&str>,
        lookup: &dyn EntityLookup,
    ) -> Option<PendingNode> {
        let DragState::DragStarted(kind) = std::mem::take(&mut self.state) else {
            return None;
        };
        let overrides = instantiation_patch(&kind, selected_agent, lookup);
        Some(PendingNode {
            kind,
            position,
            overrides,
        })
    }

    /// Handles a one-shot drop event carrying its own payload.
    pub fn handle_drop(
        &mut self,
        event: &DropEvent,
        surface: &dyn CanvasSurface,
        selected_agent: Option<&str>,
        lookup: &dyn EntityLookup,
    ) -> Option<PendingNode> {
        let Some(payload) = event.payload.as_deref() else {
            trace!("dnd::handle_drop ignored, no payload");
            self.cancel();
            return None;
        };
        if !self.start(payload) {
            trace!("dnd::handle_drop ignored, unrecognized payload {:?}", payload);
            return None;
        }
        self.drop_at(surface.screen_to_graph(event.screen), selected_agent, lookup)
    }
}

/// Data overrides for a node created by a drop. Only `agent` drops with a
/// resolvable selected agent get any.
pub fn instantiation_patch(
    kind: &NodeKind,
    selected_agent: Option<&str>,
    lookup: &dyn EntityLookup,
) -> NodeDataPatch {
    if *kind != NodeKind::Agent {
        return NodeDataPatch::new();
    }
    let Some(agent) = selected_agent.and_then(|id| lookup.agent(id)) else {
        return NodeDataPatch::new();
    };

    let mut patch = NodeDataPatch::new().label(agent.name).agent_ref(agent.id).tools(agent.tools);
    patch.description = agent.description;
    patch.model = agent.model;
    patch
}
