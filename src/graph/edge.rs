//! Edges connecting two nodes on the canvas.
//!
//! An edge may leave its source through a named handle, e.g. the
//! `true`/`false` branches of a decision node.

use serde::{Deserialize, Serialize};

use crate::graph::node::NodeId;

/// Unique identifier for an edge within a graph.
pub type EdgeId = String;

/// Marker drawn at the target end of an edge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerStyle {
    #[default]
    ArrowClosed,
    Arrow,
    None,
}

/// A directed connection between two nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// ID of the source node.
    pub source: NodeId,
    /// ID of the target node.
    pub target: NodeId,
    /// Which output handle of the source this edge leaves from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Marker at the target end.
    #[serde(default)]
    pub marker_end: MarkerStyle,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        source_handle: Option<String>,
    ) -> Self {
        Self {
            id,
            source,
            target,
            source_handle,
            marker_end: MarkerStyle::default(),
        }
    }

    /// Whether either endpoint is `nid`.
    pub fn touches(
        &self,
        nid: &str,
    ) -> bool {
        self.source == nid || self.target == nid
    }

    /// Whether this edge describes the same connection as the given endpoints.
    pub fn connects(
        &self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> bool {
        self.source == source && self.target == target && self.source_handle.as_deref() == source_handle
    }
}
