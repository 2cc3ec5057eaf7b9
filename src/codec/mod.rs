//! JSON persistence of workflow graphs.
//!
//! Export is a plain projection of the graph. Import is deliberately
//! permissive: missing or malformed pieces are substituted or skipped so
//! that partially corrupt documents can still be recovered. Referential
//! integrity is not checked on import.

use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::{
    Result,
    graph::{Edge, GraphSnapshot, MarkerStyle, Node},
    utils,
};

/// Name given to imported documents that carry none.
pub const DEFAULT_WORKFLOW_NAME: &str = "Untitled Workflow";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Persisted form of a workflow graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkflowDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl WorkflowDocument {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn into_snapshot(self) -> GraphSnapshot {
        GraphSnapshot::new(self.nodes, self.edges)
    }
}

/// Projects a graph into its persisted form.
pub fn serialize(
    name: &str,
    framework: Option<&str>,
    snapshot: &GraphSnapshot,
) -> WorkflowDocument {
    WorkflowDocument {
        name: name.to_string(),
        framework: framework.map(String::from),
        nodes: snapshot.nodes().to_vec(),
        edges: snapshot.edges().to_vec(),
    }
}

/// Restores a document from arbitrary JSON without failing.
///
/// A missing name becomes [`DEFAULT_WORKFLOW_NAME`], missing or non-array
/// `nodes`/`edges` become empty, entries without an id get a fresh one,
/// fields of the wrong shape fall back to their defaults, and entries that
/// are not objects (or edges without endpoints) are skipped.
pub fn deserialize(raw: &Value) -> WorkflowDocument {
    let name = match raw.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => DEFAULT_WORKFLOW_NAME.to_string(),
    };
    let framework = raw.get("framework").and_then(Value::as_str).map(String::from);

    let nodes = elements(raw, "nodes").filter_map(read_node).collect();
    let edges = elements(raw, "edges").filter_map(read_edge).collect();

    WorkflowDocument {
        name,
        framework,
        nodes,
        edges,
    }
}

/// Parses and restores a document from JSON text.
///
/// Only a top-level parse failure is an error; the caller keeps its
/// current graph in that case.
pub fn from_json(text: &str) -> Result<WorkflowDocument> {
    let raw: Value = serde_json::from_str(text)?;
    let doc = deserialize(&raw);
    debug!("codec::from_json({}, {} nodes, {} edges)", doc.name, doc.nodes.len(), doc.edges.len());
    Ok(doc)
}

pub fn to_json(doc: &WorkflowDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Download filename for a workflow: whitespace runs become `_`, plus `.json`.
pub fn export_filename(name: &str) -> String {
    format!("{}.json", WHITESPACE.replace_all(name, "_"))
}

fn elements<'a>(
    raw: &'a Value,
    key: &str,
) -> impl Iterator<Item = &'a Value> {
    raw.get(key).and_then(Value::as_array).into_iter().flatten()
}

fn read_node(value: &Value) -> Option<Node> {
    let mut value = value.clone();
    let obj = value.as_object_mut()?;

    if !obj.get("type").is_some_and(Value::is_string) {
        obj.remove("type");
    }
    let has_id = obj.get("id").and_then(Value::as_str).is_some_and(|id| !id.is_empty());
    if !has_id {
        let kind = obj.get("type").and_then(Value::as_str).unwrap_or(crate::graph::FALLBACK_KIND);
        let id = format!("{}-{}", kind, utils::shortid());
        warn!("codec: node without id imported as {}", id);
        obj.insert("id".to_string(), Value::String(id));
    }
    clean_position(obj);
    clean_data(obj);

    match serde_json::from_value::<Node>(value) {
        Ok(mut node) => {
            node.normalize();
            Some(node)
        }
        Err(e) => {
            warn!("codec: skipped malformed node: {}", e);
            None
        }
    }
}

/// Replaces a missing or malformed position, or coordinate, with zero.
fn clean_position(obj: &mut Map<String, Value>) {
    let coord = |p: Option<&Value>, key: &str| p.and_then(|p| p.get(key)).and_then(Value::as_f64).unwrap_or_default();
    let position = obj.get("position").filter(|p| p.is_object());
    let (x, y) = (coord(position, "x"), coord(position, "y"));
    obj.insert("position".to_string(), json!({"x": x, "y": y}));
}

/// Drops data fields whose shape does not match, so defaults apply.
fn clean_data(obj: &mut Map<String, Value>) {
    if !obj.get("data").is_some_and(Value::is_object) {
        obj.remove("data");
    }
    let Some(data) = obj.get_mut("data").and_then(Value::as_object_mut) else {
        return;
    };
    for key in ["label", "description", "action", "output", "agentRef", "model"] {
        if data.get(key).is_some_and(|v| !v.is_string()) {
            warn!("codec: ignored malformed node field {}", key);
            data.remove(key);
        }
    }
    match data.get_mut("tools") {
        Some(Value::Array(tools)) => tools.retain(Value::is_string),
        Some(_) => {
            data.remove("tools");
        }
        None => {}
    }
}

fn read_edge(value: &Value) -> Option<Edge> {
    let mut value = value.clone();
    let obj = value.as_object_mut()?;

    let source = obj.get("source").and_then(Value::as_str).map(String::from);
    let target = obj.get("target").and_then(Value::as_str).map(String::from);
    if source.is_none() || target.is_none() {
        warn!("codec: skipped edge without endpoints");
        return None;
    }
    if !obj.get("id").and_then(Value::as_str).is_some_and(|id| !id.is_empty()) {
        obj.insert("id".to_string(), Value::String(format!("edge-{}", utils::shortid())));
    }
    if !obj.get("sourceHandle").is_some_and(Value::is_string) {
        obj.remove("sourceHandle");
    }
    let marker = obj.get("markerEnd").and_then(read_marker);
    match marker {
        Some(marker) => obj.insert("markerEnd".to_string(), Value::String(marker.as_ref().to_string())),
        None => obj.remove("markerEnd"),
    };

    match serde_json::from_value::<Edge>(value) {
        Ok(edge) => Some(edge),
        Err(e) => {
            warn!("codec: skipped malformed edge: {}", e);
            None
        }
    }
}

/// Accepts a marker as a plain string or as `{"type": "..."}`.
fn read_marker(value: &Value) -> Option<MarkerStyle> {
    let name = match value {
        Value::String(name) => name.as_str(),
        Value::Object(obj) => obj.get("type").and_then(Value::as_str)?,
        _ => return None,
    };
    MarkerStyle::from_str(&name.to_lowercase()).ok()
}
