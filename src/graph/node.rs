use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::kind::NodeKind;

/// node id
pub type NodeId = String;

/// Position of a node in graph coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            x,
            y,
        }
    }
}

/// Editable payload of a node.
///
/// Fields the engine does not know about survive import and export
/// untouched in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Partial update of [`NodeData`]. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub action: Option<String>,
    pub output: Option<String>,
    pub agent_ref: Option<String>,
    pub model: Option<String>,
    pub tools: Option<Vec<String>>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NodeDataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(
        mut self,
        description: impl Into<String>,
    ) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(
        mut self,
        action: impl Into<String>,
    ) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn output(
        mut self,
        output: impl Into<String>,
    ) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn agent_ref(
        mut self,
        agent_ref: impl Into<String>,
    ) -> Self {
        self.agent_ref = Some(agent_ref.into());
        self
    }

    pub fn model(
        mut self,
        model: impl Into<String>,
    ) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn tools(
        mut self,
        tools: Vec<String>,
    ) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn extra(
        mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl NodeData {
    /// Shallow-merges `patch` into this data. Returns whether anything changed.
    pub fn apply(
        &mut self,
        patch: &NodeDataPatch,
    ) -> bool {
        let before = self.clone();

        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(action) = &patch.action {
            self.action = Some(action.clone());
        }
        if let Some(output) = &patch.output {
            self.output = Some(output.clone());
        }
        if let Some(agent_ref) = &patch.agent_ref {
            self.agent_ref = Some(agent_ref.clone());
        }
        if let Some(model) = &patch.model {
            self.model = Some(model.clone());
        }
        if let Some(tools) = &patch.tools {
            self.tools = tools.clone();
        }
        for (k, v) in patch.extra.iter() {
            if !self.set_typed(k, v) {
                self.extra.insert(k.clone(), v.clone());
            }
        }

        *self != before
    }

    /// Routes a wire-named key to its typed field. Returns `false` for keys
    /// that belong in `extra`. Values of the wrong shape are dropped.
    fn set_typed(
        &mut self,
        key: &str,
        value: &serde_json::Value,
    ) -> bool {
        let text = value.as_str().map(String::from);
        match key {
            "label" => {
                if let Some(label) = text {
                    self.label = label;
                }
            }
            "description" => self.description = text.or(self.description.take()),
            "action" => self.action = text.or(self.action.take()),
            "output" => self.output = text.or(self.output.take()),
            "agentRef" => self.agent_ref = text.or(self.agent_ref.take()),
            "model" => self.model = text.or(self.model.take()),
            "tools" => {
                if let Some(tools) = value.as_array() {
                    self.tools = tools.iter().filter_map(|t| t.as_str().map(String::from)).collect();
                }
            }
            _ => return false,
        }
        true
    }
}

/// A node on the canvas.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// node id, unique within a graph
    pub id: NodeId,
    /// node kind, fixed at creation
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// position in graph coordinates
    #[serde(default)]
    pub position: Position,
    /// editable payload
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(
        id: NodeId,
        kind: NodeKind,
        position: Position,
        data: NodeData,
    ) -> Self {
        let mut node = Self {
            id,
            kind,
            position,
            data,
        };
        node.normalize();
        node
    }

    /// Enforces the per-kind field rules. Group nodes have no execution
    /// semantics and never carry `action` or `output`.
    pub fn normalize(&mut self) {
        if !self.kind.is_executable() {
            self.data.action = None;
            self.data.output = None;
            self.data.extra.remove("action");
            self.data.extra.remove("output");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_patch_merges_shallowly() {
        let mut data = NodeData {
            label: "Tool Node".to_string(),
            description: Some("calls a tool".to_string()),
            ..Default::default()
        };

        let changed = data.apply(&NodeDataPatch::new().label("Search").extra("retries", json!(3)));
        assert!(changed);
        assert_eq!(data.label, "Search");
        assert_eq!(data.description.as_deref(), Some("calls a tool"));
        assert_eq!(data.extra.get("retries"), Some(&json!(3)));
    }

    #[test]
    fn test_patch_without_effect_reports_unchanged() {
        let mut data = NodeData {
            label: "Same".to_string(),
            ..Default::default()
        };
        assert!(!data.apply(&NodeDataPatch::new().label("Same")));
        assert!(!data.apply(&NodeDataPatch::new()));
    }

    #[test]
    fn test_group_node_drops_action_and_output() {
        let data = NodeData {
            label: "Group".to_string(),
            action: Some("run".to_string()),
            output: Some("result".to_string()),
            ..Default::default()
        };
        let node = Node::new("group-1".to_string(), NodeKind::Group, Position::default(), data);
        assert!(node.data.action.is_none());
        assert!(node.data.output.is_none());
    }

    #[test]
    fn test_reserved_extra_keys_reach_typed_fields() {
        let mut data = NodeData::default();
        data.apply(&NodeDataPatch::new().extra("action", json!("run")).extra("agentRef", json!("a-1")).extra("tools", json!(["search", 7])).extra("model", json!(42)));
        assert_eq!(data.action.as_deref(), Some("run"));
        assert_eq!(data.agent_ref.as_deref(), Some("a-1"));
        assert_eq!(data.tools, vec!["search".to_string()]);
        assert!(data.model.is_none());
        assert!(data.extra.is_empty());
    }

    #[test]
    fn test_group_node_rejects_action_through_extra() {
        let mut node = Node::new("group-1".to_string(), NodeKind::Group, Position::default(), NodeData::default());
        node.data.apply(&NodeDataPatch::new().extra("action", json!("run")).extra("output", json!("x")));
        node.data.extra.insert("output".to_string(), json!("x"));
        node.normalize();

        let value = serde_json::to_value(&node).unwrap();
        assert!(value["data"].get("action").is_none());
        assert!(value["data"].get("output").is_none());
    }

    #[test]
    fn test_node_wire_shape() {
        let node = Node::new(
            "agent-1".to_string(),
            NodeKind::Agent,
            Position::new(100.0, 50.0),
            NodeData {
                label: "Planner".to_string(),
                agent_ref: Some("a-42".to_string()),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "agent-1",
                "type": "agent",
                "position": {"x": 100.0, "y": 50.0},
                "data": {"label": "Planner", "agentRef": "a-42"}
            })
        );
    }

    #[test]
    fn test_unknown_data_fields_are_kept() {
        let node: Node = serde_json::from_value(json!({
            "id": "n1",
            "type": "tool",
            "data": {"label": "Fetch", "endpoint": "https://example.com"}
        }))
        .unwrap();
        assert_eq!(node.position, Position::default());
        assert_eq!(node.data.extra.get("endpoint"), Some(&json!("https://example.com")));
    }
}
