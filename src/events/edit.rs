use crate::graph::NodeId;

/// Label change requested by a rendered node.
///
/// Only committed saves are ever published; a cancelled edit is rolled
/// back by the rendering side and never reaches the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub node_id: NodeId,
    pub new_label: String,
}

impl EditRequest {
    pub fn new(
        node_id: impl Into<NodeId>,
        new_label: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            new_label: new_label.into(),
        }
    }
}
