use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Kind of a node on the canvas.
///
/// Known kinds get exhaustive handling where it matters (field rules per
/// kind, default data). Anything else a custom framework introduces at
/// runtime is carried verbatim in [`NodeKind::Custom`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumIter)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Agent,
    Decision,
    Tool,
    Human,
    Event,
    Gateway,
    Datastore,
    Group,
    Start,
    End,
    Custom(String),
}

impl NodeKind {
    /// Wire name of the kind, e.g. `agent` or the custom string itself.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Custom(s) => s.as_str(),
            _ => self.as_ref(),
        }
    }

    /// Whether nodes of this kind may carry `action`/`output` fields.
    pub fn is_executable(&self) -> bool {
        !matches!(self, NodeKind::Group)
    }
}

/// Kind assigned to imported nodes that carry no `type` at all.
pub const FALLBACK_KIND: &str = "default";

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Custom(FALLBACK_KIND.to_string())
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        NodeKind::iter().find(|k| !matches!(k, NodeKind::Custom(_)) && k.as_ref() == s).unwrap_or(NodeKind::Custom(s))
    }
}

impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        NodeKind::from(s.to_string())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Custom(s) => s,
            k => k.as_ref().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
