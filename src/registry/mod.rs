//! Node-type registry.
//!
//! Maps a framework identifier (a reasoning pattern such as `react`) to the
//! ordered list of node kinds its palette exposes. Read-only once built.

mod defaults;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::NodeKind;

pub use defaults::{default_data, default_label};

/// Framework whose entries are used when a lookup misses.
pub const FALLBACK_FRAMEWORK: &str = "custom";

/// One draggable palette item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeTypeEntry {
    pub kind: NodeKind,
    pub label: String,
    pub icon: String,
}

impl NodeTypeEntry {
    pub fn new(
        kind: NodeKind,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    frameworks: HashMap<String, Vec<NodeTypeEntry>>,
}

impl NodeTypeRegistry {
    /// An empty registry, without even the fallback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in frameworks.
    pub fn builtin() -> Self {
        use NodeKind::*;

        let entry = |kind: NodeKind| {
            let (label, icon) = match &kind {
                Agent => ("Agent", "bot"),
                Decision => ("Decision", "git-branch"),
                Tool => ("Tool", "wrench"),
                Human => ("Human", "user"),
                Event => ("Event", "zap"),
                Gateway => ("Gateway", "split"),
                Datastore => ("Data Store", "database"),
                Group => ("Group", "box"),
                Start => ("Start", "play"),
                End => ("End", "square"),
                Custom(_) => ("Custom", "puzzle"),
            };
            NodeTypeEntry::new(kind, label, icon)
        };

        Self::new()
            .register("react", vec![entry(Agent), entry(Tool), entry(Decision), entry(Event)])
            .register("chain_of_thought", vec![entry(Agent), entry(Decision), entry(Datastore)])
            .register("plan_execute", vec![entry(Agent), entry(Tool), entry(Human), entry(Decision), entry(Datastore)])
            .register("multi_agent", vec![entry(Agent), entry(Gateway), entry(Event), entry(Human), entry(Group)])
            .register(
                FALLBACK_FRAMEWORK,
                vec![entry(Start), entry(Agent), entry(Tool), entry(Decision), entry(Human), entry(Event), entry(Gateway), entry(Datastore), entry(Group), entry(End)],
            )
    }

    /// Adds or replaces the entries of `framework`.
    pub fn register(
        mut self,
        framework: impl Into<String>,
        entries: Vec<NodeTypeEntry>,
    ) -> Self {
        self.frameworks.insert(framework.into(), entries);
        self
    }

    /// Palette entries for `framework`, falling back to the `custom` set,
    /// then to nothing.
    pub fn node_types_for(
        &self,
        framework: &str,
    ) -> &[NodeTypeEntry] {
        self.frameworks.get(framework).or_else(|| self.frameworks.get(FALLBACK_FRAMEWORK)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether the palette of `framework` offers `kind`. Informational only:
    /// kinds outside the palette still instantiate.
    pub fn exposes(
        &self,
        framework: &str,
        kind: &NodeKind,
    ) -> bool {
        self.node_types_for(framework).iter().any(|e| &e.kind == kind)
    }

    pub fn frameworks(&self) -> impl Iterator<Item = &str> {
        self.frameworks.keys().map(String::as_str)
    }
}
