use crate::graph::{NodeData, NodeKind};

struct Defaults {
    description: &'static str,
    action: Option<&'static str>,
    output: Option<&'static str>,
}

fn defaults_for(kind: &NodeKind) -> Defaults {
    let (description, action, output) = match kind {
        NodeKind::Agent => ("An autonomous agent that reasons and acts", Some("Run agent"), Some("Agent response")),
        NodeKind::Decision => ("Routes the flow along a true or false branch", Some("Evaluate condition"), Some("Branch taken")),
        NodeKind::Tool => ("Invokes an external tool", Some("Call tool"), Some("Tool result")),
        NodeKind::Human => ("Waits for human review or input", Some("Request input"), Some("Human feedback")),
        NodeKind::Event => ("Reacts to or emits an event", Some("Handle event"), Some("Event payload")),
        NodeKind::Gateway => ("Splits or joins parallel branches", Some("Route"), Some("Routed message")),
        NodeKind::Datastore => ("Reads from or writes to a data store", Some("Query store"), Some("Stored records")),
        NodeKind::Group => ("Groups related nodes", None, None),
        NodeKind::Start => ("Entry point of the workflow", None, Some("Workflow input")),
        NodeKind::End => ("Exit point of the workflow", Some("Finish"), None),
        NodeKind::Custom(_) => ("A custom workflow step", None, None),
    };

    Defaults {
        description,
        action,
        output,
    }
}

/// `"<Capitalized kind> Node"`, e.g. `Agent Node`.
pub fn default_label(kind: &NodeKind) -> String {
    let name = kind.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{} Node", first.to_uppercase(), chars.as_str()),
        None => "Node".to_string(),
    }
}

/// Data a freshly instantiated node of `kind` starts with.
pub fn default_data(kind: &NodeKind) -> NodeData {
    let defaults = defaults_for(kind);
    NodeData {
        label: default_label(kind),
        description: Some(defaults.description.to_string()),
        action: defaults.action.map(String::from),
        output: defaults.output.map(String::from),
        ..Default::default()
    }
}
