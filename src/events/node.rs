use crate::graph::{EdgeId, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    Added,
    Updated,
    Moved(Position),
    Removed,
}

impl NodeEvent {
    pub fn str(&self) -> &str {
        match self {
            NodeEvent::Added => "Added",
            NodeEvent::Updated => "Updated",
            NodeEvent::Moved(_) => "Moved",
            NodeEvent::Removed => "Removed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeEvent {
    Added(EdgeId),
    Removed(EdgeId),
}

impl EdgeEvent {
    pub fn str(&self) -> &str {
        match self {
            EdgeEvent::Added(_) => "Added",
            EdgeEvent::Removed(_) => "Removed",
        }
    }
}
