//! Graph data model and the store that mutates it.

mod edge;
mod kind;
mod node;
mod snapshot;
mod store;

pub use edge::{Edge, EdgeId, MarkerStyle};
pub use kind::{FALLBACK_KIND, NodeKind};
pub use node::{Node, NodeData, NodeDataPatch, NodeId, Position};
pub use snapshot::GraphSnapshot;
pub use store::GraphStore;
