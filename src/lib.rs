//! # Graphedit
//!
//! Graphedit is the editing engine behind a visual agent-workflow builder.
//! It owns the workflow graph, turns user gestures into graph mutations and
//! keeps a bounded undo/redo history of the result. Rendering is left to
//! the host.
//!
//! ## Core Features
//!
//! - **Graph Store**: Nodes and edges with referential integrity kept on every mutation
//! - **Bounded History**: Linear undo/redo with one checkpoint per gesture
//! - **Drag and Drop**: Palette payloads become nodes with kind-specific default data
//! - **Inline Editing**: Label edits published by rendered nodes are applied in arrival order
//! - **Persistence**: Permissive JSON import/export and host-local autosave
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphedit::{DropEvent, EditorBuilder, NoEntities, Position};
//!
//! let mut editor = EditorBuilder::new().name("Research").framework("react").build()?;
//! let to_graph = |p: Position| p;
//!
//! let agent = editor.handle_drop(&DropEvent::new("agent", Position::new(100.0, 100.0)), &to_graph, &NoEntities).unwrap();
//! let tool = editor.handle_drop(&DropEvent::new("tool", Position::new(300.0, 100.0)), &to_graph, &NoEntities).unwrap();
//! editor.connect(&agent.id, &tool.id, None)?;
//!
//! editor.undo();
//! let (filename, json) = editor.export()?;
//! ```

mod builder;
mod common;
mod config;
mod editor;
mod error;
mod utils;

pub mod codec;
pub mod dnd;
pub mod events;
pub mod graph;
pub mod history;
pub mod registry;
pub mod runtime;
pub mod store;

use std::sync::{Arc, RwLock};

pub use builder::EditorBuilder;
pub use codec::WorkflowDocument;
pub use config::{AutosaveConfig, Config, StoreType};
pub use dnd::{AgentProfile, CanvasSurface, DropEvent, EntityLookup, NoEntities};
pub use editor::Editor;
pub use error::GraphEditError;
pub use graph::{Edge, GraphSnapshot, GraphStore, Node, NodeData, NodeDataPatch, NodeKind, Position};
pub use history::History;
pub use registry::{NodeTypeEntry, NodeTypeRegistry};
pub use runtime::{ChannelEvent, ChannelOptions, EditPublisher};
pub use store::{Autosave, KvStore};

/// Result type alias for Graphedit operations.
pub type Result<T> = std::result::Result<T, GraphEditError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
