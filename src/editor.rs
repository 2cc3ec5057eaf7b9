//! Workflow graph editor - the main entry point for Graphedit.
//!
//! The editor owns one graph store and its history and turns discrete user
//! gestures (a drop, a connect, a label save, a delete) into store
//! mutations followed by at most one history commit.

#[cfg(test)]
mod tests;

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, trace, warn};

use crate::{
    Config, Result,
    codec::{self, WorkflowDocument},
    dnd::{CanvasSurface, DragDrop, DropEvent, EntityLookup, PendingNode},
    events::{EditRequest, GraphEvent, HistoryEvent, Message},
    graph::{Edge, EdgeId, GraphSnapshot, GraphStore, Node, NodeDataPatch, NodeId, Position},
    history::History,
    registry::{NodeTypeEntry, NodeTypeRegistry},
    runtime::{Channel, EditBus, EditPublisher},
    store::{Autosave, KvStore},
};

/// The graph editing controller.
///
/// Every public gesture method commits at most one history entry, no
/// matter how many store mutations it performs. Mutations made directly on
/// the store through [`Editor::transact`] follow the same rule.
///
/// # Example
///
/// ```rust,ignore
/// let mut editor = EditorBuilder::new().name("Research").framework("react").build()?;
///
/// let agent = editor.handle_drop(&DropEvent::new("agent", screen), &surface, &agents).unwrap();
/// let tool = editor.handle_drop(&DropEvent::new("tool", screen2), &surface, &agents).unwrap();
/// editor.connect(&agent.id, &tool.id, None)?;
///
/// editor.undo();
/// let (filename, json) = editor.export()?;
/// ```
pub struct Editor {
    /// Workflow name used for export and autosave keys.
    name: String,
    /// Framework whose palette the editor shows.
    framework: String,
    /// Live graph state.
    store: GraphStore,
    /// Undo/redo checkpoints of the store.
    history: History,
    /// Store version the current history entry was taken at.
    committed_version: u64,
    /// Palette lookup.
    registry: Arc<NodeTypeRegistry>,
    /// Drag in progress, if any.
    dnd: DragDrop,
    /// Inline label edit requests from rendered nodes.
    edits: EditBus,
    /// Agent currently selected in the host, used to pre-fill agent drops.
    selected_agent: Option<String>,
    /// Notification channel shared with the store.
    channel: Arc<Channel>,
}

impl Editor {
    /// Creates an empty editor with the given configuration and the
    /// built-in node-type registry.
    pub fn new_with_config(config: Config) -> Self {
        Self::new(config.default_name, config.default_framework, config.history_capacity, Arc::new(NodeTypeRegistry::builtin()), Arc::new(Channel::new()))
    }

    pub(crate) fn new(
        name: String,
        framework: String,
        history_capacity: usize,
        registry: Arc<NodeTypeRegistry>,
        channel: Arc<Channel>,
    ) -> Self {
        let store = GraphStore::new(channel.clone());
        let history = History::new(store.snapshot(), history_capacity);
        let committed_version = store.version();

        Self {
            name,
            framework,
            store,
            history,
            committed_version,
            registry,
            dnd: DragDrop::new(),
            edits: EditBus::default(),
            selected_agent: None,
            channel,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(
        &mut self,
        name: impl Into<String>,
    ) {
        self.name = name.into();
    }

    pub fn framework(&self) -> &str {
        &self.framework
    }

    pub fn set_framework(
        &mut self,
        framework: impl Into<String>,
    ) {
        self.framework = framework.into();
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.store.snapshot()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns a reference to the notification channel.
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    /// Draggable node types for the current framework.
    pub fn palette(&self) -> &[NodeTypeEntry] {
        self.registry.node_types_for(&self.framework)
    }

    /// Handle a rendered node publishes label saves through.
    pub fn edit_publisher(&self) -> EditPublisher {
        self.edits.publisher()
    }

    /// Sets the host's currently selected agent (by id).
    pub fn select_agent(
        &mut self,
        agent_id: Option<String>,
    ) {
        self.selected_agent = agent_id;
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    /// Runs `f` against the store as one gesture and commits once.
    pub fn transact<R>(
        &mut self,
        f: impl FnOnce(&mut GraphStore) -> R,
    ) -> R {
        let result = f(&mut self.store);
        self.commit();
        result
    }

    /// Checkpoints the store if it changed since the last checkpoint.
    /// Returns whether a history entry was added.
    pub fn commit(&mut self) -> bool {
        if self.store.version() == self.committed_version {
            return false;
        }
        self.committed_version = self.store.version();

        let committed = self.history.commit(self.store.snapshot());
        if committed {
            self.emit_history(HistoryEvent::Committed(self.history.position()));
        }
        committed
    }

    pub fn start_drag(
        &mut self,
        payload: &str,
    ) -> bool {
        self.dnd.start(payload)
    }

    pub fn cancel_drag(&mut self) {
        self.dnd.cancel();
    }

    /// Completes a drag started with [`Editor::start_drag`] at `position`
    /// (graph coordinates).
    pub fn drop_at(
        &mut self,
        position: Position,
        lookup: &dyn EntityLookup,
    ) -> Option<Node> {
        let pending = self.dnd.drop_at(position, self.selected_agent.as_deref(), lookup)?;
        Some(self.transact(|store| instantiate(store, pending)))
    }

    /// Handles a canvas drop event. Drops without a recognizable node kind
    /// are ignored.
    pub fn handle_drop(
        &mut self,
        event: &DropEvent,
        surface: &dyn CanvasSurface,
        lookup: &dyn EntityLookup,
    ) -> Option<Node> {
        let pending = self.dnd.handle_drop(event, surface, self.selected_agent.as_deref(), lookup)?;
        if !self.registry.exposes(&self.framework, &pending.kind) {
            debug!("editor: {} is not in the {} palette, using generic defaults", pending.kind, self.framework);
        }
        Some(self.transact(|store| instantiate(store, pending)))
    }

    /// Drops a node onto the midpoint of `edge_id`, splitting the edge into
    /// `source -> new` and `new -> target`. One history entry in total. An
    /// edge that is missing or dangling is left alone and the node is
    /// dropped unconnected.
    pub fn drop_on_edge(
        &mut self,
        event: &DropEvent,
        edge_id: &str,
        surface: &dyn CanvasSurface,
        lookup: &dyn EntityLookup,
    ) -> Option<Node> {
        let pending = self.dnd.handle_drop(event, surface, self.selected_agent.as_deref(), lookup)?;
        let split = self.store.edge(edge_id).filter(|e| self.store.node(&e.source).is_some() && self.store.node(&e.target).is_some()).cloned();
        if split.is_none() {
            warn!("editor: edge {} is missing or dangling, dropping without a split", edge_id);
        }

        Some(self.transact(|store| {
            let node = instantiate(store, pending);
            if let Some(edge) = split {
                store.remove_edges(&HashSet::from([edge.id.clone()]));
                let halves = [(edge.source.as_str(), node.id.as_str(), edge.source_handle.clone()), (node.id.as_str(), edge.target.as_str(), None)];
                for (source, target, handle) in halves {
                    if let Err(e) = store.add_edge(source, target, handle) {
                        warn!("editor: split of edge {} left unconnected: {}", edge.id, e);
                    }
                }
            }
            node
        }))
    }

    /// Connects two nodes. A missing endpoint is rejected and leaves both
    /// graph and history untouched.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
    ) -> Result<Edge> {
        self.transact(|store| store.add_edge(source, target, source_handle))
    }

    /// Deletes nodes and every edge touching them in one gesture.
    /// Returns whether anything was removed.
    pub fn delete_nodes(
        &mut self,
        ids: &HashSet<NodeId>,
    ) -> bool {
        let version = self.store.version();
        self.transact(|store| store.remove_nodes(ids));
        self.store.version() != version
    }

    pub fn delete_edges(
        &mut self,
        ids: &HashSet<EdgeId>,
    ) {
        self.transact(|store| store.remove_edges(ids));
    }

    /// Applies the final positions of a node drag.
    pub fn move_nodes(
        &mut self,
        moves: &[(NodeId, Position)],
    ) {
        self.transact(|store| {
            for (id, position) in moves {
                store.move_node(id, *position);
            }
        });
    }

    pub fn update_node(
        &mut self,
        id: &str,
        patch: &NodeDataPatch,
    ) {
        self.transact(|store| store.update_node_data(id, patch));
    }

    /// Applies one inline edit request. Returns whether it changed the graph.
    pub fn apply_edit(
        &mut self,
        request: &EditRequest,
    ) -> bool {
        trace!("editor::apply_edit({})", request.node_id);
        let version = self.store.version();
        self.transact(|store| store.set_label(&request.node_id, request.new_label.clone()));
        self.store.version() != version
    }

    /// Consumes every pending inline edit, in arrival order, one commit
    /// each. Returns how many changed the graph.
    pub fn process_edits(&mut self) -> usize {
        let mut applied = 0;
        for request in self.edits.drain() {
            if self.apply_edit(&request) {
                applied += 1;
            }
        }
        applied
    }

    /// Steps back one checkpoint. Returns `false` at the oldest one.
    pub fn undo(&mut self) -> bool {
        self.commit();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        self.emit_history(HistoryEvent::Undo(self.history.position()));
        true
    }

    /// Steps forward one checkpoint. Returns `false` at the newest one.
    pub fn redo(&mut self) -> bool {
        self.commit();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        self.emit_history(HistoryEvent::Redo(self.history.position()));
        true
    }

    /// Clears the graph. The cleared state is always checkpointed so the
    /// previous graph stays reachable through undo.
    pub fn reset(&mut self) {
        self.commit();
        self.load_snapshot(GraphSnapshot::default());
    }

    /// Replaces the graph with an imported document.
    pub fn load_document(
        &mut self,
        doc: WorkflowDocument,
    ) {
        debug!("editor::load_document({})", doc.name);
        self.commit();
        self.name = doc.name.clone();
        if let Some(framework) = doc.framework.clone() {
            self.framework = framework;
        }
        self.load_snapshot(doc.into_snapshot());
    }

    /// Imports a JSON document. Invalid JSON is reported and the current
    /// graph is left untouched.
    pub fn import_json(
        &mut self,
        text: &str,
    ) -> Result<()> {
        let doc = codec::from_json(text).inspect_err(|e| warn!("editor: import failed: {}", e))?;
        self.load_document(doc);
        Ok(())
    }

    pub fn document(&self) -> WorkflowDocument {
        codec::serialize(&self.name, Some(&self.framework), &self.store.snapshot())
    }

    /// File name and JSON text for the host's download action.
    pub fn export(&self) -> Result<(String, String)> {
        let doc = self.document();
        Ok((codec::export_filename(&doc.name), codec::to_json(&doc)?))
    }

    /// Autosaves the current document and acknowledges the save.
    pub fn save<S: KvStore>(
        &mut self,
        autosave: &Autosave<S>,
    ) -> Result<()> {
        self.commit();
        autosave.save(&self.document())?;
        self.mark_saved();
        Ok(())
    }

    /// Loads the document autosaved as `name`. Returns whether one existed.
    pub fn restore_autosaved<S: KvStore>(
        &mut self,
        autosave: &Autosave<S>,
        name: &str,
    ) -> Result<bool> {
        match autosave.load(name)? {
            Some(doc) => {
                self.load_document(doc);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// External acknowledgement that the current state has been saved.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
        self.emit_history(HistoryEvent::Saved);
    }

    fn load_snapshot(
        &mut self,
        snapshot: GraphSnapshot,
    ) {
        self.store.load(snapshot);
        self.committed_version = self.store.version();
        self.history.reset(self.store.snapshot());
        self.emit_history(HistoryEvent::Reset(self.history.position()));
    }

    fn restore(
        &mut self,
        snapshot: GraphSnapshot,
    ) {
        self.store.load(snapshot);
        self.committed_version = self.store.version();
    }

    fn emit_history(
        &self,
        event: HistoryEvent,
    ) {
        self.channel.emit(Message {
            nid: String::new(),
            version: self.store.version(),
            event: GraphEvent::History(event),
        });
    }
}

fn instantiate(
    store: &mut GraphStore,
    pending: PendingNode,
) -> Node {
    store.add_node(pending.kind, pending.position, pending.overrides)
}
