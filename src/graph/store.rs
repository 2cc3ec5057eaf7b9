//! The canonical node/edge collections and their mutation operations.
//!
//! Every operation is synchronous and total. Missing ids are no-ops, and the
//! only rejected mutation is an edge pointing at a node that does not
//! exist. Each successful mutation bumps the store version and emits a
//! notification on the channel before returning.

use std::{collections::HashSet, sync::Arc};

use tracing::{trace, warn};

use crate::{
    GraphEditError, Result,
    events::{EdgeEvent, GraphEvent, Message, NodeEvent},
    graph::{Edge, EdgeId, GraphSnapshot, Node, NodeDataPatch, NodeId, NodeKind, Position},
    registry,
    runtime::Channel,
    utils,
};

pub struct GraphStore {
    /// current nodes and edges
    current: GraphSnapshot,
    /// incremented on every successful mutation
    version: u64,
    /// monotonic token for generated node ids
    next_token: u64,

    channel: Arc<Channel>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(Arc::new(Channel::new()))
    }
}

impl GraphStore {
    pub fn new(channel: Arc<Channel>) -> Self {
        Self {
            current: GraphSnapshot::default(),
            version: 0,
            next_token: 1,
            channel,
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.current.clone()
    }

    pub fn nodes(&self) -> &[Node] {
        self.current.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.current.edges()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.current.nodes().iter().find(|n| n.id == id)
    }

    pub fn edge(
        &self,
        id: &str,
    ) -> Option<&Edge> {
        self.current.edges().iter().find(|e| e.id == id)
    }

    /// Instantiates a node of `kind` at `position`.
    ///
    /// Data starts from the registry defaults for the kind; `overrides`
    /// (e.g. a referenced agent's profile) are applied on top.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        overrides: NodeDataPatch,
    ) -> Node {
        let id = self.next_node_id(&kind);
        let mut data = registry::default_data(&kind);
        data.apply(&overrides);

        let node = Node::new(id, kind, position, data);
        trace!("store::add_node({}, {})", node.id, node.kind);
        self.current.nodes_mut().push(node.clone());
        self.emit(&node.id, GraphEvent::Node(NodeEvent::Added));

        node
    }

    /// Removes the given nodes together with every edge touching them.
    pub fn remove_nodes(
        &mut self,
        ids: &HashSet<NodeId>,
    ) {
        self.remove_edges_touching(ids);

        let removed: Vec<NodeId> = self.current.nodes().iter().filter(|n| ids.contains(&n.id)).map(|n| n.id.clone()).collect();
        if removed.is_empty() {
            return;
        }

        trace!("store::remove_nodes({:?})", removed);
        self.current.nodes_mut().retain(|n| !ids.contains(&n.id));
        for nid in removed.iter() {
            self.emit(nid, GraphEvent::Node(NodeEvent::Removed));
        }
    }

    /// Shallow-merges `patch` into the data of node `id`. The node kind
    /// cannot change.
    pub fn update_node_data(
        &mut self,
        id: &str,
        patch: &NodeDataPatch,
    ) {
        let Some(idx) = self.index_of(id) else {
            return;
        };

        let mut node = self.current.nodes()[idx].clone();
        node.data.apply(patch);
        node.normalize();
        if node == self.current.nodes()[idx] {
            return;
        }

        trace!("store::update_node_data({})", id);
        self.current.nodes_mut()[idx] = node;
        self.emit(id, GraphEvent::Node(NodeEvent::Updated));
    }

    pub fn set_label(
        &mut self,
        id: &str,
        label: impl Into<String>,
    ) {
        self.update_node_data(id, &NodeDataPatch::new().label(label));
    }

    pub fn move_node(
        &mut self,
        id: &str,
        position: Position,
    ) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        if self.current.nodes()[idx].position == position {
            return;
        }

        trace!("store::move_node({}, {}, {})", id, position.x, position.y);
        self.current.nodes_mut()[idx].position = position;
        self.emit(id, GraphEvent::Node(NodeEvent::Moved(position)));
    }

    /// Connects `source` to `target`.
    ///
    /// Both endpoints must exist; otherwise the store is left untouched and
    /// an [`GraphEditError::Edge`] is returned. Connecting the same endpoints
    /// and handle twice returns the existing edge.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
    ) -> Result<Edge> {
        for endpoint in [source, target] {
            if self.index_of(endpoint).is_none() {
                warn!("store::add_edge rejected, node {} not found", endpoint);
                return Err(GraphEditError::Edge(format!("node {} not found", endpoint)));
            }
        }

        if let Some(existing) = self.current.edges().iter().find(|e| e.connects(source, target, source_handle.as_deref())) {
            return Ok(existing.clone());
        }

        let edge = Edge::new(format!("edge-{}", utils::shortid()), source.to_string(), target.to_string(), source_handle);
        trace!("store::add_edge({}, {} -> {})", edge.id, edge.source, edge.target);
        self.current.edges_mut().push(edge.clone());
        self.emit("", GraphEvent::Edge(EdgeEvent::Added(edge.id.clone())));

        Ok(edge)
    }

    pub fn remove_edges(
        &mut self,
        ids: &HashSet<EdgeId>,
    ) {
        self.remove_edges_where(|e| ids.contains(&e.id));
    }

    /// Removes every edge whose source or target is in `ids`.
    pub fn remove_edges_touching(
        &mut self,
        ids: &HashSet<NodeId>,
    ) {
        self.remove_edges_where(|e| ids.contains(&e.source) || ids.contains(&e.target));
    }

    /// Replaces the whole graph.
    ///
    /// Node invariants are enforced (duplicate ids dropped, group nodes
    /// normalized) but dangling edges are kept: integrity is restored by
    /// later mutations, not on load.
    pub fn load(
        &mut self,
        snapshot: GraphSnapshot,
    ) {
        let duplicates = {
            let mut seen = HashSet::new();
            snapshot.nodes().iter().any(|n| !seen.insert(n.id.as_str()))
        };
        let needs_normalize = snapshot.nodes().iter().any(|n| !n.kind.is_executable() && (n.data.action.is_some() || n.data.output.is_some()));

        let snapshot = if duplicates || needs_normalize {
            let mut seen = HashSet::new();
            let mut nodes = Vec::with_capacity(snapshot.nodes().len());
            for node in snapshot.nodes() {
                if !seen.insert(node.id.clone()) {
                    warn!("store::load dropped duplicate node id {}", node.id);
                    continue;
                }
                let mut node = node.clone();
                node.normalize();
                nodes.push(node);
            }
            GraphSnapshot::new(nodes, snapshot.edges().to_vec())
        } else {
            snapshot
        };

        let dangling = snapshot.dangling_edges().len();
        if dangling > 0 {
            warn!("store::load kept {} dangling edge(s)", dangling);
        }

        trace!("store::load({} nodes, {} edges)", snapshot.nodes().len(), snapshot.edges().len());
        self.current = snapshot;
        self.emit("", GraphEvent::Loaded);
    }

    fn remove_edges_where(
        &mut self,
        pred: impl Fn(&Edge) -> bool,
    ) {
        let removed: Vec<EdgeId> = self.current.edges().iter().filter(|&e| pred(e)).map(|e| e.id.clone()).collect();
        if removed.is_empty() {
            return;
        }

        trace!("store::remove_edges({:?})", removed);
        self.current.edges_mut().retain(|e| !pred(e));
        for eid in removed {
            self.emit("", GraphEvent::Edge(EdgeEvent::Removed(eid)));
        }
    }

    fn index_of(
        &self,
        id: &str,
    ) -> Option<usize> {
        self.current.nodes().iter().position(|n| n.id == id)
    }

    /// `<kind>-<token>`, skipping ids already taken by imported nodes.
    fn next_node_id(
        &mut self,
        kind: &NodeKind,
    ) -> NodeId {
        let taken: HashSet<&str> = self.current.nodes().iter().map(|n| n.id.as_str()).collect();
        loop {
            let id = format!("{}-{}", kind.name(), self.next_token);
            self.next_token += 1;
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }

    fn emit(
        &mut self,
        nid: &str,
        event: GraphEvent,
    ) {
        self.version += 1;
        self.channel.emit(Message {
            nid: nid.to_string(),
            version: self.version,
            event,
        });
    }
}
