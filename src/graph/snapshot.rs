//! Immutable node/edge pairs captured at one point in time.

use std::{collections::HashMap, sync::Arc};

use petgraph::{Direction, graph::DiGraph, visit::EdgeRef};

use crate::graph::{edge::Edge, node::Node};

/// Immutable copy of the full node and edge collections.
///
/// Both collections sit behind an `Arc`, so cloning a snapshot is cheap and
/// the store and the history can share one allocation until the next
/// mutation copies it.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: Arc<Vec<Node>>,
    edges: Arc<Vec<Edge>>,
}

impl GraphSnapshot {
    pub fn new(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Self {
        Self {
            nodes: Arc::new(nodes),
            edges: Arc::new(edges),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        Arc::make_mut(&mut self.nodes)
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<Edge> {
        Arc::make_mut(&mut self.edges)
    }

    /// Whether both snapshots share the same allocations.
    pub fn ptr_eq(
        &self,
        other: &GraphSnapshot,
    ) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes) && Arc::ptr_eq(&self.edges, &other.edges)
    }

    /// Edges whose source or target node is not part of this snapshot.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges.iter().filter(|e| !self.has_node(&e.source) || !self.has_node(&e.target)).collect()
    }

    pub fn has_node(
        &self,
        id: &str,
    ) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Human-readable representation of the graph.
    pub fn schema(&self) -> String {
        let mut graph: DiGraph<&Node, &Edge> = DiGraph::new();
        let mut indices = HashMap::new();
        for node in self.nodes.iter() {
            indices.insert(node.id.as_str(), graph.add_node(node));
        }
        let mut dangling = Vec::new();
        for edge in self.edges.iter() {
            match (indices.get(edge.source.as_str()), indices.get(edge.target.as_str())) {
                (Some(s), Some(t)) => {
                    graph.add_edge(*s, *t, edge);
                }
                _ => dangling.push(edge),
            }
        }

        let mut lines = Vec::new();
        lines.push("=== Workflow Graph ===".to_string());
        lines.push(format!("Nodes: {}, Edges: {}", self.nodes.len(), self.edges.len()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for idx in graph.node_indices() {
            let node = graph[idx];
            lines.push(format!("[{}] {} (type: {}, at: {}, {})", node.id, node.data.label, node.kind, node.position.x, node.position.y));
        }
        lines.push(String::new());

        lines.push("--- Graph Structure ---".to_string());
        for idx in graph.node_indices() {
            let outgoing: Vec<String> = graph
                .edges_directed(idx, Direction::Outgoing)
                .map(|e| match &e.weight().source_handle {
                    Some(h) => format!("{}({})", graph[e.target()].id, h),
                    None => graph[e.target()].id.clone(),
                })
                .collect();

            if outgoing.is_empty() {
                lines.push(format!("{} -> (end)", graph[idx].id));
            } else {
                lines.push(format!("{} -> {}", graph[idx].id, outgoing.join(", ")));
            }
        }

        if !dangling.is_empty() {
            lines.push(String::new());
            lines.push("--- Dangling Edges ---".to_string());
            for edge in dangling {
                lines.push(format!("{} --> {} (id: {})", edge.source, edge.target, edge.id));
            }
        }

        lines.join("\n")
    }
}

impl PartialEq for GraphSnapshot {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        (Arc::ptr_eq(&self.nodes, &other.nodes) || self.nodes == other.nodes) && (Arc::ptr_eq(&self.edges, &other.edges) || self.edges == other.edges)
    }
}
