use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use super::*;
use crate::{
    EditorBuilder, GraphEditError,
    dnd::{AgentProfile, NoEntities},
    events::HistoryPosition,
    graph::NodeKind,
    runtime::{ChannelEvent, ChannelOptions},
    store::MemKv,
};

fn identity(p: Position) -> Position {
    p
}

fn editor() -> Editor {
    EditorBuilder::new().build().unwrap()
}

fn drop_kind(
    editor: &mut Editor,
    kind: &str,
    x: f64,
    y: f64,
) -> Node {
    editor.handle_drop(&DropEvent::new(kind, Position::new(x, y)), &identity, &NoEntities).unwrap()
}

fn pos(editor: &Editor) -> (usize, usize) {
    (editor.history().len(), editor.history().cursor())
}

#[test]
fn test_undo_redo_scenario() {
    let mut editor = editor();
    assert_eq!(pos(&editor), (1, 0));

    let agent = drop_kind(&mut editor, "agent", 100.0, 100.0);
    assert_eq!(pos(&editor), (2, 1));
    let tool = drop_kind(&mut editor, "tool", 300.0, 100.0);
    assert_eq!(pos(&editor), (3, 2));
    editor.connect(&agent.id, &tool.id, None).unwrap();
    assert_eq!(pos(&editor), (4, 3));

    assert!(editor.undo());
    assert_eq!(editor.history().cursor(), 2);
    assert_eq!(editor.store().nodes().len(), 2);
    assert_eq!(editor.store().edges().len(), 0);

    assert!(editor.undo());
    assert_eq!(editor.history().cursor(), 1);
    assert_eq!(editor.store().nodes().len(), 1);

    assert!(editor.redo());
    assert_eq!(editor.history().cursor(), 2);
    assert_eq!(editor.store().nodes().len(), 2);
    assert_eq!(editor.store().edges().len(), 0);
}

#[test]
fn test_delete_node_removes_edges_in_one_commit() {
    let mut editor = editor();
    let agent = drop_kind(&mut editor, "agent", 100.0, 100.0);
    let tool = drop_kind(&mut editor, "tool", 300.0, 100.0);
    editor.connect(&agent.id, &tool.id, None).unwrap();

    assert!(editor.delete_nodes(&HashSet::from([agent.id.clone()])));
    assert_eq!(pos(&editor), (5, 4));
    assert_eq!(editor.store().nodes().len(), 1);
    assert!(editor.store().edges().is_empty());

    // a single undo brings back both the node and its edge
    editor.undo();
    assert_eq!(editor.store().nodes().len(), 2);
    assert_eq!(editor.store().edges().len(), 1);
}

#[test]
fn test_unchanged_gesture_adds_no_entry() {
    let mut editor = editor();
    let agent = drop_kind(&mut editor, "agent", 0.0, 0.0);
    let len = editor.history().len();

    editor.move_nodes(&[(agent.id.clone(), agent.position)]);
    editor.update_node(&agent.id, &NodeDataPatch::new().label(agent.data.label.clone()));
    assert!(!editor.delete_nodes(&HashSet::from(["ghost".to_string()])));
    assert!(!editor.commit());
    assert_eq!(editor.history().len(), len);
}

#[test]
fn test_invalid_drop_is_ignored() {
    let mut editor = editor();
    let event = DropEvent {
        payload: None,
        screen: Position::new(1.0, 1.0),
    };
    assert!(editor.handle_drop(&event, &identity, &NoEntities).is_none());
    assert!(editor.handle_drop(&DropEvent::new("{}", Position::new(1.0, 1.0)), &identity, &NoEntities).is_none());
    assert!(editor.store().nodes().is_empty());
    assert_eq!(pos(&editor), (1, 0));
}

#[test]
fn test_drop_uses_surface_and_selected_agent() {
    let mut editor = editor();
    let agents = HashMap::from([(
        "a-1".to_string(),
        AgentProfile {
            id: "a-1".into(),
            name: "Researcher".into(),
            tools: vec!["search".into()],
            ..Default::default()
        },
    )]);
    editor.select_agent(Some("a-1".into()));

    let surface = |p: Position| Position::new(p.x / 2.0, p.y / 2.0);
    let node = editor.handle_drop(&DropEvent::new("agent", Position::new(200.0, 100.0)), &surface, &agents).unwrap();
    assert_eq!(node.position, Position::new(100.0, 50.0));
    assert_eq!(node.data.label, "Researcher");
    assert_eq!(node.data.agent_ref.as_deref(), Some("a-1"));
    assert_eq!(node.data.tools, vec!["search".to_string()]);

    // the selection only pre-fills agent nodes
    let tool = drop_kind(&mut editor, "tool", 0.0, 0.0);
    assert_eq!(tool.data.label, "Tool Node");
    assert!(tool.data.agent_ref.is_none());
}

#[test]
fn test_unknown_kind_drops_as_custom() {
    let mut editor = editor();
    let node = drop_kind(&mut editor, "critic", 5.0, 5.0);
    assert_eq!(node.kind, NodeKind::Custom("critic".into()));
    assert_eq!(node.data.label, "Critic Node");
    assert!(node.id.starts_with("critic-"));
}

#[test]
fn test_drag_start_then_drop() {
    let mut editor = editor();
    assert!(!editor.start_drag("not a kind!"));
    assert!(editor.drop_at(Position::new(0.0, 0.0), &NoEntities).is_none());

    assert!(editor.start_drag("decision"));
    let node = editor.drop_at(Position::new(10.0, 20.0), &NoEntities).unwrap();
    assert_eq!(node.kind, NodeKind::Decision);
    assert_eq!(pos(&editor), (2, 1));

    assert!(editor.start_drag("tool"));
    editor.cancel_drag();
    assert!(editor.drop_at(Position::new(0.0, 0.0), &NoEntities).is_none());
}

#[test]
fn test_drop_on_edge_splits_it() {
    let mut editor = editor();
    let agent = drop_kind(&mut editor, "agent", 0.0, 0.0);
    let end = drop_kind(&mut editor, "end", 400.0, 0.0);
    let edge = editor.connect(&agent.id, &end.id, Some("out".into())).unwrap();
    let len = editor.history().len();

    let tool = editor.drop_on_edge(&DropEvent::new("tool", Position::new(200.0, 0.0)), &edge.id, &identity, &NoEntities).unwrap();
    assert_eq!(editor.history().len(), len + 1);
    assert!(editor.store().edge(&edge.id).is_none());

    let edges = editor.store().edges();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().any(|e| e.connects(&agent.id, &tool.id, Some("out"))));
    assert!(edges.iter().any(|e| e.connects(&tool.id, &end.id, None)));
}

#[test]
fn test_drop_on_dangling_edge_keeps_it() {
    let mut editor = editor();
    let text = r#"{
        "name": "Dangling",
        "nodes": [{"id": "a", "type": "agent", "position": {"x": 0, "y": 0}, "data": {"label": "A"}}],
        "edges": [{"id": "e1", "source": "a", "target": "ghost"}]
    }"#;
    editor.import_json(text).unwrap();
    let len = editor.history().len();

    let node = editor.drop_on_edge(&DropEvent::new("tool", Position::new(50.0, 0.0)), "e1", &identity, &NoEntities).unwrap();
    assert_eq!(editor.history().len(), len + 1);
    assert!(editor.store().node(&node.id).is_some());
    assert_eq!(editor.store().edges().len(), 1);
    assert!(editor.store().edge("e1").is_some());
    assert!(!editor.store().edges().iter().any(|e| e.touches(&node.id)));
}

#[test]
fn test_connect_rejects_missing_endpoint() {
    let mut editor = editor();
    let agent = drop_kind(&mut editor, "agent", 0.0, 0.0);
    let before = editor.snapshot();

    assert!(matches!(editor.connect(&agent.id, "ghost", None), Err(GraphEditError::Edge(_))));
    assert_eq!(editor.snapshot(), before);
    assert_eq!(pos(&editor), (2, 1));
}

#[test]
fn test_inline_edits_apply_in_order() {
    let mut editor = editor();
    let node = drop_kind(&mut editor, "tool", 0.0, 0.0);
    let publisher = editor.edit_publisher();
    let len = editor.history().len();

    publisher.request_label(&node.id, "First").unwrap();
    publisher.request_label("ghost", "Nobody").unwrap();
    publisher.request_label(&node.id, "Second").unwrap();

    assert_eq!(editor.process_edits(), 2);
    assert_eq!(editor.store().node(&node.id).unwrap().data.label, "Second");
    assert_eq!(editor.history().len(), len + 2);

    // requests are consumed exactly once
    assert_eq!(editor.process_edits(), 0);

    editor.undo();
    assert_eq!(editor.store().node(&node.id).unwrap().data.label, "First");
}

#[test]
fn test_transact_commits_once() {
    let mut editor = editor();
    let (a, b) = editor.transact(|store| {
        let a = store.add_node(NodeKind::Start, Position::new(0.0, 0.0), NodeDataPatch::new());
        let b = store.add_node(NodeKind::End, Position::new(100.0, 0.0), NodeDataPatch::new());
        store.add_edge(&a.id, &b.id, None).unwrap();
        (a, b)
    });
    assert_eq!(pos(&editor), (2, 1));
    assert!(editor.store().node(&a.id).is_some());
    assert!(editor.store().node(&b.id).is_some());
}

#[test]
fn test_new_commit_truncates_redo() {
    let mut editor = editor();
    drop_kind(&mut editor, "agent", 0.0, 0.0);
    drop_kind(&mut editor, "tool", 0.0, 0.0);
    editor.undo();
    assert!(editor.history().can_redo());

    drop_kind(&mut editor, "human", 0.0, 0.0);
    assert!(!editor.history().can_redo());
    assert!(!editor.redo());
    assert_eq!(pos(&editor), (3, 2));
}

#[test]
fn test_history_capacity_from_builder() {
    let mut editor = EditorBuilder::new().history_capacity(3).build().unwrap();
    for i in 0..5 {
        drop_kind(&mut editor, "tool", i as f64, 0.0);
    }
    assert_eq!(pos(&editor), (3, 2));
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.store().nodes().len(), 3);
}

#[test]
fn test_import_invalid_json_keeps_graph() {
    let mut editor = editor();
    drop_kind(&mut editor, "agent", 0.0, 0.0);
    let before = editor.snapshot();

    assert!(editor.import_json("{ not json").is_err());
    assert_eq!(editor.snapshot(), before);
    assert_eq!(pos(&editor), (2, 1));
}

#[test]
fn test_import_resets_history() {
    let mut editor = editor();
    drop_kind(&mut editor, "agent", 0.0, 0.0);
    editor.mark_saved();

    let text = r#"{
        "name": "Imported Flow",
        "framework": "react",
        "nodes": [
            {"id": "a", "type": "agent", "position": {"x": 0, "y": 0}, "data": {"label": "A"}},
            {"id": "b", "type": "tool", "position": {"x": 10, "y": 0}, "data": {"label": "B"}}
        ],
        "edges": [{"id": "e1", "source": "a", "target": "b"}]
    }"#;
    editor.import_json(text).unwrap();

    assert_eq!(editor.name(), "Imported Flow");
    assert_eq!(editor.framework(), "react");
    assert_eq!(editor.store().nodes().len(), 2);
    assert_eq!(editor.store().edges().len(), 1);
    assert!(editor.is_dirty());

    // the previous graph is still one undo away
    assert!(editor.undo());
    assert_eq!(editor.store().nodes().len(), 1);
}

#[test]
fn test_reset_clears_graph() {
    let mut editor = editor();
    drop_kind(&mut editor, "agent", 0.0, 0.0);
    editor.reset();
    assert!(editor.store().nodes().is_empty());
    assert_eq!(pos(&editor), (3, 2));

    // resetting an empty graph still checkpoints
    editor.reset();
    assert_eq!(pos(&editor), (4, 3));
}

#[test]
fn test_export() {
    let mut editor = EditorBuilder::new().name("My Research Flow").framework("react").build().unwrap();
    drop_kind(&mut editor, "agent", 0.0, 0.0);

    let (filename, json) = editor.export().unwrap();
    assert_eq!(filename, "My_Research_Flow.json");
    let doc = codec::from_json(&json).unwrap();
    assert_eq!(doc.name, "My Research Flow");
    assert_eq!(doc.framework.as_deref(), Some("react"));
    assert_eq!(doc.nodes.len(), 1);
}

#[test]
fn test_save_and_restore() {
    let autosave = Autosave::new(MemKv::new());
    let mut editor = EditorBuilder::new().name("Saved").build().unwrap();
    assert!(!editor.is_dirty());

    drop_kind(&mut editor, "agent", 0.0, 0.0);
    assert!(editor.is_dirty());
    editor.save(&autosave).unwrap();
    assert!(!editor.is_dirty());

    // undo does not make the editor dirty again
    editor.undo();
    assert!(!editor.is_dirty());

    let mut other = EditorBuilder::new().build().unwrap();
    assert!(other.restore_autosaved(&autosave, "Saved").unwrap());
    assert_eq!(other.name(), "Saved");
    assert_eq!(other.store().nodes().len(), 1);
    assert!(!other.restore_autosaved(&autosave, "Missing").unwrap());
    assert_eq!(autosave.recent().unwrap().len(), 1);
}

#[test]
fn test_palette_follows_framework() {
    let mut editor = EditorBuilder::new().framework("react").build().unwrap();
    assert!(editor.palette().iter().any(|e| e.kind == NodeKind::Tool));

    editor.set_framework("unknown-framework");
    let custom = NodeTypeRegistry::builtin();
    assert_eq!(editor.palette(), custom.node_types_for("custom"));
}

#[test]
fn test_history_notifications() {
    let mut editor = editor();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let events = ChannelEvent::channel(editor.channel(), ChannelOptions::default()).unwrap();
    let s = seen.clone();
    events.on_history(move |e| s.lock().unwrap().push(e.clone()));

    drop_kind(&mut editor, "agent", 0.0, 0.0);
    editor.undo();
    editor.redo();
    editor.mark_saved();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            HistoryEvent::Committed(HistoryPosition { cursor: 1, len: 2 }),
            HistoryEvent::Undo(HistoryPosition { cursor: 0, len: 2 }),
            HistoryEvent::Redo(HistoryPosition { cursor: 1, len: 2 }),
            HistoryEvent::Saved,
        ]
    );
}
