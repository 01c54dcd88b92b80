use matrixflow::compiler::loader;
use matrixflow::dsl::builder::WorkflowBuilder;
use matrixflow::dsl::{ActionType, NodeConfig, Position, DEFAULT_WORKFLOW_NAME};
use matrixflow::error::StoreError;
use matrixflow::runtime::ids::SequentialIds;
use matrixflow::runtime::store::{GraphStats, GraphStore, Viewport, COPY_SUFFIX};
use serde_json::json;
use std::collections::HashSet;

fn store() -> GraphStore {
    GraphStore::with_ids(Box::new(SequentialIds::new()))
}

#[test]
fn test_create_node_uses_registry_label() {
    let mut store = store();
    let id = store
        .create_node(ActionType::CreateRoom, Position::new(10.0, 20.0))
        .expect("known type");

    assert_eq!(id, "createRoom-1");
    let node = store.node(&id).unwrap();
    assert_eq!(node.kind, ActionType::CreateRoom);
    assert_eq!(node.data.label, "Create Room");
    assert_eq!(node.position, Position::new(10.0, 20.0));
    assert!(node.config().is_empty());
}

#[test]
fn test_unknown_type_is_rejected_and_not_added() {
    let mut store = store();
    store.create_node(ActionType::SendMessage, Position::default()).unwrap();

    let err = store
        .create_node(ActionType::Unknown("teleport".into()), Position::default())
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownActionType("teleport".to_string()));

    let err = store
        .drop_node("teleport", Position::default(), &Viewport::default())
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownActionType("teleport".to_string()));

    assert_eq!(store.nodes().len(), 1);
}

#[test]
fn test_node_count_matches_successful_creations() {
    let mut store = store();
    let requests = ["createRoom", "bogus", "sendMessage", "waitTime", "", "split", "analyseStats"];

    let mut created = 0;
    for name in requests {
        if store.drop_node(name, Position::new(5.0, 5.0), &Viewport::default()).is_ok() {
            created += 1;
        }
        let first = store.nodes().first().map(|n| n.id.clone());
        if let Some(first) = first {
            store.connect(&first, "nowhere");
            let _ = store.update_node_config("missing", NodeConfig::new());
        }
    }

    assert_eq!(created, 5);
    assert_eq!(store.nodes().len(), created);
}

#[test]
fn test_drop_through_zero_zoom_is_rejected() {
    let mut store = store();
    let viewport = Viewport {
        zoom: 0.0,
        ..Viewport::default()
    };

    let err = store
        .drop_node("createRoom", Position::new(10.0, 10.0), &viewport)
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidPosition { .. }));
    assert!(store.nodes().is_empty());
}

#[test]
fn test_non_finite_position_is_rejected() {
    let mut store = store();
    for position in [
        Position::new(f64::NAN, 0.0),
        Position::new(0.0, f64::INFINITY),
        Position::new(f64::NEG_INFINITY, 1.0),
    ] {
        let err = store.create_node(ActionType::SendMessage, position).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPosition { .. }), "{position:?}");
    }
    assert!(store.nodes().is_empty());

    // Whatever the store accepts must survive its own export
    store
        .drop_node("waitTime", Position::new(40.0, 40.0), &Viewport { zoom: 0.5, ..Viewport::default() })
        .unwrap();
    let json = loader::to_json(&store.export()).unwrap();
    let imported = loader::import_workflow("w.json", &json).unwrap();
    assert_eq!(imported.workflow.nodes, store.nodes());
}

#[test]
fn test_add_node_places_in_visible_area() {
    let mut store = store();
    let id = store.add_node(ActionType::WaitTime).unwrap();
    let node = store.node(&id).unwrap();

    assert!((100.0..500.0).contains(&node.position.x));
    assert!((100.0..500.0).contains(&node.position.y));
}

#[test]
fn test_drop_node_projects_screen_point() {
    let mut store = store();
    let viewport = Viewport {
        origin: Position::new(200.0, 60.0),
        pan: Position::new(-100.0, 40.0),
        zoom: 2.0,
    };

    let id = store
        .drop_node("inviteUser", Position::new(500.0, 300.0), &viewport)
        .unwrap();

    // (500 - 200 + 100) / 2, (300 - 60 - 40) / 2
    assert_eq!(store.node(&id).unwrap().position, Position::new(200.0, 100.0));
}

#[test]
fn test_update_node_config_replaces_whole_config() {
    let mut store = store();
    let id = store.create_node(ActionType::SendMessage, Position::default()).unwrap();

    store
        .update_node_config(&id, NodeConfig::new().with("message", "hi").with("format", "html"))
        .unwrap();
    store
        .update_node_config(&id, NodeConfig::new().with("targetRoom", "!room:matrix.org"))
        .unwrap();

    let config = store.node(&id).unwrap().config();
    assert_eq!(config.len(), 1);
    assert_eq!(config.get_str("targetRoom"), Some("!room:matrix.org"));
    assert_eq!(config.get("message"), None);
}

#[test]
fn test_update_missing_node_is_reported_and_changes_nothing() {
    let mut store = store();
    store.create_node(ActionType::DestroyRoom, Position::default()).unwrap();
    let before = store.nodes().to_vec();

    let err = store
        .update_node_config("ghost", NodeConfig::new().with("roomId", "!x"))
        .unwrap_err();

    assert_eq!(err, StoreError::NodeNotFound("ghost".to_string()));
    assert_eq!(store.nodes(), before.as_slice());
}

#[test]
fn test_set_config_field_merges() {
    let mut store = store();
    let id = store.create_node(ActionType::CreateRoom, Position::default()).unwrap();

    store.set_config_field(&id, "roomName", "Lobby").unwrap();
    store.set_config_field(&id, "visibility", "public").unwrap();
    store
        .set_config_field(&id, "members", json!(["@a:matrix.org"]))
        .unwrap();

    let config = store.node(&id).unwrap().config();
    assert_eq!(config.get_str("roomName"), Some("Lobby"));
    assert_eq!(config.get_str("visibility"), Some("public"));
    assert_eq!(config.get("members"), Some(&json!(["@a:matrix.org"])));
}

#[test]
fn test_connect_is_permissive() {
    let mut store = store();
    let a = store.create_node(ActionType::CreateRoom, Position::default()).unwrap();
    let b = store.create_node(ActionType::SendMessage, Position::default()).unwrap();

    let first = store.connect(&a, &b);
    let second = store.connect(&a, &b);
    store.connect(&a, &a);
    store.connect(&b, "does-not-exist");

    assert_ne!(first, second);
    assert_eq!(store.edges().len(), 4);
    assert_eq!(
        store.stats(),
        GraphStats {
            actions: 2,
            connections: 4
        }
    );
}

#[test]
fn test_remove_node_cascades_to_edges() {
    let mut store = store();
    let a = store.create_node(ActionType::CreateRoom, Position::default()).unwrap();
    let b = store.create_node(ActionType::SendMessage, Position::default()).unwrap();
    let c = store.create_node(ActionType::WaitTime, Position::default()).unwrap();
    store.connect(&a, &b);
    store.connect(&b, &c);
    let keep = store.connect(&a, &c);
    store.select_node(&b).unwrap();

    let removed = store.remove_node(&b).unwrap();

    assert_eq!(removed.id, b);
    assert_eq!(store.nodes().len(), 2);
    assert_eq!(store.edges().len(), 1);
    assert_eq!(store.edges()[0].id, keep);
    assert!(store.selected_node().is_none());
    assert_eq!(store.remove_node(&b).unwrap_err(), StoreError::NodeNotFound(b));
}

#[test]
fn test_remove_edge() {
    let mut store = store();
    let a = store.create_node(ActionType::CreateRoom, Position::default()).unwrap();
    let edge = store.connect(&a, &a);

    assert_eq!(store.remove_edge(&edge).unwrap().id, edge);
    assert!(store.edges().is_empty());
    assert_eq!(store.remove_edge(&edge).unwrap_err(), StoreError::EdgeNotFound(edge));
}

#[test]
fn test_selection() {
    let mut store = store();
    let id = store.create_node(ActionType::AnalyseStats, Position::default()).unwrap();

    assert!(store.selected_node().is_none());
    assert_eq!(store.select_node(&id).unwrap().id, id);
    assert_eq!(store.selected_node().unwrap().id, id);
    assert!(store.select_node("ghost").is_err());
    // A failed select keeps the previous selection
    assert_eq!(store.selected_node().unwrap().id, id);

    store.clear_selection();
    assert!(store.selected_node().is_none());
}

#[test]
fn test_load_workflow_replaces_graph() {
    let mut store = store();
    let id = store.create_node(ActionType::CreateRoom, Position::default()).unwrap();
    store.select_node(&id).unwrap();

    let workflow = WorkflowBuilder::new("loaded")
        .name("Loaded")
        .node("a", ActionType::InviteUser, 0.0, 0.0).build()
        .node("b", ActionType::SendMessage, 0.0, 0.0).build()
        .connect("a", "b")
        .build();
    store.load_workflow(workflow);

    assert_eq!(store.name(), "Loaded");
    assert_eq!(store.nodes().len(), 2);
    assert_eq!(store.edges().len(), 1);
    assert!(store.node(&id).is_none());
    assert!(store.selected_node().is_none());
}

#[test]
fn test_duplicate_rekeys_ids() {
    let mut store = store();
    store.set_name("Daily");
    let a = store.create_node(ActionType::CreateRoom, Position::new(1.0, 2.0)).unwrap();
    let b = store.create_node(ActionType::SendMessage, Position::new(3.0, 4.0)).unwrap();
    store.set_config_field(&b, "message", "bonjour").unwrap();
    store.connect(&a, &b);

    let copy = store.duplicate();

    assert_eq!(copy.name, format!("Daily{}", COPY_SUFFIX));
    assert_eq!(copy.nodes.len(), store.nodes().len());
    assert_eq!(copy.edges.len(), store.edges().len());

    let original_ids: HashSet<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
    for node in &copy.nodes {
        assert!(!original_ids.contains(node.id.as_str()));
    }
    assert_ne!(copy.edges[0].id, store.edges()[0].id);

    // Edge follows the re-keyed endpoints
    let edge = &copy.edges[0];
    assert_eq!(copy.node(&edge.source).unwrap().kind, ActionType::CreateRoom);
    let target = copy.node(&edge.target).unwrap();
    assert_eq!(target.config().get_str("message"), Some("bonjour"));
    assert_eq!(target.position, Position::new(3.0, 4.0));

    // The source graph is untouched
    assert_eq!(store.name(), "Daily");
    assert!(store.node(&a).is_some());
}

#[test]
fn test_default_name() {
    let store = GraphStore::new();
    assert_eq!(store.name(), DEFAULT_WORKFLOW_NAME);
    assert_eq!(store.stats().actions, 0);
}
