//! Integration tests: selection → empty/meaningful classification → delete.

use bp_core::id::NodeId;
use bp_core::model::Position;
use bp_core::snapshot::CanvasSnapshot;
use bp_editor::{CanvasStore, DeleteOutcome, NodeChange};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn load_fixture() -> CanvasStore {
    let snapshot = CanvasSnapshot::from_json(include_str!("fixtures/blueprint.json"))
        .expect("fixture parses");
    let mut store = CanvasStore::new();
    store.load(&snapshot).expect("fixture is valid");
    store
}

fn select(store: &mut CanvasStore, ids: &[&str]) {
    let changes: Vec<NodeChange> = ids
        .iter()
        .map(|id| NodeChange::Select {
            id: NodeId::intern(id),
            selected: true,
        })
        .collect();
    store.apply_node_changes(&changes);
}

fn assert_no_dangling_edges(store: &CanvasStore) {
    for edge in store.edges() {
        assert!(store.node(edge.source).is_some(), "{} lost its source", edge.id);
        assert!(store.node(edge.target).is_some(), "{} lost its target", edge.id);
    }
}

#[test]
fn untouched_nodes_go_without_asking() {
    let mut store = load_fixture();
    select(&mut store, &["scratch", "submit_order"]);

    assert_eq!(store.delete_selection(), DeleteOutcome::Deleted(2));
    assert_eq!(store.nodes().count(), 7);
    assert!(store.node(NodeId::intern("scratch")).is_none());
    assert_no_dangling_edges(&store);
}

#[test]
fn a_description_makes_a_node_worth_asking_about() {
    let mut store = load_fixture();
    select(&mut store, &["home", "scratch"]);

    let DeleteOutcome::NeedsConfirmation(plan) = store.delete_selection() else {
        panic!("home has a description");
    };
    assert_eq!(plan.selected_count(), 2);
    assert_eq!(plan.meaningful, vec![NodeId::intern("home")]);
    assert_eq!(store.nodes().count(), 9);

    assert_eq!(store.confirm_delete(&plan), 2);
    assert_eq!(store.nodes().count(), 7);
    // home_to_checkout went with home
    assert_eq!(store.edges().len(), 1);
    assert_no_dangling_edges(&store);
}

#[test]
fn a_connection_makes_a_node_worth_asking_about() {
    let mut store = load_fixture();
    let scratch = NodeId::intern("scratch");
    let submit = NodeId::intern("submit_order");
    store.connect(scratch, submit).expect("both nodes exist");
    select(&mut store, &["scratch", "submit_order"]);

    let DeleteOutcome::NeedsConfirmation(plan) = store.delete_selection() else {
        panic!("connected nodes are meaningful");
    };
    assert_eq!(plan.meaningful, vec![scratch, submit]);
    assert_eq!(store.confirm_delete(&plan), 2);
    assert_eq!(store.edges().len(), 2);
    assert_no_dangling_edges(&store);
}

#[test]
fn deleting_a_container_cascades_to_its_children() {
    let mut store = load_fixture();
    select(&mut store, &["product_card"]);

    let DeleteOutcome::NeedsConfirmation(plan) = store.delete_selection() else {
        panic!("the card has a custom label");
    };
    assert_eq!(plan.selected, vec![NodeId::intern("product_card")]);
    let cascade: HashSet<NodeId> = plan.cascade.iter().copied().collect();
    let expected: HashSet<NodeId> = ["product_card", "card_title", "card_button"]
        .into_iter()
        .map(NodeId::intern)
        .collect();
    assert_eq!(cascade, expected);

    assert_eq!(store.confirm_delete(&plan), 3);
    assert_eq!(store.nodes().count(), 6);
    for id in &expected {
        assert!(store.node(*id).is_none());
    }
    assert!(store.graph().is_forest());
}

#[test]
fn only_directly_selected_nodes_are_classified() {
    let mut store = load_fixture();
    select(&mut store, &["empty_box"]);

    // The box itself holds nothing; it has no children either.
    assert_eq!(store.delete_selection(), DeleteOutcome::Deleted(1));

    let mut store = load_fixture();
    select(&mut store, &["card_title"]);
    assert_eq!(store.delete_selection(), DeleteOutcome::Deleted(1));
    assert_eq!(
        store.children_of(NodeId::intern("product_card")),
        vec![NodeId::intern("card_button")]
    );
}

#[test]
fn an_empty_container_goes_with_its_meaningful_children() {
    let mut store = load_fixture();
    let bx = NodeId::intern("empty_box");
    let home = NodeId::intern("home");
    // home has a description and an edge
    assert!(store.set_node_parent(home, Some(bx), Position::new(12.0, 75.0)));
    select(&mut store, &["empty_box"]);

    let Some(plan) = store.plan_delete() else {
        panic!("the box is selected");
    };
    assert!(!plan.needs_confirmation());
    assert_eq!(plan.cascade.len(), 2);

    assert_eq!(store.delete_selection(), DeleteOutcome::Deleted(2));
    assert!(store.node(home).is_none());
    assert_eq!(store.edges().len(), 1);
    assert_no_dangling_edges(&store);
}

#[test]
fn a_stale_plan_skips_nodes_already_gone() {
    let mut store = load_fixture();
    select(&mut store, &["checkout", "orders"]);
    let Some(plan) = store.plan_delete() else {
        panic!("two nodes are selected");
    };
    assert!(plan.needs_confirmation());

    assert!(store.remove_node(NodeId::intern("orders")));
    assert_eq!(store.confirm_delete(&plan), 1);
    assert!(store.edges().is_empty());
    assert_no_dangling_edges(&store);
}
