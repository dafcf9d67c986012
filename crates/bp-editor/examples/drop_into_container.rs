//! Drops widgets from the palette onto the canvas, drags them into a card
//! and prints how the card's grid grows.
//!
//! Run with `RUST_LOG=debug cargo run -p bp-editor --example drop_into_container`.

use bp_core::catalog::lookup_widget;
use bp_core::model::Position;
use bp_core::payload::DndPayload;
use bp_editor::CanvasStore;

fn main() {
    env_logger::init();

    let mut store = CanvasStore::new();
    let Some(card_def) = lookup_widget("Card") else {
        eprintln!("Card is missing from the widget registry");
        return;
    };
    let Some(card) = store.drop_payload(DndPayload::for_widget(card_def), Position::new(0.0, 0.0))
    else {
        eprintln!("could not drop the card");
        return;
    };

    // Palette payloads arrive as JSON from the drag source.
    let raw = r#"{ "nodeType": "muiComponent", "flowType": "mui", "label": "Button",
                   "muiComponentType": "Button", "muiCategory": "inputs" }"#;
    for i in 0..3 {
        let Some(payload) = DndPayload::from_json(raw) else {
            eprintln!("unreadable payload");
            return;
        };
        let Some(button) = store.drop_payload(payload, Position::new(800.0, 200.0 * i as f32))
        else {
            continue;
        };

        store.drag_move(button, Position::new(40.0, 90.0));
        let outcome = store.drag_end(button);
        let node = store.node(button).map(|n| n.position);
        let size = store.node(card).and_then(|n| n.size);
        println!("{button}: {outcome:?} at {node:?}, card is now {size:?}");
    }

    match store.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to save: {err}"),
    }
}
