//! End-to-end editing scenarios driven through the public API.
#![allow(clippy::float_cmp)]

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use world_editor::camera::{Point, ScaleBounds, Viewport, ZoomDirection};
use world_editor::config::EditorConfig;
use world_editor::doc::{MapMeta, Pin, PinKind};
use world_editor::engine::Editor;
use world_editor::error::EditorError;
use world_editor::history::{Command, History, Reversible};
use world_editor::input::{Button, Selection, Tool};
use world_editor::store::MemoryStore;

fn pin(name: &str, x: f64, y: f64) -> Pin {
    Pin {
        id: Uuid::new_v4(),
        kind: PinKind::Location,
        x,
        y,
        display_name: name.into(),
        color: "#D94B4B".into(),
        icon_size: 24.0,
        linked_entity_id: None,
    }
}

async fn editor(pins: Vec<Pin>) -> (Editor, Arc<MemoryStore>) {
    let meta = MapMeta { name: "Scenario".into(), width: 1000.0, height: 1000.0 };
    let store = Arc::new(MemoryStore::new(meta.clone()));
    store.seed(pins.clone(), Vec::new()).await;
    let mut editor = Editor::new(store.clone(), meta.clone(), EditorConfig::default());
    editor.load(meta, pins, Vec::new());
    (editor, store)
}

struct Bump;

#[async_trait]
impl Reversible<i64> for Bump {
    async fn undo(&self, n: &mut i64) -> Result<(), EditorError> {
        *n -= 1;
        Ok(())
    }

    async fn redo(&self, n: &mut i64) -> Result<(), EditorError> {
        *n += 1;
        Ok(())
    }
}

#[test]
fn zoom_keeps_point_under_cursor() {
    let viewports = [
        Viewport::default(),
        Viewport { scale: 0.7, offset_x: -120.0, offset_y: 45.5 },
        Viewport { scale: 2.4, offset_x: 300.0, offset_y: -800.0 },
    ];
    let pointers = [Point::new(0.0, 0.0), Point::new(512.3, 97.1), Point::new(-40.0, 1200.0)];
    for vp in viewports {
        for p in pointers {
            let before = vp.to_world(p);
            let after = vp.zoom_at(p, ZoomDirection::In).to_world(p);
            assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9, "{vp:?} at {p:?}");
        }
    }
}

#[test]
fn scale_stays_within_bounds() {
    let bounds = ScaleBounds::default();
    let mut vp = Viewport::default();
    let steps = [ZoomDirection::In; 40].into_iter().chain([ZoomDirection::Out; 80]).chain([ZoomDirection::In; 7]);
    for dir in steps {
        vp = vp.zoom_at(Point::new(300.0, 200.0), dir);
        assert!((bounds.min..=bounds.max).contains(&vp.scale), "scale {} out of bounds", vp.scale);
    }
}

#[tokio::test]
async fn relocation_clamps_to_map() {
    let p = pin("P", 100.0, 100.0);
    let (mut editor, store) = editor(vec![p.clone()]).await;

    editor.click(Point::new(100.0, 100.0), Button::Secondary).await;
    editor.pointer_move(Point::new(1500.0, 700.0)).await;
    editor.click(Point::new(500.0, 500.0), Button::Primary).await;

    assert_eq!(editor.pin(&p.id).map(Pin::position), Some(Point::new(1000.0, 700.0)));
    assert_eq!(store.pin(p.id).await.map(|p| p.position()), Some(Point::new(1000.0, 700.0)));
}

#[tokio::test]
async fn history_evicts_oldest_past_capacity() {
    let mut history: History<i64> = History::new(50);
    let mut n = 0_i64;
    for i in 0..51 {
        history.push(Command::new("bump", format!("bump {i}"), Bump));
        n += 1;
    }
    assert_eq!(history.len(), 50);
    assert!(history.entries().all(|c| c.description() != "bump 0"));
    assert!(history.can_undo());

    while history.undo(&mut n).await.unwrap_or(false) {}
    assert_eq!(n, 1);
}

#[tokio::test]
async fn placement_round_trips_through_undo_redo() {
    let (mut editor, store) = editor(Vec::new()).await;
    editor.set_tool(Tool::PlacePin);
    editor.click(Point::new(321.0, 654.0), Button::Primary).await;
    let after: Vec<Pin> = editor.pins().into_iter().cloned().collect();
    assert_eq!(after.len(), 1);

    assert!(editor.undo().await.unwrap());
    assert!(editor.pins().is_empty());
    assert_eq!(store.pin_count().await, 0);

    assert!(editor.redo().await.unwrap());
    let redone: Vec<Pin> = editor.pins().into_iter().cloned().collect();
    assert_eq!(redone, after);
    assert_eq!(store.pin(after[0].id).await.as_ref(), Some(&after[0]));
}

#[tokio::test]
async fn road_needs_two_distinct_pins() {
    let a = pin("A", 100.0, 100.0);
    let b = pin("B", 300.0, 400.0);
    let (mut editor, store) = editor(vec![a.clone(), b.clone()]).await;
    editor.set_tool(Tool::Road);

    editor.click(Point::new(100.0, 100.0), Button::Primary).await;
    editor.click(Point::new(100.0, 100.0), Button::Primary).await;
    assert!(editor.roads().is_empty());
    assert!(!editor.road_draw().drawing());

    editor.click(Point::new(100.0, 100.0), Button::Primary).await;
    editor.click(Point::new(300.0, 400.0), Button::Primary).await;
    let roads = editor.roads();
    assert_eq!(roads.len(), 1);
    assert_eq!((roads[0].from_pin_id, roads[0].to_pin_id), (a.id, b.id));
    assert_eq!(editor.selection(), Some(Selection::Road(roads[0].id)));
    assert_eq!(store.road_count().await, 1);
}

#[tokio::test]
async fn relocate_then_undo_then_redo() {
    let p1 = pin("P1", 10.0, 10.0);
    let (mut editor, _store) = editor(vec![p1.clone()]).await;

    editor.click(Point::new(10.0, 10.0), Button::Secondary).await;
    editor.pointer_move(Point::new(50.0, 50.0)).await;
    editor.click(Point::new(700.0, 700.0), Button::Primary).await;
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.pin(&p1.id).map(Pin::position), Some(Point::new(50.0, 50.0)));

    assert!(editor.undo().await.unwrap());
    assert_eq!(editor.pin(&p1.id).map(Pin::position), Some(Point::new(10.0, 10.0)));

    assert!(editor.redo().await.unwrap());
    assert_eq!(editor.pin(&p1.id).map(Pin::position), Some(Point::new(50.0, 50.0)));
}

#[tokio::test]
async fn default_name_continues_the_counter() {
    let (mut editor, _store) = editor(vec![pin("Pin 01", 10.0, 10.0), pin("Pin 02", 20.0, 20.0)]).await;
    editor.set_tool(Tool::PlacePin);
    editor.click(Point::new(500.0, 500.0), Button::Primary).await;

    let names: Vec<&str> = editor.pins().into_iter().map(|p| p.display_name.as_str()).collect();
    assert!(names.contains(&"Pin 03"), "{names:?}");
}
