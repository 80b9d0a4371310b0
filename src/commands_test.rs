use std::sync::Arc;

use uuid::Uuid;

use super::*;
use crate::doc::{MapMeta, PinKind, RoadStyle};
use crate::history::History;
use crate::store::{MemoryStore, PersistenceError, StoreOp};

// =============================================================
// Helpers
// =============================================================

fn pin_at(name: &str, x: f64, y: f64) -> Pin {
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

async fn seeded(pins: &[Pin]) -> (Workspace, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(MapMeta::default()));
    store.seed(pins.to_vec(), vec![]).await;
    let mut ws = Workspace::new(store.clone(), MapMeta::default());
    ws.doc.load_snapshot(MapMeta::default(), pins.to_vec(), vec![]);
    (ws, store)
}

fn position(ws: &Workspace, id: PinId) -> Option<Point> {
    ws.doc.pin(&id).map(Pin::position)
}

// =============================================================
// PinPlaced
// =============================================================

#[tokio::test]
async fn placed_pin_undo_deletes_and_redo_recreates_same_id() {
    let (mut ws, store) = seeded(&[]).await;
    let pin = pin_at("Pin 01", 10.0, 10.0);
    ws.create_pin(pin.clone()).await.unwrap();

    let mut history = History::new(10);
    history.push(place_pin(pin.clone()));

    assert!(history.undo(&mut ws).await.unwrap());
    assert!(ws.doc.pin(&pin.id).is_none());
    assert_eq!(store.pin_count().await, 0);

    assert!(history.redo(&mut ws).await.unwrap());
    assert_eq!(ws.doc.pin(&pin.id), Some(&pin));
    assert_eq!(store.pin(pin.id).await, Some(pin));
}

// =============================================================
// PinMoved
// =============================================================

#[tokio::test]
async fn moved_pin_round_trip() {
    let pin = pin_at("Pin 01", 10.0, 10.0);
    let (mut ws, _store) = seeded(&[pin.clone()]).await;
    let to = Point::new(50.0, 50.0);
    ws.move_pin(pin.id, pin.position(), to).await.unwrap();

    let mut history = History::new(10);
    history.push(move_pin(&pin.display_name, pin.id, pin.position(), to));
    assert_eq!(history.undo_description(), Some("Move Pin 01 to (50, 50)"));

    history.undo(&mut ws).await.unwrap();
    assert_eq!(position(&ws, pin.id), Some(Point::new(10.0, 10.0)));
    history.redo(&mut ws).await.unwrap();
    assert_eq!(position(&ws, pin.id), Some(to));
}

#[tokio::test]
async fn failed_undo_of_move_leaves_position_and_cursor() {
    let pin = pin_at("Pin 01", 10.0, 10.0);
    let (mut ws, store) = seeded(&[pin.clone()]).await;
    let to = Point::new(50.0, 50.0);
    ws.move_pin(pin.id, pin.position(), to).await.unwrap();

    let mut history = History::new(10);
    history.push(move_pin(&pin.display_name, pin.id, pin.position(), to));
    store.fail_next(StoreOp::UpdatePin, PersistenceError::Unavailable).await;

    assert!(history.undo(&mut ws).await.is_err());
    assert_eq!(position(&ws, pin.id), Some(to));
    assert_eq!(history.cursor(), Some(0));
}

// =============================================================
// PinDeleted
// =============================================================

#[tokio::test]
async fn deleted_pin_undo_recreates() {
    let pin = pin_at("Pin 01", 10.0, 10.0);
    let (mut ws, store) = seeded(&[pin.clone()]).await;
    let removed = ws.delete_pin(pin.id).await.unwrap();

    let mut history = History::new(10);
    history.push(delete_pin(removed));
    history.undo(&mut ws).await.unwrap();
    assert_eq!(ws.doc.pin(&pin.id), Some(&pin));
    assert_eq!(store.pin(pin.id).await, Some(pin.clone()));

    history.redo(&mut ws).await.unwrap();
    assert!(ws.doc.pin(&pin.id).is_none());
}

// =============================================================
// RoadCreated
// =============================================================

#[tokio::test]
async fn created_road_undo_deletes() {
    let a = pin_at("A", 0.0, 0.0);
    let b = pin_at("B", 100.0, 0.0);
    let (mut ws, store) = seeded(&[a.clone(), b.clone()]).await;
    let road = Road {
        id: Uuid::new_v4(),
        from_pin_id: a.id,
        to_pin_id: b.id,
        path_points: vec![a.position(), b.position()],
        style: RoadStyle::default(),
    };
    ws.create_road(road.clone()).await.unwrap();

    let mut history = History::new(10);
    history.push(create_road("A", "B", road.clone()));
    assert_eq!(history.undo_description(), Some("Connect A to B"));

    history.undo(&mut ws).await.unwrap();
    assert_eq!(ws.doc.road_count(), 0);
    assert_eq!(store.road_count().await, 0);
    history.redo(&mut ws).await.unwrap();
    assert_eq!(ws.doc.road(&road.id), Some(&road));
}

// =============================================================
// MapUpdated
// =============================================================

#[tokio::test]
async fn map_update_round_trip() {
    let (mut ws, store) = seeded(&[]).await;
    let after = MapPatch { width: Some(3000.0), ..MapPatch::default() };
    let before = after.inverse_for(ws.doc.meta());
    ws.update_map(after.clone()).await.unwrap();

    let mut history = History::new(10);
    history.push(update_map(before, after));
    history.undo(&mut ws).await.unwrap();
    assert!((ws.doc.bounds().width - 1000.0).abs() < f64::EPSILON);
    assert!((store.meta().await.width - 1000.0).abs() < f64::EPSILON);
    history.redo(&mut ws).await.unwrap();
    assert!((ws.doc.bounds().width - 3000.0).abs() < f64::EPSILON);
}
