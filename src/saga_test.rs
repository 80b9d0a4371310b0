#![allow(clippy::float_cmp)]

use std::cell::Cell;

use uuid::Uuid;

use super::*;
use crate::camera::Point;
use crate::doc::{MapMeta, Pin, PinKind, PinPatch};

fn doc_with_pin() -> (MapDoc, Pin) {
    let pin = Pin {
        id: Uuid::new_v4(),
        kind: PinKind::Cell,
        x: 10.0,
        y: 10.0,
        display_name: "Pin 01".into(),
        color: "#fff".into(),
        icon_size: 24.0,
        linked_entity_id: None,
    };
    let mut doc = MapDoc::new(MapMeta::default());
    doc.insert_pin(pin.clone());
    (doc, pin)
}

fn position(doc: &MapDoc, pin: &Pin) -> Option<Point> {
    doc.pin(&pin.id).map(Pin::position)
}

#[tokio::test]
async fn confirmed_mutation_keeps_local_change() {
    let (mut doc, pin) = doc_with_pin();
    let to = Point::new(50.0, 50.0);
    let result = apply_confirm(
        &mut doc,
        "move",
        |d| {
            d.patch_pin(&pin.id, &PinPatch::position(to));
        },
        async { Ok::<_, PersistenceError>(7) },
        |d| {
            d.patch_pin(&pin.id, &PinPatch::position(pin.position()));
        },
    )
    .await;
    assert_eq!(result, Ok(7));
    assert_eq!(position(&doc, &pin), Some(to));
}

#[tokio::test]
async fn rejected_mutation_rolls_back() {
    let (mut doc, pin) = doc_with_pin();
    let result: Result<(), _> = apply_confirm(
        &mut doc,
        "move",
        |d| {
            d.patch_pin(&pin.id, &PinPatch::position(Point::new(99.0, 99.0)));
        },
        async { Err(PersistenceError::Unavailable) },
        |d| {
            d.patch_pin(&pin.id, &PinPatch::position(pin.position()));
        },
    )
    .await;
    assert_eq!(result, Err(PersistenceError::Unavailable));
    assert_eq!(position(&doc, &pin), Some(pin.position()));
}

#[tokio::test]
async fn compensation_runs_only_on_rejection() {
    let (mut doc, pin) = doc_with_pin();
    let compensated = Cell::new(false);
    let result = apply_confirm_compensate(
        &mut doc,
        "move",
        |_| {},
        async { Ok::<_, PersistenceError>(()) },
        |_| {},
        async {
            compensated.set(true);
            Ok::<_, PersistenceError>(())
        },
    )
    .await;
    assert!(result.is_ok());
    assert!(!compensated.get());
    assert_eq!(position(&doc, &pin), Some(pin.position()));
}

#[tokio::test]
async fn rejection_rolls_back_and_compensates() {
    let (mut doc, pin) = doc_with_pin();
    let compensated = Cell::new(false);
    let result: Result<(), _> = apply_confirm_compensate(
        &mut doc,
        "move",
        |d| {
            d.patch_pin(&pin.id, &PinPatch::position(Point::new(99.0, 99.0)));
        },
        async { Err(PersistenceError::Rejected("nope".into())) },
        |d| {
            d.patch_pin(&pin.id, &PinPatch::position(pin.position()));
        },
        async {
            compensated.set(true);
            Ok::<_, PersistenceError>(())
        },
    )
    .await;
    assert_eq!(result, Err(PersistenceError::Rejected("nope".into())));
    assert!(compensated.get());
    assert_eq!(position(&doc, &pin), Some(pin.position()));
}

#[tokio::test]
async fn failed_compensation_still_reports_original_error() {
    let (mut doc, _pin) = doc_with_pin();
    let result: Result<(), _> = apply_confirm_compensate(
        &mut doc,
        "move",
        |_| {},
        async { Err(PersistenceError::Unavailable) },
        |_| {},
        async { Err::<(), _>(PersistenceError::Rejected("still down".into())) },
    )
    .await;
    assert_eq!(result, Err(PersistenceError::Unavailable));
}
