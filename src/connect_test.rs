use super::*;
use crate::camera::Point;
use crate::doc::{MapMeta, Pin, PinKind};

fn pin_at(x: f64, y: f64) -> Pin {
    Pin {
        id: Uuid::new_v4(),
        kind: PinKind::Location,
        x,
        y,
        display_name: "p".into(),
        color: "#fff".into(),
        icon_size: 24.0,
        linked_entity_id: None,
    }
}

// =============================================================
// step
// =============================================================

#[test]
fn idle_accessors() {
    let s = RoadDraw::default();
    assert_eq!(s.from_pin_id(), None);
    assert!(!s.drawing());
}

#[test]
fn first_click_sources() {
    let a = Uuid::new_v4();
    let (s, effect) = step(RoadDraw::Idle, RoadEvent::PinClicked(a));
    assert_eq!(s, RoadDraw::Sourced { from: a });
    assert!(s.drawing());
    assert_eq!(s.from_pin_id(), Some(a));
    assert_eq!(effect, Some(RoadEffect::SelectSource(a)));
}

#[test]
fn second_distinct_click_creates_and_returns_to_idle() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let (s, _) = step(RoadDraw::Idle, RoadEvent::PinClicked(a));
    let (s, effect) = step(s, RoadEvent::PinClicked(b));
    assert_eq!(s, RoadDraw::Idle);
    assert_eq!(effect, Some(RoadEffect::Create { from: a, to: b }));
}

#[test]
fn same_pin_twice_resets_without_road() {
    let a = Uuid::new_v4();
    let (s, _) = step(RoadDraw::Idle, RoadEvent::PinClicked(a));
    let (s, effect) = step(s, RoadEvent::PinClicked(a));
    assert_eq!(s, RoadDraw::Idle);
    assert!(effect.is_none());
}

#[test]
fn reset_from_any_state() {
    let a = Uuid::new_v4();
    assert_eq!(step(RoadDraw::Idle, RoadEvent::Reset), (RoadDraw::Idle, None));
    assert_eq!(step(RoadDraw::Sourced { from: a }, RoadEvent::Reset), (RoadDraw::Idle, None));
}

// =============================================================
// road_between
// =============================================================

#[test]
fn road_between_uses_current_positions() {
    let a = pin_at(10.0, 20.0);
    let b = pin_at(300.0, 400.0);
    let mut doc = MapDoc::new(MapMeta::default());
    doc.insert_pin(a.clone());
    doc.insert_pin(b.clone());

    let road = road_between(&doc, a.id, b.id, RoadStyle::default()).unwrap();
    assert_eq!(road.from_pin_id, a.id);
    assert_eq!(road.to_pin_id, b.id);
    assert_eq!(road.path_points, vec![Point::new(10.0, 20.0), Point::new(300.0, 400.0)]);
}

#[test]
fn road_between_rejects_self_loop_and_missing_pins() {
    let a = pin_at(10.0, 20.0);
    let mut doc = MapDoc::new(MapMeta::default());
    doc.insert_pin(a.clone());

    assert!(matches!(road_between(&doc, a.id, a.id, RoadStyle::default()), Err(EditorError::Validation(_))));
    assert!(matches!(
        road_between(&doc, a.id, Uuid::new_v4(), RoadStyle::default()),
        Err(EditorError::Validation(_))
    ));
}
