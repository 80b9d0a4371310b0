use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_hotkeys() {
    assert_eq!(Tool::from_hotkey("v"), Some(Tool::Select));
    assert_eq!(Tool::from_hotkey("P"), Some(Tool::PlacePin));
    assert_eq!(Tool::from_hotkey("r"), Some(Tool::Road));
    assert_eq!(Tool::from_hotkey("x"), None);
    assert_eq!(Tool::from_hotkey("Escape"), None);
}

#[test]
fn tool_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&Tool::PlacePin).unwrap(), "\"place_pin\"");
    assert_eq!(serde_json::from_str::<Tool>("\"road\"").unwrap(), Tool::Road);
}

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
}

#[test]
fn command_modifier_accepts_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Modifiers::default() }.command());
}

#[test]
fn modifiers_deserialize_with_missing_fields() {
    let m: Modifiers = serde_json::from_str(r#"{"ctrl": true}"#).unwrap();
    assert!(m.ctrl);
    assert!(!m.shift);
}

// =============================================================
// Button / Key / Selection
// =============================================================

#[test]
fn button_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Button::Secondary).unwrap(), "\"secondary\"");
}

#[test]
fn key_as_str() {
    assert_eq!(Key::new("Escape").as_str(), "Escape");
    assert_eq!(Key::new("z"), Key("z".into()));
}

#[test]
fn selection_serializes_tagged() {
    let id = uuid::Uuid::nil();
    let json = serde_json::to_value(Selection::Pin(id)).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "pin", "id": id }));
}

// =============================================================
// State defaults
// =============================================================

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(ui.selection.is_none());
    assert_eq!(ui.place_kind, PinKind::Location);
}

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}
