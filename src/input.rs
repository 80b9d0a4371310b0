//! Input model: tools, modifier keys, mouse buttons, selection, and pointer tracking.
//!
//! This module defines the types consumed by the editor engine. `Tool` and
//! `Modifiers` capture the user's intent at the time of an event. `InputState`
//! tracks a press between pointer-down and pointer-up so the engine can tell a
//! click from a canvas pan. The relocation and road-drawing gestures keep their
//! own state in [`crate::relocate`] and [`crate::connect`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{PinId, PinKind, RoadId};

/// Editing tool; decides what a primary click on the map does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Selection and panning (default).
    #[default]
    Select,
    /// Place a single pin on the next background click.
    PlacePin,
    /// Connect two pins with a road.
    Road,
}

impl Tool {
    /// Tool bound to a single-letter hotkey, if any.
    #[must_use]
    pub fn from_hotkey(key: &str) -> Option<Self> {
        match key {
            "v" | "V" => Some(Self::Select),
            "p" | "P" => Some(Self::PlacePin),
            "r" | "R" => Some(Self::Road),
            _ => None,
        }
    }
}

/// Modifier keys held when a key or pointer event fired.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button. Secondary stages a relocation; middle always pans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Scroll delta from a wheel event. Only `dy` zooms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    #[serde(default)]
    pub dx: f64,
    /// Negative zooms in, positive zooms out.
    pub dy: f64,
}

/// The currently selected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Selection {
    Pin(PinId),
    Road(RoadId),
}

/// Tool, selection, and placement kind, as shown by the host's toolbar.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Currently selected entity, if any.
    pub selection: Option<Selection>,
    /// Kind given to pins created with the place-pin tool.
    pub place_kind: PinKind,
}

/// What a click resolved to after hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Empty canvas.
    Background,
    /// The relocation shadow of a staged pin.
    Shadow,
    Pin(PinId),
    Road(RoadId),
}

/// Pointer tracking between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No button held.
    #[default]
    Idle,
    /// A button is held over the background and the canvas follows the pointer.
    ///
    /// A primary press that never travels past the click slop is reported as a
    /// background click on release.
    Panning {
        /// Button that started the pan.
        button: Button,
        /// Screen-space position of the pointer-down.
        origin_screen: Point,
        /// Screen position of the last pointer event; each move pans by the difference.
        last_screen: Point,
        /// Whether the pointer has left the click slop.
        moved: bool,
    },
    /// The primary button is held over something that is not pannable.
    Pressing {
        /// What the pointer-down landed on.
        target: ClickTarget,
    },
}
