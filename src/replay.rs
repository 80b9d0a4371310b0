//! Scripted event replay.
//!
//! A script seeds a map into a [`MemoryStore`], feeds a list of input events
//! through an [`Editor`], and reports where everything ended up. The CLI uses
//! this to exercise the editor without a canvas.
//!
//! ```json
//! {
//!   "map": { "name": "Coast", "width": 1000, "height": 1000 },
//!   "events": [
//!     { "type": "tool", "tool": "place_pin" },
//!     { "type": "click", "x": 120, "y": 80 },
//!     { "type": "key_down", "key": "z", "modifiers": { "ctrl": true } }
//!   ]
//! }
//! ```

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::{Point, Size, Viewport};
use crate::config::EditorConfig;
use crate::doc::{MapMeta, MapPatch, Pin, Road};
use crate::engine::{Action, Editor};
use crate::input::{Button, Key, Modifiers, Selection, Tool, WheelDelta};
use crate::store::MemoryStore;

fn primary() -> Button {
    Button::Primary
}

/// One scripted input event. Coordinates are screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
    },
    /// Press and release at the same point.
    Click {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
    },
    PointerLeave,
    Wheel {
        x: f64,
        y: f64,
        dy: f64,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Tool {
        tool: Tool,
    },
    Undo,
    Redo,
    /// Fit the map into a viewport of the given size.
    Fit {
        width: f64,
        height: f64,
    },
    UpdateMap {
        patch: MapPatch,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub map: MapMeta,
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub roads: Vec<Road>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

/// A failed edit reported during the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Index of the event that triggered it.
    pub event: usize,
    pub code: &'static str,
    pub message: String,
}

/// Final editor state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub map: MapMeta,
    pub viewport: Viewport,
    pub tool: Tool,
    pub selection: Option<Selection>,
    pub pins: Vec<Pin>,
    pub roads: Vec<Road>,
    /// Descriptions of the recorded commands, oldest first.
    pub history: Vec<String>,
    pub history_cursor: Option<usize>,
    pub notices: Vec<Notice>,
}

/// Run `script` against a fresh in-memory store.
pub async fn run_script(script: ReplayScript, config: EditorConfig) -> ReplayReport {
    let store = Arc::new(MemoryStore::new(script.map.clone()));
    store.seed(script.pins.clone(), script.roads.clone()).await;
    let mut editor = Editor::new(store, script.map.clone(), config);
    editor.load(script.map, script.pins, script.roads);

    let mut notices = Vec::new();
    for (index, event) in script.events.into_iter().enumerate() {
        debug!(index, ?event, "replaying event");
        let actions = apply(&mut editor, event).await;
        notices.extend(actions.into_iter().filter_map(|action| match action {
            Action::Notify { code, message } => Some(Notice { event: index, code, message }),
            _ => None,
        }));
    }

    ReplayReport {
        map: editor.doc().meta().clone(),
        viewport: editor.viewport(),
        tool: editor.tool(),
        selection: editor.selection(),
        pins: editor.pins().into_iter().cloned().collect(),
        roads: editor.roads().into_iter().cloned().collect(),
        history: editor.history().entries().map(|c| c.description().to_string()).collect(),
        history_cursor: editor.history().cursor(),
        notices,
    }
}

async fn apply(editor: &mut Editor, event: ScriptEvent) -> Vec<Action> {
    match event {
        ScriptEvent::PointerDown { x, y, button } => editor.pointer_down(Point::new(x, y), button).await,
        ScriptEvent::PointerMove { x, y } => editor.pointer_move(Point::new(x, y)).await,
        ScriptEvent::PointerUp { x, y, button } => editor.pointer_up(Point::new(x, y), button).await,
        ScriptEvent::Click { x, y, button } => editor.click(Point::new(x, y), button).await,
        ScriptEvent::PointerLeave => editor.pointer_leave(),
        ScriptEvent::Wheel { x, y, dy } => editor.wheel(Point::new(x, y), WheelDelta { dx: 0.0, dy }).await,
        ScriptEvent::KeyDown { key, modifiers } => editor.key_down(&Key::new(key), modifiers).await,
        ScriptEvent::KeyUp { key, modifiers } => editor.key_up(&Key::new(key), modifiers),
        ScriptEvent::Tool { tool } => editor.set_tool(tool),
        ScriptEvent::Undo => editor.dispatch(vec![Action::Undo]).await,
        ScriptEvent::Redo => editor.dispatch(vec![Action::Redo]).await,
        ScriptEvent::Fit { width, height } => editor.fit_to_map(Size::new(width, height)),
        ScriptEvent::UpdateMap { patch } => match editor.update_map(patch).await {
            Ok(_) => vec![Action::RenderNeeded],
            Err(e) => vec![Action::Notify { code: e.error_code(), message: e.to_string() }],
        },
    }
}
