//! Event handling and action execution.
//!
//! [`EngineCore`] turns raw pointer, wheel, and key events into [`Action`]s.
//! It is synchronous and never touches the store, so every gesture can be
//! driven in tests without a runtime. [`Editor`] owns the core, the
//! [`Workspace`], and the [`History`]; it executes the effectful actions
//! (persisting, recording commands) and hands the rest back to the host.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::camera::{Point, Size, Viewport, ZoomDirection};
use crate::commands;
use crate::config::EditorConfig;
use crate::connect::{self, RoadDraw, RoadEffect, RoadEvent, road_between};
use crate::consts::CLICK_SLOP_PX;
use crate::doc::{MapDoc, MapMeta, MapPatch, Pin, PinId, Road, RoadId, RoadStyle};
use crate::error::EditorError;
use crate::hit::{Hit, hit_test, near};
use crate::history::{History, Replay};
use crate::input::{Button, ClickTarget, InputState, Key, Modifiers, Selection, Tool, UiState, WheelDelta};
use crate::place::build_pin;
use crate::relocate::{self, DragEffect, DragEvent, DragGesture};
use crate::store::{MapStore, PersistenceError};
use crate::workspace::Workspace;

/// Actions returned from input handlers.
///
/// [`Editor::dispatch`] executes the effectful variants and passes
/// `RenderNeeded`, `SetCursor`, and `Notify` through to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(String),
    /// Blocking notification for a failed edit.
    Notify { code: &'static str, message: String },
    PlacePin(Pin),
    MovePin { id: PinId, from: Point, to: Point },
    DeletePin { id: PinId },
    CreateRoad(Road),
    Undo,
    Redo,
}

/// CSS cursor shown while `tool` is active.
#[must_use]
pub fn cursor_for(tool: Tool) -> &'static str {
    match tool {
        Tool::Select => "default",
        Tool::PlacePin | Tool::Road => "crosshair",
    }
}

// =============================================================================
// ENGINE CORE
// =============================================================================

/// Gesture and view state. Reads the document but never mutates it.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub camera: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub drag: DragGesture,
    pub road: RoadDraw,
    pub config: EditorConfig,
    pub viewport_size: Size,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Tool / view ---

    /// Set the active tool. Leaving the road tool abandons any road in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.ui.tool == Tool::Road && tool != Tool::Road {
            self.step_road(RoadEvent::Reset);
        }
        self.ui.tool = tool;
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Center the whole map in the viewport.
    pub fn fit_to_map(&mut self, doc: &MapDoc) {
        self.camera = Viewport::fit_to_content_within(doc.bounds(), self.viewport_size, self.config.scale);
    }

    /// Drop selection and gestures that point at entities no longer in `doc`,
    /// and move a staged relocation's origin to the pin's current position.
    pub fn reconcile(&mut self, doc: &MapDoc) {
        let stale = match self.ui.selection {
            Some(Selection::Pin(id)) => doc.pin(&id).is_none(),
            Some(Selection::Road(id)) => doc.road(&id).is_none(),
            None => false,
        };
        if stale {
            self.ui.selection = None;
        }
        if self.drag.pin_id().is_some_and(|id| doc.pin(&id).is_none()) {
            self.step_drag(DragEvent::Cancel);
        }
        if self.road.from_pin_id().is_some_and(|id| doc.pin(&id).is_none()) {
            self.step_road(RoadEvent::Reset);
        }
        self.resync_drag(doc);
    }

    // --- Input events ---

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let Some(direction) = ZoomDirection::from_wheel(delta.dy) else {
            return Vec::new();
        };
        if !screen_pt.is_finite() {
            return Vec::new();
        }
        self.camera = self.camera.zoom_at_within(screen_pt, direction, self.config.scale);
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_down(&mut self, doc: &MapDoc, screen_pt: Point, button: Button) -> Vec<Action> {
        if !screen_pt.is_finite() {
            return Vec::new();
        }
        let world = self.camera.to_world(screen_pt);
        match button {
            Button::Middle => self.start_pan(button, screen_pt),
            Button::Secondary => match hit_test(world, doc, &self.camera, self.config.pin_hit_radius_px) {
                Some(Hit::Pin(id)) => {
                    let Some(pin) = doc.pin(&id) else {
                        return Vec::new();
                    };
                    self.step_drag(DragEvent::Stage { pin_id: id, position: pin.position() });
                    vec![Action::SetCursor("move".into()), Action::RenderNeeded]
                }
                _ => Vec::new(),
            },
            Button::Primary => {
                let target = self.click_target(doc, world);
                if target == ClickTarget::Background && self.ui.tool == Tool::Select && !self.drag.is_staged() {
                    return self.start_pan(button, screen_pt);
                }
                self.input = InputState::Pressing { target };
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, doc: &MapDoc, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.drag.is_staged() {
            let world = self.camera.to_world(screen_pt);
            self.step_drag(DragEvent::Move { world, bounds: doc.bounds() });
            actions.push(Action::RenderNeeded);
        }
        if let InputState::Panning { origin_screen, last_screen, moved, .. } = &mut self.input {
            if screen_pt.is_finite() {
                self.camera = self.camera.pan(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                *moved |= screen_pt.distance(*origin_screen) > CLICK_SLOP_PX;
                if actions.is_empty() {
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    pub fn on_pointer_up(&mut self, doc: &MapDoc, screen_pt: Point, button: Button) -> Vec<Action> {
        let world = self.camera.to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Panning { button: Button::Primary, moved: false, .. } if button == Button::Primary => {
                let mut actions = vec![Action::SetCursor(cursor_for(self.ui.tool).into())];
                actions.extend(self.on_click(doc, ClickTarget::Background, world));
                actions
            }
            InputState::Panning { .. } => vec![Action::SetCursor(cursor_for(self.ui.tool).into())],
            InputState::Pressing { target } if button == Button::Primary => self.on_click(doc, target, world),
            InputState::Pressing { .. } | InputState::Idle => Vec::new(),
        }
    }

    /// The pointer left the canvas: any staged relocation is cancelled.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        if !self.drag.is_staged() {
            return Vec::new();
        }
        self.step_drag(DragEvent::Cancel);
        vec![Action::SetCursor(cursor_for(self.ui.tool).into()), Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let name = key.as_str();
        if modifiers.command() {
            return if name.eq_ignore_ascii_case("z") {
                vec![if modifiers.shift { Action::Redo } else { Action::Undo }]
            } else if name.eq_ignore_ascii_case("y") {
                vec![Action::Redo]
            } else {
                Vec::new()
            };
        }
        match name {
            "Escape" => {
                self.input = InputState::Idle;
                self.step_drag(DragEvent::Cancel);
                self.step_road(RoadEvent::Reset);
                vec![Action::SetCursor(cursor_for(self.ui.tool).into()), Action::RenderNeeded]
            }
            "Delete" | "Backspace" => match self.ui.selection {
                Some(Selection::Pin(id)) => vec![Action::DeletePin { id }],
                _ => Vec::new(),
            },
            _ => match Tool::from_hotkey(name) {
                Some(tool) if !modifiers.alt => {
                    self.set_tool(tool);
                    vec![Action::SetCursor(cursor_for(tool).into()), Action::RenderNeeded]
                }
                _ => Vec::new(),
            },
        }
    }

    #[allow(clippy::unused_self)]
    pub fn on_key_up(&mut self, _key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        Vec::new()
    }

    // --- Internals ---

    fn start_pan(&mut self, button: Button, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { button, origin_screen: screen_pt, last_screen: screen_pt, moved: false };
        vec![Action::SetCursor("grabbing".into())]
    }

    fn click_target(&self, doc: &MapDoc, world: Point) -> ClickTarget {
        let radius = self.config.pin_hit_radius_px;
        if let Some(shadow) = self.drag.shadow_position() {
            if near(world, shadow, &self.camera, radius) {
                return ClickTarget::Shadow;
            }
        }
        match hit_test(world, doc, &self.camera, radius) {
            Some(Hit::Pin(id)) => ClickTarget::Pin(id),
            Some(Hit::Road(id)) => ClickTarget::Road(id),
            None => ClickTarget::Background,
        }
    }

    fn on_click(&mut self, doc: &MapDoc, target: ClickTarget, world: Point) -> Vec<Action> {
        if self.drag.is_staged() && matches!(target, ClickTarget::Background | ClickTarget::Shadow) {
            let mut actions = vec![Action::SetCursor(cursor_for(self.ui.tool).into()), Action::RenderNeeded];
            self.resync_drag(doc);
            if let Some(DragEffect::Commit { pin_id, from, to }) = self.step_drag(DragEvent::Commit) {
                actions.push(Action::MovePin { id: pin_id, from, to });
            }
            return actions;
        }

        match (self.ui.tool, target) {
            (Tool::PlacePin, ClickTarget::Background) => {
                match build_pin(world, doc, &self.config, self.ui.place_kind) {
                    Ok(pin) => vec![Action::PlacePin(pin)],
                    Err(e) => {
                        debug!(error = %e, "placement aborted");
                        Vec::new()
                    }
                }
            }
            (Tool::Road, ClickTarget::Pin(id)) => match self.step_road(RoadEvent::PinClicked(id)) {
                Some(RoadEffect::SelectSource(from)) => {
                    self.ui.selection = Some(Selection::Pin(from));
                    vec![Action::RenderNeeded]
                }
                Some(RoadEffect::Create { from, to }) => match road_between(doc, from, to, RoadStyle::default()) {
                    Ok(road) => vec![Action::CreateRoad(road), Action::RenderNeeded],
                    Err(e) => {
                        debug!(error = %e, "road aborted");
                        vec![Action::RenderNeeded]
                    }
                },
                None => vec![Action::RenderNeeded],
            },
            (Tool::Road, _) => Vec::new(),
            (_, ClickTarget::Pin(id)) => self.select(Some(Selection::Pin(id))),
            (_, ClickTarget::Road(id)) => self.select(Some(Selection::Road(id))),
            (_, ClickTarget::Background | ClickTarget::Shadow) => self.select(None),
        }
    }

    fn select(&mut self, selection: Option<Selection>) -> Vec<Action> {
        if self.ui.selection == selection {
            return Vec::new();
        }
        self.ui.selection = selection;
        vec![Action::RenderNeeded]
    }

    fn resync_drag(&mut self, doc: &MapDoc) {
        if let Some(origin) = self.drag.pin_id().and_then(|id| doc.pin(&id)).map(Pin::position) {
            self.step_drag(DragEvent::Resync { origin });
        }
    }

    fn step_drag(&mut self, event: DragEvent) -> Option<DragEffect> {
        let (next, effect) = relocate::step(self.drag, event);
        if next != self.drag {
            debug!(?event, from = ?self.drag, to = ?next, "relocation gesture");
        }
        self.drag = next;
        effect
    }

    fn step_road(&mut self, event: RoadEvent) -> Option<RoadEffect> {
        let (next, effect) = connect::step(self.road, event);
        if next != self.road {
            debug!(?event, from = ?self.road, to = ?next, "road gesture");
        }
        self.road = next;
        effect
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// The editing session: gesture state, the store-backed document, and the undo history.
pub struct Editor {
    pub core: EngineCore,
    workspace: Workspace,
    history: History<Workspace>,
}

impl Editor {
    #[must_use]
    pub fn new(store: Arc<dyn MapStore>, meta: MapMeta, config: EditorConfig) -> Self {
        let history = History::new(config.history_size);
        Self { core: EngineCore::new(config), workspace: Workspace::new(store, meta), history }
    }

    /// Replace the document with a snapshot. History and gestures start over.
    pub fn load(&mut self, meta: MapMeta, pins: Vec<Pin>, roads: Vec<Road>) {
        self.workspace.doc.load_snapshot(meta, pins, roads);
        self.history.clear();
        self.core.drag = DragGesture::Idle;
        self.core.road = RoadDraw::Idle;
        self.core.input = InputState::Idle;
        self.core.ui.selection = None;
    }

    // --- Queries ---

    #[must_use]
    pub fn doc(&self) -> &MapDoc {
        &self.workspace.doc
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.camera
    }

    #[must_use]
    pub fn pins(&self) -> Vec<&Pin> {
        self.workspace.doc.sorted_pins()
    }

    #[must_use]
    pub fn roads(&self) -> Vec<&Road> {
        self.workspace.doc.sorted_roads()
    }

    #[must_use]
    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.workspace.doc.pin(id)
    }

    /// Current relocation gesture, for shadow rendering.
    #[must_use]
    pub fn drag(&self) -> DragGesture {
        self.core.drag
    }

    /// Current road-drawing state, for in-progress road feedback.
    #[must_use]
    pub fn road_draw(&self) -> RoadDraw {
        self.core.road
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.core.ui.tool
    }

    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.core.ui.selection
    }

    #[must_use]
    pub fn history(&self) -> &History<Workspace> {
        &self.history
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn MapStore> {
        &self.workspace.store
    }

    // --- Events ---

    pub async fn wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let actions = self.core.on_wheel(screen_pt, delta);
        self.dispatch(actions).await
    }

    pub async fn pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let actions = self.core.on_pointer_down(&self.workspace.doc, screen_pt, button);
        self.dispatch(actions).await
    }

    pub async fn pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_move(&self.workspace.doc, screen_pt);
        self.dispatch(actions).await
    }

    pub async fn pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let actions = self.core.on_pointer_up(&self.workspace.doc, screen_pt, button);
        self.dispatch(actions).await
    }

    /// Press and release at the same point.
    pub async fn click(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let mut actions = self.pointer_down(screen_pt, button).await;
        actions.extend(self.pointer_up(screen_pt, button).await);
        actions
    }

    pub fn pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub async fn key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.dispatch(actions).await
    }

    pub fn key_up(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool);
        vec![Action::SetCursor(cursor_for(tool).into()), Action::RenderNeeded]
    }

    pub fn fit_to_map(&mut self, viewport_size: Size) -> Vec<Action> {
        self.core.set_viewport_size(viewport_size);
        self.core.fit_to_map(&self.workspace.doc);
        vec![Action::RenderNeeded]
    }

    /// Execute effectful actions and return the ones meant for the host.
    ///
    /// A failed edit becomes a `Notify`; the session always continues.
    pub async fn dispatch(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            let outcome = match action {
                Action::PlacePin(pin) => self.place_pin(pin).await.map(|_| ()),
                Action::MovePin { id, from, to } => self.commit_move(id, from, to).await.map(|_| ()),
                Action::DeletePin { id } => self.delete_pin(id).await.map(|_| ()),
                Action::CreateRoad(road) => self.create_road(road).await.map(|_| ()),
                Action::Undo => self.undo().await.map(|_| ()),
                Action::Redo => self.redo().await.map(|_| ()),
                host @ (Action::RenderNeeded | Action::SetCursor(_) | Action::Notify { .. }) => {
                    if host != Action::RenderNeeded || !out.contains(&Action::RenderNeeded) {
                        out.push(host);
                    }
                    continue;
                }
            };
            match outcome {
                Ok(()) => {
                    if !out.contains(&Action::RenderNeeded) {
                        out.push(Action::RenderNeeded);
                    }
                }
                Err(e) => {
                    warn!(code = e.error_code(), error = %e, "edit failed");
                    out.push(Action::Notify { code: e.error_code(), message: e.to_string() });
                }
            }
        }
        out
    }

    // --- Edits ---

    /// Persist a new pin, record it, select it, and return to the select tool.
    ///
    /// # Errors
    ///
    /// Returns the store's error; nothing is recorded and the selection is unchanged.
    pub async fn place_pin(&mut self, pin: Pin) -> Result<Pin, EditorError> {
        if !pin.position().within(self.workspace.doc.bounds()) {
            return Err(EditorError::Validation(format!("({}, {}) is outside the map", pin.x, pin.y)));
        }
        let placed = self.workspace.create_pin(pin).await?;
        self.history.push(commands::place_pin(placed.clone()));
        self.core.ui.selection = Some(Selection::Pin(placed.id));
        self.core.set_tool(Tool::Select);
        info!(pin_id = %placed.id, name = %placed.display_name, "pin placed");
        Ok(placed)
    }

    /// Move a pin from `from` to `to` and record the move.
    ///
    /// # Errors
    ///
    /// Returns the store's error after the pin has been put back at `from`.
    pub async fn commit_move(&mut self, id: PinId, from: Point, to: Point) -> Result<Pin, EditorError> {
        let name = self.workspace.doc.pin(&id).map(|p| p.display_name.clone()).ok_or(PersistenceError::NotFound(id))?;
        let moved = self.workspace.move_pin(id, from, to).await?;
        self.history.push(commands::move_pin(&name, id, from, to));
        Ok(moved)
    }

    /// Delete a pin that no road references, and record the deletion.
    ///
    /// # Errors
    ///
    /// Returns `PinInUse` without calling the store while roads still reference
    /// the pin, otherwise the store's error.
    pub async fn delete_pin(&mut self, id: PinId) -> Result<Pin, EditorError> {
        let removed = self.workspace.delete_pin(id).await?;
        self.history.push(commands::delete_pin(removed.clone()));
        self.core.reconcile(&self.workspace.doc);
        Ok(removed)
    }

    /// Delete the selected pin, if a pin is selected.
    ///
    /// # Errors
    ///
    /// See [`Editor::delete_pin`].
    pub async fn delete_selected(&mut self) -> Result<Option<Pin>, EditorError> {
        match self.core.ui.selection {
            Some(Selection::Pin(id)) => self.delete_pin(id).await.map(Some),
            _ => Ok(None),
        }
    }

    /// Persist a new road, record it, and select it.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if either end is missing, otherwise the store's error.
    pub async fn create_road(&mut self, road: Road) -> Result<Road, EditorError> {
        let name_of = |id: &PinId| {
            self.workspace
                .doc
                .pin(id)
                .map(|p| p.display_name.clone())
                .ok_or_else(|| EditorError::Validation(format!("unknown pin {id}")))
        };
        let from_name = name_of(&road.from_pin_id)?;
        let to_name = name_of(&road.to_pin_id)?;
        let created = self.workspace.create_road(road).await?;
        self.history.push(commands::create_road(&from_name, &to_name, created.clone()));
        self.core.ui.selection = Some(Selection::Road(created.id));
        Ok(created)
    }

    /// Update map metadata and record the change.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-positive size, otherwise the store's error.
    pub async fn update_map(&mut self, patch: MapPatch) -> Result<MapMeta, EditorError> {
        let valid = |v: Option<f64>| v.is_none_or(|v| v.is_finite() && v > 0.0);
        if !valid(patch.width) || !valid(patch.height) {
            return Err(EditorError::Validation("map size must be positive".into()));
        }
        let before = patch.inverse_for(self.workspace.doc.meta());
        let meta = self.workspace.update_map(patch.clone()).await?;
        self.history.push(commands::update_map(before, patch));
        Ok(meta)
    }

    // --- History ---

    /// Undo the most recent command. `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns `ReplayFailed` when the store refuses; the cursor does not move.
    pub async fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(replay) = self.history.begin_undo() else {
            return Ok(false);
        };
        self.replay(replay).await
    }

    /// Redo the next command. `Ok(false)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns `ReplayFailed` when the store refuses; the cursor does not move.
    pub async fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(replay) = self.history.begin_redo() else {
            return Ok(false);
        };
        self.replay(replay).await
    }

    async fn replay(&mut self, replay: Replay<Workspace>) -> Result<bool, EditorError> {
        let description = replay.command().description().to_string();
        let outcome = replay.run(&mut self.workspace).await;
        self.history.finish(replay, outcome.is_ok());
        self.core.reconcile(&self.workspace.doc);
        outcome.map(|()| true).map_err(|source| EditorError::ReplayFailed { description, source: Box::new(source) })
    }

    // --- Remote notifications ---

    /// Apply a pin created or changed elsewhere. History is not touched.
    pub fn apply_remote_pin(&mut self, pin: Pin) {
        self.workspace.doc.insert_pin(pin);
        self.core.reconcile(&self.workspace.doc);
    }

    /// Apply a road created or changed elsewhere. History is not touched.
    pub fn apply_remote_road(&mut self, road: Road) {
        self.workspace.doc.insert_road(road);
    }

    pub fn apply_remote_pin_deleted(&mut self, id: &PinId) {
        self.workspace.doc.remove_pin(id);
        self.core.reconcile(&self.workspace.doc);
    }

    pub fn apply_remote_road_deleted(&mut self, id: &RoadId) {
        self.workspace.doc.remove_road(id);
        self.core.reconcile(&self.workspace.doc);
    }
}
