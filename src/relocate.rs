//! Shadow-drag relocation of pins.
//!
//! Plain pointer-drag pans the canvas, so moving a pin is a staged gesture:
//! a non-primary press on a pin stages it, a semi-transparent shadow follows
//! the pointer (clamped to the map), and a primary click commits the move.
//! Escape or leaving the canvas cancels without touching the store.
//!
//! ```text
//!            Stage           Move (clamped), Resync
//!   Idle ─────────────▶ Staged ◀───────────────┐
//!    ▲                   │  │                  │
//!    │      Cancel       │  └──────────────────┘
//!    ├───────────────────┤
//!    │      Commit       │
//!    └───────────────────┘  (emits DragEffect::Commit)
//! ```
//!
//! [`step`] is a pure transition function; the engine performs the effects.

#[cfg(test)]
#[path = "relocate_test.rs"]
mod relocate_test;

use crate::camera::{Point, Size};
use crate::doc::PinId;

/// The relocation gesture. `Staged` exists only between stage and commit/cancel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragGesture {
    #[default]
    Idle,
    Staged {
        /// Pin being relocated.
        pin_id: PinId,
        /// The pin's authoritative position, kept current through `Resync`.
        origin: Point,
        /// Where the shadow is drawn and where a commit would move the pin.
        shadow: Point,
    },
}

impl DragGesture {
    #[must_use]
    pub fn pin_id(&self) -> Option<PinId> {
        match self {
            Self::Staged { pin_id, .. } => Some(*pin_id),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub fn shadow_position(&self) -> Option<Point> {
        match self {
            Self::Staged { shadow, .. } => Some(*shadow),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Non-primary press on a pin at `position`.
    Stage { pin_id: PinId, position: Point },
    /// Pointer moved to `world`; the shadow is kept inside `bounds`.
    Move { world: Point, bounds: Size },
    /// The pin's authoritative position changed (undo, redo, remote edit)
    /// while staged. The shadow stays where the user put it.
    Resync { origin: Point },
    /// Primary click on the background or the shadow.
    Commit,
    /// Escape or pointer left the canvas.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    /// Persist the move of `pin_id` from `from` to `to`.
    Commit { pin_id: PinId, from: Point, to: Point },
}

/// Advance the gesture by one event.
///
/// A non-finite pointer position aborts the gesture. Committing a shadow that
/// never left the origin ends the gesture without an effect.
#[must_use]
pub fn step(state: DragGesture, event: DragEvent) -> (DragGesture, Option<DragEffect>) {
    match (state, event) {
        (_, DragEvent::Stage { pin_id, position }) => {
            (DragGesture::Staged { pin_id, origin: position, shadow: position }, None)
        }
        (DragGesture::Staged { pin_id, origin, .. }, DragEvent::Move { world, bounds }) => {
            if world.is_finite() {
                (DragGesture::Staged { pin_id, origin, shadow: world.clamp_to(bounds) }, None)
            } else {
                (DragGesture::Idle, None)
            }
        }
        (DragGesture::Staged { pin_id, shadow, .. }, DragEvent::Resync { origin }) => {
            (DragGesture::Staged { pin_id, origin, shadow }, None)
        }
        (DragGesture::Staged { pin_id, origin, shadow }, DragEvent::Commit) => {
            let effect = (shadow != origin).then_some(DragEffect::Commit { pin_id, from: origin, to: shadow });
            (DragGesture::Idle, effect)
        }
        (DragGesture::Idle, DragEvent::Move { .. } | DragEvent::Resync { .. } | DragEvent::Commit)
        | (_, DragEvent::Cancel) => (DragGesture::Idle, None),
    }
}
