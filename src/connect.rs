//! Two-click road authoring.
//!
//! With the road tool active, the first pin clicked becomes the source and the
//! second, distinct pin completes the road. Clicking the source again, pressing
//! Escape, or leaving the road tool returns to idle without creating anything.
//! The machine drops back to idle as soon as the road is requested, before the
//! store answers, so a double click cannot request the same road twice.

#[cfg(test)]
#[path = "connect_test.rs"]
mod connect_test;

use uuid::Uuid;

use crate::doc::{MapDoc, PinId, Road, RoadStyle};
use crate::error::EditorError;

/// Road-drawing state while the road tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoadDraw {
    #[default]
    Idle,
    /// A source pin has been chosen; the next distinct pin completes the road.
    Sourced { from: PinId },
}

impl RoadDraw {
    #[must_use]
    pub fn from_pin_id(&self) -> Option<PinId> {
        match self {
            Self::Sourced { from } => Some(*from),
            Self::Idle => None,
        }
    }

    /// Whether an in-progress road should be drawn.
    #[must_use]
    pub fn drawing(&self) -> bool {
        matches!(self, Self::Sourced { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadEvent {
    /// A pin was clicked with the road tool active.
    PinClicked(PinId),
    /// Escape, or the active tool changed away from the road tool.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadEffect {
    /// Highlight the chosen source pin.
    SelectSource(PinId),
    /// Persist a road between the two pins.
    Create { from: PinId, to: PinId },
}

/// Advance the road-drawing machine by one event.
#[must_use]
pub fn step(state: RoadDraw, event: RoadEvent) -> (RoadDraw, Option<RoadEffect>) {
    match (state, event) {
        (RoadDraw::Idle, RoadEvent::PinClicked(pin)) => {
            (RoadDraw::Sourced { from: pin }, Some(RoadEffect::SelectSource(pin)))
        }
        (RoadDraw::Sourced { from }, RoadEvent::PinClicked(to)) if from != to => {
            (RoadDraw::Idle, Some(RoadEffect::Create { from, to }))
        }
        (RoadDraw::Sourced { .. }, RoadEvent::PinClicked(_)) | (_, RoadEvent::Reset) => (RoadDraw::Idle, None),
    }
}

/// Build the road payload between two pins: a straight path between their
/// current positions.
///
/// # Errors
///
/// Returns `Validation` if the ends are the same pin or either pin is missing.
pub fn road_between(doc: &MapDoc, from: PinId, to: PinId, style: RoadStyle) -> Result<Road, EditorError> {
    if from == to {
        return Err(EditorError::Validation("a road needs two different pins".into()));
    }
    let start = doc.pin(&from).ok_or_else(|| EditorError::Validation(format!("unknown pin {from}")))?;
    let end = doc.pin(&to).ok_or_else(|| EditorError::Validation(format!("unknown pin {to}")))?;
    Ok(Road {
        id: Uuid::new_v4(),
        from_pin_id: from,
        to_pin_id: to,
        path_points: vec![start.position(), end.position()],
        style,
    })
}
