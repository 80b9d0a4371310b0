//! Pin placement: turning a background click into a new pin.
//!
//! Placement is one-shot. The engine builds the pin here, the editor persists
//! it, and only a confirmed creation selects the pin and returns to the select
//! tool.

#[cfg(test)]
#[path = "place_test.rs"]
mod place_test;

use uuid::Uuid;

use crate::camera::{Point, Size};
use crate::config::EditorConfig;
use crate::doc::{MapDoc, Pin, PinKind};
use crate::error::EditorError;

/// Next auto-generated name: `prefix` plus one more than the highest existing
/// counter, zero-padded to two digits.
///
/// Only names made of `prefix` followed by nothing but digits count.
#[must_use]
pub fn next_default_name<'a>(names: impl IntoIterator<Item = &'a str>, prefix: &str) -> String {
    let highest = names
        .into_iter()
        .filter_map(|name| name.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .map(|rest| rest.parse::<u64>().unwrap_or(0))
        .max()
        .unwrap_or(0);
    format!("{prefix}{:02}", highest.saturating_add(1))
}

/// Round a map-space click to whole units and check it lies on the map.
///
/// # Errors
///
/// Returns `Validation` if the point is not finite or falls outside `bounds`.
pub fn placement_point(world: Point, bounds: Size) -> Result<Point, EditorError> {
    let rounded = Point::new(world.x.round(), world.y.round());
    if !rounded.is_finite() {
        return Err(EditorError::Validation("placement point is not finite".into()));
    }
    if !rounded.within(bounds) {
        return Err(EditorError::Validation(format!(
            "({}, {}) is outside the {}x{} map",
            rounded.x, rounded.y, bounds.width, bounds.height
        )));
    }
    Ok(rounded)
}

/// Build the pin a placement click at `world` would create.
///
/// # Errors
///
/// Returns `Validation` when the click is off the map.
pub fn build_pin(world: Point, doc: &MapDoc, config: &EditorConfig, kind: PinKind) -> Result<Pin, EditorError> {
    let at = placement_point(world, doc.bounds())?;
    let display_name = next_default_name(doc.pins().map(|p| p.display_name.as_str()), &config.pin_prefix);
    Ok(Pin {
        id: Uuid::new_v4(),
        kind,
        x: at.x,
        y: at.y,
        display_name,
        color: config.pin_color.clone(),
        icon_size: config.pin_icon_size,
        linked_entity_id: None,
    })
}
