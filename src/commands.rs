//! Reversible commands recorded after each confirmed map mutation.
//!
//! Each command captures exactly the data needed to go both ways, and both
//! directions run through the [`Workspace`] so they persist like any other
//! edit. Ids are preserved across undo/redo, so commands recorded later that
//! reference the same pin keep working.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use async_trait::async_trait;

use crate::camera::Point;
use crate::doc::{MapPatch, Pin, PinId, Road};
use crate::error::EditorError;
use crate::history::{Command, Reversible};
use crate::workspace::Workspace;

pub type MapCommand = Command<Workspace>;

/// A pin was placed; undo deletes it, redo recreates it with the same data.
#[derive(Debug, Clone)]
pub struct PinPlaced {
    pub pin: Pin,
}

#[async_trait]
impl Reversible<Workspace> for PinPlaced {
    async fn undo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.delete_pin(self.pin.id).await?;
        Ok(())
    }

    async fn redo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.create_pin(self.pin.clone()).await?;
        Ok(())
    }
}

/// A pin was relocated from `from` to `to`.
#[derive(Debug, Clone, Copy)]
pub struct PinMoved {
    pub id: PinId,
    pub from: Point,
    pub to: Point,
}

#[async_trait]
impl Reversible<Workspace> for PinMoved {
    async fn undo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.move_pin(self.id, self.to, self.from).await?;
        Ok(())
    }

    async fn redo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.move_pin(self.id, self.from, self.to).await?;
        Ok(())
    }
}

/// A pin was deleted; undo recreates it.
#[derive(Debug, Clone)]
pub struct PinDeleted {
    pub pin: Pin,
}

#[async_trait]
impl Reversible<Workspace> for PinDeleted {
    async fn undo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.create_pin(self.pin.clone()).await?;
        Ok(())
    }

    async fn redo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.delete_pin(self.pin.id).await?;
        Ok(())
    }
}

/// A road was created; undo deletes it.
#[derive(Debug, Clone)]
pub struct RoadCreated {
    pub road: Road,
}

#[async_trait]
impl Reversible<Workspace> for RoadCreated {
    async fn undo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.delete_road(self.road.id).await?;
        Ok(())
    }

    async fn redo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.create_road(self.road.clone()).await?;
        Ok(())
    }
}

/// Map metadata changed; `before` restores every field `after` touched.
#[derive(Debug, Clone)]
pub struct MapUpdated {
    pub before: MapPatch,
    pub after: MapPatch,
}

#[async_trait]
impl Reversible<Workspace> for MapUpdated {
    async fn undo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.update_map(self.before.clone()).await?;
        Ok(())
    }

    async fn redo(&self, ws: &mut Workspace) -> Result<(), EditorError> {
        ws.update_map(self.after.clone()).await?;
        Ok(())
    }
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

#[must_use]
pub fn place_pin(pin: Pin) -> MapCommand {
    let description = format!("Place {}", pin.display_name);
    Command::new("place_pin", description, PinPlaced { pin })
}

#[must_use]
pub fn move_pin(name: &str, id: PinId, from: Point, to: Point) -> MapCommand {
    let description = format!("Move {name} to ({:.0}, {:.0})", to.x, to.y);
    Command::new("move_pin", description, PinMoved { id, from, to })
}

#[must_use]
pub fn delete_pin(pin: Pin) -> MapCommand {
    let description = format!("Delete {}", pin.display_name);
    Command::new("delete_pin", description, PinDeleted { pin })
}

#[must_use]
pub fn create_road(from_name: &str, to_name: &str, road: Road) -> MapCommand {
    let description = format!("Connect {from_name} to {to_name}");
    Command::new("create_road", description, RoadCreated { road })
}

#[must_use]
pub fn update_map(before: MapPatch, after: MapPatch) -> MapCommand {
    Command::new("update_map", "Edit map settings", MapUpdated { before, after })
}
