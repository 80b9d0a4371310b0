//! The editor's data layer: the map document plus the store that persists it.
//!
//! Every mutation of pins, roads, or map metadata goes through [`Workspace`].
//! Each method changes the local document optimistically, awaits the store,
//! and rolls the local change back when the store refuses (see [`crate::saga`]).
//! On success the store's returned entity replaces the local copy.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use std::sync::Arc;

use tracing::info;

use crate::camera::Point;
use crate::doc::{MapDoc, MapMeta, MapPatch, Pin, PinId, PinPatch, Road, RoadId};
use crate::error::EditorError;
use crate::saga::{apply_confirm, apply_confirm_compensate};
use crate::store::{MapStore, PersistenceError};

pub struct Workspace {
    pub store: Arc<dyn MapStore>,
    pub doc: MapDoc,
}

impl Workspace {
    #[must_use]
    pub fn new(store: Arc<dyn MapStore>, meta: MapMeta) -> Self {
        Self { store, doc: MapDoc::new(meta) }
    }

    /// Persist a new pin and add it to the document.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the pin is not left in the document.
    pub async fn create_pin(&mut self, pin: Pin) -> Result<Pin, PersistenceError> {
        let id = pin.id;
        let local = pin.clone();
        let persisted = apply_confirm(
            &mut self.doc,
            "create_pin",
            |doc| doc.insert_pin(local),
            self.store.create_pin(&pin),
            |doc| {
                doc.remove_pin(&id);
            },
        )
        .await?;
        self.doc.insert_pin(persisted.clone());
        info!(pin_id = %id, x = persisted.x, y = persisted.y, "pin created");
        Ok(persisted)
    }

    /// Move a pin from `from` to `to`.
    ///
    /// On rejection the local pin goes back to `from` and a compensating
    /// update re-asserts `from` on the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error for the move itself.
    pub async fn move_pin(&mut self, id: PinId, from: Point, to: Point) -> Result<Pin, PersistenceError> {
        let forward = PinPatch::position(to);
        let backward = PinPatch::position(from);
        let persisted = apply_confirm_compensate(
            &mut self.doc,
            "move_pin",
            |doc| {
                doc.patch_pin(&id, &forward);
            },
            self.store.update_pin(id, &forward),
            |doc| {
                doc.patch_pin(&id, &backward);
            },
            self.store.update_pin(id, &backward),
        )
        .await?;
        self.doc.insert_pin(persisted.clone());
        info!(pin_id = %id, x = persisted.x, y = persisted.y, "pin moved");
        Ok(persisted)
    }

    /// Apply an arbitrary partial update to a pin.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the pin is not in the document, otherwise the store's error.
    pub async fn update_pin(&mut self, id: PinId, patch: PinPatch) -> Result<Pin, PersistenceError> {
        let before = self.doc.pin(&id).cloned().ok_or(PersistenceError::NotFound(id))?;
        let inverse = patch.inverse_for(&before);
        let persisted = apply_confirm(
            &mut self.doc,
            "update_pin",
            |doc| {
                doc.patch_pin(&id, &patch);
            },
            self.store.update_pin(id, &patch),
            |doc| {
                doc.patch_pin(&id, &inverse);
            },
        )
        .await?;
        self.doc.insert_pin(persisted.clone());
        Ok(persisted)
    }

    /// Delete a pin that no road references and return the removed copy.
    ///
    /// # Errors
    ///
    /// Returns `PinInUse` without calling the store while roads still reference
    /// the pin, `NotFound` if the pin is not in the document, otherwise the
    /// store's error.
    pub async fn delete_pin(&mut self, id: PinId) -> Result<Pin, EditorError> {
        let roads = self.doc.roads_touching(&id).len();
        if roads > 0 {
            return Err(EditorError::PinInUse { pin: id, roads });
        }
        let removed = self.doc.pin(&id).cloned().ok_or(PersistenceError::NotFound(id))?;
        let restore = removed.clone();
        apply_confirm(
            &mut self.doc,
            "delete_pin",
            |doc| {
                doc.remove_pin(&id);
            },
            self.store.delete_pin(id),
            |doc| doc.insert_pin(restore),
        )
        .await?;
        info!(pin_id = %id, "pin deleted");
        Ok(removed)
    }

    /// Persist a new road and add it to the document.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the road is not left in the document.
    pub async fn create_road(&mut self, road: Road) -> Result<Road, PersistenceError> {
        let id = road.id;
        let local = road.clone();
        let persisted = apply_confirm(
            &mut self.doc,
            "create_road",
            |doc| doc.insert_road(local),
            self.store.create_road(&road),
            |doc| {
                doc.remove_road(&id);
            },
        )
        .await?;
        self.doc.insert_road(persisted.clone());
        info!(road_id = %id, from = %persisted.from_pin_id, to = %persisted.to_pin_id, "road created");
        Ok(persisted)
    }

    /// Delete a road and return the removed copy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the road is not in the document, otherwise the store's error.
    pub async fn delete_road(&mut self, id: RoadId) -> Result<Road, PersistenceError> {
        let removed = self.doc.road(&id).cloned().ok_or(PersistenceError::NotFound(id))?;
        let restore = removed.clone();
        apply_confirm(
            &mut self.doc,
            "delete_road",
            |doc| {
                doc.remove_road(&id);
            },
            self.store.delete_road(id),
            |doc| doc.insert_road(restore),
        )
        .await?;
        info!(road_id = %id, "road deleted");
        Ok(removed)
    }

    /// Update map metadata.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the previous metadata is kept.
    pub async fn update_map(&mut self, patch: MapPatch) -> Result<MapMeta, PersistenceError> {
        let before = self.doc.meta().clone();
        let mut after = before.clone();
        patch.apply_to(&mut after);
        let persisted = apply_confirm(
            &mut self.doc,
            "update_map",
            |doc| doc.set_meta(after),
            self.store.update_map(&patch),
            |doc| doc.set_meta(before),
        )
        .await?;
        self.doc.set_meta(persisted.clone());
        info!(width = persisted.width, height = persisted.height, "map updated");
        Ok(persisted)
    }
}
