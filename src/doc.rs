//! Document model: pins, roads, map metadata, and the in-memory store.
//!
//! This module defines what is authored on the map (`Pin`, `Road`, `MapMeta`),
//! sparse-update types for incremental edits (`PinPatch`, `MapPatch`), and the
//! runtime store that owns all live entities (`MapDoc`).
//!
//! Data flows into this layer from the persistence collaborator (snapshots and
//! confirmed mutations) and from remote notifications. The renderer reads from
//! `MapDoc` via `sorted_pins` / `sorted_roads`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Size};

/// Unique identifier for a pin.
pub type PinId = Uuid;

/// Unique identifier for a road.
pub type RoadId = Uuid;

/// What a pin stands for on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    /// A large named area.
    Region,
    /// A place inside a region.
    #[default]
    Location,
    /// A single cell inside a location.
    Cell,
    /// Anything else the world needs marked.
    Other,
}

/// A point marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub kind: PinKind,
    /// Map-space x, within `[0, map width]`.
    pub x: f64,
    /// Map-space y, within `[0, map height]`.
    pub y: f64,
    pub display_name: String,
    /// CSS color string.
    pub color: String,
    /// Icon edge length in map units.
    pub icon_size: f64,
    /// The region/location/cell record this pin links to, if any.
    pub linked_entity_id: Option<Uuid>,
}

impl Pin {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Sparse update for a pin. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PinKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<f64>,
}

impl PinPatch {
    /// A patch that moves a pin to `to`.
    #[must_use]
    pub fn position(to: Point) -> Self {
        Self { x: Some(to.x), y: Some(to.y), ..Self::default() }
    }

    /// The patch that restores `pin`'s current values for every field this patch touches.
    #[must_use]
    pub fn inverse_for(&self, pin: &Pin) -> Self {
        Self {
            x: self.x.map(|_| pin.x),
            y: self.y.map(|_| pin.y),
            kind: self.kind.map(|_| pin.kind),
            display_name: self.display_name.as_ref().map(|_| pin.display_name.clone()),
            color: self.color.as_ref().map(|_| pin.color.clone()),
            icon_size: self.icon_size.map(|_| pin.icon_size),
        }
    }

    /// Apply the present fields onto `pin`.
    pub fn apply_to(&self, pin: &mut Pin) {
        if let Some(x) = self.x {
            pin.x = x;
        }
        if let Some(y) = self.y {
            pin.y = y;
        }
        if let Some(kind) = self.kind {
            pin.kind = kind;
        }
        if let Some(ref name) = self.display_name {
            pin.display_name.clone_from(name);
        }
        if let Some(ref color) = self.color {
            pin.color.clone_from(color);
        }
        if let Some(size) = self.icon_size {
            pin.icon_size = size;
        }
    }
}

/// Visual style of a road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadStyle {
    /// CSS stroke color.
    pub stroke: String,
    /// Stroke width in map units.
    pub width: f64,
    pub dashed: bool,
}

impl Default for RoadStyle {
    fn default() -> Self {
        Self { stroke: "#8B6B4A".into(), width: 3.0, dashed: false }
    }
}

/// A connection between two pins.
///
/// `from_pin_id` and `to_pin_id` always differ and reference existing pins when
/// the road is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub id: RoadId,
    pub from_pin_id: PinId,
    pub to_pin_id: PinId,
    /// Polyline in map space; a freshly authored road is the straight segment between its pins.
    pub path_points: Vec<Point>,
    #[serde(default)]
    pub style: RoadStyle,
}

impl Road {
    /// Whether either end of the road is `pin`.
    #[must_use]
    pub fn touches(&self, pin: &PinId) -> bool {
        self.from_pin_id == *pin || self.to_pin_id == *pin
    }
}

/// Map-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMeta {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl MapMeta {
    #[must_use]
    pub fn bounds(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for MapMeta {
    fn default() -> Self {
        Self { name: "Untitled Map".into(), width: 1000.0, height: 1000.0 }
    }
}

/// Sparse update for map metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl MapPatch {
    /// The patch that restores `meta`'s current values for every field this patch touches.
    #[must_use]
    pub fn inverse_for(&self, meta: &MapMeta) -> Self {
        Self {
            name: self.name.as_ref().map(|_| meta.name.clone()),
            width: self.width.map(|_| meta.width),
            height: self.height.map(|_| meta.height),
        }
    }

    pub fn apply_to(&self, meta: &mut MapMeta) {
        if let Some(ref name) = self.name {
            meta.name.clone_from(name);
        }
        if let Some(w) = self.width {
            meta.width = w;
        }
        if let Some(h) = self.height {
            meta.height = h;
        }
    }
}

/// In-memory store of the map being edited.
#[derive(Debug, Default)]
pub struct MapDoc {
    meta: MapMeta,
    pins: HashMap<PinId, Pin>,
    roads: HashMap<RoadId, Road>,
}

impl MapDoc {
    /// Create an empty document for a map.
    #[must_use]
    pub fn new(meta: MapMeta) -> Self {
        Self { meta, pins: HashMap::new(), roads: HashMap::new() }
    }

    /// Replace everything with a full snapshot.
    pub fn load_snapshot(&mut self, meta: MapMeta, pins: Vec<Pin>, roads: Vec<Road>) {
        self.meta = meta;
        self.pins = pins.into_iter().map(|p| (p.id, p)).collect();
        self.roads = roads.into_iter().map(|r| (r.id, r)).collect();
    }

    #[must_use]
    pub fn meta(&self) -> &MapMeta {
        &self.meta
    }

    /// The authorable area: `[0, width] x [0, height]`.
    #[must_use]
    pub fn bounds(&self) -> Size {
        self.meta.bounds()
    }

    pub fn set_meta(&mut self, meta: MapMeta) {
        self.meta = meta;
    }

    // --- Pins ---

    /// Insert or replace a pin.
    pub fn insert_pin(&mut self, pin: Pin) {
        self.pins.insert(pin.id, pin);
    }

    pub fn remove_pin(&mut self, id: &PinId) -> Option<Pin> {
        self.pins.remove(id)
    }

    #[must_use]
    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    /// Apply a partial update to an existing pin. Returns false if the pin doesn't exist.
    pub fn patch_pin(&mut self, id: &PinId, patch: &PinPatch) -> bool {
        let Some(pin) = self.pins.get_mut(id) else {
            return false;
        };
        patch.apply_to(pin);
        true
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    /// All pins sorted by `(display_name, id)` for stable draw and list order.
    #[must_use]
    pub fn sorted_pins(&self) -> Vec<&Pin> {
        let mut pins: Vec<&Pin> = self.pins.values().collect();
        pins.sort_by(|a, b| a.display_name.cmp(&b.display_name).then_with(|| a.id.cmp(&b.id)));
        pins
    }

    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    // --- Roads ---

    pub fn insert_road(&mut self, road: Road) {
        self.roads.insert(road.id, road);
    }

    pub fn remove_road(&mut self, id: &RoadId) -> Option<Road> {
        self.roads.remove(id)
    }

    #[must_use]
    pub fn road(&self, id: &RoadId) -> Option<&Road> {
        self.roads.get(id)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// All roads sorted by id.
    #[must_use]
    pub fn sorted_roads(&self) -> Vec<&Road> {
        let mut roads: Vec<&Road> = self.roads.values().collect();
        roads.sort_by_key(|r| r.id);
        roads
    }

    /// Ids of roads with an end at `pin`.
    #[must_use]
    pub fn roads_touching(&self, pin: &PinId) -> Vec<RoadId> {
        let mut ids: Vec<RoadId> = self.roads.values().filter(|r| r.touches(pin)).map(|r| r.id).collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty() && self.roads.is_empty()
    }
}
