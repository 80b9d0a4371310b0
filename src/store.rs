//! Persistence collaborator: the async API the editor mutates the map through.
//!
//! DESIGN
//! ======
//! The editor never assumes a transport. Hosts implement [`MapStore`] over
//! REST, a websocket, or anything else and hand it to the editor as an
//! `Arc<dyn MapStore>`. Every call returns the persisted entity (the server's
//! view wins) or a [`PersistenceError`].
//!
//! [`MemoryStore`] is a complete in-process implementation. It enforces the
//! same rules a server would (ids unique, pins inside the map, road ends
//! distinct and existing) and can be scripted to fail specific calls, which is
//! what the editor's tests and the replay CLI run against.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::doc::{MapMeta, MapPatch, Pin, PinId, PinPatch, Road, RoadId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("not found: {0}")]
    NotFound(Uuid),
    #[error("already exists: {0}")]
    Conflict(Uuid),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("store unavailable")]
    Unavailable,
}

impl PersistenceError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Rejected(_) => "E_REJECTED",
            Self::Unavailable => "E_UNAVAILABLE",
        }
    }
}

/// Logical persistence operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CreatePin,
    UpdatePin,
    DeletePin,
    CreateRoad,
    DeleteRoad,
    UpdateMap,
}

/// The persistence API consumed by the editor.
///
/// Ids are minted by the client and carried in the created entity, so a
/// recreated pin or road keeps its identity across undo/redo.
#[async_trait]
pub trait MapStore: Send + Sync {
    async fn create_pin(&self, pin: &Pin) -> Result<Pin, PersistenceError>;
    async fn update_pin(&self, id: PinId, patch: &PinPatch) -> Result<Pin, PersistenceError>;
    async fn delete_pin(&self, id: PinId) -> Result<(), PersistenceError>;
    async fn create_road(&self, road: &Road) -> Result<Road, PersistenceError>;
    async fn delete_road(&self, id: RoadId) -> Result<(), PersistenceError>;
    async fn update_map(&self, patch: &MapPatch) -> Result<MapMeta, PersistenceError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Default)]
struct MemoryState {
    meta: MapMeta,
    pins: HashMap<PinId, Pin>,
    roads: HashMap<RoadId, Road>,
    failures: VecDeque<(StoreOp, PersistenceError)>,
    calls: Vec<StoreOp>,
}

impl MemoryState {
    /// Record the call and pop a scripted failure for it, if one is queued.
    fn enter(&mut self, op: StoreOp) -> Result<(), PersistenceError> {
        self.calls.push(op);
        match self.failures.iter().position(|(o, _)| *o == op) {
            Some(idx) => match self.failures.remove(idx) {
                Some((_, err)) => Err(err),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }

    fn check_in_bounds(&self, pin: &Pin) -> Result<(), PersistenceError> {
        if pin.position().is_finite() && pin.position().within(self.meta.bounds()) {
            Ok(())
        } else {
            Err(PersistenceError::Rejected(format!(
                "pin {} at ({}, {}) is outside the {}x{} map",
                pin.id, pin.x, pin.y, self.meta.width, self.meta.height
            )))
        }
    }
}

/// In-process [`MapStore`] with scripted failures and a call log.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(meta: MapMeta) -> Self {
        Self { state: Mutex::new(MemoryState { meta, ..MemoryState::default() }) }
    }

    /// Seed pins and roads without going through the checked API.
    pub async fn seed(&self, pins: Vec<Pin>, roads: Vec<Road>) {
        let mut state = self.state.lock().await;
        state.pins.extend(pins.into_iter().map(|p| (p.id, p)));
        state.roads.extend(roads.into_iter().map(|r| (r.id, r)));
    }

    /// Make the next call of `op` fail with `err`.
    pub async fn fail_next(&self, op: StoreOp, err: PersistenceError) {
        self.state.lock().await.failures.push_back((op, err));
    }

    /// Every operation attempted so far, in call order.
    pub async fn calls(&self) -> Vec<StoreOp> {
        self.state.lock().await.calls.clone()
    }

    pub async fn pin(&self, id: PinId) -> Option<Pin> {
        self.state.lock().await.pins.get(&id).cloned()
    }

    pub async fn road(&self, id: RoadId) -> Option<Road> {
        self.state.lock().await.roads.get(&id).cloned()
    }

    pub async fn pin_count(&self) -> usize {
        self.state.lock().await.pins.len()
    }

    pub async fn road_count(&self) -> usize {
        self.state.lock().await.roads.len()
    }

    pub async fn meta(&self) -> MapMeta {
        self.state.lock().await.meta.clone()
    }
}

#[async_trait]
impl MapStore for MemoryStore {
    async fn create_pin(&self, pin: &Pin) -> Result<Pin, PersistenceError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::CreatePin)?;
        if state.pins.contains_key(&pin.id) {
            return Err(PersistenceError::Conflict(pin.id));
        }
        state.check_in_bounds(pin)?;
        state.pins.insert(pin.id, pin.clone());
        Ok(pin.clone())
    }

    async fn update_pin(&self, id: PinId, patch: &PinPatch) -> Result<Pin, PersistenceError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::UpdatePin)?;
        let mut updated = state.pins.get(&id).cloned().ok_or(PersistenceError::NotFound(id))?;
        patch.apply_to(&mut updated);
        state.check_in_bounds(&updated)?;
        state.pins.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_pin(&self, id: PinId) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::DeletePin)?;
        state.pins.remove(&id).map(|_| ()).ok_or(PersistenceError::NotFound(id))
    }

    async fn create_road(&self, road: &Road) -> Result<Road, PersistenceError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::CreateRoad)?;
        if state.roads.contains_key(&road.id) {
            return Err(PersistenceError::Conflict(road.id));
        }
        if road.from_pin_id == road.to_pin_id {
            return Err(PersistenceError::Rejected("road must connect two different pins".into()));
        }
        for end in [road.from_pin_id, road.to_pin_id] {
            if !state.pins.contains_key(&end) {
                return Err(PersistenceError::NotFound(end));
            }
        }
        state.roads.insert(road.id, road.clone());
        Ok(road.clone())
    }

    async fn delete_road(&self, id: RoadId) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::DeleteRoad)?;
        state.roads.remove(&id).map(|_| ()).ok_or(PersistenceError::NotFound(id))
    }

    async fn update_map(&self, patch: &MapPatch) -> Result<MapMeta, PersistenceError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::UpdateMap)?;
        let mut meta = state.meta.clone();
        patch.apply_to(&mut meta);
        if !(meta.width > 0.0 && meta.height > 0.0 && meta.width.is_finite() && meta.height.is_finite()) {
            return Err(PersistenceError::Rejected(format!("invalid map size {}x{}", meta.width, meta.height)));
        }
        state.meta = meta.clone();
        Ok(meta)
    }
}
