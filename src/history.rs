//! Bounded, linear undo/redo history.
//!
//! DESIGN
//! ======
//! Commands are stored oldest-first; `applied` counts how many of them are
//! currently in effect (the cursor is `applied - 1`). Pushing truncates any
//! redo tail, appends, and evicts from the front once `max_size` is exceeded.
//!
//! Undo and redo are asynchronous because commands talk to the store. They run
//! in two phases: [`History::begin_undo`] / [`History::begin_redo`] set the
//! replay guard and hand out a [`Replay`]; [`History::finish`] moves the cursor
//! and releases the guard once the replay's future has resolved. While the
//! guard is set, pushes are ignored (a command's own side effects never land
//! in the history) and further undo/redo requests are rejected, so replays
//! never interleave. [`History::undo`] and [`History::redo`] run both phases.
//! The guard belongs to the [`Replay`]: dropping one that never finished (a
//! timed-out or cancelled undo) releases it without moving the cursor.
//!
//! ```text
//! push A, B, C        [A B C]   applied = 3
//! undo x2             [A B C]   applied = 1   (B, C redoable)
//! push D              [A D]     applied = 2   (redo tail dropped)
//! ```

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::consts::DEFAULT_HISTORY_SIZE;
use crate::error::EditorError;

// =============================================================================
// TYPES
// =============================================================================

/// An operation that can be reverted and re-applied against a target.
#[async_trait]
pub trait Reversible<T: Send + 'static>: Send + Sync {
    async fn undo(&self, target: &mut T) -> Result<(), EditorError>;
    async fn redo(&self, target: &mut T) -> Result<(), EditorError>;
}

/// One recorded user action. Immutable once pushed.
pub struct Command<T: Send + 'static> {
    kind: &'static str,
    description: String,
    timestamp: OffsetDateTime,
    op: Box<dyn Reversible<T>>,
}

impl<T: Send + 'static> Command<T> {
    #[must_use]
    pub fn new(kind: &'static str, description: impl Into<String>, op: impl Reversible<T> + 'static) -> Self {
        Self {
            kind,
            description: description.into(),
            timestamp: OffsetDateTime::now_utc(),
            op: Box::new(op),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

impl<T: Send + 'static> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

/// Value of the guard slot when no replay is in flight.
const IDLE: u64 = 0;

/// Ownership of the history's replay guard.
///
/// The slot holds the id of the replay in flight. A token only releases the
/// slot while it still holds its own id, so a replay superseded by
/// [`History::clear`] cannot release a newer one.
#[derive(Debug)]
struct ReplayToken {
    slot: Arc<AtomicU64>,
    id: u64,
}

impl ReplayToken {
    fn is_current(&self) -> bool {
        self.slot.load(Ordering::Acquire) == self.id
    }

    fn release(&self) -> bool {
        self.slot.compare_exchange(self.id, IDLE, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }
}

impl Drop for ReplayToken {
    fn drop(&mut self) {
        if self.release() {
            debug!(replay = self.id, "replay dropped before finishing; guard released");
        }
    }
}

/// An undo or redo that has been started but not yet finished.
#[derive(Debug)]
pub struct Replay<T: Send + 'static> {
    command: Arc<Command<T>>,
    direction: Direction,
    token: ReplayToken,
}

impl<T: Send + 'static> Replay<T> {
    #[must_use]
    pub fn command(&self) -> &Command<T> {
        &self.command
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Execute the command's undo or redo against `target`.
    ///
    /// # Errors
    ///
    /// Returns whatever the command's operation returns.
    pub async fn run(&self, target: &mut T) -> Result<(), EditorError> {
        match self.direction {
            Direction::Undo => self.command.op.undo(target).await,
            Direction::Redo => self.command.op.redo(target).await,
        }
    }
}

// =============================================================================
// HISTORY
// =============================================================================

pub struct History<T: Send + 'static> {
    entries: VecDeque<Arc<Command<T>>>,
    applied: usize,
    max_size: usize,
    /// Id of the replay in flight, or `IDLE`.
    in_flight: Arc<AtomicU64>,
    last_replay: u64,
}

impl<T: Send + 'static> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("len", &self.entries.len())
            .field("applied", &self.applied)
            .field("max_size", &self.max_size)
            .field("replaying", &self.is_replaying())
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl<T: Send + 'static> History<T> {
    /// Create an empty history holding at most `max_size` commands (at least one).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            applied: 0,
            max_size: max_size.max(1),
            in_flight: Arc::new(AtomicU64::new(IDLE)),
            last_replay: IDLE,
        }
    }

    /// Record a command that has already been executed.
    ///
    /// Returns `false` when the push was ignored because an undo/redo is in flight.
    pub fn push(&mut self, command: Command<T>) -> bool {
        if self.is_replaying() {
            debug!(kind = command.kind, "push ignored during replay");
            return false;
        }
        self.entries.truncate(self.applied);
        self.entries.push_back(Arc::new(command));
        if self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
        self.applied = self.entries.len();
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Index of the most recently applied command, or `None` when nothing is applied.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Whether an undo/redo has begun and not yet finished.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != IDLE
    }

    /// All stored commands, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Command<T>> {
        self.entries.iter().map(Arc::as_ref)
    }

    /// Description of the command the next undo would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.cursor().and_then(|i| self.entries.get(i)).map(|c| c.description())
    }

    /// Description of the command the next redo would re-apply.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.entries.get(self.applied).map(|c| c.description())
    }

    /// Start undoing the current command. `None` if nothing to undo or a replay is in flight.
    pub fn begin_undo(&mut self) -> Option<Replay<T>> {
        if self.is_replaying() || !self.can_undo() {
            return None;
        }
        let command = self.entries.get(self.applied - 1)?.clone();
        Some(self.start(command, Direction::Undo))
    }

    /// Start redoing the next command. `None` if nothing to redo or a replay is in flight.
    pub fn begin_redo(&mut self) -> Option<Replay<T>> {
        if self.is_replaying() || !self.can_redo() {
            return None;
        }
        let command = self.entries.get(self.applied)?.clone();
        Some(self.start(command, Direction::Redo))
    }

    fn start(&mut self, command: Arc<Command<T>>, direction: Direction) -> Replay<T> {
        self.last_replay += 1;
        let id = self.last_replay;
        self.in_flight.store(id, Ordering::Release);
        debug!(kind = command.kind, ?direction, "replay started");
        Replay { command, direction, token: ReplayToken { slot: Arc::clone(&self.in_flight), id } }
    }

    /// Release the replay guard; on success, move the cursor past the replayed command.
    ///
    /// A replay begun before the last [`History::clear`] is discarded.
    pub fn finish(&mut self, replay: Replay<T>, succeeded: bool) {
        if !replay.token.is_current() {
            debug!(kind = replay.command.kind, "stale replay discarded");
            return;
        }
        replay.token.release();
        if !succeeded {
            return;
        }
        match replay.direction {
            Direction::Undo => self.applied -= 1,
            Direction::Redo => self.applied += 1,
        }
        info!(
            kind = replay.command.kind,
            description = %replay.command.description,
            direction = ?replay.direction,
            applied = self.applied,
            "history replayed"
        );
    }

    /// Undo the current command against `target`.
    ///
    /// Returns `Ok(false)` when there is nothing to undo or another replay is in flight.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the cursor does not move.
    pub async fn undo(&mut self, target: &mut T) -> Result<bool, EditorError> {
        let Some(replay) = self.begin_undo() else {
            return Ok(false);
        };
        self.complete(replay, target).await
    }

    /// Redo the next command against `target`.
    ///
    /// Returns `Ok(false)` when there is nothing to redo or another replay is in flight.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the cursor does not move.
    pub async fn redo(&mut self, target: &mut T) -> Result<bool, EditorError> {
        let Some(replay) = self.begin_redo() else {
            return Ok(false);
        };
        self.complete(replay, target).await
    }

    async fn complete(&mut self, replay: Replay<T>, target: &mut T) -> Result<bool, EditorError> {
        let outcome = replay.run(target).await;
        self.finish(replay, outcome.is_ok());
        outcome.map(|()| true)
    }

    /// Drop every command and return to the initial state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
        self.in_flight.store(IDLE, Ordering::Release);
    }
}
