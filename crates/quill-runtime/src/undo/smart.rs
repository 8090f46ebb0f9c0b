#![forbid(unsafe_code)]

//! Heuristic batching.
//!
//! [`SmartBatchingManager`] extends the fixed window with boundaries drawn
//! from what the edit is and where it happens. Each submission is tagged
//! with an [`EditKind`] and a cursor position; before applying it, the open
//! batch is sealed when the first of these matches:
//!
//! | # | Condition                                   | Why it breaks            |
//! |---|---------------------------------------------|--------------------------|
//! | 1 | kind differs from the previous edit         | typing vs. deleting      |
//! | 2 | kind is `Format` or `Markdown`              | style edits stand alone  |
//! | 3 | `Insert` more than 2 away from the previous | caret moved              |
//! | 4 | `Delete` more than `max_position_jump` away | caret moved              |
//!
//! An empty batch never seals. After a command joins, the size cap and the
//! debounce of [`BatchingManager`](super::BatchingManager) apply unchanged.
//!
//! The insert threshold is fixed while the delete one is configurable:
//! backspacing walks the caret leftwards by one per keystroke, and a
//! forward-delete run stays put, so deletes tolerate a wider window.

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

use super::batching::BatchCore;
use super::command::{Command, CommandError, CommandResult};
use super::manager::{CommandManager, HistoryEntry};
use crate::clock::{Clock, SystemClock};
use crate::config::SmartBatchingConfig;
use crate::reactive::ReadSignal;

/// Largest caret distance between consecutive inserts in one batch.
pub const INSERT_POSITION_JUMP: usize = 2;

/// What kind of edit a command performs, for boundary decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Delete,
    Format,
    Markdown,
    /// Never breaks on position.
    Other,
}

impl EditKind {
    /// Kinds that always start a batch of their own.
    #[must_use]
    pub const fn always_seals(self) -> bool {
        matches!(self, Self::Format | Self::Markdown)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Format => "format",
            Self::Markdown => "markdown",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the policy remembers about the open batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchState {
    pub last_kind: Option<EditKind>,
    pub last_position: Option<usize>,
    /// Monotonic time of the last change, on the manager's clock.
    pub last_timestamp: Duration,
}

impl BatchState {
    #[must_use]
    pub const fn empty(now: Duration) -> Self {
        Self {
            last_kind: None,
            last_position: None,
            last_timestamp: now,
        }
    }
}

/// Why the policy sealed a batch before admitting a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    KindChanged,
    StyleEdit,
    InsertJump,
    DeleteJump,
}

impl Boundary {
    const fn as_str(self) -> &'static str {
        match self {
            Self::KindChanged => "edit kind changed",
            Self::StyleEdit => "style edit",
            Self::InsertJump => "insert position jump",
            Self::DeleteJump => "delete position jump",
        }
    }
}

/// Batching driven by edit kind and caret continuity.
///
/// # Example
///
/// ```
/// use quill_runtime::undo::{EditKind, FnCommand, SmartBatchingManager};
///
/// let mut mgr = SmartBatchingManager::new();
/// let noop = |d: &str| Box::new(FnCommand::infallible(d, || {}, || {}));
///
/// mgr.execute_command(noop("h"), EditKind::Insert, 0).unwrap();
/// mgr.execute_command(noop("i"), EditKind::Insert, 1).unwrap();
/// mgr.execute_command(noop("x"), EditKind::Delete, 1).unwrap();
/// mgr.finalize_batch();
///
/// let history = mgr.history();
/// assert_eq!(history[0].description, "Batch: h, i");
/// assert_eq!(history[1].description, "Batch: x");
/// ```
pub struct SmartBatchingManager {
    core: BatchCore,
    config: SmartBatchingConfig,
    state: BatchState,
}

impl fmt::Debug for SmartBatchingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartBatchingManager")
            .field("core", &self.core)
            .field("max_position_jump", &self.config.max_position_jump)
            .field("state", &self.state)
            .finish()
    }
}

impl Default for SmartBatchingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartBatchingManager {
    /// Default policy on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SmartBatchingConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SmartBatchingConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }

    /// Use `clock` for deadlines and timestamps instead of the system clock.
    #[must_use]
    pub fn with_clock(config: SmartBatchingConfig, clock: impl Clock + 'static) -> Self {
        let core = BatchCore::new(config.window(), Box::new(clock));
        let state = BatchState::empty(core.now());
        Self {
            core,
            config,
            state,
        }
    }

    /// Apply `cmd`, sealing the open batch first if the edit does not
    /// continue it.
    ///
    /// `position` is the caret offset the edit happens at. It is ignored for
    /// [`EditKind::Other`] and for the always-sealing kinds.
    pub fn execute_command(
        &mut self,
        cmd: Box<dyn Command>,
        kind: EditKind,
        position: usize,
    ) -> CommandResult {
        self.deliver_due();

        if self.core.pending_len() > 0 {
            if let Some(boundary) = self.boundary(kind, position) {
                debug!(
                    reason = boundary.as_str(),
                    %kind,
                    position,
                    last_position = ?self.state.last_position,
                    "batch boundary"
                );
                self.seal(boundary.as_str());
            }
        }

        let result = self.core.execute_into(cmd);
        if result.is_ok() {
            self.state = BatchState {
                last_kind: Some(kind),
                last_position: Some(position),
                last_timestamp: self.core.now(),
            };
            trace!(%kind, position, pending = self.core.pending_len(), "edit batched");
            if self.core.after_push() {
                self.reset_state();
            }
        }
        self.core.publish();
        result
    }

    /// First rule that breaks the open batch for an edit of `kind` at
    /// `position`, if any.
    fn boundary(&self, kind: EditKind, position: usize) -> Option<Boundary> {
        if self.state.last_kind != Some(kind) {
            return Some(Boundary::KindChanged);
        }
        if kind.always_seals() {
            return Some(Boundary::StyleEdit);
        }
        let last = self.state.last_position?;
        let jump = position.abs_diff(last);
        match kind {
            EditKind::Insert if jump > INSERT_POSITION_JUMP => Some(Boundary::InsertJump),
            EditKind::Delete if jump > self.config.max_position_jump => {
                Some(Boundary::DeleteJump)
            }
            _ => None,
        }
    }

    /// Seal the open batch now and forget its position history.
    pub fn finalize_batch(&mut self) {
        self.seal("finalize");
        self.core.publish();
    }

    /// Seal the open batch, then undo the newest entry.
    pub fn undo(&mut self) -> Option<Result<String, CommandError>> {
        self.deliver_due();
        let outcome = self.core.undo();
        self.reset_state();
        self.core.publish();
        outcome
    }

    /// Redo the newest undone entry; the open batch keeps accumulating.
    pub fn redo(&mut self) -> Option<Result<String, CommandError>> {
        self.deliver_due();
        let outcome = self.core.redo();
        self.core.publish();
        outcome
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.can_redo()
    }

    /// Discard the open batch without recording it and clear all history.
    pub fn clear(&mut self) {
        self.core.clear();
        self.reset_state();
        self.core.publish();
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.core.manager().history()
    }

    #[must_use]
    pub fn can_undo_signal(&self) -> ReadSignal<bool> {
        self.core.manager().can_undo_signal()
    }

    #[must_use]
    pub fn can_redo_signal(&self) -> ReadSignal<bool> {
        self.core.manager().can_redo_signal()
    }

    /// Deliver an expired debounce. Returns whether a batch was sealed.
    pub fn tick(&mut self) -> bool {
        let fired = self.deliver_due();
        if fired {
            self.core.publish();
        }
        fired
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.core.next_deadline()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.core.pending_len()
    }

    #[must_use]
    pub fn has_pending_batch(&self) -> bool {
        self.core.pending_len() > 0
    }

    #[must_use]
    pub fn config(&self) -> &SmartBatchingConfig {
        &self.config
    }

    #[must_use]
    pub fn batch_state(&self) -> BatchState {
        self.state
    }

    #[must_use]
    pub fn manager(&self) -> &CommandManager {
        self.core.manager()
    }

    fn seal(&mut self, reason: &'static str) {
        self.core.seal(reason);
        self.reset_state();
    }

    fn deliver_due(&mut self) -> bool {
        let fired = self.core.fire_due();
        if fired {
            self.reset_state();
        }
        fired
    }

    fn reset_state(&mut self) {
        self.state = BatchState::empty(self.core.now());
    }
}
