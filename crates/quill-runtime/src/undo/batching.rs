#![forbid(unsafe_code)]

//! Fixed-window batching.
//!
//! [`BatchingManager`] sits in front of a [`CommandManager`] and collapses
//! bursts of edits into one undo step. Every command is applied the moment
//! it is submitted; what is deferred is only the decision of where one undo
//! step ends and the next begins.
//!
//! ```text
//! execute(a) ─┐
//! execute(b)  ├─ in-progress batch  ──seal──▶  Batch: a, b, c  (one undo entry)
//! execute(c) ─┘
//!                 seal on: max size | timeout | finalize_batch | undo
//! ```
//!
//! Sealing wraps the members in a pre-executed [`CompositeCommand`], so
//! submitting it to the manager records it without applying it twice.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use super::command::{Command, CommandError, CommandResult};
use super::composite::CompositeCommand;
use super::manager::{CommandManager, HistoryEntry};
use super::timer::BatchTimer;
use crate::clock::{Clock, SystemClock};
use crate::config::BatchingConfig;
use crate::reactive::ReadSignal;

// ============================================================================
// Shared core
// ============================================================================

/// State shared by both batching policies: the manager, the open batch,
/// its debounce deadline and the clock that drives it.
pub(crate) struct BatchCore {
    manager: CommandManager,
    current: CompositeCommand,
    timer: BatchTimer,
    clock: Box<dyn Clock>,
    config: BatchingConfig,
}

impl fmt::Debug for BatchCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCore")
            .field("manager", &self.manager)
            .field("pending", &self.current.len())
            .field("deadline", &self.timer.deadline())
            .field("config", &self.config)
            .finish()
    }
}

impl BatchCore {
    pub(crate) fn new(config: BatchingConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            manager: CommandManager::new(),
            current: CompositeCommand::new(),
            timer: BatchTimer::new(),
            clock,
            config,
        }
    }

    pub(crate) fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    pub(crate) fn manager(&self) -> &CommandManager {
        &self.manager
    }

    pub(crate) fn config(&self) -> &BatchingConfig {
        &self.config
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.current.len()
    }

    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Seal the open batch if its deadline has passed. Returns whether it did.
    pub(crate) fn fire_due(&mut self) -> bool {
        if !self.timer.is_due(self.now()) {
            return false;
        }
        self.seal("timeout");
        true
    }

    /// Apply `cmd` and add it to the open batch.
    ///
    /// A command that fails is neither recorded nor batched.
    pub(crate) fn execute_into(&mut self, mut cmd: Box<dyn Command>) -> CommandResult {
        cmd.execute()?;
        self.current.push(cmd);
        Ok(())
    }

    /// Seal on the size limit or restart the debounce. Returns whether the
    /// batch was sealed.
    pub(crate) fn after_push(&mut self) -> bool {
        if self.current.len() >= self.config.max_batch_size {
            self.seal("max size");
            return true;
        }
        let now = self.now();
        self.timer.arm(now, self.config.batch_timeout());
        false
    }

    /// Hand the open batch to the manager as one undo entry.
    pub(crate) fn seal(&mut self, reason: &'static str) {
        self.timer.cancel();
        if self.current.is_empty() {
            return;
        }
        let members = self.current.take_commands();
        debug!(reason, commands = members.len(), "batch sealed");
        // The first execute of a pre-executed composite is a no-op.
        let _ = self
            .manager
            .execute_command(Box::new(CompositeCommand::pre_executed(members)));
    }

    pub(crate) fn undo(&mut self) -> Option<Result<String, CommandError>> {
        self.seal("undo");
        self.manager.undo()
    }

    /// Redo never touches the open batch; it stays open and seals later.
    pub(crate) fn redo(&mut self) -> Option<Result<String, CommandError>> {
        self.manager.redo()
    }

    pub(crate) fn clear(&mut self) {
        self.timer.cancel();
        let dropped = self.current.take_commands();
        if !dropped.is_empty() {
            debug!(commands = dropped.len(), "open batch discarded");
        }
        self.manager.clear();
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.current.is_empty() || self.manager.can_undo()
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.manager.can_redo()
    }

    pub(crate) fn publish(&self) {
        self.manager.publish_signals(!self.current.is_empty());
    }
}

// ============================================================================
// BatchingManager
// ============================================================================

/// Groups edits by a debounce window and a size cap.
///
/// # Example
///
/// ```
/// use quill_runtime::clock::ManualClock;
/// use quill_runtime::config::BatchingConfig;
/// use quill_runtime::undo::{BatchingManager, FnCommand};
///
/// let clock = ManualClock::new();
/// let mut mgr = BatchingManager::with_clock(BatchingConfig::default(), clock.clone());
/// mgr.execute_command(Box::new(FnCommand::infallible("a", || {}, || {}))).unwrap();
/// mgr.execute_command(Box::new(FnCommand::infallible("b", || {}, || {}))).unwrap();
/// assert_eq!(mgr.pending_len(), 2);
///
/// clock.advance_ms(700);
/// assert!(mgr.tick());
/// assert_eq!(mgr.history()[0].description, "Batch: a, b");
/// ```
#[derive(Debug)]
pub struct BatchingManager {
    core: BatchCore,
}

impl Default for BatchingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchingManager {
    /// Default policy on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BatchingConfig::default())
    }

    #[must_use]
    pub fn with_config(config: BatchingConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }

    /// Use `clock` for deadlines instead of the system clock.
    #[must_use]
    pub fn with_clock(config: BatchingConfig, clock: impl Clock + 'static) -> Self {
        Self {
            core: BatchCore::new(config, Box::new(clock)),
        }
    }

    /// Apply `cmd` now and add it to the open batch.
    ///
    /// The batch seals once it holds `max_batch_size` commands; otherwise the
    /// debounce restarts.
    pub fn execute_command(&mut self, cmd: Box<dyn Command>) -> CommandResult {
        self.core.fire_due();
        let result = self.core.execute_into(cmd);
        if result.is_ok() {
            self.core.after_push();
        }
        self.core.publish();
        result
    }

    /// Seal the open batch now. Cancels the debounce even when empty.
    pub fn finalize_batch(&mut self) {
        self.core.seal("finalize");
        self.core.publish();
    }

    /// Seal the open batch, then undo the newest entry.
    pub fn undo(&mut self) -> Option<Result<String, CommandError>> {
        self.core.fire_due();
        let outcome = self.core.undo();
        self.core.publish();
        outcome
    }

    pub fn redo(&mut self) -> Option<Result<String, CommandError>> {
        self.core.fire_due();
        let outcome = self.core.redo();
        self.core.publish();
        outcome
    }

    /// True when a batch is open or the manager has sealed entries.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.can_redo()
    }

    /// Discard the open batch without recording it and clear all history.
    ///
    /// The discarded commands stay applied to the document.
    pub fn clear(&mut self) {
        self.core.clear();
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
        let fired = self.core.fire_due();
        if fired {
            self.core.publish();
        }
        fired
    }

    /// When the open batch will seal on its own, on the manager's clock.
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
    pub fn config(&self) -> &BatchingConfig {
        self.core.config()
    }

    /// The underlying history of sealed entries.
    #[must_use]
    pub fn manager(&self) -> &CommandManager {
        self.core.manager()
    }
}
