#![forbid(unsafe_code)]

//! Linear undo/redo history.
//!
//! [`CommandManager`] keeps two stacks and an append-only log:
//!
//! ```text
//! execute(a), execute(b), execute(c)
//!   undo: [a, b, c]   redo: []
//! undo() x2
//!   undo: [a]         redo: [c, b]
//! execute(d)          <-- new branch, redo is discarded
//!   undo: [a, d]      redo: []
//! ```
//!
//! # Invariants
//!
//! 1. Executing a new command clears the redo stack.
//! 2. The `can_undo`/`can_redo` cells equal `!undo.is_empty()` and
//!    `!redo.is_empty()` after every public operation.
//! 3. The history log only grows, except on [`clear`](CommandManager::clear).

use std::fmt;

use tracing::{debug, trace, warn};
use web_time::SystemTime;

use super::command::{Command, CommandError, CommandResult};
use crate::reactive::{Observable, ReadSignal};

/// One entry of the append-only history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub description: String,
    pub timestamp: SystemTime,
}

/// Undo/redo stacks with a history log and reactive availability flags.
pub struct CommandManager {
    /// Newest at the back.
    undo_stack: Vec<Box<dyn Command>>,
    /// Most recently undone at the back.
    redo_stack: Vec<Box<dyn Command>>,
    history: Vec<HistoryEntry>,
    can_undo: Observable<bool>,
    can_redo: Observable<bool>,
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history: Vec::new(),
            can_undo: Observable::new(false),
            can_redo: Observable::new(false),
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Execute `cmd` and record it as the newest undoable unit.
    ///
    /// A command that fails to execute is not recorded and leaves both
    /// stacks untouched.
    pub fn execute_command(&mut self, mut cmd: Box<dyn Command>) -> CommandResult {
        if let Err(e) = cmd.execute() {
            warn!(command = cmd.debug_name(), error = %e, "command failed to execute");
            return Err(e);
        }
        let description = cmd.description();
        trace!(%description, "command executed");
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
        self.history.push(HistoryEntry {
            description,
            timestamp: SystemTime::now(),
        });
        self.refresh_signals();
        Ok(())
    }

    /// Undo the newest unit.
    ///
    /// # Returns
    ///
    /// - `None` if there is nothing to undo
    /// - `Some(Ok(description))` if undo succeeded
    /// - `Some(Err(error))` if undo failed (the command stays on the undo stack)
    pub fn undo(&mut self) -> Option<Result<String, CommandError>> {
        let mut cmd = self.undo_stack.pop()?;
        let description = cmd.description();
        let outcome = match cmd.undo() {
            Ok(()) => {
                debug!(%description, "undo");
                self.redo_stack.push(cmd);
                Ok(description)
            }
            Err(e) => {
                warn!(%description, error = %e, "undo failed");
                self.undo_stack.push(cmd);
                Err(e)
            }
        };
        self.refresh_signals();
        Some(outcome)
    }

    /// Re-apply the most recently undone unit.
    ///
    /// Same return convention as [`undo`](Self::undo).
    pub fn redo(&mut self) -> Option<Result<String, CommandError>> {
        let mut cmd = self.redo_stack.pop()?;
        let description = cmd.description();
        let outcome = match cmd.execute() {
            Ok(()) => {
                debug!(%description, "redo");
                self.undo_stack.push(cmd);
                Ok(description)
            }
            Err(e) => {
                warn!(%description, error = %e, "redo failed");
                self.redo_stack.push(cmd);
                Err(e)
            }
        };
        self.refresh_signals();
        Some(outcome)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop both stacks and the history log.
    pub fn clear(&mut self) {
        debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history cleared"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.history.clear();
        self.refresh_signals();
    }

    /// Snapshot of the history log, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.clone()
    }

    // ========================================================================
    // Reactive flags
    // ========================================================================

    /// Read-only cell mirroring [`can_undo`](Self::can_undo).
    #[must_use]
    pub fn can_undo_signal(&self) -> ReadSignal<bool> {
        self.can_undo.read_only()
    }

    /// Read-only cell mirroring [`can_redo`](Self::can_redo).
    #[must_use]
    pub fn can_redo_signal(&self) -> ReadSignal<bool> {
        self.can_redo.read_only()
    }

    /// Publish availability, counting `pending` unsealed work as undoable.
    ///
    /// Batching managers call this after each operation so the `can_undo`
    /// cell also reflects their in-progress batch.
    pub(crate) fn publish_signals(&self, pending: bool) {
        self.can_undo.set(pending || self.can_undo());
        self.can_redo.set(self.can_redo());
    }

    fn refresh_signals(&self) {
        self.publish_signals(false);
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Descriptions of undoable units, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(|c| c.description())
            .collect()
    }

    /// Descriptions of redoable units, most recent first.
    pub fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        self.redo_stack
            .iter()
            .rev()
            .take(limit)
            .map(|c| c.description())
            .collect()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }
}
