#![forbid(unsafe_code)]

//! Ordered aggregates of commands that undo as one step.

use std::fmt;

use tracing::warn;

use super::command::{Command, CommandError, CommandResult};

/// An ordered group of commands that is itself a [`Command`].
///
/// # Invariants
///
/// 1. `execute` applies members first to last.
/// 2. `undo` reverses every member last to first, whatever the history of
///    `execute` calls. A failing member does not stop the walk; the first
///    error is returned once every member has been visited.
/// 3. A composite built with [`pre_executed`](Self::pre_executed) skips its
///    first `execute` (clearing the flag) and runs normally afterwards. The
///    batching managers use this when they seal members that were already
///    applied one by one.
#[derive(Default)]
pub struct CompositeCommand {
    commands: Vec<Box<dyn Command>>,
    already_executed: bool,
}

impl fmt::Debug for CompositeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeCommand")
            .field("commands_count", &self.commands.len())
            .field("already_executed", &self.already_executed)
            .finish()
    }
}

impl CompositeCommand {
    /// An empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A composite over `commands` that will apply them on first `execute`.
    #[must_use]
    pub fn from_commands(commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            commands,
            already_executed: false,
        }
    }

    /// A composite over `commands` whose effect is already in the document.
    #[must_use]
    pub fn pre_executed(commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            commands,
            already_executed: true,
        }
    }

    /// Append a member.
    pub fn push(&mut self, cmd: Box<dyn Command>) {
        self.commands.push(cmd);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether the next `execute` will be skipped.
    #[must_use]
    pub fn is_pre_executed(&self) -> bool {
        self.already_executed
    }

    /// Member descriptions in insertion order.
    pub fn descriptions(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.description()).collect()
    }

    /// Give up the members, leaving this composite empty.
    pub fn take_commands(&mut self) -> Vec<Box<dyn Command>> {
        std::mem::take(&mut self.commands)
    }
}

impl Command for CompositeCommand {
    fn execute(&mut self) -> CommandResult {
        if self.already_executed {
            self.already_executed = false;
            return Ok(());
        }
        for i in 0..self.commands.len() {
            if let Err(e) = self.commands[i].execute() {
                if let Some(rollback) = undo_all(&mut self.commands[..i], "rollback") {
                    warn!(error = %rollback, "rollback left the document partially applied");
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        match undo_all(&mut self.commands, "undo") {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn description(&self) -> String {
        if self.commands.is_empty() {
            return "Empty batch".to_string();
        }
        format!("Batch: {}", self.descriptions().join(", "))
    }

    fn debug_name(&self) -> &'static str {
        "CompositeCommand"
    }
}

/// Undo `commands` last to first, returning the first failure.
///
/// Later failures are logged and dropped.
fn undo_all(commands: &mut [Box<dyn Command>], phase: &'static str) -> Option<CommandError> {
    let mut first = None;
    for cmd in commands.iter_mut().rev() {
        if let Err(e) = cmd.undo() {
            if first.is_none() {
                first = Some(e);
            } else {
                warn!(phase, command = %cmd.description(), error = %e, "member undo failed");
            }
        }
    }
    first
}
