#![forbid(unsafe_code)]

//! The reversible-command contract.
//!
//! A [`Command`] owns everything it needs to apply its effect and to reverse
//! it later. There is no shared base state: an insert remembers where it
//! inserted and where the cursor was, a delete remembers what it removed, a
//! format remembers the styles it overwrote. Intent is fixed at
//! construction; captured pre-state is written during `execute`.
//!
//! # Invariant
//!
//! For every command `c`, `c.execute(); c.undo()` leaves the document
//! exactly as it was before `execute`. A command that breaks this is a bug,
//! and it is not reported at runtime.

use std::fmt;

/// Result of executing or undoing a command.
pub type CommandResult = Result<(), CommandError>;

/// Errors a command may report.
///
/// The built-in document commands clamp instead of failing, so they never
/// produce these; the type exists for caller-supplied commands that guard
/// an external resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Command cannot run in the current state.
    InvalidState(String),
    /// Generic error with message.
    Other(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// A reversible unit of document mutation.
pub trait Command {
    /// Apply the effect. Also used to re-apply after an undo.
    fn execute(&mut self) -> CommandResult;

    /// Reverse the most recent `execute`.
    fn undo(&mut self) -> CommandResult;

    /// Human-readable description for history and UI display.
    fn description(&self) -> String;

    /// Type name used in debug output.
    fn debug_name(&self) -> &'static str {
        "Command"
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.debug_name())
            .field("description", &self.description())
            .finish()
    }
}

/// Callback type for either half of an [`FnCommand`].
pub type CommandFn = Box<dyn FnMut() -> CommandResult>;

/// A command assembled from a description and two closures.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use quill_runtime::undo::{Command, FnCommand};
///
/// let counter = Rc::new(RefCell::new(0));
/// let (up, down) = (Rc::clone(&counter), Rc::clone(&counter));
/// let mut cmd = FnCommand::new(
///     "Increment",
///     move || { *up.borrow_mut() += 1; Ok(()) },
///     move || { *down.borrow_mut() -= 1; Ok(()) },
/// );
/// cmd.execute().unwrap();
/// assert_eq!(*counter.borrow(), 1);
/// cmd.undo().unwrap();
/// assert_eq!(*counter.borrow(), 0);
/// ```
pub struct FnCommand {
    description: String,
    execute: CommandFn,
    undo: CommandFn,
}

impl fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl FnCommand {
    pub fn new<E, U>(description: impl Into<String>, execute: E, undo: U) -> Self
    where
        E: FnMut() -> CommandResult + 'static,
        U: FnMut() -> CommandResult + 'static,
    {
        Self {
            description: description.into(),
            execute: Box::new(execute),
            undo: Box::new(undo),
        }
    }

    /// A command whose halves cannot fail.
    pub fn infallible<E, U>(description: impl Into<String>, mut execute: E, mut undo: U) -> Self
    where
        E: FnMut() + 'static,
        U: FnMut() + 'static,
    {
        Self::new(
            description,
            move || {
                execute();
                Ok(())
            },
            move || {
                undo();
                Ok(())
            },
        )
    }
}

impl Command for FnCommand {
    fn execute(&mut self) -> CommandResult {
        (self.execute)()
    }

    fn undo(&mut self) -> CommandResult {
        (self.undo)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn debug_name(&self) -> &'static str {
        "FnCommand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fn_command_runs_both_halves() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let mut cmd = FnCommand::infallible(
            "Insert \"a\"",
            move || a.borrow_mut().push("exec"),
            move || b.borrow_mut().push("undo"),
        );

        cmd.execute().unwrap();
        cmd.undo().unwrap();
        cmd.execute().unwrap();
        assert_eq!(*log.borrow(), vec!["exec", "undo", "exec"]);
        assert_eq!(cmd.description(), "Insert \"a\"");
    }

    #[test]
    fn fn_command_propagates_errors() {
        let mut cmd = FnCommand::new(
            "Broken",
            || Err(CommandError::InvalidState("target gone".into())),
            || Ok(()),
        );
        let err = cmd.execute().unwrap_err();
        assert_eq!(err.to_string(), "invalid state: target gone");
        assert!(cmd.undo().is_ok());
    }

    #[test]
    fn command_error_display() {
        assert_eq!(CommandError::Other("boom".into()).to_string(), "boom");
    }

    #[test]
    fn dyn_command_debug_uses_debug_name() {
        let cmd: Box<dyn Command> = Box::new(FnCommand::infallible("Noop", || {}, || {}));
        let text = format!("{cmd:?}");
        assert!(text.contains("FnCommand"));
        assert!(text.contains("Noop"));
    }
}
