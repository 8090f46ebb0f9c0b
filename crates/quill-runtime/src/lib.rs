#![forbid(unsafe_code)]

//! Quill Runtime
//!
//! Reversible editing for attributed text: every mutation is a command that
//! can be undone, and bursts of edits collapse into single undo steps.
//!
//! # Key Components
//!
//! - [`EditorState`] - The document: attributed text, plain content and caret
//! - [`Command`] - The reversible-operation contract
//! - [`CompositeCommand`] - Ordered group that undoes as one step
//! - [`CommandManager`] - Linear undo/redo stacks with a history log
//! - [`BatchingManager`] - Groups edits by debounce window and size cap
//! - [`SmartBatchingManager`] - Groups edits by kind, caret continuity and time
//! - [`Observable`] - Reactive cells backing `can_undo`/`can_redo`
//!
//! # Role in Quill
//! `quill-runtime` sits between an editor front end and `quill-text`. The
//! front end builds commands against an `Rc<EditorState>` and submits them to
//! a batching manager; the manager applies them at once and decides where
//! undo steps begin and end.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use quill_runtime::commands::InsertTextCommand;
//! use quill_runtime::undo::{EditKind, SmartBatchingManager};
//! use quill_runtime::EditorState;
//!
//! let editor = EditorState::shared();
//! let mut history = SmartBatchingManager::new();
//!
//! for (i, ch) in "hi".chars().enumerate() {
//!     let cmd = InsertTextCommand::new(Rc::clone(&editor), i, ch.to_string());
//!     history.execute_command(Box::new(cmd), EditKind::Insert, i).unwrap();
//! }
//! assert_eq!(editor.content(), "hi");
//!
//! history.undo();
//! assert_eq!(editor.content(), "");
//! ```

pub mod clock;
pub mod commands;
pub mod config;
pub mod document;
pub mod reactive;
pub mod undo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BatchingConfig, ConfigError, SmartBatchingConfig};
pub use document::EditorState;
pub use reactive::{Observable, ReadSignal, Subscription};
pub use undo::{
    BatchingManager, Command, CommandError, CommandManager, CommandResult, CompositeCommand,
    EditKind, FnCommand, HistoryEntry, SmartBatchingManager,
};

pub use quill_text::{AttributedText, StyledChar, StylePatch, TextStyle};
