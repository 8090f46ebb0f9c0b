#![forbid(unsafe_code)]

//! Undo/redo history with adaptive edit batching.
//!
//! Every document mutation is a [`Command`] that knows how to reverse
//! itself. Commands flow through one of two batching managers into a
//! [`CommandManager`], which keeps the linear history:
//!
//! ```text
//!   caller ──cmd──▶ SmartBatchingManager ──┐
//!                   (kind, caret, time)    │   sealed batch
//!                                          ├──────────────────▶ CommandManager
//!   caller ──cmd──▶ BatchingManager ───────┘   (pre-executed       undo ◀─▶ redo
//!                   (time, size)               CompositeCommand)   history log
//! ```
//!
//! # Module Structure
//!
//! - [`command`]: the `Command` trait, `CommandError`, closure commands
//! - [`composite`]: ordered groups that undo as one step
//! - [`manager`]: undo/redo stacks, history log, reactive flags
//! - [`timer`]: the debounce deadline behind batch timeouts
//! - [`batching`]: fixed-window grouping
//! - [`smart`]: grouping by edit kind and caret continuity
//!
//! # Timeouts
//!
//! Nothing here spawns a thread. A batch's debounce is a deadline on the
//! manager's [`Clock`](crate::clock::Clock); the host calls `tick()` when
//! `next_deadline()` passes, and every mutating call delivers an expired
//! deadline before doing anything else.

pub mod batching;
pub mod command;
pub mod composite;
pub mod manager;
pub mod smart;
pub mod timer;

pub use batching::BatchingManager;
pub use command::{Command, CommandError, CommandFn, CommandResult, FnCommand};
pub use composite::CompositeCommand;
pub use manager::{CommandManager, HistoryEntry};
pub use smart::{BatchState, EditKind, INSERT_POSITION_JUMP, SmartBatchingManager};
pub use timer::BatchTimer;
