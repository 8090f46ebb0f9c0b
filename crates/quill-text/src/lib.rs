#![forbid(unsafe_code)]

//! Attributed text for Quill documents.
//!
//! # Role in Quill
//! `quill-text` is the document model that undoable commands mutate: an
//! ordered sequence of characters where every character carries its own
//! style record. It has no notion of history, batching, or cursors; those
//! live in `quill-runtime`.
//!
//! # This crate provides
//! - [`TextStyle`] the per-character style record.
//! - [`StylePatch`] a partial style merged into existing records.
//! - [`StyledChar`] a (character, style) pair.
//! - [`AttributedText`] the positional sequence with insert/delete/format
//!   operations that hand back whatever a caller needs to reverse them.

/// Positional (character, style) sequence.
pub mod attributed;
/// Style records and partial style patches.
pub mod style;

pub use attributed::{AttributedText, StyledChar};
pub use style::{DEFAULT_FONT_SIZE, StylePatch, TextStyle};
