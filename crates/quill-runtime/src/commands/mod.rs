#![forbid(unsafe_code)]

//! Built-in document commands.
//!
//! Every command here holds an `Rc<EditorState>`, clamps out-of-range
//! positions instead of failing, and satisfies `execute(); undo()` leaving
//! content, styles and caret as they were. Pair them with the matching
//! [`EditKind`](crate::undo::EditKind) when submitting to a
//! [`SmartBatchingManager`](crate::undo::SmartBatchingManager):
//!
//! | Command                  | Kind       |
//! |--------------------------|------------|
//! | [`InsertTextCommand`]    | `Insert`   |
//! | [`DeleteTextCommand`]    | `Delete`   |
//! | [`ToggleFormatCommand`]  | `Format`   |
//! | [`FontSizeCommand`]      | `Format`   |
//! | [`MarkdownToggleCommand`]| `Markdown` |

pub mod format;
pub mod markdown;
pub mod text;

pub use format::{FontSizeCommand, FormatAttribute, ToggleFormatCommand};
pub use markdown::{MarkdownEmphasis, MarkdownToggleCommand};
pub use text::{DeleteTextCommand, InsertTextCommand};
