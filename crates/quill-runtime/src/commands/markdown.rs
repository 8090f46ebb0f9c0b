#![forbid(unsafe_code)]

//! Markdown emphasis toggles.
//!
//! These rewrite the source text itself: a selection is wrapped in `**…**`
//! or `*…*`, or unwrapped when it already carries the markers.

use std::fmt;
use std::rc::Rc;

use quill_text::{StyledChar, TextStyle};

use crate::document::EditorState;
use crate::undo::{Command, CommandResult};

/// Which emphasis a [`MarkdownToggleCommand`] toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkdownEmphasis {
    /// `**text**`
    Bold,
    /// `*text*`
    Italic,
}

impl MarkdownEmphasis {
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
        }
    }

    /// Whether `text` is already wrapped in this emphasis.
    ///
    /// The markers must enclose at least one character. A bold-wrapped
    /// selection does not count as italic.
    #[must_use]
    pub fn is_wrapped(self, text: &str) -> bool {
        let marker = self.marker();
        let min_len = marker.len() * 2;
        let wrapped = text.starts_with(marker)
            && text.ends_with(marker)
            && text.chars().count() > min_len;
        match self {
            Self::Bold => wrapped,
            Self::Italic => wrapped && !text.starts_with("**"),
        }
    }

    /// The selection with this emphasis toggled.
    fn toggle(self, text: &str) -> (String, bool) {
        if self.is_wrapped(text) {
            let width = self.marker().len();
            let inner: String = text
                .chars()
                .skip(width)
                .take(text.chars().count() - 2 * width)
                .collect();
            (inner, true)
        } else {
            let marker = self.marker();
            (format!("{marker}{text}{marker}"), false)
        }
    }
}

/// Wrap or unwrap `[start, end)` in markdown emphasis markers.
///
/// The caret ends up after the rewritten text. Undo puts back the original
/// characters, styles included, and the caret from construction time.
pub struct MarkdownToggleCommand {
    editor: Rc<EditorState>,
    emphasis: MarkdownEmphasis,
    start: usize,
    end: usize,
    original_cursor: usize,
    was_wrapped: bool,
    /// Set by `execute`: the replaced characters, where the rewrite landed
    /// and how long it is.
    applied: Option<Applied>,
}

struct Applied {
    original: Vec<StyledChar>,
    at: usize,
    len: usize,
}

impl fmt::Debug for MarkdownToggleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownToggleCommand")
            .field("emphasis", &self.emphasis)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("was_wrapped", &self.was_wrapped)
            .finish()
    }
}

impl MarkdownToggleCommand {
    pub fn new(
        editor: Rc<EditorState>,
        emphasis: MarkdownEmphasis,
        start: usize,
        end: usize,
    ) -> Self {
        let original_cursor = editor.cursor_position();
        Self {
            editor,
            emphasis,
            start,
            end,
            original_cursor,
            was_wrapped: false,
            applied: None,
        }
    }

    pub fn bold(editor: Rc<EditorState>, start: usize, end: usize) -> Self {
        Self::new(editor, MarkdownEmphasis::Bold, start, end)
    }

    pub fn italic(editor: Rc<EditorState>, start: usize, end: usize) -> Self {
        Self::new(editor, MarkdownEmphasis::Italic, start, end)
    }

    #[must_use]
    pub fn emphasis(&self) -> MarkdownEmphasis {
        self.emphasis
    }
}

impl Command for MarkdownToggleCommand {
    fn execute(&mut self) -> CommandResult {
        let selected = self.editor.text_range(self.start, self.end);
        let (replacement, was_wrapped) = self.emphasis.toggle(&selected);
        self.was_wrapped = was_wrapped;

        let original = self.editor.delete_text(self.start, self.end);
        let style = original
            .first()
            .map_or_else(TextStyle::default, |c| c.style);
        let at = self.editor.insert_text(self.start, &replacement, style);
        self.applied = Some(Applied {
            original,
            at,
            len: replacement.chars().count(),
        });
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        let Some(applied) = &self.applied else {
            return Ok(());
        };
        self.editor.delete_text(applied.at, applied.at + applied.len);
        self.editor.insert_styled(applied.at, &applied.original);
        self.editor.set_cursor_position(self.original_cursor);
        Ok(())
    }

    fn description(&self) -> String {
        let verb = if self.was_wrapped { "Remove" } else { "Add" };
        format!("{verb} {} formatting", self.emphasis.as_str())
    }

    fn debug_name(&self) -> &'static str {
        "MarkdownToggleCommand"
    }
}
