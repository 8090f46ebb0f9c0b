#![forbid(unsafe_code)]

//! Style commands over a character range.
//!
//! Each command captures the style records it overwrites and writes them
//! back on undo, so mixed selections come back exactly as they were.

use std::fmt;
use std::rc::Rc;

use quill_text::{StylePatch, TextStyle};

use crate::document::EditorState;
use crate::undo::{Command, CommandResult};

/// A boolean style attribute that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatAttribute {
    Bold,
    Italic,
    Underline,
}

impl FormatAttribute {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
        }
    }

    fn is_set(self, style: &TextStyle) -> bool {
        match self {
            Self::Bold => style.bold,
            Self::Italic => style.italic,
            Self::Underline => style.underline,
        }
    }

    fn patch(self, on: bool) -> StylePatch {
        match self {
            Self::Bold => StylePatch::new().bold(on),
            Self::Italic => StylePatch::new().italic(on),
            Self::Underline => StylePatch::new().underline(on),
        }
    }
}

impl fmt::Display for FormatAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toggle an attribute over `[start, end)`.
///
/// When every character in range already has the attribute it is removed;
/// otherwise (including a mixed selection) it is applied to all of them. An
/// empty range counts as "not set".
pub struct ToggleFormatCommand {
    editor: Rc<EditorState>,
    attribute: FormatAttribute,
    start: usize,
    end: usize,
    previous: Vec<TextStyle>,
    was_set: bool,
}

impl fmt::Debug for ToggleFormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleFormatCommand")
            .field("attribute", &self.attribute)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("was_set", &self.was_set)
            .finish()
    }
}

impl ToggleFormatCommand {
    pub fn new(
        editor: Rc<EditorState>,
        attribute: FormatAttribute,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            editor,
            attribute,
            start,
            end,
            previous: Vec::new(),
            was_set: false,
        }
    }

    pub fn bold(editor: Rc<EditorState>, start: usize, end: usize) -> Self {
        Self::new(editor, FormatAttribute::Bold, start, end)
    }

    pub fn italic(editor: Rc<EditorState>, start: usize, end: usize) -> Self {
        Self::new(editor, FormatAttribute::Italic, start, end)
    }

    pub fn underline(editor: Rc<EditorState>, start: usize, end: usize) -> Self {
        Self::new(editor, FormatAttribute::Underline, start, end)
    }

    #[must_use]
    pub fn attribute(&self) -> FormatAttribute {
        self.attribute
    }

    /// Whether the last `execute` found the attribute already set.
    #[must_use]
    pub fn was_set(&self) -> bool {
        self.was_set
    }
}

impl Command for ToggleFormatCommand {
    fn execute(&mut self) -> CommandResult {
        let current = self.editor.formatting(self.start, self.end);
        self.was_set = !current.is_empty() && current.iter().all(|s| self.attribute.is_set(s));
        let patch = self.attribute.patch(!self.was_set);
        self.previous = self.editor.apply_formatting(self.start, self.end, &patch);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        self.editor.restore_formatting(self.start, &self.previous);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Toggle {} ({}-{})", self.attribute, self.start, self.end)
    }

    fn debug_name(&self) -> &'static str {
        "ToggleFormatCommand"
    }
}

/// Set the font size of `[start, end)`.
pub struct FontSizeCommand {
    editor: Rc<EditorState>,
    start: usize,
    end: usize,
    size: f32,
    previous: Vec<TextStyle>,
}

impl fmt::Debug for FontSizeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSizeCommand")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("size", &self.size)
            .finish()
    }
}

impl FontSizeCommand {
    pub fn new(editor: Rc<EditorState>, start: usize, end: usize, size: f32) -> Self {
        Self {
            editor,
            start,
            end,
            size,
            previous: Vec::new(),
        }
    }
}

impl Command for FontSizeCommand {
    fn execute(&mut self) -> CommandResult {
        let patch = StylePatch::new().font_size(self.size);
        self.previous = self.editor.apply_formatting(self.start, self.end, &patch);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        self.editor.restore_formatting(self.start, &self.previous);
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Set font size to {}px ({}-{})",
            self.size, self.start, self.end
        )
    }

    fn debug_name(&self) -> &'static str {
        "FontSizeCommand"
    }
}
