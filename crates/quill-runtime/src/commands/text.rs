#![forbid(unsafe_code)]

//! Insert and delete.

use std::fmt;
use std::rc::Rc;

use quill_text::{StyledChar, TextStyle};

use crate::document::EditorState;
use crate::undo::{Command, CommandResult};

/// Insert text at a position.
///
/// Undo removes exactly what was inserted and puts the caret back where it
/// was when the command was built.
pub struct InsertTextCommand {
    editor: Rc<EditorState>,
    position: usize,
    text: String,
    style: TextStyle,
    original_cursor: usize,
    /// Where the text actually landed, once executed.
    applied_at: Option<usize>,
}

impl fmt::Debug for InsertTextCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertTextCommand")
            .field("position", &self.position)
            .field("text", &self.text)
            .field("applied_at", &self.applied_at)
            .finish()
    }
}

impl InsertTextCommand {
    /// Insert `text` in the default style.
    pub fn new(editor: Rc<EditorState>, position: usize, text: impl Into<String>) -> Self {
        Self::styled(editor, position, text, TextStyle::default())
    }

    /// Insert `text` with every character styled `style`.
    pub fn styled(
        editor: Rc<EditorState>,
        position: usize,
        text: impl Into<String>,
        style: TextStyle,
    ) -> Self {
        let original_cursor = editor.cursor_position();
        Self {
            editor,
            position,
            text: text.into(),
            style,
            original_cursor,
            applied_at: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Command for InsertTextCommand {
    fn execute(&mut self) -> CommandResult {
        let at = self.editor.insert_text(self.position, &self.text, self.style);
        self.applied_at = Some(at);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        let Some(at) = self.applied_at else {
            return Ok(());
        };
        self.editor.delete_text(at, at + self.text.chars().count());
        self.editor.set_cursor_position(self.original_cursor);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Insert \"{}\"", self.text)
    }

    fn debug_name(&self) -> &'static str {
        "InsertTextCommand"
    }
}

/// Delete the characters in `[start, end)`.
///
/// The removed characters are captured with their styles, so undo restores
/// formatting as well as text.
pub struct DeleteTextCommand {
    editor: Rc<EditorState>,
    start: usize,
    end: usize,
    /// The range's text when the command was built.
    deleted_text: String,
    original_cursor: usize,
    removed: Vec<StyledChar>,
    executed: bool,
}

impl fmt::Debug for DeleteTextCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteTextCommand")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("deleted_text", &self.deleted_text)
            .field("executed", &self.executed)
            .finish()
    }
}

impl DeleteTextCommand {
    pub fn new(editor: Rc<EditorState>, start: usize, end: usize) -> Self {
        let deleted_text = editor.text_range(start, end);
        let original_cursor = editor.cursor_position();
        Self {
            editor,
            start,
            end,
            deleted_text,
            original_cursor,
            removed: Vec::new(),
            executed: false,
        }
    }

    #[must_use]
    pub fn deleted_text(&self) -> &str {
        &self.deleted_text
    }
}

impl Command for DeleteTextCommand {
    fn execute(&mut self) -> CommandResult {
        self.removed = self.editor.delete_text(self.start, self.end);
        self.executed = true;
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        if !self.executed {
            return Ok(());
        }
        self.editor.insert_styled(self.start, &self.removed);
        self.editor.set_cursor_position(self.original_cursor);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete \"{}\"", self.deleted_text)
    }

    fn debug_name(&self) -> &'static str {
        "DeleteTextCommand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_text::StylePatch;

    #[test]
    fn insert_and_undo() {
        let editor = EditorState::shared();
        let mut cmd = InsertTextCommand::new(Rc::clone(&editor), 0, "Hello");
        assert_eq!(cmd.description(), "Insert \"Hello\"");

        cmd.execute().unwrap();
        assert_eq!(editor.content(), "Hello");
        assert_eq!(editor.cursor_position(), 5);

        cmd.undo().unwrap();
        assert_eq!(editor.content(), "");
        assert_eq!(editor.cursor_position(), 0);
    }

    #[test]
    fn insert_restores_construction_time_caret() {
        let editor = Rc::new(EditorState::with_content("abcdef"));
        editor.set_cursor_position(4);
        let mut cmd = InsertTextCommand::new(Rc::clone(&editor), 1, "XY");

        cmd.execute().unwrap();
        assert_eq!(editor.content(), "aXYbcdef");
        assert_eq!(editor.cursor_position(), 3);

        cmd.undo().unwrap();
        assert_eq!(editor.content(), "abcdef");
        assert_eq!(editor.cursor_position(), 4);
    }

    #[test]
    fn insert_past_end_undoes_what_landed() {
        let editor = Rc::new(EditorState::with_content("ab"));
        let mut cmd = InsertTextCommand::new(Rc::clone(&editor), 50, "cd");
        cmd.execute().unwrap();
        assert_eq!(editor.content(), "abcd");

        cmd.undo().unwrap();
        assert_eq!(editor.content(), "ab");
    }

    #[test]
    fn styled_insert_carries_style() {
        let editor = EditorState::shared();
        let style = TextStyle::default().italic(true);
        let mut cmd = InsertTextCommand::styled(Rc::clone(&editor), 0, "it", style);
        cmd.execute().unwrap();
        assert!(editor.formatting(0, 2).iter().all(|s| s.italic));
    }

    #[test]
    fn delete_and_undo() {
        let editor = Rc::new(EditorState::with_content("Hello World"));
        editor.set_cursor_position(11);
        let mut cmd = DeleteTextCommand::new(Rc::clone(&editor), 5, 11);
        assert_eq!(cmd.description(), "Delete \" World\"");

        cmd.execute().unwrap();
        assert_eq!(editor.content(), "Hello");
        assert_eq!(editor.cursor_position(), 5);

        cmd.undo().unwrap();
        assert_eq!(editor.content(), "Hello World");
        assert_eq!(editor.cursor_position(), 11);
    }

    #[test]
    fn delete_undo_restores_styles() {
        let editor = Rc::new(EditorState::with_content("abc"));
        editor.apply_formatting(1, 2, &StylePatch::new().underline(true));
        let mut cmd = DeleteTextCommand::new(Rc::clone(&editor), 0, 3);

        cmd.execute().unwrap();
        cmd.undo().unwrap();
        let styles = editor.formatting(0, 3);
        assert_eq!(
            styles.iter().map(|s| s.underline).collect::<Vec<_>>(),
            vec![false, true, false]
        );
    }

    #[test]
    fn redo_after_undo() {
        let editor = Rc::new(EditorState::with_content("xyz"));
        let mut cmd = DeleteTextCommand::new(Rc::clone(&editor), 0, 1);
        cmd.execute().unwrap();
        cmd.undo().unwrap();
        cmd.execute().unwrap();
        assert_eq!(editor.content(), "yz");
    }

    #[test]
    fn undo_before_execute_is_noop() {
        let editor = Rc::new(EditorState::with_content("keep"));
        let mut insert = InsertTextCommand::new(Rc::clone(&editor), 0, "x");
        let mut delete = DeleteTextCommand::new(Rc::clone(&editor), 0, 4);
        insert.undo().unwrap();
        delete.undo().unwrap();
        assert_eq!(editor.content(), "keep");
    }
}
