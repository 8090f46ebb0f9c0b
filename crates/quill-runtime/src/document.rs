#![forbid(unsafe_code)]

//! The document state commands operate on.
//!
//! [`EditorState`] owns the [`AttributedText`] and projects it into two
//! reactive cells: the plain content and the caret offset. Commands hold an
//! `Rc<EditorState>` and go through its methods; nothing else mutates the
//! text.
//!
//! Methods take `&self`. The text lives behind a `RefCell` whose borrow is
//! always released before the cells notify, so a subscriber may read the
//! editor from its callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use quill_text::{AttributedText, StyledChar, StylePatch, TextStyle};

use crate::reactive::{Observable, ReadSignal};

/// Attributed text plus caret, shared between commands.
pub struct EditorState {
    text: RefCell<AttributedText>,
    content: Observable<String>,
    cursor: Observable<usize>,
}

impl fmt::Debug for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorState")
            .field("content", &self.content.get())
            .field("cursor", &self.cursor.get())
            .finish()
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// An empty document with the caret at 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: RefCell::new(AttributedText::default()),
            content: Observable::new(String::new()),
            cursor: Observable::new(0),
        }
    }

    /// A document holding `content` in the default style, caret at 0.
    #[must_use]
    pub fn with_content(content: &str) -> Self {
        let state = Self::new();
        state.set_content(content);
        state
    }

    /// [`new`](Self::new), ready to hand to commands.
    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[must_use]
    pub fn content(&self) -> String {
        self.content.get()
    }

    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor.get()
    }

    /// Number of characters in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.borrow().is_empty()
    }

    /// Plain text of `[start, end)`, clamped.
    #[must_use]
    pub fn text_range(&self, start: usize, end: usize) -> String {
        self.text.borrow().text_range(start, end)
    }

    /// Style records of `[start, end)`, clamped.
    #[must_use]
    pub fn formatting(&self, start: usize, end: usize) -> Vec<TextStyle> {
        self.text.borrow().styles(start, end)
    }

    /// Run `f` against the attributed text.
    pub fn with_text<R>(&self, f: impl FnOnce(&AttributedText) -> R) -> R {
        f(&self.text.borrow())
    }

    /// Cell mirroring the plain content.
    #[must_use]
    pub fn content_signal(&self) -> ReadSignal<String> {
        self.content.read_only()
    }

    /// Cell mirroring the caret offset.
    #[must_use]
    pub fn cursor_signal(&self) -> ReadSignal<usize> {
        self.cursor.read_only()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Move the caret, clamped to the document length.
    pub fn set_cursor_position(&self, position: usize) {
        let position = position.min(self.len());
        self.cursor.set(position);
    }

    /// Insert `text` at `position` and put the caret after it.
    ///
    /// Returns the position the text landed at.
    pub fn insert_text(&self, position: usize, text: &str, style: TextStyle) -> usize {
        let at = self.text.borrow_mut().insert(position, text, style);
        self.publish_content();
        self.cursor.set(at + text.chars().count());
        at
    }

    /// Reinsert captured pairs at `position`, caret after them.
    pub fn insert_styled(&self, position: usize, chars: &[StyledChar]) -> usize {
        let at = self.text.borrow_mut().insert_styled(position, chars);
        self.publish_content();
        self.cursor.set(at + chars.len());
        at
    }

    /// Remove `[start, end)` and put the caret at `start`.
    ///
    /// Returns the removed pairs.
    pub fn delete_text(&self, start: usize, end: usize) -> Vec<StyledChar> {
        let removed = self.text.borrow_mut().delete(start, end);
        self.publish_content();
        self.cursor.set(start.min(self.len()));
        removed
    }

    /// Merge `patch` into `[start, end)`; returns the previous styles.
    pub fn apply_formatting(&self, start: usize, end: usize, patch: &StylePatch) -> Vec<TextStyle> {
        let previous = self.text.borrow_mut().apply_format(start, end, patch);
        self.publish_content();
        previous
    }

    /// Write previously captured styles back from `start`.
    pub fn restore_formatting(&self, start: usize, styles: &[TextStyle]) {
        self.text.borrow_mut().restore_format(start, styles);
        self.publish_content();
    }

    /// Replace the whole document with `content` in the default style.
    ///
    /// Formatting is lost and the caret returns to 0.
    pub fn set_content(&self, content: &str) {
        *self.text.borrow_mut() = AttributedText::from(content);
        self.publish_content();
        self.cursor.set(0);
    }

    fn publish_content(&self) {
        let content = self.text.borrow().to_string();
        self.content.set(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = EditorState::new();
        assert_eq!(state.content(), "");
        assert_eq!(state.cursor_position(), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn insert_moves_caret_to_end_of_insertion() {
        let state = EditorState::new();
        state.insert_text(0, "Hello", TextStyle::default());
        assert_eq!(state.content(), "Hello");
        assert_eq!(state.cursor_position(), 5);

        state.insert_text(0, ">> ", TextStyle::default());
        assert_eq!(state.content(), ">> Hello");
        assert_eq!(state.cursor_position(), 3);
    }

    #[test]
    fn insert_past_end_appends() {
        let state = EditorState::with_content("ab");
        let at = state.insert_text(10, "c", TextStyle::default());
        assert_eq!(at, 2);
        assert_eq!(state.content(), "abc");
        assert_eq!(state.cursor_position(), 3);
    }

    #[test]
    fn delete_moves_caret_to_start() {
        let state = EditorState::with_content("Hello World");
        state.set_cursor_position(11);
        let removed = state.delete_text(5, 11);
        assert_eq!(removed.len(), 6);
        assert_eq!(state.content(), "Hello");
        assert_eq!(state.cursor_position(), 5);
    }

    #[test]
    fn formatting_round_trip() {
        let state = EditorState::with_content("abcd");
        let previous = state.apply_formatting(1, 3, &StylePatch::new().bold(true));
        assert_eq!(previous, vec![TextStyle::default(); 2]);
        assert!(state.formatting(1, 3).iter().all(|s| s.bold));
        assert!(!state.formatting(0, 1)[0].bold);

        state.restore_formatting(1, &previous);
        assert!(state.formatting(0, 4).iter().all(|s| !s.bold));
    }

    #[test]
    fn set_content_resets_styles_and_caret() {
        let state = EditorState::with_content("x");
        state.apply_formatting(0, 1, &StylePatch::new().italic(true));
        state.set_cursor_position(1);

        state.set_content("fresh");
        assert_eq!(state.content(), "fresh");
        assert_eq!(state.cursor_position(), 0);
        assert!(state.formatting(0, 5).iter().all(|s| *s == TextStyle::default()));
    }

    #[test]
    fn caret_is_clamped() {
        let state = EditorState::with_content("abc");
        state.set_cursor_position(99);
        assert_eq!(state.cursor_position(), 3);
    }

    #[test]
    fn signals_follow_mutations() {
        let state = Rc::new(EditorState::new());
        let content = state.content_signal();
        let cursor = state.cursor_signal();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = Rc::clone(&seen);
        let _sub = content.subscribe(move |c| seen_cb.borrow_mut().push(c.clone()));

        state.insert_text(0, "hi", TextStyle::default());
        state.delete_text(0, 1);
        assert_eq!(*seen.borrow(), vec!["hi".to_string(), "i".to_string()]);
        assert_eq!(cursor.get(), 0);
    }

    #[test]
    fn subscriber_may_read_editor() {
        let state = Rc::new(EditorState::new());
        let reader = Rc::clone(&state);
        let lengths = Rc::new(RefCell::new(Vec::new()));
        let lengths_cb = Rc::clone(&lengths);
        let _sub = state
            .content_signal()
            .subscribe(move |_| lengths_cb.borrow_mut().push(reader.len()));

        state.insert_text(0, "abc", TextStyle::default());
        assert_eq!(*lengths.borrow(), vec![3]);
    }

    #[test]
    fn insert_styled_keeps_styles() {
        let state = EditorState::with_content("ab");
        state.apply_formatting(0, 1, &StylePatch::new().bold(true));
        let removed = state.delete_text(0, 2);
        assert!(state.is_empty());

        state.insert_styled(0, &removed);
        assert_eq!(state.content(), "ab");
        assert_eq!(state.cursor_position(), 2);
        assert!(state.formatting(0, 1)[0].bold);
        assert!(!state.formatting(1, 2)[0].bold);
    }
}
