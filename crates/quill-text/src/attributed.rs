#![forbid(unsafe_code)]

//! Positional (character, style) sequence.
//!
//! # Invariants
//!
//! 1. `len()` equals the number of `char`s in `to_string()`.
//! 2. The style at index `i` governs exactly the character at index `i`.
//!
//! # Positions
//!
//! Every position is a character offset into the *current* sequence. Nothing
//! rebases offsets after an earlier edit; callers recompute them.
//!
//! Out-of-range positions are clamped rather than rejected: an insert past
//! the end appends, a range that overruns the end is truncated, and a range
//! whose end precedes its start is empty. Editor front ends routinely hand
//! over stale selections, and none of these operations can fail.

use std::fmt;
use std::ops::Range;

use tracing::trace;

use crate::style::{StylePatch, TextStyle};

/// A character together with the style that governs it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyledChar {
    pub ch: char,
    pub style: TextStyle,
}

impl StyledChar {
    #[must_use]
    pub const fn new(ch: char, style: TextStyle) -> Self {
        Self { ch, style }
    }
}

/// An ordered sequence of styled characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributedText {
    chars: Vec<StyledChar>,
}

impl AttributedText {
    /// Create text where every character carries `style`.
    #[must_use]
    pub fn new(text: &str, style: TextStyle) -> Self {
        Self {
            chars: text.chars().map(|ch| StyledChar::new(ch, style)).collect(),
        }
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Insert `text` at `pos`, every new character styled with `style`.
    ///
    /// Returns the position the text actually landed at (`pos` clamped to
    /// the current length).
    pub fn insert(&mut self, pos: usize, text: &str, style: TextStyle) -> usize {
        let at = self.clamp_pos(pos);
        self.chars
            .splice(at..at, text.chars().map(|ch| StyledChar::new(ch, style)));
        at
    }

    /// Insert previously captured pairs at `pos`, keeping their styles.
    ///
    /// Returns the effective position, like [`insert`](Self::insert).
    pub fn insert_styled(&mut self, pos: usize, chars: &[StyledChar]) -> usize {
        let at = self.clamp_pos(pos);
        self.chars.splice(at..at, chars.iter().copied());
        at
    }

    /// Remove `[start, end)` and return the excised pairs.
    pub fn delete(&mut self, start: usize, end: usize) -> Vec<StyledChar> {
        let range = self.clamp_range(start, end);
        self.chars.drain(range).collect()
    }

    /// Copy of the style records in `[start, end)`.
    #[must_use]
    pub fn styles(&self, start: usize, end: usize) -> Vec<TextStyle> {
        let range = self.clamp_range(start, end);
        self.chars[range].iter().map(|c| c.style).collect()
    }

    /// Merge `patch` into every style in `[start, end)`.
    ///
    /// Returns the styles as they were before the merge, one per touched
    /// character, suitable for [`restore_format`](Self::restore_format).
    pub fn apply_format(&mut self, start: usize, end: usize, patch: &StylePatch) -> Vec<TextStyle> {
        let range = self.clamp_range(start, end);
        let mut previous = Vec::with_capacity(range.len());
        for c in &mut self.chars[range] {
            previous.push(c.style);
            c.style = c.style.patched(patch);
        }
        previous
    }

    /// Write `styles` back positionally starting at `start`.
    ///
    /// Entries that would land past the end are dropped.
    pub fn restore_format(&mut self, start: usize, styles: &[TextStyle]) {
        let Some(tail) = self.chars.get_mut(start..) else {
            trace!(start, len = self.chars.len(), "restore past end ignored");
            return;
        };
        for (c, style) in tail.iter_mut().zip(styles) {
            c.style = *style;
        }
    }

    /// The pair at `pos`, if any.
    #[must_use]
    pub fn char_at(&self, pos: usize) -> Option<StyledChar> {
        self.chars.get(pos).copied()
    }

    /// Copy of the pairs in `[start, end)`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Vec<StyledChar> {
        let range = self.clamp_range(start, end);
        self.chars[range].to_vec()
    }

    /// The plain text of `[start, end)`.
    #[must_use]
    pub fn text_range(&self, start: usize, end: usize) -> String {
        let range = self.clamp_range(start, end);
        self.chars[range].iter().map(|c| c.ch).collect()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = &StyledChar> {
        self.chars.iter()
    }

    fn clamp_pos(&self, pos: usize) -> usize {
        pos.min(self.chars.len())
    }

    fn clamp_range(&self, start: usize, end: usize) -> Range<usize> {
        let len = self.chars.len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        start..end
    }
}

impl fmt::Display for AttributedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            fmt::Write::write_char(f, c.ch)?;
        }
        Ok(())
    }
}

impl From<&str> for AttributedText {
    fn from(text: &str) -> Self {
        Self::new(text, TextStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> TextStyle {
        TextStyle::default().bold(true)
    }

    #[test]
    fn new_text_has_uniform_style() {
        let text = AttributedText::new("abc", bold());
        assert_eq!(text.len(), 3);
        assert!(text.iter().all(|c| c.style.bold));
        assert_eq!(text.to_string(), "abc");
    }

    #[test]
    fn insert_shifts_later_entries() {
        let mut text = AttributedText::from("Hello World");
        let at = text.insert(5, ", Beautiful", bold());
        assert_eq!(at, 5);
        assert_eq!(text.to_string(), "Hello, Beautiful World");
        assert!(!text.char_at(4).unwrap().style.bold);
        assert!(text.char_at(5).unwrap().style.bold);
        assert!(text.char_at(15).unwrap().style.bold);
        assert!(!text.char_at(16).unwrap().style.bold);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut text = AttributedText::from("ab");
        let at = text.insert(99, "c", TextStyle::default());
        assert_eq!(at, 2);
        assert_eq!(text.to_string(), "abc");
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let mut text = AttributedText::from("héllo");
        assert_eq!(text.len(), 5);
        text.insert(1, "ü", TextStyle::default());
        assert_eq!(text.to_string(), "hüéllo");
        assert_eq!(text.len(), 6);
    }

    #[test]
    fn delete_returns_excised_pairs() {
        let mut text = AttributedText::from("Hello World");
        text.apply_format(6, 11, &StylePatch::new().italic(true));
        let removed = text.delete(5, 11);
        assert_eq!(text.to_string(), "Hello");
        assert_eq!(removed.len(), 6);
        assert_eq!(removed[0].ch, ' ');
        assert!(!removed[0].style.italic);
        assert!(removed[1].style.italic);
    }

    #[test]
    fn delete_clamps_out_of_range() {
        let mut text = AttributedText::from("abc");
        assert_eq!(text.delete(1, 50).len(), 2);
        assert_eq!(text.to_string(), "a");
        assert!(text.delete(7, 9).is_empty());
        assert!(text.delete(1, 0).is_empty());
        assert_eq!(text.to_string(), "a");
    }

    #[test]
    fn insert_styled_restores_deleted_run() {
        let mut text = AttributedText::from("abcdef");
        text.apply_format(2, 4, &StylePatch::new().underline(true));
        let snapshot = text.clone();
        let removed = text.delete(1, 5);
        text.insert_styled(1, &removed);
        assert_eq!(text, snapshot);
    }

    #[test]
    fn apply_format_returns_prior_styles() {
        let mut text = AttributedText::from("abcd");
        text.apply_format(0, 2, &StylePatch::new().bold(true));
        let prior = text.apply_format(1, 3, &StylePatch::new().font_size(20.0));
        assert_eq!(prior.len(), 2);
        assert!(prior[0].bold);
        assert!(!prior[1].bold);
        assert_eq!(prior[0].font_size, Some(14.0));
        assert_eq!(text.styles(1, 3)[1].font_size, Some(20.0));
        assert!(text.styles(1, 2)[0].bold);
    }

    #[test]
    fn restore_format_round_trips_apply() {
        let mut text = AttributedText::from("formatting");
        let before = text.clone();
        let prior = text.apply_format(3, 8, &StylePatch::new().bold(true).italic(true));
        text.restore_format(3, &prior);
        assert_eq!(text, before);
    }

    #[test]
    fn restore_format_drops_entries_past_end() {
        let mut text = AttributedText::from("ab");
        text.restore_format(1, &[bold(), bold(), bold()]);
        assert!(!text.char_at(0).unwrap().style.bold);
        assert!(text.char_at(1).unwrap().style.bold);
        text.restore_format(10, &[bold()]);
        assert_eq!(text.len(), 2);
    }

    #[test]
    fn styles_is_a_copy() {
        let mut text = AttributedText::from("xy");
        let mut styles = text.styles(0, 2);
        styles[0].bold = true;
        assert!(!text.char_at(0).unwrap().style.bold);
        text.apply_format(0, 1, &StylePatch::new().bold(true));
        assert!(!styles[1].bold);
    }

    #[test]
    fn slice_and_text_range_clamp() {
        let text = AttributedText::from("hello");
        assert_eq!(text.text_range(1, 3), "el");
        assert_eq!(text.text_range(3, 100), "lo");
        assert_eq!(text.slice(4, 2).len(), 0);
        assert!(text.char_at(5).is_none());
    }
}
