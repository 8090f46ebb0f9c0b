#![forbid(unsafe_code)]

//! Style records for attributed text.
//!
//! A [`TextStyle`] is a complete record: every character owns one. A
//! [`StylePatch`] names only the fields a formatting operation wants to
//! change; merging a patch into a record leaves unnamed fields untouched.

/// Font size assigned to characters that were inserted without a style.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Per-character style record.
///
/// The default record has every flag cleared and a font size of
/// [`DEFAULT_FONT_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// `None` means "inherit from the surrounding renderer".
    pub font_size: Option<f32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            font_size: Some(DEFAULT_FONT_SIZE),
        }
    }
}

impl TextStyle {
    /// Create the default style record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold.
    #[must_use]
    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic.
    #[must_use]
    pub const fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set underline.
    #[must_use]
    pub const fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Set the font size.
    #[must_use]
    pub const fn font_size(mut self, size: Option<f32>) -> Self {
        self.font_size = size;
        self
    }

    /// Return this record with every field named by `patch` overwritten.
    #[must_use]
    pub fn patched(self, patch: &StylePatch) -> Self {
        Self {
            bold: patch.bold.unwrap_or(self.bold),
            italic: patch.italic.unwrap_or(self.italic),
            underline: patch.underline.unwrap_or(self.underline),
            font_size: patch.font_size.or(self.font_size),
        }
    }
}

/// A partial style: `None` fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_size: Option<f32>,
}

impl StylePatch {
    /// An empty patch (merging it changes nothing).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bold: None,
            italic: None,
            underline: None,
            font_size: None,
        }
    }

    #[must_use]
    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    #[must_use]
    pub const fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    #[must_use]
    pub const fn underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    #[must_use]
    pub const fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Whether the patch names no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.font_size.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_plain_fourteen() {
        let style = TextStyle::default();
        assert!(!style.bold);
        assert!(!style.italic);
        assert!(!style.underline);
        assert_eq!(style.font_size, Some(14.0));
    }

    #[test]
    fn patch_only_touches_named_fields() {
        let base = TextStyle::new().italic(true).font_size(Some(20.0));
        let merged = base.patched(&StylePatch::new().bold(true));
        assert!(merged.bold);
        assert!(merged.italic);
        assert!(!merged.underline);
        assert_eq!(merged.font_size, Some(20.0));
    }

    #[test]
    fn patch_can_clear_a_flag() {
        let base = TextStyle::new().bold(true).underline(true);
        let merged = base.patched(&StylePatch::new().bold(false));
        assert!(!merged.bold);
        assert!(merged.underline);
    }

    #[test]
    fn font_size_patch_overrides() {
        let merged = TextStyle::default().patched(&StylePatch::new().font_size(9.5));
        assert_eq!(merged.font_size, Some(9.5));
    }

    #[test]
    fn empty_patch_is_identity() {
        let base = TextStyle::new().bold(true).font_size(None);
        assert!(StylePatch::new().is_empty());
        assert_eq!(base.patched(&StylePatch::new()), base);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn patch_deserializes_with_missing_fields() {
        let patch: StylePatch = serde_json::from_str(r#"{"italic": true}"#).unwrap();
        assert_eq!(patch, StylePatch::new().italic(true));
    }
}
