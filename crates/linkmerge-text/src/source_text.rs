//! Immutable, line-indexed source text.
//!
//! [`SourceText`] is cheap to clone (the text and its line table are shared)
//! so solution snapshots can hold one per document without copying.
//!
//! Line breaks are `\n`, `\r\n`, and a lone `\r`. A text ending in a line
//! break has a trailing empty line, so `"A\n"` has two lines.

use std::fmt;
use std::sync::Arc;

use crate::change::{TextChange, validate_changes};
use crate::error::TextError;
use crate::hash::ContentHash;
use crate::span::TextSpan;

/// One line of a [`SourceText`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextLine {
    /// Zero-based line number.
    pub index: usize,
    /// Offset of the first byte of the line.
    pub start: usize,
    /// Offset just past the line's content, before any line break.
    pub end: usize,
    /// Offset just past the line break (equal to `end` on the last line).
    pub end_including_break: usize,
}

impl TextLine {
    /// The line's content, without its line break.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        TextSpan::from_bounds(self.start, self.end)
    }

    /// The line's content including its line break.
    #[must_use]
    pub const fn span_including_break(&self) -> TextSpan {
        TextSpan::from_bounds(self.start, self.end_including_break)
    }
}

/// Immutable text with a precomputed line table.
#[derive(Clone)]
pub struct SourceText {
    text: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceText {
    /// Build a `SourceText`, indexing its lines.
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            text: text.into(),
            line_starts: line_starts.into(),
        }
    }

    /// The full text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` for the empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines (at least 1).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based number of the line containing `offset`.
    ///
    /// `offset == len()` maps to the last line.
    ///
    /// # Panics
    /// Panics if `offset > len()`.
    #[must_use]
    pub fn line_index_at(&self, offset: usize) -> usize {
        assert!(
            offset <= self.len(),
            "offset {offset} is past the end of a text of length {}",
            self.len()
        );
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(insert_at) => insert_at - 1,
        }
    }

    /// The line containing `offset`.
    ///
    /// # Panics
    /// Panics if `offset > len()`.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> TextLine {
        self.line(self.line_index_at(offset))
    }

    /// Line number `index`.
    ///
    /// # Panics
    /// Panics if `index >= line_count()`.
    #[must_use]
    pub fn line(&self, index: usize) -> TextLine {
        let start = self.line_starts[index];
        let end_including_break = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.text.len());
        let content = &self.text.as_bytes()[start..end_including_break];
        let break_len = if content.ends_with(b"\r\n") {
            2
        } else if content.ends_with(b"\n") || content.ends_with(b"\r") {
            1
        } else {
            0
        };
        TextLine {
            index,
            start,
            end: end_including_break - break_len,
            end_including_break,
        }
    }

    /// Iterate over all lines in order.
    pub fn lines(&self) -> impl Iterator<Item = TextLine> + '_ {
        (0..self.line_count()).map(|i| self.line(i))
    }

    /// The text of `span`.
    ///
    /// # Errors
    /// Returns an error if the span is out of bounds or splits a character.
    pub fn slice(&self, span: TextSpan) -> Result<&str, TextError> {
        self.check_span(span)?;
        Ok(&self.text[span.range()])
    }

    /// A new `SourceText` holding the text of `span`.
    ///
    /// # Errors
    /// Returns an error if the span is out of bounds or splits a character.
    pub fn sub_text(&self, span: TextSpan) -> Result<Self, TextError> {
        self.slice(span).map(Self::new)
    }

    /// Apply a batch of changes whose spans refer to this text.
    ///
    /// # Errors
    /// Returns an error if the changes are unsorted, overlap, fall outside the
    /// text, or split a character.
    pub fn with_changes(&self, changes: &[TextChange]) -> Result<Self, TextError> {
        if changes.is_empty() {
            return Ok(self.clone());
        }
        self.validate_changes(changes)?;

        let growth: usize = changes.iter().map(|c| c.new_text.len()).sum();
        let mut out = String::with_capacity(self.len() + growth);
        let mut cursor = 0;
        for change in changes {
            out.push_str(&self.text[cursor..change.span.start()]);
            out.push_str(&change.new_text);
            cursor = change.span.end();
        }
        out.push_str(&self.text[cursor..]);
        Ok(Self::new(out))
    }

    /// Check that `changes` is a valid batch for this text: sorted,
    /// non-overlapping, in bounds, and on char boundaries.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate_changes(&self, changes: &[TextChange]) -> Result<(), TextError> {
        validate_changes(changes)?;
        for change in changes {
            self.check_span(change.span)?;
        }
        Ok(())
    }

    /// SHA-256 digest of the full text.
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(&self.text)
    }

    fn check_span(&self, span: TextSpan) -> Result<(), TextError> {
        if span.end() > self.len() {
            return Err(TextError::SpanOutOfBounds {
                span,
                len: self.len(),
            });
        }
        for offset in [span.start(), span.end()] {
            if !self.text.is_char_boundary(offset) {
                return Err(TextError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = vec![0];
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                starts.push(i + 2);
                i += 2;
            }
            b'\r' | b'\n' => {
                starts.push(i + 1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    starts
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for SourceText {}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceText").field(&&*self.text).finish()
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Default for SourceText {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
