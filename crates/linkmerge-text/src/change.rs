//! Text changes and ordered change lists.
//!
//! A change list is *normalized* when its changes are sorted by start
//! offset, do not overlap, and no change ends exactly where the next one
//! starts (touching changes are coalesced into one).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TextError;
use crate::span::TextSpan;

/// Replace the text in `span` (offsets into the old text) with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextChange {
    /// Range in the old text being replaced.
    pub span: TextSpan,
    /// Replacement text.
    pub new_text: String,
}

impl TextChange {
    /// Create a change replacing `span` with `new_text`.
    pub fn new(span: TextSpan, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// A pure insertion of `new_text` at `position`.
    pub fn insert(position: usize, new_text: impl Into<String>) -> Self {
        Self::new(TextSpan::at(position), new_text)
    }

    /// A pure deletion of `span`.
    #[must_use]
    pub fn delete(span: TextSpan) -> Self {
        Self::new(span, String::new())
    }

    /// How much this change grows (positive) or shrinks (negative) the text.
    #[must_use]
    pub fn len_delta(&self) -> isize {
        to_isize(self.new_text.len()) - to_isize(self.span.len())
    }

    /// Returns `true` if the change inserts text without removing any.
    #[must_use]
    pub const fn is_insertion(&self) -> bool {
        self.span.is_empty()
    }
}

impl fmt::Display for TextChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.span, self.new_text)
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn to_isize(n: usize) -> isize {
    n as isize
}

/// Check that `changes` is sorted by start offset and free of overlaps.
///
/// Changes that touch end-to-start are allowed, as are several insertions at
/// the same position (they apply in list order).
///
/// # Errors
/// Returns [`TextError::UnsortedChanges`] or [`TextError::OverlappingChanges`]
/// for the first offending pair.
pub fn validate_changes(changes: &[TextChange]) -> Result<(), TextError> {
    for pair in changes.windows(2) {
        let (previous, current) = (pair[0].span, pair[1].span);
        if current.start() < previous.start() {
            return Err(TextError::UnsortedChanges { previous, current });
        }
        if current.start() < previous.end() {
            return Err(TextError::OverlappingChanges { previous, current });
        }
    }
    Ok(())
}

/// Sort `changes` by span and coalesce changes that touch end-to-start.
///
/// The sort is stable and keys on `(start, end)`, so an insertion at `p`
/// stays in front of a replacement starting at `p`, and insertions at the
/// same position keep their relative order. Overlapping changes are not
/// detected here; run [`validate_changes`] on the result when the input is
/// untrusted.
#[must_use]
pub fn normalize_changes(mut changes: Vec<TextChange>) -> Vec<TextChange> {
    if changes.len() <= 1 {
        return changes;
    }
    changes.sort_by_key(|c| (c.span.start(), c.span.end()));

    let mut normalized: Vec<TextChange> = Vec::with_capacity(changes.len());
    let mut iter = changes.into_iter();
    let Some(mut current) = iter.next() else {
        return normalized;
    };
    for next in iter {
        if next.span.start() == current.span.end() {
            current.span = TextSpan::from_bounds(current.span.start(), next.span.end());
            current.new_text.push_str(&next.new_text);
        } else {
            normalized.push(current);
            current = next;
        }
    }
    normalized.push(current);
    normalized
}
