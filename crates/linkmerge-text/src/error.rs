//! Error types for text operations.
//!
//! [`TextError`] reports a malformed change list or span. These are contract
//! violations by whoever produced the changes, so callers generally propagate
//! them rather than recover. [`DiffError`] is what a [`TextDiffer`]
//! implementation returns when it cannot produce a diff at all.
//!
//! [`TextDiffer`]: crate::TextDiffer

use thiserror::Error;

use crate::span::TextSpan;

/// Errors returned when spans or change lists break their invariants.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TextError {
    /// A change starts before the change preceding it.
    #[error("changes are not sorted: {current} starts before {previous}")]
    UnsortedChanges {
        /// Span of the earlier change in the list.
        previous: TextSpan,
        /// Span of the change that is out of order.
        current: TextSpan,
    },

    /// Two changes in the same list overlap.
    #[error("changes overlap: {previous} and {current}")]
    OverlappingChanges {
        /// Span of the earlier change in the list.
        previous: TextSpan,
        /// Span of the change that overlaps it.
        current: TextSpan,
    },

    /// A span reaches past the end of the text it is applied to.
    #[error("span {span} is out of bounds for text of length {len}")]
    SpanOutOfBounds {
        /// The offending span.
        span: TextSpan,
        /// Length of the text in bytes.
        len: usize,
    },

    /// A span boundary falls inside a multi-byte UTF-8 sequence.
    #[error("offset {offset} is not on a char boundary")]
    NotCharBoundary {
        /// The offending byte offset.
        offset: usize,
    },
}

/// Errors returned by a [`TextDiffer`](crate::TextDiffer).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The differ could not compute changes for this pair of texts.
    #[error("diff failed: {message}")]
    Failed {
        /// Human-readable description from the differ.
        message: String,
    },
}
