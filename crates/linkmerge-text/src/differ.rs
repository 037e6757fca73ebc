//! Text diffing.
//!
//! [`TextDiffer`] is the seam through which the merge engine obtains the
//! edits that turn one version of a document into another. The engine only
//! relies on the output being sorted and non-overlapping; [`LineDiffer`] is
//! the default implementation and works at line granularity on top of the
//! `similar` crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffTag, TextDiff};

use crate::change::TextChange;
use crate::error::DiffError;
use crate::source_text::SourceText;
use crate::span::TextSpan;

/// Computes the changes that transform `old` into `new`.
///
/// Implementations must return changes sorted by start offset with no
/// overlaps, with spans referring to `old`, and must be deterministic for
/// identical inputs.
pub trait TextDiffer {
    /// Diff `old` against `new`.
    ///
    /// # Errors
    /// Returns [`DiffError`] if the differ cannot produce a result.
    fn text_changes(&self, old: &SourceText, new: &SourceText)
    -> Result<Vec<TextChange>, DiffError>;
}

impl<T: TextDiffer + ?Sized> TextDiffer for &T {
    fn text_changes(
        &self,
        old: &SourceText,
        new: &SourceText,
    ) -> Result<Vec<TextChange>, DiffError> {
        (**self).text_changes(old, new)
    }
}

/// Diff algorithm used by [`LineDiffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffAlgorithm {
    /// Myers' O(ND) algorithm.
    #[default]
    Myers,
    /// Patience diff; tends to keep unique lines anchored.
    Patience,
}

impl fmt::Display for DiffAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Myers => write!(f, "myers"),
            Self::Patience => write!(f, "patience"),
        }
    }
}

impl From<DiffAlgorithm> for Algorithm {
    fn from(value: DiffAlgorithm) -> Self {
        match value {
            DiffAlgorithm::Myers => Self::Myers,
            DiffAlgorithm::Patience => Self::Patience,
        }
    }
}

/// Line-granularity differ.
///
/// Every change covers whole lines of the old text (line breaks included)
/// and carries whole lines of the new text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineDiffer {
    algorithm: DiffAlgorithm,
}

impl LineDiffer {
    /// A differ using `algorithm`.
    #[must_use]
    pub const fn new(algorithm: DiffAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The configured algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }
}

impl TextDiffer for LineDiffer {
    fn text_changes(
        &self,
        old: &SourceText,
        new: &SourceText,
    ) -> Result<Vec<TextChange>, DiffError> {
        if old == new {
            return Ok(Vec::new());
        }

        let diff = TextDiff::configure()
            .algorithm(self.algorithm.into())
            .diff_lines(old.as_str(), new.as_str());

        let old_slices = diff.old_slices();
        let new_slices = diff.new_slices();

        // offsets[i] is the byte offset of old line i; one extra entry for EOF.
        let mut offsets = Vec::with_capacity(old_slices.len() + 1);
        let mut at = 0;
        offsets.push(at);
        for line in old_slices {
            at += line.len();
            offsets.push(at);
        }
        if at != old.len() {
            return Err(DiffError::Failed {
                message: format!(
                    "line split covers {at} bytes of a {}-byte text",
                    old.len()
                ),
            });
        }

        let mut changes = Vec::new();
        for op in diff.ops() {
            if op.tag() == DiffTag::Equal {
                continue;
            }
            let old_range = op.old_range();
            let span = TextSpan::from_bounds(offsets[old_range.start], offsets[old_range.end]);
            let new_text: String = new_slices[op.new_range()].concat();
            changes.push(TextChange::new(span, new_text));
        }

        tracing::trace!(
            algorithm = %self.algorithm,
            changes = changes.len(),
            "computed line diff"
        );
        Ok(changes)
    }
}
