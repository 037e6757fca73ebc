//! Folding sibling diffs into one cumulative change list.
//!
//! All siblings of a linked group share one baseline text. The first
//! sibling's diff against it seeds the cumulative list; every further
//! sibling's diff is merged into it with a single left-to-right pass over
//! both sorted lists:
//!
//! - a cumulative change that ends at or before the sibling change's start
//!   is carried over, unless both are insertions at the same point;
//! - a sibling change that does not intersect the pending cumulative change
//!   is accepted;
//! - a sibling change identical to the pending cumulative change (same span,
//!   same text) is accepted once;
//! - anything else is a conflict: the sibling change is set aside as
//!   unmerged and the cumulative change stays in force.
//!
//! Conflicts are attributed to the sibling folded later. Whoever is folded
//! first wins every overlapping region, so the result depends on fold
//! order; callers fix that order (ascending document id).

use linkmerge_text::{TextChange, normalize_changes};

use crate::model::types::DocumentId;

use super::stats::GroupStats;
use super::types::UnmergedDocumentChanges;

/// Running state of the fold over one linked group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeFold {
    cumulative: Vec<TextChange>,
    unmerged: Vec<UnmergedDocumentChanges>,
}

impl ChangeFold {
    /// Start a fold from the first sibling's changes against the baseline.
    ///
    /// `changes` must be sorted and non-overlapping.
    #[must_use]
    pub fn seed(changes: Vec<TextChange>) -> Self {
        Self {
            cumulative: normalize_changes(changes),
            unmerged: Vec::new(),
        }
    }

    /// Changes accepted so far, normalized.
    #[must_use]
    pub fn cumulative(&self) -> &[TextChange] {
        &self.cumulative
    }

    /// Unmerged changes recorded so far, one entry per conflicting sibling.
    #[must_use]
    pub fn unmerged(&self) -> &[UnmergedDocumentChanges] {
        &self.unmerged
    }

    /// Returns `true` if no sibling has conflicted yet.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unmerged.is_empty()
    }

    /// Merge one more sibling's changes into the fold.
    ///
    /// `changes` must be sorted and non-overlapping, relative to the same
    /// baseline as the seed.
    pub fn add_document(
        &mut self,
        changes: &[TextChange],
        project_name: &str,
        document_id: &DocumentId,
        stats: &mut GroupStats,
    ) {
        let merge = merge_document_changes(&self.cumulative, changes, stats);
        tracing::debug!(
            document = %document_id,
            accepted = merge.merged.len(),
            unmerged = merge.unmerged.len(),
            "folded sibling changes"
        );
        if !merge.unmerged.is_empty() {
            self.unmerged.push(UnmergedDocumentChanges::new(
                merge.unmerged,
                project_name,
                document_id.clone(),
            ));
        }
        self.cumulative = merge.merged;
    }

    /// Consume the fold.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TextChange>, Vec<UnmergedDocumentChanges>) {
        (self.cumulative, self.unmerged)
    }
}

/// Result of merging one sibling's changes into the cumulative list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentMerge {
    /// The new cumulative list, normalized.
    pub merged: Vec<TextChange>,
    /// The sibling's changes that conflicted, in order.
    pub unmerged: Vec<TextChange>,
}

/// Merge `changes` into `cumulative`.
///
/// Both inputs must be sorted by start offset and non-overlapping. See the
/// module docs for the classification rules.
#[must_use]
pub fn merge_document_changes(
    cumulative: &[TextChange],
    changes: &[TextChange],
    stats: &mut GroupStats,
) -> DocumentMerge {
    let mut merged = Vec::with_capacity(cumulative.len() + changes.len());
    let mut unmerged = Vec::new();
    let mut index = 0;

    for change in changes {
        while index < cumulative.len() && ends_before(&cumulative[index], change) {
            merged.push(cumulative[index].clone());
            index += 1;
            stats.isolated_diffs += 1;
        }

        let Some(existing) = cumulative.get(index) else {
            merged.push(change.clone());
            stats.isolated_diffs += 1;
            continue;
        };

        if !existing.span.intersects_with(change.span) {
            merged.push(change.clone());
            stats.isolated_diffs += 1;
        } else if existing == change {
            merged.push(change.clone());
            index += 1;
            stats.identical_diffs += 1;
        } else {
            stats.overlapping_distinct_diffs += 1;
            if existing.span == change.span {
                stats.overlapping_distinct_diffs_with_same_span += 1;
                if existing.new_text.contains(&change.new_text)
                    || change.new_text.contains(&existing.new_text)
                {
                    stats.overlapping_distinct_diffs_with_same_span_and_substring_relation += 1;
                }
            }
            unmerged.push(change.clone());
        }
    }

    for existing in &cumulative[index..] {
        merged.push(existing.clone());
        stats.isolated_diffs += 1;
    }

    DocumentMerge {
        merged: normalize_changes(merged),
        unmerged,
    }
}

/// Whether `existing` lies entirely before `change` and cannot collide with it.
///
/// A change that merely touches `change.start()` is done with, except an
/// insertion at the very point where `change` also inserts.
fn ends_before(existing: &TextChange, change: &TextChange) -> bool {
    existing.span.end() <= change.span.start() && existing.span != change.span
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
