//! Value types flowing through the linked-file merge pipeline.
//!
//! Everything here is built once and read afterwards: the fold produces
//! [`UnmergedDocumentChanges`], each merged group produces a
//! [`LinkedFileMergeResult`], and a session returns one
//! [`LinkedFileMergeSessionResult`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use linkmerge_text::{SourceText, TextChange, TextSpan};
use serde::Serialize;

use crate::model::solution::Solution;
use crate::model::types::DocumentId;

use super::stats::SessionStats;

// ---------------------------------------------------------------------------
// UnmergedDocumentChanges
// ---------------------------------------------------------------------------

/// The changes of one sibling document that conflicted with edits already
/// accepted from earlier siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnmergedDocumentChanges {
    /// Conflicting changes, sorted by start offset, relative to the baseline.
    pub changes: Vec<TextChange>,
    /// Display name of the sibling's project.
    pub project_name: String,
    /// The sibling document.
    pub document_id: DocumentId,
}

impl UnmergedDocumentChanges {
    /// Bundle the conflicting changes of one document.
    pub fn new(
        changes: Vec<TextChange>,
        project_name: impl Into<String>,
        document_id: DocumentId,
    ) -> Self {
        Self {
            changes,
            project_name: project_name.into(),
            document_id,
        }
    }
}

// ---------------------------------------------------------------------------
// LinkedFileMergeResult
// ---------------------------------------------------------------------------

/// Outcome of merging one group of linked documents with diverging content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedFileMergeResult {
    /// The group's file path.
    pub file_path: PathBuf,
    /// Every document sharing the path; all of them receive `merged_text`.
    pub document_ids: Vec<DocumentId>,
    /// The reconciled text.
    pub merged_text: SourceText,
    /// Where conflict comments were inserted, in `merged_text` coordinates.
    pub merge_conflict_resolution_spans: Vec<TextSpan>,
    /// Sibling changes that could not be merged, per document.
    pub unmerged_changes: Vec<UnmergedDocumentChanges>,
}

impl LinkedFileMergeResult {
    /// Returns `true` if any sibling change was left unmerged.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.unmerged_changes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GroupFailure
// ---------------------------------------------------------------------------

/// A group that was skipped because one of its documents could not be
/// diffed. Its documents keep their individual, unmerged content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupFailure {
    /// The group's file path.
    pub file_path: PathBuf,
    /// The document whose diff failed.
    pub document_id: DocumentId,
    /// The differ's error message.
    pub message: String,
}

// ---------------------------------------------------------------------------
// LinkedFileMergeSessionResult
// ---------------------------------------------------------------------------

/// Everything a merge session produces.
#[derive(Clone, Debug)]
pub struct LinkedFileMergeSessionResult {
    /// The new solution with every linked group reconciled.
    pub merged_solution: Solution,
    /// Inserted conflict comment spans per document, for highlighting. Every
    /// document of a group with comments has an entry.
    pub merge_conflict_comment_spans: BTreeMap<DocumentId, Vec<TextSpan>>,
    /// One entry per group that needed a real merge, in path order.
    pub merge_results: Vec<LinkedFileMergeResult>,
    /// Groups skipped because a diff failed.
    pub failures: Vec<GroupFailure>,
    /// Counters gathered during the session.
    pub stats: SessionStats,
}

impl LinkedFileMergeSessionResult {
    /// Returns `true` if any group set sibling changes aside as unmerged.
    ///
    /// This holds even when the formatter produced no comment for them; check
    /// [`merge_conflict_comment_spans`](Self::merge_conflict_comment_spans)
    /// for inserted comments.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.merge_results
            .iter()
            .any(LinkedFileMergeResult::has_conflicts)
    }
}
