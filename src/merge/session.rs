//! Session orchestration: reconcile every linked group of a change set.
//!
//! A session takes the old and new solution snapshots plus the per-project
//! list of changed documents. Changed documents that have linked siblings
//! are grouped by file path. Within a group, siblings with byte-identical
//! content collapse to one candidate. A group left with a single candidate
//! just propagates that content to every document at the path; a group with
//! several candidates is diffed against the shared baseline, folded, and
//! annotated with conflict comments where siblings disagree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use linkmerge_text::{TextChange, TextDiffer, TextError, TextSpan, normalize_changes};
use tracing::instrument;

use crate::error::MergeError;
use crate::model::solution::{Document, ProjectChanges, Solution};
use crate::model::types::DocumentId;

use super::cancel::CancellationToken;
use super::changes::ChangeFold;
use super::comment::conflict_comment_changes;
use super::formatter::ConflictCommentFormatter;
use super::interleave::interleave_comments;
use super::stats::{GroupStats, MergeObserver, NoopObserver, SessionStats};
use super::types::{GroupFailure, LinkedFileMergeResult, LinkedFileMergeSessionResult};

/// One merge run over an old/new solution pair.
pub struct LinkedFileMergeSession<'a> {
    old: &'a Solution,
    new: &'a Solution,
    differ: &'a dyn TextDiffer,
    formatter: &'a dyn ConflictCommentFormatter,
    observer: &'a dyn MergeObserver,
    cancellation: CancellationToken,
}

impl<'a> LinkedFileMergeSession<'a> {
    /// Create a session. `old` supplies the baseline of every group, `new`
    /// the siblings' current content.
    pub fn new(
        old: &'a Solution,
        new: &'a Solution,
        differ: &'a dyn TextDiffer,
        formatter: &'a dyn ConflictCommentFormatter,
    ) -> Self {
        Self {
            old,
            new,
            differ,
            formatter,
            observer: &NoopObserver,
            cancellation: CancellationToken::default(),
        }
    }

    /// Report statistics to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn MergeObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Stop early once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Merge the linked documents among `changes`.
    ///
    /// Documents missing from the new solution are skipped, as are documents
    /// that were not linked to anything in the old solution. Groups are
    /// processed in path order. A group whose diff fails keeps its
    /// documents' individual content and is reported in
    /// [`LinkedFileMergeSessionResult::failures`].
    ///
    /// # Errors
    /// Returns [`MergeError::MalformedChanges`] if the differ returns an
    /// invalid change list, [`MergeError::MissingFilePath`] if a linked
    /// document lost its path, [`MergeError::Cancelled`] on cancellation,
    /// and other [`MergeError`]s for inconsistent snapshots.
    #[instrument(name = "linked_merge_session", skip_all)]
    pub fn merge_diffs(
        &self,
        changes: &[ProjectChanges],
    ) -> Result<LinkedFileMergeSessionResult, MergeError> {
        self.observer.session_started();

        let groups = self.group_by_path(changes)?;
        let mut merged_solution = self.new.clone();
        let mut comment_spans: BTreeMap<DocumentId, Vec<TextSpan>> = BTreeMap::new();
        let mut merge_results = Vec::new();
        let mut failures = Vec::new();
        let mut stats = SessionStats::default();

        for (path, changed) in groups {
            self.check_cancelled()?;

            let candidates = self.distinct_candidates(&changed)?;
            let linked: Vec<DocumentId> = self.new.documents_at_path(&path).cloned().collect();

            if let [only] = candidates.as_slice() {
                tracing::debug!(
                    path = %path.display(),
                    documents = linked.len(),
                    "propagating single distinct content"
                );
                merged_solution = merged_solution.with_documents_text(&linked, &only.text)?;
                stats.groups_propagated += 1;
                continue;
            }

            let mut group_stats = GroupStats::default();
            let result = match self.merge_group(&path, &candidates, linked, &mut group_stats) {
                Ok(result) => result,
                Err(MergeError::Diff { document, source }) => {
                    tracing::warn!(
                        path = %path.display(),
                        document = %document,
                        error = %source,
                        "skipping linked group: diff failed"
                    );
                    failures.push(GroupFailure {
                        file_path: path,
                        document_id: document,
                        message: source.to_string(),
                    });
                    stats.groups_failed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            merged_solution =
                merged_solution.with_documents_text(&result.document_ids, &result.merged_text)?;
            if !result.merge_conflict_resolution_spans.is_empty() {
                for id in &result.document_ids {
                    comment_spans
                        .entry(id.clone())
                        .or_default()
                        .extend_from_slice(&result.merge_conflict_resolution_spans);
                }
            }
            self.observer.group_merged(&group_stats);
            stats.absorb(&group_stats);
            merge_results.push(result);
        }

        self.observer.session_finished(&stats);
        Ok(LinkedFileMergeSessionResult {
            merged_solution,
            merge_conflict_comment_spans: comment_spans,
            merge_results,
            failures,
            stats,
        })
    }

    /// Changed, linked documents grouped by their path in the new solution.
    /// Each group is sorted by id and free of duplicates.
    fn group_by_path(
        &self,
        changes: &[ProjectChanges],
    ) -> Result<BTreeMap<PathBuf, Vec<DocumentId>>, MergeError> {
        let mut groups: BTreeMap<PathBuf, BTreeSet<DocumentId>> = BTreeMap::new();
        for id in changes.iter().flat_map(|p| &p.changed_documents) {
            let Some(document) = self.new.document(id) else {
                continue;
            };
            if self.old.linked_document_ids(id).is_empty() {
                continue;
            }
            let path = document
                .file_path
                .clone()
                .ok_or_else(|| MergeError::MissingFilePath {
                    document: id.clone(),
                })?;
            groups.entry(path).or_default().insert(id.clone());
        }
        Ok(groups
            .into_iter()
            .map(|(path, ids)| (path, ids.into_iter().collect()))
            .collect())
    }

    /// The group's documents in id order, keeping only the first document of
    /// each distinct content.
    fn distinct_candidates(&self, ids: &[DocumentId]) -> Result<Vec<&'a Document>, MergeError> {
        let mut seen = BTreeSet::new();
        let mut candidates = Vec::with_capacity(ids.len());
        for id in ids {
            let document = self.new_document(id)?;
            if seen.insert(document.text.content_hash()) {
                candidates.push(document);
            }
        }
        Ok(candidates)
    }

    /// Merge a group with at least two distinct contents.
    #[instrument(name = "linked_merge_group", skip_all, fields(path = %path.display()))]
    fn merge_group(
        &self,
        path: &Path,
        candidates: &[&Document],
        linked: Vec<DocumentId>,
        stats: &mut GroupStats,
    ) -> Result<LinkedFileMergeResult, MergeError> {
        let [first, rest @ ..] = candidates else {
            return Err(MergeError::DegenerateGroup {
                path: path.to_path_buf(),
                count: 0,
            });
        };
        if rest.is_empty() {
            return Err(MergeError::DegenerateGroup {
                path: path.to_path_buf(),
                count: 1,
            });
        }
        stats.linked_documents = linked.len();
        stats.documents_with_changes = candidates.len();

        let baseline = self.old_document(&first.id)?.text.clone();
        let mut fold = ChangeFold::seed(self.sibling_changes(first)?);
        for sibling in rest {
            self.check_cancelled()?;
            let changes = self.sibling_changes(sibling)?;
            let project_name = self
                .new
                .project(&sibling.project_id)
                .map_or_else(|| sibling.project_id.as_str(), |p| p.name.as_str());
            fold.add_document(&changes, project_name, &sibling.id, stats);
        }
        let (merged, unmerged) = fold.into_parts();

        let apply_error = |source: TextError| MergeError::ApplyChanges {
            path: path.to_path_buf(),
            source,
        };
        let (merged_text, spans) = if unmerged.is_empty() {
            (baseline.with_changes(&merged).map_err(apply_error)?, Vec::new())
        } else {
            let mut comments: Vec<TextChange> = Vec::new();
            for document in &unmerged {
                comments.extend(
                    conflict_comment_changes(document, &baseline, self.formatter)
                        .map_err(apply_error)?,
                );
            }
            comments.sort_by_key(|c| c.span.start());
            let interleaved = interleave_comments(&merged, &comments, stats);
            let text = baseline
                .with_changes(&interleaved.changes)
                .map_err(apply_error)?;
            (text, interleaved.comment_spans)
        };

        tracing::info!(
            documents = linked.len(),
            distinct_contents = candidates.len(),
            unmerged_documents = unmerged.len(),
            comments = spans.len(),
            "merged linked documents"
        );
        Ok(LinkedFileMergeResult {
            file_path: path.to_path_buf(),
            document_ids: linked,
            merged_text,
            merge_conflict_resolution_spans: spans,
            unmerged_changes: unmerged,
        })
    }

    /// Diff one sibling's old content against its new content.
    fn sibling_changes(&self, sibling: &Document) -> Result<Vec<TextChange>, MergeError> {
        let old = &self.old_document(&sibling.id)?.text;
        let changes = self
            .differ
            .text_changes(old, &sibling.text)
            .map_err(|source| MergeError::Diff {
                document: sibling.id.clone(),
                source,
            })?;
        old.validate_changes(&changes)
            .map_err(|source| MergeError::MalformedChanges {
                document: sibling.id.clone(),
                source,
            })?;
        Ok(normalize_changes(changes))
    }

    fn old_document(&self, id: &DocumentId) -> Result<&'a Document, MergeError> {
        self.old.document(id).ok_or_else(|| MergeError::DocumentNotFound {
            document: id.clone(),
            snapshot: "old",
        })
    }

    fn new_document(&self, id: &DocumentId) -> Result<&'a Document, MergeError> {
        self.new.document(id).ok_or_else(|| MergeError::DocumentNotFound {
            document: id.clone(),
            snapshot: "new",
        })
    }

    fn check_cancelled(&self) -> Result<(), MergeError> {
        if self.cancellation.is_cancelled() {
            return Err(MergeError::Cancelled);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
