//! Merge statistics and the observer that receives them.
//!
//! Counters are gathered per group into a [`GroupStats`] owned by the call
//! stack, then folded into the session's [`SessionStats`]. Nothing here is
//! global; a session reports to whichever [`MergeObserver`] it was handed.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Counters for one linked group that needed a real merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    /// Documents sharing the group's path.
    pub linked_documents: usize,
    /// Distinct sibling contents folded together.
    pub documents_with_changes: usize,
    /// Sibling changes identical to an already accepted change.
    pub identical_diffs: usize,
    /// Changes accepted because nothing else touched their region.
    pub isolated_diffs: usize,
    /// Sibling changes overlapping a different accepted change.
    pub overlapping_distinct_diffs: usize,
    /// Of those, the ones replacing exactly the same span.
    pub overlapping_distinct_diffs_with_same_span: usize,
    /// Of those, the ones whose texts contain one another.
    pub overlapping_distinct_diffs_with_same_span_and_substring_relation: usize,
    /// Conflict comments inserted.
    pub inserted_merge_conflict_comments: usize,
    /// Conflict comments moved in front of a change covering their position.
    pub inserted_merge_conflict_comments_at_adjusted_location: usize,
}

/// Counters for a whole session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Groups with two or more distinct contents.
    pub groups_merged: usize,
    /// Groups whose siblings all agreed on one content.
    pub groups_propagated: usize,
    /// Groups skipped because a diff failed.
    pub groups_failed: usize,
    /// Sum of the per-group counters of merged groups.
    #[serde(flatten)]
    pub totals: GroupStats,
}

impl SessionStats {
    /// Add one merged group's counters.
    pub const fn absorb(&mut self, group: &GroupStats) {
        self.groups_merged += 1;
        let t = &mut self.totals;
        t.linked_documents += group.linked_documents;
        t.documents_with_changes += group.documents_with_changes;
        t.identical_diffs += group.identical_diffs;
        t.isolated_diffs += group.isolated_diffs;
        t.overlapping_distinct_diffs += group.overlapping_distinct_diffs;
        t.overlapping_distinct_diffs_with_same_span +=
            group.overlapping_distinct_diffs_with_same_span;
        t.overlapping_distinct_diffs_with_same_span_and_substring_relation +=
            group.overlapping_distinct_diffs_with_same_span_and_substring_relation;
        t.inserted_merge_conflict_comments += group.inserted_merge_conflict_comments;
        t.inserted_merge_conflict_comments_at_adjusted_location +=
            group.inserted_merge_conflict_comments_at_adjusted_location;
    }
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Receives statistics from a merge session.
///
/// A session calls `session_started` once, `group_merged` after each group
/// that needed a real merge, and `session_finished` once on success. A
/// session that fails or is cancelled never reaches `session_finished`.
pub trait MergeObserver {
    fn session_started(&self) {}

    fn group_merged(&self, _stats: &GroupStats) {}

    fn session_finished(&self, _stats: &SessionStats) {}
}

impl<T: MergeObserver + ?Sized> MergeObserver for &T {
    fn session_started(&self) {
        (**self).session_started();
    }

    fn group_merged(&self, stats: &GroupStats) {
        (**self).group_merged(stats);
    }

    fn session_finished(&self, stats: &SessionStats) {
        (**self).session_finished(stats);
    }
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {}

/// Logs the counters through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl MergeObserver for TracingObserver {
    fn group_merged(&self, stats: &GroupStats) {
        tracing::debug!(
            linked_documents = stats.linked_documents,
            documents_with_changes = stats.documents_with_changes,
            identical_diffs = stats.identical_diffs,
            isolated_diffs = stats.isolated_diffs,
            overlapping_distinct_diffs = stats.overlapping_distinct_diffs,
            inserted_comments = stats.inserted_merge_conflict_comments,
            "group stats"
        );
    }

    fn session_finished(&self, stats: &SessionStats) {
        let t = &stats.totals;
        tracing::info!(
            groups_merged = stats.groups_merged,
            groups_propagated = stats.groups_propagated,
            groups_failed = stats.groups_failed,
            identical_diffs = t.identical_diffs,
            isolated_diffs = t.isolated_diffs,
            overlapping_distinct_diffs = t.overlapping_distinct_diffs,
            overlapping_distinct_diffs_with_same_span = t.overlapping_distinct_diffs_with_same_span,
            overlapping_distinct_diffs_with_same_span_and_substring_relation =
                t.overlapping_distinct_diffs_with_same_span_and_substring_relation,
            inserted_merge_conflict_comments = t.inserted_merge_conflict_comments,
            inserted_merge_conflict_comments_at_adjusted_location =
                t.inserted_merge_conflict_comments_at_adjusted_location,
            "linked file merge finished"
        );
    }
}

/// Keeps what it was told, for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    inner: Mutex<Recorded>,
}

#[derive(Clone, Debug, Default)]
struct Recorded {
    sessions_started: usize,
    groups: Vec<GroupStats>,
    last_session: Option<SessionStats>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many sessions have started.
    pub fn sessions_started(&self) -> usize {
        self.recorded().sessions_started
    }

    /// Per-group counters, in the order groups were merged.
    pub fn groups(&self) -> Vec<GroupStats> {
        self.recorded().groups
    }

    /// Counters of the most recently finished session.
    pub fn last_session(&self) -> Option<SessionStats> {
        self.recorded().last_session
    }

    fn recorded(&self) -> Recorded {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut Recorded)) {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl MergeObserver for RecordingObserver {
    fn session_started(&self) {
        self.update(|r| {
            r.sessions_started += 1;
            r.groups.clear();
        });
    }

    fn group_merged(&self, stats: &GroupStats) {
        self.update(|r| r.groups.push(*stats));
    }

    fn session_finished(&self, stats: &SessionStats) {
        self.update(|r| r.last_session = Some(*stats));
    }
}
