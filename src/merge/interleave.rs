//! Interleaving conflict comments with accepted changes.
//!
//! Both lists are expressed against the same baseline. The output is one
//! change list that applies cleanly to the baseline, together with the
//! final-text span of every inserted comment.

use linkmerge_text::{TextChange, TextSpan, normalize_changes};

use super::stats::GroupStats;

/// Accepted changes and comment insertions combined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interleaved {
    /// Normalized change list to apply to the baseline.
    pub changes: Vec<TextChange>,
    /// Where each comment ends up in the merged text, in insertion order.
    pub comment_spans: Vec<TextSpan>,
}

/// Combine `merged` with the comment insertions in `comments`.
///
/// Both lists must be sorted by start offset; `comments` must contain only
/// insertions. A comment whose position falls strictly inside an accepted
/// change is moved to that change's start so the change stays intact.
#[must_use]
pub fn interleave_comments(
    merged: &[TextChange],
    comments: &[TextChange],
    stats: &mut GroupStats,
) -> Interleaved {
    debug_assert!(comments.iter().all(TextChange::is_insertion));

    let mut changes = Vec::with_capacity(merged.len() + comments.len());
    let mut comment_spans = Vec::with_capacity(comments.len());
    let mut position_delta: isize = 0;
    let mut pending = comments.iter().peekable();

    for change in merged {
        while let Some(comment) = pending.next_if(|c| c.span.end() <= change.span.start()) {
            let at = comment.span.start();
            emit_comment(at, comment, &mut changes, &mut comment_spans, &mut position_delta);
            stats.inserted_merge_conflict_comments += 1;
        }

        while let Some(comment) = pending.next_if(|c| c.span.start() < change.span.end()) {
            tracing::debug!(
                from = comment.span.start(),
                to = change.span.start(),
                "moved conflict comment in front of accepted change"
            );
            let at = change.span.start();
            emit_comment(at, comment, &mut changes, &mut comment_spans, &mut position_delta);
            stats.inserted_merge_conflict_comments += 1;
            stats.inserted_merge_conflict_comments_at_adjusted_location += 1;
        }

        changes.push(change.clone());
        position_delta += change.len_delta();
    }

    for comment in pending {
        let at = comment.span.start();
        emit_comment(at, comment, &mut changes, &mut comment_spans, &mut position_delta);
        stats.inserted_merge_conflict_comments += 1;
    }

    Interleaved {
        changes: normalize_changes(changes),
        comment_spans,
    }
}

/// Emit `comment` as an insertion at `position` and record its final span.
fn emit_comment(
    position: usize,
    comment: &TextChange,
    changes: &mut Vec<TextChange>,
    comment_spans: &mut Vec<TextSpan>,
    position_delta: &mut isize,
) {
    let start = position.saturating_add_signed(*position_delta);
    comment_spans.push(TextSpan::new(start, comment.new_text.len()));
    let inserted = TextChange::insert(position, comment.new_text.clone());
    *position_delta += inserted.len_delta();
    changes.push(inserted);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
