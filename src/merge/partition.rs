//! Clustering of unmerged changes by line proximity.
//!
//! Groups one document's unmerged changes into clusters so that a single
//! conflict comment covers edits that sit close together. Line numbers come
//! from the baseline text the changes' spans refer to.
//!
//! # Rule
//!
//! A partition tracks the line holding the end of its last change. The next
//! change joins the partition if it starts fewer than two lines after that;
//! otherwise it opens a new partition.
//!
//! ```text
//! line 2: changed  ─┐
//! line 3: changed   ├─ one partition (adjacent)
//! line 4            │
//! line 5: changed  ─┘  (one untouched line in between still fuses)
//! line 6
//! line 7
//! line 8: changed  ──  new partition
//! ```
//!
//! Line-granular changes end at the start of the following line, which is
//! why a single untouched line between two edits still fuses them.

use linkmerge_text::{SourceText, TextChange};

/// Split `changes` into clusters of nearby edits.
///
/// `changes` must be sorted by start offset with spans inside `text`. Each
/// returned slice is a contiguous, non-empty run of the input; concatenating
/// them yields `changes` again. Empty input yields no partitions.
///
/// # Panics
/// Panics if a span reaches past the end of `text`.
#[must_use]
pub fn partition_changes<'a>(changes: &'a [TextChange], text: &SourceText) -> Vec<&'a [TextChange]> {
    let Some(first) = changes.first() else {
        return Vec::new();
    };

    let mut partitions = Vec::new();
    let mut partition_start = 0;
    let mut end_line = text.line_index_at(first.span.end());

    for (i, change) in changes.iter().enumerate().skip(1) {
        let start_line = text.line_index_at(change.span.start());
        if start_line >= end_line + 2 {
            partitions.push(&changes[partition_start..i]);
            partition_start = i;
        }
        end_line = text.line_index_at(change.span.end());
    }
    partitions.push(&changes[partition_start..]);
    partitions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
