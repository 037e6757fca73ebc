//! Conflict comment construction.
//!
//! For every partition of a document's unmerged changes, rebuild the old and
//! new text of the affected lines from the baseline and ask the formatter
//! for a comment describing them. Each comment becomes a zero-width
//! insertion at the start of the partition's first line.

use linkmerge_text::{SourceText, TextChange, TextError, TextSpan};

use super::formatter::ConflictCommentFormatter;
use super::partition::partition_changes;
use super::types::UnmergedDocumentChanges;

/// Header line naming the project whose change could not be merged.
#[must_use]
pub fn unmerged_change_header(project_name: &str) -> String {
    format!("Unmerged change from project {project_name}")
}

/// Comment insertions for one document's unmerged changes.
///
/// `baseline` is the shared original text the changes' spans refer to. The
/// result is sorted by position; partitions for which the formatter returns
/// `None` contribute nothing.
///
/// # Errors
/// Returns [`TextError`] if the changes do not fit `baseline`.
pub fn conflict_comment_changes(
    unmerged: &UnmergedDocumentChanges,
    baseline: &SourceText,
    formatter: &dyn ConflictCommentFormatter,
) -> Result<Vec<TextChange>, TextError> {
    baseline.validate_changes(&unmerged.changes)?;

    let header = unmerged_change_header(&unmerged.project_name);
    let mut comments = Vec::new();
    for partition in partition_changes(&unmerged.changes, baseline) {
        let region = affected_region(partition, baseline);
        let old_text = baseline.sub_text(region)?;
        let rebased: Vec<TextChange> = partition
            .iter()
            .map(|c| {
                TextChange::new(
                    TextSpan::from_bounds(
                        c.span.start() - region.start(),
                        c.span.end() - region.start(),
                    ),
                    c.new_text.clone(),
                )
            })
            .collect();
        let new_text = old_text.with_changes(&rebased)?;

        let before = trim_blank_lines(&old_text);
        let after = trim_blank_lines(&new_text);
        if let Some(comment) =
            formatter.format_conflict_comment(&header, before.as_deref(), after.as_deref())
        {
            tracing::debug!(
                document = %unmerged.document_id,
                position = region.start(),
                changes = partition.len(),
                "conflict comment built"
            );
            comments.push(TextChange::insert(region.start(), comment));
        }
    }
    Ok(comments)
}

/// Whole lines touched by a partition, line break of the last one included.
///
/// A non-empty span ending right after a line break belongs to the line of
/// its last byte, so a whole-line change does not drag the following,
/// untouched line into the region.
fn affected_region(partition: &[TextChange], baseline: &SourceText) -> TextSpan {
    let (Some(first), Some(last)) = (partition.first(), partition.last()) else {
        return TextSpan::at(0);
    };
    let start = baseline.line_at(first.span.start()).start;
    let last_byte = if last.span.is_empty() {
        last.span.end()
    } else {
        last.span.end() - 1
    };
    let end = baseline.line_at(last_byte).end_including_break;
    TextSpan::from_bounds(start, end)
}

/// The text between the first and last line containing a non-whitespace
/// character, without the final line break. `None` if every line is blank.
#[must_use]
pub fn trim_blank_lines(text: &SourceText) -> Option<String> {
    let is_blank = |line: &linkmerge_text::TextLine| {
        text.slice(line.span())
            .map_or(true, |s| s.chars().all(char::is_whitespace))
    };
    let first = text.lines().find(|l| !is_blank(l))?;
    let last = text
        .lines()
        .filter(|l| !is_blank(l))
        .last()
        .unwrap_or(first);
    text.slice(TextSpan::from_bounds(first.start, last.end))
        .ok()
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
