//! Conflict comment formatting.
//!
//! The merge engine knows nothing about comment syntax. It hands a header
//! and the before/after snippets of a conflicting region to a
//! [`ConflictCommentFormatter`] and inserts whatever string comes back.

use std::fmt::Write as _;

use serde::Deserialize;

/// Turns a conflict description into comment text.
pub trait ConflictCommentFormatter {
    /// Format a comment for one conflicting region.
    ///
    /// `before` and `after` are the region's old and new text with blank
    /// leading and trailing lines removed; `None` means that side is blank.
    /// Returning `None` suppresses the comment for this region.
    ///
    /// The returned string is inserted at the start of a line and should end
    /// with a line break.
    fn format_conflict_comment(
        &self,
        header: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Option<String>;
}

impl<F> ConflictCommentFormatter for F
where
    F: Fn(&str, Option<&str>, Option<&str>) -> Option<String>,
{
    fn format_conflict_comment(
        &self,
        header: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Option<String> {
        self(header, before, after)
    }
}

/// Comment syntax used by [`CommentFormatter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentStyle {
    /// A block comment spanning all lines, e.g. `/* ... */`.
    Block {
        /// Opening delimiter.
        open: String,
        /// Closing delimiter.
        close: String,
    },
    /// One line comment per line, e.g. `// ...`.
    Line {
        /// Prefix put in front of every line.
        prefix: String,
    },
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self::Block {
            open: "/*".to_owned(),
            close: "*/".to_owned(),
        }
    }
}

/// Which [`CommentStyle`] a configuration selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentStyleKind {
    /// Block comments.
    #[default]
    Block,
    /// Line comments.
    Line,
}

/// The built-in formatter.
///
/// Produces a comment of the form
///
/// ```text
/// /* Unmerged change from project App (net48)
/// Before:
///     old code
/// After:
///     new code
/// */
/// ```
///
/// with `Added:` or `Removed:` in place of the two sections when one side is
/// blank, and no comment at all when both are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentFormatter {
    style: CommentStyle,
    enabled: bool,
}

impl CommentFormatter {
    /// A formatter emitting comments in `style`.
    #[must_use]
    pub const fn new(style: CommentStyle) -> Self {
        Self {
            style,
            enabled: true,
        }
    }

    /// A formatter that never emits a comment.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            style: CommentStyle::default(),
            enabled: false,
        }
    }

    /// The configured style.
    #[must_use]
    pub const fn style(&self) -> &CommentStyle {
        &self.style
    }

    fn render(&self, lines: &[&str]) -> String {
        let mut out = String::new();
        match &self.style {
            CommentStyle::Block { open, close } => {
                for (i, line) in lines.iter().enumerate() {
                    if i == 0 {
                        let _ = writeln!(out, "{open} {line}");
                    } else {
                        let _ = writeln!(out, "{line}");
                    }
                }
                let _ = writeln!(out, "{close}");
            }
            CommentStyle::Line { prefix } => {
                for line in lines {
                    if line.is_empty() {
                        let _ = writeln!(out, "{prefix}");
                    } else {
                        let _ = writeln!(out, "{prefix} {line}");
                    }
                }
            }
        }
        out
    }
}

impl Default for CommentFormatter {
    fn default() -> Self {
        Self::new(CommentStyle::default())
    }
}

impl ConflictCommentFormatter for CommentFormatter {
    fn format_conflict_comment(
        &self,
        header: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let mut lines = vec![header];
        match (before, after) {
            (None, None) => return None,
            (None, Some(added)) => {
                lines.push("Added:");
                lines.extend(added.lines());
            }
            (Some(removed), None) => {
                lines.push("Removed:");
                lines.extend(removed.lines());
            }
            (Some(before), Some(after)) => {
                lines.push("Before:");
                lines.extend(before.lines());
                lines.push("After:");
                lines.extend(after.lines());
            }
        }
        Some(self.render(&lines))
    }
}
