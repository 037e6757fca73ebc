//! Linked-file merge engine.
//!
//! Reconciles independent edits to documents that share a file path across
//! projects. The pipeline for one group of linked documents:
//!
//! - **changes**: fold every sibling's diff against the shared baseline into
//!   one cumulative change list, setting aside changes that conflict.
//! - **partition**: cluster each sibling's conflicting changes by line
//!   proximity.
//! - **comment**: turn each cluster into a conflict comment insertion.
//! - **interleave**: combine accepted changes and comment insertions into
//!   one list and locate the comments in the merged text.
//!
//! [`session`] drives this over a whole change set.
//!
//! # Determinism
//!
//! The same inputs always produce the same merged text:
//!
//! - Groups are processed in path order.
//! - Siblings within a group are folded in document id order, after
//!   dropping siblings whose content duplicates an earlier one.
//! - A conflict always resolves in favour of the sibling folded first.

pub mod cancel;
pub mod changes;
pub mod comment;
pub mod formatter;
pub mod interleave;
pub mod partition;
pub mod session;
pub mod stats;
pub mod types;

pub use cancel::CancellationToken;
pub use formatter::{CommentFormatter, CommentStyle, CommentStyleKind, ConflictCommentFormatter};
pub use session::LinkedFileMergeSession;
pub use stats::{GroupStats, MergeObserver, NoopObserver, RecordingObserver, SessionStats, TracingObserver};
pub use types::{
    GroupFailure, LinkedFileMergeResult, LinkedFileMergeSessionResult, UnmergedDocumentChanges,
};
