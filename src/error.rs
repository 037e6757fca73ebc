//! Error types for linked-file merging.
//!
//! [`MergeError`] is returned by a merge session. Genuine content conflicts
//! are never errors: they end up as conflict comments in the merged text.
//! What does surface here is either a contract violation by a collaborator
//! (malformed diff output, a changed document without a file path) or an
//! internal-logic failure, plus cancellation.
//!
//! [`SolutionError`] covers building and updating [`Solution`] snapshots.
//!
//! [`Solution`]: crate::model::solution::Solution

use std::path::PathBuf;

use linkmerge_text::{DiffError, TextError};
use thiserror::Error;

use crate::model::types::{DocumentId, ProjectId};

/// Errors from a linked-file merge session.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The differ returned changes that are unsorted, overlapping, or out of
    /// bounds for the document they describe.
    #[error("differ returned malformed changes for document `{document}`: {source}")]
    MalformedChanges {
        /// The document whose diff was malformed.
        document: DocumentId,
        /// What was wrong with the change list.
        #[source]
        source: TextError,
    },

    /// The differ failed for one document.
    ///
    /// A session never returns this variant: it aborts only the affected
    /// group, which is reported as a [`GroupFailure`](crate::merge::types::GroupFailure).
    #[error("could not diff document `{document}`: {source}")]
    Diff {
        /// The document that could not be diffed.
        document: DocumentId,
        /// The differ's error.
        #[source]
        source: DiffError,
    },

    /// A changed document with linked siblings has no file path.
    #[error("changed document `{document}` has no file path")]
    MissingFilePath {
        /// The document without a path.
        document: DocumentId,
    },

    /// A document expected in a solution snapshot is missing.
    #[error("document `{document}` not found in the {snapshot} solution")]
    DocumentNotFound {
        /// The missing document.
        document: DocumentId,
        /// Which snapshot was searched (`"old"` or `"new"`).
        snapshot: &'static str,
    },

    /// A group with fewer than two distinct contents reached the merge path.
    #[error("cannot merge {} with only {count} distinct content(s)", path.display())]
    DegenerateGroup {
        /// The group's file path.
        path: PathBuf,
        /// Number of distinct contents in the group.
        count: usize,
    },

    /// The accepted changes of a group could not be applied to its baseline.
    #[error("failed to apply merged changes to {}: {source}", path.display())]
    ApplyChanges {
        /// The group's file path.
        path: PathBuf,
        /// Why application failed.
        #[source]
        source: TextError,
    },

    /// Writing the merged text into the solution failed.
    #[error(transparent)]
    Solution(#[from] SolutionError),

    /// The session was cancelled.
    #[error("merge session cancelled")]
    Cancelled,
}

/// Errors from building or updating a solution snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SolutionError {
    /// A project with this id already exists.
    #[error("project `{project}` already exists")]
    DuplicateProject {
        /// The duplicated project.
        project: ProjectId,
    },

    /// A document with this id already exists.
    #[error("document `{document}` already exists")]
    DuplicateDocument {
        /// The duplicated document.
        document: DocumentId,
    },

    /// A document refers to a project that is not in the solution.
    #[error("document `{document}` refers to unknown project `{project}`")]
    UnknownProject {
        /// The document being added.
        document: DocumentId,
        /// The project it refers to.
        project: ProjectId,
    },

    /// The document is not in the solution.
    #[error("document `{document}` not found")]
    DocumentNotFound {
        /// The missing document.
        document: DocumentId,
    },
}
