//! Linked-file merging.
//!
//! A file included into several projects exists once per project in a
//! [`Solution`](model::solution::Solution). When those copies are edited
//! independently, [`LinkedFileMergeSession`](merge::LinkedFileMergeSession)
//! reconciles them into one text, annotating regions where the edits
//! disagree with conflict comments.
//!
//! Text primitives (spans, changes, source text, diffing) live in the
//! `linkmerge-text` crate and are re-exported as [`text`].

pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod telemetry;

pub use error::{MergeError, SolutionError};
pub use linkmerge_text as text;
