//! Text primitives for linkmerge.
//!
//! Everything the linked-file merge engine needs to know about text lives
//! here, so the engine itself only ever talks about spans and changes.
//!
//! # Crate layout
//!
//! - [`span`]: [`TextSpan`], a half-open byte range.
//! - [`change`]: [`TextChange`] plus normalisation and validation of
//!   ordered change lists.
//! - [`source_text`]: [`SourceText`], immutable text with a line index.
//! - [`hash`]: [`ContentHash`], a SHA-256 digest used for equality
//!   short-circuits.
//! - [`differ`]: the [`TextDiffer`] trait and the [`LineDiffer`]
//!   implementation backed by `similar`.
//! - [`error`]: [`TextError`] and [`DiffError`].

pub mod change;
pub mod differ;
pub mod error;
pub mod hash;
pub mod source_text;
pub mod span;

pub use change::{TextChange, normalize_changes, validate_changes};
pub use differ::{DiffAlgorithm, LineDiffer, TextDiffer};
pub use error::{DiffError, TextError};
pub use hash::ContentHash;
pub use source_text::{SourceText, TextLine};
pub use span::TextSpan;
