//! Identifier types for projects and documents.
//!
//! Both identifiers are validated strings. They are opaque to the merge
//! engine apart from ordering: siblings in a linked group are folded in
//! ascending [`DocumentId`] order, so the ordering is part of the merge's
//! determinism contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Shared validation for identifier newtypes.
fn validate_identifier(kind: ErrorKind, s: &str, max_len: usize) -> Result<(), ValidationError> {
    let err = |reason: String| ValidationError {
        kind: kind.clone(),
        value: s.to_owned(),
        reason,
    };
    if s.is_empty() {
        return Err(err("identifier must not be empty".to_owned()));
    }
    if s.len() > max_len {
        return Err(err(format!(
            "identifier must be at most {max_len} bytes, got {}",
            s.len()
        )));
    }
    if s.trim() != s {
        return Err(err(
            "identifier must not start or end with whitespace".to_owned(),
        ));
    }
    if s.chars().any(char::is_control) {
        return Err(err(
            "identifier must not contain control characters".to_owned(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ProjectId
// ---------------------------------------------------------------------------

/// A validated project identifier.
///
/// Projects are the build contexts a linked file is included into, e.g.
/// `app (net8.0)` and `app (net48)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// The maximum length of a project identifier, in bytes.
    pub const MAX_LEN: usize = 256;

    /// Create a new `ProjectId`, validating format.
    ///
    /// # Errors
    /// Returns an error if the identifier is empty, too long, padded with
    /// whitespace, or contains control characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_identifier(ErrorKind::ProjectId, s, Self::MAX_LEN)?;
        Ok(Self(s.to_owned()))
    }

    /// Return the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_identifier(ErrorKind::ProjectId, &s, Self::MAX_LEN)?;
        Ok(Self(s))
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// DocumentId
// ---------------------------------------------------------------------------

/// A validated document identifier.
///
/// One physical file included into several projects is represented by
/// several documents, one per project, each with its own `DocumentId`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// The maximum length of a document identifier, in bytes.
    pub const MAX_LEN: usize = 1024;

    /// Create a new `DocumentId`, validating format.
    ///
    /// # Errors
    /// Returns an error if the identifier is empty, too long, padded with
    /// whitespace, or contains control characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_identifier(ErrorKind::DocumentId, s, Self::MAX_LEN)?;
        Ok(Self(s.to_owned()))
    }

    /// Return the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_identifier(ErrorKind::DocumentId, &s, Self::MAX_LEN)?;
        Ok(Self(s))
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// The kind of value that failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A [`ProjectId`] validation error.
    ProjectId,
    /// A [`DocumentId`] validation error.
    DocumentId,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectId => write!(f, "ProjectId"),
            Self::DocumentId => write!(f, "DocumentId"),
        }
    }
}

/// A validation error for identifier types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// What kind of value was being validated.
    pub kind: ErrorKind,
    /// The invalid value.
    pub value: String,
    /// Human-readable explanation.
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}: {}", self.kind, self.value, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
