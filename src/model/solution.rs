//! Immutable solution snapshots.
//!
//! A [`Solution`] holds projects and their documents. Documents that share a
//! file path are *linked*: they are the same physical file compiled into
//! different projects, and a merge session keeps their text identical.
//!
//! Snapshots are value types. Updating a document's text returns a new
//! snapshot; document text is reference-counted so this is cheap.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use linkmerge_text::SourceText;

use super::types::{DocumentId, ProjectId};
use crate::error::SolutionError;

// ---------------------------------------------------------------------------
// Project / Document
// ---------------------------------------------------------------------------

/// A build context that includes documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    /// Project identity.
    pub id: ProjectId,
    /// Display name, used in conflict comments.
    pub name: String,
}

impl Project {
    /// Create a project.
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One document of one project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Document identity.
    pub id: DocumentId,
    /// The project this document belongs to.
    pub project_id: ProjectId,
    /// Path of the underlying file. `None` for documents that exist only in
    /// memory; those are never linked.
    pub file_path: Option<PathBuf>,
    /// Current content.
    pub text: SourceText,
}

impl Document {
    /// Create a document backed by a file.
    pub fn new(
        id: DocumentId,
        project_id: ProjectId,
        file_path: impl Into<PathBuf>,
        text: impl Into<SourceText>,
    ) -> Self {
        Self {
            id,
            project_id,
            file_path: Some(file_path.into()),
            text: text.into(),
        }
    }

    /// Create a document with no file path.
    pub fn in_memory(id: DocumentId, project_id: ProjectId, text: impl Into<SourceText>) -> Self {
        Self {
            id,
            project_id,
            file_path: None,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectChanges
// ---------------------------------------------------------------------------

/// The documents of one project whose text differs between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectChanges {
    /// The project.
    pub project_id: ProjectId,
    /// Changed documents, sorted by id.
    pub changed_documents: Vec<DocumentId>,
}

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

/// A snapshot of projects and documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    projects: BTreeMap<ProjectId, Project>,
    documents: BTreeMap<DocumentId, Document>,
    by_path: BTreeMap<PathBuf, BTreeSet<DocumentId>>,
}

impl Solution {
    /// An empty solution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project.
    ///
    /// # Errors
    /// Returns [`SolutionError::DuplicateProject`] if the id is taken.
    pub fn add_project(&mut self, project: Project) -> Result<(), SolutionError> {
        if self.projects.contains_key(&project.id) {
            return Err(SolutionError::DuplicateProject {
                project: project.id,
            });
        }
        self.projects.insert(project.id.clone(), project);
        Ok(())
    }

    /// Add a document to an existing project.
    ///
    /// # Errors
    /// Returns an error if the document id is taken or its project is unknown.
    pub fn add_document(&mut self, document: Document) -> Result<(), SolutionError> {
        if self.documents.contains_key(&document.id) {
            return Err(SolutionError::DuplicateDocument {
                document: document.id,
            });
        }
        if !self.projects.contains_key(&document.project_id) {
            return Err(SolutionError::UnknownProject {
                document: document.id,
                project: document.project_id,
            });
        }
        if let Some(path) = &document.file_path {
            self.by_path
                .entry(path.clone())
                .or_default()
                .insert(document.id.clone());
        }
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Look up a project.
    #[must_use]
    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Look up a document.
    #[must_use]
    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    /// All projects in id order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    /// All documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Every document with this file path, in id order.
    pub fn documents_at_path<'a>(&'a self, path: &Path) -> impl Iterator<Item = &'a DocumentId> {
        self.by_path.get(path).into_iter().flatten()
    }

    /// The other documents sharing `id`'s file path (excluding `id` itself).
    ///
    /// Empty for unknown documents and documents without a path.
    #[must_use]
    pub fn linked_document_ids(&self, id: &DocumentId) -> Vec<DocumentId> {
        self.related_document_ids(id)
            .into_iter()
            .filter(|other| other != id)
            .collect()
    }

    /// `id` plus every document linked to it, in id order.
    ///
    /// A document without a path is related only to itself; an unknown
    /// document has no related documents.
    #[must_use]
    pub fn related_document_ids(&self, id: &DocumentId) -> Vec<DocumentId> {
        let Some(document) = self.documents.get(id) else {
            return Vec::new();
        };
        match &document.file_path {
            Some(path) => self.documents_at_path(path).cloned().collect(),
            None => vec![id.clone()],
        }
    }

    /// A new snapshot with `id`'s text replaced.
    ///
    /// # Errors
    /// Returns [`SolutionError::DocumentNotFound`] for unknown documents.
    pub fn with_document_text(
        &self,
        id: &DocumentId,
        text: SourceText,
    ) -> Result<Self, SolutionError> {
        self.with_documents_text(std::slice::from_ref(id), &text)
    }

    /// A new snapshot with the text of every document in `ids` replaced.
    ///
    /// # Errors
    /// Returns [`SolutionError::DocumentNotFound`] if any id is unknown; the
    /// original snapshot is left untouched either way.
    pub fn with_documents_text(
        &self,
        ids: &[DocumentId],
        text: &SourceText,
    ) -> Result<Self, SolutionError> {
        let mut updated = self.clone();
        for id in ids {
            let document =
                updated
                    .documents
                    .get_mut(id)
                    .ok_or_else(|| SolutionError::DocumentNotFound {
                        document: id.clone(),
                    })?;
            document.text = text.clone();
        }
        Ok(updated)
    }

    /// Documents whose text differs between `self` (old) and `new`, grouped
    /// per project of `new`.
    ///
    /// Documents added or removed between the snapshots are not reported.
    /// Projects without changes are omitted.
    #[must_use]
    pub fn changed_documents(&self, new: &Self) -> Vec<ProjectChanges> {
        let mut per_project: BTreeMap<ProjectId, Vec<DocumentId>> = BTreeMap::new();
        for document in new.documents() {
            let Some(old) = self.documents.get(&document.id) else {
                continue;
            };
            if old.text != document.text {
                per_project
                    .entry(document.project_id.clone())
                    .or_default()
                    .push(document.id.clone());
            }
        }
        per_project
            .into_iter()
            .map(|(project_id, changed_documents)| ProjectChanges {
                project_id,
                changed_documents,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ProjectId {
        ProjectId::new(s).unwrap()
    }

    fn did(s: &str) -> DocumentId {
        DocumentId::new(s).unwrap()
    }

    /// Two projects linking `shared.cs`, plus one unlinked file.
    fn linked_solution() -> Solution {
        let mut solution = Solution::new();
        solution.add_project(Project::new(pid("p1"), "App1")).unwrap();
        solution.add_project(Project::new(pid("p2"), "App2")).unwrap();
        solution
            .add_document(Document::new(did("p1/shared"), pid("p1"), "src/shared.cs", "A\n"))
            .unwrap();
        solution
            .add_document(Document::new(did("p2/shared"), pid("p2"), "src/shared.cs", "A\n"))
            .unwrap();
        solution
            .add_document(Document::new(did("p1/only"), pid("p1"), "src/only.cs", "B\n"))
            .unwrap();
        solution
    }

    #[test]
    fn linked_ids_exclude_self() {
        let solution = linked_solution();
        assert_eq!(
            solution.linked_document_ids(&did("p1/shared")),
            vec![did("p2/shared")]
        );
        assert!(solution.linked_document_ids(&did("p1/only")).is_empty());
    }

    #[test]
    fn related_ids_include_self_in_order() {
        let solution = linked_solution();
        assert_eq!(
            solution.related_document_ids(&did("p2/shared")),
            vec![did("p1/shared"), did("p2/shared")]
        );
        assert_eq!(
            solution.related_document_ids(&did("p1/only")),
            vec![did("p1/only")]
        );
        assert!(solution.related_document_ids(&did("missing")).is_empty());
    }

    #[test]
    fn in_memory_documents_are_never_linked() {
        let mut solution = linked_solution();
        solution
            .add_document(Document::in_memory(did("p2/scratch"), pid("p2"), "x"))
            .unwrap();
        assert!(solution.linked_document_ids(&did("p2/scratch")).is_empty());
        assert_eq!(
            solution.related_document_ids(&did("p2/scratch")),
            vec![did("p2/scratch")]
        );
    }

    #[test]
    fn add_document_rejects_duplicates_and_unknown_projects() {
        let mut solution = linked_solution();
        assert_eq!(
            solution.add_document(Document::new(did("p1/only"), pid("p1"), "x.cs", "")),
            Err(SolutionError::DuplicateDocument {
                document: did("p1/only")
            })
        );
        assert_eq!(
            solution.add_document(Document::new(did("p9/x"), pid("p9"), "x.cs", "")),
            Err(SolutionError::UnknownProject {
                document: did("p9/x"),
                project: pid("p9"),
            })
        );
        assert!(matches!(
            solution.add_project(Project::new(pid("p1"), "again")),
            Err(SolutionError::DuplicateProject { .. })
        ));
    }

    #[test]
    fn with_documents_text_leaves_original_untouched() {
        let solution = linked_solution();
        let ids = solution.related_document_ids(&did("p1/shared"));
        let updated = solution
            .with_documents_text(&ids, &SourceText::new("Z\n"))
            .unwrap();
        assert_eq!(updated.document(&did("p1/shared")).unwrap().text.as_str(), "Z\n");
        assert_eq!(updated.document(&did("p2/shared")).unwrap().text.as_str(), "Z\n");
        assert_eq!(solution.document(&did("p1/shared")).unwrap().text.as_str(), "A\n");
    }

    #[test]
    fn with_document_text_rejects_unknown_id() {
        let solution = linked_solution();
        assert_eq!(
            solution.with_document_text(&did("nope"), SourceText::new("")),
            Err(SolutionError::DocumentNotFound {
                document: did("nope")
            })
        );
    }

    #[test]
    fn changed_documents_groups_by_project() {
        let old = linked_solution();
        let new = old
            .with_document_text(&did("p2/shared"), SourceText::new("A2\n"))
            .unwrap()
            .with_document_text(&did("p1/only"), SourceText::new("B2\n"))
            .unwrap();
        let changes = old.changed_documents(&new);
        assert_eq!(
            changes,
            vec![
                ProjectChanges {
                    project_id: pid("p1"),
                    changed_documents: vec![did("p1/only")],
                },
                ProjectChanges {
                    project_id: pid("p2"),
                    changed_documents: vec![did("p2/shared")],
                },
            ]
        );
        assert!(old.changed_documents(&old).is_empty());
    }
}
