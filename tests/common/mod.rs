//! Shared test helpers for linkmerge integration tests.
//!
//! Library helpers build a pair of solutions in which every project links the
//! same file; CLI helpers run the `linkmerge` binary in a temp directory.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use linkmerge::merge::{CommentFormatter, LinkedFileMergeSession, LinkedFileMergeSessionResult};
use linkmerge::model::solution::{Document, Project, Solution};
use linkmerge::model::types::{DocumentId, ProjectId};
use linkmerge::text::LineDiffer;

/// Path every project links in [`linked`] solutions.
pub const SHARED_PATH: &str = "src/Shared.cs";

/// Document id of `project`'s copy of the shared file.
pub fn doc_id(project: &str) -> DocumentId {
    DocumentId::new(&format!("{project}/Shared.cs")).unwrap()
}

/// Old and new solutions for one linked file.
///
/// Every project in `siblings` holds `base` in the old solution and its own
/// text in the new one.
pub fn linked(base: &str, siblings: &[(&str, &str)]) -> (Solution, Solution) {
    let mut old = Solution::new();
    let mut new = Solution::new();
    for (project, text) in siblings {
        let pid = ProjectId::new(project).unwrap();
        for (solution, text) in [(&mut old, base), (&mut new, *text)] {
            solution
                .add_project(Project::new(pid.clone(), *project))
                .unwrap();
            solution
                .add_document(Document::new(doc_id(project), pid.clone(), SHARED_PATH, text))
                .unwrap();
        }
    }
    (old, new)
}

/// Merge with the line differ and the default block comment formatter.
pub fn merge(old: &Solution, new: &Solution) -> LinkedFileMergeSessionResult {
    let differ = LineDiffer::default();
    let formatter = CommentFormatter::default();
    LinkedFileMergeSession::new(old, new, &differ, &formatter)
        .merge_diffs(&old.changed_documents(new))
        .expect("merge session failed")
}

/// Text of `project`'s copy in the merged solution.
pub fn merged_text(result: &LinkedFileMergeSessionResult, project: &str) -> String {
    result
        .merged_solution
        .document(&doc_id(project))
        .expect("document missing from merged solution")
        .text
        .as_str()
        .to_owned()
}

/// The text each recorded conflict span covers in `project`'s merged copy.
pub fn comment_texts(result: &LinkedFileMergeSessionResult, project: &str) -> Vec<String> {
    let text = merged_text(result, project);
    result
        .merge_conflict_comment_spans
        .get(&doc_id(project))
        .map(|spans| spans.iter().map(|s| text[s.range()].to_owned()).collect())
        .unwrap_or_default()
}

/// Run linkmerge with the given args in the given directory.
pub fn linkmerge_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linkmerge"))
        .args(args)
        .current_dir(dir)
        .env_remove("LINKMERGE_LOG")
        .output()
        .expect("failed to execute linkmerge")
}

/// Write `files` into `dir`.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
    }
}
