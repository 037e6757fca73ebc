//! End-to-end tests for linked-file merging.
//!
//! Coverage:
//! - conflicting edits to one line: first sibling wins, second gets a comment
//! - edits to different lines: clean union
//! - identical edits from several siblings: applied once
//! - chains of disagreeing siblings: one comment each, attributed in fold order
//! - comment clustering by line proximity
//! - comments moved in front of an accepted change covering their line
//! - whitespace-only conflicts: recorded, not commented
//! - the `linkmerge` binary: merged output, exit status, JSON report, config

mod common;

use common::{comment_texts, linked, linkmerge_in, merge, merged_text, write_files};
use linkmerge::text::{LineDiffer, SourceText, TextChange, TextDiffer, TextSpan};

const HEADER_APP2: &str = "/* Unmerged change from project App2";

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

#[test]
fn same_line_conflict_keeps_first_sibling_and_comments_second() {
    let (old, new) = linked(
        "A\nB\nC\n",
        &[("App1", "A\nX\nC\n"), ("App2", "A\nY\nC\n")],
    );
    let result = merge(&old, &new);

    let comment = "/* Unmerged change from project App2\nBefore:\nB\nAfter:\nY\n*/\n";
    assert_eq!(merged_text(&result, "App1"), format!("A\n{comment}X\nC\n"));
    assert_eq!(merged_text(&result, "App2"), merged_text(&result, "App1"));

    let group = &result.merge_results[0];
    assert_eq!(group.unmerged_changes.len(), 1);
    assert_eq!(group.unmerged_changes[0].project_name, "App2");
    assert_eq!(
        group.unmerged_changes[0].changes,
        vec![TextChange::new(TextSpan::from_bounds(2, 4), "Y\n")]
    );
    assert_eq!(comment_texts(&result, "App1"), vec![comment]);
    assert_eq!(comment_texts(&result, "App2"), vec![comment]);
}

#[test]
fn different_lines_merge_without_conflict() {
    let (old, new) = linked(
        "A\nB\nC\n",
        &[("App1", "one\nB\nC\n"), ("App2", "A\nB\nthree\n")],
    );
    let result = merge(&old, &new);

    assert_eq!(merged_text(&result, "App1"), "one\nB\nthree\n");
    assert_eq!(merged_text(&result, "App2"), "one\nB\nthree\n");
    assert!(result.merge_results[0].unmerged_changes.is_empty());
    assert!(result.merge_conflict_comment_spans.is_empty());
}

#[test]
fn clean_merge_rediffs_to_the_union_of_sibling_changes() {
    let base = SourceText::new("A\nB\nC\nD\nE\n");
    let (old, new) = linked(
        base.as_str(),
        &[
            ("App1", "A1\nB\nC\nD\nE\n"),
            ("App2", "A\nB\nC3\nD\nE\n"),
            ("App3", "A\nB\nC\nD\nE5\n"),
        ],
    );
    let result = merge(&old, &new);
    let merged = SourceText::new(merged_text(&result, "App1"));
    assert_eq!(merged.as_str(), "A1\nB\nC3\nD\nE5\n");

    let rediff = LineDiffer::default().text_changes(&base, &merged).unwrap();
    assert_eq!(
        rediff,
        vec![
            TextChange::new(TextSpan::from_bounds(0, 2), "A1\n"),
            TextChange::new(TextSpan::from_bounds(4, 6), "C3\n"),
            TextChange::new(TextSpan::from_bounds(8, 10), "E5\n"),
        ]
    );
    assert_eq!(base.with_changes(&rediff).unwrap(), merged);
}

#[test]
fn identical_edits_apply_once() {
    let (old, new) = linked(
        "A\nB\nC\n",
        &[
            ("App1", "A\nX\nC\n"),
            ("App2", "A\nX\nC\nD\n"),
            ("App3", "A\nX\nC\n"),
        ],
    );
    let result = merge(&old, &new);

    assert_eq!(merged_text(&result, "App3"), "A\nX\nC\nD\n");
    assert!(!result.has_conflicts());
    assert_eq!(result.stats.totals.identical_diffs, 1);
    // App3 duplicates App1's content and is never folded.
    assert_eq!(result.stats.totals.documents_with_changes, 2);
}

#[test]
fn every_disagreeing_sibling_gets_its_own_comment() {
    let (old, new) = linked(
        "A\nB\nC\n",
        &[
            ("App1", "A\nX\nC\n"),
            ("App2", "A\nY\nC\n"),
            ("App3", "A\nZ\nC\n"),
        ],
    );
    let result = merge(&old, &new);

    let group = &result.merge_results[0];
    let projects: Vec<&str> = group
        .unmerged_changes
        .iter()
        .map(|u| u.project_name.as_str())
        .collect();
    assert_eq!(projects, ["App2", "App3"]);

    let comments = comment_texts(&result, "App1");
    assert_eq!(comments.len(), 2);
    assert!(comments[0].starts_with(HEADER_APP2));
    assert!(comments[1].starts_with("/* Unmerged change from project App3"));
    assert!(merged_text(&result, "App1").ends_with("*/\nX\nC\n"));
}

#[test]
fn nearby_conflicts_share_one_comment() {
    // App2's conflicts on lines 0-1 and 3 are one unchanged line apart.
    let (old, new) = linked(
        "l0\nl1\nl2\nl3\nl4\nl5\n",
        &[
            ("App1", "X0\nl1\nl2\nX3\nl4\nl5\n"),
            ("App2", "Y0\nY1\nl2\nY3\nl4\nl5\n"),
        ],
    );
    let result = merge(&old, &new);

    let comments = comment_texts(&result, "App1");
    assert_eq!(
        comments,
        vec![
            "/* Unmerged change from project App2\nBefore:\nl0\nl1\nl2\nl3\nAfter:\nY0\nY1\nl2\nY3\n*/\n"
        ]
    );
}

#[test]
fn distant_conflicts_get_separate_comments() {
    let (old, new) = linked(
        "l0\nl1\nl2\nl3\nl4\nl5\n",
        &[
            ("App1", "X0\nl1\nl2\nl3\nX4\nl5\n"),
            ("App2", "Y0\nY1\nl2\nl3\nY4\nl5\n"),
        ],
    );
    let result = merge(&old, &new);

    let comments = comment_texts(&result, "App1");
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().all(|c| c.starts_with(HEADER_APP2)));
    assert!(comments[1].contains("Before:\nl4\nAfter:\nY4\n"));

    let text = merged_text(&result, "App1");
    assert!(text.starts_with(&comments[0]));
    assert!(text.ends_with(&format!("{}X4\nl5\n", comments[1])));
}

#[test]
fn comment_inside_accepted_change_moves_to_its_start() {
    let (old, new) = linked(
        "l0\nl1\nl2\nl3\n",
        &[("App1", "A\nB\nC\nl3\n"), ("App2", "l0\nZZ\nl2\nl3\n")],
    );
    let result = merge(&old, &new);

    let comment = "/* Unmerged change from project App2\nBefore:\nl1\nAfter:\nZZ\n*/\n";
    assert_eq!(
        merged_text(&result, "App1"),
        format!("{comment}A\nB\nC\nl3\n")
    );
    assert_eq!(comment_texts(&result, "App2"), vec![comment]);
    assert_eq!(
        result
            .stats
            .totals
            .inserted_merge_conflict_comments_at_adjusted_location,
        1
    );
}

#[test]
fn whitespace_only_conflict_is_recorded_without_comment() {
    let (old, new) = linked(
        "A\n\nC\n",
        &[("App1", "A\nX\nC\n"), ("App2", "A\n   \nC\n")],
    );
    let result = merge(&old, &new);

    assert_eq!(merged_text(&result, "App2"), "A\nX\nC\n");
    assert_eq!(result.merge_results[0].unmerged_changes.len(), 1);
    assert!(result.merge_conflict_comment_spans.is_empty());
}

#[test]
fn crlf_text_keeps_its_line_breaks() {
    let (old, new) = linked(
        "A\r\nB\r\nC\r\n",
        &[("App1", "A\r\nX\r\nC\r\n"), ("App2", "A\r\nB\r\nZ\r\n")],
    );
    let result = merge(&old, &new);
    assert_eq!(merged_text(&result, "App1"), "A\r\nX\r\nZ\r\n");
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[test]
fn cli_clean_merge_prints_text_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("base.cs", "A\nB\nC\n"),
            ("one.cs", "one\nB\nC\n"),
            ("three.cs", "A\nB\nthree\n"),
        ],
    );
    let out = linkmerge_in(
        dir.path(),
        &["merge", "--base", "base.cs", "--sibling", "s1=one.cs", "--sibling", "s2=three.cs"],
    );
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "one\nB\nthree\n");
}

#[test]
fn cli_conflict_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[("base.cs", "A\nB\nC\n"), ("x.cs", "A\nX\nC\n"), ("y.cs", "A\nY\nC\n")],
    );
    let out = linkmerge_in(
        dir.path(),
        &["merge", "--base", "base.cs", "--sibling", "s1=x.cs", "--sibling", "s2=y.cs"],
    );
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("/* Unmerged change from project s2\n"), "{stdout}");
    assert!(stdout.ends_with("*/\nX\nC\n"));
}

#[test]
fn cli_json_report() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[("base.cs", "A\nB\nC\n"), ("x.cs", "A\nX\nC\n"), ("y.cs", "A\nY\nC\n")],
    );
    let out = linkmerge_in(
        dir.path(),
        &[
            "merge", "--base", "base.cs", "--sibling", "s1=x.cs", "--sibling", "s2=y.cs", "--json",
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["conflict_spans"].as_array().unwrap().len(), 1);
    assert_eq!(report["conflict_spans"][0]["start"], 2);
    assert_eq!(report["unmerged"][0]["project"], "s2");
    assert_eq!(report["stats"]["groups_merged"], 1);
    assert_eq!(report["stats"]["inserted_merge_conflict_comments"], 1);
}

#[test]
fn cli_honours_config_and_output_file() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("base.py", "a\nb\nc\n"),
            ("x.py", "a\nx\nc\n"),
            ("y.py", "a\ny\nc\n"),
            ("linkmerge.toml", "[comments]\nstyle = \"line\"\nline_prefix = \"#\"\n"),
        ],
    );
    let out = linkmerge_in(
        dir.path(),
        &[
            "merge", "--base", "base.py", "--sibling", "s1=x.py", "--sibling", "s2=y.py",
            "--output", "merged.py",
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let merged = std::fs::read_to_string(dir.path().join("merged.py")).unwrap();
    assert_eq!(
        merged,
        "a\n# Unmerged change from project s2\n# Before:\n# b\n# After:\n# y\nx\nc\n"
    );
}

#[test]
fn cli_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("base.cs", "A\n"),
            ("x.cs", "X\n"),
            ("y.cs", "Y\n"),
            ("linkmerge.toml", "[diff]\nalgorithm = \"lcs\"\n"),
        ],
    );
    let out = linkmerge_in(
        dir.path(),
        &["merge", "--base", "base.cs", "--sibling", "s1=x.cs", "--sibling", "s2=y.cs"],
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("linkmerge.toml"), "{stderr}");
    assert!(stderr.contains("line 2"), "{stderr}");
}

#[test]
fn cli_needs_two_siblings() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("base.cs", "A\n"), ("x.cs", "X\n")]);
    let out = linkmerge_in(dir.path(), &["merge", "--base", "base.cs", "--sibling", "s1=x.cs"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("at least two"));
}

#[test]
fn cli_diff_prints_changes() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("old.txt", "A\nB\nC\n"), ("new.txt", "A\nX\nC\n")]);
    let out = linkmerge_in(dir.path(), &["diff", "old.txt", "new.txt"]);
    assert!(out.status.success());
    let changes: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        changes,
        serde_json::json!([{ "span": { "start": 2, "end": 4 }, "new_text": "X\n" }])
    );
}
