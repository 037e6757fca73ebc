//! End-to-end checks of the text primitives working together: diff, apply,
//! normalize, and the line table.

use linkmerge_text::{
    DiffAlgorithm, LineDiffer, SourceText, TextChange, TextDiffer, TextSpan, normalize_changes,
    validate_changes,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Small alphabet so that generated documents share lines often enough for
/// the differ to find equal runs.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", ""]), 0..12).prop_map(
        |lines| {
            let mut text = String::new();
            for line in lines {
                text.push_str(line);
                text.push('\n');
            }
            text
        },
    )
}

// ---------------------------------------------------------------------------
// Deterministic scenarios
// ---------------------------------------------------------------------------

#[test]
fn diff_then_apply_reproduces_new_text() {
    let old = SourceText::new("using System;\n\nclass C\n{\n    void M() { }\n}\n");
    let new = SourceText::new("using System;\nusing System.Linq;\n\nclass C\n{\n    void N() { }\n}\n");
    let changes = LineDiffer::default().text_changes(&old, &new).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(old.with_changes(&changes).unwrap(), new);
}

#[test]
fn diff_of_text_without_trailing_newline() {
    let old = SourceText::new("a\nb");
    let new = SourceText::new("a\nc");
    let changes = LineDiffer::default().text_changes(&old, &new).unwrap();
    assert_eq!(changes, vec![TextChange::new(TextSpan::from_bounds(2, 3), "c")]);
}

#[test]
fn crlf_documents_diff_on_whole_lines() {
    let old = SourceText::new("a\r\nb\r\nc\r\n");
    let new = SourceText::new("a\r\nB\r\nc\r\n");
    let changes = LineDiffer::default().text_changes(&old, &new).unwrap();
    assert_eq!(
        changes,
        vec![TextChange::new(TextSpan::from_bounds(3, 6), "B\r\n")]
    );
    let line = old.line_at(changes[0].span.start());
    assert_eq!(line.index, 1);
}

#[test]
fn normalized_changes_apply_identically() {
    let text = SourceText::new("0123456789");
    let changes = vec![
        TextChange::new(TextSpan::from_bounds(2, 4), "ab"),
        TextChange::new(TextSpan::from_bounds(4, 5), "c"),
        TextChange::insert(8, "!"),
    ];
    let normalized = normalize_changes(changes.clone());
    assert_eq!(normalized.len(), 2);
    assert_eq!(
        text.with_changes(&changes).unwrap(),
        text.with_changes(&normalized).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn line_diff_round_trips(old in document(), new in document()) {
        let old = SourceText::new(old);
        let new = SourceText::new(new);
        for algorithm in [DiffAlgorithm::Myers, DiffAlgorithm::Patience] {
            let changes = LineDiffer::new(algorithm).text_changes(&old, &new).unwrap();
            prop_assert!(validate_changes(&changes).is_ok());
            prop_assert_eq!(old.with_changes(&changes).unwrap(), new.clone());
        }
    }

    #[test]
    fn normalizing_a_diff_preserves_its_effect(old in document(), new in document()) {
        let old = SourceText::new(old);
        let new = SourceText::new(new);
        let changes = LineDiffer::default().text_changes(&old, &new).unwrap();
        let normalized = normalize_changes(changes);
        prop_assert!(validate_changes(&normalized).is_ok());
        for pair in normalized.windows(2) {
            prop_assert!(pair[0].span.end() < pair[1].span.start());
        }
        prop_assert_eq!(old.with_changes(&normalized).unwrap(), new);
    }
}
