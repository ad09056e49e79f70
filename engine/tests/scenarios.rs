//! End-to-end scenarios through the public API.
//!
//! Covers the diff, hunk, grouping and conflict stages together, plus the
//! JSON shapes exchanged with persistence and UI collaborators.

use changeset_engine::{
    ChangeBuilder, ChangeType, ConflictResolver, ConflictStatus, ConflictStore, EditKind, EngineSettings,
    FileChange, Hunk, InMemoryConflictStore, InMemorySnapshot, NewlinePolicy, Proposal,
    ProposerId, Resolution, apply_hunks, build_hunks, detect_conflicts, diff, format_unified,
    resolve_automatically, tag_hunks,
};
use std::collections::BTreeMap;

#[test]
fn test_single_line_change() {
    let hunks = build_hunks("a\nb\nc", "a\nx\nc");
    assert_eq!(hunks, vec![Hunk::new(2, 2, "x", "b")]);
}

#[test]
fn test_create_style_insert() {
    let hunks = build_hunks("", "hello");
    assert_eq!(hunks, vec![Hunk::new(1, 1, "hello", "")]);
}

#[test]
fn test_change_inside_function_is_grouped() {
    let before = "function foo() {\n  return 1;\n}";
    let after = "function foo() {\n  return 2;\n}";
    let hunks = tag_hunks(build_hunks(before, after), after);
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].semantic_group.as_deref(), Some("function:foo"));
}

#[test]
fn test_latest_proposal_wins_without_hunks() {
    let proposals = BTreeMap::from([
        (
            ProposerId::new("A"),
            Proposal::new(vec![FileChange::modify("f.txt", "", "X")])
                .with_timestamp("2024-05-01T09:00:00Z"),
        ),
        (
            ProposerId::new("B"),
            Proposal::new(vec![FileChange::modify("f.txt", "", "Y")])
                .with_timestamp("2024-05-01T10:00:00Z"),
        ),
    ]);
    assert_eq!(detect_conflicts(&proposals).len(), 1);
    let resolved = resolve_automatically(&proposals).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].content, "Y");
}

#[test]
fn test_disjoint_edits_merge_hunk_by_hunk() {
    let base = "import x from 'x';\n\nfunction a() {\n  return 1;\n}\n\nfunction b() {\n  return 2;\n}\n";
    let snapshot = InMemorySnapshot::new().with_file("src/lib.ts", base);
    let builder = ChangeBuilder::default();

    let edit_a = base.replace("return 1", "return 10");
    let edit_b = base.replace("return 2", "return 20");
    let proposals = BTreeMap::from([
        (
            ProposerId::new("agent-a"),
            Proposal::new(vec![builder.write(&snapshot, "src/lib.ts", &edit_a)])
                .with_timestamp("2024-05-01T09:00:00Z"),
        ),
        (
            ProposerId::new("agent-b"),
            Proposal::new(vec![builder.write(&snapshot, "src/lib.ts", &edit_b)])
                .with_timestamp("2024-05-01T09:05:00Z"),
        ),
    ]);

    let resolved = resolve_automatically(&proposals).unwrap();
    assert_eq!(resolved.len(), 1);
    let merged = &resolved[0];
    assert_eq!(merged.change_type, ChangeType::Modify);
    assert_eq!(
        merged.content,
        base.replace("return 1", "return 10").replace("return 2", "return 20")
    );
    let groups: Vec<_> = merged
        .hunks
        .iter()
        .flatten()
        .map(|h| h.semantic_group.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(groups, vec!["function:a", "function:b"]);
}

#[test]
fn test_resolver_lifecycle() {
    let proposals = BTreeMap::from([
        (
            ProposerId::new("a"),
            Proposal::new(vec![
                FileChange::modify("same.txt", "s", "t"),
                FileChange::modify("diff.txt", "1\n2\n3", "1\nA\n3"),
            ]),
        ),
        (
            ProposerId::new("b"),
            Proposal::new(vec![
                FileChange::modify("same.txt", "s", "t"),
                FileChange::modify("diff.txt", "1\n2\n3", "1\nB\n3"),
            ]),
        ),
    ]);

    let resolver = ConflictResolver::new(InMemoryConflictStore::new());
    let ids = resolver.register(&proposals).unwrap();
    assert_eq!(ids.len(), 1);

    let pending = resolver.store().pending().unwrap();
    assert_eq!(pending[0].file_path, "diff.txt");

    let resolved = resolver
        .resolve(&ids[0], Resolution::Manual("1\nAB\n3".to_string()))
        .unwrap();
    assert_eq!(resolved[0].content, "1\nAB\n3");
    assert_eq!(
        apply_hunks("1\n2\n3", resolved[0].hunks.as_deref().unwrap_or_default()).unwrap(),
        "1\nAB\n3"
    );

    let record = resolver.store().get(&ids[0]).unwrap().unwrap();
    assert_eq!(record.status, ConflictStatus::Resolved);
}

#[test]
fn test_crlf_policies() {
    let before = "a\r\nb\r\nc";
    let after = "a\nb\nc";
    assert_eq!(build_hunks(before, after).len(), 1);

    let settings = EngineSettings {
        newline_policy: NewlinePolicy::Normalize,
        ..EngineSettings::default()
    };
    let change = ChangeBuilder::new(&settings).diff_texts("f", Some(before), after);
    assert_eq!(change.hunks, Some(Vec::new()));
}

#[test]
fn test_disjoint_inputs_give_one_delete_and_one_insert() {
    let ops = diff(&["a", "b"], &["c", "d", "e"]);
    let kinds: Vec<_> = ops.iter().map(|op| (op.kind, op.count)).collect();
    assert_eq!(kinds, vec![(EditKind::Delete, 2), (EditKind::Insert, 3)]);
}

#[test]
fn test_unified_rendering() {
    let hunks = build_hunks("a\nb\nc", "a\nx\nc");
    assert_eq!(
        format_unified("f.txt", &hunks),
        "--- a/f.txt\n+++ b/f.txt\n@@ -2,1 +2,1 @@\n-b\n+x\n"
    );
}

#[test]
fn test_file_change_json_round_trip() {
    let raw = r#"{
        "path": "src/a.ts",
        "content": "a\nx\nc",
        "originalContent": "a\nb\nc",
        "type": "modify",
        "hunks": [
            {"startLine": 2, "endLine": 2, "content": "x", "originalContent": "b", "semanticGroup": "General"}
        ],
        "explanation": "tweak"
    }"#;
    let change: FileChange = serde_json::from_str(raw).unwrap();
    assert_eq!(change.change_type, ChangeType::Modify);
    assert_eq!(
        change.hunks,
        Some(vec![Hunk::new(2, 2, "x", "b").with_group("General")])
    );

    let value = serde_json::to_value(&change).unwrap();
    let expected: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(value, expected);
}
