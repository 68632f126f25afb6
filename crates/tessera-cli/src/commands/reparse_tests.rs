use tessera_runtime::{Edit, ParseStats};

use super::reparse::format_stats;

#[test]
fn stats_with_an_edit() {
    let stats = ParseStats {
        lexed_tokens: 3,
        reused_leaves: 5,
        reused_nodes: 0,
        reused_bytes: 7,
        recoveries: 0,
        decisions: 2,
    };

    insta::assert_snapshot!(format_stats(&stats, &[Edit::new(8, 9, 10)], 10), @r"
    edit           8..9 -> 8..10
    lexed tokens   3
    reused leaves  5
    reused nodes   0
    reused bytes   7/10
    recoveries     0
    decisions      2
    ");
}

#[test]
fn stats_without_edits() {
    let stats = ParseStats::default();

    assert!(format_stats(&stats, &[], 0).starts_with("edit           none\n"));
}
