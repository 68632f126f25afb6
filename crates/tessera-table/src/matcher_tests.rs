use super::*;
use crate::test_fixtures::dfa_bytes;

fn dfa(pattern: &str) -> TokenMatcher {
    TokenMatcher::from_dfa_bytes(&dfa_bytes(pattern)).unwrap()
}

#[test]
fn literal_match_examines_only_itself() {
    let m = TokenMatcher::literal("let");
    assert_eq!(
        m.scan(b"let x", 0),
        Scan {
            len: Some(3),
            examined: 3
        }
    );
}

#[test]
fn literal_mismatch_reports_failing_byte() {
    let m = TokenMatcher::literal("let");
    assert_eq!(
        m.scan(b"lex", 0),
        Scan {
            len: None,
            examined: 3
        }
    );
    assert_eq!(m.scan(b"x", 0).examined, 1);
}

#[test]
fn literal_truncated_by_end_of_input() {
    let m = TokenMatcher::literal("let");
    assert_eq!(
        m.scan(b"xle", 1),
        Scan {
            len: None,
            examined: 3
        }
    );
}

#[test]
fn dfa_longest_match_stops_at_dead_state() {
    let m = dfa("[0-9]+");
    assert_eq!(
        m.scan(b"123 x", 0),
        Scan {
            len: Some(3),
            examined: 5
        }
    );
}

#[test]
fn dfa_match_at_end_of_input() {
    let m = dfa("[0-9]+");
    assert_eq!(
        m.scan(b"x = 12", 4),
        Scan {
            len: Some(2),
            examined: 3
        }
    );
}

#[test]
fn dfa_no_match() {
    let m = dfa("[0-9]+");
    assert_eq!(
        m.scan(b"abc", 0),
        Scan {
            len: None,
            examined: 1
        }
    );
}

#[test]
fn dfa_is_anchored() {
    let m = dfa("b");
    assert_eq!(m.scan(b"ab", 0).len, None);
    assert_eq!(m.scan(b"ab", 1).len, Some(1));
}

#[test]
fn dfa_prefers_longest_alternative() {
    let m = dfa("a|abc");
    assert_eq!(m.scan(b"abcd", 0).len, Some(3));
}

#[test]
fn invalid_dfa_bytes_are_rejected() {
    assert!(TokenMatcher::from_dfa_bytes(&[1, 2, 3]).is_err());
}
