use super::*;

#[test]
fn single_line() {
    let index = LineIndex::new("let x = 1");
    assert_eq!(index.line_count(), 1);
    assert_eq!(index.point(0), Point::new(0, 0));
    assert_eq!(index.point(4), Point::new(0, 4));
    assert_eq!(index.point(9), Point::new(0, 9));
}

#[test]
fn multiple_lines() {
    let index = LineIndex::new("a\nbc\n\nd");
    assert_eq!(index.line_count(), 4);
    assert_eq!(index.point(1), Point::new(0, 1));
    assert_eq!(index.point(2), Point::new(1, 0));
    assert_eq!(index.point(4), Point::new(1, 2));
    assert_eq!(index.point(5), Point::new(2, 0));
    assert_eq!(index.point(6), Point::new(3, 0));
}

#[test]
fn offsets_clamp() {
    let index = LineIndex::new("ab\ncd");
    assert_eq!(index.point(100), Point::new(1, 2));
    assert_eq!(index.offset(Point::new(1, 1)), Some(4));
    assert_eq!(index.offset(Point::new(0, 10)), Some(2));
    assert_eq!(index.offset(Point::new(5, 0)), None);
}

#[test]
fn empty_text() {
    let index = LineIndex::new("");
    assert!(index.is_empty());
    assert_eq!(index.point(0), Point::new(0, 0));
}

#[test]
fn display() {
    assert_eq!(Point::new(3, 14).to_string(), "3:14");
}
