//! Row/column positions.

use serde::{Deserialize, Serialize};

/// Zero-based row and byte column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Maps byte offsets to [`Point`]s.
///
/// Built once per source text; lookups are a binary search over line starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Point for a byte offset. Offsets past the end clamp to the end.
    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.len);
        let row = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Point::new(row, offset - self.line_starts[row])
    }

    /// Byte offset for a point, if the row exists. Columns clamp to the line end.
    pub fn offset(&self, point: Point) -> Option<usize> {
        let start = *self.line_starts.get(point.row)?;
        let end = self
            .line_starts
            .get(point.row + 1)
            .map_or(self.len, |&next| next - 1);
        Some((start + point.column).min(end))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
