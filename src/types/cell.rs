use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical cell coordinate.
///
/// Column indices exclude the gutter: the gutter sits at `col = -1` and the
/// first data column at `col = 0`. Rendering column indices are `col + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i64,
    pub row: i64,
}

impl Cell {
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Logical column index for a rendering column index (gutter = -1).
    pub fn logical_col(render_index: usize) -> i64 {
        to_i64(render_index) - 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Stable identity of a row or column in the emitted structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    Index(usize),
    Named(String),
}

impl From<usize> for ItemKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ItemKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Saturating `usize` → `i64`; indices never get near the limit in practice.
pub(crate) fn to_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_col_offsets_gutter() {
        assert_eq!(Cell::logical_col(0), -1);
        assert_eq!(Cell::logical_col(1), 0);
        assert_eq!(Cell::logical_col(7), 6);
    }

    #[test]
    fn test_item_key_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ItemKey::Index(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ItemKey::from("row-a")).unwrap(),
            "\"row-a\""
        );
    }
}
