use serde::{Deserialize, Serialize};

use super::Cell;

/// Rectangular cell selection, normalized so `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub min: Cell,
    pub max: Cell,
}

impl Selection {
    /// Create a selection spanning two corners in any order.
    pub fn new(a: Cell, b: Cell) -> Self {
        Self {
            min: Cell::new(a.col.min(b.col), a.row.min(b.row)),
            max: Cell::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let sel = Selection::new(Cell::new(3, 5), Cell::new(1, 2));
        assert_eq!(sel.min, Cell::new(1, 2));
        assert_eq!(sel.max, Cell::new(3, 5));
    }

    #[test]
    fn test_deserialize_from_json() {
        let sel: Selection =
            serde_json::from_str(r#"{"min":{"col":1,"row":2},"max":{"col":3,"row":5}}"#).unwrap();
        assert_eq!(sel, Selection::new(Cell::new(1, 2), Cell::new(3, 5)));
    }
}
