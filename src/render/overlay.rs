//! Selection and active-cell highlighting.
//!
//! Keeps the highlight math testable without any rendering surface.

use serde::Serialize;

use crate::types::{Cell, Selection};

/// Row and column band highlighted for the current selection state.
///
/// Column bounds are logical (gutter excluded). Every bound is `None` when
/// there is neither a selection nor an active cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBounds {
    pub col_min: Option<i64>,
    pub col_max: Option<i64>,
    pub row_min: Option<i64>,
    pub row_max: Option<i64>,
}

impl SelectionBounds {
    /// Union of the selection rectangle and the active cell.
    pub fn resolve(selection: Option<&Selection>, active_cell: Option<Cell>) -> Self {
        let corners = selection
            .into_iter()
            .flat_map(|sel| [sel.min, sel.max])
            .chain(active_cell);

        let mut bounds = Self::default();
        for cell in corners {
            bounds.col_min = Some(bounds.col_min.map_or(cell.col, |c| c.min(cell.col)));
            bounds.col_max = Some(bounds.col_max.map_or(cell.col, |c| c.max(cell.col)));
            bounds.row_min = Some(bounds.row_min.map_or(cell.row, |r| r.min(cell.row)));
            bounds.row_max = Some(bounds.row_max.map_or(cell.row, |r| r.max(cell.row)));
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.row_min.is_none()
    }

    /// Row falls inside the highlighted row band.
    pub fn contains_row(&self, row: i64) -> bool {
        match (self.row_min, self.row_max) {
            (Some(min), Some(max)) => (min..=max).contains(&row),
            _ => false,
        }
    }

    /// Logical column falls inside the highlighted column band.
    pub fn contains_col(&self, col: i64) -> bool {
        match (self.col_min, self.col_max) {
            (Some(min), Some(max)) => (min..=max).contains(&col),
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_no_state_is_empty() {
        let bounds = SelectionBounds::resolve(None, None);
        assert!(bounds.is_empty());
        assert!(!bounds.contains_row(0));
        assert!(!bounds.contains_col(-1));
    }

    #[test]
    fn test_active_cell_only() {
        let bounds = SelectionBounds::resolve(None, Some(Cell::new(2, 7)));
        assert_eq!(bounds.col_min, Some(2));
        assert_eq!(bounds.col_max, Some(2));
        assert_eq!(bounds.row_min, Some(7));
        assert_eq!(bounds.row_max, Some(7));
    }

    #[test]
    fn test_selection_rectangle() {
        let sel = Selection::new(Cell::new(1, 2), Cell::new(3, 5));
        let bounds = SelectionBounds::resolve(Some(&sel), Some(Cell::new(1, 2)));
        assert!(bounds.contains_row(2));
        assert!(bounds.contains_row(5));
        assert!(!bounds.contains_row(6));
        assert!(bounds.contains_col(3));
        assert!(!bounds.contains_col(0));
    }

    #[test]
    fn test_active_cell_outside_selection_widens_bounds() {
        let sel = Selection::new(Cell::new(1, 2), Cell::new(3, 5));
        let bounds = SelectionBounds::resolve(Some(&sel), Some(Cell::new(0, 9)));
        assert_eq!(bounds.col_min, Some(0));
        assert_eq!(bounds.row_max, Some(9));
    }
}
