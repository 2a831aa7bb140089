use serde::{Deserialize, Serialize};

/// Context-menu entry offered for a cell.
///
/// Items are plain data; the embedder turns a chosen item into the matching
/// intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextMenuItem {
    InsertRowBelow,
    DeleteRow,
    DuplicateRow,
    Copy,
    Cut,
    Paste,
    #[serde(rename_all = "camelCase")]
    DeleteRows { from_row: usize, to_row: usize },
    #[serde(rename_all = "camelCase")]
    DuplicateRows { from_row: usize, to_row: usize },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        assert_eq!(
            serde_json::to_string(&ContextMenuItem::DeleteRow).unwrap(),
            r#"{"type":"DELETE_ROW"}"#
        );
        assert_eq!(
            serde_json::to_string(&ContextMenuItem::DuplicateRows {
                from_row: 2,
                to_row: 4
            })
            .unwrap(),
            r#"{"type":"DUPLICATE_ROWS","fromRow":2,"toRow":4}"#
        );
    }
}
