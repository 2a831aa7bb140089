//! Render instructions emitted for one frame.
//!
//! Geometry is in content coordinates: `left` and `top` are offsets inside the
//! scrollable inner area. Pinned cells carry their scroll-independent offset
//! and a sticky flag; [`crate::layout::Viewport::screen_x`] maps them onto the
//! screen.

use serde::Serialize;
use std::rc::Rc;

use crate::intents::RowIntents;
use crate::layout::Stickiness;
use crate::types::ItemKey;

/// Presentation flags resolved for one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFlags {
    pub gutter: bool,
    pub sticky_left: bool,
    pub sticky_right: bool,
    /// The cell is the active cell
    pub active: bool,
    /// Gutter cells: row is in the highlighted band. Header cells: column is.
    pub selected: bool,
    pub disabled: bool,
}

impl CellFlags {
    /// Horizontal scroll behavior for this cell.
    pub fn stickiness(&self) -> Stickiness {
        if self.sticky_right {
            Stickiness::Right
        } else if self.gutter || self.sticky_left {
            Stickiness::Left
        } else {
            Stickiness::Scrolling
        }
    }
}

/// Props handed to a data cell's content component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellProps {
    pub row_index: usize,
    /// Logical column index, `-1` for the gutter
    pub column_index: i64,
    pub active: bool,
    /// Active and editing
    pub focus: bool,
    pub disabled: bool,
    pub column_id: Option<String>,
    /// Intents pre-bound to this cell's row
    #[serde(skip)]
    pub intents: Rc<RowIntents>,
}

/// What goes inside a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellContent {
    Header {
        title: Option<String>,
    },
    Data {
        #[serde(flatten)]
        props: CellProps,
        text: Option<String>,
    },
}

/// One positioned cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstruction {
    /// Data row index, `None` for the header row
    pub row: Option<usize>,
    /// Rendering column index (gutter = 0)
    pub col_index: usize,
    pub key: ItemKey,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub flags: CellFlags,
    pub class_name: String,
    pub content: CellContent,
}

impl RenderInstruction {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn props(&self) -> Option<&CellProps> {
        match &self.content {
            CellContent::Data { props, .. } => Some(props),
            CellContent::Header { .. } => None,
        }
    }
}

/// A materialized data row and its cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInstruction {
    pub index: usize,
    pub key: ItemKey,
    pub top: f32,
    pub height: f32,
    /// `None` spans the full container width
    pub width: Option<f32>,
    pub class_name: String,
    pub cells: Vec<RenderInstruction>,
}

/// The non-scrolling header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderRow {
    pub height: f32,
    pub width: Option<f32>,
    pub class_name: String,
    pub cells: Vec<RenderInstruction>,
}

/// Everything the rendering surface needs for one frame.
///
/// `children` is the caller's overlay content, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame<K> {
    /// Height of the scroll container
    pub height: f32,
    /// Scrollable content width, `None` when the grid spans its container
    pub inner_width: Option<f32>,
    /// Scrollable content height including the header
    pub inner_height: f32,
    pub header: Option<HeaderRow>,
    pub rows: Vec<RowInstruction>,
    pub children: Option<K>,
}

impl<K> Frame<K> {
    /// Header cells followed by every row's cells, in emission order.
    pub fn cells(&self) -> impl Iterator<Item = &RenderInstruction> + '_ {
        self.header
            .iter()
            .flat_map(|header| header.cells.iter())
            .chain(self.rows.iter().flat_map(|row| row.cells.iter()))
    }

    /// Data cell at (`row`, rendering column `col_index`), if materialized.
    pub fn cell(&self, row: usize, col_index: usize) -> Option<&RenderInstruction> {
        let pos = self
            .rows
            .binary_search_by_key(&row, |r| r.index)
            .ok()?;
        self.rows
            .get(pos)?
            .cells
            .iter()
            .find(|cell| cell.col_index == col_index)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn header_cell(col_index: usize) -> RenderInstruction {
        RenderInstruction {
            row: None,
            col_index,
            key: ItemKey::Index(col_index),
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 40.0,
            flags: CellFlags::default(),
            class_name: "dsg-cell dsg-cell-header".into(),
            content: CellContent::Header { title: None },
        }
    }

    #[test]
    fn test_stickiness() {
        let gutter = CellFlags {
            gutter: true,
            ..CellFlags::default()
        };
        let right = CellFlags {
            sticky_right: true,
            ..CellFlags::default()
        };
        assert_eq!(gutter.stickiness(), Stickiness::Left);
        assert_eq!(right.stickiness(), Stickiness::Right);
        assert_eq!(CellFlags::default().stickiness(), Stickiness::Scrolling);
    }

    #[test]
    fn test_cells_lists_header_first() {
        let frame: Frame<()> = Frame {
            height: 400.0,
            inner_width: Some(200.0),
            inner_height: 40.0,
            header: Some(HeaderRow {
                height: 40.0,
                width: Some(200.0),
                class_name: "dsg-row dsg-row-header".into(),
                cells: vec![header_cell(0), header_cell(1)],
            }),
            rows: Vec::new(),
            children: None,
        };
        assert_eq!(
            frame.cells().map(|c| c.col_index).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert!(frame.cell(0, 0).is_none());
    }

    #[test]
    fn test_header_content_json() {
        let json = serde_json::to_value(header_cell(2)).unwrap();
        assert_eq!(json["content"]["kind"], "header");
        assert_eq!(json["colIndex"], 2);
        assert_eq!(json["row"], serde_json::Value::Null);
    }
}
