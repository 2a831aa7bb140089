//! Crosses the row and column windows into positioned cells.

use std::rc::Rc;

use crate::intents::IntentCache;
use crate::layout::{AxisWindow, WindowedItem};
use crate::types::{to_i64, Cell, CellContext, ClassResolver, ColumnDescriptor, ItemKey, RowKey};

use super::frame::{
    CellContent, CellFlags, CellProps, Frame, HeaderRow, RenderInstruction, RowInstruction,
};
use super::overlay::SelectionBounds;

/// Per-frame inputs to [`compose`].
pub struct FrameInput<'a, T> {
    pub data: &'a [T],
    /// Rendering columns: gutter at 0, optional sticky right column last
    pub columns: &'a [ColumnDescriptor<T>],
    pub bounds: SelectionBounds,
    pub active_cell: Option<Cell>,
    pub editing: bool,
    pub row_key: &'a RowKey<T>,
    pub row_class: Option<&'a ClassResolver<T>>,
    pub cell_class: Option<&'a ClassResolver<T>>,
    pub header_row_height: f32,
    pub display_height: f32,
    pub pin_first_columns: usize,
    pub has_sticky_right_column: bool,
    pub full_width: bool,
}

impl<T> FrameInput<'_, T> {
    fn is_sticky_left(&self, col_index: usize) -> bool {
        (1..=self.pin_first_columns).contains(&col_index) && !self.is_sticky_right(col_index)
    }

    fn is_sticky_right(&self, col_index: usize) -> bool {
        self.has_sticky_right_column && col_index + 1 == self.columns.len()
    }
}

/// Space-joined class list; blank parts are skipped.
fn join_classes<'s>(parts: impl IntoIterator<Item = Option<&'s str>>) -> String {
    let mut out = String::new();
    for part in parts.into_iter().flatten() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

fn flag_classes<'s>(flags: &CellFlags) -> [Option<&'s str>; 6] {
    [
        Some("dsg-cell"),
        flags.gutter.then_some("dsg-cell-gutter"),
        flags.disabled.then_some("dsg-cell-disabled"),
        (flags.gutter && flags.selected).then_some("dsg-cell-gutter-active"),
        flags.sticky_right.then_some("dsg-cell-sticky-right"),
        flags.sticky_left.then_some("dsg-cell-sticky-left"),
    ]
}

fn column_key<T>(column: &ColumnDescriptor<T>, index: usize) -> ItemKey {
    column
        .id
        .as_ref()
        .map_or(ItemKey::Index(index), |id| ItemKey::Named(id.clone()))
}

/// Build the frame for one pair of windows.
///
/// Both windows must come from the same inputs; column starts are taken as
/// given, so pinning has to be applied beforehand.
pub fn compose<T, K>(
    rows: &AxisWindow,
    cols: &AxisWindow,
    input: &FrameInput<'_, T>,
    intents: &mut IntentCache,
    children: Option<K>,
) -> Frame<K> {
    let inner_width = (!input.full_width).then_some(cols.total_extent);

    let columns: Vec<(&WindowedItem, &ColumnDescriptor<T>)> = cols
        .items
        .iter()
        .filter_map(|item| Some((item, input.columns.get(item.index)?)))
        .collect();

    let header = (input.header_row_height > 0.0).then(|| HeaderRow {
        height: input.header_row_height,
        width: inner_width,
        class_name: "dsg-row dsg-row-header".to_string(),
        cells: columns
            .iter()
            .map(|(item, column)| header_cell(item, column, input))
            .collect(),
    });

    let mut out_rows = Vec::with_capacity(rows.len());
    for row in &rows.items {
        let Some(row_data) = input.data.get(row.index) else {
            continue;
        };
        let key = input.row_key.resolve(input.data, row.index);
        let bound = intents.bind(row.index, &key);
        let row_ctx = CellContext {
            row_data,
            row_index: row.index,
            column_id: None,
        };
        let row_class = input.row_class.and_then(|r| r.resolve(&row_ctx));
        let row_selected = input.bounds.contains_row(to_i64(row.index));

        let cells = columns
            .iter()
            .map(|(item, column)| {
                let column_index = Cell::logical_col(item.index);
                let ctx = CellContext {
                    row_data,
                    row_index: row.index,
                    column_id: column.id.as_deref(),
                };
                let active = input.active_cell.is_some_and(|cell| {
                    cell.row == to_i64(row.index) && cell.col == column_index
                });
                let disabled = column.disabled.resolve(row_data, row.index);
                let flags = CellFlags {
                    gutter: item.index == 0,
                    sticky_left: input.is_sticky_left(item.index),
                    sticky_right: input.is_sticky_right(item.index),
                    active,
                    selected: item.index == 0 && row_selected,
                    disabled,
                };
                let column_class = column.cell_class.as_ref().and_then(|c| c.resolve(&ctx));
                let grid_class = input.cell_class.and_then(|c| c.resolve(&ctx));
                let class_name = join_classes(
                    flag_classes(&flags)
                        .into_iter()
                        .chain([column_class.as_deref(), grid_class.as_deref()]),
                );
                let text = column.render.as_ref().map(|render| render(&ctx));

                RenderInstruction {
                    row: Some(row.index),
                    col_index: item.index,
                    key: column_key(column, item.index),
                    left: item.start,
                    top: row.start,
                    width: item.size,
                    height: row.size,
                    flags,
                    class_name,
                    content: CellContent::Data {
                        props: CellProps {
                            row_index: row.index,
                            column_index,
                            active,
                            focus: active && input.editing,
                            disabled,
                            column_id: column.id.clone(),
                            intents: Rc::clone(&bound),
                        },
                        text,
                    },
                }
            })
            .collect();

        out_rows.push(RowInstruction {
            index: row.index,
            key,
            top: row.start,
            height: row.size,
            width: inner_width,
            class_name: join_classes([Some("dsg-row"), row_class.as_deref()]),
            cells,
        });
    }

    tracing::trace!(
        target: "sheetgrid::render",
        rows = out_rows.len(),
        cols = columns.len(),
        header = header.is_some(),
        "composed frame"
    );

    Frame {
        height: input.display_height,
        inner_width,
        inner_height: rows.total_extent,
        header,
        rows: out_rows,
        children,
    }
}

fn header_cell<T>(
    item: &WindowedItem,
    column: &ColumnDescriptor<T>,
    input: &FrameInput<'_, T>,
) -> RenderInstruction {
    let flags = CellFlags {
        gutter: item.index == 0,
        sticky_left: input.is_sticky_left(item.index),
        sticky_right: input.is_sticky_right(item.index),
        active: false,
        selected: input.bounds.contains_col(Cell::logical_col(item.index)),
        disabled: false,
    };
    let class_name = join_classes(flag_classes(&flags).into_iter().chain([
        Some("dsg-cell-header"),
        flags.selected.then_some("dsg-cell-header-active"),
        column.header_class.as_deref(),
    ]));

    RenderInstruction {
        row: None,
        col_index: item.index,
        key: column_key(column, item.index),
        left: item.start,
        top: 0.0,
        width: item.size,
        height: input.header_row_height,
        flags,
        class_name,
        content: CellContent::Header {
            title: column.title.clone(),
        },
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
    use crate::layout::AxisLayout;
    use crate::types::Selection;

    struct Fixture {
        data: Vec<i32>,
        columns: Vec<ColumnDescriptor<i32>>,
        row_key: RowKey<i32>,
    }

    impl Fixture {
        fn new(rows: i32) -> Self {
            Self {
                data: (0..rows).collect(),
                columns: vec![
                    ColumnDescriptor::gutter(),
                    ColumnDescriptor::new().with_id("a").with_title("A"),
                    ColumnDescriptor::new()
                        .with_id("b")
                        .with_title("B")
                        .with_renderer(|ctx| format!("b{}", ctx.row_data)),
                ],
                row_key: RowKey::Index,
            }
        }

        fn input(&self) -> FrameInput<'_, i32> {
            FrameInput {
                data: &self.data,
                columns: &self.columns,
                bounds: SelectionBounds::default(),
                active_cell: None,
                editing: false,
                row_key: &self.row_key,
                row_class: None,
                cell_class: None,
                header_row_height: 40.0,
                display_height: 400.0,
                pin_first_columns: 0,
                has_sticky_right_column: false,
                full_width: false,
            }
        }

        fn windows(&self) -> (AxisWindow, AxisWindow) {
            let mut rows = AxisLayout::new();
            rows.measure(self.data.len(), 40.0, |_| 40.0);
            let mut cols = AxisLayout::new();
            cols.measure(self.columns.len(), 0.0, |i| if i == 0 { 40.0 } else { 100.0 });
            (rows.window(0.0, 400.0, 0), cols.window(0.0, 800.0, 0))
        }
    }

    #[test]
    fn test_cross_product_geometry() {
        let fx = Fixture::new(3);
        let (rows, cols) = fx.windows();
        let frame = compose::<_, ()>(&rows, &cols, &fx.input(), &mut IntentCache::default(), None);

        assert_eq!(frame.rows.len(), 3);
        assert_eq!(frame.inner_width, Some(240.0));
        assert_eq!(frame.inner_height, 160.0);

        let cell = frame.cell(1, 2).unwrap();
        assert_eq!(cell.left, 140.0);
        assert_eq!(cell.top, 80.0);
        assert_eq!(cell.width, 100.0);
        assert_eq!(cell.height, 40.0);
        assert_eq!(cell.key, ItemKey::from("b"));
        match &cell.content {
            CellContent::Data { props, text } => {
                assert_eq!(props.column_index, 1);
                assert_eq!(text.as_deref(), Some("b1"));
            }
            CellContent::Header { .. } => panic!("expected data cell"),
        }
        assert_eq!(frame.cell(1, 0).unwrap().key, ItemKey::Index(0));
    }

    #[test]
    fn test_header_row() {
        let fx = Fixture::new(2);
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        input.bounds = SelectionBounds::resolve(None, Some(Cell::new(1, 0)));
        let frame = compose::<_, ()>(&rows, &cols, &input, &mut IntentCache::default(), None);
        let header = frame.header.unwrap();
        assert_eq!(header.class_name, "dsg-row dsg-row-header");
        assert_eq!(header.cells.len(), 3);
        let b = &header.cells[2];
        assert!(b.flags.selected);
        assert_eq!(
            b.class_name,
            "dsg-cell dsg-cell-header dsg-cell-header-active"
        );
        assert_eq!(b.content, CellContent::Header { title: Some("B".into()) });
        assert!(!header.cells[1].flags.selected);
    }

    #[test]
    fn test_no_header_when_height_zero() {
        let fx = Fixture::new(2);
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        input.header_row_height = 0.0;
        let frame = compose::<_, ()>(&rows, &cols, &input, &mut IntentCache::default(), None);
        assert!(frame.header.is_none());
    }

    #[test]
    fn test_active_focus_and_gutter_band() {
        let fx = Fixture::new(5);
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        let sel = Selection::new(Cell::new(0, 1), Cell::new(1, 2));
        input.bounds = SelectionBounds::resolve(Some(&sel), Some(Cell::new(0, 1)));
        input.active_cell = Some(Cell::new(0, 1));
        input.editing = true;
        let frame = compose::<_, ()>(&rows, &cols, &input, &mut IntentCache::default(), None);

        let active = frame.cell(1, 1).unwrap();
        assert!(active.flags.active);
        assert!(active.props().unwrap().focus);
        assert_eq!(frame.cells().filter(|c| c.flags.active).count(), 1);

        let gutters: Vec<bool> = frame
            .rows
            .iter()
            .map(|r| r.cells[0].flags.selected)
            .collect();
        assert_eq!(gutters, vec![false, true, true, false, false]);
        assert!(frame.cell(1, 0).unwrap().class_name.contains("dsg-cell-gutter-active"));
        // Only the gutter carries the row band
        assert!(!frame.cell(1, 2).unwrap().flags.selected);
    }

    #[test]
    fn test_class_composition_order() {
        let mut fx = Fixture::new(2);
        fx.columns[1] = ColumnDescriptor::new()
            .with_id("a")
            .with_disabled(true)
            .with_cell_class("col-a".into());
        let grid_class = ClassResolver::computed(|ctx: &CellContext<'_, i32>| {
            (ctx.row_index == 1).then(|| "odd".to_string())
        });
        let row_class = ClassResolver::computed(|ctx: &CellContext<'_, i32>| {
            Some(format!("row-{}", ctx.row_index))
        });
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        input.cell_class = Some(&grid_class);
        input.row_class = Some(&row_class);
        input.pin_first_columns = 1;
        let frame = compose::<_, ()>(&rows, &cols, &input, &mut IntentCache::default(), None);

        assert_eq!(
            frame.cell(1, 1).unwrap().class_name,
            "dsg-cell dsg-cell-disabled dsg-cell-sticky-left col-a odd"
        );
        assert_eq!(
            frame.cell(0, 1).unwrap().class_name,
            "dsg-cell dsg-cell-disabled dsg-cell-sticky-left col-a"
        );
        assert_eq!(frame.rows[1].class_name, "dsg-row row-1");
    }

    #[test]
    fn test_sticky_right_flag() {
        let fx = Fixture::new(1);
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        input.has_sticky_right_column = true;
        let frame = compose::<_, ()>(&rows, &cols, &input, &mut IntentCache::default(), None);
        let last = frame.cell(0, 2).unwrap();
        assert!(last.flags.sticky_right);
        assert!(last.class_name.contains("dsg-cell-sticky-right"));
        assert!(!frame.cell(0, 1).unwrap().flags.sticky_right);
    }

    #[test]
    fn test_sticky_right_is_never_sticky_left() {
        let fx = Fixture::new(1);
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        input.has_sticky_right_column = true;
        input.pin_first_columns = 5;
        let frame = compose::<_, ()>(&rows, &cols, &input, &mut IntentCache::default(), None);

        let last = frame.cell(0, 2).unwrap();
        assert!(last.flags.sticky_right);
        assert!(!last.flags.sticky_left);
        assert_eq!(last.class_name, "dsg-cell dsg-cell-sticky-right");
        assert!(frame.cell(0, 1).unwrap().flags.sticky_left);
        assert!(!frame.header.unwrap().cells[2].flags.sticky_left);
    }

    #[test]
    fn test_full_width_and_children() {
        let fx = Fixture::new(1);
        let (rows, cols) = fx.windows();
        let mut input = fx.input();
        input.full_width = true;
        let frame = compose(&rows, &cols, &input, &mut IntentCache::default(), Some("overlay"));
        assert_eq!(frame.inner_width, None);
        assert_eq!(frame.rows[0].width, None);
        assert_eq!(frame.children, Some("overlay"));
    }

    #[test]
    fn test_row_intents_shared_across_cells_and_frames() {
        let fx = Fixture::new(2);
        let (rows, cols) = fx.windows();
        let mut cache = IntentCache::default();
        let first = compose::<_, ()>(&rows, &cols, &fx.input(), &mut cache, None);
        let second = compose::<_, ()>(&rows, &cols, &fx.input(), &mut cache, None);

        let a = &first.cell(1, 1).unwrap().props().unwrap().intents;
        let b = &first.cell(1, 2).unwrap().props().unwrap().intents;
        let c = &second.cell(1, 1).unwrap().props().unwrap().intents;
        assert!(Rc::ptr_eq(a, b));
        assert!(Rc::ptr_eq(a, c));
        assert_eq!(a.row_index(), 1);
    }

    #[test]
    fn test_join_classes_skips_blanks() {
        assert_eq!(join_classes([Some("a"), None, Some(" "), Some("b")]), "a b");
        assert_eq!(join_classes([None]), "");
    }
}
