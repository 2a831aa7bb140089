//! Frame composition tests
//!
//! Tests for selection highlighting, active cell and focus, row keys, bound
//! intents and column width changes flowing through a full frame.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::rc::Rc;
use std::sync::Arc;

use serde_json::{json, Value};
use sheetgrid::{
    Cell, CellContext, ClassResolver, ColumnDescriptor, DataGrid, ForwardIntents, GridIntents,
    GridOptions, GridProps, Intent, IntentLog, ItemKey, RowHeight, RowKey, Selection, Viewport,
};

fn columns(n: usize) -> Vec<ColumnDescriptor<Value>> {
    std::iter::once(ColumnDescriptor::gutter())
        .chain((0..n).map(|i| {
            ColumnDescriptor::new()
                .with_id(format!("c{i}"))
                .with_title(format!("Column {i}"))
        }))
        .collect()
}

fn rows(n: usize) -> Vec<Value> {
    (0..n).map(|i| json!({"id": format!("r{i}"), "n": i})).collect()
}

fn grid() -> DataGrid<Value> {
    DataGrid::new(GridOptions::default()).unwrap()
}

#[test]
fn test_selection_containment() {
    let data = rows(10);
    let cols = columns(5);
    let selection: Selection =
        serde_json::from_value(json!({"min": {"col": 1, "row": 2}, "max": {"col": 3, "row": 5}}))
            .unwrap();
    let props = GridProps::new(&data, &cols)
        .with_selection(Some(selection))
        .with_active_cell(Some(Cell::new(1, 2)), false);
    let frame = grid().frame::<()>(&props, &Viewport::new(1_000.0, 600.0), None);

    let selected_rows: Vec<usize> = frame
        .rows
        .iter()
        .filter(|row| row.cells[0].flags.selected)
        .map(|row| row.index)
        .collect();
    assert_eq!(selected_rows, vec![2, 3, 4, 5]);

    let header = frame.header.unwrap();
    let selected_cols: Vec<usize> = header
        .cells
        .iter()
        .filter(|cell| cell.flags.selected)
        .map(|cell| cell.col_index)
        .collect();
    // Logical 1..=3 are rendering 2..=4
    assert_eq!(selected_cols, vec![2, 3, 4]);
}

#[test]
fn test_single_active_cell_with_focus() {
    let data = rows(10);
    let cols = columns(3);
    let props = GridProps::new(&data, &cols).with_active_cell(Some(Cell::new(2, 4)), true);
    let frame = grid().frame::<()>(&props, &Viewport::new(1_000.0, 600.0), None);

    let active: Vec<(Option<usize>, usize)> = frame
        .cells()
        .filter(|c| c.flags.active)
        .map(|c| (c.row, c.col_index))
        .collect();
    assert_eq!(active, vec![(Some(4), 3)]);

    let props = frame.cell(4, 3).unwrap().props().unwrap();
    assert!(props.focus);
    assert_eq!(props.column_index, 2);
    assert_eq!(props.column_id.as_deref(), Some("c2"));
    assert!(!frame.cell(4, 2).unwrap().props().unwrap().focus);
}

#[test]
fn test_no_selection_highlights_nothing() {
    let data = rows(5);
    let cols = columns(2);
    let frame = grid().frame::<()>(&GridProps::new(&data, &cols), &Viewport::default(), None);
    assert!(frame.cells().all(|c| !c.flags.selected && !c.flags.active));
}

#[test]
fn test_row_keys_from_property_with_fallback() {
    let mut data = rows(3);
    data[1] = json!({"id": null});
    let cols = columns(1);
    let props = GridProps::new(&data, &cols).with_row_key(RowKey::property("id"));
    let frame = grid().frame::<()>(&props, &Viewport::default(), None);
    let keys: Vec<ItemKey> = frame.rows.iter().map(|r| r.key.clone()).collect();
    assert_eq!(
        keys,
        vec![
            ItemKey::from("r0"),
            ItemKey::Index(1),
            ItemKey::from("r2")
        ]
    );
}

#[test]
fn test_bound_intents_survive_scroll_until_key_changes() {
    let data = rows(100);
    let cols = columns(1);
    let mut grid = grid();
    let props = GridProps::new(&data, &cols).with_row_key(RowKey::property("id"));

    let top = grid.frame::<()>(&props, &Viewport::new(400.0, 400.0), None);
    let before = Rc::clone(&top.cell(3, 1).unwrap().props().unwrap().intents);

    let mut scrolled = Viewport::new(400.0, 400.0);
    scrolled.scroll_y = 80.0;
    let frame = grid.frame::<()>(&props, &scrolled, None);
    assert!(Rc::ptr_eq(
        &before,
        &frame.cell(3, 1).unwrap().props().unwrap().intents
    ));

    // Row 3 now holds a different record
    let mut reordered = data.clone();
    reordered.swap(3, 4);
    let props = GridProps::new(&reordered, &cols).with_row_key(RowKey::property("id"));
    let frame = grid.frame::<()>(&props, &Viewport::new(400.0, 400.0), None);
    let after = &frame.cell(3, 1).unwrap().props().unwrap().intents;
    assert!(!Rc::ptr_eq(&before, after));
    assert_eq!(after.key(), &ItemKey::from("r4"));
}

#[test]
fn test_cell_intents_reach_the_sink() {
    let data = rows(10);
    let cols = columns(1);
    let frame = grid().frame::<()>(&GridProps::new(&data, &cols), &Viewport::default(), None);
    let log = IntentLog::<Value>::new();

    let intents = &frame.cell(6, 1).unwrap().props().unwrap().intents;
    intents.duplicate_row::<Value>(&log);
    intents.insert_row_below::<Value>(&log);
    intents.set_row_data(&log, json!({"id": "r6", "n": 60}));

    assert_eq!(
        log.take(),
        vec![
            Intent::DuplicateRows { min: 6, max: None },
            Intent::InsertRowAfter {
                row: 6,
                count: None
            },
            Intent::SetRowData {
                row_index: 6,
                value: json!({"id": "r6", "n": 60})
            },
        ]
    );
}

#[test]
fn test_forward_intents_invokes_closure_once_per_action() {
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = {
        let seen = Rc::clone(&seen);
        ForwardIntents::new(move |intent: Intent<Value>| seen.borrow_mut().push(intent))
    };
    GridIntents::<Value>::delete_rows(&sink, 2, Some(4));
    assert_eq!(
        *seen.borrow(),
        vec![Intent::DeleteRows {
            min: 2,
            max: Some(4)
        }]
    );
}

#[test]
fn test_new_width_array_applies_before_next_frame() {
    let data = rows(5);
    let cols = columns(3);
    let mut grid = grid();
    let viewport = Viewport::new(2_000.0, 400.0);

    let first: Arc<[f32]> = Arc::from(vec![40.0, 100.0, 100.0, 100.0]);
    let props = GridProps::new(&data, &cols).with_column_widths(Arc::clone(&first));
    let frame = grid.frame::<()>(&props, &viewport, None);
    assert_eq!(frame.cell(0, 3).unwrap().left, 240.0);

    let second: Arc<[f32]> = Arc::from(vec![40.0, 300.0, 100.0, 100.0]);
    let props = GridProps::new(&data, &cols).with_column_widths(second);
    let frame = grid.frame::<()>(&props, &viewport, None);
    assert_eq!(frame.cell(0, 3).unwrap().left, 440.0);
    assert_eq!(frame.header.unwrap().cells[3].left, 440.0);
    assert_eq!(frame.inner_width, Some(540.0));
}

#[test]
fn test_class_resolvers_concatenate() {
    let data = rows(4);
    let cols = vec![
        ColumnDescriptor::gutter(),
        ColumnDescriptor::new()
            .with_id("n")
            .with_header_class("num-header")
            .with_cell_class(ClassResolver::computed(|ctx: &CellContext<'_, Value>| {
                (ctx.row_data["n"].as_u64()? % 2 == 0).then(|| "even".to_string())
            })),
    ];
    let props = GridProps::new(&data, &cols)
        .with_cell_class("grid-cell".into())
        .with_row_class(ClassResolver::computed(|ctx: &CellContext<'_, Value>| {
            Some(format!("row-{}", ctx.row_index))
        }));
    let frame = grid().frame::<()>(&props, &Viewport::default(), None);

    assert_eq!(frame.cell(0, 1).unwrap().class_name, "dsg-cell even grid-cell");
    assert_eq!(frame.cell(1, 1).unwrap().class_name, "dsg-cell grid-cell");
    assert_eq!(
        frame.cell(1, 0).unwrap().class_name,
        "dsg-cell dsg-cell-gutter grid-cell"
    );
    assert_eq!(frame.rows[2].class_name, "dsg-row row-2");
    assert_eq!(
        frame.header.unwrap().cells[1].class_name,
        "dsg-cell dsg-cell-header num-header"
    );
}

#[test]
fn test_variable_row_heights() {
    let data = rows(50);
    let cols = columns(1);
    let height = RowHeight::computed(|row: &Value, _| {
        if row["n"].as_u64() == Some(0) {
            100.0
        } else {
            25.0
        }
    });
    let props = GridProps::new(&data, &cols).with_row_height(height);
    let frame = grid().frame::<()>(&props, &Viewport::new(400.0, 400.0), None);

    assert_eq!(frame.rows[0].height, 100.0);
    assert_eq!(frame.rows[1].top, 140.0);
    assert_eq!(frame.rows[2].top, 165.0);
    assert_eq!(frame.inner_height, 40.0 + 100.0 + 49.0 * 25.0);
}

#[test]
fn test_children_carried_once() {
    let data = rows(3);
    let cols = columns(1);
    let frame = grid().frame(
        &GridProps::new(&data, &cols),
        &Viewport::default(),
        Some(vec!["tooltip"]),
    );
    assert_eq!(frame.children, Some(vec!["tooltip"]));
}
