//! Pinned column tests
//!
//! Tests for the gutter, pinned-left and sticky-right columns staying
//! materialized at scroll-independent offsets.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::sync::Arc;

use sheetgrid::{
    apply_pinning, AxisLayout, ColumnDescriptor, DataGrid, GridOptions, GridProps, PinnedSet,
    Stickiness, Viewport,
};
use test_case::test_case;

const WIDTHS: [f32; 12] = [
    40.0, 120.0, 90.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 70.0,
];

fn columns() -> Vec<ColumnDescriptor<u32>> {
    std::iter::once(ColumnDescriptor::gutter())
        .chain((1..WIDTHS.len()).map(|i| ColumnDescriptor::new().with_id(format!("c{i}"))))
        .collect()
}

fn layout() -> AxisLayout {
    let mut layout = AxisLayout::new();
    layout.measure(WIDTHS.len(), 0.0, |i| WIDTHS[i]);
    layout
}

#[test]
fn test_far_right_keeps_pinned_left_columns() {
    let layout = layout();
    let scroll = layout.total_extent() - 300.0;
    let window = layout.window(scroll, 300.0, 1);
    assert!(!window.contains(1));

    let pinned = PinnedSet::for_columns(WIDTHS.len(), 2, false);
    let out = apply_pinning(&window, &pinned, &layout);
    let ids: Vec<usize> = out.indices().collect();
    assert_eq!(&ids[..3], &[0, 1, 2]);
    assert_eq!(out.get(0).unwrap().start, 0.0);
    assert_eq!(out.get(1).unwrap().start, WIDTHS[0]);
    assert_eq!(out.get(2).unwrap().start, WIDTHS[0] + WIDTHS[1]);
}

#[test_case(0.0 ; "at origin")]
#[test_case(250.0 ; "slightly scrolled")]
#[test_case(600.0 ; "mid")]
#[test_case(10_000.0 ; "beyond content")]
fn test_pinned_starts_ignore_scroll(scroll: f32) {
    let layout = layout();
    let pinned = PinnedSet::for_columns(WIDTHS.len(), 2, true);
    let out = apply_pinning(&layout.window(scroll, 300.0, 1), &pinned, &layout);

    assert_eq!(out.get(0).unwrap().start, 0.0);
    assert_eq!(out.get(1).unwrap().start, 40.0);
    assert_eq!(out.get(2).unwrap().start, 160.0);
    assert_eq!(out.get(11).unwrap().start, 1_050.0);
    // Ascending, no duplicates
    let ids: Vec<usize> = out.indices().collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_pinning_twice_is_a_no_op() {
    let layout = layout();
    let pinned = PinnedSet::for_columns(WIDTHS.len(), 3, true);
    let window = layout.window(420.0, 250.0, 1);
    let once = apply_pinning(&window, &pinned, &layout);
    assert_eq!(apply_pinning(&once, &pinned, &layout), once);
}

#[test]
fn test_grid_marks_pinned_cells_sticky() {
    let data: Vec<u32> = (0..20).collect();
    let cols = columns();
    let options = GridOptions {
        pin_first_columns: 2,
        has_sticky_right_column: true,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(options).unwrap();
    let props = GridProps::new(&data, &cols).with_column_widths(Arc::from(WIDTHS.to_vec()));
    let mut viewport = Viewport::new(400.0, 400.0);
    viewport.scroll_x = 700.0;
    let frame = grid.frame::<()>(&props, &viewport, None);

    let row = &frame.rows[0];
    let col_ids: Vec<usize> = row.cells.iter().map(|c| c.col_index).collect();
    assert_eq!(&col_ids[..3], &[0, 1, 2]);
    assert_eq!(*col_ids.last().unwrap(), 11);

    let gutter = &row.cells[0];
    let pinned = &row.cells[2];
    let right = row.cells.last().unwrap();
    assert!(gutter.flags.gutter);
    assert!(pinned.flags.sticky_left);
    assert!(right.flags.sticky_right);
    assert_eq!(pinned.left, 160.0);

    // On screen the pinned column sits at its pinned offset
    assert_eq!(
        viewport.screen_x(pinned.left, pinned.width, pinned.flags.stickiness()),
        160.0
    );
    assert_eq!(pinned.flags.stickiness(), Stickiness::Left);

    // Header cells are pinned the same way
    let header = frame.header.as_ref().unwrap();
    assert_eq!(header.cells[2].left, 160.0);
    assert!(header.cells[2].flags.sticky_left);
}

#[test]
fn test_pin_count_larger_than_columns() {
    let layout = layout();
    let pinned = PinnedSet::for_columns(WIDTHS.len(), 50, false);
    let out = apply_pinning(&layout.window(0.0, 100.0, 0), &pinned, &layout);
    assert_eq!(out.len(), WIDTHS.len());
}

#[test]
fn test_sticky_right_column_not_pinned_left_when_pins_overflow() {
    let data: Vec<u32> = (0..5).collect();
    let cols: Vec<ColumnDescriptor<u32>> = vec![
        ColumnDescriptor::gutter(),
        ColumnDescriptor::new().with_id("a"),
        ColumnDescriptor::new().with_id("actions"),
    ];
    let options = GridOptions {
        pin_first_columns: 5,
        has_sticky_right_column: true,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(options).unwrap();
    let frame = grid.frame::<()>(
        &GridProps::new(&data, &cols),
        &Viewport::new(400.0, 400.0),
        None,
    );

    let last = frame.cell(0, 2).unwrap();
    assert!(last.flags.sticky_right);
    assert!(!last.flags.sticky_left);
    assert_eq!(last.class_name, "dsg-cell dsg-cell-sticky-right");
    assert_eq!(last.flags.stickiness(), Stickiness::Right);
    assert!(frame.cell(0, 1).unwrap().flags.sticky_left);
}
