//! Axis windowing tests
//!
//! Tests for window coverage, overscan clamping, total extent stability and
//! empty datasets.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use sheetgrid::{
    compute_window, AxisLayout, ColumnDescriptor, DataGrid, GridOptions, GridProps, Viewport,
};
use test_case::test_case;

fn indices(window: &sheetgrid::AxisWindow) -> Vec<usize> {
    window.indices().collect()
}

#[test]
fn test_top_of_uniform_rows() {
    // 1000 rows x 40px, viewport 400, overscan 5
    let window = compute_window(1_000, |_| 40.0, 0.0, 400.0, 5);
    assert_eq!(indices(&window), (0..=14).collect::<Vec<_>>());
    assert_eq!(window.total_extent, 40_000.0);
}

#[test]
fn test_mid_scroll_window_is_twenty_items() {
    let window = compute_window(1_000, |_| 40.0, 4_000.0, 400.0, 5);
    assert_eq!(window.len(), 20);
    assert_eq!(window.items.first().unwrap().index, 95);
    assert_eq!(window.items.last().unwrap().index, 114);
}

#[test]
fn test_bottom_clamps_to_last_item() {
    let window = compute_window(1_000, |_| 40.0, 39_600.0, 400.0, 5);
    assert_eq!(window.items.last().unwrap().index, 999);
    assert!(window.len() < 20);
}

#[test_case(0.0, 400.0 ; "at top")]
#[test_case(13.0, 400.0 ; "partial first row")]
#[test_case(4_321.5, 333.0 ; "mid scroll")]
#[test_case(39_999.0, 400.0 ; "past the end")]
#[test_case(100.0, 100_000.0 ; "viewport taller than content")]
fn test_window_covers_viewport(scroll: f32, extent: f32) {
    let sizes: Vec<f32> = (0..1_000).map(|i| 20.0 + (i % 9) as f32 * 5.0).collect();
    let mut layout = AxisLayout::new();
    layout.measure(sizes.len(), 0.0, |i| sizes[i]);
    let window = layout.window(scroll, extent, 0);

    let total = layout.total_extent();
    let first = window.items.first().unwrap();
    let last = window.items.last().unwrap();
    assert!(first.start <= scroll.min(total));
    assert!(last.end() >= (scroll + extent).min(total));

    // Contiguous and ascending
    for pair in window.items.windows(2) {
        assert_eq!(pair[0].index + 1, pair[1].index);
        assert_eq!(pair[0].end(), pair[1].start);
    }
}

#[test_case(0 ; "no overscan")]
#[test_case(3 ; "small overscan")]
#[test_case(50 ; "overscan larger than window")]
fn test_overscan_never_leaves_range(overscan: usize) {
    let window = compute_window(30, |_| 40.0, 400.0, 200.0, overscan);
    assert!(window.items.iter().all(|item| item.index < 30));
    let expected_first = 10usize.saturating_sub(overscan);
    assert_eq!(window.items.first().unwrap().index, expected_first);
}

#[test]
fn test_total_extent_independent_of_scroll() {
    let mut layout = AxisLayout::new();
    layout.measure(500, 40.0, |i| if i % 2 == 0 { 30.0 } else { 50.0 });
    let extents: Vec<f32> = [0.0, 1_000.0, 15_000.0, 99_999.0]
        .iter()
        .map(|&scroll| layout.window(scroll, 400.0, 5).total_extent)
        .collect();
    assert!(extents.iter().all(|&e| e == 20_040.0));
}

#[test]
fn test_shrinking_dataset_to_empty() {
    let columns = vec![ColumnDescriptor::gutter(), ColumnDescriptor::new()];
    let options = GridOptions {
        header_row_height: 32.0,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(options).unwrap();
    let viewport = Viewport::new(800.0, 400.0);

    let full: Vec<u32> = (0..1_000).collect();
    let frame = grid.frame::<()>(&GridProps::new(&full, &columns), &viewport, None);
    assert!(!frame.rows.is_empty());

    let empty: Vec<u32> = Vec::new();
    let frame = grid.frame::<()>(&GridProps::new(&empty, &columns), &viewport, None);
    assert!(frame.rows.is_empty());
    assert_eq!(frame.inner_height, 32.0);
    // Header still renders
    assert_eq!(frame.header.unwrap().cells.len(), 2);
}

#[test]
fn test_header_offsets_first_row() {
    let data: Vec<u32> = (0..100).collect();
    let columns = vec![ColumnDescriptor::gutter()];
    let mut grid = DataGrid::new(GridOptions::default()).unwrap();
    let frame = grid.frame::<()>(
        &GridProps::new(&data, &columns),
        &Viewport::new(800.0, 400.0),
        None,
    );
    assert_eq!(frame.rows[0].top, 40.0);
    assert_eq!(frame.inner_height, 40.0 + 100.0 * 40.0);
}
