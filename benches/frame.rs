//! Benchmarks for windowing and frame composition.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sheetgrid::{
    compute_window, AxisLayout, CellContext, ColumnDescriptor, DataGrid, GridOptions, GridProps,
    RowHeight, Viewport,
};

fn columns(count: usize) -> Vec<ColumnDescriptor<u64>> {
    std::iter::once(ColumnDescriptor::gutter())
        .chain((0..count).map(|i| {
            ColumnDescriptor::new()
                .with_id(format!("c{i}"))
                .with_renderer(|ctx: &CellContext<'_, u64>| ctx.row_data.to_string())
        }))
        .collect()
}

/// Window lookup on a measured axis (two binary searches)
fn bench_window_lookup(c: &mut Criterion) {
    let mut layout = AxisLayout::new();
    layout.measure(1_000_000, 40.0, |i| 20.0 + (i % 7) as f32);

    c.bench_function("window_1m_rows", |b| {
        b.iter(|| layout.window(black_box(12_345_678.0), 600.0, 5))
    });
}

/// Measure-and-window from scratch
fn bench_compute_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_window");
    for count in [1_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| compute_window(count, |_| 40.0, black_box(4_000.0), 400.0, 5))
        });
    }
    group.finish();
}

/// Full frame while scrolling through 100k rows x 50 columns
fn bench_scrolling_frames(c: &mut Criterion) {
    let data: Vec<u64> = (0..100_000).collect();
    let cols = columns(50);
    let options = GridOptions {
        pin_first_columns: 2,
        ..GridOptions::default()
    };
    let mut grid = DataGrid::new(options).expect("valid options");
    let props = GridProps::new(&data, &cols).with_row_height(RowHeight::Fixed(32.0));
    let mut viewport = Viewport::new(1_280.0, 720.0);
    let mut step = 0u32;

    c.bench_function("frame_scroll_100k_x_50", |b| {
        b.iter(|| {
            step = step.wrapping_add(1);
            viewport.scroll_y = (step % 10_000) as f32 * 97.0;
            viewport.scroll_x = (step % 40) as f32 * 61.0;
            grid.frame::<()>(black_box(&props), &viewport, None)
        })
    });
}

criterion_group!(
    benches,
    bench_window_lookup,
    bench_compute_window,
    bench_scrolling_frames
);
criterion_main!(benches);
