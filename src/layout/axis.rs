//! Single-axis windowing over cached prefix sums.
//!
//! Item positions are computed once per invalidation so every scroll tick is
//! two binary searches plus a walk over the materialized items.

use serde::Serialize;

/// One materialized item on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowedItem {
    pub index: usize,
    /// Offset from the content origin in pixels
    pub start: f32,
    pub size: f32,
}

impl WindowedItem {
    pub fn end(&self) -> f32 {
        self.start + self.size
    }
}

/// The materialized slice of an axis for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisWindow {
    /// Scrollable extent of the whole axis, not just the windowed items
    pub total_extent: f32,
    /// Items in ascending index order
    pub items: Vec<WindowedItem>,
}

impl AxisWindow {
    pub fn empty(total_extent: f32) -> Self {
        Self {
            total_extent,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, index: usize) -> Option<&WindowedItem> {
        self.items
            .binary_search_by_key(&index, |item| item.index)
            .ok()
            .and_then(|pos| self.items.get(pos))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|item| item.index)
    }
}

/// Cached positions for every item on one axis.
#[derive(Debug, Clone, Default)]
pub struct AxisLayout {
    /// `positions[i]` = start of item i; the final entry is the far edge
    positions: Vec<f32>,
    sizes: Vec<f32>,
    padding_start: f32,
    measured: bool,
}

impl AxisLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the prefix sums for `count` items.
    ///
    /// `padding_start` is reserved before item 0 (the header row on the row axis).
    pub fn measure(
        &mut self,
        count: usize,
        padding_start: f32,
        mut size: impl FnMut(usize) -> f32,
    ) {
        self.positions.clear();
        self.sizes.clear();
        self.positions.reserve(count + 1);
        self.sizes.reserve(count);

        let mut offset = padding_start;
        let mut invalid = 0usize;
        for index in 0..count {
            let s = size(index);
            if !s.is_finite() || s < 0.0 {
                invalid += 1;
            }
            self.positions.push(offset);
            self.sizes.push(s);
            offset += s;
        }
        self.positions.push(offset);
        self.padding_start = padding_start;
        self.measured = true;

        if invalid > 0 {
            tracing::warn!(
                target: "sheetgrid::layout",
                invalid,
                count,
                "size function returned negative or non-finite sizes"
            );
        }
        tracing::debug!(
            target: "sheetgrid::layout",
            count,
            total = offset,
            "measured axis"
        );
    }

    /// Drop cached measurements; the next frame re-measures.
    pub fn invalidate(&mut self) {
        self.measured = false;
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn padding_start(&self) -> f32 {
        self.padding_start
    }

    pub fn total_extent(&self) -> f32 {
        self.positions.last().copied().unwrap_or(self.padding_start)
    }

    pub fn start(&self, index: usize) -> Option<f32> {
        if index >= self.count() {
            return None;
        }
        self.positions.get(index).copied()
    }

    pub fn size(&self, index: usize) -> Option<f32> {
        self.sizes.get(index).copied()
    }

    /// Sum of the sizes of every item before `index`, ignoring padding.
    pub fn offset_from_origin(&self, index: usize) -> Option<f32> {
        self.start(index).map(|start| start - self.padding_start)
    }

    /// Item whose span contains `offset` (binary search). Offsets before the
    /// first item map to 0, past the last item to the last index.
    pub fn index_at(&self, offset: f32) -> Option<usize> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        let starts = self.positions.get(..count)?;
        let after = starts.partition_point(|&pos| pos <= offset);
        Some(after.saturating_sub(1).min(count - 1))
    }

    /// Materialized items for a viewport at `scroll_offset` spanning
    /// `viewport_extent`, widened by `overscan` items on both sides.
    pub fn window(&self, scroll_offset: f32, viewport_extent: f32, overscan: usize) -> AxisWindow {
        let count = self.count();
        let total_extent = self.total_extent();
        let Some(lo) = self.index_at(scroll_offset) else {
            return AxisWindow::empty(total_extent);
        };

        let target = scroll_offset + viewport_extent;
        let ends = self.positions.get(1..=count).unwrap_or(&[]);
        let hi = ends
            .partition_point(|&end| end < target)
            .min(count - 1)
            .max(lo);

        let first = lo.saturating_sub(overscan);
        let last = hi.saturating_add(overscan).min(count - 1);
        let items = (first..=last)
            .filter_map(|index| {
                Some(WindowedItem {
                    index,
                    start: self.positions.get(index).copied()?,
                    size: self.sizes.get(index).copied()?,
                })
            })
            .collect();

        AxisWindow {
            total_extent,
            items,
        }
    }
}

/// One-shot windowing without keeping the measurement cache around.
pub fn compute_window(
    count: usize,
    size: impl FnMut(usize) -> f32,
    scroll_offset: f32,
    viewport_extent: f32,
    overscan: usize,
) -> AxisWindow {
    let mut layout = AxisLayout::new();
    layout.measure(count, 0.0, size);
    layout.window(scroll_offset, viewport_extent, overscan)
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

    fn uniform(count: usize, size: f32) -> AxisLayout {
        let mut layout = AxisLayout::new();
        layout.measure(count, 0.0, |_| size);
        layout
    }

    #[test]
    fn test_empty_axis() {
        let window = compute_window(0, |_| 40.0, 0.0, 400.0, 5);
        assert!(window.is_empty());
        assert_eq!(window.total_extent, 0.0);
    }

    #[test]
    fn test_empty_axis_keeps_padding() {
        let mut layout = AxisLayout::new();
        layout.measure(0, 32.0, |_| 40.0);
        let window = layout.window(0.0, 400.0, 5);
        assert!(window.is_empty());
        assert_eq!(window.total_extent, 32.0);
    }

    #[test]
    fn test_index_at() {
        let layout = uniform(10, 20.0);
        assert_eq!(layout.index_at(-5.0), Some(0));
        assert_eq!(layout.index_at(0.0), Some(0));
        assert_eq!(layout.index_at(19.9), Some(0));
        assert_eq!(layout.index_at(20.0), Some(1));
        assert_eq!(layout.index_at(50.0), Some(2));
        assert_eq!(layout.index_at(10_000.0), Some(9));
    }

    #[test]
    fn test_window_at_top() {
        let layout = uniform(1000, 40.0);
        let window = layout.window(0.0, 400.0, 0);
        assert_eq!(window.items.first().unwrap().index, 0);
        assert_eq!(window.items.last().unwrap().index, 9);
    }

    #[test]
    fn test_partial_items_at_edges_are_included() {
        let layout = uniform(1000, 40.0);
        let window = layout.window(30.0, 400.0, 0);
        // 30..430 touches rows 0 (30..40) through 10 (400..440)
        assert_eq!(window.indices().collect::<Vec<_>>(), (0..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_overscan_is_clamped() {
        let layout = uniform(12, 40.0);
        let window = layout.window(0.0, 400.0, 5);
        assert_eq!(window.indices().collect::<Vec<_>>(), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_variable_sizes_positions() {
        let sizes = [10.0, 50.0, 20.0, 80.0, 5.0];
        let mut layout = AxisLayout::new();
        layout.measure(sizes.len(), 0.0, |i| sizes[i]);
        assert_eq!(layout.total_extent(), 165.0);
        assert_eq!(layout.start(3), Some(80.0));
        assert_eq!(layout.start(5), None);

        let window = layout.window(55.0, 30.0, 0);
        assert_eq!(window.indices().collect::<Vec<_>>(), vec![1, 2, 3]);
        for pair in window.items.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
    }

    #[test]
    fn test_padding_offsets_items() {
        let mut layout = AxisLayout::new();
        layout.measure(100, 40.0, |_| 20.0);
        assert_eq!(layout.start(0), Some(40.0));
        assert_eq!(layout.offset_from_origin(2), Some(40.0));
        assert_eq!(layout.total_extent(), 2040.0);
    }

    #[test]
    fn test_invalidate_marks_unmeasured() {
        let mut layout = uniform(3, 10.0);
        assert!(layout.is_measured());
        layout.invalidate();
        assert!(!layout.is_measured());
    }

    #[test]
    fn test_nan_sizes_do_not_hang() {
        let mut layout = AxisLayout::new();
        layout.measure(50, 0.0, |i| if i % 7 == 0 { f32::NAN } else { -3.0 });
        let window = layout.window(10.0, 100.0, 2);
        assert!(window.len() <= 50);
    }

    #[test]
    fn test_window_get() {
        let layout = uniform(100, 10.0);
        let window = layout.window(200.0, 50.0, 1);
        assert_eq!(window.get(20).unwrap().start, 200.0);
        assert!(window.get(90).is_none());
    }
}
