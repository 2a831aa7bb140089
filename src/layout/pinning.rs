//! Pinned (sticky) items that stay materialized regardless of scroll.

use super::{AxisLayout, AxisWindow, WindowedItem};

/// Ordered set of indices that must appear in every window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedSet {
    indices: Vec<usize>,
}

impl PinnedSet {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// Pinned set for a column axis of `count` rendering columns: the gutter
    /// at 0, pinned-left columns `1..=pin_first_columns`, and the last column
    /// when a sticky right column is configured. The sticky right column is
    /// never also pinned left.
    pub fn for_columns(count: usize, pin_first_columns: usize, sticky_right: bool) -> Self {
        if count == 0 {
            return Self::default();
        }
        let last = count - 1;
        let last_left = if sticky_right {
            last.saturating_sub(1)
        } else {
            last
        };
        let left = 0..=pin_first_columns.min(last_left);
        let right = sticky_right.then_some(last);
        Self::new(left.chain(right))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// Force every pinned index into `window` with a scroll-independent start.
///
/// A pinned item's start is the sum of the sizes of all items before it,
/// measured from the axis origin. Indices past the end of the axis are
/// skipped. The input window is left untouched.
pub fn apply_pinning(window: &AxisWindow, pinned: &PinnedSet, layout: &AxisLayout) -> AxisWindow {
    let mut items = window.items.clone();
    for &index in pinned.indices() {
        let (Some(start), Some(size)) = (layout.offset_from_origin(index), layout.size(index))
        else {
            continue;
        };
        let item = WindowedItem { index, start, size };
        match items.binary_search_by_key(&index, |it| it.index) {
            Ok(pos) => {
                if let Some(slot) = items.get_mut(pos) {
                    *slot = item;
                }
            }
            Err(pos) => items.insert(pos, item),
        }
    }
    AxisWindow {
        total_extent: window.total_extent,
        items,
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

    fn columns(widths: &[f32]) -> AxisLayout {
        let mut layout = AxisLayout::new();
        layout.measure(widths.len(), 0.0, |i| widths[i]);
        layout
    }

    #[test]
    fn test_for_columns() {
        assert_eq!(PinnedSet::for_columns(10, 2, false).indices(), &[0, 1, 2]);
        assert_eq!(PinnedSet::for_columns(10, 0, true).indices(), &[0, 9]);
        assert_eq!(PinnedSet::for_columns(3, 5, true).indices(), &[0, 1, 2]);
        assert_eq!(PinnedSet::for_columns(1, 0, true).indices(), &[0]);
        assert!(PinnedSet::for_columns(0, 2, true).is_empty());
    }

    #[test]
    fn test_inserts_missing_indices_in_order() {
        let widths = [40.0, 100.0, 120.0, 80.0, 100.0, 100.0, 100.0, 60.0];
        let layout = columns(&widths);
        let window = layout.window(400.0, 100.0, 0);
        assert_eq!(window.indices().collect::<Vec<_>>(), vec![4, 5]);

        let pinned = PinnedSet::for_columns(widths.len(), 2, true);
        let out = apply_pinning(&window, &pinned, &layout);
        assert_eq!(out.indices().collect::<Vec<_>>(), vec![0, 1, 2, 4, 5, 7]);
        assert_eq!(out.get(0).unwrap().start, 0.0);
        assert_eq!(out.get(1).unwrap().start, 40.0);
        assert_eq!(out.get(2).unwrap().start, 140.0);
        assert_eq!(out.get(7).unwrap().start, 640.0);
        // input untouched
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_trailing_index_not_duplicated() {
        let layout = columns(&[40.0, 100.0, 100.0]);
        let window = layout.window(0.0, 1000.0, 0);
        let out = apply_pinning(&window, &PinnedSet::for_columns(3, 0, true), &layout);
        assert_eq!(out.indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_idempotent() {
        let layout = columns(&[40.0; 30]);
        let window = layout.window(600.0, 200.0, 1);
        let pinned = PinnedSet::for_columns(30, 3, true);
        let once = apply_pinning(&window, &pinned, &layout);
        let twice = apply_pinning(&once, &pinned, &layout);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_out_of_range_pins_are_ignored() {
        let layout = columns(&[40.0, 100.0]);
        let window = layout.window(0.0, 30.0, 0);
        let out = apply_pinning(&window, &PinnedSet::new([0, 5]), &layout);
        assert_eq!(out.indices().collect::<Vec<_>>(), vec![0]);
    }
}
