//! Stateful grid driving one frame end to end.
//!
//! [`DataGrid`] owns everything that survives between frames: the row and
//! column measurement caches, the resize reactor and the bound-intent cache.
//! All other state arrives with each call through [`GridProps`] and the
//! [`Viewport`].

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{GridError, Result};
use crate::intents::{GridIntents, IntentCache, RowIntents, ScrollEvent};
use crate::layout::{apply_pinning, AxisLayout, PinnedSet, ResizeReactor, Viewport};
use crate::render::{compose, Frame, FrameInput, SelectionBounds};
use crate::types::{Cell, ClassResolver, ColumnDescriptor, RowHeight, RowKey, Selection};

/// Rows materialized above and below the viewport
pub const DEFAULT_ROW_OVERSCAN: usize = 5;
/// Columns materialized left and right of the viewport
pub const DEFAULT_COLUMN_OVERSCAN: usize = 1;
/// Width used for columns missing from the width array
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;
/// Default header row height in pixels
pub const DEFAULT_HEADER_ROW_HEIGHT: f32 = 40.0;
/// Default scroll container height in pixels
pub const DEFAULT_DISPLAY_HEIGHT: f32 = 400.0;

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Height of the header row; `0` hides the header
    pub header_row_height: f32,
    /// Height of the scroll container
    pub display_height: f32,
    /// Number of data columns pinned to the left after the gutter
    pub pin_first_columns: usize,
    /// The last column sticks to the right edge
    pub has_sticky_right_column: bool,
    /// Span the container instead of the summed column widths
    pub full_width: bool,
    pub row_overscan: usize,
    pub column_overscan: usize,
    pub default_column_width: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            header_row_height: DEFAULT_HEADER_ROW_HEIGHT,
            display_height: DEFAULT_DISPLAY_HEIGHT,
            pin_first_columns: 0,
            has_sticky_right_column: false,
            full_width: false,
            row_overscan: DEFAULT_ROW_OVERSCAN,
            column_overscan: DEFAULT_COLUMN_OVERSCAN,
            default_column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl GridOptions {
    /// Reject values that would produce a nonsensical layout.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("headerRowHeight", self.header_row_height),
            ("displayHeight", self.display_height),
            ("defaultColumnWidth", self.default_column_width),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-frame inputs owned by the caller.
pub struct GridProps<'a, T> {
    pub data: &'a [T],
    /// Rendering columns: gutter at 0, optional sticky right column last
    pub columns: &'a [ColumnDescriptor<T>],
    /// Resolved column widths; a new allocation means new widths
    pub column_widths: Option<Arc<[f32]>>,
    pub selection: Option<Selection>,
    pub active_cell: Option<Cell>,
    pub editing: bool,
    pub row_height: RowHeight<T>,
    pub row_key: RowKey<T>,
    pub row_class: Option<ClassResolver<T>>,
    pub cell_class: Option<ClassResolver<T>>,
}

impl<'a, T> GridProps<'a, T> {
    pub fn new(data: &'a [T], columns: &'a [ColumnDescriptor<T>]) -> Self {
        Self {
            data,
            columns,
            column_widths: None,
            selection: None,
            active_cell: None,
            editing: false,
            row_height: RowHeight::default(),
            row_key: RowKey::default(),
            row_class: None,
            cell_class: None,
        }
    }

    #[must_use]
    pub fn with_column_widths(mut self, widths: Arc<[f32]>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Option<Selection>) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_active_cell(mut self, active_cell: Option<Cell>, editing: bool) -> Self {
        self.active_cell = active_cell;
        self.editing = editing;
        self
    }

    #[must_use]
    pub fn with_row_height(mut self, row_height: RowHeight<T>) -> Self {
        self.row_height = row_height;
        self
    }

    #[must_use]
    pub fn with_row_key(mut self, row_key: RowKey<T>) -> Self {
        self.row_key = row_key;
        self
    }

    #[must_use]
    pub fn with_row_class(mut self, class: ClassResolver<T>) -> Self {
        self.row_class = Some(class);
        self
    }

    #[must_use]
    pub fn with_cell_class(mut self, class: ClassResolver<T>) -> Self {
        self.cell_class = Some(class);
        self
    }
}

/// What the row measurement cache was built from.
struct RowSource<T> {
    count: usize,
    header_bits: u32,
    height: RowHeight<T>,
    /// Only tracked for per-row heights, which depend on the data
    data: Option<*const T>,
}

impl<T> RowSource<T> {
    fn of(props: &GridProps<'_, T>, header_row_height: f32) -> Self {
        let data = matches!(props.row_height, RowHeight::Computed(_)).then(|| props.data.as_ptr());
        Self {
            count: props.data.len(),
            header_bits: header_row_height.to_bits(),
            height: props.row_height.clone(),
            data,
        }
    }

    fn matches(&self, other: &Self) -> bool {
        self.count == other.count
            && self.header_bits == other.header_bits
            && self.data == other.data
            && self.height.same_source(&other.height)
    }
}

/// The virtualized grid.
pub struct DataGrid<T> {
    options: GridOptions,
    rows: AxisLayout,
    cols: AxisLayout,
    resize: ResizeReactor,
    intents: IntentCache,
    row_source: Option<RowSource<T>>,
}

impl<T> DataGrid<T> {
    pub fn new(options: GridOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            rows: AxisLayout::new(),
            cols: AxisLayout::new(),
            resize: ResizeReactor::new(),
            intents: IntentCache::default(),
            row_source: None,
        })
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Replace the configuration. Layout caches rebuild on the next frame.
    pub fn set_options(&mut self, options: GridOptions) -> Result<()> {
        options.validate()?;
        if options.default_column_width.to_bits() != self.options.default_column_width.to_bits() {
            self.resize.reset();
        }
        self.options = options;
        Ok(())
    }

    /// Force a row re-measure, for row heights that changed in place.
    pub fn invalidate_rows(&mut self) {
        self.rows.invalidate();
        self.row_source = None;
    }

    /// Force a column re-measure on the next frame.
    pub fn invalidate_columns(&mut self) {
        self.cols.invalidate();
        self.resize.reset();
    }

    /// Scrollable content size `(width, height)` as of the last frame.
    pub fn content_size(&self) -> (f32, f32) {
        (self.cols.total_extent(), self.rows.total_extent())
    }

    /// Compute the frame for the current props and viewport.
    pub fn frame<K>(
        &mut self,
        props: &GridProps<'_, T>,
        viewport: &Viewport,
        children: Option<K>,
    ) -> Frame<K> {
        self.measure(props);

        let opts = &self.options;
        let row_window = self
            .rows
            .window(viewport.scroll_y, viewport.height, opts.row_overscan);
        let col_window = self
            .cols
            .window(viewport.scroll_x, viewport.width, opts.column_overscan);
        let pinned = PinnedSet::for_columns(
            props.columns.len(),
            opts.pin_first_columns,
            opts.has_sticky_right_column,
        );
        let col_window = apply_pinning(&col_window, &pinned, &self.cols);

        tracing::trace!(
            target: "sheetgrid::grid",
            scroll_x = viewport.scroll_x,
            scroll_y = viewport.scroll_y,
            rows = row_window.len(),
            cols = col_window.len(),
            "frame windows"
        );

        let input = FrameInput {
            data: props.data,
            columns: props.columns,
            bounds: SelectionBounds::resolve(props.selection.as_ref(), props.active_cell),
            active_cell: props.active_cell,
            editing: props.editing,
            row_key: &props.row_key,
            row_class: props.row_class.as_ref(),
            cell_class: props.cell_class.as_ref(),
            header_row_height: opts.header_row_height,
            display_height: opts.display_height,
            pin_first_columns: opts.pin_first_columns,
            has_sticky_right_column: opts.has_sticky_right_column,
            full_width: opts.full_width,
        };
        compose(&row_window, &col_window, &input, &mut self.intents, children)
    }

    /// Bring both measurement caches up to date with `props`.
    ///
    /// [`DataGrid::frame`] does this itself; call it directly to read
    /// [`DataGrid::content_size`] before composing.
    pub fn measure(&mut self, props: &GridProps<'_, T>) {
        self.measure_rows(props);
        self.measure_columns(props);
    }

    /// Intents bound to `row_index`, shared with the cells of the last frame.
    pub fn row_intents(&mut self, props: &GridProps<'_, T>, row_index: usize) -> Rc<RowIntents> {
        let key = props.row_key.resolve(props.data, row_index);
        self.intents.bind(row_index, &key)
    }

    /// Forward a scroll event unchanged.
    pub fn on_scroll(&self, event: ScrollEvent, sink: &dyn GridIntents<T>) {
        sink.on_scroll(event);
    }

    fn measure_rows(&mut self, props: &GridProps<'_, T>) {
        let source = RowSource::of(props, self.options.header_row_height);
        let fresh = self.rows.is_measured()
            && self
                .row_source
                .as_ref()
                .is_some_and(|prev| prev.matches(&source));
        if fresh {
            return;
        }
        tracing::debug!(
            target: "sheetgrid::grid",
            count = source.count,
            "re-measuring rows"
        );
        let data = props.data;
        let height = &props.row_height;
        self.rows
            .measure(data.len(), self.options.header_row_height, |i| height.height(data, i));
        self.row_source = Some(source);
    }

    fn measure_columns(&mut self, props: &GridProps<'_, T>) {
        let count = props.columns.len();
        let changed = self.resize.observe(props.column_widths.as_ref(), count);
        if !changed && self.cols.is_measured() {
            return;
        }
        let fallback = self.options.default_column_width;
        let widths = props.column_widths.as_deref().unwrap_or(&[]);
        self.cols
            .measure(count, 0.0, |i| widths.get(i).copied().unwrap_or(fallback));
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
    use crate::intents::{Intent, IntentLog};
    use std::cell::Cell as Counter;

    fn columns(n: usize) -> Vec<ColumnDescriptor<u32>> {
        std::iter::once(ColumnDescriptor::gutter())
            .chain((0..n).map(|i| ColumnDescriptor::new().with_id(format!("c{i}"))))
            .collect()
    }

    #[test]
    fn test_options_json_defaults() {
        let opts: GridOptions = serde_json::from_str(r#"{"pinFirstColumns": 2}"#).unwrap();
        assert_eq!(opts.pin_first_columns, 2);
        assert_eq!(opts.row_overscan, 5);
        assert_eq!(opts.column_overscan, 1);
        assert_eq!(opts.default_column_width, 100.0);
    }

    #[test]
    fn test_validate_rejects_negative_header() {
        let opts = GridOptions {
            header_row_height: -1.0,
            ..GridOptions::default()
        };
        assert!(matches!(opts.validate(), Err(GridError::Config(_))));
        assert!(DataGrid::<u32>::new(opts).is_err());
    }

    #[test]
    fn test_rows_measured_once_for_same_source() {
        let calls = Rc::new(Counter::new(0));
        let counter = Rc::clone(&calls);
        let height = RowHeight::computed(move |_: &u32, _| {
            counter.set(counter.get() + 1);
            30.0
        });
        let data: Vec<u32> = (0..50).collect();
        let cols = columns(2);
        let mut grid = DataGrid::new(GridOptions::default()).unwrap();
        let props = GridProps::new(&data, &cols).with_row_height(height);

        grid.frame::<()>(&props, &Viewport::new(400.0, 200.0), None);
        grid.frame::<()>(&props, &Viewport::new(400.0, 200.0), None);
        assert_eq!(calls.get(), 50);

        grid.invalidate_rows();
        grid.frame::<()>(&props, &Viewport::new(400.0, 200.0), None);
        assert_eq!(calls.get(), 100);
    }

    #[test]
    fn test_new_width_array_remeasures_columns() {
        let data: Vec<u32> = vec![1];
        let cols = columns(2);
        let mut grid = DataGrid::new(GridOptions::default()).unwrap();
        let viewport = Viewport::new(1_000.0, 200.0);

        let narrow: Arc<[f32]> = Arc::from(vec![40.0, 50.0, 50.0]);
        let props = GridProps::new(&data, &cols).with_column_widths(Arc::clone(&narrow));
        let frame = grid.frame::<()>(&props, &viewport, None);
        assert_eq!(frame.inner_width, Some(140.0));

        let wide: Arc<[f32]> = Arc::from(vec![40.0, 200.0, 200.0]);
        let props = GridProps::new(&data, &cols).with_column_widths(wide);
        let frame = grid.frame::<()>(&props, &viewport, None);
        assert_eq!(frame.inner_width, Some(440.0));
        assert_eq!(frame.cell(0, 2).unwrap().left, 240.0);
    }

    #[test]
    fn test_missing_widths_fall_back_to_default() {
        let data: Vec<u32> = vec![1];
        let cols = columns(3);
        let mut grid = DataGrid::new(GridOptions::default()).unwrap();
        let props = GridProps::new(&data, &cols).with_column_widths(Arc::from(vec![40.0]));
        let frame = grid.frame::<()>(&props, &Viewport::new(1_000.0, 200.0), None);
        assert_eq!(frame.inner_width, Some(340.0));
    }

    #[test]
    fn test_scroll_is_forwarded() {
        let grid = DataGrid::<u32>::new(GridOptions::default()).unwrap();
        let log = IntentLog::new();
        let event = ScrollEvent {
            scroll_left: 10.0,
            scroll_top: 20.0,
        };
        grid.on_scroll(event, &log);
        assert_eq!(
            log.take(),
            vec![Intent::Scroll {
                scroll_left: 10.0,
                scroll_top: 20.0
            }]
        );
    }

    #[test]
    fn test_row_intents_match_frame_cells() {
        let data: Vec<u32> = (0..10).collect();
        let cols = columns(1);
        let mut grid = DataGrid::new(GridOptions::default()).unwrap();
        let props = GridProps::new(&data, &cols);
        let frame = grid.frame::<()>(&props, &Viewport::new(400.0, 400.0), None);
        let from_cell = &frame.cell(3, 1).unwrap().props().unwrap().intents;
        assert!(Rc::ptr_eq(from_cell, &grid.row_intents(&props, 3)));
    }
}
