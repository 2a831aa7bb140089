//! sheetgrid - virtualized layout and compositing for large editable grids
//!
//! Materializes only the rows and columns inside the viewport (plus overscan)
//! and emits positioned, classed render instructions for them:
//! - Prefix-sum windowing over variable row heights and column widths
//! - Gutter, pinned-left and sticky-right columns at scroll-independent offsets
//! - Selection and active-cell highlighting mapped onto the window
//! - Outbound intents bound per row, never mutating the dataset
//!
//! # Usage (Rust)
//!
//! ```
//! use sheetgrid::{ColumnDescriptor, DataGrid, GridOptions, GridProps, Viewport};
//!
//! let data: Vec<u32> = (0..10_000).collect();
//! let columns = vec![
//!     ColumnDescriptor::gutter(),
//!     ColumnDescriptor::new().with_id("value"),
//! ];
//! let mut grid = DataGrid::new(GridOptions::default()).unwrap();
//! let frame = grid.frame::<()>(&GridProps::new(&data, &columns), &Viewport::new(800.0, 400.0), None);
//! assert!(frame.rows.len() < 30);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridViewer } from 'sheetgrid';
//! await init();
//! const viewer = new GridViewer({ columns, rows, containerWidth: 800 });
//! viewer.setIntentCallback((intent) => console.log(intent));
//! const frame = viewer.frame();
//! ```

pub mod error;
pub mod grid;
pub mod intents;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use grid::{DataGrid, GridOptions, GridProps};
pub use intents::{
    ForwardIntents, GridIntents, Intent, IntentCache, IntentLog, RowIntents, ScrollEvent,
    StopEditingOptions,
};
pub use layout::{
    apply_pinning, compute_window, resolve_column_widths, AxisLayout, AxisWindow, PinnedSet,
    ResizeReactor, Stickiness, Viewport, WindowedItem,
};
pub use render::{
    compose, CellContent, CellFlags, CellProps, Frame, FrameInput, HeaderRow, RenderInstruction,
    RowInstruction, SelectionBounds,
};
pub use types::*;
pub use viewer::{ColumnSpec, GridViewer, RowAction, ViewerConfig};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
