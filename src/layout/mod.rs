//! Layout engine for the virtualized grid.
//!
//! This module handles:
//! - Prefix-sum measurement of rows and columns with binary-search windowing
//! - Pinned columns that stay materialized at fixed offsets
//! - Column width resolution and change detection
//! - Viewport state supplied by the rendering surface

mod axis;
mod column_widths;
mod pinning;
mod resize;
mod viewport;

pub use axis::{compute_window, AxisLayout, AxisWindow, WindowedItem};
pub use column_widths::resolve_column_widths;
pub use pinning::{apply_pinning, PinnedSet};
pub use resize::ResizeReactor;
pub use viewport::{Stickiness, Viewport};
