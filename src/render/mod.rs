//! Compositing of the windowed grid into render instructions.
//!
//! This module provides:
//! - The compositor crossing row and column windows into positioned cells
//! - Selection and active-cell highlight bounds
//! - The frame types handed to the rendering surface
//! - A bounded cache backing per-row bound intents

pub mod cache;
pub mod compositor;
pub mod frame;
pub mod overlay;

pub use compositor::{compose, FrameInput};
pub use frame::{
    CellContent, CellFlags, CellProps, Frame, HeaderRow, RenderInstruction, RowInstruction,
};
pub use overlay::SelectionBounds;
