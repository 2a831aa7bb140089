//! Data types shared by the layout and render layers.

mod cell;
mod column;
mod context_menu;
mod row;
mod selection;

pub(crate) use cell::to_i64;
pub use cell::*;
pub use column::*;
pub use context_menu::*;
pub use row::*;
pub use selection::*;
