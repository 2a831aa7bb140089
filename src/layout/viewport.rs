//! Viewport measurement supplied by the rendering surface.

use serde::{Deserialize, Serialize};

/// Visible area of the scroll container.
///
/// The grid never reads scroll state on its own; the adapter copies these
/// numbers from the rendering surface before each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in content coordinates
    pub scroll_y: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

/// How a cell reacts to horizontal scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stickiness {
    #[default]
    Scrolling,
    /// Stays at its pinned offset from the left edge
    Left,
    /// Sticks to the right edge while its natural position is off-screen
    Right,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Clamp scroll position so the last content stays reachable but never
    /// scrolls past it.
    pub fn clamp_scroll(&mut self, content_width: f32, content_height: f32) {
        let max_x = (content_width - self.width).max(0.0);
        let max_y = (content_height - self.height).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Screen x of a cell placed at content offset `left`.
    ///
    /// Left-pinned cells render at their pinned offset; a right-sticky cell
    /// stays at its natural position until that would leave the viewport.
    pub fn screen_x(&self, left: f32, width: f32, stickiness: Stickiness) -> f32 {
        let natural = left - self.scroll_x;
        match stickiness {
            Stickiness::Scrolling => natural,
            Stickiness::Left => natural.max(left),
            Stickiness::Right => natural.min(self.width - width),
        }
    }

    /// Screen y of a row placed at content offset `top`; the header row
    /// (`sticky = true`) stays at the top.
    pub fn screen_y(&self, top: f32, sticky: bool) -> f32 {
        if sticky {
            top
        } else {
            top - self.scroll_y
        }
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

    #[test]
    fn test_clamp_scroll() {
        let mut viewport = Viewport::new(800.0, 400.0);
        viewport.scroll_x = 5_000.0;
        viewport.scroll_y = -20.0;
        viewport.clamp_scroll(1_200.0, 40_000.0);
        assert_eq!(viewport.scroll_x, 400.0);
        assert_eq!(viewport.scroll_y, 0.0);
    }

    #[test]
    fn test_content_smaller_than_viewport() {
        let mut viewport = Viewport::new(800.0, 400.0);
        viewport.scroll_x = 100.0;
        viewport.scroll_y = 100.0;
        viewport.clamp_scroll(500.0, 300.0);
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 0.0);
    }

    #[test]
    fn test_screen_x_sticky_left_ignores_scroll() {
        let mut viewport = Viewport::new(800.0, 400.0);
        viewport.scroll_x = 1_000.0;
        assert_eq!(viewport.screen_x(40.0, 100.0, Stickiness::Left), 40.0);
        assert_eq!(viewport.screen_x(1_100.0, 100.0, Stickiness::Scrolling), 100.0);
    }

    #[test]
    fn test_screen_x_sticky_right() {
        let mut viewport = Viewport::new(800.0, 400.0);
        // Natural position off to the right: pinned at the right edge
        assert_eq!(viewport.screen_x(2_000.0, 60.0, Stickiness::Right), 740.0);
        // Scrolled to the end: natural position wins
        viewport.scroll_x = 1_400.0;
        assert_eq!(viewport.screen_x(2_000.0, 60.0, Stickiness::Right), 600.0);
    }

    #[test]
    fn test_screen_y() {
        let mut viewport = Viewport::new(800.0, 400.0);
        viewport.scroll_y = 200.0;
        assert_eq!(viewport.screen_y(0.0, true), 0.0);
        assert_eq!(viewport.screen_y(240.0, false), 40.0);
    }
}
