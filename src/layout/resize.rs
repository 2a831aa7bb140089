//! Column width change detection.

use std::sync::Arc;

/// Tracks the identity of the column-width array between frames.
///
/// Widths are shared as `Arc<[f32]>`; a new allocation means new widths. A
/// change in presence or in column count also counts as a change.
#[derive(Debug, Default)]
pub struct ResizeReactor {
    last: Option<Arc<[f32]>>,
    last_count: Option<usize>,
}

impl ResizeReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the widths for this frame. Returns `true` when the column
    /// measurement cache must be rebuilt.
    pub fn observe(&mut self, widths: Option<&Arc<[f32]>>, count: usize) -> bool {
        let same_widths = match (&self.last, widths) {
            (None, None) => true,
            (Some(prev), Some(next)) => Arc::ptr_eq(prev, next),
            _ => false,
        };
        let changed = !same_widths || self.last_count != Some(count);
        if changed {
            tracing::debug!(
                target: "sheetgrid::layout",
                count,
                has_widths = widths.is_some(),
                "column widths changed"
            );
            self.last = widths.map(Arc::clone);
            self.last_count = Some(count);
        }
        changed
    }

    /// Forget the last observation so the next one reports a change.
    pub fn reset(&mut self) {
        self.last = None;
        self.last_count = None;
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
    fn test_first_observation_is_a_change() {
        let mut reactor = ResizeReactor::new();
        assert!(reactor.observe(None, 4));
        assert!(!reactor.observe(None, 4));
    }

    #[test]
    fn test_identity_not_contents() {
        let mut reactor = ResizeReactor::new();
        let widths: Arc<[f32]> = Arc::from(vec![40.0, 100.0]);
        assert!(reactor.observe(Some(&widths), 2));
        assert!(!reactor.observe(Some(&Arc::clone(&widths)), 2));

        // Equal contents in a new allocation still invalidate
        let copy: Arc<[f32]> = Arc::from(vec![40.0, 100.0]);
        assert!(reactor.observe(Some(&copy), 2));
    }

    #[test]
    fn test_count_change() {
        let mut reactor = ResizeReactor::new();
        let widths: Arc<[f32]> = Arc::from(vec![40.0, 100.0]);
        reactor.observe(Some(&widths), 2);
        assert!(reactor.observe(Some(&widths), 3));
        assert!(reactor.observe(None, 3));
    }

    #[test]
    fn test_reset() {
        let mut reactor = ResizeReactor::new();
        reactor.observe(None, 1);
        reactor.reset();
        assert!(reactor.observe(None, 1));
    }
}
