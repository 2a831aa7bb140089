//! Flex-style column width distribution.
//!
//! Columns start at their `basis`. Positive free space is split by `grow`,
//! negative free space by `shrink × basis`. Columns that cross their min/max
//! are frozen at the limit and the rest is redistributed until no column
//! violates its limits.

use crate::types::ColumnSizing;

fn clamp_width(width: f32, sizing: &ColumnSizing) -> f32 {
    let capped = match sizing.max_width {
        Some(max) => width.min(max),
        None => width,
    };
    // min wins over max
    capped.max(sizing.min_width)
}

/// Resolve concrete column widths for a container `container_width` pixels wide.
///
/// Columns may overflow the container when their minimum widths exceed it.
pub fn resolve_column_widths(container_width: f32, columns: &[ColumnSizing]) -> Vec<f32> {
    let mut widths: Vec<f32> = columns.iter().map(|c| clamp_width(c.basis, c)).collect();
    if !container_width.is_finite() {
        return widths;
    }

    let mut frozen = vec![false; columns.len()];
    // Every pass freezes at least one column or exits.
    for _ in 0..=columns.len() {
        let unfrozen = || {
            columns
                .iter()
                .zip(&frozen)
                .filter(|(_, frozen)| !**frozen)
                .map(|(c, _)| c)
        };
        if unfrozen().next().is_none() {
            break;
        }

        let used: f32 = columns
            .iter()
            .zip(&frozen)
            .zip(&widths)
            .map(|((c, frozen), w)| if *frozen { *w } else { c.basis })
            .sum();
        let free = container_width - used;
        let growing = free >= 0.0;
        let total_factor: f32 = unfrozen()
            .map(|c| if growing { c.grow } else { c.shrink * c.basis })
            .sum();

        let mut total_violation = 0.0;
        let mut targets = Vec::with_capacity(columns.len());
        for (c, is_frozen) in columns.iter().zip(&frozen) {
            if *is_frozen {
                targets.push(None);
                continue;
            }
            let factor = if growing { c.grow } else { c.shrink * c.basis };
            let share = if total_factor > 0.0 {
                free * factor / total_factor
            } else {
                0.0
            };
            let target = c.basis + share;
            let clamped = clamp_width(target, c);
            total_violation += clamped - target;
            targets.push(Some((target, clamped)));
        }

        let mut any_frozen = false;
        for ((target, is_frozen), width) in targets
            .iter()
            .zip(frozen.iter_mut())
            .zip(widths.iter_mut())
        {
            let Some((target, clamped)) = *target else {
                continue;
            };
            let violated = if total_violation > 0.0 {
                clamped > target
            } else if total_violation < 0.0 {
                clamped < target
            } else {
                false
            };
            if violated {
                *is_frozen = true;
                *width = clamped;
                any_frozen = true;
            } else {
                *width = clamped;
            }
        }

        if !any_frozen {
            break;
        }
    }

    widths
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
    use crate::types::GUTTER_WIDTH;

    fn approx(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 0.01, "{a:?} vs {b:?}");
        }
    }

    fn gutter_plus(n: usize) -> Vec<ColumnSizing> {
        let mut cols = vec![ColumnSizing::fixed(GUTTER_WIDTH)];
        cols.extend(std::iter::repeat(ColumnSizing::default()).take(n));
        cols
    }

    #[test]
    fn test_grow_fills_container() {
        let widths = resolve_column_widths(640.0, &gutter_plus(3));
        approx(&widths, &[40.0, 200.0, 200.0, 200.0]);
    }

    #[test]
    fn test_min_width_overflows_narrow_container() {
        let widths = resolve_column_widths(300.0, &gutter_plus(3));
        approx(&widths, &[40.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_max_width_redistributes() {
        let mut cols = gutter_plus(3);
        cols[1].max_width = Some(150.0);
        let widths = resolve_column_widths(640.0, &cols);
        approx(&widths, &[40.0, 150.0, 225.0, 225.0]);
    }

    #[test]
    fn test_shrink_weighted_by_basis() {
        let cols = vec![
            ColumnSizing {
                basis: 300.0,
                min_width: 0.0,
                ..ColumnSizing::default()
            },
            ColumnSizing {
                basis: 100.0,
                min_width: 0.0,
                ..ColumnSizing::default()
            },
        ];
        // 100px of overflow split 3:1
        let widths = resolve_column_widths(300.0, &cols);
        approx(&widths, &[225.0, 75.0]);
    }

    #[test]
    fn test_no_grow_leaves_space_unused() {
        let cols = vec![ColumnSizing::fixed(80.0), ColumnSizing::fixed(120.0)];
        let widths = resolve_column_widths(1000.0, &cols);
        approx(&widths, &[80.0, 120.0]);
    }

    #[test]
    fn test_non_finite_container_uses_basis() {
        let widths = resolve_column_widths(f32::NAN, &gutter_plus(2));
        approx(&widths, &[40.0, 100.0, 100.0]);
    }
}
