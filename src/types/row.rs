use std::fmt;
use std::rc::Rc;

use super::ItemKey;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 40.0;

type HeightFn<T> = dyn Fn(&T, usize) -> f32;
type KeyFn<T> = dyn Fn(&T, usize) -> Option<ItemKey>;

/// Row sizing: one height for every row, or a height per row.
pub enum RowHeight<T> {
    Fixed(f32),
    Computed(Rc<HeightFn<T>>),
}

impl<T> RowHeight<T> {
    pub fn computed(f: impl Fn(&T, usize) -> f32 + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Height of row `index`. Rows missing from `data` get [`DEFAULT_ROW_HEIGHT`].
    pub fn height(&self, data: &[T], index: usize) -> f32 {
        match self {
            Self::Fixed(height) => *height,
            Self::Computed(f) => data
                .get(index)
                .map_or(DEFAULT_ROW_HEIGHT, |row| f(row, index)),
        }
    }

    /// True when both describe the same sizing source, so cached row
    /// measurements stay valid.
    pub fn same_source(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a.to_bits() == b.to_bits(),
            (Self::Computed(a), Self::Computed(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Default for RowHeight<T> {
    fn default() -> Self {
        Self::Fixed(DEFAULT_ROW_HEIGHT)
    }
}

impl<T> Clone for RowHeight<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(height) => Self::Fixed(*height),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for RowHeight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(height) => f.debug_tuple("Fixed").field(height).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Row identity accessor.
#[derive(Default)]
pub enum RowKey<T> {
    /// Positional index
    #[default]
    Index,
    Computed(Rc<KeyFn<T>>),
}

impl<T> RowKey<T> {
    pub fn computed(f: impl Fn(&T, usize) -> Option<ItemKey> + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Key for row `index`, falling back to the index when the accessor
    /// cannot produce one.
    pub fn resolve(&self, data: &[T], index: usize) -> ItemKey {
        let Self::Computed(f) = self else {
            return ItemKey::Index(index);
        };
        match data.get(index).and_then(|row| f(row, index)) {
            Some(key) => key,
            None => {
                tracing::trace!(
                    target: "sheetgrid::render",
                    index,
                    "row key unresolved, using position"
                );
                ItemKey::Index(index)
            }
        }
    }
}

impl RowKey<serde_json::Value> {
    /// Key rows by a named property. Only string and number values count.
    pub fn property(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::computed(move |row, _| match row.get(name.as_str())? {
            serde_json::Value::String(s) => Some(ItemKey::Named(s.clone())),
            serde_json::Value::Number(n) => Some(ItemKey::Named(n.to_string())),
            _ => None,
        })
    }
}

impl<T> Clone for RowKey<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Index => Self::Index,
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for RowKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("Index"),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_height() {
        let h = RowHeight::<()>::Fixed(24.0);
        assert_eq!(h.height(&[], 1_000), 24.0);
    }

    #[test]
    fn test_computed_height_out_of_range_uses_default() {
        let h = RowHeight::computed(|row: &u32, _| *row as f32);
        assert_eq!(h.height(&[10, 60], 1), 60.0);
        assert_eq!(h.height(&[10, 60], 2), DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_same_source() {
        let f = RowHeight::computed(|_: &u32, _| 30.0);
        assert!(f.same_source(&f.clone()));
        assert!(!f.same_source(&RowHeight::computed(|_: &u32, _| 30.0)));
        assert!(RowHeight::<u32>::Fixed(30.0).same_source(&RowHeight::Fixed(30.0)));
        assert!(!RowHeight::<u32>::Fixed(30.0).same_source(&RowHeight::Fixed(31.0)));
    }

    #[test]
    fn test_property_key() {
        let data = vec![
            json!({"id": "a"}),
            json!({"id": 7}),
            json!({"id": true}),
            json!({"name": "no id"}),
            json!(42),
        ];
        let key = RowKey::property("id");
        assert_eq!(key.resolve(&data, 0), ItemKey::Named("a".into()));
        assert_eq!(key.resolve(&data, 1), ItemKey::Named("7".into()));
        assert_eq!(key.resolve(&data, 2), ItemKey::Index(2));
        assert_eq!(key.resolve(&data, 3), ItemKey::Index(3));
        assert_eq!(key.resolve(&data, 4), ItemKey::Index(4));
        assert_eq!(key.resolve(&data, 9), ItemKey::Index(9));
    }
}
