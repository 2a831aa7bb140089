use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Row context handed to per-cell resolvers.
pub struct CellContext<'a, T> {
    pub row_data: &'a T,
    pub row_index: usize,
    /// Column id, `None` for row-level resolvers and id-less columns.
    pub column_id: Option<&'a str>,
}

type ClassFn<T> = dyn Fn(&CellContext<'_, T>) -> Option<String>;
type DisabledFn<T> = dyn Fn(&T, usize) -> bool;

/// Cell content renderer. Receives the row context and returns display text.
pub type CellRenderer<T> = Rc<dyn Fn(&CellContext<'_, T>) -> String>;

/// Class-name source: either a fixed string or a function of the row.
pub enum ClassResolver<T> {
    Static(String),
    Computed(Rc<ClassFn<T>>),
}

impl<T> ClassResolver<T> {
    pub fn computed(f: impl Fn(&CellContext<'_, T>) -> Option<String> + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Resolve to a class string. Empty results count as no contribution.
    pub fn resolve(&self, ctx: &CellContext<'_, T>) -> Option<String> {
        let class = match self {
            Self::Static(class) => Some(class.clone()),
            Self::Computed(f) => f(ctx),
        };
        class.filter(|c| !c.trim().is_empty())
    }
}

impl<T> Clone for ClassResolver<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(class) => Self::Static(class.clone()),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for ClassResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(class) => f.debug_tuple("Static").field(class).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<&str> for ClassResolver<T> {
    fn from(class: &str) -> Self {
        Self::Static(class.to_string())
    }
}

/// Whether a column's cells accept edits.
pub enum Disabled<T> {
    Static(bool),
    Computed(Rc<DisabledFn<T>>),
}

impl<T> Disabled<T> {
    pub fn resolve(&self, row_data: &T, row_index: usize) -> bool {
        match self {
            Self::Static(disabled) => *disabled,
            Self::Computed(f) => f(row_data, row_index),
        }
    }
}

impl<T> Default for Disabled<T> {
    fn default() -> Self {
        Self::Static(false)
    }
}

impl<T> Clone for Disabled<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(disabled) => Self::Static(*disabled),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Disabled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(disabled) => f.debug_tuple("Static").field(disabled).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Flex sizing hints for a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSizing {
    /// Starting width before free space is distributed
    pub basis: f32,
    /// Share of positive free space
    pub grow: f32,
    /// Share of negative free space, weighted by `basis`
    pub shrink: f32,
    pub min_width: f32,
    pub max_width: Option<f32>,
}

impl Default for ColumnSizing {
    fn default() -> Self {
        Self {
            basis: 1.0,
            grow: 1.0,
            shrink: 1.0,
            min_width: 100.0,
            max_width: None,
        }
    }
}

impl ColumnSizing {
    /// Rigid column of exactly `width` pixels.
    pub fn fixed(width: f32) -> Self {
        Self {
            basis: width,
            grow: 0.0,
            shrink: 0.0,
            min_width: 0.0,
            max_width: None,
        }
    }
}

/// Everything the compositor needs to know about one rendering column.
///
/// Index 0 of a column list is always the gutter; an optional sticky right
/// column sits at the end.
pub struct ColumnDescriptor<T> {
    pub id: Option<String>,
    pub title: Option<String>,
    pub sizing: ColumnSizing,
    pub disabled: Disabled<T>,
    pub cell_class: Option<ClassResolver<T>>,
    pub header_class: Option<String>,
    pub render: Option<CellRenderer<T>>,
}

/// Default gutter width in pixels
pub const GUTTER_WIDTH: f32 = 40.0;

impl<T> ColumnDescriptor<T> {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            sizing: ColumnSizing::default(),
            disabled: Disabled::default(),
            cell_class: None,
            header_class: None,
            render: None,
        }
    }

    /// The reserved leading column used for row handles.
    pub fn gutter() -> Self {
        Self::new().with_sizing(ColumnSizing::fixed(GUTTER_WIDTH))
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_sizing(mut self, sizing: ColumnSizing) -> Self {
        self.sizing = sizing;
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Disabled::Static(disabled);
        self
    }

    #[must_use]
    pub fn disabled_when(mut self, f: impl Fn(&T, usize) -> bool + 'static) -> Self {
        self.disabled = Disabled::Computed(Rc::new(f));
        self
    }

    #[must_use]
    pub fn with_cell_class(mut self, class: ClassResolver<T>) -> Self {
        self.cell_class = Some(class);
        self
    }

    #[must_use]
    pub fn with_header_class(mut self, class: impl Into<String>) -> Self {
        self.header_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_renderer(
        mut self,
        render: impl Fn(&CellContext<'_, T>) -> String + 'static,
    ) -> Self {
        self.render = Some(Rc::new(render));
        self
    }
}

impl<T> Default for ColumnDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            sizing: self.sizing,
            disabled: self.disabled.clone(),
            cell_class: self.cell_class.clone(),
            header_class: self.header_class.clone(),
            render: self.render.as_ref().map(Rc::clone),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("sizing", &self.sizing)
            .field("disabled", &self.disabled)
            .field("cell_class", &self.cell_class)
            .field("header_class", &self.header_class)
            .finish_non_exhaustive()
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

    fn ctx(row: &i32, row_index: usize) -> CellContext<'_, i32> {
        CellContext {
            row_data: row,
            row_index,
            column_id: Some("qty"),
        }
    }

    #[test]
    fn test_static_class_resolves() {
        let resolver: ClassResolver<i32> = "numeric".into();
        assert_eq!(resolver.resolve(&ctx(&1, 0)).as_deref(), Some("numeric"));
    }

    #[test]
    fn test_blank_class_is_no_contribution() {
        let resolver: ClassResolver<i32> = ClassResolver::Static("  ".into());
        assert_eq!(resolver.resolve(&ctx(&1, 0)), None);
    }

    #[test]
    fn test_computed_class_sees_row_and_column() {
        let resolver = ClassResolver::computed(|c: &CellContext<'_, i32>| {
            (*c.row_data < 0).then(|| format!("negative-{}", c.column_id.unwrap_or("")))
        });
        assert_eq!(resolver.resolve(&ctx(&5, 0)), None);
        assert_eq!(
            resolver.resolve(&ctx(&-5, 0)).as_deref(),
            Some("negative-qty")
        );
    }

    #[test]
    fn test_disabled_predicate() {
        let col = ColumnDescriptor::<i32>::new().disabled_when(|_, row_index| row_index % 2 == 1);
        assert!(!col.disabled.resolve(&0, 0));
        assert!(col.disabled.resolve(&0, 1));
        assert!(ColumnDescriptor::<i32>::new()
            .with_disabled(true)
            .disabled
            .resolve(&0, 0));
    }

    #[test]
    fn test_sizing_defaults_from_json() {
        let sizing: ColumnSizing = serde_json::from_str(r#"{"basis": 120, "grow": 0}"#).unwrap();
        assert_eq!(sizing.basis, 120.0);
        assert_eq!(sizing.grow, 0.0);
        assert_eq!(sizing.shrink, 1.0);
        assert_eq!(sizing.min_width, 100.0);
        assert_eq!(sizing.max_width, None);
    }
}
