//! Outbound user intents.
//!
//! The grid never mutates the dataset. Cells report what the user asked for
//! through [`GridIntents`], and the owning component decides what happens.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::render::cache::BoundedCache;
use crate::types::{ContextMenuItem, ItemKey};

/// Options for ending an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StopEditingOptions {
    /// Move the active cell to the next row after committing
    pub next_row: bool,
}

/// Scroll position reported by the scroll container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEvent {
    pub scroll_left: f32,
    pub scroll_top: f32,
}

/// Callbacks the grid invokes on user interaction.
///
/// Each is called at most once per discrete user action and never
/// speculatively.
pub trait GridIntents<T> {
    fn set_row_data(&self, row_index: usize, value: T);
    fn delete_rows(&self, min: usize, max: Option<usize>);
    fn duplicate_rows(&self, min: usize, max: Option<usize>);
    fn insert_row_after(&self, row: usize, count: Option<usize>);
    fn stop_editing(&self, opts: StopEditingOptions);

    /// Pulled on demand by a cell that needs menu content.
    fn context_menu_items(&self) -> Vec<ContextMenuItem> {
        Vec::new()
    }

    /// Scroll events forwarded unchanged from the container.
    fn on_scroll(&self, _event: ScrollEvent) {}
}

/// Value form of every intent call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent<T> {
    #[serde(rename_all = "camelCase")]
    SetRowData { row_index: usize, value: T },
    DeleteRows { min: usize, max: Option<usize> },
    DuplicateRows { min: usize, max: Option<usize> },
    InsertRowAfter { row: usize, count: Option<usize> },
    #[serde(rename_all = "camelCase")]
    StopEditing { next_row: bool },
    #[serde(rename_all = "camelCase")]
    Scroll { scroll_left: f32, scroll_top: f32 },
}

/// Adapts a single closure into a [`GridIntents`] implementation.
pub struct ForwardIntents<F> {
    forward: F,
    menu_items: Vec<ContextMenuItem>,
}

impl<F> ForwardIntents<F> {
    pub fn new(forward: F) -> Self {
        Self {
            forward,
            menu_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_menu_items(mut self, items: Vec<ContextMenuItem>) -> Self {
        self.menu_items = items;
        self
    }
}

impl<T, F: Fn(Intent<T>)> GridIntents<T> for ForwardIntents<F> {
    fn set_row_data(&self, row_index: usize, value: T) {
        (self.forward)(Intent::SetRowData { row_index, value });
    }

    fn delete_rows(&self, min: usize, max: Option<usize>) {
        (self.forward)(Intent::DeleteRows { min, max });
    }

    fn duplicate_rows(&self, min: usize, max: Option<usize>) {
        (self.forward)(Intent::DuplicateRows { min, max });
    }

    fn insert_row_after(&self, row: usize, count: Option<usize>) {
        (self.forward)(Intent::InsertRowAfter { row, count });
    }

    fn stop_editing(&self, opts: StopEditingOptions) {
        (self.forward)(Intent::StopEditing {
            next_row: opts.next_row,
        });
    }

    fn context_menu_items(&self) -> Vec<ContextMenuItem> {
        self.menu_items.clone()
    }

    fn on_scroll(&self, event: ScrollEvent) {
        (self.forward)(Intent::Scroll {
            scroll_left: event.scroll_left,
            scroll_top: event.scroll_top,
        });
    }
}

/// Records every intent in order.
pub struct IntentLog<T> {
    entries: RefCell<Vec<Intent<T>>>,
}

impl<T> IntentLog<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Drain recorded intents.
    pub fn take(&self) -> Vec<Intent<T>> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn push(&self, intent: Intent<T>) {
        self.entries.borrow_mut().push(intent);
    }
}

impl<T> Default for IntentLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GridIntents<T> for IntentLog<T> {
    fn set_row_data(&self, row_index: usize, value: T) {
        self.push(Intent::SetRowData { row_index, value });
    }

    fn delete_rows(&self, min: usize, max: Option<usize>) {
        self.push(Intent::DeleteRows { min, max });
    }

    fn duplicate_rows(&self, min: usize, max: Option<usize>) {
        self.push(Intent::DuplicateRows { min, max });
    }

    fn insert_row_after(&self, row: usize, count: Option<usize>) {
        self.push(Intent::InsertRowAfter { row, count });
    }

    fn stop_editing(&self, opts: StopEditingOptions) {
        self.push(Intent::StopEditing {
            next_row: opts.next_row,
        });
    }

    fn on_scroll(&self, event: ScrollEvent) {
        self.push(Intent::Scroll {
            scroll_left: event.scroll_left,
            scroll_top: event.scroll_top,
        });
    }
}

/// Intents bound to one row, handed to that row's cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIntents {
    row_index: usize,
    key: ItemKey,
}

impl RowIntents {
    pub fn new(row_index: usize, key: ItemKey) -> Self {
        Self { row_index, key }
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn set_row_data<T>(&self, sink: &dyn GridIntents<T>, value: T) {
        sink.set_row_data(self.row_index, value);
    }

    pub fn delete_row<T>(&self, sink: &dyn GridIntents<T>) {
        sink.delete_rows(self.row_index, None);
    }

    pub fn duplicate_row<T>(&self, sink: &dyn GridIntents<T>) {
        sink.duplicate_rows(self.row_index, None);
    }

    pub fn insert_row_below<T>(&self, sink: &dyn GridIntents<T>) {
        sink.insert_row_after(self.row_index, None);
    }
}

/// Default number of rows whose bound intents are kept
pub const INTENT_CACHE_CAPACITY: usize = 1024;

/// Per-row cache of bound intents, keyed by row index.
///
/// An entry is reused across frames while the row key at its index stays the
/// same, so cells keep receiving the identical `Rc`.
pub struct IntentCache {
    rows: BoundedCache<usize, Rc<RowIntents>>,
}

impl IntentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: BoundedCache::new(capacity),
        }
    }

    /// Bound intents for `row_index`, rebuilt only when `key` changed.
    pub fn bind(&mut self, row_index: usize, key: &ItemKey) -> Rc<RowIntents> {
        if let Some(cached) = self.rows.get(&row_index) {
            if cached.key() == key {
                return Rc::clone(cached);
            }
        }
        let bound = Rc::new(RowIntents::new(row_index, key.clone()));
        self.rows.insert(row_index, Rc::clone(&bound));
        bound
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for IntentCache {
    fn default() -> Self {
        Self::new(INTENT_CACHE_CAPACITY)
    }
}
