//! `GridViewer` - the JSON-driven grid exported to JavaScript.
//!
//! This module provides the WASM-exported `GridViewer` struct that handles:
//! - Building column descriptors from JSON column specs
//! - Resolving column widths against the container width
//! - Tracking viewport, selection and editing state between frames
//! - Forwarding user intents to a JavaScript callback
//!
//! The same type works on native targets, where intents are collected for
//! the caller instead of forwarded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;

use crate::error::Result;
use crate::grid::{DataGrid, GridOptions, GridProps};
use crate::intents::{GridIntents, Intent, IntentLog, ScrollEvent, StopEditingOptions};
use crate::layout::{resolve_column_widths, Viewport};
use crate::render::Frame;
use crate::types::{
    Cell, ClassResolver, ColumnDescriptor, ColumnSizing, ContextMenuItem, RowHeight, RowKey,
    Selection, GUTTER_WIDTH,
};

/// One data column as described in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSpec {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Row property shown as cell text; defaults to `id`
    pub property: Option<String>,
    #[serde(flatten)]
    pub sizing: ColumnSizing,
    pub disabled: bool,
    pub cell_class_name: Option<String>,
    pub header_class_name: Option<String>,
}

/// Everything needed to set up a [`GridViewer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    #[serde(flatten)]
    pub options: GridOptions,
    pub columns: Vec<ColumnSpec>,
    /// Appended after the data columns and pinned to the right edge
    pub sticky_right_column: Option<ColumnSpec>,
    pub gutter_width: Option<f32>,
    pub rows: Vec<Value>,
    /// Row property used as the row key
    pub row_key: Option<String>,
    pub row_height: Option<f32>,
    pub row_class_name: Option<String>,
    pub container_width: Option<f32>,
    pub viewport: Option<Viewport>,
    pub selection: Option<Selection>,
    pub active_cell: Option<Cell>,
    pub editing: bool,
    pub context_menu_items: Vec<ContextMenuItem>,
}

/// A user action reported by a cell, bound to the row it happened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RowAction {
    #[serde(rename_all = "camelCase")]
    SetRowData { row_index: usize, value: Value },
    #[serde(rename_all = "camelCase")]
    DeleteRow { row_index: usize },
    #[serde(rename_all = "camelCase")]
    DuplicateRow { row_index: usize },
    #[serde(rename_all = "camelCase")]
    InsertRowBelow { row_index: usize },
    #[serde(rename_all = "camelCase")]
    StopEditing {
        #[serde(default)]
        next_row: bool,
    },
    #[serde(rename_all = "camelCase")]
    Scroll { scroll_left: f32, scroll_top: f32 },
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn gutter_column(width: f32) -> ColumnDescriptor<Value> {
    ColumnDescriptor::new()
        .with_sizing(ColumnSizing::fixed(width))
        .with_renderer(|ctx| (ctx.row_index + 1).to_string())
}

fn data_column(spec: &ColumnSpec) -> ColumnDescriptor<Value> {
    let mut column: ColumnDescriptor<Value> = ColumnDescriptor::new()
        .with_sizing(spec.sizing)
        .with_disabled(spec.disabled);
    if let Some(id) = &spec.id {
        column = column.with_id(id.as_str());
    }
    if let Some(title) = &spec.title {
        column = column.with_title(title.as_str());
    }
    if let Some(class) = &spec.cell_class_name {
        column = column.with_cell_class(ClassResolver::Static(class.clone()));
    }
    if let Some(class) = &spec.header_class_name {
        column = column.with_header_class(class.as_str());
    }
    if let Some(property) = spec.property.clone().or_else(|| spec.id.clone()) {
        column = column.with_renderer(move |ctx| {
            ctx.row_data
                .get(property.as_str())
                .map(value_text)
                .unwrap_or_default()
        });
    }
    column
}

/// Inputs that persist between frames.
struct Model {
    rows: Vec<Value>,
    columns: Vec<ColumnDescriptor<Value>>,
    sizing: Vec<ColumnSizing>,
    widths: Option<Arc<[f32]>>,
    container_width: Option<f32>,
    viewport: Viewport,
    selection: Option<Selection>,
    active_cell: Option<Cell>,
    editing: bool,
    row_key: RowKey<Value>,
    row_height: RowHeight<Value>,
    row_class: Option<ClassResolver<Value>>,
}

impl Model {
    fn props(&self) -> GridProps<'_, Value> {
        let mut props = GridProps::new(&self.rows, &self.columns)
            .with_selection(self.selection)
            .with_active_cell(self.active_cell, self.editing)
            .with_row_height(self.row_height.clone())
            .with_row_key(self.row_key.clone());
        if let Some(widths) = &self.widths {
            props = props.with_column_widths(Arc::clone(widths));
        }
        if let Some(class) = &self.row_class {
            props = props.with_row_class(class.clone());
        }
        props
    }

    /// Recompute widths; always a fresh allocation.
    fn resolve_widths(&mut self) {
        let container = self.container_width.unwrap_or(f32::NAN);
        self.widths = Some(Arc::from(resolve_column_widths(container, &self.sizing)));
    }
}

/// The grid viewer exported to JavaScript
#[wasm_bindgen]
pub struct GridViewer {
    grid: DataGrid<Value>,
    model: Model,
    menu_items: Vec<ContextMenuItem>,
    intents: IntentLog<Value>,
    /// A sticky right column spec was appended to the columns
    sticky_right: bool,
    #[cfg(target_arch = "wasm32")]
    intent_callback: Option<Function>,
}

// ============================================================================
// Shared Implementation
// ============================================================================

impl GridViewer {
    /// Build a viewer from a parsed configuration.
    pub fn from_config(config: ViewerConfig) -> Result<Self> {
        let mut options = config.options;
        let gutter_width = config.gutter_width.unwrap_or(GUTTER_WIDTH);

        let mut specs = config.columns;
        let sticky_right = config.sticky_right_column.is_some();
        if let Some(sticky) = config.sticky_right_column {
            specs.push(sticky);
        }
        options.has_sticky_right_column |= sticky_right;
        let columns: Vec<ColumnDescriptor<Value>> = std::iter::once(gutter_column(gutter_width))
            .chain(specs.iter().map(data_column))
            .collect();
        let sizing = columns.iter().map(|c| c.sizing).collect();

        let viewport = config.viewport.unwrap_or_else(|| {
            Viewport::new(
                config.container_width.unwrap_or(Viewport::default().width),
                options.display_height,
            )
        });
        let grid = DataGrid::new(options)?;

        let mut model = Model {
            rows: config.rows,
            columns,
            sizing,
            widths: None,
            container_width: config.container_width,
            viewport,
            selection: config.selection,
            active_cell: config.active_cell,
            editing: config.editing,
            row_key: config.row_key.map_or(RowKey::Index, RowKey::property),
            row_height: config.row_height.map_or_else(RowHeight::default, RowHeight::Fixed),
            row_class: config.row_class_name.map(ClassResolver::Static),
        };
        model.resolve_widths();

        tracing::debug!(
            target: "sheetgrid::grid",
            rows = model.rows.len(),
            columns = model.columns.len(),
            "viewer created"
        );

        Ok(Self {
            grid,
            model,
            menu_items: config.context_menu_items,
            intents: IntentLog::new(),
            sticky_right,
            #[cfg(target_arch = "wasm32")]
            intent_callback: None,
        })
    }

    /// Build a viewer from a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_config(serde_json::from_str(json)?)
    }

    pub fn row_count(&self) -> usize {
        self.model.rows.len()
    }

    /// Rendering column count, gutter included.
    pub fn column_count(&self) -> usize {
        self.model.columns.len()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.model.viewport
    }

    /// Replace the dataset.
    pub fn set_rows(&mut self, rows: Vec<Value>) {
        self.model.rows = rows;
    }

    /// Set the scroll position. Clamped to the content on the next frame.
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.model.viewport.scroll_x = x;
        self.model.viewport.scroll_y = y;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.model.viewport.resize(width, height);
    }

    /// Set the width the columns are distributed over.
    pub fn set_container_width(&mut self, width: Option<f32>) {
        self.model.container_width = width;
        self.model.resolve_widths();
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.model.selection = selection;
    }

    pub fn set_active_cell(&mut self, active_cell: Option<Cell>, editing: bool) {
        self.model.active_cell = active_cell;
        self.model.editing = editing;
    }

    /// Replace the grid options. An appended sticky right column stays
    /// sticky whatever `has_sticky_right_column` says.
    pub fn set_options(&mut self, mut options: GridOptions) -> Result<()> {
        options.has_sticky_right_column |= self.sticky_right;
        self.grid.set_options(options)
    }

    pub fn options(&self) -> &GridOptions {
        self.grid.options()
    }

    /// Compose the current frame.
    pub fn frame(&mut self) -> Frame<()> {
        {
            let props = self.model.props();
            self.grid.measure(&props);
        }
        let (width, height) = self.grid.content_size();
        self.model.viewport.clamp_scroll(width, height);

        let viewport = self.model.viewport;
        let props = self.model.props();
        self.grid.frame(&props, &viewport, None)
    }

    /// Compose the current frame as JSON.
    pub fn frame_json(&mut self, pretty: bool) -> Result<String> {
        let frame = self.frame();
        let json = if pretty {
            serde_json::to_string_pretty(&frame)?
        } else {
            serde_json::to_string(&frame)?
        };
        Ok(json)
    }

    /// Route a cell action through the intents bound to its row.
    pub fn dispatch(&mut self, action: RowAction) {
        let props = self.model.props();
        let sink: &dyn GridIntents<Value> = &self.intents;
        match action {
            RowAction::SetRowData { row_index, value } => self
                .grid
                .row_intents(&props, row_index)
                .set_row_data(sink, value),
            RowAction::DeleteRow { row_index } => {
                self.grid.row_intents(&props, row_index).delete_row(sink);
            }
            RowAction::DuplicateRow { row_index } => {
                self.grid.row_intents(&props, row_index).duplicate_row(sink);
            }
            RowAction::InsertRowBelow { row_index } => {
                self.grid
                    .row_intents(&props, row_index)
                    .insert_row_below(sink);
            }
            RowAction::StopEditing { next_row } => {
                sink.stop_editing(StopEditingOptions { next_row });
            }
            RowAction::Scroll {
                scroll_left,
                scroll_top,
            } => {
                self.grid.on_scroll(
                    ScrollEvent {
                        scroll_left,
                        scroll_top,
                    },
                    sink,
                );
                drop(props);
                self.set_scroll(scroll_left, scroll_top);
            }
        }
    }

    /// Drain intents recorded since the last call.
    pub fn take_intents(&self) -> Vec<Intent<Value>> {
        self.intents.take()
    }

    pub fn context_menu_items(&self) -> Vec<ContextMenuItem> {
        self.menu_items.clone()
    }
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridViewer {
    /// Create a viewer from a configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<GridViewer, JsValue> {
        console_error_panic_hook::set_once();
        let config: ViewerConfig =
            serde_wasm_bindgen::from_value(config).map_err(crate::error::GridError::from)?;
        Ok(Self::from_config(config)?)
    }

    #[wasm_bindgen(js_name = "setRows")]
    pub fn set_rows_js(&mut self, rows: JsValue) -> std::result::Result<(), JsValue> {
        let rows: Vec<Value> =
            serde_wasm_bindgen::from_value(rows).map_err(crate::error::GridError::from)?;
        self.set_rows(rows);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setScroll")]
    pub fn set_scroll_js(&mut self, x: f32, y: f32) {
        self.set_scroll(x, y);
    }

    #[wasm_bindgen(js_name = "resize")]
    pub fn resize_js(&mut self, width: f32, height: f32) {
        self.resize(width, height);
    }

    #[wasm_bindgen(js_name = "setContainerWidth")]
    pub fn set_container_width_js(&mut self, width: Option<f32>) {
        self.set_container_width(width);
    }

    #[wasm_bindgen(js_name = "setSelection")]
    pub fn set_selection_js(&mut self, selection: JsValue) -> std::result::Result<(), JsValue> {
        let selection: Option<Selection> =
            serde_wasm_bindgen::from_value(selection).map_err(crate::error::GridError::from)?;
        self.set_selection(selection);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setActiveCell")]
    pub fn set_active_cell_js(
        &mut self,
        cell: JsValue,
        editing: bool,
    ) -> std::result::Result<(), JsValue> {
        let cell: Option<Cell> =
            serde_wasm_bindgen::from_value(cell).map_err(crate::error::GridError::from)?;
        self.set_active_cell(cell, editing);
        Ok(())
    }

    /// Compose the current frame as a plain object.
    #[wasm_bindgen(js_name = "frame")]
    pub fn frame_js(&mut self) -> std::result::Result<JsValue, JsValue> {
        let frame = self.frame();
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        Ok(frame
            .serialize(&serializer)
            .map_err(crate::error::GridError::from)?)
    }

    /// Register the function receiving every intent object.
    #[wasm_bindgen(js_name = "setIntentCallback")]
    pub fn set_intent_callback(&mut self, callback: Option<Function>) {
        self.intent_callback = callback;
    }

    /// Report a cell action; resulting intents go to the intent callback.
    #[wasm_bindgen(js_name = "dispatch")]
    pub fn dispatch_js(&mut self, action: JsValue) -> std::result::Result<(), JsValue> {
        let action: RowAction =
            serde_wasm_bindgen::from_value(action).map_err(crate::error::GridError::from)?;
        self.dispatch(action);
        self.flush_intents()
    }

    #[wasm_bindgen(js_name = "contextMenuItems")]
    pub fn context_menu_items_js(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.context_menu_items())
            .map_err(crate::error::GridError::from)?)
    }

    fn flush_intents(&self) -> std::result::Result<(), JsValue> {
        let intents = self.take_intents();
        let Some(callback) = &self.intent_callback else {
            return Ok(());
        };
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        for intent in intents {
            let value = intent
                .serialize(&serializer)
                .map_err(crate::error::GridError::from)?;
            callback.call1(&JsValue::NULL, &value)?;
        }
        Ok(())
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
    use crate::render::CellContent;
    use serde_json::json;

    fn config() -> ViewerConfig {
        serde_json::from_value(json!({
            "headerRowHeight": 40,
            "displayHeight": 400,
            "columns": [
                {"id": "name", "title": "Name", "basis": 150, "grow": 0, "minWidth": 0},
                {"id": "qty", "title": "Qty", "basis": 80, "grow": 0, "minWidth": 0, "disabled": true}
            ],
            "rows": [
                {"id": "a", "name": "Apples", "qty": 3},
                {"id": "b", "name": "Pears", "qty": null}
            ],
            "rowKey": "id",
            "containerWidth": 800
        }))
        .unwrap()
    }

    #[test]
    fn test_config_parses_flattened_options() {
        let cfg = config();
        assert_eq!(cfg.options.header_row_height, 40.0);
        assert_eq!(cfg.options.row_overscan, 5);
        assert_eq!(cfg.columns[0].sizing.basis, 150.0);
        assert_eq!(cfg.columns[1].sizing.shrink, 1.0);
    }

    #[test]
    fn test_frame_renders_properties_and_gutter() {
        let mut viewer = GridViewer::from_config(config()).unwrap();
        assert_eq!(viewer.column_count(), 3);
        let frame = viewer.frame();

        assert_eq!(frame.inner_width, Some(270.0));
        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.rows[0].key, crate::types::ItemKey::from("a"));

        let text = |row: usize, col: usize| match &frame.cell(row, col).unwrap().content {
            CellContent::Data { text, .. } => text.clone(),
            CellContent::Header { .. } => None,
        };
        assert_eq!(text(0, 0).as_deref(), Some("1"));
        assert_eq!(text(0, 1).as_deref(), Some("Apples"));
        assert_eq!(text(0, 2).as_deref(), Some("3"));
        assert_eq!(text(1, 2).as_deref(), Some(""));
        assert!(frame.cell(1, 2).unwrap().flags.disabled);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut viewer = GridViewer::from_config(config()).unwrap();
        viewer.set_scroll(500.0, 10_000.0);
        viewer.frame();
        assert_eq!(viewer.viewport().scroll_x, 0.0);
        assert_eq!(viewer.viewport().scroll_y, 0.0);
    }

    #[test]
    fn test_dispatch_records_bound_intents() {
        let mut viewer = GridViewer::from_config(config()).unwrap();
        viewer.frame();
        viewer.dispatch(RowAction::DeleteRow { row_index: 1 });
        viewer.dispatch(RowAction::SetRowData {
            row_index: 0,
            value: json!({"id": "a", "name": "Plums"}),
        });
        viewer.dispatch(RowAction::StopEditing { next_row: true });
        assert_eq!(
            viewer.take_intents(),
            vec![
                Intent::DeleteRows { min: 1, max: None },
                Intent::SetRowData {
                    row_index: 0,
                    value: json!({"id": "a", "name": "Plums"})
                },
                Intent::StopEditing { next_row: true },
            ]
        );
        assert!(viewer.take_intents().is_empty());
    }

    #[test]
    fn test_sticky_right_column_spec() {
        let mut cfg = config();
        cfg.sticky_right_column = Some(ColumnSpec {
            id: Some("actions".into()),
            sizing: ColumnSizing::fixed(60.0),
            ..ColumnSpec::default()
        });
        let mut viewer = GridViewer::from_config(cfg).unwrap();
        let frame = viewer.frame();
        let last = frame.cell(0, 3).unwrap();
        assert!(last.flags.sticky_right);
    }

    #[test]
    fn test_sticky_right_column_survives_new_options() {
        let mut cfg = config();
        cfg.sticky_right_column = Some(ColumnSpec {
            id: Some("actions".into()),
            ..ColumnSpec::default()
        });
        let mut viewer = GridViewer::from_config(cfg).unwrap();
        viewer
            .set_options(GridOptions {
                pin_first_columns: 1,
                ..GridOptions::default()
            })
            .unwrap();
        assert!(viewer.options().has_sticky_right_column);
        assert_eq!(viewer.options().pin_first_columns, 1);

        let frame = viewer.frame();
        assert!(frame.cell(0, 3).unwrap().flags.sticky_right);
        assert!(frame.cell(0, 1).unwrap().flags.sticky_left);
    }

    #[test]
    fn test_action_json_shape() {
        let action: RowAction =
            serde_json::from_str(r#"{"type": "insertRowBelow", "rowIndex": 4}"#).unwrap();
        assert_eq!(action, RowAction::InsertRowBelow { row_index: 4 });
    }
}
