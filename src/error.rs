//! Structured error types for sheetgrid.
//!
//! Layout and compositing never fail; these errors only come from the
//! configuration and serialization edges of the crate.

/// All errors that can occur while configuring or driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Grid options failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JavaScript value could not be converted.
    #[error("JS value conversion: {0}")]
    JsValue(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<serde_wasm_bindgen::Error> for GridError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::JsValue(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
