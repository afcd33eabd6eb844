//! Structured error types for gridport.
//!
//! Errors only surface at the configuration boundary (column definitions,
//! options, scenes). Scroll and layout operations clamp instead of failing.

/// All errors that can occur while configuring a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Width directive that is neither pixels, a percentage, nor a flex token.
    #[error("Invalid width directive: {0:?}")]
    InvalidWidth(String),

    /// Column bounds that cannot be satisfied.
    #[error("Invalid bounds for column {column:?}: min {min} > max {max} or negative min")]
    InvalidBounds {
        /// Column name.
        column: String,
        /// Requested minimum width.
        min: i64,
        /// Requested maximum width.
        max: i64,
    },

    /// Column handle that does not exist in the arena.
    #[error("Unknown column: {0}")]
    UnknownColumn(usize),

    /// Container name other than body, left or right.
    #[error("Unknown render container: {0:?}")]
    UnknownContainer(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
