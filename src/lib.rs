//! gridport - virtualized grid layout core
//!
//! Computes what a data grid should render without touching the DOM:
//! - Column widths solved jointly across the body and pinned containers
//! - Virtualized row and column windows with scroll hysteresis
//! - Scrollbar placement, header offsets and generated column CSS
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'gridport';
//! await init();
//! const view = GridView.fromScene(sceneJson);
//! view.scrollVertical('body', 420);
//! const layout = view.snapshot();
//! ```

pub mod error;
pub mod grid;
pub mod layout;
pub mod scene;
pub mod styles;
pub mod types;
pub mod view;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use grid::Grid;
pub use layout::{
    ContainerEvent, LayoutContext, RenderContainer, ScrollDirection, Viewport, WidthSolution,
};
pub use scene::{GridSnapshot, Scene};
pub use view::GridView;

pub use types::*;

/// Lay out a JSON scene and return the snapshot as a JSON string
///
/// # Errors
/// Returns an error if the scene is not valid JSON or defines invalid columns.
#[wasm_bindgen(js_name = layoutScene)]
pub fn layout_scene(json: &str) -> std::result::Result<String, JsValue> {
    Ok(scene::layout_json(json)?)
}

/// Lay out a JSON scene and return the snapshot as a `JsValue`
///
/// # Errors
/// Returns an error if the scene is invalid or the snapshot cannot be converted.
#[wasm_bindgen(js_name = layoutSceneToJs)]
pub fn layout_scene_to_js(json: &str) -> std::result::Result<JsValue, JsValue> {
    let snapshot = scene::layout(json)?;
    serde_wasm_bindgen::to_value(&snapshot)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
