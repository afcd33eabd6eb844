//! `GridView` - the WASM-exported handle around a [`Grid`].
//!
//! Hosts create a view from a scene, forward scroll and resize events by
//! container name, and read the layout back as a snapshot. Container names
//! arrive as strings from JavaScript and are parsed here.

use wasm_bindgen::prelude::*;

use crate::grid::Grid;
use crate::scene::{GridSnapshot, Scene};
use crate::types::ContainerName;

#[wasm_bindgen]
pub struct GridView {
    grid: Grid,
}

impl GridView {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

impl From<Grid> for GridView {
    fn from(grid: Grid) -> Self {
        Self { grid }
    }
}

#[wasm_bindgen]
impl GridView {
    /// Build a view from a JSON scene.
    #[wasm_bindgen(js_name = "fromScene")]
    pub fn from_scene(json: &str) -> Result<GridView, JsValue> {
        let grid = Scene::from_json(json)?.build()?;
        Ok(Self { grid })
    }

    /// Resize the grid (logical pixels).
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f64, height: f64) {
        self.grid.resize(width, height);
    }

    /// Vertical scroll of a container. Returns the scroll percentage, or
    /// `undefined` when the offset did not change.
    #[wasm_bindgen(js_name = "scrollVertical")]
    pub fn scroll_vertical(&mut self, container: &str, offset: f64) -> Result<Option<f64>, JsValue> {
        let name: ContainerName = container.parse()?;
        Ok(self.grid.scroll_vertical(name, offset))
    }

    /// Horizontal scroll of a container. See `scrollVertical`.
    #[wasm_bindgen(js_name = "scrollHorizontal")]
    pub fn scroll_horizontal(
        &mut self,
        container: &str,
        offset: f64,
    ) -> Result<Option<f64>, JsValue> {
        let name: ContainerName = container.parse()?;
        Ok(self.grid.scroll_horizontal(name, offset))
    }

    /// Whether a redraw was requested since the last call.
    #[wasm_bindgen(js_name = "takeRefresh")]
    pub fn take_refresh(&mut self) -> bool {
        self.grid.take_refresh()
    }

    /// Generated column CSS for every container.
    #[wasm_bindgen(js_name = "styleSheet")]
    pub fn style_sheet(&self) -> String {
        self.grid.style_sheet()
    }

    /// Current layout as a JS object.
    #[wasm_bindgen]
    pub fn snapshot(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = GridSnapshot::capture(&mut self.grid);
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}
