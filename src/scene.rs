//! JSON scenes: a declarative grid setup and the layout it produces.
//!
//! A scene lists column definitions, then assigns them to containers by
//! index together with row counts and optional scroll positions. Building a
//! scene runs the same operations a host would, in order: add columns, fill
//! containers, solve widths, scroll.

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::layout::{ContainerEvent, ScrollDirection, ScrollState, Viewport, WidthSolution};
use crate::styles::{ColumnStyle, HeaderOffset, ViewportStyle};
use crate::types::{
    ColumnDef, ColumnId, ContainerName, GridOptions, Row, DEFAULT_ROW_HEIGHT,
};

fn default_grid_id() -> String {
    "1".to_string()
}

fn default_row_height() -> f64 {
    DEFAULT_ROW_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default = "default_grid_id")]
    pub id: String,
    #[serde(default)]
    pub options: GridOptions,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub containers: Vec<ContainerScene>,
}

/// One container of a scene. Columns are indices into [`Scene::columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerScene {
    pub name: ContainerName,
    #[serde(default)]
    pub columns: Vec<usize>,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Per-row heights; overrides `row_count` and `row_height` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_heights: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_left: Option<f64>,
}

impl ContainerScene {
    fn rows(&self) -> Vec<Row> {
        match &self.row_heights {
            Some(heights) => heights
                .iter()
                .enumerate()
                .map(|(index, &height)| Row::new(index, height))
                .collect(),
            None => Row::uniform(self.row_count, self.row_height),
        }
    }
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build a grid from the scene and apply its scroll positions.
    ///
    /// # Errors
    /// Returns an error for invalid column bounds or a container referring
    /// to a column index the scene does not define.
    pub fn build(&self) -> Result<Grid> {
        let mut grid = Grid::new(self.id.clone(), self.options.clone(), self.viewport);

        let ids = self
            .columns
            .iter()
            .cloned()
            .map(|def| grid.add_column(def))
            .collect::<Result<Vec<ColumnId>>>()?;

        for scene in &self.containers {
            let columns = scene
                .columns
                .iter()
                .map(|&index| ids.get(index).copied().ok_or(GridError::UnknownColumn(index)))
                .collect::<Result<Vec<_>>>()?;
            grid.ensure_container(scene.name);
            if let Some(container) = grid.container_mut(scene.name) {
                container.set_header_height(scene.header_height);
            }
            grid.set_container_columns(scene.name, columns)?;
            grid.set_container_rows(scene.name, scene.rows());
        }

        for scene in &self.containers {
            if let Some(top) = scene.scroll_top {
                grid.scroll_vertical(scene.name, top);
            }
            if let Some(left) = scene.scroll_left {
                grid.scroll_horizontal(scene.name, left);
            }
        }

        debug!(
            grid = %self.id,
            columns = ids.len(),
            containers = self.containers.len(),
            "scene built"
        );
        Ok(grid)
    }
}

/// Solved width of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSnapshot {
    pub id: ColumnId,
    pub name: String,
    pub visible: bool,
    pub drawn_width: i64,
}

/// Layout state of one container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    pub name: ContainerName,
    pub canvas_width: i64,
    pub canvas_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub rendered_rows: Range<usize>,
    pub rendered_columns: Range<usize>,
    pub column_offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_offset: Option<HeaderOffset>,
    pub viewport_style: ViewportStyle,
    pub h_scrollbar_placeholder: bool,
    pub vertical: ScrollState,
    pub horizontal: ScrollState,
    pub column_styles: Vec<ColumnStyle>,
}

/// Everything a host needs to draw the grid after a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub id: String,
    pub solution: WidthSolution,
    pub scroll_direction: ScrollDirection,
    pub columns: Vec<ColumnSnapshot>,
    pub containers: Vec<ContainerSnapshot>,
    pub style_sheet: String,
    pub events: Vec<ContainerEvent>,
}

impl GridSnapshot {
    /// Capture the grid's current layout. Decides scrollbars and drains
    /// pending events as a side effect.
    pub fn capture(grid: &mut Grid) -> Self {
        let names: Vec<ContainerName> = grid.containers().iter().map(|c| c.name()).collect();
        let containers = names
            .into_iter()
            .filter_map(|name| capture_container(grid, name))
            .collect();

        let columns = grid
            .columns()
            .iter()
            .map(|column| ColumnSnapshot {
                id: column.id(),
                name: column.name().to_string(),
                visible: column.visible(),
                drawn_width: column.drawn_width(),
            })
            .collect();

        Self {
            id: grid.id().to_string(),
            solution: grid.width_solution(),
            scroll_direction: grid.scroll_direction(),
            columns,
            containers,
            style_sheet: grid.style_sheet(),
            events: grid.drain_events(),
        }
    }
}

fn capture_container(grid: &mut Grid, name: ContainerName) -> Option<ContainerSnapshot> {
    let viewport_style = grid.viewport_style(name)?;
    let canvas_height = grid.canvas_height(name)?;
    let header_offset = grid.header_cell_wrapper_style(name);
    let h_scrollbar_placeholder = grid.needs_h_scrollbar_placeholder(name);
    let viewport_width = grid.viewport_width(name)?;
    let viewport_height = grid.viewport_height(name)?;
    let container = grid.container(name)?;
    Some(ContainerSnapshot {
        name,
        canvas_width: container.canvas_width(),
        canvas_height,
        viewport_width,
        viewport_height,
        rendered_rows: container.rendered_row_range(),
        rendered_columns: container.rendered_column_range(),
        column_offset: container.column_offset(),
        header_offset,
        viewport_style,
        h_scrollbar_placeholder,
        vertical: container.vertical_state(),
        horizontal: container.horizontal_state(),
        column_styles: container.column_styles().to_vec(),
    })
}

/// Build `json` as a scene and capture the resulting layout.
pub fn layout(json: &str) -> Result<GridSnapshot> {
    let scene = Scene::from_json(json)?;
    let mut grid = scene.build()?;
    Ok(GridSnapshot::capture(&mut grid))
}

/// [`layout`], serialized back to JSON.
pub fn layout_json(json: &str) -> Result<String> {
    Ok(serde_json::to_string(&layout(json)?)?)
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
    fn test_empty_scene_defaults() {
        let scene = Scene::from_json("{}").unwrap();
        assert_eq!(scene.id, "1");
        assert_eq!(scene.options, GridOptions::default());
        let grid = scene.build().unwrap();
        assert_eq!(grid.containers().len(), 1);
    }

    #[test]
    fn test_unknown_column_index() {
        let json = r#"{"containers":[{"name":"body","columns":[0]}]}"#;
        let err = Scene::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, GridError::UnknownColumn(0)));
    }

    #[test]
    fn test_missing_scene_file_is_io_error() {
        let err = Scene::from_path("does/not/exist/scene.json").unwrap_err();
        assert!(matches!(err, GridError::Io(_)));
    }

    #[test]
    fn test_row_heights_override_count() {
        let scene = ContainerScene {
            name: ContainerName::Body,
            columns: vec![],
            row_count: 10,
            row_height: 30.0,
            row_heights: Some(vec![10.0, 20.0]),
            header_height: None,
            scroll_top: None,
            scroll_left: None,
        };
        let rows = scene.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].height, 20.0);
    }
}
