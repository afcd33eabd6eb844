//! Common test utilities and grid builders.
//!
//! Integration tests build grids through the public API only; these helpers
//! keep the setup short.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridport::layout::Viewport;
use gridport::{ColumnDef, ColumnId, ContainerName, Grid, GridOptions, Row, WidthSpec};

/// Options with the virtualization knobs used by most scroll tests.
#[must_use]
pub fn options(virtualization_threshold: usize, scroll_threshold: usize) -> GridOptions {
    GridOptions {
        virtualization_threshold,
        scroll_threshold,
        ..GridOptions::default()
    }
}

/// Empty grid of the given size with no header, footer or scrollbars.
#[must_use]
pub fn grid(width: f64, height: f64, options: GridOptions) -> Grid {
    Grid::new("1", options, Viewport::sized(width, height))
}

#[must_use]
pub fn pixels(name: &str, width: f64) -> ColumnDef {
    ColumnDef::new(name, WidthSpec::Pixels(width))
}

#[must_use]
pub fn flex(name: &str, weight: u32) -> ColumnDef {
    ColumnDef::new(name, WidthSpec::Flex(weight))
}

/// Add `defs` to the grid and assign them to `name`.
pub fn assign(grid: &mut Grid, name: ContainerName, defs: Vec<ColumnDef>) -> Vec<ColumnId> {
    let ids: Vec<ColumnId> = defs
        .into_iter()
        .map(|def| grid.add_column(def).expect("valid column"))
        .collect();
    grid.set_container_columns(name, ids.clone())
        .expect("known columns");
    ids
}

/// Body with `count` uniform rows and one fixed column.
#[must_use]
pub fn body_with_rows(
    width: f64,
    height: f64,
    options: GridOptions,
    count: usize,
    row_height: f64,
) -> Grid {
    let mut grid = grid(width, height, options);
    assign(&mut grid, ContainerName::Body, vec![pixels("a", 100.0)]);
    grid.set_container_rows(ContainerName::Body, Row::uniform(count, row_height));
    grid
}

#[must_use]
pub fn drawn_widths(grid: &Grid, ids: &[ColumnId]) -> Vec<i64> {
    ids.iter().map(|&id| grid.columns().drawn_width(id)).collect()
}

/// Every visible column lies within its bounds.
pub fn assert_within_bounds(grid: &Grid) {
    for column in grid.columns().iter().filter(|c| c.visible()) {
        assert!(
            column.drawn_width() >= column.min_width() && column.drawn_width() <= column.max_width(),
            "column {} drawn at {} outside [{}, {}]",
            column.name(),
            column.drawn_width(),
            column.min_width(),
            column.max_width()
        );
    }
}

#[must_use]
pub fn rendered_rows(grid: &Grid, name: ContainerName) -> std::ops::Range<usize> {
    grid.container(name).expect("container").rendered_row_range()
}

#[must_use]
pub fn rendered_columns(grid: &Grid, name: ContainerName) -> std::ops::Range<usize> {
    grid.container(name)
        .expect("container")
        .rendered_column_range()
}
