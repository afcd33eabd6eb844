//! The grid: column arena, sibling render containers and grid-level state.
//!
//! The grid is the only owner of columns. Containers hold column handles and
//! borrow the arena read-only; width solving borrows it mutably for one
//! whole pass over every container's columns.

use tracing::debug;

use crate::error::Result;
use crate::layout::{
    solve_column_widths, AdjusterId, AdjustmentRegistry, AdjustmentSource, ContainerEvent,
    LayoutContext, RenderContainer, ScrollDirection, SiblingColumns, Viewport, WidthSolution,
};
use crate::styles::{HeaderOffset, ViewportStyle};
use crate::types::{
    Column, ColumnArena, ColumnDef, ColumnId, ContainerName, GridOptions, HysteresisSuppression,
    Row, RowClass, WidthSpec,
};

#[derive(Debug)]
pub struct Grid {
    id: String,
    options: GridOptions,
    viewport: Viewport,
    columns: ColumnArena,
    /// Containers in creation order; this is also the solver's column order.
    containers: Vec<RenderContainer>,
    adjusters: AdjustmentRegistry,
    scroll_direction: ScrollDirection,
    suppression: HysteresisSuppression,
    row_class: Option<RowClass>,
    refresh_pending: bool,
    solution: WidthSolution,
}

impl Grid {
    /// Create a grid with an empty body container.
    pub fn new(id: impl Into<String>, options: GridOptions, viewport: Viewport) -> Self {
        Self {
            id: id.into(),
            options,
            viewport,
            columns: ColumnArena::new(),
            containers: vec![RenderContainer::new(ContainerName::Body)],
            adjusters: AdjustmentRegistry::new(),
            scroll_direction: ScrollDirection::None,
            suppression: HysteresisSuppression::default(),
            row_class: None,
            refresh_pending: false,
            solution: WidthSolution::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the options and lay everything out again.
    pub fn set_options(&mut self, options: GridOptions) {
        self.options = options;
        self.relayout();
    }

    /// Replace the viewport metrics and lay everything out again.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.relayout();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.relayout();
    }

    // ---- columns ----

    pub fn add_column(&mut self, def: ColumnDef) -> Result<ColumnId> {
        self.columns.push(def)
    }

    pub fn columns(&self) -> &ColumnArena {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn set_column_visible(&mut self, id: ColumnId, visible: bool) -> Result<()> {
        self.columns.set_visible(id, visible)?;
        self.relayout_columns();
        Ok(())
    }

    pub fn set_column_width(&mut self, id: ColumnId, width: WidthSpec) -> Result<()> {
        self.columns.set_width(id, width)?;
        self.relayout_columns();
        Ok(())
    }

    // ---- containers ----

    pub fn containers(&self) -> &[RenderContainer] {
        &self.containers
    }

    pub fn container(&self, name: ContainerName) -> Option<&RenderContainer> {
        self.containers.iter().find(|c| c.name() == name)
    }

    pub fn container_mut(&mut self, name: ContainerName) -> Option<&mut RenderContainer> {
        self.containers.iter_mut().find(|c| c.name() == name)
    }

    /// Create an empty container for `name` unless the grid already has one.
    /// New containers go after the existing ones.
    pub fn ensure_container(&mut self, name: ContainerName) {
        if self.container(name).is_none() {
            debug!(grid = %self.id, container = %name, "adding render container");
            self.containers.push(RenderContainer::new(name));
        }
    }

    /// Drop a pinned container. The body container cannot be removed.
    pub fn remove_container(&mut self, name: ContainerName) -> bool {
        if name == ContainerName::Body {
            return false;
        }
        let before = self.containers.len();
        self.containers.retain(|c| c.name() != name);
        let removed = self.containers.len() != before;
        if removed {
            self.relayout_columns();
        }
        removed
    }

    /// Set the visible columns of a container and re-solve widths for all
    /// containers.
    pub fn set_container_columns(&mut self, name: ContainerName, ids: Vec<ColumnId>) -> Result<()> {
        for &id in &ids {
            self.columns.require(id)?;
        }
        self.ensure_container(name);
        if let Some(container) = self.container_mut(name) {
            container.set_visible_columns(ids);
        }
        self.relayout_columns();
        Ok(())
    }

    /// Clear a container's rows and columns, then re-solve widths so its
    /// siblings take back the flex space. Returns false for a missing
    /// container.
    pub fn reset_container(&mut self, name: ContainerName) -> bool {
        let Some(container) = self.container_mut(name) else {
            return false;
        };
        container.reset();
        self.relayout();
        true
    }

    /// Set the visible rows of a container and re-render its row window.
    pub fn set_container_rows(&mut self, name: ContainerName, rows: Vec<Row>) {
        self.ensure_container(name);
        if let Some((container, ctx)) = self.split(name) {
            container.set_visible_rows(rows);
            container.refresh_rows(&ctx);
        }
    }

    pub fn has_left_container_columns(&self) -> bool {
        self.container(ContainerName::Left)
            .is_some_and(RenderContainer::has_columns)
    }

    pub fn has_right_container_columns(&self) -> bool {
        self.container(ContainerName::Right)
            .is_some_and(RenderContainer::has_columns)
    }

    fn siblings(&self) -> SiblingColumns {
        SiblingColumns {
            left: self.has_left_container_columns(),
            right: self.has_right_container_columns(),
        }
    }

    fn split(&mut self, name: ContainerName) -> Option<(&mut RenderContainer, LayoutContext<'_>)> {
        let ctx = LayoutContext {
            viewport: &self.viewport,
            options: &self.options,
            columns: &self.columns,
            suppression: self.suppression,
        };
        let container = self.containers.iter_mut().find(|c| c.name() == name)?;
        Some((container, ctx))
    }

    fn context(&self) -> LayoutContext<'_> {
        LayoutContext {
            viewport: &self.viewport,
            options: &self.options,
            columns: &self.columns,
            suppression: self.suppression,
        }
    }

    // ---- width solving ----

    /// Solve column widths across every container in one pass, then let each
    /// container pick up its canvas width and column styles.
    pub fn update_column_widths(&mut self) -> WidthSolution {
        let members: Vec<ColumnId> = self
            .containers
            .iter()
            .flat_map(|c| c.assigned_columns().iter().copied())
            .collect();
        let available = self
            .viewport
            .available_column_width(self.adjusters.compute_adjustment());
        self.solution = solve_column_widths(&mut self.columns, &members, available);
        for container in &mut self.containers {
            container.apply_column_widths(&self.columns, &self.id);
        }
        self.solution
    }

    /// Result of the last solve pass.
    pub fn width_solution(&self) -> WidthSolution {
        self.solution
    }

    fn relayout_columns(&mut self) {
        self.update_column_widths();
        let ctx = LayoutContext {
            viewport: &self.viewport,
            options: &self.options,
            columns: &self.columns,
            suppression: self.suppression,
        };
        for container in &mut self.containers {
            container.refresh_columns(&ctx);
        }
    }

    fn relayout(&mut self) {
        self.relayout_columns();
        let ctx = LayoutContext {
            viewport: &self.viewport,
            options: &self.options,
            columns: &self.columns,
            suppression: self.suppression,
        };
        for container in &mut self.containers {
            container.refresh_rows(&ctx);
        }
        debug!(grid = %self.id, "relayout");
    }

    /// Concatenated column rules of every container.
    pub fn style_sheet(&self) -> String {
        self.containers
            .iter()
            .map(RenderContainer::column_class_definitions)
            .collect()
    }

    // ---- scrolling ----

    /// Scroll a container vertically. Returns the normalized percentage, or
    /// `None` when the offset did not change or the container does not exist.
    pub fn scroll_vertical(&mut self, name: ContainerName, offset: f64) -> Option<f64> {
        let (container, ctx) = self.split(name)?;
        let scroll = container.scroll_vertical(&ctx, offset)?;
        self.scroll_direction = scroll.direction;
        self.refresh_pending = true;
        Some(scroll.percentage)
    }

    /// Scroll a container horizontally. See [`Self::scroll_vertical`].
    pub fn scroll_horizontal(&mut self, name: ContainerName, offset: f64) -> Option<f64> {
        let (container, ctx) = self.split(name)?;
        let scroll = container.scroll_horizontal(&ctx, offset)?;
        self.scroll_direction = scroll.direction;
        self.refresh_pending = true;
        Some(scroll.percentage)
    }

    pub fn adjust_scroll_vertical(
        &mut self,
        name: ContainerName,
        offset: Option<f64>,
        percentage: Option<f64>,
        force: bool,
    ) -> bool {
        let Some((container, ctx)) = self.split(name) else {
            return false;
        };
        let adjusted = container.adjust_scroll_vertical(&ctx, offset, percentage, force);
        self.refresh_pending |= adjusted;
        adjusted
    }

    pub fn adjust_scroll_horizontal(
        &mut self,
        name: ContainerName,
        offset: Option<f64>,
        percentage: Option<f64>,
        force: bool,
    ) -> bool {
        let Some((container, ctx)) = self.split(name) else {
            return false;
        };
        let adjusted = container.adjust_scroll_horizontal(&ctx, offset, percentage, force);
        self.refresh_pending |= adjusted;
        adjusted
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll_direction
    }

    pub fn suppression(&self) -> HysteresisSuppression {
        self.suppression
    }

    pub fn set_hysteresis_suppression(&mut self, suppression: HysteresisSuppression) {
        self.suppression = suppression;
    }

    /// Whether a redraw was queued since the last call.
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_pending)
    }

    // ---- viewport ----

    /// Register an adjuster on the grid's own viewport. Affects the width
    /// available to columns.
    pub fn register_viewport_adjuster(&mut self, source: impl AdjustmentSource + 'static) -> AdjusterId {
        let id = self.adjusters.register(source);
        self.relayout_columns();
        id
    }

    pub fn remove_viewport_adjuster(&mut self, id: AdjusterId) -> bool {
        let removed = self.adjusters.remove(id);
        if removed {
            self.relayout_columns();
        }
        removed
    }

    pub fn viewport_height(&self, name: ContainerName) -> Option<f64> {
        let ctx = self.context();
        self.container(name).map(|c| c.viewport_height(&ctx))
    }

    pub fn viewport_width(&self, name: ContainerName) -> Option<f64> {
        let ctx = self.context();
        self.container(name).map(|c| c.viewport_width(&ctx))
    }

    pub fn canvas_height(&mut self, name: ContainerName) -> Option<f64> {
        self.container_mut(name).map(RenderContainer::canvas_height)
    }

    pub fn canvas_width(&self, name: ContainerName) -> Option<i64> {
        self.container(name).map(RenderContainer::canvas_width)
    }

    pub fn viewport_style(&mut self, name: ContainerName) -> Option<ViewportStyle> {
        let siblings = self.siblings();
        let (container, ctx) = self.split(name)?;
        Some(container.viewport_style(&ctx, siblings))
    }

    pub fn needs_h_scrollbar_placeholder(&self, name: ContainerName) -> bool {
        let ctx = self.context();
        self.container(name)
            .is_some_and(|c| c.needs_h_scrollbar_placeholder(&ctx))
    }

    pub fn header_cell_wrapper_style(&self, name: ContainerName) -> Option<HeaderOffset> {
        self.container(name)?
            .header_cell_wrapper_style(self.options.direction)
    }

    // ---- rows ----

    pub fn set_row_class(&mut self, row_class: Option<RowClass>) {
        self.row_class = row_class;
    }

    /// Class of the row rendered at `render_index` in a container.
    pub fn row_class(&self, name: ContainerName, render_index: usize) -> Option<String> {
        self.container(name)?
            .row_class(render_index, self.row_class.as_ref())
    }

    /// Queued host notifications from every container, in container order.
    pub fn drain_events(&mut self) -> Vec<ContainerEvent> {
        self.containers
            .iter_mut()
            .flat_map(RenderContainer::take_events)
            .collect()
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

    #[test]
    fn test_new_grid_has_body() {
        let grid = Grid::new("1", GridOptions::default(), Viewport::new());
        assert_eq!(grid.containers().len(), 1);
        assert!(grid.container(ContainerName::Body).is_some());
        assert!(!grid.has_left_container_columns());
    }

    #[test]
    fn test_body_cannot_be_removed() {
        let mut grid = Grid::new("1", GridOptions::default(), Viewport::new());
        assert!(!grid.remove_container(ContainerName::Body));
        grid.ensure_container(ContainerName::Left);
        assert!(grid.remove_container(ContainerName::Left));
        assert!(!grid.remove_container(ContainerName::Left));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut grid = Grid::new("1", GridOptions::default(), Viewport::new());
        assert!(grid
            .set_container_columns(ContainerName::Body, vec![ColumnId(3)])
            .is_err());
    }

    #[test]
    fn test_scrolling_missing_container_is_none() {
        let mut grid = Grid::new("1", GridOptions::default(), Viewport::new());
        assert_eq!(grid.scroll_vertical(ContainerName::Right, 10.0), None);
        assert!(!grid.take_refresh());
    }
}
