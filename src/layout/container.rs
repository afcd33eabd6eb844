//! Render container - one pinned region (body, left or right) of the grid.
//!
//! A container owns the visible caches, rendered slices and scroll state of
//! both axes for its region. Column widths are shared with its siblings and
//! solved by the grid; the container only reads them.

use serde::Serialize;
use std::mem;
use tracing::debug;

use super::adjust::{AdjusterId, AdjustmentRegistry, AdjustmentSource, Side, ViewportAdjustment};
use super::range::{self, compute_range, Hysteresis, RangeDecision, RangeRequest, RenderedSlice};
use super::scroll::{scroll_percentage, Axis, ComputedScroll, ScrollState, ScrollTracker};
use super::viewport::Viewport;
use super::widths::canvas_width;
use crate::styles::{self, ColumnStyle, HeaderOffset, ScrollbarFlags, ViewportStyle};
use crate::types::{
    ColumnArena, ColumnId, ContainerName, GridOptions, HysteresisSuppression, LayoutDirection,
    Row, RowClass,
};

/// Read-only grid state a container computes against.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub viewport: &'a Viewport,
    pub options: &'a GridOptions,
    pub columns: &'a ColumnArena,
    pub suppression: HysteresisSuppression,
}

/// Whether the pinned siblings of a container currently have columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiblingColumns {
    pub left: bool,
    pub right: bool,
}

/// Notification for the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContainerEvent {
    #[serde(rename_all = "camelCase")]
    CanvasHeightChanged {
        container: ContainerName,
        old_height: f64,
        new_height: f64,
    },
}

#[derive(Debug)]
pub struct RenderContainer {
    name: ContainerName,
    /// Overrides the grid header height when set.
    header_height: Option<f64>,
    visible_rows: Vec<Row>,
    /// Every column handle placed in this container, hidden ones included.
    assigned_columns: Vec<ColumnId>,
    /// `assigned_columns` minus hidden columns, rebuilt on each solve.
    visible_columns: Vec<ColumnId>,
    rendered_rows: RenderedSlice<Row>,
    rendered_columns: RenderedSlice<ColumnId>,
    vertical: ScrollTracker,
    horizontal: ScrollTracker,
    adjusters: AdjustmentRegistry,
    canvas_width: i64,
    canvas_height: f64,
    canvas_height_dirty: bool,
    column_offset: i64,
    column_styles: Vec<ColumnStyle>,
    column_class_definitions: String,
    scrollbars: ScrollbarFlags,
    events: Vec<ContainerEvent>,
}

impl RenderContainer {
    pub fn new(name: ContainerName) -> Self {
        Self {
            name,
            header_height: None,
            visible_rows: Vec::new(),
            assigned_columns: Vec::new(),
            visible_columns: Vec::new(),
            rendered_rows: RenderedSlice::default(),
            rendered_columns: RenderedSlice::default(),
            vertical: ScrollTracker::new(Axis::Vertical),
            horizontal: ScrollTracker::new(Axis::Horizontal),
            adjusters: AdjustmentRegistry::new(),
            canvas_width: 0,
            canvas_height: 0.0,
            canvas_height_dirty: true,
            column_offset: 0,
            column_styles: Vec::new(),
            column_class_definitions: String::new(),
            scrollbars: ScrollbarFlags::default(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header_height(mut self, header_height: f64) -> Self {
        self.header_height = Some(header_height);
        self
    }

    pub fn set_header_height(&mut self, header_height: Option<f64>) {
        self.header_height = header_height;
    }

    pub fn header_height(&self) -> Option<f64> {
        self.header_height
    }

    pub fn name(&self) -> ContainerName {
        self.name
    }

    /// Clear visible caches and rendered slices before a full rebuild.
    pub(crate) fn reset(&mut self) {
        self.visible_rows.clear();
        self.assigned_columns.clear();
        self.visible_columns.clear();
        self.rendered_rows.clear();
        self.rendered_columns.clear();
        self.canvas_height_dirty = true;
    }

    // ---- visible caches ----

    pub(crate) fn set_visible_rows(&mut self, rows: Vec<Row>) {
        self.visible_rows = rows;
        self.canvas_height_dirty = true;
    }

    /// Assign column handles. The visible cache is filtered on the next
    /// [`apply_column_widths`](Self::apply_column_widths).
    pub(crate) fn set_visible_columns(&mut self, columns: Vec<ColumnId>) {
        self.visible_columns.clone_from(&columns);
        self.assigned_columns = columns;
    }

    /// Handles assigned to this container, hidden columns included.
    pub fn assigned_columns(&self) -> &[ColumnId] {
        &self.assigned_columns
    }

    pub fn visible_rows(&self) -> &[Row] {
        &self.visible_rows
    }

    pub fn visible_columns(&self) -> &[ColumnId] {
        &self.visible_columns
    }

    pub fn visible_row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn contains_column(&self, column: ColumnId) -> bool {
        self.visible_columns.contains(&column)
    }

    pub fn has_columns(&self) -> bool {
        !self.visible_columns.is_empty()
    }

    // ---- viewport ----

    pub fn register_viewport_adjuster(
        &mut self,
        source: impl AdjustmentSource + 'static,
    ) -> AdjusterId {
        self.adjusters.register(source)
    }

    pub fn remove_viewport_adjuster(&mut self, id: AdjusterId) -> bool {
        self.adjusters.remove(id)
    }

    pub fn viewport_adjustment(&self) -> ViewportAdjustment {
        self.adjusters.compute_adjustment()
    }

    /// Header margin claimed by adjusters on `side`.
    pub fn margin(&self, side: Side) -> f64 {
        self.adjusters.compute_margin(side)
    }

    pub fn viewport_height(&self, ctx: &LayoutContext<'_>) -> f64 {
        ctx.viewport.body_height(self.header_height) + self.viewport_adjustment().height
    }

    pub fn viewport_width(&self, ctx: &LayoutContext<'_>) -> f64 {
        ctx.viewport.grid_width + self.viewport_adjustment().width
    }

    pub fn header_viewport_width(&self, ctx: &LayoutContext<'_>) -> f64 {
        self.viewport_width(ctx)
    }

    // ---- canvas ----

    /// Total height of the visible rows. Recomputed only after the rows
    /// change; each recompute queues a [`ContainerEvent::CanvasHeightChanged`].
    pub fn canvas_height(&mut self) -> f64 {
        if !self.canvas_height_dirty {
            return self.canvas_height;
        }
        let old_height = self.canvas_height;
        self.canvas_height = self.visible_rows.iter().map(|row| row.height).sum();
        self.canvas_height_dirty = false;
        debug!(
            container = %self.name,
            old_height,
            new_height = self.canvas_height,
            "canvas height recomputed"
        );
        self.events.push(ContainerEvent::CanvasHeightChanged {
            container: self.name,
            old_height,
            new_height: self.canvas_height,
        });
        self.canvas_height
    }

    pub fn invalidate_canvas_height(&mut self) {
        self.canvas_height_dirty = true;
    }

    /// Sum of this container's drawn column widths as of the last solve.
    pub fn canvas_width(&self) -> i64 {
        self.canvas_width
    }

    #[allow(clippy::cast_precision_loss)]
    fn canvas_width_px(&self) -> f64 {
        self.canvas_width as f64
    }

    pub fn vertical_scroll_length(&mut self, ctx: &LayoutContext<'_>) -> f64 {
        self.canvas_height() - self.viewport_height(ctx) + ctx.viewport.scrollbar_height
    }

    pub fn horizontal_scroll_length(&self, ctx: &LayoutContext<'_>) -> f64 {
        self.canvas_width_px() - self.viewport_width(ctx) + ctx.viewport.scrollbar_width
    }

    /// Queued host notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        mem::take(&mut self.events)
    }

    // ---- scrolling ----

    pub fn vertical_state(&self) -> ScrollState {
        self.vertical.state()
    }

    pub fn horizontal_state(&self) -> ScrollState {
        self.horizontal.state()
    }

    /// Handle a vertical scroll to `offset`. `None` when the offset did not change.
    pub fn scroll_vertical(
        &mut self,
        ctx: &LayoutContext<'_>,
        offset: f64,
    ) -> Option<ComputedScroll> {
        let detected = self.vertical.begin(offset)?;
        let scroll = detected.with_scroll_length(self.vertical_scroll_length(ctx));
        self.adjust_scroll_vertical(ctx, Some(scroll.offset), Some(scroll.percentage), false);
        Some(scroll)
    }

    /// Handle a horizontal scroll to `offset`. `None` when the offset did not change.
    pub fn scroll_horizontal(
        &mut self,
        ctx: &LayoutContext<'_>,
        offset: f64,
    ) -> Option<ComputedScroll> {
        let detected = self.horizontal.begin(offset)?;
        let scroll = detected.with_scroll_length(self.horizontal_scroll_length(ctx));
        self.adjust_scroll_horizontal(ctx, Some(scroll.offset), Some(scroll.percentage), false);
        Some(scroll)
    }

    /// Move the row window to `offset`, or to `percentage` of the scrollable
    /// height when no offset is given. Returns `false` when nothing ran.
    pub fn adjust_scroll_vertical(
        &mut self,
        ctx: &LayoutContext<'_>,
        offset: Option<f64>,
        percentage: Option<f64>,
        force: bool,
    ) -> bool {
        if !self.vertical.should_adjust(offset, force) {
            return false;
        }
        let offset = match offset {
            Some(offset) => offset,
            None => {
                let pct = percentage.unwrap_or(self.vertical.state().prev_percentage);
                ((self.canvas_height() - self.viewport_height(ctx)) * pct).max(0.0)
            }
        };
        let percentage = self.adjust_rows(ctx, Some(offset), percentage);
        self.vertical.commit(offset, percentage);
        true
    }

    /// Horizontal counterpart of [`Self::adjust_scroll_vertical`].
    pub fn adjust_scroll_horizontal(
        &mut self,
        ctx: &LayoutContext<'_>,
        offset: Option<f64>,
        percentage: Option<f64>,
        force: bool,
    ) -> bool {
        if !self.horizontal.should_adjust(offset, force) {
            return false;
        }
        let offset = match offset {
            Some(offset) => offset,
            None => {
                let pct = percentage.unwrap_or(self.horizontal.state().prev_percentage);
                ((self.canvas_width_px() - self.viewport_width(ctx)) * pct).max(0.0)
            }
        };
        let percentage = self.adjust_columns(ctx, Some(offset), percentage);
        self.horizontal.commit(offset, percentage);
        true
    }

    /// Rows that must be rendered to fill the viewport.
    pub fn min_rows_to_render(&self, ctx: &LayoutContext<'_>) -> usize {
        range::min_rows_to_render(&self.visible_rows, self.viewport_height(ctx))
    }

    /// Columns that must be rendered to fill the viewport.
    pub fn min_columns_to_render(&self, ctx: &LayoutContext<'_>) -> usize {
        let widths: Vec<i64> = self
            .visible_columns
            .iter()
            .map(|&id| ctx.columns.drawn_width(id))
            .collect();
        range::min_columns_to_render(&widths, self.viewport_width(ctx))
    }

    /// Recompute the rendered row window. The hysteresis gate only applies
    /// when `offset` is known. Returns the percentage used.
    pub fn adjust_rows(
        &mut self,
        ctx: &LayoutContext<'_>,
        offset: Option<f64>,
        percentage: Option<f64>,
    ) -> f64 {
        let min_rows = self.min_rows_to_render(ctx);
        let percentage = match (percentage, offset) {
            (Some(pct), _) if pct >= 0.0 => pct,
            (_, Some(offset)) => scroll_percentage(offset, self.vertical_scroll_length(ctx)),
            _ => 0.0,
        };
        let state = self.vertical.state();
        let len = self.visible_rows.len();
        let request = RangeRequest {
            len,
            min_count: min_rows,
            percentage,
            virtualize: len > ctx.options.virtualization_threshold,
            excess: ctx.options.excess_rows,
            hysteresis: offset.map(|offset| Hysteresis {
                prev_offset: state.prev_offset,
                offset,
                prev_index: state.prev_index,
                threshold: ctx.options.scroll_threshold,
                suppression: ctx.suppression,
            }),
        };
        if let RangeDecision::Render { range, index } = compute_range(&request) {
            let committed = self.rendered_rows.commit(&self.visible_rows, range);
            self.vertical.record_index(index);
            debug!(
                container = %self.name,
                start = committed.start,
                end = committed.end,
                index,
                "rendered rows"
            );
        }
        percentage
    }

    /// Recompute the rendered column window. Columns are virtualized only
    /// when the cache is above the threshold and the canvas overflows.
    pub fn adjust_columns(
        &mut self,
        ctx: &LayoutContext<'_>,
        offset: Option<f64>,
        percentage: Option<f64>,
    ) -> f64 {
        let min_columns = self.min_columns_to_render(ctx);
        let percentage = match (percentage, offset) {
            (Some(pct), _) if pct >= 0.0 => pct,
            (_, Some(offset)) => scroll_percentage(offset, self.horizontal_scroll_length(ctx)),
            _ => 0.0,
        };
        let state = self.horizontal.state();
        let len = self.visible_columns.len();
        let overflowing = self.canvas_width_px() > self.viewport_width(ctx);
        let request = RangeRequest {
            len,
            min_count: min_columns,
            percentage,
            virtualize: len > ctx.options.column_virtualization_threshold && overflowing,
            excess: ctx.options.excess_columns,
            hysteresis: offset.map(|offset| Hysteresis {
                prev_offset: state.prev_offset,
                offset,
                prev_index: state.prev_index,
                threshold: ctx.options.horizontal_scroll_threshold,
                suppression: ctx.suppression,
            }),
        };
        if let RangeDecision::Render { range, index } = compute_range(&request) {
            let committed = self.rendered_columns.commit(&self.visible_columns, range);
            self.horizontal.record_index(index);
            self.update_column_offset(ctx.columns);
            debug!(
                container = %self.name,
                start = committed.start,
                end = committed.end,
                index,
                "rendered columns"
            );
        }
        percentage
    }

    /// Re-render rows at the last committed percentage, without hysteresis.
    pub fn refresh_rows(&mut self, ctx: &LayoutContext<'_>) {
        let percentage = self.vertical.state().prev_percentage;
        self.adjust_rows(ctx, None, Some(percentage));
    }

    /// Re-render columns at the last committed percentage, without hysteresis.
    pub fn refresh_columns(&mut self, ctx: &LayoutContext<'_>) {
        let percentage = self.horizontal.state().prev_percentage;
        self.adjust_columns(ctx, None, Some(percentage));
    }

    // ---- rendered slices ----

    pub fn rendered_rows(&self) -> &[Row] {
        self.rendered_rows.items()
    }

    pub fn rendered_columns(&self) -> &[ColumnId] {
        self.rendered_columns.items()
    }

    pub fn rendered_row_range(&self) -> std::ops::Range<usize> {
        self.rendered_rows.range()
    }

    pub fn rendered_column_range(&self) -> std::ops::Range<usize> {
        self.rendered_columns.range()
    }

    pub fn current_top_row(&self) -> usize {
        self.rendered_rows.first()
    }

    pub fn current_first_column(&self) -> usize {
        self.rendered_columns.first()
    }

    /// Width of the visible columns scrolled out before the rendered block.
    pub fn column_offset(&self) -> i64 {
        self.column_offset
    }

    fn update_column_offset(&mut self, columns: &ColumnArena) {
        let first = self.rendered_columns.first();
        self.column_offset = self
            .visible_columns
            .iter()
            .take(first)
            .map(|&id| columns.drawn_width(id))
            .fold(0, i64::saturating_add);
    }

    /// Header margin compensating for scrolled-out columns, if any.
    pub fn header_cell_wrapper_style(&self, direction: LayoutDirection) -> Option<HeaderOffset> {
        if self.current_first_column() == 0 {
            return None;
        }
        let side = if direction.is_rtl() {
            Side::Right
        } else {
            Side::Left
        };
        Some(HeaderOffset {
            side,
            pixels: self.column_offset,
        })
    }

    /// Class of the row rendered at `render_index`.
    pub fn row_class(&self, render_index: usize, row_class: Option<&RowClass>) -> Option<String> {
        let row_class = row_class?;
        let row = self.rendered_rows.items().get(render_index)?;
        row_class.class_for(row)
    }

    // ---- column widths ----

    /// Pick up widths from a finished solve pass.
    pub fn apply_column_widths(&mut self, columns: &ColumnArena, grid_id: &str) {
        self.visible_columns = self
            .assigned_columns
            .iter()
            .copied()
            .filter(|&id| columns.get(id).is_some_and(|column| column.visible()))
            .collect();
        self.canvas_width = canvas_width(columns, &self.visible_columns);
        self.column_styles = styles::column_styles(columns, &self.visible_columns);
        self.column_class_definitions =
            styles::column_class_definitions(grid_id, &self.column_styles);
        self.update_column_offset(columns);
    }

    pub fn column_styles(&self) -> &[ColumnStyle] {
        &self.column_styles
    }

    pub fn column_class_definitions(&self) -> &str {
        &self.column_class_definitions
    }

    // ---- scrollbars ----

    /// Decide which scrollbars this container shows. The body may show both;
    /// a pinned container shows at most a vertical scrollbar, on the outer
    /// edge of the grid.
    pub fn viewport_style(
        &mut self,
        ctx: &LayoutContext<'_>,
        siblings: SiblingColumns,
    ) -> ViewportStyle {
        self.scrollbars = ScrollbarFlags::default();
        if ctx.options.disable_scrolling {
            return ViewportStyle::hidden();
        }

        let rtl = ctx.options.is_rtl();
        let h_overflow = self.canvas_width_px() > self.viewport_width(ctx);
        let v_overflow = self.canvas_height() > self.viewport_height(ctx);
        let vertical = ctx.options.enable_vertical_scrollbar.shows(v_overflow);
        // The body carries the vertical scrollbar unless a pinned container
        // sits on the grid's trailing edge.
        let body_on_edge = if rtl { !siblings.left } else { !siblings.right };

        self.scrollbars = match self.name {
            ContainerName::Body => ScrollbarFlags {
                horizontal: ctx.options.enable_horizontal_scrollbar.shows(h_overflow),
                vertical: vertical && body_on_edge,
            },
            ContainerName::Left => ScrollbarFlags {
                horizontal: false,
                vertical: vertical && rtl,
            },
            ContainerName::Right => ScrollbarFlags {
                horizontal: false,
                vertical: vertical && !rtl,
            },
        };
        ViewportStyle::from_flags(self.scrollbars)
    }

    /// Scrollbars decided by the last [`Self::viewport_style`] call.
    pub fn scrollbars(&self) -> ScrollbarFlags {
        self.scrollbars
    }

    /// Whether the host should reserve space where a horizontal scrollbar
    /// would sit, to keep pinned containers aligned with the body.
    pub fn needs_h_scrollbar_placeholder(&self, ctx: &LayoutContext<'_>) -> bool {
        ctx.options.enable_horizontal_scrollbar.is_enabled()
            && !self.scrollbars.horizontal
            && !ctx.options.disable_scrolling
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

    fn fixture() -> (Viewport, GridOptions, ColumnArena) {
        (Viewport::sized(200.0, 50.0), GridOptions::default(), ColumnArena::new())
    }

    #[test]
    fn test_canvas_height_cached_until_rows_change() {
        let mut container = RenderContainer::new(ContainerName::Body);
        container.set_visible_rows(Row::uniform(4, 25.0));
        assert_eq!(container.canvas_height(), 100.0);
        assert_eq!(container.canvas_height(), 100.0);

        let events = container.take_events();
        assert_eq!(
            events,
            vec![ContainerEvent::CanvasHeightChanged {
                container: ContainerName::Body,
                old_height: 0.0,
                new_height: 100.0,
            }]
        );

        container.set_visible_rows(Row::uniform(2, 25.0));
        assert_eq!(container.canvas_height(), 50.0);
        assert_eq!(container.take_events().len(), 1);
        assert!(container.take_events().is_empty());
    }

    #[test]
    fn test_viewport_height_uses_adjusters_and_header_override() {
        let (viewport, options, columns) = fixture();
        let ctx = LayoutContext {
            viewport: &viewport,
            options: &options,
            columns: &columns,
            suppression: HysteresisSuppression::default(),
        };
        let mut container = RenderContainer::new(ContainerName::Left).with_header_height(10.0);
        assert_eq!(container.viewport_height(&ctx), 40.0);
        let id = container.register_viewport_adjuster(|prior: ViewportAdjustment| {
            ViewportAdjustment {
                height: prior.height - 15.0,
                ..prior
            }
        });
        assert_eq!(container.viewport_height(&ctx), 25.0);
        assert!(container.remove_viewport_adjuster(id));
        assert_eq!(container.viewport_height(&ctx), 40.0);
    }

    #[test]
    fn test_row_class_uses_rendered_rows() {
        let (viewport, options, columns) = fixture();
        let ctx = LayoutContext {
            viewport: &viewport,
            options: &options,
            columns: &columns,
            suppression: HysteresisSuppression::default(),
        };
        let mut container = RenderContainer::new(ContainerName::Body);
        container.set_visible_rows(Row::uniform(3, 10.0));
        container.refresh_rows(&ctx);
        let class = RowClass::computed(|row: &Row| Some(format!("row-{}", row.index)));
        assert_eq!(container.row_class(2, Some(&class)).as_deref(), Some("row-2"));
        assert_eq!(container.row_class(9, Some(&class)), None);
        assert_eq!(container.row_class(0, None), None);
    }

    #[test]
    fn test_reset_clears_caches() {
        let (viewport, options, columns) = fixture();
        let ctx = LayoutContext {
            viewport: &viewport,
            options: &options,
            columns: &columns,
            suppression: HysteresisSuppression::default(),
        };
        let mut container = RenderContainer::new(ContainerName::Body);
        container.set_visible_rows(Row::uniform(3, 10.0));
        container.set_visible_columns(vec![ColumnId(0)]);
        container.refresh_rows(&ctx);
        assert_eq!(container.rendered_rows().len(), 3);

        container.reset();
        assert!(container.assigned_columns().is_empty());
        assert!(container.rendered_rows().is_empty());
        assert_eq!(container.visible_row_count(), 0);
        assert!(!container.contains_column(ColumnId(0)));
        assert_eq!(container.canvas_height(), 0.0);
    }

    #[test]
    fn test_hidden_columns_drop_out_of_visible_cache() {
        use crate::types::{ColumnDef, WidthSpec};

        let mut columns = ColumnArena::new();
        let a = columns.push(ColumnDef::new("a", WidthSpec::Pixels(40.0))).unwrap();
        let b = columns
            .push(ColumnDef::new("b", WidthSpec::Pixels(60.0)).with_visible(false))
            .unwrap();
        let mut container = RenderContainer::new(ContainerName::Body);
        container.set_visible_columns(vec![a, b]);
        container.apply_column_widths(&columns, "1");

        assert_eq!(container.assigned_columns(), &[a, b]);
        assert_eq!(container.visible_columns(), &[a]);
        assert!(!container.contains_column(b));

        columns.set_visible(b, true).unwrap();
        container.apply_column_widths(&columns, "1");
        assert_eq!(container.visible_columns(), &[a, b]);
    }
}
