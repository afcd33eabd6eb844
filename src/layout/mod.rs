//! Layout engine for virtualized render containers.
//!
//! This module handles:
//! - Viewport metrics and external viewport adjusters
//! - Per-axis scroll tracking (direction, normalized percentage)
//! - Choosing the rendered window of rows and columns
//! - Solving column widths jointly across pinned containers

mod adjust;
mod container;
mod range;
mod scroll;
mod viewport;
mod widths;

pub use adjust::{AdjusterId, AdjustmentRegistry, AdjustmentSource, Side, ViewportAdjustment};
pub use container::{ContainerEvent, LayoutContext, RenderContainer, SiblingColumns};
pub use range::{
    compute_range, min_columns_to_render, min_rows_to_render, scroll_index, Hysteresis,
    RangeDecision, RangeRequest, RenderedSlice,
};
pub use scroll::{
    scroll_percentage, Axis, ComputedScroll, DetectedScroll, ScrollDirection, ScrollState,
    ScrollTracker,
};
pub use viewport::Viewport;
pub use widths::{canvas_width, solve_column_widths, WidthSolution};

/// Floor a pixel value to an integer. Non-finite values become 0.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_px(value: f64) -> i64 {
    if value.is_finite() {
        value.floor() as i64
    } else {
        0
    }
}

/// Convert a non-negative whole number to an index. Negative and non-finite values become 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_index(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_px_floors() {
        assert_eq!(to_px(12.9), 12);
        assert_eq!(to_px(-0.5), -1);
        assert_eq!(to_px(f64::NAN), 0);
        assert_eq!(to_px(f64::INFINITY), 0);
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(3.0), 3);
        assert_eq!(to_index(-2.0), 0);
        assert_eq!(to_index(f64::NAN), 0);
    }
}
