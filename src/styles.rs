//! Presentational descriptors derived from solved layout.
//!
//! Everything here is a pure function of already-solved widths and flags;
//! nothing in this module feeds back into layout.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::layout::Side;
use crate::types::{ColumnArena, ColumnId};

/// CSS class prefix for generated column rules.
pub const COLUMN_CLASS_PREFIX: &str = "gp-col";

/// Overflow behaviour of one viewport axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Scroll,
    Hidden,
}

impl Overflow {
    fn from_flag(scroll: bool) -> Self {
        if scroll {
            Self::Scroll
        } else {
            Self::Hidden
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Hidden => "hidden",
        }
    }
}

/// Which scrollbars a container shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollbarFlags {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportStyle {
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
}

impl ViewportStyle {
    pub fn hidden() -> Self {
        Self {
            overflow_x: Overflow::Hidden,
            overflow_y: Overflow::Hidden,
        }
    }

    pub fn from_flags(flags: ScrollbarFlags) -> Self {
        Self {
            overflow_x: Overflow::from_flag(flags.horizontal),
            overflow_y: Overflow::from_flag(flags.vertical),
        }
    }

    pub fn css(&self) -> String {
        format!(
            "overflow-x: {}; overflow-y: {};",
            self.overflow_x.as_str(),
            self.overflow_y.as_str()
        )
    }
}

/// Margin that shifts the rendered header cells past scrolled-out columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderOffset {
    pub side: Side,
    pub pixels: i64,
}

impl HeaderOffset {
    pub fn css(&self) -> String {
        let side = match self.side {
            Side::Left => "left",
            Side::Right => "right",
        };
        format!("margin-{side}: {}px;", self.pixels)
    }
}

/// Drawn width of one column, for hosts that size columns directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStyle {
    pub column: ColumnId,
    pub width: i64,
}

pub fn column_class(column: ColumnId) -> String {
    format!("{COLUMN_CLASS_PREFIX}{column}")
}

/// Styles for the visible columns among `ids`, in order.
pub fn column_styles(columns: &ColumnArena, ids: &[ColumnId]) -> Vec<ColumnStyle> {
    ids.iter()
        .filter_map(|&id| columns.get(id))
        .filter(|column| column.visible())
        .map(|column| ColumnStyle {
            column: column.id(),
            width: column.drawn_width(),
        })
        .collect()
}

/// CSS rules pinning each column's class to its drawn width, scoped to the grid.
pub fn column_class_definitions(grid_id: &str, styles: &[ColumnStyle]) -> String {
    styles.iter().fold(String::new(), |mut css, style| {
        let _ = write!(
            css,
            " .grid{grid_id} .{} {{ min-width: {w}px; max-width: {w}px; }}",
            column_class(style.column),
            w = style.width
        );
        css
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{ColumnDef, WidthSpec};

    #[test]
    fn test_viewport_style_css() {
        let style = ViewportStyle::from_flags(ScrollbarFlags {
            horizontal: true,
            vertical: false,
        });
        assert_eq!(style.css(), "overflow-x: scroll; overflow-y: hidden;");
        assert_eq!(ViewportStyle::hidden().overflow_y, Overflow::Hidden);
    }

    #[test]
    fn test_header_offset_css() {
        let offset = HeaderOffset {
            side: Side::Right,
            pixels: 240,
        };
        assert_eq!(offset.css(), "margin-right: 240px;");
    }

    #[test]
    fn test_column_class_definitions() {
        let mut arena = ColumnArena::new();
        let a = arena
            .push(ColumnDef::new("a", WidthSpec::Pixels(50.0)))
            .unwrap();
        let b = arena
            .push(ColumnDef::new("b", WidthSpec::Pixels(50.0)).with_visible(false))
            .unwrap();
        let styles = column_styles(&arena, &[a, b]);
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].column, a);

        let css = column_class_definitions("7", &styles);
        assert_eq!(css, " .grid7 .gp-col0 { min-width: 30px; max-width: 30px; }");
    }
}
