//! Outer grid dimensions shared by every render container.

use serde::{Deserialize, Serialize};

use super::adjust::ViewportAdjustment;
use super::to_px;

/// Viewport metrics - the grid's outer size and the chrome around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    /// Grid width in pixels
    pub grid_width: f64,
    /// Grid height in pixels
    pub grid_height: f64,
    /// Header row height in pixels
    pub header_height: f64,
    /// Footer height in pixels
    pub footer_height: f64,
    /// Width taken by a vertical scrollbar
    pub scrollbar_width: f64,
    /// Height taken by a horizontal scrollbar
    pub scrollbar_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a viewport with default values
    pub fn new() -> Self {
        Self {
            grid_width: 800.0,
            grid_height: 600.0,
            header_height: 30.0,
            footer_height: 0.0,
            scrollbar_width: 0.0,
            scrollbar_height: 0.0,
        }
    }

    /// Create a viewport of the given size with no header, footer or scrollbars.
    pub fn sized(grid_width: f64, grid_height: f64) -> Self {
        Self {
            grid_width,
            grid_height,
            header_height: 0.0,
            footer_height: 0.0,
            scrollbar_width: 0.0,
            scrollbar_height: 0.0,
        }
    }

    /// Resize the grid
    pub fn resize(&mut self, width: f64, height: f64) {
        self.grid_width = width;
        self.grid_height = height;
    }

    /// Height left for rows once the header and footer are drawn.
    ///
    /// `header_height` overrides the grid header for containers that draw
    /// their own header.
    pub fn body_height(&self, header_height: Option<f64>) -> f64 {
        self.grid_height - header_height.unwrap_or(self.header_height) - self.footer_height
    }

    /// Integer width shared by all columns of all containers.
    pub fn available_column_width(&self, adjustment: ViewportAdjustment) -> i64 {
        to_px(self.grid_width + adjustment.width - self.scrollbar_width)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_body_height() {
        let mut vp = Viewport::sized(500.0, 400.0);
        vp.header_height = 30.0;
        vp.footer_height = 20.0;
        assert_eq!(vp.body_height(None), 350.0);
        assert_eq!(vp.body_height(Some(50.0)), 330.0);
    }

    #[test]
    fn test_available_width() {
        let mut vp = Viewport::sized(500.5, 400.0);
        vp.scrollbar_width = 15.0;
        assert_eq!(vp.available_column_width(ViewportAdjustment::default()), 485);
        let adj = ViewportAdjustment {
            width: -100.0,
            ..ViewportAdjustment::default()
        };
        assert_eq!(vp.available_column_width(adj), 385);
    }

    #[test]
    fn test_viewport_from_partial_json() {
        let vp: Viewport = serde_json::from_str(r#"{"gridWidth": 1024}"#).unwrap();
        assert_eq!(vp.grid_width, 1024.0);
        assert_eq!(vp.grid_height, 600.0);
    }
}
