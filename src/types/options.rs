use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scrollbar visibility policy for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollbarMode {
    Never,
    #[default]
    Always,
    /// Shown only when the canvas exceeds the viewport on that axis.
    WhenNeeded,
}

impl ScrollbarMode {
    /// Whether a scrollbar is shown given whether the content overflows.
    pub fn shows(self, overflowing: bool) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::WhenNeeded => overflowing,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Self::Never
    }
}

/// Horizontal layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

impl LayoutDirection {
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

/// Grid options recognized by the layout core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Row count above which rows are virtualized.
    pub virtualization_threshold: usize,
    /// Column count above which columns are virtualized.
    pub column_virtualization_threshold: usize,
    /// Rows the scroll index must move before the window shifts.
    pub scroll_threshold: usize,
    /// Columns the scroll index must move before the window shifts.
    pub horizontal_scroll_threshold: usize,
    /// Extra rows rendered on each side of the minimum window.
    pub excess_rows: usize,
    /// Extra columns rendered on each side of the minimum window.
    pub excess_columns: usize,
    pub enable_horizontal_scrollbar: ScrollbarMode,
    pub enable_vertical_scrollbar: ScrollbarMode,
    pub direction: LayoutDirection,
    pub disable_scrolling: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            virtualization_threshold: 20,
            column_virtualization_threshold: 10,
            scroll_threshold: 4,
            horizontal_scroll_threshold: 2,
            excess_rows: 4,
            excess_columns: 4,
            enable_horizontal_scrollbar: ScrollbarMode::Always,
            enable_vertical_scrollbar: ScrollbarMode::Always,
            direction: LayoutDirection::Ltr,
            disable_scrolling: false,
        }
    }
}

impl GridOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_rtl(&self) -> bool {
        self.direction.is_rtl()
    }
}

/// Host-controlled switches that disable the hysteresis gate per direction,
/// typically while the host scrolls programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HysteresisSuppression {
    /// Disables the gate when scrolling down (rows) or right (columns).
    pub forward: bool,
    /// Disables the gate when scrolling up (rows) or left (columns).
    pub backward: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts = GridOptions::from_json("{}").unwrap();
        assert_eq!(opts, GridOptions::default());
        assert_eq!(opts.virtualization_threshold, 20);
        assert_eq!(opts.excess_columns, 4);
        assert!(!opts.is_rtl());
    }

    #[test]
    fn test_options_partial_json() {
        let opts = GridOptions::from_json(
            r#"{"scrollThreshold":2,"enableVerticalScrollbar":"whenNeeded","direction":"rtl"}"#,
        )
        .unwrap();
        assert_eq!(opts.scroll_threshold, 2);
        assert_eq!(opts.enable_vertical_scrollbar, ScrollbarMode::WhenNeeded);
        assert!(opts.is_rtl());
        assert_eq!(opts.excess_rows, 4);
    }

    #[test]
    fn test_options_reject_garbage() {
        assert!(GridOptions::from_json(r#"{"direction":"diagonal"}"#).is_err());
    }

    #[test]
    fn test_scrollbar_mode() {
        assert!(!ScrollbarMode::Never.shows(true));
        assert!(ScrollbarMode::Always.shows(false));
        assert!(ScrollbarMode::WhenNeeded.shows(true));
        assert!(!ScrollbarMode::WhenNeeded.shows(false));
        assert!(ScrollbarMode::WhenNeeded.is_enabled());
    }
}
