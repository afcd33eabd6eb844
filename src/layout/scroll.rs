//! Per-axis scroll position tracking.
//!
//! A scroll event moves through `idle -> direction detected -> percentage
//! computed -> committed`. The intermediate states are values
//! ([`DetectedScroll`], [`ComputedScroll`]) so a scroll cannot be committed
//! without its percentage.

use serde::{Deserialize, Serialize};

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Direction of the most recent scroll, shared at grid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

/// Committed scroll values for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub prev_offset: f64,
    pub prev_percentage: f64,
    pub prev_index: usize,
}

/// Offsets closer than this are the same offset.
const OFFSET_EPSILON: f64 = 1e-9;

pub(crate) fn same_offset(a: f64, b: f64) -> bool {
    (a - b).abs() <= OFFSET_EPSILON
}

/// Normalize `offset` against `scroll_length` into `[0, 1]`.
///
/// A non-positive scroll length means nothing can scroll, which maps to 0.
pub fn scroll_percentage(offset: f64, scroll_length: f64) -> f64 {
    if scroll_length <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / scroll_length).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct ScrollTracker {
    axis: Axis,
    state: ScrollState,
}

impl ScrollTracker {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            state: ScrollState::default(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Start handling a scroll to `new_offset`. `None` when the offset is unchanged.
    pub fn begin(&self, new_offset: f64) -> Option<DetectedScroll> {
        if same_offset(new_offset, self.state.prev_offset) {
            return None;
        }
        Some(DetectedScroll {
            axis: self.axis,
            offset: new_offset,
            diff: new_offset - self.state.prev_offset,
        })
    }

    /// Whether an adjust to `offset` should run. An absent offset always runs.
    pub fn should_adjust(&self, offset: Option<f64>, force: bool) -> bool {
        force || offset.map_or(true, |o| !same_offset(o, self.state.prev_offset))
    }

    pub(crate) fn commit(&mut self, offset: f64, percentage: f64) {
        self.state.prev_offset = offset;
        self.state.prev_percentage = percentage;
    }

    pub(crate) fn record_index(&mut self, index: usize) {
        self.state.prev_index = index;
    }

    pub fn reset(&mut self) {
        self.state = ScrollState::default();
    }
}

/// A scroll whose direction is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedScroll {
    axis: Axis,
    offset: f64,
    diff: f64,
}

impl DetectedScroll {
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn direction(&self) -> ScrollDirection {
        match (self.axis, self.diff > 0.0) {
            (Axis::Vertical, true) => ScrollDirection::Down,
            (Axis::Vertical, false) => ScrollDirection::Up,
            (Axis::Horizontal, true) => ScrollDirection::Right,
            (Axis::Horizontal, false) => ScrollDirection::Left,
        }
    }

    /// Normalize the offset against the axis scroll length.
    pub fn with_scroll_length(self, scroll_length: f64) -> ComputedScroll {
        ComputedScroll {
            offset: self.offset,
            percentage: scroll_percentage(self.offset, scroll_length),
            direction: self.direction(),
        }
    }
}

/// A scroll ready to be applied and committed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComputedScroll {
    pub offset: f64,
    pub percentage: f64,
    pub direction: ScrollDirection,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_clamps_and_guards_zero() {
        assert_eq!(scroll_percentage(50.0, 100.0), 0.5);
        assert_eq!(scroll_percentage(150.0, 100.0), 1.0);
        assert_eq!(scroll_percentage(-10.0, 100.0), 0.0);
        assert_eq!(scroll_percentage(10.0, 0.0), 0.0);
        assert_eq!(scroll_percentage(10.0, -40.0), 0.0);
        assert_eq!(scroll_percentage(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn test_unchanged_offset_is_idle() {
        let tracker = ScrollTracker::new(Axis::Vertical);
        assert!(tracker.begin(0.0).is_none());
        assert!(!tracker.should_adjust(Some(0.0), false));
        assert!(tracker.should_adjust(Some(0.0), true));
        assert!(tracker.should_adjust(None, false));
    }

    #[test]
    fn test_direction_detection() {
        let mut tracker = ScrollTracker::new(Axis::Vertical);
        assert_eq!(tracker.begin(10.0).unwrap().direction(), ScrollDirection::Down);
        tracker.commit(10.0, 0.1);
        assert_eq!(tracker.begin(5.0).unwrap().direction(), ScrollDirection::Up);

        let horizontal = ScrollTracker::new(Axis::Horizontal);
        let detected = horizontal.begin(3.0).unwrap();
        assert_eq!(detected.direction(), ScrollDirection::Right);
        let computed = detected.with_scroll_length(12.0);
        assert_eq!(computed.percentage, 0.25);
        assert_eq!(computed.offset, 3.0);
    }

    #[test]
    fn test_commit_and_reset() {
        let mut tracker = ScrollTracker::new(Axis::Horizontal);
        tracker.commit(40.0, 0.4);
        tracker.record_index(7);
        assert_eq!(
            tracker.state(),
            ScrollState {
                prev_offset: 40.0,
                prev_percentage: 0.4,
                prev_index: 7
            }
        );
        tracker.reset();
        assert_eq!(tracker.state(), ScrollState::default());
    }
}
