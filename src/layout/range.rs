//! Window selection for virtualized rows and columns.
//!
//! Given a normalized scroll percentage, pick the contiguous index range of
//! the visible cache that must be materialized. Small scroll movements are
//! absorbed by a hysteresis gate so the window does not shift on every pixel.

use std::ops::Range;
use tracing::trace;

use super::to_index;
use crate::types::{HysteresisSuppression, Row};

/// Number of trailing rows whose heights fill `viewport_height`.
pub fn min_rows_to_render(rows: &[Row], viewport_height: f64) -> usize {
    let mut count = 0;
    let mut filled = 0.0;
    for row in rows.iter().rev() {
        if filled >= viewport_height {
            break;
        }
        filled += row.height;
        count += 1;
    }
    count
}

/// Number of columns needed to fill `viewport_width`.
///
/// Walks forward until the leading columns fill the viewport, then keeps
/// growing the count while a trailing window of that count ending at a later
/// column would still fall short (narrow columns further right).
#[allow(clippy::cast_precision_loss)]
pub fn min_columns_to_render(widths: &[i64], viewport_width: f64) -> usize {
    let mut count = 0;
    let mut total: i64 = 0;
    for (i, &width) in widths.iter().enumerate() {
        if (total as f64) < viewport_width {
            total = total.saturating_add(width);
            count += 1;
        } else {
            let start = i.saturating_sub(count);
            let window: i64 = widths
                .get(start..=i)
                .map_or(0, |w| w.iter().copied().fold(0, i64::saturating_add));
            if (window as f64) < viewport_width {
                count += 1;
            }
        }
    }
    count
}

/// Scroll index for a percentage, never past `max_index`.
#[allow(clippy::cast_precision_loss)]
pub fn scroll_index(max_index: usize, percentage: f64) -> usize {
    let percentage = if percentage.is_finite() {
        percentage.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let max = max_index as f64;
    to_index((max * percentage).min(max).ceil()).min(max_index)
}

/// Hysteresis gate inputs for one range computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    pub prev_offset: f64,
    pub offset: f64,
    pub prev_index: usize,
    pub threshold: usize,
    pub suppression: HysteresisSuppression,
}

impl Hysteresis {
    /// Whether the window should stay where it is.
    pub fn holds(&self, index: usize, max_index: usize) -> bool {
        if index >= max_index {
            return false;
        }
        let forward = self.offset > self.prev_offset
            && !self.suppression.forward
            && index < self.prev_index.saturating_add(self.threshold);
        let backward = self.offset < self.prev_offset
            && !self.suppression.backward
            && index.saturating_add(self.threshold) > self.prev_index;
        forward || backward
    }
}

/// Inputs for one range computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRequest {
    /// Length of the visible cache.
    pub len: usize,
    /// Minimum items that fill the viewport.
    pub min_count: usize,
    pub percentage: f64,
    /// False renders the full cache.
    pub virtualize: bool,
    /// Extra items on each side of the minimum window.
    pub excess: usize,
    /// Gate applied when the scroll offset is known.
    pub hysteresis: Option<Hysteresis>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeDecision {
    /// The gate held; leave the rendered slice and scroll index alone.
    Hold { index: usize },
    /// Render `range`; its end may exceed the cache and is clamped on commit.
    Render { range: Range<usize>, index: usize },
}

pub fn compute_range(request: &RangeRequest) -> RangeDecision {
    let max_index = request.len.saturating_sub(request.min_count);
    let index = scroll_index(max_index, request.percentage);

    if !request.virtualize {
        let end = request
            .len
            .max(request.min_count.saturating_add(request.excess));
        return RangeDecision::Render {
            range: 0..end,
            index,
        };
    }

    if let Some(gate) = request.hysteresis {
        if gate.holds(index, max_index) {
            trace!(index, prev_index = gate.prev_index, "scroll within hysteresis threshold");
            return RangeDecision::Hold { index };
        }
    }

    let start = index.saturating_sub(request.excess);
    let end = request.len.min(
        index
            .saturating_add(request.min_count)
            .saturating_add(request.excess),
    );
    RangeDecision::Render {
        range: start..end,
        index,
    }
}

/// The materialized part of a visible cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlice<T> {
    items: Vec<T>,
    first: usize,
}

impl<T> Default for RenderedSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            first: 0,
        }
    }
}

impl<T: Clone> RenderedSlice<T> {
    /// Replace the slice with `cache[range]`, clamped to the cache. Returns the
    /// range actually committed.
    pub fn commit(&mut self, cache: &[T], range: Range<usize>) -> Range<usize> {
        let end = range.end.min(cache.len());
        let start = range.start.min(end);
        self.items.clear();
        self.items
            .extend_from_slice(cache.get(start..end).unwrap_or_default());
        self.first = start;
        start..end
    }
}

impl<T> RenderedSlice<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Index of the first rendered item in the visible cache.
    pub fn first(&self) -> usize {
        self.first
    }

    pub fn range(&self) -> Range<usize> {
        self.first..self.first + self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.first = 0;
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

    fn request(len: usize, min_count: usize, percentage: f64) -> RangeRequest {
        RangeRequest {
            len,
            min_count,
            percentage,
            virtualize: true,
            excess: 2,
            hysteresis: None,
        }
    }

    #[test]
    fn test_min_rows_walks_from_the_end() {
        let mut rows = Row::uniform(10, 10.0);
        rows[9].height = 40.0;
        assert_eq!(min_rows_to_render(&rows, 50.0), 2);
        assert_eq!(min_rows_to_render(&rows, 0.0), 0);
        assert_eq!(min_rows_to_render(&[], 50.0), 0);
        assert_eq!(min_rows_to_render(&Row::uniform(3, 10.0), 500.0), 3);
    }

    #[test]
    fn test_min_columns_uniform() {
        assert_eq!(min_columns_to_render(&[100; 10], 250.0), 3);
        assert_eq!(min_columns_to_render(&[], 250.0), 0);
    }

    #[test]
    fn test_min_columns_grows_for_narrow_tail() {
        // Two wide columns fill the viewport, but the narrow tail needs more.
        let widths = [200, 200, 50, 50, 50, 50];
        assert!(min_columns_to_render(&widths, 300.0) > 2);
    }

    #[test]
    fn test_scroll_index_bounds() {
        assert_eq!(scroll_index(15, 0.0), 0);
        assert_eq!(scroll_index(15, 0.5), 8);
        assert_eq!(scroll_index(15, 1.0), 15);
        assert_eq!(scroll_index(15, 3.0), 15);
        assert_eq!(scroll_index(15, -1.0), 0);
        assert_eq!(scroll_index(0, 0.7), 0);
    }

    #[test]
    fn test_virtualized_window() {
        let decision = compute_range(&request(100, 10, 0.5));
        // max index 90, index 45
        assert_eq!(
            decision,
            RangeDecision::Render {
                range: 43..57,
                index: 45
            }
        );
    }

    #[test]
    fn test_full_cache_fallback() {
        let mut req = request(3, 3, 0.9);
        req.virtualize = false;
        assert_eq!(
            compute_range(&req),
            RangeDecision::Render {
                range: 0..5,
                index: 0
            }
        );
    }

    #[test]
    fn test_gate_holds_small_forward_move() {
        let mut req = request(20, 5, 0.05);
        req.hysteresis = Some(Hysteresis {
            prev_offset: 0.0,
            offset: 5.0,
            prev_index: 0,
            threshold: 2,
            suppression: HysteresisSuppression::default(),
        });
        assert_eq!(compute_range(&req), RangeDecision::Hold { index: 1 });

        req.hysteresis = req.hysteresis.map(|gate| Hysteresis {
            suppression: HysteresisSuppression {
                forward: true,
                backward: false,
            },
            ..gate
        });
        assert!(matches!(compute_range(&req), RangeDecision::Render { .. }));
    }

    #[test]
    fn test_gate_never_holds_at_max_index() {
        let gate = Hysteresis {
            prev_offset: 100.0,
            offset: 110.0,
            prev_index: 14,
            threshold: 4,
            suppression: HysteresisSuppression::default(),
        };
        assert!(gate.holds(14, 15));
        assert!(!gate.holds(15, 15));
    }

    #[test]
    fn test_gate_backward() {
        let gate = Hysteresis {
            prev_offset: 100.0,
            offset: 90.0,
            prev_index: 10,
            threshold: 3,
            suppression: HysteresisSuppression::default(),
        };
        assert!(gate.holds(8, 15));
        assert!(!gate.holds(7, 15));
    }

    #[test]
    fn test_range_containment() {
        for len in 0..40 {
            for min_count in 0..=len.min(12) {
                for step in 0..=10 {
                    let pct = f64::from(step) / 10.0;
                    if let RangeDecision::Render { range, .. } =
                        compute_range(&request(len, min_count, pct))
                    {
                        assert!(range.start <= range.end);
                        assert!(range.end <= len);
                        assert!(range.end - range.start >= min_count.min(len));
                    }
                }
            }
        }
    }

    #[test]
    fn test_slice_commit_clamps() {
        let cache: Vec<u32> = (0..3).collect();
        let mut slice = RenderedSlice::default();
        let committed = slice.commit(&cache, 0..7);
        assert_eq!(committed, 0..3);
        assert_eq!(slice.items(), &[0, 1, 2]);

        let committed = slice.commit(&cache, 5..9);
        assert_eq!(committed, 3..3);
        assert!(slice.is_empty());
        assert_eq!(slice.first(), 3);

        slice.clear();
        assert_eq!(slice.range(), 0..0);
    }

    #[test]
    fn test_huge_excess_and_threshold_saturate() {
        let flat = RangeRequest {
            virtualize: false,
            excess: usize::MAX,
            ..request(50, 5, 0.5)
        };
        match compute_range(&flat) {
            RangeDecision::Render { range, .. } => assert_eq!(range, 0..usize::MAX),
            other => panic!("unexpected {other:?}"),
        }

        let windowed = RangeRequest {
            excess: usize::MAX,
            ..request(50, 5, 0.5)
        };
        assert_eq!(
            compute_range(&windowed),
            RangeDecision::Render { range: 0..50, index: 23 }
        );

        let gate = Hysteresis {
            prev_offset: 100.0,
            offset: 200.0,
            prev_index: 10,
            threshold: usize::MAX,
            suppression: HysteresisSuppression::default(),
        };
        assert!(gate.holds(30, 45));
        let back = Hysteresis {
            prev_offset: 200.0,
            offset: 100.0,
            ..gate
        };
        assert!(back.holds(2, 45));
        assert!(!back.holds(45, 45));
    }

    #[test]
    fn test_min_columns_huge_widths() {
        assert_eq!(min_columns_to_render(&[i64::MAX, i64::MAX, 10], 250.0), 1);
    }
}
