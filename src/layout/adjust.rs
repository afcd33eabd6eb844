//! Registry of external viewport adjusters.
//!
//! Adjusters let something drawn next to a container (a side panel, a
//! grouping bar) claim part of the container's width or height. The registry
//! folds them in registration order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizontal side an adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Width/height delta contributed by adjusters. Usually negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportAdjustment {
    pub height: f64,
    pub width: f64,
    pub side: Option<Side>,
}

impl ViewportAdjustment {
    pub fn new(height: f64, width: f64) -> Self {
        Self {
            height,
            width,
            side: None,
        }
    }

    #[must_use]
    pub fn on_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }
}

/// Something that adjusts the viewport given the adjustment accumulated so far.
pub trait AdjustmentSource {
    fn adjust(&self, prior: ViewportAdjustment) -> ViewportAdjustment;
}

impl<F> AdjustmentSource for F
where
    F: Fn(ViewportAdjustment) -> ViewportAdjustment,
{
    fn adjust(&self, prior: ViewportAdjustment) -> ViewportAdjustment {
        self(prior)
    }
}

/// Handle returned by [`AdjustmentRegistry::register`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdjusterId(u64);

#[derive(Default)]
pub struct AdjustmentRegistry {
    next_id: u64,
    sources: Vec<(AdjusterId, Box<dyn AdjustmentSource>)>,
}

impl fmt::Debug for AdjustmentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdjustmentRegistry")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl AdjustmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an adjuster. The same function may be registered more than once.
    pub fn register(&mut self, source: impl AdjustmentSource + 'static) -> AdjusterId {
        let id = AdjusterId(self.next_id);
        self.next_id += 1;
        self.sources.push((id, Box::new(source)));
        id
    }

    /// Remove an adjuster. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: AdjusterId) -> bool {
        let before = self.sources.len();
        self.sources.retain(|(registered, _)| *registered != id);
        self.sources.len() != before
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fold every adjuster left to right, starting from zero.
    pub fn compute_adjustment(&self) -> ViewportAdjustment {
        self.sources
            .iter()
            .fold(ViewportAdjustment::default(), |acc, (_, source)| {
                source.adjust(acc)
            })
    }

    /// Pixels to reserve on `side`: the negated widths of adjustments tagged
    /// with that side. Each adjuster is asked independently.
    pub fn compute_margin(&self, side: Side) -> f64 {
        self.sources.iter().fold(0.0, |margin, (_, source)| {
            accumulate_margin(margin, side, source.adjust(ViewportAdjustment::default()))
        })
    }
}

fn accumulate_margin(margin: f64, side: Side, adjustment: ViewportAdjustment) -> f64 {
    if adjustment.side == Some(side) {
        margin - adjustment.width
    } else {
        margin
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn shrink_width(by: f64) -> impl Fn(ViewportAdjustment) -> ViewportAdjustment {
        move |prior| ViewportAdjustment {
            width: prior.width - by,
            ..prior
        }
    }

    #[test]
    fn test_empty_registry_is_zero() {
        let registry = AdjustmentRegistry::new();
        assert_eq!(registry.compute_adjustment(), ViewportAdjustment::default());
        assert_eq!(registry.compute_margin(Side::Left), 0.0);
    }

    #[test]
    fn test_fold_in_registration_order() {
        let mut registry = AdjustmentRegistry::new();
        registry.register(shrink_width(10.0));
        // Doubles whatever has been accumulated so far, so order matters.
        registry.register(|prior: ViewportAdjustment| ViewportAdjustment {
            width: prior.width * 2.0,
            height: prior.height - 5.0,
            side: prior.side,
        });
        let adj = registry.compute_adjustment();
        assert_eq!(adj.width, -20.0);
        assert_eq!(adj.height, -5.0);
    }

    #[test]
    fn test_remove_by_handle() {
        let mut registry = AdjustmentRegistry::new();
        let a = registry.register(shrink_width(10.0));
        let b = registry.register(shrink_width(10.0));
        assert_eq!(registry.compute_adjustment().width, -20.0);
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.compute_adjustment().width, -10.0);
        assert!(registry.remove(b));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_margin_only_counts_matching_side() {
        let mut registry = AdjustmentRegistry::new();
        registry.register(|_: ViewportAdjustment| {
            ViewportAdjustment::new(0.0, -40.0).on_side(Side::Left)
        });
        registry.register(|_: ViewportAdjustment| {
            ViewportAdjustment::new(0.0, -25.0).on_side(Side::Right)
        });
        registry.register(shrink_width(7.0));
        assert_eq!(registry.compute_margin(Side::Left), 40.0);
        assert_eq!(registry.compute_margin(Side::Right), 25.0);
    }
}
