//! Column width distribution across sibling render containers.
//!
//! Flex columns in one container compete for the same leftover width as
//! flex columns in another, so every visible column of every container is
//! solved in a single pass over the shared arena. Steps:
//!
//! 1. Fixed and percentage columns get their width, clamped to their bounds.
//! 2. The remaining width is split between flex columns by weight.
//! 3. Rounding surplus is handed out one pixel at a time to flex columns
//!    below their maximum; overshoot is taken back one pixel at a time from
//!    flex columns above their minimum. Ties go to the earlier column.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

use super::to_px;
use crate::types::{ColumnArena, ColumnId, WidthSpec};

/// Summary of one solve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidthSolution {
    pub available_width: i64,
    pub used_width: i64,
    pub flex_columns: usize,
    pub flex_weight: u32,
}

impl WidthSolution {
    /// Width left unallocated (negative when columns overflow).
    pub fn leftover(&self) -> i64 {
        self.available_width.saturating_sub(self.used_width)
    }
}

/// Running totals of the fixed/percentage pass.
#[derive(Debug, Clone, Copy, Default)]
struct Allocation {
    used: i64,
    weight: u32,
}

impl Allocation {
    fn with_width(self, width: i64) -> Self {
        Self {
            used: self.used.saturating_add(width),
            ..self
        }
    }

    fn with_flex(self, weight: u32) -> Self {
        Self {
            weight: self.weight.saturating_add(weight),
            ..self
        }
    }
}

/// Solve drawn widths for `members` (column handles of all containers, in
/// container order) against `available_width`.
///
/// Writes `drawn_width` of every visible member in place. Hidden columns,
/// duplicate handles and unknown handles are skipped.
pub fn solve_column_widths(
    columns: &mut ColumnArena,
    members: &[ColumnId],
    available_width: i64,
) -> WidthSolution {
    let mut seen = HashSet::with_capacity(members.len());
    let mut flex: Vec<(ColumnId, u32)> = Vec::new();

    let allocation = members
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .fold(Allocation::default(), |acc, id| {
            let Some(column) = columns.get_mut(id) else {
                return acc;
            };
            if !column.visible() {
                return acc;
            }
            match *column.width() {
                WidthSpec::Pixels(px) => {
                    let width = column.clamp_width(to_px(px));
                    column.drawn_width = width;
                    acc.with_width(width)
                }
                WidthSpec::Percent(pct) => {
                    let width = column.clamp_width(percent_width(pct, available_width));
                    column.drawn_width = width;
                    acc.with_width(width)
                }
                WidthSpec::Flex(weight) => {
                    flex.push((id, weight));
                    acc.with_flex(weight)
                }
                WidthSpec::Unrecognized(_) => {
                    trace!(column = %id, "skipping unrecognized width directive");
                    acc
                }
            }
        });

    let mut used = allocation.used;
    if allocation.weight > 0 {
        let unit = available_width.saturating_sub(used) as f64 / f64::from(allocation.weight);
        used = flex.iter().fold(used, |used, &(id, weight)| {
            columns.get_mut(id).map_or(used, |column| {
                let width = column.clamp_width(to_px(f64::from(weight) * unit));
                column.drawn_width = width;
                used.saturating_add(width)
            })
        });
    }

    let flex_ids: Vec<ColumnId> = flex.iter().map(|&(id, _)| id).collect();
    used = used.saturating_add(distribute_surplus(
        columns,
        &flex_ids,
        available_width.saturating_sub(used),
    ));
    used = used.saturating_sub(trim_deficit(
        columns,
        &flex_ids,
        used.saturating_sub(available_width),
    ));

    let solution = WidthSolution {
        available_width,
        used_width: used,
        flex_columns: flex_ids.len(),
        flex_weight: allocation.weight,
    };
    debug!(
        available = available_width,
        used,
        flex = solution.flex_columns,
        "solved column widths"
    );
    solution
}

#[allow(clippy::cast_precision_loss)]
fn percent_width(pct: f64, available_width: i64) -> i64 {
    to_px(pct / 100.0 * available_width as f64)
}

/// Hand out `surplus` pixels round-robin to flex columns below their
/// maximum. Returns the pixels handed out.
fn distribute_surplus(columns: &mut ColumnArena, flex: &[ColumnId], surplus: i64) -> i64 {
    let mut remaining = surplus;
    let mut changed = true;
    while remaining > 0 && changed {
        changed = false;
        for &id in flex {
            if remaining == 0 {
                break;
            }
            if let Some(column) = columns.get_mut(id) {
                if column.drawn_width < column.max_width() {
                    column.drawn_width += 1;
                    remaining -= 1;
                    changed = true;
                }
            }
        }
    }
    surplus.max(0) - remaining.max(0)
}

/// Take back `excess` pixels round-robin from flex columns above their
/// minimum. Returns the pixels taken back.
fn trim_deficit(columns: &mut ColumnArena, flex: &[ColumnId], excess: i64) -> i64 {
    let mut remaining = excess;
    let mut changed = true;
    while remaining > 0 && changed {
        changed = false;
        for &id in flex {
            if remaining == 0 {
                break;
            }
            if let Some(column) = columns.get_mut(id) {
                if column.drawn_width > column.min_width() {
                    column.drawn_width -= 1;
                    remaining -= 1;
                    changed = true;
                }
            }
        }
    }
    excess.max(0) - remaining.max(0)
}

/// Sum of drawn widths of the visible columns among `ids`, saturating at
/// `i64::MAX`.
pub fn canvas_width(columns: &ColumnArena, ids: &[ColumnId]) -> i64 {
    ids.iter()
        .filter_map(|&id| columns.get(id))
        .filter(|column| column.visible())
        .map(|column| column.drawn_width())
        .fold(0, i64::saturating_add)
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
    use crate::types::ColumnDef;

    fn arena(defs: Vec<ColumnDef>) -> (ColumnArena, Vec<ColumnId>) {
        let mut arena = ColumnArena::new();
        let ids = defs.into_iter().map(|d| arena.push(d).unwrap()).collect();
        (arena, ids)
    }

    fn widths(arena: &ColumnArena, ids: &[ColumnId]) -> Vec<i64> {
        ids.iter().map(|&id| arena.drawn_width(id)).collect()
    }

    #[test]
    fn test_fixed_and_flex_mix() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Pixels(100.0)).with_bounds(50, 200),
            ColumnDef::new("b", WidthSpec::Flex(1)).with_bounds(50, 10000),
            ColumnDef::new("c", WidthSpec::Flex(1)).with_bounds(50, 10000),
        ]);
        let solution = solve_column_widths(&mut cols, &ids, 500);
        assert_eq!(widths(&cols, &ids), vec![100, 200, 200]);
        assert_eq!(solution.used_width, 500);
        assert_eq!(solution.flex_weight, 2);
    }

    #[test]
    fn test_rounding_surplus_goes_to_first_columns() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Flex(1)).with_bounds(0, 1000),
            ColumnDef::new("b", WidthSpec::Flex(1)).with_bounds(0, 1000),
            ColumnDef::new("c", WidthSpec::Flex(1)).with_bounds(0, 1000),
        ]);
        solve_column_widths(&mut cols, &ids, 100);
        assert_eq!(widths(&cols, &ids), vec![34, 33, 33]);
    }

    #[test]
    fn test_percentage_clamped_to_max() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Percent(90.0)).with_bounds(10, 50)
        ]);
        solve_column_widths(&mut cols, &ids, 1000);
        assert_eq!(widths(&cols, &ids), vec![50]);
    }

    #[test]
    fn test_flex_weights() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Flex(1)).with_bounds(0, 1000),
            ColumnDef::new("b", WidthSpec::Flex(3)).with_bounds(0, 1000),
        ]);
        solve_column_widths(&mut cols, &ids, 400);
        assert_eq!(widths(&cols, &ids), vec![100, 300]);
    }

    #[test]
    fn test_surplus_skips_capped_columns() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Flex(1)).with_bounds(0, 100),
            ColumnDef::new("b", WidthSpec::Flex(1)).with_bounds(0, 1000),
        ]);
        let solution = solve_column_widths(&mut cols, &ids, 1000);
        assert_eq!(widths(&cols, &ids), vec![100, 900]);
        assert_eq!(solution.leftover(), 0);
    }

    #[test]
    fn test_overcommit_trims_to_minimum() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Pixels(300.0)).with_bounds(0, 1000),
            ColumnDef::new("b", WidthSpec::Flex(1)).with_bounds(40, 1000),
            ColumnDef::new("c", WidthSpec::Flex(1)).with_bounds(40, 1000),
        ]);
        let solution = solve_column_widths(&mut cols, &ids, 200);
        assert_eq!(widths(&cols, &ids), vec![300, 40, 40]);
        assert_eq!(solution.leftover(), -180);
    }

    #[test]
    fn test_unrecognized_and_hidden_are_skipped() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Unrecognized("wide".into())).with_bounds(20, 100),
            ColumnDef::new("b", WidthSpec::Pixels(500.0)).with_visible(false),
            ColumnDef::new("c", WidthSpec::Flex(1)).with_bounds(0, 1000),
        ]);
        let solution = solve_column_widths(&mut cols, &ids, 300);
        assert_eq!(widths(&cols, &ids), vec![20, 30, 300]);
        assert_eq!(solution.flex_columns, 1);
        assert_eq!(canvas_width(&cols, &ids), 320);
    }

    #[test]
    fn test_fixed_only_leaves_width_unallocated() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Pixels(120.0)),
            ColumnDef::new("b", WidthSpec::Pixels(80.0)),
        ]);
        let solution = solve_column_widths(&mut cols, &ids, 500);
        assert_eq!(widths(&cols, &ids), vec![120, 80]);
        assert_eq!(solution.leftover(), 300);
    }

    #[test]
    fn test_duplicate_handles_counted_once() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Pixels(100.0)),
            ColumnDef::new("b", WidthSpec::Flex(1)).with_bounds(0, 1000),
        ]);
        let members = [ids[0], ids[1], ids[0], ColumnId(42)];
        solve_column_widths(&mut cols, &members, 300);
        assert_eq!(widths(&cols, &ids), vec![100, 200]);
    }

    #[test]
    fn test_huge_widths_saturate() {
        let (mut cols, ids) = arena(vec![
            ColumnDef::new("a", WidthSpec::Pixels(1e300)).with_bounds(0, i64::MAX),
            ColumnDef::new("b", WidthSpec::Pixels(1e300)).with_bounds(0, i64::MAX),
            ColumnDef::new("c", WidthSpec::Flex(1)).with_bounds(0, 100),
        ]);
        let solution = solve_column_widths(&mut cols, &ids, 500);
        assert_eq!(widths(&cols, &ids), vec![i64::MAX, i64::MAX, 0]);
        assert_eq!(solution.used_width, i64::MAX);
        assert_eq!(solution.leftover(), 500 - i64::MAX);
        assert_eq!(canvas_width(&cols, &ids), i64::MAX);
    }
}
