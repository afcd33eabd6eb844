//! Column width solving across sibling containers
//!
//! Tests for the shared width budget, bound clamping, rounding and
//! re-solving after grid changes.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use gridport::layout::ViewportAdjustment;
use gridport::{ColumnDef, ContainerName, GridOptions, WidthSpec};
use test_case::test_case;

// =============================================================================
// SHARED BUDGET
// =============================================================================

#[test]
fn test_flex_shared_across_containers() {
    let mut g = grid(900.0, 600.0, GridOptions::default());
    let body = assign(&mut g, ContainerName::Body, vec![flex("a", 1), flex("b", 1)]);
    let left = assign(&mut g, ContainerName::Left, vec![pixels("p", 100.0)]);
    let right = assign(&mut g, ContainerName::Right, vec![flex("r", 2)]);

    assert_eq!(drawn_widths(&g, &body), vec![200, 200]);
    assert_eq!(drawn_widths(&g, &left), vec![100]);
    assert_eq!(drawn_widths(&g, &right), vec![400]);

    assert_eq!(g.canvas_width(ContainerName::Body), Some(400));
    assert_eq!(g.canvas_width(ContainerName::Left), Some(100));
    assert_eq!(g.canvas_width(ContainerName::Right), Some(400));

    let solution = g.width_solution();
    assert_eq!(solution.available_width, 900);
    assert_eq!(solution.used_width, 900);
    assert_eq!(solution.flex_weight, 4);
}

#[test]
fn test_grid_adjuster_shrinks_budget() {
    let mut g = grid(900.0, 600.0, GridOptions::default());
    let body = assign(&mut g, ContainerName::Body, vec![flex("a", 1), flex("b", 1)]);
    let left = assign(&mut g, ContainerName::Left, vec![pixels("p", 100.0)]);

    let id = g.register_viewport_adjuster(|prior: ViewportAdjustment| {
        ViewportAdjustment::new(prior.height, prior.width - 100.0)
    });
    assert_eq!(drawn_widths(&g, &body), vec![350, 350]);
    assert_eq!(drawn_widths(&g, &left), vec![100]);

    assert!(g.remove_viewport_adjuster(id));
    assert_eq!(drawn_widths(&g, &body), vec![400, 400]);
    assert!(!g.remove_viewport_adjuster(id));
}

#[test]
fn test_scrollbar_width_is_not_available() {
    let mut g = grid(600.0, 400.0, GridOptions::default());
    let mut viewport = *g.viewport();
    viewport.scrollbar_width = 17.0;
    g.set_viewport(viewport);
    assign(&mut g, ContainerName::Body, vec![flex("a", 1)]);
    assert_eq!(g.width_solution().available_width, 583);
    assert_eq!(g.width_solution().used_width, 583);
}

#[test]
fn test_column_in_two_containers_solved_once() {
    let mut g = grid(500.0, 400.0, GridOptions::default());
    let ids = assign(&mut g, ContainerName::Body, vec![flex("a", 1)]);
    g.set_container_columns(ContainerName::Left, ids.clone())
        .unwrap();
    assert_eq!(g.width_solution().flex_columns, 1);
    assert_eq!(drawn_widths(&g, &ids), vec![500]);
}

// =============================================================================
// CONSERVATION AND BOUNDS
// =============================================================================

#[test_case(3, 100.0 ; "three columns with rounding")]
#[test_case(7, 1000.0 ; "seven columns")]
#[test_case(13, 997.0 ; "thirteen columns odd width")]
#[test_case(1, 50.0 ; "single column")]
fn test_flex_fills_available_width(count: usize, width: f64) {
    let mut g = grid(width, 400.0, GridOptions::default());
    let defs = (0..count).map(|i| flex(&format!("c{i}"), 1)).collect();
    let ids = assign(&mut g, ContainerName::Body, defs);

    let total: i64 = drawn_widths(&g, &ids).iter().sum();
    assert_eq!(total, g.width_solution().available_width);
    assert_eq!(g.width_solution().leftover(), 0);
    assert_within_bounds(&g);
}

#[test]
fn test_rounding_never_differs_by_more_than_one() {
    let mut g = grid(1000.0, 400.0, GridOptions::default());
    let defs = (0..7).map(|i| flex(&format!("c{i}"), 1)).collect();
    let ids = assign(&mut g, ContainerName::Body, defs);

    let widths = drawn_widths(&g, &ids);
    let min = widths.iter().min().copied().unwrap();
    let max = widths.iter().max().copied().unwrap();
    assert!(max - min <= 1, "uneven widths {widths:?}");
    // Surplus pixels go to the leading columns.
    assert_eq!(widths, vec![143, 143, 143, 143, 143, 143, 142]);
}

#[test]
fn test_overcommitted_columns_stay_at_minimum() {
    let mut g = grid(300.0, 400.0, GridOptions::default());
    let defs = (0..10)
        .map(|i| flex(&format!("c{i}"), 1).with_bounds(50, 500))
        .collect();
    let ids = assign(&mut g, ContainerName::Body, defs);

    assert!(drawn_widths(&g, &ids).iter().all(|&w| w == 50));
    assert_eq!(g.width_solution().leftover(), -200);
    assert_within_bounds(&g);
}

#[test]
fn test_fixed_columns_clamped_to_bounds() {
    let mut g = grid(800.0, 400.0, GridOptions::default());
    let ids = assign(
        &mut g,
        ContainerName::Body,
        vec![
            pixels("narrow", 5.0),
            pixels("wide", 20_000.0),
            ColumnDef::new("pct", WidthSpec::Percent(50.0)).with_bounds(10, 100),
        ],
    );
    assert_eq!(drawn_widths(&g, &ids), vec![30, 9000, 100]);
    assert_within_bounds(&g);
}

#[test]
fn test_textual_directives() {
    let mut g = grid(800.0, 400.0, GridOptions::default());
    let defs = ["25%", "**", "*"]
        .iter()
        .map(|text| ColumnDef::new(*text, text.parse::<WidthSpec>().unwrap()))
        .collect();
    let ids = assign(&mut g, ContainerName::Body, defs);
    assert_eq!(drawn_widths(&g, &ids), vec![200, 400, 200]);
}

#[test]
fn test_invalid_bounds_rejected() {
    let mut g = grid(800.0, 400.0, GridOptions::default());
    assert!(g.add_column(flex("bad", 1).with_bounds(100, 50)).is_err());
    assert!(g.add_column(flex("neg", 1).with_bounds(-1, 50)).is_err());
    assert!(g.columns().is_empty());
}

// =============================================================================
// RE-SOLVING
// =============================================================================

#[test]
fn test_solving_is_idempotent() {
    let mut g = grid(777.0, 400.0, GridOptions::default());
    let ids = assign(
        &mut g,
        ContainerName::Body,
        vec![pixels("a", 120.0), flex("b", 2), flex("c", 3)],
    );
    let first = g.update_column_widths();
    let widths = drawn_widths(&g, &ids);
    let second = g.update_column_widths();
    assert_eq!(first, second);
    assert_eq!(widths, drawn_widths(&g, &ids));
}

#[test]
fn test_resize_resolves_widths() {
    let mut g = grid(600.0, 400.0, GridOptions::default());
    let ids = assign(&mut g, ContainerName::Body, vec![flex("a", 1), flex("b", 1)]);
    assert_eq!(drawn_widths(&g, &ids), vec![300, 300]);

    g.resize(400.0, 400.0);
    assert_eq!(drawn_widths(&g, &ids), vec![200, 200]);
    assert_eq!(g.canvas_width(ContainerName::Body), Some(400));
}

#[test]
fn test_hidden_column_gives_up_its_share() {
    let mut g = grid(600.0, 400.0, GridOptions::default());
    let ids = assign(&mut g, ContainerName::Body, vec![flex("a", 1), flex("b", 1)]);

    g.set_column_visible(ids[1], false).unwrap();
    assert_eq!(g.columns().drawn_width(ids[0]), 600);
    assert_eq!(g.canvas_width(ContainerName::Body), Some(600));
    let styles = g.container(ContainerName::Body).unwrap().column_styles();
    assert_eq!(styles.len(), 1);
}

#[test]
fn test_width_change_resolves() {
    let mut g = grid(600.0, 400.0, GridOptions::default());
    let ids = assign(&mut g, ContainerName::Body, vec![flex("a", 1), flex("b", 1)]);

    g.set_column_width(ids[0], WidthSpec::Pixels(100.0)).unwrap();
    assert_eq!(drawn_widths(&g, &ids), vec![100, 500]);
}

#[test]
fn test_unrecognized_directive_keeps_previous_width() {
    let mut g = grid(600.0, 400.0, GridOptions::default());
    let ids = assign(&mut g, ContainerName::Body, vec![flex("a", 1), flex("b", 1)]);

    g.set_column_width(ids[0], WidthSpec::Unrecognized("auto".into()))
        .unwrap();
    // The skipped column keeps 300 but no longer counts toward the budget.
    assert_eq!(drawn_widths(&g, &ids), vec![300, 600]);
}
