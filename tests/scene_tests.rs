//! JSON scene tests
//!
//! Tests for building grids from scenes and the serialized snapshot.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridport::scene::{layout, layout_json, Scene};
use gridport::{ContainerName, GridError, WidthSpec};

const PINNED_SCENE: &str = r#"{
    "id": "7",
    "viewport": { "gridWidth": 600, "gridHeight": 330, "headerHeight": 30 },
    "columns": [
        { "name": "id", "width": 80 },
        { "name": "name", "width": "*" },
        { "name": "notes", "width": "**" },
        { "name": "total", "width": "20%", "maxWidth": 100 }
    ],
    "containers": [
        { "name": "body", "columns": [1, 2], "rowCount": 100, "rowHeight": 30, "scrollTop": 1215 },
        { "name": "left", "columns": [0], "rowCount": 100, "rowHeight": 30 },
        { "name": "right", "columns": [3], "rowCount": 100, "rowHeight": 30 }
    ]
}"#;

#[test]
fn test_scene_parses_width_directives() {
    let scene = Scene::from_json(PINNED_SCENE).unwrap();
    let widths: Vec<&WidthSpec> = scene.columns.iter().map(|c| &c.width).collect();
    assert_eq!(
        widths,
        vec![
            &WidthSpec::Pixels(80.0),
            &WidthSpec::Flex(1),
            &WidthSpec::Flex(2),
            &WidthSpec::Percent(20.0),
        ]
    );
    assert_eq!(scene.columns[3].max_width, 100);
    assert_eq!(scene.columns[3].min_width, 30);
    assert_eq!(scene.containers[0].scroll_top, Some(1215.0));
}

#[test]
fn test_scene_solves_widths_jointly() {
    let snapshot = layout(PINNED_SCENE).unwrap();
    let widths: Vec<i64> = snapshot.columns.iter().map(|c| c.drawn_width).collect();
    // 600 - 80 - 100 = 420 left for three flex shares.
    assert_eq!(widths, vec![80, 140, 280, 100]);
    assert_eq!(snapshot.solution.used_width, 600);

    let names: Vec<ContainerName> = snapshot.containers.iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![ContainerName::Body, ContainerName::Left, ContainerName::Right]
    );
    assert_eq!(snapshot.containers[0].canvas_width, 420);
    assert_eq!(snapshot.containers[1].canvas_width, 80);
}

#[test]
fn test_scene_applies_scroll() {
    let snapshot = layout(PINNED_SCENE).unwrap();
    let body = &snapshot.containers[0];

    // 100 rows of 30px in a 300px viewport: 10 rows visible, last index 90.
    // 1215 of 2700 scrollable pixels is 45%, index ceil(40.5) = 41.
    assert_eq!(body.canvas_height, 3000.0);
    assert_eq!(body.viewport_height, 300.0);
    assert_eq!(body.vertical.prev_offset, 1215.0);
    assert_eq!(body.vertical.prev_index, 41);
    assert_eq!(body.rendered_rows, 37..55);

    let left = &snapshot.containers[1];
    assert_eq!(left.rendered_rows, 0..14);
}

#[test]
fn test_scene_scrollbars_and_events() {
    let snapshot = layout(PINNED_SCENE).unwrap();
    let body = &snapshot.containers[0];
    let right = &snapshot.containers[2];
    assert_eq!(body.viewport_style.css(), "overflow-x: scroll; overflow-y: hidden;");
    assert_eq!(right.viewport_style.css(), "overflow-x: hidden; overflow-y: scroll;");
    assert!(snapshot.containers[1].h_scrollbar_placeholder);

    // One canvas height event per container.
    assert_eq!(snapshot.events.len(), 3);
}

#[test]
fn test_snapshot_json_shape() {
    let json = layout_json(PINNED_SCENE).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["id"], "7");
    assert_eq!(value["scrollDirection"], "down");
    assert_eq!(value["solution"]["availableWidth"], 600);
    assert_eq!(value["containers"][0]["name"], "body");
    assert_eq!(value["containers"][0]["renderedRows"]["start"], 37);
    assert_eq!(value["containers"][0]["viewportStyle"]["overflowY"], "hidden");
    assert_eq!(value["events"][0]["type"], "canvasHeightChanged");
    assert_eq!(value["events"][0]["newHeight"], 3000.0);
    assert!(value["styleSheet"]
        .as_str()
        .unwrap()
        .contains(".grid7 .gp-col1 { min-width: 140px; max-width: 140px; }"));
}

#[test]
fn test_unrecognized_width_survives_round_trip() {
    let scene = Scene::from_json(r#"{"columns":[{"name":"a","width":"auto"}]}"#).unwrap();
    assert_eq!(scene.columns[0].width, WidthSpec::Unrecognized("auto".into()));
    let json = serde_json::to_string(&scene).unwrap();
    assert!(json.contains(r#""width":"auto""#));
}

#[test]
fn test_scene_errors() {
    assert!(matches!(Scene::from_json("not json"), Err(GridError::Json(_))));

    let bad_bounds = r#"{"columns":[{"name":"a","minWidth":50,"maxWidth":10}]}"#;
    assert!(matches!(
        Scene::from_json(bad_bounds).unwrap().build(),
        Err(GridError::InvalidBounds { .. })
    ));

    let bad_container = r#"{"containers":[{"name":"center"}]}"#;
    assert!(matches!(
        Scene::from_json(bad_container),
        Err(GridError::Json(_))
    ));
}

#[test]
fn test_extreme_option_values_clamp() {
    let json = r#"{
        "options": { "virtualizationThreshold": 0, "excessRows": 18446744073709551615 },
        "columns": [
            { "name": "a", "width": 1e300, "maxWidth": 9223372036854775807 },
            { "name": "b", "width": 1e300, "maxWidth": 9223372036854775807 }
        ],
        "containers": [{ "name": "body", "columns": [0, 1], "rowCount": 50 }]
    }"#;
    let snapshot = layout(json).unwrap();
    let body = &snapshot.containers[0];
    assert_eq!(body.rendered_rows, 0..50);
    assert_eq!(body.canvas_width, i64::MAX);
    assert_eq!(snapshot.solution.used_width, i64::MAX);
}
