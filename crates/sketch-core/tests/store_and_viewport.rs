//! Integration tests: entity store and viewport working together, the way
//! the editor uses them (device input → canvas coordinates → store).

use pretty_assertions::assert_eq;
use sketch_core::viewport::{MAX_ZOOM, MIN_ZOOM};
use sketch_core::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn device_points_map_into_stored_shapes() {
    let mut vp = Viewport::new();
    vp.set_origin(pt(40.0, 60.0));
    vp.set_zoom(-50.0); // 50%
    vp.pan(20.0, 0.0); // 40 canvas units

    let start = vp.to_canvas(pt(40.0, 60.0));
    let end = vp.to_canvas(pt(90.0, 110.0));
    assert_eq!(start, pt(-40.0, 0.0));
    assert_eq!(end, pt(60.0, 100.0));

    let mut scene = Scene::new();
    assert!(scene.add_shape(
        ShapeKind::Rectangle,
        start,
        end,
        Color::BLACK,
        Fill::None,
        2.0
    ));
    // Back to device space lands on the original corners.
    assert_eq!(vp.to_device(scene.shapes[0].end), pt(90.0, 110.0));
}

#[test]
fn small_drag_at_high_zoom_is_rejected() {
    // 8 device pixels at 300% is under 3 canvas units.
    let mut vp = Viewport::new();
    vp.set_zoom(1000.0);
    assert_eq!(vp.zoom(), MAX_ZOOM);
    let mut scene = Scene::new();
    assert!(!scene.add_shape(
        ShapeKind::Ellipse,
        vp.to_canvas(pt(0.0, 0.0)),
        vp.to_canvas(pt(8.0, 8.0)),
        Color::BLACK,
        Fill::None,
        2.0
    ));

    // The same drag at 25% is 32 canvas units.
    vp.set_zoom(-1000.0);
    assert_eq!(vp.zoom(), MIN_ZOOM);
    assert!(scene.add_shape(
        ShapeKind::Ellipse,
        vp.to_canvas(pt(0.0, 0.0)),
        vp.to_canvas(pt(8.0, 8.0)),
        Color::BLACK,
        Fill::None,
        2.0
    ));
}

#[test]
fn snapshots_are_independent() {
    let mut scene = Scene::new();
    scene.add_path(vec![pt(0.0, 0.0), pt(1.0, 1.0)], Color::BLACK, 2.0);
    let snapshot = scene.clone();
    scene.clear();
    assert!(scene.is_empty());
    assert_eq!(snapshot.len(), 1);

    // Ids keep counting after a clear.
    scene.add_text("x", pt(0.0, 0.0), Color::BLACK, 12.0);
    assert_ne!(scene.texts[0].id, snapshot.paths[0].id);
}

#[test]
fn style_colors_parse_from_hex() {
    let style = Style {
        stroke: Color::from_hex("#ef4444").unwrap(),
        fill: Fill::parse("none").unwrap(),
        ..Style::default()
    };
    assert_eq!(style.stroke, Color::rgb(0xEF, 0x44, 0x44));
    assert_eq!(style.fill, Fill::None);
    assert_eq!(Fill::parse("#fff"), Some(Fill::Solid(Color::WHITE)));
}
