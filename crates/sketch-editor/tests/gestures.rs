//! Integration tests: gestures, viewport and export through the editor.

use pretty_assertions::assert_eq;
use sketch_core::{EntityRef, Point};
use sketch_editor::{
    Editor, EditorConfig, Effect, InputEvent, Modifiers, Surface, ToolKind, Touch, Touches,
};
use sketch_render::ExportOptions;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn make_editor(origin: Point) -> Editor {
    init_logging();
    let mut editor = Editor::new(EditorConfig {
        export: ExportOptions {
            load_system_fonts: false,
            ..ExportOptions::default()
        },
        ..EditorConfig::default()
    });
    editor.attach_surface(Surface {
        origin,
        width: 800.0,
        height: 600.0,
    });
    editor
}

fn touches(points: &[(f64, f64)]) -> Touches {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| Touch::new(i as i32, *x, *y))
        .collect()
}

const CTRL: Modifiers = Modifiers {
    ctrl: true,
    ..Modifiers::NONE
};

// ─── Viewport ───────────────────────────────────────────────────────────

#[test]
fn pan_at_double_zoom() {
    let mut editor = make_editor(Point::ZERO);
    editor.set_zoom(100.0);
    assert_eq!(editor.viewport().zoom(), 200.0);

    editor.set_tool(ToolKind::Pan);
    editor.handle_input(&InputEvent::pointer_down(100.0, 100.0));
    editor.handle_input(&InputEvent::pointer_move(140.0, 100.0));
    editor.handle_input(&InputEvent::pointer_up(140.0, 100.0));
    assert_eq!(editor.viewport().pan_offset(), Point::new(20.0, 0.0));
}

#[test]
fn zoom_shortcuts_clamp() {
    let mut editor = make_editor(Point::ZERO);
    for _ in 0..11 {
        editor.handle_key("=", &CTRL, false);
    }
    assert_eq!(editor.viewport().zoom(), 300.0);
    assert!(editor.zoom_in().is_empty());

    editor.handle_key("0", &CTRL, false);
    assert_eq!(editor.viewport().zoom(), 100.0);
}

#[test]
fn strokes_land_in_canvas_space() {
    let mut editor = make_editor(Point::new(10.0, 20.0));
    editor.set_zoom(100.0);
    editor.handle_input(&InputEvent::pointer_down(10.0, 20.0));
    editor.handle_input(&InputEvent::pointer_move(50.0, 60.0));
    editor.handle_input(&InputEvent::pointer_up(50.0, 60.0));
    assert_eq!(
        editor.scene().paths[0].points,
        vec![Point::new(0.0, 0.0), Point::new(20.0, 20.0)]
    );
}

// ─── Touch ──────────────────────────────────────────────────────────────

#[test]
fn pinch_zoom_clamps_at_minimum() {
    let mut editor = make_editor(Point::ZERO);
    editor.handle_input(&InputEvent::TouchStart {
        touches: touches(&[(0.0, 0.0), (400.0, 0.0)]),
    });
    let effects = editor.handle_input(&InputEvent::TouchMove {
        touches: touches(&[(0.0, 0.0), (300.0, 0.0)]),
    });
    assert_eq!(effects, vec![Effect::Redraw]);
    assert_eq!(editor.viewport().zoom(), 50.0);

    editor.handle_input(&InputEvent::TouchMove {
        touches: touches(&[(0.0, 0.0), (100.0, 0.0)]),
    });
    assert_eq!(editor.viewport().zoom(), 25.0);

    // Already at the floor: no redraw.
    let effects = editor.handle_input(&InputEvent::TouchMove {
        touches: touches(&[(0.0, 0.0), (50.0, 0.0)]),
    });
    assert!(effects.is_empty());
}

#[test]
fn single_finger_draws() {
    let mut editor = make_editor(Point::ZERO);
    editor.handle_input(&InputEvent::TouchStart {
        touches: touches(&[(5.0, 5.0)]),
    });
    editor.handle_input(&InputEvent::TouchMove {
        touches: touches(&[(25.0, 5.0)]),
    });
    assert!(editor.preview().is_some());
    editor.handle_input(&InputEvent::TouchEnd {
        touches: Touches::new(),
    });
    assert_eq!(editor.scene().paths.len(), 1);
    assert!(editor.preview().is_none());
}

#[test]
fn pinch_interrupting_a_stroke_discards_it() {
    let mut editor = make_editor(Point::ZERO);
    editor.handle_input(&InputEvent::TouchStart {
        touches: touches(&[(5.0, 5.0)]),
    });
    editor.handle_input(&InputEvent::TouchMove {
        touches: touches(&[(25.0, 5.0)]),
    });
    editor.handle_input(&InputEvent::TouchStart {
        touches: touches(&[(25.0, 5.0), (125.0, 5.0)]),
    });
    editor.handle_input(&InputEvent::TouchEnd {
        touches: Touches::new(),
    });
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().len(), 1);
}

// ─── Selection & erase ──────────────────────────────────────────────────

#[test]
fn rectangle_and_label_selection() {
    let mut editor = make_editor(Point::ZERO);
    editor.set_stroke_color(sketch_core::Color::from_hex("#ff0000").unwrap());
    editor.set_tool(ToolKind::Rectangle);
    editor.handle_input(&InputEvent::pointer_down(0.0, 0.0));
    editor.handle_input(&InputEvent::pointer_move(100.0, 80.0));
    editor.handle_input(&InputEvent::pointer_up(100.0, 80.0));

    editor.set_tool(ToolKind::Text);
    editor.handle_input(&InputEvent::pointer_down(10.0, 10.0));
    editor.commit_text("Hi");

    editor.set_tool(ToolKind::Select);
    editor.handle_input(&InputEvent::pointer_down(50.0, 40.0));
    assert_eq!(editor.selection(), Some(EntityRef::shape(0)));
    editor.handle_input(&InputEvent::pointer_down(12.0, 8.0));
    assert_eq!(editor.selection(), Some(EntityRef::text(0)));

    let layers = editor.layers();
    assert_eq!(layers[0].label, "Text: Hi");
    assert_eq!(layers[1].label, "Rectangle 1");
}

#[test]
fn eraser_removes_near_strokes_only() {
    let mut editor = make_editor(Point::ZERO);
    for y in [0.0, 100.0] {
        editor.handle_input(&InputEvent::pointer_down(0.0, y));
        editor.handle_input(&InputEvent::pointer_move(10.0, y));
        editor.handle_input(&InputEvent::pointer_up(10.0, y));
    }
    editor.handle_key("e", &Modifiers::NONE, false);
    assert_eq!(editor.tool(), ToolKind::Eraser);
    editor.handle_input(&InputEvent::pointer_down(12.0, 5.0));
    editor.handle_input(&InputEvent::pointer_up(12.0, 5.0));

    assert_eq!(editor.scene().paths.len(), 1);
    assert_eq!(editor.scene().paths[0].points[0], Point::new(0.0, 100.0));
    editor.undo();
    assert_eq!(editor.scene().paths.len(), 2);
}

// ─── Export ─────────────────────────────────────────────────────────────

#[test]
fn export_before_surface_is_none() {
    init_logging();
    let editor = Editor::default();
    assert_eq!(editor.export_raster(), None);
    assert_eq!(editor.export_vector(), None);
}

#[test]
fn export_ignores_pan_and_zoom() {
    let mut editor = make_editor(Point::ZERO);
    editor.handle_input(&InputEvent::pointer_down(0.0, 0.0));
    editor.handle_input(&InputEvent::pointer_move(10.0, 10.0));
    editor.handle_input(&InputEvent::pointer_up(10.0, 10.0));
    let before = editor.export_vector().unwrap().bytes;

    editor.set_zoom(150.0);
    editor.reset_view();
    editor.set_zoom(-50.0);
    assert_eq!(editor.export_vector().unwrap().bytes, before);

    let png = editor.export_raster().unwrap();
    assert_eq!(&png.bytes[16..24], &[0, 0, 7, 128, 0, 0, 4, 56]);
}
