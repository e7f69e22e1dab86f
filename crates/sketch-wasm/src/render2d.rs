//! Canvas2D software renderer.
//!
//! Draws the scene to an HTML `<canvas>` via `CanvasRenderingContext2d`,
//! under the editor's viewport transform. Stacking order matches the
//! exporter: paths, shapes, texts, then the gesture preview and the
//! selection outline.

use sketch_core::model::{Bounds, Entity, EntityRef, Path, Shape, ShapeKind, TextLabel};
use sketch_core::scene::Scene;
use sketch_core::viewport::Viewport;
use sketch_core::{Color, Fill};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const BACKGROUND: &str = "#FFFFFF";
const SELECTION: &str = "#3B82F6";

/// Everything one frame needs.
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub viewport: &'a Viewport,
    pub selection: Option<EntityRef>,
    pub preview: Option<&'a Entity>,
    pub width: f64,
    pub height: f64,
}

/// Render a full frame.
pub fn render_scene(ctx: &CanvasRenderingContext2d, frame: &Frame<'_>) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

    let s = frame.viewport.scale();
    let pan = frame.viewport.pan_offset();
    ctx.save();
    let _ = ctx.scale(s, s);
    let _ = ctx.translate(pan.x, pan.y);

    for path in frame.scene.paths.iter().filter(|p| p.visible) {
        draw_path(ctx, path);
    }
    for shape in frame.scene.shapes.iter().filter(|sh| sh.visible) {
        draw_shape(ctx, shape);
    }
    for label in frame.scene.texts.iter().filter(|t| t.visible) {
        draw_text(ctx, label);
    }

    match frame.preview {
        Some(Entity::Path(p)) => draw_path(ctx, p),
        Some(Entity::Shape(sh)) => draw_shape(ctx, sh),
        Some(Entity::Text(t)) => draw_text(ctx, t),
        None => {}
    }

    if let Some(bounds) = frame
        .selection
        .and_then(|r| frame.scene.get(r))
        .filter(Entity::is_visible)
        .and_then(|e| e.bounds())
    {
        draw_selection(ctx, bounds, s);
    }

    ctx.restore();
}

fn draw_path(ctx: &CanvasRenderingContext2d, path: &Path) {
    let Some((first, rest)) = path.points.split_first() else {
        return;
    };
    ctx.save();
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.set_stroke_style_str(&css_color(path.color));
    ctx.set_line_width(path.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.stroke();
    ctx.restore();
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) {
    let b = shape.bounds();
    ctx.save();
    ctx.begin_path();
    match shape.kind {
        ShapeKind::Rectangle => ctx.rect(b.min.x, b.min.y, b.width(), b.height()),
        ShapeKind::Ellipse => {
            let c = b.center();
            let _ = ctx.ellipse(
                c.x,
                c.y,
                b.width() / 2.0,
                b.height() / 2.0,
                0.0,
                0.0,
                std::f64::consts::TAU,
            );
        }
    }
    if let Fill::Solid(color) = shape.fill {
        ctx.set_fill_style_str(&css_color(color));
        ctx.fill();
    }
    ctx.set_stroke_style_str(&css_color(shape.color));
    ctx.set_line_width(shape.width);
    ctx.stroke();
    ctx.restore();
}

fn draw_text(ctx: &CanvasRenderingContext2d, label: &TextLabel) {
    ctx.save();
    ctx.set_font(&font_spec(label.size));
    ctx.set_fill_style_str(&css_color(label.color));
    ctx.set_text_baseline("alphabetic");
    let _ = ctx.fill_text(&label.text, label.anchor.x, label.anchor.y);
    ctx.restore();
}

fn draw_selection(ctx: &CanvasRenderingContext2d, bounds: Bounds, scale: f64) {
    // Constant on-screen size regardless of zoom.
    let b = bounds.inflate(4.0 / scale);
    let dash = JsValue::from(js_sys::Array::of2(
        &JsValue::from_f64(4.0 / scale),
        &JsValue::from_f64(4.0 / scale),
    ));
    ctx.save();
    let _ = ctx.set_line_dash(&dash);
    ctx.set_stroke_style_str(SELECTION);
    ctx.set_line_width(1.0 / scale);
    ctx.stroke_rect(b.min.x, b.min.y, b.width(), b.height());
    ctx.restore();
}

/// CSS color string; 8-digit hex carries alpha.
pub fn css_color(color: Color) -> String {
    color.to_hex()
}

pub fn font_spec(size: f64) -> String {
    format!("{size}px sans-serif")
}
