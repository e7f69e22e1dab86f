//! Scene → Vello drawing commands.
//!
//! Emits fills and strokes for every visible entity in stacking order
//! (paths, shapes, texts), under the viewport transform. The in-progress
//! gesture preview and the selection outline are painted on top.

use kurbo::{Affine, BezPath, Cap, Ellipse as KurboEllipse, Join, Rect, Stroke as KurboStroke};
use peniko::{Color as PenikoColor, Fill as FillRule};
use sketch_core::model::{Bounds, Entity, EntityRef, Path, Shape, ShapeKind, TextLabel};
use sketch_core::scene::Scene;
use sketch_core::viewport::Viewport;
use sketch_core::{Color, Fill};
use vello::Scene as VelloScene;

const SELECTION_COLOR: Color = Color::rgb(0x3B, 0x82, 0xF6);
/// Screen-space padding around the selection outline.
const SELECTION_PAD_PX: f64 = 4.0;

/// Canvas → surface transform: scale, then translate by the pan offset.
pub fn view_transform(viewport: &Viewport) -> Affine {
    let pan = viewport.pan_offset();
    Affine::scale(viewport.scale()) * Affine::translate((pan.x, pan.y))
}

/// Paint the whole scene. Returns the number of entities painted.
///
/// Call once per frame with a freshly-reset `vello::Scene`.
pub fn paint_scene(
    out: &mut VelloScene,
    scene: &Scene,
    viewport: &Viewport,
    selection: Option<EntityRef>,
) -> usize {
    let xf = view_transform(viewport);
    let mut painted = 0;

    for path in scene.paths.iter().filter(|p| p.visible) {
        painted += usize::from(paint_path(out, xf, path));
    }
    for shape in scene.shapes.iter().filter(|s| s.visible) {
        paint_shape(out, xf, shape);
        painted += 1;
    }
    for label in scene.texts.iter().filter(|t| t.visible) {
        paint_text(label);
        painted += 1;
    }

    if let Some(bounds) = selection
        .and_then(|r| scene.get(r))
        .filter(Entity::is_visible)
        .and_then(|e| e.bounds())
    {
        paint_selection(out, xf, viewport.scale(), bounds);
    }

    painted
}

/// Paint the provisional entity of the gesture in progress.
pub fn paint_preview(out: &mut VelloScene, preview: &Entity, viewport: &Viewport) {
    let xf = view_transform(viewport);
    match preview {
        Entity::Path(p) => {
            paint_path(out, xf, p);
        }
        Entity::Shape(s) => paint_shape(out, xf, s),
        Entity::Text(t) => paint_text(t),
    }
}

// ─── Entity painters ─────────────────────────────────────────────────────

fn paint_path(out: &mut VelloScene, xf: Affine, path: &Path) -> bool {
    let Some((first, rest)) = path.points.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    let mut bez = BezPath::new();
    bez.move_to((first.x, first.y));
    for p in rest {
        bez.line_to((p.x, p.y));
    }
    let stroke = KurboStroke {
        width: path.width,
        join: Join::Round,
        start_cap: Cap::Round,
        end_cap: Cap::Round,
        ..Default::default()
    };
    out.stroke(&stroke, xf, to_peniko(path.color), None, &bez);
    true
}

fn paint_shape(out: &mut VelloScene, xf: Affine, shape: &Shape) {
    let b = shape.bounds();
    let rect = Rect::new(b.min.x, b.min.y, b.max.x, b.max.y);
    let stroke = KurboStroke {
        width: shape.width,
        join: Join::Miter,
        ..Default::default()
    };
    let fill = match shape.fill {
        Fill::None => None,
        Fill::Solid(c) => Some(to_peniko(c)),
    };

    match shape.kind {
        ShapeKind::Rectangle => {
            if let Some(color) = fill {
                out.fill(FillRule::NonZero, xf, color, None, &rect);
            }
            out.stroke(&stroke, xf, to_peniko(shape.color), None, &rect);
        }
        ShapeKind::Ellipse => {
            let ellipse = KurboEllipse::from_rect(rect);
            if let Some(color) = fill {
                out.fill(FillRule::NonZero, xf, color, None, &ellipse);
            }
            out.stroke(&stroke, xf, to_peniko(shape.color), None, &ellipse);
        }
    }
}

fn paint_text(label: &TextLabel) {
    // Glyph runs need a font context; the Canvas2D renderer in the wasm
    // bridge draws labels directly.
    log::trace!(
        "TEXT {} {:?} at ({}, {})",
        label.id,
        label.text,
        label.anchor.x,
        label.anchor.y
    );
}

fn paint_selection(out: &mut VelloScene, xf: Affine, scale: f64, bounds: Bounds) {
    let b = bounds.inflate(SELECTION_PAD_PX / scale);
    let rect = Rect::new(b.min.x, b.min.y, b.max.x, b.max.y);
    let dash = 4.0 / scale;
    let stroke = KurboStroke::new(1.0 / scale).with_dashes(0.0, [dash, dash]);
    out.stroke(&stroke, xf, to_peniko(SELECTION_COLOR), None, &rect);
}

fn to_peniko(c: Color) -> PenikoColor {
    PenikoColor::from_rgba8(c.r, c.g, c.b, c.a)
}
