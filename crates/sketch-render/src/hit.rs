//! Hit testing: canvas point → topmost entity.
//!
//! Walks the scene in visual stacking order, top to bottom: texts
//! (newest first), then shapes, then paths. Hidden entities never hit.

use sketch_core::model::{Bounds, EntityRef, Path, Point, Shape, TextLabel};
use sketch_core::scene::Scene;

/// Proximity (canvas units, axis-wise) for hitting a freehand stroke.
pub const PATH_HIT_TOLERANCE: f64 = 15.0;

/// Find the topmost visible entity at `point`, if any.
pub fn hit_test(scene: &Scene, point: Point) -> Option<EntityRef> {
    if let Some(i) = topmost(&scene.texts, |t| t.visible && text_hit(t, point)) {
        return Some(EntityRef::text(i));
    }
    if let Some(i) = topmost(&scene.shapes, |s| s.visible && shape_hit(s, point)) {
        return Some(EntityRef::shape(i));
    }
    topmost(&scene.paths, |p| p.visible && path_hit(p, point)).map(EntityRef::path)
}

/// Index of the last (newest) element matching `pred`.
fn topmost<T>(items: &[T], pred: impl Fn(&T) -> bool) -> Option<usize> {
    items.iter().rposition(pred)
}

/// Approximate glyph box of a label; also used for selection outlines.
pub fn text_bounds(label: &TextLabel) -> Bounds {
    label.bounds()
}

fn text_hit(label: &TextLabel, p: Point) -> bool {
    text_bounds(label).contains(p)
}

/// Anywhere inside the bounding box counts, regardless of fill.
fn shape_hit(shape: &Shape, p: Point) -> bool {
    shape.bounds().contains(p)
}

fn path_hit(path: &Path, p: Point) -> bool {
    path.is_near(p, PATH_HIT_TOLERANCE)
}
