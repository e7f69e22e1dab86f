//! The entity store.
//!
//! A [`Scene`] owns every committed entity as three append-mostly vectors in
//! creation order. It is also the unit of undo/redo: the editor snapshots
//! the whole scene after each completed mutation.
//!
//! Every mutating operation returns `true` only if the scene actually
//! changed, which is what decides whether a history commit is warranted.
//! Degenerate input (a single-point stroke, a tiny shape, blank text) is
//! rejected silently.
//!
//! ## Stacking order
//!
//! Paths are drawn first (bottom), then shapes, then texts (top). Within a
//! kind, later entities stack above earlier ones.

use crate::color::{Color, Fill};
use crate::model::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shapes must exceed this size (canvas units) on both axes to be kept.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Minimum number of points for a committed stroke.
pub const MIN_PATH_POINTS: usize = 2;

/// Snapshot-able collection of all entities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub paths: Vec<Path>,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextLabel>,
    next_id: u64,
}

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub entity: EntityRef,
    pub id: EntityId,
    pub label: String,
    pub visible: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.shapes.is_empty() && self.texts.is_empty()
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.paths.len() + self.shapes.len() + self.texts.len()
    }

    pub fn contains(&self, r: EntityRef) -> bool {
        match r.kind {
            EntityKind::Path => r.index < self.paths.len(),
            EntityKind::Shape => r.index < self.shapes.len(),
            EntityKind::Text => r.index < self.texts.len(),
        }
    }

    /// Owned copy of the referenced entity.
    pub fn get(&self, r: EntityRef) -> Option<Entity> {
        match r.kind {
            EntityKind::Path => self.paths.get(r.index).cloned().map(Entity::Path),
            EntityKind::Shape => self.shapes.get(r.index).cloned().map(Entity::Shape),
            EntityKind::Text => self.texts.get(r.index).cloned().map(Entity::Text),
        }
    }

    pub fn id_of(&self, r: EntityRef) -> Option<EntityId> {
        match r.kind {
            EntityKind::Path => self.paths.get(r.index).map(|p| p.id),
            EntityKind::Shape => self.shapes.get(r.index).map(|s| s.id),
            EntityKind::Text => self.texts.get(r.index).map(|t| t.id),
        }
    }

    pub fn find(&self, id: EntityId) -> Option<EntityRef> {
        if let Some(i) = self.paths.iter().position(|p| p.id == id) {
            return Some(EntityRef::path(i));
        }
        if let Some(i) = self.shapes.iter().position(|s| s.id == id) {
            return Some(EntityRef::shape(i));
        }
        self.texts.iter().position(|t| t.id == id).map(EntityRef::text)
    }

    pub fn is_visible(&self, r: EntityRef) -> Option<bool> {
        match r.kind {
            EntityKind::Path => self.paths.get(r.index).map(|p| p.visible),
            EntityKind::Shape => self.shapes.get(r.index).map(|s| s.visible),
            EntityKind::Text => self.texts.get(r.index).map(|t| t.visible),
        }
    }

    /// Layer list: all paths, then all shapes, then all texts (each in
    /// creation order), reversed so the most recent entity comes first.
    ///
    /// This order is for display only; it is not the rendering z-order.
    pub fn layers(&self) -> Vec<Layer> {
        let paths = self.paths.iter().enumerate().map(|(i, p)| Layer {
            entity: EntityRef::path(i),
            id: p.id,
            label: format!("Path {}", i + 1),
            visible: p.visible,
        });
        let shapes = self.shapes.iter().enumerate().map(|(i, s)| Layer {
            entity: EntityRef::shape(i),
            id: s.id,
            label: match s.kind {
                ShapeKind::Rectangle => format!("Rectangle {}", i + 1),
                ShapeKind::Ellipse => format!("Ellipse {}", i + 1),
            },
            visible: s.visible,
        });
        let texts = self.texts.iter().enumerate().map(|(i, t)| Layer {
            entity: EntityRef::text(i),
            id: t.id,
            label: format!("Text: {}", t.text),
            visible: t.visible,
        });

        let mut layers: Vec<Layer> = paths.chain(shapes).chain(texts).collect();
        layers.reverse();
        layers
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Commit a freehand stroke. Rejected with fewer than two points.
    pub fn add_path(&mut self, points: Vec<Point>, color: Color, width: f64) -> bool {
        if points.len() < MIN_PATH_POINTS {
            log::trace!("rejecting path with {} point(s)", points.len());
            return false;
        }
        let id = self.allocate_id();
        log::debug!("add path {id}: {} points", points.len());
        self.paths.push(Path {
            id,
            points,
            color,
            width,
            visible: true,
        });
        true
    }

    /// Commit a rectangle or ellipse. Rejected unless the bounding box
    /// exceeds [`MIN_SHAPE_SIZE`] on both axes.
    pub fn add_shape(
        &mut self,
        kind: ShapeKind,
        start: Point,
        end: Point,
        color: Color,
        fill: Fill,
        width: f64,
    ) -> bool {
        let b = Bounds::from_corners(start, end);
        if b.width() <= MIN_SHAPE_SIZE || b.height() <= MIN_SHAPE_SIZE {
            log::trace!(
                "rejecting {} of {}x{}",
                kind.as_str(),
                b.width(),
                b.height()
            );
            return false;
        }
        let id = self.allocate_id();
        log::debug!("add {} {id}: {}x{}", kind.as_str(), b.width(), b.height());
        self.shapes.push(Shape {
            id,
            kind,
            start,
            end,
            color,
            fill,
            width,
            visible: true,
        });
        true
    }

    /// Commit a text label. Blank text is rejected; surrounding whitespace
    /// is trimmed before storing.
    pub fn add_text(&mut self, text: &str, anchor: Point, color: Color, size: f64) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let id = self.allocate_id();
        log::debug!("add text {id}: {text:?}");
        self.texts.push(TextLabel {
            id,
            text: text.to_string(),
            anchor,
            color,
            size,
            visible: true,
        });
        true
    }

    /// Remove everything within `threshold` of `point` (axis-wise): paths
    /// with any point nearby, shapes whose box center is nearby, and texts
    /// whose anchor is nearby. Returns true if anything was removed.
    pub fn erase_at(&mut self, point: Point, threshold: f64) -> bool {
        !self.erase_hits(point, threshold).is_empty()
    }

    /// Like [`Scene::erase_at`], but reports what was removed. Indices
    /// refer to positions *before* the removal.
    pub fn erase_hits(&mut self, point: Point, threshold: f64) -> Vec<EntityRef> {
        let mut removed = Vec::new();

        let mut i = 0;
        self.paths.retain(|p| {
            let hit = p.is_near(point, threshold);
            if hit {
                removed.push(EntityRef::path(i));
            }
            i += 1;
            !hit
        });

        let mut i = 0;
        self.shapes.retain(|s| {
            let hit = s.bounds().center().is_near(point, threshold);
            if hit {
                removed.push(EntityRef::shape(i));
            }
            i += 1;
            !hit
        });

        let mut i = 0;
        self.texts.retain(|t| {
            let hit = t.anchor.is_near(point, threshold);
            if hit {
                removed.push(EntityRef::text(i));
            }
            i += 1;
            !hit
        });

        if !removed.is_empty() {
            log::debug!("erased {} entities at ({}, {})", removed.len(), point.x, point.y);
        }
        removed
    }

    /// Remove one entity. Returns false if the reference is stale.
    pub fn delete(&mut self, r: EntityRef) -> bool {
        if !self.contains(r) {
            return false;
        }
        match r.kind {
            EntityKind::Path => {
                self.paths.remove(r.index);
            }
            EntityKind::Shape => {
                self.shapes.remove(r.index);
            }
            EntityKind::Text => {
                self.texts.remove(r.index);
            }
        }
        log::debug!("deleted {} {}", r.kind.as_str(), r.index);
        true
    }

    /// Remove the selected entity; no-op without a selection.
    pub fn delete_selected(&mut self, selection: Option<EntityRef>) -> bool {
        selection.is_some_and(|r| self.delete(r))
    }

    /// Empty all three collections.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.paths.clear();
        self.shapes.clear();
        self.texts.clear();
        true
    }

    /// Flip an entity's visibility flag. This is a UI toggle: the editor
    /// does not record it in history.
    pub fn toggle_visibility(&mut self, r: EntityRef) -> bool {
        let flag = match r.kind {
            EntityKind::Path => self.paths.get_mut(r.index).map(|p| &mut p.visible),
            EntityKind::Shape => self.shapes.get_mut(r.index).map(|s| &mut s.visible),
            EntityKind::Text => self.texts.get_mut(r.index).map(|t| &mut t.visible),
        };
        match flag {
            Some(v) => {
                *v = !*v;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) -> bool {
        if let Some(p) = self.paths.iter_mut().find(|p| p.id == id) {
            p.visible = visible;
        } else if let Some(s) = self.shapes.iter_mut().find(|s| s.id == id) {
            s.visible = visible;
        } else if let Some(t) = self.texts.iter_mut().find(|t| t.id == id) {
            t.visible = visible;
        } else {
            return false;
        }
        true
    }

    /// Copy visibility flags from `other` onto entities with the same id.
    /// Used to keep visibility UI-local across undo/redo.
    pub fn adopt_visibility(&mut self, other: &Scene) {
        let flags: HashMap<EntityId, bool> = other
            .paths
            .iter()
            .map(|p| (p.id, p.visible))
            .chain(other.shapes.iter().map(|s| (s.id, s.visible)))
            .chain(other.texts.iter().map(|t| (t.id, t.visible)))
            .collect();
        let targets = self
            .paths
            .iter_mut()
            .map(|p| (p.id, &mut p.visible))
            .chain(self.shapes.iter_mut().map(|s| (s.id, &mut s.visible)))
            .chain(self.texts.iter_mut().map(|t| (t.id, &mut t.visible)));
        for (id, visible) in targets {
            if let Some(&flag) = flags.get(&id) {
                *visible = flag;
            }
        }
    }

}
