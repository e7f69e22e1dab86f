//! Entity data model for sketch scenes.
//!
//! A scene holds three kinds of entities: freehand [`Path`]s, geometric
//! [`Shape`]s (rectangle / ellipse) and [`TextLabel`]s. All coordinates are
//! in canvas (model) space, independent of the current pan/zoom.
//!
//! Entities are addressed either by position ([`EntityRef`], used for
//! selection and the layer list) or by their scene-unique [`EntityId`].

use crate::color::{Color, Fill};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point in canvas space (or device space, for raw input).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Axis-wise proximity: both `|dx|` and `|dy|` are strictly below
    /// `threshold`. The region is a square, not a circle.
    pub fn is_near(self, other: Point, threshold: f64) -> bool {
        (self.x - other.x).abs() < threshold && (self.y - other.y).abs() < threshold
    }
}

/// Axis-aligned bounding box, normalized so `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Box spanned by two opposite corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box containing all points. `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::from_corners(*first, *first), |b, p| {
            Self::from_corners(
                Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            )
        }))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow the box by `pad` on every side.
    pub fn inflate(&self, pad: f64) -> Self {
        Self {
            min: Point::new(self.min.x - pad, self.min.y - pad),
            max: Point::new(self.max.x + pad, self.max.y + pad),
        }
    }
}

// ─── Identity ────────────────────────────────────────────────────────────

/// Scene-unique entity identifier, assigned on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which collection of the scene an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Path,
    Shape,
    Text,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Path => "path",
            EntityKind::Shape => "shape",
            EntityKind::Text => "text",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "path" => Some(EntityKind::Path),
            "shape" => Some(EntityKind::Shape),
            "text" => Some(EntityKind::Text),
            _ => None,
        }
    }
}

/// Positional reference into the scene: `{kind, index}`.
///
/// `Option<EntityRef>` is the editor's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub index: usize,
}

impl EntityRef {
    pub const fn new(kind: EntityKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub const fn path(index: usize) -> Self {
        Self::new(EntityKind::Path, index)
    }

    pub const fn shape(index: usize) -> Self {
        Self::new(EntityKind::Shape, index)
    }

    pub const fn text(index: usize) -> Self {
        Self::new(EntityKind::Text, index)
    }
}

// ─── Entities ────────────────────────────────────────────────────────────

/// One freehand pen stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: EntityId,
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f64,
    pub visible: bool,
}

impl Path {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// True if any point of the stroke lies within `threshold` (axis-wise).
    pub fn is_near(&self, p: Point, threshold: f64) -> bool {
        self.points.iter().any(|pt| pt.is_near(p, threshold))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
        }
    }
}

/// Rectangle or ellipse inscribed in the box spanned by `start` and `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: EntityId,
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub color: Color,
    pub fill: Fill,
    pub width: f64,
    pub visible: bool,
}

impl Shape {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.start, self.end)
    }
}

/// A single-line text label. `anchor` is the baseline-left point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub id: EntityId,
    pub text: String,
    pub anchor: Point,
    pub color: Color,
    pub size: f64,
    pub visible: bool,
}

/// Horizontal advance per character, as a fraction of the font size.
pub const TEXT_ADVANCE_FACTOR: f64 = 0.6;

impl TextLabel {
    /// Approximate box covered by the glyphs: it extends right of the
    /// anchor by `chars * size * 0.6` and up from the baseline by `size`.
    pub fn bounds(&self) -> Bounds {
        let w = self.text.chars().count() as f64 * self.size * TEXT_ADVANCE_FACTOR;
        Bounds::from_corners(
            Point::new(self.anchor.x, self.anchor.y - self.size),
            Point::new(self.anchor.x + w, self.anchor.y),
        )
    }
}

/// Owned entity of any kind. Used for the in-progress gesture preview and
/// for kind-agnostic lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Path(Path),
    Shape(Shape),
    Text(TextLabel),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Path(_) => EntityKind::Path,
            Entity::Shape(_) => EntityKind::Shape,
            Entity::Text(_) => EntityKind::Text,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Entity::Path(p) => p.id,
            Entity::Shape(s) => s.id,
            Entity::Text(t) => t.id,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Entity::Path(p) => p.visible,
            Entity::Shape(s) => s.visible,
            Entity::Text(t) => t.visible,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Entity::Path(p) => p.bounds(),
            Entity::Shape(s) => Some(s.bounds()),
            Entity::Text(t) => Some(t.bounds()),
        }
    }
}
