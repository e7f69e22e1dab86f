//! Tool system and gesture routing.
//!
//! The [`GestureRouter`] owns the active tool and the state of the gesture
//! in progress. It turns raw [`InputEvent`]s into [`Intent`]s that the
//! editor applies to the scene, history and viewport. The router never
//! touches the scene itself.
//!
//! ## Gestures
//!
//! | Tool | Press | Move | Release |
//! |------|-------|------|---------|
//! | Pen | start stroke | append point | `AddPath` (≥ 2 points) |
//! | Rectangle / Ellipse | anchor corner | drag corner | `AddShape` |
//! | Text | `PromptText` | — | — |
//! | Select | `Select` | — | — |
//! | Pan | grab | `Pan` (device delta) | — |
//! | Eraser | `EraseAt` | `EraseAt` | `EraseEnd` |
//!
//! Two touches switch to pinch-zoom regardless of tool, discarding any
//! single-finger gesture in progress.

use crate::input::{InputEvent, Touch};
use sketch_core::model::{Entity, EntityId, Path, Point, Shape, ShapeKind};
use sketch_core::style::Style;
use sketch_core::viewport::Viewport;

/// Zoom percentage points per device pixel of pinch distance change.
pub const PINCH_ZOOM_FACTOR: f64 = 0.5;

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Rectangle,
    Ellipse,
    Text,
    Select,
    Pan,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Pen,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Text,
        ToolKind::Select,
        ToolKind::Pan,
        ToolKind::Eraser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Text => "text",
            ToolKind::Select => "select",
            ToolKind::Pan => "pan",
            ToolKind::Eraser => "eraser",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            _ => None,
        }
    }
}

/// What the current gesture is doing. Tracking data lives in the variant
/// that needs it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pen stroke in progress; canvas-space points.
    Drawing { points: Vec<Point> },
    /// Rectangle or ellipse being dragged out; canvas-space corners.
    Shaping {
        kind: ShapeKind,
        start: Point,
        end: Point,
    },
    /// Hand tool drag; last device position.
    Panning { last: Point },
    Erasing,
    /// Two-finger zoom; device distance between the touches.
    Pinching { last_distance: f64 },
}

/// A request from the router to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddPath { points: Vec<Point> },
    AddShape {
        kind: ShapeKind,
        start: Point,
        end: Point,
    },
    /// Select whatever is under this canvas point (or clear the selection).
    Select(Point),
    EraseAt(Point),
    /// The eraser gesture finished.
    EraseEnd,
    /// Ask the host for label text to place at `canvas`.
    PromptText { canvas: Point, device: Point },
    /// Pan by a device-space delta.
    Pan { dx: f64, dy: f64 },
    /// Adjust zoom by this many percentage points.
    Zoom(f64),
    /// The gesture preview changed.
    Redraw,
}

/// Routes input to the active tool and tracks the gesture in progress.
#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    tool: ToolKind,
    state: GestureState,
}

impl GestureRouter {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            state: GestureState::Idle,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Switch tools. Any gesture in progress is dropped without a commit.
    /// Returns false if `tool` was already active.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if tool == self.tool {
            return false;
        }
        self.cancel();
        log::debug!("tool {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
        true
    }

    /// Drop the gesture in progress.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Provisional entity for the gesture in progress, styled with `style`.
    pub fn preview(&self, style: &Style) -> Option<Entity> {
        match &self.state {
            GestureState::Drawing { points } => Some(Entity::Path(Path {
                id: EntityId(0),
                points: points.clone(),
                color: style.stroke,
                width: style.width,
                visible: true,
            })),
            GestureState::Shaping { kind, start, end } => Some(Entity::Shape(Shape {
                id: EntityId(0),
                kind: *kind,
                start: *start,
                end: *end,
                color: style.stroke,
                fill: style.fill,
                width: style.width,
                visible: true,
            })),
            _ => None,
        }
    }

    /// Translate one input event into intents.
    pub fn handle(&mut self, event: &InputEvent, viewport: &Viewport) -> Vec<Intent> {
        match event {
            InputEvent::PointerDown { x, y, .. } => self.press(Point::new(*x, *y), viewport),
            InputEvent::PointerMove { x, y, .. } => self.drag(Point::new(*x, *y), viewport),
            InputEvent::PointerUp { .. } => self.release(),
            InputEvent::TouchStart { touches } => match touches.as_slice() {
                [] => vec![],
                [t] => self.press(t.position(), viewport),
                [a, b, ..] => self.begin_pinch(a, b),
            },
            InputEvent::TouchMove { touches } => match touches.as_slice() {
                [] => vec![],
                [t] => self.drag(t.position(), viewport),
                [a, b, ..] => self.pinch(a, b),
            },
            InputEvent::TouchEnd { touches } => {
                if touches.is_empty() {
                    self.release()
                } else {
                    // Gesture state survives until the last finger lifts.
                    vec![]
                }
            }
        }
    }

    fn press(&mut self, device: Point, viewport: &Viewport) -> Vec<Intent> {
        if !self.is_idle() {
            return vec![];
        }
        let canvas = viewport.to_canvas(device);
        log::trace!("{} press at {canvas:?}", self.tool.name());

        match self.tool {
            ToolKind::Pen => {
                self.state = GestureState::Drawing {
                    points: vec![canvas],
                };
                vec![]
            }
            ToolKind::Rectangle | ToolKind::Ellipse => {
                if let Some(kind) = self.tool.shape_kind() {
                    self.state = GestureState::Shaping {
                        kind,
                        start: canvas,
                        end: canvas,
                    };
                }
                vec![]
            }
            ToolKind::Pan => {
                self.state = GestureState::Panning { last: device };
                vec![]
            }
            ToolKind::Text => vec![Intent::PromptText { canvas, device }],
            ToolKind::Select => vec![Intent::Select(canvas)],
            ToolKind::Eraser => {
                self.state = GestureState::Erasing;
                vec![Intent::EraseAt(canvas)]
            }
        }
    }

    fn drag(&mut self, device: Point, viewport: &Viewport) -> Vec<Intent> {
        match &mut self.state {
            GestureState::Drawing { points } => {
                points.push(viewport.to_canvas(device));
                vec![Intent::Redraw]
            }
            GestureState::Shaping { end, .. } => {
                *end = viewport.to_canvas(device);
                vec![Intent::Redraw]
            }
            GestureState::Panning { last } => {
                let (dx, dy) = (device.x - last.x, device.y - last.y);
                *last = device;
                vec![Intent::Pan { dx, dy }]
            }
            GestureState::Erasing => vec![Intent::EraseAt(viewport.to_canvas(device))],
            GestureState::Idle | GestureState::Pinching { .. } => vec![],
        }
    }

    fn release(&mut self) -> Vec<Intent> {
        match std::mem::take(&mut self.state) {
            GestureState::Drawing { points } => {
                let mut out = Vec::with_capacity(2);
                if points.len() >= 2 {
                    out.push(Intent::AddPath { points });
                }
                out.push(Intent::Redraw);
                out
            }
            GestureState::Shaping { kind, start, end } => {
                vec![Intent::AddShape { kind, start, end }, Intent::Redraw]
            }
            GestureState::Erasing => vec![Intent::EraseEnd],
            GestureState::Idle | GestureState::Panning { .. } | GestureState::Pinching { .. } => {
                vec![]
            }
        }
    }

    fn begin_pinch(&mut self, a: &Touch, b: &Touch) -> Vec<Intent> {
        let last_distance = a.position().distance(b.position());
        let previous = std::mem::replace(&mut self.state, GestureState::Pinching { last_distance });
        log::trace!("pinch start at distance {last_distance}");
        match previous {
            // Erasure already happened and must still be committed.
            GestureState::Erasing => vec![Intent::EraseEnd],
            GestureState::Drawing { .. } | GestureState::Shaping { .. } => vec![Intent::Redraw],
            _ => vec![],
        }
    }

    fn pinch(&mut self, a: &Touch, b: &Touch) -> Vec<Intent> {
        let distance = a.position().distance(b.position());
        if let GestureState::Pinching { last_distance } = &mut self.state {
            if !distance.is_finite() {
                return vec![];
            }
            let delta = (distance - *last_distance) * PINCH_ZOOM_FACTOR;
            *last_distance = distance;
            return vec![Intent::Zoom(delta)];
        }
        self.begin_pinch(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Touches;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    fn router(tool: ToolKind) -> GestureRouter {
        GestureRouter::new(tool)
    }

    fn vp() -> Viewport {
        Viewport::new()
    }

    fn touches(points: &[(f64, f64)]) -> Touches {
        points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| Touch::new(i as i32, *x, *y))
            .collect()
    }

    #[test]
    fn tool_names_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("lasso"), None);
    }

    #[test]
    fn pen_draws_and_commits() {
        let mut r = router(ToolKind::Pen);
        let vp = vp();
        assert!(r.handle(&InputEvent::pointer_down(0.0, 0.0), &vp).is_empty());
        assert_eq!(
            r.handle(&InputEvent::pointer_move(10.0, 5.0), &vp),
            vec![Intent::Redraw]
        );
        assert_eq!(
            r.handle(&InputEvent::pointer_up(10.0, 5.0), &vp),
            vec![
                Intent::AddPath {
                    points: vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)]
                },
                Intent::Redraw,
            ]
        );
        assert!(r.is_idle());
    }

    #[test]
    fn pen_click_without_move_commits_nothing() {
        let mut r = router(ToolKind::Pen);
        r.handle(&InputEvent::pointer_down(3.0, 3.0), &vp());
        assert_eq!(
            r.handle(&InputEvent::pointer_up(3.0, 3.0), &vp()),
            vec![Intent::Redraw]
        );
    }

    #[test]
    fn pen_points_are_canvas_space() {
        let mut vp = vp();
        vp.set_zoom(100.0);
        let mut r = router(ToolKind::Pen);
        r.handle(&InputEvent::pointer_down(20.0, 40.0), &vp);
        r.handle(&InputEvent::pointer_move(40.0, 40.0), &vp);
        let intents = r.handle(&InputEvent::pointer_up(40.0, 40.0), &vp);
        assert_eq!(
            intents[0],
            Intent::AddPath {
                points: vec![Point::new(10.0, 20.0), Point::new(20.0, 20.0)]
            }
        );
    }

    #[test]
    fn shape_drag_emits_corners() {
        let mut r = router(ToolKind::Ellipse);
        r.handle(&InputEvent::pointer_down(10.0, 10.0), &vp());
        r.handle(&InputEvent::pointer_move(30.0, 50.0), &vp());
        let preview = r.preview(&Style::default());
        assert!(matches!(preview, Some(Entity::Shape(ref s)) if s.kind == ShapeKind::Ellipse));
        assert_eq!(
            r.handle(&InputEvent::pointer_up(30.0, 50.0), &vp())[0],
            Intent::AddShape {
                kind: ShapeKind::Ellipse,
                start: Point::new(10.0, 10.0),
                end: Point::new(30.0, 50.0),
            }
        );
    }

    #[test]
    fn text_and_select_are_instant() {
        let mut r = router(ToolKind::Text);
        assert_eq!(
            r.handle(&InputEvent::pointer_down(5.0, 6.0), &vp()),
            vec![Intent::PromptText {
                canvas: Point::new(5.0, 6.0),
                device: Point::new(5.0, 6.0),
            }]
        );
        assert!(r.is_idle());

        r.set_tool(ToolKind::Select);
        assert_eq!(
            r.handle(&InputEvent::pointer_down(5.0, 6.0), &vp()),
            vec![Intent::Select(Point::new(5.0, 6.0))]
        );
        assert!(r.handle(&InputEvent::pointer_up(5.0, 6.0), &vp()).is_empty());
    }

    #[test]
    fn pan_emits_device_deltas() {
        let mut r = router(ToolKind::Pan);
        let mut vp = vp();
        vp.set_zoom(100.0);
        r.handle(&InputEvent::pointer_down(100.0, 100.0), &vp);
        assert_eq!(
            r.handle(&InputEvent::pointer_move(140.0, 90.0), &vp),
            vec![Intent::Pan { dx: 40.0, dy: -10.0 }]
        );
        assert_eq!(
            r.handle(&InputEvent::pointer_move(150.0, 90.0), &vp),
            vec![Intent::Pan { dx: 10.0, dy: 0.0 }]
        );
        assert!(r.handle(&InputEvent::pointer_up(150.0, 90.0), &vp).is_empty());
    }

    #[test]
    fn eraser_sweeps_then_ends() {
        let mut r = router(ToolKind::Eraser);
        assert_eq!(
            r.handle(&InputEvent::pointer_down(1.0, 1.0), &vp()),
            vec![Intent::EraseAt(Point::new(1.0, 1.0))]
        );
        assert_eq!(
            r.handle(&InputEvent::pointer_move(2.0, 2.0), &vp()),
            vec![Intent::EraseAt(Point::new(2.0, 2.0))]
        );
        assert_eq!(
            r.handle(&InputEvent::pointer_up(2.0, 2.0), &vp()),
            vec![Intent::EraseEnd]
        );
    }

    #[test]
    fn moves_without_press_do_nothing() {
        let mut r = router(ToolKind::Pen);
        assert!(r.handle(&InputEvent::pointer_move(1.0, 1.0), &vp()).is_empty());
        assert!(r.handle(&InputEvent::pointer_up(1.0, 1.0), &vp()).is_empty());
    }

    #[test]
    fn second_press_is_ignored_mid_gesture() {
        let mut r = router(ToolKind::Rectangle);
        r.handle(&InputEvent::pointer_down(0.0, 0.0), &vp());
        r.handle(&InputEvent::pointer_down(50.0, 50.0), &vp());
        assert_eq!(
            r.state(),
            &GestureState::Shaping {
                kind: ShapeKind::Rectangle,
                start: Point::ZERO,
                end: Point::ZERO,
            }
        );
    }

    #[test]
    fn pinch_zooms_by_half_the_distance_change() {
        let mut r = router(ToolKind::Pen);
        let start = InputEvent::TouchStart {
            touches: touches(&[(0.0, 0.0), (100.0, 0.0)]),
        };
        assert!(r.handle(&start, &vp()).is_empty());
        let spread = InputEvent::TouchMove {
            touches: touches(&[(0.0, 0.0), (140.0, 0.0)]),
        };
        assert_eq!(r.handle(&spread, &vp()), vec![Intent::Zoom(20.0)]);
        let squeeze = InputEvent::TouchMove {
            touches: touches(&[(0.0, 0.0), (120.0, 0.0)]),
        };
        assert_eq!(r.handle(&squeeze, &vp()), vec![Intent::Zoom(-10.0)]);
    }

    #[test]
    fn overflowing_pinch_distance_is_ignored() {
        let mut r = router(ToolKind::Pen);
        r.handle(
            &InputEvent::TouchStart {
                touches: touches(&[(0.0, 0.0), (100.0, 0.0)]),
            },
            &vp(),
        );
        let huge = InputEvent::TouchMove {
            touches: touches(&[(-f64::MAX, 0.0), (f64::MAX, 0.0)]),
        };
        assert!(r.handle(&huge, &vp()).is_empty());

        // The last good distance is kept.
        let spread = InputEvent::TouchMove {
            touches: touches(&[(0.0, 0.0), (140.0, 0.0)]),
        };
        assert_eq!(r.handle(&spread, &vp()), vec![Intent::Zoom(20.0)]);
    }

    #[test]
    fn second_finger_discards_stroke() {
        let mut r = router(ToolKind::Pen);
        r.handle(
            &InputEvent::TouchStart {
                touches: touches(&[(0.0, 0.0)]),
            },
            &vp(),
        );
        r.handle(
            &InputEvent::TouchMove {
                touches: touches(&[(10.0, 10.0)]),
            },
            &vp(),
        );
        assert_eq!(
            r.handle(
                &InputEvent::TouchStart {
                    touches: touches(&[(10.0, 10.0), (60.0, 10.0)]),
                },
                &vp(),
            ),
            vec![Intent::Redraw]
        );

        // One finger lifts: still pinching, and single-finger moves are ignored.
        assert!(
            r.handle(
                &InputEvent::TouchEnd {
                    touches: touches(&[(10.0, 10.0)]),
                },
                &vp(),
            )
            .is_empty()
        );
        assert!(
            r.handle(
                &InputEvent::TouchMove {
                    touches: touches(&[(30.0, 30.0)]),
                },
                &vp(),
            )
            .is_empty()
        );

        // Last finger lifts: no stroke is committed.
        assert!(
            r.handle(
                &InputEvent::TouchEnd {
                    touches: smallvec![],
                },
                &vp(),
            )
            .is_empty()
        );
        assert!(r.is_idle());
    }

    #[test]
    fn pinch_during_erase_still_ends_the_erase() {
        let mut r = router(ToolKind::Eraser);
        r.handle(
            &InputEvent::TouchStart {
                touches: touches(&[(0.0, 0.0)]),
            },
            &vp(),
        );
        assert_eq!(
            r.handle(
                &InputEvent::TouchStart {
                    touches: touches(&[(0.0, 0.0), (10.0, 0.0)]),
                },
                &vp(),
            ),
            vec![Intent::EraseEnd]
        );
    }

    #[test]
    fn switching_tools_cancels_gesture() {
        let mut r = router(ToolKind::Pen);
        r.handle(&InputEvent::pointer_down(0.0, 0.0), &vp());
        r.handle(&InputEvent::pointer_move(5.0, 5.0), &vp());
        assert!(r.preview(&Style::default()).is_some());
        assert!(r.set_tool(ToolKind::Rectangle));
        assert!(r.is_idle());
        assert!(r.preview(&Style::default()).is_none());
        assert!(!r.set_tool(ToolKind::Rectangle));
        assert!(r.handle(&InputEvent::pointer_up(5.0, 5.0), &vp()).is_empty());
    }
}
