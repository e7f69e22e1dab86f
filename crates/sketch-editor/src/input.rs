//! Input abstraction layer.
//!
//! Normalizes mouse and multi-touch events into a unified `InputEvent`
//! consumed by the gesture router. All coordinates are device space
//! (client pixels); the router maps them to canvas space.

use smallvec::SmallVec;
use sketch_core::Point;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// One active touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

impl Touch {
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Active touches. Two inline slots cover single-finger and pinch.
pub type Touches = SmallVec<[Touch; 2]>;

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed.
    PointerDown { x: f64, y: f64, modifiers: Modifiers },
    /// Mouse moved (pressed or not).
    PointerMove { x: f64, y: f64, modifiers: Modifiers },
    /// Mouse button released.
    PointerUp { x: f64, y: f64, modifiers: Modifiers },
    /// A finger touched down. `touches` lists every active touch.
    TouchStart { touches: Touches },
    /// One or more fingers moved. `touches` lists every active touch.
    TouchMove { touches: Touches },
    /// A finger lifted. `touches` lists the touches still active.
    TouchEnd { touches: Touches },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Build touch events from flat `[id, x, y, id, x, y, ...]` triples, as
    /// passed across the wasm boundary. A trailing partial triple is dropped.
    pub fn touches_from_flat(flat: &[f64]) -> Touches {
        flat.chunks_exact(3)
            .map(|c| Touch::new(c[0] as i32, c[1], c[2]))
            .collect()
    }

    /// Device position for mouse events.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}
