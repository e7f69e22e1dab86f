//! Viewport transform: device space ↔ canvas space.
//!
//! Rendering applies `scale(zoom / 100)` then `translate(pan)` inside the
//! surface, whose top-left sits at `origin` in device space. The forward
//! and inverse mappings here must stay exact inverses of that transform,
//! otherwise hit-testing and drawing drift under zoom.

use crate::model::Point;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 25.0;
pub const MAX_ZOOM: f64 = 300.0;
pub const DEFAULT_ZOOM: f64 = 100.0;
/// Step used by the +/- zoom buttons and shortcuts.
pub const ZOOM_STEP: f64 = 25.0;

/// Zoom (percent) and pan (canvas units) of the visible canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan: Point,
    /// Device-space position of the surface's top-left corner.
    origin: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Point::ZERO,
            origin: Point::ZERO,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom level in percent, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a scale factor (`1.0` at 100%).
    pub fn scale(&self) -> f64 {
        self.zoom / 100.0
    }

    pub fn pan_offset(&self) -> Point {
        self.pan
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Device → canvas: `(device - origin) / scale - pan`.
    pub fn to_canvas(&self, device: Point) -> Point {
        let s = self.scale();
        Point::new(
            (device.x - self.origin.x) / s - self.pan.x,
            (device.y - self.origin.y) / s - self.pan.y,
        )
    }

    /// Canvas → device: `(canvas + pan) * scale + origin`.
    pub fn to_device(&self, canvas: Point) -> Point {
        let s = self.scale();
        Point::new(
            (canvas.x + self.pan.x) * s + self.origin.x,
            (canvas.y + self.pan.y) * s + self.origin.y,
        )
    }

    /// Adjust zoom by `delta` percentage points, clamped to the allowed
    /// range. Returns true if the zoom changed. Non-finite deltas are
    /// ignored.
    pub fn set_zoom(&mut self, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let next = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(-ZOOM_STEP)
    }

    /// Pan by a device-space delta. The delta is divided by the current
    /// scale so panning tracks the pointer at every zoom level.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let s = self.scale();
        self.pan.x += dx / s;
        self.pan.y += dy / s;
    }

    /// Back to 100% and no pan. The surface origin is kept.
    pub fn reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.pan = Point::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn identity_by_default() {
        let vp = Viewport::new();
        let p = Point::new(12.5, -3.0);
        assert_eq!(vp.to_canvas(p), p);
        assert_eq!(vp.to_device(p), p);
    }

    #[test]
    fn transform_round_trips() {
        let samples = [
            Point::new(0.0, 0.0),
            Point::new(640.0, 360.0),
            Point::new(-17.25, 1033.5),
        ];
        let mut vp = Viewport::new();
        vp.set_origin(Point::new(32.0, 80.0));
        for zoom_delta in [-75.0, -40.0, 0.0, 33.0, 100.0, 200.0] {
            vp.reset();
            vp.set_zoom(zoom_delta);
            vp.pan(123.0, -45.5);
            for p in samples {
                assert!(close(vp.to_device(vp.to_canvas(p)), p), "zoom {}", vp.zoom());
                assert!(close(vp.to_canvas(vp.to_device(p)), p), "zoom {}", vp.zoom());
            }
        }
    }

    #[test]
    fn to_canvas_formula() {
        let mut vp = Viewport::new();
        vp.set_origin(Point::new(10.0, 20.0));
        vp.set_zoom(100.0); // 200%
        vp.pan(40.0, 40.0); // 20 canvas units each way
        let c = vp.to_canvas(Point::new(110.0, 220.0));
        assert_eq!(c, Point::new(30.0, 80.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::new();
        for _ in 0..11 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
        assert!(!vp.zoom_in());

        for _ in 0..20 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert!(!vp.set_zoom(-1.0));

        assert!(vp.set_zoom(1000.0));
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }

    #[test]
    fn non_finite_zoom_delta_is_ignored() {
        let mut vp = Viewport::new();
        assert!(!vp.set_zoom(f64::NAN));
        assert!(!vp.set_zoom(f64::INFINITY));
        assert!(!vp.set_zoom(f64::NEG_INFINITY));
        assert_eq!(vp.zoom(), DEFAULT_ZOOM);
        assert_eq!(vp.to_canvas(Point::new(50.0, 50.0)), Point::new(50.0, 50.0));
    }

    #[test]
    fn pan_is_zoom_compensated() {
        let mut vp = Viewport::new();
        vp.set_zoom(100.0);
        assert_eq!(vp.zoom(), 200.0);
        vp.pan(40.0, 0.0);
        assert_eq!(vp.pan_offset(), Point::new(20.0, 0.0));
    }

    #[test]
    fn reset_keeps_origin() {
        let mut vp = Viewport::new();
        vp.set_origin(Point::new(5.0, 5.0));
        vp.set_zoom(50.0);
        vp.pan(10.0, 10.0);
        vp.reset();
        assert_eq!(vp.zoom(), DEFAULT_ZOOM);
        assert_eq!(vp.pan_offset(), Point::ZERO);
        assert_eq!(vp.origin(), Point::new(5.0, 5.0));
    }
}
