//! Pan and zoom of the drawing canvas.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Zoom increment of the zoom-in and zoom-out controls.
pub const ZOOM_STEP: f64 = 0.1;

/// Allowed zoom factors.
pub const ZOOM_RANGE: RangeInclusive<f64> = 0.5..=3.0;

/// View of the canvas over the recorded drawing.
///
/// Strokes are recorded in surface coordinates. The canvas shows them
/// offset by `offset` and scaled by `zoom`. Moving the view never touches
/// recorded paths or history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan in canvas pixels.
    pub offset: Vec2,
    /// Scale factor, 1.0 is unzoomed.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface to canvas mapping used when painting.
    pub fn view(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Map a canvas point back to the surface: `(canvas - offset) / zoom`.
    pub fn to_surface(&self, canvas: Point) -> Point {
        ((canvas.to_vec2() - self.offset) / self.zoom).to_point()
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Step the zoom, clamped to [`ZOOM_RANGE`]. Returns whether it moved.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        let zoom = (self.zoom + delta).clamp(*ZOOM_RANGE.start(), *ZOOM_RANGE.end());
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Zoom shown in the toolbar, in whole percent.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_unmoved_view_is_identity() {
        let camera = Camera::new();
        let p = Point::new(12.0, 34.0);
        assert_eq!(camera.view(), Affine::IDENTITY);
        assert_eq!(camera.to_surface(p), p);
    }

    #[test]
    fn test_to_surface_inverts_view() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(40.0, -10.0));
        camera.zoom_by(0.5);

        let surface = Point::new(100.0, 50.0);
        assert_near(camera.to_surface(camera.view() * surface), surface);
    }

    #[test]
    fn test_canvas_point_unpans_then_unzooms() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(20.0, 30.0));
        camera.zoom_by(1.0);
        assert_near(camera.to_surface(Point::new(120.0, 230.0)), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_zoom_stays_in_range() {
        let mut camera = Camera::new();
        for _ in 0..50 {
            camera.zoom_by(ZOOM_STEP);
        }
        assert!((camera.zoom - 3.0).abs() < 1e-9);
        assert!(!camera.zoom_by(ZOOM_STEP));
        assert_eq!(camera.zoom_percent(), 300);

        for _ in 0..50 {
            camera.zoom_by(-ZOOM_STEP);
        }
        assert!((camera.zoom - 0.5).abs() < 1e-9);
        assert_eq!(camera.zoom_percent(), 50);
    }

    #[test]
    fn test_reset_restores_unmoved_view() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(5.0, 5.0));
        camera.zoom_by(1.0);
        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
