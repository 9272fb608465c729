//! Pointer input translation for mouse and touch events.
//!
//! Hosts deliver pointer positions in screen coordinates. The translator
//! subtracts the drawing surface's screen origin, drops positions outside the
//! surface, and maps the rest through the canvas camera into surface space.

use crate::camera::Camera;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Raw pointer position as delivered by the host, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    /// A mouse or pen position.
    Mouse(Point),
    /// All active touch contacts, primary first.
    Touch(Vec<Point>),
}

impl PointerInput {
    /// The primary contact point, if any.
    ///
    /// Secondary touch contacts are never used.
    pub fn primary(&self) -> Option<Point> {
        match self {
            PointerInput::Mouse(position) => Some(*position),
            PointerInput::Touch(contacts) => contacts.first().copied(),
        }
    }
}

/// Maps screen-space pointer input into surface-local coordinates.
#[derive(Debug, Clone)]
pub struct InputTranslator {
    /// Screen position of the surface's top-left corner.
    origin: Point,
    /// On-screen size of the surface.
    size: Size,
}

impl InputTranslator {
    /// Create a translator for a surface at `origin` with the given size.
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Update the surface's screen origin (e.g. after layout changes).
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Update the surface's on-screen size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Screen origin of the surface.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Surface bounds in surface-local screen pixels.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// Translate a screen position into canvas-local pixels (before camera).
    ///
    /// Returns `None` when the position lies outside the surface.
    pub fn to_local(&self, screen: Point) -> Option<Point> {
        let local = Point::new(screen.x - self.origin.x, screen.y - self.origin.y);
        let bounds = self.bounds();
        let inside = local.x >= bounds.x0
            && local.x <= bounds.x1
            && local.y >= bounds.y0
            && local.y <= bounds.y1;
        if inside {
            Some(local)
        } else {
            log::trace!("Pointer at {:?} outside surface, ignored", screen);
            None
        }
    }

    /// Translate pointer input into surface coordinates.
    ///
    /// Uses the primary contact only. Returns `None` for input with no
    /// contacts or outside the surface.
    pub fn to_surface(&self, input: &PointerInput, camera: &Camera) -> Option<Point> {
        let primary = input.primary()?;
        self.to_local(primary).map(|local| camera.to_surface(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    fn translator() -> InputTranslator {
        InputTranslator::new(Point::new(100.0, 50.0), Size::new(600.0, 800.0))
    }

    #[test]
    fn test_mouse_subtracts_origin() {
        let t = translator();
        let p = t
            .to_surface(&PointerInput::Mouse(Point::new(110.0, 60.0)), &Camera::new())
            .unwrap();
        assert_eq!(p, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_touch_uses_primary_contact() {
        let t = translator();
        let input = PointerInput::Touch(vec![Point::new(130.0, 80.0), Point::new(400.0, 400.0)]);
        let p = t.to_surface(&input, &Camera::new()).unwrap();
        assert_eq!(p, Point::new(30.0, 30.0));
    }

    #[test]
    fn test_empty_touch_is_ignored() {
        let t = translator();
        assert!(t.to_surface(&PointerInput::Touch(vec![]), &Camera::new()).is_none());
    }

    #[test]
    fn test_outside_bounds_is_ignored() {
        let t = translator();
        let camera = Camera::new();
        assert!(t.to_surface(&PointerInput::Mouse(Point::new(50.0, 60.0)), &camera).is_none());
        assert!(t.to_surface(&PointerInput::Mouse(Point::new(800.0, 60.0)), &camera).is_none());
        // Edges are inside
        assert!(t.to_surface(&PointerInput::Mouse(Point::new(100.0, 50.0)), &camera).is_some());
    }

    #[test]
    fn test_camera_applied_after_origin() {
        let t = translator();
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        camera.zoom_by(1.0);

        let p = t
            .to_surface(&PointerInput::Mouse(Point::new(210.0, 170.0)), &camera)
            .unwrap();
        // local (110, 120) -> minus pan (100, 100) -> / zoom 2
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_origin_update() {
        let mut t = translator();
        t.set_origin(Point::ZERO);
        let p = t.to_local(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(p, Point::new(5.0, 5.0));
    }
}
