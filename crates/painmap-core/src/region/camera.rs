//! Locked-view orbit camera for the 3D body.

use super::geometry::{Ray, Vec3};
use crate::model::ViewOrientation;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// The four locked camera views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraView {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl CameraView {
    pub const ALL: [CameraView; 4] = [
        CameraView::Front,
        CameraView::Back,
        CameraView::Left,
        CameraView::Right,
    ];

    /// Unit direction from the target towards the eye.
    fn eye_direction(self) -> Vec3 {
        match self {
            CameraView::Front => Vec3::new(0.0, 0.0, 1.0),
            CameraView::Back => Vec3::new(0.0, 0.0, -1.0),
            CameraView::Left => Vec3::new(-1.0, 0.0, 0.0),
            CameraView::Right => Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

impl From<ViewOrientation> for CameraView {
    fn from(view: ViewOrientation) -> Self {
        match view {
            ViewOrientation::Front => CameraView::Front,
            ViewOrientation::Back => CameraView::Back,
        }
    }
}

/// Perspective camera orbiting a fixed target at a fixed distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrbitCamera {
    pub view: CameraView,
    pub target: Vec3,
    pub distance: f64,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            view: CameraView::Front,
            target: Vec3::ZERO,
            distance: 10.0,
            fov_degrees: 50.0,
        }
    }
}

impl OrbitCamera {
    pub fn new(view: CameraView) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.view.eye_direction() * self.distance
    }

    /// Orthonormal (right, up, forward) basis of the current view.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vec3::UP).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    fn tan_half_fov(&self) -> f64 {
        (self.fov_degrees.to_radians() / 2.0).tan()
    }

    /// Ray through a viewport pixel (origin top-left).
    pub fn screen_ray(&self, screen: Point, viewport: Size) -> Ray {
        let (right, up, forward) = self.basis();
        let aspect = viewport.width / viewport.height;
        let ndc_x = 2.0 * screen.x / viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / viewport.height;
        let tan = self.tan_half_fov();
        let direction = forward + right * (ndc_x * tan * aspect) + up * (ndc_y * tan);
        Ray::new(self.eye(), direction)
    }

    /// Project a world point to viewport pixels and its view depth.
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, world: Vec3, viewport: Size) -> Option<(Point, f64)> {
        let (right, up, forward) = self.basis();
        let rel = world - self.eye();
        let depth = rel.dot(forward);
        if depth <= f64::EPSILON {
            return None;
        }
        let tan = self.tan_half_fov();
        let aspect = viewport.width / viewport.height;
        let ndc_x = rel.dot(right) / (depth * tan * aspect);
        let ndc_y = rel.dot(up) / (depth * tan);
        let x = (ndc_x + 1.0) / 2.0 * viewport.width;
        let y = (1.0 - ndc_y) / 2.0 * viewport.height;
        Some((Point::new(x, y), depth))
    }

    /// Pixels per world unit at a given depth.
    pub fn scale_at(&self, depth: f64, viewport: Size) -> f64 {
        viewport.height / (2.0 * depth * self.tan_half_fov())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(800.0, 600.0);

    #[test]
    fn test_eye_positions() {
        assert_eq!(OrbitCamera::new(CameraView::Front).eye(), Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(OrbitCamera::new(CameraView::Left).eye(), Vec3::new(-10.0, 0.0, 0.0));
    }

    #[test]
    fn test_center_ray_points_at_target() {
        for view in CameraView::ALL {
            let camera = OrbitCamera::new(view);
            let ray = camera.screen_ray(Point::new(400.0, 300.0), VIEWPORT);
            let hit = ray.at(camera.distance);
            assert!(hit.length() < 1e-9, "{view:?}");
        }
    }

    #[test]
    fn test_project_inverts_screen_ray() {
        let camera = OrbitCamera::new(CameraView::Right);
        let world = Vec3::new(0.3, 2.0, -1.0);
        let (screen, depth) = camera.project(world, VIEWPORT).unwrap();
        let ray = camera.screen_ray(screen, VIEWPORT);
        let along = (world - ray.origin).dot(ray.direction);
        let closest = ray.at(along);
        assert!((closest - world).length() < 1e-9);
        assert!(depth > 0.0);
    }

    #[test]
    fn test_front_view_up_is_screen_up() {
        let camera = OrbitCamera::new(CameraView::Front);
        let (high, _) = camera.project(Vec3::new(0.0, 3.0, 0.0), VIEWPORT).unwrap();
        let (low, _) = camera.project(Vec3::new(0.0, -3.0, 0.0), VIEWPORT).unwrap();
        assert!(high.y < low.y);
    }
}
