//! Point stream to immutable path.

use super::path::{DrawingPath, StrokeStyle};
use kurbo::Point;

/// Buffers the points of one open stroke.
///
/// The style is captured when the recorder is created and cannot change
/// until the stroke is finished.
#[derive(Debug, Clone)]
pub struct PathRecorder {
    points: Vec<Point>,
    style: StrokeStyle,
}

impl PathRecorder {
    /// Open a stroke at `start`.
    pub fn start(start: Point, style: StrokeStyle) -> Self {
        Self {
            points: vec![start],
            style,
        }
    }

    /// Append a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Points recorded so far.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Style fixed at stroke start.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a recorder starts with one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Finalize into an immutable path.
    pub fn finish(self) -> DrawingPath {
        DrawingPath::from_points(&self.points, &self.style)
    }
}
