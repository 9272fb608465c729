//! Drawing surface abstraction.

use super::DrawingData;
use super::path::StrokeStyle;
use kurbo::{Affine, Point, Size};

/// An in-progress stroke, painted before it is committed.
#[derive(Debug, Clone, Copy)]
pub struct LiveStroke<'a> {
    /// Points recorded so far, in surface coordinates.
    pub points: &'a [Point],
    /// Style fixed at stroke start.
    pub style: &'a StrokeStyle,
}

/// Trait for pixel surfaces a drawing session paints on.
///
/// Implementations composite paths in order (normal blend for draw strokes,
/// destructive blend for erase strokes) and draw annotations above them.
/// `view` maps surface coordinates to surface pixels (the canvas camera).
pub trait DrawingSurface {
    /// Pixel size of the surface.
    fn size(&self) -> Size;

    /// Repaint everything from committed data.
    fn redraw(&mut self, data: &DrawingData, view: Affine);

    /// Show committed data plus the open stroke. Called on every pointer move.
    fn paint_live_stroke(&mut self, stroke: LiveStroke<'_>, view: Affine);
}
