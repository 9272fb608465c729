//! CPU raster implementation of the drawing surface.

use crate::compositor::{draw_annotations, draw_paths, draw_stroke, new_pixmap};
use crate::error::RenderResult;
use kurbo::{Affine, Size};
use painmap_core::drawing::{DrawingData, DrawingSurface, LiveStroke};
use peniko::Color;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// A drawing surface backed by tiny-skia pixmaps.
///
/// Paths are composited on their own layer so erase strokes only remove
/// stroke pixels; the visible frame is the background, then the path layer,
/// then annotations.
pub struct RasterSurface {
    size: Size,
    background: Option<Color>,
    /// Committed paths only, at the last view.
    paths: Pixmap,
    /// What is currently shown.
    frame: Pixmap,
    committed: DrawingData,
    view: Affine,
}

impl RasterSurface {
    /// Create a transparent surface of the given pixel size.
    pub fn new(size: Size) -> RenderResult<Self> {
        Ok(Self {
            size,
            background: None,
            paths: new_pixmap(size)?,
            frame: new_pixmap(size)?,
            committed: DrawingData::default(),
            view: Affine::IDENTITY,
        })
    }

    /// Fill the frame with a solid color under the drawing.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// The visible frame.
    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    /// The path layer without background or annotations.
    pub fn path_layer(&self) -> &Pixmap {
        &self.paths
    }

    /// Data of the last full redraw.
    pub fn committed(&self) -> &DrawingData {
        &self.committed
    }

    /// Alpha of a frame pixel, 0 outside the surface.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.frame.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    /// Alpha of a path-layer pixel, 0 outside the surface.
    pub fn path_alpha_at(&self, x: u32, y: u32) -> u8 {
        self.paths.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    /// Rebuild the frame from a path layer plus the committed annotations.
    fn compose(&mut self, layer: &Pixmap) {
        match self.background {
            Some(color) => {
                let rgba = color.to_rgba8();
                self.frame
                    .fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a));
            }
            None => self.frame.fill(tiny_skia::Color::TRANSPARENT),
        }
        self.frame
            .draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
        draw_annotations(&mut self.frame, &self.committed.annotations, self.view);
    }
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn redraw(&mut self, data: &DrawingData, view: Affine) {
        self.committed = data.clone();
        self.view = view;
        self.paths.fill(tiny_skia::Color::TRANSPARENT);
        draw_paths(&mut self.paths, &data.paths, view);
        let layer = self.paths.clone();
        self.compose(&layer);
        log::trace!(
            "Surface redrawn: {} paths, {} annotations",
            data.paths.len(),
            data.annotations.len()
        );
    }

    fn paint_live_stroke(&mut self, stroke: LiveStroke<'_>, view: Affine) {
        if view != self.view {
            let committed = std::mem::take(&mut self.committed);
            self.redraw(&committed, view);
        }
        let mut layer = self.paths.clone();
        draw_stroke(&mut layer, stroke.points, stroke.style, view);
        self.compose(&layer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use painmap_core::drawing::{BrushSettings, CanvasDrawingSession, SessionConfig};

    fn session() -> CanvasDrawingSession<RasterSurface> {
        let config = SessionConfig::default();
        let surface = RasterSurface::new(config.surface_size).unwrap();
        CanvasDrawingSession::mount(Some(surface), None, &config).unwrap()
    }

    fn stroke(session: &mut CanvasDrawingSession<RasterSurface>, points: &[Point], settings: &BrushSettings) {
        session.begin_stroke(points[0], settings);
        for point in &points[1..] {
            session.continue_stroke(*point);
        }
        session.end_stroke();
    }

    #[test]
    fn test_burning_stroke_undo_redo_on_pixels() {
        let mut session = session();
        let burning = BrushSettings::draw("burning");
        stroke(
            &mut session,
            &[Point::new(10.0, 10.0), Point::new(20.0, 20.0), Point::new(30.0, 10.0)],
            &burning,
        );
        let path = &session.paths()[0];
        assert_eq!(path.color(), "#ef4444");
        assert_eq!(path.opacity(), 0.7);
        assert_eq!(path.points().len(), 3);
        assert!(session.surface().alpha_at(20, 19) > 0);

        session.undo();
        assert_eq!(session.surface().alpha_at(20, 19), 0);

        session.redo();
        assert!(session.surface().alpha_at(20, 19) > 0);
    }

    #[test]
    fn test_live_stroke_shown_before_commit() {
        let mut session = session();
        session.begin_stroke(Point::new(100.0, 100.0), &BrushSettings::draw("aching"));
        session.continue_stroke(Point::new(150.0, 100.0));
        assert!(session.surface().alpha_at(125, 100) > 0);
        assert!(session.surface().committed().paths.is_empty());

        session.cancel_stroke();
        assert_eq!(session.surface().alpha_at(125, 100), 0);
    }

    #[test]
    fn test_erase_stroke_clears_painted_area() {
        let mut session = session();
        let line = [Point::new(100.0, 100.0), Point::new(200.0, 100.0)];
        stroke(&mut session, &line, &BrushSettings::draw("sharp").with_opacity(1.0));
        assert_eq!(session.surface().path_alpha_at(150, 100), 255);

        let eraser = BrushSettings::erase().with_brush_size(40.0);
        stroke(&mut session, &[Point::new(140.0, 100.0), Point::new(160.0, 100.0)], &eraser);
        assert_eq!(session.surface().path_alpha_at(150, 100), 0);
        assert_eq!(session.surface().alpha_at(150, 100), 0);
        assert_eq!(session.surface().path_alpha_at(105, 100), 255);
        assert_eq!(session.paths().len(), 2);
        assert!(session.paths()[1].is_erase());
    }

    #[test]
    fn test_background_shows_through_erased_area() {
        let config = SessionConfig::default();
        let surface = RasterSurface::new(config.surface_size)
            .unwrap()
            .with_background(Color::from_rgba8(255, 255, 255, 255));
        let mut session = CanvasDrawingSession::mount(Some(surface), None, &config).unwrap();
        let line = [Point::new(100.0, 100.0), Point::new(200.0, 100.0)];
        stroke(&mut session, &line, &BrushSettings::draw("burning").with_opacity(1.0));
        stroke(&mut session, &line, &BrushSettings::erase().with_brush_size(40.0));

        let pixel = session.surface().frame().pixel(150, 100).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn test_zoom_redraws_with_view() {
        let mut session = session();
        stroke(&mut session, &[Point::new(10.0, 10.0)], &BrushSettings::draw("burning"));
        assert!(session.surface().alpha_at(10, 10) > 0);
        session.zoom_by(1.0);
        let zoomed = session.camera().view() * Point::new(10.0, 10.0);
        assert!(session.surface().alpha_at(zoomed.x as u32, zoomed.y as u32) > 0);
    }

    #[test]
    fn test_zero_sized_surface_is_an_error() {
        assert!(RasterSurface::new(Size::new(0.0, 0.0)).is_err());
    }
}
