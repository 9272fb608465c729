//! Paths and annotations to pixels with tiny-skia.
//!
//! Strokes are composited in order: draw strokes blend source-over with their
//! color and opacity, erase strokes use destination-out and remove whatever
//! is under them. Annotations are drawn after all paths, so erasing never
//! removes an annotation.

use crate::error::{RenderError, RenderResult};
use kurbo::{Affine, BezPath, PathEl, Point, Size};
use painmap_core::annotation::{Annotation, AnnotationKind, SymbolType};
use painmap_core::color::parse_hex_or_neutral;
use painmap_core::drawing::{CompositeOp, DrawingData, DrawingPath, StrokeStyle, polyline};
use painmap_core::quality::{DEFAULT_QUALITY_ID, quality_color};
use peniko::Color;
use std::f64::consts::{FRAC_PI_2, PI};
use tiny_skia::{BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Arrow shaft width.
pub const ARROW_WIDTH: f32 = 3.0;
/// Arrow head length along the shaft.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;
/// Half-angle between the shaft and each head edge.
const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Approximate advance of one label character at the 14px label size.
const LABEL_CHAR_WIDTH: f64 = 7.0;
const LABEL_HEIGHT: f64 = 14.0;

/// Allocate a transparent pixmap covering `size`.
pub fn new_pixmap(size: Size) -> RenderResult<Pixmap> {
    let allocation_error = || RenderError::SurfaceAllocation {
        width: size.width,
        height: size.height,
    };
    if !(size.width.is_finite() && size.height.is_finite()) || size.width < 1.0 || size.height < 1.0 {
        return Err(allocation_error());
    }
    Pixmap::new(size.width.ceil() as u32, size.height.ceil() as u32).ok_or_else(allocation_error)
}

/// Convert a kurbo affine into a tiny-skia transform.
pub fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a kurbo path into a tiny-skia path.
///
/// Returns `None` for paths without any drawable segment.
pub fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Solid paint for a color scaled by `opacity`.
fn solid_paint(color: Color, opacity: f64) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let alpha = (f64::from(rgba.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, alpha);
    paint.anti_alias = true;
    paint
}

/// Paint for a stroke style, including its blend rule.
fn stroke_paint(style: &StrokeStyle) -> Paint<'static> {
    match style.op {
        CompositeOp::Draw => solid_paint(parse_hex_or_neutral(&style.color), style.opacity),
        CompositeOp::Erase => {
            let mut paint = solid_paint(Color::from_rgba8(0, 0, 0, 255), 1.0);
            paint.blend_mode = BlendMode::DestinationOut;
            paint
        }
    }
}

fn round_stroke(width: f64) -> Stroke {
    Stroke {
        width: width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Composite one stroke given by its points.
///
/// A stroke whose points all coincide is painted as a dot of the brush
/// diameter.
pub fn draw_stroke(pixmap: &mut Pixmap, points: &[Point], style: &StrokeStyle, view: Affine) {
    let Some(first) = points.first() else {
        return;
    };
    let paint = stroke_paint(style);
    let transform = to_transform(view);

    if points.iter().all(|p| p == first) {
        let radius = (style.brush_size / 2.0).max(0.5) as f32;
        if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, radius) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
        }
        return;
    }

    if let Some(path) = to_skia_path(&polyline(points)) {
        pixmap.stroke_path(&path, &paint, &round_stroke(style.brush_size), transform, None);
    }
}

/// Composite one committed path.
pub fn draw_path(pixmap: &mut Pixmap, path: &DrawingPath, view: Affine) {
    draw_stroke(pixmap, &path.points(), &path.style(), view);
}

/// Composite committed paths in order.
pub fn draw_paths(pixmap: &mut Pixmap, paths: &[DrawingPath], view: Affine) {
    for path in paths {
        draw_path(pixmap, path, view);
    }
}

/// Color of an annotation, falling back to the default quality's color.
fn annotation_color(annotation: &Annotation) -> Color {
    match annotation.color.as_deref() {
        Some(hex) => parse_hex_or_neutral(hex),
        None => quality_color(DEFAULT_QUALITY_ID),
    }
}

/// Draw one annotation. Arrows without an end point and empty text are skipped.
pub fn draw_annotation(pixmap: &mut Pixmap, annotation: &Annotation, view: Affine) {
    let transform = to_transform(view);
    match annotation.kind {
        AnnotationKind::Arrow => {
            let Some(end) = annotation.end() else {
                log::trace!("Arrow without end point not drawn");
                return;
            };
            draw_arrow(pixmap, annotation.anchor(), end, annotation_color(annotation), transform);
        }
        AnnotationKind::Symbol => draw_symbol(
            pixmap,
            annotation.anchor(),
            annotation.symbol_or_default(),
            annotation_color(annotation),
            transform,
        ),
        AnnotationKind::Text => match annotation.content.as_deref() {
            Some(content) if !content.is_empty() => draw_label(pixmap, annotation.anchor(), content, transform),
            _ => log::trace!("Empty text annotation not drawn"),
        },
    }
}

/// Draw annotations in order.
pub fn draw_annotations(pixmap: &mut Pixmap, annotations: &[Annotation], view: Affine) {
    for annotation in annotations {
        draw_annotation(pixmap, annotation, view);
    }
}

/// Draw a complete snapshot: paths first, annotations on top.
pub fn draw_snapshot(pixmap: &mut Pixmap, data: &DrawingData, view: Affine) {
    draw_paths(pixmap, &data.paths, view);
    draw_annotations(pixmap, &data.annotations, view);
}

fn draw_arrow(pixmap: &mut Pixmap, start: Point, end: Point, color: Color, transform: Transform) {
    let paint = solid_paint(color, 1.0);

    let mut shaft = BezPath::new();
    shaft.move_to(start);
    shaft.line_to(end);
    if let Some(path) = to_skia_path(&shaft) {
        let stroke = Stroke {
            width: ARROW_WIDTH,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    let angle = (end.y - start.y).atan2(end.x - start.x);
    let barb = |offset: f64| {
        Point::new(
            end.x - ARROW_HEAD_LENGTH * (angle + offset).cos(),
            end.y - ARROW_HEAD_LENGTH * (angle + offset).sin(),
        )
    };
    let mut head = BezPath::new();
    head.move_to(end);
    head.line_to(barb(-ARROW_HEAD_ANGLE));
    head.line_to(barb(ARROW_HEAD_ANGLE));
    head.close_path();
    if let Some(path) = to_skia_path(&head) {
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}

fn draw_symbol(pixmap: &mut Pixmap, at: Point, symbol: SymbolType, color: Color, transform: Transform) {
    let paint = solid_paint(color, 1.0);
    let (x, y) = (at.x, at.y);

    match symbol {
        SymbolType::Pin => {
            if let Some(head) = PathBuilder::from_circle(x as f32, (y - 10.0) as f32, 8.0) {
                pixmap.fill_path(&head, &paint, FillRule::Winding, transform, None);
            }
            let mut needle = BezPath::new();
            needle.move_to((x, y - 2.0));
            needle.line_to((x, y + 10.0));
            if let Some(path) = to_skia_path(&needle) {
                let stroke = Stroke {
                    width: 2.0,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
        }
        SymbolType::Lightning => {
            let bolt = [
                (0.0, -15.0),
                (-5.0, 0.0),
                (2.0, 0.0),
                (-3.0, 15.0),
                (8.0, -5.0),
                (3.0, -5.0),
            ];
            fill_polygon(pixmap, bolt.iter().map(|(dx, dy)| Point::new(x + dx, y + dy)), &paint, transform);
        }
        SymbolType::Star => {
            let (spikes, outer, inner): (i32, f64, f64) = (5, 12.0, 6.0);
            let corners = (0..spikes * 2).map(|i| {
                let radius = if i % 2 == 0 { outer } else { inner };
                let angle = f64::from(i) * PI / f64::from(spikes) - FRAC_PI_2;
                Point::new(x + angle.cos() * radius, y + angle.sin() * radius)
            });
            fill_polygon(pixmap, corners, &paint, transform);
        }
        SymbolType::Cross => {
            let mut cross = BezPath::new();
            cross.move_to((x - 8.0, y - 8.0));
            cross.line_to((x + 8.0, y + 8.0));
            cross.move_to((x + 8.0, y - 8.0));
            cross.line_to((x - 8.0, y + 8.0));
            if let Some(path) = to_skia_path(&cross) {
                let stroke = Stroke {
                    width: 3.0,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
        }
    }
}

fn fill_polygon(pixmap: &mut Pixmap, corners: impl IntoIterator<Item = Point>, paint: &Paint, transform: Transform) {
    let mut polygon = BezPath::new();
    for (i, corner) in corners.into_iter().enumerate() {
        if i == 0 {
            polygon.move_to(corner);
        } else {
            polygon.line_to(corner);
        }
    }
    polygon.close_path();
    if let Some(path) = to_skia_path(&polygon) {
        pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
    }
}

/// Text label placeholder: a dark bar with a white halo sized to the text,
/// sitting on the baseline at the anchor. Glyph shaping is left to the host.
fn draw_label(pixmap: &mut Pixmap, anchor: Point, content: &str, transform: Transform) {
    let width = content.chars().count() as f64 * LABEL_CHAR_WIDTH;
    let bar = kurbo::Rect::new(anchor.x, anchor.y - LABEL_HEIGHT * 0.7, anchor.x + width, anchor.y);
    let mut outline = BezPath::new();
    outline.move_to((bar.x0, bar.y0));
    outline.line_to((bar.x1, bar.y0));
    outline.line_to((bar.x1, bar.y1));
    outline.line_to((bar.x0, bar.y1));
    outline.close_path();
    let Some(path) = to_skia_path(&outline) else {
        return;
    };

    let halo = solid_paint(Color::from_rgba8(255, 255, 255, 255), 1.0);
    pixmap.stroke_path(&path, &halo, &round_stroke(3.0), transform, None);
    let ink = solid_paint(Color::from_rgba8(0, 0, 0, 255), 1.0);
    pixmap.fill_path(&path, &ink, FillRule::Winding, transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use painmap_core::drawing::BrushSettings;

    fn canvas() -> Pixmap {
        new_pixmap(Size::new(100.0, 100.0)).unwrap()
    }

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    fn burning() -> StrokeStyle {
        BrushSettings::draw("burning").with_opacity(1.0).stroke_style()
    }

    #[test]
    fn test_new_pixmap_rejects_empty_size() {
        assert!(new_pixmap(Size::new(0.0, 10.0)).is_err());
        assert!(new_pixmap(Size::new(f64::NAN, 10.0)).is_err());
        let pixmap = new_pixmap(Size::new(10.5, 20.0)).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (11, 20));
    }

    #[test]
    fn test_transform_matches_affine() {
        let view = Affine::translate((5.0, 7.0)) * Affine::scale(2.0);
        let t = to_transform(view);
        assert_eq!((t.sx, t.sy, t.tx, t.ty), (2.0, 2.0, 5.0, 7.0));
    }

    #[test]
    fn test_stroke_paints_quality_color() {
        let mut pixmap = canvas();
        let points = [Point::new(10.0, 50.0), Point::new(90.0, 50.0)];
        draw_stroke(&mut pixmap, &points, &burning(), Affine::IDENTITY);
        let pixel = pixmap.pixel(50, 50).unwrap().demultiply();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()), (0xef, 0x44, 0x44, 255));
        assert_eq!(alpha_at(&pixmap, 50, 10), 0);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut pixmap = canvas();
        let style = BrushSettings::draw("burning").stroke_style();
        draw_stroke(&mut pixmap, &[Point::new(10.0, 50.0), Point::new(90.0, 50.0)], &style, Affine::IDENTITY);
        let alpha = alpha_at(&pixmap, 50, 50);
        assert!((175..=181).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn test_single_point_is_a_dot() {
        let mut pixmap = canvas();
        draw_stroke(&mut pixmap, &[Point::new(50.0, 50.0)], &burning(), Affine::IDENTITY);
        assert_eq!(alpha_at(&pixmap, 50, 50), 255);
        assert_eq!(alpha_at(&pixmap, 50, 60), 0);
    }

    #[test]
    fn test_erase_clears_painted_area() {
        let mut pixmap = canvas();
        let line = [Point::new(10.0, 50.0), Point::new(90.0, 50.0)];
        draw_stroke(&mut pixmap, &line, &burning(), Affine::IDENTITY);
        assert_eq!(alpha_at(&pixmap, 50, 50), 255);

        let eraser = BrushSettings::erase().with_brush_size(30.0).stroke_style();
        draw_stroke(&mut pixmap, &[Point::new(40.0, 50.0), Point::new(60.0, 50.0)], &eraser, Affine::IDENTITY);
        assert_eq!(alpha_at(&pixmap, 50, 50), 0);
        assert_eq!(alpha_at(&pixmap, 15, 50), 255);
    }

    #[test]
    fn test_view_transform_moves_strokes() {
        let mut pixmap = canvas();
        let view = Affine::translate((20.0, 0.0));
        draw_stroke(&mut pixmap, &[Point::new(10.0, 10.0)], &burning(), view);
        assert_eq!(alpha_at(&pixmap, 10, 10), 0);
        assert_eq!(alpha_at(&pixmap, 30, 10), 255);
    }

    #[test]
    fn test_annotations_drawn_above_erase() {
        let mut pixmap = canvas();
        let mut data = DrawingData::new();
        data.annotations.push(Annotation::symbol(Point::new(50.0, 50.0), SymbolType::Star, "#3b82f6"));
        let eraser = BrushSettings::erase().with_brush_size(50.0).stroke_style();
        data.paths.push(DrawingPath::from_points(
            &[Point::new(0.0, 50.0), Point::new(100.0, 50.0)],
            &eraser,
        ));
        draw_snapshot(&mut pixmap, &data, Affine::IDENTITY);
        let pixel = pixmap.pixel(50, 50).unwrap().demultiply();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0x3b, 0x82, 0xf6));
    }

    #[test]
    fn test_each_symbol_marks_its_anchor() {
        for symbol in SymbolType::ALL {
            let mut pixmap = canvas();
            let ann = Annotation::symbol(Point::new(50.0, 50.0), symbol, "#000000");
            draw_annotation(&mut pixmap, &ann, Affine::IDENTITY);
            let painted = (40..=60).any(|y| alpha_at(&pixmap, 50, y) > 0);
            assert!(painted, "{symbol:?} left no pixels");
        }
    }

    #[test]
    fn test_arrow_head_at_end_point() {
        let mut pixmap = canvas();
        let ann = Annotation::arrow(Point::new(10.0, 50.0), Point::new(80.0, 50.0), "#000000");
        draw_annotation(&mut pixmap, &ann, Affine::IDENTITY);
        // The head is wider than the 3px shaft.
        assert!(alpha_at(&pixmap, 72, 53) > 0);
        assert_eq!(alpha_at(&pixmap, 20, 53), 0);
    }

    #[test]
    fn test_incomplete_annotations_are_skipped() {
        let mut pixmap = canvas();
        let mut arrow = Annotation::arrow(Point::new(10.0, 10.0), Point::new(80.0, 80.0), "#000000");
        arrow.end_x = None;
        draw_annotation(&mut pixmap, &arrow, Affine::IDENTITY);
        draw_annotation(&mut pixmap, &Annotation::text(Point::new(10.0, 10.0), ""), Affine::IDENTITY);
        assert!(pixmap.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_text_label_drawn_after_anchor() {
        let mut pixmap = canvas();
        draw_annotation(&mut pixmap, &Annotation::text(Point::new(10.0, 50.0), "sore"), Affine::IDENTITY);
        assert_eq!(alpha_at(&pixmap, 20, 46), 255);
        assert_eq!(alpha_at(&pixmap, 60, 46), 0);
    }
}
