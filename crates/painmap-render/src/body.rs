//! Flat overview of the 3D body for summaries and playback.
//!
//! Each part is drawn as the screen-space outline of its primitive, projected
//! through the locked orbit camera and painted far to near. The result is a
//! presentation of the selection; nothing here reads or writes selection state
//! beyond the appearances it is given.

use crate::compositor::{new_pixmap, to_skia_path};
use crate::error::RenderResult;
use kurbo::{Ellipse, Rect, RoundedRect, Shape as _, Size};
use painmap_core::playback::PlaybackProjector;
use painmap_core::region::{
    BodyPart, BodyRegistry, OrbitCamera, PartAppearance, RegionSelectionModel, RenderMode, Shape, Vec3, appearances,
};
use tiny_skia::{FillRule, Paint, Pixmap, Transform};

const CURVE_TOLERANCE: f64 = 0.1;

/// Screen rectangle covered by a part, with its view depth.
fn project_part(part: &BodyPart, camera: &OrbitCamera, viewport: Size) -> Option<(Rect, f64)> {
    let (_, depth) = camera.project(part.center, viewport)?;
    let half = part.shape.half_extents();
    let mut bounds: Option<Rect> = None;
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let corner = part.center + Vec3::new(half.x * sx, half.y * sy, half.z * sz);
                let (point, _) = camera.project(corner, viewport)?;
                bounds = Some(match bounds {
                    Some(rect) => rect.union_pt(point),
                    None => Rect::from_points(point, point),
                });
            }
        }
    }
    bounds.map(|rect| (rect, depth))
}

fn outline(shape: &Shape, rect: Rect) -> kurbo::BezPath {
    match shape {
        Shape::Sphere { .. } => Ellipse::from_rect(rect).to_path(CURVE_TOLERANCE),
        Shape::Cylinder { .. } => {
            let radius = rect.width().min(rect.height()) / 2.0;
            RoundedRect::from_rect(rect, radius).to_path(CURVE_TOLERANCE)
        }
        Shape::Box { .. } => rect.to_path(CURVE_TOLERANCE),
    }
}

/// Paint the registry as seen by `camera`, using one appearance per part id.
///
/// Parts without an appearance, or behind the camera, are skipped.
pub fn draw_body(pixmap: &mut Pixmap, registry: &BodyRegistry, looks: &[PartAppearance], camera: &OrbitCamera) {
    let viewport = Size::new(f64::from(pixmap.width()), f64::from(pixmap.height()));
    let mut visible: Vec<(&BodyPart, &PartAppearance, Rect, f64)> = registry
        .parts()
        .iter()
        .filter_map(|part| {
            let look = looks.iter().find(|look| look.id == part.id)?;
            let (rect, depth) = project_part(part, camera, viewport)?;
            Some((part, look, rect, depth))
        })
        .collect();
    visible.sort_by(|a, b| b.3.total_cmp(&a.3));

    for (part, look, rect, _) in visible {
        let Some(path) = to_skia_path(&outline(&part.shape, rect)) else {
            continue;
        };
        let rgba = look.color.to_rgba8();
        let alpha = (f64::from(rgba.a) * look.opacity.clamp(0.0, 1.0)).round() as u8;
        let mut paint = Paint::default();
        paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, alpha);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Render the body with the given appearances into a new pixmap.
pub fn render_body(
    registry: &BodyRegistry,
    looks: &[PartAppearance],
    camera: &OrbitCamera,
    size: Size,
) -> RenderResult<Pixmap> {
    let mut pixmap = new_pixmap(size)?;
    draw_body(&mut pixmap, registry, looks, camera);
    Ok(pixmap)
}

/// Render an editable selection from its current camera view.
pub fn render_selection(model: &RegionSelectionModel, size: Size) -> RenderResult<Pixmap> {
    let looks = appearances(model.registry(), model.regions(), RenderMode::Editing);
    render_body(model.registry(), &looks, model.camera(), size)
}

/// Render a stored snapshot's regions in playback mode, framed by its view.
pub fn render_playback_body(
    projector: &PlaybackProjector<'_>,
    registry: &BodyRegistry,
    size: Size,
) -> RenderResult<Pixmap> {
    let camera = OrbitCamera::new(projector.view().into());
    render_body(registry, &projector.region_appearances(registry), &camera, size)
}
