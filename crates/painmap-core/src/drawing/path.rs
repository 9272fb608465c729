//! Committed stroke records and their path-data encoding.

use kurbo::{BezPath, PathEl, Point, Rect};
use serde::{Deserialize, Deserializer, Serialize};

/// Pixel-blend rule of a stroke, fixed for the whole stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeOp {
    /// Normal source-over blending with the stroke color.
    #[default]
    Draw,
    /// Destructive compositing: removes existing content under the stroke.
    Erase,
}

impl CompositeOp {
    /// Check if this is the default drawing op (omitted when serialized).
    pub fn is_draw(&self) -> bool {
        matches!(self, CompositeOp::Draw)
    }
}

/// Style captured at the start of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Compositing operation.
    pub op: CompositeOp,
    /// Stroke color as a hex string.
    pub color: String,
    /// Stroke opacity in `[0, 1]`.
    pub opacity: f64,
    /// Stroke width in surface pixels.
    pub brush_size: f64,
}

/// One committed stroke.
///
/// Geometry is stored as a compact path-description string
/// (`"M x y L x y ..."`). Fields are private: a committed path never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingPath {
    path_data: String,
    color: String,
    #[serde(deserialize_with = "deserialize_unit_interval")]
    opacity: f64,
    brush_size: f64,
    #[serde(default, rename = "tool", skip_serializing_if = "CompositeOp::is_draw")]
    op: CompositeOp,
}

impl DrawingPath {
    /// Build a path from recorded points and the stroke's style.
    pub fn from_points(points: &[Point], style: &StrokeStyle) -> Self {
        Self {
            path_data: encode_path_data(points),
            color: style.color.clone(),
            opacity: style.opacity.clamp(0.0, 1.0),
            brush_size: style.brush_size,
            op: style.op,
        }
    }

    /// Build a path from an existing path-data string.
    pub fn from_path_data(path_data: impl Into<String>, style: &StrokeStyle) -> Self {
        Self {
            path_data: path_data.into(),
            color: style.color.clone(),
            opacity: style.opacity.clamp(0.0, 1.0),
            brush_size: style.brush_size,
            op: style.op,
        }
    }

    /// The encoded geometry.
    pub fn path_data(&self) -> &str {
        &self.path_data
    }

    /// Stroke color as a hex string.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Stroke opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Stroke width.
    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Compositing operation.
    pub fn op(&self) -> CompositeOp {
        self.op
    }

    /// Check if this is an erase stroke.
    pub fn is_erase(&self) -> bool {
        self.op == CompositeOp::Erase
    }

    /// Style the path was recorded with.
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            op: self.op,
            color: self.color.clone(),
            opacity: self.opacity,
            brush_size: self.brush_size,
        }
    }

    /// Decode the recorded points.
    pub fn points(&self) -> Vec<Point> {
        decode_path_data(&self.path_data)
    }

    /// Bounding box of the recorded points (without stroke width).
    pub fn bounds(&self) -> Rect {
        let points = self.points();
        let Some(first) = points.first() else {
            return Rect::ZERO;
        };
        points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }
}

/// Encode points as `"M x y L x y ..."`.
pub fn encode_path_data(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let command = if i == 0 { 'M' } else { 'L' };
        out.push_str(&format!("{} {} {}", command, p.x, p.y));
    }
    out
}

/// Decode the vertices of a path-data string.
///
/// Accepts any SVG path syntax; curve segments contribute their end points.
/// Malformed data decodes to an empty list.
pub fn decode_path_data(path_data: &str) -> Vec<Point> {
    if path_data.trim().is_empty() {
        return Vec::new();
    }

    let path = match BezPath::from_svg(path_data) {
        Ok(path) => path,
        Err(e) => {
            log::warn!("Unparseable path data {:?}: {}", path_data, e);
            return Vec::new();
        }
    };

    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            PathEl::QuadTo(_, p) => Some(p),
            PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        })
        .collect()
}

/// Build a polyline from points (a single point yields a lone move-to).
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    for point in points.iter().skip(1) {
        path.line_to(*point);
    }
    path
}

fn deserialize_unit_interval<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) })
}
