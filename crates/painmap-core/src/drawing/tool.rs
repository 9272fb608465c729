//! Drawing tools and the per-gesture settings supplied by host controls.

use super::path::{CompositeOp, StrokeStyle};
use crate::annotation::SymbolType;
use crate::color::ERASE_HEX;
use crate::quality::{self, DEFAULT_QUALITY_ID};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Minimum and maximum brush sizes offered by the brush control.
pub const BRUSH_SIZE_RANGE: (f64, f64) = (5.0, 50.0);

/// Minimum and maximum opacity offered by the opacity control.
pub const OPACITY_RANGE: (f64, f64) = (0.1, 1.0);

/// Available drawing-surface tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingTool {
    #[default]
    Draw,
    Erase,
    Arrow,
    Text,
    Symbol,
}

impl DrawingTool {
    /// Whether this tool records strokes.
    pub fn is_stroke_tool(self) -> bool {
        matches!(self, DrawingTool::Draw | DrawingTool::Erase)
    }
}

/// Current tool settings, read at the start of each gesture.
///
/// Passed explicitly into the session; the session never stores them in
/// history, and changes made mid-stroke do not affect the open stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrushSettings {
    /// Active tool.
    pub tool: DrawingTool,
    /// Active pain quality id; selects the stroke and annotation color.
    pub quality: String,
    /// Opacity for draw strokes.
    pub opacity: f64,
    /// Stroke width for draw and erase strokes.
    pub brush_size: f64,
    /// Symbol placed by the symbol tool.
    pub symbol: SymbolType,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            tool: DrawingTool::Draw,
            quality: DEFAULT_QUALITY_ID.to_string(),
            opacity: 0.7,
            brush_size: 10.0,
            symbol: SymbolType::Pin,
        }
    }
}

impl BrushSettings {
    /// Settings for drawing with a quality.
    pub fn draw(quality: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            ..Self::default()
        }
    }

    /// Settings for the eraser.
    pub fn erase() -> Self {
        Self {
            tool: DrawingTool::Erase,
            ..Self::default()
        }
    }

    /// Builder: set the tool.
    pub fn with_tool(mut self, tool: DrawingTool) -> Self {
        self.tool = tool;
        self
    }

    /// Builder: set the opacity (clamped to the control range).
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(OPACITY_RANGE.0, OPACITY_RANGE.1);
        self
    }

    /// Builder: set the brush size (clamped to the control range).
    pub fn with_brush_size(mut self, brush_size: f64) -> Self {
        self.brush_size = brush_size.clamp(BRUSH_SIZE_RANGE.0, BRUSH_SIZE_RANGE.1);
        self
    }

    /// Builder: set the symbol.
    pub fn with_symbol(mut self, symbol: SymbolType) -> Self {
        self.symbol = symbol;
        self
    }

    /// Hex color of the active quality (neutral if unknown).
    pub fn quality_hex(&self) -> String {
        quality::quality_hex(&self.quality)
    }

    /// Stroke style for a stroke started with these settings.
    ///
    /// Erase ignores the active quality: it is stored white at full opacity
    /// and composited destructively.
    pub fn stroke_style(&self) -> StrokeStyle {
        match self.tool {
            DrawingTool::Erase => StrokeStyle {
                op: CompositeOp::Erase,
                color: ERASE_HEX.to_string(),
                opacity: 1.0,
                brush_size: self.brush_size,
            },
            _ => StrokeStyle {
                op: CompositeOp::Draw,
                color: self.quality_hex(),
                opacity: self.opacity.clamp(0.0, 1.0),
                brush_size: self.brush_size,
            },
        }
    }
}

/// Mount-time configuration of a drawing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Size hosts give new drawing surfaces. Input bounds follow the size
    /// the mounted surface reports.
    pub surface_size: Size,
    /// Maximum number of history snapshots (`None` = unbounded).
    pub history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            surface_size: Size::new(600.0, 800.0),
            history_limit: None,
        }
    }
}
