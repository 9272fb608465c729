//! Freehand drawing: stroke recording, history and compositing contract.

mod path;
mod recorder;
mod session;
mod surface;
mod tool;

pub use path::{CompositeOp, DrawingPath, StrokeStyle, decode_path_data, encode_path_data, polyline};
pub use recorder::PathRecorder;
pub use session::{CanvasDrawingSession, SessionState};
pub use surface::{DrawingSurface, LiveStroke};
pub use tool::{BRUSH_SIZE_RANGE, BrushSettings, DrawingTool, OPACITY_RANGE, SessionConfig};

#[cfg(test)]
pub(crate) use session::tests::RecordingSurface;

use crate::annotation::Annotation;
use serde::{Deserialize, Serialize};

/// A complete (paths, annotations) pair: one history snapshot and the
/// persisted `drawingData` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingData {
    #[serde(default)]
    pub paths: Vec<DrawingPath>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl DrawingData {
    /// Create empty drawing data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there is nothing drawn or placed.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.annotations.is_empty()
    }
}
