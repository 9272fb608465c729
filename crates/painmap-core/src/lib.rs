//! Pain-Map Core Library
//!
//! Platform-agnostic data model and editing logic for capturing where and how
//! a patient hurts: freehand drawing with undo/redo, annotations, 3D region
//! selection, serialization, playback and aggregate analytics.

pub mod analytics;
pub mod annotation;
pub mod camera;
pub mod color;
pub mod drawing;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod model;
pub mod playback;
pub mod quality;
pub mod region;
pub mod storage;

pub use annotation::{Annotation, AnnotationKind, AnnotationManager, SymbolType};
pub use camera::Camera;
pub use drawing::{
    BrushSettings, CanvasDrawingSession, CompositeOp, DrawingData, DrawingPath, DrawingSurface,
    DrawingTool, LiveStroke, SessionConfig, SessionState, StrokeStyle,
};
pub use editor::PainMapEditor;
pub use error::{EngineError, EngineResult};
pub use history::HistoryStack;
pub use input::{InputTranslator, Modifiers, PointerInput};
pub use model::{AvatarVariant, DepthIndicator, Intensity, PainMapModel, PainRegion, ViewOrientation};
pub use playback::{PlaybackProjector, PlaybackTimeline, TimelineEntry, ViewerDefaults};
pub use quality::{PAIN_QUALITIES, PainQuality};
pub use region::{BodyRegistry, CameraView, RegionBrush, RegionSelectionModel, RenderMode};
pub use storage::{FileStorage, MemoryStorage, PainMapStore, StorageError, StoredPainMap};
