//! Pain-Map Render Library
//!
//! CPU rendering for pain maps: a tiny-skia compositor for strokes and
//! annotations, a raster [`painmap_core::DrawingSurface`], a flat overview of
//! the 3D body, and PNG export.

pub mod body;
pub mod compositor;
mod error;
pub mod export;
mod surface;

pub use body::{draw_body, render_body, render_playback_body, render_selection};
pub use compositor::{draw_annotations, draw_paths, draw_snapshot, draw_stroke, new_pixmap};
pub use error::{RenderError, RenderResult};
pub use export::{encode_png, render_playback_png, render_snapshot_png, write_png};
pub use surface::RasterSurface;
