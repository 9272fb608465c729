//! 3D anatomical region selection.

mod appearance;
mod camera;
mod geometry;
mod picking;
mod registry;
mod selection;

pub use appearance::{PLAYBACK_UNSELECTED_OPACITY, PartAppearance, RenderMode, appearances, part_appearance};
pub use camera::{CameraView, OrbitCamera};
pub use geometry::{Ray, Shape, Vec3};
pub use picking::pick;
pub use registry::{BACK_HEX, BodyPart, BodyRegistry, SKIN_HEX};
pub use selection::{REGION_INTENSITY_RANGE, RegionBrush, RegionSelectionModel};
