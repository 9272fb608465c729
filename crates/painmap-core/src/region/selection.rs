//! Selected anatomical regions and click resolution.

use super::camera::{CameraView, OrbitCamera};
use super::picking::pick;
use super::registry::BodyRegistry;
use crate::error::{EngineError, EngineResult};
use crate::model::{Intensity, PainRegion};
use crate::quality::DEFAULT_QUALITY_ID;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Range offered by the region intensity control.
pub const REGION_INTENSITY_RANGE: (f64, f64) = (1.0, 10.0);

/// Quality and intensity captured when a region is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionBrush {
    pub quality: String,
    pub intensity: Intensity,
}

impl Default for RegionBrush {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY_ID.to_string(),
            intensity: Intensity::new(5.0),
        }
    }
}

impl RegionBrush {
    /// Create a brush; intensity is clamped to the control range.
    pub fn new(quality: impl Into<String>, intensity: f64) -> Self {
        Self {
            quality: quality.into(),
            intensity: Intensity::new(intensity.clamp(REGION_INTENSITY_RANGE.0, REGION_INTENSITY_RANGE.1)),
        }
    }

    fn capture(&self, mesh_name: &str) -> PainRegion {
        PainRegion::new(mesh_name, self.quality.clone(), self.intensity)
    }
}

type RegionListener = Box<dyn FnMut(&[PainRegion])>;

/// Set of selected regions over a body registry.
///
/// Each entry keeps the quality and intensity from the click that created it.
pub struct RegionSelectionModel {
    registry: BodyRegistry,
    camera: OrbitCamera,
    regions: Vec<PainRegion>,
    listeners: Vec<RegionListener>,
}

impl RegionSelectionModel {
    /// Mount over `registry`, optionally seeded with stored regions.
    pub fn mount(registry: BodyRegistry, seed: Option<&[PainRegion]>) -> EngineResult<Self> {
        if registry.is_empty() {
            return Err(EngineError::EmptyRegistry);
        }
        let mut seen = HashSet::new();
        let regions: Vec<PainRegion> = seed
            .unwrap_or(&[])
            .iter()
            .filter(|region| seen.insert(region.mesh_name.clone()))
            .cloned()
            .collect();
        log::debug!(
            "Mounting region model: {} parts, {} regions",
            registry.len(),
            regions.len()
        );
        Ok(Self {
            registry,
            camera: OrbitCamera::default(),
            regions,
            listeners: Vec::new(),
        })
    }

    /// Register a listener for selection changes.
    pub fn on_change(&mut self, listener: impl FnMut(&[PainRegion]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Remove `mesh_name` if selected, otherwise select it with `brush`.
    /// Returns whether the region is selected afterwards.
    pub fn toggle_region(&mut self, mesh_name: &str, brush: &RegionBrush) -> bool {
        let selected = if let Some(index) = self.position(mesh_name) {
            self.regions.remove(index);
            log::debug!("Region {} deselected", mesh_name);
            false
        } else {
            self.regions.push(brush.capture(mesh_name));
            log::debug!("Region {} selected ({}, {})", mesh_name, brush.quality, brush.intensity);
            true
        };
        self.emit();
        selected
    }

    /// Deselect `mesh_name`. No-op if not selected.
    pub fn remove_region(&mut self, mesh_name: &str) -> bool {
        let Some(index) = self.position(mesh_name) else {
            return false;
        };
        self.regions.remove(index);
        self.emit();
        true
    }

    /// Re-capture quality and intensity of a selected region.
    pub fn update_region(&mut self, mesh_name: &str, brush: &RegionBrush) -> bool {
        let Some(index) = self.position(mesh_name) else {
            return false;
        };
        self.regions[index] = brush.capture(mesh_name);
        self.emit();
        true
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        if self.regions.is_empty() {
            return;
        }
        self.regions.clear();
        self.emit();
    }

    /// Resolve a click in the 3D viewport and toggle the part under it.
    ///
    /// Returns the toggled mesh id, or `None` when nothing was hit.
    pub fn click(&mut self, screen: Point, viewport: Size, brush: &RegionBrush) -> Option<String> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        let ray = self.camera.screen_ray(screen, viewport);
        let Some(hit) = pick(&ray, &self.registry).map(str::to_owned) else {
            log::trace!("Click at {:?} hit no body part", screen);
            return None;
        };
        self.toggle_region(&hit, brush);
        Some(hit)
    }

    /// Switch the locked camera view. Selection is unchanged.
    pub fn set_view(&mut self, view: CameraView) {
        self.camera.view = view;
    }

    pub fn view(&self) -> CameraView {
        self.camera.view
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn regions(&self) -> &[PainRegion] {
        &self.regions
    }

    pub fn region(&self, mesh_name: &str) -> Option<&PainRegion> {
        self.regions.iter().find(|r| r.mesh_name == mesh_name)
    }

    pub fn is_selected(&self, mesh_name: &str) -> bool {
        self.position(mesh_name).is_some()
    }

    /// Unmount, returning the final selection.
    pub fn teardown(self) -> Vec<PainRegion> {
        self.regions
    }

    fn position(&self, mesh_name: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.mesh_name == mesh_name)
    }

    fn emit(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.regions);
        }
    }
}
