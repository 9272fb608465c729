//! The persisted pain-map aggregate.

use crate::drawing::DrawingData;
use crate::error::EngineResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Pain intensity on the 0–10 scale.
///
/// Values are clamped on construction and on deserialization; NaN becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Intensity(f64);

impl Intensity {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Intensity as a 0–1 fraction (used as region opacity).
    pub fn fraction(self) -> f64 {
        self.0 / Self::MAX
    }
}

impl From<f64> for Intensity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Intensity> for f64 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// One selected anatomical region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainRegion {
    /// Mesh identifier of the body part.
    pub mesh_name: String,
    /// Pain quality id captured at selection.
    pub quality: String,
    /// Intensity captured at selection.
    pub intensity: Intensity,
}

impl PainRegion {
    pub fn new(mesh_name: impl Into<String>, quality: impl Into<String>, intensity: impl Into<Intensity>) -> Self {
        Self {
            mesh_name: mesh_name.into(),
            quality: quality.into(),
            intensity: intensity.into(),
        }
    }
}

/// Body avatar shown behind the drawing.
///
/// Unknown variants are kept verbatim so stored data survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AvatarVariant {
    #[default]
    Male,
    Female,
    Child,
    Other(String),
}

impl AvatarVariant {
    pub fn as_str(&self) -> &str {
        match self {
            AvatarVariant::Male => "male",
            AvatarVariant::Female => "female",
            AvatarVariant::Child => "child",
            AvatarVariant::Other(raw) => raw,
        }
    }

    /// Whether this is one of the built-in avatars.
    pub fn is_known(&self) -> bool {
        !matches!(self, AvatarVariant::Other(_))
    }
}

impl From<String> for AvatarVariant {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "male" => AvatarVariant::Male,
            "female" => AvatarVariant::Female,
            "child" => AvatarVariant::Child,
            _ => AvatarVariant::Other(raw),
        }
    }
}

impl From<AvatarVariant> for String {
    fn from(variant: AvatarVariant) -> Self {
        match variant {
            AvatarVariant::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Side of the body the drawing was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewOrientation {
    #[default]
    Front,
    Back,
}

/// Whether the pain is felt near the surface or deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthIndicator {
    #[default]
    Superficial,
    Deep,
}

/// Canonical, serializable pain map.
///
/// Produced on every committed change so partial progress is always
/// capturable. Avatar and view are optional: a snapshot that records neither
/// is shown with viewer defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainMapModel {
    #[serde(default)]
    pub body_region: String,
    #[serde(default)]
    pub pain_intensity: Intensity,
    #[serde(default)]
    pub pain_quality: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_type: Option<AvatarVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_orientation: Option<ViewOrientation>,
    #[serde(default)]
    pub depth_indicator: DepthIndicator,
    #[serde(default)]
    pub drawing_data: DrawingData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<PainRegion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_source: Option<String>,
}

impl PainMapModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored model. Duplicate regions are dropped (first wins).
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let mut model: Self = serde_json::from_str(json)?;
        model.dedupe_regions();
        Ok(model)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn drawing_data(&self) -> &DrawingData {
        &self.drawing_data
    }

    /// Selected regions, empty when none were recorded.
    pub fn regions(&self) -> &[PainRegion] {
        self.regions.as_deref().unwrap_or(&[])
    }

    pub fn set_pain_intensity(&mut self, value: f64) {
        self.pain_intensity = Intensity::new(value);
    }

    /// Builder: attach a region list (deduplicated).
    pub fn with_regions(mut self, regions: Vec<PainRegion>) -> Self {
        self.regions = Some(regions);
        self.dedupe_regions();
        self
    }

    /// Builder: attach drawing output.
    pub fn with_drawing(mut self, drawing: DrawingData) -> Self {
        self.drawing_data = drawing;
        self
    }

    /// Builder: tag where this snapshot came from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.submission_source = Some(source.into());
        self
    }

    fn dedupe_regions(&mut self) {
        let Some(regions) = self.regions.as_mut() else {
            return;
        };
        let mut seen = HashSet::new();
        let before = regions.len();
        regions.retain(|region| seen.insert(region.mesh_name.clone()));
        if regions.len() != before {
            log::warn!("Dropped {} duplicate region entries", before - regions.len());
        }
    }
}
