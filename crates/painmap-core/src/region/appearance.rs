//! Presentation of body parts given a region selection.
//!
//! Kept separate from picking: nothing here mutates selection state.

use super::registry::{BodyPart, BodyRegistry};
use crate::color::{NEUTRAL, parse_hex_or_neutral};
use crate::model::PainRegion;
use crate::quality;
use peniko::Color;

/// Opacity of unselected parts in playback.
pub const PLAYBACK_UNSELECTED_OPACITY: f64 = 0.3;

/// Whether the body is being edited or replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Editing,
    Playback,
}

/// Resolved color and opacity of one body part.
#[derive(Debug, Clone)]
pub struct PartAppearance {
    pub id: String,
    pub color: Color,
    pub opacity: f64,
    pub selected: bool,
}

/// Appearance of one part.
///
/// Selected parts take the quality color at opacity intensity/10; unknown
/// quality ids fall back to neutral. Unselected parts keep their base color
/// while editing and turn neutral and translucent in playback.
pub fn part_appearance(part: &BodyPart, region: Option<&PainRegion>, mode: RenderMode) -> PartAppearance {
    match (region, mode) {
        (Some(region), _) => PartAppearance {
            id: part.id.clone(),
            color: quality::quality_color(&region.quality),
            opacity: region.intensity.fraction(),
            selected: true,
        },
        (None, RenderMode::Editing) => PartAppearance {
            id: part.id.clone(),
            color: parse_hex_or_neutral(&part.base_color),
            opacity: 1.0,
            selected: false,
        },
        (None, RenderMode::Playback) => PartAppearance {
            id: part.id.clone(),
            color: NEUTRAL,
            opacity: PLAYBACK_UNSELECTED_OPACITY,
            selected: false,
        },
    }
}

/// Appearances of every registry part, in registry order.
pub fn appearances(registry: &BodyRegistry, regions: &[PainRegion], mode: RenderMode) -> Vec<PartAppearance> {
    registry
        .parts()
        .iter()
        .map(|part| {
            let region = regions.iter().find(|r| r.mesh_name == part.id);
            part_appearance(part, region, mode)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_part_uses_quality_and_intensity() {
        let registry = BodyRegistry::standard();
        let regions = vec![PainRegion::new("head", "burning", 7.0)];
        let looks = appearances(&registry, &regions, RenderMode::Editing);
        let head = looks.iter().find(|a| a.id == "head").unwrap();
        assert!(head.selected);
        assert_eq!(head.color.to_rgba8().r, 0xef);
        assert!((head.opacity - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_quality_is_neutral() {
        let registry = BodyRegistry::standard();
        let regions = vec![PainRegion::new("neck", "electric", 5.0)];
        let looks = appearances(&registry, &regions, RenderMode::Editing);
        let neck = looks.iter().find(|a| a.id == "neck").unwrap();
        assert_eq!(neck.color.to_rgba8(), NEUTRAL.to_rgba8());
    }

    #[test]
    fn test_playback_unselected_is_translucent() {
        let registry = BodyRegistry::standard();
        let looks = appearances(&registry, &[], RenderMode::Playback);
        assert!(looks.iter().all(|a| !a.selected));
        assert!(looks.iter().all(|a| (a.opacity - PLAYBACK_UNSELECTED_OPACITY).abs() < 1e-9));

        let editing = appearances(&registry, &[], RenderMode::Editing);
        assert!(editing.iter().all(|a| (a.opacity - 1.0).abs() < 1e-9));
    }
}
