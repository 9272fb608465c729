//! Named body parts of the 3D scene.

use super::geometry::{Ray, Shape, Vec3};
use serde::{Deserialize, Serialize};

/// Skin tone of front-facing parts.
pub const SKIN_HEX: &str = "#ffdbac";
/// Slightly darker tone used for the back.
pub const BACK_HEX: &str = "#ffd0a0";

/// A pickable body part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPart {
    /// Mesh identifier, stored as `meshName` in region entries.
    pub id: String,
    /// Human-readable name.
    pub label: String,
    pub center: Vec3,
    #[serde(flatten)]
    pub shape: Shape,
    /// Unselected color as a hex string.
    pub base_color: String,
}

impl BodyPart {
    pub fn new(id: impl Into<String>, label: impl Into<String>, center: Vec3, shape: Shape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            center,
            shape,
            base_color: SKIN_HEX.to_string(),
        }
    }

    /// Builder: set the unselected color.
    pub fn with_color(mut self, hex: impl Into<String>) -> Self {
        self.base_color = hex.into();
        self
    }

    /// Distance along `ray` to this part, if hit.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        self.shape.intersect(ray, self.center)
    }
}

/// The set of parts a region model can pick from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyRegistry {
    parts: Vec<BodyPart>,
}

impl BodyRegistry {
    pub fn new(parts: Vec<BodyPart>) -> Self {
        Self { parts }
    }

    /// The built-in primitive body: head, torso, limbs, joints and back.
    pub fn standard() -> Self {
        let sphere = |radius| Shape::Sphere { radius };
        let cuboid = |w: f64, h: f64, d: f64| Shape::Box {
            half_extents: Vec3::new(w / 2.0, h / 2.0, d / 2.0),
        };
        let cylinder = |radius, half_height| Shape::Cylinder { radius, half_height };
        let at = Vec3::new;

        let mut parts = vec![
            BodyPart::new("head", "Head", at(0.0, 4.5, 0.0), sphere(0.8)),
            BodyPart::new("neck", "Neck", at(0.0, 3.7, 0.0), cylinder(0.3, 0.5)),
            BodyPart::new("chest", "Chest", at(0.0, 2.5, 0.0), cuboid(1.5, 1.5, 0.8)),
            BodyPart::new("abdomen", "Abdomen", at(0.0, 1.0, 0.0), cuboid(1.3, 1.2, 0.7)),
            BodyPart::new("upper_back", "Upper Back", at(0.0, 2.5, -0.3), cuboid(1.0, 1.0, 0.3))
                .with_color(BACK_HEX),
            BodyPart::new("lower_back", "Lower Back", at(0.0, 0.8, -0.3), cuboid(0.9, 0.8, 0.3))
                .with_color(BACK_HEX),
        ];

        // Limbs are mirrored; "left" is the figure's left at negative x.
        let limbs: [(&str, &str, Vec3, Shape); 11] = [
            ("shoulder", "Shoulder", at(1.2, 3.0, 0.0), sphere(0.4)),
            ("upper_arm", "Upper Arm", at(1.5, 2.2, 0.0), cylinder(0.3, 0.8)),
            ("elbow", "Elbow", at(1.5, 1.4, 0.0), sphere(0.25)),
            ("forearm", "Forearm", at(1.5, 0.7, 0.0), cylinder(0.25, 0.7)),
            ("hand", "Hand", at(1.5, 0.0, 0.0), cuboid(0.2, 0.3, 0.15)),
            ("hip", "Hip", at(0.5, 0.0, 0.0), sphere(0.35)),
            ("thigh", "Thigh", at(0.5, -1.0, 0.0), cylinder(0.35, 1.0)),
            ("knee", "Knee", at(0.5, -2.0, 0.0), sphere(0.3)),
            ("shin", "Shin", at(0.5, -2.8, 0.0), cylinder(0.3, 0.8)),
            ("ankle", "Ankle", at(0.5, -3.6, 0.0), sphere(0.2)),
            ("foot", "Foot", at(0.5, -4.0, 0.2), cuboid(0.25, 0.15, 0.5)),
        ];
        for (side, label_side, sign) in [("left", "Left", -1.0), ("right", "Right", 1.0)] {
            for (id, label, center, shape) in &limbs {
                parts.push(BodyPart::new(
                    format!("{side}_{id}"),
                    format!("{label_side} {label}"),
                    Vec3::new(center.x * sign, center.y, center.z),
                    *shape,
                ));
            }
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BodyPart> {
        self.parts.iter().find(|part| part.id == id)
    }

    /// Display label for a mesh id, falling back to the id itself.
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|part| part.label.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_registry_ids_unique() {
        let registry = BodyRegistry::standard();
        assert_eq!(registry.len(), 28);
        let ids: HashSet<_> = registry.parts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_limbs_mirrored() {
        let registry = BodyRegistry::standard();
        let left = registry.get("left_knee").unwrap();
        let right = registry.get("right_knee").unwrap();
        assert_eq!(left.center.x, -right.center.x);
        assert_eq!(left.label, "Left Knee");
    }

    #[test]
    fn test_label_fallback() {
        let registry = BodyRegistry::standard();
        assert_eq!(registry.label_of("upper_back"), "Upper Back");
        assert_eq!(registry.label_of("tail"), "tail");
    }

    #[test]
    fn test_back_parts_use_back_color() {
        let registry = BodyRegistry::standard();
        assert_eq!(registry.get("lower_back").unwrap().base_color, BACK_HEX);
        assert_eq!(registry.get("head").unwrap().base_color, SKIN_HEX);
    }
}
