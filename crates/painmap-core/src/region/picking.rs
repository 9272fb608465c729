//! Ray picking against the body registry.

use super::geometry::Ray;
use super::registry::BodyRegistry;

/// Id of the nearest body part hit by `ray`.
pub fn pick<'a>(ray: &Ray, registry: &'a BodyRegistry) -> Option<&'a str> {
    registry
        .parts()
        .iter()
        .filter_map(|part| part.intersect(ray).map(|t| (t, part)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, part)| part.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::geometry::Vec3;

    #[test]
    fn test_front_ray_hits_chest_before_back() {
        let registry = BodyRegistry::standard();
        let ray = Ray::new(Vec3::new(0.0, 2.5, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(pick(&ray, &registry), Some("chest"));
    }

    #[test]
    fn test_back_ray_hits_upper_back_first() {
        let registry = BodyRegistry::standard();
        let ray = Ray::new(Vec3::new(0.0, 2.5, -10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(pick(&ray, &registry), Some("upper_back"));
    }

    #[test]
    fn test_side_ray_hits_near_limb() {
        let registry = BodyRegistry::standard();
        let ray = Ray::new(Vec3::new(-10.0, -2.8, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(pick(&ray, &registry), Some("left_shin"));
    }

    #[test]
    fn test_miss_returns_none() {
        let registry = BodyRegistry::standard();
        let ray = Ray::new(Vec3::new(5.0, 10.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(pick(&ray, &registry).is_none());
    }
}
