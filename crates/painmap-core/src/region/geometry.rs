//! Minimal 3D vector math and ray/primitive intersection.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 3D vector or point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction (zero stays zero).
    pub fn normalize(self) -> Vec3 {
        let len = self.length();
        if len < f64::EPSILON { self } else { self * (1.0 / len) }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// A half-line from `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Primitive body-part shape, centered on the part's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Sphere { radius: f64 },
    /// Axis-aligned box.
    Box { half_extents: Vec3 },
    /// Cylinder along the y axis.
    Cylinder { radius: f64, half_height: f64 },
}

impl Shape {
    /// Half extents of the axis-aligned bounding box.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Shape::Sphere { radius } => Vec3::new(radius, radius, radius),
            Shape::Box { half_extents } => half_extents,
            Shape::Cylinder { radius, half_height } => Vec3::new(radius, half_height, radius),
        }
    }

    /// Distance along `ray` to the nearest surface hit of the shape placed at
    /// `center`, if any. A ray starting inside reports the exit point.
    pub fn intersect(&self, ray: &Ray, center: Vec3) -> Option<f64> {
        let local = Ray {
            origin: ray.origin - center,
            direction: ray.direction,
        };
        match *self {
            Shape::Sphere { radius } => intersect_sphere(&local, radius),
            Shape::Box { half_extents } => intersect_box(&local, half_extents),
            Shape::Cylinder { radius, half_height } => intersect_cylinder(&local, radius, half_height),
        }
    }
}

/// Smallest non-negative root among the candidates.
fn nearest(candidates: impl IntoIterator<Item = f64>) -> Option<f64> {
    candidates
        .into_iter()
        .filter(|t| t.is_finite() && *t >= 0.0)
        .min_by(|a, b| a.total_cmp(b))
}

fn intersect_sphere(ray: &Ray, radius: f64) -> Option<f64> {
    let b = ray.origin.dot(ray.direction);
    let c = ray.origin.dot(ray.origin) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    nearest([-b - sq, -b + sq])
}

fn intersect_box(ray: &Ray, half: Vec3) -> Option<f64> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    let axes = [
        (ray.origin.x, ray.direction.x, half.x),
        (ray.origin.y, ray.direction.y, half.y),
        (ray.origin.z, ray.direction.z, half.z),
    ];
    for (origin, dir, h) in axes {
        if dir.abs() < f64::EPSILON {
            if origin.abs() > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - origin) / dir;
        let t2 = (h - origin) / dir;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    nearest([t_min, t_max])
}

fn intersect_cylinder(ray: &Ray, radius: f64, half_height: f64) -> Option<f64> {
    let (o, d) = (ray.origin, ray.direction);
    let mut hits = Vec::with_capacity(4);

    // Side wall.
    let a = d.x * d.x + d.z * d.z;
    if a > f64::EPSILON {
        let b = o.x * d.x + o.z * d.z;
        let c = o.x * o.x + o.z * o.z - radius * radius;
        let disc = b * b - a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / a, (-b + sq) / a] {
                if (o.y + d.y * t).abs() <= half_height {
                    hits.push(t);
                }
            }
        }
    }

    // Caps.
    if d.y.abs() > f64::EPSILON {
        for cap in [-half_height, half_height] {
            let t = (cap - o.y) / d.y;
            let x = o.x + d.x * t;
            let z = o.z + d.z * t;
            if x * x + z * z <= radius * radius {
                hits.push(t);
            }
        }
    }

    nearest(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn towards_minus_z(x: f64, y: f64) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_sphere_hit_and_miss() {
        let sphere = Shape::Sphere { radius: 1.0 };
        let t = sphere.intersect(&towards_minus_z(0.0, 0.0), Vec3::ZERO).unwrap();
        assert!((t - 9.0).abs() < 1e-9);
        assert!(sphere.intersect(&towards_minus_z(1.5, 0.0), Vec3::ZERO).is_none());
    }

    #[test]
    fn test_box_hit_offset_center() {
        let shape = Shape::Box {
            half_extents: Vec3::new(0.5, 0.5, 0.5),
        };
        let center = Vec3::new(2.0, 0.0, 0.0);
        let t = shape.intersect(&towards_minus_z(2.2, 0.3), center).unwrap();
        assert!((t - 9.5).abs() < 1e-9);
        assert!(shape.intersect(&towards_minus_z(0.0, 0.0), center).is_none());
    }

    #[test]
    fn test_cylinder_side_and_cap() {
        let shape = Shape::Cylinder {
            radius: 0.5,
            half_height: 1.0,
        };
        let t = shape.intersect(&towards_minus_z(0.0, 0.5), Vec3::ZERO).unwrap();
        assert!((t - 9.5).abs() < 1e-9);
        assert!(shape.intersect(&towards_minus_z(0.0, 1.5), Vec3::ZERO).is_none());

        let down = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let t = shape.intersect(&down, Vec3::ZERO).unwrap();
        assert!((t - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_behind_origin_misses() {
        let sphere = Shape::Sphere { radius: 1.0 };
        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&away, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_vector_ops() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::UP;
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
        assert!((Vec3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-12);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }
}
