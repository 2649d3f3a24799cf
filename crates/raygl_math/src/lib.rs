//! RayGL math primitives.
//!
//! Vectors come straight from glam; this crate adds the ray-tracing specific
//! value types built on top of them.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_vec3_normalize() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert!((v.normalize().length() - 1.0).abs() < 1e-6);
    }
}
