// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and
// inverse(); this adds what instancing wrappers need for their bounds.

use crate::Aabb;
use glam::Mat4;

/// Extension trait for Mat4 used by transform wrappers.
pub trait Mat4Ext {
    /// Bounding box of the eight transformed corners of `aabb`.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners().map(|corner| self.transform_point3(corner));

        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), &c| (lo.min(c), hi.max(c)));

        Aabb::from_points(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat4::IDENTITY.transform_aabb(&aabb);
        assert!((transformed.min - aabb.min).length() < 0.001);
        assert!((transformed.max - aabb.max).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::splat(5.0));
        let transformed = mat.transform_aabb(&Aabb::from_points(Vec3::ZERO, Vec3::ONE));
        assert!((transformed.min - Vec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max - Vec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_y() {
        // Quarter turn about Y maps x extent onto z.
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let transformed = Mat4::from_rotation_y(FRAC_PI_2).transform_aabb(&aabb);

        assert!((transformed.min.z - -2.0).abs() < 0.001);
        assert!((transformed.max.z - 0.0).abs() < 0.001);
        assert!((transformed.min.x - 0.0).abs() < 0.001);
        assert!((transformed.max.x - 1.0).abs() < 0.001);
    }
}
