use crate::Vec3;

/// A ray: origin, direction and the shutter time it was sampled at.
///
/// The direction is not required to be unit length. Rays are plain values,
/// created by the camera or by a material scatter and never mutated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Point along the ray at parameter t: origin + t * direction.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, -Vec3::Z, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.0);

        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(ray.at(-0.5), Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_ray_accessors() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 0.25);
        assert_eq!(ray.origin(), ray.origin);
        assert_eq!(ray.direction(), Vec3::Y);
        assert_eq!(ray.time(), 0.25);
    }
}
