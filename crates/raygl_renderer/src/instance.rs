//! Transform wrappers around a single hittable.
//!
//! An [`Instance`] carries its child in a local frame: incoming rays are
//! moved into that frame, the child is queried, and the hit point and normal
//! are carried back out. The transform is fixed at construction.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use raygl_math::{Aabb, Interval, Mat3, Mat4, Mat4Ext, Vec3};

/// Reverses the normal reported by its child.
pub struct FlipNormals {
    inner: Box<dyn Hittable>,
}

impl FlipNormals {
    pub fn new(inner: Box<dyn Hittable>) -> Self {
        Self { inner }
    }
}

impl Hittable for FlipNormals {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.inner.hit(ray, ray_t).map(|rec| HitRecord {
            normal: -rec.normal,
            ..rec
        })
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        self.inner.bounding_box(shutter)
    }
}

/// A child placed in the world by an affine transform.
pub struct Instance {
    inner: Box<dyn Hittable>,
    /// Local-to-world transform
    to_world: Mat4,
    /// World-to-local transform (for ray transformation)
    to_local: Mat4,
    /// Carries local normals to world space (inverse transpose)
    normal_matrix: Mat3,
}

impl Instance {
    pub fn new(inner: Box<dyn Hittable>, to_world: Mat4) -> Self {
        let to_local = to_world.inverse();
        Self {
            inner,
            to_world,
            to_local,
            normal_matrix: Mat3::from_mat4(to_local).transpose(),
        }
    }

    /// Move the child by `offset`.
    pub fn translate(inner: Box<dyn Hittable>, offset: Vec3) -> Self {
        Self::new(inner, Mat4::from_translation(offset))
    }

    /// Rotate the child about the world Y axis by `degrees`.
    pub fn rotate_y(inner: Box<dyn Hittable>, degrees: f32) -> Self {
        Self::new(inner, Mat4::from_rotation_y(degrees.to_radians()))
    }

    /// Apply `transform` after the current one.
    pub fn then(self, transform: Mat4) -> Self {
        let to_world = transform * self.to_world;
        Self::new(self.inner, to_world)
    }
}

impl Hittable for Instance {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // Direction is transformed without renormalising so t is shared
        // between both frames.
        let local_ray = Ray::new(
            self.to_local.transform_point3(ray.origin()),
            self.to_local.transform_vector3(ray.direction()),
            ray.time(),
        );

        let rec = self.inner.hit(&local_ray, ray_t)?;

        Some(HitRecord {
            p: self.to_world.transform_point3(rec.p),
            normal: (self.normal_matrix * rec.normal).normalize(),
            ..rec
        })
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        self.to_world
            .transform_aabb(&self.inner.bounding_box(shutter))
    }
}
