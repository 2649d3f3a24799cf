//! Hittable trait and HitRecord for ray-object intersection.

use crate::{MaterialId, Ray};
use raygl_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Produced by a single query and consumed by the integrator straight away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit geometric normal. Points outward from the surface, not
    /// necessarily against the ray; flip wrappers and negative radii invert it.
    pub normal: Vec3,
    /// Surface coordinates
    pub u: f32,
    pub v: f32,
    /// Material of the surface that was hit
    pub material: MaterialId,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with t strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Box enclosing the object for every ray time inside `shutter`.
    ///
    /// Must be finite; the BVH is built once from these boxes and reused for
    /// every time sample.
    fn bounding_box(&self, shutter: Interval) -> Aabb;
}

/// An unordered group of hittables; a hit is the nearest among its members.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Box<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Box<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for object in &self.objects {
            let max = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max)) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        self.objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box(shutter))
        })
    }
}
