//! Axis-aligned rectangles and boxes built from them.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    instance::FlipNormals,
    MaterialId, Ray,
};
use raygl_math::{Aabb, Interval, Vec3};

/// Half thickness given to a rectangle's box along its flat axis.
const RECT_SLAB: f32 = 0.0001;

/// Orientation of an axis-aligned rectangle, named by the plane it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// (first in-plane axis, second in-plane axis, normal axis)
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle lying in the plane `coord[normal axis] = k`, with its normal
/// along the positive normal axis.
#[derive(Debug, Clone, Copy)]
pub struct AaRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: MaterialId,
}

impl AaRect {
    pub fn new(plane: Plane, a: Interval, b: Interval, k: f32, material: MaterialId) -> Self {
        Self {
            plane,
            a,
            b,
            k,
            material,
        }
    }

    /// Rectangle x0..x1 by y0..y1 at z = k.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: MaterialId) -> Self {
        Self::new(Plane::Xy, Interval::new(x0, x1), Interval::new(y0, y1), k, material)
    }

    /// Rectangle x0..x1 by z0..z1 at y = k.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: MaterialId) -> Self {
        Self::new(Plane::Xz, Interval::new(x0, x1), Interval::new(z0, z1), k, material)
    }

    /// Rectangle y0..y1 by z0..z1 at x = k.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: MaterialId) -> Self {
        Self::new(Plane::Yz, Interval::new(y0, y1), Interval::new(z0, z1), k, material)
    }
}

impl Hittable for AaRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let (ia, ib, n) = self.plane.axes();
        let origin = ray.origin();
        let dir = ray.direction();

        // A ray parallel to the plane yields ±inf or NaN here and is rejected.
        let t = (self.k - origin[n]) / dir[n];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ia] + t * dir[ia];
        let b = origin[ib] + t * dir[ib];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[n] = 1.0;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal,
            u: (a - self.a.min) / self.a.size(),
            v: (b - self.b.min) / self.b.size(),
            material: self.material,
        })
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        let (ia, ib, n) = self.plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[ia] = self.a.min;
        max[ia] = self.a.max;
        min[ib] = self.b.min;
        max[ib] = self.b.max;
        min[n] = self.k - RECT_SLAB;
        max[n] = self.k + RECT_SLAB;
        Aabb::new(min, max)
    }
}

/// An axis-aligned box made of six outward-facing rectangles.
pub struct BoxShape {
    sides: HittableList,
    bbox: Aabb,
}

impl BoxShape {
    /// Box spanning the corners `p0` (min) and `p1` (max).
    pub fn new(p0: Vec3, p1: Vec3, material: MaterialId) -> Self {
        let (lo, hi) = (p0.min(p1), p0.max(p1));
        let mut sides = HittableList::new();

        sides.add(Box::new(AaRect::xy(lo.x, hi.x, lo.y, hi.y, hi.z, material)));
        sides.add(Box::new(FlipNormals::new(Box::new(AaRect::xy(
            lo.x, hi.x, lo.y, hi.y, lo.z, material,
        )))));
        sides.add(Box::new(AaRect::xz(lo.x, hi.x, lo.z, hi.z, hi.y, material)));
        sides.add(Box::new(FlipNormals::new(Box::new(AaRect::xz(
            lo.x, hi.x, lo.z, hi.z, lo.y, material,
        )))));
        sides.add(Box::new(AaRect::yz(lo.y, hi.y, lo.z, hi.z, hi.x, material)));
        sides.add(Box::new(FlipNormals::new(Box::new(AaRect::yz(
            lo.y, hi.y, lo.z, hi.z, lo.x, material,
        )))));

        Self {
            sides,
            bbox: Aabb::from_points(lo, hi),
        }
    }
}

impl Hittable for BoxShape {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.sides.hit(ray, ray_t)
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        self.bbox
    }
}
