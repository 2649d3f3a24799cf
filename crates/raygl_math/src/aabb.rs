use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box given by its min and max corners.
///
/// Boxes built from real geometry satisfy `min[i] <= max[i]` on every axis.
/// [`Aabb::EMPTY`] is the identity for [`Aabb::surrounding`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Boxes thinner than this on an axis are padded so the slab test never
/// sees a zero-volume box.
const MIN_EXTENT: f32 = 0.0001;

impl Aabb {
    /// Contains nothing; surrounding anything with it yields the other box.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a box from its corners as given, without padding.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from two arbitrary opposite corners.
    ///
    /// Axes narrower than the minimum extent are padded symmetrically.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Componentwise union of two boxes. Commutative and associative.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Slab test. Returns true if the ray overlaps the box somewhere in `ray_t`.
    ///
    /// Zero direction components divide to ±infinity; the comparisons below
    /// stay well defined for those (NaN from 0 * inf is discarded by `max`/`min`).
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let inv_d = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// True if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    fn pad_to_minimums(&mut self) {
        for axis in 0..3 {
            if self.max[axis] - self.min[axis] < MIN_EXTENT {
                self.min[axis] -= MIN_EXTENT / 2.0;
                self.max[axis] += MIN_EXTENT / 2.0;
            }
        }
    }

    /// Index (0=X, 1=Y, 2=Z) of the longest axis.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corners, min corner first.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
