//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives, built once and then only read.
//! Every node's box covers its children over the whole shutter interval, so
//! the same tree serves every ray time.

use std::time::Instant;

use crate::{
    error::{RenderError, RenderResult},
    hittable::{HitRecord, Hittable},
    Ray,
};
use raygl_math::{Aabb, Interval};

/// BVH node - either a branch with two children or a leaf with one primitive.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding a single primitive.
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
}

type Entry = (Aabb, Box<dyn Hittable>);

impl BvhNode {
    /// Create a BVH over `objects`, with boxes taken over `shutter`.
    ///
    /// An empty set has no meaningful tree and is rejected.
    pub fn new(objects: Vec<Box<dyn Hittable>>, shutter: Interval) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let start = Instant::now();
        let count = objects.len();
        let entries = objects
            .into_iter()
            .map(|object| (object.bounding_box(shutter), object))
            .collect();

        let root = Self::build(entries);
        log::debug!(
            "BVH built over {} primitives: {} nodes, depth {} in {:.2?}",
            count,
            root.node_count(),
            root.depth(),
            start.elapsed()
        );
        Ok(root)
    }

    /// Recursive BVH construction.
    ///
    /// Median split: sort by box center along the axis where the centers
    /// spread furthest, split in half, recurse.
    fn build(mut entries: Vec<Entry>) -> Self {
        if entries.len() == 1 {
            if let Some((bbox, object)) = entries.pop() {
                return BvhNode::Leaf { object, bbox };
            }
        }

        let bounds = entries
            .iter()
            .fold(Aabb::EMPTY, |acc, (b, _)| Aabb::surrounding(&acc, b));

        // Compute centroid bounds to choose split axis
        let centroid_bounds = entries.iter().fold(Aabb::EMPTY, |acc, (b, _)| {
            let c = b.centroid();
            Aabb::surrounding(&acc, &Aabb::new(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        entries.sort_unstable_by(|(a, _), (b, _)| {
            a.centroid()[axis].total_cmp(&b.centroid()[axis])
        });

        let right_entries = entries.split_off(entries.len() / 2);
        let left = Self::build(entries);
        let right = Self::build(right_entries);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn bbox(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => bbox,
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !self.bbox().hit(ray, ray_t) {
            return None;
        }

        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t),
            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        *self.bbox()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, MaterialId, Sphere};
    use raygl_math::Vec3;

    const FORWARD: Interval = Interval::new(0.001, f32::INFINITY);

    fn spheres(n: usize) -> Vec<Box<dyn Hittable>> {
        (0..n)
            .map(|i| {
                Box::new(Sphere::new(
                    Vec3::new(i as f32, 0.0, -5.0),
                    0.5,
                    MaterialId::new(i as u32),
                )) as Box<dyn Hittable>
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![], Interval::UNIT);
        assert!(matches!(bvh, Err(RenderError::EmptyScene)));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(spheres(1), Interval::UNIT).unwrap();

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bvh.hit(&ray, FORWARD).is_some());
    }

    #[test]
    fn test_bvh_two_primitives_are_two_leaves() {
        let bvh = BvhNode::new(spheres(2), Interval::UNIT).unwrap();
        match &bvh {
            BvhNode::Branch { left, right, .. } => {
                assert!(matches!(**left, BvhNode::Leaf { .. }));
                assert!(matches!(**right, BvhNode::Leaf { .. }));
            }
            BvhNode::Leaf { .. } => panic!("expected a branch"),
        }
        assert_eq!(bvh.node_count(), 3);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let bvh = BvhNode::new(spheres(10), Interval::UNIT).unwrap();
        assert_eq!(bvh.node_count(), 19);
        assert!(bvh.depth() <= 5);

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, FORWARD).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
        assert_eq!(rec.material, MaterialId::new(5));
    }

    #[test]
    fn test_bvh_picks_nearest_along_split_axis() {
        // Row of spheres along the ray itself; the nearest must win even
        // though it lives in the other subtree from the farthest.
        let objects: Vec<Box<dyn Hittable>> = (0..8)
            .map(|i| {
                Box::new(Sphere::new(
                    Vec3::new(0.0, 0.0, -3.0 * (i + 1) as f32),
                    1.0,
                    MaterialId::new(i),
                )) as Box<dyn Hittable>
            })
            .collect();
        let bvh = BvhNode::new(objects, Interval::UNIT).unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = bvh.hit(&ray, FORWARD).unwrap();
        assert_eq!(rec.material, MaterialId::new(0));
        assert!((rec.t - 2.0).abs() < 1e-5);

        let reversed = Ray::new(Vec3::new(0.0, 0.0, -30.0), Vec3::Z, 0.0);
        let rec = bvh.hit(&reversed, FORWARD).unwrap();
        assert_eq!(rec.material, MaterialId::new(7));
    }

    #[test]
    fn test_bvh_box_covers_everything() {
        let list = HittableList::from(spheres(6));
        let bvh = BvhNode::new(spheres(6), Interval::UNIT).unwrap();
        assert_eq!(bvh.bounding_box(Interval::UNIT), list.bounding_box(Interval::UNIT));
    }
}
