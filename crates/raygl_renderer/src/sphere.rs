//! Sphere primitives for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use raygl_math::{Aabb, Interval, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
///
/// A negative radius keeps the same surface but turns the normal inward,
/// which is how hollow glass shells are modelled.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        hit_sphere(self.center, self.radius, self.material, ray, ray_t)
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        sphere_box(self.center, self.radius)
    }
}

/// A sphere whose center moves linearly from `center0` at `time.min` to
/// `center1` at `time.max`.
#[derive(Debug, Clone, Copy)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time: Interval,
    radius: f32,
    material: MaterialId,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time: Interval,
        radius: f32,
        material: MaterialId,
    ) -> Self {
        Self {
            center0,
            center1,
            time,
            radius,
            material,
        }
    }

    /// Center at the given time. Times outside the motion window extrapolate.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time.size();
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time.min) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        hit_sphere(self.center(ray.time()), self.radius, self.material, ray, ray_t)
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        let box0 = sphere_box(self.center(shutter.min), self.radius);
        let box1 = sphere_box(self.center(shutter.max), self.radius);
        Aabb::surrounding(&box0, &box1)
    }
}

fn sphere_box(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius.abs());
    Aabb::from_points(center - rvec, center + rvec)
}

/// Solve |O + tD - C|^2 = r^2, preferring the nearer root.
fn hit_sphere(
    center: Vec3,
    radius: f32,
    material: MaterialId,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord> {
    let oc = ray.origin() - center;
    let a = ray.direction().length_squared();
    let half_b = oc.dot(ray.direction());
    let c = oc.length_squared() - radius * radius;

    // Also rejects zero-length directions, where a = half_b = 0.
    let discriminant = half_b * half_b - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = ray.at(root);
    let normal = (p - center) / radius;
    let (u, v) = sphere_uv((p - center) / radius.abs());

    Some(HitRecord {
        t: root,
        p,
        normal,
        u,
        v,
        material,
    })
}

/// UV for a point on the unit sphere: u around Y from -X, v from -Y up.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAT: MaterialId = MaterialId::new(0);

    #[test]
    fn test_sphere_hit_nearest_root() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MAT);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_falls_back_to_far_root() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MAT);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        // Near root at t=0.5 lies below t_min.
        let rec = sphere.hit(&ray, Interval::new(0.75, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-5);
        assert!((rec.normal - -Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_rejects_roots_outside_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MAT);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.4)).is_none());
        assert!(sphere.hit(&ray, Interval::new(2.0, 10.0)).is_none());
    }

    #[test]
    fn test_sphere_miss_and_degenerate_ray() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MAT);
        let up = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert!(sphere.hit(&up, Interval::new(0.001, f32::INFINITY)).is_none());

        let zero = Ray::new(Vec3::ZERO, Vec3::ZERO, 0.0);
        assert!(sphere.hit(&zero, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_negative_radius_flips_normal() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), -0.5, MAT);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!((rec.normal - -Vec3::Z).length() < 1e-5);
        assert!(sphere.bounding_box(Interval::UNIT).contains_point(Vec3::new(0.0, 0.0, -1.5)));
    }

    #[test]
    fn test_sphere_uv_range() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, MAT);
        let ray = Ray::new(Vec3::new(0.3, 0.2, 5.0), -Vec3::Z, 0.0);
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((0.0..=1.0).contains(&rec.u));
        assert!((0.0..=1.0).contains(&rec.v));
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(10.0, 0.0, -5.0),
            Interval::UNIT,
            1.0,
            MAT,
        );
        assert_eq!(sphere.center(0.5), Vec3::new(5.0, 0.0, -5.0));

        let early = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let late = Ray::new(Vec3::ZERO, -Vec3::Z, 1.0);
        assert!(sphere.hit(&early, Interval::new(0.001, f32::INFINITY)).is_some());
        assert!(sphere.hit(&late, Interval::new(0.001, f32::INFINITY)).is_none());

        let bbox = sphere.bounding_box(Interval::UNIT);
        assert!(bbox.contains_point(Vec3::new(-1.0, 0.0, -5.0)));
        assert!(bbox.contains_point(Vec3::new(11.0, 0.0, -5.0)));
    }
}
