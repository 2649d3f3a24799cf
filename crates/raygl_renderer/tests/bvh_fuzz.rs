//! The BVH must agree with a linear scan over the same primitives.

use raygl_renderer::sampling::gen_f32;
use raygl_renderer::{
    AaRect, BoxShape, BvhNode, Hittable, HittableList, Instance, Interval, MaterialId,
    MovingSphere, Ray, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn random_vec(rng: &mut dyn RngCore, lo: f32, hi: f32) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) * (hi - lo) + Vec3::splat(lo)
}

fn random_primitive(i: u32, rng: &mut dyn RngCore) -> Box<dyn Hittable> {
    let material = MaterialId::new(i);
    let center = random_vec(rng, -10.0, 10.0);
    match i % 5 {
        0 => Box::new(Sphere::new(center, 0.2 + gen_f32(rng), material)),
        1 => Box::new(MovingSphere::new(
            center,
            center + random_vec(rng, -1.0, 1.0),
            Interval::UNIT,
            0.2 + 0.5 * gen_f32(rng),
            material,
        )),
        2 => {
            let half = 0.2 + gen_f32(rng);
            let (lo, hi) = (center - Vec3::splat(half), center + Vec3::splat(half));
            match (i / 5) % 3 {
                0 => Box::new(AaRect::xy(lo.x, hi.x, lo.y, hi.y, center.z, material)),
                1 => Box::new(AaRect::xz(lo.x, hi.x, lo.z, hi.z, center.y, material)),
                _ => Box::new(AaRect::yz(lo.y, hi.y, lo.z, hi.z, center.x, material)),
            }
        }
        3 => {
            let size = random_vec(rng, 0.2, 1.5);
            Box::new(BoxShape::new(center, center + size, material))
        }
        _ => {
            let size = random_vec(rng, 0.2, 1.5);
            let block = BoxShape::new(Vec3::ZERO, size, material);
            Box::new(Instance::rotate_y(Box::new(block), 360.0 * gen_f32(rng)).then(
                raygl_math::Mat4::from_translation(center),
            ))
        }
    }
}

fn random_scene(seed: u64, n: u32) -> Vec<Box<dyn Hittable>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|i| random_primitive(i, &mut rng)).collect()
}

#[test]
fn bvh_matches_linear_scan() {
    for seed in 0..4 {
        let bvh = BvhNode::new(random_scene(seed, 80), Interval::UNIT).unwrap();
        let list = HittableList::from(random_scene(seed, 80));
        assert!(bvh.depth() < 80);

        let mut rng = StdRng::seed_from_u64(1000 + seed);
        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vec(&mut rng, -20.0, 20.0);
            let target = random_vec(&mut rng, -10.0, 10.0);
            let ray = Ray::new(origin, target - origin, gen_f32(&mut rng));

            let t_min = 0.001 + 0.2 * gen_f32(&mut rng);
            let t_max = if gen_f32(&mut rng) < 0.5 {
                f32::INFINITY
            } else {
                t_min + 2.0 * gen_f32(&mut rng)
            };
            let ray_t = Interval::new(t_min, t_max);

            let expected = list.hit(&ray, ray_t);
            let actual = bvh.hit(&ray, ray_t);
            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => {
                    hits += 1;
                    assert_eq!(e.material, a.material);
                    assert!((e.t - a.t).abs() < 1e-5);
                    assert!((e.p - a.p).length() < 1e-4);
                    assert!((e.normal - a.normal).length() < 1e-4);
                }
                (e, a) => panic!("seed {seed}: linear scan {e:?} but bvh {a:?} for {ray:?}"),
            }
        }
        assert!(hits > 100, "too few hits ({hits}) to be meaningful");
    }
}

#[test]
fn bvh_box_contains_every_primitive() {
    let objects = random_scene(7, 60);
    let boxes: Vec<_> = objects.iter().map(|o| o.bounding_box(Interval::UNIT)).collect();
    let bvh = BvhNode::new(objects, Interval::UNIT).unwrap();
    let root = bvh.bounding_box(Interval::UNIT);
    for b in boxes {
        assert!(root.contains_box(&b));
    }
}
