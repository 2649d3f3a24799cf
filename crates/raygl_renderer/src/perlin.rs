//! Perlin gradient noise.

use crate::sampling::random_in_unit_sphere;
use raygl_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Lattice noise over random unit gradients, hashed through three
/// independent permutation tables.
#[derive(Debug, Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build the tables from `rng`; the same seed always yields the same noise.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| loop {
                let v = random_in_unit_sphere(rng);
                if v.length_squared() > 1e-6 {
                    break v.normalize();
                }
            })
            .collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smooth noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;
        let (i, j, k) = (floor.x as i64, floor.y as i64, floor.z as i64);

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i64) & 255) as usize]
                        ^ self.perm_y[((j + dj as i64) & 255) as usize]
                        ^ self.perm_z[((k + dk as i64) & 255) as usize];
                    *corner = self.gradients[idx];
                }
            }
        }

        interpolate(&corners, frac)
    }

    /// Sum of `depth` octaves of |noise|, each at double frequency and half weight.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

/// Hermite-smoothed trilinear blend of the corner gradients' contributions.
fn interpolate(corners: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
    let mut accum = 0.0;

    for (i, plane) in corners.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = frac - Vec3::new(fi, fj, fk);
                accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                    * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                    * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                    * gradient.dot(weight);
            }
        }
    }

    accum
}

/// A shuffled 0..POINT_COUNT.
fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::gen_f32;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_is_deterministic_per_seed() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(3));
        let b = Perlin::new(&mut StdRng::seed_from_u64(3));
        let p = Vec3::new(1.3, -2.7, 0.45);
        assert_eq!(a.noise(p), b.noise(p));
    }

    #[test]
    fn test_noise_vanishes_on_lattice_points() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(3));
        assert!(perlin.noise(Vec3::new(2.0, -5.0, 7.0)).abs() < 1e-6);
    }

    #[test]
    fn test_noise_bounded_and_continuous() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(11));
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..500 {
            let unit = Vec3::new(gen_f32(&mut rng), gen_f32(&mut rng), gen_f32(&mut rng));
            let p = unit * 40.0 - 20.0;
            let n = perlin.noise(p);
            assert!((-1.5..=1.5).contains(&n));
            let nearby = perlin.noise(p + Vec3::splat(1e-4));
            assert!((n - nearby).abs() < 1e-2);
        }
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let mut perm = generate_perm(&mut StdRng::seed_from_u64(5));
        perm.sort_unstable();
        assert_eq!(perm, (0..POINT_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_permutation_depends_on_seed() {
        let a = generate_perm(&mut StdRng::seed_from_u64(5));
        assert_eq!(a, generate_perm(&mut StdRng::seed_from_u64(5)));
        assert_ne!(a, generate_perm(&mut StdRng::seed_from_u64(6)));
        assert_ne!(a, (0..POINT_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_turbulence_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(8));
        assert!(perlin.turbulence(Vec3::new(0.3, 0.6, 0.9), 7) >= 0.0);
    }
}
