//! Random sampling helpers.
//!
//! Every sampler takes the caller's random stream explicitly; there is no
//! process-wide generator. One stream per pixel keeps renders reproducible
//! regardless of how pixels are scheduled across threads.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point strictly inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) * 2.0 - Vec3::ONE;
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point strictly inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Deterministic stream for one pixel of one render.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let pixel = ((y as u64) << 32) | x as u64;
    StdRng::seed_from_u64(seed ^ pixel.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
