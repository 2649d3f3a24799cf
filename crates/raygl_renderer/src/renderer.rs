//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Bounded bounce depth, emission added at every hit
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//!
//! Every pixel draws from its own random stream derived from the render
//! seed, so a render is a pure function of scene, config and seed.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    error::RenderResult,
    hittable::Hittable,
    material::{Color, MaterialLibrary},
    sampling::{gen_f32, pixel_rng},
    Ray, Scene,
};
use raygl_math::Interval;
use rand::RngCore;

/// Lower bound on hit distance, keeps scattered rays off the surface they left.
pub const HIT_EPSILON: f32 = 0.001;

/// Radiance returned by rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// White at the horizon blending to light blue overhead.
    Sky,
    /// Constant color; black leaves emitters as the only light.
    Solid([f32; 3]),
}

impl Background {
    pub const BLACK: Background = Background::Solid([0.0; 3]);

    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(rgb) => Color::from_array(*rgb),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed for every random stream of the render
    pub seed: u64,
    /// Edge length of parallel render buckets, in pixels
    pub bucket_size: u32,
    /// Replaces the scene's own background when set
    pub background: Option<Background>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
            background: None,
        }
    }
}

impl RenderConfig {
    /// Load a config from JSON; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        log::debug!("Loaded render config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// The radiance estimator bound to one scene.
#[derive(Clone, Copy)]
pub struct Integrator<'a> {
    world: &'a dyn Hittable,
    materials: &'a MaterialLibrary,
    background: Background,
    max_depth: u32,
}

impl<'a> Integrator<'a> {
    pub fn new(
        world: &'a dyn Hittable,
        materials: &'a MaterialLibrary,
        background: Background,
        max_depth: u32,
    ) -> Self {
        Self {
            world,
            materials,
            background,
            max_depth,
        }
    }

    pub fn for_scene(scene: &'a Scene, config: &RenderConfig) -> Self {
        Self::new(
            &scene.world,
            &scene.materials,
            config.background.unwrap_or(scene.background),
            config.max_depth,
        )
    }

    /// Compute the color seen by a ray.
    ///
    /// Each hit contributes its emission; the path continues while the
    /// material scatters and fewer than `max_depth` bounces have been taken.
    /// Reaching the bound simply stops the path.
    pub fn ray_color(&self, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        let mut radiance = Color::ZERO;
        let mut throughput = Color::ONE;
        let mut ray = *ray;

        for depth in 0..=self.max_depth {
            let Some(rec) = self.world.hit(&ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
                return radiance + throughput * self.background.color(&ray);
            };

            let material = self.materials.get(rec.material);
            radiance += throughput * material.emitted(rec.u, rec.v, rec.p);

            if depth == self.max_depth {
                break;
            }
            match material.scatter(&ray, &rec, rng) {
                Some(result) => {
                    throughput *= result.attenuation;
                    ray = result.scattered;
                }
                None => break,
            }
        }

        radiance
    }
}

/// Compute the color seen by a ray in `scene`.
pub fn ray_color(ray: &Ray, scene: &Scene, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    Integrator::new(&scene.world, &scene.materials, scene.background, max_depth).ray_color(ray, rng)
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.99 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Average `samples_per_pixel` paths through pixel (x, y), y = 0 being the top row.
pub fn render_pixel(
    integrator: &Integrator,
    scene: &Scene,
    config: &RenderConfig,
    x: u32,
    y: u32,
) -> Color {
    let mut rng = pixel_rng(config.seed, x, y);
    let mut pixel_color = Color::ZERO;
    let flipped_y = (config.height - 1 - y) as f32;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(&mut rng)) / config.width as f32;
        let t = (flipped_y + gen_f32(&mut rng)) / config.height as f32;
        let ray = scene.camera.get_ray(s, t, &mut rng);
        pixel_color += integrator.ray_color(&ray, &mut rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Linear color image, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Gamma-corrected 8-bit pixels, top row first.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().copied().map(color_to_rgb).collect()
    }

    /// Write the image as an ASCII PPM.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        raygl_core::save_ppm(path, self.width, self.height, self.to_rgb8())?;
        Ok(())
    }
}

/// Render the entire scene to an image buffer on the calling thread.
pub fn render(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    log::info!(
        "Rendering {}x{} @ {} spp, depth {}",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth
    );

    let integrator = Integrator::for_scene(scene, config);
    let mut image = ImageBuffer::new(config.width, config.height);

    for y in 0..config.height {
        for x in 0..config.width {
            let color = render_pixel(&integrator, scene, config, x, y);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
