//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use std::time::Instant;

use rayon::prelude::*;

use crate::{
    renderer::{render_pixel, ImageBuffer, Integrator, RenderConfig},
    Color, Scene,
};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets on the right and bottom edges shrink to fit the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    // Sort by distance from center (spiral order)
    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center, nearest first.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist = |b: &Bucket| {
        let cx = b.x as f32 + b.width as f32 / 2.0;
        let cy = b.y as f32 + b.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    integrator: &Integrator,
    scene: &Scene,
    config: &RenderConfig,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(
                integrator,
                scene,
                config,
                bucket.x + local_x,
                bucket.y + local_y,
            );
            pixels.push(color);
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into place in `image`.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let width = self.bucket.width as usize;
        for (row, chunk) in self.pixels.chunks(width).enumerate() {
            for (col, color) in chunk.iter().enumerate() {
                image.set(
                    self.bucket.x + col as u32,
                    self.bucket.y + row as u32,
                    *color,
                );
            }
        }
    }
}

/// Render the whole image across the rayon pool, one bucket per task.
///
/// Produces exactly the image [`crate::render`] would.
pub fn render_parallel(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets on {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        buckets.len(),
        rayon::current_num_threads()
    );

    let integrator = Integrator::for_scene(scene, config);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, &integrator, scene, config))
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
