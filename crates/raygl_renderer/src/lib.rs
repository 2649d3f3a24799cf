//! RayGL Renderer - stochastic ray tracing core.
//!
//! Scene intersection and light transport shared by two front ends:
//!
//! - **Offline**: [`render`] / [`render_parallel`] average many samples per
//!   pixel into an [`ImageBuffer`] that is written out as PPM.
//! - **Progressive**: a [`DispatchScheduler`] walks a [`TileGrid`] one tile
//!   per frame, and a [`ComputeBackend`] such as [`CpuKernel`] folds one more
//!   sample per pixel into a persistent accumulation image.
//!
//! Both paths run the same [`Integrator`] over a [`BvhNode`] built once per
//! scene and never mutated afterwards.

mod bucket;
mod bvh;
mod camera;
mod dispatch;
mod error;
mod hittable;
mod instance;
mod material;
mod perlin;
mod rect;
mod renderer;
mod scene;
mod scenes;
mod sphere;
mod texture;

pub mod sampling;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraUniforms};
pub use dispatch::{
    ComputeBackend, CpuKernel, DispatchScheduler, FrameStats, ProgressiveRenderer, SeedBuffer,
    TileDispatch, TileGrid,
};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipNormals, Instance};
pub use material::{
    reflect, refract, schlick, Color, Dielectric, DiffuseLight, Lambertian, Material, MaterialId,
    MaterialLibrary, Metal, ScatterResult,
};
pub use perlin::Perlin;
pub use rect::{AaRect, BoxShape, Plane};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    Integrator, RenderConfig, HIT_EPSILON,
};
pub use scene::{Scene, SceneBuilder};
pub use scenes::{build_scene, scene_names, SceneOptions};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{CheckerTexture, ImageTexture, NoiseStyle, NoiseTexture, SolidColor, Texture};

/// Re-export Vec3 and common math types from raygl_math
pub use raygl_math::{Aabb, Interval, Ray, Vec3};
