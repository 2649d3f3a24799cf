//! Built-in scenes, looked up by name.

use std::path::Path;
use std::sync::Arc;

use crate::{
    error::{RenderError, RenderResult},
    renderer::Background,
    sampling::gen_f32,
    AaRect, BoxShape, Camera, CheckerTexture, Color, Dielectric, DiffuseLight, FlipNormals,
    ImageTexture, Instance, Lambertian, Metal, MovingSphere, NoiseStyle, NoiseTexture, Perlin,
    Scene, SceneBuilder, SolidColor, Sphere,
};
use raygl_core::RgbImage;
use raygl_math::{Interval, Mat4, Vec3};
use rand::RngCore;

/// Inputs a scene may need from outside the core.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Output width over height
    pub aspect: f32,
    /// Decoded image for textured scenes
    pub texture: Option<RgbImage>,
}

impl SceneOptions {
    /// Decode the image used by textured scenes.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.texture = Some(RgbImage::load(path)?);
        Ok(())
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            aspect: 2.0,
            texture: None,
        }
    }
}

type SceneFn = fn(&SceneOptions, &mut dyn RngCore) -> RenderResult<Scene>;

const SCENES: &[(&str, SceneFn)] = &[
    ("single_sphere", single_sphere),
    ("two_spheres", two_spheres),
    ("random_spheres", random_spheres),
    ("checker_spheres", checker_spheres),
    ("perlin_spheres", perlin_spheres),
    ("earth", earth),
    ("simple_light", simple_light),
    ("cornell_box", cornell_box),
];

/// Names accepted by [`build_scene`].
pub fn scene_names() -> impl Iterator<Item = &'static str> {
    SCENES.iter().map(|(name, _)| *name)
}

/// Build the named scene. `rng` drives any random layout or noise tables.
pub fn build_scene(name: &str, opts: &SceneOptions, rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let (_, build) = SCENES
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| RenderError::UnknownScene(name.to_string()))?;
    log::info!("Building scene '{}'", name);
    build(opts, rng)
}

/// Camera used by the outdoor scenes.
fn outdoor_camera(opts: &SceneOptions) -> Camera {
    Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_aspect(opts.aspect)
}

/// A white unit sphere at the origin under the sky.
fn single_sphere(opts: &SceneOptions, _rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();
    let white = builder.material(Lambertian::solid(Color::ONE));
    builder.add(Sphere::new(Vec3::ZERO, 1.0, white));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(60.0, 0.0, 1.0)
        .with_aspect(opts.aspect);
    builder.build(camera, Background::Sky)
}

/// A small sphere resting on a huge one, seen through a 90 degree pinhole.
fn two_spheres(opts: &SceneOptions, _rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();
    let grey = builder.material(Lambertian::solid(Color::splat(0.5)));
    builder
        .add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey))
        .add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, grey));

    let camera = Camera::new().with_lens(90.0, 0.0, 1.0).with_aspect(opts.aspect);
    builder.build(camera, Background::Sky)
}

/// Field of small random spheres around three large ones, with motion
/// blur on the diffuse spheres and a shallow depth of field.
fn random_spheres(opts: &SceneOptions, rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();

    let checker = CheckerTexture::from_colors(Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    let ground = builder.material(Lambertian::new(Arc::new(checker)));
    builder.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    let glass = builder.material(Dielectric::new(1.5));
    let shutter = Interval::new(0.0, 1.0);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Color::new(
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                );
                let diffuse = builder.material(Lambertian::solid(albedo));
                let center1 = center + Vec3::new(0.0, 0.5 * gen_f32(rng), 0.0);
                builder.add(MovingSphere::new(center, center1, shutter, 0.2, diffuse));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                );
                let metal = builder.material(Metal::new(albedo, 0.5 * gen_f32(rng)));
                builder.add(Sphere::new(center, 0.2, metal));
            } else {
                builder.add(Sphere::new(center, 0.2, glass));
            }
        }
    }

    let brown = builder.material(Lambertian::solid(Color::new(0.4, 0.2, 0.1)));
    let steel = builder.material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    builder
        .add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass))
        .add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown))
        .add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, steel));

    let camera = outdoor_camera(opts)
        .with_lens(20.0, 0.1, 10.0)
        .with_shutter(shutter.min, shutter.max);
    builder.build(camera, Background::Sky)
}

fn checker_spheres(opts: &SceneOptions, _rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();
    let checker = CheckerTexture::from_colors(Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    let mat = builder.material(Lambertian::new(Arc::new(checker)));
    builder
        .add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, mat))
        .add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, mat));
    builder.build(outdoor_camera(opts), Background::Sky)
}

fn perlin_spheres(opts: &SceneOptions, rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();
    let marble = NoiseTexture::new(Perlin::new(rng), 4.0, NoiseStyle::Marble);
    let mat = builder.material(Lambertian::new(Arc::new(marble)));
    builder
        .add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, mat))
        .add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, mat));
    builder.build(outdoor_camera(opts), Background::Sky)
}

/// A globe wrapped in the supplied image.
fn earth(opts: &SceneOptions, _rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let image = opts
        .texture
        .clone()
        .ok_or_else(|| RenderError::MissingTexture("earth".to_string()))?;

    let mut builder = SceneBuilder::new();
    let surface = builder.material(Lambertian::new(Arc::new(ImageTexture::new(image))));
    builder.add(Sphere::new(Vec3::ZERO, 2.0, surface));
    builder.build(outdoor_camera(opts), Background::Sky)
}

/// Marble spheres lit only by a rectangle and a glowing sphere.
fn simple_light(opts: &SceneOptions, rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();
    let marble = NoiseTexture::new(Perlin::new(rng), 4.0, NoiseStyle::Marble);
    let mat = builder.material(Lambertian::new(Arc::new(marble)));
    let light = builder.material(DiffuseLight::solid(Color::splat(4.0)));

    builder
        .add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, mat))
        .add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, mat))
        .add(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light))
        .add(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light));

    let camera = Camera::new()
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_aspect(opts.aspect);
    builder.build(camera, Background::BLACK)
}

/// Five-walled box lit by a glowing ceiling panel, holding a rotated block
/// with a glass ball on top.
fn cornell_box(opts: &SceneOptions, _rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut builder = SceneBuilder::new();
    let white = builder.material(Lambertian::solid(Color::splat(0.73)));
    let red = builder.material(Lambertian::solid(Color::new(0.65, 0.05, 0.05)));
    let green = builder.material(Lambertian::solid(Color::new(0.12, 0.45, 0.15)));
    let pale = builder.material(Lambertian::solid(Color::splat(0.8)));
    let panel = builder.material(
        Lambertian::solid(Color::splat(0.8))
            .with_emission(Arc::new(SolidColor::new(Color::splat(2.0)))),
    );
    let glass = builder.material(Dielectric::new(1.5));

    builder
        .add(AaRect::xy(-3.0, 3.0, -3.0, 3.0, -2.0, white))
        .add(AaRect::yz(-3.0, 3.0, -2.0, 4.0, -3.0, red))
        .add(FlipNormals::new(Box::new(AaRect::yz(-3.0, 3.0, -2.0, 4.0, 3.0, green))))
        .add(AaRect::xz(-3.0, 3.0, -2.0, 4.0, -3.0, pale))
        .add(FlipNormals::new(Box::new(AaRect::xz(-3.0, 3.0, -2.0, 4.0, 3.0, pale))))
        .add(FlipNormals::new(Box::new(AaRect::xz(-2.0, 2.0, -1.0, 3.0, 2.99, panel))));

    // 2 x 4 x 2 block standing on the floor, turned about its own vertical axis.
    let block = BoxShape::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 4.0, 1.0), pale);
    builder.add(
        Instance::rotate_y(Box::new(block), 20.0)
            .then(Mat4::from_translation(Vec3::new(-2.5, -3.0, -1.0))),
    );
    builder.add(Sphere::new(Vec3::new(-2.5, 1.5, -1.0), 0.5, glass));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 16.0), Vec3::ZERO, Vec3::Y)
        .with_lens(30.0, 0.0, 1.0)
        .with_aspect(opts.aspect);
    builder.build(camera, Background::BLACK)
}
