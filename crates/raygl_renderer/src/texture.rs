//! Surface color lookups.
//!
//! Textures are evaluated at a hit's surface coordinates and world point.
//! They are immutable once built and shared between materials with `Arc`.

use std::sync::Arc;

use crate::{Color, Perlin};
use raygl_core::RgbImage;
use raygl_math::Vec3;

/// Trait for surface color lookups.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checkerboard alternating between two child textures by the sign of
/// sin(f·x)·sin(f·y)·sin(f·z).
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
    frequency: f32,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            even,
            odd,
            frequency: 10.0,
        }
    }

    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let f = self.frequency;
        let sines = (f * p.x).sin() * (f * p.y).sin() * (f * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// How a [`NoiseTexture`] turns noise into a grey level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseStyle {
    /// 0.5 * (1 + noise(scale * p))
    Smooth,
    /// Sine stripes along z, phase-shifted by turbulence
    Marble,
}

const TURBULENCE_DEPTH: u32 = 7;

/// Procedural grey-scale noise.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
    style: NoiseStyle,
}

impl NoiseTexture {
    pub fn new(noise: Perlin, scale: f32, style: NoiseStyle) -> Self {
        Self {
            noise,
            scale,
            style,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let level = match self.style {
            NoiseStyle::Smooth => 0.5 * (1.0 + self.noise.noise(self.scale * p)),
            NoiseStyle::Marble => {
                let turb = self.noise.turbulence(p, TURBULENCE_DEPTH);
                0.5 * (1.0 + (self.scale * p.z + 10.0 * turb).sin())
            }
        };
        Color::splat(level)
    }
}

/// Nearest-pixel lookup into a decoded RGB image.
///
/// (u, v) are clamped to [0, 1] and v = 1 is the top row of the image.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: RgbImage,
}

impl ImageTexture {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;
        let [r, g, b] = self.image.pixel_clamped(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.3, 0.7, Vec3::ONE), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates() {
        let checker = CheckerTexture::from_colors(Color::ONE, Color::ZERO);
        let even = Vec3::splat(0.05);
        let odd = Vec3::new(-0.05, 0.05, 0.05);
        assert_eq!(checker.value(0.0, 0.0, even), Color::ONE);
        assert_eq!(checker.value(0.0, 0.0, odd), Color::ZERO);
    }

    #[test]
    fn test_checker_nests_textures() {
        let inner = Arc::new(CheckerTexture::from_colors(Color::X, Color::Y).with_frequency(100.0));
        let outer = CheckerTexture::new(inner, Arc::new(SolidColor::new(Color::Z)));
        let c = outer.value(0.0, 0.0, Vec3::splat(0.005));
        assert!(c == Color::X || c == Color::Y);
    }

    #[test]
    fn test_noise_texture_grey_in_range() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(2));
        for style in [NoiseStyle::Smooth, NoiseStyle::Marble] {
            let tex = NoiseTexture::new(perlin.clone(), 4.0, style);
            let c = tex.value(0.0, 0.0, Vec3::new(0.7, 1.1, -2.3));
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
            assert!(c.x >= -0.25 && c.x <= 1.25);
        }
    }

    #[test]
    fn test_image_texture_corners_and_clamping() {
        // 2x2: top row red, green; bottom row blue, white
        let data = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        let tex = ImageTexture::new(RgbImage::new(2, 2, data).unwrap());

        assert_eq!(tex.value(0.0, 1.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(1.0, 1.0, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(1.0, 0.0, Vec3::ZERO), Color::ONE);

        // Out of range coordinates clamp instead of reading out of bounds.
        assert_eq!(tex.value(-3.0, 7.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(9.0, -2.0, Vec3::ZERO), Color::ONE);
    }
}
