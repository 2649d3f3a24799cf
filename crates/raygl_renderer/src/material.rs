//! Material trait for surface scattering.

use std::sync::Arc;

use crate::{
    hittable::HitRecord,
    sampling::{gen_f32, random_in_unit_sphere},
    texture::{SolidColor, Texture},
    Ray,
};
use raygl_math::Vec3;
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// A ray leaving a surface and the factor applied to whatever it brings back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;

    /// Light emitted at the given surface coordinates and point.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Handle to a material stored in a [`MaterialLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns every material of a scene. Primitives refer to entries by id, so one
/// material can be shared by any number of primitives.
#[derive(Default)]
pub struct MaterialLibrary {
    materials: Vec<Box<dyn Material>>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: impl Material + 'static) -> MaterialId {
        let id = MaterialId::new(self.materials.len() as u32);
        self.materials.push(Box::new(material));
        id
    }

    /// Look up a material.
    ///
    /// Ids are only minted by [`MaterialLibrary::add`], so an unknown id is a
    /// bug in scene construction and panics.
    pub fn get(&self, id: MaterialId) -> &dyn Material {
        self.materials[id.index()].as_ref()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Lambertian (diffuse) material, optionally glowing.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
    emit: Option<Arc<dyn Texture>>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo, emit: None }
    }

    /// Uniformly colored diffuse surface.
    pub fn solid(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }

    /// Add an emission term on top of the diffuse scattering.
    pub fn with_emission(mut self, emit: Arc<dyn Texture>) -> Self {
        self.emit = Some(emit);
        self
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if direction.length_squared() < 1e-8 {
            direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit
            .as_ref()
            .map_or(Color::ZERO, |emit| emit.value(u, v, p))
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, clamped to at most 1.0
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut direction = reflect(ray_in.direction().normalize(), rec.normal);
        if self.fuzz > 0.0 {
            direction += self.fuzz * random_in_unit_sphere(rng);
        }

        // Absorb reflections that end up below the surface.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    ior: f32,
}

impl Dielectric {
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = ray_in.direction();
        let d_dot_n = direction.dot(rec.normal);
        let cos_incident = d_dot_n / direction.length();

        // Leaving the medium when the ray travels along the normal.
        let (outward_normal, ratio, cosine) = if d_dot_n > 0.0 {
            let cos_t2 = 1.0 - self.ior * self.ior * (1.0 - cos_incident * cos_incident);
            (-rec.normal, self.ior, cos_t2.max(0.0).sqrt())
        } else {
            (rec.normal, 1.0 / self.ior, -cos_incident)
        };

        let refracted = refract(direction, outward_normal, ratio);
        let reflect_prob = match refracted {
            Some(_) => schlick(cosine, self.ior),
            None => 1.0,
        };

        let out = match refracted {
            Some(refracted) if gen_f32(rng) >= reflect_prob => refracted,
            _ => reflect(direction, rec.normal),
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, out, ray_in.time()),
        })
    }
}

/// Pure emitter. Never scatters.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    pub fn solid(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `v` through a surface with normal `n` facing the
/// incoming side. `None` on total internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
