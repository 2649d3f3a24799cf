//! Camera for ray generation.

use bytemuck::{Pod, Zeroable};

use crate::{
    sampling::{gen_f32, random_in_unit_disk},
    Ray,
};
use raygl_math::{Interval, Vec3};
use rand::RngCore;

/// The per-frame camera block bound before each dispatch.
///
/// Plain old data so it can be uploaded as-is; vectors are padded to 16
/// bytes the way std140 lays out `vec3`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    pub origin: [f32; 4],
    pub lower_left: [f32; 4],
    pub horizontal: [f32; 4],
    pub vertical: [f32; 4],
    pub lens_radius: f32,
    pub time0: f32,
    pub time1: f32,
    pub _pad: f32,
}

impl CameraUniforms {
    /// Ray through normalized screen position (s, t), (0, 0) being the
    /// bottom-left of the image plane.
    pub fn ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let origin = Vec3::from_slice(&self.origin);
        let lower_left = Vec3::from_slice(&self.lower_left);
        let horizontal = Vec3::from_slice(&self.horizontal);
        let vertical = Vec3::from_slice(&self.vertical);

        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            horizontal.normalize() * rd.x + vertical.normalize() * rd.y
        } else {
            Vec3::ZERO
        };

        let time = Interval::new(self.time0, self.time1).lerp(gen_f32(rng));
        let target = lower_left + s * horizontal + t * vertical;

        Ray::new(origin + offset, target - origin - offset, time)
    }
}

/// Camera for generating rays into the scene.
///
/// Configured with the `with_*` builders; every builder recomputes the image
/// plane, so the camera is always ready to shoot rays.
#[derive(Clone, Debug)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,       // Vertical field of view in degrees
    aperture: f32,   // Lens diameter, 0 for a pinhole
    focus_dist: f32, // Distance from camera to plane of perfect focus
    aspect: f32,     // Width over height

    shutter: Interval,

    // Cached computed values
    frame: CameraUniforms,
}

impl Camera {
    /// Pinhole camera at the origin looking down -Z with a 90 degree field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
            aspect: 1.0,
            shutter: Interval::new(0.0, 0.0),
            frame: CameraUniforms::zeroed(),
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self.initialize();
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self.initialize();
        self
    }

    /// Open the shutter between `time0` and `time1`; rays get uniform times in between.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.shutter = Interval::new(time0, time1);
        self.initialize();
        self
    }

    /// Recompute the basis and image plane.
    ///
    /// Panics when the view direction is zero or parallel to `vup`.
    fn initialize(&mut self) {
        let view = self.look_from - self.look_at;
        assert!(
            view.length_squared() > 0.0,
            "camera look_from and look_at coincide"
        );
        let w = view.normalize();
        let side = self.vup.cross(w);
        assert!(
            side.length_squared() > 1e-12,
            "camera up vector is parallel to the view direction"
        );
        let u = side.normalize();
        let v = w.cross(u);

        let half_height = (self.vfov.to_radians() / 2.0).tan();
        let half_width = self.aspect * half_height;
        let f = self.focus_dist;

        let lower_left = self.look_from - half_width * f * u - half_height * f * v - f * w;
        let horizontal = 2.0 * half_width * f * u;
        let vertical = 2.0 * half_height * f * v;

        self.frame = CameraUniforms {
            origin: self.look_from.extend(1.0).to_array(),
            lower_left: lower_left.extend(1.0).to_array(),
            horizontal: horizontal.extend(0.0).to_array(),
            vertical: vertical.extend(0.0).to_array(),
            lens_radius: self.aperture / 2.0,
            time0: self.shutter.min,
            time1: self.shutter.max,
            _pad: 0.0,
        };
    }

    /// Generate a ray through normalized screen coordinates (s, t) in [0, 1]².
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        self.frame.ray(s, t, rng)
    }

    pub fn uniforms(&self) -> CameraUniforms {
        self.frame
    }

    pub fn shutter(&self) -> Interval {
        self.shutter
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_center_ray_looks_at_target() {
        let camera = Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(60.0, 0.0, 1.0)
            .with_aspect(2.0);

        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, 3.0));
        assert!((ray.direction().normalize() - -Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_camera_corners_span_field_of_view() {
        let camera = Camera::new().with_lens(90.0, 0.0, 1.0).with_aspect(2.0);
        let mut rng = StdRng::seed_from_u64(1);

        // tan(45°) = 1, so the image plane at distance 1 spans y in [-1, 1]
        // and x in [-2, 2].
        let ray = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((ray.direction() - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);
        let ray = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((ray.direction() - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_lens_offsets_origin_but_keeps_focus() {
        let camera = Camera::new().with_lens(40.0, 2.0, 5.0);
        let mut rng = StdRng::seed_from_u64(3);

        let focus_point = camera.get_ray(0.5, 0.5, &mut rng);
        let hit = focus_point.at(1.0);
        for _ in 0..50 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin().length() < 1.0 + 1e-5);
            assert_eq!(ray.origin().z, 0.0);
            assert!((ray.at(1.0) - hit).length() < 1e-4);
        }
    }

    #[test]
    fn test_camera_shutter_times() {
        let camera = Camera::new().with_shutter(0.25, 0.75);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let time = camera.get_ray(0.3, 0.6, &mut rng).time();
            assert!((0.25..=0.75).contains(&time));
        }
    }

    #[test]
    fn test_uniforms_are_plain_bytes() {
        let camera = Camera::new().with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        let uniforms = camera.uniforms();
        let bytes: &[u8] = bytemuck::bytes_of(&uniforms);
        assert_eq!(bytes.len(), 80);
        assert_eq!(uniforms.origin, [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "parallel")]
    fn test_degenerate_basis_panics() {
        let _ = Camera::new().with_position(Vec3::ZERO, Vec3::new(0.0, -5.0, 0.0), Vec3::Y);
    }
}
