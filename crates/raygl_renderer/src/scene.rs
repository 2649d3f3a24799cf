//! A renderable scene: acceleration structure, materials, camera and backdrop.

use std::time::Instant;

use crate::{
    error::RenderResult,
    hittable::Hittable,
    material::{Material, MaterialId, MaterialLibrary},
    renderer::Background,
    BvhNode, Camera,
};

/// Everything the integrator needs, built once and read-only afterwards.
pub struct Scene {
    pub world: BvhNode,
    pub materials: MaterialLibrary,
    pub camera: Camera,
    pub background: Background,
}

/// Collects primitives and materials, then freezes them into a [`Scene`].
#[derive(Default)]
pub struct SceneBuilder {
    objects: Vec<Box<dyn Hittable>>,
    materials: MaterialLibrary,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and get the handle primitives should carry.
    pub fn material(&mut self, material: impl Material + 'static) -> MaterialId {
        self.materials.add(material)
    }

    pub fn add(&mut self, object: impl Hittable + 'static) -> &mut Self {
        self.objects.push(Box::new(object));
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Build the BVH over every added primitive for the camera's shutter interval.
    pub fn build(self, camera: Camera, background: Background) -> RenderResult<Scene> {
        let start = Instant::now();
        let count = self.objects.len();
        let world = BvhNode::new(self.objects, camera.shutter())?;

        log::info!(
            "Scene built: {} primitives, {} materials in {:.2?}",
            count,
            self.materials.len(),
            start.elapsed()
        );

        Ok(Scene {
            world,
            materials: self.materials,
            camera,
            background,
        })
    }
}
