//! Progressive tiled dispatch.
//!
//! The framebuffer is split into a fixed grid of tiles. Every frame issues a
//! single dispatch covering one tile, visiting tiles in row-major order
//! starting from the bottom-left. Each dispatch adds one sample per pixel to
//! a persistent accumulation image; the iteration index advances once per
//! full pass over the grid.
//!
//! Framebuffer coordinates follow texture conventions: texel (0, 0) is the
//! bottom-left corner.

use std::time::{Duration, Instant};

use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::{
    camera::CameraUniforms,
    error::{RenderError, RenderResult},
    renderer::{ImageBuffer, Integrator},
    sampling::gen_f32,
    Color,
};

/// Partition of a `width` x `height` framebuffer into `tiles_x` x `tiles_y`
/// tiles. The last column and row absorb any remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles_x: u32,
    tiles_y: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tiles_x: u32, tiles_y: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::Dispatch(format!(
                "framebuffer {width}x{height} is empty"
            )));
        }
        if tiles_x == 0 || tiles_y == 0 || tiles_x > width || tiles_y > height {
            return Err(RenderError::Dispatch(format!(
                "cannot split {width}x{height} into {tiles_x}x{tiles_y} tiles"
            )));
        }
        Ok(Self {
            width,
            height,
            tiles_x,
            tiles_y,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles_x * self.tiles_y
    }

    /// Offset and size of tile (tx, ty).
    pub fn tile(&self, tx: u32, ty: u32) -> ([u32; 2], [u32; 2]) {
        let base_w = self.width / self.tiles_x;
        let base_h = self.height / self.tiles_y;
        let w = if tx + 1 == self.tiles_x {
            self.width - base_w * tx
        } else {
            base_w
        };
        let h = if ty + 1 == self.tiles_y {
            self.height - base_h * ty
        } else {
            base_h
        };
        ([tx * base_w, ty * base_h], [w, h])
    }
}

/// Parameters set immediately before one dispatch.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct TileDispatch {
    /// Bottom-left texel of the tile
    pub offset: [u32; 2],
    /// Tile extent in texels
    pub size: [u32; 2],
    /// Completed passes over the whole grid before this dispatch
    pub iteration: u32,
    pub tile_index: u32,
}

/// Hands out dispatches in row-major tile order, forever.
#[derive(Debug, Clone)]
pub struct DispatchScheduler {
    grid: TileGrid,
    frame: u64,
}

impl DispatchScheduler {
    pub fn new(grid: TileGrid) -> Self {
        Self { grid, frame: 0 }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn next_dispatch(&mut self) -> TileDispatch {
        let tiles = self.grid.tile_count() as u64;
        let tile_index = (self.frame % tiles) as u32;
        let iteration = (self.frame / tiles) as u32;
        self.frame += 1;

        let (offset, size) = self
            .grid
            .tile(tile_index % self.grid.tiles_x, tile_index / self.grid.tiles_x);

        TileDispatch {
            offset,
            size,
            iteration,
            tile_index,
        }
    }

    /// Dispatches issued so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Full passes over the grid completed so far.
    pub fn completed_passes(&self) -> u64 {
        self.frame / self.grid.tile_count() as u64
    }

    /// True right after the last tile of a pass was handed out.
    pub fn pass_complete(&self) -> bool {
        self.frame > 0 && self.frame % self.grid.tile_count() as u64 == 0
    }
}

/// The device side of the dispatch loop.
pub trait ComputeBackend {
    /// Upload the camera block used by subsequent dispatches.
    fn bind_camera(&mut self, camera: &CameraUniforms);

    /// Evaluate one sample for every texel of the tile and fold it into the
    /// accumulation image.
    fn dispatch(&mut self, dispatch: &TileDispatch) -> RenderResult<()>;

    /// Make the accumulation image written by earlier dispatches visible to
    /// readers. No-op for backends that write synchronously.
    fn barrier(&mut self) {}
}

/// One random seed per texel, evolved by the kernel after every sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedBuffer {
    width: u32,
    seeds: Vec<u32>,
}

impl SeedBuffer {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let seeds = (0..width as usize * height as usize)
            .map(|_| rng.next_u32())
            .collect();
        Self { width, seeds }
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.seeds[(y * self.width + x) as usize]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.seeds
    }
}

/// A [`ComputeBackend`] that runs the shared tracing core on the CPU, one
/// rayon task per tile row.
pub struct CpuKernel<'a> {
    integrator: Integrator<'a>,
    width: u32,
    height: u32,
    camera: Option<CameraUniforms>,
    accum: Vec<[f32; 4]>,
    seeds: SeedBuffer,
}

impl<'a> CpuKernel<'a> {
    pub fn new(integrator: Integrator<'a>, width: u32, height: u32, seed: u64) -> Self {
        Self {
            integrator,
            width,
            height,
            camera: None,
            accum: vec![[0.0; 4]; width as usize * height as usize],
            seeds: SeedBuffer::new(width, height, seed),
        }
    }

    pub fn seeds(&self) -> &SeedBuffer {
        &self.seeds
    }

    /// Accumulated color at texel (x, y), y counted from the bottom.
    pub fn texel(&self, x: u32, y: u32) -> Color {
        let [r, g, b, _] = self.accum[(y * self.width + x) as usize];
        Color::new(r, g, b)
    }

    /// Read back the accumulation image, top row first.
    pub fn image(&self) -> ImageBuffer {
        let mut image = ImageBuffer::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                image.set(x, self.height - 1 - y, self.texel(x, y));
            }
        }
        image
    }
}

impl ComputeBackend for CpuKernel<'_> {
    fn bind_camera(&mut self, camera: &CameraUniforms) {
        self.camera = Some(*camera);
    }

    fn dispatch(&mut self, dispatch: &TileDispatch) -> RenderResult<()> {
        let camera = self
            .camera
            .ok_or_else(|| RenderError::Dispatch("no camera bound before dispatch".into()))?;

        let [x0, y0] = dispatch.offset;
        let [w, h] = dispatch.size;
        if x0 + w > self.width || y0 + h > self.height {
            return Err(RenderError::Dispatch(format!(
                "tile at ({x0}, {y0}) of size {w}x{h} exceeds {}x{} framebuffer",
                self.width, self.height
            )));
        }

        let width = self.width as usize;
        let (fw, fh) = (self.width as f32, self.height as f32);
        let weight = 1.0 / (dispatch.iteration as f32 + 1.0);
        let integrator = &self.integrator;

        self.accum
            .par_chunks_mut(width)
            .zip(self.seeds.seeds.par_chunks_mut(width))
            .enumerate()
            .skip(y0 as usize)
            .take(h as usize)
            .for_each(|(y, (accum_row, seed_row))| {
                for x in x0 as usize..(x0 + w) as usize {
                    let mut rng = StdRng::seed_from_u64(seed_row[x] as u64);
                    let s = (x as f32 + gen_f32(&mut rng)) / fw;
                    let t = (y as f32 + gen_f32(&mut rng)) / fh;
                    let ray = camera.ray(s, t, &mut rng);
                    let sample = integrator.ray_color(&ray, &mut rng);

                    let texel = &mut accum_row[x];
                    let prev = Color::new(texel[0], texel[1], texel[2]);
                    let blended = prev + (sample - prev) * weight;
                    *texel = blended.extend(1.0).to_array();
                    seed_row[x] = rng.next_u32();
                }
            });

        Ok(())
    }
}

/// Progress of a [`ProgressiveRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Dispatches issued
    pub frames: u64,
    /// Full passes over the grid
    pub iterations: u64,
    pub elapsed: Duration,
}

/// Drives a [`ComputeBackend`] one tile per frame.
pub struct ProgressiveRenderer<B: ComputeBackend> {
    scheduler: DispatchScheduler,
    backend: B,
    start: Instant,
    last_pass: Instant,
}

impl<B: ComputeBackend> ProgressiveRenderer<B> {
    pub fn new(grid: TileGrid, mut backend: B, camera: &CameraUniforms) -> Self {
        backend.bind_camera(camera);
        let now = Instant::now();
        Self {
            scheduler: DispatchScheduler::new(grid),
            backend,
            start: now,
            last_pass: now,
        }
    }

    /// Issue the next tile's dispatch.
    pub fn frame(&mut self) -> RenderResult<TileDispatch> {
        let dispatch = self.scheduler.next_dispatch();
        self.backend.dispatch(&dispatch)?;
        self.backend.barrier();

        if self.scheduler.pass_complete() {
            let now = Instant::now();
            let elapsed = now.duration_since(self.start).as_secs_f64();
            let iterations = self.scheduler.completed_passes();
            log::info!(
                "Iterations: {:4}  passes/s: {:7.2}  delta: {:.3?}",
                iterations,
                iterations as f64 / elapsed.max(f64::EPSILON),
                now.duration_since(self.last_pass)
            );
            self.last_pass = now;
        }

        Ok(dispatch)
    }

    /// Keep issuing frames until `should_stop` says otherwise. The predicate
    /// is checked before every frame, so stopping never leaves a tile half done.
    pub fn run(
        &mut self,
        mut should_stop: impl FnMut(&FrameStats) -> bool,
    ) -> RenderResult<FrameStats> {
        loop {
            let stats = self.stats();
            if should_stop(&stats) {
                return Ok(stats);
            }
            self.frame()?;
        }
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.scheduler.frames(),
            iterations: self.scheduler.completed_passes(),
            elapsed: self.start.elapsed(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
