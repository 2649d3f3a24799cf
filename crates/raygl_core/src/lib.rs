//! RayGL Core - image I/O at the edge of the renderer.
//!
//! This crate provides:
//!
//! - **`RgbImage`**: decoded 8-bit RGB buffers fed to image textures
//! - **PPM output**: `P3` rasters written by the offline renderer
//!
//! Decoding failures surface as [`ImageError`] so callers can stop before any
//! rendering begins.

pub mod raster;
pub mod ppm;

pub use raster::{ImageError, ImageResult, RgbImage};
pub use ppm::{save_ppm, write_ppm};
