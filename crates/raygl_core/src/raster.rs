//! Decoded RGB image buffers.
//!
//! Image textures consume an [`RgbImage`]: tightly packed 8-bit RGB triples in
//! row-major order, first row at the top. Loading goes through the `image`
//! crate and every failure is reported before rendering starts.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading or constructing an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for the given size")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Image has zero width or height")]
    EmptyImage,
}

pub type ImageResult<T> = Result<T, ImageError>;

/// An 8-bit RGB raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbImage {
    /// Wrap an already decoded buffer of `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage);
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Load and decode an image file, converting it to 8-bit RGB.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }

        let rgb = image::open(path)
            .map_err(|source| ImageError::Decode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            (width * height * 3) as f32 / 1024.0
        );

        Self::new(width, height, rgb.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB triple at integer pixel coordinates, indices clamped into range.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 3] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = 3 * (y * self.width as usize + x);
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_size() {
        assert!(RgbImage::new(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            RgbImage::new(2, 2, vec![0; 11]),
            Err(ImageError::SizeMismatch { expected: 12, actual: 11 })
        ));
        assert!(matches!(RgbImage::new(0, 2, vec![]), Err(ImageError::EmptyImage)));
    }

    #[test]
    fn test_pixel_clamped_stays_in_bounds() {
        let data = vec![
            1, 1, 1, 2, 2, 2, //
            3, 3, 3, 4, 4, 4,
        ];
        let img = RgbImage::new(2, 2, data).unwrap();

        assert_eq!(img.pixel_clamped(0, 0), [1, 1, 1]);
        assert_eq!(img.pixel_clamped(1, 1), [4, 4, 4]);
        assert_eq!(img.pixel_clamped(-5, 0), [1, 1, 1]);
        assert_eq!(img.pixel_clamped(9, 9), [4, 4, 4]);
        assert_eq!(img.pixel_clamped(9, -1), [2, 2, 2]);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = RgbImage::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn test_load_decodes_png() {
        let _ = env_logger::builder().is_test(true).try_init();

        let path = std::env::temp_dir().join("raygl_core_2x1.png");
        let png = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
        png.save(&path).unwrap();

        let img = RgbImage::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!((img.width(), img.height()), (2, 1));
        assert_eq!(img.pixel_clamped(1, 0), [0, 0, 255]);
    }

    #[test]
    fn test_load_garbage_file_is_decode_error() {
        let path = std::env::temp_dir().join("raygl_core_garbage.png");
        std::fs::write(&path, b"this is not a png").unwrap();
        let err = RgbImage::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ImageError::Decode { .. }));
    }
}
