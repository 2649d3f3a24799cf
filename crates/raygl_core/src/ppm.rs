//! Plain-text PPM (`P3`) output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a `P3` raster: header, then one `r g b` line per pixel.
///
/// `pixels` must yield exactly `width * height` triples in output order.
pub fn write_ppm<W, I>(writer: &mut W, width: u32, height: u32, pixels: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = [u8; 3]>,
{
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    let mut written = 0usize;
    for [r, g, b] in pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
        written += 1;
    }

    let expected = width as usize * height as usize;
    if written != expected {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("wrote {} pixels, expected {}", written, expected),
        ));
    }
    Ok(())
}

/// Create `path` and write a `P3` raster to it.
pub fn save_ppm<I>(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    pixels: I,
) -> std::io::Result<()>
where
    I: IntoIterator<Item = [u8; 3]>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_ppm(&mut writer, width, height, pixels)?;
    writer.flush()?;
    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
