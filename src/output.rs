use std::path::Path;

use glam::UVec2;
use image::{ImageBuffer, Rgba};

use crate::error::{RenderError, Result};

/// Converts a float RGBA buffer to 8-bit RGBA, clamping to `[0, 1]`.
///
/// The renderer stores row 0 at the bottom, so rows are flipped to put it at
/// the bottom of the image as well.
pub fn to_rgba8(pixels: &[f32], size: UVec2) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;

    ImageBuffer::from_fn(size.x, size.y, |x, y| {
        let row = size.y - 1 - y;
        let i = (row as usize * size.x as usize + x as usize) * 4;
        match pixels.get(i..i + 4) {
            Some(&[r, g, b, a]) => Rgba([to_u8(r), to_u8(g), to_u8(b), to_u8(a)]),
            _ => Rgba([0, 0, 0, 255]),
        }
    })
}

pub fn save_png(path: impl AsRef<Path>, pixels: &[f32], size: UVec2) -> Result<()> {
    let path = path.as_ref();
    to_rgba8(pixels, size)
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    log::info!("wrote {}x{} frame to {}", size.x, size.y, path.display());
    Ok(())
}
