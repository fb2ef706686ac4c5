//! Raster helpers: color conversion, PNG encoding, scaling, sheet packing

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use kiln_core::{Color, KilnError, Result};

pub fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba(color.to_array())
}

/// Encode an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| KilnError::EncodingError(format!("Failed to encode PNG: {}", e)))?;
    Ok(bytes)
}

/// Nearest-neighbor resize, keeping pixel art crisp
pub fn scale_nearest(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Nearest)
}

/// Pack equally-sized frames into a grid, left-to-right then top-to-bottom.
///
/// Returns the sheet plus each frame's `(x, y)` origin.
pub fn pack_grid(frames: &[RgbaImage], columns: u32) -> (RgbaImage, Vec<(u32, u32)>) {
    let Some(first) = frames.first() else {
        return (RgbaImage::new(0, 0), Vec::new());
    };
    let (fw, fh) = first.dimensions();
    let columns = columns.clamp(1, frames.len() as u32);
    let rows = (frames.len() as u32).div_ceil(columns);
    let mut sheet = RgbaImage::new(fw * columns, fh * rows);
    let mut origins = Vec::with_capacity(frames.len());

    for (i, frame) in frames.iter().enumerate() {
        let x = (i as u32 % columns) * fw;
        let y = (i as u32 / columns) * fh;
        imageops::replace(&mut sheet, frame, x as i64, y as i64);
        origins.push((x, y));
    }
    (sheet, origins)
}

/// Shift an image by whole pixels, filling uncovered space with transparency
pub fn offset(image: &RgbaImage, dx: i64, dy: i64) -> RgbaImage {
    let mut out = RgbaImage::new(image.width(), image.height());
    imageops::overlay(&mut out, image, dx, dy);
    out
}
