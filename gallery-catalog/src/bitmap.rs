//! Decoded image types shared between the catalog and its loaders.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

/// A decoded RGBA image ready for drawing.
pub type Bitmap = RgbaImage;

/// Reference-counted bitmap as handed out by loaders and the catalog.
///
/// The catalog itself only keeps weak handles to these, so a bitmap lives
/// exactly as long as someone (the retainer, the renderer, the loader's own
/// cache) holds a strong reference.
pub type SharedBitmap = Arc<Bitmap>;

/// Decoded size of a bitmap in bytes.
pub fn bitmap_bytes(bitmap: &Bitmap) -> u64 {
    bitmap.as_raw().len() as u64
}

/// Create a square bitmap filled with a single colour.
pub fn solid_bitmap(size: u32, rgba: [u8; 4]) -> SharedBitmap {
    Arc::new(RgbaImage::from_pixel(size, size, Rgba(rgba)))
}
