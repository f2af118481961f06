// SPDX-License-Identifier: MPL-2.0
//! Image loading and the shared RGBA container used across the app.

use crate::error::{Error, Result};
use iced::widget::image;
use image_rs::GenericImageView;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Original RGBA bytes, kept for compositing and rotation.
    /// Stored in Arc to avoid expensive cloning.
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    ///
    /// The pixels are stored in an Arc for shared ownership, and a copy is
    /// made for the Handle.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let rgba_bytes = Arc::new(pixels);
        let handle = image::Handle::from_rgba(width, height, rgba_bytes.to_vec());
        Self {
            handle,
            width,
            height,
            rgba_bytes,
        }
    }

    /// Returns a reference to the original RGBA bytes.
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Converts into an `image`-crate buffer for compositing.
    ///
    /// Returns `None` if the stored byte length does not match the
    /// dimensions (should never happen as bytes are validated at
    /// construction).
    #[must_use]
    pub fn to_rgba_image(&self) -> Option<image_rs::RgbaImage> {
        image_rs::RgbaImage::from_raw(self.width, self.height, self.rgba_bytes.to_vec())
    }

    /// Creates a version of this image rotated clockwise by the given
    /// number of quarter turns.
    ///
    /// Returns a clone of the original image for zero turns.
    ///
    /// # Panics
    ///
    /// Panics if the internal RGBA bytes are invalid (should never happen
    /// as bytes are validated at construction).
    #[must_use]
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        if quarter_turns % 4 == 0 {
            return self.clone();
        }

        let img = image_rs::RgbaImage::from_raw(self.width, self.height, self.rgba_bytes.to_vec())
            .expect("RGBA bytes should be valid");
        let dynamic = image_rs::DynamicImage::ImageRgba8(img);

        let rotated = match quarter_turns % 4 {
            1 => dynamic.rotate90(),
            2 => dynamic.rotate180(),
            _ => dynamic.rotate270(),
        };

        let (new_width, new_height) = rotated.dimensions();
        let pixels = rotated.to_rgba8().into_vec();

        Self::from_rgba(new_width, new_height, pixels)
    }
}

/// Load an image from the given path and return its data.
///
/// Supports the common raster formats (PNG, JPEG, GIF, WebP, BMP).
///
/// # Errors
///
/// Returns an error if the file cannot be read ([`Error::Io`]) or the
/// image format is invalid or unsupported ([`Error::Image`]).
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let img_bytes = fs::read(path.as_ref()).map_err(|e| Error::Io(e.to_string()))?;

    let img = image_rs::load_from_memory(&img_bytes).map_err(|e| Error::Image(e.to_string()))?;

    let (width, height) = img.dimensions();
    let pixels = img.to_rgba8().into_vec();

    Ok(ImageData::from_rgba(width, height, pixels))
}
