// SPDX-License-Identifier: MPL-2.0
//! On-screen region capture.
//!
//! The status card's bounds are recorded reactively on every layout pass.
//! A capture crops a full-surface pixel read-back to exactly those
//! bounds; paths without surface read-back fall back to rasterizing the
//! card model directly ([`fallback`]).
//!
//! Capturing before the first layout pass is a deterministic error, never
//! a blank bitmap.

pub mod fallback;

use crate::error::CaptureError;
use crate::media::ImageData;
use iced::Rectangle;

/// A full-surface pixel read-back handed in by the renderer.
///
/// Bytes are tightly packed RGBA rows for a surface of `width` x `height`
/// physical pixels; `scale_factor` converts the logical card bounds into
/// that space.
#[derive(Debug, Clone)]
pub struct SurfacePixels {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
    pub bytes: Vec<u8>,
}

/// Tracks the card region and produces bitmaps from surface read-backs.
#[derive(Debug, Clone, Default)]
pub struct RegionCapture {
    bounds: Option<Rectangle>,
}

impl RegionCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the region's bounds; called whenever its layout changes.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = Some(bounds);
    }

    /// Returns the last recorded bounds, if any layout pass happened.
    #[must_use]
    pub fn bounds(&self) -> Option<Rectangle> {
        self.bounds
    }

    /// True once the region has reported at least one layout pass.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        self.bounds.is_some()
    }

    /// Crops a surface read-back to the recorded region.
    ///
    /// # Errors
    ///
    /// [`CaptureError::BoundsUnknown`] before the first layout pass;
    /// [`CaptureError::CopyFailed`] when the region does not intersect
    /// the surface or the read-back buffer is malformed.
    pub fn capture_from_surface(
        &self,
        surface: &SurfacePixels,
    ) -> Result<ImageData, CaptureError> {
        let bounds = self.bounds.ok_or(CaptureError::BoundsUnknown)?;

        let expected_len = surface.width as usize * surface.height as usize * 4;
        if surface.bytes.len() != expected_len {
            return Err(CaptureError::CopyFailed(format!(
                "surface buffer has {} bytes, expected {}",
                surface.bytes.len(),
                expected_len
            )));
        }

        // Map the logical bounds into physical surface pixels.
        let scale = surface.scale_factor as f32;
        let left = (bounds.x * scale).round().max(0.0) as u32;
        let top = (bounds.y * scale).round().max(0.0) as u32;
        let right = (((bounds.x + bounds.width) * scale).round() as u32).min(surface.width);
        let bottom = (((bounds.y + bounds.height) * scale).round() as u32).min(surface.height);

        if left >= right || top >= bottom {
            return Err(CaptureError::CopyFailed(format!(
                "card bounds {bounds:?} do not intersect the {}x{} surface",
                surface.width, surface.height
            )));
        }

        let width = right - left;
        let height = bottom - top;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);

        for row in top..bottom {
            let row_start = (row as usize * surface.width as usize + left as usize) * 4;
            let row_end = row_start + width as usize * 4;
            pixels.extend_from_slice(&surface.bytes[row_start..row_end]);
        }

        Ok(ImageData::from_rgba(width, height, pixels))
    }
}
