// SPDX-License-Identifier: MPL-2.0
//! Image handling: loading, gallery enumeration, bounded background
//! decoding, and composite export.

pub mod compose;
pub mod decode;
pub mod gallery;
pub mod image;

// Re-export commonly used types
pub use compose::{CaptureData, QuarterTurns};
pub use decode::DecodePool;
pub use gallery::ImageRecord;
pub use image::{load_image, ImageData};

/// Supported media extensions
pub mod extensions {
    /// Image file extensions browsable from the gallery.
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
}

/// Returns true if the path has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions::IMAGE_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}
