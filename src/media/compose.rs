// SPDX-License-Identifier: MPL-2.0
//! Composite image export: the captured photo with the status card
//! painted on top, written out as a JPEG.
//!
//! The output canvas is sized to the base image rotated a quarter turn
//! clockwise. The overlay is scaled to the canvas width (preserving its
//! aspect ratio), anchored to the bottom edge, and shifted by the offset
//! chosen on the adjust screen.

use crate::error::{Error, Result};
use crate::media::ImageData;
use crate::session::SessionSnapshot;
use chrono::{DateTime, Local};
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{imageops, RgbImage, RgbaImage};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Fixed encode quality for exported composites.
pub const JPEG_QUALITY: u8 = 90;

/// Subdirectory of the platform pictures directory that receives exports.
pub const OUTPUT_DIR_NAME: &str = "Spectre";

/// Rotation in clockwise quarter turns (0-3).
///
/// The newtype enforces validity at the type level; any input wraps
/// modulo four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    /// No rotation.
    pub const ZERO: Self = Self(0);

    /// One clockwise quarter turn. Camera frames arrive with this set:
    /// the sensor is mounted a quarter turn off.
    pub const ONE: Self = Self(1);

    /// Creates a rotation, wrapping to the 0-3 range.
    #[must_use]
    pub fn new(turns: u8) -> Self {
        Self(turns % 4)
    }

    /// Returns the quantum as a count of clockwise quarter turns.
    #[must_use]
    pub fn turns(self) -> u8 {
        self.0
    }

    /// Returns the rotation in degrees.
    #[must_use]
    pub fn degrees(self) -> u16 {
        u16::from(self.0) * 90
    }

    /// Rotates one quarter turn clockwise.
    #[must_use]
    pub fn clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    /// Rotates one quarter turn counter-clockwise.
    #[must_use]
    pub fn counterclockwise(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    /// Returns true if width and height swap when rendering.
    #[must_use]
    pub fn swaps_dimensions(self) -> bool {
        self.0 % 2 == 1
    }
}

/// Everything produced by a single capture action.
///
/// Created once when the user presses capture and consumed by the save
/// or adjust step; never persisted.
#[derive(Debug, Clone)]
pub struct CaptureData {
    /// The session shown on the card at capture time, if any.
    pub session: Option<SessionSnapshot>,
    pub captured_at: DateTime<Local>,
    /// Pixel shift applied to the overlay during export.
    pub overlay_offset: (f32, f32),
    /// Rotation applied to the base image on the adjust screen.
    pub rotation: QuarterTurns,
}

impl CaptureData {
    #[must_use]
    pub fn new(session: Option<SessionSnapshot>, rotation: QuarterTurns) -> Self {
        Self {
            session,
            captured_at: Local::now(),
            overlay_offset: (0.0, 0.0),
            rotation,
        }
    }

    /// Returns the export file stem for this capture.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.captured_at.format("%Y-%m-%d_%H-%M-%S").to_string()
    }
}

/// Composites the overlay onto the rotated base image.
///
/// Pure pixel work; writing happens in [`save_composite`]. Overlay
/// regions pushed outside the canvas by the offset are clipped.
///
/// # Errors
///
/// Returns [`Error::Compose`] when either input has a zero dimension.
pub fn compose(base: &RgbaImage, overlay: &RgbaImage, offset: (f32, f32)) -> Result<RgbImage> {
    if base.width() == 0 || base.height() == 0 {
        return Err(Error::Compose("base image has a zero dimension".into()));
    }
    if overlay.width() == 0 || overlay.height() == 0 {
        return Err(Error::Compose("overlay image has a zero dimension".into()));
    }

    // The canvas is the base image turned a quarter clockwise, so its
    // dimensions are the base's transposed.
    let canvas_width = base.height();
    let canvas_height = base.width();

    let mut canvas = RgbaImage::new(canvas_width, canvas_height);
    let rotated_base = imageops::rotate90(base);
    imageops::replace(&mut canvas, &rotated_base, 0, 0);

    let overlay_height = ((f64::from(canvas_width) * f64::from(overlay.height())
        / f64::from(overlay.width()))
    .round() as u32)
        .max(1);
    let scaled_overlay = imageops::resize(
        overlay,
        canvas_width,
        overlay_height,
        imageops::FilterType::Triangle,
    );

    let anchor_y = i64::from(canvas_height) - i64::from(overlay_height);
    let x = offset.0.round() as i64;
    let y = anchor_y + offset.1.round() as i64;
    imageops::overlay(&mut canvas, &scaled_overlay, x, y);

    Ok(image_rs::DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Composites and writes the capture to `output_dir`, creating the
/// directory if absent.
///
/// Returns the path of the written JPEG.
///
/// # Errors
///
/// Propagates compose errors and any I/O failure during the write; there
/// is no retry or partial-write cleanup.
pub fn save_composite(
    base: &ImageData,
    overlay: &ImageData,
    data: &CaptureData,
    output_dir: &Path,
) -> Result<PathBuf> {
    let base_pixels = base
        .to_rgba_image()
        .ok_or_else(|| Error::Compose("base image buffer is invalid".into()))?;
    let overlay_pixels = overlay
        .to_rgba_image()
        .ok_or_else(|| Error::Compose("overlay image buffer is invalid".into()))?;

    let composed = compose(&base_pixels, &overlay_pixels, data.overlay_offset)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.jpg", data.file_stem()));

    let file = fs::File::create(&path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    composed
        .write_with_encoder(encoder)
        .map_err(|e| Error::Io(format!("failed to encode {}: {}", path.display(), e)))?;

    Ok(path)
}

/// Pre-rotates the base image for export.
///
/// [`compose`] always applies one fixed clockwise quarter turn. Camera
/// captures carry quantum one and need exactly that turn, so they pass
/// through untouched; other quanta are pre-rotated so the net rotation
/// baked into the file equals the quantum chosen on the adjust screen.
#[must_use]
pub fn export_base(base: &ImageData, rotation: QuarterTurns) -> ImageData {
    base.rotated(rotation.counterclockwise().turns())
}

/// Resolves the export directory: an explicit override wins, otherwise
/// `Pictures/Spectre`.
#[must_use]
pub fn resolve_output_dir(override_dir: Option<&Path>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) => Some(dir.to_path_buf()),
        None => dirs::picture_dir().map(|pictures| pictures.join(OUTPUT_DIR_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image_rs::Rgba;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn output_dimensions_are_transposed_base_dimensions() {
        let base = solid(64, 48, BLACK);
        let overlay = solid(32, 8, RED);

        let composed = compose(&base, &overlay, (0.0, 0.0)).expect("compose should succeed");
        assert_eq!(composed.width(), 48);
        assert_eq!(composed.height(), 64);
    }

    #[test]
    fn overlay_is_anchored_to_bottom_edge() {
        // Base 4x8 -> canvas 8x4. Overlay aspect 4:1 scales to 8x2 and
        // must rest on the bottom two rows.
        let base = solid(4, 8, BLACK);
        let overlay = solid(8, 2, RED);

        let composed = compose(&base, &overlay, (0.0, 0.0)).expect("compose should succeed");
        assert_eq!(composed.get_pixel(0, 3).0, [255, 0, 0]);
        assert_eq!(composed.get_pixel(7, 2).0, [255, 0, 0]);
        assert_eq!(composed.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(composed.get_pixel(0, 1).0, [0, 0, 0]);
    }

    #[test]
    fn bottom_anchor_holds_for_other_aspect_ratios() {
        let base = solid(6, 12, BLACK);
        let overlay = solid(4, 2, RED); // scales to 12x6 on a 12x6 canvas

        let composed = compose(&base, &overlay, (0.0, 0.0)).expect("compose should succeed");
        let bottom = composed.height() - 1;
        for x in 0..composed.width() {
            assert_eq!(composed.get_pixel(x, bottom).0, [255, 0, 0]);
        }
    }

    #[test]
    fn offset_shifts_overlay_and_clips_it() {
        let base = solid(4, 8, BLACK);
        let overlay = solid(8, 2, RED);

        // Shift one row up: rows 1-2 red, bottom row shows base again.
        let shifted = compose(&base, &overlay, (0.0, -1.0)).expect("compose should succeed");
        assert_eq!(shifted.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(shifted.get_pixel(0, 3).0, [0, 0, 0]);

        // Shift far beyond the canvas: everything clips, no panic.
        let clipped = compose(&base, &overlay, (0.0, 100.0)).expect("compose should succeed");
        assert_eq!(clipped.get_pixel(0, 3).0, [0, 0, 0]);
    }

    #[test]
    fn base_is_painted_rotated_clockwise() {
        // Mark the base's top-left pixel; after a clockwise quarter turn
        // it must land in the canvas's top-right corner.
        let mut base = solid(4, 8, BLACK);
        base.put_pixel(0, 0, Rgba(RED));
        let overlay = solid(8, 1, BLACK);

        let composed = compose(&base, &overlay, (0.0, 0.0)).expect("compose should succeed");
        assert_eq!(composed.get_pixel(composed.width() - 1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn zero_sized_inputs_are_rejected() {
        let base = RgbaImage::new(0, 10);
        let overlay = solid(4, 4, RED);
        assert!(matches!(
            compose(&base, &overlay, (0.0, 0.0)),
            Err(Error::Compose(_))
        ));

        let base = solid(4, 4, RED);
        let overlay = RgbaImage::new(10, 0);
        assert!(matches!(
            compose(&base, &overlay, (0.0, 0.0)),
            Err(Error::Compose(_))
        ));
    }

    #[test]
    fn file_stem_formats_capture_timestamp() {
        let mut data = CaptureData::new(None, QuarterTurns::ZERO);
        data.captured_at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 9).unwrap();
        assert_eq!(data.file_stem(), "2024-03-09_14-05-09");
    }

    #[test]
    fn save_composite_writes_jpeg_with_transposed_dimensions() {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let base = ImageData::from_rgba(32, 24, vec![128u8; 32 * 24 * 4]);
        let overlay = ImageData::from_rgba(16, 4, vec![200u8; 16 * 4 * 4]);
        let data = CaptureData::new(None, QuarterTurns::ZERO);

        let path = save_composite(&base, &overlay, &data, temp_dir.path())
            .expect("save should succeed");

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        let written = image_rs::open(&path).expect("written file should decode");
        assert_eq!(written.width(), 24);
        assert_eq!(written.height(), 32);
    }

    #[test]
    fn save_composite_creates_missing_directories() {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let nested = temp_dir.path().join("deep").join("pictures");
        let base = ImageData::from_rgba(8, 8, vec![10u8; 8 * 8 * 4]);
        let overlay = ImageData::from_rgba(8, 2, vec![20u8; 8 * 2 * 4]);
        let data = CaptureData::new(None, QuarterTurns::ZERO);

        let path =
            save_composite(&base, &overlay, &data, &nested).expect("save should succeed");
        assert!(path.exists());
    }

    #[test]
    fn quarter_turns_wrap_modulo_four() {
        assert_eq!(QuarterTurns::new(0).turns(), 0);
        assert_eq!(QuarterTurns::new(4).turns(), 0);
        assert_eq!(QuarterTurns::new(5).turns(), 1);
        assert_eq!(QuarterTurns::new(3).clockwise().turns(), 0);
        assert_eq!(QuarterTurns::ZERO.counterclockwise().turns(), 3);
    }

    #[test]
    fn odd_quarter_turns_swap_dimensions() {
        assert!(!QuarterTurns::new(0).swaps_dimensions());
        assert!(QuarterTurns::new(1).swaps_dimensions());
        assert!(!QuarterTurns::new(2).swaps_dimensions());
        assert!(QuarterTurns::new(3).swaps_dimensions());
    }

    #[test]
    fn quarter_turns_degrees() {
        assert_eq!(QuarterTurns::new(0).degrees(), 0);
        assert_eq!(QuarterTurns::new(1).degrees(), 90);
        assert_eq!(QuarterTurns::new(2).degrees(), 180);
        assert_eq!(QuarterTurns::new(3).degrees(), 270);
    }

    #[test]
    fn export_base_makes_net_rotation_equal_the_quantum() {
        let base = ImageData::from_rgba(8, 4, vec![0u8; 8 * 4 * 4]);

        // Quantum one (camera default): passes through, compose's fixed
        // turn does the rest.
        let camera = export_base(&base, QuarterTurns::ONE);
        assert_eq!((camera.width, camera.height), (8, 4));

        // Quantum zero (gallery): pre-rotated so the export comes out
        // upright after compose transposes it.
        let gallery = export_base(&base, QuarterTurns::ZERO);
        assert_eq!((gallery.width, gallery.height), (4, 8));
    }

    #[test]
    fn resolve_output_dir_prefers_override() {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let resolved = resolve_output_dir(Some(temp_dir.path()));
        assert_eq!(resolved.as_deref(), Some(temp_dir.path()));
    }
}
