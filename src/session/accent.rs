// SPDX-License-Identifier: MPL-2.0
//! Accent colour derivation and the small colour arithmetic the card
//! styling needs.

use crate::media::ImageData;
use iced::Color;

/// Pixel sampling stride while scanning artwork. Keeps derivation cheap
/// for full-size covers.
const SAMPLE_STRIDE: usize = 4;

/// Saturation floor for a pixel to count as "colourful".
const MIN_SATURATION: f32 = 0.25;

/// Value range accepted for colourful pixels: near-black and near-white
/// pixels say nothing useful about the artwork's hue.
const MIN_VALUE: f32 = 0.15;
const MAX_VALUE: f32 = 0.95;

/// Derives a theme colour from artwork: the mean of sufficiently
/// saturated pixels, falling back to the mean of all sampled pixels when
/// the artwork is effectively monochrome.
///
/// Returns `None` for empty images.
#[must_use]
pub fn derive_accent(image: &ImageData) -> Option<Color> {
    let bytes = image.rgba_bytes();
    if bytes.len() < 4 {
        return None;
    }

    let mut saturated_sum = [0.0f32; 3];
    let mut saturated_count = 0u32;
    let mut total_sum = [0.0f32; 3];
    let mut total_count = 0u32;

    for pixel in bytes.chunks_exact(4).step_by(SAMPLE_STRIDE) {
        let r = f32::from(pixel[0]) / 255.0;
        let g = f32::from(pixel[1]) / 255.0;
        let b = f32::from(pixel[2]) / 255.0;

        total_sum[0] += r;
        total_sum[1] += g;
        total_sum[2] += b;
        total_count += 1;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };

        if saturation >= MIN_SATURATION && (MIN_VALUE..=MAX_VALUE).contains(&max) {
            saturated_sum[0] += r;
            saturated_sum[1] += g;
            saturated_sum[2] += b;
            saturated_count += 1;
        }
    }

    let (sum, count) = if saturated_count > 0 {
        (saturated_sum, saturated_count)
    } else if total_count > 0 {
        (total_sum, total_count)
    } else {
        return None;
    };

    let n = count as f32;
    Some(Color::from_rgb(sum[0] / n, sum[1] / n, sum[2] / n))
}

/// Moves a colour towards white (positive amount) or black (negative
/// amount). `amplify(c, 1.0)` is white, `amplify(c, -1.0)` is black.
#[must_use]
pub fn amplify(color: Color, amount: f32) -> Color {
    let target = if amount >= 0.0 { 1.0 } else { 0.0 };
    let t = amount.abs().clamp(0.0, 1.0);

    Color {
        r: color.r + (target - color.r) * t,
        g: color.g + (target - color.g) * t,
        b: color.b + (target - color.b) * t,
        a: color.a,
    }
}

/// Linear blend between two colours. `ratio` 0.0 yields `a`, 1.0 yields
/// `b`.
#[must_use]
pub fn blend(a: Color, b: Color, ratio: f32) -> Color {
    let t = ratio.clamp(0.0, 1.0);
    Color {
        r: a.r + (b.r - a.r) * t,
        g: a.g + (b.g - a.g) * t,
        b: a.b + (b.b - a.b) * t,
        a: a.a + (b.a - a.a) * t,
    }
}

/// Black or white, whichever contrasts more against the given colour.
#[must_use]
pub fn contrasting_text(background: Color) -> Color {
    // Perceptual luminance weights (ITU-R BT.709).
    let luminance = 0.2126 * background.r + 0.7152 * background.g + 0.0722 * background.b;
    if luminance > 0.5 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

/// Applies an alpha to a colour.
#[must_use]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Color {
        a: alpha.clamp(0.0, 1.0),
        ..color
    }
}
