// SPDX-License-Identifier: MPL-2.0
//! Software rasterization fallback for the status card.
//!
//! Renderers without surface read-back (headless runs, software backends)
//! cannot serve [`super::RegionCapture::capture_from_surface`]. This path
//! rebuilds the card from its model instead: the artwork is blitted as an
//! underlay and the card chrome (fill, waves, scrim, text, border) is
//! emitted as an SVG document and rasterized over it.

use crate::error::{CaptureError, Error, Result};
use crate::media::ImageData;
use crate::session::{accent, SessionSnapshot};
use crate::ui::media_card::{self, wave};
use iced::Color;

/// Rasterizes the card for a session into an RGBA bitmap.
///
/// `wave_progress` is the decoration phase (0.0..1.0 over one wave
/// period), letting the fallback match the frame the screen showed.
///
/// # Errors
///
/// Returns [`CaptureError::CopyFailed`] wrapped in [`Error::Capture`]
/// when the bitmap cannot be allocated or the card document fails to
/// parse.
pub fn rasterize_card(
    snapshot: Option<&SessionSnapshot>,
    width: u32,
    height: u32,
    wave_progress: f32,
) -> Result<ImageData> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        Error::Capture(CaptureError::CopyFailed(format!(
            "cannot allocate a {width}x{height} card bitmap"
        )))
    })?;

    // Artwork underlay, scaled to cover the card.
    if let Some(artwork) = snapshot.and_then(|s| s.artwork.as_ref()) {
        blit_artwork(&mut pixmap, artwork);
    }

    let svg = card_svg(snapshot, width as f32, height as f32, wave_progress);

    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = resvg::usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| Error::Capture(CaptureError::CopyFailed(e.to_string())))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(ImageData::from_rgba(width, height, pixmap.data().to_vec()))
}

fn blit_artwork(pixmap: &mut tiny_skia::Pixmap, artwork: &ImageData) {
    if artwork.width == 0 || artwork.height == 0 {
        return;
    }

    let Some(size) = tiny_skia::IntSize::from_wh(artwork.width, artwork.height) else {
        return;
    };
    let Some(art_pixmap) = tiny_skia::Pixmap::from_vec(artwork.rgba_bytes().to_vec(), size)
    else {
        return;
    };

    // Cover scaling: fill the card, cropping the longer artwork axis.
    let scale_x = pixmap.width() as f32 / artwork.width as f32;
    let scale_y = pixmap.height() as f32 / artwork.height as f32;
    let scale = scale_x.max(scale_y);
    let offset_x = (pixmap.width() as f32 - artwork.width as f32 * scale) / 2.0;
    let offset_y = (pixmap.height() as f32 - artwork.height as f32 * scale) / 2.0;

    pixmap.draw_pixmap(
        0,
        0,
        art_pixmap.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::from_scale(scale, scale).post_translate(offset_x, offset_y),
        None,
    );
}

/// Builds the SVG document for the card chrome.
#[must_use]
pub fn card_svg(
    snapshot: Option<&SessionSnapshot>,
    width: f32,
    height: f32,
    wave_progress: f32,
) -> String {
    let accent_color = snapshot
        .and_then(SessionSnapshot::accent)
        .unwrap_or(media_card::FALLBACK_ACCENT);
    let line_color = accent::amplify(accent_color, -0.1);
    let text_color = accent::contrasting_text(accent_color);
    let has_artwork = snapshot.is_some_and(|s| s.artwork.is_some());

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    let radius = media_card::CARD_CORNER_RADIUS;
    svg.push_str(&format!(
        r#"<clipPath id="card"><rect x="0" y="0" width="{width}" height="{height}" rx="{radius}"/></clipPath>"#
    ));
    svg.push_str(r#"<g clip-path="url(#card)">"#);

    // Base fill; skipped when artwork already covers the card.
    if !has_artwork {
        svg.push_str(&format!(
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
            hex(accent_color)
        ));
    }

    // Wave decoration, tilted as on screen.
    svg.push_str(&format!(
        r#"<g transform="rotate({} 0 0)" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}">"#,
        wave::WAVE_TILT_DEGREES,
        hex(line_color),
        media_card::CARD_LINE_ALPHA,
        wave::WAVE_STROKE_WIDTH,
    ));
    for band in 0..wave::band_count(width, height) {
        let position = wave::band_position(band);
        let offset = wave::band_offset(band, wave_progress, width);
        for direction in [-1i8, 1] {
            let path = wave::wave_path(direction, width, wave::WAVE_AMPLITUDE, wave::WAVE_COUNT, offset)
                .translated(position);
            svg.push_str(&format!(r#"<path d="{}"/>"#, path.to_svg_data()));
        }
    }
    svg.push_str("</g>");

    // Scrim behind the text row.
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}" fill-opacity="{}"/>"#,
        hex(accent_color),
        media_card::CARD_SCRIM_ALPHA,
    ));

    if let Some(session) = snapshot {
        let padding = media_card::CARD_PADDING;
        let fill = hex(text_color);
        svg.push_str(&format!(
            r#"<text x="{padding}" y="{}" font-size="22" font-weight="bold" fill="{fill}">{}</text>"#,
            padding + 24.0,
            xml_escape(&session.title),
        ));
        svg.push_str(&format!(
            r#"<text x="{padding}" y="{}" font-size="13" fill="{fill}">{}</text>"#,
            padding + 42.0,
            xml_escape(&session.artist),
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="11" text-anchor="end" fill="{fill}">{}</text>"#,
            width - padding,
            height - padding,
            xml_escape(&session.source.name),
        ));
    }

    svg.push_str("</g>");

    // Border sits on top of everything, unclipped like the on-screen one.
    svg.push_str(&format!(
        r#"<rect x="1" y="1" width="{}" height="{}" rx="{radius}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}"/>"#,
        width - 2.0,
        height - 2.0,
        hex(line_color),
        media_card::CARD_LINE_ALPHA,
        media_card::CARD_BORDER_WIDTH,
    ));

    svg.push_str("</svg>");
    svg
}

fn hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (color.r * 255.0).round() as u8,
        (color.g * 255.0).round() as u8,
        (color.b * 255.0).round() as u8
    )
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MediaSource;

    fn snapshot_with_artwork() -> SessionSnapshot {
        let mut snap = SessionSnapshot::new(
            "Cutlery <3".to_string(),
            "Yoh & Kamiyama".to_string(),
            None,
            None,
            None,
            MediaSource {
                bus_name: "org.mpris.MediaPlayer2.test".to_string(),
                name: "Test Player".to_string(),
            },
        );
        snap.attach_artwork(ImageData::from_rgba(8, 8, [180u8, 40, 40, 255].repeat(64)));
        snap
    }

    #[test]
    fn card_svg_escapes_session_text() {
        let snap = snapshot_with_artwork();
        let svg = card_svg(Some(&snap), 400.0, 200.0, 0.0);

        assert!(svg.contains("Cutlery &lt;3"));
        assert!(svg.contains("Yoh &amp; Kamiyama"));
        assert!(!svg.contains("Cutlery <3"));
    }

    #[test]
    fn card_svg_without_session_still_draws_chrome() {
        let svg = card_svg(None, 400.0, 200.0, 0.0);
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<path"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn card_svg_skips_base_fill_when_artwork_present() {
        let snap = snapshot_with_artwork();
        let with_art = card_svg(Some(&snap), 400.0, 200.0, 0.0);
        let without = card_svg(None, 400.0, 200.0, 0.0);

        let fills = |svg: &str| svg.matches("<rect").count();
        assert!(fills(&with_art) < fills(&without));
    }

    #[test]
    fn rasterize_card_produces_requested_dimensions() {
        let image = rasterize_card(None, 320, 180, 0.25).expect("rasterization should work");
        assert_eq!(image.width, 320);
        assert_eq!(image.height, 180);

        // The accent fill must actually cover the card: sample the centre.
        let bytes = image.rgba_bytes();
        let centre = ((90 * 320 + 160) * 4) as usize;
        assert!(bytes[centre + 3] > 0, "centre pixel should be painted");
    }

    #[test]
    fn rasterize_card_with_artwork_underlay() {
        let snap = snapshot_with_artwork();
        let image = rasterize_card(Some(&snap), 200, 100, 0.0).expect("rasterization");
        assert_eq!(image.width, 200);
        assert_eq!(image.height, 100);

        // Red artwork under a red-tinted scrim: the centre keeps a red bias.
        let bytes = image.rgba_bytes();
        let centre = ((50 * 200 + 100) * 4) as usize;
        assert!(bytes[centre] > bytes[centre + 2]);
    }

    #[test]
    fn xml_escape_covers_markup_characters() {
        assert_eq!(xml_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(xml_escape("plain"), "plain");
    }
}
