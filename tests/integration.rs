// SPDX-License-Identifier: MPL-2.0
use spectre::capture::fallback;
use spectre::media::{compose, CaptureData, ImageData, QuarterTurns};
use spectre::session::{MediaSource, SessionSnapshot};
use tempfile::tempdir;

fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> ImageData {
    ImageData::from_rgba(width, height, rgba.repeat((width * height) as usize))
}

fn test_session() -> SessionSnapshot {
    let mut session = SessionSnapshot::new(
        "Cutlery".to_string(),
        "Yoh Kamiyama".to_string(),
        Some(std::time::Duration::from_secs(694)),
        Some("HHhFX9zUV2s".to_string()),
        None,
        MediaSource {
            bus_name: "org.mpris.MediaPlayer2.spmp".to_string(),
            name: "spmp".to_string(),
        },
    );
    session.attach_artwork(solid_image(16, 16, [158, 36, 93, 255]));
    session
}

#[test]
fn camera_capture_exports_transposed_jpeg() {
    let dir = tempdir().expect("Failed to create temporary directory");

    // A camera frame arrives a quarter turn off and carries quantum one.
    let base = solid_image(96, 128, [40, 40, 40, 255]);
    let overlay = solid_image(64, 16, [200, 60, 60, 255]);
    let data = CaptureData::new(Some(test_session()), QuarterTurns::ONE);

    let export = compose::export_base(&base, data.rotation);
    let path = compose::save_composite(&export, &overlay, &data, dir.path())
        .expect("export should succeed");

    let written = image_rs::open(&path).expect("exported file should decode");
    assert_eq!(written.width(), 128);
    assert_eq!(written.height(), 96);

    let name = path.file_name().unwrap().to_str().unwrap();
    assert_eq!(name.len(), "2024-03-09_14-05-09.jpg".len());
    assert!(name.ends_with(".jpg"));
}

#[test]
fn gallery_capture_round_trips_upright() {
    let dir = tempdir().expect("Failed to create temporary directory");

    // Gallery images are already upright (quantum zero): the export must
    // come out with the original orientation.
    let base = solid_image(120, 80, [10, 90, 10, 255]);
    let overlay = solid_image(60, 10, [250, 250, 250, 255]);
    let data = CaptureData::new(None, QuarterTurns::ZERO);

    let export = compose::export_base(&base, data.rotation);
    let path = compose::save_composite(&export, &overlay, &data, dir.path())
        .expect("export should succeed");

    let written = image_rs::open(&path).expect("exported file should decode");
    assert_eq!(written.width(), 120);
    assert_eq!(written.height(), 80);
}

#[test]
fn overlay_lands_on_the_bottom_edge_of_the_export() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let base = solid_image(64, 128, [0, 0, 0, 255]);
    let overlay = solid_image(64, 8, [255, 0, 0, 255]);
    let data = CaptureData::new(None, QuarterTurns::ONE);

    let export = compose::export_base(&base, data.rotation);
    let path = compose::save_composite(&export, &overlay, &data, dir.path())
        .expect("export should succeed");

    let written = image_rs::open(&path).expect("decode").to_rgb8();
    let bottom = written.get_pixel(written.width() / 2, written.height() - 1);
    let top = written.get_pixel(written.width() / 2, 0);

    // JPEG is lossy, so compare with generous margins.
    assert!(bottom.0[0] > 180, "bottom edge should carry the overlay");
    assert!(top.0[0] < 60, "top edge should still be the base image");
}

#[test]
fn software_rasterized_card_feeds_the_export_pipeline() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let session = test_session();
    let overlay =
        fallback::rasterize_card(Some(&session), 360, 180, 0.0).expect("fallback raster");
    assert_eq!(overlay.width, 360);
    assert_eq!(overlay.height, 180);

    let base = solid_image(90, 160, [128, 128, 128, 255]);
    let data = CaptureData::new(Some(session), QuarterTurns::ONE);

    let export = compose::export_base(&base, data.rotation);
    let path = compose::save_composite(&export, &overlay, &data, dir.path())
        .expect("export should succeed");
    assert!(path.exists());

    dir.close().expect("Failed to close temporary directory");
}
