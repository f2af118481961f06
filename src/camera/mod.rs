// SPDX-License-Identifier: MPL-2.0
//! Webcam preview subscription.
//!
//! The capture device API is blocking, so a dedicated thread owns the
//! camera and pushes frames through a small bounded channel into an Iced
//! subscription stream. Dropping the subscription (switching away from
//! the camera selector) closes the channel and the thread shuts the
//! device down.

use crate::media::ImageData;
use iced::futures::{SinkExt, Stream};
use iced::{stream, Subscription};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// Frames queued between the camera thread and the UI. Small on purpose:
/// the preview only ever wants the latest frame.
const FRAME_CHANNEL_CAPACITY: usize = 2;

/// Events emitted by the camera subscription.
#[derive(Debug, Clone)]
pub enum Event {
    /// The device opened and streaming started.
    Opened { width: u32, height: u32 },
    /// A decoded preview frame.
    Frame(ImageData),
    /// The device could not be opened or streaming broke. The selector
    /// surfaces this as the camera permission prompt.
    Failed(String),
}

/// Creates the camera subscription for the given device index.
///
/// Each `(index, attempt)` pair gets its own subscription identity:
/// switching devices tears the previous stream down, and bumping the
/// attempt counter restarts a stream that ended in failure.
pub fn subscription(camera_index: u32, attempt: u32) -> Subscription<Event> {
    Subscription::run_with_id(("camera", camera_index, attempt), frames(camera_index))
}

fn frames(camera_index: u32) -> impl Stream<Item = Event> {
    stream::channel(FRAME_CHANNEL_CAPACITY, move |mut output| async move {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<Event>(FRAME_CHANNEL_CAPACITY);

        std::thread::spawn(move || run_camera(camera_index, &tx));

        while let Some(event) = rx.recv().await {
            if output.send(event).await.is_err() {
                break;
            }
        }
    })
}

/// Blocking capture loop. Runs until the receiving side hangs up or the
/// device reports an error.
fn run_camera(camera_index: u32, tx: &tokio::sync::mpsc::Sender<Event>) {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

    let mut camera = match Camera::new(CameraIndex::Index(camera_index), requested) {
        Ok(camera) => camera,
        Err(error) => {
            let _ = tx.blocking_send(Event::Failed(format!(
                "failed to open camera {camera_index}: {error}"
            )));
            return;
        }
    };

    if let Err(error) = camera.open_stream() {
        let _ = tx.blocking_send(Event::Failed(format!(
            "failed to start camera stream: {error}"
        )));
        return;
    }

    let resolution = camera.resolution();
    if tx
        .blocking_send(Event::Opened {
            width: resolution.width(),
            height: resolution.height(),
        })
        .is_err()
    {
        let _ = camera.stop_stream();
        return;
    }

    loop {
        let frame = match camera.frame() {
            Ok(frame) => frame,
            Err(error) => {
                let _ = tx.blocking_send(Event::Failed(format!("camera frame failed: {error}")));
                break;
            }
        };

        let decoded = match frame.decode_image::<RgbFormat>() {
            Ok(decoded) => decoded,
            Err(error) => {
                let _ = tx.blocking_send(Event::Failed(format!("frame decode failed: {error}")));
                break;
            }
        };

        let image = rgb_frame_to_image(decoded.width(), decoded.height(), decoded.into_raw());
        if tx.blocking_send(Event::Frame(image)).is_err() {
            break;
        }
    }

    let _ = camera.stop_stream();
}

/// Converts a packed RGB frame into the app's RGBA container.
#[must_use]
pub fn rgb_frame_to_image(width: u32, height: u32, rgb: Vec<u8>) -> ImageData {
    let mut rgba = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for pixel in rgb.chunks_exact(3) {
        rgba.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
    }
    ImageData::from_rgba(width, height, rgba)
}
