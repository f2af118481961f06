// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::Error;
use crate::media::ImageData;
use crate::session::SessionSnapshot;
use crate::ui::{adjust_page, capture_page, media_card};
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update
/// entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    CapturePage(capture_page::Message),
    AdjustPage(adjust_page::Message),
    Card(media_card::Message),

    /// One-second cadence: poll the session bus, refresh card bounds.
    PollTick(Instant),
    /// Fast cadence while something animates (waves, accent blend) or
    /// gallery decodes are landing.
    AnimationTick(Instant),

    SessionsPolled(Result<Vec<SessionSnapshot>, Error>),
    /// Probe the session bus again after a permission prompt.
    RetryListener,
    ArtworkLoaded {
        url: String,
        result: Result<ImageData, Error>,
    },

    /// Result of querying the card container's on-screen bounds.
    CardBoundsFetched(Option<iced::Rectangle>),
    /// Result of the window surface read-back for the overlay capture.
    OverlayScreenshot(Option<iced::window::Screenshot>),

    Saved(Result<PathBuf, Error>),
    EscapePressed,
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Overrides the directory browsed by the gallery selector.
    pub gallery_dir: Option<PathBuf>,
    /// Overrides the directory receiving exported composites.
    pub output_dir: Option<PathBuf>,
    /// Overrides the capture device index.
    pub camera_index: Option<u32>,
}
