// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.

use super::{App, Message, PendingCapture, Screen};
use crate::capture::{fallback, SurfacePixels};
use crate::error::{CaptureError, Error, Result};
use crate::media::{compose, CaptureData, ImageData};
use crate::session::{poller, ListenerState};
use crate::ui::{adjust_page, capture_page, media_card};
use iced::widget::container;
use iced::Task;

pub(crate) fn handle(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::CapturePage(message) => {
            let (task, event) = app.capture_page.update(message);
            let event_task = match event {
                Some(capture_page::Event::Captured {
                    base,
                    rotation,
                    adjust,
                }) => begin_overlay_capture(app, base, rotation, adjust),
                Some(capture_page::Event::Card(card_message)) => {
                    apply_card_message(app, card_message);
                    Task::none()
                }
                Some(capture_page::Event::RetryListener) => retry_listener(app),
                None => Task::none(),
            };
            Task::batch([task.map(Message::CapturePage), event_task])
        }

        Message::AdjustPage(message) => {
            let Some(adjust) = &mut app.adjust else {
                return Task::none();
            };
            match adjust.update(message) {
                Some(adjust_page::Event::SaveRequested) => save_adjusted(app),
                Some(adjust_page::Event::Dismissed) => {
                    dismiss_adjust(app);
                    Task::none()
                }
                None => Task::none(),
            }
        }

        Message::Card(message) => {
            apply_card_message(app, message);
            Task::none()
        }

        Message::PollTick(_) => Task::batch([
            Task::perform(poller::poll_sessions(), Message::SessionsPolled),
            card_bounds_task(),
        ]),

        Message::AnimationTick(now) => {
            let dt = app
                .last_tick
                .map(|last| now.saturating_duration_since(last).as_secs_f32())
                .unwrap_or(0.0);
            app.last_tick = Some(now);

            if !app.card.is_empty() {
                app.card.advance_wave(dt);
            }
            app.accent.tick(dt);
            Task::none()
        }

        Message::SessionsPolled(Ok(mut sessions)) => {
            app.listener = ListenerState::Available;

            // Re-attach artwork decoded on earlier polls.
            for session in &mut sessions {
                if session.artwork.is_some() {
                    continue;
                }
                if let Some(url) = session.art_url.clone() {
                    if let Some(artwork) = app.artwork_cache.get(&url) {
                        session.attach_artwork(artwork.clone());
                    }
                }
            }

            app.card.apply_sessions(sessions);
            refresh_accent(app);
            fetch_missing_artwork(app)
        }

        Message::SessionsPolled(Err(error)) => {
            if !app.listener.is_unavailable() {
                eprintln!("session poll failed: {error}");
            }
            app.listener = ListenerState::Unavailable(error.to_string());
            app.card.apply_sessions(Vec::new());
            refresh_accent(app);
            Task::none()
        }

        Message::RetryListener => retry_listener(app),

        Message::ArtworkLoaded { url, result } => {
            app.artwork_in_flight.remove(&url);
            match result {
                Ok(artwork) => {
                    app.card.attach_artwork(&url, &artwork);
                    app.artwork_cache.put(url, artwork);
                    refresh_accent(app);
                }
                Err(error) => {
                    eprintln!("artwork load failed for {url}: {error}");
                    app.artwork_failed.insert(url);
                }
            }
            Task::none()
        }

        Message::CardBoundsFetched(bounds) => {
            if let Some(bounds) = bounds {
                app.region.set_bounds(bounds);
            }
            Task::none()
        }

        Message::OverlayScreenshot(screenshot) => finish_overlay_capture(app, screenshot),

        Message::Saved(Ok(path)) => {
            app.capture_page
                .set_status(format!("Image saved {}", path.display()));
            dismiss_adjust(app);
            Task::none()
        }

        Message::Saved(Err(error)) => {
            eprintln!("image save failed: {error}");
            app.capture_page.set_status(format!("Save failed: {error}"));
            Task::none()
        }

        Message::EscapePressed => {
            if app.screen == Screen::Adjust {
                dismiss_adjust(app);
            }
            Task::none()
        }
    }
}

/// Queries the on-screen bounds of the card region.
pub(crate) fn card_bounds_task() -> Task<Message> {
    container::visible_bounds(capture_page::card_region_id()).map(Message::CardBoundsFetched)
}

fn dismiss_adjust(app: &mut App) {
    app.adjust = None;
    app.screen = Screen::Capture;
}

fn apply_card_message(app: &mut App, message: media_card::Message) {
    app.card.update(message);
    refresh_accent(app);
}

/// Points the app accent at the current card's colour.
fn refresh_accent(app: &mut App) {
    let target = app
        .card
        .current_accent()
        .unwrap_or(media_card::FALLBACK_ACCENT);
    app.accent.set_target(target);
}

fn retry_listener(app: &mut App) -> Task<Message> {
    app.listener = ListenerState::Unknown;
    Task::perform(poller::poll_sessions(), Message::SessionsPolled)
}

/// Starts artwork downloads for sessions that announced a URL we have
/// not fetched yet.
fn fetch_missing_artwork(app: &mut App) -> Task<Message> {
    let mut tasks = Vec::new();

    for url in app.card.pending_art_urls() {
        if app.artwork_in_flight.contains(&url)
            || app.artwork_failed.contains(&url)
            || app.artwork_cache.contains(&url)
        {
            continue;
        }

        app.artwork_in_flight.insert(url.clone());
        let message_url = url.clone();
        tasks.push(Task::perform(poller::load_artwork(url), move |result| {
            Message::ArtworkLoaded {
                url: message_url.clone(),
                result,
            }
        }));
    }

    Task::batch(tasks)
}

/// A frame was captured; snapshot the card next. The preferred path is a
/// window surface read-back cropped to the card bounds.
fn begin_overlay_capture(
    app: &mut App,
    base: ImageData,
    rotation: crate::media::QuarterTurns,
    adjust: bool,
) -> Task<Message> {
    if !app.region.can_capture() {
        // The capture button is gated on bounds, so this only happens if
        // layout never completed.
        app.capture_page
            .set_status("Capture failed: status card has no layout yet".into());
        return Task::none();
    }

    app.pending_capture = Some(PendingCapture {
        base,
        rotation,
        adjust,
    });

    iced::window::get_latest()
        .then(|id| match id {
            Some(id) => iced::window::screenshot(id).map(Some),
            None => Task::done(None),
        })
        .map(Message::OverlayScreenshot)
}

/// Completes the pending capture once the overlay snapshot is available,
/// falling back to the software rasterizer when the read-back failed.
fn finish_overlay_capture(
    app: &mut App,
    screenshot: Option<iced::window::Screenshot>,
) -> Task<Message> {
    let Some(pending) = app.pending_capture.take() else {
        return Task::none();
    };

    let overlay = match screenshot {
        Some(screenshot) => {
            let surface = SurfacePixels {
                width: screenshot.size.width,
                height: screenshot.size.height,
                scale_factor: screenshot.scale_factor,
                bytes: screenshot.bytes.to_vec(),
            };
            match app.region.capture_from_surface(&surface) {
                Ok(overlay) => Ok(overlay),
                Err(error) => {
                    eprintln!("surface capture failed, using software raster: {error}");
                    software_overlay(app)
                }
            }
        }
        None => software_overlay(app),
    };

    match overlay {
        Ok(overlay) => {
            let data = CaptureData::new(app.card.current_session().cloned(), pending.rotation);

            if pending.adjust {
                app.adjust = Some(adjust_page::State::new(pending.base, overlay, data));
                app.screen = Screen::Adjust;
                Task::none()
            } else {
                save_task(app, pending.base, overlay, data)
            }
        }
        Err(error) => {
            eprintln!("overlay capture failed: {error}");
            app.capture_page
                .set_status(format!("Capture failed: {error}"));
            Task::none()
        }
    }
}

/// Rebuilds the card from its model when no surface read-back exists.
fn software_overlay(app: &App) -> Result<ImageData> {
    let bounds = app
        .region
        .bounds()
        .ok_or(Error::Capture(CaptureError::BoundsUnknown))?;

    fallback::rasterize_card(
        app.card.current_session(),
        bounds.width.round() as u32,
        bounds.height.round() as u32,
        app.card.wave_progress(),
    )
}

fn save_adjusted(app: &mut App) -> Task<Message> {
    let Some(adjust) = &app.adjust else {
        return Task::none();
    };
    let base = adjust.base().clone();
    let overlay = adjust.overlay().clone();
    let data = adjust.data().clone();
    save_task(app, base, overlay, data)
}

/// Runs the composite export off-thread. Write failures terminate the
/// task and are reported once.
fn save_task(
    app: &mut App,
    base: ImageData,
    overlay: ImageData,
    data: CaptureData,
) -> Task<Message> {
    let Some(output_dir) = app.output_dir.clone() else {
        app.capture_page
            .set_status("Save failed: no pictures directory on this system".into());
        return Task::none();
    };

    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || {
                let export = compose::export_base(&base, data.rotation);
                compose::save_composite(&export, &overlay, &data, &output_dir)
            })
            .await
            .unwrap_or_else(|e| Err(Error::Io(format!("save task failed: {e}"))))
        },
        Message::Saved,
    )
}
