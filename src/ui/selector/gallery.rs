// SPDX-License-Identifier: MPL-2.0
//! Gallery selector: pages through the pictures directory.
//!
//! Decoding happens through the bounded [`DecodePool`]; paging moves the
//! pool's window so images near the viewed one are decoded ahead of time
//! and far-away work is cancelled.

use crate::error::Error;
use crate::media::decode::DECODE_WINDOW_RADIUS;
use crate::media::{gallery, DecodePool, ImageData, ImageRecord, QuarterTurns};
use crate::session::accent;
use crate::ui::components::PermissionPrompt;
use crate::ui::design_tokens::spacing;
use crate::ui::styles::button as button_styles;
use crate::ui::theming::AccentState;
use iced::widget::{button, container, image, text, Column, Row, Space};
use iced::{Alignment, ContentFit, Element, Length, Task};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Message {
    Scanned(Result<Vec<ImageRecord>, Error>),
    NextImage,
    PreviousImage,
    /// Rescan after a failure (or after granting directory access).
    Retry,
}

/// Gallery selector state.
#[derive(Debug)]
pub struct State {
    directory: Option<PathBuf>,
    records: Option<Vec<ImageRecord>>,
    error: Option<String>,
    current: usize,
    pool: DecodePool,
}

impl State {
    /// Creates the selector and the initial scan task.
    #[must_use]
    pub fn new(directory: Option<PathBuf>) -> (Self, Task<Message>) {
        let state = Self {
            directory: directory.clone(),
            records: None,
            error: None,
            current: 0,
            pool: DecodePool::new(),
        };

        (state, scan_task(directory))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Scanned(Ok(records)) => {
                self.records = Some(records);
                self.error = None;
                self.current = 0;
                self.request_window();
            }
            Message::Scanned(Err(error)) => {
                self.error = Some(error.to_string());
                self.records = None;
            }
            Message::NextImage => {
                let len = self.len();
                if len > 0 && self.current + 1 < len {
                    self.current += 1;
                    self.request_window();
                }
            }
            Message::PreviousImage => {
                if self.current > 0 {
                    self.current -= 1;
                    self.request_window();
                }
            }
            Message::Retry => {
                self.error = None;
                self.records = None;
                return scan_task(self.directory.clone());
            }
        }

        Task::none()
    }

    /// Requests decodes around the viewed index and cancels far-away
    /// work.
    fn request_window(&mut self) {
        let Some(records) = &self.records else {
            return;
        };

        self.pool.focus(self.current);

        let start = self.current.saturating_sub(DECODE_WINDOW_RADIUS);
        let end = (self.current + DECODE_WINDOW_RADIUS + 1).min(records.len());
        for index in start..end {
            self.pool.request(index, records[index].path.clone());
        }
    }

    fn len(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn current_record(&self) -> Option<&ImageRecord> {
        self.records.as_ref()?.get(self.current)
    }

    /// True while background decodes are outstanding; drives the refresh
    /// tick.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        self.pool.has_pending()
    }

    /// A decoded image is on screen, so the capture button may enable.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        self.pool.contains(self.current)
    }

    /// Captures the currently displayed image. Gallery images are already
    /// upright, so the rotation quantum is zero.
    #[must_use]
    pub fn capture_current(&self) -> Option<(ImageData, QuarterTurns)> {
        self.pool
            .get(self.current)
            .map(|img| (img, QuarterTurns::ZERO))
    }

    pub fn view<'a>(&'a self, accent: &AccentState) -> Element<'a, Message> {
        if let Some(error) = &self.error {
            return container(
                PermissionPrompt::new("gallery")
                    .detail(error.clone())
                    .on_retry(Message::Retry)
                    .colors(accent.displayed(), accent.on_accent(), accent.vibrant())
                    .view(),
            )
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
        }

        let Some(records) = &self.records else {
            return container(text("Reading gallery...").color(accent.on_accent()))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        if records.is_empty() {
            return container(text("No pictures found").color(accent.on_accent()))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let picture: Element<'a, Message> = match self.pool.get(self.current) {
            Some(decoded) => image(decoded.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Loading...").color(accent.on_accent()))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let position = text(format!("{} / {}", self.current + 1, records.len()))
            .size(12)
            .color(accent.on_accent());

        let name = self
            .current_record()
            .map(|record| record.name.clone())
            .unwrap_or_default();

        let mut previous = button(text("\u{2039}").size(20))
            .style(button_styles::flat(accent.on_accent()));
        if self.current > 0 {
            previous = previous.on_press(Message::PreviousImage);
        }

        let mut next = button(text("\u{203A}").size(20))
            .style(button_styles::flat(accent.on_accent()));
        if self.current + 1 < records.len() {
            next = next.on_press(Message::NextImage);
        }

        Column::new()
            .push(picture)
            .push(
                Row::new()
                    .padding(spacing::XS)
                    .spacing(spacing::SM)
                    .align_y(Alignment::Center)
                    .push(previous)
                    .push(position)
                    .push(next)
                    .push(
                        text(name)
                            .size(12)
                            .color(accent::with_alpha(accent.on_accent(), 0.7)),
                    )
                    .push(Space::new().width(Length::Fill)),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn scan_task(directory: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let Some(dir) = gallery::resolve_directory(directory.as_deref()) else {
                return Err(Error::Io("no pictures directory on this system".into()));
            };
            tokio::task::spawn_blocking(move || gallery::scan(&dir))
                .await
                .unwrap_or_else(|e| Err(Error::Io(format!("gallery scan task failed: {e}"))))
        },
        Message::Scanned,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_pictures(dir: &std::path::Path, count: usize) {
        for i in 0..count {
            RgbaImage::from_pixel(2, 2, Rgba([i as u8, 0, 0, 255]))
                .save(dir.join(format!("{i:03}.png")))
                .expect("failed to write picture");
        }
    }

    async fn scanned_state(count: usize) -> (State, tempfile::TempDir) {
        let temp_dir = tempdir().expect("failed to create temp dir");
        write_pictures(temp_dir.path(), count);

        let (mut state, _task) = State::new(Some(temp_dir.path().to_path_buf()));
        let records = gallery::scan(temp_dir.path()).expect("scan");
        let _ = state.update(Message::Scanned(Ok(records)));
        (state, temp_dir)
    }

    async fn wait_for_decode(state: &State, index: usize) {
        for _ in 0..200 {
            if state.pool.contains(index) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("decode for index {index} did not finish");
    }

    #[tokio::test]
    async fn scan_failure_surfaces_as_error_state() {
        let (mut state, _task) = State::new(None);
        let _ = state.update(Message::Scanned(Err(Error::Io("denied".into()))));

        assert!(state.error.is_some());
        assert!(!state.can_capture());
    }

    #[tokio::test]
    async fn capture_waits_for_decode_then_returns_upright_image() {
        let (state, _dir) = scanned_state(3).await;
        wait_for_decode(&state, 0).await;

        let (image, rotation) = state.capture_current().expect("decoded");
        assert_eq!(rotation, QuarterTurns::ZERO);
        assert_eq!(image.width, 2);
    }

    #[tokio::test]
    async fn paging_clamps_at_both_ends() {
        let (mut state, _dir) = scanned_state(2).await;

        let _ = state.update(Message::PreviousImage);
        assert_eq!(state.current, 0);

        let _ = state.update(Message::NextImage);
        assert_eq!(state.current, 1);
        let _ = state.update(Message::NextImage);
        assert_eq!(state.current, 1);
    }

    #[tokio::test]
    async fn paging_requests_decodes_around_the_window() {
        let (state, _dir) = scanned_state(3).await;
        wait_for_decode(&state, 0).await;
        wait_for_decode(&state, 2).await;
        assert!(state.pool.contains(1));
    }
}
