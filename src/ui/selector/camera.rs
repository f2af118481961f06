// SPDX-License-Identifier: MPL-2.0
//! Live camera selector.
//!
//! Shows the webcam preview and freezes the most recent frame on
//! capture. Camera frames arrive a quarter turn off (the sensor mount),
//! so captures carry a rotation quantum of one; the export path rotates
//! them upright.

use crate::camera;
use crate::media::{ImageData, QuarterTurns};
use crate::ui::components::PermissionPrompt;
use crate::ui::design_tokens::{sizing, spacing};
use crate::ui::styles::button as button_styles;
use crate::ui::theming::AccentState;
use iced::widget::{button, container, image, text, Column, Row, Space, Stack};
use iced::{Alignment, ContentFit, Element, Length, Subscription};

#[derive(Debug, Clone)]
pub enum Message {
    Camera(camera::Event),
    /// Switch to the next capture device.
    FlipDevice,
    /// Re-open the device after a failure.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Connecting,
    Streaming { width: u32, height: u32 },
    Failed(String),
}

/// Camera selector state.
#[derive(Debug)]
pub struct State {
    device_index: u32,
    /// Bumped on retry so the subscription identity changes and the
    /// stream restarts.
    attempt: u32,
    status: Status,
    latest_frame: Option<ImageData>,
}

impl State {
    #[must_use]
    pub fn new(device_index: u32) -> Self {
        Self {
            device_index,
            attempt: 0,
            status: Status::Connecting,
            latest_frame: None,
        }
    }

    /// The frame stream for the active device. Only subscribed while the
    /// camera selector is visible; switching away closes the device.
    #[must_use]
    pub fn subscription(&self) -> Subscription<Message> {
        camera::subscription(self.device_index, self.attempt).map(Message::Camera)
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Camera(camera::Event::Opened { width, height }) => {
                self.status = Status::Streaming { width, height };
            }
            Message::Camera(camera::Event::Frame(frame)) => {
                self.latest_frame = Some(frame);
            }
            Message::Camera(camera::Event::Failed(reason)) => {
                self.status = Status::Failed(reason);
                self.latest_frame = None;
            }
            Message::FlipDevice => {
                self.device_index = self.device_index.wrapping_add(1);
                self.restart();
            }
            Message::Retry => {
                self.restart();
            }
        }
    }

    fn restart(&mut self) {
        self.attempt = self.attempt.wrapping_add(1);
        self.status = Status::Connecting;
        self.latest_frame = None;
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// A valid frame exists, so the capture button may enable.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        self.latest_frame.is_some()
    }

    /// Freezes the most recent preview frame.
    #[must_use]
    pub fn capture_current(&self) -> Option<(ImageData, QuarterTurns)> {
        self.latest_frame
            .clone()
            .map(|frame| (frame, QuarterTurns::ONE))
    }

    pub fn view<'a>(&'a self, accent: &AccentState) -> Element<'a, Message> {
        let content: Element<'a, Message> = match (&self.status, &self.latest_frame) {
            (Status::Failed(reason), _) => container(
                PermissionPrompt::new("camera")
                    .detail(reason.clone())
                    .on_retry(Message::Retry)
                    .colors(accent.displayed(), accent.on_accent(), accent.vibrant())
                    .view(),
            )
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
            (_, Some(frame)) => image(frame.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            (Status::Connecting | Status::Streaming { .. }, None) => {
                container(text("Opening camera...").color(accent.on_accent()))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into()
            }
        };

        let flip_button = button(text("\u{21BB}").size(20))
            .style(button_styles::shaped_icon(
                accent.displayed(),
                accent.on_accent(),
            ))
            .width(Length::Fixed(sizing::ICON_BUTTON))
            .on_press(Message::FlipDevice);

        let controls = Column::new()
            .push(Space::new().height(Length::Fill))
            .push(
                Row::new()
                    .padding(spacing::PAGE)
                    .align_y(Alignment::End)
                    .push(Space::new().width(Length::Fill))
                    .push(flip_button),
            );

        Stack::new()
            .push(content)
            .push(controls)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
