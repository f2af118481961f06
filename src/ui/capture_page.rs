// SPDX-License-Identifier: MPL-2.0
//! The capture screen: selector area, capture controls and the status
//! card.

use crate::media::{ImageData, QuarterTurns};
use crate::session::ListenerState;
use crate::ui::components::PermissionPrompt;
use crate::ui::design_tokens::{sizing, spacing};
use crate::ui::media_card;
use crate::ui::selector::{camera, gallery, SelectorKind};
use crate::ui::styles::button as button_styles;
use crate::ui::theming::AccentState;
use iced::widget::{button, container, text, toggler, Column, Row, Space, Stack};
use iced::{Alignment, Element, Length, Subscription, Task};
use std::path::PathBuf;

/// Identity of the card region container, used to query its on-screen
/// bounds for the overlay capture.
#[must_use]
pub fn card_region_id() -> container::Id {
    container::Id::new("status-card")
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Swap to the other image source.
    SwapSelector,
    AdjustToggled(bool),
    CapturePressed,
    Camera(camera::Message),
    Gallery(gallery::Message),
    Card(media_card::Message),
    /// Probe the session bus again after the listener prompt.
    RetryListener,
    DismissStatus,
}

/// Events bubbled up to the application.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user captured a frame; the app snapshots the card next.
    Captured {
        base: ImageData,
        rotation: QuarterTurns,
        adjust: bool,
    },
    /// Card pager interaction, applied to the shared card state.
    Card(media_card::Message),
    /// The user asked to re-probe the session listener.
    RetryListener,
}

/// Capture screen state.
#[derive(Debug)]
pub struct State {
    selector: SelectorKind,
    camera: camera::State,
    gallery: gallery::State,
    adjust_after_capture: bool,
    status_line: Option<String>,
}

impl State {
    /// Creates the screen and kicks off the initial gallery scan.
    #[must_use]
    pub fn new(camera_index: u32, gallery_dir: Option<PathBuf>) -> (Self, Task<Message>) {
        let (gallery, scan) = gallery::State::new(gallery_dir);

        let state = Self {
            selector: SelectorKind::default(),
            camera: camera::State::new(camera_index),
            gallery,
            adjust_after_capture: false,
            status_line: None,
        };

        (state, scan.map(Message::Gallery))
    }

    pub fn update(&mut self, message: Message) -> (Task<Message>, Option<Event>) {
        match message {
            Message::SwapSelector => {
                self.selector = self.selector.next();
                (Task::none(), None)
            }
            Message::AdjustToggled(enabled) => {
                self.adjust_after_capture = enabled;
                (Task::none(), None)
            }
            Message::CapturePressed => {
                let captured = match self.selector {
                    SelectorKind::Camera => self.camera.capture_current(),
                    SelectorKind::Gallery => self.gallery.capture_current(),
                };

                let event = captured.map(|(base, rotation)| Event::Captured {
                    base,
                    rotation,
                    adjust: self.adjust_after_capture,
                });
                (Task::none(), event)
            }
            Message::Camera(message) => {
                self.camera.update(message);
                (Task::none(), None)
            }
            Message::Gallery(message) => {
                let task = self.gallery.update(message);
                (task.map(Message::Gallery), None)
            }
            Message::Card(message) => (Task::none(), Some(Event::Card(message))),
            Message::RetryListener => (Task::none(), Some(Event::RetryListener)),
            Message::DismissStatus => {
                self.status_line = None;
                (Task::none(), None)
            }
        }
    }

    /// Camera frames only stream while the camera selector is showing.
    #[must_use]
    pub fn subscription(&self) -> Subscription<Message> {
        match self.selector {
            SelectorKind::Camera => self.camera.subscription().map(Message::Camera),
            SelectorKind::Gallery => Subscription::none(),
        }
    }

    /// The active selector holds a valid frame.
    #[must_use]
    pub fn selector_ready(&self) -> bool {
        match self.selector {
            SelectorKind::Camera => self.camera.can_capture(),
            SelectorKind::Gallery => self.gallery.can_capture(),
        }
    }

    /// True while gallery decodes are outstanding (drives the refresh
    /// tick so finished decodes appear without input).
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(self.selector, SelectorKind::Gallery) && self.gallery.is_decoding()
    }

    /// Feedback line after a save ("Image saved ...", or the error).
    pub fn set_status(&mut self, line: String) {
        self.status_line = Some(line);
    }

    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let accent = ctx.accent;

        let selector_content: Element<'a, Message> = match self.selector {
            SelectorKind::Camera => self.camera.view(accent).map(Message::Camera),
            SelectorKind::Gallery => self.gallery.view(accent).map(Message::Gallery),
        };

        let capture_enabled = self.selector_ready() && ctx.capture_ready;
        let mut capture_button = button(text("Capture").color(accent.on_accent()))
            .style(button_styles::accent(accent.vibrant(), accent.on_accent()));
        if capture_enabled {
            capture_button = capture_button.on_press(Message::CapturePressed);
        }

        let controls = Row::new()
            .padding([0.0, spacing::PAGE])
            .spacing(spacing::PAGE)
            .align_y(Alignment::Center)
            .push(
                toggler(self.adjust_after_capture)
                    .label("Adjust after capture")
                    .on_toggle(Message::AdjustToggled),
            )
            .push(Space::new().width(Length::Fill))
            .push(capture_button);

        let mut page = Column::new().push(
            Column::new()
                .push(selector_content)
                .height(Length::Fill)
                .width(Length::Fill),
        );

        if let Some(status) = &self.status_line {
            page = page.push(
                button(text(status.as_str()).size(12).color(accent.on_accent()))
                    .style(button_styles::flat(accent.on_accent()))
                    .on_press(Message::DismissStatus),
            );
        }

        let card_slot: Element<'a, Message> = if let ListenerState::Unavailable(reason) =
            ctx.listener
        {
            container(
                PermissionPrompt::new("media listener")
                    .detail(reason.clone())
                    .on_retry(Message::RetryListener)
                    .colors(accent.displayed(), accent.on_accent(), accent.vibrant())
                    .view(),
            )
            .center_x(Length::Fill)
            .height(Length::Fixed(sizing::CARD_HEIGHT))
            .padding(spacing::PAGE)
            .into()
        } else {
            ctx.card
                .view(media_card::ViewContext {
                    interactive: true,
                    session_override: None,
                    height: sizing::CARD_HEIGHT,
                })
                .map(Message::Card)
        };

        page = page.push(controls).push(
            container(card_slot)
                .id(card_region_id())
                .width(Length::Fill),
        );

        let swap_button = button(text(self.selector.next().icon()).size(20))
            .style(button_styles::shaped_icon(
                accent.displayed(),
                accent.on_accent(),
            ))
            .width(Length::Fixed(sizing::ICON_BUTTON))
            .on_press(Message::SwapSelector);

        let overlay_controls = Column::new()
            .push(Space::new().height(Length::Fill))
            .push(
                Row::new()
                    .padding(spacing::PAGE)
                    .push(Space::new().width(Length::Fill))
                    .push(swap_button),
            )
            // Keep the floating button above the selector area only.
            .height(Length::Fill);

        Stack::new()
            .push(page)
            .push(
                container(overlay_controls)
                    .padding(iced::Padding {
                        bottom: sizing::CARD_HEIGHT + 40.0,
                        ..iced::Padding::ZERO
                    })
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Context needed to render the capture screen.
pub struct ViewContext<'a> {
    pub card: &'a media_card::State,
    pub accent: &'a AccentState,
    pub listener: &'a ListenerState,
    /// The card region has reported bounds, so a capture can proceed.
    pub capture_ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera as camera_worker;

    fn state() -> State {
        State::new(0, None).0
    }

    fn feed_camera_frame(state: &mut State) {
        let frame = ImageData::from_rgba(4, 4, vec![9u8; 64]);
        let (_, event) = state.update(Message::Camera(camera::Message::Camera(
            camera_worker::Event::Frame(frame),
        )));
        assert!(event.is_none());
    }

    #[test]
    fn capture_does_nothing_without_a_frame() {
        let mut state = state();
        let (_, event) = state.update(Message::CapturePressed);
        assert!(event.is_none());
        assert!(!state.selector_ready());
    }

    #[test]
    fn capture_emits_event_with_adjust_flag() {
        let mut state = state();
        feed_camera_frame(&mut state);

        let (_, event) = state.update(Message::AdjustToggled(true));
        assert!(event.is_none());

        let (_, event) = state.update(Message::CapturePressed);
        match event {
            Some(Event::Captured {
                adjust, rotation, ..
            }) => {
                assert!(adjust);
                assert_eq!(rotation, QuarterTurns::ONE);
            }
            other => panic!("expected capture event, got {other:?}"),
        }
    }

    #[test]
    fn swapping_selector_clears_readiness_until_other_source_loads() {
        let mut state = state();
        feed_camera_frame(&mut state);
        assert!(state.selector_ready());

        let _ = state.update(Message::SwapSelector);
        assert_eq!(state.selector, SelectorKind::Gallery);
        assert!(!state.selector_ready());
    }

    #[test]
    fn card_messages_bubble_to_the_app() {
        let mut state = state();
        let (_, event) = state.update(Message::Card(media_card::Message::NextSession));
        assert!(matches!(event, Some(Event::Card(_))));
    }

    #[test]
    fn status_line_can_be_set_and_dismissed() {
        let mut state = state();
        state.set_status("Image saved /tmp/x.jpg".into());
        assert!(state.status_line.is_some());

        let _ = state.update(Message::DismissStatus);
        assert!(state.status_line.is_none());
    }
}
