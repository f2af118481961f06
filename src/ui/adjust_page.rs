// SPDX-License-Identifier: MPL-2.0
//! The adjust screen: rotate the captured photo in quarter turns and
//! nudge the overlay before saving.

use crate::media::{CaptureData, ImageData};
use crate::ui::design_tokens::{sizing, spacing};
use crate::ui::media_card;
use crate::ui::styles::button as button_styles;
use crate::ui::theming::AccentState;
use iced::widget::{button, container, image, text, Column, Row, Space};
use iced::{Alignment, ContentFit, Element, Length};

/// Pixels moved per offset nudge.
const NUDGE_STEP: f32 = 10.0;

#[derive(Debug, Clone)]
pub enum Message {
    RotateClockwise,
    RotateCounterclockwise,
    /// Shift the overlay by a step in the given direction.
    Nudge(f32, f32),
    ResetOffset,
    Save,
    Back,
    /// Pager messages from the pinned card preview; inert here.
    Card(media_card::Message),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Run the export with the adjusted capture data.
    SaveRequested,
    /// Return to the capture screen without saving.
    Dismissed,
}

/// Adjust screen state: the frozen capture plus its editable data.
#[derive(Debug)]
pub struct State {
    base: ImageData,
    overlay: ImageData,
    data: CaptureData,
    /// Base image pre-rotated by the current quantum, cached for display.
    display: ImageData,
}

impl State {
    #[must_use]
    pub fn new(base: ImageData, overlay: ImageData, data: CaptureData) -> Self {
        let display = base.rotated(data.rotation.turns());
        Self {
            base,
            overlay,
            data,
            display,
        }
    }

    pub fn update(&mut self, message: Message) -> Option<Event> {
        match message {
            Message::RotateClockwise => {
                self.data.rotation = self.data.rotation.clockwise();
                self.display = self.base.rotated(self.data.rotation.turns());
                None
            }
            Message::RotateCounterclockwise => {
                self.data.rotation = self.data.rotation.counterclockwise();
                self.display = self.base.rotated(self.data.rotation.turns());
                None
            }
            Message::Nudge(dx, dy) => {
                self.data.overlay_offset.0 += dx * NUDGE_STEP;
                self.data.overlay_offset.1 += dy * NUDGE_STEP;
                None
            }
            Message::ResetOffset => {
                self.data.overlay_offset = (0.0, 0.0);
                None
            }
            Message::Save => Some(Event::SaveRequested),
            Message::Back => Some(Event::Dismissed),
            Message::Card(_) => None,
        }
    }

    #[must_use]
    pub fn base(&self) -> &ImageData {
        &self.base
    }

    #[must_use]
    pub fn overlay(&self) -> &ImageData {
        &self.overlay
    }

    #[must_use]
    pub fn data(&self) -> &CaptureData {
        &self.data
    }

    pub fn view<'a>(&'a self, card: &'a media_card::State, accent: &AccentState) -> Element<'a, Message> {
        let on_accent = accent.on_accent();

        let toolbar = Row::new()
            .padding(spacing::PAGE)
            .spacing(spacing::SM)
            .align_y(Alignment::Center)
            .push(
                button(text("Back").color(on_accent))
                    .style(button_styles::flat(on_accent))
                    .on_press(Message::Back),
            )
            .push(Space::new().width(Length::Fill))
            .push(
                button(text("\u{27F2}").size(18).color(on_accent))
                    .style(button_styles::flat(on_accent))
                    .on_press(Message::RotateCounterclockwise),
            )
            .push(
                button(text("\u{27F3}").size(18).color(on_accent))
                    .style(button_styles::flat(on_accent))
                    .on_press(Message::RotateClockwise),
            )
            .push(Space::new().width(Length::Fill))
            .push(
                button(text("Save").color(on_accent))
                    .style(button_styles::accent(accent.vibrant(), on_accent))
                    .on_press(Message::Save),
            );

        let offset = self.data.overlay_offset;
        let nudge_row = Row::new()
            .padding([0.0, spacing::PAGE])
            .spacing(spacing::XS)
            .align_y(Alignment::Center)
            .push(text("Overlay").size(12).color(on_accent))
            .push(nudge_button("\u{2190}", (-1.0, 0.0), on_accent))
            .push(nudge_button("\u{2192}", (1.0, 0.0), on_accent))
            .push(nudge_button("\u{2191}", (0.0, -1.0), on_accent))
            .push(nudge_button("\u{2193}", (0.0, 1.0), on_accent))
            .push(
                button(text("Reset").size(12).color(on_accent))
                    .style(button_styles::flat(on_accent))
                    .on_press(Message::ResetOffset),
            )
            .push(
                text(format!("({:+.0}, {:+.0})", offset.0, offset.1))
                    .size(12)
                    .color(on_accent),
            );

        let preview = container(
            image(self.display.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .padding(spacing::PAGE)
        .width(Length::Fill)
        .height(Length::Fill);

        let card_preview = card
            .view(media_card::ViewContext {
                interactive: false,
                session_override: self.data.session.as_ref(),
                height: sizing::CARD_PREVIEW_HEIGHT,
            })
            .map(Message::Card);

        Column::new()
            .push(toolbar)
            .push(preview)
            .push(nudge_row)
            .push(card_preview)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn nudge_button(
    glyph: &str,
    direction: (f32, f32),
    color: iced::Color,
) -> iced::widget::Button<'_, Message> {
    button(text(glyph).size(14).color(color))
        .style(button_styles::flat(color))
        .on_press(Message::Nudge(direction.0, direction.1))
}
