// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::{App, Message, Screen};
use crate::ui::capture_page;
use crate::ui::styles::container as container_styles;
use iced::widget::{container, text};
use iced::{Element, Length};

/// Renders the current screen over the accent-coloured surface.
pub(crate) fn view(app: &App) -> Element<'_, Message> {
    let content: Element<'_, Message> = match app.screen {
        Screen::Capture => app
            .capture_page
            .view(capture_page::ViewContext {
                card: &app.card,
                accent: &app.accent,
                listener: &app.listener,
                capture_ready: app.region.can_capture(),
            })
            .map(Message::CapturePage),
        Screen::Adjust => match &app.adjust {
            Some(adjust) => adjust.view(&app.card, &app.accent).map(Message::AdjustPage),
            // Fallback if adjust state is missing
            None => container(text("Adjust error"))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        },
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(container_styles::accent_surface(app.accent.displayed()))
        .into()
}
