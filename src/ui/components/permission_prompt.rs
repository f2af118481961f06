// SPDX-License-Identifier: MPL-2.0
//! Persistent permission prompt with a retry affordance.
//!
//! Denied access (camera device, gallery directory, session listener) is
//! surfaced through this component instead of crashing or silently
//! disabling features. The prompt stays visible until a retry succeeds.
//!
//! # Usage
//!
//! ```ignore
//! PermissionPrompt::new("camera")
//!     .detail(error_text)
//!     .on_retry(Message::RetryCamera)
//!     .colors(accent, on_accent, vibrant)
//!     .view()
//! ```

use crate::ui::design_tokens::{palette, radius, spacing};
use crate::ui::styles::button as button_styles;
use iced::widget::{button, container, text, Column};
use iced::{Alignment, Border, Color, Element};

/// Builder for the prompt shown in place of gated content.
#[derive(Debug, Clone)]
pub struct PermissionPrompt<Message> {
    permission_name: String,
    detail: Option<String>,
    retry: Option<Message>,
    fill: Color,
    text_color: Color,
    button_fill: Color,
}

impl<Message: Clone + 'static> PermissionPrompt<Message> {
    #[must_use]
    pub fn new(permission_name: impl Into<String>) -> Self {
        Self {
            permission_name: permission_name.into(),
            detail: None,
            retry: None,
            fill: palette::PRIMARY_500,
            text_color: palette::WHITE,
            button_fill: palette::PRIMARY_400,
        }
    }

    /// Technical detail line under the headline (the underlying error).
    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Message emitted by the grant/retry button.
    #[must_use]
    pub fn on_retry(mut self, message: Message) -> Self {
        self.retry = Some(message);
        self
    }

    /// Paints the prompt with the current accent colours.
    #[must_use]
    pub fn colors(mut self, fill: Color, text: Color, button_fill: Color) -> Self {
        self.fill = fill;
        self.text_color = text;
        self.button_fill = button_fill;
        self
    }

    pub fn view(self) -> Element<'static, Message> {
        let mut column = Column::new()
            .spacing(spacing::PAGE)
            .align_x(Alignment::Center)
            .push(
                text(format!("Missing {} permission", self.permission_name))
                    .color(self.text_color),
            );

        if let Some(detail) = self.detail {
            column = column.push(text(detail).size(12).color(Color {
                a: 0.7,
                ..self.text_color
            }));
        }

        if let Some(retry) = self.retry {
            column = column.push(
                button(text("Grant permission").color(self.text_color))
                    .style(button_styles::accent(self.button_fill, self.text_color))
                    .on_press(retry),
            );
        }

        let fill = self.fill;
        let border_color = self.button_fill;
        container(column)
            .padding(spacing::MD)
            .style(move |_theme: &iced::Theme| container::Style {
                background: Some(iced::Background::Color(fill)),
                border: Border {
                    color: border_color,
                    width: 2.0,
                    radius: radius::LG.into(),
                },
                ..Default::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestMessage {
        Retry,
    }

    #[test]
    fn builder_collects_fields() {
        let prompt = PermissionPrompt::new("camera")
            .detail("device busy")
            .on_retry(TestMessage::Retry);

        assert_eq!(prompt.permission_name, "camera");
        assert_eq!(prompt.detail.as_deref(), Some("device busy"));
        assert_eq!(prompt.retry, Some(TestMessage::Retry));
    }

    #[test]
    fn view_builds_without_retry() {
        let _: Element<'static, TestMessage> = PermissionPrompt::new("gallery").view();
    }
}
