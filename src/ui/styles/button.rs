// SPDX-License-Identifier: MPL-2.0
//! Centralized button styles.
//!
//! Most buttons follow the current accent colour, so the style functions
//! here close over concrete colours instead of reading the Iced theme.

use crate::ui::design_tokens::{opacity, radius};
use iced::widget::button;
use iced::{Background, Border, Color, Theme};

/// Accent-filled action button (capture, save, grant permission).
pub fn accent(fill: Color, text: Color) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme: &Theme, status: button::Status| {
        let background = match status {
            button::Status::Hovered => lighten(fill, 0.08),
            button::Status::Pressed => darken(fill, 0.08),
            button::Status::Disabled => Color {
                a: opacity::OVERLAY_SUBTLE,
                ..text
            },
            button::Status::Active => fill,
        };
        let text_color = match status {
            button::Status::Disabled => Color {
                a: opacity::OVERLAY_MEDIUM,
                ..fill
            },
            _ => text,
        };

        button::Style {
            background: Some(Background::Color(background)),
            text_color,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: radius::LG.into(),
            },
            snap: true,
            ..Default::default()
        }
    }
}

/// Round icon button floating over selector content.
pub fn shaped_icon(fill: Color, icon: Color) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme: &Theme, status: button::Status| {
        let background = match status {
            button::Status::Hovered => lighten(fill, 0.1),
            button::Status::Pressed => darken(fill, 0.1),
            _ => fill,
        };

        button::Style {
            background: Some(Background::Color(background)),
            text_color: icon,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: f32::MAX.into(),
            },
            snap: true,
            ..Default::default()
        }
    }
}

/// Flat text button for secondary actions (back, retry variants).
pub fn flat(text: Color) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme: &Theme, status: button::Status| {
        let background = match status {
            button::Status::Hovered | button::Status::Pressed => Some(Background::Color(Color {
                a: 0.1,
                ..text
            })),
            _ => None,
        };

        button::Style {
            background,
            text_color: text,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: radius::SM.into(),
            },
            snap: true,
            ..Default::default()
        }
    }
}

fn lighten(color: Color, amount: f32) -> Color {
    crate::session::accent::amplify(color, amount)
}

fn darken(color: Color, amount: f32) -> Color {
    crate::session::accent::amplify(color, -amount)
}
