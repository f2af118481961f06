// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::radius;
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Rounded surface filled with the given colour (status card, prompts).
pub fn rounded(fill: Color, line: Color) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(fill)),
        border: Border {
            color: line,
            width: 2.0,
            radius: radius::MD.into(),
        },
        ..Default::default()
    }
}

/// Page background painted with the current accent colour.
pub fn accent_surface(fill: Color) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(fill)),
        ..Default::default()
    }
}

/// Translucent overlay strip (status messages over the preview).
pub fn scrim(base: Color, alpha: f32) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(Color { a: alpha, ..base })),
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
