// SPDX-License-Identifier: MPL-2.0
//! Theme mode and the accent colour that follows the current card.

use crate::session::accent;
use crate::ui::design_tokens::palette;
use iced::Color;
use serde::{Deserialize, Serialize};

/// How long the accent takes to settle on a new card's colour.
const ACCENT_TRANSITION_SECS: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// Returns true if the effective theme is dark.
    /// For System mode, detects the actual system theme.
    #[must_use]
    pub fn is_dark(self) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => {
                // Detect system theme; default to dark on detection error
                !matches!(dark_light::detect(), Ok(dark_light::Mode::Light))
            }
        }
    }

    /// Maps the mode onto the Iced base theme.
    #[must_use]
    pub fn iced_theme(self) -> iced::Theme {
        if self.is_dark() {
            iced::Theme::Dark
        } else {
            iced::Theme::Light
        }
    }
}

/// The application accent, animated between card colours.
///
/// The blend runs over a short timed transition whenever the current
/// card changes, so paging between sessions recolours the whole surface
/// smoothly instead of snapping.
#[derive(Debug, Clone)]
pub struct AccentState {
    target: Color,
    from: Color,
    /// 0.0..=1.0 progress of the running transition; 1.0 when settled.
    progress: f32,
}

impl Default for AccentState {
    fn default() -> Self {
        Self {
            target: palette::PRIMARY_500,
            from: palette::PRIMARY_500,
            progress: 1.0,
        }
    }
}

impl AccentState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts blending from the currently displayed colour to `target`.
    /// A no-op when the target is already set.
    pub fn set_target(&mut self, target: Color) {
        if target == self.target {
            return;
        }
        self.from = self.displayed();
        self.target = target;
        self.progress = 0.0;
    }

    /// Snaps directly to the target colour.
    pub fn snap_to(&mut self, target: Color) {
        self.target = target;
        self.from = target;
        self.progress = 1.0;
    }

    /// The colour to paint this frame.
    #[must_use]
    pub fn displayed(&self) -> Color {
        accent::blend(self.from, self.target, self.progress)
    }

    /// Advances the transition. Returns true while still animating.
    pub fn tick(&mut self, dt_secs: f32) -> bool {
        if self.progress >= 1.0 {
            return false;
        }
        self.progress = (self.progress + dt_secs / ACCENT_TRANSITION_SECS).min(1.0);
        self.progress < 1.0
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.progress < 1.0
    }

    /// Text colour contrasting with the displayed accent.
    #[must_use]
    pub fn on_accent(&self) -> Color {
        accent::contrasting_text(self.displayed())
    }

    /// A punchier variant of the accent for primary actions.
    #[must_use]
    pub fn vibrant(&self) -> Color {
        accent::amplify(self.displayed(), 0.2)
    }
}
