// SPDX-License-Identifier: MPL-2.0
//! Centralized design tokens: palette, opacity, spacing and radius
//! scales shared by all widgets.

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    // Grayscale
    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_900: Color = Color::from_rgb(0.1, 0.1, 0.1);
    pub const GRAY_700: Color = Color::from_rgb(0.3, 0.3, 0.3);
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);
    pub const GRAY_100: Color = Color::from_rgb(0.85, 0.85, 0.85);

    // Brand colors (violet scale, the default card accent)
    pub const PRIMARY_400: Color = Color::from_rgb(0.62, 0.44, 0.86);
    pub const PRIMARY_500: Color = Color::from_rgb(0.52, 0.32, 0.78);
    pub const PRIMARY_600: Color = Color::from_rgb(0.42, 0.24, 0.66);

    // Semantic colors
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
}

// ============================================================================
// Opacity Scale
// ============================================================================

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.25;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    pub const OVERLAY_STRONG: f32 = 0.7;
    pub const OVERLAY_PRESSED: f32 = 0.9;
}

// ============================================================================
// Spacing Scale (8px grid, with a half step)
// ============================================================================

pub mod spacing {
    pub const XS: f32 = 4.0;
    pub const SM: f32 = 8.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;

    /// Padding inside selector content and around page edges.
    pub const PAGE: f32 = 10.0;
}

// ============================================================================
// Sizing
// ============================================================================

pub mod sizing {
    /// Height of the status card on the capture screen.
    pub const CARD_HEIGHT: f32 = 200.0;

    /// Height of the (non-interactive) card preview on the adjust screen.
    pub const CARD_PREVIEW_HEIGHT: f32 = 100.0;

    /// Side length of the round selector-swap and lens-flip buttons.
    pub const ICON_BUTTON: f32 = 44.0;
}

// ============================================================================
// Radius
// ============================================================================

pub mod radius {
    pub const SM: f32 = 6.0;
    pub const MD: f32 = 10.0;
    pub const LG: f32 = 20.0;
}
