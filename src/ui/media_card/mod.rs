// SPDX-License-Identifier: MPL-2.0
//! The "now playing" status card.
//!
//! One card per media session, paged horizontally. Each card layers the
//! album artwork, an animated wave decoration, a translucent scrim and
//! the track text. The card region is also what gets captured and
//! composited into the exported photo.

pub mod wave;

use crate::session::{accent, SessionSnapshot};
use crate::ui::design_tokens::{palette, spacing};
use crate::ui::styles::{button as button_styles, container as container_styles};
use iced::widget::{button, canvas, container, image, text, Column, Row, Space, Stack};
use iced::{Alignment, Color, ContentFit, Element, Length};

/// Corner radius of the card surface.
pub const CARD_CORNER_RADIUS: f32 = 10.0;

/// Width of the card border stroke.
pub const CARD_BORDER_WIDTH: f32 = 2.0;

/// Opacity of the accent scrim painted over the artwork.
pub const CARD_SCRIM_ALPHA: f32 = 0.5;

/// Opacity of the border and wave strokes.
pub const CARD_LINE_ALPHA: f32 = 0.3;

/// Inner padding of the card content row.
pub const CARD_PADDING: f32 = 7.0;

/// Accent used when a session has no artwork to derive one from.
pub const FALLBACK_ACCENT: Color = palette::PRIMARY_500;

#[derive(Debug, Clone)]
pub enum Message {
    NextSession,
    PreviousSession,
}

/// Pager state over the latest session snapshot list.
#[derive(Debug, Default)]
pub struct State {
    sessions: Vec<SessionSnapshot>,
    current: usize,
    /// Wave animation phase, 0.0..1.0 over [`wave::WAVE_PERIOD`].
    wave_progress: f32,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session list with a fresh poll result.
    ///
    /// The pager stays on the same logical entry when one still matches
    /// by `(title, artist)`; otherwise the index clamps into range.
    pub fn apply_sessions(&mut self, sessions: Vec<SessionSnapshot>) {
        let previous = self.current_session().cloned();

        self.sessions = sessions;

        self.current = previous
            .and_then(|old| self.sessions.iter().position(|s| s.matches(&old)))
            .unwrap_or_else(|| self.current.min(self.sessions.len().saturating_sub(1)));
    }

    /// Attaches decoded artwork to every session announcing this URL.
    pub fn attach_artwork(&mut self, art_url: &str, artwork: &crate::media::ImageData) {
        for session in &mut self.sessions {
            if session.art_url.as_deref() == Some(art_url) && session.artwork.is_none() {
                session.attach_artwork(artwork.clone());
            }
        }
    }

    /// URLs announced by sessions whose artwork is still missing.
    #[must_use]
    pub fn pending_art_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .sessions
            .iter()
            .filter(|s| s.artwork.is_none())
            .filter_map(|s| s.art_url.clone())
            .collect();
        urls.sort();
        urls.dedup();
        urls
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::NextSession => {
                if !self.sessions.is_empty() {
                    self.current = (self.current + 1) % self.sessions.len();
                }
            }
            Message::PreviousSession => {
                if !self.sessions.is_empty() {
                    self.current = (self.current + self.sessions.len() - 1) % self.sessions.len();
                }
            }
        }
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&SessionSnapshot> {
        self.sessions.get(self.current)
    }

    #[must_use]
    pub fn current_accent(&self) -> Option<Color> {
        self.current_session().and_then(SessionSnapshot::accent)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn wave_progress(&self) -> f32 {
        self.wave_progress
    }

    /// Advances the wave phase, wrapping once per [`wave::WAVE_PERIOD`].
    pub fn advance_wave(&mut self, dt_secs: f32) {
        let period = wave::WAVE_PERIOD.as_secs_f32();
        self.wave_progress = (self.wave_progress + dt_secs / period).fract();
    }

    /// Renders the card for the current session (or an override, used by
    /// the adjust screen to pin the captured session).
    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let session = ctx.session_override.or_else(|| self.current_session());

        let Some(session) = session else {
            return container(
                text("No active media sessions").color(palette::GRAY_400),
            )
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .height(Length::Fixed(ctx.height))
            .padding(spacing::PAGE)
            .into();
        };

        let accent_color = session.accent().unwrap_or(FALLBACK_ACCENT);
        let line_color = accent::with_alpha(accent::amplify(accent_color, -0.1), CARD_LINE_ALPHA);
        let text_color = accent::contrasting_text(accent_color);

        let mut layers = Stack::new();

        if let Some(artwork) = &session.artwork {
            layers = layers.push(
                image(artwork.handle.clone())
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fill)
                    .height(Length::Fill),
            );
        }

        layers = layers.push(
            canvas(WaveField {
                line_color,
                progress: self.wave_progress,
            })
            .width(Length::Fill)
            .height(Length::Fill),
        );

        let title_block = Column::new()
            .width(Length::Fill)
            .push(text(session.title.as_str()).size(22).color(text_color))
            .push(text(session.artist.as_str()).size(13).color(text_color));

        let mut content_row = Row::new()
            .spacing(spacing::PAGE)
            .align_y(Alignment::Center)
            .push(title_block);

        if ctx.interactive && self.sessions.len() > 1 {
            content_row = content_row
                .push(
                    button(text("‹").size(18).color(text_color))
                        .style(button_styles::flat(text_color))
                        .on_press(Message::PreviousSession),
                )
                .push(
                    button(text("›").size(18).color(text_color))
                        .style(button_styles::flat(text_color))
                        .on_press(Message::NextSession),
                );
        }

        let source_row = Row::new()
            .push(Space::new().width(Length::Fill))
            .push(
                text(session.source.name.as_str())
                    .size(11)
                    .color(accent::with_alpha(text_color, 0.8)),
            );

        layers = layers.push(
            container(
                Column::new()
                    .push(content_row)
                    .push(Space::new().height(Length::Fill))
                    .push(source_row),
            )
            .padding(CARD_PADDING)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(container_styles::scrim(accent_color, CARD_SCRIM_ALPHA)),
        );

        container(layers)
            .height(Length::Fixed(ctx.height))
            .width(Length::Fill)
            .padding(spacing::PAGE)
            .style(container_styles::rounded(accent_color, line_color))
            .into()
    }
}

/// Rendering context for the card.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Whether the pager controls react to input (false on the adjust
    /// screen preview).
    pub interactive: bool,
    /// Pins the card to a specific session instead of the pager's.
    pub session_override: Option<&'a SessionSnapshot>,
    pub height: f32,
}

/// Canvas program drawing the tilted wave field.
#[derive(Debug, Clone, Copy)]
struct WaveField {
    line_color: Color,
    progress: f32,
}

impl<Message> canvas::Program<Message> for WaveField {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let stroke = canvas::Stroke::default()
            .with_color(self.line_color)
            .with_width(wave::WAVE_STROKE_WIDTH);

        frame.push_transform();
        frame.rotate(wave::WAVE_TILT_DEGREES.to_radians());

        for band in 0..wave::band_count(bounds.width, bounds.height) {
            let position = wave::band_position(band);
            let offset = wave::band_offset(band, self.progress, bounds.width);

            for direction in [-1i8, 1] {
                let wave_path = wave::wave_path(
                    direction,
                    bounds.width,
                    wave::WAVE_AMPLITUDE,
                    wave::WAVE_COUNT,
                    offset,
                )
                .translated(position);

                let path = canvas::Path::new(|builder| {
                    wave_path.for_each_quad(|from, ctrl, to| {
                        builder.move_to(iced::Point::new(from.0, from.1));
                        builder.quadratic_curve_to(
                            iced::Point::new(ctrl.0, ctrl.1),
                            iced::Point::new(to.0, to.1),
                        );
                    });
                });
                frame.stroke(&path, stroke.clone());
            }
        }

        frame.pop_transform();

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageData;
    use crate::session::MediaSource;

    fn snapshot(title: &str, artist: &str, art_url: Option<&str>) -> SessionSnapshot {
        SessionSnapshot::new(
            title.to_string(),
            artist.to_string(),
            None,
            None,
            art_url.map(str::to_string),
            MediaSource {
                bus_name: "org.mpris.MediaPlayer2.test".to_string(),
                name: "Test Player".to_string(),
            },
        )
    }

    #[test]
    fn apply_sessions_keeps_matching_entry_selected() {
        let mut state = State::new();
        state.apply_sessions(vec![
            snapshot("Cutlery", "Yoh Kamiyama", None),
            snapshot("Relayouter", "Inabakumori", None),
        ]);
        state.update(Message::NextSession);
        assert_eq!(state.current_session().unwrap().title, "Relayouter");

        // A new poll reorders the list; the pager follows the entry.
        state.apply_sessions(vec![
            snapshot("Relayouter", "Inabakumori", None),
            snapshot("Cutlery", "Yoh Kamiyama", None),
        ]);
        assert_eq!(state.current_session().unwrap().title, "Relayouter");
    }

    #[test]
    fn apply_sessions_clamps_when_entry_disappears() {
        let mut state = State::new();
        state.apply_sessions(vec![
            snapshot("A", "a", None),
            snapshot("B", "b", None),
        ]);
        state.update(Message::NextSession);

        state.apply_sessions(vec![snapshot("C", "c", None)]);
        assert_eq!(state.current_session().unwrap().title, "C");
    }

    #[test]
    fn pager_wraps_in_both_directions() {
        let mut state = State::new();
        state.apply_sessions(vec![
            snapshot("A", "a", None),
            snapshot("B", "b", None),
        ]);

        state.update(Message::PreviousSession);
        assert_eq!(state.current_session().unwrap().title, "B");
        state.update(Message::NextSession);
        assert_eq!(state.current_session().unwrap().title, "A");
    }

    #[test]
    fn pager_on_empty_list_is_inert() {
        let mut state = State::new();
        state.update(Message::NextSession);
        assert!(state.current_session().is_none());
    }

    #[test]
    fn attach_artwork_targets_matching_urls_only() {
        let mut state = State::new();
        state.apply_sessions(vec![
            snapshot("A", "a", Some("file:///art/a.png")),
            snapshot("B", "b", Some("file:///art/b.png")),
        ]);

        let art = ImageData::from_rgba(2, 2, [255u8, 0, 0, 255].repeat(4));
        state.attach_artwork("file:///art/a.png", &art);

        assert!(state.sessions[0].artwork.is_some());
        assert!(state.sessions[1].artwork.is_none());
        assert_eq!(state.pending_art_urls(), vec!["file:///art/b.png"]);
    }

    #[test]
    fn wave_progress_wraps_at_period() {
        let mut state = State::new();
        state.advance_wave(wave::WAVE_PERIOD.as_secs_f32() * 1.25);
        assert!(state.wave_progress() >= 0.0 && state.wave_progress() < 1.0);
        assert!((state.wave_progress() - 0.25).abs() < 0.01);
    }
}
