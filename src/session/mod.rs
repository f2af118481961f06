// SPDX-License-Identifier: MPL-2.0
//! Media-session snapshots.
//!
//! Other applications' playback state is read from the desktop session
//! bus and condensed into plain value snapshots. Each poll supersedes the
//! previous list wholesale; nothing here carries identity across polls
//! beyond incidental `(title, artist)` matching used to keep the card
//! pager in place.

pub mod accent;
pub mod poller;

use crate::media::ImageData;
use iced::Color;
use std::time::Duration;

/// Describes the application owning a media session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    /// Bus identity of the player (stable per application).
    pub bus_name: String,
    /// Human-readable application name.
    pub name: String,
}

/// One application's playback state at poll time.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub title: String,
    pub artist: String,
    pub duration: Option<Duration>,
    pub uri: Option<String>,
    /// Where the artwork can be fetched from, when the player announced
    /// any. Decoding happens off-thread after the poll.
    pub art_url: Option<String>,
    /// Small display icon. The session bus exposes none, so this stays
    /// empty on desktop and the card falls back to the source name.
    pub icon: Option<ImageData>,
    pub artwork: Option<ImageData>,
    pub source: MediaSource,
    accent: Option<Color>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn new(
        title: String,
        artist: String,
        duration: Option<Duration>,
        uri: Option<String>,
        art_url: Option<String>,
        source: MediaSource,
    ) -> Self {
        Self {
            title,
            artist,
            duration,
            uri,
            art_url,
            icon: None,
            artwork: None,
            source,
            accent: None,
        }
    }

    /// Attaches decoded artwork and derives the accent colour from it.
    pub fn attach_artwork(&mut self, artwork: ImageData) {
        if self.accent.is_none() {
            self.accent = accent::derive_accent(&artwork);
        }
        self.artwork = Some(artwork);
    }

    /// The accent colour for this session's card.
    ///
    /// Derived lazily from the artwork; sessions without artwork have no
    /// accent of their own and the card falls back to the brand colour.
    #[must_use]
    pub fn accent(&self) -> Option<Color> {
        self.accent
    }

    pub fn set_accent(&mut self, accent: Color) {
        self.accent = Some(accent);
    }

    /// Incidental identity used to keep the pager on the same entry when
    /// a poll replaces the snapshot list.
    #[must_use]
    pub fn matches(&self, other: &SessionSnapshot) -> bool {
        self.title == other.title && self.artist == other.artist
    }
}

/// Reachability of the session listener.
///
/// The session bus being unreachable is the desktop analogue of a missing
/// notification-listener permission: surfaced as a persistent prompt with
/// a retry affordance, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListenerState {
    /// Not probed yet (before the first poll, or after a retry).
    #[default]
    Unknown,
    Available,
    Unavailable(String),
}

impl ListenerState {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ListenerState::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(title: &str, artist: &str) -> SessionSnapshot {
        SessionSnapshot::new(
            title.to_string(),
            artist.to_string(),
            Some(Duration::from_secs(694)),
            Some("HHhFX9zUV2s".to_string()),
            None,
            MediaSource {
                bus_name: "org.mpris.MediaPlayer2.test".to_string(),
                name: "Test Player".to_string(),
            },
        )
    }

    #[test]
    fn matches_compares_title_and_artist_only() {
        let a = snapshot("Cutlery", "Yoh Kamiyama");
        let mut b = snapshot("Cutlery", "Yoh Kamiyama");
        b.uri = Some("different".to_string());

        assert!(a.matches(&b));
        assert!(!a.matches(&snapshot("Relayouter", "Inabakumori")));
    }

    #[test]
    fn attach_artwork_derives_accent_once() {
        let mut snap = snapshot("Cutlery", "Yoh Kamiyama");
        assert!(snap.accent().is_none());

        let red = ImageData::from_rgba(4, 4, [200u8, 20, 20, 255].repeat(16));
        snap.attach_artwork(red);

        let accent = snap.accent().expect("accent should be derived");
        assert!(accent.r > accent.g);
    }

    #[test]
    fn preset_accent_survives_artwork_attachment() {
        let mut snap = snapshot("Cutlery", "Yoh Kamiyama");
        snap.set_accent(Color::from_rgb(0.1, 0.2, 0.3));

        let art = ImageData::from_rgba(2, 2, vec![255u8; 16]);
        snap.attach_artwork(art);

        let accent = snap.accent().unwrap();
        assert!((accent.b - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn listener_state_reports_unavailability() {
        assert!(!ListenerState::Unknown.is_unavailable());
        assert!(!ListenerState::Available.is_unavailable());
        assert!(ListenerState::Unavailable("no bus".into()).is_unavailable());
    }
}
