// SPDX-License-Identifier: MPL-2.0
//! Session-bus polling.
//!
//! Every poll enumerates the active MPRIS players, reads their metadata
//! and produces a fresh snapshot list. The D-Bus calls are blocking, so
//! polls run on the blocking pool and the UI consumes the result as a
//! message.

use crate::error::{Error, Result};
use crate::media::ImageData;
use crate::session::{MediaSource, SessionSnapshot};
use mpris::PlayerFinder;
use std::path::PathBuf;

/// Enumerates active media sessions on the bus.
///
/// Players without usable metadata (no title and no artist) are skipped,
/// matching how empty session metadata is ignored on other platforms.
///
/// # Errors
///
/// Returns [`Error::Session`] when the session bus itself is unreachable;
/// the caller surfaces that as the listener-permission prompt.
pub fn poll_sessions_blocking() -> Result<Vec<SessionSnapshot>> {
    let finder = PlayerFinder::new()
        .map_err(|e| Error::Session(format!("session bus unavailable: {e}")))?;

    let players = finder
        .find_all()
        .map_err(|e| Error::Session(format!("failed to enumerate players: {e}")))?;

    let mut sessions = Vec::with_capacity(players.len());

    for player in players {
        let Ok(metadata) = player.get_metadata() else {
            continue;
        };

        let title = metadata.title().unwrap_or_default().to_string();
        let artist = metadata
            .artists()
            .map(|artists| artists.join(", "))
            .unwrap_or_default();

        if title.is_empty() && artist.is_empty() {
            continue;
        }

        sessions.push(SessionSnapshot::new(
            title,
            artist,
            metadata.length(),
            metadata.url().map(str::to_string),
            metadata.art_url().map(str::to_string),
            MediaSource {
                bus_name: player.bus_name().to_string(),
                name: player.identity().to_string(),
            },
        ));
    }

    Ok(sessions)
}

/// Async wrapper around [`poll_sessions_blocking`] for use from the
/// update loop.
pub async fn poll_sessions() -> Result<Vec<SessionSnapshot>> {
    tokio::task::spawn_blocking(poll_sessions_blocking)
        .await
        .unwrap_or_else(|e| Err(Error::Session(format!("poll task failed: {e}"))))
}

/// Where a piece of artwork lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkSource {
    Local(PathBuf),
    Remote(String),
}

/// Classifies an `art_url` announced by a player.
///
/// Players hand out `file://` URLs for local covers and `http(s)` URLs
/// for streamed ones; anything else is not fetchable.
#[must_use]
pub fn classify_art_url(url: &str) -> Option<ArtworkSource> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(ArtworkSource::Local(PathBuf::from(path)));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(ArtworkSource::Remote(url.to_string()));
    }
    None
}

/// Fetches and decodes artwork for a session.
///
/// Local covers are read from disk, remote ones over HTTPS. Decoding
/// happens on the blocking pool either way.
///
/// # Errors
///
/// Returns [`Error::Session`] for unfetchable URLs, [`Error::Io`] /
/// [`Error::Image`] for read and decode failures.
pub async fn load_artwork(url: String) -> Result<ImageData> {
    let bytes = match classify_art_url(&url) {
        Some(ArtworkSource::Local(path)) => tokio::task::spawn_blocking(move || {
            std::fs::read(&path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))
        })
        .await
        .unwrap_or_else(|e| Err(Error::Session(format!("artwork task failed: {e}"))))?,
        Some(ArtworkSource::Remote(url)) => {
            let response = reqwest::get(&url)
                .await
                .map_err(|e| Error::Session(format!("artwork fetch failed: {e}")))?;
            response
                .bytes()
                .await
                .map_err(|e| Error::Session(format!("artwork fetch failed: {e}")))?
                .to_vec()
        }
        None => {
            return Err(Error::Session(format!("unsupported artwork url: {url}")));
        }
    };

    tokio::task::spawn_blocking(move || {
        let decoded =
            image_rs::load_from_memory(&bytes).map_err(|e| Error::Image(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(ImageData::from_rgba(width, height, rgba.into_vec()))
    })
    .await
    .unwrap_or_else(|e| Err(Error::Session(format!("artwork decode failed: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn classify_art_url_handles_local_and_remote() {
        assert_eq!(
            classify_art_url("file:///tmp/cover.png"),
            Some(ArtworkSource::Local(PathBuf::from("/tmp/cover.png")))
        );
        assert_eq!(
            classify_art_url("https://example.com/cover.jpg"),
            Some(ArtworkSource::Remote(
                "https://example.com/cover.jpg".to_string()
            ))
        );
        assert_eq!(classify_art_url("data:image/png;base64,xyz"), None);
        assert_eq!(classify_art_url(""), None);
    }

    #[tokio::test]
    async fn load_artwork_reads_local_file_urls() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("cover.png");
        RgbaImage::from_pixel(6, 4, Rgba([10, 20, 30, 255]))
            .save(&path)
            .expect("failed to write cover");

        let url = format!("file://{}", path.display());
        let artwork = load_artwork(url).await.expect("artwork should load");
        assert_eq!(artwork.width, 6);
        assert_eq!(artwork.height, 4);
    }

    #[tokio::test]
    async fn load_artwork_rejects_unsupported_urls() {
        let result = load_artwork("gopher://example.com/cover".to_string()).await;
        assert!(matches!(result, Err(Error::Session(_))));
    }

    #[tokio::test]
    async fn load_artwork_propagates_missing_file() {
        let result = load_artwork("file:///definitely/not/here.png".to_string()).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
