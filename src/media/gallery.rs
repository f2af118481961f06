// SPDX-License-Identifier: MPL-2.0
//! Gallery enumeration: finds browsable pictures in a local directory.
//!
//! Records are plain value types describing platform-owned files; the
//! application reads them but never mutates the underlying images.

use crate::error::{Error, Result};
use crate::media;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A browsable image owned by the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl ImageRecord {
    fn from_path(path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let mime_type = mime_type_for(&path).to_string();

        Self {
            path,
            name,
            size,
            mime_type,
        }
    }
}

/// Returns the MIME type for a supported image path.
///
/// Unknown extensions map to `application/octet-stream`; such files are
/// filtered out before records are built, so the fallback only shows up
/// when callers construct records manually.
#[must_use]
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Scans a directory for supported images, newest first.
///
/// Mirrors the platform gallery ordering: files sorted by modification
/// time, most recent at index zero. Subdirectories are not descended.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be read. Individual
/// unreadable entries are skipped rather than failing the whole scan.
pub fn scan(directory: &Path) -> Result<Vec<ImageRecord>> {
    let mut entries: Vec<(PathBuf, u64, SystemTime)> = Vec::new();

    for entry in std::fs::read_dir(directory).map_err(|e| {
        Error::Io(format!(
            "failed to read gallery directory {}: {}",
            directory.display(),
            e
        ))
    })? {
        let Ok(entry) = entry else { continue };
        let path = entry.path();

        if !path.is_file() || !media::is_supported_image(&path) {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        entries.push((path, metadata.len(), modified));
    }

    entries.sort_by(|a, b| b.2.cmp(&a.2));

    Ok(entries
        .into_iter()
        .map(|(path, size, _)| ImageRecord::from_path(path, size))
        .collect())
}

/// Resolves the directory browsed by the gallery selector.
///
/// An explicit override (CLI flag or config) wins; otherwise the
/// platform pictures directory is used.
#[must_use]
pub fn resolve_directory(override_dir: Option<&Path>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) => Some(dir.to_path_buf()),
        None => dirs::picture_dir(),
    }
}
