// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Image(String),
    Config(String),
    Compose(String),
    Capture(CaptureError),
    Session(String),
}

/// Specific error types for on-screen region capture.
///
/// The capture path has exactly two ways to fail: the region has never
/// reported a layout pass, or the surface read-back itself signalled
/// non-success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The card region has not completed a layout pass yet, so its bounds
    /// are unknown. Capturing now would produce a blank bitmap.
    BoundsUnknown,

    /// The pixel read-back reported non-success (crop out of range,
    /// renderer without read-back support, etc.).
    CopyFailed(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::BoundsUnknown => {
                write!(f, "capture region has not been laid out yet")
            }
            CaptureError::CopyFailed(msg) => write!(f, "pixel copy failed: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Compose(e) => write!(f, "Compose Error: {}", e),
            Error::Capture(e) => write!(f, "Capture Error: {}", e),
            Error::Session(e) => write!(f, "Session Error: {}", e),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(err: CaptureError) -> Self {
        Error::Capture(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn capture_error_converts_into_capture_variant() {
        let err: Error = CaptureError::BoundsUnknown.into();
        assert!(matches!(err, Error::Capture(CaptureError::BoundsUnknown)));
    }

    #[test]
    fn capture_error_display_mentions_layout() {
        let msg = format!("{}", CaptureError::BoundsUnknown);
        assert!(msg.contains("laid out"));
    }

    #[test]
    fn copy_failed_display_includes_reason() {
        let msg = format!("{}", CaptureError::CopyFailed("out of bounds".into()));
        assert!(msg.contains("out of bounds"));
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn session_error_formats_properly() {
        let err = Error::Session("bus unreachable".into());
        assert!(format!("{}", err).contains("bus unreachable"));
    }
}
