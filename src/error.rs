//! Crate-level error types.

use std::fmt;

/// Errors produced by the omnicam crate.
#[derive(Debug)]
pub enum OmniError {
    /// A lens-kind tag outside the seven supported projections.
    UnknownLensKind(u32),
    /// An image-origin tag outside the two supported conventions.
    UnknownImageOrigin(u32),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Image encoding failure while persisting a frame.
    Image(image::ImageError),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// The rendering backend rejected an allocation or readback.
    Backend(String),
    /// Frame persistence failure not covered by `Io`/`Image`.
    Persistence(String),
}

impl fmt::Display for OmniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLensKind(id) => {
                write!(f, "unrecognized lens model {id}")
            }
            Self::UnknownImageOrigin(id) => {
                write!(f, "unrecognized image origin id {id}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Backend(msg) => write!(f, "backend error: {msg}"),
            Self::Persistence(msg) => {
                write!(f, "persistence error: {msg}")
            }
        }
    }
}

impl std::error::Error for OmniError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OmniError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for OmniError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}
