//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, an unusable render surface, images that could not be loaded,
//! malformed pixel buffers, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("image '{path}' unavailable: {reason}")]
    ImageUnavailable { path: String, reason: String },

    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    PixelBuffer { expected: usize, actual: usize },

    #[error("invalid particle order: {0}")]
    InvalidPermutation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Convenience constructor for [`Error::ImageUnavailable`].
    pub fn image_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Error::ImageUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
