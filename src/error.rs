//! Error types for the recoverable failure paths of the wheel.
//!
//! None of these reach the user as a hard failure: the caller that picks the
//! fallback (color fill, previous bitmap, silence) logs them and moves on.

use thiserror::Error;

/// Failure while reading or decoding an image asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset could not be read from disk.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes are not in a format the decoder understands.
    #[error("unsupported image format")]
    UnsupportedFormat,
    /// JPEG, GIF or WebP decoding failed.
    #[error("failed to decode image: {0}")]
    Raster(#[from] image::ImageError),
    /// PNG decoding failed.
    #[error("failed to decode png: {0}")]
    Png(String),
    /// SVG parsing failed.
    #[error("failed to parse svg: {0}")]
    Svg(#[from] usvg::Error),
    /// The image decoded to zero pixels.
    #[error("image has no pixels")]
    Empty,
}

/// Failure while loading or playing a sound.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The sound file could not be read.
    #[error("failed to read sound: {0}")]
    Io(#[from] std::io::Error),
    /// The audio backend rejected the data.
    #[error("failed to decode sound {key}: {reason}")]
    Decode {
        /// Catalog key of the sound
        key: String,
        /// Backend-provided reason
        reason: String,
    },
    /// No decoded buffer is available for the key.
    #[error("sound {0} is not loaded")]
    NotLoaded(String),
}

/// Failure while loading the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for [`crate::AppConfig`].
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single drawing operation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A path could not be built (degenerate geometry).
    #[error("degenerate path")]
    DegeneratePath,
    /// A clip mask could not be allocated.
    #[error("failed to allocate clip mask {0}x{1}")]
    Mask(u32, u32),
    /// An image cannot be used as a fill.
    #[error("image cannot be drawn: {0}")]
    Image(String),
    /// Text could not be laid out.
    #[error("text layout failed: {0}")]
    Text(String),
}
