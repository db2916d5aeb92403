//! Error types for the text-watermark crate.

use std::path::PathBuf;

/// Errors that can occur while watermarking an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes could not be decoded as a raster image.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// The font file is missing or could not be read.
    #[error("failed to load font {}: {source}", path.display())]
    FontLoad {
        /// Path the font was looked up at.
        path: PathBuf,
        /// Underlying read error.
        source: std::io::Error,
    },

    /// The font file was read but is not a usable TrueType/OpenType font.
    #[error("invalid font file {}", path.display())]
    InvalidFont {
        /// Path of the rejected font file.
        path: PathBuf,
    },

    /// The font size is not a finite, positive number.
    #[error("invalid font size {size}: must be finite and positive")]
    InvalidFontSize {
        /// The rejected size.
        size: f32,
    },

    /// Two rasters that must be composited have different sizes.
    #[error("overlay is {}x{} but base image is {}x{}", overlay.0, overlay.1, base.0, base.1)]
    DimensionMismatch {
        /// Base image dimensions.
        base: (u32, u32),
        /// Overlay dimensions.
        overlay: (u32, u32),
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while encoding the output image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let font = Error::FontLoad {
            path: PathBuf::from("Arial.ttf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = font.to_string();
        assert!(msg.contains("Arial.ttf"));
        assert!(msg.contains("missing"));

        let size = Error::InvalidFontSize { size: -3.0 };
        assert!(size.to_string().contains("-3"));

        let mismatch = Error::DimensionMismatch {
            base: (200, 100),
            overlay: (10, 20),
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("10x20"));
        assert!(msg.contains("200x100"));
    }
}
