//! Vision errors

use thiserror::Error;

/// Errors from image comparison
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
