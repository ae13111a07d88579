//! Error types for resource resolution

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    #[error("Invalid font data: {0}")]
    InvalidFont(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ResourceError>;
