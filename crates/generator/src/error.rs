//! Error types for invoice generation

use invoice_model::ModelError;
use layout_engine::LayoutError;
use store::pdf::PdfError;
use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The destination could not be opened; nothing was laid out
    #[error("Cannot open output: {0}")]
    SinkAcquisition(#[source] StoreError),

    #[error("Invalid invoice: {0}")]
    InvalidDocument(#[from] ModelError),

    #[error("Layout failed: {0}")]
    Layout(#[source] LayoutError),

    #[error("Serialization failed: {0}")]
    Serialization(#[source] PdfError),

    /// The finished file could not be moved into place
    #[error("Cannot publish output: {0}")]
    Publish(#[source] StoreError),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background worker failed: {0}")]
    Worker(String),
}

impl From<LayoutError> for GenerationError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::Cancelled => GenerationError::Cancelled,
            other => GenerationError::Layout(other),
        }
    }
}

impl From<PdfError> for GenerationError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::Cancelled => GenerationError::Cancelled,
            other => GenerationError::Serialization(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
