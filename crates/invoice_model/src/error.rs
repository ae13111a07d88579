//! Error types for the invoice model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid invoice date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid line item {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
