//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Layout cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, LayoutError>;
