//! Invoice Model - Invoice data, line-item arithmetic and display formatting
//!
//! This crate holds the immutable invoice value handed to the engine, the
//! pure calculator that derives per-row and aggregate totals, and the
//! formatting rules every rendered field goes through.

mod calculator;
mod document;
mod error;
mod format;
mod line_item;

pub use calculator::*;
pub use document::*;
pub use error::*;
pub use format::*;
pub use line_item::*;
