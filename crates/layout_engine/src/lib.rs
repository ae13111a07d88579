//! Layout Engine - Invoice pagination
//!
//! This crate places an invoice onto fixed-size pages: a cursor walks down
//! each page, rows are placed greedily, and a page break re-emits the store
//! header and table captions. The result is a sequence of pages holding
//! draw commands, ready for serialization.

mod cancel;
mod error;
mod invoice_layout;
mod labels;
mod metrics;

pub use cancel::*;
pub use error::*;
pub use invoice_layout::*;
pub use labels::*;
pub use metrics::*;
