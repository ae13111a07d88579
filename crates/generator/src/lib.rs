//! Generator - Invoice PDF orchestration
//!
//! Drives calculation, resource resolution, layout and serialization for one
//! invoice, behind a single failure boundary.
//!
//! # Example
//!
//! ```ignore
//! use generator::{init_tracing, Destination, GeneratorConfig, InvoicePdfGenerator};
//!
//! init_tracing();
//! let generator = InvoicePdfGenerator::new(GeneratorConfig::load("invoice.json")?);
//! let report = generator.generate(&invoice, Destination::path("INV-001.pdf"))?;
//! println!("{} pages, {} bytes", report.page_count, report.bytes_written);
//! ```

mod config;
mod error;
mod generator;
mod logging;

pub use config::*;
pub use error::*;
pub use generator::*;
pub use logging::*;

pub use layout_engine::CancelToken;
pub use store::Destination;
