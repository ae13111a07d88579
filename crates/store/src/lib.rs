//! Store - PDF serialization and output
//!
//! Serializes laid-out invoice pages into PDF bytes and delivers them to a
//! file or stream.
//!
//! # Modules
//!
//! - `pdf`: The PDF object/stream serializer
//! - `sink`: Destinations and atomic publishing of finished files

mod error;
pub mod pdf;
mod sink;

pub use error::*;
pub use sink::*;
