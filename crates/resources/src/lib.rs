//! Resources - Font and image resolution
//!
//! Maps logical font family names to embeddable font programs (with a
//! standard-font fallback) and decodes branding images into payloads ready
//! for embedding.
//!
//! # Modules
//!
//! - `font`: Parsed TrueType font programs and their metrics
//! - `standard`: The built-in PDF base fonts used as fallback
//! - `registry`: Static logical-name mapping and the process-wide registry
//! - `image_data`: Image decoding and aspect-ratio scaling
//! - `resource_set`: Per-document, name-deduplicated image set

mod error;
mod font;
mod image_data;
pub mod registry;
mod resource_set;
mod standard;

pub use error::*;
pub use font::*;
pub use image_data::*;
pub use resource_set::*;
pub use standard::*;

pub use registry::{FontFace, FontRegistry, ResolvedFont};
