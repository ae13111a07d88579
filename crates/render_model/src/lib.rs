//! Render Model - Draw commands and pages
//!
//! This crate holds the primitive drawing operations a laid-out invoice is
//! made of, and the builder that turns layout decisions (caption here, row
//! there) into those operations with every field already formatted.

mod builder;
mod render_item;

pub use builder::*;
pub use render_item::*;
