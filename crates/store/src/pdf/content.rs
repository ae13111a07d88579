//! PDF Content Stream Generation
//!
//! Builder for the per-page operator stream. Only the operators an invoice
//! page needs are provided:
//!
//! - `q`/`Q`/`cm`: graphics state and transform (image placement)
//! - `rg`/`RG`/`w`/`m`/`l`/`S`: colors and rules
//! - `BT`/`ET`/`Tf`/`Td`/`Tj`: positioned text
//! - `Do`: paint an image XObject

use super::objects::{format_number, write_hex, write_literal};
use std::io::Write;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        for value in operands {
            self.data.extend_from_slice(format_number(*value).as_bytes());
            self.data.push(b' ');
        }
        self.data.extend_from_slice(operator.as_bytes());
        self.data.push(b'\n');
        self
    }

    // =========================================================================
    // Graphics state
    // =========================================================================

    /// q
    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    /// Q
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    /// cm
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    /// w
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(&[width], "w")
    }

    /// rg, components in 0..=255
    pub fn set_fill_rgb(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.op(&[channel(r), channel(g), channel(b)], "rg")
    }

    /// RG, components in 0..=255
    pub fn set_stroke_rgb(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.op(&[channel(r), channel(g), channel(b)], "RG")
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "l")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(&[], "S")
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    /// Tf with a resource name such as `F0`
    pub fn set_font(&mut self, resource: &str, size: f64) -> &mut Self {
        let _ = writeln!(self.data, "/{} {} Tf", resource, format_number(size));
        self
    }

    /// Td
    pub fn move_text(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "Td")
    }

    /// Tj with single-byte codes as a literal string
    pub fn show_text(&mut self, codes: &[u8]) -> &mut Self {
        write_literal(codes, &mut self.data);
        self.data.extend_from_slice(b" Tj\n");
        self
    }

    /// Tj with two-byte glyph ids as a hex string (Identity-H)
    pub fn show_glyphs(&mut self, glyph_ids: &[u16]) -> &mut Self {
        let bytes: Vec<u8> = glyph_ids.iter().flat_map(|gid| gid.to_be_bytes()).collect();
        write_hex(&bytes, &mut self.data);
        self.data.extend_from_slice(b" Tj\n");
        self
    }

    // =========================================================================
    // XObjects
    // =========================================================================

    /// Do
    pub fn draw_xobject(&mut self, resource: &str) -> &mut Self {
        let _ = writeln!(self.data, "/{} Do", resource);
        self
    }
}

fn channel(value: u8) -> f64 {
    f64::from(value) / 255.0
}
