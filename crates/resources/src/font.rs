//! Embeddable TrueType font programs

use crate::{ResourceError, Result};
use std::sync::Arc;
use ttf_parser::{Face, GlyphId};

/// Font metrics in 1000-unit glyph space
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    pub cap_height: i16,
    /// (x_min, y_min, x_max, y_max)
    pub bbox: (i16, i16, i16, i16),
    pub italic_angle: i16,
    pub stem_v: i16,
    pub is_fixed_pitch: bool,
    /// Advance of `.notdef`, used for glyphs the face lacks
    pub missing_width: u16,
}

/// A validated TrueType font program plus the metrics needed to embed it
#[derive(Debug, Clone)]
pub struct FontProgram {
    name: String,
    data: Arc<Vec<u8>>,
    metrics: FontMetrics,
}

impl FontProgram {
    /// Parse and validate font bytes.
    ///
    /// `name` becomes the PDF base font name; characters that are not legal
    /// in a PDF name are dropped.
    pub fn parse(name: &str, data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0)
            .map_err(|e| ResourceError::InvalidFont(format!("{}: {}", name, e)))?;

        if face.tables().glyf.is_none() {
            return Err(ResourceError::InvalidFont(format!(
                "{}: no TrueType outlines",
                name
            )));
        }

        let metrics = metrics_from_face(&face);
        let name: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();

        Ok(Self {
            name,
            data: Arc::new(data),
            metrics,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font file bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }

    /// Glyph id for a character, `None` when the face lacks it
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face()?.glyph_index(ch).map(|id| id.0)
    }

    /// Map text to `(glyph id, advance)` pairs. Unknown characters map to
    /// glyph 0.
    pub fn glyphs(&self, text: &str) -> Vec<(u16, u16)> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        let scale = 1000.0 / f64::from(self.metrics.units_per_em);

        text.chars()
            .map(|ch| {
                let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
                let width = face
                    .glyph_hor_advance(gid)
                    .map(|adv| (f64::from(adv) * scale).round() as u16)
                    .unwrap_or(self.metrics.missing_width);
                (gid.0, width)
            })
            .collect()
    }

    /// Advance width of `text` at `font_size`, in points
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = self.glyphs(text).iter().map(|(_, w)| u32::from(*w)).sum();
        f64::from(units) * font_size / 1000.0
    }
}

fn metrics_from_face(face: &Face<'_>) -> FontMetrics {
    let units_per_em = face.units_per_em().max(1);
    let scale = 1000.0 / f64::from(units_per_em);
    let scaled = |value: i16| (f64::from(value) * scale).round() as i16;

    let ascent = scaled(face.ascender());
    let bbox = face.global_bounding_box();
    let missing_width = face
        .glyph_hor_advance(GlyphId(0))
        .map(|adv| (f64::from(adv) * scale).round() as u16)
        .unwrap_or(0);

    FontMetrics {
        units_per_em,
        ascent,
        descent: scaled(face.descender()),
        cap_height: face.capital_height().map(scaled).unwrap_or(ascent),
        bbox: (
            scaled(bbox.x_min),
            scaled(bbox.y_min),
            scaled(bbox.x_max),
            scaled(bbox.y_max),
        ),
        italic_angle: face.italic_angle().map(|a| a.round() as i16).unwrap_or(0),
        stem_v: if face.is_bold() { 120 } else { 80 },
        is_fixed_pitch: face.is_monospaced(),
        missing_width,
    }
}
