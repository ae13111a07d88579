//! Built-in PDF base fonts
//!
//! Every conforming viewer ships these, so they need no embedded program.
//! They only cover WinAnsi text and are used when a logical family cannot
//! be resolved to an embedded font.

use serde::{Deserialize, Serialize};

/// Standard PDF text fonts available as fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    /// Get the PDF base font name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
        }
    }

    /// Match a family name to a standard font, if it names one
    pub fn from_name(name: &str, bold: bool) -> Option<Self> {
        let name_lower = name.to_lowercase();

        if name_lower.contains("times") || name_lower == "serif" {
            return Some(if bold {
                StandardFont::TimesBold
            } else {
                StandardFont::TimesRoman
            });
        }

        if name_lower.contains("helvetica") || name_lower.contains("arial") {
            return Some(Self::default_fallback(bold));
        }

        if name_lower.contains("courier") || name_lower == "monospace" {
            return Some(if bold {
                StandardFont::CourierBold
            } else {
                StandardFont::Courier
            });
        }

        None
    }

    /// Fallback used for any family that resolves to nothing else
    pub fn default_fallback(bold: bool) -> Self {
        if bold {
            StandardFont::HelveticaBold
        } else {
            StandardFont::Helvetica
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::TimesBold | StandardFont::CourierBold
        )
    }

    /// Average glyph advance as a fraction of the font size
    fn average_width(&self) -> f64 {
        match self {
            StandardFont::Courier | StandardFont::CourierBold => 0.6,
            StandardFont::Helvetica => 0.5,
            StandardFont::HelveticaBold => 0.52,
            StandardFont::TimesRoman => 0.45,
            StandardFont::TimesBold => 0.48,
        }
    }

    /// Estimate the advance width of `text` at `font_size`
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.average_width() * font_size
    }
}
