//! Page geometry
//!
//! Every position on an invoice page derives from these constants. They are
//! fixed for the whole document.

use render_model::TABLE_COLUMNS;
use serde::{Deserialize, Serialize};

/// Standard page sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Custom size in points
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// Width and height in points
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Fixed invoice geometry, in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetrics {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// x-offsets of description, quantity, unit price, discount, tax, total
    pub columns: [f64; TABLE_COLUMNS],
    /// Advance after an item row
    pub row_height: f64,
    /// Advance after the table caption row
    pub header_row_height: f64,
    /// Space kept free above the bottom margin before a page break
    pub reserved_bottom: f64,

    /// Baseline of the first header line below the top margin
    pub header_top_offset: f64,
    pub store_name_advance: f64,
    pub address_line_height: f64,
    /// Extra space after the store name/address block
    pub address_gap: f64,
    /// Space between the store header and the page content
    pub header_gap: f64,

    /// Advance after the seller line
    pub party_line_height: f64,
    /// Advance after the buyer line
    pub party_block_gap: f64,
    /// Advance after the invoice number/date line
    pub meta_advance: f64,
    /// x-offset of the right-hand value column (GSTIN, date)
    pub value_column: f64,

    /// Gap between the last row and the grand total baseline
    pub total_gap: f64,
    pub logo_width: f64,
    pub signature_width: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::for_size(PageSize::A4)
    }
}

impl PageMetrics {
    pub fn a4() -> Self {
        Self::default()
    }

    pub fn for_size(size: PageSize) -> Self {
        let (page_width, page_height) = size.dimensions();
        Self {
            page_width,
            page_height,
            margin: 20.0,
            columns: [20.0, 200.0, 250.0, 340.0, 410.0, 490.0],
            row_height: 20.0,
            header_row_height: 25.0,
            reserved_bottom: 80.0,
            header_top_offset: 25.0,
            store_name_advance: 25.0,
            address_line_height: 15.0,
            address_gap: 10.0,
            header_gap: 20.0,
            party_line_height: 15.0,
            party_block_gap: 25.0,
            meta_advance: 25.0,
            value_column: 300.0,
            total_gap: 20.0,
            logo_width: 60.0,
            signature_width: 80.0,
        }
    }

    /// Lowest cursor position that still fits on the current page
    pub fn break_threshold(&self) -> f64 {
        self.page_height - self.margin - self.reserved_bottom
    }

    /// Whether content at cursor `y` must move to a new page
    pub fn needs_break(&self, y: f64) -> bool {
        y > self.break_threshold()
    }

    /// Vertical space available to item rows on a page whose rows start
    /// at `first_row_y`
    pub fn usable_height(&self, first_row_y: f64) -> f64 {
        (self.break_threshold() - first_row_y).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_defaults() {
        let metrics = PageMetrics::a4();
        assert_eq!((metrics.page_width, metrics.page_height), (595.0, 842.0));
        assert_eq!(metrics.margin, 20.0);
        assert_eq!(metrics.columns[0], metrics.margin);
        assert_eq!(metrics.break_threshold(), 742.0);
    }

    #[test]
    fn test_needs_break_is_strict() {
        let metrics = PageMetrics::a4();
        assert!(!metrics.needs_break(742.0));
        assert!(metrics.needs_break(742.5));
    }

    #[test]
    fn test_partial_override_from_json() {
        let metrics: PageMetrics =
            serde_json::from_str(r#"{"pageHeight": 400.0, "reservedBottom": 40.0}"#).unwrap();
        assert_eq!(metrics.page_height, 400.0);
        assert_eq!(metrics.page_width, 595.0);
        assert_eq!(metrics.break_threshold(), 340.0);
    }

    #[test]
    fn test_letter_size() {
        let metrics = PageMetrics::for_size(PageSize::Letter);
        assert_eq!(metrics.page_width, 612.0);
        assert_eq!(metrics.row_height, 20.0);
    }
}
