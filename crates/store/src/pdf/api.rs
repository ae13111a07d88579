//! PDF Export Public API

use super::options::PdfExportOptions;
use super::writer::{PdfDocumentWriter, PdfError, Result};
use layout_engine::CancelToken;
use render_model::Page;
use resources::ResourceSet;
use std::io::Write;

/// Serialize laid-out pages into `writer`, returning the byte count.
///
/// Images referenced by the pages must already be loaded into `resources`;
/// fonts are looked up there as well and fall back silently.
///
/// ```ignore
/// use store::pdf::{export_pdf, PdfExportOptions};
///
/// let options = PdfExportOptions::new().with_title("Invoice INV-001");
/// let written = export_pdf(&pages, &resources, &options, &mut file, &CancelToken::new())?;
/// ```
pub fn export_pdf<W: Write>(
    pages: &[Page],
    resources: &ResourceSet,
    options: &PdfExportOptions,
    writer: W,
    cancel: &CancelToken,
) -> Result<u64> {
    PdfDocumentWriter::new(options.clone()).write(pages, resources, writer, cancel)
}

/// Serialize laid-out pages into memory
pub fn export_pdf_bytes(
    pages: &[Page],
    resources: &ResourceSet,
    options: &PdfExportOptions,
) -> Result<Vec<u8>> {
    PdfDocumentWriter::new(options.clone()).write_to_bytes(pages, resources)
}

/// Check that pages can be serialized
pub fn validate_pages(pages: &[Page]) -> Result<()> {
    if pages.is_empty() {
        return Err(PdfError::InvalidDocument("No pages to export".to_string()));
    }

    for (i, page) in pages.iter().enumerate() {
        if !(page.width.is_finite() && page.width > 0.0) {
            return Err(PdfError::InvalidDocument(format!(
                "Page {} has invalid width: {}",
                i, page.width
            )));
        }
        if !(page.height.is_finite() && page.height > 0.0) {
            return Err(PdfError::InvalidDocument(format!(
                "Page {} has invalid height: {}",
                i, page.height
            )));
        }
    }

    Ok(())
}
