//! Structural tests over complete serialized documents

use super::*;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use invoice_model::{compute, InvoiceDocument, LineItem, Party};
use layout_engine::{layout_invoice, CancelToken, PageMetrics, LOGO_RESOURCE, SIGNATURE_RESOURCE};
use render_model::Page;
use resources::{FontRegistry, ResourceSet};
use std::io::Cursor;
use std::sync::Arc;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([0, 80, 160, 128]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn invoice(item_count: usize) -> InvoiceDocument {
    let items = (0..item_count)
        .map(|i| LineItem::new(format!("Item {}", i), 2, 100.0).with_discount_rate(10.0).with_tax_rate(18.0))
        .collect();
    InvoiceDocument::new(
        Party::new("Acme Traders", "29ABCDE1234F1Z5"),
        Party::new("Bharat Stores", "27PQRSX6789K1Z2"),
        "INV-042",
        InvoiceDocument::date_from_ymd(2024, 3, 5).unwrap(),
    )
    .with_store_name("Acme Traders")
    .with_items(items)
    .with_computed_total()
}

fn build(doc: &InvoiceDocument, logo: bool, signature: bool) -> (Vec<Page>, ResourceSet) {
    let mut resources = ResourceSet::new(Arc::new(FontRegistry::empty()));
    if logo {
        resources.load_image(LOGO_RESOURCE, &png(120, 60));
    }
    if signature {
        resources.load_image(SIGNATURE_RESOURCE, &png(200, 100));
    }
    let pages = layout_invoice(
        doc,
        &compute(&doc.items),
        &resources,
        &PageMetrics::a4(),
        &CancelToken::new(),
    )
    .unwrap();
    (pages, resources)
}

fn serialize(pages: &[Page], resources: &ResourceSet) -> Vec<u8> {
    let options = PdfExportOptions::new()
        .with_title("Invoice INV-042")
        .with_compression(false);
    export_pdf_bytes(pages, resources, &options).unwrap()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn test_file_frame() {
    let doc = invoice(1);
    let (pages, resources) = build(&doc, false, false);
    let bytes = serialize(&pages, &resources);

    assert!(bytes.starts_with(b"%PDF-1.4\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert!(find(&bytes, b"/Type /Catalog").is_some());
    assert!(find(&bytes, b"/Count 1").is_some());
    assert!(find(&bytes, b"/Title (Invoice INV-042)").is_some());
    assert!(find(&bytes, b"(Rs.212.40) Tj").is_some());
}

#[test]
fn test_xref_offsets_point_at_objects() {
    let doc = invoice(3);
    let (pages, resources) = build(&doc, true, true);
    let bytes = serialize(&pages, &resources);

    let startxref = rfind(&bytes, b"startxref\n").unwrap();
    let tail = String::from_utf8_lossy(&bytes[startxref + 10..]).into_owned();
    let xref_offset: usize = tail.lines().next().unwrap().trim().parse().unwrap();
    assert!(bytes[xref_offset..].starts_with(b"xref\n"));

    let table = String::from_utf8_lossy(&bytes[xref_offset..startxref]).into_owned();
    let mut lines = table.lines().skip(1);
    let header = lines.next().unwrap();
    let size: usize = header.split_whitespace().nth(1).unwrap().parse().unwrap();
    assert_eq!(lines.next().unwrap(), "0000000000 65535 f ");

    for number in 1..size {
        let entry = lines.next().unwrap();
        let offset: usize = entry[..10].parse().unwrap();
        let expected = format!("{} 0 obj\n", number);
        assert!(
            bytes[offset..].starts_with(expected.as_bytes()),
            "object {} not at offset {}",
            number,
            offset
        );
    }
    assert!(find(&bytes, format!("/Size {}", size).as_bytes()).is_some());
}

#[test]
fn test_resources_embedded_once_across_pages() {
    let doc = invoice(70);
    let (pages, resources) = build(&doc, true, true);
    assert_eq!(pages.len(), 3);
    let bytes = serialize(&pages, &resources);

    assert!(find(&bytes, b"/Count 3").is_some());
    assert_eq!(count(&bytes, b"/Type /Page >>"), 3);

    // Regular and bold Helvetica fallbacks, one object each.
    assert_eq!(count(&bytes, b"/Subtype /Type1"), 2);

    // Logo on every page, signature on the last: two images, each with a
    // soft mask, but one XObject per image.
    assert_eq!(count(&bytes, b"/Subtype /Image"), 4);
    assert_eq!(count(&bytes, b"/SMask"), 2);
    assert_eq!(count(&bytes, b"/Im0 Do"), 3);
    assert_eq!(count(&bytes, b"/Im1 Do"), 1);
}

#[test]
fn test_compressed_output_is_smaller() {
    let doc = invoice(40);
    let (pages, resources) = build(&doc, false, false);
    let plain = serialize(&pages, &resources);
    let compressed = export_pdf_bytes(&pages, &resources, &PdfExportOptions::default()).unwrap();

    assert!(compressed.len() < plain.len());
    assert!(find(&compressed, b"/Filter /FlateDecode").is_some());
    assert!(find(&compressed, b"%%EOF").is_some());
}

#[test]
fn test_cancelled_build_writes_no_trailer() {
    let doc = invoice(5);
    let (pages, resources) = build(&doc, false, false);
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut buffer = Vec::new();
    let result = export_pdf(
        &pages,
        &resources,
        &PdfExportOptions::default(),
        &mut buffer,
        &cancel,
    );
    assert!(matches!(result, Err(PdfError::Cancelled)));
    assert!(find(&buffer, b"trailer").is_none());
}

#[test]
fn test_empty_page_list_rejected() {
    let resources = ResourceSet::new(Arc::new(FontRegistry::empty()));
    assert!(matches!(
        export_pdf_bytes(&[], &resources, &PdfExportOptions::default()),
        Err(PdfError::InvalidDocument(_))
    ));
    let bad = vec![Page::new(0, 0.0, 842.0)];
    assert!(validate_pages(&bad).is_err());
}

#[test]
fn test_written_byte_count() {
    let doc = invoice(2);
    let (pages, resources) = build(&doc, false, false);
    let mut buffer = Vec::new();
    let written = export_pdf(
        &pages,
        &resources,
        &PdfExportOptions::default(),
        &mut buffer,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(written as usize, buffer.len());
}
