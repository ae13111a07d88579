//! PDF Serializer
//!
//! Encodes laid-out invoice pages plus their fonts and images as a PDF file.
//!
//! # Architecture
//!
//! - `objects`: PDF object model (dictionary, array, stream, reference)
//! - `document`: Catalog, page tree, page and Info dictionaries
//! - `content`: Content stream operators
//! - `fonts`: Standard Type1 and embedded Type0/CIDFontType2 fonts
//! - `images`: Image XObjects with optional soft masks
//! - `renderer`: Draw commands → operators, per-page resource usage
//! - `writer`: Object numbering, xref table and trailer
//! - `options`: Export configuration
//! - `api`: Public entry points

mod api;
mod content;
mod document;
mod fonts;
mod images;
mod objects;
mod options;
mod renderer;
mod writer;

pub use api::*;
pub use content::ContentStream;
pub use document::{pdf_date, DocumentInfo, MediaBox, PdfVersion};
pub use fonts::{encode_winansi, EncodedText, FontTable};
pub use images::ImageTable;
pub use objects::{format_number, ObjectId, PdfDictionary, PdfObject, PdfStream, PdfString};
pub use options::*;
pub use renderer::{PageResources, PdfRenderer};
pub use writer::{PdfDocumentWriter, PdfError, PdfWriter};

#[cfg(test)]
mod tests;
