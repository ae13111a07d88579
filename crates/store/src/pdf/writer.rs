//! PDF Writer
//!
//! File structure (header, numbered body objects, xref table, trailer) and
//! the document writer that turns laid-out pages into a complete file.

use super::content::ContentStream;
use super::document::{create_catalog, create_pages, page_dictionary, DocumentInfo, MediaBox, PdfVersion};
use super::fonts::FontTable;
use super::images::ImageTable;
use super::objects::{ObjectId, PdfObject, PdfStream};
use super::options::PdfExportOptions;
use super::renderer::PdfRenderer;
use layout_engine::CancelToken;
use render_model::Page;
use resources::ResourceSet;
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("PDF serialization cancelled")]
    Cancelled,
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level PDF file writer
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// Byte offset per object number, index 0 unused
    offsets: Vec<Option<u64>>,
    version: PdfVersion,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W, version: PdfVersion) -> Self {
        Self {
            writer,
            position: 0,
            offsets: vec![None],
            version,
            compress: true,
        }
    }

    /// Whether streams without a filter are flate-compressed
    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    /// Bytes written so far
    pub fn position(&self) -> u64 {
        self.position
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Reserve the next object number
    pub fn allocate(&mut self) -> ObjectId {
        self.offsets.push(None);
        ObjectId((self.offsets.len() - 1) as u32)
    }

    /// `%PDF-x.y` plus a binary marker comment
    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", self.version.as_str()))?;
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    fn begin_object(&mut self, id: ObjectId) -> Result<()> {
        let slot = self
            .offsets
            .get_mut(id.0 as usize)
            .ok_or_else(|| PdfError::InvalidDocument(format!("object {} was never allocated", id.0)))?;
        if slot.is_some() {
            return Err(PdfError::InvalidDocument(format!("object {} written twice", id.0)));
        }
        *slot = Some(self.position);
        self.write_str(&format!("{} 0 obj\n", id.0))
    }

    /// Write an indirect object
    pub fn write_object(&mut self, id: ObjectId, object: &PdfObject) -> Result<()> {
        self.begin_object(id)?;
        self.write_bytes(&object.to_bytes())?;
        self.write_str("\nendobj\n")
    }

    /// Write a stream object, compressing it unless it is already encoded
    pub fn write_stream(&mut self, id: ObjectId, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            stream = compress_stream(stream)?;
        }
        stream
            .dict
            .insert("Length", PdfObject::Integer(stream.data.len() as i64));

        self.begin_object(id)?;
        let mut head = Vec::new();
        stream.dict.write_to(&mut head);
        self.write_bytes(&head)?;
        self.write_str("\nstream\n")?;
        self.write_bytes(&stream.data)?;
        self.write_str("\nendstream\nendobj\n")
    }

    /// Cross-reference table, trailer and `%%EOF`
    pub fn write_xref_and_trailer(&mut self, root: ObjectId, info: Option<ObjectId>) -> Result<()> {
        if let Some(missing) = self.offsets.iter().skip(1).position(Option::is_none) {
            return Err(PdfError::InvalidDocument(format!(
                "object {} allocated but not written",
                missing + 1
            )));
        }

        let xref_offset = self.position;
        let size = self.offsets.len();

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in self.offsets.iter().skip(1).flatten() {
            table.push_str(&format!("{:010} 00000 n \n", offset));
        }
        self.write_str(&table)?;

        let mut trailer = super::objects::PdfDictionary::new()
            .with("Size", PdfObject::Integer(size as i64))
            .with("Root", PdfObject::reference(root));
        if let Some(info) = info {
            trailer.insert("Info", PdfObject::reference(info));
        }
        self.write_str("trailer\n")?;
        self.write_bytes(&PdfObject::Dictionary(trailer).to_bytes())?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn compress_stream(mut stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&stream.data)
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    stream.data = encoder
        .finish()
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    stream.encoded = true;
    stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
    Ok(stream)
}

/// Writes laid-out pages and their resources as one PDF file.
pub struct PdfDocumentWriter {
    options: PdfExportOptions,
}

impl PdfDocumentWriter {
    pub fn new(options: PdfExportOptions) -> Self {
        Self { options }
    }

    /// Write the document and return the number of bytes produced.
    ///
    /// `cancel` is checked before each page is rendered and before each page
    /// is written. A cancelled build stops before the trailer.
    pub fn write<W: Write>(
        &self,
        pages: &[Page],
        resources: &ResourceSet,
        writer: W,
        cancel: &CancelToken,
    ) -> Result<u64> {
        super::api::validate_pages(pages)?;

        let mut pdf = PdfWriter::new(writer, self.options.pdf_version.into());
        pdf.set_compression(self.options.compress);
        pdf.write_header()?;

        let catalog_id = pdf.allocate();
        let pages_id = pdf.allocate();
        let info_id = pdf.allocate();

        // Render first so the font and image tables know every resource and
        // glyph in use before anything is embedded.
        let mut fonts = FontTable::new();
        let mut images = ImageTable::new();
        let mut rendered = Vec::with_capacity(pages.len());
        {
            let mut renderer = PdfRenderer::new(resources, &mut fonts, &mut images);
            for page in pages {
                check(cancel)?;
                rendered.push((page, renderer.render_page(page)));
            }
        }

        let font_ids = fonts.write_objects(&mut pdf)?;
        let image_ids = images.write_objects(&mut pdf)?;

        let mut page_ids = Vec::with_capacity(rendered.len());
        for (page, (content, usage)) in rendered {
            check(cancel)?;
            let page_id = pdf.allocate();
            let content_id = pdf.allocate();
            pdf.write_stream(content_id, PdfStream::new(ContentStream::into_bytes(content)))?;

            let resources_dict = usage.to_dictionary(&font_ids, &image_ids);
            let dict = page_dictionary(
                pages_id,
                MediaBox::from_dimensions(page.width, page.height),
                content_id,
                resources_dict,
            );
            pdf.write_object(page_id, &dict.into())?;
            page_ids.push(page_id);
            tracing::debug!("Wrote page {} as object {}", page.index + 1, page_id.0);
        }

        pdf.write_object(pages_id, &create_pages(&page_ids).into())?;
        pdf.write_object(catalog_id, &create_catalog(pages_id).into())?;

        let info = DocumentInfo::from_options(&self.options);
        pdf.write_object(info_id, &info.to_dictionary().into())?;

        pdf.write_xref_and_trailer(catalog_id, Some(info_id))?;
        let written = pdf.position();
        pdf.finish()?;
        Ok(written)
    }

    /// Write the document into memory
    pub fn write_to_bytes(&self, pages: &[Page], resources: &ResourceSet) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(pages, resources, &mut buffer, &CancelToken::new())?;
        Ok(buffer)
    }
}

fn check(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(PdfError::Cancelled)
    } else {
        Ok(())
    }
}
