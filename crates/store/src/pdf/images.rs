//! Image XObjects
//!
//! Each named image is embedded once as an XObject (`Im0`, `Im1`, ...).
//! JPEG data passes through with `DCTDecode`; raw samples go through the
//! writer's flate compression. Alpha becomes a DeviceGray soft mask.

use super::objects::{ObjectId, PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfWriter, Result};
use resources::{DecodedImage, ImageColorSpace, ImageEncoding};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug)]
struct ImageEntry {
    name: String,
    resource: String,
    image: Arc<DecodedImage>,
}

/// Images in use by a document
#[derive(Debug, Default)]
pub struct ImageTable {
    entries: Vec<ImageEntry>,
}

impl ImageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resource name for the image registered under `name`
    pub fn register(&mut self, name: &str, image: &Arc<DecodedImage>) -> String {
        if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
            return entry.resource.clone();
        }
        let resource = format!("Im{}", self.entries.len());
        self.entries.push(ImageEntry {
            name: name.to_string(),
            resource: resource.clone(),
            image: image.clone(),
        });
        resource
    }

    /// Write every image. Returns resource name → XObject.
    pub fn write_objects<W: Write>(
        &self,
        pdf: &mut PdfWriter<W>,
    ) -> Result<BTreeMap<String, ObjectId>> {
        let mut ids = BTreeMap::new();
        for entry in &self.entries {
            let id = write_image(pdf, &entry.image)?;
            ids.insert(entry.resource.clone(), id);
        }
        Ok(ids)
    }
}

fn base_dict(width: u32, height: u32, color_space: ImageColorSpace, bits: u8) -> PdfDictionary {
    PdfDictionary::typed("XObject")
        .with("Subtype", PdfObject::name("Image"))
        .with("Width", PdfObject::Integer(i64::from(width)))
        .with("Height", PdfObject::Integer(i64::from(height)))
        .with("ColorSpace", PdfObject::name(color_space.pdf_name()))
        .with("BitsPerComponent", PdfObject::Integer(i64::from(bits)))
}

fn write_image<W: Write>(pdf: &mut PdfWriter<W>, image: &DecodedImage) -> Result<ObjectId> {
    let id = pdf.allocate();
    let mut dict = base_dict(
        image.width,
        image.height,
        image.color_space,
        image.bits_per_component,
    );

    if let Some(alpha) = &image.alpha {
        let mask_id = pdf.allocate();
        let mask = PdfStream::new(alpha.clone()).with_dict(base_dict(
            image.width,
            image.height,
            ImageColorSpace::DeviceGray,
            8,
        ));
        pdf.write_stream(mask_id, mask)?;
        dict.insert("SMask", PdfObject::reference(mask_id));
    }

    let stream = PdfStream::new(image.data.clone()).with_dict(dict);
    let stream = match image.encoding {
        ImageEncoding::Jpeg => stream.pre_encoded("DCTDecode"),
        ImageEncoding::Raw => stream,
    };
    pdf.write_stream(id, stream)?;
    Ok(id)
}
