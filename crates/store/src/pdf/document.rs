//! PDF Document Structure
//!
//! Catalog, page tree, page dictionaries and the Info dictionary.

use super::objects::{ObjectId, PdfDictionary, PdfObject};
use super::options::PdfExportOptions;
use chrono::{DateTime, Utc};

/// PDF version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfVersion {
    #[default]
    V1_4,
    V1_5,
    V1_7,
}

impl PdfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_7 => "1.7",
        }
    }
}

/// Document information dictionary
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn from_options(options: &PdfExportOptions) -> Self {
        Self {
            title: options.title.clone(),
            author: options.author.clone(),
            subject: options.subject.clone(),
            keywords: options.keywords.clone(),
            creator: options.creator.clone(),
            producer: Some(format!("invoice-pdf {}", env!("CARGO_PKG_VERSION"))),
            creation_date: options.creation_date,
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let text_fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                dict.insert(key, PdfObject::text(value));
            }
        }
        if !self.keywords.is_empty() {
            dict.insert("Keywords", PdfObject::text(&self.keywords.join(", ")));
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(date)));
        }
        dict
    }
}

/// `D:YYYYMMDDHHmmSS+00'00'`
pub fn pdf_date(date: DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn a4() -> Self {
        Self::from_dimensions(595.0, 842.0)
    }

    pub fn to_array(&self) -> PdfObject {
        PdfObject::numbers(&[0.0, 0.0, self.width, self.height])
    }
}

/// Root catalog
pub fn create_catalog(pages: ObjectId) -> PdfDictionary {
    PdfDictionary::typed("Catalog").with("Pages", PdfObject::reference(pages))
}

/// Flat page tree
pub fn create_pages(kids: &[ObjectId]) -> PdfDictionary {
    PdfDictionary::typed("Pages")
        .with(
            "Kids",
            PdfObject::Array(kids.iter().copied().map(PdfObject::reference).collect()),
        )
        .with("Count", PdfObject::Integer(kids.len() as i64))
}

/// Leaf page object
pub fn page_dictionary(
    parent: ObjectId,
    media_box: MediaBox,
    contents: ObjectId,
    resources: PdfDictionary,
) -> PdfDictionary {
    PdfDictionary::typed("Page")
        .with("Parent", PdfObject::reference(parent))
        .with("MediaBox", media_box.to_array())
        .with("Contents", PdfObject::reference(contents))
        .with("Resources", resources.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn render(dict: PdfDictionary) -> String {
        String::from_utf8(PdfObject::from(dict).to_bytes()).unwrap()
    }

    #[test]
    fn test_page_tree() {
        let pages = create_pages(&[ObjectId(4), ObjectId(6)]);
        assert_eq!(
            render(pages),
            "<< /Count 2 /Kids [4 0 R 6 0 R] /Type /Pages >>"
        );
        assert_eq!(
            render(create_catalog(ObjectId(2))),
            "<< /Pages 2 0 R /Type /Catalog >>"
        );
    }

    #[test]
    fn test_page_dictionary() {
        let page = page_dictionary(ObjectId(2), MediaBox::a4(), ObjectId(5), PdfDictionary::new());
        let text = render(page);
        assert!(text.contains("/MediaBox [0 0 595 842]"));
        assert!(text.contains("/Parent 2 0 R"));
        assert!(text.contains("/Contents 5 0 R"));
        assert!(text.contains("/Resources << >>"));
    }

    #[test]
    fn test_info_dictionary() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let info = DocumentInfo {
            title: Some("Invoice INV-7".to_string()),
            keywords: vec!["invoice".to_string(), "gst".to_string()],
            creation_date: Some(date),
            ..Default::default()
        };
        let text = render(info.to_dictionary());
        assert!(text.contains("/Title (Invoice INV-7)"));
        assert!(text.contains("/Keywords (invoice, gst)"));
        assert!(text.contains("/CreationDate (D:20240305140709+00'00')"));
        assert!(!text.contains("/Author"));
    }
}
