//! Font resources
//!
//! Every distinct resolved font gets one resource name (`F0`, `F1`, ...) and
//! is embedded once no matter how many pages use it. Standard fonts are
//! written as Type1 with WinAnsi encoding. Embedded TrueType programs are
//! written as Type0 / CIDFontType2 with `Identity-H`, a `/W` array covering
//! the glyphs actually shown and a `ToUnicode` CMap for text extraction.

use super::objects::{ObjectId, PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfWriter, Result};
use resources::{FontProgram, ResolvedFont, StandardFont};
use std::collections::BTreeMap;
use std::io::Write;

/// Text encoded for a `Tj` operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedText {
    /// Single-byte WinAnsi codes
    WinAnsi(Vec<u8>),
    /// Two-byte glyph ids
    Glyphs(Vec<u16>),
}

#[derive(Debug)]
struct FontEntry {
    resource: String,
    font: ResolvedFont,
    /// Glyph id → (character, advance) for every glyph shown
    used: BTreeMap<u16, (char, u16)>,
}

/// Fonts in use by a document
#[derive(Debug, Default)]
pub struct FontTable {
    entries: Vec<FontEntry>,
}

impl FontTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_index(&mut self, font: &ResolvedFont) -> usize {
        if let Some(index) = self.entries.iter().position(|e| e.font.key() == font.key()) {
            return index;
        }
        self.entries.push(FontEntry {
            resource: format!("F{}", self.entries.len()),
            font: font.clone(),
            used: BTreeMap::new(),
        });
        self.entries.len() - 1
    }

    /// Register `font` if needed and encode `text` for it. Returns the
    /// resource name and the encoded string.
    pub fn encode(&mut self, font: &ResolvedFont, text: &str) -> (String, EncodedText) {
        let index = self.entry_index(font);
        let entry = &mut self.entries[index];

        let encoded = match &entry.font {
            ResolvedFont::Standard(_) => EncodedText::WinAnsi(encode_winansi(text)),
            ResolvedFont::Embedded(program) => {
                let glyphs = program.glyphs(text);
                for (ch, (gid, width)) in text.chars().zip(glyphs.iter()) {
                    if *gid != 0 {
                        entry.used.entry(*gid).or_insert((ch, *width));
                    }
                }
                EncodedText::Glyphs(glyphs.into_iter().map(|(gid, _)| gid).collect())
            }
        };

        (entry.resource.clone(), encoded)
    }

    /// Write every font's objects. Returns resource name → font object.
    pub fn write_objects<W: Write>(
        &self,
        pdf: &mut PdfWriter<W>,
    ) -> Result<BTreeMap<String, ObjectId>> {
        let mut ids = BTreeMap::new();
        for entry in &self.entries {
            let id = match &entry.font {
                ResolvedFont::Standard(font) => {
                    let id = pdf.allocate();
                    pdf.write_object(id, &standard_font_dict(*font).into())?;
                    id
                }
                ResolvedFont::Embedded(program) => write_embedded(pdf, program, &entry.used)?,
            };
            ids.insert(entry.resource.clone(), id);
        }
        Ok(ids)
    }
}

/// Type1 dictionary for a standard font
pub fn standard_font_dict(font: StandardFont) -> PdfDictionary {
    PdfDictionary::typed("Font")
        .with("Subtype", PdfObject::name("Type1"))
        .with("BaseFont", PdfObject::name(font.pdf_name()))
        .with("Encoding", PdfObject::name("WinAnsiEncoding"))
}

fn write_embedded<W: Write>(
    pdf: &mut PdfWriter<W>,
    program: &FontProgram,
    used: &BTreeMap<u16, (char, u16)>,
) -> Result<ObjectId> {
    let metrics = program.metrics();
    let font_file = pdf.allocate();
    let descriptor = pdf.allocate();
    let cid_font = pdf.allocate();
    let to_unicode = pdf.allocate();
    let type0 = pdf.allocate();

    let data = program.data().to_vec();
    let length1 = data.len() as i64;
    pdf.write_stream(
        font_file,
        PdfStream::new(data).with_dict(PdfDictionary::new().with("Length1", length1.into())),
    )?;

    let mut flags = 32;
    if metrics.is_fixed_pitch {
        flags |= 1;
    }
    let (x_min, y_min, x_max, y_max) = metrics.bbox;
    let descriptor_dict = PdfDictionary::typed("FontDescriptor")
        .with("FontName", PdfObject::name(program.name()))
        .with("Flags", PdfObject::Integer(flags))
        .with(
            "FontBBox",
            PdfObject::Array(
                [x_min, y_min, x_max, y_max]
                    .iter()
                    .map(|v| PdfObject::Integer(i64::from(*v)))
                    .collect(),
            ),
        )
        .with("ItalicAngle", PdfObject::Integer(i64::from(metrics.italic_angle)))
        .with("Ascent", PdfObject::Integer(i64::from(metrics.ascent)))
        .with("Descent", PdfObject::Integer(i64::from(metrics.descent)))
        .with("CapHeight", PdfObject::Integer(i64::from(metrics.cap_height)))
        .with("StemV", PdfObject::Integer(i64::from(metrics.stem_v)))
        .with("MissingWidth", PdfObject::Integer(i64::from(metrics.missing_width)))
        .with("FontFile2", PdfObject::reference(font_file));
    pdf.write_object(descriptor, &descriptor_dict.into())?;

    let mut cid_dict = PdfDictionary::typed("Font")
        .with("Subtype", PdfObject::name("CIDFontType2"))
        .with("BaseFont", PdfObject::name(program.name()))
        .with(
            "CIDSystemInfo",
            PdfDictionary::new()
                .with("Registry", PdfObject::text("Adobe"))
                .with("Ordering", PdfObject::text("Identity"))
                .with("Supplement", PdfObject::Integer(0))
                .into(),
        )
        .with("FontDescriptor", PdfObject::reference(descriptor))
        .with("CIDToGIDMap", PdfObject::name("Identity"))
        .with("DW", PdfObject::Integer(i64::from(metrics.missing_width)));
    if !used.is_empty() {
        cid_dict.insert("W", widths_array(used));
    }
    pdf.write_object(cid_font, &cid_dict.into())?;

    pdf.write_stream(to_unicode, PdfStream::new(to_unicode_cmap(used).into_bytes()))?;

    let type0_dict = PdfDictionary::typed("Font")
        .with("Subtype", PdfObject::name("Type0"))
        .with("BaseFont", PdfObject::name(program.name()))
        .with("Encoding", PdfObject::name("Identity-H"))
        .with("DescendantFonts", PdfObject::Array(vec![PdfObject::reference(cid_font)]))
        .with("ToUnicode", PdfObject::reference(to_unicode));
    pdf.write_object(type0, &type0_dict.into())?;

    Ok(type0)
}

/// `[gid [w] gid [w] ...]`
fn widths_array(used: &BTreeMap<u16, (char, u16)>) -> PdfObject {
    let mut items = Vec::with_capacity(used.len() * 2);
    for (gid, (_, width)) in used {
        items.push(PdfObject::Integer(i64::from(*gid)));
        items.push(PdfObject::Array(vec![PdfObject::Integer(i64::from(*width))]));
    }
    PdfObject::Array(items)
}

/// ToUnicode CMap mapping glyph ids back to characters
pub fn to_unicode_cmap(used: &BTreeMap<u16, (char, u16)>) -> String {
    let entries: Vec<(u16, char)> = used.iter().map(|(gid, (ch, _))| (*gid, *ch)).collect();

    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    for chunk in entries.chunks(100) {
        out.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            out.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}

/// Encode text as WinAnsi (cp1252) bytes. The rupee sign becomes `Rs.`;
/// anything else outside the code page becomes `?`.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = match ch {
            '\u{20B9}' => {
                out.extend_from_slice(b"Rs.");
                continue;
            }
            '\u{0000}'..='\u{007F}' | '\u{00A0}'..='\u{00FF}' => ch as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            _ => b'?',
        };
        out.push(byte);
    }
    out
}
