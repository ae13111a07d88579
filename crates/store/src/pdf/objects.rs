//! PDF Object Model
//!
//! The handful of object types an invoice needs: scalars, strings, names,
//! arrays, dictionaries and indirect references. Streams carry their own
//! dictionary and are written by the file writer.

use std::collections::BTreeMap;
use std::io::Write;

/// Indirect object number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// PDF object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    /// Name object, written with a leading `/`
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Reference(ObjectId),
}

/// PDF string encoding
#[derive(Debug, Clone, PartialEq)]
pub enum PdfString {
    /// `( ... )` with escapes
    Literal(Vec<u8>),
    /// `< ... >`
    Hex(Vec<u8>),
}

impl PdfString {
    /// Text string for metadata. Non-ASCII text is written as UTF-16BE
    /// with a byte-order mark.
    pub fn text(s: &str) -> Self {
        if s.is_ascii() {
            PdfString::Literal(s.as_bytes().to_vec())
        } else {
            let mut data = vec![0xFE, 0xFF];
            for unit in s.encode_utf16() {
                data.extend_from_slice(&unit.to_be_bytes());
            }
            PdfString::Hex(data)
        }
    }
}

/// PDF dictionary with deterministic key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with `/Type /<type_name>`
    pub fn typed(type_name: &str) -> Self {
        Self::new().with("Type", PdfObject::name(type_name))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.entries.insert(key.into(), value);
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: PdfObject) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// PDF stream (dictionary + data)
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Whether `data` already carries a filter and must not be deflated again
    pub encoded: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }

    pub fn with_dict(mut self, dict: PdfDictionary) -> Self {
        for (key, value) in dict.entries {
            self.dict.insert(key, value);
        }
        self
    }

    /// Data is already encoded with `filter`
    pub fn pre_encoded(mut self, filter: &str) -> Self {
        self.dict.insert("Filter", PdfObject::name(filter));
        self.encoded = true;
        self
    }
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn reference(id: ObjectId) -> Self {
        PdfObject::Reference(id)
    }

    /// Text string (see [`PdfString::text`])
    pub fn text(s: &str) -> Self {
        PdfObject::String(PdfString::text(s))
    }

    /// `[0 0 w h]`-style array of numbers
    pub fn numbers(values: &[f64]) -> Self {
        PdfObject::Array(values.iter().map(|v| PdfObject::Real(*v)).collect())
    }

    /// Serialize into `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Null => out.extend_from_slice(b"null"),
            PdfObject::Boolean(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
            PdfObject::Integer(n) => {
                let _ = write!(out, "{}", n);
            }
            PdfObject::Real(n) => out.extend_from_slice(format_number(*n).as_bytes()),
            PdfObject::String(s) => write_string(s, out),
            PdfObject::Name(name) => write_name(name, out),
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(dict) => dict.write_to(out),
            PdfObject::Reference(id) => {
                let _ = write!(out, "{} 0 R", id.0);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

impl PdfDictionary {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<<");
        for (key, value) in &self.entries {
            out.push(b' ');
            write_name(key, out);
            out.push(b' ');
            value.write_to(out);
        }
        out.extend_from_slice(b" >>");
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

/// Format a number compactly: integers without a fraction, otherwise at
/// most four decimals with trailing zeros dropped.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n.fract() == 0.0 {
        return format!("{:.0}", n);
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub(crate) fn write_literal(data: &[u8], out: &mut Vec<u8>) {
    out.push(b'(');
    for &byte in data {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x20..=0x7E => out.push(byte),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out.push(b')');
}

pub(crate) fn write_hex(data: &[u8], out: &mut Vec<u8>) {
    out.push(b'<');
    for byte in data {
        let _ = write!(out, "{:02X}", byte);
    }
    out.push(b'>');
}

fn write_string(s: &PdfString, out: &mut Vec<u8>) {
    match s {
        PdfString::Literal(data) => write_literal(data, out),
        PdfString::Hex(data) => write_hex(data, out),
    }
}

fn write_name(name: &str, out: &mut Vec<u8>) {
    out.push(b'/');
    for byte in name.bytes() {
        match byte {
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => {
                let _ = write!(out, "#{:02X}", byte);
            }
            0x21..=0x7E => out.push(byte),
            _ => {
                let _ = write!(out, "#{:02X}", byte);
            }
        }
    }
}
