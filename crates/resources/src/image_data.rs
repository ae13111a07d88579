//! Image decoding and aspect-ratio scaling
//!
//! Gray and RGB JPEG payloads are kept as-is for DCT passthrough. Every
//! other image, CMYK JPEGs included, is decoded to 8-bit RGB samples with a
//! separate 8-bit alpha plane when the source carries transparency.

use crate::{ResourceError, Result};
use image::GenericImageView;
use serde::{Deserialize, Serialize};

/// Color space of the embedded samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageColorSpace {
    DeviceRgb,
    DeviceGray,
}

impl ImageColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageColorSpace::DeviceRgb => "DeviceRGB",
            ImageColorSpace::DeviceGray => "DeviceGray",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            ImageColorSpace::DeviceRgb => 3,
            ImageColorSpace::DeviceGray => 1,
        }
    }
}

/// How `DecodedImage::data` is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    /// Original JPEG stream
    Jpeg,
    /// Uncompressed samples
    Raw,
}

/// An image ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Intrinsic pixel width
    pub width: u32,
    /// Intrinsic pixel height
    pub height: u32,
    pub color_space: ImageColorSpace,
    pub bits_per_component: u8,
    pub encoding: ImageEncoding,
    pub data: Vec<u8>,
    /// One 8-bit sample per pixel, present only for translucent sources
    pub alpha: Option<Vec<u8>>,
}

impl DecodedImage {
    /// Rendered height at `target_width`, preserving aspect ratio
    pub fn scaled_height(&self, target_width: f64) -> f64 {
        scaled_height(self.width, self.height, target_width)
    }
}

/// Height for an image of `pixel_width × pixel_height` drawn `target_width`
/// wide. Width is always the controlling dimension.
pub fn scaled_height(pixel_width: u32, pixel_height: u32, target_width: f64) -> f64 {
    if pixel_width == 0 {
        return 0.0;
    }
    f64::from(pixel_height) * target_width / f64::from(pixel_width)
}

/// Decode raw image bytes into an embeddable payload.
pub fn resolve_image(data: &[u8]) -> Result<DecodedImage> {
    if data.is_empty() {
        return Err(ResourceError::ImageDecode("empty image payload".to_string()));
    }

    let format =
        image::guess_format(data).map_err(|e| ResourceError::ImageDecode(e.to_string()))?;
    let decoded = image::load_from_memory_with_format(data, format)
        .map_err(|e| ResourceError::ImageDecode(e.to_string()))?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(ResourceError::ImageDecode(format!(
            "degenerate image {}x{}",
            width, height
        )));
    }

    // Four-component (CMYK/YCCK) JPEGs are decoded to RGB instead.
    let passthrough = match jpeg_components(data) {
        Some(1) if format == image::ImageFormat::Jpeg => Some(ImageColorSpace::DeviceGray),
        Some(3) if format == image::ImageFormat::Jpeg => Some(ImageColorSpace::DeviceRgb),
        _ => None,
    };
    if let Some(color_space) = passthrough {
        return Ok(DecodedImage {
            width,
            height,
            color_space,
            bits_per_component: 8,
            encoding: ImageEncoding::Jpeg,
            data: data.to_vec(),
            alpha: None,
        });
    }

    let rgba = decoded.to_rgba8();
    let pixels = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    let mut translucent = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        translucent |= a != u8::MAX;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    Ok(DecodedImage {
        width,
        height,
        color_space: ImageColorSpace::DeviceRgb,
        bits_per_component: 8,
        encoding: ImageEncoding::Raw,
        data: rgb,
        alpha: translucent.then_some(alpha),
    })
}

/// Component count from the first SOF segment of a JPEG stream
fn jpeg_components(data: &[u8]) -> Option<u8> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let length = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            // precision(1) height(2) width(2) components(1)
            return data.get(pos + 9).copied();
        }
        if marker == 0xDA || length < 2 {
            return None;
        }
        pos += 2 + length;
    }
    None
}
