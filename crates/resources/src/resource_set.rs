//! Per-document resource set
//!
//! Holds every image and font a single generation uses, keyed by logical
//! name so each payload is embedded once no matter how many pages draw it.
//! Resolution failures never abort a document; they are logged and kept as
//! warnings for the caller.

use crate::{resolve_image, DecodedImage, FontRegistry, ResolvedFont};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct ResourceSet {
    registry: Arc<FontRegistry>,
    images: BTreeMap<String, Arc<DecodedImage>>,
    fonts: BTreeMap<(String, bool), ResolvedFont>,
    warnings: Vec<String>,
}

impl ResourceSet {
    pub fn new(registry: Arc<FontRegistry>) -> Self {
        Self {
            registry,
            images: BTreeMap::new(),
            fonts: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Decode and register an image under `name`.
    ///
    /// Returns `None` for empty or undecodable payloads; the latter is
    /// recorded as a warning. A name that is already registered is not
    /// decoded again.
    pub fn load_image(&mut self, name: &str, bytes: &[u8]) -> Option<Arc<DecodedImage>> {
        if let Some(existing) = self.images.get(name) {
            return Some(existing.clone());
        }
        if bytes.is_empty() {
            return None;
        }

        match resolve_image(bytes) {
            Ok(image) => {
                tracing::debug!(
                    "Registered image {} ({}x{})",
                    name,
                    image.width,
                    image.height
                );
                let image = Arc::new(image);
                self.images.insert(name.to_string(), image.clone());
                Some(image)
            }
            Err(e) => {
                tracing::warn!("Skipping image {}: {}", name, e);
                self.warnings.push(format!("image {} omitted: {}", name, e));
                None
            }
        }
    }

    pub fn image(&self, name: &str) -> Option<&Arc<DecodedImage>> {
        self.images.get(name)
    }

    /// Registered images in name order
    pub fn images(&self) -> impl Iterator<Item = (&str, &Arc<DecodedImage>)> {
        self.images.iter().map(|(name, image)| (name.as_str(), image))
    }

    /// Resolve and remember a font request, recording a warning the first
    /// time a request falls back.
    pub fn font(&mut self, family: &str, bold: bool) -> ResolvedFont {
        let key = (family.to_string(), bold);
        if let Some(font) = self.fonts.get(&key) {
            return font.clone();
        }

        let font = match self.registry.try_resolve(family, bold) {
            Ok(font) => font,
            Err(e) => {
                let fallback = self.registry.resolve(family, bold);
                tracing::warn!("{}; using {}", e, fallback.key());
                self.warnings
                    .push(format!("{} replaced by {}", family, fallback.key()));
                fallback
            }
        };
        self.fonts.insert(key, font.clone());
        font
    }

    /// Font for a request without recording anything
    pub fn lookup_font(&self, family: &str, bold: bool) -> ResolvedFont {
        self.fonts
            .get(&(family.to_string(), bold))
            .cloned()
            .unwrap_or_else(|| self.registry.resolve(family, bold))
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

impl Default for ResourceSet {
    fn default() -> Self {
        Self::new(Arc::new(FontRegistry::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_data::tests::png_bytes;
    use crate::StandardFont;

    #[test]
    fn test_image_deduplicated_by_name() {
        let mut set = ResourceSet::default();
        let first = set.load_image("logo", &png_bytes(4, 2)).unwrap();
        // A second payload under the same name is ignored.
        let second = set.load_image("logo", &png_bytes(8, 8)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(set.images().count(), 1);
    }

    #[test]
    fn test_corrupt_image_is_a_warning() {
        let mut set = ResourceSet::default();
        assert!(set.load_image("signature", b"garbage").is_none());
        assert!(set.image("signature").is_none());
        assert_eq!(set.warnings().len(), 1);
    }

    #[test]
    fn test_empty_image_is_absent() {
        let mut set = ResourceSet::default();
        assert!(set.load_image("logo", &[]).is_none());
        assert!(set.warnings().is_empty());
    }

    #[test]
    fn test_font_fallback_warns_once() {
        let mut set = ResourceSet::default();
        let first = set.font("NotoSans", true);
        let second = set.font("NotoSans", true);
        assert_eq!(first, ResolvedFont::Standard(StandardFont::HelveticaBold));
        assert_eq!(first, second);
        assert_eq!(set.take_warnings().len(), 1);
        assert!(set.warnings().is_empty());
    }

    #[test]
    fn test_lookup_font_uses_cache() {
        let mut set = ResourceSet::default();
        set.font("Times", false);
        assert!(set.warnings().is_empty());
        assert_eq!(
            set.lookup_font("Times", false),
            ResolvedFont::Standard(StandardFont::TimesRoman)
        );
        assert_eq!(set.lookup_font("Anything", false).key(), "Helvetica");
    }
}
