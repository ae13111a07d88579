//! Font registry
//!
//! A static table maps the small set of logical family names used on
//! invoices to font assets. The assets are loaded once per process into a
//! read-only registry per asset directory; anything the table does not cover, or whose asset
//! was not loaded, resolves to a standard PDF font.

use crate::{FontProgram, ResourceError, Result, StandardFont};
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Font faces backed by bundled assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    NotoSansRegular,
    NotoSansBold,
    NotoSansSemiBold,
}

/// Logical name → face. Includes the resource-style aliases callers use.
const LOGICAL_NAMES: &[(&str, FontFace)] = &[
    ("NotoSansRegular", FontFace::NotoSansRegular),
    ("NotoSansRegularFont", FontFace::NotoSansRegular),
    ("NotoSans-Regular", FontFace::NotoSansRegular),
    ("NotoSansBold", FontFace::NotoSansBold),
    ("NotoSansBoldFont", FontFace::NotoSansBold),
    ("NotoSans-Bold", FontFace::NotoSansBold),
    ("NotoSansSemiBold", FontFace::NotoSansSemiBold),
    ("NotoSansSemiBoldFont", FontFace::NotoSansSemiBold),
    ("NotoSans-SemiBold", FontFace::NotoSansSemiBold),
];

/// Families whose regular/bold faces are bundled
const FAMILIES: &[&str] = &["NotoSans", "Noto Sans", "NotoSansRegularFont"];

impl FontFace {
    pub const ALL: [FontFace; 3] = [
        FontFace::NotoSansRegular,
        FontFace::NotoSansBold,
        FontFace::NotoSansSemiBold,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FontFace::NotoSansRegular => "NotoSansRegular",
            FontFace::NotoSansBold => "NotoSansBold",
            FontFace::NotoSansSemiBold => "NotoSansSemiBold",
        }
    }

    /// Asset file holding this face
    pub fn file_name(&self) -> &'static str {
        match self {
            FontFace::NotoSansRegular => "NotoSans-Regular.ttf",
            FontFace::NotoSansBold => "NotoSans-Bold.ttf",
            FontFace::NotoSansSemiBold => "NotoSans-SemiBold.ttf",
        }
    }

    /// Look up a logical font name (e.g. `NotoSansRegularFont`)
    pub fn from_logical_name(name: &str) -> Option<Self> {
        LOGICAL_NAMES
            .iter()
            .find(|(logical, _)| logical.eq_ignore_ascii_case(name))
            .map(|(_, face)| *face)
    }

    /// Face for a family/weight request, if the family is bundled
    pub fn for_family(family: &str, bold: bool) -> Option<Self> {
        if FAMILIES.iter().any(|f| f.eq_ignore_ascii_case(family)) {
            return Some(if bold {
                FontFace::NotoSansBold
            } else {
                FontFace::NotoSansRegular
            });
        }
        let face = Self::from_logical_name(family)?;
        Some(match (face, bold) {
            (FontFace::NotoSansRegular, true) => FontFace::NotoSansBold,
            (face, _) => face,
        })
    }
}

/// Result of resolving a font request
#[derive(Debug, Clone)]
pub enum ResolvedFont {
    Embedded(Arc<FontProgram>),
    Standard(StandardFont),
}

impl ResolvedFont {
    /// Identity used to deduplicate font resources in the output
    pub fn key(&self) -> &str {
        match self {
            ResolvedFont::Embedded(program) => program.name(),
            ResolvedFont::Standard(font) => font.pdf_name(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ResolvedFont::Embedded(_))
    }

    /// Advance width of `text` at `font_size`, in points
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        match self {
            ResolvedFont::Embedded(program) => program.text_width(text, font_size),
            ResolvedFont::Standard(font) => font.text_width(text, font_size),
        }
    }
}

impl PartialEq for ResolvedFont {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

/// Loaded font programs, keyed by face
#[derive(Debug, Default)]
pub struct FontRegistry {
    programs: HashMap<FontFace, Arc<FontProgram>>,
}

impl FontRegistry {
    /// A registry with no embedded fonts; everything falls back
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every mapped face from `dir`. Missing or unreadable assets are
    /// logged and skipped.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut registry = Self::empty();

        for face in FontFace::ALL {
            let path = dir.join(face.file_name());
            match std::fs::read(&path)
                .map_err(ResourceError::from)
                .and_then(|bytes| FontProgram::parse(face.name(), bytes))
            {
                Ok(program) => {
                    tracing::debug!("Loaded font {} from {}", face.name(), path.display());
                    registry.programs.insert(face, Arc::new(program));
                }
                Err(e) => {
                    tracing::warn!("Font asset {} unavailable: {}", path.display(), e);
                }
            }
        }

        registry
    }

    /// Add a program under `face`
    pub fn with_program(mut self, face: FontFace, program: FontProgram) -> Self {
        self.programs.insert(face, Arc::new(program));
        self
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Resolve a logical font name to its program.
    pub fn resolve_font(&self, logical_name: &str) -> Result<Arc<FontProgram>> {
        FontFace::from_logical_name(logical_name)
            .and_then(|face| self.programs.get(&face))
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(format!("font {}", logical_name)))
    }

    /// Resolve a family/weight request, falling back to a standard font.
    pub fn resolve(&self, family: &str, bold: bool) -> ResolvedFont {
        self.try_resolve(family, bold)
            .unwrap_or_else(|_| ResolvedFont::Standard(Self::fallback(family, bold)))
    }

    /// Like [`FontRegistry::resolve`] but reports why an embedded font
    /// could not be used.
    pub fn try_resolve(&self, family: &str, bold: bool) -> Result<ResolvedFont> {
        if let Some(face) = FontFace::for_family(family, bold) {
            return self
                .programs
                .get(&face)
                .map(|program| ResolvedFont::Embedded(program.clone()))
                .ok_or_else(|| {
                    ResourceError::NotFound(format!("font asset {}", face.file_name()))
                });
        }
        if let Some(font) = StandardFont::from_name(family, bold) {
            return Ok(ResolvedFont::Standard(font));
        }
        Err(ResourceError::NotFound(format!("font family {}", family)))
    }

    fn fallback(family: &str, bold: bool) -> StandardFont {
        StandardFont::from_name(family, bold).unwrap_or_else(|| StandardFont::default_fallback(bold))
    }
}

static GLOBAL_REGISTRY: OnceCell<Arc<FontRegistry>> = OnceCell::new();

/// Registries loaded from a directory, keyed by that directory
static LOADED_DIRS: Lazy<Mutex<HashMap<PathBuf, Arc<FontRegistry>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Registry for the assets in `dir`, loaded on the first request for that
/// directory. The first directory loaded also becomes the process-wide
/// registry unless one was installed before.
pub fn init_global(dir: impl AsRef<Path>) -> Arc<FontRegistry> {
    let dir = dir.as_ref().to_path_buf();
    let mut loaded = LOADED_DIRS.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(registry) = loaded.get(&dir) {
        return registry.clone();
    }

    let registry = Arc::new(FontRegistry::load_from_dir(&dir));
    tracing::info!("Loaded {} font faces from {}", registry.len(), dir.display());
    if GLOBAL_REGISTRY.set(registry.clone()).is_err() {
        tracing::debug!(
            "{} kept beside the process-wide font registry",
            dir.display()
        );
    }
    loaded.insert(dir, registry.clone());
    registry
}

/// Install a prepared registry. Returns `false` if one is already set.
pub fn install_global(registry: FontRegistry) -> bool {
    GLOBAL_REGISTRY.set(Arc::new(registry)).is_ok()
}

/// The process-wide registry. Until one is installed this is a fresh empty
/// registry that is not remembered.
pub fn global() -> Arc<FontRegistry> {
    GLOBAL_REGISTRY
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::new(FontRegistry::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::system_font_bytes;

    fn registry_with_regular() -> Option<FontRegistry> {
        let bytes = system_font_bytes()?;
        let program = FontProgram::parse(FontFace::NotoSansRegular.name(), bytes).ok()?;
        Some(FontRegistry::empty().with_program(FontFace::NotoSansRegular, program))
    }

    #[test]
    fn test_logical_names() {
        assert_eq!(
            FontFace::from_logical_name("NotoSansRegularFont"),
            Some(FontFace::NotoSansRegular)
        );
        assert_eq!(
            FontFace::from_logical_name("notosansbold"),
            Some(FontFace::NotoSansBold)
        );
        assert_eq!(FontFace::from_logical_name("Comic Sans"), None);
    }

    #[test]
    fn test_family_weights() {
        assert_eq!(
            FontFace::for_family("Noto Sans", true),
            Some(FontFace::NotoSansBold)
        );
        assert_eq!(
            FontFace::for_family("NotoSansRegularFont", true),
            Some(FontFace::NotoSansBold)
        );
        assert_eq!(
            FontFace::for_family("NotoSansSemiBold", false),
            Some(FontFace::NotoSansSemiBold)
        );
    }

    #[test]
    fn test_unmapped_family_falls_back() {
        let registry = FontRegistry::empty();
        let font = registry.resolve("Wingdings Deluxe", false);
        assert_eq!(font, ResolvedFont::Standard(StandardFont::Helvetica));
        let bold = registry.resolve("Wingdings Deluxe", true);
        assert_eq!(bold.key(), "Helvetica-Bold");
    }

    #[test]
    fn test_missing_asset_falls_back() {
        let registry = FontRegistry::empty();
        assert!(matches!(
            registry.try_resolve("NotoSans", false),
            Err(ResourceError::NotFound(_))
        ));
        assert!(!registry.resolve("NotoSans", false).is_embedded());
    }

    #[test]
    fn test_resolve_font_not_found() {
        let registry = FontRegistry::empty();
        assert!(matches!(
            registry.resolve_font("NotoSansRegularFont"),
            Err(ResourceError::NotFound(_))
        ));
        assert!(registry.resolve_font("Nonexistent").is_err());
    }

    #[test]
    fn test_load_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FontRegistry::load_from_dir(dir.path());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_from_dir_with_asset() {
        let Some(bytes) = system_font_bytes() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NotoSans-Regular.ttf"), bytes).unwrap();
        std::fs::write(dir.path().join("NotoSans-Bold.ttf"), b"not a font").unwrap();

        let registry = FontRegistry::load_from_dir(dir.path());
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("NotoSans", false).is_embedded());
        // The bold asset is corrupt, so bold requests fall back.
        assert_eq!(
            registry.resolve("NotoSans", true),
            ResolvedFont::Standard(StandardFont::HelveticaBold)
        );
    }

    #[test]
    fn test_standard_family_resolves_directly() {
        let registry = FontRegistry::empty();
        assert_eq!(
            registry.try_resolve("Courier", true).unwrap(),
            ResolvedFont::Standard(StandardFont::CourierBold)
        );
    }

    #[test]
    fn test_embedded_resolution() {
        let Some(registry) = registry_with_regular() else {
            return;
        };
        let font = registry.resolve("NotoSansRegularFont", false);
        assert!(font.is_embedded());
        assert_eq!(font.key(), "NotoSansRegular");
        assert!(registry.resolve_font("NotoSansRegular").is_ok());
    }

    #[test]
    fn test_global_before_init_does_not_pin_empty_registry() {
        let Some(bytes) = system_font_bytes() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NotoSans-Regular.ttf"), bytes).unwrap();

        let _ = global();
        let registry = init_global(dir.path());
        assert!(registry.resolve("NotoSans", false).is_embedded());
        assert!(Arc::ptr_eq(&registry, &init_global(dir.path())));
    }

    #[test]
    fn test_each_directory_gets_its_own_registry() {
        let Some(bytes) = system_font_bytes() else {
            return;
        };
        let empty_dir = tempfile::tempdir().unwrap();
        let font_dir = tempfile::tempdir().unwrap();
        std::fs::write(font_dir.path().join("NotoSans-Bold.ttf"), bytes).unwrap();

        let first = init_global(empty_dir.path());
        let second = init_global(font_dir.path());
        assert!(first.is_empty());
        assert!(second.resolve("NotoSans", true).is_embedded());
    }
}
