use crate::error::{TextError, TextResult};
use crate::rich_text::RunStyle;
use cosmic_text::fontdb;
use std::path::Path;
use std::sync::Arc;

/// A font database that manages available typefaces.
pub struct FontDatabase {
    pub(crate) inner: fontdb::Database,
}

impl FontDatabase {
    /// Create a new font database with system fonts loaded.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self { inner: db }
    }

    /// Create an empty font database.
    pub fn empty() -> Self {
        Self {
            inner: fontdb::Database::new(),
        }
    }

    /// Load a font from bytes.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.inner
            .load_font_source(fontdb::Source::Binary(Arc::new(data)));
    }

    /// Load a font from a .ttf or .otf file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> TextResult<()> {
        let path = path.as_ref();
        self.inner.load_font_file(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                TextError::FontFileNotFound(path.to_path_buf())
            } else {
                TextError::FontLoadError(format!("{}: {}", path.display(), err))
            }
        })
    }

    /// Returns true if the font family is available.
    pub fn has_family(&self, family: &str) -> bool {
        self.inner
            .faces()
            .any(|face| face.families.iter().any(|(f, _)| f == family))
    }

    /// List all available font families, sorted and deduplicated.
    pub fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .inner
            .faces()
            .flat_map(|face| face.families.iter().map(|(f, _)| f.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Get the number of faces loaded.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
}

impl FontWeight {
    pub(crate) fn to_cosmic(self) -> cosmic_text::Weight {
        match self {
            FontWeight::Light => cosmic_text::Weight::LIGHT,
            FontWeight::Normal => cosmic_text::Weight::NORMAL,
            FontWeight::Medium => cosmic_text::Weight::MEDIUM,
            FontWeight::SemiBold => cosmic_text::Weight::SEMIBOLD,
            FontWeight::Bold => cosmic_text::Weight::BOLD,
        }
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub(crate) fn to_cosmic(self) -> cosmic_text::Style {
        match self {
            FontStyle::Normal => cosmic_text::Style::Normal,
            FontStyle::Italic => cosmic_text::Style::Italic,
        }
    }
}

/// Identifies one concrete face: typeface, pixel size, weight and style.
///
/// `family: None` selects the backend's default sans-serif face.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub family: Option<String>,
    pub size: u32,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontKey {
    pub fn new(family: Option<&str>, size: u32) -> Self {
        Self {
            family: family.map(str::to_owned),
            size: size.max(1),
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        }
    }

    /// Default sans-serif at `size` pixels.
    pub fn sans(size: u32) -> Self {
        Self::new(None, size)
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Key for a marked-up run drawn on top of this base key.
    pub fn for_run(&self, run: RunStyle) -> Self {
        let mut key = self.clone();
        if run.bold {
            key.weight = FontWeight::Bold;
        }
        if run.italic {
            key.style = FontStyle::Italic;
        }
        key
    }
}

/// Vertical metrics of a resolved face, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceMetrics {
    /// Distance from the top of the line box to the baseline.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: i32,
    /// Height of one rendered line.
    pub line_height: i32,
}

/// Stable handle for a face inside one [`FontCache`](crate::FontCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub(crate) u32);

/// A resolved, cached face. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub(crate) id: FaceId,
    pub(crate) key: Arc<FontKey>,
    pub(crate) metrics: FaceMetrics,
}

impl FontFace {
    pub fn id(&self) -> FaceId {
        self.id
    }

    pub fn key(&self) -> &FontKey {
        &self.key
    }

    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    pub fn ascent(&self) -> i32 {
        self.metrics.ascent
    }

    pub fn line_height(&self) -> i32 {
        self.metrics.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_run_applies_bold_and_italic() {
        let base = FontKey::new(Some("Inter"), 22);
        let key = base.for_run(RunStyle {
            bold: true,
            italic: true,
        });
        assert_eq!(key.weight, FontWeight::Bold);
        assert_eq!(key.style, FontStyle::Italic);
        assert_eq!(key.family.as_deref(), Some("Inter"));
        assert_eq!(base.for_run(RunStyle::default()), base);
    }

    #[test]
    fn test_size_is_never_zero() {
        assert_eq!(FontKey::sans(0).size, 1);
    }

    #[test]
    fn test_empty_database() {
        let db = FontDatabase::empty();
        assert!(db.is_empty());
        assert!(!db.has_family("Definitely Not A Font"));
        assert!(db.list_families().is_empty());
    }
}
