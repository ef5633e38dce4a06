//! Fonts for text output.
//!
//! Two kinds of font share one interface: the fourteen standard fonts,
//! described by bundled AFM metrics and referenced by name, and embedded
//! TrueType/OpenType programs that are shaped, subset and written into the
//! file. Every font owns a lazily allocated dictionary object; the object
//! is only written if some page actually used the font.

pub mod afm;
pub mod embedded;
pub mod font_subsetter;
pub mod standard;
pub mod truetype_parser;

pub use embedded::EmbeddedFont;
pub use standard::{is_standard_font, StandardFont};

use crate::error::{Error, Result};
use crate::object::{Dictionary, ObjectRef};
use crate::writer::PdfWriter;
use std::io::Write;
use std::path::PathBuf;

/// Position of one glyph in glyph space (1000 units per em).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphPosition {
    /// Horizontal advance after kerning/shaping
    pub x_advance: f64,
    /// Vertical advance
    pub y_advance: f64,
    /// Horizontal placement offset
    pub x_offset: f64,
    /// Vertical placement offset
    pub y_offset: f64,
    /// Nominal advance width of the glyph
    pub advance_width: f64,
}

/// Glyph codes (hex) and positions for a piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEncoding {
    /// Hex-encoded glyph codes, two digits for standard fonts, four for embedded
    pub glyphs: Vec<String>,
    /// One position per glyph
    pub positions: Vec<GlyphPosition>,
}

/// Where a font comes from.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// Standard font name, or a path to a font file
    Name(String),
    /// Path to a font file
    Path(PathBuf),
    /// Raw font program bytes
    Data(Vec<u8>),
}

impl From<&str> for FontSource {
    fn from(s: &str) -> Self {
        FontSource::Name(s.to_string())
    }
}

impl From<String> for FontSource {
    fn from(s: String) -> Self {
        FontSource::Name(s)
    }
}

impl From<PathBuf> for FontSource {
    fn from(p: PathBuf) -> Self {
        FontSource::Path(p)
    }
}

impl From<Vec<u8>> for FontSource {
    fn from(d: Vec<u8>) -> Self {
        FontSource::Data(d)
    }
}

impl FontSource {
    /// String form used as a font cache key, if any.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            FontSource::Name(n) => Some(n.clone()),
            FontSource::Path(p) => Some(p.to_string_lossy().to_string()),
            FontSource::Data(_) => None,
        }
    }
}

/// Font implementation.
#[derive(Debug)]
pub enum FontKind {
    /// One of the fourteen standard fonts
    Standard(StandardFont),
    /// Embedded font program
    Embedded(Box<EmbeddedFont>),
}

/// A font registered with a document under a resource id such as `F1`.
#[derive(Debug)]
pub struct PdfFont {
    id: String,
    kind: FontKind,
    dictionary: Option<ObjectRef>,
    embedded: bool,
}

impl PdfFont {
    /// Open a font from its source.
    ///
    /// Names of standard fonts load bundled metrics; any other name is read
    /// as a font file. `family` selects a face inside a font collection.
    pub fn open(source: &FontSource, family: Option<&str>, id: &str) -> Result<Self> {
        let kind = match source {
            FontSource::Name(name) if is_standard_font(name) => {
                FontKind::Standard(StandardFont::new(name)?)
            },
            FontSource::Name(name) => {
                let data = std::fs::read(name)
                    .map_err(|_| Error::UnsupportedFontSource(name.clone()))?;
                FontKind::Embedded(Box::new(EmbeddedFont::from_data(data, family)?))
            },
            FontSource::Path(path) => {
                let data = std::fs::read(path)?;
                FontKind::Embedded(Box::new(EmbeddedFont::from_data(data, family)?))
            },
            FontSource::Data(data) => {
                FontKind::Embedded(Box::new(EmbeddedFont::from_data(data.clone(), family)?))
            },
        };
        Ok(Self {
            id: id.to_string(),
            kind,
            dictionary: None,
            embedded: false,
        })
    }

    /// Resource id, e.g. `F1`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// PostScript name.
    pub fn name(&self) -> &str {
        match &self.kind {
            FontKind::Standard(f) => f.name(),
            FontKind::Embedded(f) => f.name(),
        }
    }

    /// Implementation details.
    pub fn kind(&self) -> &FontKind {
        &self.kind
    }

    /// Ascender in glyph space.
    pub fn ascender(&self) -> f64 {
        match &self.kind {
            FontKind::Standard(f) => f.metrics().ascender,
            FontKind::Embedded(f) => f.metrics().ascender,
        }
    }

    /// Descender in glyph space (negative).
    pub fn descender(&self) -> f64 {
        match &self.kind {
            FontKind::Standard(f) => f.metrics().descender,
            FontKind::Embedded(f) => f.metrics().descender,
        }
    }

    /// Line gap in glyph space.
    pub fn line_gap(&self) -> f64 {
        match &self.kind {
            FontKind::Standard(f) => f.metrics().line_gap,
            FontKind::Embedded(f) => f.metrics().line_gap,
        }
    }

    /// x-height in glyph space.
    pub fn x_height(&self) -> f64 {
        match &self.kind {
            FontKind::Standard(f) => f.metrics().x_height,
            FontKind::Embedded(f) => f.metrics().x_height,
        }
    }

    /// Cap height in glyph space.
    pub fn cap_height(&self) -> f64 {
        match &self.kind {
            FontKind::Standard(f) => f.metrics().cap_height,
            FontKind::Embedded(f) => f.metrics().cap_height,
        }
    }

    /// Line height at `size`: ascender minus descender, plus the gap if asked.
    pub fn line_height(&self, size: f64, include_gap: bool) -> f64 {
        let gap = if include_gap { self.line_gap() } else { 0.0 };
        (self.ascender() + gap - self.descender()) / 1000.0 * size
    }

    /// Encode text for a `TJ` operator.
    pub fn encode(&mut self, text: &str) -> Result<TextEncoding> {
        match &mut self.kind {
            FontKind::Standard(f) => Ok(f.encode(text)),
            FontKind::Embedded(f) => f.encode(text),
        }
    }

    /// Width of `text` at `size`.
    pub fn width_of_string(&mut self, text: &str, size: f64) -> Result<f64> {
        match &mut self.kind {
            FontKind::Standard(f) => Ok(f.width_of_string(text, size)),
            FontKind::Embedded(f) => f.width_of_string(text, size),
        }
    }

    /// The font dictionary reference, allocated on first use.
    pub fn object_ref<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> ObjectRef {
        *self
            .dictionary
            .get_or_insert_with(|| writer.alloc(Dictionary::new()))
    }

    /// Write the font if it was used and not yet written.
    pub fn finalize<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> Result<()> {
        let dictionary = match self.dictionary {
            Some(d) if !self.embedded => d,
            _ => return Ok(()),
        };
        match &self.kind {
            FontKind::Standard(f) => {
                let data = writer.data_mut(dictionary)?;
                for (key, value) in f.dictionary() {
                    data.insert(key.to_string(), value);
                }
                writer.end(dictionary)?;
            },
            FontKind::Embedded(f) => f.embed(&self.id, dictionary, writer)?,
        }
        self.embedded = true;
        log::debug!("finalized font {} ({})", self.id, self.name());
        Ok(())
    }
}
