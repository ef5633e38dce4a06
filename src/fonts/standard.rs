//! The fourteen standard PDF fonts.
//!
//! These are never embedded: the font dictionary only names the font and
//! declares WinAnsiEncoding, and layout uses the bundled AFM metrics.

use super::afm::AfmFont;
use super::{GlyphPosition, TextEncoding};
use crate::error::{Error, Result};
use crate::object::Object;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref STANDARD_FONTS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Courier", include_str!("data/Courier.afm"));
        m.insert("Courier-Bold", include_str!("data/Courier-Bold.afm"));
        m.insert("Courier-Oblique", include_str!("data/Courier-Oblique.afm"));
        m.insert("Courier-BoldOblique", include_str!("data/Courier-BoldOblique.afm"));
        m.insert("Helvetica", include_str!("data/Helvetica.afm"));
        m.insert("Helvetica-Bold", include_str!("data/Helvetica-Bold.afm"));
        m.insert("Helvetica-Oblique", include_str!("data/Helvetica-Oblique.afm"));
        m.insert("Helvetica-BoldOblique", include_str!("data/Helvetica-BoldOblique.afm"));
        m.insert("Times-Roman", include_str!("data/Times-Roman.afm"));
        m.insert("Times-Bold", include_str!("data/Times-Bold.afm"));
        m.insert("Times-Italic", include_str!("data/Times-Italic.afm"));
        m.insert("Times-BoldItalic", include_str!("data/Times-BoldItalic.afm"));
        m.insert("Symbol", include_str!("data/Symbol.afm"));
        m.insert("ZapfDingbats", include_str!("data/ZapfDingbats.afm"));
        m
    };
}

/// Whether `name` is one of the fourteen standard fonts.
pub fn is_standard_font(name: &str) -> bool {
    STANDARD_FONTS.contains_key(name)
}

/// A standard font backed by AFM metrics.
#[derive(Debug, Clone)]
pub struct StandardFont {
    name: String,
    afm: AfmFont,
}

impl StandardFont {
    /// Load metrics for a standard font name.
    pub fn new(name: &str) -> Result<Self> {
        let data = STANDARD_FONTS
            .get(name)
            .ok_or_else(|| Error::UnsupportedFontSource(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            afm: AfmFont::parse(data)?,
        })
    }

    /// PostScript name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying metrics.
    pub fn metrics(&self) -> &AfmFont {
        &self.afm
    }

    /// Encode text into hex glyph codes with per-glyph positions.
    pub fn encode(&self, text: &str) -> TextEncoding {
        let glyphs = self.afm.glyphs_for_string(text);
        let advances = self.afm.advances_for_glyphs(&glyphs);
        let positions = glyphs
            .iter()
            .zip(advances)
            .map(|(glyph, advance)| GlyphPosition {
                x_advance: advance,
                y_advance: 0.0,
                x_offset: 0.0,
                y_offset: 0.0,
                advance_width: self.afm.width_of_glyph(glyph),
            })
            .collect();
        TextEncoding {
            glyphs: self.afm.encode_text(text),
            positions,
        }
    }

    /// Width of `text` at `size`, including kerning.
    pub fn width_of_string(&self, text: &str, size: f64) -> f64 {
        let glyphs = self.afm.glyphs_for_string(text);
        let width: f64 = self.afm.advances_for_glyphs(&glyphs).iter().sum();
        width * size / 1000.0
    }

    /// Font dictionary for the output file.
    ///
    /// Symbol and ZapfDingbats keep their built-in encoding.
    pub fn dictionary(&self) -> Vec<(&'static str, Object)> {
        let mut entries = vec![
            ("Type", Object::name("Font")),
            ("BaseFont", Object::name(self.name.clone())),
            ("Subtype", Object::name("Type1")),
        ];
        if self.name != "Symbol" && self.name != "ZapfDingbats" {
            entries.push(("Encoding", Object::name("WinAnsiEncoding")));
        }
        entries
    }
}
