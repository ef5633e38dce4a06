//! TrueType/OpenType metrics for embedding.
//!
//! This module wraps the `ttf-parser` crate to pull out the values the
//! FontDescriptor and layout need, scaled to the 1000-unit glyph space.

use ttf_parser::{name_id, Face, GlyphId};

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Failed to parse font file
    #[error("Failed to parse font file: {0}")]
    ParseError(String),

    /// Font file is empty or invalid
    #[error("Font file is empty or invalid")]
    EmptyFont,

    /// No face in a collection carries the requested name
    #[error("Font collection has no face named {0}")]
    FaceNotFound(String),
}

impl From<TrueTypeError> for crate::error::Error {
    fn from(e: TrueTypeError) -> Self {
        crate::error::Error::Font(e.to_string())
    }
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Parse the face at `index`.
pub fn parse_face(data: &[u8], index: u32) -> TrueTypeResult<Face<'_>> {
    if data.is_empty() {
        return Err(TrueTypeError::EmptyFont);
    }
    Face::parse(data, index).map_err(|e| TrueTypeError::ParseError(e.to_string()))
}

/// PostScript name of a face.
pub fn postscript_name(face: &Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == name_id::POST_SCRIPT_NAME)
        .and_then(|name| name.to_string())
}

/// Find the face index to use.
///
/// Plain font files have a single face. For collections, `family` selects the
/// face by PostScript name; without one the first face is used.
pub fn face_index(data: &[u8], family: Option<&str>) -> TrueTypeResult<u32> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    let family = match family {
        Some(f) if count > 1 => f,
        _ => return Ok(0),
    };
    for index in 0..count {
        if let Ok(face) = parse_face(data, index) {
            if postscript_name(&face).as_deref() == Some(family) {
                return Ok(index);
            }
        }
    }
    Err(TrueTypeError::FaceNotFound(family.to_string()))
}

/// Font-wide metrics in 1000-unit glyph space.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Font units per em
    pub units_per_em: u16,
    /// Factor from font units to glyph space
    pub scale: f64,
    /// Ascender
    pub ascender: f64,
    /// Descender (negative)
    pub descender: f64,
    /// Line gap
    pub line_gap: f64,
    /// Cap height, falling back to the ascender
    pub cap_height: f64,
    /// x-height, 0 when absent
    pub x_height: f64,
    /// Italic angle in degrees
    pub italic_angle: f64,
    /// Bounding box `[x_min y_min x_max y_max]`
    pub bbox: [f64; 4],
    /// Monospaced flag from the `post` table
    pub is_fixed_pitch: bool,
    /// Italic flag from the `head`/`OS/2` tables
    pub is_italic: bool,
    /// PostScript name
    pub postscript_name: String,
}

impl FontMetrics {
    /// Extract metrics from a parsed face.
    pub fn from_face(face: &Face<'_>) -> Self {
        let units_per_em = face.units_per_em();
        let scale = 1000.0 / units_per_em as f64;
        let bbox = face.global_bounding_box();
        let ascender = face.ascender() as f64;
        Self {
            units_per_em,
            scale,
            ascender: ascender * scale,
            descender: face.descender() as f64 * scale,
            line_gap: face.line_gap() as f64 * scale,
            cap_height: face
                .capital_height()
                .map(|h| h as f64)
                .unwrap_or(ascender)
                * scale,
            x_height: face.x_height().map(|h| h as f64).unwrap_or(0.0) * scale,
            italic_angle: face.italic_angle().unwrap_or(0.0) as f64,
            bbox: [
                bbox.x_min as f64 * scale,
                bbox.y_min as f64 * scale,
                bbox.x_max as f64 * scale,
                bbox.y_max as f64 * scale,
            ],
            is_fixed_pitch: face.is_monospaced(),
            is_italic: face.is_italic(),
            postscript_name: postscript_name(face).unwrap_or_else(|| "Embedded".to_string()),
        }
    }

    /// Font flags for the FontDescriptor.
    ///
    /// - Bit 1: FixedPitch
    /// - Bit 3: Symbolic (set for every embedded font; glyphs may fall outside Latin)
    /// - Bit 7: Italic
    pub fn font_flags(&self) -> u32 {
        let mut flags = 0u32;
        if self.is_fixed_pitch {
            flags |= 1 << 0;
        }
        flags |= 1 << 2;
        if self.is_italic {
            flags |= 1 << 6;
        }
        flags
    }
}

/// Horizontal advance of a glyph in glyph space.
pub fn glyph_advance(face: &Face<'_>, glyph_id: u16, scale: f64) -> f64 {
    face.glyph_hor_advance(GlyphId(glyph_id)).unwrap_or(0) as f64 * scale
}
