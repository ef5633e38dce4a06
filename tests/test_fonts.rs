//! Integration tests for standard and embedded fonts.
//!
//! Embedded font tests use the DejaVu Sans copy under `tests/fixtures`.

use pdf_forge::fonts::{EmbeddedFont, PdfFont, StandardFont};
use pdf_forge::{DocumentOptions, FontSource, PdfDocument, TextOptions};
use std::path::PathBuf;

fn dejavu() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf")
}

#[test]
fn test_standard_font_metrics() {
    let mut font = PdfFont::open(&FontSource::from("Helvetica"), None, "F1").unwrap();
    assert_eq!(font.name(), "Helvetica");
    assert_eq!(font.ascender(), 718.0);
    assert_eq!(font.descender(), -207.0);
    assert!((font.line_height(12.0, true) - 13.872).abs() < 1e-9);
    // H e l l o = 722 + 556 + 222 + 222 + 556
    assert!((font.width_of_string("Hello", 12.0).unwrap() - 27.336).abs() < 1e-9);
}

#[test]
fn test_standard_font_kerning() {
    let font = StandardFont::new("Helvetica").unwrap();
    let encoded = font.encode("AV");
    assert_eq!(encoded.glyphs, vec!["41", "56"]);
    assert!(encoded.positions[0].x_advance < encoded.positions[0].advance_width);
}

#[test]
fn test_unmapped_character_falls_back() {
    let font = StandardFont::new("Times-Roman").unwrap();
    let encoded = font.encode("a\u{4E2D}");
    assert_eq!(encoded.glyphs.len(), 2);
}

#[test]
fn test_unknown_font_name() {
    let mut doc = PdfDocument::new(DocumentOptions::default()).unwrap();
    assert!(doc.font("Not-A-Real-Font").is_err());
    assert!(PdfFont::open(&FontSource::Data(b"junk".to_vec()), None, "F9").is_err());
}

#[test]
fn test_embedded_glyph_ids_are_stable() {
    let path = dejavu();
    let data = std::fs::read(path).unwrap();
    let mut font = EmbeddedFont::from_data(data, None).unwrap();
    let first = font.encode("abracadabra").unwrap();
    let count = font.subset_glyph_count();
    let second = font.encode("abracadabra").unwrap();
    assert_eq!(first.glyphs, second.glyphs);
    assert_eq!(font.subset_glyph_count(), count);
    // a, b, r, c, d plus .notdef
    assert_eq!(count, 6);
    assert!(first.glyphs.iter().all(|g| g.len() == 4));
}

#[test]
fn test_embedded_font_in_document() {
    let path = dejavu();
    let mut doc = PdfDocument::new(DocumentOptions::default().with_compress(false)).unwrap();
    doc.font(path)
        .unwrap()
        .text("Grüße ½ ∞", None, TextOptions::new())
        .unwrap();
    let bytes = doc.finish().unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("/Subtype /Type0"));
    assert!(text.contains("/Encoding /Identity-H"));
    assert!(text.contains("/Subtype /CIDFontType2"));
    assert!(text.contains("/CIDToGIDMap /Identity"));
    assert!(text.contains("/FontFile2 "));
    assert!(text.contains("/ItalicAngle 0\n"));
    assert!(text.contains("/ToUnicode "));
    // Helvetica, opened as the default font, holds F1
    assert!(text.contains("/BaseFont /CZZZZZ+DejaVuSans"));
    assert!(text.contains("beginbfchar") || text.contains("beginbfrange"));
}

#[test]
fn test_same_font_from_path_and_bytes_is_shared() {
    let path = dejavu();
    let data = std::fs::read(&path).unwrap();
    let mut doc = PdfDocument::new(DocumentOptions::default()).unwrap();
    doc.font(path).unwrap();
    let id = doc.current_font().unwrap().id().to_string();
    doc.font(data).unwrap();
    assert_eq!(doc.current_font().unwrap().id(), id);
}
