//! Content-stream operators for one line of text.
//!
//! The document decides where a line goes; this module turns that into
//! numbers and operators: the alignment shift, the baseline offset, the
//! decoration line width and the `TJ` arrays that carry kerning and
//! per-glyph placement.

use super::options::{Align, Baseline};
use crate::error::Result;
use crate::fonts::{GlyphPosition, TextEncoding};
use crate::writer::object_serializer::number;

/// Font metrics the emitter needs, in glyph space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontGeometry {
    /// Ascender
    pub ascender: f64,
    /// Descender (negative)
    pub descender: f64,
    /// x-height
    pub x_height: f64,
}

/// Vertical shift from the line top to the baseline, in points.
pub fn baseline_offset(baseline: Baseline, font: &FontGeometry, size: f64) -> f64 {
    let units = match baseline {
        Baseline::SvgMiddle => 0.5 * font.x_height,
        Baseline::Middle | Baseline::SvgCentral => 0.5 * (font.descender + font.ascender),
        Baseline::Bottom | Baseline::Ideographic => font.descender,
        Baseline::Alphabetic => 0.0,
        Baseline::Mathematical => 0.5 * font.ascender,
        Baseline::Hanging => 0.8 * font.ascender,
        Baseline::Top => font.ascender,
        Baseline::Offset(points) => return -points,
    };
    units / 1000.0 * size
}

/// Shift `x` so a line of `text_width` sits as `align` asks within `line_width`.
///
/// Justified lines keep their x; the gap goes into word spacing instead.
pub fn aligned_x(align: Align, x: f64, line_width: f64, text_width: f64) -> f64 {
    match align {
        Align::Right => x + line_width - text_width,
        Align::Center => x + line_width / 2.0 - text_width / 2.0,
        Align::Left | Align::Justify => x,
    }
}

/// Extra word spacing that stretches a justified line to `line_width`.
///
/// `bare_width` is the line's width with all whitespace removed.
pub fn justify_word_spacing(
    line_width: f64,
    bare_width: f64,
    word_count: usize,
    space_width: f64,
) -> f64 {
    let gaps = word_count.saturating_sub(1).max(1) as f64;
    ((line_width - bare_width) / gaps - space_width).max(0.0)
}

/// Stroke width for underline and strike-through at `size`.
pub fn decoration_line_width(size: f64) -> f64 {
    if size < 10.0 {
        0.5
    } else {
        (size / 10.0).floor()
    }
}

/// Add `extra` glyph-space units after the last glyph of `word`.
pub fn append_word_spacing(word: &mut TextEncoding, extra: f64) {
    if let Some(last) = word.positions.last_mut() {
        last.x_advance += extra;
    }
}

/// Build `TJ` and `Tm` operators that place `glyphs` starting at (`x`, `y`).
///
/// Consecutive glyphs share one array. A glyph whose advance differs from
/// its nominal width closes a segment with the difference as the kerning
/// number. A glyph with a placement offset gets its own text matrix and
/// array, and the matrix is reset for the glyph after it.
pub fn show_text_operators(
    encoding: &TextEncoding,
    x: f64,
    y: f64,
    size: f64,
) -> Result<Vec<String>> {
    let scale = size / 1000.0;
    let glyphs = &encoding.glyphs;
    let positions = &encoding.positions;
    let mut ops = Vec::new();
    let mut segments: Vec<String> = Vec::new();
    let mut last = 0;
    let mut had_offset = false;
    let mut x = x;

    fn add_segment(
        glyphs: &[String],
        positions: &[GlyphPosition],
        segments: &mut Vec<String>,
        last: &mut usize,
        cur: usize,
    ) -> Result<()> {
        if *last < cur {
            let hex = glyphs[*last..cur].concat();
            let pos = &positions[cur - 1];
            let advance = pos.x_advance - pos.advance_width;
            segments.push(format!("<{}> {}", hex, number(-advance)?));
        }
        *last = cur;
        Ok(())
    }

    fn flush(
        glyphs: &[String],
        positions: &[GlyphPosition],
        segments: &mut Vec<String>,
        ops: &mut Vec<String>,
        last: &mut usize,
        cur: usize,
    ) -> Result<()> {
        add_segment(glyphs, positions, segments, last, cur)?;
        if !segments.is_empty() {
            ops.push(format!("[{}] TJ", segments.join(" ")));
            segments.clear();
        }
        Ok(())
    }

    for (i, pos) in positions.iter().enumerate() {
        if pos.x_offset != 0.0 || pos.y_offset != 0.0 {
            flush(glyphs, positions, &mut segments, &mut ops, &mut last, i)?;
            ops.push(format!(
                "1 0 0 1 {} {} Tm",
                number(x + pos.x_offset * scale)?,
                number(y + pos.y_offset * scale)?
            ));
            flush(glyphs, positions, &mut segments, &mut ops, &mut last, i + 1)?;
            had_offset = true;
        } else {
            if had_offset {
                ops.push(format!("1 0 0 1 {} {} Tm", number(x)?, number(y)?));
                had_offset = false;
            }
            if pos.x_advance - pos.advance_width != 0.0 {
                add_segment(glyphs, positions, &mut segments, &mut last, i + 1)?;
            }
        }
        x += pos.x_advance * scale;
    }
    flush(
        glyphs,
        positions,
        &mut segments,
        &mut ops,
        &mut last,
        positions.len(),
    )?;
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(width: f64) -> GlyphPosition {
        GlyphPosition {
            x_advance: width,
            advance_width: width,
            ..Default::default()
        }
    }

    fn encoding(glyphs: &[&str], positions: Vec<GlyphPosition>) -> TextEncoding {
        TextEncoding {
            glyphs: glyphs.iter().map(|g| g.to_string()).collect(),
            positions,
        }
    }

    const HELVETICA: FontGeometry = FontGeometry {
        ascender: 718.0,
        descender: -207.0,
        x_height: 523.0,
    };

    #[test]
    fn test_single_segment() {
        let enc = encoding(&["48", "65", "6C"], vec![plain(722.0), plain(556.0), plain(222.0)]);
        let ops = show_text_operators(&enc, 72.0, 700.0, 12.0).unwrap();
        assert_eq!(ops, vec!["[<48656C> 0] TJ"]);
    }

    #[test]
    fn test_kerning_splits_segment() {
        let mut a = plain(667.0);
        a.x_advance = 597.0;
        let enc = encoding(&["41", "56"], vec![a, plain(667.0)]);
        let ops = show_text_operators(&enc, 0.0, 0.0, 12.0).unwrap();
        assert_eq!(ops, vec!["[<41> 70 <56> 0] TJ"]);
    }

    #[test]
    fn test_offset_glyph_gets_own_matrix() {
        let mut mark = plain(0.0);
        mark.x_offset = -250.0;
        mark.y_offset = 100.0;
        let enc = encoding(&["0001", "0002", "0003"], vec![plain(500.0), mark, plain(500.0)]);
        let ops = show_text_operators(&enc, 10.0, 20.0, 10.0).unwrap();
        assert_eq!(
            ops,
            vec![
                "[<0001> 0] TJ",
                "1 0 0 1 12.5 21 Tm",
                "[<0002> 0] TJ",
                "1 0 0 1 15 20 Tm",
                "[<0003> 0] TJ",
            ]
        );
    }

    #[test]
    fn test_empty_encoding() {
        let ops = show_text_operators(&TextEncoding::default(), 0.0, 0.0, 12.0).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_baseline_offsets() {
        assert!((baseline_offset(Baseline::Top, &HELVETICA, 12.0) - 8.616).abs() < 1e-9);
        assert_eq!(baseline_offset(Baseline::Alphabetic, &HELVETICA, 12.0), 0.0);
        assert!((baseline_offset(Baseline::Bottom, &HELVETICA, 10.0) + 2.07).abs() < 1e-9);
        assert!((baseline_offset(Baseline::Middle, &HELVETICA, 10.0) - 2.555).abs() < 1e-9);
        assert_eq!(baseline_offset(Baseline::Offset(4.0), &HELVETICA, 12.0), -4.0);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(aligned_x(Align::Left, 10.0, 100.0, 40.0), 10.0);
        assert_eq!(aligned_x(Align::Right, 10.0, 100.0, 40.0), 70.0);
        assert_eq!(aligned_x(Align::Center, 10.0, 100.0, 40.0), 40.0);
        assert_eq!(aligned_x(Align::Justify, 10.0, 100.0, 40.0), 10.0);
    }

    #[test]
    fn test_justify_spacing() {
        // 3 words, 60 of glyphs in 100: 40 over 2 gaps, minus a 5 wide space
        assert_eq!(justify_word_spacing(100.0, 60.0, 3, 5.0), 15.0);
        assert_eq!(justify_word_spacing(50.0, 60.0, 3, 5.0), 0.0);
        assert_eq!(justify_word_spacing(100.0, 60.0, 1, 5.0), 35.0);
    }

    #[test]
    fn test_decoration_width() {
        assert_eq!(decoration_line_width(8.0), 0.5);
        assert_eq!(decoration_line_width(12.0), 1.0);
        assert_eq!(decoration_line_width(25.0), 2.0);
    }

    #[test]
    fn test_append_word_spacing() {
        let mut enc = encoding(&["61", "62"], vec![plain(500.0), plain(500.0)]);
        append_word_spacing(&mut enc, 250.0);
        assert_eq!(enc.positions[0].x_advance, 500.0);
        assert_eq!(enc.positions[1].x_advance, 750.0);
    }
}
