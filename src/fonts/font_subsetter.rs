//! Glyph subsetting for embedded fonts.
//!
//! Every glyph that appears in the output is assigned a compact subset id,
//! starting at 1 (0 is `.notdef`). The same original glyph always gets the
//! same subset id, so text encoded early in the document stays valid when
//! the font program is finally cut down at embed time. Subset ids double
//! as CIDs under Identity-H encoding.

use crate::error::{Error, Result};
use subsetter::GlyphRemapper;

/// Tracks used glyphs and the data needed to describe them in the PDF.
pub struct FontSubsetter {
    remapper: GlyphRemapper,
    /// Advance width (glyph space) per subset id
    widths: Vec<Option<f64>>,
    /// Code points per subset id, first encounter wins
    code_points: Vec<Option<Vec<u32>>>,
}

impl std::fmt::Debug for FontSubsetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSubsetter")
            .field("glyph_count", &self.glyph_count())
            .finish()
    }
}

impl FontSubsetter {
    /// Create a subsetter with `.notdef` already included.
    pub fn new(notdef_width: f64) -> Self {
        let mut remapper = GlyphRemapper::new();
        remapper.remap(0);
        Self {
            remapper,
            widths: vec![Some(notdef_width)],
            code_points: vec![Some(vec![0])],
        }
    }

    /// Include a glyph and return its subset id.
    ///
    /// Width and code points are recorded only the first time a glyph is seen.
    pub fn include_glyph(&mut self, glyph_id: u16, width: f64, code_points: &[u32]) -> u16 {
        let sid = self.remapper.remap(glyph_id);
        let index = sid as usize;
        if self.widths.len() <= index {
            self.widths.resize(index + 1, None);
            self.code_points.resize(index + 1, None);
        }
        if self.widths[index].is_none() {
            self.widths[index] = Some(width);
        }
        if self.code_points[index].is_none() {
            self.code_points[index] = Some(code_points.to_vec());
        }
        sid
    }

    /// Number of glyphs in the subset, `.notdef` included.
    pub fn glyph_count(&self) -> usize {
        self.widths.len()
    }

    /// Widths for the CIDFont `W` array, indexed by subset id.
    pub fn widths(&self) -> Vec<f64> {
        self.widths.iter().map(|w| w.unwrap_or(0.0)).collect()
    }

    /// Cut the font program down to the used glyphs.
    pub fn subset(&self, data: &[u8], index: u32) -> Result<Vec<u8>> {
        subsetter::subset(data, index, &self.remapper)
            .map_err(|e| Error::Font(format!("subsetting failed: {:?}", e)))
    }

    /// Generate the ToUnicode CMap mapping subset ids back to text.
    ///
    /// Code points above U+FFFF are written as UTF-16 surrogate pairs.
    pub fn tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo <<\n");
        cmap.push_str("  /Registry (Adobe)\n");
        cmap.push_str("  /Ordering (UCS)\n");
        cmap.push_str("  /Supplement 0\n");
        cmap.push_str(">> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mappings: Vec<(usize, &Vec<u32>)> = self
            .code_points
            .iter()
            .enumerate()
            .filter_map(|(sid, cps)| cps.as_ref().map(|c| (sid, c)))
            .filter(|(_, cps)| !cps.is_empty())
            .collect();

        // At most 100 entries per bfchar section
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (sid, cps) in chunk {
                cmap.push_str(&format!("<{:04X}> <{}>\n", sid, utf16_hex(cps)));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end");
        cmap
    }
}

/// Hex UTF-16BE for a code point sequence, surrogate pairs above U+FFFF.
fn utf16_hex(code_points: &[u32]) -> String {
    code_points
        .iter()
        .map(|&cp| {
            if cp > 0xFFFF {
                let v = cp - 0x10000;
                let high = 0xD800 | ((v >> 10) & 0x3FF);
                let low = 0xDC00 | (v & 0x3FF);
                format!("{:04X}{:04X}", high, low)
            } else {
                format!("{:04X}", cp)
            }
        })
        .collect()
}

/// Six-letter subset tag derived from a font resource id.
///
/// Characters 1 through 6 of the id are shifted by 17; positions past the
/// end of the id use `I` as their base, so `F1` becomes `BZZZZZ`.
pub fn subset_tag(font_id: &str) -> String {
    let bytes = font_id.as_bytes();
    (1..=6)
        .map(|i| {
            let base = bytes.get(i).copied().unwrap_or(73);
            (base + 17) as char
        })
        .collect()
}

/// Subset font name: `TAG+PostScriptName` with spaces replaced.
pub fn subset_font_name(font_id: &str, base_name: &str) -> String {
    format!("{}+{}", subset_tag(font_id), base_name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notdef_is_zero() {
        let s = FontSubsetter::new(500.0);
        assert_eq!(s.glyph_count(), 1);
        assert_eq!(s.widths(), vec![500.0]);
    }

    #[test]
    fn test_include_is_idempotent() {
        let mut s = FontSubsetter::new(0.0);
        let a = s.include_glyph(42, 600.0, &[0x41]);
        let b = s.include_glyph(7, 300.0, &[0x20]);
        let again = s.include_glyph(42, 999.0, &[0x42]);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(again, a);
        assert_eq!(s.widths(), vec![0.0, 600.0, 300.0]);
    }

    #[test]
    fn test_tounicode_cmap() {
        let mut s = FontSubsetter::new(0.0);
        s.include_glyph(10, 500.0, &[0x48]);
        s.include_glyph(11, 500.0, &[0x1F600]);
        s.include_glyph(12, 500.0, &[0x66, 0x69]);
        let cmap = s.tounicode_cmap();
        assert!(cmap.contains("4 beginbfchar"));
        assert!(cmap.contains("<0001> <0048>"));
        assert!(cmap.contains("<0002> <D83DDE00>"));
        assert!(cmap.contains("<0003> <00660069>"));
        assert!(cmap.ends_with("end\nend"));
    }

    #[test]
    fn test_tounicode_chunks_of_100() {
        let mut s = FontSubsetter::new(0.0);
        for gid in 1..=150u16 {
            s.include_glyph(gid, 500.0, &[0x4E00 + gid as u32]);
        }
        let cmap = s.tounicode_cmap();
        assert!(cmap.contains("100 beginbfchar"));
        assert!(cmap.contains("51 beginbfchar"));
    }

    #[test]
    fn test_subset_failure_is_an_error() {
        let mut s = FontSubsetter::new(0.0);
        s.include_glyph(61, 600.0, &[0x5A]);
        assert!(matches!(
            s.subset(b"not a font program", 0),
            Err(Error::Font(_))
        ));
    }

    #[test]
    fn test_subset_tag() {
        assert_eq!(subset_tag("F1"), "BZZZZZ");
        assert_eq!(subset_tag("F12"), "BCZZZZ");
        assert_eq!(subset_font_name("F1", "My Font"), "BZZZZZ+My_Font");
    }
}
