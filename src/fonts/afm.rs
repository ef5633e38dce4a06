//! Adobe Font Metrics parsing and WinAnsi encoding.
//!
//! The standard fonts ship as AFM files. Only the parts needed for layout
//! are read: header attributes, per-glyph advance widths and kerning pairs.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Code points outside Latin-1 that WinAnsiEncoding places in 0x80..0x9F.
const WIN_ANSI_MAP: &[(u32, u8)] = &[
    (402, 131),
    (8211, 150),
    (8212, 151),
    (8216, 145),
    (8217, 146),
    (8218, 130),
    (8220, 147),
    (8221, 148),
    (8222, 132),
    (8224, 134),
    (8225, 135),
    (8226, 149),
    (8230, 133),
    (8364, 128),
    (8240, 137),
    (8249, 139),
    (8250, 155),
    (710, 136),
    (8482, 153),
    (338, 140),
    (339, 156),
    (732, 152),
    (352, 138),
    (353, 154),
    (376, 159),
    (381, 142),
    (382, 158),
];

/// Glyph names for each WinAnsiEncoding code.
#[rustfmt::skip]
const CHARACTERS: [&str; 256] = [
    ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef",
    ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef",
    ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef",
    ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef", ".notdef",
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand", "quotesingle",
    "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen", "period", "slash",
    "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question",
    "at", "A", "B", "C", "D", "E", "F", "G",
    "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W",
    "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum", "underscore",
    "grave", "a", "b", "c", "d", "e", "f", "g",
    "h", "i", "j", "k", "l", "m", "n", "o",
    "p", "q", "r", "s", "t", "u", "v", "w",
    "x", "y", "z", "braceleft", "bar", "braceright", "asciitilde", ".notdef",
    "Euro", ".notdef", "quotesinglbase", "florin", "quotedblbase", "ellipsis", "dagger", "daggerdbl",
    "circumflex", "perthousand", "Scaron", "guilsinglleft", "OE", ".notdef", "Zcaron", ".notdef",
    ".notdef", "quoteleft", "quoteright", "quotedblleft", "quotedblright", "bullet", "endash", "emdash",
    "tilde", "trademark", "scaron", "guilsinglright", "oe", ".notdef", "zcaron", "Ydieresis",
    "space", "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section",
    "dieresis", "copyright", "ordfeminine", "guillemotleft", "logicalnot", "hyphen", "registered", "macron",
    "degree", "plusminus", "twosuperior", "threesuperior", "acute", "mu", "paragraph", "periodcentered",
    "cedilla", "onesuperior", "ordmasculine", "guillemotright", "onequarter", "onehalf", "threequarters", "questiondown",
    "Agrave", "Aacute", "Acircumflex", "Atilde", "Adieresis", "Aring", "AE", "Ccedilla",
    "Egrave", "Eacute", "Ecircumflex", "Edieresis", "Igrave", "Iacute", "Icircumflex", "Idieresis",
    "Eth", "Ntilde", "Ograve", "Oacute", "Ocircumflex", "Otilde", "Odieresis", "multiply",
    "Oslash", "Ugrave", "Uacute", "Ucircumflex", "Udieresis", "Yacute", "Thorn", "germandbls",
    "agrave", "aacute", "acircumflex", "atilde", "adieresis", "aring", "ae", "ccedilla",
    "egrave", "eacute", "ecircumflex", "edieresis", "igrave", "iacute", "icircumflex", "idieresis",
    "eth", "ntilde", "ograve", "oacute", "ocircumflex", "otilde", "odieresis", "divide",
    "oslash", "ugrave", "uacute", "ucircumflex", "udieresis", "yacute", "thorn", "ydieresis",
];

/// Map a character to its single-byte WinAnsi code.
///
/// Characters with no WinAnsi code map to 0, which renders as `.notdef`.
pub fn win_ansi_code(c: char) -> u8 {
    let cp = c as u32;
    if let Some(&(_, code)) = WIN_ANSI_MAP.iter().find(|(from, _)| *from == cp) {
        return code;
    }
    if cp <= 0xFF {
        cp as u8
    } else {
        0
    }
}

/// Glyph name for a WinAnsi code.
pub fn glyph_name(code: u8) -> &'static str {
    CHARACTERS[code as usize]
}

/// Parsed AFM metrics.
#[derive(Debug, Clone)]
pub struct AfmFont {
    /// Header attributes, e.g. `FontName`, `CapHeight`
    pub attributes: HashMap<String, String>,
    glyph_widths: HashMap<String, f64>,
    kern_pairs: HashMap<(String, String), f64>,
    /// Font bounding box `[llx lly urx ury]`
    pub bbox: [f64; 4],
    /// Ascender in glyph space
    pub ascender: f64,
    /// Descender in glyph space (negative)
    pub descender: f64,
    /// Extra leading implied by the bounding box
    pub line_gap: f64,
    /// Height of lowercase letters
    pub x_height: f64,
    /// Height of capital letters
    pub cap_height: f64,
}

#[derive(PartialEq)]
enum Section {
    Header,
    CharMetrics,
    KernPairs,
    Other,
}

impl AfmFont {
    /// Parse AFM text.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut attributes = HashMap::new();
        let mut glyph_widths = HashMap::new();
        let mut kern_pairs = HashMap::new();
        let mut section = Section::Header;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, rest) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "StartCharMetrics" => {
                    section = Section::CharMetrics;
                    continue;
                },
                "EndCharMetrics" | "EndKernPairs" => {
                    section = Section::Other;
                    continue;
                },
                "StartKernPairs" => {
                    section = Section::KernPairs;
                    continue;
                },
                _ => {},
            }

            match section {
                Section::Header => {
                    attributes.insert(key.to_string(), rest.trim().to_string());
                },
                Section::CharMetrics => {
                    let mut width = None;
                    let mut name = None;
                    for field in line.split(';') {
                        let mut parts = field.split_whitespace();
                        match (parts.next(), parts.next()) {
                            (Some("WX"), Some(v)) => width = v.parse::<f64>().ok(),
                            (Some("N"), Some(v)) => name = Some(v.to_string()),
                            _ => {},
                        }
                    }
                    if let (Some(name), Some(width)) = (name, width) {
                        glyph_widths.insert(name, width);
                    }
                },
                Section::KernPairs => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() == 4 && parts[0] == "KPX" {
                        if let Ok(amount) = parts[3].parse::<f64>() {
                            kern_pairs.insert((parts[1].to_string(), parts[2].to_string()), amount);
                        }
                    }
                },
                Section::Other => {},
            }
        }

        let number = |key: &str| -> f64 {
            attributes
                .get(key)
                .and_then(|v: &String| v.parse::<f64>().ok())
                .unwrap_or(0.0)
        };

        let bbox_values: Vec<f64> = attributes
            .get("FontBBox")
            .map(|v| v.split_whitespace().filter_map(|n| n.parse().ok()).collect())
            .unwrap_or_default();
        if bbox_values.len() != 4 {
            return Err(Error::Font("AFM data has no valid FontBBox".to_string()));
        }
        let bbox = [bbox_values[0], bbox_values[1], bbox_values[2], bbox_values[3]];

        let ascender = number("Ascender");
        let descender = number("Descender");
        let x_height = number("XHeight");
        let cap_height = number("CapHeight");
        let line_gap = (bbox[3] - bbox[1]) - (ascender - descender);

        Ok(Self {
            attributes,
            glyph_widths,
            kern_pairs,
            bbox,
            ascender,
            descender,
            line_gap,
            x_height,
            cap_height,
        })
    }

    /// Font name from the header.
    pub fn font_name(&self) -> Option<&str> {
        self.attributes.get("FontName").map(|s| s.as_str())
    }

    /// Italic angle from the header.
    pub fn italic_angle(&self) -> f64 {
        self.attributes
            .get("ItalicAngle")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }

    /// Advance width of a named glyph, 0 when unknown.
    pub fn width_of_glyph(&self, glyph: &str) -> f64 {
        self.glyph_widths.get(glyph).copied().unwrap_or(0.0)
    }

    /// Kerning adjustment between two glyphs.
    pub fn kern_pair(&self, left: &str, right: &str) -> f64 {
        self.kern_pairs
            .get(&(left.to_string(), right.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Map text to glyph names.
    pub fn glyphs_for_string(&self, text: &str) -> Vec<&'static str> {
        text.chars()
            .map(|c| {
                let code = win_ansi_code(c);
                if code == 0 && c != '\0' {
                    log::warn!("no WinAnsi code for {:?}, using .notdef", c);
                }
                glyph_name(code)
            })
            .collect()
    }

    /// Advance for each glyph: its width plus the kerning with the next glyph.
    pub fn advances_for_glyphs(&self, glyphs: &[&str]) -> Vec<f64> {
        glyphs
            .iter()
            .enumerate()
            .map(|(i, left)| {
                let kern = glyphs
                    .get(i + 1)
                    .map(|right| self.kern_pair(left, right))
                    .unwrap_or(0.0);
                self.width_of_glyph(left) + kern
            })
            .collect()
    }

    /// Encode text as two-digit hex WinAnsi codes.
    pub fn encode_text(&self, text: &str) -> Vec<String> {
        text.chars()
            .map(|c| format!("{:02X}", win_ansi_code(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "StartFontMetrics 4.1
FontName Sample
FontBBox -100 -200 1000 900
Ascender 700
Descender -200
CapHeight 680
XHeight 500
ItalicAngle -12
StartCharMetrics 3
C 65 ; WX 667 ; N A ;
C 86 ; WX 667 ; N V ;
C 32 ; WX 278 ; N space ;
EndCharMetrics
StartKernData
StartKernPairs 1
KPX A V -70
EndKernPairs
EndKernData
EndFontMetrics
";

    #[test]
    fn test_parse_header() {
        let afm = AfmFont::parse(SAMPLE).unwrap();
        assert_eq!(afm.font_name(), Some("Sample"));
        assert_eq!(afm.bbox, [-100.0, -200.0, 1000.0, 900.0]);
        assert_eq!(afm.ascender, 700.0);
        assert_eq!(afm.descender, -200.0);
        assert_eq!(afm.line_gap, 200.0);
        assert_eq!(afm.italic_angle(), -12.0);
    }

    #[test]
    fn test_widths_and_kerning() {
        let afm = AfmFont::parse(SAMPLE).unwrap();
        assert_eq!(afm.width_of_glyph("A"), 667.0);
        assert_eq!(afm.width_of_glyph("missing"), 0.0);
        let glyphs = afm.glyphs_for_string("AV");
        assert_eq!(afm.advances_for_glyphs(&glyphs), vec![597.0, 667.0]);
    }

    #[test]
    fn test_missing_bbox_is_error() {
        assert!(AfmFont::parse("StartFontMetrics 4.1\nFontName X\n").is_err());
    }

    #[test]
    fn test_win_ansi_remapping() {
        assert_eq!(win_ansi_code('A'), 0x41);
        assert_eq!(win_ansi_code('\u{20AC}'), 0x80);
        assert_eq!(win_ansi_code('\u{2014}'), 0x97);
        assert_eq!(win_ansi_code('é'), 0xE9);
        assert_eq!(win_ansi_code('中'), 0);
        assert_eq!(glyph_name(0x80), "Euro");
        assert_eq!(glyph_name(0), ".notdef");
    }

    #[test]
    fn test_encode_text_is_zero_padded() {
        let afm = AfmFont::parse(SAMPLE).unwrap();
        assert_eq!(afm.encode_text("\tA"), vec!["09", "41"]);
    }
}
