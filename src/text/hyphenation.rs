//! Soft hyphen handling.
//!
//! A soft hyphen (U+00AD) marks where a word may be broken. It is never
//! drawn or measured; when the line wrapper breaks a line at one, the
//! break is shown with a real hyphen instead.

/// The soft hyphen character.
pub const SOFT_HYPHEN: char = '\u{AD}';

/// Text drawn in place of a soft hyphen at a line break.
pub const HYPHEN: &str = "-";

/// Remove all soft hyphens from `text`.
pub fn strip_soft_hyphens(text: &str) -> String {
    text.chars().filter(|&c| c != SOFT_HYPHEN).collect()
}

/// Collapse runs of whitespace to a single space.
///
/// Used when explicit word spacing is requested, since the spacing is then
/// applied once per word gap.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_soft_hyphens() {
        assert_eq!(strip_soft_hyphens("hy\u{AD}phen\u{AD}ation"), "hyphenation");
        assert_eq!(strip_soft_hyphens("plain"), "plain");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a  b\t\n c"), "a b c");
        assert_eq!(collapse_whitespace(" lead"), " lead");
    }
}
