//! Line breaking, column flow and pagination.
//!
//! [`LineWrapper`] walks UAX #14 break opportunities, accumulates words
//! into lines that fit the column width, splits words wider than a whole
//! line, and moves to the next column or page when the bottom is reached.
//! It never draws anything itself: each finished line goes to the
//! [`WrapHost`], which also supplies cursor position and measurements.

use super::hyphenation::{strip_soft_hyphens, HYPHEN, SOFT_HYPHEN};
use super::options::{Align, TextStyle};
use crate::error::Result;
use crate::writer::object_serializer::round_number;
use std::collections::HashMap;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Measurements of a finished line, passed to [`WrapHost::render_line`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInfo {
    /// Width of the line's text, inter-word spacing included
    pub text_width: f64,
    /// Number of words on the line
    pub word_count: usize,
    /// Width available to the line
    pub line_width: f64,
    /// Alignment to apply; justified paragraphs end with a left-aligned line
    pub align: Align,
}

/// What the wrapper needs from the document.
pub trait WrapHost {
    /// Cursor x.
    fn x(&self) -> f64;
    /// Move the cursor horizontally.
    fn set_x(&mut self, x: f64);
    /// Cursor y, growing downwards from the top of the page.
    fn y(&self) -> f64;
    /// Move the cursor vertically.
    fn set_y(&mut self, y: f64);
    /// Height of a line in the current font and size.
    fn current_line_height(&self, include_gap: bool) -> f64;
    /// Width of `text` with the given character spacing and horizontal scaling.
    fn width_of_string(
        &mut self,
        text: &str,
        character_spacing: f64,
        horizontal_scaling: f64,
    ) -> Result<f64>;
    /// Key identifying the current font and size, used to cache word widths.
    fn measure_key(&self) -> String;
    /// Lowest y that text may reach on the current page.
    fn page_max_y(&self) -> f64;
    /// Top margin of the current page.
    fn page_top_margin(&self) -> f64;
    /// Start a new page and continue there.
    fn continue_on_new_page(&mut self) -> Result<()>;
    /// Draw a line at the cursor and advance it.
    fn render_line(&mut self, text: &str, style: &TextStyle, line: &LineInfo) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
struct Break {
    position: usize,
    required: bool,
}

/// Whether `c` forces a line break.
fn is_mandatory_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Break opportunities in `text`.
///
/// The end of the text only counts as a required break when the text itself
/// ends with a line terminator.
fn break_opportunities(text: &str) -> Vec<Break> {
    let ends_with_newline = text.chars().last().map(is_mandatory_break).unwrap_or(false);
    linebreaks(text)
        .map(|(position, opportunity)| Break {
            position,
            required: match opportunity {
                BreakOpportunity::Mandatory => position < text.len() || ends_with_newline,
                BreakOpportunity::Allowed => false,
            },
        })
        .collect()
}

/// Whether `y` lies below `limit`, compared at output precision so that
/// accumulated line advances land exactly on a box sized in lines.
fn past(y: f64, limit: f64) -> Result<bool> {
    // Unbounded boxes have an infinite limit
    if !limit.is_finite() {
        return Ok(y > limit);
    }
    Ok(round_number(y)? > round_number(limit)?)
}

/// Per-call state of the wrapping loop.
struct WrapState {
    buffer: String,
    text_width: f64,
    word_count: usize,
    line_count: usize,
    last_text_width: f64,
    saved_y: f64,
}

/// Splits text into lines and flows them through columns and pages.
///
/// A wrapper is created for each text call, or kept alive across calls
/// chained with `continued`.
#[derive(Debug, Clone)]
pub struct LineWrapper {
    horizontal_scaling: f64,
    indent: f64,
    indent_all_lines: bool,
    character_spacing: f64,
    word_spacing: f64,
    columns: usize,
    column_gap: f64,
    line_width: f64,
    space_left: f64,
    start_x: f64,
    start_y: f64,
    column: usize,
    ellipsis: Option<String>,
    continued_x: f64,
    height: Option<f64>,
    max_y: f64,
    last_line: bool,
    pending_indent_reset: Option<f64>,
    pending_last_line: bool,
    word_widths: HashMap<(String, String), f64>,
}

impl LineWrapper {
    /// Set up a wrapper at the host's cursor. `style.width` must be set.
    pub fn new<H: WrapHost + ?Sized>(host: &H, style: &TextStyle) -> Self {
        let horizontal_scaling = style.horizontal_scaling;
        let scale = horizontal_scaling / 100.0;
        let columns = style.columns.max(1);
        let column_gap = style.column_gap * scale;
        let width = style.width.unwrap_or(0.0);
        let line_width = (width * scale - column_gap * (columns as f64 - 1.0)) / columns as f64;
        let start_y = host.y();
        let max_y = match style.height {
            Some(h) => start_y + h,
            None => host.page_max_y(),
        };
        Self {
            horizontal_scaling,
            indent: style.indent * scale,
            indent_all_lines: style.indent_all_lines,
            character_spacing: style.character_spacing * scale,
            word_spacing: style.word_spacing * scale,
            columns,
            column_gap,
            line_width,
            space_left: line_width,
            start_x: host.x(),
            start_y,
            column: 1,
            ellipsis: style.ellipsis.clone(),
            continued_x: 0.0,
            height: style.height,
            max_y,
            last_line: false,
            pending_indent_reset: None,
            pending_last_line: false,
            word_widths: HashMap::new(),
        }
    }

    /// Current line width.
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Current column, starting at 1.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Lowest y lines may reach.
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Horizontal offset carried into the next continued call.
    pub fn continued_x(&self) -> f64 {
        self.continued_x
    }

    fn word_width<H: WrapHost + ?Sized>(&mut self, host: &mut H, word: &str) -> Result<f64> {
        let key = (host.measure_key(), word.to_string());
        if let Some(w) = self.word_widths.get(&key) {
            log::trace!("word width cache hit for {:?}", word);
            return Ok(*w);
        }
        let visible = strip_soft_hyphens(word);
        let w = round_number(
            host.width_of_string(&visible, self.character_spacing, self.horizontal_scaling)?
                + self.character_spacing
                + self.word_spacing,
        )?;
        self.word_widths.insert(key, w);
        Ok(w)
    }

    fn can_fit<H: WrapHost + ?Sized>(&mut self, host: &mut H, word: &str, w: f64) -> Result<bool> {
        if word.ends_with(SOFT_HYPHEN) {
            let hyphen = self.word_width(host, HYPHEN)?;
            Ok(w + hyphen <= self.space_left)
        } else {
            Ok(w <= self.space_left)
        }
    }

    /// Lay out `text`, sending each line to the host.
    pub fn wrap<H: WrapHost + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
        style: &TextStyle,
    ) -> Result<()> {
        let scale = style.horizontal_scaling / 100.0;
        self.horizontal_scaling = style.horizontal_scaling;
        self.indent = style.indent * scale;
        self.indent_all_lines = style.indent_all_lines;
        self.character_spacing = style.character_spacing * scale;
        self.word_spacing = style.word_spacing * scale;
        if style.ellipsis.is_some() {
            self.ellipsis = style.ellipsis.clone();
        }

        // Don't start a line that has no room on this page or column
        let next_y = host.y() + host.current_line_height(true);
        if past(host.y(), self.max_y)? || past(next_y, self.max_y)? {
            self.next_section(host)?;
        }

        let mut state = WrapState {
            buffer: String::new(),
            text_width: 0.0,
            word_count: 0,
            line_count: 0,
            last_text_width: 0.0,
            saved_y: host.y(),
        };

        self.each_word(host, text, style, &mut state)?;

        if state.word_count > 0 {
            self.mark_last_line();
            self.emit_line(host, style, &mut state)?;
        }

        if style.continued {
            if state.line_count > 1 {
                self.continued_x = 0.0;
            }
            self.continued_x += state.last_text_width;
            host.set_y(state.saved_y);
        } else {
            host.set_x(self.start_x);
        }
        Ok(())
    }

    fn each_word<H: WrapHost + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
        style: &TextStyle,
        state: &mut WrapState,
    ) -> Result<()> {
        let mut last: Option<Break> = None;
        for bk in break_opportunities(text) {
            let start = last.map(|b| b.position).unwrap_or(0);
            let word = &text[start..bk.position];
            let w = self.word_width(host, word)?;

            let keep_going = if w > self.line_width + self.continued_x {
                self.split_word(host, word, w, bk, last, style, state)?
            } else {
                self.on_word(host, word, w, bk, last, style, state)?
            };
            if !keep_going {
                break;
            }
            last = Some(bk);
        }
        Ok(())
    }

    /// Feed a word too long for any line in pieces that fit the space left.
    #[allow(clippy::too_many_arguments)]
    fn split_word<H: WrapHost + ?Sized>(
        &mut self,
        host: &mut H,
        word: &str,
        mut w: f64,
        bk: Break,
        last: Option<Break>,
        style: &TextStyle,
        state: &mut WrapState,
    ) -> Result<bool> {
        let mut chars: Vec<char> = word.chars().collect();
        let mut lbk = last;
        while !chars.is_empty() {
            let slice = |chars: &[char], l: usize| -> String { chars[..l].iter().collect() };
            let len = chars.len();
            let mut l;
            let mut might_grow = false;
            if w > self.space_left {
                l = ((self.space_left / (w / len as f64)).ceil().max(0.0) as usize).min(len);
                w = self.word_width(host, &slice(&chars, l))?;
                might_grow = w <= self.space_left && l < len;
            } else {
                l = len;
            }
            let mut must_shrink = w > self.space_left && l > 0;
            while must_shrink || might_grow {
                if must_shrink {
                    l -= 1;
                    w = self.word_width(host, &slice(&chars, l))?;
                    must_shrink = w > self.space_left && l > 0;
                } else {
                    l += 1;
                    w = self.word_width(host, &slice(&chars, l))?;
                    must_shrink = w > self.space_left && l > 0;
                    might_grow = w <= self.space_left && l < len;
                }
            }

            // A fresh line always takes at least one character
            if l == 0 && self.space_left == self.line_width {
                l = 1;
                w = self.word_width(host, &slice(&chars, l))?;
            }

            let piece = slice(&chars, l);
            let fbk = Break {
                position: bk.position,
                required: bk.required || l < len,
            };
            let keep_going = self.on_word(host, &piece, w, fbk, lbk, style, state)?;
            lbk = Some(Break {
                position: bk.position,
                required: false,
            });

            chars.drain(..l);
            let rest: String = chars.iter().collect();
            w = self.word_width(host, &rest)?;
            if !keep_going {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Place one word; returns `false` once the text box is full.
    #[allow(clippy::too_many_arguments)]
    fn on_word<H: WrapHost + ?Sized>(
        &mut self,
        host: &mut H,
        word: &str,
        w: f64,
        bk: Break,
        last: Option<Break>,
        style: &TextStyle,
        state: &mut WrapState,
    ) -> Result<bool> {
        if last.map(|b| b.required).unwrap_or(true) {
            self.first_line(host);
            self.space_left = self.line_width;
        }

        let fits = self.can_fit(host, word, w)?;
        if fits {
            state.buffer.push_str(word);
            state.text_width += w;
            state.word_count += 1;
        }

        if !(bk.required || !fits) {
            self.space_left -= w;
            return Ok(true);
        }

        let lh = host.current_line_height(true);
        if self.height.is_some()
            && self.ellipsis.is_some()
            && past(host.y() + lh * 2.0, self.max_y)?
            && self.column >= self.columns
        {
            self.truncate_with_ellipsis(host, state)?;
        }

        if bk.required {
            if w > self.space_left {
                self.emit_line(host, style, state)?;
                state.buffer = word.to_string();
                state.text_width = w;
                state.word_count = 1;
            }
            self.mark_last_line();
        }

        if state.buffer.ends_with(SOFT_HYPHEN) {
            state.buffer.pop();
            state.buffer.push_str(HYPHEN);
            let hyphen = self.word_width(host, HYPHEN)?;
            self.space_left -= hyphen;
            state.text_width += hyphen;
        }

        self.emit_line(host, style, state)?;

        if past(host.y() + lh, self.max_y)? && !self.next_section(host)? {
            state.word_count = 0;
            state.buffer.clear();
            return Ok(false);
        }

        if bk.required {
            self.space_left = self.line_width;
            state.buffer.clear();
            state.text_width = 0.0;
            state.word_count = 0;
        } else {
            self.space_left = self.line_width - w;
            state.buffer = word.to_string();
            state.text_width = w;
            state.word_count = 1;
        }
        Ok(true)
    }

    fn truncate_with_ellipsis<H: WrapHost + ?Sized>(
        &mut self,
        host: &mut H,
        state: &mut WrapState,
    ) -> Result<()> {
        let ellipsis = match &self.ellipsis {
            Some(e) => e.clone(),
            None => return Ok(()),
        };
        let mut buffer = state.buffer.trim_end().to_string();
        let mut width = self.word_width(host, &format!("{}{}", buffer, ellipsis))?;
        while !buffer.is_empty() && width > self.line_width {
            buffer.pop();
            buffer = buffer.trim_end().to_string();
            width = self.word_width(host, &format!("{}{}", buffer, ellipsis))?;
        }
        if width <= self.line_width {
            buffer.push_str(&ellipsis);
        }
        state.text_width = self.word_width(host, &buffer)?;
        state.buffer = buffer;
        Ok(())
    }

    fn first_line<H: WrapHost + ?Sized>(&mut self, host: &mut H) {
        let indent = if self.continued_x != 0.0 {
            self.continued_x
        } else {
            self.indent
        };
        host.set_x(host.x() + indent);
        self.line_width -= indent;
        if !self.indent_all_lines {
            self.pending_indent_reset = Some(indent);
        }
    }

    fn mark_last_line(&mut self) {
        self.last_line = true;
        self.pending_last_line = true;
    }

    fn emit_line<H: WrapHost + ?Sized>(
        &mut self,
        host: &mut H,
        style: &TextStyle,
        state: &mut WrapState,
    ) -> Result<()> {
        let word_gaps = state.word_count as f64 - 1.0;
        let info = LineInfo {
            text_width: state.text_width + self.word_spacing * word_gaps,
            word_count: state.word_count,
            line_width: self.line_width,
            align: if self.last_line && style.align == Align::Justify {
                Align::Left
            } else {
                style.align
            },
        };
        state.last_text_width = info.text_width;
        state.saved_y = host.y();
        host.render_line(&state.buffer, style, &info)?;
        state.line_count += 1;

        if let Some(indent) = self.pending_indent_reset.take() {
            host.set_x(host.x() - indent);
            self.line_width += indent;
            if style.continued && self.continued_x == 0.0 {
                self.continued_x = self.indent;
            }
            if !style.continued {
                self.continued_x = 0.0;
            }
        }
        if self.pending_last_line {
            self.pending_last_line = false;
            host.set_y(host.y() + style.paragraph_gap);
            self.last_line = false;
        }
        Ok(())
    }

    /// Move to the next column, or the next page after the last column.
    ///
    /// Returns `false` when the box has a fixed height and no room is left.
    fn next_section<H: WrapHost + ?Sized>(&mut self, host: &mut H) -> Result<bool> {
        self.column += 1;
        if self.column > self.columns {
            if self.height.is_some() {
                return Ok(false);
            }
            host.continue_on_new_page()?;
            self.column = 1;
            self.start_y = host.page_top_margin();
            self.max_y = host.page_max_y();
            host.set_x(self.start_x);
            log::debug!("text continued on a new page");
        } else {
            host.set_x(host.x() + self.line_width + self.column_gap);
            host.set_y(self.start_y);
        }
        Ok(true)
    }
}
