//! Text layout and rendering options.
//!
//! [`TextOptions`] is what callers pass: every field is optional so that a
//! `continued` call can inherit whatever the previous call set. Before
//! layout the options are resolved against the document into a
//! [`TextStyle`] with concrete values.

use serde::{Deserialize, Serialize};

/// Horizontal alignment within the line box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left
    #[default]
    Left,
    /// Centered
    Center,
    /// Flush right
    Right,
    /// Stretched to both edges, except the last line of a paragraph
    Justify,
}

/// Vertical alignment of glyphs relative to the current y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Baseline {
    /// Top of the line box sits at y
    #[default]
    Top,
    /// Descender line sits at y
    Bottom,
    /// Midway between ascender and descender
    Middle,
    /// Glyph baseline sits at y
    Alphabetic,
    /// Hanging baseline, 0.8 of the ascender
    Hanging,
    /// Mathematical baseline, half the ascender
    Mathematical,
    /// Same as bottom
    Ideographic,
    /// Half the x-height
    SvgMiddle,
    /// Same as middle
    SvgCentral,
    /// Explicit offset in points, positive moves the text up
    Offset(f64),
}

/// Target of a link annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    /// External URI
    Url(String),
    /// Zero-based page index within the document
    Page(usize),
}

impl From<&str> for LinkTarget {
    fn from(url: &str) -> Self {
        LinkTarget::Url(url.to_string())
    }
}

impl From<usize> for LinkTarget {
    fn from(page: usize) -> Self {
        LinkTarget::Page(page)
    }
}

/// Default ellipsis appended when text is truncated.
pub const DEFAULT_ELLIPSIS: &str = "\u{2026}";

/// Options for [`PdfDocument::text`](crate::PdfDocument::text) and friends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    /// Wrap width; defaults to the distance to the right margin
    pub width: Option<f64>,
    /// Maximum height of the text box; stops output instead of adding pages
    pub height: Option<f64>,
    /// Number of columns
    pub columns: Option<usize>,
    /// Gap between columns
    pub column_gap: Option<f64>,
    /// First-line indent
    pub indent: Option<f64>,
    /// Indent every line rather than just the first
    pub indent_all_lines: Option<bool>,
    /// Extra space after each paragraph
    pub paragraph_gap: Option<f64>,
    /// Extra space between lines
    pub line_gap: Option<f64>,
    /// Extra space between characters
    pub character_spacing: Option<f64>,
    /// Extra space between words
    pub word_spacing: Option<f64>,
    /// Horizontal scaling in percent
    pub horizontal_scaling: Option<f64>,
    /// Truncation marker when `height` is exceeded
    pub ellipsis: Option<String>,
    /// Alignment
    pub align: Option<Align>,
    /// Baseline
    pub baseline: Option<Baseline>,
    /// Keep the line open for the next text call
    pub continued: Option<bool>,
    /// Wrap lines; `false` writes each line at the current position
    pub line_break: Option<bool>,
    /// Fill glyphs
    pub fill: Option<bool>,
    /// Stroke glyph outlines
    pub stroke: Option<bool>,
    /// Underline
    pub underline: Option<bool>,
    /// Strike through
    pub strike: Option<bool>,
    /// Link annotation over the text
    pub link: Option<LinkTarget>,
    /// Named destination at the text position
    pub destination: Option<String>,
}

impl TextOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wrap width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the box height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the column count.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set the gap between columns.
    pub fn with_column_gap(mut self, gap: f64) -> Self {
        self.column_gap = Some(gap);
        self
    }

    /// Set the first-line indent.
    pub fn with_indent(mut self, indent: f64) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Indent every line.
    pub fn with_indent_all_lines(mut self, all: bool) -> Self {
        self.indent_all_lines = Some(all);
        self
    }

    /// Set the paragraph gap.
    pub fn with_paragraph_gap(mut self, gap: f64) -> Self {
        self.paragraph_gap = Some(gap);
        self
    }

    /// Set the line gap.
    pub fn with_line_gap(mut self, gap: f64) -> Self {
        self.line_gap = Some(gap);
        self
    }

    /// Set character spacing.
    pub fn with_character_spacing(mut self, spacing: f64) -> Self {
        self.character_spacing = Some(spacing);
        self
    }

    /// Set word spacing.
    pub fn with_word_spacing(mut self, spacing: f64) -> Self {
        self.word_spacing = Some(spacing);
        self
    }

    /// Set horizontal scaling in percent.
    pub fn with_horizontal_scaling(mut self, percent: f64) -> Self {
        self.horizontal_scaling = Some(percent);
        self
    }

    /// Truncate with the default ellipsis.
    pub fn with_ellipsis(mut self) -> Self {
        self.ellipsis = Some(DEFAULT_ELLIPSIS.to_string());
        self
    }

    /// Truncate with a custom marker.
    pub fn with_ellipsis_text(mut self, marker: impl Into<String>) -> Self {
        self.ellipsis = Some(marker.into());
        self
    }

    /// Set alignment.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set baseline.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Keep the line open for the next call.
    pub fn with_continued(mut self, continued: bool) -> Self {
        self.continued = Some(continued);
        self
    }

    /// Enable or disable wrapping.
    pub fn with_line_break(mut self, line_break: bool) -> Self {
        self.line_break = Some(line_break);
        self
    }

    /// Enable or disable fill.
    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Enable or disable stroke.
    pub fn with_stroke(mut self, stroke: bool) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Underline the text.
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    /// Strike the text through.
    pub fn with_strike(mut self, strike: bool) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Add a link over the text.
    pub fn with_link(mut self, target: impl Into<LinkTarget>) -> Self {
        self.link = Some(target.into());
        self
    }

    /// Register a named destination at the text position.
    pub fn with_destination(mut self, name: impl Into<String>) -> Self {
        self.destination = Some(name.into());
        self
    }

    /// Fill unset fields from `previous`, except `continued`.
    pub fn inherit(mut self, previous: &TextOptions) -> Self {
        macro_rules! inherit {
            ($($field:ident),*) => {
                $( if self.$field.is_none() { self.$field = previous.$field.clone(); } )*
            };
        }
        inherit!(
            width,
            height,
            columns,
            column_gap,
            indent,
            indent_all_lines,
            paragraph_gap,
            line_gap,
            character_spacing,
            word_spacing,
            horizontal_scaling,
            ellipsis,
            align,
            baseline,
            line_break,
            fill,
            stroke,
            underline,
            strike,
            link,
            destination
        );
        self
    }

    /// Resolve to concrete values. `width` must already be filled in when wrapping.
    pub fn resolve(&self) -> TextStyle {
        TextStyle {
            width: if self.line_break == Some(false) {
                None
            } else {
                self.width.map(|w| w.max(0.0))
            },
            height: self.height,
            columns: self.columns.unwrap_or(0),
            column_gap: self.column_gap.unwrap_or(18.0),
            indent: self.indent.unwrap_or(0.0),
            indent_all_lines: self.indent_all_lines.unwrap_or(false),
            paragraph_gap: self.paragraph_gap.unwrap_or(0.0),
            line_gap: self.line_gap,
            character_spacing: self.character_spacing.unwrap_or(0.0),
            word_spacing: self.word_spacing.unwrap_or(0.0),
            horizontal_scaling: self.horizontal_scaling.unwrap_or(100.0),
            ellipsis: self.ellipsis.clone(),
            align: self.align.unwrap_or_default(),
            baseline: self.baseline.unwrap_or_default(),
            continued: self.continued.unwrap_or(false),
            fill: self.fill.unwrap_or(false),
            stroke: self.stroke.unwrap_or(false),
            underline: self.underline.unwrap_or(false),
            strike: self.strike.unwrap_or(false),
            link: self.link.clone(),
            destination: self.destination.clone(),
        }
    }
}

/// Resolved text settings used by layout and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Wrap width, `None` when not wrapping
    pub width: Option<f64>,
    /// Box height
    pub height: Option<f64>,
    /// Column count, 0 meaning one
    pub columns: usize,
    /// Gap between columns
    pub column_gap: f64,
    /// First-line indent
    pub indent: f64,
    /// Indent every line
    pub indent_all_lines: bool,
    /// Paragraph gap
    pub paragraph_gap: f64,
    /// Line gap, falling back to the document's when unset
    pub line_gap: Option<f64>,
    /// Character spacing
    pub character_spacing: f64,
    /// Word spacing
    pub word_spacing: f64,
    /// Horizontal scaling in percent
    pub horizontal_scaling: f64,
    /// Truncation marker
    pub ellipsis: Option<String>,
    /// Alignment
    pub align: Align,
    /// Baseline
    pub baseline: Baseline,
    /// Keep the line open
    pub continued: bool,
    /// Fill glyphs as well when stroking; unstroked text is always filled
    pub fill: bool,
    /// Stroke glyphs
    pub stroke: bool,
    /// Underline
    pub underline: bool,
    /// Strike through
    pub strike: bool,
    /// Link target
    pub link: Option<LinkTarget>,
    /// Named destination
    pub destination: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextOptions::default().resolve()
    }
}
