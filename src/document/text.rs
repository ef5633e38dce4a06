//! Writing text: option handling, wrapping and fragment output.

use super::annotations::Destination;
use super::PdfDocument;
use crate::error::Result;
use crate::fonts::TextEncoding;
use crate::text::emitter::{
    aligned_x, append_word_spacing, baseline_offset, decoration_line_width,
    justify_word_spacing, show_text_operators, FontGeometry,
};
use crate::text::hyphenation::{collapse_whitespace, SOFT_HYPHEN};
use crate::text::{Align, LineInfo, LineWrapper, TextOptions, TextStyle, WrapHost};
use crate::writer::object_serializer::number;
use std::io::Write;

/// Wrapper host over a document. In measuring mode lines only advance y.
struct TextHost<'a, W: Write> {
    doc: &'a mut PdfDocument<W>,
    measure_only: bool,
    line_gap: f64,
}

impl<W: Write> WrapHost for TextHost<'_, W> {
    fn x(&self) -> f64 {
        self.doc.x
    }

    fn set_x(&mut self, x: f64) {
        self.doc.x = x;
    }

    fn y(&self) -> f64 {
        self.doc.y
    }

    fn set_y(&mut self, y: f64) {
        self.doc.y = y;
    }

    fn current_line_height(&self, include_gap: bool) -> f64 {
        self.doc.current_line_height(include_gap)
    }

    fn width_of_string(
        &mut self,
        text: &str,
        character_spacing: f64,
        horizontal_scaling: f64,
    ) -> Result<f64> {
        self.doc.measure(text, character_spacing, horizontal_scaling)
    }

    fn measure_key(&self) -> String {
        let id = self.doc.fonts.current().map(|f| f.id()).unwrap_or("");
        format!("{}@{}", id, self.doc.fonts.size())
    }

    fn page_max_y(&self) -> f64 {
        self.doc.page().map(|p| p.max_y()).unwrap_or(f64::INFINITY)
    }

    fn page_top_margin(&self) -> f64 {
        self.doc.page().map(|p| p.margins().top).unwrap_or(0.0)
    }

    fn continue_on_new_page(&mut self) -> Result<()> {
        self.doc.continue_on_new_page()?;
        Ok(())
    }

    fn render_line(&mut self, text: &str, style: &TextStyle, line: &LineInfo) -> Result<()> {
        if !self.measure_only {
            let (x, y) = (self.doc.x, self.doc.y);
            self.doc.fragment(text, x, y, style, line)?;
        }
        self.doc.y += self.doc.current_line_height(true) + self.line_gap;
        Ok(())
    }
}

impl<W: Write> PdfDocument<W> {
    /// Width of `text` in the current font and size.
    fn measure(&mut self, text: &str, character_spacing: f64, horizontal_scaling: f64) -> Result<f64> {
        let size = self.fonts.size();
        let width = self.fonts.current_mut()?.width_of_string(text, size)?;
        let gaps = text.chars().count().saturating_sub(1) as f64;
        Ok((width + character_spacing * gaps) * horizontal_scaling / 100.0)
    }

    /// Width of `text` in the current font and size, with the spacing and
    /// scaling from `options`.
    pub fn width_of_string(&mut self, text: &str, options: &TextOptions) -> Result<f64> {
        self.measure(
            text,
            options.character_spacing.unwrap_or(0.0),
            options.horizontal_scaling.unwrap_or(100.0),
        )
    }

    /// Height `text` would take if written at the cursor with `options`.
    ///
    /// Nothing is drawn and the cursor is left where it was.
    pub fn height_of_string(&mut self, text: &str, options: TextOptions) -> Result<f64> {
        let (x, y) = (self.x, self.y);
        let mut options = self.init_options(None, options);
        options.height = Some(f64::INFINITY);
        let result = self.layout_text(text, options, true);
        let height = self.y - y;
        self.x = x;
        self.y = y;
        result.map(|_| height)
    }

    /// Write `text` at `position` (or the cursor), wrapping to the right
    /// margin unless `options` say otherwise.
    pub fn text(
        &mut self,
        text: &str,
        position: Option<(f64, f64)>,
        options: TextOptions,
    ) -> Result<&mut Self> {
        self.page_or_err()?;
        let options = self.init_options(position, options);
        self.layout_text(text, options, false)?;
        Ok(self)
    }

    /// Merge continued options, move the cursor and fill in the wrap width.
    fn init_options(&mut self, position: Option<(f64, f64)>, options: TextOptions) -> TextOptions {
        let mut options = match &self.text_options {
            Some(previous) => options.inherit(previous),
            None => options,
        };
        if let Some((x, y)) = position {
            self.x = x;
            self.y = y;
        }
        if options.line_break != Some(false) && options.width.is_none() {
            if let Some(page) = self.page() {
                options.width = Some(page.width() - self.x - page.margins().right);
            }
        }
        if let Some(width) = options.width {
            options.width = Some(width.max(0.0));
        }
        options
    }

    fn layout_text(&mut self, text: &str, options: TextOptions, measure_only: bool) -> Result<()> {
        let style = options.resolve();
        let text = if style.word_spacing != 0.0 {
            collapse_whitespace(text)
        } else {
            text.to_string()
        };
        let line_gap = style.line_gap.unwrap_or(self.line_gap);

        if style.width.is_some() {
            let kept = if measure_only { None } else { self.wrapper.take() };
            let mut host = TextHost {
                doc: self,
                measure_only,
                line_gap,
            };
            let mut wrapper = kept.unwrap_or_else(|| LineWrapper::new(&host, &style));
            wrapper.wrap(&mut host, &text, &style)?;
            if !measure_only && style.continued {
                self.wrapper = Some(wrapper);
                self.text_options = Some(options);
            } else if !measure_only {
                self.text_options = None;
            }
            return Ok(());
        }

        for line in text.split('\n') {
            if measure_only {
                self.y += self.current_line_height(true) + line_gap;
                continue;
            }
            let width = self.measure(line, style.character_spacing, style.horizontal_scaling)?;
            let info = LineInfo {
                text_width: width,
                word_count: line.split_whitespace().count().max(1),
                line_width: width,
                align: Align::Left,
            };
            let (x, y) = (self.x, self.y);
            self.fragment(line, x, y, &style, &info)?;
            self.x += width;
        }
        Ok(())
    }

    /// Emit one laid-out line at (`x`, `y`), top-left origin.
    fn fragment(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
        line: &LineInfo,
    ) -> Result<()> {
        let text: String = text
            .chars()
            .filter(|&c| c != '\n' && c != SOFT_HYPHEN)
            .collect();
        if text.is_empty() {
            return Ok(());
        }

        let size = self.fonts.size();
        let cs = style.character_spacing;
        let hs = style.horizontal_scaling;
        let mut word_spacing = style.word_spacing;
        let mut x = x;

        if style.width.is_some() {
            match line.align {
                Align::Right => {
                    let width = self.measure(text.trim_end(), cs, hs)?;
                    x = aligned_x(Align::Right, x, line.line_width, width);
                },
                Align::Center => {
                    x = aligned_x(Align::Center, x, line.line_width, line.text_width);
                },
                Align::Justify => {
                    let words = text.split_whitespace().count();
                    let bare: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                    let bare_width = self.measure(&bare, cs, hs)?;
                    let space = self.measure(" ", 0.0, 100.0)? + cs;
                    word_spacing = justify_word_spacing(line.line_width, bare_width, words, space);
                },
                Align::Left => {},
            }
        }

        let geometry = {
            let font = self.fonts.current()?;
            FontGeometry {
                ascender: font.ascender(),
                descender: font.descender(),
                x_height: font.x_height(),
            }
        };
        let dy = baseline_offset(style.baseline, &geometry, size);

        let rendered_width = line.text_width
            + word_spacing * (line.word_count as f64 - 1.0)
            + cs * (text.chars().count() as f64 - 1.0);

        if let Some(target) = &style.link {
            let height = self.current_line_height(false);
            self.link(x, y, rendered_width, height, target.clone())?;
        }
        if let Some(name) = &style.destination {
            let destination = Destination::Xyz {
                left: Some(x),
                top: Some(y),
                zoom: None,
            };
            self.add_named_destination(name, destination)?;
        }
        if style.underline {
            let lw = decoration_line_width(size);
            let line_y = y + self.current_line_height(false) - lw;
            self.decoration(x, line_y, rendered_width, lw, style.stroke)?;
        }
        if style.strike {
            let lw = decoration_line_width(size);
            let line_y = y + self.current_line_height(false) / 2.0;
            self.decoration(x, line_y, rendered_width, lw, style.stroke)?;
        }

        let page_height = self.page_or_err()?.height();
        self.save()?;
        self.transform(1.0, 0.0, 0.0, -1.0, 0.0, page_height)?;
        let y = page_height - y - dy;

        let (font_id, font_ref) = {
            let font = self.fonts.current_mut()?;
            (font.id().to_string(), font.object_ref(&mut self.writer))
        };
        self.page_mut()?.add_font(&font_id, font_ref);

        self.add_content("BT")?;
        self.add_content(&format!("1 0 0 1 {} {} Tm", number(x)?, number(y)?))?;
        self.add_content(&format!("/{} {} Tf", font_id, number(size)?))?;
        let mode = match (style.fill, style.stroke) {
            (true, true) => 2,
            (false, true) => 1,
            _ => 0,
        };
        if mode != 0 {
            self.add_content(&format!("{} Tr", mode))?;
        }
        if cs != 0.0 {
            self.add_content(&format!("{} Tc", number(cs)?))?;
        }
        if hs != 100.0 {
            self.add_content(&format!("{} Tz", number(hs)?))?;
        }

        let encoding = if word_spacing != 0.0 {
            let space = self.measure(" ", 0.0, 100.0)?;
            let extra = (word_spacing + space + cs) * 1000.0 / size;
            let font = self.fonts.current_mut()?;
            let mut encoding = TextEncoding::default();
            for word in text.split_whitespace() {
                let mut encoded = font.encode(word)?;
                append_word_spacing(&mut encoded, extra);
                encoding.glyphs.extend(encoded.glyphs);
                encoding.positions.extend(encoded.positions);
            }
            encoding
        } else {
            self.fonts.current_mut()?.encode(&text)?
        };

        for op in show_text_operators(&encoding, x, y, size)? {
            self.add_content(&op)?;
        }
        self.add_content("ET")?;
        self.restore()?;
        Ok(())
    }

    /// Underline or strike-through stroke in the fill color.
    fn decoration(&mut self, x: f64, y: f64, width: f64, line_width: f64, stroked: bool) -> Result<()> {
        self.save()?;
        if !stroked {
            if let Some(color) = self.fill_color {
                self.add_content(&color.operator(true)?)?;
            }
        }
        self.line_width(line_width)?
            .move_to(x, y)?
            .line_to(x + width, y)?
            .stroke()?
            .restore()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::document::DocumentOptions;
    use crate::error::Error;
    use crate::text::{Align, Baseline, TextOptions};
    use crate::PdfDocument;

    fn doc() -> PdfDocument {
        PdfDocument::new(DocumentOptions::default().with_compress(false)).unwrap()
    }

    fn output(doc: PdfDocument) -> String {
        String::from_utf8_lossy(&doc.finish().unwrap()).to_string()
    }

    #[test]
    fn test_hello_fragment() {
        let mut d = doc();
        d.text("Hello", None, TextOptions::new()).unwrap();
        let out = output(d);
        assert!(out.contains("BT\n1 0 0 1 72 711.384 Tm\n/F1 12 Tf\n[<48656C6C6F> 0] TJ\nET\nQ\n"));
        assert!(out.contains("/Font <<\n/F1 6 0 R\n>>"));
    }

    #[test]
    fn test_cursor_advances_by_line_height() {
        let mut d = doc();
        d.text("one", None, TextOptions::new()).unwrap();
        assert!((d.y() - (72.0 + 13.872)).abs() < 1e-9);
        assert_eq!(d.x(), 72.0);
    }

    #[test]
    fn test_no_wrap_advances_x() {
        let mut d = doc();
        d.text("ab", None, TextOptions::new().with_line_break(false))
            .unwrap();
        let expected = 72.0 + d.width_of_string("ab", &TextOptions::new()).unwrap();
        assert!((d.x() - expected).abs() < 1e-9);
        assert_eq!(d.y(), 72.0);
    }

    #[test]
    fn test_height_of_string_restores_cursor() {
        let mut d = doc();
        let text = "word ".repeat(200);
        let h = d
            .height_of_string(&text, TextOptions::new().with_width(200.0))
            .unwrap();
        assert!(h > 13.872 * 5.0);
        assert_eq!((d.x(), d.y()), (72.0, 72.0));
        // Measuring never adds pages
        assert_eq!(d.page_count(), 1);
    }

    #[test]
    fn test_long_text_paginates() {
        let mut d = doc();
        let text = "lorem ipsum dolor sit amet ".repeat(400);
        d.text(&text, None, TextOptions::new()).unwrap();
        assert!(d.page_count() > 1);
    }

    #[test]
    fn test_render_mode_and_spacing() {
        let mut d = doc();
        d.text(
            "Hi",
            None,
            TextOptions::new()
                .with_fill(true)
                .with_stroke(true)
                .with_character_spacing(1.5)
                .with_horizontal_scaling(80.0),
        )
        .unwrap();
        let out = output(d);
        assert!(out.contains("2 Tr\n1.5 Tc\n80 Tz\n"));
    }

    #[test]
    fn test_word_spacing_collapses_and_adds_advance() {
        let mut d = doc();
        d.text("a   b", None, TextOptions::new().with_word_spacing(10.0))
            .unwrap();
        let out = output(d);
        // 10pt plus a 278 unit space at 12pt: 833.333 + 278 = 1111.333 extra units
        assert!(out.contains("[<61> -1111.333333 <62> -1111.333333] TJ"));
    }

    #[test]
    fn test_right_alignment_moves_x() {
        let mut d = doc();
        d.text("Hello", None, TextOptions::new().with_align(Align::Right))
            .unwrap();
        let out = output(d);
        // 612 - 72 - width("Hello" at 12pt = 27.336)
        assert!(out.contains("1 0 0 1 512.664 711.384 Tm"));
    }

    #[test]
    fn test_alphabetic_baseline() {
        let mut d = doc();
        d.text("x", None, TextOptions::new().with_baseline(Baseline::Alphabetic))
            .unwrap();
        let out = output(d);
        assert!(out.contains("1 0 0 1 72 720 Tm"));
    }

    #[test]
    fn test_underline_and_link() {
        let mut d = doc();
        d.fill_color("#0000ff").unwrap();
        d.text(
            "link",
            None,
            TextOptions::new()
                .with_underline(true)
                .with_link("https://example.com"),
        )
        .unwrap();
        let out = output(d);
        assert!(out.contains("0 0 1 RG\n1 w\n"));
        assert!(out.contains("/Subtype /Link"));
    }

    #[test]
    fn test_continued_keeps_line() {
        let mut d = doc();
        d.text("Hello ", None, TextOptions::new().with_continued(true))
            .unwrap();
        assert_eq!(d.y(), 72.0);
        d.text("there", None, TextOptions::new()).unwrap();
        let out = output(d);
        assert!(out.contains("[<48656C6C6F20> 0] TJ"));
        assert!(out.contains("[<7468657265> 0] TJ"));
    }

    #[test]
    fn test_text_without_page() {
        let mut d =
            PdfDocument::new(DocumentOptions::default().with_auto_first_page(false)).unwrap();
        assert!(matches!(
            d.text("x", None, TextOptions::new()),
            Err(Error::NoCurrentPage)
        ));
    }
}
