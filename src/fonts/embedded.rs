//! Embedded TrueType/OpenType fonts.
//!
//! Text is shaped with rustybuzz so kerning, ligatures and mark positioning
//! come from the font's own tables. Shaped runs are cached per word. At
//! embed time the font program is cut down to the glyphs used and written
//! as a Type0 font with an Identity-H CIDFontType2 descendant.

use super::font_subsetter::{subset_font_name, FontSubsetter};
use super::truetype_parser::{self, FontMetrics};
use super::{GlyphPosition, TextEncoding};
use crate::error::{Error, Result};
use crate::object::{dictionary as dict, Dictionary, Object, ObjectRef};
use crate::writer::PdfWriter;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ShapedGlyph {
    id: u16,
    code_points: Vec<u32>,
    position: GlyphPosition,
}

#[derive(Debug, Clone, Default)]
struct ShapedRun {
    glyphs: Vec<ShapedGlyph>,
    advance_width: f64,
}

/// A font program that will be subset and embedded in the output.
#[derive(Debug)]
pub struct EmbeddedFont {
    data: Arc<Vec<u8>>,
    index: u32,
    metrics: FontMetrics,
    subsetter: FontSubsetter,
    layout_cache: HashMap<String, Arc<ShapedRun>>,
}

impl EmbeddedFont {
    /// Load a font program. `family` picks a face out of a collection.
    pub fn from_data(data: Vec<u8>, family: Option<&str>) -> Result<Self> {
        let index = truetype_parser::face_index(&data, family)?;
        let face = truetype_parser::parse_face(&data, index)?;
        let metrics = FontMetrics::from_face(&face);
        let notdef_width = truetype_parser::glyph_advance(&face, 0, metrics.scale);
        drop(face);

        if rustybuzz::Face::from_slice(&data, index).is_none() {
            return Err(Error::Font("font cannot be shaped".to_string()));
        }

        log::debug!(
            "loaded embedded font {} ({} units/em)",
            metrics.postscript_name,
            metrics.units_per_em
        );
        Ok(Self {
            data: Arc::new(data),
            index,
            metrics,
            subsetter: FontSubsetter::new(notdef_width),
            layout_cache: HashMap::new(),
        })
    }

    /// PostScript name.
    pub fn name(&self) -> &str {
        &self.metrics.postscript_name
    }

    /// Font-wide metrics.
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Number of glyphs in the subset so far.
    pub fn subset_glyph_count(&self) -> usize {
        self.subsetter.glyph_count()
    }

    fn shape(&self, text: &str) -> Result<ShapedRun> {
        let data = Arc::clone(&self.data);
        let face = rustybuzz::Face::from_slice(&data, self.index)
            .ok_or_else(|| Error::Font("font cannot be shaped".to_string()))?;
        let metrics_face = truetype_parser::parse_face(&data, self.index)?;
        let scale = self.metrics.scale;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&face, &[], buffer);
        let infos = output.glyph_infos();
        let positions = output.glyph_positions();

        // Cluster values are byte offsets into `text`.
        let mut starts: Vec<usize> = infos.iter().map(|i| i.cluster as usize).collect();
        starts.sort_unstable();
        starts.dedup();
        let cluster_text = |cluster: usize| -> Vec<u32> {
            let end = starts
                .iter()
                .copied()
                .find(|&s| s > cluster)
                .unwrap_or(text.len());
            text.get(cluster..end)
                .map(|s| s.chars().map(|c| c as u32).collect())
                .unwrap_or_default()
        };

        let mut run = ShapedRun::default();
        let mut seen_clusters = std::collections::HashSet::new();
        for (info, pos) in infos.iter().zip(positions) {
            let id = info.glyph_id as u16;
            let cluster = info.cluster as usize;
            let code_points = if seen_clusters.insert(cluster) {
                cluster_text(cluster)
            } else {
                Vec::new()
            };
            let position = GlyphPosition {
                x_advance: pos.x_advance as f64 * scale,
                y_advance: pos.y_advance as f64 * scale,
                x_offset: pos.x_offset as f64 * scale,
                y_offset: pos.y_offset as f64 * scale,
                advance_width: truetype_parser::glyph_advance(&metrics_face, id, scale),
            };
            run.advance_width += position.x_advance;
            run.glyphs.push(ShapedGlyph {
                id,
                code_points,
                position,
            });
        }
        Ok(run)
    }

    fn layout_cached(&mut self, text: &str) -> Result<Arc<ShapedRun>> {
        if let Some(run) = self.layout_cache.get(text) {
            log::trace!("layout cache hit for {:?}", text);
            return Ok(Arc::clone(run));
        }
        let run = Arc::new(self.shape(text)?);
        self.layout_cache.insert(text.to_string(), Arc::clone(&run));
        Ok(run)
    }

    /// Shape text, splitting after spaces and tabs so words can be cached.
    fn layout(&mut self, text: &str) -> Result<Vec<Arc<ShapedRun>>> {
        let mut runs = Vec::new();
        let mut last = 0;
        for (i, c) in text.char_indices() {
            if c == ' ' || c == '\t' {
                let end = i + c.len_utf8();
                runs.push(self.layout_cached(&text[last..end])?);
                last = end;
            }
        }
        if last < text.len() {
            runs.push(self.layout_cached(&text[last..])?);
        }
        Ok(runs)
    }

    /// Encode text as four-digit hex subset ids with per-glyph positions.
    pub fn encode(&mut self, text: &str) -> Result<TextEncoding> {
        let runs = self.layout(text)?;
        let mut encoding = TextEncoding::default();
        for run in runs {
            for glyph in &run.glyphs {
                let sid = self.subsetter.include_glyph(
                    glyph.id,
                    glyph.position.advance_width,
                    &glyph.code_points,
                );
                encoding.glyphs.push(format!("{:04X}", sid));
                encoding.positions.push(glyph.position);
            }
        }
        Ok(encoding)
    }

    /// Width of `text` at `size`, from shaped advances.
    pub fn width_of_string(&mut self, text: &str, size: f64) -> Result<f64> {
        let width: f64 = self.layout(text)?.iter().map(|r| r.advance_width).sum();
        Ok(width * size / 1000.0)
    }

    /// Write the font program, descriptor, descendant font and ToUnicode map,
    /// then fill in and end the Type0 dictionary `dictionary`.
    pub fn embed<W: Write>(
        &self,
        id: &str,
        dictionary: ObjectRef,
        writer: &mut PdfWriter<W>,
    ) -> Result<()> {
        // Content streams already refer to subset ids, so the full program
        // cannot stand in for a failed subset.
        let program = self.subsetter.subset(&self.data, self.index)?;
        log::debug!(
            "embedding {} with {} glyphs",
            self.name(),
            self.subsetter.glyph_count()
        );
        let font_file = writer.alloc(Dictionary::new());
        writer.write_to(font_file, &program)?;
        writer.end(font_file)?;

        let m = &self.metrics;
        let name = subset_font_name(id, &m.postscript_name);
        let descriptor = writer.alloc(dict(vec![
            ("Type", Object::name("FontDescriptor")),
            ("FontName", Object::name(name.clone())),
            ("Flags", Object::from(m.font_flags())),
            (
                "FontBBox",
                Object::Array(m.bbox.iter().map(|v| Object::Real(*v)).collect()),
            ),
            ("ItalicAngle", Object::Real(m.italic_angle)),
            ("Ascent", Object::Real(m.ascender)),
            ("Descent", Object::Real(m.descender)),
            ("CapHeight", Object::Real(m.cap_height)),
            ("XHeight", Object::Real(m.x_height)),
            ("StemV", Object::Integer(0)),
            ("FontFile2", Object::Reference(font_file)),
        ]));
        writer.end(descriptor)?;

        let widths = self
            .subsetter
            .widths()
            .into_iter()
            .map(Object::Real)
            .collect();
        let descendant = writer.alloc(dict(vec![
            ("Type", Object::name("Font")),
            ("Subtype", Object::name("CIDFontType2")),
            ("BaseFont", Object::name(name.clone())),
            (
                "CIDSystemInfo",
                Object::dict(vec![
                    ("Registry", Object::string("Adobe")),
                    ("Ordering", Object::string("Identity")),
                    ("Supplement", Object::Integer(0)),
                ]),
            ),
            ("FontDescriptor", Object::Reference(descriptor)),
            (
                "W",
                Object::Array(vec![Object::Integer(0), Object::Array(widths)]),
            ),
            ("CIDToGIDMap", Object::name("Identity")),
        ]));
        writer.end(descendant)?;

        let cmap = writer.alloc(Dictionary::new());
        writer.write_to(cmap, self.subsetter.tounicode_cmap().as_bytes())?;
        writer.end(cmap)?;

        let data = writer.data_mut(dictionary)?;
        data.insert("Type".into(), Object::name("Font"));
        data.insert("Subtype".into(), Object::name("Type0"));
        data.insert("BaseFont".into(), Object::name(name));
        data.insert("Encoding".into(), Object::name("Identity-H"));
        data.insert(
            "DescendantFonts".into(),
            Object::Array(vec![Object::Reference(descendant)]),
        );
        data.insert("ToUnicode".into(), Object::Reference(cmap));
        writer.end(dictionary)
    }
}
