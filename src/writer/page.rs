//! Pages: geometry, resources and the content stream.

use super::content_stream::Matrix;
use super::PdfWriter;
use crate::error::Result;
use crate::object::{dictionary, Dictionary, Object, ObjectRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl PageSize {
    /// US Letter, 8.5 × 11 in.
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);
    /// US Legal, 8.5 × 14 in.
    pub const LEGAL: PageSize = PageSize::new(612.0, 1008.0);
    /// ISO A3.
    pub const A3: PageSize = PageSize::new(841.89, 1190.55);
    /// ISO A4.
    pub const A4: PageSize = PageSize::new(595.28, 841.89);
    /// ISO A5.
    pub const A5: PageSize = PageSize::new(419.53, 595.28);

    /// Size from width and height.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Look up a named paper size, case-insensitively.
    pub fn named(name: &str) -> Option<PageSize> {
        match name.to_ascii_uppercase().as_str() {
            "LETTER" => Some(Self::LETTER),
            "LEGAL" => Some(Self::LEGAL),
            "A3" => Some(Self::A3),
            "A4" => Some(Self::A4),
            "A5" => Some(Self::A5),
            _ => None,
        }
    }

    /// The same size turned sideways.
    pub fn landscape(self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top
    pub top: f64,
    /// Left
    pub left: f64,
    /// Bottom
    pub bottom: f64,
    /// Right
    pub right: f64,
}

impl Margins {
    /// The same margin on every side.
    pub const fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            left: margin,
            bottom: margin,
            right: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

/// Per-page overrides of the document defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Page size
    pub size: Option<PageSize>,
    /// Margins
    pub margins: Option<Margins>,
}

impl PageOptions {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_size(mut self, size: PageSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }
}

/// An open page.
///
/// The page dictionary, its resources and its content stream are allocated
/// when the page is created and written when it is ended.
#[derive(Debug)]
pub struct PdfPage {
    size: PageSize,
    margins: Margins,
    dictionary: ObjectRef,
    resources: ObjectRef,
    content: ObjectRef,
    fonts: IndexMap<String, ObjectRef>,
    ext_gstates: IndexMap<String, ObjectRef>,
    annotations: Vec<ObjectRef>,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
}

impl PdfPage {
    /// Allocate the page's objects under `parent`.
    pub fn new<W: Write>(
        writer: &mut PdfWriter<W>,
        parent: ObjectRef,
        size: PageSize,
        margins: Margins,
    ) -> Self {
        let content = writer.alloc(Dictionary::new());
        let resources = writer.alloc(dictionary(vec![(
            "ProcSet",
            Object::Array(
                ["PDF", "Text", "ImageB", "ImageC", "ImageI"]
                    .iter()
                    .map(|n| Object::name(*n))
                    .collect(),
            ),
        )]));
        let dictionary = writer.alloc(dictionary(vec![
            ("Type", Object::name("Page")),
            ("Parent", Object::Reference(parent)),
            (
                "MediaBox",
                Object::rect(0.0, 0.0, size.width, size.height),
            ),
            ("Contents", Object::Reference(content)),
            ("Resources", Object::Reference(resources)),
        ]));
        Self {
            size,
            margins,
            dictionary,
            resources,
            content,
            fonts: IndexMap::new(),
            ext_gstates: IndexMap::new(),
            annotations: Vec::new(),
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
        }
    }

    /// Page width.
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Page height.
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Margins.
    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    /// Lowest y text may reach.
    pub fn max_y(&self) -> f64 {
        self.size.height - self.margins.bottom
    }

    /// The page dictionary.
    pub fn dictionary(&self) -> ObjectRef {
        self.dictionary
    }

    /// The content stream.
    pub fn content(&self) -> ObjectRef {
        self.content
    }

    /// Current transformation matrix.
    pub fn ctm(&self) -> Matrix {
        self.ctm
    }

    /// Record a `cm` applied to the content stream.
    pub fn concat_ctm(&mut self, m: &Matrix) {
        self.ctm = self.ctm.concat(m);
    }

    /// Record a `q`.
    pub fn push_ctm(&mut self) {
        self.ctm_stack.push(self.ctm);
    }

    /// Record a `Q`. An unbalanced restore leaves the matrix unchanged.
    pub fn pop_ctm(&mut self) {
        if let Some(m) = self.ctm_stack.pop() {
            self.ctm = m;
        } else {
            log::warn!("restore without matching save");
        }
    }

    /// Add a font to the page resources.
    pub fn add_font(&mut self, id: &str, r: ObjectRef) {
        self.fonts.entry(id.to_string()).or_insert(r);
    }

    /// Add a graphics state to the page resources.
    pub fn add_ext_gstate(&mut self, name: &str, r: ObjectRef) {
        self.ext_gstates.entry(name.to_string()).or_insert(r);
    }

    /// Attach an annotation.
    pub fn add_annotation(&mut self, r: ObjectRef) {
        self.annotations.push(r);
    }

    /// Append a line to the content stream.
    pub fn write<W: Write>(&self, writer: &mut PdfWriter<W>, line: &str) -> Result<()> {
        writer.write_line_to(self.content, line)
    }

    /// Write the page dictionary, resources and content stream.
    pub fn end<W: Write>(self, writer: &mut PdfWriter<W>) -> Result<()> {
        if !self.annotations.is_empty() {
            let annots = self
                .annotations
                .iter()
                .map(|r| Object::Reference(*r))
                .collect();
            writer
                .data_mut(self.dictionary)?
                .insert("Annots".into(), Object::Array(annots));
        }
        writer.end(self.dictionary)?;

        let resources = writer.data_mut(self.resources)?;
        if !self.fonts.is_empty() {
            resources.insert("Font".into(), references(&self.fonts));
        }
        if !self.ext_gstates.is_empty() {
            resources.insert("ExtGState".into(), references(&self.ext_gstates));
        }
        writer.end(self.resources)?;
        writer.end(self.content)
    }
}

fn references(map: &IndexMap<String, ObjectRef>) -> Object {
    Object::Dictionary(
        map.iter()
            .map(|(k, r)| (k.clone(), Object::Reference(*r)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_sizes() {
        assert_eq!(PageSize::named("letter"), Some(PageSize::LETTER));
        assert_eq!(PageSize::named("A4"), Some(PageSize::A4));
        assert_eq!(PageSize::named("B99"), None);
        assert_eq!(PageSize::LETTER.landscape(), PageSize::new(792.0, 612.0));
    }

    #[test]
    fn test_page_objects() {
        let mut writer = PdfWriter::new(Vec::new(), false);
        let parent = writer.alloc(Dictionary::new());
        let mut page = PdfPage::new(&mut writer, parent, PageSize::LETTER, Margins::default());
        assert_eq!(writer.object_count(), 4);
        assert_eq!(page.max_y(), 720.0);

        page.add_font("F1", ObjectRef::new(9, 0));
        page.add_font("F1", ObjectRef::new(10, 0));
        page.write(&mut writer, "0 0 m").unwrap();
        page.end(&mut writer).unwrap();
        assert_eq!(writer.pending(), 1);

        let out = String::from_utf8_lossy(&writer_bytes(writer, parent)).to_string();
        assert!(out.contains("/MediaBox [0 0 612 792]"));
        assert!(out.contains("/Font <<\n/F1 9 0 R\n>>"));
        assert!(out.contains("/ProcSet [/PDF /Text /ImageB /ImageC /ImageI]"));
        assert!(out.contains("stream\n0 0 m\n\nendstream"));
    }

    #[test]
    fn test_ctm_stack() {
        let mut writer = PdfWriter::new(Vec::new(), false);
        let parent = writer.alloc(Dictionary::new());
        let mut page = PdfPage::new(&mut writer, parent, PageSize::LETTER, Margins::default());
        page.push_ctm();
        page.concat_ctm(&Matrix::translation(5.0, 5.0));
        assert_eq!(page.ctm().apply(0.0, 0.0), (5.0, 5.0));
        page.pop_ctm();
        assert!(page.ctm().is_identity());
        page.pop_ctm();
        assert!(page.ctm().is_identity());
    }

    fn writer_bytes(mut writer: PdfWriter<Vec<u8>>, parent: ObjectRef) -> Vec<u8> {
        writer.end(parent).unwrap();
        let info = writer.alloc(Dictionary::new());
        writer.end(info).unwrap();
        writer
            .request_completion(crate::writer::Trailer {
                root: parent,
                info,
                id: [0; 16],
            })
            .unwrap();
        writer.into_inner().unwrap()
    }
}
