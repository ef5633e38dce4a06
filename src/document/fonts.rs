//! Font selection for a document.

use super::PdfDocument;
use crate::error::{Error, Result};
use crate::fonts::{FontSource, PdfFont};
use crate::writer::PdfWriter;
use std::collections::HashMap;
use std::io::Write;

/// Fonts opened by a document, keyed by source, family and PostScript name.
///
/// Each opened font gets the next resource id (`F1`, `F2`, ...). Selecting
/// a source that is already open reuses it.
#[derive(Debug, Default)]
pub(crate) struct FontRegistry {
    fonts: Vec<PdfFont>,
    families: HashMap<String, usize>,
    registered: HashMap<String, (FontSource, Option<String>)>,
    current: Option<usize>,
    count: usize,
    size: f64,
}

impl FontRegistry {
    pub(crate) fn new(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub(crate) fn register(&mut self, name: &str, source: FontSource, family: Option<&str>) {
        self.registered
            .insert(name.to_string(), (source, family.map(str::to_string)));
    }

    pub(crate) fn select(&mut self, source: FontSource, family: Option<&str>) -> Result<()> {
        let registered = match &source {
            FontSource::Name(name) => self
                .registered
                .get(name)
                .cloned()
                .map(|(src, fam)| (src, fam, name.clone())),
            _ => None,
        };
        let (source, family, cache_key) = match registered {
            Some((src, fam, name)) => (src, fam, Some(name)),
            None => {
                let key = family.map(str::to_string).or_else(|| source.cache_key());
                (source, family.map(str::to_string), key)
            },
        };

        if let Some(&index) = cache_key.as_ref().and_then(|k| self.families.get(k)) {
            self.current = Some(index);
            return Ok(());
        }

        self.count += 1;
        let id = format!("F{}", self.count);
        let font = PdfFont::open(&source, family.as_deref(), &id)?;

        // Same font loaded from a different source, e.g. raw bytes
        if let Some(&index) = self.families.get(font.name()) {
            self.current = Some(index);
            if let Some(key) = cache_key {
                self.families.insert(key, index);
            }
            return Ok(());
        }

        let index = self.fonts.len();
        log::debug!("opened font {} as {}", font.name(), id);
        if let Some(key) = cache_key {
            self.families.insert(key, index);
        }
        self.families.insert(font.name().to_string(), index);
        self.fonts.push(font);
        self.current = Some(index);
        Ok(())
    }

    pub(crate) fn current(&self) -> Result<&PdfFont> {
        self.current
            .and_then(|i| self.fonts.get(i))
            .ok_or_else(|| Error::Font("no font selected".to_string()))
    }

    pub(crate) fn current_mut(&mut self) -> Result<&mut PdfFont> {
        self.current
            .and_then(|i| self.fonts.get_mut(i))
            .ok_or_else(|| Error::Font("no font selected".to_string()))
    }

    pub(crate) fn size(&self) -> f64 {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    pub(crate) fn finalize_all<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> Result<()> {
        for font in &mut self.fonts {
            font.finalize(writer)?;
        }
        Ok(())
    }
}

impl<W: Write> PdfDocument<W> {
    /// Select a font: a standard font name, a registered name, a file path
    /// or font data.
    pub fn font(&mut self, source: impl Into<FontSource>) -> Result<&mut Self> {
        self.fonts.select(source.into(), None)?;
        Ok(self)
    }

    /// Select a face by name from a font collection.
    pub fn font_with_family(
        &mut self,
        source: impl Into<FontSource>,
        family: &str,
    ) -> Result<&mut Self> {
        self.fonts.select(source.into(), Some(family))?;
        Ok(self)
    }

    /// Set the font size.
    pub fn font_size(&mut self, size: f64) -> &mut Self {
        self.fonts.set_size(size);
        self
    }

    /// Make a font available under `name` for later [`font`](Self::font) calls.
    pub fn register_font(
        &mut self,
        name: &str,
        source: impl Into<FontSource>,
        family: Option<&str>,
    ) -> &mut Self {
        self.fonts.register(name, source.into(), family);
        self
    }

    /// The selected font.
    pub fn current_font(&self) -> Result<&PdfFont> {
        self.fonts.current()
    }

    /// The selected font size.
    pub fn current_font_size(&self) -> f64 {
        self.fonts.size()
    }

    /// Line height of the selected font at the selected size.
    pub fn current_line_height(&self, include_gap: bool) -> f64 {
        self.fonts
            .current()
            .map(|f| f.line_height(self.fonts.size(), include_gap))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentOptions;

    #[test]
    fn test_font_ids_and_cache() {
        let mut registry = FontRegistry::new(12.0);
        registry.select("Helvetica".into(), None).unwrap();
        assert_eq!(registry.current().unwrap().id(), "F1");
        registry.select("Times-Roman".into(), None).unwrap();
        assert_eq!(registry.current().unwrap().id(), "F2");
        registry.select("Helvetica".into(), None).unwrap();
        assert_eq!(registry.current().unwrap().id(), "F1");
        assert_eq!(registry.fonts.len(), 2);
    }

    #[test]
    fn test_registered_font() {
        let mut registry = FontRegistry::new(12.0);
        registry.register("Heading", "Helvetica-Bold".into(), None);
        registry.select("Heading".into(), None).unwrap();
        assert_eq!(registry.current().unwrap().name(), "Helvetica-Bold");
        registry.select("Heading".into(), None).unwrap();
        assert_eq!(registry.fonts.len(), 1);
    }

    #[test]
    fn test_document_font_api() {
        let mut doc = PdfDocument::new(DocumentOptions::default()).unwrap();
        assert_eq!(doc.current_font().unwrap().name(), "Helvetica");
        doc.font("Courier").unwrap().font_size(10.0);
        assert_eq!(doc.current_font().unwrap().name(), "Courier");
        assert_eq!(doc.current_font_size(), 10.0);
        assert!(doc.font("NotAFont").is_err());
    }
}
