//! Document-wide configuration.

use crate::error::Result;
use crate::writer::page::{Margins, PageSize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported output versions.
pub const PDF_VERSIONS: [&str; 5] = ["1.3", "1.4", "1.5", "1.6", "1.7"];

/// Metadata for the info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Keywords
    pub keywords: Option<String>,
    /// Application that created the content
    pub creator: Option<String>,
    /// Application that produced the file
    pub producer: Option<String>,
}

impl DocumentInfo {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the keywords.
    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creator.
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the producer.
    pub fn producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }
}

/// Options for a new document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Deflate stream bodies
    pub compress: bool,
    /// Version written in the header
    pub pdf_version: String,
    /// Keep pages open until `flush_pages` or `end`
    pub buffer_pages: bool,
    /// Add the first page on construction
    pub auto_first_page: bool,
    /// Default page size
    pub size: PageSize,
    /// Default page margins
    pub margins: Margins,
    /// Info dictionary entries
    pub info: DocumentInfo,
    /// Creation date; the current time when unset
    #[serde(skip)]
    pub creation_date: Option<DateTime<Utc>>,
    /// Font selected on construction
    pub default_font: String,
    /// Initial font size
    pub font_size: f64,
    /// Extra space between lines of text
    pub line_gap: f64,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            compress: true,
            pdf_version: "1.3".to_string(),
            buffer_pages: false,
            auto_first_page: true,
            size: PageSize::LETTER,
            margins: Margins::default(),
            info: DocumentInfo::default(),
            creation_date: None,
            default_font: "Helvetica".to_string(),
            font_size: 12.0,
            line_gap: 0.0,
        }
    }
}

impl DocumentOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the header version. Unknown versions fall back to 1.3.
    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        if PDF_VERSIONS.contains(&version.as_str()) {
            self.pdf_version = version;
        } else {
            log::warn!("unsupported PDF version {}, using 1.3", version);
            self.pdf_version = "1.3".to_string();
        }
        self
    }

    /// Keep pages in memory so earlier pages can be revisited.
    pub fn with_buffer_pages(mut self, buffer: bool) -> Self {
        self.buffer_pages = buffer;
        self
    }

    /// Whether to add a page on construction.
    pub fn with_auto_first_page(mut self, auto: bool) -> Self {
        self.auto_first_page = auto;
        self
    }

    /// Default page size.
    pub fn with_size(mut self, size: PageSize) -> Self {
        self.size = size;
        self
    }

    /// Default margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Info dictionary entries.
    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    /// Fixed creation date, for reproducible output.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Font selected on construction.
    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }

    /// Initial font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Extra space between lines of text.
    pub fn with_line_gap(mut self, gap: f64) -> Self {
        self.line_gap = gap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DocumentOptions::default();
        assert!(options.compress);
        assert_eq!(options.pdf_version, "1.3");
        assert!(options.auto_first_page);
        assert_eq!(options.size, PageSize::LETTER);
        assert_eq!(options.margins.top, 72.0);
        assert_eq!(options.default_font, "Helvetica");
        assert_eq!(options.font_size, 12.0);
    }

    #[test]
    fn test_from_json() {
        let options = DocumentOptions::from_json(
            r#"{"compress": false, "pdfVersion": "1.7", "info": {"title": "Report"}}"#,
        )
        .unwrap();
        assert!(!options.compress);
        assert_eq!(options.pdf_version, "1.7");
        assert_eq!(options.info.title.as_deref(), Some("Report"));
        assert_eq!(options.font_size, 12.0);
    }

    #[test]
    fn test_bad_json() {
        assert!(DocumentOptions::from_json("{ nope").is_err());
    }

    #[test]
    fn test_unknown_version_falls_back() {
        let options = DocumentOptions::new().with_pdf_version("2.5");
        assert_eq!(options.pdf_version, "1.3");
    }
}
