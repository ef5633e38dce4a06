//! The document: pages, fonts, text and graphics on top of the streaming writer.
//!
//! A [`PdfDocument`] writes its header as soon as it is created and streams
//! every object to the sink as it is finished. Pages are written when the
//! next page is added unless page buffering is on, in which case they stay
//! open until [`PdfDocument::flush_pages`] or [`PdfDocument::end`].
//!
//! ```ignore
//! use pdf_forge::{DocumentOptions, PdfDocument, TextOptions};
//!
//! let mut doc = PdfDocument::new(DocumentOptions::default())?;
//! doc.font_size(18.0).text("Hello, World!", Some((72.0, 72.0)), TextOptions::new())?;
//! doc.write_to_file("hello.pdf")?;
//! ```

pub mod annotations;
pub(crate) mod fonts;
pub mod options;
pub mod text;
pub mod vector;

pub use annotations::Destination;
pub use options::{DocumentInfo, DocumentOptions};

use crate::error::{Error, Result};
use crate::object::{dictionary, Dictionary, Object, ObjectRef};
use crate::text::{LineWrapper, TextOptions};
use crate::writer::color::ColorValue;
use crate::writer::graphics_state::ExtGStateRegistry;
use crate::writer::name_tree::NameTree;
use crate::writer::page::{PageOptions, PdfPage};
use crate::writer::{PdfWriter, Trailer};
use chrono::Utc;
use fonts::FontRegistry;
use md5::{Digest, Md5};
use std::io::Write;
use std::path::Path;

/// Pages currently held open by page buffering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// Index of the first buffered page
    pub start: usize,
    /// Number of buffered pages
    pub count: usize,
}

/// A PDF document being written to `W`.
pub struct PdfDocument<W: Write = Vec<u8>> {
    writer: PdfWriter<W>,
    options: DocumentOptions,
    root: ObjectRef,
    pages: ObjectRef,
    kids: Vec<ObjectRef>,
    names: Option<ObjectRef>,
    destinations: NameTree,
    info: Dictionary,
    file_id: [u8; 16],
    page_buffer: Vec<PdfPage>,
    buffered_start: usize,
    current_page: Option<usize>,
    x: f64,
    y: f64,
    line_gap: f64,
    fonts: FontRegistry,
    ext_gstates: ExtGStateRegistry,
    fill_color: Option<ColorValue>,
    wrapper: Option<LineWrapper>,
    text_options: Option<TextOptions>,
    ended: bool,
}

impl PdfDocument<Vec<u8>> {
    /// Create a document that writes into memory.
    pub fn new(options: DocumentOptions) -> Result<Self> {
        Self::with_writer(Vec::new(), options)
    }

    /// End the document and write it to `path`.
    pub fn write_to_file(mut self, path: impl AsRef<Path>) -> Result<()> {
        if !self.ended {
            self.end()?;
        }
        let bytes = self.into_inner()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl<W: Write> PdfDocument<W> {
    /// Create a document that streams into `sink`.
    pub fn with_writer(sink: W, options: DocumentOptions) -> Result<Self> {
        let mut writer = PdfWriter::new(sink, options.compress);
        writer.write_header(&options.pdf_version)?;

        let pages = writer.alloc(dictionary(vec![
            ("Type", Object::name("Pages")),
            ("Count", Object::Integer(0)),
            ("Kids", Object::Array(Vec::new())),
        ]));
        let root = writer.alloc(dictionary(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Reference(pages)),
        ]));

        let (info, file_id) = info_dictionary(&options);
        let mut doc = Self {
            writer,
            root,
            pages,
            kids: Vec::new(),
            names: None,
            destinations: NameTree::new(),
            info,
            file_id,
            page_buffer: Vec::new(),
            buffered_start: 0,
            current_page: None,
            x: 0.0,
            y: 0.0,
            line_gap: options.line_gap,
            fonts: FontRegistry::new(options.font_size),
            ext_gstates: ExtGStateRegistry::new(),
            fill_color: None,
            wrapper: None,
            text_options: None,
            ended: false,
            options,
        };

        let default_font = doc.options.default_font.clone();
        doc.font(default_font.as_str())?;
        if doc.options.auto_first_page {
            doc.add_page(None)?;
        }
        Ok(doc)
    }

    /// Options the document was created with.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Cursor x.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Cursor y, measured down from the top of the page.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move the cursor horizontally.
    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.x = x;
        self
    }

    /// Move the cursor vertically.
    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.y = y;
        self
    }

    /// Set the extra space between lines of text.
    pub fn line_gap(&mut self, gap: f64) -> &mut Self {
        self.line_gap = gap;
        self
    }

    /// Move the cursor down by `lines` lines.
    pub fn move_down(&mut self, lines: f64) -> &mut Self {
        self.y += self.current_line_height(true) * lines + self.line_gap;
        self
    }

    /// Move the cursor up by `lines` lines.
    pub fn move_up(&mut self, lines: f64) -> &mut Self {
        self.y -= self.current_line_height(true) * lines + self.line_gap;
        self
    }

    /// The page being drawn on.
    pub fn page(&self) -> Option<&PdfPage> {
        self.current_page.and_then(|i| self.page_buffer.get(i))
    }

    pub(crate) fn page_or_err(&self) -> Result<&PdfPage> {
        self.page().ok_or(Error::NoCurrentPage)
    }

    pub(crate) fn page_mut(&mut self) -> Result<&mut PdfPage> {
        self.current_page
            .and_then(|i| self.page_buffer.get_mut(i))
            .ok_or(Error::NoCurrentPage)
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Whether [`end`](Self::end) has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Append an operator line to the current page's content stream.
    pub fn add_content(&mut self, line: &str) -> Result<&mut Self> {
        let page = self
            .current_page
            .and_then(|i| self.page_buffer.get(i))
            .ok_or(Error::NoCurrentPage)?;
        page.write(&mut self.writer, line)?;
        Ok(self)
    }

    /// Start a new page, using the document defaults for anything `options`
    /// leaves unset.
    pub fn add_page(&mut self, options: Option<PageOptions>) -> Result<&mut Self> {
        if self.ended {
            return Err(Error::AlreadyEnded);
        }
        let options = options.unwrap_or_default();
        let size = options.size.unwrap_or(self.options.size);
        let margins = options.margins.unwrap_or(self.options.margins);

        if !self.options.buffer_pages {
            self.flush_pages()?;
        }

        let page = PdfPage::new(&mut self.writer, self.pages, size, margins);
        self.kids.push(page.dictionary());
        self.page_buffer.push(page);
        self.current_page = Some(self.page_buffer.len() - 1);

        self.x = margins.left;
        self.y = margins.top;
        // Top-left origin with y growing downwards
        self.transform(1.0, 0.0, 0.0, -1.0, 0.0, size.height)?;
        log::debug!("added page {} ({}x{})", self.kids.len(), size.width, size.height);
        Ok(self)
    }

    /// Add a page with the same size and margins as the current one.
    pub fn continue_on_new_page(&mut self) -> Result<&mut Self> {
        let options = self.page().map(|p| PageOptions {
            size: Some(crate::writer::page::PageSize::new(p.width(), p.height())),
            margins: Some(*p.margins()),
        });
        self.add_page(options)
    }

    /// Pages still open for drawing.
    pub fn buffered_page_range(&self) -> PageRange {
        PageRange {
            start: self.buffered_start,
            count: self.page_buffer.len(),
        }
    }

    /// Make an earlier, still buffered page current.
    pub fn switch_to_page(&mut self, index: usize) -> Result<&mut Self> {
        let slot = index
            .checked_sub(self.buffered_start)
            .filter(|&i| i < self.page_buffer.len())
            .ok_or(Error::PageOutOfRange {
                index,
                start: self.buffered_start,
                end: self.buffered_start as isize + self.page_buffer.len() as isize - 1,
            })?;
        self.current_page = Some(slot);
        Ok(self)
    }

    /// Write all buffered pages.
    pub fn flush_pages(&mut self) -> Result<&mut Self> {
        let pages: Vec<PdfPage> = self.page_buffer.drain(..).collect();
        self.buffered_start += pages.len();
        self.current_page = None;
        for page in pages {
            page.end(&mut self.writer)?;
        }
        Ok(self)
    }

    /// Finish the document: write pending pages, the info dictionary, fonts,
    /// the catalog and page tree, and finally the xref table and trailer.
    pub fn end(&mut self) -> Result<()> {
        if self.ended {
            return Err(Error::AlreadyEnded);
        }
        self.ended = true;
        self.wrapper = None;
        self.flush_pages()?;

        let info = self.writer.alloc(self.info.clone());
        self.writer.end(info)?;

        self.fonts.finalize_all(&mut self.writer)?;

        if let Some(names) = self.names {
            let dests = self.destinations.to_object()?;
            self.writer.data_mut(names)?.insert("Dests".into(), dests);
        }
        self.writer.end(self.root)?;

        let kids = self.kids.iter().map(|r| Object::Reference(*r)).collect();
        let pages = self.writer.data_mut(self.pages)?;
        pages.insert("Count".into(), Object::from(self.kids.len()));
        pages.insert("Kids".into(), Object::Array(kids));
        self.writer.end(self.pages)?;

        if let Some(names) = self.names {
            self.writer.end(names)?;
        }

        self.writer.request_completion(Trailer {
            root: self.root,
            info,
            id: self.file_id,
        })
    }

    /// Recover the sink after [`end`](Self::end).
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner()
    }

    /// End the document and return the sink.
    pub fn finish(mut self) -> Result<W> {
        if !self.ended {
            self.end()?;
        }
        self.into_inner()
    }

    /// The catalog's `Names` dictionary, created on first use.
    pub(crate) fn names_dictionary(&mut self) -> Result<ObjectRef> {
        if let Some(names) = self.names {
            return Ok(names);
        }
        let names = self.writer.alloc(Dictionary::new());
        self.writer
            .data_mut(self.root)?
            .insert("Names".into(), Object::Reference(names));
        self.names = Some(names);
        Ok(names)
    }
}

/// Build the info dictionary and the file identifier.
///
/// The identifier is the MD5 of the creation time in milliseconds followed
/// by one `Key: value` line per info entry.
fn info_dictionary(options: &DocumentOptions) -> (Dictionary, [u8; 16]) {
    let created = options.creation_date.unwrap_or_else(Utc::now);
    let info = &options.info;
    let producer = info
        .producer
        .clone()
        .unwrap_or_else(|| crate::NAME.to_string());
    let creator = info
        .creator
        .clone()
        .unwrap_or_else(|| crate::NAME.to_string());

    let mut entries: Vec<(&str, Object, String)> = vec![
        ("Producer", Object::string(producer.clone()), producer),
        ("Creator", Object::string(creator.clone()), creator),
        (
            "CreationDate",
            Object::Date(created),
            created.timestamp_millis().to_string(),
        ),
    ];
    for (key, value) in [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Keywords", &info.keywords),
    ] {
        if let Some(v) = value {
            entries.push((key, Object::string(v.clone()), v.clone()));
        }
    }

    let mut hasher = Md5::new();
    hasher.update(format!("{}\n", created.timestamp_millis()).as_bytes());
    let mut dict = Dictionary::new();
    for (key, object, text) in entries {
        hasher.update(format!("{}: {}\n", key, text).as_bytes());
        dict.insert(key.to_string(), object);
    }
    (dict, hasher.finalize().into())
}
