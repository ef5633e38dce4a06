//! Error types for document construction.
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! propagate serialization, font, layout and I/O failures with `?`.

/// Result type alias for document construction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building and writing a PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value cannot be represented as a PDF object
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Font source is neither a standard font name nor loadable font data
    #[error("Unknown font format: {0}")]
    UnsupportedFontSource(String),

    /// Font data could not be parsed, shaped or subset
    #[error("Font error: {0}")]
    Font(String),

    /// Dash pattern lengths must be positive
    #[error("Invalid dash pattern length: {0}")]
    InvalidDashPattern(f64),

    /// Byte swapping requires an even-length buffer
    #[error("Buffer length must be even, got {0}")]
    OddLengthBuffer(usize),

    /// Page index outside the buffered range
    #[error("switch_to_page({index}) out of bounds, current buffer covers pages {start} to {end}")]
    PageOutOfRange {
        /// Requested absolute page index
        index: usize,
        /// First buffered page index
        start: usize,
        /// Last buffered page index (may be below `start` when the buffer is empty)
        end: isize,
    },

    /// Link target refers to a page that was never added
    #[error("The document has no page {0}")]
    NoSuchPage(usize),

    /// Drawing was attempted while no page is open
    #[error("No current page: add a page first")]
    NoCurrentPage,

    /// `end()` was called more than once
    #[error("Document has already been ended")]
    AlreadyEnded,

    /// The writer does not know this object
    #[error("Unknown or finalized object: {0} 0 R")]
    UnknownReference(u32),

    /// Objects are still open when the output was requested
    #[error("{0} object(s) are still pending")]
    PendingObjects(usize),

    /// Color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options could not be deserialized
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),
}
