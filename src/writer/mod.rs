//! Low-level PDF output.
//!
//! ```text
//! PdfDocument
//!     ↓
//! [PdfPage] (content stream, resources, page dictionary)
//!     ↓
//! [PdfWriter] (object allocation, byte offsets, xref and trailer)
//!     ↓
//! [ObjectSerializer] (values → PDF syntax)
//!     ↓
//! PDF bytes
//! ```
//!
//! Objects are handed out by [`PdfWriter::alloc`] and written to the sink as
//! soon as they are ended, so a document never holds more than its open
//! pages in memory.

pub mod color;
pub mod content_stream;
pub mod graphics_state;
pub mod name_tree;
pub mod object_serializer;
pub mod page;
mod pdf_writer;
mod reference;

pub use color::{Color, ColorValue};
pub use content_stream::{ContentStreamOp, FillRule, LineCap, LineJoin, Matrix};
pub use graphics_state::ExtGStateBuilder;
pub use name_tree::{NameTree, NumberTree};
pub use object_serializer::ObjectSerializer;
pub use page::{Margins, PageOptions, PageSize, PdfPage};
pub use pdf_writer::{PdfWriter, Trailer};
pub use reference::PdfReference;
