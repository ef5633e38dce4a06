//! Text layout.
//!
//! - [`options`]: per-call layout and rendering settings
//! - [`line_wrapper`]: line breaking, columns and pagination
//! - [`emitter`]: operator construction for laid-out lines
//! - [`hyphenation`]: soft hyphen and whitespace helpers

pub mod emitter;
pub mod hyphenation;
pub mod line_wrapper;
pub mod options;

pub use line_wrapper::{LineInfo, LineWrapper, WrapHost};
pub use options::{Align, Baseline, LinkTarget, TextOptions, TextStyle, DEFAULT_ELLIPSIS};
