//! Reflows translated text back into the boxes it was extracted from.
//!
//! When a page is translated, every block of text changes length. This crate takes each
//! block's translation and finds a wrapping and font size that put it back inside the
//! block's original rectangle, then renders the result as an overlay PDF to stamp over
//! the source pages.
//!
//! The interesting part lives in [fit]; the rest is plumbing around it:
//!
//! ```text
//! BlockManifest ──> TextBlock ──> translate_text ──> fit_text_to_box ──> Document
//!   (extraction)                   (Translator)        (Measure)        (DocumentEditor)
//! ```

mod colour;
pub use colour::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod measure;
pub use measure::*;

mod page;
pub use page::*;

mod rect;
pub use rect::*;

mod units;
pub use units::*;

pub(crate) mod content;
pub(crate) mod refs;

/// Extracted text blocks and the manifest they are read from
pub mod block;

/// Breaking, wrapping and fitting text into boxes
pub mod fit;

pub mod pipeline;

pub mod translate;

/// Re-export PDF-writer functionality
pub use pdf_writer;
