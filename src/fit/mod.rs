//! Fitting text into a fixed box.
//!
//! Three layers, each built on the one below:
//!
//! - [`break_long_word`](crate::fit::break_long_word) splits a word too wide for a line
//!   into pieces that fit
//! - [`wrap_lines`](crate::fit::wrap_lines) greedily packs words into lines, keeping
//!   paragraph breaks
//! - [`fit_text_to_box`](crate::fit::fit_text_to_box) shrinks the font until the
//!   wrapped text is short enough for the box
//!
//! Everything here is pure: given the same [Measure](crate::Measure) the same inputs
//! always produce the same output, and nothing is shared between calls.
//!
//! # Example
//!
//! ```
//! use pdf_reflow::fit::{fit_text_to_box, FitOptions};
//! use pdf_reflow::{Measure, Pt, Rect};
//!
//! // a stand-in monospaced font, every character is half an em wide
//! struct Mono;
//! impl Measure for Mono {
//!     fn measure(&self, text: &str, size: Pt) -> Pt {
//!         size * (text.chars().count() as f32 * 0.5)
//!     }
//! }
//!
//! let bbox = Rect::new(Pt(72.0), Pt(600.0), Pt(272.0), Pt(640.0));
//! let fitted = fit_text_to_box("Tere, maailm!", &Mono, Pt(12.0), bbox, &FitOptions::default())
//!     .expect("valid font size");
//! assert_eq!(fitted.font_size, Pt(12.0));
//! assert_eq!(fitted.lines, vec!["Tere, maailm!"]);
//! ```

mod boxfit;
mod breaker;
mod wrap;

pub use boxfit::*;
pub use breaker::*;
pub use wrap::*;
