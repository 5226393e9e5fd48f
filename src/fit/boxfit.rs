use super::wrap::wrap_lines;
use crate::error::{ReflowError, Result};
use crate::measure::{CachedMeasure, Measure};
use crate::rect::Rect;
use crate::units::Pt;

/// How much the font size drops between two attempts of [fit_text_to_box]
pub const FONT_SIZE_STEP: f32 = 0.5;

/// Knobs for [fit_text_to_box]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    /// The smallest font size that will be tried before giving up and overflowing
    pub min_font_size: Pt,
    /// Estimated line height as a multiple of the font size. This stands in for real
    /// ascent + descent + leading and may need recalibrating for other fonts.
    pub line_height_factor: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            min_font_size: Pt(6.0),
            line_height_factor: 1.2,
        }
    }
}

/// Text wrapped to fit a box, along with the size it has to be set at
#[derive(Debug, Clone, PartialEq)]
pub struct Fitted {
    /// The wrapped lines. Empty strings are blank paragraph separators.
    pub lines: Vec<String>,
    pub font_size: Pt,
    /// Distance between two consecutive baselines
    pub line_height: Pt,
    /// Set when even the minimum font size didn't make the text fit vertically
    pub overflows: bool,
}

impl Fitted {
    /// The wrapped lines joined by `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Estimated height of the block; always at least one line tall
    pub fn estimated_height(&self) -> Pt {
        self.line_height * self.lines.len().max(1) as f32
    }
}

/// Finds the largest font size, starting at `base_size` and going down in steps of
/// [FONT_SIZE_STEP], at which `text` wrapped to the width of `bbox` is no taller than
/// `bbox`.
///
/// The height of a wrapping is estimated as `lines * size * line_height_factor`. If
/// nothing down to `min_font_size` fits, the wrapping at `min_font_size` is returned
/// with [Fitted::overflows] set; that is a soft failure for the caller to deal with,
/// not an error. When `base_size` is already below `min_font_size`, `base_size` is
/// used as the floor so the result is never larger than what was asked for.
///
/// Text without any visible characters is returned at `base_size` straight away.
///
/// `bbox` must have a positive width and height.
pub fn fit_text_to_box<M: Measure + ?Sized>(
    text: &str,
    font: &M,
    base_size: Pt,
    bbox: Rect,
    options: &FitOptions,
) -> Result<Fitted> {
    if !base_size.is_positive() {
        return Err(ReflowError::InvalidFontSize(base_size.0));
    }
    if !options.min_font_size.is_positive() {
        return Err(ReflowError::InvalidFontSize(options.min_font_size.0));
    }
    debug_assert!(!bbox.is_degenerate(), "cannot fit text into {bbox:?}");

    let font = CachedMeasure::new(font);
    let max_width = bbox.width();
    let max_height = bbox.height();
    let floor = options.min_font_size.min(base_size);

    let wrap_at = |size: Pt| {
        let lines = wrap_lines(text, &font, size, max_width);
        Fitted {
            lines,
            font_size: size,
            line_height: size * options.line_height_factor,
            overflows: false,
        }
    };

    if text.trim().is_empty() {
        return Ok(wrap_at(base_size));
    }

    // Sizes whose single line is already taller than the box never fit.
    let tallest = f64::from(max_height.0) / f64::from(options.line_height_factor);
    let skipped = ((f64::from(base_size.0) - tallest) / f64::from(FONT_SIZE_STEP)).floor();
    let mut step = if skipped > 0.0 { skipped as u64 } else { 0 };
    loop {
        let size = Pt((f64::from(base_size.0) - f64::from(FONT_SIZE_STEP) * step as f64) as f32);
        if size < floor {
            break;
        }

        let fitted = wrap_at(size);
        if fitted.estimated_height() <= max_height {
            return Ok(fitted);
        }
        step += 1;
    }

    let mut fitted = wrap_at(floor);
    fitted.overflows = fitted.estimated_height() > max_height;
    Ok(fitted)
}
