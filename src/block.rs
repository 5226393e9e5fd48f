//! Text blocks as they come out of the extraction step.
//!
//! Extraction itself happens outside this crate (MuPDF, pdfplumber, ...). Its output is
//! handed over as a [BlockManifest], a small JSON document listing every page's size and
//! the text blocks found on it, in reading order:
//!
//! ```json
//! {
//!   "fonts": { "serif": "fonts/NotoSerif-Regular.ttf" },
//!   "pages": [
//!     {
//!       "width": 612, "height": 792,
//!       "blocks": [
//!         { "bbox": [72, 72, 540, 110], "lines": ["Hello", "world"], "font": "serif", "size": 12 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Boxes use the extractor's top-left origin and are converted to PDF user space on the
//! way in.

use crate::error::{ReflowError, Result};
use crate::rect::Rect;
use crate::units::Pt;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Font size used for blocks the extractor couldn't find a size for
pub const DEFAULT_FONT_SIZE: Pt = Pt(11.0);

/// A run of text occupying a fixed box on a page
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock<F> {
    /// 0-based index of the page the block sits on
    pub page_index: usize,
    /// Where the text was, in PDF user space
    pub bbox: Rect,
    pub text: String,
    /// Handle of the font the block was set in
    pub font: F,
    /// The size the block was originally set at
    pub base_font_size: Pt,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockManifest {
    /// Font name to font file. Relative paths are resolved against the manifest's directory.
    #[serde(default)]
    pub fonts: BTreeMap<String, PathBuf>,
    /// The font for blocks that don't name one; the first font by name if unset
    #[serde(default)]
    pub default_font: Option<String>,
    pub pages: Vec<ManifestPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestPage {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub blocks: Vec<ManifestBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestBlock {
    /// `[x0, y0, x1, y1]` with the origin at the top-left of the page
    pub bbox: [f32; 4],
    pub lines: Vec<String>,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub size: Option<f32>,
}

impl BlockManifest {
    pub fn from_json(json: &str) -> Result<BlockManifest> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest from disk, resolving relative font paths against its directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<BlockManifest> {
        let path = path.as_ref();
        let mut manifest = BlockManifest::from_json(&std::fs::read_to_string(path)?)?;
        if let Some(dir) = path.parent() {
            for font in manifest.fonts.values_mut() {
                if font.is_relative() {
                    *font = dir.join(&*font);
                }
            }
        }
        Ok(manifest)
    }

    /// Name of the font used by blocks that don't specify one
    pub fn default_font_name(&self) -> Option<&str> {
        self.default_font
            .as_deref()
            .or_else(|| self.fonts.keys().next().map(String::as_str))
    }

    /// Collects the blocks of every page, in page order and then extraction order.
    ///
    /// `resolve_font` maps a font name to the caller's font handle. Blocks with no
    /// visible text are skipped; a block with an unusable box or size is an error.
    pub fn blocks<F, R>(&self, mut resolve_font: R) -> Result<Vec<TextBlock<F>>>
    where
        R: FnMut(&str) -> Option<F>,
    {
        let mut blocks = Vec::new();
        for (page_index, page) in self.pages.iter().enumerate() {
            for block in page.blocks.iter() {
                let text = block
                    .lines
                    .iter()
                    .filter(|line| !line.trim().is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n");
                let text = text.trim();
                if text.is_empty() {
                    debug!(page_index, "skipping block without text");
                    continue;
                }

                let [x0, y0, x1, y1] = block.bbox;
                let bbox = Rect::from_top_left(x0, y0, x1, y1, Pt(page.height));
                if bbox.is_degenerate() {
                    return Err(ReflowError::InvalidBlock {
                        page_index,
                        reason: format!("box {:?} has no area", block.bbox),
                    });
                }

                let base_font_size = block.size.map(Pt).unwrap_or(DEFAULT_FONT_SIZE);
                if !base_font_size.is_positive() {
                    return Err(ReflowError::InvalidBlock {
                        page_index,
                        reason: format!("font size {base_font_size} is not positive"),
                    });
                }

                let font_name = block
                    .font
                    .as_deref()
                    .or_else(|| self.default_font_name())
                    .ok_or_else(|| ReflowError::FontMissing("<default>".to_string()))?;
                let font = resolve_font(font_name)
                    .ok_or_else(|| ReflowError::FontMissing(font_name.to_string()))?;

                blocks.push(TextBlock {
                    page_index,
                    bbox,
                    text: text.to_string(),
                    font,
                    base_font_size,
                });
            }
        }
        Ok(blocks)
    }
}
