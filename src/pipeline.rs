//! Translate, fit and write back, one block at a time.

use crate::{
    block::{BlockManifest, TextBlock},
    document::{Document, DocumentEditor},
    fit::{fit_text_to_box, FitOptions},
    translate::{translate_text, TranslationConfig, Translator},
    Result,
};
use tracing::{debug, info, warn};

/// What happened over a [Pipeline::run]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReflowReport {
    /// Blocks written back
    pub blocks: usize,
    /// Blocks that had to be set smaller than their original size
    pub shrunk: usize,
    /// Blocks that don't fit even at the minimum font size and spill out of their box
    pub overflowed: usize,
}

/// Runs every block through translation and fitting and writes the result back into the
/// document at the block's original position.
///
/// Blocks are handled strictly in the order given and independently of each other: the
/// layout of one block never affects another.
pub struct Pipeline<'a, T: Translator + ?Sized> {
    translator: &'a T,
    config: &'a TranslationConfig,
    fit: FitOptions,
}

impl<'a, T: Translator + ?Sized> Pipeline<'a, T> {
    pub fn new(translator: &'a T, config: &'a TranslationConfig) -> Self {
        Pipeline {
            translator,
            config,
            fit: FitOptions::default(),
        }
    }

    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    pub fn run<E: DocumentEditor>(
        &self,
        editor: &mut E,
        blocks: &[TextBlock<E::FontId>],
    ) -> Result<ReflowReport> {
        let mut report = ReflowReport::default();

        for (i, block) in blocks.iter().enumerate() {
            let translated = translate_text(self.translator, &block.text, self.config)?;

            let fitted = {
                let font = editor.font(block.font)?;
                fit_text_to_box(&translated, font, block.base_font_size, block.bbox, &self.fit)?
            };

            debug!(
                block = i,
                page = block.page_index,
                lines = fitted.lines.len(),
                size = fitted.font_size.0,
                "fitted block"
            );
            if fitted.font_size < block.base_font_size {
                report.shrunk += 1;
            }
            if fitted.overflows {
                report.overflowed += 1;
                warn!(
                    block = i,
                    page = block.page_index,
                    size = fitted.font_size.0,
                    "text doesn't fit its box even at the minimum size"
                );
            }

            editor.replace_block(block.page_index, block.bbox, &fitted, block.font)?;
            report.blocks += 1;
        }

        info!(
            blocks = report.blocks,
            shrunk = report.shrunk,
            overflowed = report.overflowed,
            "reflow finished"
        );
        Ok(report)
    }
}

/// Loads the manifest's fonts, builds an overlay with one page per manifest page and runs
/// all of the manifest's blocks through a [Pipeline] into it.
pub fn reflow_manifest<T: Translator + ?Sized>(
    manifest: &BlockManifest,
    translator: &T,
    config: &TranslationConfig,
    fit: FitOptions,
) -> Result<(Document, ReflowReport)> {
    let (mut document, font_ids) = Document::from_manifest(manifest)?;
    let blocks = manifest.blocks(|name| font_ids.get(name).copied())?;
    info!(blocks = blocks.len(), pages = document.pages.len(), "reflowing manifest");

    let report = Pipeline::new(translator, config)
        .with_fit_options(fit)
        .run(&mut document, &blocks)?;
    Ok((document, report))
}
