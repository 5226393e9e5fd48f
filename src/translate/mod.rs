//! Getting text translated.
//!
//! The actual translation is done by an external service behind the [Translator] trait.
//! This module handles what sits around it: configuration, splitting long texts into
//! chunks the service accepts, pacing requests and stitching the results back together.

mod http;

pub use http::*;

use crate::error::{ReflowError, Result};
use crate::fit::paragraphs;
use std::time::Duration;
use tracing::debug;

/// The public LibreTranslate instance
pub const DEFAULT_ENDPOINT: &str = "https://libretranslate.com/translate";
pub const DEFAULT_TARGET_LANG: &str = "et";
/// Longest chunk of text sent in a single request, in bytes
pub const DEFAULT_CHUNK_LIMIT: usize = 4000;

/// Where and how to translate
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Source language code, or `None` to let the service detect it
    pub source_lang: Option<String>,
    pub target_lang: String,
    /// Pause after every request, to stay under the service's rate limit
    pub rate_limit: Duration,
    pub chunk_limit: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            source_lang: None,
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            rate_limit: Duration::ZERO,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
        }
    }
}

impl TranslationConfig {
    /// Reads the configuration from the environment, loading a `.env` file first if one
    /// is present.
    ///
    /// | variable             | default                                |
    /// |----------------------|----------------------------------------|
    /// | `TRANSLATE_ENDPOINT` | `https://libretranslate.com/translate` |
    /// | `TRANSLATE_API_KEY`  | none                                   |
    /// | `SOURCE_LANG`        | none (auto-detect)                     |
    /// | `TARGET_LANG`        | `et`                                   |
    /// | `RATE_LIMIT_S`       | `0`                                    |
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable lookup; empty values count as unset
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        let defaults = TranslationConfig::default();

        let rate_limit = match var("RATE_LIMIT_S") {
            Some(value) => {
                let seconds: f64 = value.trim().parse().map_err(|_| {
                    ReflowError::Config(format!("RATE_LIMIT_S must be a number, got `{value}`"))
                })?;
                Duration::try_from_secs_f64(seconds).map_err(|_| {
                    ReflowError::Config(format!("RATE_LIMIT_S must not be negative, got `{value}`"))
                })?
            }
            None => defaults.rate_limit,
        };

        Ok(TranslationConfig {
            endpoint: var("TRANSLATE_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: var("TRANSLATE_API_KEY"),
            source_lang: var("SOURCE_LANG"),
            target_lang: var("TARGET_LANG").unwrap_or(defaults.target_lang),
            rate_limit,
            chunk_limit: defaults.chunk_limit,
        })
    }
}

/// A service that translates one chunk of text at a time
pub trait Translator {
    /// Translate `chunk` into `target`. `source` is `None` when the source language
    /// should be detected.
    fn translate_chunk(&self, chunk: &str, source: Option<&str>, target: &str) -> Result<String>;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate_chunk(&self, chunk: &str, source: Option<&str>, target: &str) -> Result<String> {
        (**self).translate_chunk(chunk, source, target)
    }
}

/// Splits `text` into chunks of whole lines no longer than `limit` bytes each, counting
/// one byte for every line break. A single line longer than `limit` becomes a chunk of
/// its own. Lines are split the way [paragraphs] splits them, and joining the chunks with `\n`
/// gives back those lines.
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for line in paragraphs(text) {
        if !current.is_empty() && current_len + line.len() + 1 > limit {
            chunks.push(current.join("\n"));
            current.clear();
            current_len = 0;
        }
        current.push(line);
        current_len += line.len() + 1;
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

/// Translates `text` chunk by chunk, keeping the chunks in order and joining the
/// translations with line breaks. Text without anything visible in it is returned as-is
/// without bothering the translator.
pub fn translate_text<T: Translator + ?Sized>(
    translator: &T,
    text: &str,
    config: &TranslationConfig,
) -> Result<String> {
    if text.trim().is_empty() {
        return Ok(text.to_string());
    }

    let chunks = chunk_text(text, config.chunk_limit);
    let mut translated: Vec<String> = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        debug!(chunk = i, of = chunks.len(), bytes = chunk.len(), "translating chunk");
        translated.push(translator.translate_chunk(
            chunk,
            config.source_lang.as_deref(),
            &config.target_lang,
        )?);
        if !config.rate_limit.is_zero() {
            std::thread::sleep(config.rate_limit);
        }
    }

    Ok(translated.join("\n"))
}
