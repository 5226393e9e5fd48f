use super::{TranslationConfig, Translator};
use crate::error::{ReflowError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

/// LibreTranslate answers with `translatedText`, some compatible services with `translation`
#[derive(Debug, Default, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    translation: Option<String>,
}

impl TranslateResponse {
    fn into_text(self) -> String {
        self.translated_text
            .filter(|t| !t.is_empty())
            .or(self.translation)
            .unwrap_or_default()
    }
}

/// A [Translator] for LibreTranslate-compatible HTTP APIs.
///
/// Rate limiting (429) and server errors (5xx) are retried with exponential backoff,
/// starting at one second; any other failure is returned straight away.
#[derive(Clone)]
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    backoff: Duration,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(HttpTranslator {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            backoff: INITIAL_BACKOFF,
        })
    }

    /// Wait `backoff` before the first retry, doubling it for every retry after that
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn send(&self, body: &TranslateRequest<'_>) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ReflowError::Translation {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranslateResponse = response.json()?;
        Ok(parsed.into_text())
    }
}

fn is_retryable(err: &ReflowError) -> bool {
    match err {
        ReflowError::Translation { status, .. } => *status == 429 || *status >= 500,
        ReflowError::Http(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}

impl Translator for HttpTranslator {
    fn translate_chunk(&self, chunk: &str, source: Option<&str>, target: &str) -> Result<String> {
        let body = TranslateRequest {
            q: chunk,
            source: source.unwrap_or("auto"),
            target,
            format: "text",
        };

        let mut attempt = 1;
        loop {
            match self.send(&body) {
                Ok(text) => return Ok(text),
                Err(err) if attempt < MAX_ATTEMPTS && is_retryable(&err) => {
                    let delay = self.backoff * (1 << (attempt - 1));
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "translation request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
