//! Google Cloud Translation (v2, basic edition): the primary provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderError, TranslationProvider, TranslationRequest};
use crate::retry::{with_retry_if, RetryConfig};

pub const DEFAULT_API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

const PROVIDER: &str = "google";

/// The v2 endpoint accepts at most 128 `q` entries per request
const MAX_BATCH_SIZE: usize = 128;

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a [&'a str],
    source: &'a str,
    target: &'a str,
    /// "text" keeps the service from HTML-escaping its output
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for the primary translation service.
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl GoogleTranslateClient {
    /// Create a client. A missing key is not an error here: every call fails
    /// with [`ProviderError::MissingApiKey`] and the chain falls through.
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key,
            retry: RetryConfig::provider_call(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Translate up to `MAX_BATCH_SIZE` texts in one request.
    async fn send(
        &self,
        texts: &[&str],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey { provider: PROVIDER })?;

        let body = TranslateBody {
            q: texts,
            source: source_language,
            target: target_language,
            format: "text",
        };

        let translations = with_retry_if(
            &self.retry,
            &format!("Google translation to {}", target_language),
            || async {
                let response = self
                    .client
                    .post(&self.api_url)
                    .query(&[("key", api_key)])
                    .json(&body)
                    .send()
                    .await
                    .map_err(|source| ProviderError::Network {
                        provider: PROVIDER,
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                    return Err(ProviderError::Http {
                        provider: PROVIDER,
                        status: status.as_u16(),
                        body,
                    });
                }

                let parsed: TranslateResponse =
                    response.json().await.map_err(|e| ProviderError::Parse {
                        provider: PROVIDER,
                        message: e.to_string(),
                    })?;

                Ok(parsed.data.translations)
            },
            ProviderError::is_retryable,
        )
        .await?;

        if translations.len() != texts.len() {
            return Err(ProviderError::Parse {
                provider: PROVIDER,
                message: format!(
                    "expected {} translations, got {}",
                    texts.len(),
                    translations.len()
                ),
            });
        }

        translations
            .into_iter()
            .zip(texts)
            .map(|(translation, original)| {
                if translation.translated_text.trim().is_empty() && !original.trim().is_empty() {
                    Err(ProviderError::EmptyResponse { provider: PROVIDER })
                } else {
                    Ok(translation.translated_text)
                }
            })
            .collect()
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let mut translated = self
            .send(
                &[request.text.as_str()],
                &request.source_language,
                &request.target_language,
            )
            .await?;

        translated
            .pop()
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }

    async fn translate_many(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut translated = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            let chunk: Vec<&str> = chunk.iter().map(String::as_str).collect();
            debug!(
                "Sending {} texts to Google ({} -> {})",
                chunk.len(),
                source_language,
                target_language
            );
            translated.extend(self.send(&chunk, source_language, target_language).await?);
        }

        Ok(translated)
    }
}
