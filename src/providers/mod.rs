//! Network translation providers.
//!
//! - `google`: Google Cloud Translation v2, the primary provider
//! - `mymemory`: MyMemory, the fallback provider
//! - `mock`: scripted providers for tests
//!
//! Providers are plain values built from configuration and handed to the
//! [`Translator`](crate::translation::Translator); none of them hold shared
//! mutable state, so one instance serves every concurrent request.

use async_trait::async_trait;
use thiserror::Error;

pub mod google;
pub mod mock;
pub mod mymemory;

pub use google::GoogleTranslateClient;
pub use mock::{MockBehavior, MockProvider};
pub use mymemory::MyMemoryClient;

/// A single text to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    /// ISO 639-1 code of the text's language
    pub source_language: String,
    /// ISO 639-1 code to translate into
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Why a provider could not produce a translation.
///
/// The orchestrator treats every variant the same way (fall through to the
/// next tier); the distinction only matters for retry decisions and logs.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: no API key configured")]
    MissingApiKey { provider: &'static str },

    #[error("{provider}: API error ({status}): {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider}: request failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: failed to parse response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    #[error("{provider}: response contained no translation")]
    EmptyResponse { provider: &'static str },

    #[error("{provider}: no response within {seconds:.1}s")]
    Timeout { provider: &'static str, seconds: f64 },
}

impl ProviderError {
    /// Transient failures worth retrying against the same provider:
    /// rate limits, server errors and network errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Network { .. } | ProviderError::Timeout { .. } => true,
            ProviderError::MissingApiKey { .. }
            | ProviderError::Parse { .. }
            | ProviderError::EmptyResponse { .. } => false,
        }
    }
}

/// A network translation service.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Provider name for logs and metrics
    fn name(&self) -> &'static str;

    /// Translate one text.
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Translate several texts sharing one language pair, preserving order.
    ///
    /// The default issues one `translate` call per text; providers with a
    /// native batch endpoint override it.
    async fn translate_many(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut translated = Vec::with_capacity(texts.len());
        for text in texts {
            let request = TranslationRequest::new(text.as_str(), source_language, target_language);
            translated.push(self.translate(&request).await?);
        }
        Ok(translated)
    }
}
