//! MyMemory translation API: the fallback provider.
//!
//! MyMemory answers most failures with HTTP 200 and reports the real outcome
//! in `responseStatus`, which may be a number or a numeric string.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ProviderError, TranslationProvider, TranslationRequest};
use crate::retry::{with_retry_if, RetryConfig};

pub const DEFAULT_API_URL: &str = "https://api.mymemory.translated.net/get";

const PROVIDER: &str = "mymemory";

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    fn status(&self) -> Option<u16> {
        match &self.response_status {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn details(&self) -> String {
        match &self.response_details {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Client for the fallback translation service.
#[derive(Debug, Clone)]
pub struct MyMemoryClient {
    client: reqwest::Client,
    api_url: String,
    /// Registered contact address; raises the anonymous daily quota
    contact_email: Option<String>,
    retry: RetryConfig,
}

impl MyMemoryClient {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        contact_email: Option<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            contact_email,
            retry: RetryConfig::provider_call(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let langpair = format!("{}|{}", request.source_language, request.target_language);
        let mut query: Vec<(&str, &str)> = vec![
            ("q", request.text.as_str()),
            ("langpair", langpair.as_str()),
        ];
        if let Some(email) = self.contact_email.as_deref().filter(|e| !e.trim().is_empty()) {
            query.push(("de", email));
        }

        let parsed = with_retry_if(
            &self.retry,
            &format!("MyMemory translation to {}", request.target_language),
            || async {
                let response = self
                    .client
                    .get(&self.api_url)
                    .query(&query)
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

                let parsed: MyMemoryResponse =
                    response.json().await.map_err(|e| ProviderError::Parse {
                        provider: PROVIDER,
                        message: e.to_string(),
                    })?;

                // A 200 envelope can still carry a quota or language-pair failure
                match parsed.status() {
                    Some(200) => Ok(parsed),
                    Some(status) => Err(ProviderError::Http {
                        provider: PROVIDER,
                        status,
                        body: parsed.details(),
                    }),
                    None => Err(ProviderError::Parse {
                        provider: PROVIDER,
                        message: format!("unexpected responseStatus {}", parsed.response_status),
                    }),
                }
            },
            ProviderError::is_retryable,
        )
        .await?;

        parsed
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}
