//! Mock providers for tests.
//!
//! - `MockProvider::new(MockBehavior::Prefix("yo:"))` - always succeeds
//! - `MockProvider::failing()` - always fails with an HTTP 503
//! - `MockBehavior::Slow` / `MockBehavior::Hang` - exercise timeouts and
//!   in-flight concurrency

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ProviderError, TranslationProvider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return `prefix + text`
    Prefix(&'static str),
    /// Return the text unchanged
    Echo,
    /// Look the text up in a table; unknown texts fail with HTTP 404
    Table(HashMap<String, String>),
    /// Always fail with HTTP 503
    Failing,
    /// Succeed with an empty string
    Empty,
    /// Wait, then return `prefix + text`
    Slow {
        delay: Duration,
        prefix: &'static str,
    },
    /// Never finish within any reasonable timeout
    Hang,
}

/// Scripted provider that counts calls and tracks in-flight requests.
#[derive(Debug)]
pub struct MockProvider {
    name: &'static str,
    behavior: MockBehavior,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<TranslationRequest>>,
    call_log: Option<Arc<Mutex<Vec<&'static str>>>>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            name: "mock",
            behavior,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            call_log: None,
        }
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn table<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(MockBehavior::Table(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    /// Set the name reported to logs and to the shared call log.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Append this provider's name to `log` on every call, so tests can
    /// assert the order in which several providers were tried.
    pub fn with_call_log(mut self, log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        self.call_log = Some(log);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn respond(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        match &self.behavior {
            MockBehavior::Prefix(prefix) | MockBehavior::Slow { prefix, .. } => {
                Ok(format!("{}{}", prefix, request.text))
            }
            MockBehavior::Echo => Ok(request.text.clone()),
            MockBehavior::Table(table) => {
                table
                    .get(&request.text)
                    .cloned()
                    .ok_or_else(|| ProviderError::Http {
                        provider: self.name,
                        status: 404,
                        body: format!("no scripted translation for '{}'", request.text),
                    })
            }
            MockBehavior::Failing => Err(ProviderError::Http {
                provider: self.name,
                status: 503,
                body: "Service Unavailable".to_string(),
            }),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Hang => Err(ProviderError::Timeout {
                provider: self.name,
                seconds: 0.0,
            }),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(log) = &self.call_log {
            if let Ok(mut log) = log.lock() {
                log.push(self.name);
            }
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Slow { delay, .. } => tokio::time::sleep(*delay).await,
            MockBehavior::Hang => tokio::time::sleep(Duration::from_secs(3600)).await,
            _ => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.respond(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest::new(text, "en", "yo")
    }

    #[tokio::test]
    async fn test_prefix_behavior() {
        let provider = MockProvider::new(MockBehavior::Prefix("yo:"));
        let result = provider.translate(&request("Hello")).await;
        assert_eq!(result.unwrap(), "yo:Hello");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_behavior() {
        let provider = MockProvider::failing();
        let result = provider.translate(&request("Hello")).await;
        assert!(matches!(result, Err(ProviderError::Http { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_table_behavior() {
        let provider = MockProvider::table([("Hello", "Bawo")]);
        assert_eq!(provider.translate(&request("Hello")).await.unwrap(), "Bawo");
        assert!(matches!(
            provider.translate(&request("Bye")).await,
            Err(ProviderError::Http { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_call_log_records_names_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = MockProvider::failing()
            .named("first")
            .with_call_log(log.clone());
        let second = MockProvider::new(MockBehavior::Echo)
            .named("second")
            .with_call_log(log.clone());

        let _ = first.translate(&request("a")).await;
        let _ = second.translate(&request("a")).await;

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let provider = MockProvider::new(MockBehavior::Echo);
        provider.translate(&request("Hello")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target_language, "yo");
    }
}
