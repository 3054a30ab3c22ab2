use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::i18n::{Language, StaticDictionary, TranslationMetrics};
use crate::providers::{ProviderError, TranslationProvider, TranslationRequest};

/// Upper bound on a single provider call, retries included.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Which tier of the fallback chain produced a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationOutcome {
    /// Blank text or same source and target language; no tier was tried
    Skipped,
    Primary,
    Fallback,
    Dictionary,
    /// Every tier came up empty; the original text is returned
    Untranslated,
}

/// The result of running one text through the chain.
///
/// There is no failure variant: the worst case is the original text with
/// [`TranslationOutcome::Untranslated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub outcome: TranslationOutcome,
}

impl Translation {
    fn new(text: impl Into<String>, outcome: TranslationOutcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}

/// Resolves a text through primary provider -> fallback provider -> static
/// dictionary, first success wins.
///
/// All collaborators are injected and read-only, so one `Translator` can be
/// shared across every concurrent request of a batch.
pub struct Translator {
    primary: Arc<dyn TranslationProvider>,
    fallback: Arc<dyn TranslationProvider>,
    dictionary: Arc<StaticDictionary>,
    source_language: Language,
    provider_timeout: Duration,
    metrics: Arc<TranslationMetrics>,
}

impl Translator {
    pub fn new(
        primary: Arc<dyn TranslationProvider>,
        fallback: Arc<dyn TranslationProvider>,
        dictionary: Arc<StaticDictionary>,
    ) -> Self {
        Self {
            primary,
            fallback,
            dictionary,
            source_language: Language::canonical(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            metrics: Arc::new(TranslationMetrics::new()),
        }
    }

    /// Language assumed when a caller does not name one.
    pub fn with_source_language(mut self, language: Language) -> Self {
        self.source_language = language;
        self
    }

    pub fn with_provider_timeout(mut self, provider_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<TranslationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    /// Translate `text` into `target`.
    ///
    /// Blank text and identical source/target languages return the input
    /// unchanged without touching any provider. Otherwise each tier is tried
    /// in order and a failing tier only moves the text on to the next one.
    pub async fn translate(
        &self,
        text: &str,
        target: Language,
        source: Option<Language>,
    ) -> Translation {
        let source = source.unwrap_or(self.source_language);

        if text.trim().is_empty() || source == target {
            return self.finish(Translation::new(text, TranslationOutcome::Skipped));
        }

        let request = TranslationRequest::new(text, source.code(), target.code());

        match self.attempt(self.primary.as_ref(), &request).await {
            Ok(translated) => {
                return self.finish(Translation::new(translated, TranslationOutcome::Primary));
            }
            Err(e) => {
                self.metrics.record_primary_failure();
                debug!("Primary provider failed, trying fallback: {}", e);
            }
        }

        match self.attempt(self.fallback.as_ref(), &request).await {
            Ok(translated) => {
                return self.finish(Translation::new(translated, TranslationOutcome::Fallback));
            }
            Err(e) => {
                self.metrics.record_fallback_failure();
                debug!("Fallback provider failed, using dictionary: {}", e);
            }
        }

        let translation = match self.dictionary.substitute(text, target) {
            Some(substituted) => Translation::new(substituted, TranslationOutcome::Dictionary),
            None => Translation::new(text, TranslationOutcome::Untranslated),
        };
        self.finish(translation)
    }

    /// One provider call bounded by the provider timeout.
    async fn attempt(
        &self,
        provider: &dyn TranslationProvider,
        request: &TranslationRequest,
    ) -> Result<String, ProviderError> {
        debug!(
            "Translating {} chars with {} ({} -> {})",
            request.text.chars().count(),
            provider.name(),
            request.source_language,
            request.target_language
        );

        let translated = timeout(self.provider_timeout, provider.translate(request))
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: provider.name(),
                seconds: self.provider_timeout.as_secs_f64(),
            })??;

        if translated.trim().is_empty() {
            return Err(ProviderError::EmptyResponse {
                provider: provider.name(),
            });
        }

        Ok(translated)
    }

    fn finish(&self, translation: Translation) -> Translation {
        self.metrics.record_outcome(translation.outcome);
        translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::DictionaryTables;
    use crate::providers::{MockBehavior, MockProvider};
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn yoruba_dictionary(entries: &[(&str, &str)]) -> Arc<StaticDictionary> {
        let mut tables = DictionaryTables::new();
        tables.insert(
            "yo".to_string(),
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        Arc::new(StaticDictionary::from_tables(tables).expect("Should build"))
    }

    fn translator(
        primary: &Arc<MockProvider>,
        fallback: &Arc<MockProvider>,
        dictionary: Arc<StaticDictionary>,
    ) -> Translator {
        Translator::new(primary.clone(), fallback.clone(), dictionary)
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Should build runtime")
    }

    // ==================== Short-circuit Tests ====================

    #[tokio::test]
    async fn test_same_language_returns_input_without_calls() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("p:")));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        let result = translator
            .translate("Community", Language::YORUBA, Some(Language::YORUBA))
            .await;

        assert_eq!(result.text, "Community");
        assert_eq!(result.outcome, TranslationOutcome::Skipped);
        assert_eq!(primary.call_count(), 0);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn test_default_source_equal_to_target_is_skipped() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("p:")));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        let result = translator.translate("Hello", Language::ENGLISH, None).await;

        assert_eq!(result.outcome, TranslationOutcome::Skipped);
        assert_eq!(primary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_text_returns_unchanged() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("p:")));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        for text in ["", " ", "\n\t  "] {
            let result = translator.translate(text, Language::YORUBA, None).await;
            assert_eq!(result.text, text);
            assert_eq!(result.outcome, TranslationOutcome::Skipped);
        }
        assert_eq!(primary.call_count(), 0);
        assert_eq!(fallback.call_count(), 0);
    }

    // ==================== Chain Order Tests ====================

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("p:")));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        let result = translator.translate("Book", Language::YORUBA, None).await;

        assert_eq!(result.text, "p:Book");
        assert_eq!(result.outcome, TranslationOutcome::Primary);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback_after_primary() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let primary = Arc::new(
            MockProvider::failing()
                .named("primary")
                .with_call_log(log.clone()),
        );
        let fallback = Arc::new(
            MockProvider::new(MockBehavior::Prefix("f:"))
                .named("fallback")
                .with_call_log(log.clone()),
        );
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        let result = translator.translate("Book", Language::YORUBA, None).await;

        assert_eq!(result.text, "f:Book");
        assert_eq!(result.outcome, TranslationOutcome::Fallback);
        assert_eq!(*log.lock().unwrap(), vec!["primary", "fallback"]);
    }

    #[tokio::test]
    async fn test_both_providers_fail_uses_dictionary() {
        let primary = Arc::new(MockProvider::failing());
        let fallback = Arc::new(MockProvider::failing());
        let dictionary = yoruba_dictionary(&[("Leadership", "Asiwaju")]);
        let translator = translator(&primary, &fallback, dictionary);

        let result = translator
            .translate("Leadership matters", Language::YORUBA, None)
            .await;

        assert_eq!(result.text, "Asiwaju matters");
        assert_eq!(result.outcome, TranslationOutcome::Dictionary);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn test_everything_fails_returns_original() {
        let primary = Arc::new(MockProvider::failing());
        let fallback = Arc::new(MockProvider::failing());
        let dictionary = yoruba_dictionary(&[("Leadership", "Asiwaju")]);
        let translator = translator(&primary, &fallback, dictionary);

        let result = translator
            .translate("Nothing to see", Language::YORUBA, None)
            .await;

        assert_eq!(result.text, "Nothing to see");
        assert_eq!(result.outcome, TranslationOutcome::Untranslated);
    }

    #[tokio::test]
    async fn test_empty_provider_output_falls_through() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Empty));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        let result = translator.translate("Book", Language::YORUBA, None).await;

        assert_eq!(result.outcome, TranslationOutcome::Fallback);
    }

    #[tokio::test]
    async fn test_unchanged_provider_output_is_accepted() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Echo));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        let result = translator.translate("Forum", Language::FRENCH, None).await;

        assert_eq!(result.text, "Forum");
        assert_eq!(result.outcome, TranslationOutcome::Primary);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn test_hanging_primary_times_out_to_fallback() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Hang));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()))
            .with_provider_timeout(Duration::from_millis(50));

        let start = std::time::Instant::now();
        let result = translator.translate("Book", Language::YORUBA, None).await;

        assert_eq!(result.outcome, TranslationOutcome::Fallback);
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "Timeout should cut the hanging call short, took {:?}",
            start.elapsed()
        );
    }

    // ==================== Request Tests ====================

    #[tokio::test]
    async fn test_requests_use_default_source_language() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Echo));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Echo));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

        translator.translate("Book", Language::HAUSA, None).await;

        let requests = primary.requests();
        assert_eq!(requests[0].source_language, "en");
        assert_eq!(requests[0].target_language, "ha");
    }

    #[tokio::test]
    async fn test_explicit_source_language_overrides_default() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Echo));
        let fallback = Arc::new(MockProvider::new(MockBehavior::Echo));
        let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()))
            .with_source_language(Language::FRENCH);

        translator
            .translate("Livre", Language::YORUBA, Some(Language::HAUSA))
            .await;
        translator.translate("Livre", Language::YORUBA, None).await;

        let requests = primary.requests();
        assert_eq!(requests[0].source_language, "ha");
        assert_eq!(requests[1].source_language, "fr");
    }

    // ==================== Metrics Tests ====================

    #[tokio::test]
    async fn test_metrics_record_each_tier() {
        let primary = Arc::new(MockProvider::failing());
        let fallback = Arc::new(MockProvider::table([("Book", "Iwe")]));
        let dictionary = yoruba_dictionary(&[("Leadership", "Asiwaju")]);
        let translator = translator(&primary, &fallback, dictionary);

        translator.translate("Book", Language::YORUBA, None).await;
        translator.translate("Leadership", Language::YORUBA, None).await;
        translator.translate("Unknown", Language::YORUBA, None).await;
        translator.translate("  ", Language::YORUBA, None).await;

        let metrics = translator.metrics();
        assert_eq!(metrics.primary_failures(), 3);
        assert_eq!(metrics.fallback_hits(), 1);
        assert_eq!(metrics.fallback_failures(), 2);
        assert_eq!(metrics.dictionary_hits(), 1);
        assert_eq!(metrics.untranslated(), 1);
        assert_eq!(metrics.skipped(), 1);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_same_language_is_identity(text in ".{0,40}", index in 0usize..5) {
            let languages = [
                Language::ENGLISH,
                Language::YORUBA,
                Language::HAUSA,
                Language::IGBO,
                Language::FRENCH,
            ];
            let language = languages[index];
            let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("p:")));
            let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
            let translator = translator(&primary, &fallback, yoruba_dictionary(&[("a", "b")]));

            let result = runtime().block_on(translator.translate(&text, language, Some(language)));

            prop_assert_eq!(result.text, text);
            prop_assert_eq!(primary.call_count(), 0);
            prop_assert_eq!(fallback.call_count(), 0);
        }

        #[test]
        fn prop_blank_text_makes_no_calls(text in "[ \t\r\n]{0,12}") {
            let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("p:")));
            let fallback = Arc::new(MockProvider::new(MockBehavior::Prefix("f:")));
            let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

            let result = runtime().block_on(translator.translate(&text, Language::YORUBA, None));

            prop_assert_eq!(result.text, text);
            prop_assert_eq!(primary.call_count(), 0);
            prop_assert_eq!(fallback.call_count(), 0);
        }

        #[test]
        fn prop_chain_never_loses_text(text in "[A-Za-z ]{1,30}") {
            let primary = Arc::new(MockProvider::failing());
            let fallback = Arc::new(MockProvider::failing());
            let translator = translator(&primary, &fallback, Arc::new(StaticDictionary::empty()));

            let result = runtime().block_on(translator.translate(&text, Language::IGBO, None));

            prop_assert_eq!(result.text, text);
        }
    }
}
