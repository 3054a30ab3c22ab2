//! End-to-end document translation: walk, batch, write back.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::batch::{BatchProgress, BatchReport, BatchTranslator};
use crate::config::Config;
use crate::document::{collect_translatable_units, Document, DocumentError, NodeId, TranslationSession};
use crate::i18n::{DictionaryError, Language, LanguageError, StaticDictionary, TranslationMetrics};
use crate::providers::{GoogleTranslateClient, MyMemoryClient, TranslationProvider};
use crate::translation::Translator;

/// Failures that stop a document pass before any unit is translated.
///
/// Once a batch has started nothing is surfaced: per-unit problems are
/// absorbed by the fallback chain or counted in the [`BatchReport`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error("failed to load dictionary: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Translates whole documents through a [`BatchTranslator`].
#[derive(Clone)]
pub struct DocumentTranslator {
    batch: BatchTranslator,
}

impl DocumentTranslator {
    pub fn new(batch: BatchTranslator) -> Self {
        Self { batch }
    }

    /// Wire providers, dictionary and metrics from configuration.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        let primary: Arc<dyn TranslationProvider> = Arc::new(GoogleTranslateClient::new(
            client.clone(),
            config.translate_api_url.clone(),
            config.translate_api_key.clone(),
        ));
        let fallback: Arc<dyn TranslationProvider> = Arc::new(MyMemoryClient::new(
            client,
            config.fallback_api_url.clone(),
            config.fallback_contact_email.clone(),
        ));
        let dictionary = Arc::new(StaticDictionary::load(config.dictionary_path.as_deref())?);

        if config.translate_api_key.is_none() {
            warn!("TRANSLATE_API_KEY not set, primary provider will be skipped");
        }

        let translator = Translator::new(primary, fallback, dictionary)
            .with_source_language(config.source_language)
            .with_provider_timeout(config.provider_timeout)
            .with_metrics(Arc::new(TranslationMetrics::new()));

        Ok(Self::new(BatchTranslator::new(
            Arc::new(translator),
            config.batch_size,
        )))
    }

    pub fn translator(&self) -> &Arc<Translator> {
        self.batch.translator()
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        self.batch.translator().metrics()
    }

    /// Start a live session translating into `target_code`.
    pub fn start_session(&self, target_code: &str) -> Result<TranslationSession, PipelineError> {
        let target = Language::from_code(target_code)?;
        Ok(TranslationSession::new(
            target,
            self.batch.translator().source_language(),
        ))
    }

    /// Translate every text leaf under `root` in place.
    ///
    /// Only an invalid `target_code` is an error; the document is untouched in
    /// that case.
    pub async fn translate_document<F>(
        &self,
        doc: &mut Document,
        root: NodeId,
        target_code: &str,
        on_progress: F,
    ) -> Result<BatchReport, PipelineError>
    where
        F: FnMut(BatchProgress),
    {
        let target = Language::from_code(target_code)?;
        let units = collect_translatable_units(doc, root);
        info!("Translating {} text leaves into {}", units.len(), target.name());

        let report = self
            .batch
            .translate_batch(&units, target, None, doc, on_progress)
            .await;
        log_report(&report);
        Ok(report)
    }

    /// Re-armed pass for a live document: translate only the leaves this
    /// session has not written yet.
    pub async fn translate_rendered<F>(
        &self,
        session: &mut TranslationSession,
        doc: &mut Document,
        root: NodeId,
        on_progress: F,
    ) -> BatchReport
    where
        F: FnMut(BatchProgress),
    {
        let target = session.target();
        let source = session.source();
        let units = session.pending_units(doc, root);
        if units.is_empty() {
            return BatchReport::default();
        }
        info!("Translating {} newly rendered leaves into {}", units.len(), target.name());

        let mut writer = session.writer(doc);
        let report = self
            .batch
            .translate_batch(&units, target, Some(source), &mut writer, on_progress)
            .await;
        log_report(&report);
        report
    }

    /// Parse `html`, translate its text and serialize it back.
    pub async fn translate_html<F>(
        &self,
        html: &str,
        target_code: &str,
        on_progress: F,
    ) -> Result<(String, BatchReport), PipelineError>
    where
        F: FnMut(BatchProgress),
    {
        // Validate before paying for the parse
        Language::from_code(target_code)?;

        let mut doc = Document::parse_html(html)?;
        let root = doc.root();
        let report = self
            .translate_document(&mut doc, root, target_code, on_progress)
            .await?;
        Ok((doc.to_html(), report))
    }
}

fn log_report(report: &BatchReport) {
    let outcomes = &report.outcomes;
    info!(
        "Batch done: {}/{} units (primary {}, fallback {}, dictionary {}, untranslated {}, skipped {})",
        report.completed,
        report.total,
        outcomes.primary,
        outcomes.fallback,
        outcomes.dictionary,
        outcomes.untranslated,
        outcomes.skipped
    );
    if report.write_failures > 0 {
        warn!("{} translated units could not be written back", report.write_failures);
    }
}
