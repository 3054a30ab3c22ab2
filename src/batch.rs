use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::document::{apply_structure_safe_write, Document, DocumentError, TranslatableUnit};
use crate::i18n::Language;
use crate::translation::{Translation, TranslationOutcome, Translator};

/// Units translated concurrently before the next group starts.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Progress after a group has been written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Completed share in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// How many units each tier of the chain resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub skipped: usize,
    pub primary: usize,
    pub fallback: usize,
    pub dictionary: usize,
    pub untranslated: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: TranslationOutcome) {
        match outcome {
            TranslationOutcome::Skipped => self.skipped += 1,
            TranslationOutcome::Primary => self.primary += 1,
            TranslationOutcome::Fallback => self.fallback += 1,
            TranslationOutcome::Dictionary => self.dictionary += 1,
            TranslationOutcome::Untranslated => self.untranslated += 1,
        }
    }
}

/// Summary of one `translate_batch` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub completed: usize,
    /// Units whose leaf could not be written (detached or replaced meanwhile)
    pub write_failures: usize,
    pub outcomes: OutcomeCounts,
}

/// Destination for translated unit text.
pub trait UnitWriter {
    fn write(&mut self, unit: &TranslatableUnit, text: &str) -> Result<(), DocumentError>;
}

impl UnitWriter for Document {
    fn write(&mut self, unit: &TranslatableUnit, text: &str) -> Result<(), DocumentError> {
        apply_structure_safe_write(self, unit, text)
    }
}

/// Drives a [`Translator`] over many units in fixed-size groups.
///
/// Units inside a group are translated concurrently on the caller's task;
/// groups run one after another, and every unit of a group is written back
/// before the next group starts.
#[derive(Clone)]
pub struct BatchTranslator {
    translator: Arc<Translator>,
    group_size: usize,
}

impl BatchTranslator {
    /// A group size of 0 is treated as 1.
    pub fn new(translator: Arc<Translator>, group_size: usize) -> Self {
        Self {
            translator,
            group_size: group_size.max(1),
        }
    }

    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Translate `units` and write each result through `writer`.
    ///
    /// `on_progress` fires once per group with a strictly increasing
    /// `completed` count, the last call reporting `completed == total`.
    /// Write failures are logged and counted, never returned.
    pub async fn translate_batch<W, F>(
        &self,
        units: &[TranslatableUnit],
        target: Language,
        source: Option<Language>,
        writer: &mut W,
        mut on_progress: F,
    ) -> BatchReport
    where
        W: UnitWriter + ?Sized,
        F: FnMut(BatchProgress),
    {
        let total = units.len();
        let mut report = BatchReport {
            total,
            ..BatchReport::default()
        };

        for (index, group) in units.chunks(self.group_size).enumerate() {
            let translations: Vec<Translation> = join_all(group.iter().map(|unit| {
                self.translator
                    .translate(unit.source_text(), target, source)
            }))
            .await;

            for (unit, translation) in group.iter().zip(translations) {
                report.outcomes.record(translation.outcome);
                let text = unit.restore_padding(&translation.text);
                if let Err(e) = writer.write(unit, &text) {
                    report.write_failures += 1;
                    warn!("Skipping write-back for node {}: {}", unit.node(), e);
                }
            }

            report.completed += group.len();
            info!(
                "Translated group {} ({}/{} units)",
                index + 1,
                report.completed,
                total
            );
            on_progress(BatchProgress {
                completed: report.completed,
                total,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{collect_translatable_units, NodeId};
    use crate::i18n::{DictionaryTables, StaticDictionary};
    use crate::providers::{MockBehavior, MockProvider, TranslationProvider};
    use std::time::Duration;

    fn translator(primary: Arc<MockProvider>, fallback: Arc<MockProvider>) -> Arc<Translator> {
        let mut tables = DictionaryTables::new();
        tables.insert(
            "yo".to_string(),
            [("Leadership", "Asiwaju"), ("Community", "Agbegbe")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        let dictionary = Arc::new(StaticDictionary::from_tables(tables).unwrap());
        Arc::new(Translator::new(
            primary as Arc<dyn TranslationProvider>,
            fallback as Arc<dyn TranslationProvider>,
            dictionary,
        ))
    }

    fn page(count: usize) -> Document {
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), "body", Vec::new()).unwrap();
        for i in 0..count {
            let p = doc.append_element(body, "p", Vec::new()).unwrap();
            doc.append_text(p, format!("Paragraph {}", i)).unwrap();
        }
        doc
    }

    /// Records writes without touching a document.
    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<(NodeId, String)>,
    }

    impl UnitWriter for RecordingWriter {
        fn write(&mut self, unit: &TranslatableUnit, text: &str) -> Result<(), DocumentError> {
            self.writes.push((unit.node(), text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_progress_once_per_group_ending_at_total() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("yo:")));
        let batch = BatchTranslator::new(
            translator(primary.clone(), Arc::new(MockProvider::failing())),
            10,
        );
        let mut doc = page(23);
        let units = collect_translatable_units(&doc, doc.root());

        let mut events = Vec::new();
        let report = batch
            .translate_batch(&units, Language::YORUBA, None, &mut doc, |p| {
                events.push(p)
            })
            .await;

        let completed: Vec<usize> = events.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![10, 20, 23]);
        assert!(events.iter().all(|p| p.total == 23));
        assert_eq!(report.completed, 23);
        assert_eq!(report.outcomes.primary, 23);
        assert_eq!(primary.call_count(), 23);
        assert_eq!(doc.text(units[0].node()), Some("yo:Paragraph 0"));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded_by_group_size() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Slow {
            delay: Duration::from_millis(20),
            prefix: "yo:",
        }));
        let batch = BatchTranslator::new(
            translator(primary.clone(), Arc::new(MockProvider::failing())),
            4,
        );
        let doc = page(10);
        let units = collect_translatable_units(&doc, doc.root());
        let mut writer = RecordingWriter::default();

        batch
            .translate_batch(&units, Language::YORUBA, None, &mut writer, |_| {})
            .await;

        assert_eq!(primary.max_in_flight(), 4);
        assert_eq!(writer.writes.len(), 10);
    }

    #[tokio::test]
    async fn test_every_unit_written_once_in_order() {
        let primary = Arc::new(MockProvider::new(MockBehavior::Prefix("fr:")));
        let batch = BatchTranslator::new(
            translator(primary, Arc::new(MockProvider::failing())),
            3,
        );
        let doc = page(7);
        let units = collect_translatable_units(&doc, doc.root());
        let mut writer = RecordingWriter::default();

        batch
            .translate_batch(&units, Language::FRENCH, None, &mut writer, |_| {})
            .await;

        let written: Vec<NodeId> = writer.writes.iter().map(|(id, _)| *id).collect();
        let expected: Vec<NodeId> = units.iter().map(|u| u.node()).collect();
        assert_eq!(written, expected);
    }

    #[tokio::test]
    async fn test_write_failures_do_not_abort_batch() {
        let batch = BatchTranslator::new(
            translator(
                Arc::new(MockProvider::failing()),
                Arc::new(MockProvider::failing()),
            ),
            2,
        );
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), "body", Vec::new()).unwrap();
        let gone = doc.append_element(body, "p", Vec::new()).unwrap();
        doc.append_text(gone, "Leadership").unwrap();
        let kept = doc.append_element(body, "p", Vec::new()).unwrap();
        let kept_text = doc.append_text(kept, "Community").unwrap();
        let units = collect_translatable_units(&doc, doc.root());

        // Navigation removed the first paragraph while the batch was queued
        doc.detach(gone).unwrap();

        let mut events = Vec::new();
        let report = batch
            .translate_batch(&units, Language::YORUBA, None, &mut doc, |p| {
                events.push(p)
            })
            .await;

        assert_eq!(report.write_failures, 1);
        assert_eq!(report.outcomes.dictionary, 2);
        assert_eq!(doc.text(kept_text), Some("Agbegbe"));
        assert_eq!(events, vec![BatchProgress { completed: 2, total: 2 }]);
    }

    #[tokio::test]
    async fn test_padding_survives_translation() {
        let batch = BatchTranslator::new(
            translator(
                Arc::new(MockProvider::table([("Community", "Agbegbe")])),
                Arc::new(MockProvider::failing()),
            ),
            10,
        );
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p", Vec::new()).unwrap();
        let text = doc.append_text(p, "\n    Community ").unwrap();
        let units = collect_translatable_units(&doc, doc.root());

        batch
            .translate_batch(&units, Language::YORUBA, None, &mut doc, |_| {})
            .await;

        assert_eq!(doc.text(text), Some("\n    Agbegbe "));
    }

    #[tokio::test]
    async fn test_blank_unit_is_written_back_unchanged() {
        let primary = Arc::new(MockProvider::failing());
        let batch = BatchTranslator::new(
            translator(primary.clone(), Arc::new(MockProvider::failing())),
            10,
        );
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p", Vec::new()).unwrap();
        let leaf = doc.append_text(p, "  ").unwrap();
        let units = vec![TranslatableUnit::new(leaf, "  ")];

        let report = batch
            .translate_batch(&units, Language::YORUBA, None, &mut doc, |_| {})
            .await;

        assert_eq!(doc.text(leaf), Some("  "));
        assert_eq!(report.outcomes.skipped, 1);
        assert_eq!(report.write_failures, 0);
        assert_eq!(primary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_reports_nothing() {
        let batch = BatchTranslator::new(
            translator(
                Arc::new(MockProvider::failing()),
                Arc::new(MockProvider::failing()),
            ),
            10,
        );
        let mut writer = RecordingWriter::default();
        let mut calls = 0;

        let report = batch
            .translate_batch(&[], Language::YORUBA, None, &mut writer, |_| calls += 1)
            .await;

        assert_eq!(calls, 0);
        assert_eq!(report, BatchReport::default());
    }

    #[test]
    fn test_zero_group_size_is_clamped() {
        let batch = BatchTranslator::new(
            translator(
                Arc::new(MockProvider::failing()),
                Arc::new(MockProvider::failing()),
            ),
            0,
        );
        assert_eq!(batch.group_size(), 1);
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(BatchProgress { completed: 1, total: 4 }.fraction(), 0.25);
        assert_eq!(BatchProgress { completed: 0, total: 0 }.fraction(), 1.0);
    }
}
