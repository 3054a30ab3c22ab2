//! Translation metrics and observability.
//!
//! Counters are per instance and shared through an `Arc`, so two pipelines
//! (or two tests) never see each other's numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::translation::TranslationOutcome;

/// Counters for every tier of the fallback chain.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    skipped: AtomicUsize,
    primary_hits: AtomicUsize,
    primary_failures: AtomicUsize,
    fallback_hits: AtomicUsize,
    fallback_failures: AtomicUsize,
    dictionary_hits: AtomicUsize,
    untranslated: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tier that produced a final translation.
    pub fn record_outcome(&self, outcome: TranslationOutcome) {
        let counter = match outcome {
            TranslationOutcome::Skipped => &self.skipped,
            TranslationOutcome::Primary => &self.primary_hits,
            TranslationOutcome::Fallback => &self.fallback_hits,
            TranslationOutcome::Dictionary => &self.dictionary_hits,
            TranslationOutcome::Untranslated => &self.untranslated,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_primary_failure(&self) {
        self.primary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_failure(&self) {
        self.fallback_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn primary_hits(&self) -> usize {
        self.primary_hits.load(Ordering::Relaxed)
    }

    pub fn primary_failures(&self) -> usize {
        self.primary_failures.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn fallback_failures(&self) -> usize {
        self.fallback_failures.load(Ordering::Relaxed)
    }

    pub fn dictionary_hits(&self) -> usize {
        self.dictionary_hits.load(Ordering::Relaxed)
    }

    pub fn untranslated(&self) -> usize {
        self.untranslated.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let primary_hits = self.primary_hits();
        let fallback_hits = self.fallback_hits();
        let dictionary_hits = self.dictionary_hits();
        let untranslated = self.untranslated();

        let attempted = primary_hits + fallback_hits + dictionary_hits + untranslated;
        let network_success_rate = if attempted > 0 {
            ((primary_hits + fallback_hits) as f64 / attempted as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            skipped: self.skipped(),
            primary_hits,
            primary_failures: self.primary_failures(),
            fallback_hits,
            fallback_failures: self.fallback_failures(),
            dictionary_hits,
            untranslated,
            network_success_rate,
        }
    }
}

/// Snapshot of translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Texts returned unchanged without entering the chain (blank or same language)
    pub skipped: usize,

    pub primary_hits: usize,
    pub primary_failures: usize,
    pub fallback_hits: usize,
    pub fallback_failures: usize,
    pub dictionary_hits: usize,

    /// Texts no tier could change
    pub untranslated: usize,

    /// Share of chain entries resolved by a network provider, as a percentage (0-100)
    pub network_success_rate: f64,
}
