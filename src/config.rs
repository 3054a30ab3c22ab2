use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::i18n::Language;
use crate::providers::{google, mymemory};
use crate::translation::DEFAULT_PROVIDER_TIMEOUT;

#[derive(Debug, Clone)]
pub struct Config {
    // Primary provider (Google Cloud Translation)
    pub translate_api_url: String,
    pub translate_api_key: Option<String>,

    // Fallback provider (MyMemory)
    pub fallback_api_url: String,
    pub fallback_contact_email: Option<String>,

    // Languages
    pub source_language: Language,
    pub target_language: Option<Language>,

    // Batching
    pub batch_size: usize,
    pub provider_timeout: Duration,

    // Dictionary overrides (JSON)
    pub dictionary_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source_language = match var("SOURCE_LANGUAGE") {
            Some(code) => Language::from_code(&code).context("Invalid SOURCE_LANGUAGE")?,
            None => Language::canonical(),
        };
        let target_language = var("TARGET_LANGUAGE")
            .map(|code| Language::from_code(&code))
            .transpose()
            .context("Invalid TARGET_LANGUAGE")?;

        let batch_size = match var("BATCH_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("BATCH_SIZE must be a positive integer, got '{}'", raw))?,
            None => DEFAULT_BATCH_SIZE,
        };
        if batch_size < 1 {
            bail!("BATCH_SIZE must be at least 1");
        }

        let provider_timeout = match var("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().with_context(|| {
                    format!("PROVIDER_TIMEOUT_SECS must be whole seconds, got '{}'", raw)
                })?;
                if secs == 0 {
                    bail!("PROVIDER_TIMEOUT_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_PROVIDER_TIMEOUT,
        };

        Ok(Self {
            translate_api_url: var("TRANSLATE_API_URL")
                .unwrap_or_else(|| google::DEFAULT_API_URL.to_string()),
            translate_api_key: var("TRANSLATE_API_KEY"),

            fallback_api_url: var("FALLBACK_API_URL")
                .unwrap_or_else(|| mymemory::DEFAULT_API_URL.to_string()),
            fallback_contact_email: var("FALLBACK_CONTACT_EMAIL"),

            source_language,
            target_language,

            batch_size,
            provider_timeout,

            dictionary_path: var("DICTIONARY_PATH").map(PathBuf::from),
        })
    }
}
