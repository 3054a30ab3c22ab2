//! Language type: validated language representation.
//!
//! A `Language` can only be built from a code the registry knows and has
//! enabled, so everything downstream of `Language::from_code` may assume a
//! supported language.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use thiserror::Error;

/// Reasons a language code cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("Unknown language code: '{0}'")]
    Unknown(String),

    #[error("Language '{0}' is not enabled")]
    Disabled(String),
}

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "yo")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const YORUBA: Language = Language { code: "yo" };
    pub const HAUSA: Language = Language { code: "ha" };
    pub const IGBO: Language = Language { code: "ig" };
    pub const FRENCH: Language = Language { code: "fr" };

    /// Create a Language from a language code string.
    ///
    /// The code is trimmed and lower-cased before lookup, so `" YO "` resolves
    /// to Yoruba.
    ///
    /// # Example
    /// ```ignore
    /// let yoruba = Language::from_code("yo")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language, LanguageError> {
        let normalized = code.trim().to_lowercase();
        let registry = LanguageRegistry::get();

        match registry.get_by_code(&normalized) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => Err(LanguageError::Disabled(normalized)),
            None => Err(LanguageError::Unknown(code.to_string())),
        }
    }

    /// The baseline language all platform content is authored in.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Every enabled language, in registry order.
    pub fn enabled() -> Vec<Language> {
        LanguageRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// Enabled codes as a comma-separated list, for usage messages.
    pub fn enabled_codes() -> String {
        Language::enabled()
            .iter()
            .map(|language| language.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a `Language` built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Name of the language in the language itself.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}
