//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is built once on first access (`OnceLock`) and is read-only
//! afterwards, so it can be shared freely across concurrent translations.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "yo")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Yoruba")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Yorùbá")
    pub native_name: &'static str,

    /// Whether this is the baseline source language (only one should be true)
    pub is_canonical: bool,

    /// Whether this language can be selected as a translation target
    pub enabled: bool,
}

/// Global language registry.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if the built-in table does not define exactly one canonical
    /// language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_canonical: true,
            enabled: true,
        },
        LanguageConfig {
            code: "yo",
            name: "Yoruba",
            native_name: "Yorùbá",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ha",
            name: "Hausa",
            native_name: "Harshen Hausa",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ig",
            name: "Igbo",
            native_name: "Asụsụ Igbo",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "sw",
            name: "Swahili",
            native_name: "Kiswahili",
            is_canonical: false,
            enabled: true,
        },
    ]
}
