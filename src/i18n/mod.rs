//! Internationalization (i18n): languages, offline dictionaries and metrics.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Validated `Language` type built from the registry
//! - `dictionary`: Static per-language term tables, the last tier of the fallback chain
//! - `metrics`: Per-tier translation counters
//!
//! # Example
//!
//! ```rust,ignore
//! use leaf_translator::i18n::{Language, StaticDictionary};
//!
//! let yoruba = Language::from_code("yo")?;
//! let dictionary = StaticDictionary::builtin()?;
//! assert_eq!(dictionary.lookup("Community", yoruba), Some("Agbegbe"));
//! ```

mod dictionary;
mod language;
mod metrics;
mod registry;

pub use dictionary::{DictionaryError, DictionaryTables, LanguageDictionary, StaticDictionary};
pub use language::{Language, LanguageError};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
