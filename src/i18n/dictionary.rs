//! Static dictionary: offline, last-resort term substitution.
//!
//! Each target language owns an immutable table of canonical terms. Matching
//! is literal: whole-word, case-insensitive, longest entry first. There is no
//! stemming or fuzzy matching, and words without an entry are left exactly as
//! they appear in the source text.

use crate::i18n::{Language, LanguageError};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Raw dictionary tables keyed by language code, then by source term.
pub type DictionaryTables = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dictionary table for unsupported language: {0}")]
    Language(#[from] LanguageError),

    #[error("Failed to compile dictionary pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Term table for a single target language.
#[derive(Debug, Clone)]
pub struct LanguageDictionary {
    /// Lower-cased source term -> translated term
    entries: HashMap<String, String>,
    /// Alternation of every term, longest first; `None` for an empty table
    pattern: Option<Regex>,
}

impl LanguageDictionary {
    pub fn new<I, K, V>(entries: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries: HashMap<String, String> = entries
            .into_iter()
            .filter_map(|(term, translation)| {
                let term = term.as_ref().trim().to_lowercase();
                (!term.is_empty()).then(|| (term, translation.into()))
            })
            .collect();

        let pattern = build_pattern(entries.keys().map(String::as_str))?;

        Ok(Self { entries, pattern })
    }

    /// Exact whole-term lookup, ignoring case and surrounding whitespace.
    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.entries
            .get(&term.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Replace every known term in `text`.
    ///
    /// Returns `None` when no term matched, so callers can tell a dictionary
    /// hit from text that was left untouched.
    pub fn substitute(&self, text: &str) -> Option<String> {
        let pattern = self.pattern.as_ref()?;
        let mut replaced = 0usize;

        let output = pattern.replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            match self.entries.get(&matched.to_lowercase()) {
                Some(translation) => {
                    replaced += 1;
                    translation.clone()
                }
                None => matched.to_string(),
            }
        });

        (replaced > 0).then(|| output.into_owned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build `(?i)\bterm one\b|\bterm\b|...` with longer terms first.
///
/// Regex alternation is leftmost-first, so ordering by length makes
/// "Traditional King" win over "King" at the same starting position.
/// Word boundaries are only placed on edges that are word characters.
fn build_pattern<'a>(terms: impl Iterator<Item = &'a str>) -> Result<Option<Regex>, regex::Error> {
    let mut terms: Vec<&str> = terms.collect();
    if terms.is_empty() {
        return Ok(None);
    }

    terms.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });

    let alternatives: Vec<String> = terms
        .iter()
        .map(|term| {
            let starts_word = term.chars().next().is_some_and(is_word_char);
            let ends_word = term.chars().last().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if starts_word { r"\b" } else { "" },
                regex::escape(term),
                if ends_word { r"\b" } else { "" }
            )
        })
        .collect();

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).map(Some)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Process-wide, read-only set of per-language dictionaries.
#[derive(Debug, Clone, Default)]
pub struct StaticDictionary {
    languages: HashMap<Language, LanguageDictionary>,
}

impl StaticDictionary {
    /// A dictionary with no tables; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tables shipped with the crate.
    pub fn builtin() -> Result<Self, DictionaryError> {
        Self::from_tables(builtin_tables())
    }

    pub fn from_tables(tables: DictionaryTables) -> Result<Self, DictionaryError> {
        let mut languages = HashMap::with_capacity(tables.len());
        for (code, terms) in tables {
            let language = Language::from_code(&code)?;
            languages.insert(language, LanguageDictionary::new(terms)?);
        }
        Ok(Self { languages })
    }

    /// Parse tables shaped as `{ "<lang>": { "<term>": "<translation>" } }`.
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let tables: DictionaryTables = serde_json::from_str(json)?;
        Self::from_tables(tables)
    }

    /// Built-in tables with the entries of a JSON file layered on top.
    ///
    /// Entries in the file replace built-in entries for the same term.
    pub fn load(overrides: Option<&Path>) -> Result<Self, DictionaryError> {
        let mut tables = builtin_tables();

        if let Some(path) = overrides {
            let json = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let extra: DictionaryTables = serde_json::from_str(&json)?;
            merge_tables(&mut tables, extra);
        }

        Self::from_tables(tables)
    }

    /// Exact whole-term lookup for one language.
    pub fn lookup(&self, term: &str, language: Language) -> Option<&str> {
        self.languages.get(&language)?.lookup(term)
    }

    /// Substitute every known term of `language` inside `text`.
    pub fn substitute(&self, text: &str, language: Language) -> Option<String> {
        self.languages.get(&language)?.substitute(text)
    }

    pub fn supports(&self, language: Language) -> bool {
        self.languages
            .get(&language)
            .is_some_and(|table| !table.is_empty())
    }
}

fn merge_tables(base: &mut DictionaryTables, extra: DictionaryTables) {
    for (code, terms) in extra {
        let table = base.entry(code.trim().to_lowercase()).or_default();
        for (term, translation) in terms {
            // Drop any existing entry that differs only in case
            let key = term.trim().to_lowercase();
            table.retain(|existing, _| existing.trim().to_lowercase() != key);
            table.insert(term, translation);
        }
    }
}

const BUILTIN: &[(&str, &[(&str, &str)])] = &[
    (
        "yo",
        &[
            ("Leadership", "Asiwaju"),
            ("Community", "Agbegbe"),
            ("King", "Oba"),
            ("Traditional King", "Oba Ibile"),
            ("Chief", "Oloye"),
            ("Elders", "Awon Agba"),
            ("Culture", "Asa"),
            ("Course", "Eko"),
            ("Book", "Iwe"),
            ("Chapter", "Ori"),
            ("Forum", "Apejo"),
            ("Dispute", "Ariyanjiyan"),
            ("Teacher", "Oluko"),
            ("Student", "Akeko"),
            ("Welcome", "E kaabo"),
        ],
    ),
    (
        "ha",
        &[
            ("Leadership", "Shugabanci"),
            ("Community", "Al'umma"),
            ("King", "Sarki"),
            ("Traditional King", "Sarkin Gargajiya"),
            ("Chief", "Hakimi"),
            ("Elders", "Dattawa"),
            ("Culture", "Al'ada"),
            ("Course", "Kwas"),
            ("Book", "Littafi"),
            ("Chapter", "Babi"),
            ("Forum", "Dandali"),
            ("Dispute", "Rikici"),
            ("Teacher", "Malami"),
            ("Student", "Dalibi"),
            ("Welcome", "Barka da zuwa"),
        ],
    ),
    (
        "ig",
        &[
            ("Leadership", "Ndu"),
            ("Community", "Obodo"),
            ("King", "Eze"),
            ("Traditional King", "Eze Odinala"),
            ("Chief", "Ichie"),
            ("Elders", "Ndi Okenye"),
            ("Culture", "Omenala"),
            ("Course", "Ihe Omumu"),
            ("Book", "Akwukwo"),
            ("Chapter", "Isi"),
            ("Forum", "Ogbako"),
            ("Dispute", "Esemokwu"),
            ("Teacher", "Onye Nkuzi"),
            ("Student", "Nwa Akwukwo"),
            ("Welcome", "Nnoo"),
        ],
    ),
    (
        "fr",
        &[
            ("Leadership", "Direction"),
            ("Community", "Communauté"),
            ("King", "Roi"),
            ("Traditional King", "Roi traditionnel"),
            ("Chief", "Chef"),
            ("Elders", "Anciens"),
            ("Course", "Cours"),
            ("Book", "Livre"),
            ("Chapter", "Chapitre"),
            ("Dispute", "Litige"),
            ("Teacher", "Enseignant"),
            ("Student", "Étudiant"),
            ("Welcome", "Bienvenue"),
        ],
    ),
];

fn builtin_tables() -> DictionaryTables {
    BUILTIN
        .iter()
        .map(|(code, terms)| {
            let table = terms
                .iter()
                .map(|(term, translation)| (term.to_string(), translation.to_string()))
                .collect();
            (code.to_string(), table)
        })
        .collect()
}
