//! Live translation sessions for documents that keep rendering new content.

use std::collections::HashMap;

use super::{apply_structure_safe_write, collect_translatable_units};
use super::{Document, DocumentError, NodeId, TranslatableUnit};
use crate::batch::UnitWriter;
use crate::i18n::Language;

/// A translation pass that can be re-armed on every render or navigation
/// event.
///
/// The session is bound to one language pair and remembers what it wrote into
/// each leaf. A re-armed pass only picks up leaves it has not written yet, or
/// leaves whose text was replaced by a re-render since.
#[derive(Debug, Clone)]
pub struct TranslationSession {
    target: Language,
    source: Language,
    written: HashMap<NodeId, String>,
}

impl TranslationSession {
    pub fn new(target: Language, source: Language) -> Self {
        Self {
            target,
            source,
            written: HashMap::new(),
        }
    }

    pub fn target(&self) -> Language {
        self.target
    }

    pub fn source(&self) -> Language {
        self.source
    }

    /// Number of leaves this session has written.
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    /// Units under `root` still waiting for this session.
    pub fn pending_units(&self, doc: &Document, root: NodeId) -> Vec<TranslatableUnit> {
        collect_translatable_units(doc, root)
            .into_iter()
            .filter(|unit| {
                !matches!(
                    self.written.get(&unit.node()),
                    Some(written) if written == unit.original_text()
                )
            })
            .collect()
    }

    pub fn record(&mut self, node: NodeId, text: impl Into<String>) {
        self.written.insert(node, text.into());
    }

    /// A writer that applies translations to `doc` and records them here.
    pub fn writer<'a>(&'a mut self, doc: &'a mut Document) -> SessionWriter<'a> {
        SessionWriter { session: self, doc }
    }
}

/// [`UnitWriter`] that remembers every successful write in its session.
pub struct SessionWriter<'a> {
    session: &'a mut TranslationSession,
    doc: &'a mut Document,
}

impl UnitWriter for SessionWriter<'_> {
    fn write(&mut self, unit: &TranslatableUnit, text: &str) -> Result<(), DocumentError> {
        apply_structure_safe_write(self.doc, unit, text)?;
        self.session.record(unit.node(), text);
        Ok(())
    }
}
