//! Text-leaf collection and structure-safe write-back.

use super::{Document, DocumentError, NodeData, NodeId};

/// Elements whose text is never rendered as prose.
const NON_RENDERED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// One text leaf awaiting translation.
///
/// Units are created fresh for every pass and carry no reference to the
/// document, only the id of their leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableUnit {
    node: NodeId,
    original_text: String,
}

impl TranslatableUnit {
    pub fn new(node: NodeId, original_text: impl Into<String>) -> Self {
        Self {
            node,
            original_text: original_text.into(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The leaf's text as it was when collected, whitespace included.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// The text to send for translation: the original without surrounding
    /// whitespace.
    pub fn source_text(&self) -> &str {
        self.original_text.trim()
    }

    /// Re-apply the original leading and trailing whitespace to a translation,
    /// so layout whitespace between inline elements survives.
    ///
    /// A whitespace-only unit has nothing to pad and is returned as it was.
    pub fn restore_padding(&self, translated: &str) -> String {
        let original = self.original_text.as_str();
        if original.trim().is_empty() {
            return original.to_string();
        }
        let leading = &original[..original.len() - original.trim_start().len()];
        let trailing = &original[original.trim_end().len()..];
        format!("{}{}{}", leading, translated.trim(), trailing)
    }
}

/// Collect every translatable text leaf under `root`, in document order.
///
/// A leaf qualifies when its trimmed text is non-empty. Text inside
/// `script`, `style`, `noscript` and `template` is never collected.
pub fn collect_translatable_units(doc: &Document, root: NodeId) -> Vec<TranslatableUnit> {
    let mut units = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        match doc.data(id) {
            Some(NodeData::Text(text)) => {
                if !text.trim().is_empty() {
                    units.push(TranslatableUnit::new(id, text.as_str()));
                }
            }
            Some(NodeData::Element { name, .. })
                if NON_RENDERED_ELEMENTS
                    .iter()
                    .any(|skipped| name.eq_ignore_ascii_case(skipped)) => {}
            Some(NodeData::Element { .. }) | Some(NodeData::Document) => {
                stack.extend(doc.children(id).iter().rev().copied());
            }
            Some(NodeData::Comment(_)) | Some(NodeData::Doctype(_)) | None => {}
        }
    }

    units
}

/// Write `new_text` into the unit's leaf, touching nothing else.
///
/// Fails when the leaf is gone (detached, wrong kind) or its text no longer
/// matches what was collected; callers treat either as a no-op for that unit.
pub fn apply_structure_safe_write(
    doc: &mut Document,
    unit: &TranslatableUnit,
    new_text: &str,
) -> Result<(), DocumentError> {
    match doc.text(unit.node()) {
        Some(current) if current == unit.original_text() => {}
        Some(_) => return Err(DocumentError::Stale(unit.node())),
        None if doc.data(unit.node()).is_none() => {
            return Err(DocumentError::UnknownNode(unit.node()))
        }
        None => return Err(DocumentError::NotText(unit.node())),
    }
    doc.set_text(unit.node(), new_text)
}
