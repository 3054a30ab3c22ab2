//! Loading a [`Document`] from HTML and writing it back out.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as DomData, RcDom};

use super::{Document, DocumentError, NodeData, NodeId};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text content is emitted verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl Document {
    /// Parse an HTML document.
    ///
    /// Parsing follows the HTML5 algorithm, so the result always has
    /// `html`, `head` and `body` elements. Template contents become ordinary
    /// children of their `template` element.
    pub fn parse_html(html: &str) -> Result<Document, DocumentError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| DocumentError::Parse(e.to_string()))?;

        let mut doc = Document::new();
        let mut stack: Vec<(Handle, NodeId)> = dom
            .document
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), doc.root()))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let id = match &handle.data {
                DomData::Doctype { name, .. } => {
                    doc.append_doctype(parent, name.to_string())?;
                    continue;
                }
                DomData::Text { contents } => {
                    doc.append_text(parent, contents.borrow().to_string())?;
                    continue;
                }
                DomData::Comment { contents } => {
                    doc.append_comment(parent, contents.to_string())?;
                    continue;
                }
                DomData::Element { name, attrs, .. } => {
                    let attrs = attrs
                        .borrow()
                        .iter()
                        .map(|attr| {
                            let key = match &attr.name.prefix {
                                Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                                None => attr.name.local.to_string(),
                            };
                            (key, attr.value.to_string())
                        })
                        .collect();
                    doc.append_element(parent, name.local.to_string(), attrs)?
                }
                DomData::Document | DomData::ProcessingInstruction { .. } => continue,
            };

            let mut children: Vec<Handle> = handle.children.borrow().iter().cloned().collect();
            if let DomData::Element {
                template_contents, ..
            } = &handle.data
            {
                if let Some(contents) = template_contents.borrow().as_ref() {
                    children.extend(contents.children.borrow().iter().cloned());
                }
            }
            stack.extend(children.into_iter().rev().map(|child| (child, id)));
        }

        Ok(doc)
    }

    /// Serialize the attached tree back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(*child, false, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Doctype(name)) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            Some(NodeData::Text(text)) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            Some(NodeData::Comment(text)) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Some(NodeData::Element { name, attrs }) => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');

                let lower = name.to_ascii_lowercase();
                if VOID_ELEMENTS.contains(&lower.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&lower.as_str());
                for child in self.children(id) {
                    self.write_node(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            Some(NodeData::Document) | None => {}
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
