//! XML rendering of the transformed tree.
//!
//! The presenter walks the annotated tree top-down, builds an element tree
//! rooted at `<data>`, and writes it with 2-space indentation. Scalar text is
//! wrapped in CDATA with HTML entities decoded first, so entity-encoded
//! characters in the source data come out literally.
//!
//! Branching rules per map entry, after stripping leading underscores off the
//! key:
//!
//! - list elements that are maps or lists render as `<resource>`;
//! - a map with a direct non-empty `href` scalar renders as
//!   `<link rel="..." href="..."/>`;
//! - a map whose `links.href` exists renders as an embedded
//!   `<resource href="...">` reference;
//! - anything else renders as a plain element.
//!
//! One legacy behavior is reproduced on purpose: a scalar `href` key stops
//! iteration of the remaining sibling entries of its object. Downstream
//! consumers depend on the exact output, so this is kept bit-for-bit even
//! though it looks like an accident of the original control flow.

use crate::node::{Node, Scalar, LINKS_HREF, LINKS_KEY};
use std::fmt::Write;
use std::ops::ControlFlow;

/// Errors raised while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("`{0}` is not a well-formed XML element name")]
    InvalidElementName(String),
    #[error("root node must be a map or a list")]
    ScalarRoot,
}

/// Renders transformed trees as formatted XML documents.
#[derive(Debug, Clone, Default)]
pub struct XmlPresenter;

impl XmlPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Renders `tree` under a `<data>` root with the UTF-8 XML declaration,
    /// 2-space indentation and no trailing newline.
    pub fn render(&self, tree: &Node) -> Result<String, RenderError> {
        if matches!(tree, Node::Scalar(_)) {
            return Err(RenderError::ScalarRoot);
        }

        let mut root = XmlElement::new("data")?;
        self.add_children(tree, &mut root)?;

        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        root.write(&mut out, 0);
        while out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    fn add_children(&self, node: &Node, parent: &mut XmlElement) -> Result<(), RenderError> {
        match node {
            Node::Map(map) => {
                for (raw_key, value) in map {
                    let key = raw_key.trim_start_matches('_');
                    if let ControlFlow::Break(()) = self.add_child(key, false, value, parent)? {
                        break;
                    }
                }
            }
            Node::List(items) => {
                for (index, value) in items.iter().enumerate() {
                    let key = index.to_string();
                    if let ControlFlow::Break(()) = self.add_child(&key, true, value, parent)? {
                        break;
                    }
                }
            }
            Node::Scalar(_) => {}
        }
        Ok(())
    }

    fn add_child(
        &self,
        key: &str,
        positional: bool,
        value: &Node,
        parent: &mut XmlElement,
    ) -> Result<ControlFlow<()>, RenderError> {
        match value {
            Node::Map(map) => {
                let key = if positional { "resource" } else { key };
                let mut child = if let Some(href) = direct_href(value) {
                    let mut link = XmlElement::new("link")?;
                    link.attributes.push(("rel".to_string(), key.to_string()));
                    link.attributes.push((LINKS_HREF.to_string(), href));
                    link
                } else if let Some(href) = embedded_href(map) {
                    let mut resource = XmlElement::new("resource")?;
                    resource.attributes.push((LINKS_HREF.to_string(), href));
                    if key != "resource" {
                        resource
                            .attributes
                            .push(("rel".to_string(), key.to_string()));
                    }
                    resource
                } else {
                    XmlElement::new(key)?
                };
                self.add_children(value, &mut child)?;
                parent.children.push(child);
                Ok(ControlFlow::Continue(()))
            }
            Node::List(_) => {
                let key = if positional { "resource" } else { key };
                let mut child = XmlElement::new(key)?;
                self.add_children(value, &mut child)?;
                parent.children.push(child);
                Ok(ControlFlow::Continue(()))
            }
            Node::Scalar(scalar) => {
                if key == LINKS_KEY {
                    return Ok(ControlFlow::Continue(()));
                }
                // Legacy: a scalar href key ends its object's iteration.
                if key == LINKS_HREF {
                    return Ok(ControlFlow::Break(()));
                }
                parent.children.push(scalar_element(key, scalar)?);
                Ok(ControlFlow::Continue(()))
            }
        }
    }
}

/// The `href` attribute value for a link descriptor: a direct non-empty
/// scalar `href` entry.
fn direct_href(value: &Node) -> Option<String> {
    match value.get(LINKS_HREF) {
        Some(Node::Scalar(scalar)) if !scalar.is_empty() => {
            Some(decode_entities(&scalar.to_string()))
        }
        _ => None,
    }
}

/// The `href` attribute value for an embedded resource reference: a map whose
/// own `links` block carries a direct `href`.
fn embedded_href(map: &indexmap::IndexMap<String, Node>) -> Option<String> {
    match map.get(LINKS_KEY)?.get(LINKS_HREF) {
        Some(Node::Scalar(scalar)) if !scalar.is_empty() => {
            Some(decode_entities(&scalar.to_string()))
        }
        _ => None,
    }
}

fn scalar_element(key: &str, scalar: &Scalar) -> Result<XmlElement, RenderError> {
    let mut element = XmlElement::new(key)?;
    element.text = Some(match scalar {
        Scalar::Bool(b) => XmlText::Literal(if *b { "true" } else { "false" }.to_string()),
        other => XmlText::Cdata(decode_entities(&other.to_string())),
    });
    Ok(element)
}

/// Decodes HTML entity references, named and numeric; unrecognized
/// references pass through untouched. The full named-entity table matters
/// here: upstream data arrives entity-encoded and the output contract is
/// literal characters inside CDATA.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    html_escape::decode_html_entities(input).into_owned()
}

/// Text content of a leaf element.
#[derive(Debug)]
enum XmlText {
    /// Wrapped in a CDATA section.
    Cdata(String),
    /// Written verbatim (boolean literals).
    Literal(String),
}

/// One element of the output tree. Leaves carry text, branches carry
/// children; the two never mix.
#[derive(Debug)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<XmlText>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(name: &str) -> Result<Self, RenderError> {
        if !is_valid_name(name) {
            return Err(RenderError::InvalidElementName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        })
    }

    fn write(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{value}\"");
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>\n");
            return;
        }

        out.push('>');
        match &self.text {
            Some(XmlText::Cdata(text)) => {
                let _ = write!(out, "<![CDATA[{text}]]>");
            }
            Some(XmlText::Literal(text)) => out.push_str(text),
            None => {
                out.push('\n');
                for child in &self.children {
                    child.write(out, depth + 1);
                }
                for _ in 0..depth {
                    out.push_str("  ");
                }
            }
        }
        let _ = writeln!(out, "</{}>", self.name);
    }
}

/// XML 1.0 Name check, restricted to the characters the upstream data can
/// produce. Numeric names (scalar list elements) fail here, which surfaces
/// the same malformed-document error the re-parse step raised historically.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
