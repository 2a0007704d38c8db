//! XML document parsing
//!
//! Parses text with a namespace-aware parser and copies the result into an
//! owned [`Element`] tree, so the converter never holds on to the input
//! buffer. Comments and processing instructions are dropped here.

use crate::error::{ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{split_prefixed, QName, XML_NAMESPACE};
use roxmltree::{Node, ParsingOptions};
use serde::Serialize;

/// XML attribute with its qualified name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name
    pub name: QName,
    /// Attribute value, with entities resolved
    pub value: String,
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element qualified name
    pub name: QName,
    /// Attributes in document order (namespace declarations excluded)
    pub attributes: Vec<Attribute>,
    /// Character data before the first child element, untrimmed
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    /// Get an attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Direct text with surrounding whitespace removed, if any remains
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Structural statistics gathered while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Number of elements, root included
    pub elements: usize,
    /// Number of attributes (namespace declarations excluded)
    pub attributes: usize,
    /// Deepest element nesting, the root being at depth 1
    pub max_depth: usize,
}

/// Parsed XML document
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
    /// Statistics for the whole document
    pub stats: DocumentStats,
}

impl Document {
    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse an XML document from a string
    pub fn parse(xml: &str, limits: &Limits) -> Result<Self> {
        if xml.trim().is_empty() {
            return Err(ParseError::empty_input("XML input is empty").into());
        }
        limits.check_xml_size(xml.len())?;

        let options = ParsingOptions {
            allow_dtd: true,
            nodes_limit: limits.nodes_limit,
            ..ParsingOptions::default()
        };
        let tree = roxmltree::Document::parse_with_options(xml, options).map_err(map_xml_error)?;

        let mut stats = DocumentStats::default();
        let root = build_element(tree.root_element(), xml, 1, limits, &mut stats)?;

        tracing::debug!(
            root = %root.name,
            elements = stats.elements,
            max_depth = stats.max_depth,
            "parsed XML document"
        );

        Ok(Self { root, stats })
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn map_xml_error(err: roxmltree::Error) -> crate::error::Error {
    let pos = err.pos();
    match err {
        roxmltree::Error::NoRootNode => {
            ParseError::empty_input("XML input contains no root element").into()
        }
        roxmltree::Error::NodesLimitReached => {
            ParseError::limit_exceeded("XML document has too many nodes").into()
        }
        other => ParseError::malformed(format!("Failed to parse XML: {}", other))
            .with_position(pos.row, pos.col)
            .into(),
    }
}

fn build_element(
    node: Node<'_, '_>,
    input: &str,
    depth: usize,
    limits: &Limits,
    stats: &mut DocumentStats,
) -> Result<Element> {
    limits.check_depth(depth)?;
    stats.elements += 1;
    stats.max_depth = stats.max_depth.max(depth);

    let mut element = Element::new(element_name(node, input));

    for attr in node.attributes() {
        let name = match attr.namespace() {
            Some(uri) => {
                QName::namespaced(uri, attribute_prefix(node, &attr, uri, input), attr.name())
            }
            None => QName::local(attr.name()),
        };
        element.attributes.push(Attribute {
            name,
            value: attr.value().to_string(),
        });
    }
    stats.attributes += element.attributes.len();

    // Text after the first child element is that child's tail, not content
    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            let converted = build_element(child, input, depth + 1, limits, stats)?;
            element.children.push(converted);
        } else if child.is_text() && element.children.is_empty() {
            if let Some(t) = child.text() {
                text.push_str(t);
            }
        }
    }
    if !text.is_empty() {
        element.text = Some(text);
    }

    Ok(element)
}

fn element_name(node: Node<'_, '_>, input: &str) -> QName {
    let tag = node.tag_name();
    match tag.namespace() {
        Some(uri) => {
            let prefix = match source_prefix(node, input) {
                Some(written) => written,
                None => node.lookup_prefix(uri).map(str::to_string),
            };
            QName::namespaced(uri, prefix, tag.name())
        }
        None => QName::local(tag.name()),
    }
}

// The parser resolves prefixes away, so read the one written in the source.
// Returns None when the name cannot be read back from the input.
fn written_prefix(input: &str, start: usize, local_name: &str) -> Option<Option<String>> {
    let rest = input.get(start..)?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>' || c == '=')
        .unwrap_or(rest.len());
    let (prefix, local) = split_prefixed(&rest[..end]);
    if local != local_name {
        return None;
    }
    Some(prefix.map(str::to_string))
}

fn source_prefix(node: Node<'_, '_>, input: &str) -> Option<Option<String>> {
    written_prefix(input, node.range().start + 1, node.tag_name().name())
}

fn attribute_prefix(
    node: Node<'_, '_>,
    attr: &roxmltree::Attribute<'_, '_>,
    uri: &str,
    input: &str,
) -> Option<String> {
    if uri == XML_NAMESPACE {
        return Some("xml".to_string());
    }
    match written_prefix(input, attr.position(), attr.name()) {
        Some(written) => written,
        None => node.lookup_prefix(uri).map(str::to_string),
    }
}
