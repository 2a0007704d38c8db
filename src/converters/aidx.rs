//! AIDX structural converter
//!
//! Rewrites a parsed [`Document`] into a [`Node`] tree:
//! - attributes become `@name` entries
//! - child elements become entries keyed by name, grouped into a list when
//!   several siblings share a name
//! - text next to attributes or children becomes a `#text` entry
//! - an element with neither attributes nor children collapses to its text

use super::filter::{self, Retention};
use super::node::{Entry, Node, NodeMap};
use super::ConverterConfig;
use crate::documents::{Document, DocumentStats, Element};
use crate::error::Result;
use crate::loaders::Loader;
use crate::locations::Source;
use indexmap::IndexMap;
use std::path::Path;

/// Key for text that sits next to attributes or child elements
pub const TEXT_KEY: &str = "#text";

/// Prefix for attribute keys
pub const ATTR_PREFIX: &str = "@";

/// Successful conversion with document statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Root-wrapped converted document
    pub node: Node,
    /// Statistics of the parsed input
    pub stats: DocumentStats,
}

/// Converts AIDX XML documents to [`Node`] trees.
///
/// The converter holds only its read-only configuration, so one instance
/// can serve any number of concurrent conversions.
#[derive(Debug, Clone, Default)]
pub struct AidxConverter {
    config: ConverterConfig,
}

impl AidxConverter {
    /// Create a converter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert the XML file at `path`
    pub fn convert_path(&self, path: impl AsRef<Path>) -> Result<Node> {
        self.convert_source(&Source::Path(path.as_ref().to_path_buf()))
    }

    /// Convert XML text
    pub fn convert_str(&self, xml: &str) -> Result<Node> {
        let doc = Document::parse(xml, self.config.limits())?;
        Ok(self.convert_document(&doc))
    }

    /// Convert UTF-8 encoded XML bytes
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<Node> {
        self.convert_source(&Source::Bytes(bytes.to_vec()))
    }

    /// Convert any source
    pub fn convert_source(&self, source: &Source) -> Result<Node> {
        Ok(self.convert_with_stats(source)?.node)
    }

    /// Convert any source with an overriding configuration
    pub fn convert_source_with(&self, source: &Source, config: &ConverterConfig) -> Result<Node> {
        Ok(convert_with(config, source)?.node)
    }

    /// Convert any source and report document statistics
    pub fn convert_with_stats(&self, source: &Source) -> Result<Conversion> {
        convert_with(&self.config, source)
    }

    /// Convert an already parsed document
    pub fn convert_document(&self, doc: &Document) -> Node {
        Walker::new(&self.config).document(doc)
    }
}

fn convert_with(config: &ConverterConfig, source: &Source) -> Result<Conversion> {
    let loader = Loader::new().with_limits(config.limits().clone());
    let text = loader.load(source)?;
    let doc = Document::parse(&text, config.limits())?;
    let node = Walker::new(config).document(&doc);

    tracing::debug!(
        source = %source.describe(),
        root = node.root_name().unwrap_or(""),
        elements = doc.stats.elements,
        "converted document"
    );

    Ok(Conversion {
        node,
        stats: doc.stats,
    })
}

/// Single conversion pass over one document
struct Walker<'a> {
    config: &'a ConverterConfig,
}

impl<'a> Walker<'a> {
    fn new(config: &'a ConverterConfig) -> Self {
        Self { config }
    }

    fn document(&self, doc: &Document) -> Node {
        let root = doc.root();
        let converted = match filter::classify(self.config, root, false) {
            Retention::Drop => None,
            Retention::Whole => Some(self.whole(root)),
            Retention::Container => self.container(root),
        };

        let mut wrapper = NodeMap::new();
        if let Some(node) = converted {
            wrapper.insert(self.key(root), Entry::Single(node));
        }
        Node::Object(wrapper)
    }

    fn key(&self, element: &Element) -> String {
        element.name.emission_name(self.config.preserve_namespaces())
    }

    fn whole(&self, element: &Element) -> Node {
        let mut map = NodeMap::new();

        if self.config.include_attributes() {
            let preserve = self.config.preserve_namespaces();
            for attr in &element.attributes {
                map.insert(
                    format!("{}{}", ATTR_PREFIX, attr.name.emission_name(preserve)),
                    Entry::Single(Node::Text(attr.value.clone())),
                );
            }
        }

        group_children(&mut map, self.children(element, true));

        let text = element.trimmed_text();
        if map.is_empty() {
            // Scalar collapse
            return Node::Text(text.unwrap_or_default().to_string());
        }
        if let Some(text) = text {
            map.insert(TEXT_KEY.to_string(), Entry::Single(Node::text(text)));
        }
        Node::Object(map)
    }

    fn container(&self, element: &Element) -> Option<Node> {
        let children = self.children(element, false);
        if children.is_empty() {
            return None;
        }

        let mut map = NodeMap::new();
        group_children(&mut map, children);
        Some(Node::Object(map))
    }

    fn children(&self, element: &Element, inside_included: bool) -> Vec<(String, Node)> {
        element
            .children
            .iter()
            .filter_map(|child| {
                let node = match filter::classify(self.config, child, inside_included) {
                    Retention::Drop => None,
                    Retention::Whole => Some(self.whole(child)),
                    Retention::Container => self.container(child),
                }?;
                Some((self.key(child), node))
            })
            .collect()
    }
}

/// Group converted children by key, deciding bare-vs-list after the full scan
fn group_children(map: &mut NodeMap, children: Vec<(String, Node)>) {
    let mut groups: IndexMap<String, Vec<Node>> = IndexMap::new();
    for (key, node) in children {
        groups.entry(key).or_default().push(node);
    }

    for (key, nodes) in groups {
        map.insert(key, Entry::from_siblings(nodes));
    }
}
