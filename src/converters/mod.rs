//! XML to JSON converters
//!
//! This module provides the AIDX structural conversion, its configuration,
//! and JSON rendering of the result.
//!
//! Conventions:
//! - Attributes: `@name`
//! - Text next to attributes or children: `#text`
//! - Repeated siblings: JSON array in document order
//! - Text-only elements: bare string

mod aidx;
mod config;
mod filter;
mod node;

pub use aidx::{AidxConverter, Conversion, ATTR_PREFIX, TEXT_KEY};
pub use config::{ConverterConfig, ConverterConfigBuilder, DEFAULT_SKIP_TAGS};
pub use filter::{classify, Retention};
pub use node::{Entry, Node, NodeMap};

use crate::error::{Error, Result};
use crate::locations::Source;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;
use std::str::FromStr;

/// Default indentation for JSON text output
pub const DEFAULT_INDENT: usize = 2;

/// Output format of the one-shot conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Converted node tree
    #[default]
    Structured,
    /// JSON text
    Text,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "structured" | "dict" => Ok(OutputFormat::Structured),
            "text" | "json" => Ok(OutputFormat::Text),
            _ => Err(Error::Value(format!(
                "Unknown output format: {}. Use: structured, text",
                s
            ))),
        }
    }
}

/// Result of the one-shot conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    /// Converted node tree
    Structured(Node),
    /// JSON text
    Text(String),
}

impl Converted {
    /// Get the node tree, if structured
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Converted::Structured(node) => Some(node),
            Converted::Text(_) => None,
        }
    }

    /// Get the JSON text, if text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Converted::Text(text) => Some(text),
            Converted::Structured(_) => None,
        }
    }
}

/// Render a node as JSON text.
///
/// `indent` is the number of spaces per level; 0 gives compact output.
/// Keys keep insertion order and non-ASCII text is written unescaped.
pub fn serialize(node: &Node, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(node)?);
    }

    let indent_bytes = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent_bytes));
    node.serialize(&mut serializer)?;

    String::from_utf8(out).map_err(|e| Error::Value(format!("non UTF-8 JSON output: {}", e)))
}

/// Convert the XML file at `path`
pub fn parse_from_path(path: impl AsRef<Path>, config: &ConverterConfig) -> Result<Node> {
    AidxConverter::with_config(config.clone()).convert_path(path)
}

/// Convert XML text
pub fn parse_from_string(xml: &str, config: &ConverterConfig) -> Result<Node> {
    AidxConverter::with_config(config.clone()).convert_str(xml)
}

/// One-shot conversion of a path or XML text.
///
/// The input kind is guessed with [`Source::detect`]. Without a
/// configuration the default one is used.
pub fn parse_aidx(
    input: &str,
    format: OutputFormat,
    config: Option<&ConverterConfig>,
) -> Result<Converted> {
    let converter = match config {
        Some(config) => AidxConverter::with_config(config.clone()),
        None => AidxConverter::new(),
    };
    let node = converter.convert_source(&Source::detect(input))?;

    match format {
        OutputFormat::Structured => Ok(Converted::Structured(node)),
        OutputFormat::Text => Ok(Converted::Text(serialize(&node, DEFAULT_INDENT)?)),
    }
}
