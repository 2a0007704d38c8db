//! Element retention rules
//!
//! Decides, per element, whether it is dropped, converted whole, or kept
//! only as a container for included descendants.

use super::ConverterConfig;
use crate::documents::Element;

/// How an element takes part in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Omitted together with its subtree
    Drop,
    /// Converted with attributes, text and all non-skipped descendants
    Whole,
    /// Kept only if some descendant is retained; attributes and text dropped
    Container,
}

/// Classify an element.
///
/// `inside_included` is true below an element that matched the include
/// filter; such subtrees are only subject to `skip_tags`.
pub fn classify(config: &ConverterConfig, element: &Element, inside_included: bool) -> Retention {
    let local = element.local_name();
    if config.is_skipped(local) {
        Retention::Drop
    } else if inside_included || !config.has_include_filter() || config.is_included(local) {
        Retention::Whole
    } else {
        Retention::Container
    }
}
