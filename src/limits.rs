//! Limits and constraints for document processing
//!
//! These bound the size of accepted inputs and the depth of the element
//! tree walked by the converter.

use crate::error::{ParseError, Result};

/// Input limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Maximum XML input size in bytes
    pub max_xml_size: usize,

    /// Maximum number of parser nodes (elements, attributes, text)
    pub nodes_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            nodes_limit: u32::MAX,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parser node limit
    pub fn with_nodes_limit(mut self, limit: u32) -> Self {
        self.nodes_limit = limit;
        self
    }

    /// Set the maximum input size
    pub fn with_max_xml_size(mut self, size: usize) -> Self {
        self.max_xml_size = size;
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check if XML depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(ParseError::limit_exceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_depth
            ))
            .into())
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(ParseError::limit_exceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            ))
            .into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_depth, 1000);
        assert!(limits.check_depth(500).is_ok());
        assert!(limits.check_depth(1500).is_err());
    }

    #[test]
    fn test_nodes_limit_reaches_parser() {
        let limits = Limits::default().with_nodes_limit(3);
        let err = crate::documents::Document::parse("<a><b/><c/><d/></a>", &limits).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::LimitExceeded));
    }

    #[test]
    fn test_check_xml_size() {
        let limits = Limits::default().with_max_xml_size(1024);
        assert!(limits.check_xml_size(1024).is_ok());

        let err = limits.check_xml_size(1025).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::LimitExceeded));
    }
}
