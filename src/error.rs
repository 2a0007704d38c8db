//! Error types for aidx2json
//!
//! Every failure while reading or parsing an input surfaces as a single
//! [`ParseError`] carrying a [`ParseErrorKind`] sub-reason, so callers have one
//! error surface to handle. The top-level [`Error`] additionally covers
//! serialization and caller mistakes that are not about the input document.

use std::fmt;
use thiserror::Error;

/// Result type alias using aidx2json Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for aidx2json operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be read or parsed, or the configuration is invalid
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Value error (unknown selector or option value)
    #[error("value error: {0}")]
    Value(String),

    /// I/O error outside input loading (sockets, output files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Sub-reason of the error when it is a parse error
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Returns true if the failure is attributable to the caller's input
    pub fn is_input_error(&self) -> bool {
        match self {
            Error::Parse(e) => e.kind.is_input_error(),
            Error::Value(_) => true,
            Error::Json(_) | Error::Io(_) => false,
        }
    }
}

/// Sub-reason of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Input path does not resolve to a readable file
    NotFound,
    /// Input source contains no content to parse
    EmptyInput,
    /// Input fails well-formedness parsing
    MalformedXml,
    /// Invalid configuration, caught when the configuration is built
    UnsupportedConfiguration,
    /// Input exceeds a configured size or nesting limit
    LimitExceeded,
}

impl ParseErrorKind {
    /// Short stable label for the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::NotFound => "not_found",
            ParseErrorKind::EmptyInput => "empty_input",
            ParseErrorKind::MalformedXml => "malformed_xml",
            ParseErrorKind::UnsupportedConfiguration => "unsupported_configuration",
            ParseErrorKind::LimitExceeded => "limit_exceeded",
        }
    }

    /// Returns true if the kind describes a problem with the supplied document
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ParseErrorKind::UnsupportedConfiguration)
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-based row and column inside the parsed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    /// Row, starting at 1
    pub row: u32,
    /// Column, starting at 1
    pub col: u32,
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// Distinguished error for every input and configuration failure
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Sub-reason
    pub kind: ParseErrorKind,
    /// Error message, including the parser diagnostic when there is one
    pub message: String,
    /// Position in the input text, when the parser reported one
    pub position: Option<TextPosition>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    /// Input path does not exist or cannot be read
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::NotFound, message)
    }

    /// Input has nothing to parse
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::EmptyInput, message)
    }

    /// Input is not well-formed XML
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::MalformedXml, message)
    }

    /// Configuration is invalid
    pub fn unsupported_configuration(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::UnsupportedConfiguration, message)
    }

    /// Input exceeds a limit
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::LimitExceeded, message)
    }

    /// Set the position
    pub fn with_position(mut self, row: u32, col: u32) -> Self {
        self.position = Some(TextPosition { row, col });
        self
    }

    /// Get the sub-reason
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        // Parser diagnostics often end with the position already
        if let Some(ref position) = self.position {
            if !self.message.ends_with(&position.to_string()) {
                write!(f, " (at {})", position)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::malformed("unexpected end of stream").with_position(3, 14);

        let msg = format!("{}", err);
        assert!(msg.contains("unexpected end of stream"));
        assert!(msg.contains("at 3:14"));
    }

    #[test]
    fn test_parse_error_without_position() {
        let err = ParseError::empty_input("XML input is empty");
        assert_eq!(err.to_string(), "XML input is empty");
        assert_eq!(err.kind(), ParseErrorKind::EmptyInput);
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::not_found("missing.xml").into();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::NotFound));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_configuration_error_is_not_input_error() {
        let err: Error = ParseError::unsupported_configuration("bad tag").into();
        assert!(!err.is_input_error());
        assert_eq!(
            err.parse_kind().map(|k| k.as_str()),
            Some("unsupported_configuration")
        );
    }

    #[test]
    fn test_value_error_has_no_parse_kind() {
        let err = Error::Value("unknown output format: yaml".to_string());
        assert!(err.parse_kind().is_none());
    }
}
