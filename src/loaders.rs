//! Input loading
//!
//! Reads a [`Source`] into UTF-8 text, mapping every I/O and decoding
//! failure onto the distinguished [`ParseError`](crate::error::ParseError).

use crate::error::{ParseError, Result};
use crate::limits::Limits;
use crate::locations::Source;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loader for conversion inputs
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Input limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load a source as text
    pub fn load(&self, source: &Source) -> Result<String> {
        match source {
            Source::Path(path) => self.load_path(path),
            Source::Text(text) => {
                self.limits.check_xml_size(text.len())?;
                Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
            }
            Source::Bytes(bytes) => {
                self.limits.check_xml_size(bytes.len())?;
                decode(bytes.clone())
            }
        }
    }

    /// Load a file from disk as text
    pub fn load_path(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
        if !metadata.is_file() {
            return Err(
                ParseError::not_found(format!("Path is not a file: {}", path.display())).into(),
            );
        }

        // Check size limits before reading the whole file
        self.limits.check_xml_size(metadata.len() as usize)?;

        let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "read XML file");
        decode(bytes)
    }
}

/// Decode raw bytes as UTF-8, dropping a leading byte order mark
pub fn decode(mut bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    String::from_utf8(bytes).map_err(|e| {
        ParseError::malformed(format!(
            "Input is not valid UTF-8 (invalid byte at offset {})",
            e.utf8_error().valid_up_to()
        ))
        .into()
    })
}

fn io_error(path: &Path, err: std::io::Error) -> crate::error::Error {
    let message = match err.kind() {
        ErrorKind::NotFound => format!("File not found: {}", path.display()),
        ErrorKind::PermissionDenied => {
            format!("Permission denied reading file: {}", path.display())
        }
        _ => format!("Failed to read file '{}': {}", path.display(), err),
    };
    ParseError::not_found(message).into()
}
