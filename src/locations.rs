//! Input source resolution
//!
//! A conversion input is a filesystem path, XML text already in memory, or
//! raw bytes (for instance an uploaded file body).

use std::path::{Path, PathBuf};

/// Conversion input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// File system path
    Path(PathBuf),
    /// XML text
    Text(String),
    /// Raw bytes, expected to be UTF-8 encoded XML
    Bytes(Vec<u8>),
}

impl Source {
    /// Create a source from a string, guessing whether it is XML or a path.
    ///
    /// Input whose first non-blank character is `<` is XML text. Otherwise
    /// an existing path is read from disk, and anything else is handed to
    /// the parser as text so it fails with a parse error rather than a
    /// misleading file lookup.
    pub fn detect(input: &str) -> Self {
        if input.trim_start().starts_with('<') {
            return Source::Text(input.to_string());
        }

        let path = Path::new(input.trim());
        if !input.trim().is_empty() && path.exists() {
            return Source::Path(path.to_path_buf());
        }

        Source::Text(input.to_string())
    }

    /// Short description for log output
    pub fn describe(&self) -> String {
        match self {
            Source::Path(p) => p.display().to_string(),
            Source::Text(s) => format!("<text: {} bytes>", s.len()),
            Source::Bytes(b) => format!("<bytes: {} bytes>", b.len()),
        }
    }

    /// Check if this source is read from the filesystem
    pub fn is_file(&self) -> bool {
        matches!(self, Source::Path(_))
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Source::Text(text)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}
