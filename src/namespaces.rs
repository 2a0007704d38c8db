//! XML namespace handling
//!
//! Element and attribute names are kept as [`QName`]s carrying the resolved
//! namespace URI, the prefix used in the source text, and the local name.
//! The converter turns them into output keys with [`QName::emission_name`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// XML namespace, bound to the `xml` prefix by definition
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

static CLARK_NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{[^}]*\}").expect("Clark notation pattern is valid"));

/// Qualified name - namespace, source prefix and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Prefix as written in the source (None when unprefixed)
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace and an optional source prefix
    pub fn namespaced(
        namespace: impl Into<String>,
        prefix: Option<impl Into<String>>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: prefix.map(Into::into),
            local_name: local_name.into(),
        }
    }

    /// Name as written in the source: `prefix:local` or `local`
    pub fn prefixed(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, self.local_name),
            _ => self.local_name.clone(),
        }
    }

    /// Key used for this name in converted output
    pub fn emission_name(&self, preserve_namespaces: bool) -> String {
        if preserve_namespaces {
            self.prefixed()
        } else {
            self.local_name.clone()
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefixed())
    }
}

/// Split a raw `prefix:local` name into its prefix and local parts
pub fn split_prefixed(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Strip any namespace qualification from a name.
///
/// Accepts Clark notation (`{uri}local`), prefixed names (`ns:local`) and
/// bare local names.
pub fn local_part(name: &str) -> &str {
    let name = name.trim();
    let unclarked = match CLARK_NAMESPACE.find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    };
    split_prefixed(unclarked).1
}
