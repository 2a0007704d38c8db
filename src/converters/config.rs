//! Converter configuration
//!
//! A [`ConverterConfig`] is immutable once built and can be shared freely
//! between concurrent conversions. Invalid filter tags are rejected by
//! [`ConverterConfigBuilder::build`], before any document is parsed.

use crate::error::Result;
use crate::limits::Limits;
use crate::names::validate_filter_tag;
use crate::namespaces::local_part;
use serde::Serialize;
use std::collections::BTreeSet;

/// Tags dropped by the web service unless configured otherwise
pub const DEFAULT_SKIP_TAGS: &[&str] = &["TPA_Extension"];

/// Configuration for the AIDX converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConverterConfig {
    /// Element local names dropped together with their subtree
    skip_tags: BTreeSet<String>,
    /// Element local names retained as subtrees; empty means no filter
    include_only_tags: BTreeSet<String>,
    /// Whether to keep source prefixes in element and attribute names
    preserve_namespaces: bool,
    /// Whether to emit attributes as `@name` entries
    include_attributes: bool,
    /// Input limits
    #[serde(skip)]
    limits: Limits,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            skip_tags: BTreeSet::new(),
            include_only_tags: BTreeSet::new(),
            preserve_namespaces: false,
            include_attributes: true,
            limits: Limits::default(),
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a configuration
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }

    /// Configuration used by the upload service: vendor extensions skipped
    pub fn aidx_default() -> Self {
        Self {
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Tags dropped with their subtree
    pub fn skip_tags(&self) -> &BTreeSet<String> {
        &self.skip_tags
    }

    /// Tags kept as subtrees when the include filter is active
    pub fn include_only_tags(&self) -> &BTreeSet<String> {
        &self.include_only_tags
    }

    /// Check if namespace prefixes are kept
    pub fn preserve_namespaces(&self) -> bool {
        self.preserve_namespaces
    }

    /// Check if attributes are emitted
    pub fn include_attributes(&self) -> bool {
        self.include_attributes
    }

    /// Get the input limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Check if an element with this local name is dropped.
    ///
    /// Skipping takes precedence over the include filter.
    pub fn is_skipped(&self, local_name: &str) -> bool {
        self.skip_tags.contains(local_name)
    }

    /// Check if the include filter is active
    pub fn has_include_filter(&self) -> bool {
        !self.include_only_tags.is_empty()
    }

    /// Check if an element with this local name roots a retained subtree
    pub fn is_included(&self, local_name: &str) -> bool {
        self.include_only_tags.contains(local_name)
    }

    /// Builder pre-filled with this configuration, for per-call overrides
    pub fn to_builder(&self) -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            skip_tags: self.skip_tags.iter().cloned().collect(),
            include_only_tags: self.include_only_tags.iter().cloned().collect(),
            preserve_namespaces: self.preserve_namespaces,
            include_attributes: self.include_attributes,
            limits: self.limits.clone(),
        }
    }
}

/// Builder for [`ConverterConfig`]
#[derive(Debug, Clone)]
pub struct ConverterConfigBuilder {
    skip_tags: Vec<String>,
    include_only_tags: Vec<String>,
    preserve_namespaces: bool,
    include_attributes: bool,
    limits: Limits,
}

impl Default for ConverterConfigBuilder {
    fn default() -> Self {
        Self {
            skip_tags: Vec::new(),
            include_only_tags: Vec::new(),
            preserve_namespaces: false,
            include_attributes: true,
            limits: Limits::default(),
        }
    }
}

impl ConverterConfigBuilder {
    /// Add a tag to skip
    pub fn skip_tag(mut self, tag: impl Into<String>) -> Self {
        self.skip_tags.push(tag.into());
        self
    }

    /// Add several tags to skip
    pub fn with_skip_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add a tag to the include filter
    pub fn include_only_tag(mut self, tag: impl Into<String>) -> Self {
        self.include_only_tags.push(tag.into());
        self
    }

    /// Add several tags to the include filter
    pub fn with_include_only_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_only_tags
            .extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set namespace preservation
    pub fn with_preserve_namespaces(mut self, preserve: bool) -> Self {
        self.preserve_namespaces = preserve;
        self
    }

    /// Set attribute inclusion
    pub fn with_include_attributes(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    /// Set input limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<ConverterConfig> {
        let skip_tags = normalize_tags("skip_tags", &self.skip_tags)?;
        let include_only_tags = normalize_tags("include_only_tags", &self.include_only_tags)?;

        let overlap: Vec<&String> = skip_tags.intersection(&include_only_tags).collect();
        if !overlap.is_empty() {
            tracing::warn!(
                tags = ?overlap,
                "tags are both skipped and included; skipping takes precedence"
            );
        }

        let config = ConverterConfig {
            skip_tags,
            include_only_tags,
            preserve_namespaces: self.preserve_namespaces,
            include_attributes: self.include_attributes,
            limits: self.limits,
        };
        tracing::debug!(?config, "converter configuration built");
        Ok(config)
    }
}

fn normalize_tags(option: &str, tags: &[String]) -> Result<BTreeSet<String>> {
    tags.iter()
        .map(|tag| {
            let local = local_part(tag);
            validate_filter_tag(option, local)?;
            Ok(local.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_converter_config_defaults() {
        let config = ConverterConfig::default();
        assert!(config.skip_tags().is_empty());
        assert!(config.include_only_tags().is_empty());
        assert!(!config.preserve_namespaces());
        assert!(config.include_attributes());
        assert!(!config.has_include_filter());
    }

    #[test]
    fn test_aidx_default_skips_extensions() {
        let config = ConverterConfig::aidx_default();
        assert!(config.is_skipped("TPA_Extension"));
        assert!(!config.is_skipped("FlightLeg"));
    }

    #[test]
    fn test_converter_config_builder() {
        let config = ConverterConfig::builder()
            .skip_tag("TPA_Extension")
            .with_include_only_tags(["FlightLeg", "LegData"])
            .with_preserve_namespaces(true)
            .with_include_attributes(false)
            .build()
            .unwrap();

        assert!(config.is_skipped("TPA_Extension"));
        assert!(config.is_included("LegData"));
        assert!(config.has_include_filter());
        assert!(config.preserve_namespaces());
        assert!(!config.include_attributes());
    }

    #[test]
    fn test_qualified_filter_tags_are_normalized() {
        let config = ConverterConfig::builder()
            .skip_tag("{http://www.iata.org/IATA/2007/00}TPA_Extension")
            .include_only_tag("iata:FlightLeg")
            .build()
            .unwrap();

        assert!(config.is_skipped("TPA_Extension"));
        assert!(config.is_included("FlightLeg"));
    }

    #[test]
    fn test_invalid_filter_tag_rejected_at_build() {
        let err = ConverterConfig::builder()
            .skip_tag("")
            .build()
            .unwrap_err();
        assert_eq!(
            err.parse_kind(),
            Some(ParseErrorKind::UnsupportedConfiguration)
        );

        let err = ConverterConfig::builder()
            .include_only_tag("Flight Leg")
            .build()
            .unwrap_err();
        assert_eq!(
            err.parse_kind(),
            Some(ParseErrorKind::UnsupportedConfiguration)
        );
    }

    #[test]
    fn test_overlapping_filters_are_allowed() {
        let config = ConverterConfig::builder()
            .skip_tag("Leg")
            .include_only_tag("Leg")
            .build()
            .unwrap();

        assert!(config.is_skipped("Leg"));
        assert!(config.is_included("Leg"));
    }

    #[test]
    fn test_to_builder_round_trip() {
        let config = ConverterConfig::aidx_default();
        let overridden = config
            .to_builder()
            .with_include_attributes(false)
            .build()
            .unwrap();

        assert!(overridden.is_skipped("TPA_Extension"));
        assert!(!overridden.include_attributes());
        assert!(config.include_attributes());
    }

    #[test]
    fn test_config_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConverterConfig>();
    }
}
