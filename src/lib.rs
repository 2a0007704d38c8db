//! # aidx2json
//!
//! Converts IATA AIDX (Aviation Information Data Exchange) XML documents
//! into an equivalent nested JSON structure.
//!
//! ## Features
//!
//! - Namespace-aware parsing with optional prefix stripping
//! - Attributes as `@name`, mixed text as `#text`
//! - Repeated siblings grouped into ordered lists
//! - Tag filters: skip subtrees, or keep only selected subtrees
//! - One error type for every input failure
//! - Optional CLI (`cli` feature) and HTTP upload service (`server` feature)
//!
//! ## Example
//!
//! ```rust
//! use aidx2json::converters::{serialize, AidxConverter, ConverterConfig};
//!
//! let config = ConverterConfig::builder()
//!     .skip_tag("TPA_Extension")
//!     .build()?;
//! let converter = AidxConverter::with_config(config);
//!
//! let node = converter.convert_str(
//!     r#"<Flight><Leg><Airline CodeContext="3">JQ</Airline><Num>255</Num></Leg></Flight>"#,
//! )?;
//! assert_eq!(
//!     serialize(&node, 0)?,
//!     r##"{"Flight":{"Leg":{"Airline":{"@CodeContext":"3","#text":"JQ"},"Num":"255"}}}"##
//! );
//! # Ok::<(), aidx2json::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and namespaces
pub mod names;
pub mod namespaces;

// Input handling
pub mod locations;
pub mod loaders;
pub mod documents;

// Conversion
pub mod converters;
pub mod batch;

#[cfg(feature = "cli")]
pub mod logging;

#[cfg(feature = "server")]
pub mod server;

// Re-exports for convenience
pub use converters::{
    parse_aidx, parse_from_path, parse_from_string, serialize, AidxConverter, ConverterConfig,
    Node, OutputFormat,
};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use locations::Source;

/// Version of the aidx2json library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
