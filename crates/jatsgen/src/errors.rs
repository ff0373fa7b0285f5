//! Error types for the jatsgen library.
//!
//! Only failures that stop a step outright are represented here:
//! - Structural problems with the bibliographic source XML
//! - Malformed markup in any XML input
//! - Network, PDF and filesystem failures
//! - A template without a usable `<front>` anchor
//!
//! A date, DOI or page field that simply fails to parse is never an error. Those become
//! [`Fact::Absent`](crate::fact::Fact) or [`Fact::Unparsed`](crate::fact::Fact) values and
//! render as the `"null"` sentinel in the output.
//!
//! # Examples
//!
//! ```
//! use jatsgen::{errors::JatsError, source::SourceRecord};
//!
//! let result = SourceRecord::parse("<ArticleSet><Other/></ArticleSet>");
//! match result {
//!   Err(JatsError::MissingElement(name)) => println!("source XML lacks <{name}>"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => println!("Success!"),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while converting an article.
#[derive(Error, Debug)]
pub enum JatsError {
  /// A required element is missing from the bibliographic source XML.
  ///
  /// This is fatal for the conversion at hand: `Article`, `Journal`, `JournalTitle` and
  /// `Issn` must all be present. The parameter names the missing element.
  #[error("Required element <{0}> not found in the input XML")]
  MissingElement(&'static str),

  /// An XML document could not be tokenized.
  ///
  /// Covers the source record, a previously composed fragment handed to the splicer,
  /// and malformed attribute or entity syntax inside either.
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),

  /// The XML document ended with unclosed elements, or never opened one.
  #[error("Malformed XML document: {0}")]
  MalformedXml(String),

  /// A network request failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// Failed to parse a URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// The PDF could not be opened or a page could not be read.
  #[error(transparent)]
  Pdf(#[from] lopdf::Error),

  /// A configured CSS selector is not valid.
  #[error("Invalid HTML selector `{0}`")]
  Selector(String),

  /// The template has no `<front>` or `</front>` marker.
  ///
  /// The parameter is the marker that could not be found.
  #[error("Template does not contain the {0} marker")]
  MissingAnchor(&'static str),

  /// The template's `</front>` marker appears before its `<front>` marker.
  #[error("Template closes </front> before opening <front>")]
  AnchorOrder,

  /// The conversion report could not be serialized.
  #[error(transparent)]
  Report(#[from] serde_json::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  Config(#[from] toml::de::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),
}

impl JatsError {
  /// Checks if this error is structural, i.e. caused by the shape of the source XML rather
  /// than by the environment.
  ///
  /// Structural failures produce no partial output, so front ends report them to the
  /// operator as a problem with the uploaded record.
  pub fn is_structural(&self) -> bool {
    matches!(self, JatsError::MissingElement(_) | JatsError::Xml(_) | JatsError::MalformedXml(_))
  }
}
