//! Free-text date normalization.
//!
//! Dates show up in PDF history lines ("Received: 1 January 2023"), on article webpages
//! ("Published: Jun 14, 2024") and from manual operator entry. All of them go through
//! [`parse_date`], which accepts a fixed list of formats and otherwise yields the unknown
//! date. It never fails.
//!
//! # Examples
//!
//! ```
//! use jatsgen::date::parse_date;
//!
//! let date = parse_date("2 February 2023");
//! assert_eq!((date.year(), date.month(), date.day()), ("2023".into(), "02".into(), "02".into()));
//!
//! let unknown = parse_date("sometime last spring");
//! assert_eq!(unknown.year(), "null");
//! ```

use super::*;

/// Accepted formats, tried in order. Month names match case-insensitively and either the
/// full name or its three-letter abbreviation is accepted by each.
const DATE_FORMATS: [&str; 4] = ["%d %B %Y", "%B %d, %Y", "%d %b %Y", "%b %d, %Y"];

/// A calendar date that may be unknown.
///
/// Rendering produces the year, the zero-padded month and the zero-padded day, or `"null"`
/// for all three when the date is unknown. A date is never partially known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedDate(Fact<NaiveDate>);

impl NormalizedDate {
  /// The unknown date.
  pub const UNKNOWN: Self = Self(Fact::Absent);

  /// Wraps a known date.
  pub fn known(date: NaiveDate) -> Self { Self(Fact::Known(date)) }

  /// The underlying date, if known.
  pub fn date(&self) -> Option<NaiveDate> { self.0.known().copied() }

  /// Whether the date is unknown.
  pub fn is_unknown(&self) -> bool { !self.0.is_known() }

  /// The year, e.g. `"2023"`.
  pub fn year(&self) -> String { self.0.map(|d| d.year()).render() }

  /// The zero-padded month, e.g. `"02"`.
  pub fn month(&self) -> String { self.0.map(|d| format!("{:02}", d.month())).render() }

  /// The zero-padded day, e.g. `"09"`.
  pub fn day(&self) -> String { self.0.map(|d| format!("{:02}", d.day())).render() }
}

impl Default for NormalizedDate {
  fn default() -> Self { Self::UNKNOWN }
}

/// Parses a free-text date against the accepted formats.
///
/// The first format that parses the whole (trimmed) string wins. Anything else, including
/// an impossible date such as 31 February, produces [`NormalizedDate::UNKNOWN`].
pub fn parse_date(text: &str) -> NormalizedDate {
  let text = text.trim();
  for format in DATE_FORMATS {
    match NaiveDate::parse_from_str(text, format) {
      Ok(date) => return NormalizedDate::known(date),
      Err(e) => trace!("date {text:?} does not match {format:?}: {e}"),
    }
  }
  debug!("No accepted date format matches {text:?}");
  NormalizedDate(if text.is_empty() { Fact::Absent } else { Fact::Unparsed })
}
