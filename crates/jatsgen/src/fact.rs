//! Tagged values for facts that may be missing, unreadable, or recovered from a fallback.
//!
//! The output schema renders every missing scalar as the literal string `"null"`. Inside
//! the library that literal never appears: a fact is either [`Fact::Known`], absent from its
//! source, or present but unparsable, and the three cases only collapse into `"null"` when
//! [`Fact::render`] is called at the serialization boundary.
//!
//! Steps that can quietly fall back to a default (the webpage fetch) report it through
//! [`Outcome`], so callers can tell "used a fallback" apart from "genuinely absent".
//!
//! # Examples
//!
//! ```
//! use jatsgen::fact::Fact;
//!
//! let doi: Fact<String> = Fact::from_text(Some("  10.33093/jiwe.2024.3.2.5 "));
//! assert_eq!(doi.render(), "10.33093/jiwe.2024.3.2.5");
//!
//! let missing: Fact<String> = Fact::from_text(None);
//! assert_eq!(missing.render(), "null");
//! ```

use std::fmt::Display;

use super::*;

/// The literal token written wherever a fact is unknown.
pub const NULL: &str = "null";

/// A single extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fact<T> {
  /// The fact was found and interpreted.
  Known(T),
  /// The source did not carry the fact at all.
  Absent,
  /// The source carried something that could not be interpreted.
  Unparsed,
}

impl<T> Fact<T> {
  /// Returns the known value, if any.
  pub fn known(&self) -> Option<&T> {
    match self {
      Fact::Known(value) => Some(value),
      _ => None,
    }
  }

  /// Whether the fact is [`Fact::Known`].
  pub fn is_known(&self) -> bool { matches!(self, Fact::Known(_)) }

  /// Maps the known value, keeping the reason for absence otherwise.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fact<U> {
    match self {
      Fact::Known(value) => Fact::Known(f(value)),
      Fact::Absent => Fact::Absent,
      Fact::Unparsed => Fact::Unparsed,
    }
  }
}

impl Fact<String> {
  /// Builds a text fact from optional element or field text.
  ///
  /// Text is trimmed; `None` and whitespace-only text are both treated as absent.
  pub fn from_text(text: Option<&str>) -> Self {
    match text.map(str::trim) {
      Some(text) if !text.is_empty() => Fact::Known(text.to_string()),
      _ => Fact::Absent,
    }
  }
}

impl<T: Display> Fact<T> {
  /// Renders the fact for output, using [`NULL`] for anything not known.
  pub fn render(&self) -> String {
    match self {
      Fact::Known(value) => value.to_string(),
      Fact::Absent | Fact::Unparsed => NULL.to_string(),
    }
  }
}

/// The result of a step that degrades instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
  /// The step ran to completion.
  Extracted(T),
  /// The step failed and `value` is the fallback that was substituted.
  Degraded {
    /// The fallback value
    value:  T,
    /// Why the step fell back, for the operator and the conversion report
    reason: String,
  },
}

impl<T> Outcome<T> {
  /// The value, whether extracted or substituted.
  pub fn value(&self) -> &T {
    match self {
      Outcome::Extracted(value) | Outcome::Degraded { value, .. } => value,
    }
  }

  /// Consumes the outcome, returning the value.
  pub fn into_value(self) -> T {
    match self {
      Outcome::Extracted(value) | Outcome::Degraded { value, .. } => value,
    }
  }

  /// Borrows the value, keeping the reason for falling back.
  pub fn as_ref(&self) -> Outcome<&T> {
    match self {
      Outcome::Extracted(value) => Outcome::Extracted(value),
      Outcome::Degraded { value, reason } => Outcome::Degraded { value, reason: reason.clone() },
    }
  }

  /// Maps the value, keeping the reason for falling back.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match self {
      Outcome::Extracted(value) => Outcome::Extracted(f(value)),
      Outcome::Degraded { value, reason } => Outcome::Degraded { value: f(value), reason },
    }
  }

  /// The reason for falling back, if the step degraded.
  pub fn degraded_reason(&self) -> Option<&str> {
    match self {
      Outcome::Extracted(_) => None,
      Outcome::Degraded { reason, .. } => Some(reason),
    }
  }
}
