//! Journal abbreviation, volume, issue and composite article identifiers derived from DOIs.
//!
//! Publisher DOIs embed the journal shortcode and, usually, the year, volume and issue:
//! `10.33093/jiwe.2024.3.2.5` is journal `JIWE`, year 2024, volume 3, issue 2. The year
//! segment acts as the anchor; the segment in front of it names the journal and the two
//! after it are volume and issue.
//!
//! The journal is looked up among the `.`- and `/`-separated segments, while volume and issue
//! are looked up among the `.`-separated segments only, so a four-digit registrant such as
//! `10.1016/j.jss.2024.3.2` does not pass for a year there.
//!
//! # Examples
//!
//! ```
//! use jatsgen::{fact::Fact, identifier::ArticleIdentity};
//!
//! let doi = Fact::Known("10.33093/jiwe.2024.3.2.5".to_string());
//! let identity = ArticleIdentity::derive(&doi, None, None, 12);
//! assert_eq!(identity.abbreviation.render(), "JIWE");
//! assert_eq!(identity.custom_id(), "jJIWE.v3.i2.pg12");
//! ```

use super::*;

/// Placeholder for a volume or issue that neither the record nor the DOI provides.
pub const MISSING_NUMBER: &str = "-";

lazy_static! {
  /// Year written directly after a short alphabetic label, e.g. `vol2024`.
  static ref LABELLED_YEAR: Regex = Regex::new(r"^[A-Za-z]+\d{4}$").unwrap();
}

/// Journal and issue identity of an article.
///
/// The composite identifier is not stored; it is always computed by
/// [`ArticleIdentity::custom_id`] from the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleIdentity {
  /// The article DOI
  pub doi:          Fact<String>,
  /// Upper-case journal shortcode taken from the DOI
  pub abbreviation: Fact<String>,
  /// Volume number, or [`MISSING_NUMBER`]
  pub volume:       String,
  /// Issue number, or [`MISSING_NUMBER`]
  pub issue:        String,
  /// First page of the article, `0` when unknown
  pub first_page:   i64,
}

impl ArticleIdentity {
  /// Derives the identity from a DOI plus the record's own volume and issue.
  ///
  /// Explicit (non-blank) `volume` and `issue` always win over DOI-derived values. Each is
  /// taken from the DOI independently, and only when the DOI has at least two segments after
  /// a bare four-digit year.
  pub fn derive(
    doi: &Fact<String>,
    volume: Option<&str>,
    issue: Option<&str>,
    first_page: i64,
  ) -> Self {
    fn explicit(value: Option<&str>) -> Option<&str> {
      value.map(str::trim).filter(|v| !v.is_empty())
    }

    let (doi_volume, doi_issue) = match doi.known() {
      Some(doi) => volume_and_issue(doi),
      None => (None, None),
    };

    let volume = explicit(volume).map(str::to_string).or(doi_volume);
    let issue = explicit(issue).map(str::to_string).or(doi_issue);
    trace!("Resolved volume {volume:?}, issue {issue:?} for DOI {doi:?}");

    Self {
      doi: doi.clone(),
      abbreviation: match doi.known() {
        Some(doi) => journal_abbreviation(doi),
        None => Fact::Absent,
      },
      volume: volume.unwrap_or_else(|| MISSING_NUMBER.to_string()),
      issue: issue.unwrap_or_else(|| MISSING_NUMBER.to_string()),
      first_page,
    }
  }

  /// The composite article identifier.
  ///
  /// Built as the lower-cased first letter of the abbreviation, the abbreviation itself, then
  /// `.v{volume}.i{issue}.pg{first_page}`. An unknown abbreviation contributes its rendered
  /// form, `"null"`, so the identifier is always well formed: `nnull.v-.i-.pg0`.
  pub fn custom_id(&self) -> String {
    let abbreviation = self.abbreviation.render();
    let initial: String = abbreviation.chars().take(1).flat_map(char::to_lowercase).collect();
    format!(
      "{initial}{abbreviation}.v{}.i{}.pg{}",
      self.volume, self.issue, self.first_page
    )
  }
}

/// Splits a DOI into its `.`- and `/`-separated segments.
fn segments(doi: &str) -> Vec<&str> { doi.trim().split(['.', '/']).collect() }

/// Whether a segment is a bare four-digit year.
fn is_year(segment: &str) -> bool {
  segment.len() == 4 && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Finds the index of the year marker.
///
/// A bare four-digit segment is preferred anywhere in the DOI; failing that, the first
/// segment made of a label and a four-digit year (`vol2024`) is used.
fn year_marker(segments: &[&str]) -> Option<usize> {
  segments
    .iter()
    .position(|s| is_year(s))
    .or_else(|| segments.iter().position(|s| LABELLED_YEAR.is_match(s)))
}

/// Extracts the upper-case journal shortcode: the segment in front of the year marker.
///
/// A DOI without a year marker, with nothing in front of it, or with an empty segment there
/// is [`Fact::Unparsed`].
pub fn journal_abbreviation(doi: &str) -> Fact<String> {
  let segments = segments(doi);
  match year_marker(&segments) {
    Some(i) if i > 0 && !segments[i - 1].is_empty() => Fact::Known(segments[i - 1].to_uppercase()),
    _ => {
      debug!("No journal abbreviation in DOI {doi:?}");
      Fact::Unparsed
    },
  }
}

/// The two `.`-separated segments following a bare four-digit year, if both exist.
///
/// Labelled years such as `vol2024` name the journal but are not followed by plain numbers,
/// so they yield nothing here.
fn volume_and_issue(doi: &str) -> (Option<String>, Option<String>) {
  let segments: Vec<&str> = doi.trim().split('.').collect();
  match segments.iter().position(|s| is_year(s)) {
    Some(i) if segments.len() > i + 2 =>
      (Some(segments[i + 1].to_string()), Some(segments[i + 2].to_string())),
    _ => (None, None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doi(text: &str) -> Fact<String> { Fact::Known(text.to_string()) }

  #[test]
  fn test_abbreviation_before_year() {
    assert_eq!(journal_abbreviation("10.33093/jiwe.2024.3.2.5"), doi("JIWE"));
    assert_eq!(journal_abbreviation("10.12345/ijcs.2019.15"), doi("IJCS"));
  }

  #[test]
  fn test_abbreviation_before_labelled_year() {
    assert_eq!(journal_abbreviation("10.22452/mjcs.vol2024.no1.5"), doi("MJCS"));
  }

  #[test]
  fn test_abbreviation_unavailable() {
    assert_eq!(journal_abbreviation("10.22452/abc.def"), Fact::Unparsed);
    assert_eq!(journal_abbreviation("2024.3.2"), Fact::Unparsed);
    assert_eq!(journal_abbreviation("10.33/.2024.1.2"), Fact::Unparsed);
    assert_eq!(journal_abbreviation(""), Fact::Unparsed);
  }

  #[test]
  fn test_volume_and_issue_from_doi() {
    let identity = ArticleIdentity::derive(&doi("10.33093/jiwe.2024.3.2.5"), None, Some(" "), 12);
    assert_eq!(identity.volume, "3");
    assert_eq!(identity.issue, "2");
    assert_eq!(identity.custom_id(), "jJIWE.v3.i2.pg12");
  }

  #[test]
  fn test_explicit_values_take_precedence() {
    let identity = ArticleIdentity::derive(&doi("10.33093/jiwe.2024.3.2.5"), Some("7"), None, 1);
    assert_eq!(identity.volume, "7");
    assert_eq!(identity.issue, "2");
  }

  #[test]
  fn test_too_few_segments_after_year() {
    let identity = ArticleIdentity::derive(&doi("10.12345/ijcs.2019.15"), None, None, 0);
    assert_eq!(identity.volume, MISSING_NUMBER);
    assert_eq!(identity.issue, MISSING_NUMBER);
  }

  #[test]
  fn test_labelled_year_gives_no_volume_or_issue() {
    let identity = ArticleIdentity::derive(&doi("10.22452/mjcs.vol2024.no1.5"), None, None, 3);
    assert_eq!(identity.abbreviation.render(), "MJCS");
    assert_eq!(identity.volume, MISSING_NUMBER);
    assert_eq!(identity.issue, MISSING_NUMBER);
    assert_eq!(identity.custom_id(), "mMJCS.v-.i-.pg3");
  }

  #[test]
  fn test_registrant_prefix_is_not_a_year() {
    let identity = ArticleIdentity::derive(&doi("10.1016/j.jss.2024.3.2"), None, None, 0);
    assert_eq!(identity.volume, "3");
    assert_eq!(identity.issue, "2");
  }

  #[test]
  fn test_missing_doi_defaults() {
    let identity = ArticleIdentity::derive(&Fact::Absent, None, None, 0);
    assert_eq!(identity.doi.render(), "null");
    assert_eq!(identity.abbreviation.render(), "null");
    assert_eq!(identity.volume, "-");
    assert_eq!(identity.issue, "-");
    assert_eq!(identity.custom_id(), "nnull.v-.i-.pg0");
  }
}
