//! Output filename derivation for composed documents.
//!
//! Editorial staff file each composed document under a name that identifies the article at a
//! glance: the DOI's trailing article number, the article's id in the journal website, the
//! volume and issue, and the publication year.
//!
//! # Examples
//!
//! ```
//! use jatsgen::{date::NormalizedDate, fact::Outcome, filename};
//!
//! let xml = r#"<Article>
//!   <ELocationID EIdType="doi">10.33093/jiwe.2024.3.2.5</ELocationID>
//! </Article>"#;
//! let year = Outcome::Extracted(NormalizedDate::UNKNOWN);
//! let url = "https://journals.example.org/article/view/1234";
//! let name = filename::derive_filename(xml, url, &year);
//! assert_eq!(name, "5_1234_Vol.3_No.2_null.xml");
//! ```

use super::*;
use crate::identifier::ArticleIdentity;

/// Filename used when the source record cannot be read at all.
pub const DEFAULT_FILENAME: &str = "formatted_article_set.xml";

lazy_static! {
  /// Runs of digits in an article URL.
  static ref URL_NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// Derives the output filename from the raw source XML.
///
/// The name has the form `{doiNumber}_{urlNumber}_Vol.{volume}_No.{issue}_{year}.xml`:
/// - `doiNumber` is the last `.`-separated DOI segment when it is all digits
/// - `urlNumber` is the last run of digits in `article_url`, or `-`
/// - volume and issue follow the same precedence as the composed document
/// - `year` is the webpage publication year; when the webpage could not be read at all, the
///   record's `PubDate[@PubStatus='pub']/Year` is used instead
///
/// Empty parts are left out.
///
/// # Arguments
///
/// * `xml` - The source record
/// * `article_url` - URL of the article webpage
/// * `published` - The webpage publication date, as fetched
///
/// # Returns
///
/// The filename, or [`DEFAULT_FILENAME`] if `xml` is not well formed.
pub fn derive_filename(
  xml: &str,
  article_url: &str,
  published: &Outcome<NormalizedDate>,
) -> String {
  match Element::parse(xml) {
    Ok(root) => filename_from_root(&root, article_url, published),
    Err(e) => {
      warn!("Could not generate filename: {e}");
      DEFAULT_FILENAME.to_string()
    },
  }
}

/// Derives the output filename from an already parsed source record.
///
/// See [`derive_filename`].
pub fn filename_from_root(
  root: &Element,
  article_url: &str,
  published: &Outcome<NormalizedDate>,
) -> String {
  let doi =
    Fact::from_text(root.find_with_attr("ELocationID", "EIdType", "doi").and_then(Element::text));

  let doi_number = doi
    .known()
    .and_then(|doi| doi.rsplit('.').next())
    .filter(|last| !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()))
    .unwrap_or_default()
    .to_string();

  let url_number = URL_NUMBER
    .find_iter(article_url)
    .last()
    .map_or_else(|| "-".to_string(), |m| m.as_str().to_string());

  let identity =
    ArticleIdentity::derive(&doi, root.find_text("Volume"), root.find_text("Issue"), 0);

  let year = match published {
    Outcome::Extracted(date) => date.year(),
    Outcome::Degraded { .. } => root
      .find_with_attr("PubDate", "PubStatus", "pub")
      .and_then(|date| date.child("Year"))
      .and_then(Element::text)
      .map_or_else(|| fact::NULL.to_string(), |year| year.trim().to_string()),
  };

  let parts = [
    doi_number,
    url_number,
    format!("Vol.{}", identity.volume),
    format!("No.{}", identity.issue),
    year,
  ];
  let filename =
    parts.iter().filter(|part| !part.is_empty()).cloned().collect::<Vec<_>>().join("_");
  debug!("Derived output filename {filename}");
  format!("{filename}.xml")
}
