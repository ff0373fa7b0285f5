//! Editorial history ("Received … Accepted …") extraction from article PDFs.
//!
//! Journals print the history line in a handful of layouts:
//!
//! - `Received: 1 January 2023, Accepted: 2 February 2023`
//! - `Received 1 January 2023 Accepted 2 February 2023`
//! - `Received on 1 January 2023; Accepted on 2 February 2023`
//! - `Received: 1 Jan 2023 | Revised: 9 Jan 2023 | Accepted: 2 Feb 2023`
//! - `Received: 1 January 2023; Accepted: 2 February 2023`
//!
//! Pages are scanned in order and each page is tried against the layouts in the order
//! above; the first hit wins and nothing after it is read. When nothing matches, or the PDF
//! cannot be read, the caller gets [`HistoryExtraction::NotFound`] and must obtain the dates
//! from the operator instead (see [`ManualDate`]).
//!
//! # Examples
//!
//! ```
//! use jatsgen::history::{extract_from_pages, HistoryExtraction};
//!
//! let pages = ["Received: 1 January 2023; Accepted: 2 February 2023".to_string()];
//! match extract_from_pages(pages.into_iter().map(Ok)) {
//!   HistoryExtraction::Found(history) => assert_eq!(history.accepted.month(), "02"),
//!   HistoryExtraction::NotFound(reason) => panic!("{reason}"),
//! }
//! ```

use lopdf::Document;

use super::*;
use crate::date::parse_date;

/// A date as printed in history lines: `Month D, YYYY` or `D Month YYYY`, with optional comma.
const DATE: &str = r"(?:[A-Za-z]{3,9}\s+\d{1,2},?\s*\d{4}|\d{1,2}\s+[A-Za-z]{3,9},?\s*\d{4})";

/// English month names, in calendar order, as offered for manual entry.
pub const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

lazy_static! {
  /// History line layouts in priority order. Capture 1 is the received date, 2 the accepted.
  static ref HISTORY_PATTERNS: Vec<Regex> = [
    format!(r"(?i)Received\s*[:\-]?\s*({DATE}),\s*Accepted\s*[:\-]?\s*({DATE})"),
    format!(r"(?i)Received\s+({DATE})\s+Accepted\s+({DATE})"),
    format!(r"(?i)Received\s+on\s+({DATE})\s*;\s*Accepted\s+on\s+({DATE})"),
    format!(
      r"(?i)Received[:\-]?\s*({DATE})\s*\|\s*(?:Revised[:\-]?\s*{DATE}\s*\|\s*)?Accepted[:\-]?\s*({DATE})"
    ),
    format!(r"(?i)Received\s*[:\-]?\s*({DATE})\s*;\s*Accepted\s*[:\-]?\s*({DATE})"),
  ]
  .iter()
  .map(|pattern| Regex::new(pattern).unwrap())
  .collect();
}

/// Where a history came from. Only recorded for the conversion report; the composed
/// document is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
  /// Matched in the PDF text
  Pdf,
  /// Entered by the operator
  Manual,
}

/// The received/accepted date pair of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct History {
  /// Date the manuscript was received
  pub received: NormalizedDate,
  /// Date the manuscript was accepted
  pub accepted: NormalizedDate,
  /// How the dates were obtained
  pub source:   HistorySource,
}

impl History {
  /// Builds a manually supplied history from free-text dates, e.g. command-line flags.
  pub fn from_text(received: &str, accepted: &str) -> Self {
    Self {
      received: parse_date(received),
      accepted: parse_date(accepted),
      source:   HistorySource::Manual,
    }
  }

  /// Builds a manually supplied history from picked day/month/year values.
  pub fn from_manual(received: ManualDate, accepted: ManualDate) -> Self {
    Self::from_text(&received.to_string(), &accepted.to_string())
  }

  /// Whether both dates are unknown.
  pub fn is_all_null(&self) -> bool { self.received.is_unknown() && self.accepted.is_unknown() }
}

/// A date picked by the operator from day, month and year lists.
///
/// The pick is rendered as `D Month YYYY` and normalized like any other date text, so an
/// impossible combination such as 31 February becomes the unknown date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualDate {
  /// Day of month, 1–31
  pub day:   u32,
  /// Month, 1–12
  pub month: u32,
  /// Four-digit year
  pub year:  i32,
}

impl std::fmt::Display for ManualDate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let month = (self.month as usize).checked_sub(1).and_then(|i| MONTH_NAMES.get(i));
    match month {
      Some(month) => write!(f, "{} {} {}", self.day, month, self.year),
      None => write!(f, "{} {} {}", self.day, self.month, self.year),
    }
  }
}

/// Years offered for manual entry, oldest first.
pub fn manual_year_choices(earliest: i32, current: i32) -> Vec<i32> {
  (earliest..=current).collect()
}

/// Why no history was extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NotFoundReason {
  /// The PDF could not be opened or a page could not be read
  Unreadable(String),
  /// No page matched any history layout
  NoMatch,
  /// A layout matched but neither date could be normalized
  AllNull,
}

impl std::fmt::Display for NotFoundReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      NotFoundReason::Unreadable(e) => write!(f, "PDF could not be read: {e}"),
      NotFoundReason::NoMatch => write!(f, "no received/accepted dates found in the PDF"),
      NotFoundReason::AllNull => write!(f, "received/accepted dates in the PDF are not valid dates"),
    }
  }
}

/// The result of scanning a PDF for its history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryExtraction {
  /// Dates were found; at least one of them is a valid date.
  Found(History),
  /// No usable dates; the caller must fall back to manual entry.
  NotFound(NotFoundReason),
}

/// Scans the PDF for its history line.
///
/// Never fails: an unreadable PDF is reported as [`NotFoundReason::Unreadable`].
pub fn extract_history(pdf: &[u8]) -> HistoryExtraction {
  let document = match Document::load_mem(pdf) {
    Ok(document) => document,
    Err(e) => {
      warn!("Could not open PDF: {e}");
      return HistoryExtraction::NotFound(NotFoundReason::Unreadable(e.to_string()));
    },
  };

  let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
  debug!("Scanning {} PDF page(s) for history dates", page_numbers.len());
  extract_from_pages(
    page_numbers.into_iter().map(|n| document.extract_text(&[n]).map_err(JatsError::from)),
  )
}

/// Scans page texts in order. Pages after the first match are never pulled from `pages`.
pub fn extract_from_pages(
  pages: impl IntoIterator<Item = Result<String, JatsError>>,
) -> HistoryExtraction {
  for (index, page) in pages.into_iter().enumerate() {
    let text = match page {
      Ok(text) => text,
      Err(e) => {
        warn!("Could not read text of PDF page {}: {e}", index + 1);
        return HistoryExtraction::NotFound(NotFoundReason::Unreadable(e.to_string()));
      },
    };

    if let Some(history) = match_history(&text) {
      debug!("History found on page {}: {history:?}", index + 1);
      if history.is_all_null() {
        return HistoryExtraction::NotFound(NotFoundReason::AllNull);
      }
      return HistoryExtraction::Found(history);
    }
  }
  HistoryExtraction::NotFound(NotFoundReason::NoMatch)
}

/// Tries each layout against one page of text.
fn match_history(text: &str) -> Option<History> {
  HISTORY_PATTERNS.iter().find_map(|pattern| {
    let captures = pattern.captures(text)?;
    trace!("History layout {pattern} matched {:?}", &captures[0]);
    Some(History {
      received: parse_date(captures[1].trim()),
      accepted: parse_date(captures[2].trim()),
      source:   HistorySource::Pdf,
    })
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tests::pdf_with_text;

  fn pages(texts: &[&str]) -> Vec<Result<String, JatsError>> {
    texts.iter().map(|t| Ok(t.to_string())).collect()
  }

  fn found(extraction: HistoryExtraction) -> History {
    match extraction {
      HistoryExtraction::Found(history) => history,
      HistoryExtraction::NotFound(reason) => panic!("expected a history, got {reason}"),
    }
  }

  fn ymd(date: &NormalizedDate) -> (String, String, String) {
    (date.year(), date.month(), date.day())
  }

  #[test]
  fn test_semicolon_layout() {
    let history =
      found(extract_from_pages(pages(&["Received: 1 January 2023; Accepted: 2 February 2023"])));
    assert_eq!(ymd(&history.received), ("2023".into(), "01".into(), "01".into()));
    assert_eq!(ymd(&history.accepted), ("2023".into(), "02".into(), "02".into()));
    assert_eq!(history.source, HistorySource::Pdf);
  }

  #[test]
  fn test_each_layout() {
    let cases = [
      "Received: January 3, 2022, Accepted: March 4, 2022",
      "RECEIVED 3 Jan 2022 ACCEPTED 4 Mar 2022",
      "Received on 3 January 2022; Accepted on 4 March 2022",
      "Received: 3 Jan 2022 | Revised: 20 Feb 2022 | Accepted: 4 Mar 2022",
      "Received: 3 Jan 2022 | Accepted: 4 Mar 2022",
      "received - 3 January 2022 ; accepted - 4 March 2022",
    ];
    for case in cases {
      let history = found(extract_from_pages(pages(&[case])));
      assert_eq!(history.received.date(), NaiveDate::from_ymd_opt(2022, 1, 3), "{case}");
      assert_eq!(history.accepted.date(), NaiveDate::from_ymd_opt(2022, 3, 4), "{case}");
    }
  }

  #[test]
  fn test_first_page_wins() {
    let history = found(extract_from_pages(pages(&[
      "Title page",
      "Received: 5 May 2020; Accepted: 6 June 2020",
      "Received: 1 May 2021; Accepted: 2 June 2021",
    ])));
    assert_eq!(history.received.year(), "2020");
  }

  #[test]
  fn test_later_pages_are_not_read() {
    let pages = vec![
      Ok("Received: 5 May 2020; Accepted: 6 June 2020".to_string()),
      Err(JatsError::MalformedXml("never read".into())),
    ];
    assert!(matches!(extract_from_pages(pages), HistoryExtraction::Found(_)));
  }

  #[test]
  fn test_no_match() {
    assert_eq!(
      extract_from_pages(pages(&["Abstract. Nothing to see here."])),
      HistoryExtraction::NotFound(NotFoundReason::NoMatch)
    );
    assert_eq!(
      extract_from_pages(pages(&[])),
      HistoryExtraction::NotFound(NotFoundReason::NoMatch)
    );
  }

  #[test]
  fn test_both_null_dates_fall_back() {
    assert_eq!(
      extract_from_pages(pages(&["Received: 45 Foo 2023; Accepted: 46 Barbaz 2023"])),
      HistoryExtraction::NotFound(NotFoundReason::AllNull)
    );
  }

  #[test]
  fn test_one_null_date_is_kept() {
    let history =
      found(extract_from_pages(pages(&["Received: 45 Foo 2023; Accepted: 2 February 2023"])));
    assert!(history.received.is_unknown());
    assert_eq!(history.accepted.day(), "02");
  }

  #[traced_test]
  #[test]
  fn test_unreadable_pdf() {
    let extraction = extract_history(b"definitely not a pdf");
    assert!(matches!(extraction, HistoryExtraction::NotFound(NotFoundReason::Unreadable(_))));
    assert!(logs_contain("Could not open PDF"));
  }

  #[test]
  fn test_pdf_text_is_scanned() {
    let pdf = pdf_with_text("Received: 1 January 2023; Accepted: 2 February 2023");
    let history = found(extract_history(&pdf));
    assert_eq!(history.received.date(), NaiveDate::from_ymd_opt(2023, 1, 1));
    assert_eq!(history.accepted.date(), NaiveDate::from_ymd_opt(2023, 2, 2));
  }

  #[test]
  fn test_manual_dates() {
    let received = ManualDate { day: 9, month: 3, year: 2021 };
    let impossible = ManualDate { day: 31, month: 2, year: 2021 };
    assert_eq!(received.to_string(), "9 March 2021");

    let history = History::from_manual(received, impossible);
    assert_eq!(history.source, HistorySource::Manual);
    assert_eq!(ymd(&history.received), ("2021".into(), "03".into(), "09".into()));
    assert!(history.accepted.is_unknown());
    assert_eq!(manual_year_choices(2020, 2023), vec![2020, 2021, 2022, 2023]);
  }
}
