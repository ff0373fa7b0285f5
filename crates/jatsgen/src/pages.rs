//! First/last page parsing and page counts.
//!
//! Records are inconsistent about page fields: some carry `<FirstPage>12</FirstPage>`,
//! others repeat the whole range `12-27` (or `12–27` with an en dash) in both fields. The
//! first page is read from the start of its field and the last page from the end of its own.

use super::*;

/// Range separators, in order of preference.
const SEPARATORS: [char; 2] = ['–', '-'];

/// An article's page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
  /// First page, `0` when unknown
  pub first: i64,
  /// Last page, `0` when unknown
  pub last:  i64,
  /// Inclusive page count; [`Fact::Unparsed`] if either field held malformed numbers
  pub count: Fact<i64>,
}

/// Which end of a range a field is read for.
#[derive(Clone, Copy)]
enum End {
  /// The part before the separator
  Start,
  /// The part after the separator
  Finish,
}

impl PageRange {
  /// Resolves the raw first/last page field text.
  ///
  /// A field containing a separator is split on it (en dash first, then hyphen); a plain
  /// field of digits is read directly; anything else counts as `0`. When the count can be
  /// computed it is `last - first + 1`, or `0` if the range runs backwards. When a split part
  /// is not a number, or the count does not fit in an `i64`, the count is unparsable but the
  /// page values still keep whatever was read before the failure.
  ///
  /// ```
  /// use jatsgen::pages::PageRange;
  ///
  /// let pages = PageRange::resolve("12-27", "12-27");
  /// assert_eq!((pages.first, pages.last, pages.count.render()), (12, 27, "16".to_string()));
  /// ```
  pub fn resolve(first_text: &str, last_text: &str) -> Self {
    let mut range = Self { first: 0, last: 0, count: Fact::Unparsed };

    let Some(first) = read_page(first_text, End::Start) else {
      debug!("Unreadable first page {first_text:?}");
      return range;
    };
    range.first = first;

    let Some(last) = read_page(last_text, End::Finish) else {
      debug!("Unreadable last page {last_text:?}");
      return range;
    };
    range.last = last;

    range.count = if last < first {
      Fact::Known(0)
    } else {
      match last.checked_sub(first).and_then(|span| span.checked_add(1)) {
        Some(count) => Fact::Known(count),
        None => {
          debug!("Page count of {first}..={last} overflows");
          Fact::Unparsed
        },
      }
    };
    range
  }
}

/// Reads one page number from a field. `None` means the field had a separator but the
/// selected part was not a number.
fn read_page(text: &str, end: End) -> Option<i64> {
  let text = text.trim();
  for separator in SEPARATORS {
    if text.contains(separator) {
      let mut parts = text.split(separator);
      let part = match end {
        End::Start => parts.next(),
        End::Finish => parts.nth(1),
      };
      return part.and_then(|p| p.trim().parse().ok());
    }
  }

  if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
    text.parse().ok()
  } else {
    Some(0)
  }
}
