//! Assembly of the output `Article` tree.
//!
//! The tree has two sections and a fixed field order that downstream consumers rely on:
//!
//! ```text
//! Article
//! ├── Journal-meta
//! │   ├── journal-id (pmc, pubmed, publisher)
//! │   ├── Issn
//! │   ├── Publisher/PublisherName
//! │   └── JournalTitle
//! └── article-meta
//!     ├── article-id (doi, other)
//!     ├── ArticleTitle
//!     ├── AuthorList                       copied from the record
//!     ├── PubDate[@PubStatus=epublish]     copied from the record, if present
//!     ├── PubDate (pub, cover)             from the webpage
//!     ├── Keywords/Keyword/italic          from the webpage
//!     ├── Volume, Issue, FirstPage, LastPage, PageCount
//!     ├── History/PubDate (received, accepted)
//!     ├── abstract/p
//!     ├── pdf-link, full_text_url
//!     └── Language
//! ```
//!
//! Every scalar that is unknown is written as `"null"`; nothing is ever left out.

use super::*;
use crate::{
  history::History, identifier::ArticleIdentity, pages::PageRange, source::SourceRecord,
  webpage::WebpageMetadata,
};

/// Publisher named in every `Journal-meta` section.
pub const PUBLISHER_NAME: &str = "MMU Press, Multimedia University";

/// Language code of every article.
pub const LANGUAGE: &str = "eng";

/// Everything known about an article apart from its history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFacts {
  /// Facts read from the source record
  pub record:      SourceRecord,
  /// Journal and issue identity derived from the DOI
  pub identity:    ArticleIdentity,
  /// Resolved page range
  pub pages:       PageRange,
  /// Publication date and keywords from the webpage
  pub webpage:     WebpageMetadata,
  /// URL of the article webpage
  pub article_url: Fact<String>,
  /// URL of the article PDF
  pub pdf_link:    Fact<String>,
}

impl ArticleFacts {
  /// Derives identity and pages from the record and gathers the remaining facts.
  pub fn gather(
    record: SourceRecord,
    webpage: WebpageMetadata,
    article_url: &str,
    pdf_link: Option<&str>,
  ) -> Self {
    let pages = PageRange::resolve(&record.first_page_text, &record.last_page_text);
    let identity = ArticleIdentity::derive(
      &record.doi,
      record.volume.as_deref(),
      record.issue.as_deref(),
      pages.first,
    );
    Self {
      record,
      identity,
      pages,
      webpage,
      article_url: Fact::from_text(Some(article_url)),
      pdf_link: Fact::from_text(pdf_link),
    }
  }

  /// Builds the `Article` tree. The result carries no layout whitespace; see
  /// [`pretty::indent`](crate::pretty::indent).
  pub fn compose(&self, history: &History) -> Element {
    let mut article = Element::new("Article");
    article.push(self.journal_meta());
    article.push(self.article_meta(history));
    article
  }

  /// The `Journal-meta` section.
  fn journal_meta(&self) -> Element {
    let abbreviation = self.identity.abbreviation.render();
    let mut meta = Element::new("Journal-meta");
    for (id_type, value) in [
      ("pmc", abbreviation.to_lowercase()),
      ("pubmed", self.record.journal_title.clone()),
      ("publisher", abbreviation),
    ] {
      meta.push(Element::new("journal-id").with_attr("journal-id-type", id_type).with_text(value));
    }
    meta.push_text("Issn", self.record.issn.as_str());
    meta.push(Element::new("Publisher")).push_text("PublisherName", PUBLISHER_NAME);
    meta.push_text("JournalTitle", self.record.journal_title.as_str());
    meta
  }

  /// The `article-meta` section.
  fn article_meta(&self, history: &History) -> Element {
    let mut meta = Element::new("article-meta");
    let ids = [("doi", self.identity.doi.render()), ("other", self.identity.custom_id())];
    for (id_type, value) in ids {
      meta.push(Element::new("article-id").with_attr("pub-id-type", id_type).with_text(value));
    }
    meta.push_text("ArticleTitle", self.record.title.render());

    let authors = passthrough(self.record.author_list.as_ref());
    meta.push(authors.unwrap_or_else(|| Element::new("AuthorList")));
    if let Some(epublish) = passthrough(self.record.epublish_date.as_ref()) {
      meta.push(epublish);
    }
    for status in ["pub", "cover"] {
      meta.push(pub_date(status, &self.webpage.published));
    }

    let keywords = meta.push(Element::new("Keywords"));
    for keyword in &self.webpage.keywords {
      keywords.push(Element::new("Keyword")).push_text("italic", keyword.as_str());
    }

    meta.push_text("Volume", self.identity.volume.as_str());
    meta.push_text("Issue", self.identity.issue.as_str());
    meta.push_text("FirstPage", self.pages.first.to_string());
    meta.push_text("LastPage", self.pages.last.to_string());
    meta.push_text("PageCount", self.pages.count.render());

    let dates = meta.push(Element::new("History"));
    dates.push(pub_date("received", &history.received));
    dates.push(pub_date("accepted", &history.accepted));

    meta.push(Element::new("abstract")).push_text("p", self.record.abstract_text.render());
    meta.push_text("pdf-link", self.pdf_link.render());
    meta.push_text("full_text_url", self.article_url.render());
    meta.push_text("Language", LANGUAGE);
    meta
  }
}

/// A copy of a source subtree for the output, without the whitespace that followed it in the
/// source document.
fn passthrough(element: Option<&Element>) -> Option<Element> {
  element.cloned().map(|mut element| {
    element.tail = None;
    element
  })
}

/// A `PubDate` element with `Year`, `Month` and `Day` children.
fn pub_date(status: &str, date: &NormalizedDate) -> Element {
  let mut element = Element::new("PubDate").with_attr("PubStatus", status);
  element.push_text("Year", date.year());
  element.push_text("Month", date.month());
  element.push_text("Day", date.day());
  element
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::history::HistorySource;

  const MINIMAL: &str = r#"<ArticleSet><Article>
    <Journal><JournalTitle>Journal of Things</JournalTitle><Issn>1234-5678</Issn></Journal>
  </Article></ArticleSet>"#;

  fn unknown_history() -> History {
    History {
      received: NormalizedDate::UNKNOWN,
      accepted: NormalizedDate::UNKNOWN,
      source:   HistorySource::Manual,
    }
  }

  fn tags(element: &Element) -> Vec<&str> {
    element.children.iter().map(|child| child.tag.as_str()).collect()
  }

  #[test]
  fn test_field_order() -> anyhow::Result<()> {
    let record = SourceRecord::parse(crate::tests::SOURCE_XML)?;
    let facts = ArticleFacts::gather(record, WebpageMetadata::default(), "https://x.org/1", None);
    let article = facts.compose(&unknown_history());

    assert_eq!(tags(&article), vec!["Journal-meta", "article-meta"]);
    assert_eq!(tags(&article.children[0]), vec![
      "journal-id",
      "journal-id",
      "journal-id",
      "Issn",
      "Publisher",
      "JournalTitle"
    ]);
    assert_eq!(tags(&article.children[1]), vec![
      "article-id",
      "article-id",
      "ArticleTitle",
      "AuthorList",
      "PubDate",
      "PubDate",
      "PubDate",
      "Keywords",
      "Volume",
      "Issue",
      "FirstPage",
      "LastPage",
      "PageCount",
      "History",
      "abstract",
      "pdf-link",
      "full_text_url",
      "Language"
    ]);
    Ok(())
  }

  #[test]
  fn test_full_record_values() -> anyhow::Result<()> {
    let record = SourceRecord::parse(crate::tests::SOURCE_XML)?;
    let webpage = WebpageMetadata {
      published: date::parse_date("14 June 2024"),
      keywords:  vec!["graphs".into(), "archives".into()],
    };
    let facts =
      ArticleFacts::gather(record, webpage, "https://x.org/1", Some("https://x.org/1.pdf"));
    let history = History::from_text("1 January 2024", "2 March 2024");
    let article = facts.compose(&history);

    let journal = &article.children[0];
    let pmc = journal.find_with_attr("journal-id", "journal-id-type", "pmc");
    assert_eq!(pmc.and_then(Element::text), Some("jiwe"));
    assert_eq!(journal.find_text("PublisherName"), Some(PUBLISHER_NAME));

    let meta = &article.children[1];
    let custom_id = meta.find_with_attr("article-id", "pub-id-type", "other");
    assert_eq!(custom_id.and_then(Element::text), Some("jJIWE.v3.i2.pg12"));
    let cover = meta.find_with_attr("PubDate", "PubStatus", "cover");
    assert_eq!(cover.and_then(|d| d.find_text("Month")), Some("06"));
    assert_eq!(meta.find("Keyword").and_then(|k| k.find_text("italic")), Some("graphs"));
    let accepted = meta.find_with_attr("PubDate", "PubStatus", "accepted");
    assert_eq!(accepted.and_then(|d| d.find_text("Day")), Some("02"));
    assert_eq!(
      meta.find("abstract").and_then(|a| a.find_text("p")),
      Some("We study graphs & archives.")
    );
    assert_eq!(meta.find_text("pdf-link"), Some("https://x.org/1.pdf"));
    assert_eq!(meta.find_text("Language"), Some(LANGUAGE));
    assert!(meta.child("AuthorList").is_some_and(|authors| authors.tail.is_none()));
    Ok(())
  }

  #[test]
  fn test_minimal_record_renders_sentinels() -> anyhow::Result<()> {
    let record = SourceRecord::parse(MINIMAL)?;
    let facts = ArticleFacts::gather(record, WebpageMetadata::default(), "", None);
    let meta = facts.compose(&unknown_history()).children.remove(1);

    assert_eq!(meta.find_text("Volume"), Some("-"));
    assert_eq!(meta.find_text("Issue"), Some("-"));
    assert_eq!(meta.find("abstract").and_then(|a| a.find_text("p")), Some("null"));
    assert_eq!(meta.find_text("ArticleTitle"), Some("null"));
    assert_eq!(meta.find_text("full_text_url"), Some("null"));
    let custom_id = meta.find_with_attr("article-id", "pub-id-type", "other");
    assert_eq!(custom_id.and_then(Element::text), Some("nnull.v-.i-.pg0"));
    assert!(meta.child("AuthorList").is_some_and(|authors| authors.children.is_empty()));
    assert!(meta.child("Keywords").is_some_and(|keywords| keywords.children.is_empty()));
    let published = meta.find_with_attr("PubDate", "PubStatus", "pub");
    assert_eq!(published.and_then(|d| d.find_text("Year")), Some("null"));
    Ok(())
  }
}
