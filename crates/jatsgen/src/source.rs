//! Reading the bibliographic source record.
//!
//! The record is a PubMed-style article set:
//!
//! ```xml
//! <ArticleSet>
//!   <Article>
//!     <Journal>
//!       <JournalTitle>Journal of Informatics and Web Engineering</JournalTitle>
//!       <Issn>2821-370X</Issn>
//!       <Volume>3</Volume>
//!       <Issue>2</Issue>
//!       <PubDate PubStatus="epublish">…</PubDate>
//!     </Journal>
//!     <ArticleTitle>…</ArticleTitle>
//!     <FirstPage>12</FirstPage>
//!     <LastPage>27</LastPage>
//!     <ELocationID EIdType="doi">10.33093/jiwe.2024.3.2.5</ELocationID>
//!     <AuthorList>…</AuthorList>
//!     <Abstract>…</Abstract>
//!   </Article>
//! </ArticleSet>
//! ```
//!
//! `Article`, `Journal`, `JournalTitle` and `Issn` are required. Everything else is optional
//! and becomes a [`Fact`] or an `Option`.

use super::*;

/// The facts read from a source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
  /// `Journal/JournalTitle`
  pub journal_title:   String,
  /// `Journal/Issn`
  pub issn:            String,
  /// `ELocationID[@EIdType='doi']`
  pub doi:             Fact<String>,
  /// `Volume`, if present with text
  pub volume:          Option<String>,
  /// `Issue`, if present with text
  pub issue:           Option<String>,
  /// Raw `FirstPage` text; `"0"` when the element is missing
  pub first_page_text: String,
  /// Raw `LastPage` text; `"0"` when the element is missing
  pub last_page_text:  String,
  /// `ArticleTitle`
  pub title:           Fact<String>,
  /// `AuthorList`, kept verbatim for copying into the output
  pub author_list:     Option<Element>,
  /// `Abstract`, all contained text
  pub abstract_text:   Fact<String>,
  /// `PubDate[@PubStatus='epublish']`, kept verbatim for copying into the output
  pub epublish_date:   Option<Element>,
  /// `PubDate[@PubStatus='pub']/Year`
  pub pub_year:        Option<String>,
}

impl SourceRecord {
  /// Parses and reads a source record.
  ///
  /// # Errors
  ///
  /// [`JatsError::MissingElement`] if a required element is missing, or an XML error if the
  /// document cannot be parsed.
  pub fn parse(xml: &str) -> Result<Self, JatsError> {
    let root = Element::parse(xml)?;
    Self::from_root(&root)
  }

  /// Reads a source record from an already parsed document.
  pub fn from_root(root: &Element) -> Result<Self, JatsError> {
    let article = if root.tag == "Article" {
      root
    } else {
      root.find("Article").ok_or(JatsError::MissingElement("Article"))?
    };
    let journal = article.child("Journal").ok_or(JatsError::MissingElement("Journal"))?;
    let journal_title =
      journal.child("JournalTitle").ok_or(JatsError::MissingElement("JournalTitle"))?;
    let issn = journal.child("Issn").ok_or(JatsError::MissingElement("Issn"))?;

    let optional = |tag: &str| {
      article.find_text(tag).map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
    };
    let page_text = |tag: &str| article.find_text(tag).unwrap_or("0").trim().to_string();

    let record = Self {
      journal_title:   journal_title.text().unwrap_or_default().trim().to_string(),
      issn:            issn.text().unwrap_or_default().trim().to_string(),
      doi:             Fact::from_text(
        article.find_with_attr("ELocationID", "EIdType", "doi").and_then(Element::text),
      ),
      volume:          optional("Volume"),
      issue:           optional("Issue"),
      first_page_text: page_text("FirstPage"),
      last_page_text:  page_text("LastPage"),
      title:           Fact::from_text(article.child("ArticleTitle").and_then(Element::text)),
      author_list:     article.child("AuthorList").cloned(),
      abstract_text:   Fact::from_text(
        article.child("Abstract").map(Element::text_content).as_deref(),
      ),
      epublish_date:   article.find_with_attr("PubDate", "PubStatus", "epublish").cloned(),
      pub_year:        root
        .find_with_attr("PubDate", "PubStatus", "pub")
        .and_then(|date| date.child("Year"))
        .and_then(Element::text)
        .map(str::trim)
        .filter(|year| !year.is_empty())
        .map(str::to_string),
    };
    debug!("Read source record for DOI {:?}", record.doi);
    Ok(record)
  }
}
