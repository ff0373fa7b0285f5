//! One conversion, from raw inputs to a finished document.
//!
//! A conversion runs its steps in a fixed order: read the source record, derive the article
//! identity and page range, fetch the webpage metadata, and scan the PDF for the editorial
//! history. When the PDF yields no usable history the conversion stops in
//! [`ConversionState::AwaitingHistory`] and is completed later with dates from the operator:
//!
//! ```no_run
//! use jatsgen::{
//!   conversion::{ConversionState, Converter, RawInputs},
//!   history::{History, ManualDate},
//! };
//!
//! # async fn example(inputs: RawInputs) -> Result<(), jatsgen::errors::JatsError> {
//! let document = match Converter::new().convert(inputs).await? {
//!   ConversionState::Complete(document) => document,
//!   ConversionState::AwaitingHistory(pending) => {
//!     eprintln!("{}", pending.reason());
//!     let received = ManualDate { day: 1, month: 1, year: 2023 };
//!     let accepted = ManualDate { day: 2, month: 2, year: 2023 };
//!     pending.resume(History::from_manual(received, accepted))
//!   },
//! };
//! std::fs::write(document.filename(), document.xml())?;
//! # Ok(())
//! # }
//! ```
//!
//! Only a structurally invalid source record fails a conversion. Every other problem is
//! recorded as a warning in the [`ConversionReport`].

use crate::{
  compose::ArticleFacts,
  filename::filename_from_root,
  history::{extract_history, History, HistoryExtraction, HistorySource, NotFoundReason},
  source::SourceRecord,
  splice::splice_tree,
  webpage::WebpageClient,
};

use super::*;

/// The inputs of one conversion, held in memory for its whole length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputs {
  /// The article PDF
  pub pdf:         Vec<u8>,
  /// The bibliographic source record
  pub xml:         String,
  /// URL of the article webpage
  pub article_url: String,
  /// URL of the article PDF, if published
  pub pdf_link:    Option<String>,
}

/// Runs conversions.
#[derive(Default)]
pub struct Converter {
  /// Client for the article webpage
  webpage: WebpageClient,
}

impl Converter {
  /// Creates a converter with the default configuration.
  pub fn new() -> Self { Self::default() }

  /// Creates a converter with the given configuration.
  pub fn with_config(config: Config) -> Self {
    Self { webpage: WebpageClient::with_config(config) }
  }

  /// Runs a conversion as far as it can go without the operator.
  ///
  /// # Errors
  ///
  /// Fails only when the source record is malformed or lacks a required element.
  pub async fn convert(&self, inputs: RawInputs) -> Result<ConversionState, JatsError> {
    let root = Element::parse(&inputs.xml)?;
    let record = SourceRecord::from_root(&root)?;

    let mut warnings = Vec::new();
    let webpage = self.webpage.fetch(&inputs.article_url).await;
    if let Some(reason) = webpage.degraded_reason() {
      warnings.push(format!("Could not scrape article URL: {reason}"));
    }

    let filename =
      filename_from_root(&root, &inputs.article_url, &webpage.as_ref().map(|page| page.published));
    let facts = ArticleFacts::gather(
      record,
      webpage.into_value(),
      &inputs.article_url,
      inputs.pdf_link.as_deref(),
    );
    debug!("Converting article {}", facts.identity.custom_id());

    let state = match extract_history(&inputs.pdf) {
      HistoryExtraction::Found(history) =>
        ConversionState::Complete(ComposedDocument::finish(&facts, history, filename, warnings)),
      HistoryExtraction::NotFound(reason) => {
        warn!("Could not extract history dates: {reason}");
        warnings.push(reason.to_string());
        ConversionState::AwaitingHistory(PendingConversion { facts, filename, warnings, reason })
      },
    };
    Ok(state)
  }
}

/// Where a conversion stands after [`Converter::convert`].
#[derive(Debug)]
pub enum ConversionState {
  /// The document is finished.
  Complete(ComposedDocument),
  /// The PDF gave no usable history; the operator must supply it.
  AwaitingHistory(PendingConversion),
}

/// A conversion waiting for manually supplied history dates.
#[derive(Debug)]
pub struct PendingConversion {
  /// Everything gathered so far
  facts:    ArticleFacts,
  /// Output filename
  filename: String,
  /// Warnings so far
  warnings: Vec<String>,
  /// Why the PDF gave no history
  reason:   NotFoundReason,
}

impl PendingConversion {
  /// Why the history has to be entered by hand.
  pub fn reason(&self) -> &NotFoundReason { &self.reason }

  /// Warnings so far, including the reason above.
  pub fn warnings(&self) -> &[String] { &self.warnings }

  /// Facts gathered before the conversion stopped.
  pub fn facts(&self) -> &ArticleFacts { &self.facts }

  /// Completes the conversion with the given history.
  pub fn resume(self, history: History) -> ComposedDocument {
    ComposedDocument::finish(&self.facts, history, self.filename, self.warnings)
  }
}

/// A finished, pretty printed document.
#[derive(Debug, Clone)]
pub struct ComposedDocument {
  /// The indented tree
  root:     Element,
  /// The tree's serialization
  xml:      String,
  /// Output filename
  filename: String,
  /// What happened along the way
  report:   ConversionReport,
}

impl ComposedDocument {
  /// Composes and indents the document.
  fn finish(
    facts: &ArticleFacts,
    history: History,
    filename: String,
    warnings: Vec<String>,
  ) -> Self {
    let mut root = facts.compose(&history);
    pretty::indent(&mut root);
    let xml = root.to_xml();
    let report = ConversionReport {
      filename: filename.clone(),
      article_id: facts.identity.custom_id(),
      history_source: history.source,
      warnings,
    };
    info!("Composed {} ({} bytes)", report.filename, xml.len());
    Self { root, xml, filename, report }
  }

  /// The composed tree.
  pub fn root(&self) -> &Element { &self.root }

  /// The serialized document.
  pub fn xml(&self) -> &str { &self.xml }

  /// The derived output filename.
  pub fn filename(&self) -> &str { &self.filename }

  /// Filename for the document spliced into a template.
  pub fn combined_filename(&self) -> String { format!("combined_{}", self.filename) }

  /// The conversion report.
  pub fn report(&self) -> &ConversionReport { &self.report }

  /// Splices the document into a template's `<front>` region.
  pub fn splice_into(&self, template: &str) -> Result<String, JatsError> {
    splice_tree(&self.root, template)
  }
}

/// Summary of a conversion for the operator's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
  /// Output filename
  pub filename:       String,
  /// Composite article identifier
  pub article_id:     String,
  /// Where the history dates came from
  pub history_source: HistorySource,
  /// Every fallback taken
  pub warnings:       Vec<String>,
}

impl ConversionReport {
  /// The report as pretty printed JSON.
  pub fn to_json(&self) -> Result<String, JatsError> { Ok(serde_json::to_string_pretty(self)?) }
}
