//! A library for turning a scholarly article's raw inputs into normalized JATS-style
//! front matter.
//!
//! Three sources feed a conversion: the author-submitted PDF (for the editorial history),
//! a semi-structured bibliographic XML record (for journal and article metadata), and the
//! live article webpage (for the publication date and keywords). The facts extracted from
//! each are normalized, composed into a fixed-order `Article` tree, pretty printed, and can
//! finally be spliced into the `<front>` region of a larger template.
//!
//! # Example
//! ```rust,no_run
//! use jatsgen::{
//!   conversion::{ConversionState, Converter, RawInputs},
//!   history::History,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let inputs = RawInputs {
//!     pdf:         std::fs::read("article.pdf")?,
//!     xml:         std::fs::read_to_string("article.xml")?,
//!     article_url: "https://journals.example.org/index.php/jiwe/article/view/1234".into(),
//!     pdf_link:    None,
//!   };
//!
//!   let document = match Converter::default().convert(inputs).await? {
//!     ConversionState::Complete(document) => document,
//!     ConversionState::AwaitingHistory(pending) =>
//!       pending.resume(History::from_text("1 January 2023", "2 February 2023")),
//!   };
//!   println!("{}: {}", document.filename(), document.xml());
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod compose;
pub mod config;
pub mod conversion;
pub mod date;
pub mod element;
pub mod errors;
pub mod fact;
pub mod filename;
pub mod history;
pub mod identifier;
pub mod pages;
pub mod pretty;
pub mod source;
pub mod splice;
pub mod webpage;
#[cfg(test)] mod tests;

use config::Config;
use date::NormalizedDate;
use element::Element;
use errors::JatsError;
use fact::{Fact, Outcome};
