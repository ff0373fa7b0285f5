//! Publication date and keywords from the live article webpage.
//!
//! The journal's article pages (OJS themes) show the publication date in a
//! `<div class="list-group-item date-published">` block and list keywords in
//! `<meta name="citation_keywords">` tags. [`WebpageMetadata::from_html`] reads both, and
//! [`WebpageClient::fetch`] downloads the page first. A fetch never fails: network or parse
//! problems come back as [`Outcome::Degraded`] with an unknown date and no keywords.
//!
//! # Examples
//!
//! ```no_run
//! use jatsgen::webpage::WebpageClient;
//!
//! # async fn example() {
//! let client = WebpageClient::new();
//! let outcome = client.fetch("https://journals.example.org/article/view/1234").await;
//! if let Some(reason) = outcome.degraded_reason() {
//!   eprintln!("webpage metadata unavailable: {reason}");
//! }
//! println!("published {}", outcome.value().published.year());
//! # }
//! ```

use scraper::{Html, Selector};
use url::Url;

use super::*;

lazy_static! {
  /// Keyword separators inside one meta tag's content.
  static ref KEYWORD_SEPARATOR: Regex = Regex::new(r"[;,]\s*").unwrap();
}

/// What the webpage contributes to a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WebpageMetadata {
  /// Publication date shown on the page
  pub published: NormalizedDate,
  /// Keywords in page order; duplicates are kept
  pub keywords:  Vec<String>,
}

impl WebpageMetadata {
  /// Reads the metadata out of an article page.
  ///
  /// # Errors
  ///
  /// Only an invalid configured selector is an error; a page without the expected markers
  /// simply yields an unknown date and no keywords.
  pub fn from_html(html: &str, config: &Config) -> Result<Self, JatsError> {
    let document = Html::parse_document(html);
    let date_selector = parse_selector(&config.date_published_selector)?;
    let keywords_selector =
      parse_selector(&format!("meta[name=\"{}\"]", config.keywords_meta_name))?;

    let published = match document.select(&date_selector).next() {
      Some(element) => {
        let text: String =
          element.text().map(str::trim).filter(|t| !t.is_empty()).collect::<Vec<_>>().concat();
        let text = text.replace(&config.date_published_prefix, "");
        trace!("Publication date text: {text:?}");
        date::parse_date(&text)
      },
      None => {
        debug!("No element matches {}", config.date_published_selector);
        NormalizedDate::UNKNOWN
      },
    };

    let keywords = document
      .select(&keywords_selector)
      .flat_map(|meta| {
        let content = meta.value().attr("content").unwrap_or_default();
        KEYWORD_SEPARATOR
          .split(content)
          .map(str::trim)
          .filter(|keyword| !keyword.is_empty())
          .map(str::to_string)
          .collect::<Vec<_>>()
      })
      .collect();

    Ok(Self { published, keywords })
  }
}

/// Parses a CSS selector, keeping only the message of a failure.
fn parse_selector(selector: &str) -> Result<Selector, JatsError> {
  Selector::parse(selector).map_err(|e| JatsError::Selector(format!("{selector}: {e}")))
}

/// Client for fetching article webpages.
///
/// A single GET is issued per fetch, without retries.
pub struct WebpageClient {
  /// Internal web client used to fetch pages.
  client: reqwest::Client,
  /// Selectors and labels used to read the page.
  config: Config,
}

impl WebpageClient {
  /// Creates a client with the default configuration.
  pub fn new() -> Self { Self::with_config(Config::default()) }

  /// Creates a client with the given configuration.
  pub fn with_config(config: Config) -> Self {
    let client = reqwest::Client::builder()
      .user_agent(config.user_agent.clone())
      .build()
      .unwrap_or_else(|e| {
        warn!("Falling back to a default HTTP client: {e}");
        reqwest::Client::new()
      });
    Self { client, config }
  }

  /// The configuration the client reads pages with.
  pub fn config(&self) -> &Config { &self.config }

  /// Fetches and reads an article page, degrading on any failure.
  pub async fn fetch(&self, url: &str) -> Outcome<WebpageMetadata> {
    match self.try_fetch(url).await {
      Ok(metadata) => Outcome::Extracted(metadata),
      Err(e) => {
        warn!("Could not read article webpage {url}: {e}");
        Outcome::Degraded { value: WebpageMetadata::default(), reason: e.to_string() }
      },
    }
  }

  /// Fetches and reads an article page.
  ///
  /// The response body is read whatever its status code, matching what a browser would
  /// show an operator.
  pub async fn try_fetch(&self, url: &str) -> Result<WebpageMetadata, JatsError> {
    let url = Url::parse(url)?;
    debug!("Fetching article webpage: {url}");

    let response = self.client.get(url).send().await?;
    debug!("Article webpage response status: {}", response.status());

    let body = response.text().await?;
    WebpageMetadata::from_html(&body, &self.config)
  }
}

impl Default for WebpageClient {
  fn default() -> Self { Self::new() }
}
