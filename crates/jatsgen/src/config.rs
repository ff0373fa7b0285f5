//! Runtime configuration.
//!
//! Everything here has a built-in default, so a configuration file is optional. When one is
//! used it is TOML, and any subset of the fields may be given:
//!
//! ```toml
//! user_agent = "jatsgen (mailto:editor@example.org)"
//! date_published_selector = "div.list-group-item.date-published"
//! date_published_prefix = "Published:"
//! ```

use std::path::{Path, PathBuf};

use super::*;

/// Settings for the webpage fetcher and the manual date prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
  /// `User-Agent` header sent with the webpage request
  pub user_agent:              String,
  /// CSS selector of the element holding the publication date
  pub date_published_selector: String,
  /// Literal label removed from the publication date text
  pub date_published_prefix:   String,
  /// `name` of the `<meta>` tags carrying keywords
  pub keywords_meta_name:      String,
  /// First year offered when the operator picks history dates by hand
  pub earliest_manual_year:    i32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      user_agent:              format!("jatsgen/{}", env!("CARGO_PKG_VERSION")),
      date_published_selector: "div.list-group-item.date-published".to_string(),
      date_published_prefix:   "Published:".to_string(),
      keywords_meta_name:      "citation_keywords".to_string(),
      earliest_manual_year:    1980,
    }
  }
}

impl Config {
  /// Default configuration file location in the user's config directory.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("jatsgen").join("config.toml")
  }

  /// Parses a configuration from TOML text.
  pub fn from_toml(text: &str) -> Result<Self, JatsError> { Ok(toml::from_str(text)?) }

  /// Loads the configuration.
  ///
  /// An explicit `path` must exist. Without one, [`Config::default_path`] is read if it
  /// exists, and the defaults are used otherwise.
  pub fn load(path: Option<&Path>) -> Result<Self, JatsError> {
    let path = match path {
      Some(path) => path.to_path_buf(),
      None => {
        let path = Self::default_path();
        if !path.exists() {
          trace!("No config at {}, using defaults", path.display());
          return Ok(Self::default());
        }
        path
      },
    };
    debug!("Loading config from {}", path.display());
    Self::from_toml(&std::fs::read_to_string(&path)?)
  }
}
