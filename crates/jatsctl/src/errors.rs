//! Error types for the jatsctl CLI application.
//!
//! Besides wrapping library, IO and prompt failures, this covers the two ways the manual
//! history fallback can end without dates: the operator cancelled a pick, or nobody was
//! there to ask and no dates were given on the command line.

use thiserror::Error;

/// Errors that can occur during CLI operations.
///
/// Wrapped errors are `transparent`, so the underlying message is what the operator sees.
#[derive(Error, Debug)]
pub enum JatsctlError {
  /// Errors from user interaction dialogs
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Errors from the underlying jatsgen library
  #[error(transparent)]
  Jatsgen(#[from] jatsgen::errors::JatsError),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// The operator cancelled a manual date pick
  #[error("Manual date entry cancelled, no output written")]
  ManualEntryCancelled,

  /// History dates are needed but cannot be prompted for
  #[error("{0}; pass --received and --accepted to supply the dates")]
  MissingManualDates(String),
}
