//! Error type for `campus-store-sqlite`.
//!
//! Domain failures raised inside a `conn.call` closure travel through
//! [`tokio_rusqlite::Error::Other`] and are unwrapped again on the way out,
//! so `?` stays usable inside transactions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A business-rule failure; the enclosing transaction was rolled back.
  #[error("{0}")]
  Domain(campus_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),
}

impl From<campus_core::Error> for Error {
  fn from(e: campus_core::Error) -> Self { Error::Domain(e) }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Other(boxed) => {
        match boxed.downcast::<campus_core::Error>() {
          Ok(domain) => Error::Domain(*domain),
          Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
        }
      }
      other => Error::Database(other),
    }
  }
}

/// Fold store failures into the core taxonomy: domain errors pass through,
/// store-level failures become `Internal`.
impl From<Error> for campus_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Domain(domain) => domain,
      Error::Database(db) => campus_core::Error::Internal(db.to_string()),
      Error::DateParse(msg) => campus_core::Error::Internal(msg),
    }
  }
}

/// Wrap a domain error for returning out of a `conn.call` closure.
pub(crate) fn domain(e: campus_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
