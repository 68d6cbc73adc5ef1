//! Error types for keyset pagination.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Failures are
//! never recovered from internally: a stale cursor is not turned into an
//! empty page and data-store errors are not retried.

use crate::Position;
use ::thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// The sort order is empty, repeats a column, or does not end on the
    /// collection's unique key.
    #[error("invalid sort spec: {reason}")]
    InvalidSortSpec { reason: String },

    /// The cursor position no longer resolves to a record.
    #[error("stale cursor: no record found at position {position}")]
    StaleCursor { position: Position },

    /// The underlying collection failed during lookup, fetch or existence check.
    #[error("query failed: {source}")]
    QueryFailure {
        #[source]
        source: BoxError,
    },

    #[error("invalid page size {limit}, {}", limit_bounds(.max))]
    InvalidLimit { limit: u32, max: Option<u32> },

    /// A record or anchor carries no value for a column of the sort order.
    #[error("missing value for sort column '{column}'")]
    MissingColumn { column: String },

    #[error("invalid value for {var}: {message}")]
    Config { var: &'static str, message: String },
}

impl Error {
    pub fn invalid_sort_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSortSpec { reason: reason.into() }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn { column: column.into() }
    }

    /// Wrap a data-store error, keeping it as the error source.
    pub fn query(source: impl Into<BoxError>) -> Self {
        Self::QueryFailure { source: source.into() }
    }

    /// Stale cursors are the one failure a caller may want to answer by
    /// restarting from the first page.
    pub fn is_stale_cursor(&self) -> bool {
        matches!(self, Self::StaleCursor { .. })
    }
}

fn limit_bounds(max: &Option<u32>) -> String {
    match max {
        Some(max) => format!("must be between 1 and {max}"),
        None => "must be positive".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
