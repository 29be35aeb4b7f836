//! SQLite storage layer.
//!
//! Repository and memory store implementations backed by SQLite with WAL
//! mode and split read/write connection pools.

pub mod agent;
pub mod memory;
pub mod message;
pub mod pool;
pub mod room;

use agora_types::error::RepositoryError;
use chrono::{DateTime, SecondsFormat, Utc};

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}
