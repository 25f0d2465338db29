//! PostgreSQL storage implementations.
//!
//! This module provides persistent storage using PostgreSQL for:
//! - RSVPs
//! - Check-ins
//! - Mailing lists
//!
//! # Example
//!
//! ```no_run
//! use event_registration::config::DatabaseConfig;
//! use event_registration::stores::postgres::{self, PostgresRsvpStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = postgres::connect(&DatabaseConfig::new("postgresql://localhost/registration".into())).await?;
//! postgres::migrate(&pool).await?;
//! let rsvps = PostgresRsvpStore::new(pool);
//! # Ok(())
//! # }
//! ```

pub mod checkin;
pub mod mail_list;
pub mod rsvp;

// Re-exports
pub use checkin::PostgresCheckinStore;
pub use mail_list::PostgresMailListStore;
pub use rsvp::PostgresRsvpStore;

use crate::config::DatabaseConfig;
use crate::error::{RegistrationError, Result};
use crate::providers::Stats;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// Open a connection pool.
///
/// # Errors
///
/// Returns `RegistrationError::LookupFailed` if the database is unreachable.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(|e| RegistrationError::LookupFailed(format!("Failed to connect: {e}")))
}

/// Run database migrations.
///
/// # Errors
///
/// Returns error if migrations fail.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RegistrationError::StoreWriteFailed(format!("Migration failed: {e}")))?;
    Ok(())
}

pub(crate) fn read_error(context: &str, err: &sqlx::Error) -> RegistrationError {
    RegistrationError::LookupFailed(format!("{context}: {err}"))
}

pub(crate) fn write_error(resource: &'static str, id: &str, err: &sqlx::Error) -> RegistrationError {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.is_unique_violation() {
            return RegistrationError::already_exists(resource, id);
        }
    }
    RegistrationError::StoreWriteFailed(format!("Failed to write {resource}: {err}"))
}

/// Count boolean columns of `table`.
///
/// `fields` pairs the JSON field name reported in [`Stats`] with its column.
pub(crate) async fn column_stats(
    pool: &PgPool,
    table: &str,
    fields: &[(&str, &str)],
) -> Result<Stats> {
    let mut stats = Stats::default();

    for (field, column) in fields {
        stats.0.entry((*field).to_string()).or_default();

        let rows = sqlx::query(&format!(
            "SELECT {column}::text AS value, COUNT(*) AS count FROM {table} GROUP BY {column}"
        ))
        .fetch_all(pool)
        .await
        .map_err(|e| read_error("Failed to compute stats", &e))?;

        for row in rows {
            let value: String = row.try_get("value").map_err(|e| read_error("Bad stats row", &e))?;
            let count: i64 = row.try_get("count").map_err(|e| read_error("Bad stats row", &e))?;
            stats.record(field, &value, u64::try_from(count).unwrap_or(0));
        }
    }

    Ok(stats)
}
