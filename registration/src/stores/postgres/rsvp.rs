//! PostgreSQL RSVP store.

use super::{column_stats, read_error, write_error};
use crate::error::{RegistrationError, Result};
use crate::models::{UserId, UserRsvp};
use crate::providers::{RsvpStore, Stats};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

/// `PostgreSQL` RSVP store.
#[derive(Clone)]
pub struct PostgresRsvpStore {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresRsvpStore {
    /// Create a new `PostgreSQL` RSVP store.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RsvpStore for PostgresRsvpStore {
    async fn find(&self, user_id: &UserId) -> Result<UserRsvp> {
        let row = sqlx::query("SELECT id, is_attending, details FROM rsvps WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error("Failed to get rsvp", &e))?
            .ok_or_else(|| RegistrationError::not_found("rsvp", user_id.as_str()))?;

        let id: String = row.try_get("id").map_err(|e| read_error("Bad rsvp row", &e))?;
        let is_attending: bool = row
            .try_get("is_attending")
            .map_err(|e| read_error("Bad rsvp row", &e))?;
        let Json(details): Json<Map<String, Value>> = row
            .try_get("details")
            .map_err(|e| read_error("Bad rsvp row", &e))?;

        Ok(UserRsvp {
            id: UserId(id),
            is_attending,
            details,
        })
    }

    async fn insert(&self, rsvp: &UserRsvp) -> Result<()> {
        sqlx::query("INSERT INTO rsvps (id, is_attending, details) VALUES ($1, $2, $3)")
            .bind(rsvp.id.as_str())
            .bind(rsvp.is_attending)
            .bind(Json(rsvp.details.clone()))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("rsvp", rsvp.id.as_str(), &e))?;
        Ok(())
    }

    async fn replace(&self, rsvp: &UserRsvp) -> Result<()> {
        let result = sqlx::query("UPDATE rsvps SET is_attending = $2, details = $3 WHERE id = $1")
            .bind(rsvp.id.as_str())
            .bind(rsvp.is_attending)
            .bind(Json(rsvp.details.clone()))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("rsvp", rsvp.id.as_str(), &e))?;

        if result.rows_affected() == 0 {
            return Err(RegistrationError::not_found("rsvp", rsvp.id.as_str()));
        }
        Ok(())
    }

    async fn stats(&self) -> Result<Stats> {
        column_stats(&self.pool, "rsvps", &[("isAttending", "is_attending")]).await
    }
}
