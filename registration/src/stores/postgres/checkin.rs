//! PostgreSQL check-in store.

use super::{column_stats, read_error, write_error};
use crate::error::{RegistrationError, Result};
use crate::models::{UserCheckin, UserId};
use crate::providers::{CheckinStore, Stats};
use sqlx::{PgPool, Row};

/// `PostgreSQL` check-in store.
#[derive(Clone)]
pub struct PostgresCheckinStore {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresCheckinStore {
    /// Create a new `PostgreSQL` check-in store.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CheckinStore for PostgresCheckinStore {
    async fn find(&self, user_id: &UserId) -> Result<UserCheckin> {
        let row = sqlx::query(
            r#"
            SELECT id, staff_override, has_checked_in, has_picked_up_swag
            FROM checkins
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error("Failed to get checkin", &e))?
        .ok_or_else(|| RegistrationError::not_found("checkin", user_id.as_str()))?;

        let bad_row = |e: sqlx::Error| read_error("Bad checkin row", &e);
        Ok(UserCheckin {
            id: UserId(row.try_get("id").map_err(bad_row)?),
            staff_override: row.try_get("staff_override").map_err(bad_row)?,
            has_checked_in: row.try_get("has_checked_in").map_err(bad_row)?,
            has_picked_up_swag: row.try_get("has_picked_up_swag").map_err(bad_row)?,
        })
    }

    async fn insert(&self, checkin: &UserCheckin) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO checkins (id, staff_override, has_checked_in, has_picked_up_swag)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(checkin.id.as_str())
        .bind(checkin.staff_override)
        .bind(checkin.has_checked_in)
        .bind(checkin.has_picked_up_swag)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("checkin", checkin.id.as_str(), &e))?;
        Ok(())
    }

    async fn replace(&self, checkin: &UserCheckin) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE checkins
            SET staff_override = $2,
                has_checked_in = $3,
                has_picked_up_swag = $4
            WHERE id = $1
            "#,
        )
        .bind(checkin.id.as_str())
        .bind(checkin.staff_override)
        .bind(checkin.has_checked_in)
        .bind(checkin.has_picked_up_swag)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("checkin", checkin.id.as_str(), &e))?;

        if result.rows_affected() == 0 {
            return Err(RegistrationError::not_found("checkin", checkin.id.as_str()));
        }
        Ok(())
    }

    async fn checked_in_users(&self) -> Result<Vec<UserId>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM checkins WHERE has_checked_in ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| read_error("Failed to list checked-in users", &e))?;

        Ok(ids.into_iter().map(UserId).collect())
    }

    async fn stats(&self) -> Result<Stats> {
        column_stats(
            &self.pool,
            "checkins",
            &[
                ("override", "staff_override"),
                ("hasCheckedIn", "has_checked_in"),
                ("hasPickedUpSwag", "has_picked_up_swag"),
            ],
        )
        .await
    }
}
