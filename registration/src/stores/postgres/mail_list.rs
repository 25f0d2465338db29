//! PostgreSQL mailing list store.

use super::{read_error, write_error};
use crate::error::{RegistrationError, Result};
use crate::models::{ListId, MailList, UserId};
use crate::providers::{MailListStore, MembershipUpdate};
use sqlx::{PgPool, Row};

// Membership is rewritten as a sorted, distinct array in a single statement.
const ADD_MEMBERS: &str = r#"
    UPDATE mail_lists
    SET user_ids = ARRAY(SELECT DISTINCT u FROM unnest(user_ids || $2::text[]) AS u ORDER BY u)
    WHERE id = $1
"#;

const REMOVE_MEMBERS: &str = r#"
    UPDATE mail_lists
    SET user_ids = ARRAY(SELECT u FROM unnest(user_ids) AS u WHERE NOT (u = ANY($2::text[])) ORDER BY u)
    WHERE id = $1
"#;

/// `PostgreSQL` mailing list store.
#[derive(Clone)]
pub struct PostgresMailListStore {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresMailListStore {
    /// Create a new `PostgreSQL` mailing list store.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MailListStore for PostgresMailListStore {
    async fn find(&self, list_id: &ListId) -> Result<MailList> {
        let row = sqlx::query("SELECT id, user_ids FROM mail_lists WHERE id = $1")
            .bind(list_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error("Failed to get mail list", &e))?
            .ok_or_else(|| RegistrationError::not_found("mail list", list_id.as_str()))?;

        let id: String = row.try_get("id").map_err(|e| read_error("Bad mail list row", &e))?;
        let user_ids: Vec<String> = row
            .try_get("user_ids")
            .map_err(|e| read_error("Bad mail list row", &e))?;

        Ok(MailList::new(ListId(id), user_ids.into_iter().map(UserId)))
    }

    async fn insert(&self, list: &MailList) -> Result<()> {
        let user_ids: Vec<String> = list.user_ids.iter().map(|id| id.0.clone()).collect();

        sqlx::query("INSERT INTO mail_lists (id, user_ids) VALUES ($1, $2)")
            .bind(list.id.as_str())
            .bind(user_ids)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("mail list", list.id.as_str(), &e))?;
        Ok(())
    }

    async fn update(&self, list_id: &ListId, update: &MembershipUpdate) -> Result<()> {
        let sql = match update {
            MembershipUpdate::Add(_) => ADD_MEMBERS,
            MembershipUpdate::Remove(_) => REMOVE_MEMBERS,
        };
        let user_ids: Vec<String> = update.ids().iter().map(|id| id.0.clone()).collect();

        let result = sqlx::query(sql)
            .bind(list_id.as_str())
            .bind(user_ids)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("mail list", list_id.as_str(), &e))?;

        if result.rows_affected() == 0 {
            return Err(RegistrationError::not_found("mail list", list_id.as_str()));
        }
        Ok(())
    }
}
