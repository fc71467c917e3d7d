//! Database operations for the `profiles` table.

use chrono::{DateTime, Utc};
use hub_core::CallerProfile;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `profiles` table. `role` is stored as free text.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub role: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    #[must_use]
    pub fn to_caller_profile(&self) -> CallerProfile {
        CallerProfile::from_stored(self.role.as_deref(), Some(self.status.clone()))
    }
}

/// Returns the profile for `user_id`, or `None` if the user has none.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT user_id, role, status, created_at FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
