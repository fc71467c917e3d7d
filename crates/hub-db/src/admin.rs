//! Aggregate counts for the admin dashboard.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Number of niches reported in [`AdminSummary::top_niches`].
pub const TOP_NICHES: i64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSummary {
    pub influencers: i64,
    pub brands: i64,
    pub requests: i64,
    /// Requests created at or after the `since` instant passed to [`admin_summary`].
    pub requests_today: i64,
    /// `(niche, influencer count)`, most common first, ties broken by name.
    pub top_niches: Vec<(String, i64)>,
}

/// Table totals plus the most common influencer niches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn admin_summary(pool: &PgPool, since: DateTime<Utc>) -> Result<AdminSummary, DbError> {
    let influencers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM influencers")
        .fetch_one(pool)
        .await?;
    let brands: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands")
        .fetch_one(pool)
        .await?;
    let requests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
        .fetch_one(pool)
        .await?;
    let requests_today: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE created_at >= $1")
            .bind(since)
            .fetch_one(pool)
            .await?;

    let top_niches = sqlx::query_as::<_, (String, i64)>(
        "SELECT niche, COUNT(*) AS n \
         FROM influencers \
         WHERE niche IS NOT NULL AND niche <> '' \
         GROUP BY niche \
         ORDER BY n DESC, niche ASC \
         LIMIT $1",
    )
    .bind(TOP_NICHES)
    .fetch_all(pool)
    .await?;

    Ok(AdminSummary {
        influencers,
        brands,
        requests,
        requests_today,
        top_niches,
    })
}
