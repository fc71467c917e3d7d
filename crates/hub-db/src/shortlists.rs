//! Database operations for the `shortlists` table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{influencers::list_influencers_by_user_ids, DbError, InfluencerRow};

#[derive(Debug, Clone, sqlx::FromRow)]
struct ShortlistRow {
    id: Uuid,
    brand_user_id: Uuid,
    influencer_user_id: Uuid,
    created_at: DateTime<Utc>,
}

/// A shortlisted influencer, joined with their profile when one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistEntry {
    pub id: Uuid,
    pub brand_user_id: Uuid,
    pub influencer_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub influencer: Option<InfluencerRow>,
}

/// Adds an influencer to a brand's shortlist. Adding twice is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn add_to_shortlist(
    pool: &PgPool,
    brand_user_id: Uuid,
    influencer_user_id: Uuid,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO shortlists (brand_user_id, influencer_user_id) \
         VALUES ($1, $2) \
         ON CONFLICT ON CONSTRAINT uq_shortlists_pair DO NOTHING",
    )
    .bind(brand_user_id)
    .bind(influencer_user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Removes an influencer from a brand's shortlist. Removing an absent entry is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn remove_from_shortlist(
    pool: &PgPool,
    brand_user_id: Uuid,
    influencer_user_id: Uuid,
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM shortlists WHERE brand_user_id = $1 AND influencer_user_id = $2")
        .bind(brand_user_id)
        .bind(influencer_user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// A brand's shortlist, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_shortlist(
    pool: &PgPool,
    brand_user_id: Uuid,
) -> Result<Vec<ShortlistEntry>, DbError> {
    let rows = sqlx::query_as::<_, ShortlistRow>(
        "SELECT id, brand_user_id, influencer_user_id, created_at \
         FROM shortlists \
         WHERE brand_user_id = $1 \
         ORDER BY created_at DESC",
    )
    .bind(brand_user_id)
    .fetch_all(pool)
    .await?;

    let user_ids: Vec<Uuid> = rows.iter().map(|r| r.influencer_user_id).collect();
    let profiles = list_influencers_by_user_ids(pool, &user_ids).await?;

    Ok(join_profiles(rows, profiles))
}

fn join_profiles(rows: Vec<ShortlistRow>, profiles: Vec<InfluencerRow>) -> Vec<ShortlistEntry> {
    let mut by_user: HashMap<Uuid, InfluencerRow> = profiles
        .into_iter()
        .filter_map(|p| p.user_id.map(|uid| (uid, p)))
        .collect();

    rows.into_iter()
        .map(|row| ShortlistEntry {
            id: row.id,
            brand_user_id: row.brand_user_id,
            influencer_user_id: row.influencer_user_id,
            created_at: row.created_at,
            influencer: by_user.remove(&row.influencer_user_id),
        })
        .collect()
}
