//! Database operations for the `influencers` table.

use chrono::{DateTime, Utc};
use hub_core::{CatalogFilters, CatalogSort, InfluencerStatus, CATALOG_PAGE_SIZE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const INFLUENCER_COLUMNS: &str = "id, user_id, handle, display_name, bio, niche, location, \
     platforms, followers_count, engagement_rate, avg_views, rate_min, rate_max, pricing_notes, \
     content_types, audience_regions, verified, profile_image_url, cover_video_url, \
     portfolio_media, plan_tier, status, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `influencers` table. Seeded rows have no `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct InfluencerRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub handle: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub niche: Option<String>,
    pub location: Option<String>,
    pub platforms: Value,
    pub followers_count: i64,
    pub engagement_rate: Decimal,
    pub avg_views: i64,
    pub rate_min: Option<i32>,
    pub rate_max: Option<i32>,
    pub pricing_notes: Option<String>,
    pub content_types: Vec<String>,
    pub audience_regions: Vec<String>,
    pub verified: bool,
    pub profile_image_url: Option<String>,
    pub cover_video_url: Option<String>,
    pub portfolio_media: Value,
    pub plan_tier: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-editable fields of an influencer's own profile.
///
/// `None` keeps the stored value on update and the column default on insert.
/// Ownership, status, verification and plan tier are never taken from here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InfluencerProfileInput {
    pub handle: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub niche: Option<String>,
    pub location: Option<String>,
    pub platforms: Option<Value>,
    pub followers_count: Option<i64>,
    #[serde(deserialize_with = "crate::decimal::optional")]
    pub engagement_rate: Option<Decimal>,
    pub avg_views: Option<i64>,
    pub rate_min: Option<i32>,
    pub rate_max: Option<i32>,
    pub pricing_notes: Option<String>,
    pub content_types: Option<Vec<String>>,
    pub audience_regions: Option<Vec<String>>,
    pub profile_image_url: Option<String>,
    pub cover_video_url: Option<String>,
    pub portfolio_media: Option<Value>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn order_clause(sort: Option<CatalogSort>) -> &'static str {
    match sort {
        Some(CatalogSort::FollowersDesc) => "ORDER BY followers_count DESC, created_at DESC",
        Some(CatalogSort::RateAsc) => "ORDER BY rate_min ASC NULLS LAST, created_at DESC",
        Some(CatalogSort::EngagementDesc) => "ORDER BY engagement_rate DESC, created_at DESC",
        None => "ORDER BY created_at DESC",
    }
}

/// Public directory search, capped at [`CATALOG_PAGE_SIZE`] rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_influencers(
    pool: &PgPool,
    filters: &CatalogFilters,
) -> Result<Vec<InfluencerRow>, DbError> {
    let sql = format!(
        "SELECT {INFLUENCER_COLUMNS} \
         FROM influencers \
         WHERE ($1::TEXT IS NULL OR display_name ILIKE $1 OR bio ILIKE $1 OR handle ILIKE $1) \
           AND ($2::TEXT IS NULL OR niche = $2) \
           AND ($3::TEXT IS NULL OR platforms ->> $3 IS NOT NULL) \
           AND ($4::BIGINT IS NULL OR followers_count >= $4) \
           AND ($5::INTEGER IS NULL OR rate_max <= $5) \
         {} \
         LIMIT $6",
        order_clause(filters.sort)
    );

    let rows = sqlx::query_as::<_, InfluencerRow>(&sql)
        .bind(filters.query_pattern())
        .bind(filters.niche.as_deref())
        .bind(filters.platform.as_deref())
        .bind(filters.min_followers)
        .bind(filters.max_rate)
        .bind(CATALOG_PAGE_SIZE)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns the influencer with exactly this handle, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_influencer_by_handle(
    pool: &PgPool,
    handle: &str,
) -> Result<Option<InfluencerRow>, DbError> {
    let sql = format!("SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE handle = $1");
    let row = sqlx::query_as::<_, InfluencerRow>(&sql)
        .bind(handle)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Returns the influencer profile owned by `user_id`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_influencer_by_user_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<InfluencerRow>, DbError> {
    let sql = format!("SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE user_id = $1");
    let row = sqlx::query_as::<_, InfluencerRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Returns the influencer profiles owned by any of `user_ids`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_influencers_by_user_ids(
    pool: &PgPool,
    user_ids: &[Uuid],
) -> Result<Vec<InfluencerRow>, DbError> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!("SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE user_id = ANY($1)");
    let rows = sqlx::query_as::<_, InfluencerRow>(&sql)
        .bind(user_ids)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Every influencer, newest first. Admin view; includes disabled rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_influencers(pool: &PgPool) -> Result<Vec<InfluencerRow>, DbError> {
    let sql = format!("SELECT {INFLUENCER_COLUMNS} FROM influencers ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, InfluencerRow>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Creates or updates the profile owned by `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Conflict`] if the handle belongs to another profile,
/// or [`DbError::Sqlx`] if the query fails.
pub async fn upsert_influencer_profile(
    pool: &PgPool,
    user_id: Uuid,
    input: &InfluencerProfileInput,
) -> Result<InfluencerRow, DbError> {
    let sql = format!(
        "INSERT INTO influencers (user_id, handle, display_name, bio, niche, location, platforms, \
                followers_count, engagement_rate, avg_views, rate_min, rate_max, pricing_notes, \
                content_types, audience_regions, profile_image_url, cover_video_url, portfolio_media) \
         VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{{}}'::jsonb), COALESCE($8, 0), \
                COALESCE($9, 0), COALESCE($10, 0), $11, $12, $13, COALESCE($14, '{{}}'::TEXT[]), \
                COALESCE($15, '{{}}'::TEXT[]), $16, $17, COALESCE($18, '[]'::jsonb)) \
         ON CONFLICT (user_id) DO UPDATE SET \
             handle = EXCLUDED.handle, \
             display_name = EXCLUDED.display_name, \
             bio = COALESCE($4, influencers.bio), \
             niche = COALESCE($5, influencers.niche), \
             location = COALESCE($6, influencers.location), \
             platforms = COALESCE($7, influencers.platforms), \
             followers_count = COALESCE($8, influencers.followers_count), \
             engagement_rate = COALESCE($9, influencers.engagement_rate), \
             avg_views = COALESCE($10, influencers.avg_views), \
             rate_min = COALESCE($11, influencers.rate_min), \
             rate_max = COALESCE($12, influencers.rate_max), \
             pricing_notes = COALESCE($13, influencers.pricing_notes), \
             content_types = COALESCE($14, influencers.content_types), \
             audience_regions = COALESCE($15, influencers.audience_regions), \
             profile_image_url = COALESCE($16, influencers.profile_image_url), \
             cover_video_url = COALESCE($17, influencers.cover_video_url), \
             portfolio_media = COALESCE($18, influencers.portfolio_media), \
             updated_at = NOW() \
         RETURNING {INFLUENCER_COLUMNS}"
    );

    sqlx::query_as::<_, InfluencerRow>(&sql)
        .bind(user_id)
        .bind(input.handle.trim())
        .bind(input.display_name.trim())
        .bind(input.bio.as_deref())
        .bind(input.niche.as_deref())
        .bind(input.location.as_deref())
        .bind(input.platforms.as_ref())
        .bind(input.followers_count)
        .bind(input.engagement_rate)
        .bind(input.avg_views)
        .bind(input.rate_min)
        .bind(input.rate_max)
        .bind(input.pricing_notes.as_deref())
        .bind(input.content_types.as_deref())
        .bind(input.audience_regions.as_deref())
        .bind(input.profile_image_url.as_deref())
        .bind(input.cover_video_url.as_deref())
        .bind(input.portfolio_media.as_ref())
        .fetch_one(pool)
        .await
        .map_err(DbError::from_write)
}

/// Sets an influencer's listing status. Returns `None` if no row has `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn set_influencer_status(
    pool: &PgPool,
    id: Uuid,
    status: InfluencerStatus,
) -> Result<Option<InfluencerRow>, DbError> {
    let sql = format!(
        "UPDATE influencers SET status = $1, updated_at = NOW() \
         WHERE id = $2 \
         RETURNING {INFLUENCER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, InfluencerRow>(&sql)
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}
