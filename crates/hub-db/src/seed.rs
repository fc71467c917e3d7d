use hub_core::{
    seed::{SEED_AUDIENCE_REGIONS, SEED_CONTENT_TYPES, SEED_PRICING_NOTES},
    SeedInfluencer,
};
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::DbError;

/// Insert the demo directory when the `influencers` table is empty.
///
/// Returns the number of rows inserted; zero when the table already has rows.
/// All inserts run inside a single transaction; if any fails the entire
/// batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_influencers_if_empty(
    pool: &PgPool,
    seeds: &[SeedInfluencer],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    // Serialises concurrent seeders so two fresh instances cannot both insert.
    sqlx::query("LOCK TABLE influencers IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM influencers")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        tx.rollback().await?;
        return Ok(0);
    }

    let content_types: Vec<String> = SEED_CONTENT_TYPES.iter().map(ToString::to_string).collect();
    let audience_regions: Vec<String> = SEED_AUDIENCE_REGIONS
        .iter()
        .map(ToString::to_string)
        .collect();

    for (index, seed) in seeds.iter().enumerate() {
        let metrics = SeedInfluencer::metrics(index);
        let platforms: Map<String, Value> = seed
            .platform_handles()
            .into_iter()
            .map(|(platform, handle)| (platform.to_string(), Value::String(handle)))
            .collect();

        sqlx::query(
            "INSERT INTO influencers (handle, display_name, bio, niche, location, platforms, \
                    followers_count, engagement_rate, avg_views, rate_min, rate_max, pricing_notes, \
                    content_types, audience_regions, verified, profile_image_url, plan_tier, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, 'active')",
        )
        .bind(&seed.handle)
        .bind(&seed.display_name)
        .bind(seed.bio())
        .bind(&seed.niche)
        .bind(&seed.location)
        .bind(Value::Object(platforms))
        .bind(metrics.followers_count)
        .bind(metrics.engagement_rate)
        .bind(metrics.avg_views)
        .bind(metrics.rate_min)
        .bind(metrics.rate_max)
        .bind(SEED_PRICING_NOTES)
        .bind(&content_types)
        .bind(&audience_regions)
        .bind(metrics.verified)
        .bind(seed.photo_url.as_deref())
        .bind(metrics.plan_tier)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(count = seeds.len(), "seeded demo influencer directory");
    Ok(seeds.len())
}
