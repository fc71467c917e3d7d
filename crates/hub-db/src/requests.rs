//! Database operations for the `requests` table.

use chrono::{DateTime, NaiveDate, Utc};
use hub_core::RequestStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const REQUEST_COLUMNS: &str = "id, request_id, brand_user_id, influencer_user_id, campaign_name, \
     message, budget, deliverables, deadline, channel, status, created_at";

// ---------------------------------------------------------------------------
// Row and input types
// ---------------------------------------------------------------------------

/// A row from the `requests` table: one campaign addressed to one influencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CampaignRequestRow {
    pub id: Uuid,
    pub request_id: String,
    pub brand_user_id: Uuid,
    pub influencer_user_id: Uuid,
    pub campaign_name: Option<String>,
    pub message: Option<String>,
    pub budget: Option<Decimal>,
    pub deliverables: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub channel: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Campaign fields copied onto every request of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetails {
    pub campaign_name: Option<String>,
    pub message: Option<String>,
    #[serde(default, deserialize_with = "crate::decimal::optional")]
    pub budget: Option<Decimal>,
    pub deliverables: Option<String>,
    #[serde(default, deserialize_with = "crate::date::optional")]
    pub deadline: Option<NaiveDate>,
    pub channel: Option<String>,
}

/// One submission: a brand, its campaign, and `(request code, influencer)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignBatch {
    pub brand_user_id: Uuid,
    pub details: CampaignDetails,
    pub targets: Vec<(String, Uuid)>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts one request per target in a single statement, all in status `new`.
///
/// Either every row is written or none is.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_campaign_requests(
    pool: &PgPool,
    batch: &CampaignBatch,
) -> Result<Vec<CampaignRequestRow>, DbError> {
    if batch.targets.is_empty() {
        return Ok(Vec::new());
    }

    let (codes, influencers): (Vec<String>, Vec<Uuid>) = batch.targets.iter().cloned().unzip();
    let details = &batch.details;

    let sql = format!(
        "INSERT INTO requests (request_id, brand_user_id, influencer_user_id, campaign_name, \
                message, budget, deliverables, deadline, channel, status) \
         SELECT t.code, $3, t.influencer, $4, $5, $6, $7, $8, $9, $10 \
         FROM UNNEST($1::TEXT[], $2::UUID[]) AS t(code, influencer) \
         RETURNING {REQUEST_COLUMNS}"
    );

    let rows = sqlx::query_as::<_, CampaignRequestRow>(&sql)
        .bind(&codes)
        .bind(&influencers)
        .bind(batch.brand_user_id)
        .bind(details.campaign_name.as_deref())
        .bind(details.message.as_deref())
        .bind(details.budget)
        .bind(details.deliverables.as_deref())
        .bind(details.deadline)
        .bind(details.channel.as_deref())
        .bind(RequestStatus::INITIAL.as_str())
        .fetch_all(pool)
        .await
        .map_err(DbError::from_write)?;

    Ok(rows)
}

/// Requests sent by a brand, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_requests_for_brand(
    pool: &PgPool,
    brand_user_id: Uuid,
) -> Result<Vec<CampaignRequestRow>, DbError> {
    let sql = format!(
        "SELECT {REQUEST_COLUMNS} FROM requests \
         WHERE brand_user_id = $1 \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, CampaignRequestRow>(&sql)
        .bind(brand_user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Requests addressed to an influencer, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_requests_for_influencer(
    pool: &PgPool,
    influencer_user_id: Uuid,
) -> Result<Vec<CampaignRequestRow>, DbError> {
    let sql = format!(
        "SELECT {REQUEST_COLUMNS} FROM requests \
         WHERE influencer_user_id = $1 \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, CampaignRequestRow>(&sql)
        .bind(influencer_user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Every request, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_requests(pool: &PgPool) -> Result<Vec<CampaignRequestRow>, DbError> {
    let sql = format!("SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, CampaignRequestRow>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Moves a request addressed to `influencer_user_id` to `next`.
///
/// The ownership check and the transition check are part of the `UPDATE`
/// itself, so a concurrent change cannot slip between check and write.
/// Returns `None` when no row matched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_request_status(
    pool: &PgPool,
    id: Uuid,
    influencer_user_id: Uuid,
    next: RequestStatus,
) -> Result<Option<CampaignRequestRow>, DbError> {
    let predecessors: Vec<String> = RequestStatus::allowed_predecessors(next)
        .into_iter()
        .map(|status| status.as_str().to_string())
        .collect();

    let sql = format!(
        "UPDATE requests SET status = $1 \
         WHERE id = $2 AND influencer_user_id = $3 AND status = ANY($4) \
         RETURNING {REQUEST_COLUMNS}"
    );
    let row = sqlx::query_as::<_, CampaignRequestRow>(&sql)
        .bind(next.as_str())
        .bind(id)
        .bind(influencer_user_id)
        .bind(&predecessors)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_details_read_camel_case() {
        let details: CampaignDetails = serde_json::from_value(serde_json::json!({
            "campaignName": "Summer Launch",
            "budget": "1500.00",
            "deadline": "2026-07-01",
            "channel": "instagram"
        }))
        .expect("deserialize");

        assert_eq!(details.campaign_name.as_deref(), Some("Summer Launch"));
        assert_eq!(details.budget, Some(Decimal::new(150_000, 2)));
        assert_eq!(details.deadline, NaiveDate::from_ymd_opt(2026, 7, 1));
        assert!(details.message.is_none());
    }

    #[test]
    fn campaign_details_accept_blank_form_fields() {
        let details: CampaignDetails = serde_json::from_value(serde_json::json!({
            "campaignName": "",
            "message": "",
            "budget": 0,
            "deliverables": "",
            "deadline": "",
            "channel": ""
        }))
        .expect("deserialize");

        assert_eq!(details.deadline, None);
        assert_eq!(details.budget, Some(Decimal::ZERO));
        assert_eq!(details.deliverables.as_deref(), Some(""));
    }
}
