//! Brand-only routes: the shortlist and outgoing campaign requests.

use axum::{extract::State, Json};
use hub_core::generate_request_codes;
use hub_db::{CampaignBatch, CampaignDetails, CampaignRequestRow, ShortlistEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::{
    error::{map_db_error, ApiError},
    extract::{ApiJson, BrandUser},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ShortlistAction {
    #[default]
    Add,
    Remove,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ShortlistUpdate {
    #[serde(default)]
    influencer_user_id: Option<Uuid>,
    #[serde(default)]
    action: ShortlistAction,
}

#[derive(Debug, Serialize)]
pub(super) struct Success {
    success: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct ShortlistList {
    shortlist: Vec<ShortlistEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateRequests {
    #[serde(default)]
    influencer_user_ids: Vec<Uuid>,
    #[serde(flatten)]
    details: CampaignDetails,
}

#[derive(Debug, Serialize)]
pub(super) struct Created {
    created: Vec<CampaignRequestRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct RequestList {
    requests: Vec<CampaignRequestRow>,
}

pub(super) async fn update_shortlist(
    State(state): State<AppState>,
    BrandUser(user): BrandUser,
    ApiJson(body): ApiJson<ShortlistUpdate>,
) -> Result<Json<Success>, ApiError> {
    let influencer_user_id = body
        .influencer_user_id
        .ok_or_else(|| ApiError::validation("influencerUserId required"))?;

    let result = match body.action {
        ShortlistAction::Add => {
            state
                .store
                .add_to_shortlist(user.id, influencer_user_id)
                .await
        }
        ShortlistAction::Remove => {
            state
                .store
                .remove_from_shortlist(user.id, influencer_user_id)
                .await
        }
    };
    result.map_err(|e| map_db_error(&e))?;

    Ok(Json(Success { success: true }))
}

pub(super) async fn list_shortlist(
    State(state): State<AppState>,
    BrandUser(user): BrandUser,
) -> Result<Json<ShortlistList>, ApiError> {
    let shortlist = state
        .store
        .shortlist(user.id)
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(ShortlistList { shortlist }))
}

/// Fans one campaign out into a request per target influencer.
///
/// All rows are written in one statement, so a failure leaves none behind.
pub(super) async fn create_requests(
    State(state): State<AppState>,
    BrandUser(user): BrandUser,
    ApiJson(body): ApiJson<CreateRequests>,
) -> Result<Json<Created>, ApiError> {
    if body.influencer_user_ids.is_empty() {
        return Err(ApiError::validation("influencerUserIds required"));
    }

    let codes = generate_request_codes(&mut rand::rng(), body.influencer_user_ids.len())
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let batch = CampaignBatch {
        brand_user_id: user.id,
        details: body.details,
        targets: codes.into_iter().zip(body.influencer_user_ids).collect(),
    };

    let created = state
        .store
        .create_campaign_requests(&batch)
        .await
        .map_err(|e| map_db_error(&e))?;

    tracing::info!(
        brand_user_id = %user.id,
        count = created.len(),
        "campaign requests created"
    );
    Ok(Json(Created { created }))
}

pub(super) async fn list_requests(
    State(state): State<AppState>,
    BrandUser(user): BrandUser,
) -> Result<Json<RequestList>, ApiError> {
    let requests = state
        .store
        .requests_for_brand(user.id)
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(RequestList { requests }))
}

#[cfg(test)]
#[path = "brand_test.rs"]
mod tests;
