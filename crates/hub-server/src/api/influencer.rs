use axum::{extract::State, Json};
use hub_core::RequestStatus;
use hub_db::{CampaignRequestRow, DbError, InfluencerProfileInput, InfluencerRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::{
    error::{map_db_error, ApiError},
    extract::{ApiJson, ApiPath, InfluencerUser},
};

#[derive(Debug, Serialize)]
pub(super) struct OwnProfile {
    profile: Option<InfluencerRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct SavedProfile {
    profile: InfluencerRow,
}

#[derive(Debug, Serialize)]
pub(super) struct RequestList {
    requests: Vec<CampaignRequestRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct RequestItem {
    request: CampaignRequestRow,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusChange {
    #[serde(default)]
    status: Option<String>,
}

fn validate_profile(input: &InfluencerProfileInput) -> Result<(), ApiError> {
    if input.handle.trim().is_empty() || input.display_name.trim().is_empty() {
        return Err(ApiError::validation("handle and display_name are required"));
    }
    if let (Some(min), Some(max)) = (input.rate_min, input.rate_max) {
        if min > max {
            return Err(ApiError::validation("rate_min must not exceed rate_max"));
        }
    }
    Ok(())
}

pub(super) async fn get_own_profile(
    State(state): State<AppState>,
    InfluencerUser(user): InfluencerUser,
) -> Result<Json<OwnProfile>, ApiError> {
    let profile = state
        .store
        .influencer_by_user(user.id)
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(OwnProfile { profile }))
}

/// Creates or updates the caller's own directory profile.
pub(super) async fn upsert_own_profile(
    State(state): State<AppState>,
    InfluencerUser(user): InfluencerUser,
    ApiJson(input): ApiJson<InfluencerProfileInput>,
) -> Result<Json<SavedProfile>, ApiError> {
    validate_profile(&input)?;

    let profile = state
        .store
        .upsert_influencer_profile(user.id, &input)
        .await
        .map_err(|e| match e {
            DbError::Conflict(constraint) => {
                tracing::debug!(
                    constraint = %constraint,
                    handle = %input.handle,
                    "profile handle collision"
                );
                ApiError::Conflict("Handle already taken".to_string())
            }
            other => map_db_error(&other),
        })?;

    Ok(Json(SavedProfile { profile }))
}

pub(super) async fn list_requests(
    State(state): State<AppState>,
    InfluencerUser(user): InfluencerUser,
) -> Result<Json<RequestList>, ApiError> {
    let requests = state
        .store
        .requests_for_influencer(user.id)
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(RequestList { requests }))
}

/// Moves one received request to a new status.
///
/// Only the targeted influencer can change a row; anyone else gets 404.
pub(super) async fn update_request_status(
    State(state): State<AppState>,
    InfluencerUser(user): InfluencerUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StatusChange>,
) -> Result<Json<RequestItem>, ApiError> {
    let status: RequestStatus = body
        .status
        .ok_or_else(|| ApiError::validation("status required"))?
        .parse()
        .map_err(|e: hub_core::CoreError| ApiError::validation(e.to_string()))?;

    let request = state
        .store
        .update_request_status(id, user.id, status)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(request_id = %id, status = %status, "request status updated");
    Ok(Json(RequestItem { request }))
}

#[cfg(test)]
#[path = "influencer_test.rs"]
mod tests;
