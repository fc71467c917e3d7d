//! Admin dashboard: credential login plus read-only views and the
//! influencer enable/disable switch, all behind an admin session token.

use axum::{body::Bytes, extract::State, Json};
use chrono::{DateTime, NaiveTime, Utc};
use hub_core::InfluencerStatus;
use hub_db::{BrandRow, CampaignRequestRow, InfluencerRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::{
    auth::AdminLoginError,
    error::{map_db_error, ApiError},
    extract::{AdminSession, ApiJson, ApiPath},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct Token {
    token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Totals {
    influencers: i64,
    brands: i64,
    requests: i64,
    requests_today: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Summary {
    totals: Totals,
    top_niches: Vec<(String, i64)>,
}

#[derive(Debug, Serialize)]
pub(super) struct InfluencerList {
    influencers: Vec<InfluencerRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandList {
    brands: Vec<BrandRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct RequestList {
    requests: Vec<CampaignRequestRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct InfluencerItem {
    influencer: InfluencerRow,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct StatusPatch {
    status: Option<String>,
}

/// An empty body, or `null`, means "no fields given". Content type is not checked.
fn parse_status_patch(body: &[u8]) -> Result<StatusPatch, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StatusPatch::default());
    }
    serde_json::from_slice::<Option<StatusPatch>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::validation(format!("invalid JSON body: {e}")))
}

fn start_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub(super) async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<Token>, ApiError> {
    match state.admin.login(&credentials.username, &credentials.password) {
        Ok(token) => {
            tracing::info!("admin session issued");
            Ok(Json(Token { token }))
        }
        Err(AdminLoginError::InvalidCredentials) => {
            tracing::warn!("admin login failed");
            Err(ApiError::Unauthenticated("Invalid credentials"))
        }
        Err(AdminLoginError::Signing(error)) => {
            tracing::error!(error = %error, "failed to sign admin token");
            Err(ApiError::Internal("Internal server error"))
        }
    }
}

pub(super) async fn summary(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Summary>, ApiError> {
    let summary = state
        .store
        .admin_summary(start_of_today(Utc::now()))
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(Summary {
        totals: Totals {
            influencers: summary.influencers,
            brands: summary.brands,
            requests: summary.requests,
            requests_today: summary.requests_today,
        },
        top_niches: summary.top_niches,
    }))
}

pub(super) async fn list_influencers(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<InfluencerList>, ApiError> {
    let influencers = state
        .store
        .list_influencers()
        .await
        .map_err(|e| map_db_error(&e))?;
    Ok(Json(InfluencerList { influencers }))
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<BrandList>, ApiError> {
    let brands = state
        .store
        .list_brands()
        .await
        .map_err(|e| map_db_error(&e))?;
    Ok(Json(BrandList { brands }))
}

pub(super) async fn list_requests(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<RequestList>, ApiError> {
    let requests = state
        .store
        .list_requests()
        .await
        .map_err(|e| map_db_error(&e))?;
    Ok(Json(RequestList { requests }))
}

/// Enables or disables a directory profile. A missing `status` disables it.
pub(super) async fn set_influencer_status(
    State(state): State<AppState>,
    AdminSession(claims): AdminSession,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<InfluencerItem>, ApiError> {
    let patch = parse_status_patch(&body)?;
    let status = match patch.status.as_deref() {
        None => InfluencerStatus::Disabled,
        Some(raw) => raw
            .parse::<InfluencerStatus>()
            .map_err(|e| ApiError::validation(e.to_string()))?,
    };

    let influencer = state
        .store
        .set_influencer_status(id, status)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(
        influencer_id = %id,
        status = %status,
        scope = %claims.scope,
        "admin changed influencer status"
    );
    Ok(Json(InfluencerItem { influencer }))
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
