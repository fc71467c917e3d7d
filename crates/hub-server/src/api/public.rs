use axum::{extract::State, Json};
use hub_core::{CatalogFilters, CatalogSort};
use hub_db::InfluencerRow;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{
    error::{map_db_error, ApiError},
    extract::{ApiPath, ApiQuery},
};

/// Directory query string. Every value arrives as text; blank means absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CatalogQuery {
    query: Option<String>,
    niche: Option<String>,
    platform: Option<String>,
    min_followers: Option<String>,
    max_rate: Option<String>,
    sort: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CatalogQuery {
    fn into_filters(self) -> Result<CatalogFilters, ApiError> {
        let min_followers = present(self.min_followers)
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| ApiError::validation("minFollowers must be a whole number"))
            })
            .transpose()?;
        let max_rate = present(self.max_rate)
            .map(|v| {
                v.parse::<i32>()
                    .map_err(|_| ApiError::validation("maxRate must be a whole number"))
            })
            .transpose()?;
        let sort = present(self.sort)
            .map(|v| {
                v.parse::<CatalogSort>()
                    .map_err(|e| ApiError::validation(e.to_string()))
            })
            .transpose()?;

        Ok(CatalogFilters {
            query: present(self.query),
            niche: present(self.niche),
            platform: present(self.platform),
            min_followers,
            max_rate,
            sort,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct InfluencerList {
    influencers: Vec<InfluencerRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct InfluencerItem {
    influencer: InfluencerRow,
}

pub(super) async fn list_influencers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> Result<Json<InfluencerList>, ApiError> {
    let filters = query.into_filters()?;
    let influencers = state
        .store
        .search_influencers(&filters)
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(InfluencerList { influencers }))
}

pub(super) async fn get_influencer(
    State(state): State<AppState>,
    ApiPath(handle): ApiPath<String>,
) -> Result<Json<InfluencerItem>, ApiError> {
    let influencer = state
        .store
        .influencer_by_handle(&handle)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(InfluencerItem { influencer }))
}

#[cfg(test)]
#[path = "public_test.rs"]
mod tests;
