//! Public influencer directory: filters, sort modes and profile status.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Maximum rows returned by one directory query. There is no further paging.
pub const CATALOG_PAGE_SIZE: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    FollowersDesc,
    RateAsc,
    EngagementDesc,
}

impl CatalogSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogSort::FollowersDesc => "followers_desc",
            CatalogSort::RateAsc => "rate_asc",
            CatalogSort::EngagementDesc => "engagement_desc",
        }
    }
}

impl FromStr for CatalogSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers_desc" => Ok(CatalogSort::FollowersDesc),
            "rate_asc" => Ok(CatalogSort::RateAsc),
            "engagement_desc" => Ok(CatalogSort::EngagementDesc),
            other => Err(CoreError::InvalidSort(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfluencerStatus {
    #[default]
    Active,
    Disabled,
}

impl InfluencerStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InfluencerStatus::Active => "active",
            InfluencerStatus::Disabled => "disabled",
        }
    }
}

impl std::fmt::Display for InfluencerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfluencerStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(InfluencerStatus::Active),
            "disabled" => Ok(InfluencerStatus::Disabled),
            other => Err(CoreError::InvalidInfluencerStatus(other.to_owned())),
        }
    }
}

/// Directory query. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilters {
    /// Case-insensitive substring over display name, bio and handle.
    pub query: Option<String>,
    /// Exact niche match.
    pub niche: Option<String>,
    /// Key that must be present and non-null in the `platforms` object.
    pub platform: Option<String>,
    pub min_followers: Option<i64>,
    /// Upper bound on `rate_max`.
    pub max_rate: Option<i32>,
    pub sort: Option<CatalogSort>,
}

impl CatalogFilters {
    /// `query` wrapped as an `ILIKE` pattern with `%`, `_` and `\` escaped.
    #[must_use]
    pub fn query_pattern(&self) -> Option<String> {
        self.query.as_deref().map(|q| format!("%{}%", escape_like(q)))
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
