//! Demo influencer directory loaded from YAML.
//!
//! Seed rows carry no `user_id`; they exist so an empty deployment has a
//! browsable directory.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const SEED_CONTENT_TYPES: [&str; 3] = ["Reels", "UGC", "Story"];
pub const SEED_AUDIENCE_REGIONS: [&str; 2] = ["Caribbean", "North America"];
pub const SEED_PRICING_NOTES: &str =
    "Packages available for UGC, short-form video, and monthly retainers.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedInfluencer {
    pub handle: String,
    pub display_name: String,
    pub niche: String,
    pub location: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub influencers: Vec<SeedInfluencer>,
}

/// Metrics derived from a seed row's position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMetrics {
    pub followers_count: i64,
    pub engagement_rate: Decimal,
    pub avg_views: i64,
    pub rate_min: i32,
    pub rate_max: i32,
    pub verified: bool,
    pub plan_tier: &'static str,
}

impl SeedInfluencer {
    #[must_use]
    pub fn bio(&self) -> String {
        format!(
            "{} creates premium {} content with measurable campaign outcomes.",
            self.display_name,
            self.niche.to_lowercase()
        )
    }

    /// Instagram and TikTok handles, both `@handle`.
    #[must_use]
    pub fn platform_handles(&self) -> [(&'static str, String); 2] {
        let at = format!("@{}", self.handle);
        [("instagram", at.clone()), ("tiktok", at)]
    }

    #[must_use]
    pub fn metrics(index: usize) -> SeedMetrics {
        let i = i64::try_from(index).unwrap_or(i64::MAX / 10_000);
        let i32_index = i32::try_from(index).unwrap_or(i32::MAX / 100);
        SeedMetrics {
            followers_count: 25_000 + i * 4_200,
            engagement_rate: Decimal::new(240 + i * 17, 2),
            avg_views: 12_000 + i * 1_300,
            rate_min: 250 + i32_index * 40,
            rate_max: 900 + i32_index * 90,
            verified: index % 3 == 0,
            plan_tier: if index % 4 == 0 { "pro" } else { "starter" },
        }
    }
}

/// Load and validate the seed directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_influencers(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let seed_file: SeedFile = serde_yaml::from_str(&content)?;
    validate_seed(&seed_file)?;
    Ok(seed_file)
}

fn validate_seed(seed_file: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_handles = HashSet::new();

    for row in &seed_file.influencers {
        if row.handle.trim().is_empty() {
            return Err(ConfigError::Validation(
                "influencer handle must be non-empty".to_string(),
            ));
        }
        if row.display_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "influencer '{}' has an empty display_name",
                row.handle
            )));
        }
        if !seen_handles.insert(row.handle.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate influencer handle: '{}'",
                row.handle
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
