//! In-memory [`HubStore`] for tests. Mirrors the Postgres semantics the HTTP
//! layer depends on: filtering, ordering, uniqueness and all-or-nothing batches.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_core::{
    seed::{SEED_AUDIENCE_REGIONS, SEED_CONTENT_TYPES, SEED_PRICING_NOTES},
    CatalogFilters, CatalogSort, InfluencerStatus, RequestStatus, SeedInfluencer,
    CATALOG_PAGE_SIZE,
};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    admin::TOP_NICHES, AdminSummary, BrandRow, CampaignBatch, CampaignRequestRow, DbError,
    HubStore, InfluencerProfileInput, InfluencerRow, ProfileRow, ShortlistEntry,
};

#[derive(Debug, Clone)]
struct ShortlistRecord {
    id: Uuid,
    brand_user_id: Uuid,
    influencer_user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<ProfileRow>,
    brands: Vec<BrandRow>,
    influencers: Vec<InfluencerRow>,
    requests: Vec<CampaignRequestRow>,
    shortlists: Vec<ShortlistRecord>,
    fail_writes: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

fn simulated_failure() -> DbError {
    DbError::Sqlx(sqlx::Error::Protocol("simulated write failure".to_string()))
}

/// Rows are stored oldest first; reversing gives newest first with later
/// inserts winning timestamp ties, as a `created_at DESC` index scan would.
fn newest_first<T: Clone>(rows: &[T]) -> Vec<T> {
    rows.iter().rev().cloned().collect()
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// A minimal active influencer row, for tests to adjust before inserting.
    #[must_use]
    pub fn influencer(handle: &str, user_id: Option<Uuid>) -> InfluencerRow {
        let now = Utc::now();
        InfluencerRow {
            id: Uuid::new_v4(),
            user_id,
            handle: handle.to_string(),
            display_name: handle.to_string(),
            bio: None,
            niche: None,
            location: None,
            platforms: json!({}),
            followers_count: 0,
            engagement_rate: Decimal::ZERO,
            avg_views: 0,
            rate_min: None,
            rate_max: None,
            pricing_notes: None,
            content_types: Vec::new(),
            audience_regions: Vec::new(),
            verified: false,
            profile_image_url: None,
            cover_video_url: None,
            portfolio_media: json!([]),
            plan_tier: "starter".to_string(),
            status: InfluencerStatus::Active.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn insert_profile(&self, user_id: Uuid, role: Option<&str>, status: &str) {
        let mut tables = self.lock();
        tables.profiles.retain(|p| p.user_id != user_id);
        tables.profiles.push(ProfileRow {
            user_id,
            role: role.map(str::to_string),
            status: status.to_string(),
            created_at: Utc::now(),
        });
    }

    pub fn insert_influencer(&self, row: InfluencerRow) {
        self.lock().influencers.push(row);
    }

    pub fn insert_brand(&self, company_name: &str, user_id: Option<Uuid>) -> BrandRow {
        let now = Utc::now();
        let row = BrandRow {
            id: Uuid::new_v4(),
            user_id,
            company_name: company_name.to_string(),
            contact_name: None,
            email: None,
            website: None,
            industry: None,
            created_at: now,
            updated_at: now,
        };
        self.lock().brands.push(row.clone());
        row
    }

    /// Inserts a request row directly, bypassing the fan-out path.
    pub fn insert_request(&self, row: CampaignRequestRow) {
        self.lock().requests.push(row);
    }

    /// Makes every subsequent write fail until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }
}

fn matches_filters(row: &InfluencerRow, filters: &CatalogFilters) -> bool {
    if let Some(q) = filters.query.as_deref() {
        let needle = q.to_lowercase();
        let hit = row.display_name.to_lowercase().contains(&needle)
            || row.handle.to_lowercase().contains(&needle)
            || row
                .bio
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if let Some(niche) = filters.niche.as_deref() {
        if row.niche.as_deref() != Some(niche) {
            return false;
        }
    }
    if let Some(platform) = filters.platform.as_deref() {
        if row.platforms.get(platform).is_none_or(Value::is_null) {
            return false;
        }
    }
    if let Some(min) = filters.min_followers {
        if row.followers_count < min {
            return false;
        }
    }
    if let Some(max) = filters.max_rate {
        if row.rate_max.is_none_or(|r| r > max) {
            return false;
        }
    }
    true
}

fn compare_for_sort(sort: CatalogSort, a: &InfluencerRow, b: &InfluencerRow) -> Ordering {
    match sort {
        CatalogSort::FollowersDesc => b.followers_count.cmp(&a.followers_count),
        CatalogSort::EngagementDesc => b.engagement_rate.cmp(&a.engagement_rate),
        CatalogSort::RateAsc => match (a.rate_min, b.rate_min) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn apply_profile_input(row: &mut InfluencerRow, input: &InfluencerProfileInput) {
    row.handle = input.handle.trim().to_string();
    row.display_name = input.display_name.trim().to_string();
    if let Some(v) = &input.bio {
        row.bio = Some(v.clone());
    }
    if let Some(v) = &input.niche {
        row.niche = Some(v.clone());
    }
    if let Some(v) = &input.location {
        row.location = Some(v.clone());
    }
    if let Some(v) = &input.platforms {
        row.platforms = v.clone();
    }
    if let Some(v) = input.followers_count {
        row.followers_count = v;
    }
    if let Some(v) = input.engagement_rate {
        row.engagement_rate = v;
    }
    if let Some(v) = input.avg_views {
        row.avg_views = v;
    }
    if let Some(v) = input.rate_min {
        row.rate_min = Some(v);
    }
    if let Some(v) = input.rate_max {
        row.rate_max = Some(v);
    }
    if let Some(v) = &input.pricing_notes {
        row.pricing_notes = Some(v.clone());
    }
    if let Some(v) = &input.content_types {
        row.content_types = v.clone();
    }
    if let Some(v) = &input.audience_regions {
        row.audience_regions = v.clone();
    }
    if let Some(v) = &input.profile_image_url {
        row.profile_image_url = Some(v.clone());
    }
    if let Some(v) = &input.cover_video_url {
        row.cover_video_url = Some(v.clone());
    }
    if let Some(v) = &input.portfolio_media {
        row.portfolio_media = v.clone();
    }
    row.updated_at = Utc::now();
}

#[async_trait]
impl HubStore for MemoryStore {
    async fn health(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, DbError> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn search_influencers(
        &self,
        filters: &CatalogFilters,
    ) -> Result<Vec<InfluencerRow>, DbError> {
        let tables = self.lock();
        let mut rows: Vec<InfluencerRow> = newest_first(&tables.influencers)
            .into_iter()
            .filter(|row| matches_filters(row, filters))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(sort) = filters.sort {
            // Stable sort keeps the newest-first order for ties.
            rows.sort_by(|a, b| compare_for_sort(sort, a, b));
        }
        rows.truncate(usize::try_from(CATALOG_PAGE_SIZE).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn influencer_by_handle(&self, handle: &str) -> Result<Option<InfluencerRow>, DbError> {
        Ok(self
            .lock()
            .influencers
            .iter()
            .find(|r| r.handle == handle)
            .cloned())
    }

    async fn influencer_by_user(&self, user_id: Uuid) -> Result<Option<InfluencerRow>, DbError> {
        Ok(self
            .lock()
            .influencers
            .iter()
            .find(|r| r.user_id == Some(user_id))
            .cloned())
    }

    async fn upsert_influencer_profile(
        &self,
        user_id: Uuid,
        input: &InfluencerProfileInput,
    ) -> Result<InfluencerRow, DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }

        let handle = input.handle.trim();
        let taken = tables
            .influencers
            .iter()
            .any(|r| r.handle == handle && r.user_id != Some(user_id));
        if taken {
            return Err(DbError::Conflict("influencers_handle_key".to_string()));
        }

        if let Some(row) = tables
            .influencers
            .iter_mut()
            .find(|r| r.user_id == Some(user_id))
        {
            apply_profile_input(row, input);
            return Ok(row.clone());
        }

        let mut row = Self::influencer(handle, Some(user_id));
        apply_profile_input(&mut row, input);
        tables.influencers.push(row.clone());
        Ok(row)
    }

    async fn set_influencer_status(
        &self,
        id: Uuid,
        status: InfluencerStatus,
    ) -> Result<Option<InfluencerRow>, DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }
        Ok(tables.influencers.iter_mut().find(|r| r.id == id).map(|row| {
            row.status = status.as_str().to_string();
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn list_influencers(&self) -> Result<Vec<InfluencerRow>, DbError> {
        Ok(newest_first(&self.lock().influencers))
    }

    async fn list_brands(&self) -> Result<Vec<BrandRow>, DbError> {
        Ok(newest_first(&self.lock().brands))
    }

    async fn add_to_shortlist(
        &self,
        brand_user_id: Uuid,
        influencer_user_id: Uuid,
    ) -> Result<(), DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }
        let exists = tables.shortlists.iter().any(|s| {
            s.brand_user_id == brand_user_id && s.influencer_user_id == influencer_user_id
        });
        if !exists {
            tables.shortlists.push(ShortlistRecord {
                id: Uuid::new_v4(),
                brand_user_id,
                influencer_user_id,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn remove_from_shortlist(
        &self,
        brand_user_id: Uuid,
        influencer_user_id: Uuid,
    ) -> Result<(), DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }
        tables.shortlists.retain(|s| {
            !(s.brand_user_id == brand_user_id && s.influencer_user_id == influencer_user_id)
        });
        Ok(())
    }

    async fn shortlist(&self, brand_user_id: Uuid) -> Result<Vec<ShortlistEntry>, DbError> {
        let tables = self.lock();
        Ok(newest_first(&tables.shortlists)
            .into_iter()
            .filter(|s| s.brand_user_id == brand_user_id)
            .map(|s| ShortlistEntry {
                id: s.id,
                brand_user_id: s.brand_user_id,
                influencer_user_id: s.influencer_user_id,
                created_at: s.created_at,
                influencer: tables
                    .influencers
                    .iter()
                    .find(|r| r.user_id == Some(s.influencer_user_id))
                    .cloned(),
            })
            .collect())
    }

    async fn create_campaign_requests(
        &self,
        batch: &CampaignBatch,
    ) -> Result<Vec<CampaignRequestRow>, DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }

        let now = Utc::now();
        let details = &batch.details;
        let rows: Vec<CampaignRequestRow> = batch
            .targets
            .iter()
            .map(|(code, influencer_user_id)| CampaignRequestRow {
                id: Uuid::new_v4(),
                request_id: code.clone(),
                brand_user_id: batch.brand_user_id,
                influencer_user_id: *influencer_user_id,
                campaign_name: details.campaign_name.clone(),
                message: details.message.clone(),
                budget: details.budget,
                deliverables: details.deliverables.clone(),
                deadline: details.deadline,
                channel: details.channel.clone(),
                status: RequestStatus::INITIAL.as_str().to_string(),
                created_at: now,
            })
            .collect();
        tables.requests.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn requests_for_brand(
        &self,
        brand_user_id: Uuid,
    ) -> Result<Vec<CampaignRequestRow>, DbError> {
        Ok(newest_first(&self.lock().requests)
            .into_iter()
            .filter(|r| r.brand_user_id == brand_user_id)
            .collect())
    }

    async fn requests_for_influencer(
        &self,
        influencer_user_id: Uuid,
    ) -> Result<Vec<CampaignRequestRow>, DbError> {
        Ok(newest_first(&self.lock().requests)
            .into_iter()
            .filter(|r| r.influencer_user_id == influencer_user_id)
            .collect())
    }

    async fn list_requests(&self) -> Result<Vec<CampaignRequestRow>, DbError> {
        Ok(newest_first(&self.lock().requests))
    }

    async fn update_request_status(
        &self,
        id: Uuid,
        influencer_user_id: Uuid,
        next: RequestStatus,
    ) -> Result<Option<CampaignRequestRow>, DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }
        let row = tables.requests.iter_mut().find(|r| {
            r.id == id
                && r.influencer_user_id == influencer_user_id
                && r.status
                    .parse::<RequestStatus>()
                    .is_ok_and(|current| current.can_transition_to(next))
        });
        Ok(row.map(|row| {
            row.status = next.as_str().to_string();
            row.clone()
        }))
    }

    async fn admin_summary(&self, since: DateTime<Utc>) -> Result<AdminSummary, DbError> {
        let tables = self.lock();
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);

        let mut niches: Vec<(String, i64)> = Vec::new();
        for niche in tables
            .influencers
            .iter()
            .filter_map(|r| r.niche.as_deref())
            .filter(|n| !n.is_empty())
        {
            match niches.iter_mut().find(|(name, _)| name == niche) {
                Some((_, n)) => *n += 1,
                None => niches.push((niche.to_string(), 1)),
            }
        }
        niches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        niches.truncate(usize::try_from(TOP_NICHES).unwrap_or(usize::MAX));

        Ok(AdminSummary {
            influencers: count(tables.influencers.len()),
            brands: count(tables.brands.len()),
            requests: count(tables.requests.len()),
            requests_today: count(
                tables
                    .requests
                    .iter()
                    .filter(|r| r.created_at >= since)
                    .count(),
            ),
            top_niches: niches,
        })
    }

    async fn seed_influencers_if_empty(
        &self,
        seeds: &[SeedInfluencer],
    ) -> Result<usize, DbError> {
        let mut tables = self.lock();
        if tables.fail_writes {
            return Err(simulated_failure());
        }
        if !tables.influencers.is_empty() {
            return Ok(0);
        }

        let mut seen = HashSet::new();
        for seed in seeds {
            if !seen.insert(seed.handle.clone()) {
                return Err(DbError::Conflict("influencers_handle_key".to_string()));
            }
        }
        for (index, seed) in seeds.iter().enumerate() {
            let metrics = SeedInfluencer::metrics(index);
            let platforms: Map<String, Value> = seed
                .platform_handles()
                .into_iter()
                .map(|(platform, handle)| (platform.to_string(), Value::String(handle)))
                .collect();
            let mut row = Self::influencer(&seed.handle, None);
            row.display_name.clone_from(&seed.display_name);
            row.bio = Some(seed.bio());
            row.niche = Some(seed.niche.clone());
            row.location = Some(seed.location.clone());
            row.platforms = Value::Object(platforms);
            row.followers_count = metrics.followers_count;
            row.engagement_rate = metrics.engagement_rate;
            row.avg_views = metrics.avg_views;
            row.rate_min = Some(metrics.rate_min);
            row.rate_max = Some(metrics.rate_max);
            row.pricing_notes = Some(SEED_PRICING_NOTES.to_string());
            row.content_types = SEED_CONTENT_TYPES.iter().map(ToString::to_string).collect();
            row.audience_regions = SEED_AUDIENCE_REGIONS
                .iter()
                .map(ToString::to_string)
                .collect();
            row.verified = metrics.verified;
            row.profile_image_url.clone_from(&seed.photo_url);
            row.plan_tier = metrics.plan_tier.to_string();
            tables.influencers.push(row);
        }
        Ok(seeds.len())
    }
}
