//! The persistence seam used by the HTTP layer.
//!
//! Handlers hold an `Arc<dyn HubStore>`; production wires [`PgStore`], router
//! tests wire the in-memory store from the `memory` feature.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_core::{CatalogFilters, InfluencerStatus, RequestStatus, SeedInfluencer};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    AdminSummary, BrandRow, CampaignBatch, CampaignRequestRow, DbError, InfluencerProfileInput,
    InfluencerRow, ProfileRow, ShortlistEntry,
};

#[async_trait]
pub trait HubStore: Send + Sync {
    async fn health(&self) -> Result<(), DbError>;

    async fn profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, DbError>;

    async fn search_influencers(
        &self,
        filters: &CatalogFilters,
    ) -> Result<Vec<InfluencerRow>, DbError>;

    async fn influencer_by_handle(&self, handle: &str) -> Result<Option<InfluencerRow>, DbError>;

    async fn influencer_by_user(&self, user_id: Uuid) -> Result<Option<InfluencerRow>, DbError>;

    async fn upsert_influencer_profile(
        &self,
        user_id: Uuid,
        input: &InfluencerProfileInput,
    ) -> Result<InfluencerRow, DbError>;

    async fn set_influencer_status(
        &self,
        id: Uuid,
        status: InfluencerStatus,
    ) -> Result<Option<InfluencerRow>, DbError>;

    async fn list_influencers(&self) -> Result<Vec<InfluencerRow>, DbError>;

    async fn list_brands(&self) -> Result<Vec<BrandRow>, DbError>;

    async fn add_to_shortlist(&self, brand_user_id: Uuid, influencer_user_id: Uuid)
        -> Result<(), DbError>;

    async fn remove_from_shortlist(
        &self,
        brand_user_id: Uuid,
        influencer_user_id: Uuid,
    ) -> Result<(), DbError>;

    async fn shortlist(&self, brand_user_id: Uuid) -> Result<Vec<ShortlistEntry>, DbError>;

    /// All-or-nothing insert of one request per target.
    async fn create_campaign_requests(
        &self,
        batch: &CampaignBatch,
    ) -> Result<Vec<CampaignRequestRow>, DbError>;

    async fn requests_for_brand(
        &self,
        brand_user_id: Uuid,
    ) -> Result<Vec<CampaignRequestRow>, DbError>;

    async fn requests_for_influencer(
        &self,
        influencer_user_id: Uuid,
    ) -> Result<Vec<CampaignRequestRow>, DbError>;

    async fn list_requests(&self) -> Result<Vec<CampaignRequestRow>, DbError>;

    /// `None` when the request does not exist, is addressed to someone else,
    /// or its current status does not permit the move.
    async fn update_request_status(
        &self,
        id: Uuid,
        influencer_user_id: Uuid,
        next: RequestStatus,
    ) -> Result<Option<CampaignRequestRow>, DbError>;

    async fn admin_summary(&self, since: DateTime<Utc>) -> Result<AdminSummary, DbError>;

    async fn seed_influencers_if_empty(&self, seeds: &[SeedInfluencer])
        -> Result<usize, DbError>;
}

/// Postgres-backed [`HubStore`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HubStore for PgStore {
    async fn health(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }

    async fn profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, DbError> {
        crate::get_profile(&self.pool, user_id).await
    }

    async fn search_influencers(
        &self,
        filters: &CatalogFilters,
    ) -> Result<Vec<InfluencerRow>, DbError> {
        crate::search_influencers(&self.pool, filters).await
    }

    async fn influencer_by_handle(&self, handle: &str) -> Result<Option<InfluencerRow>, DbError> {
        crate::get_influencer_by_handle(&self.pool, handle).await
    }

    async fn influencer_by_user(&self, user_id: Uuid) -> Result<Option<InfluencerRow>, DbError> {
        crate::get_influencer_by_user_id(&self.pool, user_id).await
    }

    async fn upsert_influencer_profile(
        &self,
        user_id: Uuid,
        input: &InfluencerProfileInput,
    ) -> Result<InfluencerRow, DbError> {
        crate::upsert_influencer_profile(&self.pool, user_id, input).await
    }

    async fn set_influencer_status(
        &self,
        id: Uuid,
        status: InfluencerStatus,
    ) -> Result<Option<InfluencerRow>, DbError> {
        crate::set_influencer_status(&self.pool, id, status).await
    }

    async fn list_influencers(&self) -> Result<Vec<InfluencerRow>, DbError> {
        crate::list_all_influencers(&self.pool).await
    }

    async fn list_brands(&self) -> Result<Vec<BrandRow>, DbError> {
        crate::list_brands(&self.pool).await
    }

    async fn add_to_shortlist(
        &self,
        brand_user_id: Uuid,
        influencer_user_id: Uuid,
    ) -> Result<(), DbError> {
        crate::add_to_shortlist(&self.pool, brand_user_id, influencer_user_id).await
    }

    async fn remove_from_shortlist(
        &self,
        brand_user_id: Uuid,
        influencer_user_id: Uuid,
    ) -> Result<(), DbError> {
        crate::remove_from_shortlist(&self.pool, brand_user_id, influencer_user_id).await
    }

    async fn shortlist(&self, brand_user_id: Uuid) -> Result<Vec<ShortlistEntry>, DbError> {
        crate::list_shortlist(&self.pool, brand_user_id).await
    }

    async fn create_campaign_requests(
        &self,
        batch: &CampaignBatch,
    ) -> Result<Vec<CampaignRequestRow>, DbError> {
        crate::insert_campaign_requests(&self.pool, batch).await
    }

    async fn requests_for_brand(
        &self,
        brand_user_id: Uuid,
    ) -> Result<Vec<CampaignRequestRow>, DbError> {
        crate::list_requests_for_brand(&self.pool, brand_user_id).await
    }

    async fn requests_for_influencer(
        &self,
        influencer_user_id: Uuid,
    ) -> Result<Vec<CampaignRequestRow>, DbError> {
        crate::list_requests_for_influencer(&self.pool, influencer_user_id).await
    }

    async fn list_requests(&self) -> Result<Vec<CampaignRequestRow>, DbError> {
        crate::list_all_requests(&self.pool).await
    }

    async fn update_request_status(
        &self,
        id: Uuid,
        influencer_user_id: Uuid,
        next: RequestStatus,
    ) -> Result<Option<CampaignRequestRow>, DbError> {
        crate::update_request_status(&self.pool, id, influencer_user_id, next).await
    }

    async fn admin_summary(&self, since: DateTime<Utc>) -> Result<AdminSummary, DbError> {
        crate::admin_summary(&self.pool, since).await
    }

    async fn seed_influencers_if_empty(
        &self,
        seeds: &[SeedInfluencer],
    ) -> Result<usize, DbError> {
        crate::seed_influencers_if_empty(&self.pool, seeds).await
    }
}
