//! Request extractors: caller identity, role gates, admin sessions, and
//! JSON/query/path wrappers whose rejections use the [`ApiError`] body.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use hub_core::{authorize, CallerProfile, Role};
use hub_identity::IdentityError;
use uuid::Uuid;

use crate::{
    api::AppState,
    auth::{AdminClaims, AdminTokenError},
    error::{map_db_error, ApiError},
    middleware::extract_bearer_token,
};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// A caller whose bearer token the identity provider accepted.
///
/// `profile` is `None` when the identity has no stored profile; role checks
/// decide what that means.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub profile: Option<CallerProfile>,
}

impl AuthUser {
    fn require(&self, roles: &[Role]) -> Result<Role, ApiError> {
        authorize(self.profile.as_ref(), roles).map_err(|error| {
            tracing::debug!(user_id = %self.id, error = %error, "role gate refused caller");
            ApiError::Forbidden
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts.headers.get(AUTHORIZATION))
            .ok_or(ApiError::Unauthenticated("Missing token"))?;

        let identity = state.identity.verify(token).await.map_err(|error| {
            match &error {
                IdentityError::Rejected { status } => {
                    tracing::debug!(status, "identity provider rejected token");
                }
                other => tracing::warn!(error = %other, "identity provider lookup failed"),
            }
            ApiError::Unauthenticated("Invalid token")
        })?;

        let profile = state
            .store
            .profile(identity.id)
            .await
            .map_err(|e| map_db_error(&e))?
            .map(|row| row.to_caller_profile());

        Ok(AuthUser {
            id: identity.id,
            profile,
        })
    }
}

/// An identified caller whose profile role is `brand`.
#[derive(Debug, Clone)]
pub struct BrandUser(pub AuthUser);

impl FromRequestParts<AppState> for BrandUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require(&[Role::Brand])?;
        Ok(BrandUser(user))
    }
}

/// An identified caller whose profile role is `influencer`.
#[derive(Debug, Clone)]
pub struct InfluencerUser(pub AuthUser);

impl FromRequestParts<AppState> for InfluencerUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require(&[Role::Influencer])?;
        Ok(InfluencerUser(user))
    }
}

/// A verified admin session token. Independent of user identity tokens.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminClaims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts.headers.get(AUTHORIZATION))
            .ok_or(ApiError::Unauthenticated("Missing admin token"))?;

        match state.admin.verify(token) {
            Ok(claims) => Ok(AdminSession(claims)),
            Err(AdminTokenError::Invalid) => Err(ApiError::Unauthenticated("Invalid admin token")),
            Err(AdminTokenError::WrongRole) => {
                tracing::warn!("admin route called with a non-admin token");
                Err(ApiError::Forbidden)
            }
        }
    }
}
