mod admin;
mod brand;
mod influencer;
mod media;
mod public;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use hub_core::AppConfig;
use hub_db::HubStore;
use hub_identity::IdentityProvider;
use hub_media::MediaStore;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::AdminAuth,
    error::{not_found, panic_response},
    middleware::{request_id, RequestId, REQUEST_ID_HEADER},
};

/// Multipart framing allowance on top of the file size cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Per-process HTTP settings taken from [`AppConfig`] at startup.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origins: Vec<String>,
    pub upload_max_bytes: usize,
    pub media_folder_template: String,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cors_origins: config.cors_origins.clone(),
            upload_max_bytes: config.upload_max_bytes,
            media_folder_template: config.media_folder_template.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HubStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub media: Arc<dyn MediaStore>,
    pub admin: Arc<AdminAuth>,
    pub settings: Arc<HttpSettings>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/public/influencers", get(public::list_influencers))
        .route(
            "/api/public/influencers/{handle}",
            get(public::get_influencer),
        )
        .route("/api/admin/login", post(admin::login))
}

fn brand_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/brand/shortlist",
            get(brand::list_shortlist).post(brand::update_shortlist),
        )
        .route(
            "/api/brand/requests",
            get(brand::list_requests).post(brand::create_requests),
        )
}

fn influencer_router() -> Router<AppState> {
    Router::new()
        .route("/api/influencer/me", get(influencer::get_own_profile))
        .route(
            "/api/influencer/profile",
            post(influencer::upsert_own_profile),
        )
        .route("/api/influencer/requests", get(influencer::list_requests))
        .route(
            "/api/influencer/requests/{id}/status",
            post(influencer::update_request_status),
        )
}

fn media_router(upload_max_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/api/media/upload",
        post(media::upload).layer(DefaultBodyLimit::max(
            upload_max_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        )),
    )
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/summary", get(admin::summary))
        .route("/api/admin/influencers", get(admin::list_influencers))
        .route("/api/admin/brands", get(admin::list_brands))
        .route("/api/admin/requests", get(admin::list_requests))
        .route(
            "/api/admin/influencers/{id}/status",
            patch(admin::set_influencer_status),
        )
}

pub fn build_app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map_or("-", |id| id.0.as_str());
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri(),
            request_id,
        )
    });

    Router::new()
        .merge(public_router())
        .merge(brand_router())
        .merge(influencer_router())
        .merge(media_router(state.settings.upload_max_bytes))
        .merge(admin_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(trace)
                .layer(build_cors(&state.settings.cors_origins))
                .layer(CompressionLayer::new())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}
