//! Router harness: the real app wired to in-memory fakes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use hub_db::MemoryStore;
use hub_identity::{IdentityError, IdentityProvider, IdentityUser};
use hub_media::{MediaError, MediaStore, MediaUpload, UploadedMedia};
use tower::ServiceExt;
use uuid::Uuid;

use super::{build_app, AppState, HttpSettings};
use crate::auth::AdminAuth;

pub const ADMIN_USERNAME: &str = "ops";
pub const ADMIN_PASSWORD: &str = "correct horse";
pub const JWT_SECRET: &str = "router-test-secret";

/// Accepts only tokens registered through [`TestApp::user`].
#[derive(Default)]
pub struct FakeIdentity {
    tokens: Mutex<HashMap<String, Uuid>>,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify(&self, token: &str) -> Result<IdentityUser, IdentityError> {
        let tokens = self.tokens.lock().expect("identity lock");
        tokens
            .get(token)
            .map(|id| IdentityUser {
                id: *id,
                email: None,
            })
            .ok_or(IdentityError::Rejected { status: 401 })
    }
}

/// Records every upload; optionally fails with a provider message.
#[derive(Default)]
pub struct FakeMedia {
    pub uploads: Mutex<Vec<MediaUpload>>,
    pub fail_with: Mutex<Option<String>>,
}

#[async_trait]
impl MediaStore for FakeMedia {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError> {
        if let Some(message) = self.fail_with.lock().expect("media lock").clone() {
            return Err(MediaError::Provider(message));
        }
        let uploaded = UploadedMedia {
            secure_url: format!("https://cdn.test/{}/asset", upload.folder),
            public_id: format!("{}/asset", upload.folder),
            resource_type: upload.resource_type.as_str().to_string(),
        };
        self.uploads.lock().expect("media lock").push(upload);
        Ok(uploaded)
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
    pub media: Arc<FakeMedia>,
    pub admin: Arc<AdminAuth>,
    pub settings: HttpSettings,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_upload_limit(40 * 1024 * 1024)
    }

    pub fn with_upload_limit(upload_max_bytes: usize) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            identity: Arc::new(FakeIdentity::default()),
            media: Arc::new(FakeMedia::default()),
            admin: Arc::new(AdminAuth::new(
                JWT_SECRET,
                Some(ADMIN_USERNAME),
                Some(ADMIN_PASSWORD),
            )),
            settings: HttpSettings {
                cors_origins: Vec::new(),
                upload_max_bytes,
                media_folder_template: "influencerhub/{userId}".to_string(),
            },
        }
    }

    pub fn router(&self) -> Router {
        build_app(AppState {
            store: self.store.clone(),
            identity: self.identity.clone(),
            media: self.media.clone(),
            admin: Arc::clone(&self.admin),
            settings: Arc::new(self.settings.clone()),
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.expect("response")
    }

    /// Registers a token for a new identity, with a profile when `role` is given.
    pub fn user(&self, role: Option<&str>) -> (Uuid, String) {
        let (id, token) = self.user_without_profile();
        self.store.insert_profile(id, role, "active");
        (id, token)
    }

    pub fn user_without_profile(&self) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let token = format!("token-{id}");
        self.identity
            .tokens
            .lock()
            .expect("identity lock")
            .insert(token.clone(), id);
        (id, token)
    }

    pub fn brand(&self) -> (Uuid, String) {
        self.user(Some("brand"))
    }

    pub fn influencer(&self) -> (Uuid, String) {
        self.user(Some("influencer"))
    }

    pub fn admin_token(&self) -> String {
        self.admin
            .login(ADMIN_USERNAME, ADMIN_PASSWORD)
            .expect("admin login")
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn get_as(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json parse")
}
