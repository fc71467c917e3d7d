//! HTTP client for a GoTrue-compatible identity provider.
//!
//! A bearer token is resolved by calling `GET {base}/auth/v1/user` with the
//! caller's token and the service key. Any non-success answer means the token
//! cannot be trusted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::IdentityError;
use crate::{IdentityProvider, IdentityUser};

const USER_PATH: &str = "auth/v1/user";

/// Client for the hosted identity provider.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    service_key: String,
    user_url: Url,
}

impl IdentityClient {
    /// Creates a client for the provider rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`IdentityError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        service_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("influencerhub/0.1")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let user_url = Url::parse(&normalised)
            .and_then(|base| base.join(USER_PATH))
            .map_err(|e| IdentityError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            service_key: service_key.to_owned(),
            user_url,
        })
    }

    /// Resolves `token` to the user it was issued for.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Rejected`] if the provider answers with a 4xx.
    /// - [`IdentityError::Http`] on network failure or a 5xx.
    /// - [`IdentityError::Deserialize`] if the user record is malformed.
    pub async fn fetch_user(&self, token: &str) -> Result<IdentityUser, IdentityError> {
        let response = self
            .client
            .get(self.user_url.clone())
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), "identity provider rejected token");
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
            });
        }
        let response = response.error_for_status()?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IdentityError::Deserialize {
            context: self.user_url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn verify(&self, token: &str) -> Result<IdentityUser, IdentityError> {
        self.fetch_user(token).await
    }
}
