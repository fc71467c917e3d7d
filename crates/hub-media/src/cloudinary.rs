//! Signed uploads to the Cloudinary REST API.
//!
//! Each upload is one `multipart/form-data` POST to
//! `{base}/v1_1/{cloud}/{resource_type}/upload`, authenticated by a signature
//! over the sorted upload parameters followed by the API secret. The digest is
//! SHA-1 unless the account is configured for SHA-256.

use std::time::Duration;

use async_trait::async_trait;
use hub_core::{MediaConfig, SignatureAlgorithm};
use reqwest::{
    multipart::{Form, Part},
    Body, Client, Url,
};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::{MediaError, MediaStore, MediaUpload, UploadedMedia};

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Request signature: hex digest of `k1=v1&k2=v2…` sorted by key, then the secret.
#[must_use]
pub fn sign_params(
    params: &[(&str, &str)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let payload = format!("{joined}{api_secret}");
    match algorithm {
        SignatureAlgorithm::Sha1 => format!("{:x}", Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => format!("{:x}", Sha256::digest(payload.as_bytes())),
    }
}

/// Client for the Cloudinary upload API.
pub struct CloudinaryClient {
    client: Client,
    config: MediaConfig,
    base_url: Url,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CloudinaryClient {
    /// Creates a client pointed at the production Cloudinary API.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: MediaConfig, timeout_secs: u64) -> Result<Self, MediaError> {
        Self::with_base_url(config, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MediaError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        config: MediaConfig,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("influencerhub/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| MediaError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    fn upload_url(&self, resource_type: &str) -> Result<Url, MediaError> {
        let path = format!("v1_1/{}/{resource_type}/upload", self.config.cloud_name);
        self.base_url
            .join(&path)
            .map_err(|e| MediaError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(&self, upload: MediaUpload, timestamp: i64) -> Result<UploadedMedia, MediaError> {
        let resource_type = upload.resource_type.as_str();
        let url = self.upload_url(resource_type)?;
        let timestamp = timestamp.to_string();
        let signature = sign_params(
            &[("folder", upload.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let size = upload.bytes.len();
        let mut part = Part::stream_with_length(
            Body::from(upload.bytes),
            u64::try_from(size).unwrap_or(u64::MAX),
        )
        .file_name(upload.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(mime) = upload.content_type.as_deref() {
            part = part.mime_str(mime)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", upload.folder)
            .text("signature", signature);

        tracing::debug!(
            %url,
            size,
            resource_type,
            algorithm = self.config.signature_algorithm.as_str(),
            "relaying upload to media provider"
        );
        let response = self.client.post(url.clone()).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("media provider returned HTTP {}", status.as_u16()));
            return Err(MediaError::Provider(message));
        }

        serde_json::from_str(&body).map_err(|e| MediaError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError> {
        self.send(upload, chrono::Utc::now().timestamp()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }

    #[test]
    fn signature_is_independent_of_param_order() {
        let a = sign_params(
            &[("timestamp", "1700000000"), ("folder", "x")],
            "s",
            SignatureAlgorithm::Sha1,
        );
        let b = sign_params(
            &[("folder", "x"), ("timestamp", "1700000000")],
            "s",
            SignatureAlgorithm::Sha1,
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn signature_matches_manual_digest() {
        let params = [("folder", "influencerhub/u1"), ("timestamp", "1700000000")];
        let payload = b"folder=influencerhub/u1&timestamp=1700000000secret";

        assert_eq!(
            sign_params(&params, "secret", SignatureAlgorithm::Sha1),
            format!("{:x}", Sha1::digest(payload))
        );
        assert_eq!(
            sign_params(&params, "secret", SignatureAlgorithm::Sha256),
            format!("{:x}", Sha256::digest(payload))
        );
    }

    #[test]
    fn sha1_signature_matches_known_vector() {
        // sha1("abc") from FIPS 180-1.
        assert_eq!(
            sign_params(&[], "abc", SignatureAlgorithm::Sha1),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn upload_url_includes_cloud_and_resource_type() {
        let client = CloudinaryClient::with_base_url(config(), 5, "https://api.cloudinary.com")
            .expect("client construction should not fail");
        assert_eq!(
            client.upload_url("video").expect("url").as_str(),
            "https://api.cloudinary.com/v1_1/demo/video/upload"
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let client = CloudinaryClient::new(config(), 5).expect("client construction");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("[redacted]"));
    }
}
