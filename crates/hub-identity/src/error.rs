use thiserror::Error;

/// Errors returned while resolving a bearer token to an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the token (401/403 or an equivalent 4xx).
    #[error("token rejected by identity provider (HTTP {status})")]
    Rejected { status: u16 },

    /// Network or TLS failure, timeout, or a 5xx from the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into a user record.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid identity provider URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
