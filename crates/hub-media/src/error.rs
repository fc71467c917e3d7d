use thiserror::Error;

/// Errors returned by the media relay.
#[derive(Debug, Error)]
pub enum MediaError {
    /// No provider credentials were configured for this deployment.
    #[error("media storage is not configured")]
    NotConfigured,

    /// The provider answered with an error; carries its message verbatim.
    #[error("{0}")]
    Provider(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid media provider URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
