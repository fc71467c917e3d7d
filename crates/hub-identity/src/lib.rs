//! Bearer-token verification against the hosted identity provider.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

pub use client::IdentityClient;
pub use error::IdentityError;

/// The identity a verified token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Resolves bearer tokens to identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the token cannot be resolved for any reason.
    async fn verify(&self, token: &str) -> Result<IdentityUser, IdentityError>;
}
