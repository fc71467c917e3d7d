//! Admin session tokens.
//!
//! A fixed username/password pair is exchanged for an HS256 JWT carrying
//! `{role: "admin", scope: "dashboard"}` that stays valid for eight hours.
//! Tokens are verified statelessly; nothing is persisted.

use hub_core::AppConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub const ADMIN_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;
const ADMIN_ROLE: &str = "admin";
const ADMIN_SCOPE: &str = "dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub role: String,
    pub scope: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug)]
pub enum AdminLoginError {
    InvalidCredentials,
    Signing(jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTokenError {
    /// Malformed, badly signed, or expired.
    Invalid,
    /// Well-formed and signed, but not an admin token.
    WrongRole,
}

struct CredentialDigests {
    username: [u8; 32],
    password: [u8; 32],
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

pub struct AdminAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    credentials: Option<CredentialDigests>,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth")
            .field("credentials_configured", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl AdminAuth {
    /// Login is always refused unless both `username` and `password` are set.
    #[must_use]
    pub fn new(secret: &str, username: Option<&str>, password: Option<&str>) -> Self {
        let credentials = match (username, password) {
            (Some(u), Some(p)) => Some(CredentialDigests {
                username: digest(u),
                password: digest(p),
            }),
            _ => None,
        };
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            credentials,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.admin_username.as_deref(),
            config.admin_password.as_deref(),
        )
    }

    /// Checks the credential pair and issues a token valid from now.
    ///
    /// # Errors
    ///
    /// [`AdminLoginError::InvalidCredentials`] on any mismatch, or when no
    /// credentials are configured.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AdminLoginError> {
        let Some(expected) = &self.credentials else {
            tracing::warn!("admin login attempted but no admin credentials are configured");
            return Err(AdminLoginError::InvalidCredentials);
        };

        // Both comparisons always run.
        let username_ok = digest(username)
            .as_slice()
            .ct_eq(expected.username.as_slice());
        let password_ok = digest(password)
            .as_slice()
            .ct_eq(expected.password.as_slice());
        if !bool::from(username_ok & password_ok) {
            return Err(AdminLoginError::InvalidCredentials);
        }

        self.issue_at(chrono::Utc::now().timestamp())
            .map_err(AdminLoginError::Signing)
    }

    fn issue_at(&self, now: i64) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(&AdminClaims {
            role: ADMIN_ROLE.to_string(),
            scope: ADMIN_SCOPE.to_string(),
            iat: now,
            exp: now + ADMIN_TOKEN_TTL_SECS,
        })
    }

    fn sign(&self, claims: &AdminClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    /// # Errors
    ///
    /// [`AdminTokenError::Invalid`] for a bad signature, malformed token or
    /// expired token; [`AdminTokenError::WrongRole`] when the role claim is
    /// not `admin`.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AdminTokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<AdminClaims>(token, &self.decoding, &validation).map_err(|error| {
            tracing::debug!(error = %error, "admin token rejected");
            AdminTokenError::Invalid
        })?;

        if data.claims.role != ADMIN_ROLE {
            return Err(AdminTokenError::WrongRole);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AdminAuth {
        AdminAuth::new("test-secret", Some("admin"), Some("hunter2"))
    }

    #[test]
    fn login_with_correct_credentials_issues_verifiable_token() {
        let auth = auth();
        let token = auth.login("admin", "hunter2").expect("login");
        let claims = auth.verify(&token).expect("verify");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.scope, "dashboard");
        assert_eq!(claims.exp - claims.iat, ADMIN_TOKEN_TTL_SECS);
    }

    #[test]
    fn login_rejects_wrong_password_or_username() {
        let auth = auth();
        assert!(matches!(
            auth.login("admin", "wrong"),
            Err(AdminLoginError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("root", "hunter2"),
            Err(AdminLoginError::InvalidCredentials)
        ));
    }

    #[test]
    fn login_always_fails_without_configured_credentials() {
        let auth = AdminAuth::new("test-secret", Some("admin"), None);
        assert!(matches!(
            auth.login("admin", ""),
            Err(AdminLoginError::InvalidCredentials)
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        let auth = auth();
        let issued = chrono::Utc::now().timestamp() - ADMIN_TOKEN_TTL_SECS - 600;
        let token = auth.issue_at(issued).expect("sign");
        assert_eq!(auth.verify(&token), Err(AdminTokenError::Invalid));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let other = AdminAuth::new("other-secret", None, None);
        let token = other
            .issue_at(chrono::Utc::now().timestamp())
            .expect("sign");
        assert_eq!(auth().verify(&token), Err(AdminTokenError::Invalid));
    }

    #[test]
    fn tampered_role_is_forbidden_not_invalid() {
        let auth = auth();
        let now = chrono::Utc::now().timestamp();
        let token = auth
            .sign(&AdminClaims {
                role: "brand".to_string(),
                scope: ADMIN_SCOPE.to_string(),
                iat: now,
                exp: now + 60,
            })
            .expect("sign");
        assert_eq!(auth.verify(&token), Err(AdminTokenError::WrongRole));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(auth().verify("not.a.jwt"), Err(AdminTokenError::Invalid));
    }

    #[test]
    fn debug_output_hides_keys() {
        let rendered = format!("{:?}", auth());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("test-secret"));
    }
}
