//! Caller roles and the role gate.
//!
//! The gate runs strictly after identity resolution: a caller reaches it with
//! an optional profile and is admitted only if that profile carries one of the
//! required roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Brand,
    Influencer,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Brand => "brand",
            Role::Influencer => "influencer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand" => Ok(Role::Brand),
            "influencer" => Ok(Role::Influencer),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::UnknownRole(other.to_owned())),
        }
    }
}

/// Role/status profile loaded for an identified caller.
///
/// `role` is `None` when the stored value is missing or not a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerProfile {
    pub role: Option<Role>,
    pub status: Option<String>,
}

impl CallerProfile {
    /// Builds a profile from raw stored values, dropping unknown roles.
    #[must_use]
    pub fn from_stored(role: Option<&str>, status: Option<String>) -> Self {
        Self {
            role: role.and_then(|r| r.parse().ok()),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("no profile for caller")]
    MissingProfile,
    #[error("caller has no role")]
    MissingRole,
    #[error("role {actual} not permitted; requires one of {required:?}")]
    RoleNotPermitted { actual: Role, required: Vec<Role> },
}

/// Admits a caller whose profile role is one of `required`.
///
/// Never admits a missing profile or a missing role, whatever `required` holds.
///
/// # Errors
///
/// Returns [`AccessError`] describing why the caller was refused.
pub fn authorize(profile: Option<&CallerProfile>, required: &[Role]) -> Result<Role, AccessError> {
    let profile = profile.ok_or(AccessError::MissingProfile)?;
    let role = profile.role.ok_or(AccessError::MissingRole)?;
    if required.contains(&role) {
        Ok(role)
    } else {
        Err(AccessError::RoleNotPermitted {
            actual: role,
            required: required.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Option<Role>) -> CallerProfile {
        CallerProfile {
            role,
            status: Some("active".to_string()),
        }
    }

    #[test]
    fn admits_matching_role() {
        let p = profile(Some(Role::Brand));
        assert_eq!(authorize(Some(&p), &[Role::Brand]), Ok(Role::Brand));
    }

    #[test]
    fn admits_any_role_in_set() {
        let p = profile(Some(Role::Influencer));
        assert_eq!(
            authorize(Some(&p), &[Role::Brand, Role::Influencer]),
            Ok(Role::Influencer)
        );
    }

    #[test]
    fn refuses_other_role() {
        let p = profile(Some(Role::Influencer));
        assert!(matches!(
            authorize(Some(&p), &[Role::Brand]),
            Err(AccessError::RoleNotPermitted {
                actual: Role::Influencer,
                ..
            })
        ));
    }

    #[test]
    fn refuses_missing_profile_even_for_admin_routes() {
        assert_eq!(
            authorize(None, &[Role::Admin]),
            Err(AccessError::MissingProfile)
        );
    }

    #[test]
    fn refuses_null_role() {
        let p = profile(None);
        assert_eq!(
            authorize(Some(&p), &[Role::Brand, Role::Influencer, Role::Admin]),
            Err(AccessError::MissingRole)
        );
    }

    #[test]
    fn refuses_everything_with_empty_requirement() {
        let p = profile(Some(Role::Admin));
        assert!(authorize(Some(&p), &[]).is_err());
    }

    #[test]
    fn unknown_stored_role_becomes_none() {
        let p = CallerProfile::from_stored(Some("superuser"), None);
        assert_eq!(p.role, None);
        let p = CallerProfile::from_stored(Some("brand"), None);
        assert_eq!(p.role, Some(Role::Brand));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Brand, Role::Influencer, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }
}
