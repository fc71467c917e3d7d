pub mod app_config;
pub mod catalog;
pub mod config;
pub mod media;
pub mod requests;
pub mod roles;
pub mod seed;

pub use app_config::{AppConfig, Environment, MediaConfig, SignatureAlgorithm};
pub use catalog::{CatalogFilters, CatalogSort, InfluencerStatus, CATALOG_PAGE_SIZE};
pub use config::{load_app_config, load_app_config_from_env};
pub use media::{storage_folder, ResourceType};
pub use requests::{generate_request_codes, RequestStatus, REQUEST_CODE_PREFIX};
pub use roles::{authorize, AccessError, CallerProfile, Role};
pub use seed::{load_seed_influencers, SeedFile, SeedInfluencer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}

/// Errors raised when parsing domain values from their wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("status must be one of new, contacted, negotiating, booked, closed; got '{0}'")]
    InvalidRequestStatus(String),

    #[error("status must be 'active' or 'disabled', got '{0}'")]
    InvalidInfluencerStatus(String),

    #[error("sort must be one of followers_desc, rate_asc, engagement_desc; got '{0}'")]
    InvalidSort(String),

    #[error("too many targets: {requested} requested, at most {max} allowed")]
    TooManyTargets { requested: usize, max: usize },
}
