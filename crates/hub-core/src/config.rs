use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment, MediaConfig, SignatureAlgorithm};
use crate::ConfigError;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";
const DEFAULT_FOLDER_TEMPLATE: &str = "influencerhub/{userId}";
const DEFAULT_UPLOAD_MAX_BYTES: &str = "41943040";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset.
    let get = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        get(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        get(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let identity_url = require("SUPABASE_URL")?;
    let identity_service_key = require("SUPABASE_SERVICE_ROLE_KEY")?;

    let env = parse_environment(&or_default("HUB_ENV", "development"));

    let bind_addr = match (get("HUB_BIND_ADDR"), get("PORT")) {
        (Some(raw), _) => raw
            .parse::<SocketAddr>()
            .map_err(|e| invalid("HUB_BIND_ADDR", e.to_string()))?,
        (None, Some(port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| invalid("PORT", e.to_string()))?;
            SocketAddr::from(([0, 0, 0, 0], port))
        }
        (None, None) => SocketAddr::from(([0, 0, 0, 0], 8080)),
    };

    let log_level = or_default("HUB_LOG_LEVEL", "info");

    let media = match (
        get("CLOUDINARY_CLOUD_NAME"),
        get("CLOUDINARY_API_KEY"),
        get("CLOUDINARY_API_SECRET"),
    ) {
        (Some(cloud_name), Some(api_key), Some(api_secret)) => {
            let signature_algorithm = match get("CLOUDINARY_SIGNATURE_ALGORITHM").as_deref() {
                None | Some("sha1") => SignatureAlgorithm::Sha1,
                Some("sha256") => SignatureAlgorithm::Sha256,
                Some(other) => {
                    return Err(invalid(
                        "CLOUDINARY_SIGNATURE_ALGORITHM",
                        format!("expected 'sha1' or 'sha256', got '{other}'"),
                    ))
                }
            };
            Some(MediaConfig {
                cloud_name,
                api_key,
                api_secret,
                signature_algorithm,
            })
        }
        (None, None, None) => None,
        _ => {
            return Err(invalid(
                "CLOUDINARY_CLOUD_NAME",
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together".to_string(),
            ))
        }
    };
    let media_folder_template = or_default("CLOUDINARY_FOLDER", DEFAULT_FOLDER_TEMPLATE);

    let jwt_secret = match get("JWT_SECRET") {
        Some(secret) => secret,
        None if env == Environment::Development => DEV_JWT_SECRET.to_string(),
        None => return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string())),
    };

    let admin_username = get("ADMIN_USERNAME");
    let admin_password = get("ADMIN_PASSWORD");

    let cors_origins = get("CORS_ORIGINS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let seed_path = PathBuf::from(or_default("HUB_SEED_PATH", "./config/influencers.yaml"));

    let db_max_connections = parse_u32("HUB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("HUB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("HUB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let upstream_timeout_secs = parse_u64("HUB_UPSTREAM_TIMEOUT_SECS", "30")?;
    let upload_max_bytes = parse_usize("HUB_UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        identity_url,
        identity_service_key,
        media,
        media_folder_template,
        jwt_secret,
        admin_username,
        admin_password,
        cors_origins,
        seed_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        upstream_timeout_secs,
        upload_max_bytes,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
