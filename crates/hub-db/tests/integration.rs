//! Offline tests for hub-db pool configuration and request payloads.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use hub_core::{AppConfig, Environment};
use hub_db::{CampaignDetails, InfluencerProfileInput, PoolConfig};
use rust_decimal::Decimal;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080),
        log_level: "info".to_string(),
        identity_url: "https://identity.example".to_string(),
        identity_service_key: "service-key".to_string(),
        media: None,
        media_folder_template: "influencerhub/{userId}".to_string(),
        jwt_secret: "secret".to_string(),
        admin_username: None,
        admin_password: None,
        cors_origins: Vec::new(),
        seed_path: PathBuf::from("./config/influencers.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        upstream_timeout_secs: 30,
        upload_max_bytes: 1024,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn campaign_budget_accepts_json_number() {
    let details: CampaignDetails = serde_json::from_str(
        r#"{"campaignName":"Launch","budget":2500,"message":"Hi","channel":"tiktok"}"#,
    )
    .expect("deserialize");

    assert_eq!(details.budget, Some(Decimal::new(2500, 0)));
    assert_eq!(details.channel.as_deref(), Some("tiktok"));
    assert!(details.deadline.is_none());
}

#[test]
fn campaign_rejects_malformed_deadline() {
    let result: Result<CampaignDetails, _> =
        serde_json::from_str(r#"{"deadline":"next tuesday"}"#);
    assert!(result.is_err());
}

#[test]
fn profile_input_reads_snake_case_fields() {
    let input: InfluencerProfileInput = serde_json::from_str(
        r#"{"handle":"rio","display_name":"Rio","engagement_rate":"3.10",
            "rate_min":200,"rate_max":800,"content_types":["Reels"]}"#,
    )
    .expect("deserialize");

    assert_eq!(input.engagement_rate, Some(Decimal::new(310, 2)));
    assert_eq!(input.rate_min, Some(200));
    assert_eq!(input.rate_max, Some(800));
    assert_eq!(input.content_types, Some(vec!["Reels".to_string()]));
    assert!(input.platforms.is_none());
}
