//! Command handlers. Each opens its own pool from the loaded config.

use std::path::Path;

use hub_core::AppConfig;
use hub_db::{HubStore, PgStore};

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = hub_db::PoolConfig::from_app_config(config);
    Ok(hub_db::connect_pool(&config.database_url, pool_config).await?)
}

pub(crate) async fn run_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    hub_db::health_check(&pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    hub_db::run_migrations(&pool).await?;
    tracing::info!("migrations applied");
    println!("migrations applied");
    Ok(())
}

/// Seeds the directory from `path` when it has no influencers yet.
///
/// With `dry_run` the file is parsed and listed but the database is not touched.
pub(crate) async fn run_seed(
    config: &AppConfig,
    path: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let seeds = hub_core::load_seed_influencers(path)?.influencers;

    if dry_run {
        println!("{} seed influencers in {}:", seeds.len(), path.display());
        for seed in &seeds {
            println!(
                "  @{} {} ({}, {})",
                seed.handle, seed.display_name, seed.niche, seed.location
            );
        }
        return Ok(());
    }

    let pool = connect(config).await?;
    hub_db::run_migrations(&pool).await?;
    let inserted = PgStore::new(pool).seed_influencers_if_empty(&seeds).await?;
    if inserted == 0 {
        println!("directory already populated; nothing seeded");
    } else {
        println!("seeded {inserted} influencers");
    }
    Ok(())
}

/// Prints the effective configuration and the optional features it leaves off.
pub(crate) fn run_check_config(config: &AppConfig) -> anyhow::Result<()> {
    println!("{config:#?}");

    for warning in config_warnings(config) {
        tracing::warn!("{warning}");
        println!("warning: {warning}");
    }

    let seeds = hub_core::load_seed_influencers(&config.seed_path)?;
    println!(
        "seed file {} parses ({} influencers)",
        config.seed_path.display(),
        seeds.influencers.len()
    );
    Ok(())
}

pub(crate) fn config_warnings(config: &AppConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if config.media.is_none() {
        warnings.push("media provider not configured; uploads will fail");
    }
    if config.admin_username.is_none() || config.admin_password.is_none() {
        warnings.push("admin credentials not configured; admin login is disabled");
    }
    if config.cors_origins.is_empty() {
        warnings.push("CORS_ORIGINS empty; any origin is allowed");
    }
    warnings
}
