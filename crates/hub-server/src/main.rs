mod api;
mod auth;
mod error;
mod extract;
mod middleware;

use std::sync::Arc;

use hub_core::AppConfig;
use hub_db::{HubStore, PgStore};
use hub_identity::IdentityClient;
use hub_media::{CloudinaryClient, MediaStore, UnconfiguredMedia};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState, HttpSettings},
    auth::AdminAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(hub_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = hub_db::PoolConfig::from_app_config(&config);
    let pool = hub_db::connect_pool(&config.database_url, pool_config).await?;
    hub_db::run_migrations(&pool).await?;

    let store = PgStore::new(pool);
    seed_directory(&store, &config).await;

    let identity = IdentityClient::new(
        &config.identity_url,
        &config.identity_service_key,
        config.upstream_timeout_secs,
    )?;

    let state = AppState {
        store: Arc::new(store),
        identity: Arc::new(identity),
        media: build_media_store(&config)?,
        admin: Arc::new(AdminAuth::from_config(&config)),
        settings: Arc::new(HttpSettings::from_config(&config)),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "influencerhub listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_media_store(config: &AppConfig) -> anyhow::Result<Arc<dyn MediaStore>> {
    match &config.media {
        Some(media) => Ok(Arc::new(CloudinaryClient::new(
            media.clone(),
            config.upstream_timeout_secs,
        )?)),
        None => {
            tracing::warn!("CLOUDINARY_* not set; media uploads will fail");
            Ok(Arc::new(UnconfiguredMedia))
        }
    }
}

/// Inserts the demo directory when it is empty. Never fatal.
async fn seed_directory(store: &PgStore, config: &AppConfig) {
    let seeds = match hub_core::load_seed_influencers(&config.seed_path) {
        Ok(file) => file.influencers,
        Err(e) => {
            tracing::warn!(error = %e, path = %config.seed_path.display(), "seed skipped");
            return;
        }
    };

    match store.seed_influencers_if_empty(&seeds).await {
        Ok(0) => tracing::info!("seed check complete; directory already populated"),
        Ok(count) => tracing::info!(count, "seeded demo influencers"),
        Err(e) => tracing::warn!(error = %e, "seed skipped"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
