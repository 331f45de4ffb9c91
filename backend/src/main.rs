//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::assets::FsReportAssets;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::settings::ServerSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let assets_dir = settings.assets_dir();
    let assets = FsReportAssets::open(&assets_dir).map_err(|e| {
        std::io::Error::other(format!(
            "failed to open assets directory {}: {e}",
            assets_dir.display()
        ))
    })?;

    let mut config = ServerConfig::new(settings.bind_addr(), assets, settings.max_design_bytes());
    if let Some(database_url) = settings.database_url() {
        run_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
