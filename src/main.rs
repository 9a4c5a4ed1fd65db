//! Achievement board: serves one game's achievements ranked by global
//! unlock rate.
//!
//! Single-binary Tokio application that:
//! 1. Fetches the achievement schema and global percentages from Steam
//! 2. Merges and ranks them
//! 3. Caches the ranked list for a fixed TTL
//! 4. Serves it at `/api/achievements`, plus the static front end

mod config;
mod server;

use std::{io::Write, net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use leaderboard::{new_shared_cache, AchievementService, SteamSource};
use tracing::{error, info, warn};

/// Achievement board server
#[derive(Parser)]
#[command(name = "achievement-board", about = "Ranked Steam achievements server")]
struct Cli {
    /// Config file to load instead of ./config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single refresh, print the JSON, and exit.
    #[arg(long)]
    once: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "achievement_board=info,steam_client=info,leaderboard=info,tower_http=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "App {} ({}), cache TTL {}s, upstream timeout {}s",
        cfg.steam.app_id, cfg.steam.language, cfg.cache.ttl_secs, cfg.steam.timeout_secs
    );
    if cfg.api_key().is_none() {
        warn!("STEAM_API_KEY is not set; achievement refreshes will fail until it is");
    }

    let source = Arc::new(SteamSource::from_config(&cfg));
    let service = AchievementService::new(source, new_shared_cache(), cfg.cache_ttl());

    if cli.once {
        let rendered = service
            .refresh()
            .await
            .and_then(|list| server::render_json(&list));
        match rendered {
            Ok(body) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = stdout.write_all(&body).and_then(|_| stdout.flush()) {
                    error!("Failed to write output: {}", e);
                    std::process::exit(1);
                }
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let app = server::router(service, &cfg.static_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
    info!("Achievement board stopped");
}
