use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use stock_api::{
    api::{AppState, create_router},
    cache::{InMemoryCache, spawn_purge_task},
    config,
    models::daily::DailyAggregate,
    providers::yahoo_rest::YahooFinanceProvider,
    service::Aggregator,
    telemetry,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(version, about = "Daily stock aggregates HTTP API")]
struct Cli {
    /// Path to the config file (stock_api.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file and STOCK_API_BIND_ADDR
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    telemetry::init(&config.logging)?;

    let provider =
        YahooFinanceProvider::new(&config.yahoo_finance).context("build Yahoo Finance provider")?;
    let shutdown = CancellationToken::new();

    let cache = Arc::new(InMemoryCache::<Vec<DailyAggregate>>::new());
    let purge = spawn_purge_task(cache.clone(), config.cache.ttl(), shutdown.clone());

    let state = AppState {
        source: Arc::new(Aggregator::new(provider)),
        cache,
        cache_ttl: config.cache.ttl(),
        shutdown: shutdown.clone(),
    };

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Starting stock API");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("Shutdown signal received"),
                    Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
                }
                shutdown.cancel();
            }
        })
        .await
        .context("serve HTTP")?;

    shutdown.cancel();
    purge.await.context("cache purge task")?;

    info!("Stock API stopped");
    Ok(())
}
