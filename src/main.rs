//! Caching Forward Proxy
//!
//! A forwarding HTTP proxy for a single fixed origin, built with Tokio.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                CACHING PROXY                  │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐   ┌────────────┐   ┌─────────┐  │
//!   ───────────────────┼─▶│   net   │──▶│ dispatcher │──▶│ handler │  │
//!                      │  │listener │   │ (limiter + │   │ (parse, │  │
//!                      │  └─────────┘   │  workers)  │   │  cache) │  │
//!                      │                └─────┬──────┘   └────┬────┘  │
//!                      │                      │ 429            │      │
//!                      │                      ▼                ▼      │
//!   Client Response    │                ┌──────────┐    ┌──────────┐  │
//!   ◀──────────────────┼────────────────│ response │◀───│ upstream │◀─┼── Origin
//!                      │                │  writer  │    │  client  │  │   Server
//!                      │                └──────────┘    └──────────┘  │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │          Cross-Cutting Concerns          │ │
//!                      │  │  ┌────────┐ ┌───────┐ ┌───────────────┐ │ │
//!                      │  │  │ config │ │ cache │ │   lifecycle   │ │ │
//!                      │  │  │        │ │janitor│ │startup/signals│ │ │
//!                      │  │  └────────┘ └───────┘ └───────────────┘ │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caching_proxy::cache::{Janitor, ResponseCache};
use caching_proxy::config::{load_config, ProxyConfig};
use caching_proxy::lifecycle::{signals, Shutdown};
use caching_proxy::limiter;
use caching_proxy::net::Listener;
use caching_proxy::proxy::{Dispatcher, RequestHandler};
use caching_proxy::upstream::UpstreamClient;

#[derive(Parser)]
#[command(name = "caching-proxy")]
#[command(about = "Caching forward proxy with pluggable rate limiting", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caching_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("caching-proxy v0.1.0 starting");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        workers = config.listener.workers,
        origin = %config.upstream.origin,
        cache_capacity = config.cache.capacity,
        cache_ttl_secs = config.cache.ttl_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let cache = Arc::new(ResponseCache::new(
        config.cache.capacity,
        Duration::from_secs(config.cache.ttl_secs),
    ));
    let limiter = limiter::from_config(&config.rate_limit);
    let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);
    let handler = Arc::new(RequestHandler::new(cache.clone(), upstream));

    let janitor = Janitor::new(cache, Duration::from_secs(config.cache.sweep_interval_secs));
    tokio::spawn(janitor.run(shutdown.subscribe()));

    // Listener starts last: traffic only when everything is ready.
    let listener = Listener::bind(&config.listener).await?;

    let dispatcher = Dispatcher::new(
        limiter,
        handler,
        config.listener.workers,
        Duration::from_secs(config.listener.shutdown_grace_secs),
    );
    let dispatcher_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::watch_signals(&shutdown).await;
    });

    dispatcher.run(listener, dispatcher_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
