// ABOUTME: Server binary wiring configuration, logging and the HTTP router
// ABOUTME: Binds the axum server on the configured port
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # fitgate server binary

use anyhow::Result;
use clap::Parser;
use fitgate::config::ServerConfig;
use fitgate::resources::ServerResources;
use fitgate::store::MemoryStore;
use fitgate::{logging, routes};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "fitgate")]
#[command(about = "Single-account Fitbit OAuth2 gateway with aggregated daily metrics")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("starting fitgate");
    info!("{}", config.summary());

    let store = Arc::new(MemoryStore::new());
    let resources = Arc::new(ServerResources::new(&config, store));

    let app = routes::router(resources).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
