// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use aegis_console_core::infrastructure::cluster::HttpClusterClient;
use aegis_console_core::presentation::api;

/// Run the console API server in front of a cluster gateway.
pub async fn run(
    host: String,
    port: u16,
    gateway_url: String,
    gateway_token: Option<String>,
) -> Result<()> {
    let mut gateway = HttpClusterClient::new(gateway_url.clone());
    if let Some(token) = gateway_token {
        gateway = gateway.with_api_token(token);
    }

    let app = api::app(Arc::new(gateway));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, gateway = %gateway_url, "console API listening");

    axum::serve(listener, app)
        .await
        .context("Console API server exited")?;

    Ok(())
}
