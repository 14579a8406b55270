// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use aegis_console_core::application::deployment::{DeploymentReceipt, DeploymentRequest};
use aegis_console_core::domain::build::BuildRunStatus;
use aegis_console_core::domain::env::ContainerEnvVar;

/// Client for interacting with the AEGIS console.
pub struct ConsoleClient {
    base_url: String,
    client: Client,
    api_key: Option<String>,
}

impl ConsoleClient {
    /// Create a new console client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            api_key: None,
        }
    }

    /// Set the API key for authentication.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }

    /// Preview an env import: the manifest fragment it would produce plus
    /// any warnings, without touching the cluster.
    pub async fn import_preview(&self, content: &str) -> Result<ImportPreview> {
        let url = format!("{}/env/import", self.base_url);

        let response = self
            .authorize(self.client.post(&url))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .context("Console request failed")?;

        if !response.status().is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            anyhow::bail!(
                "Import rejected at {} stage: {}",
                body["stage"].as_str().unwrap_or("unknown"),
                body["error"].as_str().unwrap_or("unknown error")
            );
        }

        let preview = response.json().await.context("Invalid console response")?;
        Ok(preview)
    }

    /// Deploy an agent workload.
    pub async fn deploy_agent(&self, request: &DeploymentRequest) -> Result<DeploymentReceipt> {
        let url = format!("{}/agents", self.base_url);

        let response = self
            .authorize(self.client.post(&url))
            .json(request)
            .send()
            .await
            .context("Console request failed")?
            .error_for_status()
            .context("Deployment rejected")?;

        let receipt = response.json().await.context("Invalid console response")?;
        Ok(receipt)
    }

    /// Get the current status of a build run.
    pub async fn get_build_run(&self, namespace: &str, name: &str) -> Result<BuildRunStatus> {
        let url = format!("{}/builds/{namespace}/{name}", self.base_url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Console request failed")?
            .error_for_status()
            .with_context(|| format!("Build run {namespace}/{name} unavailable"))?;

        let status = response.json().await.context("Invalid console response")?;
        Ok(status)
    }
}

/// Result of an import preview.
#[derive(Debug, Deserialize)]
pub struct ImportPreview {
    /// Manifest-fragment entries the import would produce
    pub env: Vec<ContainerEnvVar>,

    /// Non-blocking warnings for user review
    pub warnings: Vec<String>,
}
