// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Cluster Gateway Client
//!
//! HTTP implementation of [`ResourceRepository`] against the platform's
//! cluster gateway. The gateway fronts the Kubernetes API server; the
//! console never holds cluster credentials itself.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::build::{BuildPhase, BuildRunStatus};
use crate::domain::repository::{ClusterError, ResourceRepository};
use crate::domain::resource::AgentResource;

pub struct HttpClusterClient {
    base_url: String,
    client: Client,
    api_token: Option<String>,
}

impl HttpClusterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            api_token: None,
        }
    }

    /// Set the bearer token for gateway authentication.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }
}

/// Status block as the gateway reports it. The phase is a free-form string
/// owned by the build controller; anything unrecognized maps to
/// [`BuildPhase::Unknown`] instead of failing the read.
#[derive(Debug, Deserialize)]
struct BuildRunStatusWire {
    phase: Option<String>,
    reason: Option<String>,
    #[serde(rename = "imageDigest")]
    image_digest: Option<String>,
}

impl BuildRunStatusWire {
    fn into_status(self) -> BuildRunStatus {
        let phase = match self.phase.as_deref() {
            Some("Pending") => BuildPhase::Pending,
            Some("Running") => BuildPhase::Running,
            Some("Succeeded") => BuildPhase::Succeeded,
            Some("Failed") => BuildPhase::Failed,
            _ => BuildPhase::Unknown,
        };
        BuildRunStatus {
            phase,
            reason: self.reason,
            image_digest: self.image_digest,
        }
    }
}

#[async_trait]
impl ResourceRepository for HttpClusterClient {
    async fn apply_agent(&self, resource: &AgentResource) -> Result<(), ClusterError> {
        let url = format!(
            "{}/apis/agents/{}/{}",
            self.base_url, resource.metadata.namespace, resource.metadata.name
        );

        let response = self
            .authorize(self.client.put(&url).json(resource))
            .send()
            .await
            .map_err(|e| ClusterError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClusterError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn get_build_run(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BuildRunStatus, ClusterError> {
        let url = format!("{}/apis/builds/{namespace}/{name}", self.base_url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ClusterError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ClusterError::BuildRunNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClusterError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let wire: BuildRunStatusWire = response
            .json()
            .await
            .map_err(|e| ClusterError::InvalidResponse(e.to_string()))?;

        Ok(wire.into_status())
    }
}
