// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::env::ContainerEnvVar;
use crate::domain::repository::ResourceRepository;
use crate::domain::resource::{
    AgentResource, AgentWorkloadSpec, ResourceMetadata, API_VERSION, KIND_AGENT,
};

/// What the caller asks to deploy. The env fragment arrives already
/// normalized and is embedded into the workload spec verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Agent name (DNS label)
    pub name: String,

    /// Target namespace
    pub namespace: String,

    /// Container image reference
    pub image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Container env fragment, embedded verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<ContainerEnvVar>,
}

/// Record of one accepted deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReceipt {
    pub deployment_id: Uuid,
    pub resource: AgentResource,
    pub deployed_at: DateTime<Utc>,
}

/// Deployment application service: assembles the workload resource and
/// applies it through the cluster repository. Cluster state is mutated
/// only here, after env normalization has already completed.
pub struct DeploymentService {
    repository: Arc<dyn ResourceRepository>,
}

impl DeploymentService {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    pub async fn deploy(&self, request: DeploymentRequest) -> Result<DeploymentReceipt> {
        let resource = AgentResource {
            api_version: API_VERSION.to_string(),
            kind: KIND_AGENT.to_string(),
            metadata: ResourceMetadata {
                name: request.name,
                namespace: request.namespace,
                description: request.description,
                labels: request.labels,
            },
            spec: AgentWorkloadSpec {
                image: request.image,
                protocol: request.protocol,
                env: request.env,
            },
        };

        resource
            .validate()
            .map_err(|e| anyhow!("Manifest validation failed: {}", e))?;

        self.repository
            .apply_agent(&resource)
            .await
            .with_context(|| {
                format!(
                    "Failed to apply agent {}/{}",
                    resource.metadata.namespace, resource.metadata.name
                )
            })?;

        info!(
            agent = %resource.metadata.name,
            namespace = %resource.metadata.namespace,
            env_vars = resource.spec.env.len(),
            "agent deployed"
        );
        counter!("console_agent_deployments_total").increment(1);

        Ok(DeploymentReceipt {
            deployment_id: Uuid::new_v4(),
            resource,
            deployed_at: Utc::now(),
        })
    }
}
