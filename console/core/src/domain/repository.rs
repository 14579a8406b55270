// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::build::BuildRunStatus;
use crate::domain::resource::AgentResource;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Cluster gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Build run {namespace}/{name} not found")]
    BuildRunNotFound { namespace: String, name: String },

    #[error("Failed to reach cluster gateway: {0}")]
    Network(String),

    #[error("Invalid response from cluster gateway: {0}")]
    InvalidResponse(String),
}

/// Boundary to the cluster gateway.
///
/// The console mutates cluster state only through this trait, and only
/// after normalization has completed. Implementations live in the
/// infrastructure layer; tests substitute in-memory doubles.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Create or update an agent workload resource.
    async fn apply_agent(&self, resource: &AgentResource) -> Result<(), ClusterError>;

    /// Read the current status of a build run.
    async fn get_build_run(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BuildRunStatus, ClusterError>;
}
