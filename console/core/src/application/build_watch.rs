// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Build Watch Application Service
//!
//! Polls a build run's status through its phases and finalizes a
//! successful build by triggering the follow-up deployment. The build
//! controller executes the build; this service only observes and reacts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::deployment::{DeploymentReceipt, DeploymentRequest, DeploymentService};
use crate::domain::build::{BuildPhase, BuildRunStatus};
use crate::domain::repository::{ClusterError, ResourceRepository};

#[derive(Debug, Clone)]
pub struct BuildWatchConfig {
    /// Delay between status polls
    pub interval: Duration,

    /// Polls before the watch gives up
    pub max_attempts: u32,
}

impl Default for BuildWatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 150,
        }
    }
}

/// One observed phase transition, streamed to SSE or CLI consumers.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPhaseEvent {
    pub namespace: String,
    pub name: String,
    pub phase: BuildPhase,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub attempt: u32,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum BuildWatchError {
    #[error("Build {namespace}/{name} failed: {reason}")]
    BuildFailed {
        namespace: String,
        name: String,
        reason: String,
    },

    #[error("Timed out waiting for build {namespace}/{name} after {attempts} attempts")]
    TimedOut {
        namespace: String,
        name: String,
        attempts: u32,
    },

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Build watcher (Application layer)
pub struct BuildWatcher {
    repository: Arc<dyn ResourceRepository>,
    config: BuildWatchConfig,
}

impl BuildWatcher {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self {
            repository,
            config: BuildWatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuildWatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Poll until the build reaches a terminal phase, emitting each phase
    /// transition on `events`. A dropped receiver stops nothing: the watch
    /// continues so finalization still happens.
    pub async fn watch(
        &self,
        namespace: &str,
        name: &str,
        events: mpsc::Sender<BuildPhaseEvent>,
    ) -> Result<BuildRunStatus, BuildWatchError> {
        let mut last_phase: Option<BuildPhase> = None;

        for attempt in 1..=self.config.max_attempts {
            let status = self.repository.get_build_run(namespace, name).await?;

            if last_phase != Some(status.phase) {
                last_phase = Some(status.phase);
                debug!(%namespace, %name, phase = %status.phase, attempt, "build phase transition");
                let event = BuildPhaseEvent {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    phase: status.phase,
                    reason: status.reason.clone(),
                    attempt,
                    observed_at: Utc::now(),
                };
                let _ = events.send(event).await;
            }

            match status.phase {
                BuildPhase::Succeeded => {
                    counter!("console_builds_watched_total", "outcome" => "succeeded").increment(1);
                    return Ok(status);
                }
                BuildPhase::Failed => {
                    counter!("console_builds_watched_total", "outcome" => "failed").increment(1);
                    return Err(BuildWatchError::BuildFailed {
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                        reason: status
                            .reason
                            .unwrap_or_else(|| "no reason reported".to_string()),
                    });
                }
                _ => {}
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        warn!(%namespace, %name, attempts = self.config.max_attempts, "build watch timed out");
        counter!("console_builds_watched_total", "outcome" => "timeout").increment(1);
        Err(BuildWatchError::TimedOut {
            namespace: namespace.to_string(),
            name: name.to_string(),
            attempts: self.config.max_attempts,
        })
    }

    /// Watch the build and, once it succeeds, submit the prepared
    /// deployment. The request was assembled before the watch started, so
    /// a successful build deploys without further input.
    pub async fn watch_and_finalize(
        &self,
        namespace: &str,
        name: &str,
        events: mpsc::Sender<BuildPhaseEvent>,
        deployments: &DeploymentService,
        request: DeploymentRequest,
    ) -> Result<DeploymentReceipt> {
        let status = self
            .watch(namespace, name, events)
            .await
            .with_context(|| format!("Build {namespace}/{name} did not complete"))?;

        info!(
            %namespace,
            %name,
            digest = status.image_digest.as_deref().unwrap_or("unknown"),
            "build succeeded, triggering deployment"
        );

        deployments
            .deploy(request)
            .await
            .context("Build succeeded but follow-up deployment failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_bounds_the_watch() {
        let config = BuildWatchConfig::default();
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.max_attempts, 150);
    }

    #[test]
    fn test_phase_event_serializes_for_sse() {
        let event = BuildPhaseEvent {
            namespace: "team-a".to_string(),
            name: "build-1".to_string(),
            phase: BuildPhase::Running,
            reason: None,
            attempt: 3,
            observed_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "Running");
        assert_eq!(json["attempt"], 3);
        assert!(json.get("reason").is_none());
    }
}
