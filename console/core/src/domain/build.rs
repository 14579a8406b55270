// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a container-image build run.
///
/// The build controller owns execution; the console only observes the
/// status field and reacts to terminal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildPhase {
    /// Registered but not yet scheduled
    Pending,

    /// Build pod executing
    Running,

    /// Image pushed, digest available
    Succeeded,

    /// Build ended without an image
    Failed,

    /// Status field absent or unrecognized
    Unknown,
}

impl BuildPhase {
    /// Terminal phases end a watch; everything else keeps polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildPhase::Succeeded | BuildPhase::Failed)
    }
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuildPhase::Pending => "Pending",
            BuildPhase::Running => "Running",
            BuildPhase::Succeeded => "Succeeded",
            BuildPhase::Failed => "Failed",
            BuildPhase::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Observed status of one build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRunStatus {
    /// Current phase
    pub phase: BuildPhase,

    /// Controller-reported reason, present on failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Digest of the pushed image, present once succeeded
    #[serde(rename = "imageDigest", skip_serializing_if = "Option::is_none")]
    pub image_digest: Option<String>,
}

impl BuildRunStatus {
    pub fn pending() -> Self {
        Self {
            phase: BuildPhase::Pending,
            reason: None,
            image_digest: None,
        }
    }
}
