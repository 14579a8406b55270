// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::env::ContainerEnvVar;

/// API group/version accepted for console-managed resources
pub const API_VERSION: &str = "100monkeys.ai/v1";

/// Resource kind for agent workloads
pub const KIND_AGENT: &str = "Agent";

/// Kubernetes-style Agent workload resource (v1.0)
///
/// The console assembles this manifest from a deployment request plus the
/// normalized environment fragment and submits it to the cluster gateway.
/// The gateway's operator owns reconciliation; nothing here talks to the
/// cluster directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentResource {
    /// API version (must be "100monkeys.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "Agent")
    pub kind: String,

    /// Kubernetes-style metadata
    pub metadata: ResourceMetadata,

    /// Workload specification
    pub spec: AgentWorkloadSpec,
}

/// Kubernetes-style metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceMetadata {
    /// Unique resource name (DNS label format)
    pub name: String,

    /// Target namespace
    pub namespace: String,

    /// Optional human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional labels for categorization
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// Workload specification (the main configuration)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentWorkloadSpec {
    /// Container image reference
    pub image: String,

    /// Protocol the workload speaks (e.g. "a2a", "mcp")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Container environment, embedded verbatim from the import fragment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<ContainerEnvVar>,
}

impl AgentResource {
    /// Validate manifest-level invariants before submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_version != API_VERSION {
            return Err(format!(
                "Invalid apiVersion '{}', expected '{}'",
                self.api_version, API_VERSION
            ));
        }
        if self.kind != KIND_AGENT {
            return Err(format!(
                "Invalid kind '{}', expected '{}'",
                self.kind, KIND_AGENT
            ));
        }
        if !is_dns_label(&self.metadata.name) {
            return Err(format!(
                "Invalid metadata.name '{}': must be a DNS label (lowercase alphanumeric or '-', \
                 starting and ending with an alphanumeric, at most 63 characters)",
                self.metadata.name
            ));
        }
        if !is_dns_label(&self.metadata.namespace) {
            return Err(format!(
                "Invalid metadata.namespace '{}': must be a DNS label",
                self.metadata.namespace
            ));
        }
        if self.spec.image.is_empty() {
            return Err("spec.image must not be empty".to_string());
        }
        for entry in &self.spec.env {
            if entry.name.is_empty() {
                return Err("spec.env entries must have a non-empty name".to_string());
            }
            if entry.value.is_some() == entry.value_from.is_some() {
                return Err(format!(
                    "spec.env entry '{}' must set exactly one of value/valueFrom",
                    entry.name
                ));
            }
        }
        Ok(())
    }
}

/// RFC 1123 DNS label check, as the Kubernetes API applies to metadata.name.
fn is_dns_label(s: &str) -> bool {
    if s.is_empty() || s.len() > 63 {
        return false;
    }
    let bytes = s.as_bytes();
    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    alnum(bytes[0])
        && alnum(bytes[bytes.len() - 1])
        && bytes.iter().all(|&b| alnum(b) || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::env::{EnvVarSource, KeySelectorRef};

    fn minimal_resource() -> AgentResource {
        AgentResource {
            api_version: API_VERSION.to_string(),
            kind: KIND_AGENT.to_string(),
            metadata: ResourceMetadata {
                name: "weather-agent".to_string(),
                namespace: "team-a".to_string(),
                description: None,
                labels: HashMap::new(),
            },
            spec: AgentWorkloadSpec {
                image: "ghcr.io/acme/weather:1.2.0".to_string(),
                protocol: Some("a2a".to_string()),
                env: vec![],
            },
        }
    }

    #[test]
    fn test_validate_minimal_resource() {
        assert!(minimal_resource().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_api_version() {
        let mut resource = minimal_resource();
        resource.api_version = "acme.io/v2".to_string();
        let err = resource.validate().unwrap_err();
        assert!(err.contains("Invalid apiVersion"));
    }

    #[test]
    fn test_validate_rejects_wrong_kind() {
        let mut resource = minimal_resource();
        resource.kind = "Deployment".to_string();
        assert!(resource.validate().unwrap_err().contains("Invalid kind"));
    }

    #[test]
    fn test_validate_rejects_uppercase_name() {
        let mut resource = minimal_resource();
        resource.metadata.name = "Weather-Agent".to_string();
        assert!(resource
            .validate()
            .unwrap_err()
            .contains("Invalid metadata.name"));
    }

    #[test]
    fn test_validate_rejects_env_with_both_sources() {
        let mut resource = minimal_resource();
        resource.spec.env.push(ContainerEnvVar {
            name: "KEY".to_string(),
            value: Some("x".to_string()),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(KeySelectorRef {
                    name: "s1".to_string(),
                    key: "k1".to_string(),
                }),
                config_map_key_ref: None,
            }),
        });
        assert!(resource
            .validate()
            .unwrap_err()
            .contains("exactly one of value/valueFrom"));
    }

    #[test]
    fn test_dns_label_edges() {
        assert!(is_dns_label("a"));
        assert!(is_dns_label("agent-1"));
        assert!(!is_dns_label(""));
        assert!(!is_dns_label("-agent"));
        assert!(!is_dns_label("agent-"));
        assert!(!is_dns_label(&"a".repeat(64)));
    }

    #[test]
    fn test_serializes_k8s_field_names() {
        let json = serde_json::to_value(minimal_resource()).unwrap();
        assert_eq!(json["apiVersion"], API_VERSION);
        assert_eq!(json["kind"], "Agent");
        assert_eq!(json["metadata"]["name"], "weather-agent");
    }
}
