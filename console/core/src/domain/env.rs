// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Environment Variable Domain
//!
//! Canonical representation of container environment variables as imported
//! from `.env`-formatted text. A variable is either a literal string or a
//! pointer into a Kubernetes Secret/ConfigMap; the tagged [`EnvValue`] union
//! makes the "exactly one of `value`/`valueFrom`" invariant unrepresentable
//! to violate.
//!
//! | Type | Description |
//! |------|-------------|
//! | `EnvVar` | Name plus exactly one value source |
//! | `EnvValue` | `Literal` \| `SecretKeyRef` \| `ConfigMapKeyRef` |
//! | `KeySelector` | `{name, key}` pointer into a Secret/ConfigMap |
//! | `ContainerEnvVar` | Wire shape embedded into workload manifests |
//! | `ImportResult` | Ordered variables + non-fatal, line-tagged warnings |
//!
//! The referenced Secret/ConfigMap must exist in the target namespace at
//! deploy time; this domain only carries the reference and never checks
//! existence.

use serde::{Deserialize, Serialize};

/// Pointer into a Kubernetes Secret or ConfigMap: the object name and the
/// key within its data map. Both fields are required and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySelector {
    /// Name of the referenced Secret/ConfigMap object
    pub name: String,

    /// Key within the referenced object's data
    pub key: String,
}

impl KeySelector {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }

    /// A selector is usable only when both fields are present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.key.is_empty()
    }
}

/// The value side of an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvValue {
    /// Plain string value
    Literal(String),

    /// Injected from a Secret key at container start
    SecretKeyRef(KeySelector),

    /// Injected from a ConfigMap key at container start
    ConfigMapKeyRef(KeySelector),
}

impl EnvValue {
    pub fn is_reference(&self) -> bool {
        !matches!(self, EnvValue::Literal(_))
    }
}

/// One canonical environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name, non-empty, unique within a deployment's list
    pub name: String,

    /// Exactly one value source
    pub value: EnvValue,
}

impl EnvVar {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: EnvValue::Literal(value.into()),
        }
    }

    pub fn secret_ref(name: impl Into<String>, selector: KeySelector) -> Self {
        Self {
            name: name.into(),
            value: EnvValue::SecretKeyRef(selector),
        }
    }

    pub fn config_map_ref(name: impl Into<String>, selector: KeySelector) -> Self {
        Self {
            name: name.into(),
            value: EnvValue::ConfigMapKeyRef(selector),
        }
    }
}

/// Insert `var` into `vars` honoring the duplicate-key policy: a later
/// occurrence overwrites the value of an earlier one, and the entry keeps
/// the list position of the first occurrence.
pub fn merge_env_var(vars: &mut Vec<EnvVar>, var: EnvVar) {
    match vars.iter_mut().find(|existing| existing.name == var.name) {
        Some(existing) => existing.value = var.value,
        None => vars.push(var),
    }
}

/// Outcome of one import operation: the ordered best-effort variable list
/// plus zero or more `"Line <n>: <message>"` warnings. Transient state
/// handed to the manifest builder or back to a UI preview; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Variables in input order (first-occurrence position on duplicates)
    pub env_vars: Vec<EnvVar>,

    /// Non-fatal, line-tagged warnings collected during parsing
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

// ============================================================================
// Wire shape (Kubernetes container `env:` entries)
// ============================================================================

/// Selector as it appears on the wire under `secretKeyRef`/`configMapKeyRef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySelectorRef {
    /// Referenced object name
    pub name: String,

    /// Key within the referenced object
    pub key: String,
}

/// The `valueFrom` side of a wire env entry. Exactly one selector is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarSource {
    #[serde(rename = "secretKeyRef", skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<KeySelectorRef>,

    #[serde(rename = "configMapKeyRef", skip_serializing_if = "Option::is_none")]
    pub config_map_key_ref: Option<KeySelectorRef>,
}

/// One entry of a container `env:` list as submitted to the cluster.
///
/// Exactly one of `value`/`value_from` is set; the manifest builder is the
/// only producer and upholds this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEnvVar {
    /// Variable name
    pub name: String,

    /// Literal value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Secret/ConfigMap reference
    #[serde(rename = "valueFrom", skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_completeness() {
        assert!(KeySelector::new("s1", "k1").is_complete());
        assert!(!KeySelector::new("", "k1").is_complete());
        assert!(!KeySelector::new("s1", "").is_complete());
    }

    #[test]
    fn test_merge_keeps_first_position_last_value() {
        let mut vars = vec![
            EnvVar::literal("PORT", "8000"),
            EnvVar::literal("HOST", "0.0.0.0"),
        ];
        merge_env_var(&mut vars, EnvVar::literal("PORT", "9000"));

        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "PORT");
        assert_eq!(vars[0].value, EnvValue::Literal("9000".to_string()));
        assert_eq!(vars[1].name, "HOST");
    }

    #[test]
    fn test_merge_can_replace_literal_with_reference() {
        let mut vars = vec![EnvVar::literal("TOKEN", "plaintext")];
        merge_env_var(
            &mut vars,
            EnvVar::secret_ref("TOKEN", KeySelector::new("s1", "k1")),
        );

        assert_eq!(vars.len(), 1);
        assert!(vars[0].value.is_reference());
    }

    #[test]
    fn test_container_env_var_serializes_camel_case() {
        let entry = ContainerEnvVar {
            name: "API_KEY".to_string(),
            value: None,
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(KeySelectorRef {
                    name: "openai-secret".to_string(),
                    key: "apikey".to_string(),
                }),
                config_map_key_ref: None,
            }),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "API_KEY",
                "valueFrom": {"secretKeyRef": {"name": "openai-secret", "key": "apikey"}}
            })
        );
    }

    #[test]
    fn test_literal_omits_value_from_on_wire() {
        let entry = ContainerEnvVar {
            name: "PORT".to_string(),
            value: Some("8000".to_string()),
            value_from: None,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"name": "PORT", "value": "8000"}));
    }
}
