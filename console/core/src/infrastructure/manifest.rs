// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Manifest Fragment Builder
//!
//! Renders normalized environment variables into the container `env:`
//! section of a workload specification.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Domain objects → external manifest schema
//!
//! Emission order matches the input sequence; no sorting or deduplication
//! happens here, and no I/O. Whether a referenced Secret/ConfigMap exists
//! is a cluster concern surfaced when the workload starts, not checked
//! here.

use crate::domain::env::{ContainerEnvVar, EnvValue, EnvVar, EnvVarSource, KeySelector, KeySelectorRef};

pub struct ManifestFragmentBuilder;

impl ManifestFragmentBuilder {
    /// Convert a normalized variable list into wire-shaped env entries.
    pub fn build(env_vars: &[EnvVar]) -> Vec<ContainerEnvVar> {
        env_vars.iter().map(Self::build_entry).collect()
    }

    /// Render the fragment as the JSON array embedded into a container
    /// specification (and shown in UI previews).
    pub fn to_json(env_vars: &[EnvVar]) -> serde_json::Value {
        // Infallible: ContainerEnvVar contains only strings.
        serde_json::to_value(Self::build(env_vars)).unwrap_or_default()
    }

    fn build_entry(var: &EnvVar) -> ContainerEnvVar {
        let (value, value_from) = match &var.value {
            EnvValue::Literal(literal) => (Some(literal.clone()), None),
            EnvValue::SecretKeyRef(selector) => (
                None,
                Some(EnvVarSource {
                    secret_key_ref: Some(selector_ref(selector)),
                    config_map_key_ref: None,
                }),
            ),
            EnvValue::ConfigMapKeyRef(selector) => (
                None,
                Some(EnvVarSource {
                    secret_key_ref: None,
                    config_map_key_ref: Some(selector_ref(selector)),
                }),
            ),
        };

        ContainerEnvVar {
            name: var.name.clone(),
            value,
            value_from,
        }
    }
}

fn selector_ref(selector: &KeySelector) -> KeySelectorRef {
    KeySelectorRef {
        name: selector.name.clone(),
        key: selector.key.clone(),
    }
}

/// Overlay `overlay` onto `base` with the same duplicate policy the parser
/// applies: matching names take the overlay value in place, new names are
/// appended in overlay order.
pub fn merge_fragment(base: &mut Vec<ContainerEnvVar>, overlay: Vec<ContainerEnvVar>) {
    for entry in overlay {
        match base.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => {
                existing.value = entry.value;
                existing.value_from = entry.value_from;
            }
            None => base.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vars() -> Vec<EnvVar> {
        vec![
            EnvVar::literal("PORT", "8000"),
            EnvVar::secret_ref("OPENAI_API_KEY", KeySelector::new("openai-secret", "apikey")),
            EnvVar::config_map_ref("DB_HOST", KeySelector::new("db-config", "host")),
        ]
    }

    #[test]
    fn test_fragment_preserves_length_and_order() {
        let fragment = ManifestFragmentBuilder::build(&sample_vars());
        assert_eq!(fragment.len(), 3);
        assert_eq!(fragment[0].name, "PORT");
        assert_eq!(fragment[1].name, "OPENAI_API_KEY");
        assert_eq!(fragment[2].name, "DB_HOST");
    }

    #[test]
    fn test_each_entry_has_exactly_one_source() {
        for entry in ManifestFragmentBuilder::build(&sample_vars()) {
            assert_ne!(
                entry.value.is_some(),
                entry.value_from.is_some(),
                "entry '{}' must set exactly one of value/valueFrom",
                entry.name
            );
        }
    }

    #[test]
    fn test_json_shape_matches_kubernetes_env() {
        let json = ManifestFragmentBuilder::to_json(&sample_vars());
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "PORT", "value": "8000"},
                {"name": "OPENAI_API_KEY",
                 "valueFrom": {"secretKeyRef": {"name": "openai-secret", "key": "apikey"}}},
                {"name": "DB_HOST",
                 "valueFrom": {"configMapKeyRef": {"name": "db-config", "key": "host"}}}
            ])
        );
    }

    #[test]
    fn test_merge_fragment_overlays_in_place() {
        let mut base = ManifestFragmentBuilder::build(&[
            EnvVar::literal("PORT", "8000"),
            EnvVar::literal("HOST", "0.0.0.0"),
        ]);
        let overlay = ManifestFragmentBuilder::build(&[
            EnvVar::secret_ref("PORT", KeySelector::new("net", "port")),
            EnvVar::literal("EXTRA", "1"),
        ]);

        merge_fragment(&mut base, overlay);

        assert_eq!(base.len(), 3);
        assert_eq!(base[0].name, "PORT");
        assert!(base[0].value.is_none());
        assert!(base[0].value_from.is_some());
        assert_eq!(base[2].name, "EXTRA");
    }

    #[test]
    fn test_empty_list_builds_empty_fragment() {
        assert!(ManifestFragmentBuilder::build(&[]).is_empty());
        assert_eq!(ManifestFragmentBuilder::to_json(&[]), serde_json::json!([]));
    }
}
