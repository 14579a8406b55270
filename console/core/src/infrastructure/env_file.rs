//! Env File Parser
//!
//! This module provides infrastructure for parsing `.env`-formatted text
//! into domain environment variables.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parse external text → Domain objects
//! - **Anti-Corruption:** Translates the `.env` dialect to the domain model
//!
//! # Input Format
//!
//! ```text
//! PORT=8000
//! GREETING="hello world"
//! # comments and blank lines are skipped
//! OPENAI_API_KEY='{"valueFrom": {"secretKeyRef": {"name": "openai-secret", "key": "apikey"}}}'
//! DB_HOST='{"configMapKeyRef": {"name": "db-config", "key": "host"}}'
//! ```
//!
//! Values shaped like a JSON object are inspected for a Kubernetes
//! `valueFrom` reference, in full or shorthand form. Malformed lines are
//! never fatal: each produces a `"Line <n>: <message>"` warning and a
//! best-effort fallback, so one bad line never blocks the rest of the
//! file. Whole-operation limits (size, encoding) are enforced one layer
//! up, in the application service.

use serde::Deserialize;

use crate::domain::env::{merge_env_var, EnvValue, EnvVar, ImportResult, KeySelector};

// ============================================================================
// Reference Shapes (External Representation)
// ============================================================================

/// Top level of a JSON-embedded reference value.
///
/// Matches both the full form (`{"valueFrom": {...}}`) and the shorthand
/// with `secretKeyRef`/`configMapKeyRef` at the top level.
#[derive(Debug, Deserialize)]
struct ReferenceShape {
    #[serde(rename = "valueFrom")]
    value_from: Option<SourceShape>,

    #[serde(rename = "secretKeyRef")]
    secret_key_ref: Option<SelectorShape>,

    #[serde(rename = "configMapKeyRef")]
    config_map_key_ref: Option<SelectorShape>,
}

#[derive(Debug, Deserialize)]
struct SourceShape {
    #[serde(rename = "secretKeyRef")]
    secret_key_ref: Option<SelectorShape>,

    #[serde(rename = "configMapKeyRef")]
    config_map_key_ref: Option<SelectorShape>,
}

#[derive(Debug, Deserialize)]
struct SelectorShape {
    name: Option<String>,
    key: Option<String>,
}

impl SelectorShape {
    fn into_selector(self) -> Option<KeySelector> {
        let selector = KeySelector::new(self.name?, self.key?);
        selector.is_complete().then_some(selector)
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Env file parser (Infrastructure service)
///
/// Stateless; [`EnvFileParser::parse`] is a pure function from input text
/// to [`ImportResult`], safe to call repeatedly and concurrently.
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse `.env`-formatted text into an ordered variable list plus
    /// warnings. Later duplicate keys overwrite earlier values while
    /// keeping the first occurrence's position.
    pub fn parse(content: &str) -> ImportResult {
        let mut env_vars: Vec<EnvVar> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                warnings.push(format!("Line {line_number}: Invalid format, missing '='"));
                continue;
            };

            let name = raw_key.trim();
            if name.is_empty() {
                warnings.push(format!(
                    "Line {line_number}: Invalid format, empty variable name"
                ));
                continue;
            }

            let value = strip_quotes(raw_value.trim());
            let (value, warning) = detect_value(value);
            if let Some(message) = warning {
                warnings.push(format!("Line {line_number}: {message}"));
            }

            merge_env_var(
                &mut env_vars,
                EnvVar {
                    name: name.to_string(),
                    value,
                },
            );
        }

        ImportResult { env_vars, warnings }
    }
}

/// Strip one matching pair of surrounding single or double quotes.
/// Mismatched or unbalanced quotes are left untouched.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Decide whether a raw value is a literal or a structured reference.
///
/// Returns the resolved value plus an optional warning message. Every
/// malformed case falls back to the original raw string as a literal —
/// the entry is never dropped.
fn detect_value(raw: &str) -> (EnvValue, Option<&'static str>) {
    if !(raw.starts_with('{') && raw.ends_with('}')) {
        return (EnvValue::Literal(raw.to_string()), None);
    }

    let json: serde_json::Value = match serde_json::from_str(raw) {
        Ok(json) => json,
        Err(_) => return (EnvValue::Literal(raw.to_string()), Some("Invalid JSON in value")),
    };

    let shape: ReferenceShape = match serde_json::from_value(json) {
        Ok(shape) => shape,
        Err(_) => {
            return (
                EnvValue::Literal(raw.to_string()),
                Some("Unrecognized reference shape, value kept as literal"),
            )
        }
    };

    // The full form wins over the shorthand when both are present.
    let (secret, config_map) = match shape.value_from {
        Some(source) => (source.secret_key_ref, source.config_map_key_ref),
        None => (shape.secret_key_ref, shape.config_map_key_ref),
    };

    match (secret, config_map) {
        (Some(selector), None) => match selector.into_selector() {
            Some(selector) => (EnvValue::SecretKeyRef(selector), None),
            None => (
                EnvValue::Literal(raw.to_string()),
                Some("Reference is missing a non-empty 'name'/'key', value kept as literal"),
            ),
        },
        (None, Some(selector)) => match selector.into_selector() {
            Some(selector) => (EnvValue::ConfigMapKeyRef(selector), None),
            None => (
                EnvValue::Literal(raw.to_string()),
                Some("Reference is missing a non-empty 'name'/'key', value kept as literal"),
            ),
        },
        // Neither selector, or an ambiguous pair of both.
        _ => (
            EnvValue::Literal(raw.to_string()),
            Some("Unrecognized reference shape, value kept as literal"),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
