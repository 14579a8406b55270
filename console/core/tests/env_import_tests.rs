// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use aegis_console_core::application::env_import::{EnvImportError, EnvImportService};
use aegis_console_core::domain::env::{EnvValue, EnvVar, KeySelector};
use aegis_console_core::infrastructure::manifest::ManifestFragmentBuilder;

#[test]
fn test_end_to_end_import_to_manifest_fragment() {
    let input = concat!(
        "PORT=8000\n",
        "OPENAI_API_KEY='{\"valueFrom\": {\"secretKeyRef\": ",
        "{\"name\": \"openai-secret\", \"key\": \"apikey\"}}}'\n",
    );

    let service = EnvImportService::new();
    let result = service.import_text(input).unwrap();
    assert!(result.warnings.is_empty());

    let fragment = ManifestFragmentBuilder::to_json(&result.env_vars);
    assert_eq!(
        fragment,
        serde_json::json!([
            {"name": "PORT", "value": "8000"},
            {"name": "OPENAI_API_KEY",
             "valueFrom": {"secretKeyRef": {"name": "openai-secret", "key": "apikey"}}}
        ])
    );
}

#[test]
fn test_full_and_shorthand_forms_produce_identical_fragments() {
    let service = EnvImportService::new();

    let full = service
        .import_text(r#"S='{"valueFrom": {"secretKeyRef": {"name": "s1", "key": "k1"}}}'"#)
        .unwrap();
    let shorthand = service
        .import_text(r#"S='{"secretKeyRef": {"name": "s1", "key": "k1"}}'"#)
        .unwrap();

    assert_eq!(
        ManifestFragmentBuilder::build(&full.env_vars),
        ManifestFragmentBuilder::build(&shorthand.env_vars)
    );
}

#[test]
fn test_mixed_file_is_partial_failure_tolerant() {
    let input = concat!(
        "# deployment settings\n",
        "\n",
        "PORT=8000\n",
        "BROKEN_LINE\n",
        "BAD_JSON='{oops'\n",
        "DB_HOST='{\"configMapKeyRef\": {\"name\": \"db-config\", \"key\": \"host\"}}'\n",
    );

    let service = EnvImportService::new();
    let result = service.import_text(input).unwrap();

    // Every salvageable line survives; each bad one leaves a warning.
    assert_eq!(
        result.env_vars,
        vec![
            EnvVar::literal("PORT", "8000"),
            EnvVar::literal("BAD_JSON", "{oops"),
            EnvVar::config_map_ref("DB_HOST", KeySelector::new("db-config", "host")),
        ]
    );
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings[0].contains("missing '='"));
    assert!(result.warnings[1].contains("Invalid JSON"));
}

#[test]
fn test_duplicate_keys_across_forms() {
    let input = concat!(
        "TOKEN=plaintext\n",
        "OTHER=1\n",
        "TOKEN='{\"secretKeyRef\": {\"name\": \"s1\", \"key\": \"token\"}}'\n",
    );

    let service = EnvImportService::new();
    let result = service.import_text(input).unwrap();

    assert_eq!(result.env_vars.len(), 2);
    assert_eq!(result.env_vars[0].name, "TOKEN");
    assert!(matches!(
        result.env_vars[0].value,
        EnvValue::SecretKeyRef(_)
    ));
    assert_eq!(result.env_vars[1].name, "OTHER");
}

#[test]
fn test_size_limit_aborts_without_partial_result() {
    let service = EnvImportService::with_limits(32, 1000);
    let err = service.import_text(&"GOOD=1\n".repeat(10)).unwrap_err();
    assert!(matches!(err, EnvImportError::TooLarge { .. }));
}

#[test]
fn test_comments_only_file_is_empty_and_clean() {
    let service = EnvImportService::new();
    let result = service.import_text("# only\n# comments\n\n").unwrap();
    assert!(result.env_vars.is_empty());
    assert!(result.warnings.is_empty());
}
