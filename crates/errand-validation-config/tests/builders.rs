// crates/errand-validation-config/tests/builders.rs
// ============================================================================
// Module: Config Builder Tests
// Description: Gateway and audit sink construction from configuration.
// Purpose: Ensure validated configs produce working runtime components.
// Dependencies: errand-validation-config, errand-validation-core, tempfile
// ============================================================================

//! ## Overview
//! Builds gateways, validators, and audit sinks from configs that point at
//! temporary schema directories and audit files.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;

use errand_validation_config::AuditConfig;
use errand_validation_config::ErrandValidationConfig;
use errand_validation_config::JsonSchemaMode;
use errand_validation_core::MunicipalityId;
use errand_validation_core::SchemaId;
use errand_validation_core::ValidationAuditEvent;
use errand_validation_core::ValidationAuditEventParams;
use errand_validation_core::ValidationOutcome;

/// Returns a config using local schemas from `schema_dir`.
fn local_config(schema_dir: &Path, audit: &str) -> String {
    format!(
        r#"
[metadata]
base_url = "https://metadata.example.org"

[tags]
base_url = "https://tags.example.org"

[json_schema]
mode = "local"
schema_dir = "{}"

{audit}
"#,
        schema_dir.display()
    )
}

#[test]
fn local_schema_gateway_is_loaded_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("2281_size_1.0.json"), r#"{"type":"integer","minimum":0}"#)
        .unwrap();
    let config = ErrandValidationConfig::from_toml(&local_config(dir.path(), "")).unwrap();
    assert_eq!(config.json_schema.mode, JsonSchemaMode::Local);

    let gateway = config.json_schema.build_gateway().unwrap();
    let municipality_id = MunicipalityId::new("2281");
    let schema_id = SchemaId::new("2281_size_1.0");

    assert!(gateway.validate_json(&municipality_id, &schema_id, &serde_json::json!(3)).is_ok());
    let err =
        gateway.validate_json(&municipality_id, &schema_id, &serde_json::json!(-1)).unwrap_err();
    assert!(err.is_client());
}

#[test]
fn validators_build_with_remote_gateways() {
    let content = r#"
[metadata]
base_url = "https://metadata.example.org"

[tags]
base_url = "https://tags.example.org"
bearer_token = "token"

[json_schema]
base_url = "https://schemas.example.org"
"#;
    let config = ErrandValidationConfig::from_toml(content).unwrap();
    assert!(config.json_schema.remote().is_some());
    assert!(config.build_validators().is_ok());
}

#[test]
fn missing_schema_directory_fails_build() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let config = ErrandValidationConfig::from_toml(&local_config(&missing, "")).unwrap();

    let err = config.build_gateways().err().unwrap();

    assert!(err.to_string().contains("json_schema: "));
}

#[test]
fn file_audit_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let audit = AuditConfig {
        enabled: true,
        path: Some(path.clone()),
    };

    let sink = audit.build_sink().unwrap();
    sink.record(&ValidationAuditEvent::new(ValidationAuditEventParams {
        namespace: Some("my.namespace".to_string()),
        municipality_id: Some("2281".to_string()),
        object: "errand",
        outcome: ValidationOutcome::Invalid,
        fields: vec!["status".to_string()],
        error_kind: None,
    }));

    let content = fs::read_to_string(&path).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(line["outcome"], "invalid");
    assert_eq!(line["fields"], serde_json::json!(["status"]));
}

#[test]
fn disabled_audit_does_not_create_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let audit = AuditConfig {
        enabled: false,
        path: Some(path.clone()),
    };

    audit.build_sink().unwrap();

    assert!(!path.exists());
}

#[test]
fn audit_section_defaults_to_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let config = ErrandValidationConfig::from_toml(&local_config(dir.path(), "")).unwrap();
    assert_eq!(config.audit, AuditConfig::default());
    assert!(!config.audit.enabled);
}
