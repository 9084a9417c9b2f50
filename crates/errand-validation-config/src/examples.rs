// crates/errand-validation-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example of `errand-validation.toml`. The example is kept valid
//! by the crate's load tests.

/// Returns a canonical example `errand-validation.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[metadata]
base_url = "https://api.example.org/supportmanagement"
timeout_ms = 5000
allow_http = false
max_response_bytes = 1048576
# bearer_token = "..."

[tags]
base_url = "https://api.example.org/tags"
timeout_ms = 5000

[json_schema]
mode = "remote"
base_url = "https://api.example.org/jsonschema"
# mode = "local"
# schema_dir = "schemas"

[audit]
enabled = true
# path = "audit.jsonl"
"#,
    )
}
