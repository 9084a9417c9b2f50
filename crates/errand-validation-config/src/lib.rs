// crates/errand-validation-config/src/lib.rs
// ============================================================================
// Module: Errand Validation Config Library
// Description: Canonical config model, validation, and gateway construction.
// Purpose: Single source of truth for errand-validation.toml semantics.
// Dependencies: errand-validation-core, errand-validation-gateways, serde, toml
// ============================================================================

//! ## Overview
//! `errand-validation-config` defines the configuration model for the errand
//! validators. Loading is strict and fail-closed: unknown keys, oversized or
//! non UTF-8 files, and unsafe gateway settings are rejected before any
//! gateway is built.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
