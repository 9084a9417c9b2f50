// crates/errand-validation-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared gateways, scopes, and sinks for validator tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: errand-validation-core
// ============================================================================

//! ## Overview
//! Builds validator families over in-memory gateways bound to a fixed
//! namespace and municipality, and captures audit events for assertions.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use errand_validation_core::ErrandGateways;
use errand_validation_core::ErrandValidators;
use errand_validation_core::InMemoryJsonSchemaGateway;
use errand_validation_core::InMemoryMetadataGateway;
use errand_validation_core::InMemoryTagGateway;
use errand_validation_core::RequestAttributes;
use errand_validation_core::RequestContext;
use errand_validation_core::ScopeMetadata;
use errand_validation_core::SharedJsonSchemaGateway;
use errand_validation_core::SharedMetadataGateway;
use errand_validation_core::SharedTagGateway;
use errand_validation_core::ValidationAuditEvent;
use errand_validation_core::ValidationAuditSink;

// ============================================================================
// SECTION: Scope
// ============================================================================

/// Namespace used by every fixture.
pub const NAMESPACE: &str = "my.namespace";
/// Municipality used by every fixture.
pub const MUNICIPALITY_ID: &str = "2281";

/// Returns the resolved fixture scope.
pub fn scope() -> RequestContext {
    RequestContext::new(NAMESPACE, MUNICIPALITY_ID)
}

/// Returns request attributes carrying the fixture scope.
pub fn attributes() -> RequestAttributes {
    RequestAttributes::with_path_variables(NAMESPACE, MUNICIPALITY_ID)
}

// ============================================================================
// SECTION: Gateways
// ============================================================================

/// Wraps an in-memory metadata gateway as a shared handle.
pub fn shared_metadata(gateway: &InMemoryMetadataGateway) -> SharedMetadataGateway {
    Arc::new(gateway.clone())
}

/// Wraps an in-memory tag gateway as a shared handle.
pub fn shared_tags(gateway: &InMemoryTagGateway) -> SharedTagGateway {
    Arc::new(gateway.clone())
}

/// Wraps an in-memory schema gateway as a shared handle.
pub fn shared_schemas(gateway: &InMemoryJsonSchemaGateway) -> SharedJsonSchemaGateway {
    Arc::new(gateway.clone())
}

/// Returns a metadata gateway holding `metadata` for the fixture scope.
pub fn metadata_with(metadata: ScopeMetadata) -> InMemoryMetadataGateway {
    InMemoryMetadataGateway::new().with_scope(NAMESPACE, MUNICIPALITY_ID, metadata)
}

/// In-memory gateways backing a validator family.
#[derive(Clone, Default)]
pub struct Fixture {
    /// Metadata gateway.
    pub metadata: InMemoryMetadataGateway,
    /// Tag gateway.
    pub tags: InMemoryTagGateway,
    /// JSON-schema gateway.
    pub schemas: InMemoryJsonSchemaGateway,
}

impl Fixture {
    /// Creates a fixture with the given metadata and empty tag/schema gateways.
    pub fn with_metadata(metadata: ScopeMetadata) -> Self {
        Self {
            metadata: metadata_with(metadata),
            ..Self::default()
        }
    }

    /// Builds a validator family over the fixture gateways.
    pub fn validators(&self) -> ErrandValidators {
        ErrandValidators::new(ErrandGateways {
            metadata: shared_metadata(&self.metadata),
            tags: shared_tags(&self.tags),
            json_schema: shared_schemas(&self.schemas),
        })
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink collecting events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded events.
    events: Mutex<Vec<ValidationAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns the recorded events.
    pub fn events(&self) -> Vec<ValidationAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ValidationAuditSink for RecordingAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
