//! Maintenance workflow for racket stringing and services
//!
//! This is the one place in the system with real conditional logic:
//! resolving the optional product references a record carries, validating
//! numeric fields, applying defaults, and persisting atomically.

pub mod resolver;
pub mod workflow;

pub use resolver::{
    CategoryFitPolicy, ProductRole, ReferenceResolver, ResolvedReferences, RoleReferences,
};
pub use workflow::{
    DampenerConfig, GripConfig, MaintenanceRecordPatch, MaintenanceWorkflow, NewMaintenanceRecord,
    StringConfig,
};
