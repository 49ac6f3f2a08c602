//! Common types module for the payroll service.
//!
//! This module defines the entities, API representations and configuration
//! helpers shared by every payroll crate, so that storage, core and service
//! agree on a single set of wire and persistence formats.

/// API types for HTTP endpoints and hypermedia representations.
pub mod api;
/// Employee aggregate and its request input.
pub mod employee;
/// Order aggregate and its status lifecycle.
pub mod order;
/// Registry trait for pluggable implementations.
pub mod registry;
/// Storage namespaces for persisted aggregates.
pub mod storage;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use employee::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
pub use validation::*;
