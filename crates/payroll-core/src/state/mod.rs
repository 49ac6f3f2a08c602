//! State management for orders.
//!
//! This module provides the lifecycle service that owns every status change
//! of an order and rejects transitions out of a terminal status.

pub mod order;

pub use order::{OrderLifecycle, OrderStateError};
