//! Order aggregate types.
//!
//! Orders move through a small lifecycle: every order starts `IN_PROGRESS`
//! and may leave it exactly once, either to `COMPLETED` or to `CANCELLED`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Store-assigned identifier.
	pub id: u64,
	/// Free-form description of what was ordered.
	pub description: String,
	/// Current lifecycle status.
	pub status: OrderStatus,
}

impl Order {
	/// Creates an order record with the given identifier and status.
	pub fn new(id: u64, description: impl Into<String>, status: OrderStatus) -> Self {
		Self {
			id,
			description: description.into(),
			status,
		}
	}
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Initial status of every new order.
	InProgress,
	/// Terminal: the order was fulfilled.
	Completed,
	/// Terminal: the order was called off.
	Cancelled,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::InProgress => "IN_PROGRESS",
			OrderStatus::Completed => "COMPLETED",
			OrderStatus::Cancelled => "CANCELLED",
		}
	}

	/// Returns true if no transition may leave this status.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, OrderStatus::InProgress)
	}

	/// Checks if moving from this status to `next` is a valid transition.
	pub fn can_transition_to(&self, next: OrderStatus) -> bool {
		matches!(
			(self, next),
			(OrderStatus::InProgress, OrderStatus::Completed)
				| (OrderStatus::InProgress, OrderStatus::Cancelled)
		)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Operations that move an order out of `IN_PROGRESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTransition {
	Cancel,
	Complete,
}

impl OrderTransition {
	/// Status the order ends up in when the transition succeeds.
	pub fn target(&self) -> OrderStatus {
		match self {
			OrderTransition::Cancel => OrderStatus::Cancelled,
			OrderTransition::Complete => OrderStatus::Completed,
		}
	}
}

impl fmt::Display for OrderTransition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderTransition::Cancel => f.write_str("cancel"),
			OrderTransition::Complete => f.write_str("complete"),
		}
	}
}

/// Request body for creating an order.
///
/// Only the description is taken from the client; any `id` or `status`
/// fields are ignored, as new orders always start `IN_PROGRESS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
	pub description: String,
}
