//! Order lifecycle service.
//!
//! Guards every change of an order's status: new orders always start
//! `IN_PROGRESS`, and an order may be cancelled or completed only while it
//! is still in progress. Rejected transitions leave the stored order as is.

use crate::repository::Repository;
use payroll_storage::{StorageError, StorageService};
use payroll_types::{APIError, Order, OrderStatus, OrderTransition};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("You can't {transition} an order that is in the {status} status")]
	InvalidTransition {
		transition: OrderTransition,
		status: OrderStatus,
	},
	#[error("Could not find order {0}")]
	NotFound(u64),
}

impl From<StorageError> for OrderStateError {
	fn from(err: StorageError) -> Self {
		OrderStateError::Storage(err.to_string())
	}
}

impl From<OrderStateError> for APIError {
	fn from(err: OrderStateError) -> Self {
		match err {
			OrderStateError::NotFound(_) => APIError::NotFound {
				error_type: "ORDER_NOT_FOUND".to_string(),
				message: err.to_string(),
			},
			OrderStateError::InvalidTransition { .. } => APIError::MethodNotAllowed {
				title: "Method not allowed".to_string(),
				detail: err.to_string(),
			},
			OrderStateError::Storage(_) => APIError::InternalServerError {
				error_type: "INTERNAL_ERROR".to_string(),
				message: err.to_string(),
			},
		}
	}
}

/// Manages order creation and status transitions.
pub struct OrderLifecycle {
	repository: Repository<Order>,
	/// Held across the read-check-write of a transition so that two
	/// concurrent transitions on one order cannot both succeed.
	transition_lock: Mutex<()>,
}

impl OrderLifecycle {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			repository: Repository::new(storage),
			transition_lock: Mutex::new(()),
		}
	}

	pub(crate) fn repository(&self) -> &Repository<Order> {
		&self.repository
	}

	/// Creates a new order in the `IN_PROGRESS` status.
	pub async fn create(&self, description: impl Into<String>) -> Result<Order, OrderStateError> {
		let description = description.into();
		let order = self
			.repository
			.insert_with(|id| Order::new(id, description, OrderStatus::InProgress))
			.await?;

		tracing::info!(order_id = order.id, "Created order");
		Ok(order)
	}

	/// Gets an order by ID
	pub async fn get(&self, id: u64) -> Result<Order, OrderStateError> {
		self.repository
			.find_by_id(id)
			.await?
			.ok_or(OrderStateError::NotFound(id))
	}

	/// Lists all orders, ordered by ID
	pub async fn list(&self) -> Result<Vec<Order>, OrderStateError> {
		Ok(self.repository.find_all().await?)
	}

	/// Moves an in-progress order to `CANCELLED`.
	pub async fn cancel(&self, id: u64) -> Result<Order, OrderStateError> {
		self.transition(id, OrderTransition::Cancel).await
	}

	/// Moves an in-progress order to `COMPLETED`.
	pub async fn complete(&self, id: u64) -> Result<Order, OrderStateError> {
		self.transition(id, OrderTransition::Complete).await
	}

	async fn transition(
		&self,
		id: u64,
		transition: OrderTransition,
	) -> Result<Order, OrderStateError> {
		let _guard = self.transition_lock.lock().await;

		let mut order = self.get(id).await?;
		let target = transition.target();

		if !order.status.can_transition_to(target) {
			tracing::debug!(
				order_id = id,
				status = %order.status,
				"Rejected {} transition",
				transition
			);
			return Err(OrderStateError::InvalidTransition {
				transition,
				status: order.status,
			});
		}

		order.status = target;
		self.repository.update(&order).await.map_err(|e| match e {
			StorageError::NotFound => OrderStateError::NotFound(id),
			other => other.into(),
		})?;

		tracing::info!(order_id = id, status = %order.status, "Order transitioned");
		Ok(order)
	}
}
