//! Order API implementation.
//!
//! Order creation and the cancel and complete transitions all go through
//! the order lifecycle, which rejects transitions out of a terminal status.

use crate::links::ModelAssembler;
use payroll_core::{OrderStateError, PayrollEngine};
use payroll_types::{CollectionModel, EntityModel, NewOrder, Order};
use tracing::info;

pub async fn list_orders(
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<CollectionModel<Order>, OrderStateError> {
	let orders = engine.orders().list().await?;
	Ok(assembler.orders(orders))
}

pub async fn get_order_by_id(
	id: u64,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<EntityModel<Order>, OrderStateError> {
	info!("Retrieving order with ID: {}", id);
	let order = engine.orders().get(id).await?;
	Ok(assembler.order(order))
}

/// Creates an order. Any status sent by the client is ignored.
pub async fn create_order(
	request: NewOrder,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<EntityModel<Order>, OrderStateError> {
	let order = engine.orders().create(request.description).await?;
	Ok(assembler.order(order))
}

pub async fn cancel_order(
	id: u64,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<EntityModel<Order>, OrderStateError> {
	let order = engine.orders().cancel(id).await?;
	Ok(assembler.order(order))
}

pub async fn complete_order(
	id: u64,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<EntityModel<Order>, OrderStateError> {
	let order = engine.orders().complete(id).await?;
	Ok(assembler.order(order))
}
