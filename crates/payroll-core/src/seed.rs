//! Sample data preloaded into an empty store at startup.

use crate::records::EmployeeRecords;
use crate::state::OrderLifecycle;
use payroll_storage::StorageError;
use payroll_types::{Employee, Order, OrderStatus};

const EMPLOYEES: [(&str, &str, &str); 2] = [
	("Bilbo", "Baggins", "burglar"),
	("Frodo", "Baggins", "thief"),
];

const ORDERS: [(&str, OrderStatus); 2] = [
	("MacBook Pro", OrderStatus::Completed),
	("iPhone", OrderStatus::InProgress),
];

/// Preloads the sample employees and orders.
///
/// Orders are written with their listed status, bypassing the lifecycle's
/// forced `IN_PROGRESS`. Nothing is written if either collection already
/// holds records. Returns whether the samples were loaded.
pub async fn load_database(
	employees: &EmployeeRecords,
	orders: &OrderLifecycle,
) -> Result<bool, StorageError> {
	let employee_repository = employees.repository();
	let order_repository = orders.repository();

	if !employee_repository.find_all().await?.is_empty()
		|| !order_repository.find_all().await?.is_empty()
	{
		tracing::info!("Store already populated, skipping preload");
		return Ok(false);
	}

	for (first_name, last_name, role) in EMPLOYEES {
		employee_repository
			.insert_with(|id| Employee::new(id, first_name, last_name, role))
			.await?;
	}
	for employee in employee_repository.find_all().await? {
		tracing::info!("Preloaded {:?}", employee);
	}

	for (description, status) in ORDERS {
		order_repository
			.insert_with(|id| Order::new(id, description, status))
			.await?;
	}
	for order in order_repository.find_all().await? {
		tracing::info!("Preloaded {:?}", order);
	}

	Ok(true)
}
