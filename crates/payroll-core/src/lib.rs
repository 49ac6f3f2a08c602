//! Core engine of the payroll service.
//!
//! Ties the storage backend to the services that own each aggregate: the
//! order lifecycle, which enforces valid status transitions, and the
//! employee record service.

use payroll_config::Config;
use payroll_storage::{StorageError, StorageService};
use std::sync::Arc;

pub mod builder;
pub mod records;
pub mod repository;
pub mod seed;
pub mod state;

pub use builder::{BuilderError, PayrollBuilder};
pub use records::{EmployeeError, EmployeeRecords, Upserted};
pub use state::{OrderLifecycle, OrderStateError};

/// Services backing the HTTP API, sharing one store.
pub struct PayrollEngine {
	config: Config,
	employees: Arc<EmployeeRecords>,
	orders: Arc<OrderLifecycle>,
}

impl PayrollEngine {
	/// Creates an engine whose services all use `storage`.
	pub fn new(config: Config, storage: Arc<StorageService>) -> Self {
		Self {
			config,
			employees: Arc::new(EmployeeRecords::new(Arc::clone(&storage))),
			orders: Arc::new(OrderLifecycle::new(storage)),
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn employees(&self) -> &EmployeeRecords {
		&self.employees
	}

	pub fn orders(&self) -> &OrderLifecycle {
		&self.orders
	}

	/// Preloads sample records when seeding is enabled.
	pub async fn seed(&self) -> Result<(), StorageError> {
		if !self.config.seed.enabled {
			tracing::debug!("Seeding disabled");
			return Ok(());
		}
		seed::load_database(&self.employees, &self.orders).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use payroll_storage::implementations::memory::MemoryStorage;

	fn engine(seed_enabled: bool) -> PayrollEngine {
		let config: Config = format!(
			r#"
[payroll]
id = "payroll-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[seed]
enabled = {}
"#,
			seed_enabled
		)
		.parse()
		.unwrap();
		PayrollEngine::new(
			config,
			Arc::new(StorageService::new(Box::new(MemoryStorage::new()))),
		)
	}

	#[tokio::test]
	async fn test_seed_respects_config() {
		let disabled = engine(false);
		disabled.seed().await.unwrap();
		assert!(disabled.employees().list().await.unwrap().is_empty());

		let enabled = engine(true);
		enabled.seed().await.unwrap();
		assert_eq!(enabled.employees().list().await.unwrap().len(), 2);
		assert_eq!(enabled.orders().list().await.unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_services_share_one_store() {
		let engine = engine(false);
		let order = engine.orders().create("Laptop").await.unwrap();
		let employee = engine
			.employees()
			.upsert(
				1,
				payroll_types::EmployeeInput {
					name: Some("A B".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		// Independent sequences per aggregate
		assert_eq!(order.id, 1);
		assert_eq!(employee.record.id, 1);
	}
}
