//! Employee record service.
//!
//! Thin CRUD layer over the employee repository. The one rule it adds is
//! the upsert contract: replacing an existing employee only touches name
//! and role, while replacing an absent one creates it under the given id.

use crate::repository::Repository;
use payroll_storage::{StorageError, StorageService};
use payroll_types::{APIError, Employee, EmployeeInput, NameError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while managing employee records.
#[derive(Debug, Error)]
pub enum EmployeeError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Could not find employee {0}")]
	NotFound(u64),
	#[error("Malformed input: {0}")]
	MalformedInput(String),
}

impl From<StorageError> for EmployeeError {
	fn from(err: StorageError) -> Self {
		EmployeeError::Storage(err.to_string())
	}
}

impl From<NameError> for EmployeeError {
	fn from(err: NameError) -> Self {
		EmployeeError::MalformedInput(err.to_string())
	}
}

impl From<EmployeeError> for APIError {
	fn from(err: EmployeeError) -> Self {
		match err {
			EmployeeError::NotFound(_) => APIError::NotFound {
				error_type: "EMPLOYEE_NOT_FOUND".to_string(),
				message: err.to_string(),
			},
			EmployeeError::MalformedInput(_) => APIError::BadRequest {
				error_type: "MALFORMED_INPUT".to_string(),
				message: err.to_string(),
			},
			EmployeeError::Storage(_) => APIError::InternalServerError {
				error_type: "INTERNAL_ERROR".to_string(),
				message: err.to_string(),
			},
		}
	}
}

/// Result of an upsert: the stored record and whether it was newly created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
	pub record: Employee,
	pub was_created: bool,
}

/// Manages employee records.
pub struct EmployeeRecords {
	repository: Repository<Employee>,
	/// Serializes writes that read before they store.
	write_lock: Mutex<()>,
}

impl EmployeeRecords {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			repository: Repository::new(storage),
			write_lock: Mutex::new(()),
		}
	}

	pub(crate) fn repository(&self) -> &Repository<Employee> {
		&self.repository
	}

	/// Lists all employees, ordered by ID
	pub async fn list(&self) -> Result<Vec<Employee>, EmployeeError> {
		Ok(self.repository.find_all().await?)
	}

	pub async fn get(&self, id: u64) -> Result<Employee, EmployeeError> {
		self.repository
			.find_by_id(id)
			.await?
			.ok_or(EmployeeError::NotFound(id))
	}

	/// Creates an employee under a freshly allocated id.
	pub async fn create(&self, input: EmployeeInput) -> Result<Employee, EmployeeError> {
		let details = input.into_details()?;

		let _guard = self.write_lock.lock().await;
		let employee = self
			.repository
			.insert_with(|id| details.into_employee(id))
			.await?;

		tracing::info!(employee_id = employee.id, "Created employee");
		Ok(employee)
	}

	/// Replaces name and role of the employee at `id`, or creates it there.
	pub async fn upsert(&self, id: u64, input: EmployeeInput) -> Result<Upserted, EmployeeError> {
		let details = input.into_details()?;

		let _guard = self.write_lock.lock().await;
		match self.repository.find_by_id(id).await? {
			Some(mut existing) => {
				existing.set_name(&details.name())?;
				existing.role = details.role;
				self.repository.save(&existing).await?;

				tracing::info!(employee_id = id, "Replaced employee");
				Ok(Upserted {
					record: existing,
					was_created: false,
				})
			},
			None => {
				let created = details.into_employee(id);
				self.repository.save(&created).await?;

				tracing::info!(employee_id = id, "Created employee at requested id");
				Ok(Upserted {
					record: created,
					was_created: true,
				})
			},
		}
	}

	/// Deletes the employee at `id`. Deleting an absent id succeeds.
	pub async fn delete(&self, id: u64) -> Result<(), EmployeeError> {
		let _guard = self.write_lock.lock().await;
		self.repository.delete_by_id(id).await?;

		tracing::info!(employee_id = id, "Deleted employee");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use payroll_storage::implementations::memory::MemoryStorage;

	fn records() -> EmployeeRecords {
		EmployeeRecords::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	fn input(first: &str, last: &str, role: &str) -> EmployeeInput {
		EmployeeInput {
			first_name: Some(first.into()),
			last_name: Some(last.into()),
			role: Some(role.into()),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_create_and_get() {
		let employees = records();

		let created = employees
			.create(input("Bilbo", "Baggins", "burglar"))
			.await
			.unwrap();

		assert_eq!(created.id, 1);
		assert_eq!(employees.get(1).await.unwrap(), created);
		assert_eq!(employees.list().await.unwrap(), vec![created]);
	}

	#[tokio::test]
	async fn test_upsert_absent_id_creates_with_that_id() {
		let employees = records();

		let upserted = employees.upsert(99, input("A", "B", "eng")).await.unwrap();

		assert!(upserted.was_created);
		assert_eq!(upserted.record, Employee::new(99, "A", "B", "eng"));
		assert_eq!(employees.get(99).await.unwrap(), upserted.record);
	}

	#[tokio::test]
	async fn test_upsert_existing_id_replaces_name_and_role() {
		let employees = records();
		let created = employees
			.create(input("Bilbo", "Baggins", "burglar"))
			.await
			.unwrap();

		let upserted = employees
			.upsert(
				created.id,
				EmployeeInput {
					name: Some("Samwise Gamgee".into()),
					role: Some("gardener".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		assert!(!upserted.was_created);
		assert_eq!(
			upserted.record,
			Employee::new(created.id, "Samwise", "Gamgee", "gardener")
		);
		assert_eq!(employees.list().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_upsert_rejects_malformed_name() {
		let employees = records();
		let created = employees
			.create(input("Bilbo", "Baggins", "burglar"))
			.await
			.unwrap();

		let result = employees
			.upsert(created.id, input("Mary Ann", "Smith", "cook"))
			.await;
		assert!(matches!(result, Err(EmployeeError::MalformedInput(_))));

		let result = employees
			.upsert(
				created.id,
				EmployeeInput {
					name: Some("Gandalf".into()),
					..Default::default()
				},
			)
			.await;
		assert!(matches!(result, Err(EmployeeError::MalformedInput(_))));

		// Record untouched
		assert_eq!(employees.get(created.id).await.unwrap(), created);
	}

	#[tokio::test]
	async fn test_identical_upserts_create_then_replace() {
		let employees = records();

		let first = employees.upsert(7, input("Mary", "Smith", "cook")).await.unwrap();
		let second = employees.upsert(7, input("Mary", "Smith", "cook")).await.unwrap();

		assert!(first.was_created);
		assert!(!second.was_created);
		assert_eq!(first.record, second.record);
		assert_eq!(employees.list().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_upsert_applies_name_rule_on_both_branches() {
		let employees = records();
		let role_only = || EmployeeInput {
			role: Some("cook".into()),
			..Default::default()
		};

		// Absent id
		let result = employees.upsert(8, role_only()).await;
		assert!(matches!(result, Err(EmployeeError::MalformedInput(_))));
		assert!(matches!(employees.get(8).await, Err(EmployeeError::NotFound(8))));

		// Existing id
		employees.upsert(8, input("A", "B", "eng")).await.unwrap();
		let result = employees.upsert(8, role_only()).await;
		assert!(matches!(result, Err(EmployeeError::MalformedInput(_))));

		// Same rule on create
		let result = employees.create(input("Mary Ann", "Smith", "cook")).await;
		assert!(matches!(result, Err(EmployeeError::MalformedInput(_))));
	}

	#[tokio::test]
	async fn test_create_after_upsert_skips_taken_id() {
		let employees = records();
		employees.upsert(1, input("A", "B", "eng")).await.unwrap();

		let created = employees.create(input("C", "D", "ops")).await.unwrap();
		assert_eq!(created.id, 2);
	}

	#[tokio::test]
	async fn test_delete_is_unconditional() {
		let employees = records();
		let created = employees.create(input("A", "B", "eng")).await.unwrap();

		employees.delete(created.id).await.unwrap();
		assert!(matches!(
			employees.get(created.id).await,
			Err(EmployeeError::NotFound(_))
		));

		// Absent id
		employees.delete(12345).await.unwrap();
	}

	#[test]
	fn test_api_error_mapping() {
		let not_found: APIError = EmployeeError::NotFound(99).into();
		assert_eq!(not_found.status_code(), 404);
		assert_eq!(
			not_found.to_error_response().message,
			"Could not find employee 99"
		);

		let malformed: APIError = EmployeeError::MalformedInput("bad".into()).into();
		assert_eq!(malformed.status_code(), 400);
	}
}
