//! Employee API implementation.
//!
//! Resolves employee requests against the record service and wraps the
//! results into linked representations.

use crate::links::ModelAssembler;
use payroll_core::{EmployeeError, PayrollEngine};
use payroll_types::{CollectionModel, EmployeeInput, EmployeeRepresentation, EntityModel};
use tracing::info;

pub async fn list_employees(
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<CollectionModel<EmployeeRepresentation>, EmployeeError> {
	let employees = engine.employees().list().await?;
	Ok(assembler.employees(employees))
}

pub async fn get_employee_by_id(
	id: u64,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<EntityModel<EmployeeRepresentation>, EmployeeError> {
	info!("Retrieving employee with ID: {}", id);
	let employee = engine.employees().get(id).await?;
	Ok(assembler.employee(employee))
}

pub async fn create_employee(
	input: EmployeeInput,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<EntityModel<EmployeeRepresentation>, EmployeeError> {
	let employee = engine.employees().create(input).await?;
	Ok(assembler.employee(employee))
}

/// Replaces the employee at `id`, creating it there if absent.
///
/// The flag in the result tells whether a new record was created.
pub async fn replace_employee(
	id: u64,
	input: EmployeeInput,
	engine: &PayrollEngine,
	assembler: &ModelAssembler,
) -> Result<(EntityModel<EmployeeRepresentation>, bool), EmployeeError> {
	let upserted = engine.employees().upsert(id, input).await?;
	Ok((assembler.employee(upserted.record), upserted.was_created))
}

pub async fn delete_employee(id: u64, engine: &PayrollEngine) -> Result<(), EmployeeError> {
	engine.employees().delete(id).await
}
