//! Employee aggregate types.
//!
//! An employee is persisted with its first and last name stored separately,
//! while the API also exposes the combined `name` and accepts it on input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when assigning a full name to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
	/// The name did not split into exactly a first and a last name.
	#[error("Name '{0}' must be a first and a last name separated by a single space")]
	Arity(String),
}

/// A persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
	/// Store-assigned identifier, immutable once set.
	pub id: u64,
	pub first_name: String,
	pub last_name: String,
	pub role: String,
}

impl Employee {
	/// Creates an employee record with the given identifier.
	pub fn new(
		id: u64,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		role: impl Into<String>,
	) -> Self {
		Self {
			id,
			first_name: first_name.into(),
			last_name: last_name.into(),
			role: role.into(),
		}
	}

	/// Returns the full name, first and last name joined by a single space.
	pub fn name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}

	/// Replaces first and last name from a full name.
	///
	/// The record is left untouched when the name is rejected.
	pub fn set_name(&mut self, full_name: &str) -> Result<(), NameError> {
		let (first_name, last_name) = split_name(full_name)?;
		self.first_name = first_name;
		self.last_name = last_name;
		Ok(())
	}
}

/// Splits a full name into exactly two non-empty tokens on a single space.
pub fn split_name(full_name: &str) -> Result<(String, String), NameError> {
	let mut parts = full_name.split(' ');
	match (parts.next(), parts.next(), parts.next()) {
		(Some(first), Some(last), None) if !first.is_empty() && !last.is_empty() => {
			Ok((first.to_string(), last.to_string()))
		},
		_ => Err(NameError::Arity(full_name.to_string())),
	}
}

/// Request body for creating or replacing an employee.
///
/// Either `name` or the `firstName`/`lastName` pair may be supplied. When
/// `name` is present it takes precedence. Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub role: Option<String>,
}

/// Employee fields resolved from an [`EmployeeInput`], without identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDetails {
	pub first_name: String,
	pub last_name: String,
	pub role: String,
}

impl EmployeeInput {
	/// Resolves the input into concrete employee fields.
	///
	/// Separate first and last names are held to the same two-word rule as
	/// `name`, so every write path accepts exactly the same inputs.
	pub fn into_details(self) -> Result<EmployeeDetails, NameError> {
		let full_name = match self.name {
			Some(name) => name,
			None => format!(
				"{} {}",
				self.first_name.unwrap_or_default(),
				self.last_name.unwrap_or_default()
			),
		};
		let (first_name, last_name) = split_name(&full_name)?;

		Ok(EmployeeDetails {
			first_name,
			last_name,
			role: self.role.unwrap_or_default(),
		})
	}
}

impl EmployeeDetails {
	/// Returns the full name these details describe.
	pub fn name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}

	/// Binds the details to an identifier.
	pub fn into_employee(self, id: u64) -> Employee {
		Employee {
			id,
			first_name: self.first_name,
			last_name: self.last_name,
			role: self.role,
		}
	}
}

/// Employee as rendered by the API, including the derived `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRepresentation {
	pub id: u64,
	pub first_name: String,
	pub last_name: String,
	pub name: String,
	pub role: String,
}

impl From<Employee> for EmployeeRepresentation {
	fn from(employee: Employee) -> Self {
		let name = employee.name();
		Self {
			id: employee.id,
			first_name: employee.first_name,
			last_name: employee.last_name,
			name,
			role: employee.role,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_name_joins_first_and_last() {
		let employee = Employee::new(1, "Bilbo", "Baggins", "burglar");
		assert_eq!(employee.name(), "Bilbo Baggins");
	}

	#[test]
	fn test_set_name_splits_two_tokens() {
		let mut employee = Employee::new(1, "Bilbo", "Baggins", "burglar");
		employee.set_name("Samwise Gamgee").unwrap();

		assert_eq!(employee.first_name, "Samwise");
		assert_eq!(employee.last_name, "Gamgee");
		assert_eq!(employee.id, 1);
	}

	#[test]
	fn test_set_name_rejects_wrong_arity() {
		let mut employee = Employee::new(1, "Bilbo", "Baggins", "burglar");

		for bad in ["", "Gandalf", "Peregrin Took III", "Frodo  Baggins", " Frodo"] {
			let result = employee.set_name(bad);
			assert_eq!(result, Err(NameError::Arity(bad.to_string())));
		}

		// Rejected names leave the record untouched
		assert_eq!(employee.name(), "Bilbo Baggins");
	}

	#[test]
	fn test_input_prefers_full_name() {
		let input: EmployeeInput = serde_json::from_str(
			r#"{"firstName":"A","lastName":"B","name":"Frodo Baggins","role":"thief"}"#,
		)
		.unwrap();

		let details = input.into_details().unwrap();
		assert_eq!(details.first_name, "Frodo");
		assert_eq!(details.last_name, "Baggins");
		assert_eq!(details.role, "thief");
	}

	#[test]
	fn test_input_with_split_fields() {
		let input: EmployeeInput =
			serde_json::from_str(r#"{"id":7,"firstName":"A","lastName":"B","role":"eng"}"#)
				.unwrap();

		let employee = input.into_details().unwrap().into_employee(99);
		assert_eq!(employee, Employee::new(99, "A", "B", "eng"));
	}

	#[test]
	fn test_input_with_malformed_name() {
		let input = EmployeeInput {
			name: Some("Gandalf".into()),
			..Default::default()
		};
		assert!(input.into_details().is_err());
	}

	#[test]
	fn test_input_split_fields_follow_name_rule() {
		let spaced = EmployeeInput {
			first_name: Some("Mary Ann".into()),
			last_name: Some("Smith".into()),
			role: Some("cook".into()),
			..Default::default()
		};
		assert_eq!(
			spaced.into_details(),
			Err(NameError::Arity("Mary Ann Smith".to_string()))
		);

		let role_only = EmployeeInput {
			role: Some("cook".into()),
			..Default::default()
		};
		assert_eq!(
			role_only.into_details(),
			Err(NameError::Arity(" ".to_string()))
		);
	}

	#[test]
	fn test_representation_serializes_camel_case() {
		let representation =
			EmployeeRepresentation::from(Employee::new(3, "Frodo", "Baggins", "thief"));
		let json = serde_json::to_value(&representation).unwrap();

		assert_eq!(json["id"], 3);
		assert_eq!(json["firstName"], "Frodo");
		assert_eq!(json["lastName"], "Baggins");
		assert_eq!(json["name"], "Frodo Baggins");
		assert_eq!(json["role"], "thief");
	}
}
