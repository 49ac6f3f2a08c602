//! Storage-related types for the payroll service.

/// Storage namespaces for the persisted collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace for employee records
	Employees,
	/// Namespace for order records
	Orders,
	/// Namespace for per-collection identifier sequences
	Sequences,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Employees => "employees",
			StorageKey::Orders => "orders",
			StorageKey::Sequences => "sequences",
		}
	}
}
