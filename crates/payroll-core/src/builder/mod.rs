//! Builder pattern for constructing the payroll engine.
//!
//! The storage backend is chosen by name from the configuration and
//! created through the matching factory function.

use crate::PayrollEngine;
use payroll_config::Config;
use payroll_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for constructing a PayrollEngine with a pluggable store.
pub struct PayrollBuilder {
	config: Config,
}

impl PayrollBuilder {
	/// Creates a new PayrollBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine, creating the primary storage backend from its factory.
	pub fn build<SF>(self, storage_factories: HashMap<String, SF>) -> Result<PayrollEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let primary = &self.config.storage.primary;

		let implementation_config =
			self.config.storage.implementations.get(primary).ok_or_else(|| {
				BuilderError::Config(format!(
					"Primary storage '{}' not found in implementations",
					primary
				))
			})?;

		let factory = storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!("storage implementation '{}'", primary))
		})?;

		let backend = factory(implementation_config).map_err(|e| {
			tracing::error!(
				component = "storage",
				implementation = %primary,
				error = %e,
				"Failed to create storage implementation"
			);
			BuilderError::Config(format!(
				"Failed to create storage implementation '{}': {}",
				primary, e
			))
		})?;
		tracing::info!(component = "storage", implementation = %primary, "Loaded");

		let storage = Arc::new(StorageService::new(backend));
		Ok(PayrollEngine::new(self.config, storage))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use payroll_storage::get_all_implementations;

	fn config(primary: &str) -> Config {
		format!(
			r#"
[payroll]
id = "payroll-test"

[storage]
primary = "{}"
[storage.implementations.{}]
"#,
			primary, primary
		)
		.parse()
		.unwrap()
	}

	#[test]
	fn test_build_with_memory_storage() {
		let factories: HashMap<_, _> = get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect();

		let engine = PayrollBuilder::new(config("memory"))
			.build(factories)
			.unwrap();
		assert_eq!(engine.config().payroll.id, "payroll-test");
	}

	#[test]
	fn test_build_without_matching_factory() {
		let factories: HashMap<String, payroll_storage::StorageFactory> = HashMap::new();

		let result = PayrollBuilder::new(config("memory")).build(factories);
		assert!(matches!(result, Err(BuilderError::MissingComponent(_))));
	}

	#[test]
	fn test_build_with_failing_factory() {
		let mut factories = HashMap::new();
		factories.insert(
			"memory".to_string(),
			|_: &toml::Value| -> Result<Box<dyn StorageInterface>, StorageError> {
				Err(StorageError::Configuration("boom".into()))
			},
		);

		let result = PayrollBuilder::new(config("memory")).build(factories);
		match result {
			Err(BuilderError::Config(message)) => assert!(message.contains("boom")),
			_ => panic!("expected configuration error"),
		}
	}
}
