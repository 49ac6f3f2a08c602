//! Schemas for the service's own configuration sections.
//!
//! The raw TOML is checked against these before it is deserialized, so
//! out-of-range or mistyped values are reported by field name.

use crate::ConfigError;
use payroll_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};

/// Schema for the `[api]` section.
pub struct ApiConfigSchema;

impl ConfigSchema for ApiConfigSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("host", FieldType::String),
				Field::new(
					"port",
					FieldType::Integer {
						min: Some(1),
						max: Some(u16::MAX as i64),
					},
				),
				Field::new("base_url", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
							Err(format!("'{}' must start with http:// or https://", url))
						},
						_ => Ok(()),
					}
				}),
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
				Field::new(
					"max_request_size",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
			],
		);

		schema.validate(config)?;

		if let Some(cors) = config.get("cors") {
			CorsConfigSchema.validate(cors)?;
		}
		Ok(())
	}
}

/// Schema for the `[api.cors]` table.
pub struct CorsConfigSchema;

impl ConfigSchema for CorsConfigSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new(
				"allowed_origins",
				FieldType::Array(Box::new(FieldType::String)),
			)
			.with_validator(|value| match value.as_array() {
				Some(origins) if origins.is_empty() => Err("cannot be empty".to_string()),
				_ => Ok(()),
			})],
			vec![],
		);

		schema.validate(config)
	}
}

/// Schema for the `[seed]` section.
pub struct SeedConfigSchema;

impl ConfigSchema for SeedConfigSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![Field::new("enabled", FieldType::Boolean)]).validate(config)
	}
}

/// Validates the optional top-level sections present in `raw`.
pub(crate) fn validate_sections(raw: &toml::Value) -> Result<(), ConfigError> {
	let sections: [(&str, &dyn ConfigSchema); 2] =
		[("api", &ApiConfigSchema), ("seed", &SeedConfigSchema)];

	for (name, schema) in sections {
		if let Some(section) = raw.get(name) {
			schema
				.validate(section)
				.map_err(|e| ConfigError::Validation(format!("[{}] {}", name, e)))?;
		}
	}
	Ok(())
}
