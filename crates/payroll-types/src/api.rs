//! API types for the payroll HTTP API.
//!
//! This module defines the hypermedia envelopes wrapped around every entity
//! and collection the API returns, along with the structured error bodies
//! used when a request is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media type of problem detail bodies.
pub const PROBLEM_JSON_CONTENT_TYPE: &str = "application/problem+json";

/// A hypermedia link attached to a representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
	/// Relation of the target to the current resource (e.g. "self").
	pub rel: String,
	/// Absolute URL of the target.
	pub href: String,
}

impl Link {
	pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
		Self {
			rel: rel.into(),
			href: href.into(),
		}
	}

	/// Creates a link with the "self" relation.
	pub fn self_rel(href: impl Into<String>) -> Self {
		Self::new("self", href)
	}
}

/// Kinds of resources exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	Employee,
	Order,
}

impl ResourceKind {
	/// Path of the collection holding resources of this kind.
	pub fn collection_path(&self) -> &'static str {
		match self {
			ResourceKind::Employee => "/employees",
			ResourceKind::Order => "/orders",
		}
	}

	/// Relation name used when linking to the collection.
	pub fn collection_rel(&self) -> &'static str {
		match self {
			ResourceKind::Employee => "employees",
			ResourceKind::Order => "orders",
		}
	}
}

/// A single entity together with its links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityModel<T> {
	#[serde(flatten)]
	pub content: T,
	pub links: Vec<Link>,
}

impl<T> EntityModel<T> {
	pub fn new(content: T, links: Vec<Link>) -> Self {
		Self { content, links }
	}

	/// Returns the href of the "self" link, if present.
	pub fn self_href(&self) -> Option<&str> {
		self.links
			.iter()
			.find(|link| link.rel == "self")
			.map(|link| link.href.as_str())
	}
}

/// A collection of entity models together with the collection's links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionModel<T> {
	pub content: Vec<EntityModel<T>>,
	pub links: Vec<Link>,
}

/// Problem detail body describing why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
	/// Short, human-readable summary of the problem type.
	pub title: String,
	/// HTTP status code of the response carrying this problem.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,
	/// Explanation specific to this occurrence.
	pub detail: String,
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed request input (400)
	BadRequest { error_type: String, message: String },
	/// Requested resource does not exist (404)
	NotFound { error_type: String, message: String },
	/// Operation not allowed in the resource's current state (405)
	MethodNotAllowed { title: String, detail: String },
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::MethodNotAllowed { .. } => 405,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	///
	/// State violations are reported with a [`Problem`] body instead, see
	/// [`APIError::to_problem`].
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::BadRequest { error_type, message }
			| APIError::NotFound { error_type, message }
			| APIError::InternalServerError { error_type, message } => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
			},
			APIError::MethodNotAllowed { title, detail } => ErrorResponse {
				error: "METHOD_NOT_ALLOWED".to_string(),
				message: format!("{}: {}", title, detail),
			},
		}
	}

	/// Returns the problem detail body for state violations.
	pub fn to_problem(&self) -> Option<Problem> {
		match self {
			APIError::MethodNotAllowed { title, detail } => Some(Problem {
				title: title.clone(),
				status: Some(self.status_code()),
				detail: detail.clone(),
			}),
			_ => None,
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::MethodNotAllowed { detail, .. } => {
				write!(f, "Method Not Allowed: {}", detail)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{
			http::{header, StatusCode},
			response::Json,
		};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		match self.to_problem() {
			Some(problem) => (
				status,
				[(header::CONTENT_TYPE, PROBLEM_JSON_CONTENT_TYPE)],
				Json(problem),
			)
				.into_response(),
			None => (status, Json(self.to_error_response())).into_response(),
		}
	}
}
