//! HTTP server for the payroll API.
//!
//! Maps every (method, path) pair of the API onto a handler, and wraps the
//! router in the tracing, timeout, CORS and body limit middleware.

use crate::apis::{employee, order};
use crate::links::ModelAssembler;
use axum::{
	extract::{DefaultBodyLimit, Path, State},
	http::{header, HeaderValue, Method, StatusCode},
	response::{IntoResponse, Json, Response},
	routing::{delete, get, put},
	Router,
};
use payroll_config::ApiConfig;
use payroll_core::PayrollEngine;
use payroll_types::{
	APIError, CollectionModel, EmployeeInput, EmployeeRepresentation, EntityModel, NewOrder, Order,
};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Services backing every endpoint.
	pub engine: Arc<PayrollEngine>,
	/// Builds linked representations from the public base URL.
	pub assembler: ModelAssembler,
}

impl AppState {
	pub fn new(engine: Arc<PayrollEngine>, api_config: &ApiConfig) -> Self {
		Self {
			engine,
			assembler: ModelAssembler::new(&api_config.public_base_url()),
		}
	}
}

/// Builds the API router with all routes and middleware.
pub fn build_router(state: AppState, api_config: &ApiConfig) -> Router {
	Router::new()
		.route(
			"/employees",
			get(handle_list_employees).post(handle_create_employee),
		)
		.route(
			"/employees/{id}",
			get(handle_get_employee)
				.put(handle_replace_employee)
				.delete(handle_delete_employee),
		)
		.route("/orders", get(handle_list_orders).post(handle_create_order))
		.route("/orders/{id}", get(handle_get_order))
		.route("/orders/{id}/cancel", delete(handle_cancel_order))
		.route("/orders/{id}/complete", put(handle_complete_order))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				)))
				.layer(cors_layer(api_config))
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		.with_state(state)
}

/// Starts the HTTP server for the API.
///
/// Runs until the process receives Ctrl-C.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<PayrollEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let state = AppState::new(engine, &api_config);
	let app = build_router(state, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!(
		base_url = %api_config.public_base_url(),
		"Payroll API server starting on {}",
		bind_address
	);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutdown signal received");
}

fn cors_layer(api_config: &ApiConfig) -> CorsLayer {
	let Some(cors) = api_config.cors.as_ref() else {
		return CorsLayer::permissive();
	};
	if cors.allowed_origins.iter().any(|origin| origin == "*") {
		return CorsLayer::permissive();
	}

	let origins: Vec<HeaderValue> = cors
		.allowed_origins
		.iter()
		.filter_map(|origin| match origin.parse::<HeaderValue>() {
			Ok(value) => Some(value),
			Err(e) => {
				tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
				None
			},
		})
		.collect();

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
		.allow_headers([header::CONTENT_TYPE])
		.expose_headers([header::LOCATION])
}

/// Logs a failed request and converts the error for the response.
fn rejected<E>(action: &str, err: E) -> APIError
where
	E: Display + Into<APIError>,
{
	tracing::warn!("{} failed: {}", action, err);
	err.into()
}

/// 201 response carrying the model, with `Location` set to its self link.
fn created<T: Serialize>(model: EntityModel<T>) -> Response {
	let location = model
		.self_href()
		.and_then(|href| HeaderValue::from_str(href).ok());

	let mut response = (StatusCode::CREATED, Json(model)).into_response();
	if let Some(location) = location {
		response.headers_mut().insert(header::LOCATION, location);
	}
	response
}

/// Handles GET /employees requests.
async fn handle_list_employees(
	State(state): State<AppState>,
) -> Result<Json<CollectionModel<EmployeeRepresentation>>, APIError> {
	employee::list_employees(&state.engine, &state.assembler)
		.await
		.map(Json)
		.map_err(|e| rejected("Employee listing", e))
}

/// Handles POST /employees requests.
async fn handle_create_employee(
	State(state): State<AppState>,
	Json(input): Json<EmployeeInput>,
) -> Result<Response, APIError> {
	employee::create_employee(input, &state.engine, &state.assembler)
		.await
		.map(created)
		.map_err(|e| rejected("Employee creation", e))
}

/// Handles GET /employees/{id} requests.
async fn handle_get_employee(
	Path(id): Path<u64>,
	State(state): State<AppState>,
) -> Result<Json<EntityModel<EmployeeRepresentation>>, APIError> {
	employee::get_employee_by_id(id, &state.engine, &state.assembler)
		.await
		.map(Json)
		.map_err(|e| rejected("Employee retrieval", e))
}

/// Handles PUT /employees/{id} requests.
///
/// Answers 201 when the employee did not exist and was created at `id`.
async fn handle_replace_employee(
	Path(id): Path<u64>,
	State(state): State<AppState>,
	Json(input): Json<EmployeeInput>,
) -> Result<Response, APIError> {
	match employee::replace_employee(id, input, &state.engine, &state.assembler).await {
		Ok((model, true)) => Ok(created(model)),
		Ok((model, false)) => Ok(Json(model).into_response()),
		Err(e) => Err(rejected("Employee replacement", e)),
	}
}

/// Handles DELETE /employees/{id} requests.
async fn handle_delete_employee(
	Path(id): Path<u64>,
	State(state): State<AppState>,
) -> Result<StatusCode, APIError> {
	employee::delete_employee(id, &state.engine)
		.await
		.map(|()| StatusCode::NO_CONTENT)
		.map_err(|e| rejected("Employee deletion", e))
}

/// Handles GET /orders requests.
async fn handle_list_orders(
	State(state): State<AppState>,
) -> Result<Json<CollectionModel<Order>>, APIError> {
	order::list_orders(&state.engine, &state.assembler)
		.await
		.map(Json)
		.map_err(|e| rejected("Order listing", e))
}

/// Handles POST /orders requests.
async fn handle_create_order(
	State(state): State<AppState>,
	Json(request): Json<NewOrder>,
) -> Result<Response, APIError> {
	order::create_order(request, &state.engine, &state.assembler)
		.await
		.map(created)
		.map_err(|e| rejected("Order creation", e))
}

/// Handles GET /orders/{id} requests.
async fn handle_get_order(
	Path(id): Path<u64>,
	State(state): State<AppState>,
) -> Result<Json<EntityModel<Order>>, APIError> {
	order::get_order_by_id(id, &state.engine, &state.assembler)
		.await
		.map(Json)
		.map_err(|e| rejected("Order retrieval", e))
}

/// Handles DELETE /orders/{id}/cancel requests.
async fn handle_cancel_order(
	Path(id): Path<u64>,
	State(state): State<AppState>,
) -> Result<Json<EntityModel<Order>>, APIError> {
	order::cancel_order(id, &state.engine, &state.assembler)
		.await
		.map(Json)
		.map_err(|e| rejected("Order cancellation", e))
}

/// Handles PUT /orders/{id}/complete requests.
async fn handle_complete_order(
	Path(id): Path<u64>,
	State(state): State<AppState>,
) -> Result<Json<EntityModel<Order>>, APIError> {
	order::complete_order(id, &state.engine, &state.assembler)
		.await
		.map(Json)
		.map_err(|e| rejected("Order completion", e))
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{body::Body, http::Request};
	use payroll_config::{Config, CorsConfig};
	use payroll_storage::{implementations::memory::MemoryStorage, StorageService};
	use payroll_types::PROBLEM_JSON_CONTENT_TYPE;
	use serde_json::{json, Value};
	use tower::ServiceExt;

	const BASE: &str = "http://payroll.test";

	fn test_config() -> Config {
		format!(
			r#"
[payroll]
id = "payroll-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[api]
base_url = "{}"

[seed]
enabled = false
"#,
			BASE
		)
		.parse()
		.unwrap()
	}

	fn test_app() -> Router {
		app_with_config(test_config())
	}

	fn app_with_config(config: Config) -> Router {
		let api_config = config.api.clone();
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let engine = Arc::new(PayrollEngine::new(config, storage));
		build_router(AppState::new(engine, &api_config), &api_config)
	}

	struct TestResponse {
		status: StatusCode,
		headers: axum::http::HeaderMap,
		body: Value,
	}

	async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
		let mut request = Request::builder().method(method).uri(uri);
		let body = match body {
			Some(json) => {
				request = request.header(header::CONTENT_TYPE, "application/json");
				Body::from(json.to_string())
			},
			None => Body::empty(),
		};

		let response = app
			.clone()
			.oneshot(request.body(body).unwrap())
			.await
			.unwrap();

		let status = response.status();
		let headers = response.headers().clone();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

		TestResponse {
			status,
			headers,
			body,
		}
	}

	fn rels(body: &Value) -> Vec<String> {
		body["links"]
			.as_array()
			.unwrap()
			.iter()
			.map(|link| link["rel"].as_str().unwrap().to_string())
			.collect()
	}

	#[tokio::test]
	async fn test_order_cancel_twice() {
		let app = test_app();

		let created = send(
			&app,
			Method::POST,
			"/orders",
			Some(json!({ "description": "Laptop", "status": "COMPLETED" })),
		)
		.await;
		assert_eq!(created.status, StatusCode::CREATED);
		assert_eq!(created.body["status"], "IN_PROGRESS");
		assert_eq!(created.body["description"], "Laptop");
		let id = created.body["id"].as_u64().unwrap();
		assert_eq!(
			created.headers[header::LOCATION],
			format!("{}/orders/{}", BASE, id).as_str()
		);
		assert_eq!(rels(&created.body), vec!["self", "orders", "cancel", "complete"]);

		let cancelled = send(&app, Method::DELETE, &format!("/orders/{}/cancel", id), None).await;
		assert_eq!(cancelled.status, StatusCode::OK);
		assert_eq!(cancelled.body["status"], "CANCELLED");
		assert_eq!(rels(&cancelled.body), vec!["self", "orders"]);

		let again = send(&app, Method::DELETE, &format!("/orders/{}/cancel", id), None).await;
		assert_eq!(again.status, StatusCode::METHOD_NOT_ALLOWED);
		assert_eq!(
			again.headers[header::CONTENT_TYPE],
			PROBLEM_JSON_CONTENT_TYPE
		);
		assert_eq!(again.body["title"], "Method not allowed");
		assert!(again.body["detail"].as_str().unwrap().contains("CANCELLED"));

		let fetched = send(&app, Method::GET, &format!("/orders/{}", id), None).await;
		assert_eq!(fetched.body["status"], "CANCELLED");
	}

	#[tokio::test]
	async fn test_complete_after_cancel_rejected() {
		let app = test_app();

		let created = send(
			&app,
			Method::POST,
			"/orders",
			Some(json!({ "description": "Phone" })),
		)
		.await;
		let id = created.body["id"].as_u64().unwrap();

		send(&app, Method::DELETE, &format!("/orders/{}/cancel", id), None).await;
		let completed = send(&app, Method::PUT, &format!("/orders/{}/complete", id), None).await;

		assert_eq!(completed.status, StatusCode::METHOD_NOT_ALLOWED);
		assert_eq!(
			completed.body["detail"],
			"You can't complete an order that is in the CANCELLED status"
		);
	}

	#[tokio::test]
	async fn test_complete_in_progress_order() {
		let app = test_app();

		let created = send(
			&app,
			Method::POST,
			"/orders",
			Some(json!({ "description": "Desk" })),
		)
		.await;
		let id = created.body["id"].as_u64().unwrap();

		let completed = send(&app, Method::PUT, &format!("/orders/{}/complete", id), None).await;
		assert_eq!(completed.status, StatusCode::OK);
		assert_eq!(completed.body["status"], "COMPLETED");

		let listed = send(&app, Method::GET, "/orders", None).await;
		assert_eq!(listed.status, StatusCode::OK);
		assert_eq!(listed.body["content"].as_array().unwrap().len(), 1);
		assert_eq!(listed.body["links"][0]["href"], format!("{}/orders", BASE));
	}

	#[tokio::test]
	async fn test_missing_order() {
		let app = test_app();

		let fetched = send(&app, Method::GET, "/orders/42", None).await;
		assert_eq!(fetched.status, StatusCode::NOT_FOUND);
		assert_eq!(fetched.body["error"], "ORDER_NOT_FOUND");
		assert_eq!(fetched.body["message"], "Could not find order 42");

		let cancelled = send(&app, Method::DELETE, "/orders/42/cancel", None).await;
		assert_eq!(cancelled.status, StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_put_unknown_employee_creates_at_id() {
		let app = test_app();

		let response = send(
			&app,
			Method::PUT,
			"/employees/99",
			Some(json!({ "firstName": "A", "lastName": "B", "role": "eng" })),
		)
		.await;

		assert_eq!(response.status, StatusCode::CREATED);
		assert_eq!(
			response.headers[header::LOCATION],
			format!("{}/employees/99", BASE).as_str()
		);
		assert_eq!(response.body["id"], 99);
		assert_eq!(response.body["name"], "A B");
		assert_eq!(rels(&response.body), vec!["self", "employees"]);
	}

	#[tokio::test]
	async fn test_identical_put_is_idempotent() {
		let app = test_app();
		let body = json!({ "firstName": "Mary", "lastName": "Smith", "role": "cook" });

		let first = send(&app, Method::PUT, "/employees/7", Some(body.clone())).await;
		assert_eq!(first.status, StatusCode::CREATED);

		let second = send(&app, Method::PUT, "/employees/7", Some(body)).await;
		assert_eq!(second.status, StatusCode::OK);
		assert_eq!(second.body["id"], 7);
		assert_eq!(second.body["name"], "Mary Smith");
	}

	#[tokio::test]
	async fn test_put_role_only_rejected_on_both_branches() {
		let app = test_app();
		let body = json!({ "role": "cook" });

		let absent = send(&app, Method::PUT, "/employees/8", Some(body.clone())).await;
		assert_eq!(absent.status, StatusCode::BAD_REQUEST);
		assert_eq!(absent.body["error"], "MALFORMED_INPUT");

		send(
			&app,
			Method::PUT,
			"/employees/8",
			Some(json!({ "name": "A B", "role": "eng" })),
		)
		.await;
		let existing = send(&app, Method::PUT, "/employees/8", Some(body)).await;
		assert_eq!(existing.status, StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_put_existing_employee_replaces() {
		let app = test_app();

		let created = send(
			&app,
			Method::POST,
			"/employees",
			Some(json!({ "name": "Bilbo Baggins", "role": "burglar" })),
		)
		.await;
		assert_eq!(created.status, StatusCode::CREATED);
		assert!(created.headers.contains_key(header::LOCATION));
		let id = created.body["id"].as_u64().unwrap();

		let replaced = send(
			&app,
			Method::PUT,
			&format!("/employees/{}", id),
			Some(json!({ "name": "Samwise Gamgee", "role": "gardener" })),
		)
		.await;
		assert_eq!(replaced.status, StatusCode::OK);
		assert!(!replaced.headers.contains_key(header::LOCATION));
		assert_eq!(replaced.body["id"], id);
		assert_eq!(replaced.body["firstName"], "Samwise");
		assert_eq!(replaced.body["role"], "gardener");
	}

	#[tokio::test]
	async fn test_malformed_name_rejected() {
		let app = test_app();

		let response = send(
			&app,
			Method::POST,
			"/employees",
			Some(json!({ "name": "Gandalf", "role": "wizard" })),
		)
		.await;

		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		assert_eq!(response.body["error"], "MALFORMED_INPUT");
	}

	#[tokio::test]
	async fn test_employee_lifecycle() {
		let app = test_app();

		let created = send(
			&app,
			Method::POST,
			"/employees",
			Some(json!({ "firstName": "Frodo", "lastName": "Baggins", "role": "thief" })),
		)
		.await;
		let id = created.body["id"].as_u64().unwrap();

		let listed = send(&app, Method::GET, "/employees", None).await;
		assert_eq!(listed.body["content"][0]["name"], "Frodo Baggins");

		let deleted = send(&app, Method::DELETE, &format!("/employees/{}", id), None).await;
		assert_eq!(deleted.status, StatusCode::NO_CONTENT);

		let fetched = send(&app, Method::GET, &format!("/employees/{}", id), None).await;
		assert_eq!(fetched.status, StatusCode::NOT_FOUND);
		assert_eq!(
			fetched.body["message"],
			format!("Could not find employee {}", id)
		);

		// Deleting again is not an error
		let deleted = send(&app, Method::DELETE, &format!("/employees/{}", id), None).await;
		assert_eq!(deleted.status, StatusCode::NO_CONTENT);
	}

	#[tokio::test]
	async fn test_non_numeric_id_rejected() {
		let app = test_app();

		let response = send(&app, Method::GET, "/employees/abc", None).await;
		assert_eq!(response.status, StatusCode::BAD_REQUEST);

		let response = send(&app, Method::DELETE, "/orders/abc/cancel", None).await;
		assert_eq!(response.status, StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_wrong_method_on_transition_route() {
		let app = test_app();

		let response = send(&app, Method::GET, "/orders/1/cancel", None).await;
		assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
	}

	async fn allowed_origin(app: &Router, origin: &str) -> Option<HeaderValue> {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/orders")
			.header(header::ORIGIN, origin)
			.body(Body::empty())
			.unwrap();

		let response = app.clone().oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		response
			.headers()
			.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
			.cloned()
	}

	#[tokio::test]
	async fn test_cors_permissive_by_default() {
		let app = test_app();

		let allowed = allowed_origin(&app, "https://anywhere.example").await;
		assert_eq!(allowed.unwrap(), "*");
	}

	#[tokio::test]
	async fn test_cors_configured_origins() {
		let mut config = test_config();
		config.api.cors = Some(CorsConfig {
			allowed_origins: vec!["https://app.example".into(), "bad\norigin".into()],
		});
		let app = app_with_config(config);

		let allowed = allowed_origin(&app, "https://app.example").await;
		assert_eq!(allowed.unwrap(), "https://app.example");

		let other = allowed_origin(&app, "https://other.example").await;
		assert!(other.is_none());
	}
}
