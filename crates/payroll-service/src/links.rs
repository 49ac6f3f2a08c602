//! Hypermedia links for API representations.
//!
//! Links are computed from static route templates and the configured public
//! base URL, so every href in a response is absolute.

use payroll_types::{
	CollectionModel, Employee, EmployeeRepresentation, EntityModel, Link, Order, OrderStatus,
	OrderTransition, ResourceKind,
};
use std::sync::Arc;

/// Builds the `self` and collection links of a single resource.
pub fn build_links(base_url: &str, kind: ResourceKind, id: u64) -> Vec<Link> {
	let collection = format!("{}{}", base_url, kind.collection_path());
	vec![
		Link::self_rel(format!("{}/{}", collection, id)),
		Link::new(kind.collection_rel(), collection),
	]
}

/// Wraps entities into their linked representations.
#[derive(Debug, Clone)]
pub struct ModelAssembler {
	base_url: Arc<str>,
}

impl ModelAssembler {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: Arc::from(base_url.trim_end_matches('/')),
		}
	}

	fn collection_links(&self, kind: ResourceKind) -> Vec<Link> {
		vec![Link::self_rel(format!(
			"{}{}",
			self.base_url,
			kind.collection_path()
		))]
	}

	pub fn employee(&self, employee: Employee) -> EntityModel<EmployeeRepresentation> {
		let links = build_links(&self.base_url, ResourceKind::Employee, employee.id);
		EntityModel::new(employee.into(), links)
	}

	pub fn employees(&self, employees: Vec<Employee>) -> CollectionModel<EmployeeRepresentation> {
		CollectionModel {
			content: employees.into_iter().map(|e| self.employee(e)).collect(),
			links: self.collection_links(ResourceKind::Employee),
		}
	}

	/// Links an order. In-progress orders also advertise the transitions
	/// still open to them.
	pub fn order(&self, order: Order) -> EntityModel<Order> {
		let mut links = build_links(&self.base_url, ResourceKind::Order, order.id);

		if order.status == OrderStatus::InProgress {
			for transition in [OrderTransition::Cancel, OrderTransition::Complete] {
				links.push(Link::new(
					transition.to_string(),
					format!(
						"{}{}/{}/{}",
						self.base_url,
						ResourceKind::Order.collection_path(),
						order.id,
						transition
					),
				));
			}
		}

		EntityModel::new(order, links)
	}

	pub fn orders(&self, orders: Vec<Order>) -> CollectionModel<Order> {
		CollectionModel {
			content: orders.into_iter().map(|o| self.order(o)).collect(),
			links: self.collection_links(ResourceKind::Order),
		}
	}
}
