//! Record services for aggregates without a lifecycle of their own.

pub mod employee;

pub use employee::{EmployeeError, EmployeeRecords, Upserted};
