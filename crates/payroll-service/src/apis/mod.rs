//! Request handling for the payroll API resources.

pub mod employee;
pub mod order;
