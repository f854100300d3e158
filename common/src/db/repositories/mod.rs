// Repository layer for database operations

pub mod employee;

pub use employee::{EmployeeRepository, EmployeeStore};
