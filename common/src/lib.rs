// Shared library for the employee directory service: configuration, storage,
// validation and telemetry

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod telemetry;
pub mod validation;
