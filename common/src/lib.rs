// Shared code for the bakery API: configuration, errors, telemetry,
// models and the data access layer

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod telemetry;
