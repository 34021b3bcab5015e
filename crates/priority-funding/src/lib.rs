pub mod catalog;
pub mod config;
pub mod error;
pub mod funding;
pub mod telemetry;
