pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod scheduling;
pub mod telemetry;
