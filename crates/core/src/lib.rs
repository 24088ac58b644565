//! ClinicDesk Core - activity feed, dashboard and rate aggregation.
//!
//! This crate holds the aggregation logic that sits between the clinic REST
//! backend and the dashboard views. It is transport-agnostic and defines
//! traits that are implemented by the `backend-client` crate.

pub mod cache;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod notifications;
pub mod polling;
pub mod rates;
pub mod sources;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
