//! ClinicDesk Backend Client
//!
//! `reqwest` implementation of the clinicdesk-core source traits against
//! the clinic REST backend:
//!
//! | Endpoint              | Core trait                |
//! |-----------------------|---------------------------|
//! | `appointments/today`  | `ClinicActivitySource`    |
//! | `waiting-room/today`  | `ClinicActivitySource`    |
//! | `payments/recent`     | `ClinicActivitySource`    |
//! | `dashboard/summary`   | `DashboardSummarySource`  |
//! | `bcv-rate`            | `RateProvider`            |
//!
//! Payload decoding is lenient: list endpoints may answer with a bare array
//! or a paginated `{"results": [...]}` object, and single malformed items
//! are skipped instead of failing the whole list.

pub mod client;
pub mod errors;
mod sources;
pub mod wire;

pub use client::{endpoints, BackendConfig, ClinicBackendClient};
pub use errors::ClientError;
