//! Dashboard module - summary payload, composed view model and service.

mod dashboard_composer;
mod dashboard_model;
mod dashboard_service;
mod dashboard_traits;

pub use dashboard_composer::{align_trends, compose_summary};
pub use dashboard_model::{DashboardSummary, DashboardView, LocalAmounts, TrendPoint, TrendRow};
pub use dashboard_service::DashboardService;
pub use dashboard_traits::DashboardSummarySource;
