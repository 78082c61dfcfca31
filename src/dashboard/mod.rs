//! Dashboard module
//!
//! Provides an overview page with the report KPIs, a budget warning and charts
//! for the chosen date range.

mod cards;
mod charts;
mod dashboard_page;

pub use dashboard_page::{DashboardQueryParams, get_dashboard_page};
