//! PrismFin Backend Library
//!
//! Mock-data API behind the PrismFin analytics dashboard: generators, the
//! dashboard/quant state store, and the axum route layer.

pub mod api;
pub mod config;
pub mod generators;
pub mod middleware;
pub mod models;
pub mod store;

pub use api::{create_router, AppState};
pub use store::DashboardStore;
