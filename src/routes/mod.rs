// ABOUTME: Route module organization for the gateway HTTP endpoints
// ABOUTME: Thin handlers delegating to the service layer components
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP routes, organized by domain.

/// OAuth login and callback routes
pub mod auth;
/// Health check route
pub mod health;
/// Aggregated metric routes
pub mod metrics;
/// Connection status route
pub mod status;

use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use metrics::MetricRoutes;
pub use status::StatusRoutes;

/// Assemble the complete application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(MetricRoutes::routes(resources.clone()))
        .merge(StatusRoutes::routes(resources))
        .merge(HealthRoutes::routes())
}
