// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Liveness endpoint for load balancers and uptime checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health check route.

use axum::routing::get;
use axum::{Json, Router};

/// Health route handlers
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    #[must_use]
    pub fn routes() -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new().route("/health", get(health_handler))
    }
}
