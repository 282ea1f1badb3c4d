// ABOUTME: Connection status route handler
// ABOUTME: Always answers 200 with the derived SyncStatus payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status route: `/status`.

use crate::dates;
use crate::resources::ServerResources;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Status route handlers
pub struct StatusRoutes;

impl StatusRoutes {
    /// Create the status route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/status", get(Self::handle_status))
            .with_state(resources)
    }

    /// Report connection status; never an error response
    async fn handle_status(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<crate::models::SyncStatus> {
        Json(resources.reporter.status(dates::now_millis()).await)
    }
}
