// ABOUTME: OAuth login and callback route handlers
// ABOUTME: Issues the authorize redirect and completes the code exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization routes: `/login` and `/callback`.

use crate::dates;
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters of the provider callback
#[derive(Debug, Deserialize, Default)]
struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Authorization route handlers
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the authorization routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/login", get(Self::handle_login))
            .route("/callback", get(Self::handle_callback))
            .with_state(resources)
    }

    /// Issue a 302 redirect to the provider's authorize URL with a fresh
    /// CSRF nonce (600 s TTL)
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let url = resources.flow.begin_login().await?;
        Ok(found(&url))
    }

    /// Validate the CSRF state, exchange the code, store the token record
    /// and bounce back to the application home
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<CallbackQuery>,
    ) -> Result<Response, AppError> {
        resources
            .flow
            .complete_callback(
                &resources.lifecycle,
                params.code.as_deref(),
                params.state.as_deref(),
                dates::now_millis(),
            )
            .await?;
        Ok(found(&resources.app_base_url))
    }
}
