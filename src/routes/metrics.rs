// ABOUTME: Aggregated metric route handlers for range, day and series views
// ABOUTME: Every handler runs the token lifecycle before touching upstream
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric routes: `/range`, `/today` and `/sleep`.
//!
//! All three respond 401 when no usable token exists; partial upstream
//! failures inside an aggregate are absorbed to `null` values by the
//! aggregator and never fail the response.

use crate::dates;
use crate::errors::AppError;
use crate::oauth::TokenRecord;
use crate::resources::ServerResources;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters of the range and series endpoints. Raw strings: junk
/// values clamp to defaults instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
struct RangeQuery {
    #[serde(default)]
    days: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

/// Query parameters of the day endpoint
#[derive(Debug, Deserialize, Default)]
struct DayQuery {
    #[serde(default)]
    date: Option<String>,
}

/// Metric route handlers
pub struct MetricRoutes;

impl MetricRoutes {
    /// Create the metric routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/range", get(Self::handle_range))
            .route("/today", get(Self::handle_today))
            .route("/summary", get(Self::handle_today))
            .route("/sleep", get(Self::handle_series))
            .with_state(resources)
    }

    async fn require_access_token(resources: &ServerResources) -> Result<String, AppError> {
        let record: TokenRecord = resources.lifecycle.ensure_valid(dates::now_millis()).await?;
        record
            .access_token
            .ok_or_else(|| AppError::unauthorized("token record has no access token"))
    }

    /// Aggregated multi-day range ending at `end` (default today)
    async fn handle_range(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<RangeQuery>,
    ) -> Result<Response, AppError> {
        let access_token = Self::require_access_token(&resources).await?;

        let days = dates::clamp_days(params.days.as_deref());
        let end = dates::resolve_end(params.end.as_deref(), dates::today_local());

        let summary = resources
            .aggregator
            .range_summary(&access_token, days, end)
            .await;
        Ok(Json(summary).into_response())
    }

    /// Single-day summary with heart-rate-zone detail (default today)
    async fn handle_today(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<DayQuery>,
    ) -> Result<Response, AppError> {
        let access_token = Self::require_access_token(&resources).await?;

        let date = dates::resolve_end(params.date.as_deref(), dates::today_local());

        let summary = resources.aggregator.day_summary(&access_token, date).await;
        Ok(Json(summary).into_response())
    }

    /// Range-capable series only (steps, calories, resting HR), always
    /// ending today
    async fn handle_series(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<RangeQuery>,
    ) -> Result<Response, AppError> {
        let access_token = Self::require_access_token(&resources).await?;

        let days = dates::clamp_days(params.days.as_deref());

        let summary = resources
            .aggregator
            .series_summary(&access_token, days, dates::today_local())
            .await;
        Ok(Json(summary).into_response())
    }
}
