// ABOUTME: Library entry point for the fitgate Fitbit gateway
// ABOUTME: Exposes the OAuth flow, metric aggregation and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # fitgate
//!
//! A server-side integration layer between a client application and the
//! Fitbit Web API for a single account. It completes and maintains an OAuth2
//! authorization-code grant, transparently refreshes the access credential
//! before it expires, and flattens the provider's day-oriented,
//! multi-endpoint API surface into aggregated, UI-ready time series and
//! daily summaries.
//!
//! ## Architecture
//!
//! - **store**: key/value persistence for the CSRF nonce and the token blob
//! - **oauth**: authorization flow and token lifecycle management
//! - **providers**: the upstream REST client with payload unwrapping
//! - **aggregator**: range/day fan-out and date-keyed merging
//! - **status**: connection status without surfacing upstream errors
//! - **routes**: the thin axum HTTP surface over all of the above
//!
//! Every inbound metric request goes through the token lifecycle first
//! (load, maybe refresh, return a usable token) before any upstream call.

/// Daily metric aggregation across upstream endpoints
pub mod aggregator;
/// Environment-driven configuration
pub mod config;
/// Date-range utilities with injectable clocks
pub mod dates;
/// Unified error handling
pub mod errors;
/// Logging initialization
pub mod logging;
/// UI-facing response models
pub mod models;
/// OAuth2 flow and token lifecycle
pub mod oauth;
/// Upstream provider clients
pub mod providers;
/// Shared server resources
pub mod resources;
/// HTTP route handlers
pub mod routes;
/// Connection status reporting
pub mod status;
/// Key/value persistence
pub mod store;
/// Shared utilities
pub mod utils;
