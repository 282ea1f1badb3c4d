// ABOUTME: Upstream provider integrations
// ABOUTME: Currently the Fitbit Web API only
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream provider clients.

/// Fitbit Web API client
pub mod fitbit;

pub use fitbit::UpstreamClient;
